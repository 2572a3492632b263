//! # Share registry
//!
//! Management of locally shared directories: which paths are shared,
//! under what name, with which visibility flags, and for which friend
//! groups.
//!
//! ## Sub-modules
//!
//! | Module    | Purpose                                              |
//! |-----------|------------------------------------------------------|
//! | `dirs`    | `SharedDirectory` model and `ShareFlags`             |
//! | `groups`  | Friend-group ids and display-name resolution         |
//! | `manager` | Staged CRUD, commit/reload, change notification      |
//! | `store`   | Persistence backends (JSON file, in-memory)          |

pub mod dirs;
pub mod groups;
pub mod manager;
pub mod store;

// ── Re-exports ───────────────────────────────────────────────────

pub use dirs::{ShareFlags, SharedDirectory};
pub use groups::{GroupId, GroupRegistry, InMemoryGroups, group_label};
pub use manager::{AddReport, ShareManager};
pub use store::{JsonShareStore, MemoryShareStore, ShareBackend};
