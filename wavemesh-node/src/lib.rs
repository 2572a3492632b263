//! # wavemesh-node — P2P chat node daemon
//!
//! Foreground service wiring the wavemesh-core building blocks
//! together: the webcam capture pipeline (synthetic test-pattern
//! source by default) feeding the encoder and bandwidth estimator,
//! and the share registry persisted to a JSON store.

pub mod config;
