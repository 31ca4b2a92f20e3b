//! Error module orchestrator. Types live in `types` and are re-exported here.

mod types;

pub use types::{ConfigError, NavError, Result, SessionError};
