//! Mutually exclusive keyboard modes.

mod core;

pub use core::{ModeController, ModeSpec, ModeTransition};
