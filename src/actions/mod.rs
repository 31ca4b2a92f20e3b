//! Declarative key bindings executed by the host.

mod core;

pub use core::{ActionTable, ActionTrigger, DEFAULT_HINT_GROUP, KeyAction};
