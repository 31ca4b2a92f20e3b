//! Logical navigation roles and the physical keys bound to them.

mod core;

pub use core::{KeyMapping, MappingSpec, NavRole, PRESET_NAMES};
