//! Registry module orchestrator. Types live in `core` and are re-exported here.
//!
//! The zone registry owns every focus zone of a manager, the zone order used
//! for next/previous cycling, and the per-zone focused item index.

mod core;

pub use core::{ItemFocus, ItemId, Zone, ZoneId, ZoneRegistry, ZoneSpec, ZoneSwitch};
