//! Index transitions for each zone topology.

mod core;

pub use core::{Intent, NavStep, NavigationStrategy};
