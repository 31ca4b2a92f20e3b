//! Keyboard hints derived from the live manager state.

mod core;

pub use core::{Hint, HintGroup, chord_label, hints_for, key_label, render_hints};
