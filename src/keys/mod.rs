//! Key events, chords, and their string form.
//!
//! Key names follow the browser `KeyboardEvent.key` vocabulary (`"ArrowUp"`,
//! `"Enter"`, `" "`, `"a"`) so configuration written for web hosts can be
//! reused verbatim. Terminal hosts convert `crossterm` events via
//! [`KeyEvent::from_terminal`].

mod core;
mod terminal;

pub use core::{KeyChord, KeyEvent, KeyParseError, Modifiers, canonical_key};
