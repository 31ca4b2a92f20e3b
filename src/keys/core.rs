use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Named keys recognised in chord strings. Single characters are always valid.
const NAMED_KEYS: &[&str] = &[
    "ArrowUp",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "Enter",
    "Escape",
    "Tab",
    "Backspace",
    "Delete",
    "Insert",
    "Home",
    "End",
    "PageUp",
    "PageDown",
    "F1",
    "F2",
    "F3",
    "F4",
    "F5",
    "F6",
    "F7",
    "F8",
    "F9",
    "F10",
    "F11",
    "F12",
];

const KEY_ALIASES: &[(&str, &str)] = &[
    ("space", " "),
    ("esc", "Escape"),
    ("del", "Delete"),
    ("return", "Enter"),
    ("up", "ArrowUp"),
    ("down", "ArrowDown"),
    ("left", "ArrowLeft"),
    ("right", "ArrowRight"),
    ("pgup", "PageUp"),
    ("pgdown", "PageDown"),
];

/// Modifier keys held during a key press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
        alt: false,
        meta: false,
    };
    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };
    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };
    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };
    pub const META: Self = Self {
        meta: true,
        ..Self::NONE
    };

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }

    pub fn union(self, other: Self) -> Self {
        Self {
            ctrl: self.ctrl || other.ctrl,
            shift: self.shift || other.shift,
            alt: self.alt || other.alt,
            meta: self.meta || other.meta,
        }
    }

    fn labels(&self) -> impl Iterator<Item = &'static str> {
        [
            (self.ctrl, "Ctrl"),
            (self.alt, "Alt"),
            (self.shift, "Shift"),
            (self.meta, "Meta"),
        ]
        .into_iter()
        .filter_map(|(held, label)| held.then_some(label))
    }
}

/// A key press delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }

    /// Key press without modifiers.
    pub fn plain(key: impl Into<String>) -> Self {
        Self::new(key, Modifiers::NONE)
    }
}

impl From<KeyChord> for KeyEvent {
    fn from(chord: KeyChord) -> Self {
        Self {
            key: chord.key,
            modifiers: chord.modifiers,
        }
    }
}

impl FromStr for KeyEvent {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeyChord::from_str(s).map(Self::from)
    }
}

/// A key binding: one key plus the exact modifier set that must be held.
///
/// Serialized as a chord string such as `"Ctrl+a"` or `"Shift+ArrowUp"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyChord {
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyChord {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }

    pub fn plain(key: impl Into<String>) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    /// Exact match on key and modifier set: `Ctrl+a` does not satisfy `a`.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.key == event.key && self.modifiers == event.modifiers
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for label in self.modifiers.labels() {
            write!(f, "{label}+")?;
        }
        if self.key == " " {
            f.write_str("Space")
        } else {
            f.write_str(&self.key)
        }
    }
}

impl FromStr for KeyChord {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(KeyParseError::Empty);
        }
        if s == " " || s == "+" {
            return Ok(Self::plain(s));
        }

        let (prefix, key_part) = if let Some(prefix) = s.strip_suffix("++") {
            (prefix, "+")
        } else if let Some(pos) = s.rfind('+') {
            (&s[..pos], &s[pos + 1..])
        } else {
            ("", s)
        };

        let mut modifiers = Modifiers::NONE;
        for part in prefix.split('+').map(str::trim).filter(|p| !p.is_empty()) {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => modifiers.ctrl = true,
                "shift" => modifiers.shift = true,
                "alt" | "option" => modifiers.alt = true,
                "meta" | "cmd" | "command" | "super" | "win" => modifiers.meta = true,
                _ => return Err(KeyParseError::UnknownModifier(part.to_string())),
            }
        }

        let key = canonical_key(key_part)?;
        Ok(Self::new(key, modifiers))
    }
}

impl TryFrom<String> for KeyChord {
    type Error = KeyParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<KeyChord> for String {
    fn from(chord: KeyChord) -> Self {
        chord.to_string()
    }
}

/// Normalise a key name: single characters pass through unchanged, named keys
/// and aliases are matched case-insensitively.
///
/// Any other alphanumeric name starting with an uppercase letter is kept
/// verbatim (`"MediaPlayPause"`, `"F13"`) so the full browser key vocabulary
/// survives a serialization round trip. Lowercase unknown names are rejected.
pub fn canonical_key(raw: &str) -> Result<String, KeyParseError> {
    if raw == " " {
        return Ok(raw.to_string());
    }
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(KeyParseError::NoKey);
    }
    if trimmed.chars().count() == 1 {
        return Ok(trimmed.to_string());
    }
    if let Some(named) = NAMED_KEYS
        .iter()
        .find(|name| name.eq_ignore_ascii_case(trimmed))
    {
        return Ok((*named).to_string());
    }
    KEY_ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(trimmed))
        .map(|(_, key)| (*key).to_string())
        .or_else(|| is_key_name(trimmed).then(|| trimmed.to_string()))
        .ok_or_else(|| KeyParseError::UnknownKey(trimmed.to_string()))
}

fn is_key_name(name: &str) -> bool {
    name.starts_with(|ch: char| ch.is_ascii_uppercase())
        && name.chars().all(|ch| ch.is_ascii_alphanumeric())
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyParseError {
    #[error("key string is empty")]
    Empty,
    #[error("no key specified (only modifiers)")]
    NoKey,
    #[error("unknown modifier `{0}`")]
    UnknownModifier(String),
    #[error("unknown key `{0}`")]
    UnknownKey(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_modifiers_and_named_keys() {
        let chord: KeyChord = "Ctrl+Shift+arrowup".parse().unwrap();
        assert_eq!(chord.key, "ArrowUp");
        assert!(chord.modifiers.ctrl && chord.modifiers.shift);
        assert!(!chord.modifiers.alt && !chord.modifiers.meta);
    }

    #[test]
    fn aliases_resolve_to_browser_names() {
        assert_eq!("Space".parse::<KeyChord>().unwrap().key, " ");
        assert_eq!("esc".parse::<KeyChord>().unwrap().key, "Escape");
        assert_eq!("Cmd+Del".parse::<KeyChord>().unwrap().modifiers, Modifiers::META);
        assert_eq!(" ".parse::<KeyChord>().unwrap(), KeyChord::plain(" "));
    }

    #[test]
    fn plus_key_is_supported() {
        assert_eq!("+".parse::<KeyChord>().unwrap(), KeyChord::plain("+"));
        let chord: KeyChord = "Ctrl++".parse().unwrap();
        assert_eq!(chord, KeyChord::new("+", Modifiers::CTRL));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!("".parse::<KeyChord>(), Err(KeyParseError::Empty));
        assert_eq!("Ctrl+".parse::<KeyChord>(), Err(KeyParseError::NoKey));
        assert_eq!(
            "Hyper+a".parse::<KeyChord>(),
            Err(KeyParseError::UnknownModifier("Hyper".into()))
        );
        assert_eq!(
            "banana".parse::<KeyChord>(),
            Err(KeyParseError::UnknownKey("banana".into()))
        );
        assert_eq!(
            "Page-Up".parse::<KeyChord>(),
            Err(KeyParseError::UnknownKey("Page-Up".into()))
        );
    }

    #[test]
    fn browser_key_names_round_trip() {
        let chord = KeyChord::new("MediaPlayPause", Modifiers::CTRL);
        let json = serde_json::to_string(&chord).unwrap();
        assert_eq!(json, "\"Ctrl+MediaPlayPause\"");
        let back: KeyChord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, chord);
        assert_eq!(canonical_key("F13").unwrap(), "F13");
    }

    #[test]
    fn matching_requires_exact_modifiers() {
        let plain = KeyChord::plain("a");
        assert!(plain.matches(&KeyEvent::plain("a")));
        assert!(!plain.matches(&KeyEvent::new("a", Modifiers::CTRL)));

        let ctrl_a = KeyChord::new("a", Modifiers::CTRL);
        assert!(!ctrl_a.matches(&KeyEvent::new("a", Modifiers::CTRL.union(Modifiers::SHIFT))));
        assert!(ctrl_a.matches(&KeyEvent::new("a", Modifiers::CTRL)));
    }

    #[test]
    fn display_uses_stable_modifier_order() {
        let chord = KeyChord::new(" ", Modifiers::SHIFT.union(Modifiers::CTRL));
        assert_eq!(chord.to_string(), "Ctrl+Shift+Space");
    }

    #[test]
    fn chords_serialize_as_strings() {
        let chord = KeyChord::new("ArrowDown", Modifiers::SHIFT);
        let json = serde_json::to_string(&chord).unwrap();
        assert_eq!(json, "\"Shift+ArrowDown\"");
        let back: KeyChord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, chord);
        assert!(serde_json::from_str::<KeyChord>("\"Nope+x\"").is_err());
    }
}
