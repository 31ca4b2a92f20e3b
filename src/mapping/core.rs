use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::keys::canonical_key;
use crate::navigation::Intent;

pub const PRESET_NAMES: &[&str] = &["arrows", "wasd", "vim", "arrows_and_wasd"];

/// Logical role a physical key can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavRole {
    Up,
    Down,
    Left,
    Right,
    Select,
}

impl NavRole {
    pub const ALL: [NavRole; 5] = [
        NavRole::Up,
        NavRole::Down,
        NavRole::Left,
        NavRole::Right,
        NavRole::Select,
    ];

    /// Movement intent for directional roles; `Select` has none.
    pub fn intent(self) -> Option<Intent> {
        match self {
            NavRole::Up => Some(Intent::Up),
            NavRole::Down => Some(Intent::Down),
            NavRole::Left => Some(Intent::Left),
            NavRole::Right => Some(Intent::Right),
            NavRole::Select => None,
        }
    }
}

impl fmt::Display for NavRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NavRole::Up => "up",
            NavRole::Down => "down",
            NavRole::Left => "left",
            NavRole::Right => "right",
            NavRole::Select => "select",
        };
        f.write_str(name)
    }
}

/// Table from logical role to the keys that trigger it.
///
/// Several keys may share a role (`w` and `ArrowUp` both meaning up), but a
/// key may only belong to one role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyMapping {
    roles: BTreeMap<NavRole, Vec<String>>,
}

impl KeyMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, role: NavRole, keys: &[&str]) -> Self {
        let entry = self.roles.entry(role).or_default();
        for key in keys {
            if !entry.iter().any(|existing| existing == key) {
                entry.push((*key).to_string());
            }
        }
        self
    }

    pub fn arrows() -> Self {
        Self::new()
            .with(NavRole::Up, &["ArrowUp"])
            .with(NavRole::Down, &["ArrowDown"])
            .with(NavRole::Left, &["ArrowLeft"])
            .with(NavRole::Right, &["ArrowRight"])
            .with(NavRole::Select, &["Enter"])
    }

    pub fn wasd() -> Self {
        Self::new()
            .with(NavRole::Up, &["w"])
            .with(NavRole::Down, &["s"])
            .with(NavRole::Left, &["a"])
            .with(NavRole::Right, &["d"])
            .with(NavRole::Select, &["Enter"])
    }

    pub fn vim() -> Self {
        Self::new()
            .with(NavRole::Up, &["k"])
            .with(NavRole::Down, &["j"])
            .with(NavRole::Left, &["h"])
            .with(NavRole::Right, &["l"])
            .with(NavRole::Select, &["Enter"])
    }

    pub fn arrows_and_wasd() -> Self {
        Self::arrows().merge(&Self::wasd())
    }

    /// Look up a preset by name (see [`PRESET_NAMES`]).
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "arrows" => Some(Self::arrows()),
            "wasd" => Some(Self::wasd()),
            "vim" => Some(Self::vim()),
            "arrows_and_wasd" => Some(Self::arrows_and_wasd()),
            _ => None,
        }
    }

    /// Union of both tables, keeping `self`'s key order first.
    pub fn merge(mut self, other: &KeyMapping) -> Self {
        for (role, keys) in &other.roles {
            let entry = self.roles.entry(*role).or_default();
            for key in keys {
                if !entry.contains(key) {
                    entry.push(key.clone());
                }
            }
        }
        self
    }

    pub fn keys_for(&self, role: NavRole) -> &[String] {
        self.roles.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn role_of(&self, key: &str) -> Option<NavRole> {
        self.roles
            .iter()
            .find(|(_, keys)| keys.iter().any(|candidate| candidate == key))
            .map(|(role, _)| *role)
    }

    /// Rewrite every key to its canonical name (`"Up"` becomes `"ArrowUp"`),
    /// failing on names no key event can carry.
    pub fn canonicalize(&self) -> Result<Self, ConfigError> {
        let mut roles: BTreeMap<NavRole, Vec<String>> = BTreeMap::new();
        for (role, keys) in &self.roles {
            let entry = roles.entry(*role).or_default();
            for key in keys {
                let key = canonical_key(key)?;
                if !entry.contains(&key) {
                    entry.push(key);
                }
            }
        }
        Ok(Self { roles })
    }

    /// Reject keys claimed by more than one role.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen: BTreeMap<&str, NavRole> = BTreeMap::new();
        for (role, keys) in &self.roles {
            for key in keys {
                if let Some(first) = seen.insert(key.as_str(), *role) {
                    if first != *role {
                        return Err(ConfigError::MappingConflict {
                            key: key.clone(),
                            first,
                            second: *role,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// Key mapping as written in configuration: a preset name or a full table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MappingSpec {
    Preset { preset: String },
    Table(KeyMapping),
}

impl MappingSpec {
    pub fn resolve(&self) -> Result<KeyMapping, ConfigError> {
        let mapping = match self {
            MappingSpec::Preset { preset } => KeyMapping::preset(preset)
                .ok_or_else(|| ConfigError::UnknownPreset(preset.clone()))?,
            MappingSpec::Table(mapping) => mapping.canonicalize()?,
        };
        mapping.validate()?;
        Ok(mapping)
    }
}

impl From<KeyMapping> for MappingSpec {
    fn from(mapping: KeyMapping) -> Self {
        MappingSpec::Table(mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyParseError;

    #[test]
    fn several_keys_normalize_to_one_role() {
        let mapping = KeyMapping::arrows_and_wasd();
        assert_eq!(mapping.role_of("w"), Some(NavRole::Up));
        assert_eq!(mapping.role_of("ArrowUp"), Some(NavRole::Up));
        assert_eq!(mapping.role_of("q"), None);
        assert_eq!(mapping.keys_for(NavRole::Up), ["ArrowUp", "w"]);
        assert_eq!(mapping.keys_for(NavRole::Select), ["Enter"]);
    }

    #[test]
    fn presets_cover_all_names() {
        for name in PRESET_NAMES {
            let mapping = KeyMapping::preset(name).unwrap();
            assert!(mapping.validate().is_ok(), "{name}");
        }
        assert!(KeyMapping::preset("emacs").is_none());
    }

    #[test]
    fn conflicting_roles_are_rejected() {
        let mapping = KeyMapping::new()
            .with(NavRole::Up, &["k"])
            .with(NavRole::Down, &["k"]);
        assert_eq!(
            mapping.validate(),
            Err(ConfigError::MappingConflict {
                key: "k".into(),
                first: NavRole::Up,
                second: NavRole::Down,
            })
        );
    }

    #[test]
    fn mapping_accepts_preset_or_table() {
        let preset: MappingSpec = serde_json::from_str(r#"{"preset":"vim"}"#).unwrap();
        assert_eq!(preset.resolve().unwrap(), KeyMapping::vim());

        let table: MappingSpec = serde_json::from_str(r#"{"up":["i"],"down":["k"]}"#).unwrap();
        let mapping = table.resolve().unwrap();
        assert_eq!(mapping.role_of("i"), Some(NavRole::Up));
        assert!(mapping.keys_for(NavRole::Left).is_empty());

        let unknown: MappingSpec = serde_json::from_str(r#"{"preset":"emacs"}"#).unwrap();
        assert_eq!(
            unknown.resolve(),
            Err(ConfigError::UnknownPreset("emacs".into()))
        );
    }

    #[test]
    fn table_keys_are_canonicalized() {
        let table: MappingSpec =
            serde_json::from_str(r#"{"up":["Up","k"],"down":["Down"],"select":["space"]}"#)
                .unwrap();
        let mapping = table.resolve().unwrap();
        assert_eq!(mapping.role_of("ArrowUp"), Some(NavRole::Up));
        assert_eq!(mapping.role_of("ArrowDown"), Some(NavRole::Down));
        assert_eq!(mapping.role_of(" "), Some(NavRole::Select));
        assert_eq!(mapping.keys_for(NavRole::Up), ["ArrowUp", "k"]);

        let unknown: MappingSpec = serde_json::from_str(r#"{"up":["upward"]}"#).unwrap();
        assert_eq!(
            unknown.resolve(),
            Err(ConfigError::InvalidKey(KeyParseError::UnknownKey("upward".into())))
        );
    }

    #[test]
    fn aliases_that_collapse_onto_one_key_conflict() {
        let mapping = KeyMapping::new()
            .with(NavRole::Up, &["Up"])
            .with(NavRole::Down, &["ArrowUp"]);
        assert!(mapping.validate().is_ok());
        assert_eq!(
            MappingSpec::from(mapping).resolve(),
            Err(ConfigError::MappingConflict {
                key: "ArrowUp".into(),
                first: NavRole::Up,
                second: NavRole::Down,
            })
        );
    }
}
