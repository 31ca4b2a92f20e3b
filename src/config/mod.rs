//! Static manager configuration.
//!
//! A [`ManagerConfig`] is plain data: build it in code or load it from JSON,
//! then hand it to [`ZoneManager::new`](crate::ZoneManager::new), which
//! validates it once and fails fast on any inconsistency.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::actions::KeyAction;
use crate::error::{ConfigError, Result};
use crate::keys::KeyChord;
use crate::mapping::{KeyMapping, MappingSpec};
use crate::modes::ModeSpec;
use crate::registry::ZoneSpec;

pub const DEFAULT_MODE_NAME: &str = "navigation";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Zone order defines next/previous cycling.
    pub zones: Vec<ZoneSpec>,
    #[serde(default)]
    pub actions: Vec<KeyAction>,
    #[serde(default)]
    pub modes: Vec<ModeSpec>,
    /// Defaults to arrow keys.
    #[serde(default)]
    pub key_mapping: Option<MappingSpec>,
    #[serde(default)]
    pub prev_zone_key: Option<KeyChord>,
    #[serde(default)]
    pub next_zone_key: Option<KeyChord>,
    #[serde(default)]
    pub wrap_zones: bool,
    /// Name actions use to target the state where no mode is active.
    #[serde(default = "default_mode_name")]
    pub default_mode_name: String,
}

fn default_mode_name() -> String {
    DEFAULT_MODE_NAME.to_string()
}

impl ManagerConfig {
    pub fn new(zones: Vec<ZoneSpec>) -> Self {
        Self {
            zones,
            actions: Vec::new(),
            modes: Vec::new(),
            key_mapping: None,
            prev_zone_key: None,
            next_zone_key: None,
            wrap_zones: false,
            default_mode_name: default_mode_name(),
        }
    }

    pub fn with_actions(mut self, actions: Vec<KeyAction>) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_modes(mut self, modes: Vec<ModeSpec>) -> Self {
        self.modes = modes;
        self
    }

    pub fn with_key_mapping(mut self, mapping: impl Into<MappingSpec>) -> Self {
        self.key_mapping = Some(mapping.into());
        self
    }

    pub fn with_preset(mut self, preset: impl Into<String>) -> Self {
        self.key_mapping = Some(MappingSpec::Preset {
            preset: preset.into(),
        });
        self
    }

    pub fn with_zone_keys(mut self, prev: KeyChord, next: KeyChord) -> Self {
        self.prev_zone_key = Some(prev);
        self.next_zone_key = Some(next);
        self
    }

    pub fn wrapping(mut self, wrap: bool) -> Self {
        self.wrap_zones = wrap;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Run every construction-time check without keeping the manager.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        crate::ZoneManager::from_config(self.clone()).map(|_| ())
    }

    pub(crate) fn resolve_mapping(&self) -> std::result::Result<KeyMapping, ConfigError> {
        match &self.key_mapping {
            Some(spec) => spec.resolve(),
            None => Ok(KeyMapping::arrows()),
        }
    }
}

/// Checks spanning zones, modes, and actions. Component-local invariants
/// (duplicates, ambiguous bindings) are enforced by each component.
pub(crate) fn validate_references(config: &ManagerConfig) -> std::result::Result<(), ConfigError> {
    let zones: HashSet<&str> = config.zones.iter().map(|zone| zone.id.as_str()).collect();
    let modes: HashSet<&str> = config.modes.iter().map(|mode| mode.name.as_str()).collect();

    if config.default_mode_name.is_empty() {
        return Err(ConfigError::EmptyId { kind: "default mode" });
    }
    if modes.contains(config.default_mode_name.as_str()) {
        return Err(ConfigError::DuplicateMode(config.default_mode_name.clone()));
    }

    for mode in &config.modes {
        if let Some(zone) = mode.zone_ids.iter().find(|zone| !zones.contains(zone.as_str())) {
            return Err(ConfigError::UnknownZoneReference {
                owner: format!("mode `{}`", mode.name),
                zone: zone.clone(),
            });
        }
    }

    for action in &config.actions {
        let owner = || format!("action `{}`", action.trigger);
        if let Some(zone) = action.zone_ids.iter().find(|zone| !zones.contains(zone.as_str())) {
            return Err(ConfigError::UnknownZoneReference {
                owner: owner(),
                zone: zone.clone(),
            });
        }
        if let Some(mode) = action.mode_names.iter().find(|mode| {
            mode.as_str() != config.default_mode_name && !modes.contains(mode.as_str())
        }) {
            return Err(ConfigError::UnknownModeReference {
                owner: owner(),
                mode: mode.clone(),
            });
        }
    }

    if let (Some(prev), Some(next)) = (&config.prev_zone_key, &config.next_zone_key) {
        if prev == next {
            return Err(ConfigError::ZoneKeyConflict(prev.to_string()));
        }
    }

    Ok(())
}
