use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, NavError, Result};
use crate::keys::{KeyChord, KeyEvent};
use crate::navigation::NavigationStrategy;
use crate::registry::ZoneId;

/// Declarative mode definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeSpec {
    pub name: String,
    pub enter_key: KeyChord,
    pub exit_key: KeyChord,
    /// Strategy applied to allowed zones while the mode is active.
    #[serde(default)]
    pub navigation_override: Option<NavigationStrategy>,
    /// Zones the mode may be entered from. Empty means every zone.
    #[serde(default)]
    pub zone_ids: Vec<ZoneId>,
    #[serde(default)]
    pub indicator_text: Option<String>,
}

impl ModeSpec {
    pub fn new(name: impl Into<String>, enter_key: KeyChord, exit_key: KeyChord) -> Self {
        Self {
            name: name.into(),
            enter_key,
            exit_key,
            navigation_override: None,
            zone_ids: Vec::new(),
            indicator_text: None,
        }
    }

    pub fn with_navigation(mut self, strategy: NavigationStrategy) -> Self {
        self.navigation_override = Some(strategy);
        self
    }

    pub fn restricted_to<I, S>(mut self, zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ZoneId>,
    {
        self.zone_ids = zones.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_indicator(mut self, text: impl Into<String>) -> Self {
        self.indicator_text = Some(text.into());
        self
    }

    pub fn is_restricted(&self) -> bool {
        !self.zone_ids.is_empty()
    }

    pub fn allows_zone(&self, zone_id: Option<&str>) -> bool {
        if !self.is_restricted() {
            return true;
        }
        zone_id.is_some_and(|zone| self.zone_ids.iter().any(|allowed| allowed == zone))
    }

    fn shares_zone_with(&self, other: &ModeSpec) -> bool {
        !self.is_restricted()
            || !other.is_restricted()
            || self.zone_ids.iter().any(|zone| other.zone_ids.contains(zone))
    }
}

/// State change produced by an explicit mode request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeTransition {
    Entered(String),
    Exited(String),
    /// The requested mode was already active.
    Unchanged(String),
}

/// Tracks which registered mode, if any, is active.
#[derive(Debug, Clone, Default)]
pub struct ModeController {
    modes: Vec<ModeSpec>,
    active: Option<usize>,
}

impl ModeController {
    pub fn new(modes: Vec<ModeSpec>) -> std::result::Result<Self, ConfigError> {
        for (idx, mode) in modes.iter().enumerate() {
            if mode.name.is_empty() {
                return Err(ConfigError::EmptyId { kind: "mode" });
            }
            for earlier in &modes[..idx] {
                if earlier.name == mode.name {
                    return Err(ConfigError::DuplicateMode(mode.name.clone()));
                }
                if earlier.enter_key == mode.enter_key && earlier.shares_zone_with(mode) {
                    return Err(ConfigError::AmbiguousModeEntry {
                        key: mode.enter_key.to_string(),
                        first: earlier.name.clone(),
                        second: mode.name.clone(),
                    });
                }
            }
        }
        Ok(Self {
            modes,
            active: None,
        })
    }

    pub fn modes(&self) -> &[ModeSpec] {
        &self.modes
    }

    pub fn get(&self, name: &str) -> Option<&ModeSpec> {
        self.modes.iter().find(|mode| mode.name == name)
    }

    pub fn active(&self) -> Option<&ModeSpec> {
        self.active.map(|idx| &self.modes[idx])
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active().map(|mode| mode.name.as_str())
    }

    /// Enter `name` while `focused_zone` has focus.
    ///
    /// Failed requests leave the controller untouched.
    pub fn enter(&mut self, name: &str, focused_zone: Option<&str>) -> Result<ModeTransition> {
        let idx = self
            .modes
            .iter()
            .position(|mode| mode.name == name)
            .ok_or_else(|| NavError::UnknownMode(name.to_string()))?;

        match self.active {
            Some(active) if active == idx => return Ok(ModeTransition::Unchanged(name.to_string())),
            Some(active) => {
                return Err(NavError::ModeAlreadyActive {
                    active: self.modes[active].name.clone(),
                    requested: name.to_string(),
                });
            }
            None => {}
        }

        let mode = &self.modes[idx];
        if !mode.allows_zone(focused_zone) {
            return Err(match focused_zone {
                Some(zone) => NavError::ModeZoneRestriction {
                    mode: name.to_string(),
                    zone: zone.to_string(),
                },
                None => NavError::NoFocusedZone,
            });
        }

        self.active = Some(idx);
        Ok(ModeTransition::Entered(name.to_string()))
    }

    pub fn exit(&mut self) -> Result<ModeTransition> {
        let idx = self.active.take().ok_or(NavError::NoActiveMode)?;
        Ok(ModeTransition::Exited(self.modes[idx].name.clone()))
    }

    /// Mode whose entry key matches `event` and which may be entered from
    /// `focused_zone`. Only consulted while no mode is active.
    pub fn entry_for(&self, event: &KeyEvent, focused_zone: Option<&str>) -> Option<&ModeSpec> {
        if self.active.is_some() {
            return None;
        }
        self.modes
            .iter()
            .find(|mode| mode.enter_key.matches(event) && mode.allows_zone(focused_zone))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split() -> ModeSpec {
        ModeSpec::new("split", KeyChord::plain("Enter"), KeyChord::plain("Escape"))
            .with_navigation(NavigationStrategy::ScrollOnly)
            .restricted_to(["segments"])
    }

    fn controller() -> ModeController {
        ModeController::new(vec![
            split(),
            ModeSpec::new("search", KeyChord::plain("/"), KeyChord::plain("Escape")),
        ])
        .unwrap()
    }

    #[test]
    fn enter_is_idempotent() {
        let mut modes = controller();
        assert_eq!(
            modes.enter("split", Some("segments")).unwrap(),
            ModeTransition::Entered("split".into())
        );
        assert_eq!(
            modes.enter("split", Some("segments")).unwrap(),
            ModeTransition::Unchanged("split".into())
        );
        assert_eq!(modes.active_name(), Some("split"));
    }

    #[test]
    fn exit_without_active_mode_is_rejected() {
        let mut modes = controller();
        assert!(matches!(modes.exit(), Err(NavError::NoActiveMode)));
        assert!(modes.active().is_none());
    }

    #[test]
    fn restricted_mode_rejects_other_zones() {
        let mut modes = controller();
        let err = modes.enter("split", Some("sidebar")).unwrap_err();
        assert!(matches!(
            err,
            NavError::ModeZoneRestriction { ref mode, ref zone } if mode == "split" && zone == "sidebar"
        ));
        assert!(modes.active().is_none());
        assert!(matches!(
            modes.enter("split", None),
            Err(NavError::NoFocusedZone)
        ));
    }

    #[test]
    fn only_one_mode_at_a_time() {
        let mut modes = controller();
        modes.enter("search", Some("sidebar")).unwrap();
        let err = modes.enter("split", Some("segments")).unwrap_err();
        assert!(matches!(err, NavError::ModeAlreadyActive { .. }));
        assert_eq!(modes.active_name(), Some("search"));
        assert_eq!(
            modes.exit().unwrap(),
            ModeTransition::Exited("search".into())
        );
    }

    #[test]
    fn unknown_mode_is_an_error() {
        let mut modes = controller();
        assert!(matches!(
            modes.enter("visual", Some("segments")),
            Err(NavError::UnknownMode(name)) if name == "visual"
        ));
    }

    #[test]
    fn entry_lookup_respects_zone_and_active_state() {
        let mut modes = controller();
        let enter = KeyEvent::plain("Enter");
        assert_eq!(
            modes.entry_for(&enter, Some("segments")).map(|m| m.name.as_str()),
            Some("split")
        );
        assert!(modes.entry_for(&enter, Some("sidebar")).is_none());

        modes.enter("split", Some("segments")).unwrap();
        assert!(modes.entry_for(&enter, Some("segments")).is_none());
    }

    #[test]
    fn invalid_definitions_fail_construction() {
        let err = ModeController::new(vec![split(), split()]).unwrap_err();
        assert_eq!(err, ConfigError::DuplicateMode("split".into()));

        let clash = ModeSpec::new("edit", KeyChord::plain("Enter"), KeyChord::plain("Escape"));
        let err = ModeController::new(vec![split(), clash]).unwrap_err();
        assert!(matches!(err, ConfigError::AmbiguousModeEntry { .. }));

        let disjoint = ModeSpec::new("edit", KeyChord::plain("Enter"), KeyChord::plain("Escape"))
            .restricted_to(["other"]);
        assert!(ModeController::new(vec![split(), disjoint]).is_ok());
    }
}
