use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::keys::{KeyChord, KeyEvent};
use crate::registry::ZoneId;

pub const DEFAULT_HINT_GROUP: &str = "General";

/// Identifier the host uses to execute an action (a button id, a route, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionTrigger(String);

impl ActionTrigger {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActionTrigger {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Binding from a key chord to an externally executed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyAction {
    #[serde(rename = "key")]
    pub chord: KeyChord,
    pub trigger: ActionTrigger,
    /// Zones where the binding is live. Empty means every zone.
    #[serde(default)]
    pub zone_ids: Vec<ZoneId>,
    /// Modes where the binding is live. Empty means every mode.
    #[serde(default)]
    pub mode_names: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub hint_group: Option<String>,
    #[serde(default = "default_show_in_hints")]
    pub show_in_hints: bool,
}

fn default_show_in_hints() -> bool {
    true
}

impl KeyAction {
    pub fn new(chord: KeyChord, trigger: impl Into<ActionTrigger>) -> Self {
        Self {
            chord,
            trigger: trigger.into(),
            zone_ids: Vec::new(),
            mode_names: Vec::new(),
            description: String::new(),
            hint_group: None,
            show_in_hints: true,
        }
    }

    pub fn in_zones<I, S>(mut self, zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ZoneId>,
    {
        self.zone_ids = zones.into_iter().map(Into::into).collect();
        self
    }

    pub fn in_modes<I, S>(mut self, modes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mode_names = modes.into_iter().map(Into::into).collect();
        self
    }

    pub fn describe(mut self, description: impl Into<String>, group: impl Into<String>) -> Self {
        self.description = description.into();
        self.hint_group = Some(group.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.show_in_hints = false;
        self
    }

    pub fn hint_group(&self) -> &str {
        self.hint_group.as_deref().unwrap_or(DEFAULT_HINT_GROUP)
    }

    /// Live for the focused zone and the effective mode name.
    pub fn is_eligible(&self, zone_id: Option<&str>, mode_name: &str) -> bool {
        let zone_ok = self.zone_ids.is_empty()
            || zone_id.is_some_and(|zone| self.zone_ids.iter().any(|id| id == zone));
        let mode_ok =
            self.mode_names.is_empty() || self.mode_names.iter().any(|mode| mode == mode_name);
        zone_ok && mode_ok
    }

    /// Whether both bindings could ever be eligible for the same key press.
    fn conflicts_with(&self, other: &KeyAction) -> bool {
        self.chord == other.chord
            && overlaps(&self.zone_ids, &other.zone_ids)
            && overlaps(&self.mode_names, &other.mode_names)
    }
}

fn overlaps(a: &[String], b: &[String]) -> bool {
    a.is_empty() || b.is_empty() || a.iter().any(|item| b.contains(item))
}

/// Registered actions in registration order.
#[derive(Debug, Clone, Default)]
pub struct ActionTable {
    actions: Vec<KeyAction>,
}

impl ActionTable {
    pub fn new(actions: Vec<KeyAction>) -> Result<Self, ConfigError> {
        for (idx, action) in actions.iter().enumerate() {
            if action.trigger.as_str().is_empty() {
                return Err(ConfigError::EmptyId { kind: "action trigger" });
            }
            if let Some(earlier) = actions[..idx].iter().find(|a| a.conflicts_with(action)) {
                return Err(ConfigError::AmbiguousBinding {
                    key: action.chord.to_string(),
                    first: earlier.trigger.to_string(),
                    second: action.trigger.to_string(),
                });
            }
        }
        Ok(Self { actions })
    }

    pub fn actions(&self) -> &[KeyAction] {
        &self.actions
    }

    pub fn eligible<'a>(
        &'a self,
        zone_id: Option<&'a str>,
        mode_name: &'a str,
    ) -> impl Iterator<Item = &'a KeyAction> + 'a {
        self.actions
            .iter()
            .filter(move |action| action.is_eligible(zone_id, mode_name))
    }

    /// First eligible action bound to exactly this chord.
    pub fn find(&self, event: &KeyEvent, zone_id: Option<&str>, mode_name: &str) -> Option<&KeyAction> {
        self.actions
            .iter()
            .find(|action| action.chord.matches(event) && action.is_eligible(zone_id, mode_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::Modifiers;

    fn table() -> ActionTable {
        ActionTable::new(vec![
            KeyAction::new(KeyChord::plain(" "), "add").in_zones(["source"]),
            KeyAction::new(KeyChord::plain("Delete"), "remove").in_zones(["queue"]),
            KeyAction::new(KeyChord::new("a", Modifiers::CTRL), "select-all"),
            KeyAction::new(KeyChord::plain("Backspace"), "merge").in_modes(["navigation"]),
            KeyAction::new(KeyChord::plain("Enter"), "split").in_modes(["split"]),
        ])
        .unwrap()
    }

    #[test]
    fn zone_restriction_filters_actions() {
        let table = table();
        let space = KeyEvent::plain(" ");
        assert_eq!(
            table.find(&space, Some("source"), "navigation").map(|a| a.trigger.as_str()),
            Some("add")
        );
        assert!(table.find(&space, Some("queue"), "navigation").is_none());
        assert!(table.find(&space, None, "navigation").is_none());
    }

    #[test]
    fn mode_restriction_filters_actions() {
        let table = table();
        let enter = KeyEvent::plain("Enter");
        let backspace = KeyEvent::plain("Backspace");
        assert!(table.find(&enter, Some("x"), "navigation").is_none());
        assert!(table.find(&enter, Some("x"), "split").is_some());
        assert!(table.find(&backspace, Some("x"), "navigation").is_some());
        assert!(table.find(&backspace, Some("x"), "split").is_none());
    }

    #[test]
    fn modifiers_must_match_exactly() {
        let table = table();
        assert!(table.find(&KeyEvent::plain("a"), None, "navigation").is_none());
        assert!(
            table
                .find(&KeyEvent::new("a", Modifiers::CTRL), None, "navigation")
                .is_some()
        );
    }

    #[test]
    fn overlapping_bindings_are_rejected() {
        let err = ActionTable::new(vec![
            KeyAction::new(KeyChord::plain("x"), "first").in_zones(["a", "b"]),
            KeyAction::new(KeyChord::plain("x"), "second").in_zones(["b"]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::AmbiguousBinding {
                key: "x".into(),
                first: "first".into(),
                second: "second".into(),
            }
        );

        let disjoint = ActionTable::new(vec![
            KeyAction::new(KeyChord::plain("x"), "first").in_zones(["a"]),
            KeyAction::new(KeyChord::plain("x"), "second").in_zones(["b"]),
            KeyAction::new(KeyChord::plain("x"), "third").in_zones(["c"]).in_modes(["m"]),
        ]);
        assert!(disjoint.is_ok());
    }

    #[test]
    fn actions_deserialize_with_defaults() {
        let action: KeyAction =
            serde_json::from_str(r#"{"key":"Shift+ArrowUp","trigger":"move-up"}"#).unwrap();
        assert_eq!(action.chord, KeyChord::new("ArrowUp", Modifiers::SHIFT));
        assert!(action.show_in_hints);
        assert_eq!(action.hint_group(), DEFAULT_HINT_GROUP);
    }
}
