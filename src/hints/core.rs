use serde::Serialize;

use crate::dispatch::ZoneManager;
use crate::keys::KeyChord;
use crate::mapping::NavRole;
use crate::width::display_width;

const NAVIGATION_GROUP: &str = "Navigation";
const ZONES_GROUP: &str = "Zones";
const MODES_GROUP: &str = "Modes";

/// One line of the hint bar: keys joined by `/` and what they do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hint {
    pub keys: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HintGroup {
    pub name: String,
    pub hints: Vec<Hint>,
}

impl HintGroup {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hints: Vec::new(),
        }
    }

    /// Add a hint, merging keys into an existing hint with the same description.
    fn push(&mut self, keys: String, description: String) {
        match self.hints.iter_mut().find(|hint| hint.description == description) {
            Some(hint) => {
                hint.keys.push('/');
                hint.keys.push_str(&keys);
            }
            None => self.hints.push(Hint { keys, description }),
        }
    }
}

/// Display label for a canonical key name.
pub fn key_label(key: &str) -> &str {
    match key {
        "ArrowUp" => "↑",
        "ArrowDown" => "↓",
        "ArrowLeft" => "←",
        "ArrowRight" => "→",
        " " => "Space",
        other => other,
    }
}

pub fn chord_label(chord: &KeyChord) -> String {
    KeyChord::new(key_label(&chord.key), chord.modifiers).to_string()
}

/// Hints for everything the next key press could do.
///
/// Groups come in a fixed order (navigation, zones, modes) followed by action
/// groups in registration order. Hidden actions and actions not eligible for
/// the focused zone and effective mode are left out.
pub fn hints_for(manager: &ZoneManager) -> Vec<HintGroup> {
    let mut groups = Vec::new();
    let focused_zone = manager.focused_zone_id();

    if let Some(strategy) = manager.effective_strategy() {
        let mapping = manager.key_mapping();
        let keys: Vec<&str> = NavRole::ALL
            .iter()
            .filter(|role| role.intent().is_some_and(|intent| strategy.handles(intent)))
            .flat_map(|role| mapping.keys_for(*role))
            .map(|key| key_label(key))
            .collect();
        if !keys.is_empty() {
            let mut group = HintGroup::new(NAVIGATION_GROUP);
            group.push(keys.join("/"), "Navigate".to_string());
            groups.push(group);
        }
    }

    if manager.registry().len() > 1 {
        let keys: Vec<String> = [manager.prev_zone_key(), manager.next_zone_key()]
            .into_iter()
            .flatten()
            .map(chord_label)
            .collect();
        if !keys.is_empty() {
            let mut group = HintGroup::new(ZONES_GROUP);
            group.push(keys.join("/"), "Switch zone".to_string());
            groups.push(group);
        }
    }

    let mut modes = HintGroup::new(MODES_GROUP);
    match manager.active_mode() {
        Some(mode) => {
            let label = mode.indicator_text.as_deref().unwrap_or(&mode.name);
            modes.push(chord_label(&mode.exit_key), format!("Exit {label}"));
        }
        None => {
            for mode in manager.modes().modes() {
                if mode.allows_zone(focused_zone) {
                    let label = mode.indicator_text.as_deref().unwrap_or(&mode.name);
                    modes.push(chord_label(&mode.enter_key), format!("Enter {label}"));
                }
            }
        }
    }
    if !modes.hints.is_empty() {
        groups.push(modes);
    }

    let mut action_groups: Vec<HintGroup> = Vec::new();
    for action in manager
        .actions()
        .eligible(focused_zone, manager.effective_mode_name())
        .filter(|action| action.show_in_hints)
    {
        let description = if action.description.is_empty() {
            action.trigger.to_string()
        } else {
            action.description.clone()
        };
        let name = action.hint_group();
        let pos = match action_groups.iter().position(|group| group.name == name) {
            Some(pos) => pos,
            None => {
                action_groups.push(HintGroup::new(name));
                action_groups.len() - 1
            }
        };
        action_groups[pos].push(chord_label(&action.chord), description);
    }
    groups.extend(action_groups);
    groups
}

/// Render groups as indented text with descriptions aligned on one column.
pub fn render_hints(groups: &[HintGroup]) -> String {
    let key_width = groups
        .iter()
        .flat_map(|group| &group.hints)
        .map(|hint| display_width(&hint.keys))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for group in groups {
        out.push_str(&group.name);
        out.push('\n');
        for hint in &group.hints {
            let pad = key_width.saturating_sub(display_width(&hint.keys));
            out.push_str("  ");
            out.push_str(&hint.keys);
            out.push_str(&" ".repeat(pad + 2));
            out.push_str(&hint.description);
            out.push('\n');
        }
    }
    out
}

impl ZoneManager {
    pub fn hints(&self) -> Vec<HintGroup> {
        hints_for(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::KeyAction;
    use crate::config::ManagerConfig;
    use crate::modes::ModeSpec;
    use crate::navigation::NavigationStrategy;
    use crate::registry::ZoneSpec;

    fn manager() -> ZoneManager {
        let config = ManagerConfig::new(vec![
            ZoneSpec::new("queue", NavigationStrategy::LinearVertical).with_items(["a", "b"]),
            ZoneSpec::new("segments", NavigationStrategy::LinearVertical).with_items(["s"]),
        ])
        .with_zone_keys(KeyChord::plain("ArrowLeft"), KeyChord::plain("ArrowRight"))
        .with_modes(vec![
            ModeSpec::new("split", KeyChord::plain("Enter"), KeyChord::plain("Escape"))
                .with_navigation(NavigationStrategy::ScrollOnly)
                .restricted_to(["segments"])
                .with_indicator("Split Mode"),
        ])
        .with_actions(vec![
            KeyAction::new(KeyChord::plain(" "), "toggle")
                .in_zones(["queue"])
                .describe("Toggle", "Selection"),
            KeyAction::new("Ctrl+a".parse().unwrap(), "select_all")
                .in_zones(["queue"])
                .describe("Toggle", "Selection"),
            KeyAction::new(KeyChord::plain("Escape"), "clear")
                .in_zones(["queue"])
                .hidden(),
            KeyAction::new("Shift+ArrowUp".parse().unwrap(), "move_up").in_zones(["queue"]),
        ]);
        ZoneManager::new(config).unwrap()
    }

    fn find<'a>(groups: &'a [HintGroup], name: &str) -> Option<&'a HintGroup> {
        groups.iter().find(|group| group.name == name)
    }

    #[test]
    fn lists_navigation_zones_and_visible_actions() {
        let groups = manager().hints();
        let names: Vec<&str> = groups.iter().map(|group| group.name.as_str()).collect();
        assert_eq!(names, vec!["Navigation", "Zones", "Selection", "General"]);

        assert_eq!(find(&groups, "Navigation").unwrap().hints[0].keys, "↑/↓");
        assert_eq!(find(&groups, "Zones").unwrap().hints[0].keys, "←/→");
        assert_eq!(
            find(&groups, "Selection").unwrap().hints,
            vec![Hint {
                keys: "Space/Ctrl+a".into(),
                description: "Toggle".into(),
            }]
        );
        assert_eq!(
            find(&groups, "General").unwrap().hints[0],
            Hint {
                keys: "Shift+↑".into(),
                description: "move_up".into(),
            }
        );
    }

    #[test]
    fn mode_hints_follow_focus_and_activation() {
        let mut manager = manager();
        manager.focus_zone("segments").unwrap();
        let groups = manager.hints();
        assert_eq!(find(&groups, "Modes").unwrap().hints[0].description, "Enter Split Mode");
        assert!(find(&groups, "Selection").is_none());

        manager.enter_mode("split").unwrap();
        let groups = manager.hints();
        assert!(find(&groups, "Navigation").is_none());
        assert_eq!(
            find(&groups, "Modes").unwrap().hints[0],
            Hint {
                keys: "Escape".into(),
                description: "Exit Split Mode".into(),
            }
        );
    }

    #[test]
    fn render_aligns_descriptions() {
        let groups = vec![HintGroup {
            name: "Queue".into(),
            hints: vec![
                Hint {
                    keys: "↑/↓".into(),
                    description: "Navigate".into(),
                },
                Hint {
                    keys: "Space".into(),
                    description: "Toggle".into(),
                },
            ],
        }];
        assert_eq!(
            render_hints(&groups),
            "Queue\n  ↑/↓    Navigate\n  Space  Toggle\n"
        );
    }
}
