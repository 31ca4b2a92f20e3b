use crate::keys::KeyEvent;
use crate::mapping::NavRole;
use crate::modes::ModeTransition;

use super::{DispatchObserver, Outcome, ZoneManager};

impl ZoneManager {
    /// Resolve one key event.
    ///
    /// Precedence: the active mode's exit key, then a mode entry key (only
    /// while no mode is active), then registered actions, then the zone
    /// switching keys, then unmodified navigation keys. Anything else is
    /// [`Outcome::Unhandled`] and leaves state untouched.
    pub fn resolve(&mut self, event: &KeyEvent) -> Outcome {
        let outcome = self
            .resolve_mode(event)
            .or_else(|| self.resolve_action(event))
            .or_else(|| self.resolve_zone_key(event))
            .or_else(|| self.resolve_navigation(event))
            .unwrap_or(Outcome::Unhandled);

        self.record_metric(&outcome);
        self.log_resolution(event, &outcome);
        outcome
    }

    fn resolve_mode(&mut self, event: &KeyEvent) -> Option<Outcome> {
        if let Some(active) = self.modes.active() {
            if !active.exit_key.matches(event) {
                return None;
            }
            return match self.exit_mode() {
                Ok(ModeTransition::Exited(mode)) => Some(Outcome::ModeExited { mode }),
                _ => None,
            };
        }

        let name = self
            .modes
            .entry_for(event, self.registry.focused_zone_id())?
            .name
            .clone();
        match self.enter_mode(&name) {
            Ok(ModeTransition::Entered(mode)) => Some(Outcome::ModeEntered { mode }),
            _ => None,
        }
    }

    fn resolve_action(&self, event: &KeyEvent) -> Option<Outcome> {
        let zone_id = self.registry.focused_zone_id();
        let action = self
            .actions
            .find(event, zone_id, self.effective_mode_name())?;
        Some(Outcome::ActionInvoked {
            trigger: action.trigger.clone(),
            zone_id: zone_id.map(str::to_owned),
            item_id: self.registry.focused_item_id().map(str::to_owned),
        })
    }

    fn resolve_zone_key(&mut self, event: &KeyEvent) -> Option<Outcome> {
        let is_next = self
            .next_zone_key
            .as_ref()
            .is_some_and(|key| key.matches(event));
        let is_prev = self
            .prev_zone_key
            .as_ref()
            .is_some_and(|key| key.matches(event));

        let switch = if is_next {
            self.next_zone()?
        } else if is_prev {
            self.prev_zone()?
        } else {
            return None;
        };
        Some(switch.into())
    }

    /// Navigation keys only apply without modifiers so chords such as
    /// `Shift+ArrowUp` stay free for actions or the host.
    fn resolve_navigation(&mut self, event: &KeyEvent) -> Option<Outcome> {
        if !event.modifiers.is_empty() {
            return None;
        }
        let intent = self.mapping.role_of(&event.key).and_then(NavRole::intent)?;
        self.move_focus(intent).map(Outcome::from)
    }

    pub(super) fn notify(&self, outcome: &Outcome, observer: &mut dyn DispatchObserver) {
        match outcome {
            Outcome::FocusChanged {
                zone_id,
                old_index,
                new_index,
            } => {
                if old_index != new_index {
                    observer.on_focus_change(zone_id, *old_index, *new_index);
                }
            }
            Outcome::ZoneChanged { from, to, .. } => {
                if from != to {
                    observer.on_zone_change(from, to);
                }
            }
            Outcome::ModeEntered { mode } => {
                if let Some(spec) = self.modes.get(mode) {
                    observer.on_mode_enter(spec, self.focused_zone_id());
                }
                observer.on_mode_change(Some(mode));
            }
            Outcome::ModeExited { mode } => {
                if let Some(spec) = self.modes.get(mode) {
                    observer.on_mode_exit(spec, self.focused_zone_id());
                }
                observer.on_mode_change(None);
            }
            Outcome::ActionInvoked {
                trigger,
                zone_id,
                item_id,
            } => observer.on_action(trigger, zone_id.as_deref(), item_id.as_deref()),
            Outcome::Unhandled => {}
        }
    }
}
