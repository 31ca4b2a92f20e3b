use crate::actions::ActionTrigger;
use crate::modes::ModeSpec;

/// Hooks invoked by [`ZoneManager::dispatch`](super::ZoneManager::dispatch)
/// after a transition has been applied.
///
/// Every method defaults to a no-op; hosts implement what they care about.
/// Handled no-ops (focus clamped at a boundary, zone switch at the last zone)
/// do not fire hooks.
pub trait DispatchObserver {
    fn on_focus_change(&mut self, _zone_id: &str, _old: Option<usize>, _new: Option<usize>) {}

    fn on_zone_change(&mut self, _from: &str, _to: &str) {}

    fn on_mode_enter(&mut self, _mode: &ModeSpec, _zone_id: Option<&str>) {}

    fn on_mode_exit(&mut self, _mode: &ModeSpec, _zone_id: Option<&str>) {}

    /// Fired after enter/exit hooks with the newly active mode, if any.
    fn on_mode_change(&mut self, _active: Option<&str>) {}

    fn on_action(&mut self, _trigger: &ActionTrigger, _zone_id: Option<&str>, _item_id: Option<&str>) {}
}

/// Observer ignoring every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl DispatchObserver for NullObserver {}
