//! The zone manager: registry, modes, actions and key mapping composed into
//! one per-session state machine.
//!
//! [`ZoneManager::resolve`] turns a [`KeyEvent`] into exactly one [`Outcome`]
//! and applies the focus/mode mutation that outcome describes. Executing
//! actions and re-rendering is left to the host, which feeds the resulting
//! item lists back through [`ZoneManager::sync_items`].

use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde::Serialize;
use serde_json::{Value, json};

use crate::actions::{ActionTable, ActionTrigger};
use crate::config::{ManagerConfig, validate_references};
use crate::error::{ConfigError, Result};
use crate::keys::{KeyChord, KeyEvent};
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::mapping::KeyMapping;
use crate::metrics::{DispatchMetrics, MetricSnapshot};
use crate::modes::{ModeController, ModeSpec, ModeTransition};
use crate::navigation::{Intent, NavStep, NavigationStrategy};
use crate::registry::{ItemFocus, ItemId, Zone, ZoneId, ZoneRegistry, ZoneSwitch};

mod observer;
mod resolve;

pub use observer::{DispatchObserver, NullObserver};

const LOG_TARGET: &str = "room_nav::dispatch";

/// Result of resolving one key event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Item focus inside the focused zone; equal indices mean a handled no-op.
    FocusChanged {
        zone_id: ZoneId,
        old_index: Option<usize>,
        new_index: Option<usize>,
    },
    /// Zone focus; `from == to` at a non-wrapping boundary.
    ZoneChanged {
        from: ZoneId,
        to: ZoneId,
        index: Option<usize>,
    },
    ModeEntered {
        mode: String,
    },
    ModeExited {
        mode: String,
    },
    /// The host should execute `trigger` and re-render.
    ActionInvoked {
        trigger: ActionTrigger,
        zone_id: Option<ZoneId>,
        item_id: Option<ItemId>,
    },
    /// Let the key fall through to native behaviour.
    Unhandled,
}

impl Outcome {
    pub fn is_handled(&self) -> bool {
        !matches!(self, Outcome::Unhandled)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::FocusChanged { .. } => "focus_changed",
            Outcome::ZoneChanged { .. } => "zone_changed",
            Outcome::ModeEntered { .. } => "mode_entered",
            Outcome::ModeExited { .. } => "mode_exited",
            Outcome::ActionInvoked { .. } => "action_invoked",
            Outcome::Unhandled => "unhandled",
        }
    }
}

impl From<ItemFocus> for Outcome {
    fn from(focus: ItemFocus) -> Self {
        Outcome::FocusChanged {
            zone_id: focus.zone_id,
            old_index: focus.old_index,
            new_index: focus.new_index,
        }
    }
}

impl From<ZoneSwitch> for Outcome {
    fn from(switch: ZoneSwitch) -> Self {
        Outcome::ZoneChanged {
            from: switch.from,
            to: switch.to,
            index: switch.index,
        }
    }
}

/// Observability knobs for a manager.
#[derive(Clone)]
pub struct DispatchOptions {
    /// Optional structured logger.
    pub logger: Option<Logger>,
    /// Shared counters, readable by the host while the manager runs.
    pub metrics: Option<Arc<Mutex<DispatchMetrics>>>,
    /// Target used when emitting metrics snapshots.
    pub metrics_target: String,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            logger: None,
            metrics: None,
            metrics_target: "room_nav::dispatch.metrics".to_string(),
        }
    }
}

impl DispatchOptions {
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(DispatchMetrics::new())));
        }
    }

    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<DispatchMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

pub struct ZoneManager {
    registry: ZoneRegistry,
    modes: ModeController,
    actions: ActionTable,
    mapping: KeyMapping,
    prev_zone_key: Option<KeyChord>,
    next_zone_key: Option<KeyChord>,
    default_mode_name: String,
    options: DispatchOptions,
    created_at: Instant,
}

impl ZoneManager {
    /// Validate `config` and build a manager with focus on the first zone.
    pub fn new(config: ManagerConfig) -> Result<Self> {
        Self::with_options(config, DispatchOptions::default())
    }

    pub fn with_options(config: ManagerConfig, options: DispatchOptions) -> Result<Self> {
        let mut manager = Self::from_config(config)?;
        manager.options = options;
        manager.log(
            LogLevel::Info,
            "manager_created",
            [
                json_kv("zones", manager.registry.len()),
                json_kv("modes", manager.modes.modes().len()),
                json_kv("actions", manager.actions.actions().len()),
            ],
        );
        Ok(manager)
    }

    pub(crate) fn from_config(config: ManagerConfig) -> std::result::Result<Self, ConfigError> {
        validate_references(&config)?;
        let mapping = config.resolve_mapping()?;
        let ManagerConfig {
            zones,
            actions,
            modes,
            prev_zone_key,
            next_zone_key,
            wrap_zones,
            default_mode_name,
            ..
        } = config;

        Ok(Self {
            registry: ZoneRegistry::new(zones, wrap_zones)?,
            modes: ModeController::new(modes)?,
            actions: ActionTable::new(actions)?,
            mapping,
            prev_zone_key,
            next_zone_key,
            default_mode_name,
            options: DispatchOptions::default(),
            created_at: Instant::now(),
        })
    }

    pub fn options(&self) -> &DispatchOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut DispatchOptions {
        &mut self.options
    }

    pub fn registry(&self) -> &ZoneRegistry {
        &self.registry
    }

    pub fn modes(&self) -> &ModeController {
        &self.modes
    }

    pub fn actions(&self) -> &ActionTable {
        &self.actions
    }

    pub fn key_mapping(&self) -> &KeyMapping {
        &self.mapping
    }

    pub fn prev_zone_key(&self) -> Option<&KeyChord> {
        self.prev_zone_key.as_ref()
    }

    pub fn next_zone_key(&self) -> Option<&KeyChord> {
        self.next_zone_key.as_ref()
    }

    pub fn zone(&self, zone_id: &str) -> Option<&Zone> {
        self.registry.zone(zone_id)
    }

    pub fn focused_zone(&self) -> Option<&Zone> {
        self.registry.focused_zone()
    }

    pub fn focused_zone_id(&self) -> Option<&str> {
        self.registry.focused_zone_id()
    }

    pub fn focused_item_id(&self) -> Option<&str> {
        self.registry.focused_item_id()
    }

    pub fn active_mode(&self) -> Option<&ModeSpec> {
        self.modes.active()
    }

    /// Indicator text of the active mode, for status displays.
    pub fn mode_indicator(&self) -> Option<&str> {
        self.modes
            .active()
            .and_then(|mode| mode.indicator_text.as_deref())
    }

    /// Active mode name, or the default mode name when none is active.
    pub fn effective_mode_name(&self) -> &str {
        self.modes.active_name().unwrap_or(&self.default_mode_name)
    }

    /// Strategy used for the focused zone: the active mode's override when the
    /// mode applies to that zone, otherwise the zone's own strategy.
    pub fn effective_strategy(&self) -> Option<NavigationStrategy> {
        let zone = self.registry.focused_zone()?;
        let override_strategy = self
            .modes
            .active()
            .filter(|mode| mode.allows_zone(Some(zone.id())))
            .and_then(|mode| mode.navigation_override);
        Some(override_strategy.unwrap_or(zone.strategy()))
    }

    pub fn focus_zone(&mut self, zone_id: &str) -> Result<ZoneSwitch> {
        let switch = self.registry.focus_zone(zone_id)?;
        self.log_zone_switch(&switch);
        Ok(switch)
    }

    pub fn next_zone(&mut self) -> Option<ZoneSwitch> {
        let switch = self.registry.next_zone()?;
        self.log_zone_switch(&switch);
        Some(switch)
    }

    pub fn prev_zone(&mut self) -> Option<ZoneSwitch> {
        let switch = self.registry.prev_zone()?;
        self.log_zone_switch(&switch);
        Some(switch)
    }

    /// Focus an item of the focused zone; out-of-range indices are clamped.
    pub fn focus_item(&mut self, index: usize) -> Result<ItemFocus> {
        self.registry.focus_item(index)
    }

    /// Apply a movement intent to the focused zone using the effective
    /// strategy. `None` when no zone is focused or the strategy ignores it.
    pub fn move_focus(&mut self, intent: Intent) -> Option<ItemFocus> {
        let strategy = self.effective_strategy()?;
        let (step, zone_id) = {
            let zone = self.registry.focused_zone()?;
            (
                strategy.step(zone.focused_index(), zone.len(), intent),
                zone.id().to_owned(),
            )
        };
        match step {
            NavStep::Ignored => None,
            NavStep::Held(index) => Some(ItemFocus {
                zone_id,
                old_index: index,
                new_index: index,
            }),
            NavStep::Moved(index) => self.registry.focus_item(index).ok(),
        }
    }

    pub fn enter_mode(&mut self, name: &str) -> Result<ModeTransition> {
        let focused = self.registry.focused_zone_id().map(str::to_owned);
        let transition = self.modes.enter(name, focused.as_deref())?;
        if let ModeTransition::Entered(mode) = &transition {
            self.log(
                LogLevel::Info,
                "mode_entered",
                [json_kv("mode", mode.as_str()), json_kv("zone", focused)],
            );
        }
        Ok(transition)
    }

    pub fn exit_mode(&mut self) -> Result<ModeTransition> {
        let transition = self.modes.exit()?;
        if let ModeTransition::Exited(mode) = &transition {
            self.log(LogLevel::Info, "mode_exited", [json_kv("mode", mode.as_str())]);
        }
        Ok(transition)
    }

    /// Re-sync a zone's items after the host applied a mutation and
    /// re-rendered. Returns `false` when the sequence is unchanged.
    pub fn sync_items<I, S>(&mut self, zone_id: &str, items: I) -> Result<bool>
    where
        I: IntoIterator<Item = S>,
        S: Into<ItemId>,
    {
        let items: Vec<ItemId> = items.into_iter().map(Into::into).collect();
        let count = items.len();
        let changed = self.registry.sync_items(zone_id, items)?;
        if changed {
            self.log(
                LogLevel::Debug,
                "items_synced",
                [json_kv("zone", zone_id), json_kv("items", count)],
            );
        }
        Ok(changed)
    }

    /// Ids of zones whose items or focus changed since the last drain.
    pub fn take_dirty(&mut self) -> Vec<ZoneId> {
        self.registry.take_dirty()
    }

    /// Resolve `event` and notify `observer` of the resulting transition.
    pub fn dispatch(&mut self, event: &KeyEvent, observer: &mut dyn DispatchObserver) -> Outcome {
        let outcome = self.resolve(event);
        self.notify(&outcome, observer);
        outcome
    }

    pub fn metrics_snapshot(&self) -> Option<MetricSnapshot> {
        let metrics = self.options.metrics.as_ref()?;
        let guard = metrics.lock().ok()?;
        Some(guard.snapshot(self.created_at.elapsed()))
    }

    /// Log the current metrics snapshot if both a logger and metrics exist.
    pub fn emit_metrics(&self) {
        if let (Some(logger), Some(snapshot)) = (self.options.logger.as_ref(), self.metrics_snapshot())
        {
            let _ = logger.log_event(snapshot.to_log_event(&self.options.metrics_target));
        }
    }

    fn record_metric(&self, outcome: &Outcome) {
        if let Some(metrics) = self.options.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                guard.record(outcome);
            }
        }
    }

    fn log_zone_switch(&self, switch: &ZoneSwitch) {
        if switch.moved() {
            self.log(
                LogLevel::Debug,
                "zone_changed",
                [
                    json_kv("from", switch.from.as_str()),
                    json_kv("to", switch.to.as_str()),
                ],
            );
        }
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        if let Some(logger) = self.options.logger.as_ref() {
            if logger.enabled(level) {
                let _ = logger.log_event(event_with_fields(level, LOG_TARGET, message, fields));
            }
        }
    }

    fn log_resolution(&self, event: &KeyEvent, outcome: &Outcome) {
        let chord = KeyChord::new(event.key.clone(), event.modifiers);
        self.log(
            LogLevel::Debug,
            "key_resolved",
            [
                json_kv("key", chord.to_string()),
                json_kv("outcome", outcome.kind()),
                json_kv("zone", json!(self.focused_zone_id())),
                json_kv("mode", self.effective_mode_name()),
            ],
        );
    }
}
