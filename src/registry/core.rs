use std::collections::HashMap;

use blake3::Hash;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, NavError, Result};
use crate::navigation::NavigationStrategy;

pub type ZoneId = String;
pub type ItemId = String;

/// Static description of a zone, supplied at manager construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneSpec {
    pub id: ZoneId,
    #[serde(default)]
    pub navigation: NavigationStrategy,
    #[serde(default)]
    pub items: Vec<ItemId>,
}

impl ZoneSpec {
    pub fn new(id: impl Into<ZoneId>, navigation: NavigationStrategy) -> Self {
        Self {
            id: id.into(),
            navigation,
            items: Vec::new(),
        }
    }

    pub fn with_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ItemId>,
    {
        self.items = items.into_iter().map(Into::into).collect();
        self
    }
}

/// Live state of one zone.
#[derive(Debug, Clone)]
pub struct Zone {
    id: ZoneId,
    strategy: NavigationStrategy,
    items: Vec<ItemId>,
    focused: Option<usize>,
    hash: Option<Hash>,
    is_dirty: bool,
}

impl Zone {
    fn new(spec: ZoneSpec) -> Self {
        let mut zone = Self {
            id: spec.id,
            strategy: spec.navigation,
            items: Vec::new(),
            focused: None,
            hash: None,
            is_dirty: true,
        };
        zone.sync_items(spec.items);
        zone
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn strategy(&self) -> NavigationStrategy {
        self.strategy
    }

    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.focused
    }

    pub fn focused_item(&self) -> Option<&str> {
        self.focused
            .and_then(|index| self.items.get(index))
            .map(String::as_str)
    }

    /// Replace the item sequence. Returns `false` when nothing changed.
    ///
    /// Focus follows the previously focused item if it survived, otherwise the
    /// old index is clamped into the new range.
    fn sync_items(&mut self, items: Vec<ItemId>) -> bool {
        let new_hash = hash_items(&items);
        if self.hash == Some(new_hash) {
            return false;
        }

        let previous_item = self.focused_item().map(str::to_owned);
        let previous_index = self.focused;
        self.items = items;
        self.hash = Some(new_hash);
        self.is_dirty = true;

        self.focused = if self.items.is_empty() {
            None
        } else {
            let followed = previous_item
                .and_then(|id| self.items.iter().position(|candidate| *candidate == id));
            Some(followed.unwrap_or_else(|| previous_index.unwrap_or(0).min(self.items.len() - 1)))
        };
        true
    }

    fn set_focus(&mut self, index: usize) -> ItemFocus {
        let old_index = self.focused;
        let new_index = if self.items.is_empty() {
            None
        } else {
            Some(index.min(self.items.len() - 1))
        };
        if new_index != old_index {
            self.focused = new_index;
            self.is_dirty = true;
        }
        ItemFocus {
            zone_id: self.id.clone(),
            old_index,
            new_index,
        }
    }
}

fn hash_items(items: &[ItemId]) -> Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&(items.len() as u64).to_le_bytes());
    for item in items {
        hasher.update(&(item.len() as u64).to_le_bytes());
        hasher.update(item.as_bytes());
    }
    hasher.finalize()
}

/// Item focus movement inside one zone. `old_index == new_index` means the
/// request was handled without moving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFocus {
    pub zone_id: ZoneId,
    pub old_index: Option<usize>,
    pub new_index: Option<usize>,
}

impl ItemFocus {
    pub fn moved(&self) -> bool {
        self.old_index != self.new_index
    }
}

/// Zone focus movement. `from == to` at a non-wrapping boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneSwitch {
    pub from: ZoneId,
    pub to: ZoneId,
    /// Focused item index inside the destination zone.
    pub index: Option<usize>,
}

impl ZoneSwitch {
    pub fn moved(&self) -> bool {
        self.from != self.to
    }
}

/// Ordered set of zones plus the currently focused one.
#[derive(Debug, Clone)]
pub struct ZoneRegistry {
    zones: Vec<Zone>,
    positions: HashMap<ZoneId, usize>,
    focused: Option<usize>,
    wrap: bool,
}

impl ZoneRegistry {
    /// Build the registry. The first zone receives focus.
    pub fn new(specs: Vec<ZoneSpec>, wrap: bool) -> std::result::Result<Self, ConfigError> {
        let mut zones = Vec::with_capacity(specs.len());
        let mut positions = HashMap::with_capacity(specs.len());
        for spec in specs {
            if spec.id.is_empty() {
                return Err(ConfigError::EmptyId { kind: "zone" });
            }
            if positions.insert(spec.id.clone(), zones.len()).is_some() {
                return Err(ConfigError::DuplicateZone(spec.id));
            }
            zones.push(Zone::new(spec));
        }
        let focused = (!zones.is_empty()).then_some(0);
        Ok(Self {
            zones,
            positions,
            focused,
            wrap,
        })
    }

    pub fn zones(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter()
    }

    pub fn zone(&self, zone_id: &str) -> Option<&Zone> {
        self.positions.get(zone_id).map(|&pos| &self.zones[pos])
    }

    pub fn contains(&self, zone_id: &str) -> bool {
        self.positions.contains_key(zone_id)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn focused_zone(&self) -> Option<&Zone> {
        self.focused.map(|pos| &self.zones[pos])
    }

    pub fn focused_zone_id(&self) -> Option<&str> {
        self.focused_zone().map(Zone::id)
    }

    pub fn focused_item_id(&self) -> Option<&str> {
        self.focused_zone().and_then(Zone::focused_item)
    }

    pub fn focus_zone(&mut self, zone_id: &str) -> Result<ZoneSwitch> {
        let target = *self
            .positions
            .get(zone_id)
            .ok_or_else(|| NavError::UnknownZone(zone_id.to_string()))?;
        Ok(self.switch_to(target))
    }

    /// Move focus to the next zone in order. `None` only when there are no zones.
    pub fn next_zone(&mut self) -> Option<ZoneSwitch> {
        let current = self.focused?;
        let target = if current + 1 < self.zones.len() {
            current + 1
        } else if self.wrap {
            0
        } else {
            current
        };
        Some(self.switch_to(target))
    }

    pub fn prev_zone(&mut self) -> Option<ZoneSwitch> {
        let current = self.focused?;
        let target = match current.checked_sub(1) {
            Some(prev) => prev,
            None if self.wrap => self.zones.len() - 1,
            None => current,
        };
        Some(self.switch_to(target))
    }

    /// Focus an item of the focused zone, clamping `index` into range.
    pub fn focus_item(&mut self, index: usize) -> Result<ItemFocus> {
        let pos = self.focused.ok_or(NavError::NoFocusedZone)?;
        Ok(self.zones[pos].set_focus(index))
    }

    /// Replace a zone's items after the host re-rendered it.
    pub fn sync_items(&mut self, zone_id: &str, items: Vec<ItemId>) -> Result<bool> {
        let pos = *self
            .positions
            .get(zone_id)
            .ok_or_else(|| NavError::UnknownZone(zone_id.to_string()))?;
        Ok(self.zones[pos].sync_items(items))
    }

    /// Drain the ids of zones whose items or focus changed since the last call.
    pub fn take_dirty(&mut self) -> Vec<ZoneId> {
        self.zones
            .iter_mut()
            .filter(|zone| zone.is_dirty)
            .map(|zone| {
                zone.is_dirty = false;
                zone.id.clone()
            })
            .collect()
    }

    pub fn has_dirty(&self) -> bool {
        self.zones.iter().any(|zone| zone.is_dirty)
    }

    fn switch_to(&mut self, target: usize) -> ZoneSwitch {
        let from = self
            .focused
            .map(|pos| self.zones[pos].id.clone())
            .unwrap_or_default();
        if self.focused != Some(target) {
            if let Some(previous) = self.focused {
                self.zones[previous].is_dirty = true;
            }
            self.zones[target].is_dirty = true;
            self.focused = Some(target);
        }
        let zone = &self.zones[target];
        ZoneSwitch {
            from,
            to: zone.id.clone(),
            index: zone.focused,
        }
    }
}
