use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

/// Movement requested by a key press or a programmatic call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Up,
    Down,
    Left,
    Right,
    /// Next item in sequence order, regardless of topology.
    Next,
    /// Previous item in sequence order, regardless of topology.
    Prev,
}

/// Result of applying an [`Intent`] to a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavStep {
    /// Focus moves to the contained index.
    Moved(usize),
    /// The intent is handled but focus stays put (boundary or empty zone).
    Held(Option<usize>),
    /// The strategy does not react to this intent; the key falls through.
    Ignored,
}

/// How focus travels between the items of a zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NavigationStrategy {
    #[default]
    LinearVertical,
    LinearHorizontal,
    Grid {
        columns: NonZeroUsize,
    },
    /// Navigation disabled; the host scrolls natively.
    ScrollOnly,
}

impl NavigationStrategy {
    /// Create a grid strategy.
    ///
    /// # Panics
    /// Panics if `columns` is zero
    pub fn grid(columns: usize) -> Self {
        Self::Grid {
            columns: NonZeroUsize::new(columns).expect("grid columns must be non-zero"),
        }
    }

    pub fn is_scroll_only(&self) -> bool {
        matches!(self, Self::ScrollOnly)
    }

    /// Whether this topology reacts to `intent` at all.
    pub fn handles(&self, intent: Intent) -> bool {
        match self {
            Self::LinearVertical => !matches!(intent, Intent::Left | Intent::Right),
            Self::LinearHorizontal => !matches!(intent, Intent::Up | Intent::Down),
            Self::Grid { .. } => true,
            Self::ScrollOnly => false,
        }
    }

    /// Compute the next focused index for a zone of `count` items.
    ///
    /// Targets outside `[0, count)` hold the current index instead of failing,
    /// so repeated presses against a boundary are idempotent.
    pub fn step(&self, current: Option<usize>, count: usize, intent: Intent) -> NavStep {
        if !self.handles(intent) {
            return NavStep::Ignored;
        }
        if count == 0 {
            return NavStep::Held(None);
        }

        let current = current.unwrap_or(0).min(count - 1);
        let target = match (self, intent) {
            (_, Intent::Next) => forward(current, 1, count),
            (_, Intent::Prev) => current.checked_sub(1),
            (Self::LinearVertical, Intent::Up) | (Self::LinearHorizontal, Intent::Left) => {
                current.checked_sub(1)
            }
            (Self::LinearVertical, Intent::Down) | (Self::LinearHorizontal, Intent::Right) => {
                forward(current, 1, count)
            }
            (Self::Grid { columns }, intent) => grid_target(current, count, columns.get(), intent),
            _ => None,
        };

        match target {
            Some(index) if index != current => NavStep::Moved(index),
            _ => NavStep::Held(Some(current)),
        }
    }
}

fn forward(current: usize, by: usize, count: usize) -> Option<usize> {
    current.checked_add(by).filter(|index| *index < count)
}

fn grid_target(current: usize, count: usize, columns: usize, intent: Intent) -> Option<usize> {
    match intent {
        Intent::Up => current.checked_sub(columns),
        Intent::Down => forward(current, columns, count),
        // blocked at row start
        Intent::Left if current % columns == 0 => None,
        Intent::Left => Some(current - 1),
        // blocked at row end and past the last item
        Intent::Right if (current + 1) % columns == 0 => None,
        Intent::Right => forward(current, 1, count),
        Intent::Next | Intent::Prev => None,
    }
}
