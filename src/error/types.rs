use thiserror::Error;

use crate::keys::KeyParseError;
use crate::mapping::NavRole;

/// Unified result type for the dispatch engine.
pub type Result<T> = std::result::Result<T, NavError>;

/// Errors surfaced by explicit engine requests. Key resolution never produces
/// one of these; unmatched events resolve to `Outcome::Unhandled` instead.
#[derive(Debug, Error)]
pub enum NavError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("zone `{0}` not found")]
    UnknownZone(String),
    #[error("mode `{0}` not found")]
    UnknownMode(String),
    #[error("mode `{mode}` is not allowed in zone `{zone}`")]
    ModeZoneRestriction { mode: String, zone: String },
    #[error("cannot enter mode `{requested}` while `{active}` is active")]
    ModeAlreadyActive { active: String, requested: String },
    #[error("no mode is active")]
    NoActiveMode,
    #[error("no zone has focus")]
    NoFocusedZone,
    #[error("session error: {0}")]
    Session(#[from] SessionError),
    #[error("configuration parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<KeyParseError> for NavError {
    fn from(err: KeyParseError) -> Self {
        NavError::Config(ConfigError::InvalidKey(err))
    }
}

/// Configuration problems detected while building a manager. Always fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{kind} id must not be empty")]
    EmptyId { kind: &'static str },
    #[error("zone `{0}` is defined more than once")]
    DuplicateZone(String),
    #[error("mode `{0}` is defined more than once")]
    DuplicateMode(String),
    #[error("{owner} references unknown zone `{zone}`")]
    UnknownZoneReference { owner: String, zone: String },
    #[error("{owner} references unknown mode `{mode}`")]
    UnknownModeReference { owner: String, mode: String },
    #[error("`{key}` is bound to both `{first}` and `{second}` in overlapping zones and modes")]
    AmbiguousBinding {
        key: String,
        first: String,
        second: String,
    },
    #[error("`{key}` enters both mode `{first}` and mode `{second}`")]
    AmbiguousModeEntry {
        key: String,
        first: String,
        second: String,
    },
    #[error("key `{key}` is mapped to both `{first}` and `{second}`")]
    MappingConflict {
        key: String,
        first: NavRole,
        second: NavRole,
    },
    #[error("previous and next zone keys are both `{0}`")]
    ZoneKeyConflict(String),
    #[error("unknown key mapping preset `{0}`")]
    UnknownPreset(String),
    #[error(transparent)]
    InvalidKey(#[from] KeyParseError),
}

/// Failures while accessing the per-session store.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session `{0}` already exists")]
    AlreadyExists(String),
    #[error("session `{0}` not found")]
    Missing(String),
    #[error("session store poisoned")]
    Poisoned,
}
