//! Keyboard dispatch engine for zone-based text interfaces.
//!
//! A [`ZoneManager`] owns an ordered set of focusable zones, an optional
//! active mode, a table of key actions and a logical key mapping. Every key
//! press resolves to exactly one [`Outcome`]; the host executes actions,
//! re-renders, and syncs item lists back into the manager.
//!
//! Modules follow the module-orchestrator layout: each directory exposes a
//! thin `mod.rs` re-exporting the types implemented in a private `core.rs`.

pub mod actions;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod hints;
pub mod keys;
pub mod logging;
pub mod mapping;
pub mod metrics;
pub mod modes;
pub mod navigation;
pub mod registry;
pub mod session;
pub mod width;

pub use actions::{ActionTable, ActionTrigger, KeyAction};
pub use config::{DEFAULT_MODE_NAME, ManagerConfig};
pub use dispatch::{DispatchObserver, DispatchOptions, NullObserver, Outcome, ZoneManager};
pub use error::{ConfigError, NavError, Result, SessionError};
pub use hints::{Hint, HintGroup, render_hints};
pub use keys::{KeyChord, KeyEvent, KeyParseError, Modifiers};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink, NullSink,
};
pub use mapping::{KeyMapping, MappingSpec, NavRole};
pub use metrics::{DispatchMetrics, MetricSnapshot};
pub use modes::{ModeController, ModeSpec, ModeTransition};
pub use navigation::{Intent, NavStep, NavigationStrategy};
pub use registry::{ItemFocus, ItemId, Zone, ZoneId, ZoneRegistry, ZoneSpec, ZoneSwitch};
pub use session::{Session, SessionFactory, SessionId, SessionStore};
pub use width::display_width;
