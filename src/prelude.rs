//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use calmkit::prelude::*;
//! ```

// Core
pub use crate::core::config::{Config, TimingConfig};
pub use crate::core::errors::{CalmError, Result};
pub use crate::core::progress_store::QuizProgressStore;

// Logging
pub use crate::logger::activity::{ActivityEvent, ActivityLoggerHandle, spawn_logger};

// Page
pub use crate::page::layout::{site_page, sos_overlay_page};
pub use crate::page::{MemoryPage, Page};

// SOS
pub use crate::sos::script::{ScriptStep, TraceRecord, parse_script, run_script};
pub use crate::sos::{
    OverlayPhase, Scheduler, Screen, SosAction, SosController, SosState, TimerHandle, TimerTask,
    VirtualClock,
};

// Widgets
pub use crate::widgets::{InitReport, Site, Widget, WidgetStatus, init_all};
