#![forbid(unsafe_code)]

//! calmkit: interactive wellness layer for a therapy-practice site.
//!
//! Two halves:
//! 1. **SOS overlay**: a crisis-support state machine with a screen router,
//!    a body-scan sequencer, a 4-7-8 breathing sequencer and a 5-4-3-2-1
//!    grounding walk, all driven through one [`sos::SosController`].
//! 2. **Site widgets**: resumable quiz, ROI calculator, self-help tools,
//!    calm jar, emotion wheel, FAQ accordion and read-more modals.
//!
//! Both operate on a [`page::Page`]; timers go through an injected
//! [`sos::Scheduler`] so sessions can be replayed on a virtual clock.
//!
//! # Library usage
//!
//! ```rust,no_run
//! use calmkit::prelude::*;
//!
//! let mut ctl = SosController::new(
//!     sos_overlay_page(),
//!     VirtualClock::new(),
//!     TimingConfig::default(),
//! );
//! ctl.dispatch(SosAction::Open);
//! ctl.dispatch(SosAction::Choice("panic".to_string()));
//! assert_eq!(ctl.state().screen, Screen::CalmIntro);
//! ```

pub mod prelude;

pub mod core;
pub mod logger;
pub mod page;
pub mod sos;
#[cfg(feature = "tui")]
pub mod tui;
pub mod widgets;
