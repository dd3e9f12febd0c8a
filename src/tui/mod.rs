//! Terminal front end for the SOS overlay.
//!
//! `screens` holds the copy and menus, `input` maps keys to actions, `render`
//! turns page state into styled lines and `runtime` owns the event loop.

pub mod input;
pub mod render;
pub mod runtime;
pub mod screens;
pub mod terminal_guard;

pub use runtime::{Session, StartMode, TuiOptions, run};
