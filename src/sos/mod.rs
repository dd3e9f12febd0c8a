//! Crisis-support (SOS) overlay: screen router, body scan, breathing and
//! grounding sequencers over a shared overlay lifecycle.

pub mod body_scan;
pub mod breathing;
pub mod controller;
pub mod grounding;
pub mod regions;
pub mod scheduler;
pub mod screen;
pub mod script;

#[cfg(test)]
mod test_properties;

pub use controller::{OverlayPhase, SosAction, SosController, SosState, TimerTask};
pub use scheduler::{Scheduler, TimerHandle, VirtualClock};
pub use screen::{Screen, route_choice};
