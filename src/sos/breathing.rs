//! 4-7-8 crisis breathing: inhale, hold, exhale, three cycles.

use crate::logger::activity::ActivityEvent;
use crate::page::Page;

use super::controller::{SosController, TimerTask};
use super::regions;
use super::scheduler::{Scheduler, TimerHandle};
use super::screen::Screen;

/// Cycles in one guided session.
pub const TOTAL_CYCLES: usize = 3;

pub const DONE_TIMER_TEXT: &str = "¡Excelente trabajo!";
pub const DONE_TEXT: &str = "LISTO";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BreathPhase {
    #[default]
    Idle,
    Inhale,
    Hold,
    Exhale,
}

impl BreathPhase {
    /// Prompt shown inside the circle.
    #[must_use]
    pub const fn prompt(self) -> &'static str {
        match self {
            Self::Idle => "",
            Self::Inhale => "INHALA",
            Self::Hold => "RETÉN",
            Self::Exhale => "EXHALA",
        }
    }

    /// Modifier class on the breathing circle.
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Idle => "",
            Self::Inhale => "inhale",
            Self::Hold => "hold",
            Self::Exhale => "exhale",
        }
    }
}

#[must_use]
pub fn cycle_label(cycle: usize) -> String {
    format!("Respiración {} de {TOTAL_CYCLES}", cycle + 1)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreathingState {
    pub breathing: bool,
    /// Completed cycles, `0..=TOTAL_CYCLES`.
    pub cycles: usize,
    pub phase: BreathPhase,
    pub pending: Option<TimerHandle>,
}

impl BreathingState {
    #[must_use]
    pub const fn finished(&self) -> bool {
        self.cycles >= TOTAL_CYCLES
    }
}

impl<P, S> SosController<P, S>
where
    P: Page,
    S: Scheduler<TimerTask>,
{
    pub fn start_breathing(&mut self) {
        self.show(Screen::SuicideBreathing);
        self.cancel_breathing_timer();
        self.state.breathing.cycles = 0;
        self.state.breathing.breathing = true;
        self.page
            .set_style(regions::CRISIS_CONTINUE_BUTTON, "display", "none");
        self.page
            .remove_class_all(regions::BREATH_DOT_GROUP, &[regions::ACTIVE]);
        self.breathing_cycle();
    }

    /// Halt the exercise where it stands. Safe to call at any time.
    pub fn stop_breathing(&mut self) {
        let was_breathing = self.state.breathing.breathing;
        self.state.breathing.breathing = false;
        self.cancel_breathing_timer();
        if was_breathing {
            self.emit(self.breathing_event("stopped"));
        }
        self.state.breathing.phase = BreathPhase::Idle;
    }

    /// Inhale of the next cycle, or the closing message after the last one.
    fn breathing_cycle(&mut self) {
        if !self.state.breathing.breathing {
            return;
        }
        let cycle = self.state.breathing.cycles;
        if cycle >= TOTAL_CYCLES {
            self.page
                .set_text(regions::BREATHE_TIMER_TEXT, DONE_TIMER_TEXT);
            self.page.set_text(regions::BREATHE_TEXT, DONE_TEXT);
            self.page
                .set_style(regions::CRISIS_CONTINUE_BUTTON, "display", "inline-block");
            self.state.breathing.breathing = false;
            self.state.breathing.phase = BreathPhase::Idle;
            self.emit(self.breathing_event("finished"));
            return;
        }

        self.page
            .set_text(regions::BREATHE_TIMER_TEXT, &cycle_label(cycle));
        for (i, dot) in self
            .page
            .members(regions::BREATH_DOT_GROUP)
            .iter()
            .enumerate()
        {
            if i == cycle {
                self.page.add_class(dot, regions::ACTIVE);
            } else {
                self.page.remove_class(dot, regions::ACTIVE);
            }
        }
        self.enter_breath_phase(BreathPhase::Inhale);
    }

    pub(super) fn breathing_continue(&mut self, task: TimerTask) {
        if !self.state.breathing.breathing {
            return;
        }
        match task {
            TimerTask::BreathHold => self.enter_breath_phase(BreathPhase::Hold),
            TimerTask::BreathExhale => self.enter_breath_phase(BreathPhase::Exhale),
            TimerTask::BreathCycleDone => {
                self.state.breathing.cycles += 1;
                self.breathing_cycle();
            }
            _ => {}
        }
    }

    fn enter_breath_phase(&mut self, phase: BreathPhase) {
        self.page.set_text(regions::BREATHE_TEXT, phase.prompt());
        self.page
            .set_class_list(regions::BREATHE_CIRCLE, &[regions::BREATHE_CIRCLE, phase.class()]);
        let (after, next) = match phase {
            BreathPhase::Inhale => (self.timing.inhale(), TimerTask::BreathHold),
            BreathPhase::Hold => (self.timing.hold(), TimerTask::BreathExhale),
            BreathPhase::Exhale => (self.timing.exhale(), TimerTask::BreathCycleDone),
            BreathPhase::Idle => return,
        };
        self.state.breathing.phase = phase;
        self.state.breathing.pending = Some(self.clock.schedule(after, next));
        self.emit(self.breathing_event(phase.class()));
    }

    fn cancel_breathing_timer(&mut self) {
        if let Some(handle) = self.state.breathing.pending.take() {
            self.clock.cancel(handle);
        }
    }

    fn breathing_event(&self, stage: &'static str) -> ActivityEvent {
        ActivityEvent::Breathing {
            stage,
            cycle: self.state.breathing.cycles,
            at: self.clock.now(),
        }
    }
}
