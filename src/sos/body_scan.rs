//! Progressive-relaxation body scan: five regions, each tensed then relaxed.

use crate::logger::activity::ActivityEvent;
use crate::page::Page;

use super::controller::{SosController, TimerTask};
use super::regions;
use super::scheduler::{Scheduler, TimerHandle};
use super::screen::Screen;

/// One body region the scan walks through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyPart {
    pub id: &'static str,
    pub label: &'static str,
}

/// Scan order, head to feet.
pub const BODY_PARTS: [BodyPart; 5] = [
    BodyPart {
        id: "svg-head",
        label: "Cabeza y Cara",
    },
    BodyPart {
        id: "svg-shoulders",
        label: "Hombros y Cuello",
    },
    BodyPart {
        id: "svg-arms",
        label: "Brazos y Manos",
    },
    BodyPart {
        id: "svg-torso",
        label: "Pecho y Estómago",
    },
    BodyPart {
        id: "svg-legs",
        label: "Piernas y Pies",
    },
];

pub const PAUSE_LABEL: &str = "⏸ Pausar";
pub const RESUME_LABEL: &str = "▶️ Reanudar";
pub const PAUSED_TEXT: &str = "Ejercicio en pausa";
pub const RESUMING_TEXT: &str = "Reanudando...";

#[must_use]
pub fn tense_instruction(part: &BodyPart) -> String {
    format!("Frunce y tensa fuerte: {}...", part.label)
}

#[must_use]
pub fn relax_instruction(part: &BodyPart) -> String {
    format!("Suelta el aire y relaja: {}...", part.label)
}

/// Which half of the current step is playing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BodyScanPhase {
    #[default]
    Idle,
    Tense,
    Relax,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodyScanState {
    pub active: bool,
    pub paused: bool,
    /// Index into [`BODY_PARTS`]; reaching the end finishes the scan.
    pub step: usize,
    pub phase: BodyScanPhase,
    pub pending: Option<TimerHandle>,
}

impl BodyScanState {
    /// Whether the loop would make progress if re-entered.
    #[must_use]
    pub const fn running(&self) -> bool {
        self.active && !self.paused
    }
}

impl<P, S> SosController<P, S>
where
    P: Page,
    S: Scheduler<TimerTask>,
{
    /// Begin the scan from the first region.
    pub fn start_body_scan(&mut self) {
        self.show(Screen::BodyScanActive);
        self.cancel_body_scan_timer();
        self.state.body_scan.step = 0;
        self.state.body_scan.paused = false;
        self.state.body_scan.active = true;
        self.page
            .set_text(regions::BODY_SCAN_PAUSE_BUTTON, PAUSE_LABEL);
        self.page
            .remove_class(regions::BODY_SCAN_PAUSE_BUTTON, regions::PAUSED);
        let marks = [
            regions::FILL_ACTIVE,
            regions::FILL_RELAX,
            regions::ACTIVE,
            regions::COMPLETED,
        ];
        self.page.remove_class_all(regions::BODY_PATH_GROUP, &marks);
        self.page
            .remove_class_all(regions::BODY_SCAN_DOT_GROUP, &marks);
        self.body_scan_step();
    }

    /// Stop without moving screens. Safe to call at any time.
    pub fn stop_body_scan(&mut self) {
        let was_active = self.state.body_scan.active;
        self.state.body_scan.active = false;
        self.state.body_scan.paused = false;
        self.state.body_scan.phase = BodyScanPhase::Idle;
        self.cancel_body_scan_timer();
        self.page.remove_class_all(
            regions::BODY_PATH_GROUP,
            &[regions::FILL_ACTIVE, regions::FILL_RELAX],
        );
        if was_active {
            self.emit(self.body_scan_event("stopped"));
        }
    }

    /// Freeze on the current step. No-op unless the scan is running.
    pub fn pause_body_scan(&mut self) {
        if !self.state.body_scan.running() {
            return;
        }
        self.state.body_scan.paused = true;
        self.cancel_body_scan_timer();
        let btn = regions::BODY_SCAN_PAUSE_BUTTON;
        self.page.set_text(btn, RESUME_LABEL);
        self.page.add_class(btn, regions::PAUSED);
        self.page
            .set_text(regions::BODY_SCAN_INSTRUCTION, PAUSED_TEXT);
        self.page
            .remove_class_all(regions::BODY_PATH_GROUP, &[regions::FILL_ACTIVE]);
        self.emit(self.body_scan_event("paused"));
    }

    /// Continue a paused scan, restarting the tense phase of the same step.
    pub fn resume_body_scan(&mut self) {
        if !(self.state.body_scan.active && self.state.body_scan.paused) {
            return;
        }
        self.state.body_scan.paused = false;
        let btn = regions::BODY_SCAN_PAUSE_BUTTON;
        self.page.set_text(btn, PAUSE_LABEL);
        self.page.remove_class(btn, regions::PAUSED);
        self.page
            .set_text(regions::BODY_SCAN_INSTRUCTION, RESUMING_TEXT);
        self.emit(self.body_scan_event("resumed"));
        self.body_scan_step();
    }

    pub fn toggle_pause(&mut self) {
        if self.state.body_scan.paused {
            self.resume_body_scan();
        } else {
            self.pause_body_scan();
        }
    }

    /// Stop and jump to the closing screen.
    pub fn finish_body_scan(&mut self) {
        self.stop_body_scan();
        self.show(Screen::BodyScanFinal);
    }

    /// Tense phase of the current step, or finish when every region is done.
    fn body_scan_step(&mut self) {
        if !self.state.body_scan.running() {
            return;
        }
        let step = self.state.body_scan.step;
        let Some(part) = BODY_PARTS.get(step) else {
            self.emit(self.body_scan_event("finished"));
            self.finish_body_scan();
            return;
        };

        for (i, dot) in self
            .page
            .members(regions::BODY_SCAN_DOT_GROUP)
            .iter()
            .enumerate()
        {
            if i < step {
                self.page.remove_class(dot, regions::ACTIVE);
                self.page.add_class(dot, regions::COMPLETED);
            } else if i == step {
                self.page.add_class(dot, regions::ACTIVE);
            } else {
                self.page.remove_class(dot, regions::ACTIVE);
                self.page.remove_class(dot, regions::COMPLETED);
            }
        }
        self.page
            .set_text(regions::BODY_SCAN_INSTRUCTION, &tense_instruction(part));
        self.page.add_class(part.id, regions::FILL_ACTIVE);

        self.state.body_scan.phase = BodyScanPhase::Tense;
        let handle = self
            .clock
            .schedule(self.timing.body_scan_tense(), TimerTask::BodyScanRelax);
        self.state.body_scan.pending = Some(handle);
        self.emit(self.body_scan_event("tense"));
    }

    pub(super) fn body_scan_relax(&mut self) {
        if !self.state.body_scan.running() {
            return;
        }
        let Some(part) = BODY_PARTS.get(self.state.body_scan.step) else {
            return;
        };
        self.page
            .set_text(regions::BODY_SCAN_INSTRUCTION, &relax_instruction(part));
        self.page.remove_class(part.id, regions::FILL_ACTIVE);
        self.page.add_class(part.id, regions::FILL_RELAX);

        self.state.body_scan.phase = BodyScanPhase::Relax;
        let handle = self
            .clock
            .schedule(self.timing.body_scan_relax(), TimerTask::BodyScanAdvance);
        self.state.body_scan.pending = Some(handle);
        self.emit(self.body_scan_event("relax"));
    }

    pub(super) fn body_scan_advance(&mut self) {
        if !self.state.body_scan.running() {
            return;
        }
        self.state.body_scan.step += 1;
        self.body_scan_step();
    }

    fn cancel_body_scan_timer(&mut self) {
        if let Some(handle) = self.state.body_scan.pending.take() {
            self.clock.cancel(handle);
        }
    }

    fn body_scan_event(&self, stage: &'static str) -> ActivityEvent {
        ActivityEvent::BodyScan {
            stage,
            step: self.state.body_scan.step,
            at: self.clock.now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::core::config::TimingConfig;
    use crate::page::MemoryPage;
    use crate::page::layout::sos_overlay_page;
    use crate::sos::scheduler::VirtualClock;

    type Ctl = SosController<MemoryPage, VirtualClock<TimerTask>>;

    const PHASE: Duration = Duration::from_secs(4);

    fn started() -> Ctl {
        let mut ctl =
            SosController::new(sos_overlay_page(), VirtualClock::new(), TimingConfig::default());
        ctl.open();
        ctl.start_body_scan();
        ctl
    }

    fn instruction(ctl: &Ctl) -> String {
        ctl.page()
            .text(regions::BODY_SCAN_INSTRUCTION)
            .unwrap_or_default()
    }

    fn fills(ctl: &Ctl) -> usize {
        ctl.page()
            .members_with_class(regions::BODY_PATH_GROUP, regions::FILL_ACTIVE)
            .len()
            + ctl
                .page()
                .members_with_class(regions::BODY_PATH_GROUP, regions::FILL_RELAX)
                .len()
    }

    #[test]
    fn start_tenses_first_region() {
        let ctl = started();
        assert_eq!(ctl.state().screen, Screen::BodyScanActive);
        assert!(ctl.state().body_scan.active);
        assert_eq!(ctl.state().body_scan.step, 0);
        assert_eq!(ctl.state().body_scan.phase, BodyScanPhase::Tense);
        assert!(ctl.page().has_class("svg-head", regions::FILL_ACTIVE));
        assert_eq!(instruction(&ctl), "Frunce y tensa fuerte: Cabeza y Cara...");
        assert_eq!(
            ctl.page().text(regions::BODY_SCAN_PAUSE_BUTTON).as_deref(),
            Some(PAUSE_LABEL)
        );
    }

    #[test]
    fn tense_then_relax_then_next_region() {
        let mut ctl = started();
        ctl.advance(PHASE);
        assert!(!ctl.page().has_class("svg-head", regions::FILL_ACTIVE));
        assert!(ctl.page().has_class("svg-head", regions::FILL_RELAX));
        assert_eq!(instruction(&ctl), "Suelta el aire y relaja: Cabeza y Cara...");
        ctl.advance(PHASE);
        assert_eq!(ctl.state().body_scan.step, 1);
        assert!(ctl.page().has_class("svg-shoulders", regions::FILL_ACTIVE));
        let dots = ctl.page().members(regions::BODY_SCAN_DOT_GROUP);
        assert!(ctl.page().has_class(&dots[0], regions::COMPLETED));
        assert!(ctl.page().has_class(&dots[1], regions::ACTIVE));
        assert!(!ctl.page().has_class(&dots[2], regions::ACTIVE));
    }

    #[test]
    fn completes_after_ten_phases() {
        let mut ctl = started();
        ctl.advance(PHASE * 10 - Duration::from_millis(1));
        assert_eq!(ctl.state().screen, Screen::BodyScanActive);
        ctl.advance(Duration::from_millis(1));
        assert_eq!(ctl.state().screen, Screen::BodyScanFinal);
        assert!(!ctl.state().body_scan.active);
        assert!(ctl.state().body_scan.pending.is_none());
        assert_eq!(fills(&ctl), 0);
    }

    #[test]
    fn start_then_stop_leaves_no_fill() {
        let mut ctl = started();
        ctl.advance(PHASE + PHASE / 2);
        ctl.stop_body_scan();
        assert_eq!(fills(&ctl), 0);
        assert!(ctl.state().body_scan.pending.is_none());
        ctl.advance(PHASE * 20);
        assert_eq!(fills(&ctl), 0);
        assert_eq!(ctl.state().screen, Screen::BodyScanActive);
    }

    #[test]
    fn pause_cancels_pending_and_resume_retenses_same_step() {
        let mut ctl = started();
        ctl.advance(PHASE * 2 + PHASE + Duration::from_secs(1));
        assert_eq!(ctl.state().body_scan.step, 1);
        assert_eq!(ctl.state().body_scan.phase, BodyScanPhase::Relax);

        ctl.dispatch(crate::sos::SosAction::TogglePause);
        assert!(ctl.state().body_scan.paused);
        assert!(ctl.state().body_scan.pending.is_none());
        assert_eq!(instruction(&ctl), PAUSED_TEXT);
        assert!(
            ctl.page()
                .has_class(regions::BODY_SCAN_PAUSE_BUTTON, regions::PAUSED)
        );
        assert_eq!(
            ctl.page().text(regions::BODY_SCAN_PAUSE_BUTTON).as_deref(),
            Some(RESUME_LABEL)
        );

        ctl.advance(Duration::from_secs(60));
        assert_eq!(ctl.state().body_scan.step, 1);

        ctl.dispatch(crate::sos::SosAction::TogglePause);
        assert!(!ctl.state().body_scan.paused);
        assert_eq!(ctl.state().body_scan.step, 1);
        assert_eq!(ctl.state().body_scan.phase, BodyScanPhase::Tense);
        assert!(ctl.page().has_class("svg-shoulders", regions::FILL_ACTIVE));
        assert_eq!(
            instruction(&ctl),
            "Frunce y tensa fuerte: Hombros y Cuello..."
        );
    }

    #[test]
    fn pause_and_resume_are_no_ops_when_idle() {
        let mut ctl =
            SosController::new(sos_overlay_page(), VirtualClock::new(), TimingConfig::default());
        ctl.pause_body_scan();
        assert!(!ctl.state().body_scan.paused);
        ctl.resume_body_scan();
        assert!(!ctl.state().body_scan.active);
        assert_eq!(ctl.clock().pending(), 0);
    }

    #[test]
    fn restart_cancels_outstanding_timer() {
        let mut ctl = started();
        ctl.advance(PHASE / 2);
        ctl.start_body_scan();
        assert_eq!(ctl.clock().pending(), 1);
        ctl.advance(PHASE / 2);
        assert_eq!(ctl.state().body_scan.phase, BodyScanPhase::Tense);
        ctl.advance(PHASE / 2);
        assert_eq!(ctl.state().body_scan.phase, BodyScanPhase::Relax);
    }

    #[test]
    fn skip_jumps_to_final() {
        let mut ctl = started();
        ctl.dispatch(crate::sos::SosAction::SkipBodyScan);
        assert_eq!(ctl.state().screen, Screen::BodyScanFinal);
        assert!(!ctl.state().body_scan.active);
        assert_eq!(fills(&ctl), 0);
    }

    #[test]
    fn close_stops_scan() {
        let mut ctl = started();
        ctl.close();
        assert!(!ctl.state().body_scan.active);
        ctl.advance(PHASE * 20);
        assert_eq!(ctl.state().body_scan.step, 0);
    }
}
