//! Property-based tests for SOS controller invariants.
//!
//! Arbitrary interleavings of user actions and clock advances must keep the
//! crisis tool consistent: one visible screen, bounded sequencer counters, at
//! most one pending timer per sequencer, and no stray body highlights once the
//! scan is stopped.

use std::time::Duration;

use proptest::prelude::*;

use super::body_scan::BODY_PARTS;
use super::breathing::TOTAL_CYCLES;
use super::controller::{OverlayPhase, SosAction, SosController, TimerTask};
use super::grounding::GROUNDING_STEPS;
use super::regions;
use super::scheduler::{Scheduler, VirtualClock};
use super::screen::Screen;
use crate::core::config::TimingConfig;
use crate::page::layout::sos_overlay_page;
use crate::page::{MemoryPage, Page};

type Ctl = SosController<MemoryPage, VirtualClock<TimerTask>>;

#[derive(Debug, Clone)]
enum Op {
    Act(SosAction),
    Wait(Duration),
}

// ──────────────────── strategies ────────────────────

fn arb_screen() -> impl Strategy<Value = Screen> {
    (0..Screen::ALL.len()).prop_map(|i| Screen::ALL[i])
}

fn arb_action() -> impl Strategy<Value = SosAction> {
    prop_oneof![
        Just(SosAction::Open),
        Just(SosAction::OpenBodyScanDirect),
        Just(SosAction::Close),
        Just(SosAction::Reset),
        Just(SosAction::Escape),
        prop_oneof![
            Just("suicide"),
            Just("triage-2"),
            Just("risk"),
            Just("disconnect"),
            Just("panic"),
            Just("bogus"),
        ]
        .prop_map(|tag| SosAction::Choice(tag.to_string())),
        arb_screen().prop_map(SosAction::Show),
        Just(SosAction::StartBodyScan),
        Just(SosAction::StopBodyScan),
        Just(SosAction::PauseBodyScan),
        Just(SosAction::ResumeBodyScan),
        Just(SosAction::TogglePause),
        Just(SosAction::SkipBodyScan),
        Just(SosAction::StartGrounding),
        Just(SosAction::NextGrounding),
        Just(SosAction::StartBreathing),
        Just(SosAction::StopBreathing),
        Just(SosAction::EnableReasonsNext),
    ]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => arb_action().prop_map(Op::Act),
        2 => (0u64..20_000).prop_map(|ms| Op::Wait(Duration::from_millis(ms))),
    ]
}

fn fresh() -> Ctl {
    SosController::new(sos_overlay_page(), VirtualClock::new(), TimingConfig::default())
}

fn apply(ctl: &mut Ctl, op: &Op) {
    match op {
        Op::Act(action) => ctl.dispatch(action.clone()),
        Op::Wait(by) => {
            ctl.advance(*by);
        }
    }
}

fn assert_invariants(ctl: &Ctl) {
    let state = ctl.state();
    let page = ctl.page();

    let visible = page.members_with_class(regions::SCREEN_GROUP, regions::ACTIVE);
    assert!(visible.len() <= 1, "multiple screens visible: {visible:?}");
    if let Some(id) = visible.first() {
        assert_eq!(id, state.screen.id());
    }

    assert!(state.body_scan.step <= BODY_PARTS.len());
    assert!(state.breathing.cycles <= TOTAL_CYCLES);
    assert!(state.grounding.step <= GROUNDING_STEPS.len());

    // Every recorded handle is still pending, and nothing else is.
    let recorded = [
        state.overlay.pending,
        state.body_scan.pending,
        state.breathing.pending,
    ];
    let live = recorded.iter().flatten().count();
    for handle in recorded.iter().flatten() {
        assert!(ctl.clock().is_pending(*handle), "stale handle {handle}");
    }
    assert_eq!(ctl.clock().pending(), live);

    if !state.body_scan.active {
        assert!(state.body_scan.pending.is_none());
        assert!(
            page.members_with_class(regions::BODY_PATH_GROUP, regions::FILL_ACTIVE)
                .is_empty()
        );
        assert!(
            page.members_with_class(regions::BODY_PATH_GROUP, regions::FILL_RELAX)
                .is_empty()
        );
    }
    if state.body_scan.paused {
        assert!(state.body_scan.active);
        assert!(state.body_scan.pending.is_none());
    }
    if !state.breathing.breathing {
        assert!(state.breathing.pending.is_none());
    }
    if state.overlay.phase == OverlayPhase::Active {
        assert!(page.has_class(regions::OVERLAY, regions::ACTIVE));
    }
    if state.overlay.phase == OverlayPhase::Hidden {
        assert!(state.overlay.pending.is_none());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Any interleaving of actions and waits preserves controller invariants.
    #[test]
    fn controller_preserves_invariants(ops in prop::collection::vec(arb_op(), 1..60)) {
        let mut ctl = fresh();
        for op in &ops {
            apply(&mut ctl, op);
            assert_invariants(&ctl);
        }
    }

    /// Opening always lands on the entry screen with clean sequencers.
    #[test]
    fn open_always_resets(ops in prop::collection::vec(arb_op(), 0..40)) {
        let mut ctl = fresh();
        for op in &ops {
            apply(&mut ctl, op);
        }
        ctl.dispatch(SosAction::Open);
        let state = ctl.state();
        prop_assert_eq!(state.screen, Screen::Entry);
        prop_assert!(!state.body_scan.active);
        prop_assert!(!state.breathing.breathing);
        prop_assert_eq!(state.grounding.step, 0);
        prop_assert!(
            ctl.page()
                .members_with_class(regions::BREATH_DOT_GROUP, regions::ACTIVE)
                .is_empty()
        );
    }

    /// Pausing and resuming at arbitrary points never prevents completion:
    /// the scan always finishes and lands on its final screen.
    #[test]
    fn body_scan_completes_despite_pauses(
        pauses in prop::collection::vec((0u64..8_000, 0u64..30_000), 0..6)
    ) {
        let mut ctl = fresh();
        ctl.dispatch(SosAction::Open);
        ctl.dispatch(SosAction::StartBodyScan);
        for (run_ms, pause_ms) in pauses {
            ctl.advance(Duration::from_millis(run_ms));
            ctl.dispatch(SosAction::PauseBodyScan);
            ctl.advance(Duration::from_millis(pause_ms));
            ctl.dispatch(SosAction::ResumeBodyScan);
        }
        ctl.advance(Duration::from_secs(41));
        prop_assert_eq!(ctl.state().screen, Screen::BodyScanFinal);
        prop_assert!(!ctl.state().body_scan.active);
        prop_assert_eq!(ctl.clock().pending(), 0);
    }

    /// Three breathing cycles always finish with the continue button visible,
    /// however long the clock runs afterwards.
    #[test]
    fn breathing_finishes_after_three_cycles(extra_ms in 0u64..120_000) {
        let mut ctl = fresh();
        ctl.dispatch(SosAction::StartBreathing);
        ctl.advance(Duration::from_secs(57) + Duration::from_millis(extra_ms));
        let state = &ctl.state().breathing;
        prop_assert_eq!(state.cycles, TOTAL_CYCLES);
        prop_assert!(state.pending.is_none());
        prop_assert!(!state.breathing);
        prop_assert_eq!(
            ctl.page().style(regions::CRISIS_CONTINUE_BUTTON, "display"),
            Some("inline-block".to_string())
        );
    }

    /// Unknown triage tags never move the screen.
    #[test]
    fn unmapped_choice_is_inert(start in arb_screen(), tag in "[a-z]{1,12}") {
        prop_assume!(super::screen::route_choice(&tag).is_none());
        let mut ctl = fresh();
        ctl.dispatch(SosAction::Show(start));
        let before = ctl.state().clone();
        ctl.dispatch(SosAction::Choice(tag));
        prop_assert_eq!(ctl.state(), &before);
    }
}
