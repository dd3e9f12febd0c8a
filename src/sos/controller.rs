//! The SOS controller: one state object plus its transition functions.
//!
//! All crisis-tool state lives in [`SosState`], owned by a [`SosController`]
//! together with the page it renders onto and the scheduler that holds its
//! deferred work. Every entry point goes through [`SosController::dispatch`];
//! deferred continuations come back through [`SosController::fire`].
//!
//! **Design invariant:** no entry point fails. Missing page regions are silent
//! no-ops, and a continuation whose handle is no longer the recorded pending
//! handle is dropped without effect.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::core::config::TimingConfig;
use crate::core::errors::CalmError;
use crate::logger::activity::{ActivityEvent, ActivityLoggerHandle};
use crate::page::Page;

use super::body_scan::BodyScanState;
use super::breathing::BreathingState;
use super::grounding::GroundingState;
use super::regions;
use super::scheduler::{Scheduler, TimerHandle};
use super::screen::{Screen, route_choice};

// ──────────────────── deferred work ────────────────────

/// The closed set of continuations the controller schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerTask {
    /// Add the `active` class to the overlay one frame after it is shown.
    OverlayActivate,
    /// Hide the overlay once the close transition has played.
    OverlayHide,
    /// Tense phase elapsed: switch the current region to relax.
    BodyScanRelax,
    /// Relax phase elapsed: move to the next region.
    BodyScanAdvance,
    BreathHold,
    BreathExhale,
    /// Exhale elapsed: count the cycle and start the next one.
    BreathCycleDone,
}

// ──────────────────── overlay ────────────────────

/// Visibility lifecycle of the overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverlayPhase {
    #[default]
    Hidden,
    /// Displayed, `active` class not yet applied.
    Shown,
    Active,
    /// `active` removed, waiting to be hidden.
    Closing,
}

impl OverlayPhase {
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Shown | Self::Active)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hidden => "hidden",
            Self::Shown => "shown",
            Self::Active => "active",
            Self::Closing => "closing",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayState {
    pub phase: OverlayPhase,
    pub pending: Option<TimerHandle>,
}

/// Everything the crisis tool knows about the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SosState {
    pub overlay: OverlayState,
    pub screen: Screen,
    pub body_scan: BodyScanState,
    pub breathing: BreathingState,
    pub grounding: GroundingState,
}

// ──────────────────── actions ────────────────────

/// Every user-facing entry point of the crisis tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SosAction {
    Open,
    /// Open straight onto the body-scan intro, without a reset.
    OpenBodyScanDirect,
    Close,
    Reset,
    /// Close when the overlay is active, otherwise nothing.
    Escape,
    /// Triage option tag, routed through the choice table.
    Choice(String),
    Show(Screen),
    StartBodyScan,
    StopBodyScan,
    PauseBodyScan,
    ResumeBodyScan,
    TogglePause,
    SkipBodyScan,
    StartGrounding,
    NextGrounding,
    StartBreathing,
    StopBreathing,
    ShowSuicideReasons,
    EnableReasonsNext,
    ShowSuicideContract,
    FinishSuicideModule,
}

impl SosAction {
    /// Plain action names accepted by [`FromStr`], for help output.
    pub const NAMES: [&'static str; 19] = [
        "open",
        "open-body-scan",
        "close",
        "reset",
        "escape",
        "start-body-scan",
        "stop-body-scan",
        "pause",
        "resume",
        "toggle-pause",
        "skip-body-scan",
        "start-grounding",
        "next-grounding",
        "start-breathing",
        "stop-breathing",
        "suicide-reasons",
        "enable-reasons-next",
        "suicide-contract",
        "finish-suicide",
    ];
}

impl fmt::Display for SosAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Choice(tag) => return write!(f, "choice:{tag}"),
            Self::Show(screen) => return write!(f, "show:{}", screen.name()),
            Self::Open => "open",
            Self::OpenBodyScanDirect => "open-body-scan",
            Self::Close => "close",
            Self::Reset => "reset",
            Self::Escape => "escape",
            Self::StartBodyScan => "start-body-scan",
            Self::StopBodyScan => "stop-body-scan",
            Self::PauseBodyScan => "pause",
            Self::ResumeBodyScan => "resume",
            Self::TogglePause => "toggle-pause",
            Self::SkipBodyScan => "skip-body-scan",
            Self::StartGrounding => "start-grounding",
            Self::NextGrounding => "next-grounding",
            Self::StartBreathing => "start-breathing",
            Self::StopBreathing => "stop-breathing",
            Self::ShowSuicideReasons => "suicide-reasons",
            Self::EnableReasonsNext => "enable-reasons-next",
            Self::ShowSuicideContract => "suicide-contract",
            Self::FinishSuicideModule => "finish-suicide",
        };
        f.write_str(name)
    }
}

impl FromStr for SosAction {
    type Err = CalmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if let Some((verb, arg)) = input.split_once(':') {
            let arg = arg.trim();
            return match verb.trim() {
                "choice" if !arg.is_empty() => Ok(Self::Choice(arg.to_string())),
                "show" => Screen::from_name(arg).map(Self::Show).ok_or_else(|| {
                    CalmError::UnknownAction {
                        input: input.to_string(),
                        details: format!("no screen named {arg:?}"),
                    }
                }),
                _ => Err(CalmError::UnknownAction {
                    input: input.to_string(),
                    details: "expected choice:<tag> or show:<screen>".to_string(),
                }),
            };
        }
        let action = match input {
            "open" => Self::Open,
            "open-body-scan" => Self::OpenBodyScanDirect,
            "close" => Self::Close,
            "reset" => Self::Reset,
            "escape" => Self::Escape,
            "start-body-scan" => Self::StartBodyScan,
            "stop-body-scan" => Self::StopBodyScan,
            "pause" => Self::PauseBodyScan,
            "resume" => Self::ResumeBodyScan,
            "toggle-pause" => Self::TogglePause,
            "skip-body-scan" => Self::SkipBodyScan,
            "start-grounding" => Self::StartGrounding,
            "next-grounding" => Self::NextGrounding,
            "start-breathing" => Self::StartBreathing,
            "stop-breathing" => Self::StopBreathing,
            "suicide-reasons" => Self::ShowSuicideReasons,
            "enable-reasons-next" => Self::EnableReasonsNext,
            "suicide-contract" => Self::ShowSuicideContract,
            "finish-suicide" => Self::FinishSuicideModule,
            _ => {
                return Err(CalmError::UnknownAction {
                    input: input.to_string(),
                    details: format!("expected one of: {}", Self::NAMES.join(", ")),
                });
            }
        };
        Ok(action)
    }
}

// ──────────────────── controller ────────────────────

/// Owns the crisis-tool state, the page and the scheduler.
pub struct SosController<P, S> {
    pub(super) page: P,
    pub(super) clock: S,
    pub(super) timing: TimingConfig,
    pub(super) state: SosState,
    logger: Option<ActivityLoggerHandle>,
}

impl<P, S> SosController<P, S>
where
    P: Page,
    S: Scheduler<TimerTask>,
{
    pub fn new(page: P, clock: S, timing: TimingConfig) -> Self {
        Self {
            page,
            clock,
            timing,
            state: SosState::default(),
            logger: None,
        }
    }

    /// Record activity through `logger`.
    #[must_use]
    pub fn with_logger(mut self, logger: ActivityLoggerHandle) -> Self {
        self.logger = Some(logger);
        self
    }

    #[must_use]
    pub fn state(&self) -> &SosState {
        &self.state
    }

    #[must_use]
    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    #[must_use]
    pub fn clock(&self) -> &S {
        &self.clock
    }

    #[must_use]
    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    /// Current scheduler time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    pub fn into_page(self) -> P {
        self.page
    }

    /// Single entry point for every user action.
    pub fn dispatch(&mut self, action: SosAction) {
        match action {
            SosAction::Open => self.open(),
            SosAction::OpenBodyScanDirect => self.open_body_scan_direct(),
            SosAction::Close => self.close(),
            SosAction::Reset => self.reset(),
            SosAction::Escape => self.escape(),
            SosAction::Choice(tag) => self.handle_choice(&tag),
            SosAction::Show(screen) => self.show(screen),
            SosAction::StartBodyScan => self.start_body_scan(),
            SosAction::StopBodyScan => self.stop_body_scan(),
            SosAction::PauseBodyScan => self.pause_body_scan(),
            SosAction::ResumeBodyScan => self.resume_body_scan(),
            SosAction::TogglePause => self.toggle_pause(),
            SosAction::SkipBodyScan => self.finish_body_scan(),
            SosAction::StartGrounding => self.start_grounding(),
            SosAction::NextGrounding => self.next_grounding(),
            SosAction::StartBreathing => self.start_breathing(),
            SosAction::StopBreathing => self.stop_breathing(),
            SosAction::ShowSuicideReasons => self.show(Screen::SuicideReasons),
            SosAction::EnableReasonsNext => self.enable_reasons_next(),
            SosAction::ShowSuicideContract => self.show(Screen::SuicideContract),
            SosAction::FinishSuicideModule => self.show(Screen::SuicideFinal),
        }
    }

    /// Move the clock forward by `by`, firing every task that falls due.
    /// Returns the number of tasks fired.
    pub fn advance(&mut self, by: Duration) -> usize {
        let target = self.clock.now().saturating_add(by);
        let mut fired = 0;
        while let Some((handle, task)) = self.clock.pop_due(target) {
            self.fire(handle, task);
            fired += 1;
        }
        self.clock.advance_to(target);
        fired
    }

    /// Fire tasks until nothing is pending or `limit` of clock time has
    /// passed. Returns the number of tasks fired.
    pub fn run_until_idle(&mut self, limit: Duration) -> usize {
        let target = self.clock.now().saturating_add(limit);
        let mut fired = 0;
        while let Some((handle, task)) = self.clock.pop_due(target) {
            self.fire(handle, task);
            fired += 1;
        }
        fired
    }

    /// Deliver a due task. Stale handles are ignored.
    pub fn fire(&mut self, handle: TimerHandle, task: TimerTask) {
        match task {
            TimerTask::OverlayActivate | TimerTask::OverlayHide => {
                if self.state.overlay.pending != Some(handle) {
                    return;
                }
                self.state.overlay.pending = None;
                self.overlay_transition(task);
            }
            TimerTask::BodyScanRelax | TimerTask::BodyScanAdvance => {
                if self.state.body_scan.pending != Some(handle) {
                    return;
                }
                self.state.body_scan.pending = None;
                if task == TimerTask::BodyScanRelax {
                    self.body_scan_relax();
                } else {
                    self.body_scan_advance();
                }
            }
            TimerTask::BreathHold | TimerTask::BreathExhale | TimerTask::BreathCycleDone => {
                if self.state.breathing.pending != Some(handle) {
                    return;
                }
                self.state.breathing.pending = None;
                self.breathing_continue(task);
            }
        }
    }

    // ──────────────────── screen router ────────────────────

    /// Deactivate every screen, then activate exactly `screen`.
    pub fn show(&mut self, screen: Screen) {
        self.page
            .remove_class_all(regions::SCREEN_GROUP, &[regions::ACTIVE]);
        self.page.add_class(screen.id(), regions::ACTIVE);
        self.state.screen = screen;
        self.emit(ActivityEvent::ScreenChanged {
            screen: screen.id(),
        });
    }

    /// Route a triage option. Unknown tags change nothing.
    pub fn handle_choice(&mut self, tag: &str) {
        let target = route_choice(tag);
        self.emit(ActivityEvent::ChoiceRouted {
            tag: tag.to_string(),
            screen: target.map(Screen::id),
        });
        if let Some(screen) = target {
            self.show(screen);
        }
    }

    /// Stop both sequencers, clear breathing progress and return to the entry
    /// screen.
    pub fn reset(&mut self) {
        self.stop_body_scan();
        self.stop_breathing();
        self.page
            .remove_class_all(regions::BREATH_DOT_GROUP, &[regions::ACTIVE]);
        self.state.grounding = GroundingState::default();
        self.show(Screen::Entry);
    }

    // ──────────────────── overlay lifecycle ────────────────────

    pub fn open(&mut self) {
        self.show_overlay();
        self.emit(ActivityEvent::OverlayOpened { direct: false });
        self.reset();
    }

    /// Open onto the body-scan intro without resetting the session.
    pub fn open_body_scan_direct(&mut self) {
        self.show_overlay();
        self.emit(ActivityEvent::OverlayOpened { direct: true });
        self.stop_body_scan();
        self.show(Screen::BodyScanIntro);
    }

    pub fn close(&mut self) {
        self.page.remove_class(regions::OVERLAY, regions::ACTIVE);
        self.page.set_style(regions::BODY, "overflow", "auto");
        if matches!(
            self.state.overlay.phase,
            OverlayPhase::Shown | OverlayPhase::Active
        ) {
            self.cancel_overlay_timer();
            let handle = self
                .clock
                .schedule(self.timing.overlay_close(), TimerTask::OverlayHide);
            self.state.overlay = OverlayState {
                phase: OverlayPhase::Closing,
                pending: Some(handle),
            };
            self.emit(ActivityEvent::OverlayClosed);
        }
        self.stop_body_scan();
        self.stop_breathing();
    }

    /// Keyboard escape: close only while the overlay carries `active`.
    pub fn escape(&mut self) {
        if self.page.has_class(regions::OVERLAY, regions::ACTIVE) {
            self.close();
        }
    }

    /// Unlock the "continue" button on the reasons-to-live screen.
    pub fn enable_reasons_next(&mut self) {
        let btn = regions::REASONS_NEXT_BUTTON;
        self.page.set_disabled(btn, false);
        self.page.set_style(btn, "opacity", "1");
        self.page.set_style(btn, "cursor", "pointer");
        self.page.set_text(btn, "He reflexionado (Continuar)");
    }

    fn show_overlay(&mut self) {
        self.cancel_overlay_timer();
        self.page.set_style(regions::OVERLAY, "display", "block");
        self.page.set_style(regions::BODY, "overflow", "hidden");
        if self.state.overlay.phase == OverlayPhase::Active {
            return;
        }
        let handle = self
            .clock
            .schedule(self.timing.overlay_activate(), TimerTask::OverlayActivate);
        self.state.overlay = OverlayState {
            phase: OverlayPhase::Shown,
            pending: Some(handle),
        };
    }

    fn overlay_transition(&mut self, task: TimerTask) {
        match (task, self.state.overlay.phase) {
            (TimerTask::OverlayActivate, OverlayPhase::Shown) => {
                self.page.add_class(regions::OVERLAY, regions::ACTIVE);
                self.state.overlay.phase = OverlayPhase::Active;
            }
            (TimerTask::OverlayHide, OverlayPhase::Closing) => {
                self.page.set_style(regions::OVERLAY, "display", "none");
                self.state.overlay.phase = OverlayPhase::Hidden;
            }
            _ => {}
        }
    }

    fn cancel_overlay_timer(&mut self) {
        if let Some(handle) = self.state.overlay.pending.take() {
            self.clock.cancel(handle);
        }
    }

    // ──────────────────── shared helpers ────────────────────

    pub(super) fn emit(&self, event: ActivityEvent) {
        if let Some(logger) = &self.logger {
            logger.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::MemoryPage;
    use crate::page::layout::sos_overlay_page;
    use crate::sos::scheduler::VirtualClock;

    type Ctl = SosController<MemoryPage, VirtualClock<TimerTask>>;

    fn controller() -> Ctl {
        SosController::new(sos_overlay_page(), VirtualClock::new(), TimingConfig::default())
    }

    fn active_screens(ctl: &Ctl) -> Vec<String> {
        ctl.page()
            .members_with_class(regions::SCREEN_GROUP, regions::ACTIVE)
    }

    #[test]
    fn show_activates_exactly_one_screen() {
        let mut ctl = controller();
        for screen in Screen::ALL {
            ctl.show(screen);
            assert_eq!(active_screens(&ctl), vec![screen.id().to_string()]);
            assert_eq!(ctl.state().screen, screen);
        }
    }

    #[test]
    fn choices_route_through_table() {
        let mut ctl = controller();
        ctl.open();
        ctl.dispatch(SosAction::Choice("triage-2".into()));
        assert_eq!(ctl.state().screen, Screen::Triage2);
        ctl.dispatch(SosAction::Choice("panic".into()));
        assert_eq!(ctl.state().screen, Screen::CalmIntro);
    }

    #[test]
    fn unknown_choice_leaves_screen_alone() {
        let mut ctl = controller();
        ctl.open();
        ctl.dispatch(SosAction::Choice("risk".into()));
        ctl.dispatch(SosAction::Choice("nonsense".into()));
        assert_eq!(ctl.state().screen, Screen::Risk);
        assert_eq!(active_screens(&ctl), vec![Screen::Risk.id().to_string()]);
    }

    #[test]
    fn open_shows_then_activates_overlay() {
        let mut ctl = controller();
        ctl.open();
        assert_eq!(
            ctl.page().style(regions::OVERLAY, "display").as_deref(),
            Some("block")
        );
        assert_eq!(
            ctl.page().style(regions::BODY, "overflow").as_deref(),
            Some("hidden")
        );
        assert!(!ctl.page().has_class(regions::OVERLAY, regions::ACTIVE));
        assert_eq!(ctl.state().overlay.phase, OverlayPhase::Shown);

        ctl.advance(Duration::from_millis(10));
        assert!(ctl.page().has_class(regions::OVERLAY, regions::ACTIVE));
        assert_eq!(ctl.state().overlay.phase, OverlayPhase::Active);
        assert!(ctl.state().overlay.pending.is_none());
    }

    #[test]
    fn close_hides_after_transition() {
        let mut ctl = controller();
        ctl.open();
        ctl.advance(Duration::from_millis(10));
        ctl.close();
        assert!(!ctl.page().has_class(regions::OVERLAY, regions::ACTIVE));
        assert_eq!(
            ctl.page().style(regions::BODY, "overflow").as_deref(),
            Some("auto")
        );
        assert_eq!(
            ctl.page().style(regions::OVERLAY, "display").as_deref(),
            Some("block")
        );
        ctl.advance(Duration::from_millis(299));
        assert_eq!(ctl.state().overlay.phase, OverlayPhase::Closing);
        ctl.advance(Duration::from_millis(1));
        assert_eq!(
            ctl.page().style(regions::OVERLAY, "display").as_deref(),
            Some("none")
        );
        assert_eq!(ctl.state().overlay.phase, OverlayPhase::Hidden);
    }

    #[test]
    fn reopen_during_close_cancels_hide() {
        let mut ctl = controller();
        ctl.open();
        ctl.advance(Duration::from_millis(10));
        ctl.close();
        ctl.advance(Duration::from_millis(100));
        ctl.open();
        ctl.advance(Duration::from_secs(1));
        assert_eq!(
            ctl.page().style(regions::OVERLAY, "display").as_deref(),
            Some("block")
        );
        assert!(ctl.page().has_class(regions::OVERLAY, regions::ACTIVE));
        assert_eq!(ctl.state().overlay.phase, OverlayPhase::Active);
    }

    #[test]
    fn close_is_idempotent() {
        let mut ctl = controller();
        ctl.open();
        ctl.advance(Duration::from_millis(10));
        ctl.close();
        let snapshot = ctl.state().clone();
        ctl.close();
        assert_eq!(ctl.state(), &snapshot);
        assert_eq!(ctl.clock().pending(), 1);
    }

    #[test]
    fn close_while_hidden_schedules_nothing() {
        let mut ctl = controller();
        ctl.close();
        assert_eq!(ctl.clock().pending(), 0);
        assert_eq!(ctl.state().overlay.phase, OverlayPhase::Hidden);
    }

    #[test]
    fn escape_only_closes_active_overlay() {
        let mut ctl = controller();
        ctl.open();
        ctl.escape();
        assert_eq!(ctl.state().overlay.phase, OverlayPhase::Shown);
        ctl.advance(Duration::from_millis(10));
        ctl.escape();
        assert_eq!(ctl.state().overlay.phase, OverlayPhase::Closing);
    }

    #[test]
    fn open_always_resets_to_entry() {
        let mut ctl = controller();
        ctl.open();
        ctl.dispatch(SosAction::Choice("disconnect".into()));
        ctl.dispatch(SosAction::StartBodyScan);
        ctl.dispatch(SosAction::StartGrounding);
        ctl.dispatch(SosAction::NextGrounding);
        ctl.close();
        ctl.open();
        assert_eq!(ctl.state().screen, Screen::Entry);
        assert_eq!(ctl.state().grounding.step, 0);
        assert!(!ctl.state().body_scan.active);
        assert!(!ctl.state().breathing.breathing);
        assert_eq!(active_screens(&ctl), vec![Screen::Entry.id().to_string()]);
    }

    #[test]
    fn direct_body_scan_entry_skips_reset() {
        let mut ctl = controller();
        ctl.open();
        ctl.start_grounding();
        ctl.next_grounding();
        ctl.close();
        ctl.dispatch(SosAction::OpenBodyScanDirect);
        assert_eq!(ctl.state().screen, Screen::BodyScanIntro);
        assert_eq!(ctl.state().grounding.step, 1);
        assert_eq!(ctl.state().overlay.phase, OverlayPhase::Shown);
    }

    #[test]
    fn enable_reasons_next_unlocks_button() {
        let mut ctl = controller();
        assert!(ctl.page().is_disabled(regions::REASONS_NEXT_BUTTON));
        ctl.dispatch(SosAction::EnableReasonsNext);
        let page = ctl.page();
        assert!(!page.is_disabled(regions::REASONS_NEXT_BUTTON));
        assert_eq!(
            page.style(regions::REASONS_NEXT_BUTTON, "opacity").as_deref(),
            Some("1")
        );
        assert_eq!(
            page.style(regions::REASONS_NEXT_BUTTON, "cursor").as_deref(),
            Some("pointer")
        );
        assert_eq!(
            page.text(regions::REASONS_NEXT_BUTTON).as_deref(),
            Some("He reflexionado (Continuar)")
        );
    }

    #[test]
    fn suicide_flow_screens() {
        let mut ctl = controller();
        ctl.open();
        ctl.dispatch(SosAction::Choice("suicide".into()));
        assert_eq!(ctl.state().screen, Screen::SuicideValidation);
        ctl.dispatch(SosAction::ShowSuicideReasons);
        assert_eq!(ctl.state().screen, Screen::SuicideReasons);
        ctl.dispatch(SosAction::ShowSuicideContract);
        assert_eq!(ctl.state().screen, Screen::SuicideContract);
        ctl.dispatch(SosAction::FinishSuicideModule);
        assert_eq!(ctl.state().screen, Screen::SuicideFinal);
    }

    #[test]
    fn missing_regions_are_tolerated() {
        let mut ctl: Ctl =
            SosController::new(MemoryPage::new(), VirtualClock::new(), TimingConfig::default());
        ctl.open();
        ctl.dispatch(SosAction::StartBodyScan);
        ctl.dispatch(SosAction::StartBreathing);
        ctl.dispatch(SosAction::StartGrounding);
        ctl.advance(Duration::from_secs(120));
        ctl.dispatch(SosAction::EnableReasonsNext);
        ctl.close();
        assert!(ctl.page().is_empty());
    }

    #[test]
    fn stale_handles_are_ignored() {
        let mut ctl = controller();
        ctl.open();
        let stale = ctl.state().overlay.pending;
        ctl.close();
        if let Some(handle) = stale {
            ctl.fire(handle, TimerTask::OverlayActivate);
        }
        assert!(!ctl.page().has_class(regions::OVERLAY, regions::ACTIVE));
        assert_eq!(ctl.state().overlay.phase, OverlayPhase::Closing);
    }

    #[test]
    fn logger_receives_screen_changes() {
        let logger = ActivityLoggerHandle::detached();
        let mut ctl = controller().with_logger(logger.clone());
        ctl.open();
        ctl.dispatch(SosAction::Choice("risk".into()));
        let last = logger.last().expect("entry recorded");
        assert_eq!(last.screen.as_deref(), Some(Screen::Risk.id()));
    }

    #[test]
    fn action_names_parse() {
        for name in SosAction::NAMES {
            let action: SosAction = name.parse().expect("known action");
            assert_eq!(action.to_string(), name);
        }
        assert_eq!(
            "choice:panic".parse::<SosAction>().ok(),
            Some(SosAction::Choice("panic".into()))
        );
        assert_eq!(
            "show:bs-final".parse::<SosAction>().ok(),
            Some(SosAction::Show(Screen::BodyScanFinal))
        );
        assert_eq!(
            "show:sos-screen-risk".parse::<SosAction>().ok(),
            Some(SosAction::Show(Screen::Risk))
        );
    }

    #[test]
    fn bad_action_names_are_rejected() {
        for input in ["", "jump", "show:nowhere", "choice:", "frobnicate:x"] {
            let err = input.parse::<SosAction>().expect_err("must fail");
            assert_eq!(err.code(), "CALM-2001");
        }
    }
}
