//! Terminal runtime: input thread → key routing → controller → frame.
//!
//! The loop sleeps on the input channel until a key arrives, the next timer
//! falls due or the frame interval elapses. The virtual clock is then advanced
//! by the real time that passed, so sequencer timing matches the wall clock.

#![allow(missing_docs)]

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{RecvTimeoutError, Sender, bounded};
use crossterm::event::{self, Event, KeyEvent};

use crate::core::config::TimingConfig;
use crate::core::errors::{CalmError, Result};
use crate::logger::activity::ActivityLoggerHandle;
use crate::logger::jsonl::LogEntry;
use crate::page::MemoryPage;
use crate::page::layout::site_page;
use crate::sos::{Scheduler, SosAction, SosController, TimerTask, VirtualClock};
use crate::widgets::{Modals, Widget};

use super::input::{InputAction, InputContext, resolve_key};
use super::render::{self, FrameInput, Line};
use super::screens;
use super::terminal_guard::TerminalGuard;

type Controller = SosController<MemoryPage, VirtualClock<TimerTask>>;

/// How the overlay looks when the runtime starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StartMode {
    Closed,
    #[default]
    Open,
    BodyScan,
}

#[derive(Debug, Clone)]
pub struct TuiOptions {
    pub timing: TimingConfig,
    pub frame: Duration,
    pub color: bool,
    pub start: StartMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

// ──────────────────── session ────────────────────

/// Controller plus the page-level modals, driven by key presses.
pub struct Session {
    ctl: Controller,
    modals: Modals,
    logger: ActivityLoggerHandle,
}

impl Session {
    #[must_use]
    pub fn new(timing: TimingConfig, logger: ActivityLoggerHandle, start: StartMode) -> Self {
        let mut page = site_page();
        let mut modals = Modals::default();
        if let Err(e) = modals.init(&mut page) {
            eprintln!("[{}] modals disabled: {e}", e.code());
        }
        let mut ctl = SosController::new(page, VirtualClock::new(), timing)
            .with_logger(logger.clone());
        match start {
            StartMode::Closed => {}
            StartMode::Open => ctl.dispatch(SosAction::Open),
            StartMode::BodyScan => ctl.dispatch(SosAction::OpenBodyScanDirect),
        }
        Self {
            ctl,
            modals,
            logger,
        }
    }

    #[must_use]
    pub fn controller(&self) -> &Controller {
        &self.ctl
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> Flow {
        let menu = screens::menu(self.ctl.state(), self.ctl.page());
        let context = InputContext {
            phase: self.ctl.state().overlay.phase,
            menu: &menu,
        };
        match resolve_key(key, context) {
            Some(action) => self.apply(action),
            None => Flow::Continue,
        }
    }

    pub fn apply(&mut self, action: InputAction) -> Flow {
        match action {
            InputAction::Quit => return Flow::Quit,
            InputAction::Escape => {
                self.modals.escape(self.ctl.page_mut());
                self.ctl.dispatch(SosAction::Escape);
            }
            InputAction::Sos(action) => self.ctl.dispatch(action),
        }
        Flow::Continue
    }

    /// Advance the virtual clock by real elapsed time. Returns tasks fired.
    pub fn tick(&mut self, elapsed: Duration) -> usize {
        self.ctl.advance(elapsed)
    }

    /// How long the loop may sleep before something needs doing.
    #[must_use]
    pub fn wait_budget(&self, frame: Duration) -> Duration {
        let now = self.ctl.now();
        self.ctl
            .clock()
            .next_deadline()
            .map_or(frame, |due| due.saturating_sub(now).min(frame))
    }

    #[must_use]
    pub fn frame(&self) -> Vec<Line> {
        let menu = screens::menu(self.ctl.state(), self.ctl.page());
        let input = FrameInput {
            state: self.ctl.state(),
            page: self.ctl.page(),
            menu: &menu,
            now: self.ctl.now(),
            status: self.logger.last().map(|e| status_line(&e)),
        };
        render::compose(&input)
    }
}

fn status_line(entry: &LogEntry) -> String {
    let event = serde_json::to_string(&entry.event).unwrap_or_default();
    let mut line = format!("{} {}", entry.ts, event.trim_matches('"'));
    if let Some(screen) = &entry.screen {
        line.push(' ');
        line.push_str(screen);
    }
    if let Some(step) = entry.step {
        line.push_str(&format!(" step={step}"));
    }
    line
}

// ──────────────────── terminal loop ────────────────────

/// Run the interactive SOS overlay until the user quits.
pub fn run(options: &TuiOptions, logger: &ActivityLoggerHandle) -> Result<()> {
    let guard = TerminalGuard::new().map_err(terminal_error)?;

    let (tx, rx) = bounded::<KeyEvent>(64);
    let stop = Arc::new(AtomicBool::new(false));
    let reader = spawn_input_reader(tx, Arc::clone(&stop))?;

    let mut session = Session::new(options.timing.clone(), logger.clone(), options.start);
    let mut stdout = io::stdout();
    let mut last = Instant::now();

    let result = loop {
        match rx.recv_timeout(session.wait_budget(options.frame)) {
            Ok(key) => {
                if session.handle_key(&key) == Flow::Quit {
                    break Ok(());
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                break Err(CalmError::ChannelClosed {
                    component: "tui-input",
                });
            }
        }

        let now = Instant::now();
        session.tick(now.duration_since(last));
        last = now;

        let (_, rows) = TerminalGuard::terminal_size();
        if let Err(e) = render::draw(&mut stdout, &session.frame(), rows, options.color) {
            break Err(terminal_error(e));
        }
    };

    stop.store(true, Ordering::SeqCst);
    let _ = reader.join();
    drop(guard);
    result
}

/// Forward key presses until `stop` is set or the receiver goes away.
fn spawn_input_reader(
    tx: Sender<KeyEvent>,
    stop: Arc<AtomicBool>,
) -> Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("calm-input".to_string())
        .spawn(move || {
            while !stop.load(Ordering::SeqCst) {
                match event::poll(Duration::from_millis(50)) {
                    Ok(true) => match event::read() {
                        Ok(Event::Key(key)) => {
                            if tx.send(key).is_err() {
                                return;
                            }
                        }
                        Ok(_) => {}
                        Err(_) => return,
                    },
                    Ok(false) => {}
                    Err(_) => return,
                }
            }
        })
        .map_err(|e| CalmError::Runtime {
            details: format!("failed to spawn input thread: {e}"),
        })
}

fn terminal_error(e: io::Error) -> CalmError {
    CalmError::Runtime {
        details: format!("terminal: {e}"),
    }
}
