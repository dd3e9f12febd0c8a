//! Activity logger: typed events → JSONL on a dedicated thread.
//!
//! Callers hold a cheap, cloneable [`ActivityLoggerHandle`]. Events are
//! converted to [`LogEntry`] at the call site, kept in a short in-memory tail
//! (read by the terminal footer and by tests) and forwarded over a bounded
//! crossbeam channel with `try_send`, so the UI never blocks on disk I/O.

#![allow(missing_docs)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use parking_lot::Mutex;

use crate::core::errors::{CalmError, Result};
use crate::logger::jsonl::{EventType, JsonlConfig, JsonlWriter, LogEntry, Severity};

/// How many converted entries the in-memory tail keeps.
const TAIL_CAPACITY: usize = 64;

// ──────────────────── public event type ────────────────────

/// Events emitted by the SOS controller, the widgets and the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityEvent {
    SessionStarted {
        version: String,
        config_hash: String,
    },
    SessionStopped {
        reason: String,
    },
    OverlayOpened {
        direct: bool,
    },
    OverlayClosed,
    ScreenChanged {
        screen: &'static str,
    },
    ChoiceRouted {
        tag: String,
        screen: Option<&'static str>,
    },
    BodyScan {
        stage: &'static str,
        step: usize,
        at: Duration,
    },
    Breathing {
        stage: &'static str,
        cycle: usize,
        at: Duration,
    },
    Grounding {
        step: usize,
        finished: bool,
    },
    WidgetInit {
        widget: &'static str,
        outcome: String,
        ok: bool,
    },
    QuizProgress {
        question_index: usize,
    },
    Error {
        code: String,
        message: String,
    },
}

enum LoggerMsg {
    Entry(Box<LogEntry>),
    Shutdown,
}

// ──────────────────── public handle ────────────────────

/// Thread-safe, cheaply-cloneable handle for recording activity.
#[derive(Clone)]
pub struct ActivityLoggerHandle {
    tx: Option<Sender<LoggerMsg>>,
    dropped_events: Arc<AtomicU64>,
    tail: Arc<Mutex<VecDeque<LogEntry>>>,
}

impl ActivityLoggerHandle {
    /// Handle without a writer thread: entries only land in the in-memory tail.
    #[must_use]
    pub fn detached() -> Self {
        Self {
            tx: None,
            dropped_events: Arc::new(AtomicU64::new(0)),
            tail: Arc::new(Mutex::new(VecDeque::with_capacity(TAIL_CAPACITY))),
        }
    }

    /// Record an event. Never blocks.
    ///
    /// If the channel is full the entry is dropped and the dropped-events
    /// counter is incremented; the in-memory tail still receives it.
    pub fn send(&self, event: ActivityEvent) {
        let entry = event_to_log_entry(&event);
        {
            let mut tail = self.tail.lock();
            if tail.len() == TAIL_CAPACITY {
                tail.pop_front();
            }
            tail.push_back(entry.clone());
        }
        if let Some(tx) = &self.tx
            && let Err(TrySendError::Full(_)) = tx.try_send(LoggerMsg::Entry(Box::new(entry)))
        {
            self.dropped_events.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Number of entries dropped due to channel back-pressure.
    pub fn dropped_events(&self) -> u64 {
        self.dropped_events.load(Ordering::Relaxed)
    }

    /// Snapshot of the most recent entries, oldest first.
    pub fn recent(&self) -> Vec<LogEntry> {
        self.tail.lock().iter().cloned().collect()
    }

    /// Most recent entry, if any.
    pub fn last(&self) -> Option<LogEntry> {
        self.tail.lock().back().cloned()
    }

    /// Ask the writer thread to flush and exit.
    pub fn shutdown(&self) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(LoggerMsg::Shutdown);
        }
    }
}

// ──────────────────── spawn ────────────────────

/// Options for building the activity logger.
pub struct ActivityLoggerConfig {
    pub jsonl_config: JsonlConfig,
    pub channel_capacity: usize,
}

impl Default for ActivityLoggerConfig {
    fn default() -> Self {
        Self {
            jsonl_config: JsonlConfig::default(),
            channel_capacity: 256,
        }
    }
}

/// Spawn the writer thread and return a handle.
///
/// The thread runs until `handle.shutdown()` is called or all handles drop.
pub fn spawn_logger(
    config: ActivityLoggerConfig,
) -> Result<(ActivityLoggerHandle, thread::JoinHandle<()>)> {
    let (tx, rx) = bounded::<LoggerMsg>(config.channel_capacity.max(1));
    let dropped = Arc::new(AtomicU64::new(0));
    let dropped_clone = Arc::clone(&dropped);

    let handle = ActivityLoggerHandle {
        tx: Some(tx),
        dropped_events: dropped,
        tail: Arc::new(Mutex::new(VecDeque::with_capacity(TAIL_CAPACITY))),
    };

    let join = thread::Builder::new()
        .name("calm-logger".to_string())
        .spawn(move || logger_thread_main(&rx, config.jsonl_config, &dropped_clone))
        .map_err(|e| CalmError::Runtime {
            details: format!("failed to spawn logger thread: {e}"),
        })?;

    Ok((handle, join))
}

fn logger_thread_main(rx: &Receiver<LoggerMsg>, jsonl_config: JsonlConfig, dropped: &AtomicU64) {
    let mut jsonl = JsonlWriter::open(jsonl_config);

    while let Ok(msg) = rx.recv() {
        let d = dropped.swap(0, Ordering::Relaxed);
        if d > 0 {
            let mut warn = LogEntry::new(EventType::Error, Severity::Warning);
            warn.details = Some(format!("{d} log events dropped due to back-pressure"));
            jsonl.write_entry(&warn);
        }

        match msg {
            LoggerMsg::Entry(entry) => jsonl.write_entry(&entry),
            LoggerMsg::Shutdown => break,
        }
    }

    jsonl.flush();
}

// ──────────────────── event conversion ────────────────────

#[allow(clippy::too_many_lines, clippy::cast_possible_truncation)]
fn event_to_log_entry(event: &ActivityEvent) -> LogEntry {
    match event {
        ActivityEvent::SessionStarted {
            version,
            config_hash,
        } => {
            let mut e = LogEntry::new(EventType::SessionStart, Severity::Info);
            e.details = Some(format!("version={version} config_hash={config_hash}"));
            e.ok = Some(true);
            e
        }
        ActivityEvent::SessionStopped { reason } => {
            let mut e = LogEntry::new(EventType::SessionStop, Severity::Info);
            e.details = Some(format!("reason={reason}"));
            e.ok = Some(true);
            e
        }
        ActivityEvent::OverlayOpened { direct } => {
            let mut e = LogEntry::new(EventType::OverlayOpen, Severity::Info);
            if *direct {
                e.details = Some("entry=body_scan".to_string());
            }
            e
        }
        ActivityEvent::OverlayClosed => LogEntry::new(EventType::OverlayClose, Severity::Info),
        ActivityEvent::ScreenChanged { screen } => {
            let mut e = LogEntry::new(EventType::ScreenChange, Severity::Info);
            e.screen = Some((*screen).to_string());
            e
        }
        ActivityEvent::ChoiceRouted { tag, screen } => {
            let mut e = LogEntry::new(EventType::ChoiceRouted, Severity::Info);
            e.subject = Some(tag.clone());
            e.screen = screen.map(str::to_string);
            e.ok = Some(screen.is_some());
            e
        }
        ActivityEvent::BodyScan { stage, step, at } => {
            let mut e = LogEntry::new(EventType::BodyScan, Severity::Info);
            e.details = Some((*stage).to_string());
            e.step = Some(*step as u32);
            e.clock_ms = Some(at.as_millis() as u64);
            e
        }
        ActivityEvent::Breathing { stage, cycle, at } => {
            let mut e = LogEntry::new(EventType::Breathing, Severity::Info);
            e.details = Some((*stage).to_string());
            e.step = Some(*cycle as u32);
            e.clock_ms = Some(at.as_millis() as u64);
            e
        }
        ActivityEvent::Grounding { step, finished } => {
            let mut e = LogEntry::new(EventType::Grounding, Severity::Info);
            e.step = Some(*step as u32);
            if *finished {
                e.details = Some("finished".to_string());
            }
            e
        }
        ActivityEvent::WidgetInit {
            widget,
            outcome,
            ok,
        } => {
            let severity = if *ok {
                Severity::Info
            } else {
                Severity::Warning
            };
            let mut e = LogEntry::new(EventType::WidgetInit, severity);
            e.subject = Some((*widget).to_string());
            e.details = Some(outcome.clone());
            e.ok = Some(*ok);
            e
        }
        ActivityEvent::QuizProgress { question_index } => {
            let mut e = LogEntry::new(EventType::QuizProgress, Severity::Info);
            e.step = Some(*question_index as u32);
            e
        }
        ActivityEvent::Error { code, message } => {
            let mut e = LogEntry::new(EventType::Error, Severity::Critical);
            e.error_code = Some(code.clone());
            e.error_message = Some(message.clone());
            e.ok = Some(false);
            e
        }
    }
}
