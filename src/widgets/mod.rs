//! Site widgets: small page models initialised by a failure-isolating
//! bootstrapper.
//!
//! Each widget binds to its regions in [`Widget::init`]. A widget whose regions
//! are missing reports [`WidgetStatus::Skipped`]; one that fails returns a
//! [`CalmError`]. [`init_all`] records every outcome, logs failures and keeps
//! going, so one broken widget never takes the others down.

pub mod accordion;
pub mod emotions;
pub mod jar;
pub mod modal;
pub mod quiz;
pub mod regions;
pub mod roi;
pub mod tools;

use serde::Serialize;

use crate::core::errors::{CalmError, Result};
use crate::core::progress_store::QuizProgressStore;
use crate::logger::activity::{ActivityEvent, ActivityLoggerHandle};
use crate::page::Page;

pub use accordion::Accordion;
pub use emotions::Emotions;
pub use jar::Jar;
pub use modal::Modals;
pub use quiz::Quiz;
pub use roi::Roi;
pub use tools::Tools;

/// Result of a successful [`Widget::init`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetStatus {
    Ready,
    /// Required regions are absent; nothing was wired.
    Skipped(String),
}

pub trait Widget {
    fn name(&self) -> &'static str;

    /// Bind to the page. Calling it again on a wired widget is a no-op.
    fn init(&mut self, page: &mut dyn Page) -> Result<WidgetStatus>;
}

/// Per-widget outcome recorded by [`init_all`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InitOutcome {
    Ready,
    Skipped { reason: String },
    Failed { code: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InitRecord {
    pub widget: &'static str,
    #[serde(flatten)]
    pub outcome: InitOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InitReport {
    pub records: Vec<InitRecord>,
}

impl InitReport {
    #[must_use]
    pub fn ready(&self) -> usize {
        self.count(|o| matches!(o, InitOutcome::Ready))
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, InitOutcome::Skipped { .. }))
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, InitOutcome::Failed { .. }))
    }

    #[must_use]
    pub fn outcome(&self, widget: &str) -> Option<&InitOutcome> {
        self.records
            .iter()
            .find(|r| r.widget == widget)
            .map(|r| &r.outcome)
    }

    fn count(&self, pred: impl Fn(&InitOutcome) -> bool) -> usize {
        self.records.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// Initialise every widget in order, isolating failures.
pub fn init_all(
    page: &mut dyn Page,
    widgets: &mut [&mut dyn Widget],
    logger: Option<&ActivityLoggerHandle>,
) -> InitReport {
    let mut report = InitReport::default();
    for widget in widgets.iter_mut() {
        let name = widget.name();
        let outcome = match widget.init(page) {
            Ok(WidgetStatus::Ready) => InitOutcome::Ready,
            Ok(WidgetStatus::Skipped(reason)) => InitOutcome::Skipped { reason },
            Err(err) => {
                eprintln!("[{}] widget {name} disabled: {err}", err.code());
                if let Some(logger) = logger {
                    logger.send(ActivityEvent::Error {
                        code: err.code().to_string(),
                        message: err.to_string(),
                    });
                }
                InitOutcome::Failed {
                    code: err.code().to_string(),
                    message: err.to_string(),
                }
            }
        };
        if let Some(logger) = logger {
            let (label, ok) = match &outcome {
                InitOutcome::Ready => ("ready".to_string(), true),
                InitOutcome::Skipped { reason } => (format!("skipped: {reason}"), true),
                InitOutcome::Failed { code, .. } => (format!("failed: {code}"), false),
            };
            logger.send(ActivityEvent::WidgetInit {
                widget: name,
                outcome: label,
                ok,
            });
        }
        report.records.push(InitRecord {
            widget: name,
            outcome,
        });
    }
    report
}

/// Return `Skipped` from the enclosing `init` unless every id is present.
pub(crate) fn require_regions(page: &dyn Page, ids: &[&str]) -> Option<WidgetStatus> {
    let missing: Vec<&str> = ids.iter().copied().filter(|id| !page.contains(id)).collect();
    if missing.is_empty() {
        None
    } else {
        Some(WidgetStatus::Skipped(format!(
            "missing region(s): {}",
            missing.join(", ")
        )))
    }
}

pub(crate) fn widget_error(widget: &'static str, err: &CalmError) -> CalmError {
    CalmError::WidgetInit {
        widget,
        details: err.to_string(),
    }
}

/// Every site widget, in bootstrap order.
pub struct Site {
    pub accordion: Accordion,
    pub roi: Roi,
    pub quiz: Quiz,
    pub tools: Tools,
    pub jar: Jar,
    pub emotions: Emotions,
    pub modals: Modals,
}

impl Site {
    #[must_use]
    pub fn new(progress: QuizProgressStore) -> Self {
        Self {
            accordion: Accordion::default(),
            roi: Roi::default(),
            quiz: Quiz::new(progress),
            tools: Tools::default(),
            jar: Jar::default(),
            emotions: Emotions::default(),
            modals: Modals::default(),
        }
    }

    pub fn init(
        &mut self,
        page: &mut dyn Page,
        logger: Option<&ActivityLoggerHandle>,
    ) -> InitReport {
        init_all(
            page,
            &mut [
                &mut self.accordion,
                &mut self.roi,
                &mut self.quiz,
                &mut self.tools,
                &mut self.jar,
                &mut self.emotions,
                &mut self.modals,
            ],
            logger,
        )
    }
}
