//! Scenario scripts: replay actions and clock advances against a controller.
//!
//! One step per line. Blank lines and `#` comments are skipped. A step is
//! either an action name as accepted by [`SosAction`]'s `FromStr`, or
//! `wait <duration>` with a `ms`, `s` or `m` suffix:
//!
//! ```text
//! open
//! choice:disconnect
//! start-body-scan
//! wait 8s
//! toggle-pause
//! ```

use std::time::Duration;

use serde::Serialize;

use crate::core::errors::{CalmError, Result};
use crate::page::Page;

use super::controller::{SosAction, SosController, TimerTask};
use super::scheduler::Scheduler;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    Action(SosAction),
    Wait(Duration),
}

impl ScriptStep {
    fn describe(&self) -> String {
        match self {
            Self::Action(action) => action.to_string(),
            Self::Wait(d) => format!("wait {}ms", d.as_millis()),
        }
    }
}

/// Parse a whole script, reporting the first bad line (1-based).
pub fn parse_script(source: &str) -> Result<Vec<ScriptStep>> {
    let mut steps = Vec::new();
    for (idx, raw) in source.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        steps.push(parse_step(line).map_err(|err| CalmError::Scenario {
            line: idx + 1,
            details: err.to_string(),
        })?);
    }
    Ok(steps)
}

fn parse_step(line: &str) -> Result<ScriptStep> {
    if let Some(rest) = line
        .strip_prefix("wait ")
        .or_else(|| line.strip_prefix("wait:"))
    {
        return parse_duration(rest.trim()).map(ScriptStep::Wait);
    }
    line.parse().map(ScriptStep::Action)
}

/// Parse `250ms`, `4s`, `1.5s` or `2m`.
pub fn parse_duration(raw: &str) -> Result<Duration> {
    let invalid = |details: String| CalmError::InvalidInput {
        field: "duration",
        details,
    };
    let (number, unit_ms) = if let Some(n) = raw.strip_suffix("ms") {
        (n, 1.0)
    } else if let Some(n) = raw.strip_suffix('s') {
        (n, 1_000.0)
    } else if let Some(n) = raw.strip_suffix('m') {
        (n, 60_000.0)
    } else {
        return Err(invalid(format!("{raw:?} needs a ms, s or m suffix")));
    };
    let value: f64 = number
        .trim()
        .parse()
        .map_err(|_| invalid(format!("{raw:?} is not a number")))?;
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(format!("{raw:?} must be a non-negative number")));
    }
    Duration::try_from_secs_f64(value * unit_ms / 1_000.0)
        .map_err(|_| invalid(format!("{raw:?} is too large")))
}

/// Controller state after one script step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceRecord {
    pub clock_ms: u64,
    pub step: String,
    pub screen: &'static str,
    pub overlay: &'static str,
    pub body_scan_step: Option<usize>,
    pub body_scan_paused: bool,
    pub breathing_cycles: Option<usize>,
    pub grounding_step: usize,
    /// Deferred tasks that fired during this step.
    pub fired: usize,
}

/// Run every step in order and record the state after each.
pub fn run_script<P, S>(ctl: &mut SosController<P, S>, steps: &[ScriptStep]) -> Vec<TraceRecord>
where
    P: Page,
    S: Scheduler<TimerTask>,
{
    steps
        .iter()
        .map(|step| {
            let fired = match step {
                ScriptStep::Action(action) => {
                    ctl.dispatch(action.clone());
                    0
                }
                ScriptStep::Wait(by) => ctl.advance(*by),
            };
            trace(ctl, step.describe(), fired)
        })
        .collect()
}

fn trace<P, S>(ctl: &SosController<P, S>, step: String, fired: usize) -> TraceRecord
where
    P: Page,
    S: Scheduler<TimerTask>,
{
    let state = ctl.state();
    TraceRecord {
        clock_ms: u64::try_from(ctl.now().as_millis()).unwrap_or(u64::MAX),
        step,
        screen: state.screen.id(),
        overlay: state.overlay.phase.label(),
        body_scan_step: state.body_scan.active.then_some(state.body_scan.step),
        body_scan_paused: state.body_scan.paused,
        breathing_cycles: (state.breathing.breathing || state.breathing.finished())
            .then_some(state.breathing.cycles),
        grounding_step: state.grounding.step,
        fired,
    }
}
