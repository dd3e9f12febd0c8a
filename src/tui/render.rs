//! Frame rendering: page state → styled lines → crossterm output.
//!
//! [`compose`] is pure so frames can be asserted in tests; [`draw`] only
//! positions and colours the lines it is given.

#![allow(missing_docs)]
#![allow(clippy::cast_possible_truncation)]

use std::io::{self, Write};
use std::time::Duration;

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};

use crate::page::Page;
use crate::sos::body_scan::BODY_PARTS;
use crate::sos::regions;
use crate::sos::{OverlayPhase, Screen, SosState};

use super::input::help_bindings;
use super::screens::{self, MenuItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Header,
    Title,
    Muted,
    Accent,
    Alert,
}

impl Tone {
    const fn color(self) -> Color {
        match self {
            Self::Plain => Color::White,
            Self::Header => Color::Cyan,
            Self::Title => Color::Magenta,
            Self::Muted => Color::DarkGrey,
            Self::Accent => Color::Green,
            Self::Alert => Color::Yellow,
        }
    }

    const fn bold(self) -> bool {
        matches!(self, Self::Header | Self::Title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub tone: Tone,
}

impl Line {
    fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    fn blank() -> Self {
        Self::new(Tone::Plain, "")
    }
}

/// Everything one frame needs.
pub struct FrameInput<'a> {
    pub state: &'a SosState,
    pub page: &'a dyn Page,
    pub menu: &'a [MenuItem],
    pub now: Duration,
    /// Most recent activity-log line, if any.
    pub status: Option<String>,
}

// ──────────────────── composition ────────────────────

#[must_use]
pub fn compose(frame: &FrameInput<'_>) -> Vec<Line> {
    let phase = frame.state.overlay.phase;
    let mut lines = vec![
        Line::new(
            Tone::Header,
            format!(
                " calmkit SOS  [{}]  t={:.1}s",
                phase.label(),
                frame.now.as_secs_f64()
            ),
        ),
        Line::blank(),
    ];

    if phase == OverlayPhase::Hidden {
        lines.push(Line::new(
            Tone::Plain,
            "  Si necesitas apoyo ahora mismo, abre el modo SOS.",
        ));
    } else {
        compose_screen(frame, &mut lines);
    }

    lines.push(Line::blank());
    let hints: Vec<String> = help_bindings(phase)
        .iter()
        .map(|b| format!("[{}] {}", b.keys, b.description))
        .collect();
    lines.push(Line::new(Tone::Muted, format!("  {}", hints.join("  "))));
    if let Some(status) = &frame.status {
        lines.push(Line::new(Tone::Muted, format!("  {status}")));
    }
    lines
}

fn compose_screen(frame: &FrameInput<'_>, lines: &mut Vec<Line>) {
    let screen = frame.state.screen;
    let copy = screens::copy(screen);
    lines.push(Line::new(Tone::Title, format!("  {}", copy.title)));
    for text in copy.lines {
        lines.push(Line::new(Tone::Plain, format!("  {text}")));
    }

    match screen {
        Screen::BodyScanActive => compose_body_scan(frame, lines),
        Screen::SuicideBreathing => compose_breathing(frame.page, lines),
        Screen::Grounding => compose_grounding(frame.page, lines),
        _ => {}
    }

    lines.push(Line::blank());
    for item in frame.menu {
        lines.push(Line::new(
            Tone::Accent,
            format!("  [{}] {}", item.key, item.label),
        ));
    }
}

fn compose_body_scan(frame: &FrameInput<'_>, lines: &mut Vec<Line>) {
    let page = frame.page;
    lines.push(Line::blank());
    for part in &BODY_PARTS {
        let mark = if page.has_class(part.id, regions::FILL_ACTIVE) {
            "▓ tensa"
        } else if page.has_class(part.id, regions::FILL_RELAX) {
            "░ suelta"
        } else {
            "·"
        };
        lines.push(Line::new(Tone::Plain, format!("    {:<18} {mark}", part.label)));
    }
    lines.push(Line::new(
        Tone::Muted,
        format!("    {}", dot_row(page, regions::BODY_SCAN_DOT_GROUP)),
    ));
    let instruction = page.text(regions::BODY_SCAN_INSTRUCTION).unwrap_or_default();
    let tone = if frame.state.body_scan.paused {
        Tone::Alert
    } else {
        Tone::Plain
    };
    lines.push(Line::new(tone, format!("  {instruction}")));
}

fn compose_breathing(page: &dyn Page, lines: &mut Vec<Line>) {
    lines.push(Line::blank());
    let prompt = page.text(regions::BREATHE_TEXT).unwrap_or_default();
    let timer = page.text(regions::BREATHE_TIMER_TEXT).unwrap_or_default();
    lines.push(Line::new(Tone::Alert, format!("      ( {prompt} )")));
    lines.push(Line::new(Tone::Plain, format!("  {timer}")));
    lines.push(Line::new(
        Tone::Muted,
        format!("    {}", dot_row(page, regions::BREATH_DOT_GROUP)),
    ));
}

fn compose_grounding(page: &dyn Page, lines: &mut Vec<Line>) {
    lines.push(Line::blank());
    let icon = page.text(regions::GROUNDING_ICON).unwrap_or_default();
    let title = page.text(regions::GROUNDING_TITLE).unwrap_or_default();
    let text = page.text(regions::GROUNDING_TEXT).unwrap_or_default();
    lines.push(Line::new(Tone::Alert, format!("  {icon} {title}")));
    lines.push(Line::new(Tone::Plain, format!("  {text}")));
    lines.push(Line::new(
        Tone::Muted,
        format!("    {}", dot_row(page, regions::GROUNDING_DOT_GROUP)),
    ));
}

/// `●` for dots marked active or completed, `○` otherwise.
#[must_use]
pub fn dot_row(page: &dyn Page, group: &str) -> String {
    page.members(group)
        .iter()
        .map(|dot| {
            if page.has_class(dot, regions::ACTIVE) || page.has_class(dot, regions::COMPLETED) {
                "●"
            } else {
                "○"
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ──────────────────── output ────────────────────

/// Clear the screen and write `lines` top to bottom, clipped to `rows`.
pub fn draw<W: Write>(out: &mut W, lines: &[Line], rows: u16, color: bool) -> io::Result<()> {
    queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;
    for (row, line) in lines.iter().take(usize::from(rows)).enumerate() {
        queue!(out, MoveTo(0, row as u16))?;
        if color {
            queue!(out, SetForegroundColor(line.tone.color()))?;
            if line.tone.bold() {
                queue!(out, SetAttribute(Attribute::Bold))?;
            }
        }
        queue!(out, Print(&line.text))?;
        if color {
            queue!(out, SetAttribute(Attribute::Reset))?;
        }
    }
    out.flush()
}

// ──────────────────── tests ────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::TimingConfig;
    use crate::page::MemoryPage;
    use crate::page::layout::sos_overlay_page;
    use crate::sos::{SosAction, SosController, TimerTask, VirtualClock};

    type Ctl = SosController<MemoryPage, VirtualClock<TimerTask>>;

    fn controller() -> Ctl {
        SosController::new(sos_overlay_page(), VirtualClock::new(), TimingConfig::default())
    }

    fn frame_text(ctl: &Ctl) -> Vec<String> {
        let menu = screens::menu(ctl.state(), ctl.page());
        let input = FrameInput {
            state: ctl.state(),
            page: ctl.page(),
            menu: &menu,
            now: ctl.now(),
            status: None,
        };
        compose(&input).into_iter().map(|l| l.text).collect()
    }

    #[test]
    fn hidden_overlay_shows_open_hint() {
        let ctl = controller();
        let text = frame_text(&ctl);
        assert!(text[0].contains("[hidden]"));
        assert!(text.iter().any(|l| l.contains("[o] abrir SOS")));
    }

    #[test]
    fn entry_screen_lists_triage_options() {
        let mut ctl = controller();
        ctl.dispatch(SosAction::Open);
        let text = frame_text(&ctl);
        assert!(text.iter().any(|l| l.contains("Estás a salvo aquí")));
        assert!(text.iter().any(|l| l.contains("[1] Tengo pensamientos")));
    }

    #[test]
    fn body_scan_frame_marks_tensed_region() {
        let mut ctl = controller();
        ctl.dispatch(SosAction::Open);
        ctl.dispatch(SosAction::StartBodyScan);
        let text = frame_text(&ctl);
        assert!(text.iter().any(|l| l.contains("▓ tensa")));
        assert!(text.iter().any(|l| l.contains("● ○ ○ ○ ○")));
    }

    #[test]
    fn breathing_frame_shows_prompt_and_dots() {
        let mut ctl = controller();
        ctl.dispatch(SosAction::Open);
        ctl.dispatch(SosAction::StartBreathing);
        let text = frame_text(&ctl);
        let prompt = ctl.page().text(regions::BREATHE_TEXT).unwrap();
        assert!(text.iter().any(|l| l.contains(&prompt)));
        assert!(text.iter().any(|l| l.contains("[s] Detener")));
    }

    #[test]
    fn draw_writes_every_line() {
        let lines = vec![
            Line::new(Tone::Header, "uno"),
            Line::new(Tone::Plain, "dos"),
        ];
        let mut out = Vec::new();
        draw(&mut out, &lines, 24, false).unwrap();
        let raw = String::from_utf8(out).unwrap();
        assert!(raw.contains("uno"));
        assert!(raw.contains("dos"));
    }

    #[test]
    fn draw_clips_to_rows() {
        let lines: Vec<Line> = (0..10)
            .map(|i| Line::new(Tone::Plain, format!("row-{i}")))
            .collect();
        let mut out = Vec::new();
        draw(&mut out, &lines, 3, true).unwrap();
        let raw = String::from_utf8(out).unwrap();
        assert!(raw.contains("row-2"));
        assert!(!raw.contains("row-3"));
    }
}
