//! Self-help tools: anxiety mini-test, mental-load checklist, the ambient
//! breathing prompt and the open/close toggles around them.

use std::time::Duration;

use serde::Serialize;

use crate::core::errors::{CalmError, Result};
use crate::page::Page;

use super::regions::{
    ACTIVE, ANXIETY_OPTION_GROUP, ANXIETY_RESULT, ANXIETY_RESULT_TEXT, CHECK_ITEM_GROUP, LOAD_BAR,
    LOAD_TEXT, SELECTED, TOOL_BREATHE_TEXT, TOOL_TOGGLES,
};
use super::{Widget, WidgetStatus, require_regions};

/// Mental-load checklist items.
pub const LOAD_ITEMS: [&str; 6] = [
    "Duermo menos de 6 horas",
    "Tengo pendientes acumulados",
    "Me cuesta desconectarme del trabajo",
    "Cuido a otras personas sin ayuda",
    "Siento que no tengo tiempo para mí",
    "Me irrito con facilidad",
];

pub const ANXIETY_QUESTIONS: usize = 2;
pub const ANXIETY_MAX_ANSWER: u8 = 3;

const CLOSE_LABEL: &str = "Cerrar Herramienta";
const TOGGLE_LABELS: [&str; 2] = ["Iniciar Mini Test", "Medir mi Carga"];

/// Ambient breathing loop: inhale at 0 s, hold at 4 s, exhale at 6 s, repeat
/// every 10 s.
const BREATH_PERIOD_MS: u128 = 10_000;

#[must_use]
pub fn breath_prompt(elapsed: Duration) -> &'static str {
    match elapsed.as_millis() % BREATH_PERIOD_MS {
        0..4_000 => "INHALA",
        4_000..6_000 => "RETÉN",
        _ => "EXHALA",
    }
}

#[must_use]
pub const fn anxiety_message(total: u8) -> &'static str {
    match total {
        0..=2 => "Síntomas leves. ¡Sigue cuidándote!",
        3..=4 => "Ansiedad moderada. Prueba la respiración abajo.",
        _ => "Síntomas elevados. Considera agendar una cita.",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadLevel {
    pub label: &'static str,
    pub color: &'static str,
}

#[must_use]
pub const fn load_level(active: usize) -> LoadLevel {
    match active {
        0 => LoadLevel {
            label: "Baja",
            color: "#10B981",
        },
        1..=2 => LoadLevel {
            label: "Manejable",
            color: "#10B981",
        },
        3..=4 => LoadLevel {
            label: "Elevada",
            color: "#F59E0B",
        },
        _ => LoadLevel {
            label: "Crítica",
            color: "#EF4444",
        },
    }
}

/// Bar fill for `active` of `total` items, as a CSS percentage.
#[must_use]
pub fn load_percent(active: usize, total: usize) -> String {
    if total == 0 {
        return "0%".to_string();
    }
    let pct = active as f64 / total as f64 * 100.0;
    let rounded = (pct * 100.0).round() / 100.0;
    format!("{rounded}%")
}

fn option_id(question: usize, value: u8) -> String {
    format!("anxiety-q{question}-v{value}")
}

#[derive(Debug, Default)]
pub struct Tools {
    wired: bool,
    anxiety: [Option<u8>; ANXIETY_QUESTIONS],
}

impl Tools {
    /// Open or close tool `index`; returns whether it is now open.
    pub fn toggle(&mut self, page: &mut dyn Page, index: usize) -> bool {
        let Some((button, content)) = TOOL_TOGGLES.get(index) else {
            return false;
        };
        let open = page.toggle_class(content, ACTIVE);
        let label = if open {
            CLOSE_LABEL
        } else {
            TOGGLE_LABELS.get(index).copied().unwrap_or_default()
        };
        page.set_text(button, label);
        open
    }

    /// Pick an answer for mini-test question 1 or 2. Returns the verdict once
    /// both are answered.
    pub fn select_anxiety(
        &mut self,
        page: &mut dyn Page,
        question: usize,
        value: u8,
    ) -> Result<Option<&'static str>> {
        if question == 0 || question > ANXIETY_QUESTIONS || value > ANXIETY_MAX_ANSWER {
            return Err(CalmError::InvalidInput {
                field: "anxiety",
                details: format!("question {question} value {value} is out of range"),
            });
        }
        for v in 0..=ANXIETY_MAX_ANSWER {
            page.remove_class(&option_id(question, v), SELECTED);
        }
        page.add_class(&option_id(question, value), SELECTED);
        self.anxiety[question - 1] = Some(value);

        let [Some(a), Some(b)] = self.anxiety else {
            return Ok(None);
        };
        let message = anxiety_message(a + b);
        page.set_style(ANXIETY_RESULT, "display", "block");
        page.set_text(ANXIETY_RESULT_TEXT, message);
        Ok(Some(message))
    }

    /// Flip one checklist item and refresh the load bar.
    pub fn toggle_load_item(&mut self, page: &mut dyn Page, index: usize) -> LoadLevel {
        let items = page.members(CHECK_ITEM_GROUP);
        if let Some(item) = items.get(index) {
            page.toggle_class(item, ACTIVE);
        }
        let active = page.members_with_class(CHECK_ITEM_GROUP, ACTIVE).len();
        let level = load_level(active);
        page.set_style(LOAD_BAR, "width", &load_percent(active, items.len()));
        page.set_text(LOAD_TEXT, level.label);
        page.set_style(LOAD_BAR, "background", level.color);
        level
    }

    /// Refresh the ambient breathing prompt for `elapsed` time on the page.
    pub fn render_breath(&self, page: &mut dyn Page, elapsed: Duration) {
        page.set_text(TOOL_BREATHE_TEXT, breath_prompt(elapsed));
    }
}

impl Widget for Tools {
    fn name(&self) -> &'static str {
        "tools"
    }

    fn init(&mut self, page: &mut dyn Page) -> Result<WidgetStatus> {
        if let Some(skip) = require_regions(page, &[TOOL_TOGGLES[0].0, TOOL_TOGGLES[0].1]) {
            return Ok(skip);
        }
        if self.wired {
            return Ok(WidgetStatus::Ready);
        }
        if page.members(ANXIETY_OPTION_GROUP).is_empty() {
            return Err(CalmError::WidgetInit {
                widget: "tools",
                details: "mini-test has no answer options".to_string(),
            });
        }
        self.render_breath(page, Duration::ZERO);
        self.wired = true;
        Ok(WidgetStatus::Ready)
    }
}
