//! 5-4-3-2-1 sensory grounding walk.

use crate::logger::activity::ActivityEvent;
use crate::page::Page;

use super::controller::{SosController, TimerTask};
use super::regions;
use super::scheduler::Scheduler;
use super::screen::Screen;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroundingStep {
    pub icon: &'static str,
    pub title: &'static str,
    pub text: &'static str,
    /// Title colour, CSS hex.
    pub color: &'static str,
}

pub const GROUNDING_STEPS: [GroundingStep; 5] = [
    GroundingStep {
        icon: "👁️",
        title: "Vista",
        text: "Encuentra 5 cosas de color azul",
        color: "#3B82F6",
    },
    GroundingStep {
        icon: "✋",
        title: "Tacto",
        text: "Toca 4 cosas con texturas diferentes",
        color: "#F59E0B",
    },
    GroundingStep {
        icon: "👂",
        title: "Oído",
        text: "Identifica 3 sonidos lejanos",
        color: "#10B981",
    },
    GroundingStep {
        icon: "👃",
        title: "Olfato",
        text: "Identifica 2 olores",
        color: "#EC4899",
    },
    GroundingStep {
        icon: "❤️",
        title: "Emoción",
        text: "Di 1 cosa buena sobre ti",
        color: "#8B5CF6",
    },
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroundingState {
    /// Current prompt; `GROUNDING_STEPS.len()` once finished.
    pub step: usize,
}

impl GroundingState {
    #[must_use]
    pub const fn finished(&self) -> bool {
        self.step >= GROUNDING_STEPS.len()
    }
}

impl<P, S> SosController<P, S>
where
    P: Page,
    S: Scheduler<TimerTask>,
{
    pub fn start_grounding(&mut self) {
        self.show(Screen::Grounding);
        self.state.grounding.step = 0;
        self.render_grounding();
    }

    /// Advance one prompt, or move to the final screen after the last one.
    /// Ignored once the walk has finished.
    pub fn next_grounding(&mut self) {
        if self.state.grounding.finished() {
            return;
        }
        self.state.grounding.step += 1;
        if self.state.grounding.finished() {
            self.emit(ActivityEvent::Grounding {
                step: self.state.grounding.step,
                finished: true,
            });
            self.show(Screen::Final);
        } else {
            self.render_grounding();
        }
    }

    fn render_grounding(&mut self) {
        let step = self.state.grounding.step;
        let Some(prompt) = GROUNDING_STEPS.get(step) else {
            return;
        };
        // Restart the entrance animation.
        self.page
            .remove_class(regions::GROUNDING_ICON, regions::FADE_IN);
        self.page.set_text(regions::GROUNDING_ICON, prompt.icon);
        self.page.set_text(regions::GROUNDING_TITLE, prompt.title);
        self.page.set_text(regions::GROUNDING_TEXT, prompt.text);
        self.page
            .set_style(regions::GROUNDING_TITLE, "color", prompt.color);
        for (i, dot) in self
            .page
            .members(regions::GROUNDING_DOT_GROUP)
            .iter()
            .enumerate()
        {
            if i <= step {
                self.page.add_class(dot, regions::ACTIVE);
            } else {
                self.page.remove_class(dot, regions::ACTIVE);
            }
        }
        self.page.add_class(regions::GROUNDING_ICON, regions::FADE_IN);
        self.emit(ActivityEvent::Grounding {
            step,
            finished: false,
        });
    }
}
