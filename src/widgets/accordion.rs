//! FAQ accordion: one open answer per category.

use crate::core::errors::Result;
use crate::page::Page;

use super::regions::{ACTIVE, FAQ_QUESTION_GROUP, OPEN};
use super::{Widget, WidgetStatus};

const QUESTION_PREFIX: &str = "faq-q-";
const ANSWER_PREFIX: &str = "faq-a-";

/// Answer region paired with a question region.
#[must_use]
pub fn answer_for(question: &str) -> Option<String> {
    question
        .strip_prefix(QUESTION_PREFIX)
        .map(|n| format!("{ANSWER_PREFIX}{n}"))
}

#[derive(Debug, Default)]
pub struct Accordion {
    wired: bool,
}

impl Accordion {
    /// Open `question` (closing its open siblings), or close it if open.
    /// Returns whether it is now expanded.
    pub fn toggle(&mut self, page: &mut dyn Page, question: &str) -> bool {
        if !page.contains(question) {
            return false;
        }
        let category = page.parent(question);
        for other in page.members_with_class(FAQ_QUESTION_GROUP, ACTIVE) {
            if other != question && page.parent(&other) == category {
                set_expanded(page, &other, false);
            }
        }
        let expand = !page.has_class(question, ACTIVE);
        set_expanded(page, question, expand);
        expand
    }

    /// Questions currently expanded, in document order.
    #[must_use]
    pub fn expanded(&self, page: &dyn Page) -> Vec<String> {
        page.members_with_class(FAQ_QUESTION_GROUP, ACTIVE)
    }
}

fn set_expanded(page: &mut dyn Page, question: &str, expanded: bool) {
    if expanded {
        page.add_class(question, ACTIVE);
    } else {
        page.remove_class(question, ACTIVE);
    }
    if let Some(answer) = answer_for(question) {
        if expanded {
            page.add_class(&answer, OPEN);
            page.set_style(&answer, "max-height", "none");
        } else {
            page.remove_class(&answer, OPEN);
            page.set_style(&answer, "max-height", "0");
        }
    }
}

impl Widget for Accordion {
    fn name(&self) -> &'static str {
        "accordion"
    }

    fn init(&mut self, page: &mut dyn Page) -> Result<WidgetStatus> {
        let questions = page.members(FAQ_QUESTION_GROUP);
        if questions.is_empty() {
            return Ok(WidgetStatus::Skipped("no FAQ questions".to_string()));
        }
        if !self.wired {
            for q in &questions {
                set_expanded(page, q, false);
            }
            self.wired = true;
        }
        Ok(WidgetStatus::Ready)
    }
}
