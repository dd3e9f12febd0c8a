//! Read-more modals and the shared show/hide helpers for overlay cards.
//!
//! Modals switch immediately: no enter or exit transition is scheduled.

use crate::core::errors::Result;
use crate::page::Page;
use crate::sos::regions::BODY;

use super::regions::{
    ACTIVE, CLOSE_MODAL_GROUP, EMOTION_OVERLAY, MODAL_OVERLAY_GROUP, MODAL_PREFIX,
    READ_MORE_GROUP, READ_MORE_PREFIX,
};
use super::{Widget, WidgetStatus};

/// Display an overlay card and lock page scrolling.
pub fn show(page: &mut dyn Page, id: &str) {
    if !page.contains(id) {
        return;
    }
    page.set_style(id, "display", "flex");
    page.add_class(id, ACTIVE);
    page.set_style(BODY, "overflow", "hidden");
}

/// Hide an overlay card and restore page scrolling.
pub fn hide(page: &mut dyn Page, id: &str) {
    if !page.contains(id) {
        return;
    }
    page.remove_class(id, ACTIVE);
    page.set_style(id, "display", "none");
    page.set_style(BODY, "overflow", "auto");
}

fn is_visible(page: &dyn Page, id: &str) -> bool {
    page.style(id, "display").is_some_and(|d| d != "none")
}

/// Modal id targeted by a read-more trigger.
#[must_use]
pub fn modal_target(trigger: &str) -> Option<String> {
    trigger
        .strip_prefix(READ_MORE_PREFIX)
        .map(|name| format!("{MODAL_PREFIX}{name}"))
}

#[derive(Debug, Default)]
pub struct Modals {
    wired: bool,
}

impl Modals {
    /// Read-more click: open the modal the trigger points at.
    pub fn open_from_trigger(&mut self, page: &mut dyn Page, trigger: &str) -> Option<String> {
        let target = modal_target(trigger).filter(|id| page.contains(id))?;
        show(page, &target);
        Some(target)
    }

    /// Close-button click: close the card the button belongs to.
    pub fn close_from_button(&mut self, page: &mut dyn Page, button: &str) {
        if let Some(modal) = button.strip_suffix("-close") {
            hide(page, modal);
        }
    }

    /// Keyboard escape: close every visible modal and the emotion card.
    /// Returns how many were closed.
    pub fn escape(&mut self, page: &mut dyn Page) -> usize {
        let mut closed = 0;
        for id in page.members(MODAL_OVERLAY_GROUP) {
            if is_visible(page, &id) {
                hide(page, &id);
                closed += 1;
            }
        }
        if page.has_class(EMOTION_OVERLAY, ACTIVE) {
            hide(page, EMOTION_OVERLAY);
            closed += 1;
        }
        page.set_style(BODY, "overflow", "auto");
        closed
    }
}

impl Widget for Modals {
    fn name(&self) -> &'static str {
        "modals"
    }

    fn init(&mut self, page: &mut dyn Page) -> Result<WidgetStatus> {
        if page.members(READ_MORE_GROUP).is_empty() && page.members(CLOSE_MODAL_GROUP).is_empty()
        {
            return Ok(WidgetStatus::Skipped(
                "no read-more triggers or close buttons".to_string(),
            ));
        }
        if self.wired {
            return Ok(WidgetStatus::Ready);
        }
        self.wired = true;
        Ok(WidgetStatus::Ready)
    }
}
