//! Emotion wheel: one bubble per emotion, each opening a card with a tip.

use serde::Serialize;

use crate::core::errors::Result;
use crate::page::Page;

use super::modal;
use super::regions::{
    BUBBLES_CONTAINER, EMOTION_BUBBLE_GROUP, EMOTION_DESC, EMOTION_HEADER, EMOTION_ICON,
    EMOTION_OVERLAY, EMOTION_TIP, EMOTION_TITLE,
};
use super::{Widget, WidgetStatus, require_regions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Emotion {
    pub name: &'static str,
    pub emoji: &'static str,
    /// Bubble size class.
    pub size: &'static str,
    pub gradient: &'static str,
    pub description: &'static str,
    pub tip: &'static str,
}

pub const EMOTIONS: [Emotion; 6] = [
    Emotion {
        name: "Enojo",
        emoji: "😡",
        size: "bubble-lg",
        gradient: "linear-gradient(135deg, #EF4444, #B91C1C)",
        description: "Una respuesta natural ante la injusticia o límites cruzados.",
        tip: "No reacciones de inmediato. Respira 10 veces. Pregúntate: ¿Qué límite se vulneró?",
    },
    Emotion {
        name: "Tristeza",
        emoji: "😢",
        size: "bubble-md",
        gradient: "linear-gradient(135deg, #3B82F6, #1D4ED8)",
        description: "Tu mente procesando una pérdida o un cambio necesario.",
        tip: "Permítete llorar. La tristeza necesita ser sentida para evaporarse.",
    },
    Emotion {
        name: "Ansiedad",
        emoji: "😰",
        size: "bubble-lg",
        gradient: "linear-gradient(135deg, #A855F7, #7E22CE)",
        description: "Tu sistema intentando protegerte de un futuro incierto.",
        tip: "Nombra 3 cosas que ves, 2 que tocas y 1 que hueles para volver al presente.",
    },
    Emotion {
        name: "Calma",
        emoji: "😌",
        size: "bubble-sm",
        gradient: "linear-gradient(135deg, #10B981, #047857)",
        description: "El estado de equilibrio donde tu sistema nervioso descansa.",
        tip: "Disfruta este momento. Intenta guardarlo como un \"lugar seguro\".",
    },
    Emotion {
        name: "Agotado",
        emoji: "😫",
        size: "bubble-md",
        gradient: "linear-gradient(135deg, #F59E0B, #B45309)",
        description: "Señal física y mental de que has dado demasiado.",
        tip: "Hoy haz lo mínimo indispensable y permítete dormir temprano.",
    },
    Emotion {
        name: "Confusión",
        emoji: "🌀",
        size: "bubble-sm",
        gradient: "linear-gradient(135deg, #64748B, #334155)",
        description: "Cuando hay muchas opciones o emociones mezcladas.",
        tip: "Escribe todo lo que sientes sin filtro para ordenar tu mente.",
    },
];

/// Case-insensitive lookup by name.
#[must_use]
pub fn find(name: &str) -> Option<&'static Emotion> {
    EMOTIONS
        .iter()
        .find(|e| e.name.to_lowercase() == name.trim().to_lowercase())
}

fn bubble_id(index: usize) -> String {
    format!("{EMOTION_BUBBLE_GROUP}-{index}")
}

#[derive(Debug, Default)]
pub struct Emotions {
    wired: bool,
    open: Option<usize>,
}

impl Emotions {
    /// Index of the emotion whose card is showing.
    #[must_use]
    pub fn open_card(&self) -> Option<usize> {
        self.open
    }

    /// Fill the card for emotion `index` and show it.
    pub fn open(&mut self, page: &mut dyn Page, index: usize) -> Option<&'static Emotion> {
        let emotion = EMOTIONS.get(index)?;
        page.set_text(EMOTION_ICON, emotion.emoji);
        page.set_text(EMOTION_TITLE, emotion.name);
        page.set_text(EMOTION_DESC, emotion.description);
        page.set_text(EMOTION_TIP, emotion.tip);
        page.set_style(EMOTION_HEADER, "background", emotion.gradient);
        modal::show(page, EMOTION_OVERLAY);
        self.open = Some(index);
        Some(emotion)
    }

    pub fn close(&mut self, page: &mut dyn Page) {
        modal::hide(page, EMOTION_OVERLAY);
        self.open = None;
    }
}

impl Widget for Emotions {
    fn name(&self) -> &'static str {
        "emotions"
    }

    fn init(&mut self, page: &mut dyn Page) -> Result<WidgetStatus> {
        if let Some(skip) = require_regions(page, &[BUBBLES_CONTAINER, EMOTION_OVERLAY]) {
            return Ok(skip);
        }
        if self.wired {
            return Ok(WidgetStatus::Ready);
        }
        for (i, emotion) in EMOTIONS.iter().enumerate() {
            let id = bubble_id(i);
            page.append(BUBBLES_CONTAINER, &id, &[EMOTION_BUBBLE_GROUP]);
            page.add_class(&id, emotion.size);
            page.set_text(&id, emotion.name);
            page.set_style(&id, "background", emotion.gradient);
        }
        self.wired = true;
        Ok(WidgetStatus::Ready)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::layout::site_page;
    use crate::widgets::regions::ACTIVE;

    #[test]
    fn init_appends_one_bubble_per_emotion() {
        let mut page = site_page();
        let mut emotions = Emotions::default();
        emotions.init(&mut page).unwrap();
        let bubbles = page.members(EMOTION_BUBBLE_GROUP);
        assert_eq!(bubbles.len(), EMOTIONS.len());
        assert_eq!(page.text(&bubbles[3]).as_deref(), Some("Calma"));
        assert!(page.has_class(&bubbles[0], "bubble-lg"));
    }

    #[test]
    fn open_fills_card_and_close_hides_it() {
        let mut page = site_page();
        let mut emotions = Emotions::default();
        emotions.init(&mut page).unwrap();
        let shown = emotions.open(&mut page, 1).unwrap();
        assert_eq!(shown.name, "Tristeza");
        assert_eq!(page.text(EMOTION_ICON).as_deref(), Some("😢"));
        assert_eq!(
            page.style(EMOTION_OVERLAY, "display").as_deref(),
            Some("flex")
        );
        assert!(page.has_class(EMOTION_OVERLAY, ACTIVE));
        assert_eq!(emotions.open_card(), Some(1));

        emotions.close(&mut page);
        assert!(!page.has_class(EMOTION_OVERLAY, ACTIVE));
        assert_eq!(
            page.style(EMOTION_OVERLAY, "display").as_deref(),
            Some("none")
        );
        assert!(emotions.open(&mut page, 99).is_none());
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(find("ansiedad").map(|e| e.emoji), Some("😰"));
        assert_eq!(find(" CONFUSIÓN ").map(|e| e.size), Some("bubble-sm"));
        assert!(find("alegría").is_none());
    }
}
