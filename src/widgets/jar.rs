//! Calm jar: one random encouraging phrase per draw.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

use crate::core::errors::Result;
use crate::page::Page;

use super::regions::{JAR_BUTTON, JAR_DISPLAY};
use super::{Widget, WidgetStatus, require_regions};

pub const PHRASES: [&str; 9] = [
    "No tienes que poder con todo hoy. Solo con lo de hoy.",
    "Tu ansiedad te miente: no estás en peligro, estás incómodo.",
    "Hacer una pausa también es avanzar.",
    "Eres suficiente, incluso en los días que no eres productivo.",
    "Respira. Esto es un momento, no toda tu vida.",
    "Sé amable contigo mismo. Estás haciendo lo mejor que puedes.",
    "Los sentimientos son visitantes, déjalos venir y déjalos ir.",
    "No creas todo lo que piensas, especialmente de noche.",
    "Está bien pedir ayuda. Es un acto de valentía, no de debilidad.",
];

const AGAIN_LABEL: &str = "✨ Abrir otra dosis ✨";

pub struct Jar {
    rng: StdRng,
    wired: bool,
}

impl Default for Jar {
    fn default() -> Self {
        Self {
            rng: StdRng::from_rng(&mut rand::rng()),
            wired: false,
        }
    }
}

impl Jar {
    /// Deterministic draws, for tests and reproducible CLI output.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            wired: false,
        }
    }

    /// Pick a phrase without touching a page.
    pub fn draw(&mut self) -> &'static str {
        PHRASES.choose(&mut self.rng).copied().unwrap_or(PHRASES[0])
    }

    /// Open button: show a fresh phrase and relabel the button.
    pub fn open(&mut self, page: &mut dyn Page) -> &'static str {
        let phrase = self.draw();
        page.set_text(JAR_DISPLAY, &format!("\"{phrase}\""));
        page.set_style(JAR_DISPLAY, "opacity", "1");
        page.set_text(JAR_BUTTON, AGAIN_LABEL);
        phrase
    }
}

impl Widget for Jar {
    fn name(&self) -> &'static str {
        "jar"
    }

    fn init(&mut self, page: &mut dyn Page) -> Result<WidgetStatus> {
        if let Some(skip) = require_regions(page, &[JAR_BUTTON, JAR_DISPLAY]) {
            return Ok(skip);
        }
        if self.wired {
            return Ok(WidgetStatus::Ready);
        }
        self.wired = true;
        Ok(WidgetStatus::Ready)
    }
}
