//! Five-question wellness quiz with a resumable question index.

use serde::Serialize;
use url::Url;

use crate::core::errors::{CalmError, Result};
use crate::core::progress_store::QuizProgressStore;
use crate::page::Page;

use super::regions::{
    ACTIVE, QUIZ_CONFIRM_START, QUIZ_CURRENT, QUIZ_PROGRESS, QUIZ_QUESTION_GROUP, QUIZ_QUESTIONS,
    QUIZ_RESULT, QUIZ_RESULT_LINK, QUIZ_RESULT_TEXT, QUIZ_RESULT_TITLE, QUIZ_START,
    QUIZ_START_BUTTON,
};
use super::{Widget, WidgetStatus, require_regions, widget_error};

pub const QUESTION_COUNT: usize = 5;
/// Highest value a single answer can carry.
pub const MAX_ANSWER: u8 = 3;

const CONTACT_URL: &str = "https://wa.me/5214491996086";
const RESUME_LABEL: &str = "Continuar Test";

/// Interpretation of a total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreBand {
    pub title: &'static str,
    pub message: &'static str,
}

#[must_use]
pub const fn score_band(score: u32) -> ScoreBand {
    match score {
        0..=4 => ScoreBand {
            title: "Estás en un buen momento 🌿",
            message: "Parece que estás gestionando bien tus emociones.",
        },
        5..=9 => ScoreBand {
            title: "Hay días grises ☁️",
            message: "Es posible que sientas estrés acumulado.",
        },
        10..=14 => ScoreBand {
            title: "Te noto abrumado(a) ❤️‍🩹",
            message: "Cargas con muchas cosas. No tienes que poder con todo.",
        },
        _ => ScoreBand {
            title: "Tu bienestar es prioridad 🌟",
            message: "Tus respuestas indican un momento difícil. Mereces apoyo.",
        },
    }
}

/// Pre-filled contact link carrying the score.
pub fn contact_link(score: u32, band: &ScoreBand) -> Result<String> {
    let text = format!(
        "Hola Adpsike, realicé el test de bienestar. Obtuve {score} puntos ({}).",
        band.title
    );
    let url = Url::parse_with_params(CONTACT_URL, &[("text", text)]).map_err(|e| {
        CalmError::InvalidInput {
            field: "contact_link",
            details: e.to_string(),
        }
    })?;
    Ok(url.into())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizOutcome {
    pub score: u32,
    pub band: ScoreBand,
    pub link: String,
}

/// Score a complete answer set without touching a page.
pub fn evaluate(answers: &[u8]) -> Result<QuizOutcome> {
    if answers.len() != QUESTION_COUNT {
        return Err(CalmError::InvalidInput {
            field: "answers",
            details: format!("expected {QUESTION_COUNT} answers, got {}", answers.len()),
        });
    }
    if let Some(bad) = answers.iter().find(|a| **a > MAX_ANSWER) {
        return Err(CalmError::InvalidInput {
            field: "answers",
            details: format!("answer {bad} is above {MAX_ANSWER}"),
        });
    }
    let score = answers.iter().map(|a| u32::from(*a)).sum();
    outcome(score)
}

fn outcome(score: u32) -> Result<QuizOutcome> {
    let band = score_band(score);
    Ok(QuizOutcome {
        score,
        link: contact_link(score, &band)?,
        band,
    })
}

fn question_id(index: usize) -> String {
    format!("q{}", index + 1)
}

fn next_button_id(index: usize) -> String {
    format!("next{}", index + 1)
}

pub struct Quiz {
    store: QuizProgressStore,
    wired: bool,
    saved: Option<usize>,
    current: usize,
    answers: [Option<u8>; QUESTION_COUNT],
    outcome: Option<QuizOutcome>,
}

impl Quiz {
    #[must_use]
    pub fn new(store: QuizProgressStore) -> Self {
        Self {
            store,
            wired: false,
            saved: None,
            current: 0,
            answers: [None; QUESTION_COUNT],
            outcome: None,
        }
    }

    /// Index restored from the progress store at init.
    #[must_use]
    pub fn saved(&self) -> Option<usize> {
        self.saved
    }

    #[must_use]
    pub fn current(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&QuizOutcome> {
        self.outcome.as_ref()
    }

    /// Start button: resume at the saved question, or show the intro.
    pub fn click_start(&mut self, page: &mut dyn Page) -> Result<()> {
        page.set_style(QUIZ_START_BUTTON, "display", "none");
        match self.saved {
            Some(index) if index > 0 => {
                page.set_style(QUIZ_START, "display", "none");
                page.set_style(QUIZ_QUESTIONS, "display", "block");
                self.show_question(page, index)
            }
            _ => {
                page.set_style(QUIZ_START, "display", "block");
                Ok(())
            }
        }
    }

    /// Intro confirmed: begin at the first question.
    pub fn confirm_start(&mut self, page: &mut dyn Page) -> Result<()> {
        page.set_style(QUIZ_START, "display", "none");
        page.set_style(QUIZ_QUESTIONS, "display", "block");
        self.show_question(page, 0)
    }

    /// Record an answer for the current question and reveal its next button.
    pub fn answer(&mut self, page: &mut dyn Page, value: u8) -> Result<()> {
        if value > MAX_ANSWER {
            return Err(CalmError::InvalidInput {
                field: "answer",
                details: format!("{value} is above {MAX_ANSWER}"),
            });
        }
        if let Some(slot) = self.answers.get_mut(self.current) {
            *slot = Some(value);
            page.set_style(&next_button_id(self.current), "display", "block");
        }
        Ok(())
    }

    /// Move past an answered question. Unanswered questions hold.
    pub fn next(&mut self, page: &mut dyn Page) -> Result<()> {
        if self.outcome.is_some() || self.answers.get(self.current).copied().flatten().is_none() {
            return Ok(());
        }
        self.show_question(page, self.current + 1)
    }

    fn show_question(&mut self, page: &mut dyn Page, index: usize) -> Result<()> {
        if index >= QUESTION_COUNT {
            return self.finish(page);
        }
        self.current = index;
        self.store.store(index)?;
        page.remove_class_all(QUIZ_QUESTION_GROUP, &[ACTIVE]);
        page.add_class(&question_id(index), ACTIVE);
        page.set_text(QUIZ_CURRENT, &(index + 1).to_string());
        page.set_style(
            QUIZ_PROGRESS,
            "width",
            &format!("{}%", (index + 1) * 100 / QUESTION_COUNT),
        );
        let display = if self.answers[index].is_some() {
            "block"
        } else {
            "none"
        };
        page.set_style(&next_button_id(index), "display", display);
        Ok(())
    }

    fn finish(&mut self, page: &mut dyn Page) -> Result<()> {
        let score = self.answers.iter().flatten().map(|a| u32::from(*a)).sum();
        self.store.clear()?;
        self.saved = None;
        let result = outcome(score)?;
        page.set_style(QUIZ_QUESTIONS, "display", "none");
        page.set_style(QUIZ_RESULT, "display", "block");
        page.set_text(QUIZ_RESULT_TITLE, result.band.title);
        page.set_text(QUIZ_RESULT_TEXT, result.band.message);
        page.set_text(QUIZ_RESULT_LINK, &result.link);
        self.outcome = Some(result);
        Ok(())
    }
}

impl Widget for Quiz {
    fn name(&self) -> &'static str {
        "quiz"
    }

    fn init(&mut self, page: &mut dyn Page) -> Result<WidgetStatus> {
        if let Some(skip) = require_regions(page, &[QUIZ_START_BUTTON]) {
            return Ok(skip);
        }
        if self.wired {
            return Ok(WidgetStatus::Ready);
        }
        self.saved = self
            .store
            .load()
            .map_err(|err| widget_error("quiz", &err))?;
        if self.saved.is_some_and(|i| i > 0 && i < QUESTION_COUNT) {
            page.set_text(QUIZ_START_BUTTON, RESUME_LABEL);
        }
        page.set_style(QUIZ_CONFIRM_START, "cursor", "pointer");
        self.wired = true;
        Ok(WidgetStatus::Ready)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::MemoryPage;
    use crate::page::layout::site_page;

    fn setup() -> (tempfile::TempDir, QuizProgressStore, MemoryPage) {
        let dir = tempfile::tempdir().unwrap();
        let store = QuizProgressStore::new(dir.path().join("quiz-progress.json"));
        (dir, store, site_page())
    }

    #[test]
    fn bands_follow_thresholds() {
        assert_eq!(score_band(0).title, "Estás en un buen momento 🌿");
        assert_eq!(score_band(4).title, "Estás en un buen momento 🌿");
        assert_eq!(score_band(5).title, "Hay días grises ☁️");
        assert_eq!(score_band(9).title, "Hay días grises ☁️");
        assert_eq!(score_band(10).title, "Te noto abrumado(a) ❤️‍🩹");
        assert_eq!(score_band(14).title, "Te noto abrumado(a) ❤️‍🩹");
        assert_eq!(score_band(15).title, "Tu bienestar es prioridad 🌟");
    }

    #[test]
    fn contact_link_encodes_message() {
        let link = contact_link(7, &score_band(7)).unwrap();
        assert!(link.starts_with("https://wa.me/5214491996086?text="));
        assert!(!link.contains(' '));
        let parsed = Url::parse(&link).unwrap();
        let (_, text) = parsed.query_pairs().next().unwrap();
        assert_eq!(
            text,
            "Hola Adpsike, realicé el test de bienestar. Obtuve 7 puntos (Hay días grises ☁️)."
        );
    }

    #[test]
    fn evaluate_validates_answers() {
        assert_eq!(evaluate(&[3, 3, 3, 3, 3]).unwrap().score, 15);
        assert!(evaluate(&[1, 2]).is_err());
        assert_eq!(
            evaluate(&[0, 0, 0, 0, 4]).unwrap_err().code(),
            "CALM-2003"
        );
    }

    #[test]
    fn full_run_saves_progress_then_clears() {
        let (_dir, store, mut page) = setup();
        let mut quiz = Quiz::new(store.clone());
        quiz.init(&mut page).unwrap();
        quiz.click_start(&mut page).unwrap();
        assert_eq!(page.style(QUIZ_START, "display").as_deref(), Some("block"));
        quiz.confirm_start(&mut page).unwrap();
        assert!(page.has_class("q1", ACTIVE));
        assert_eq!(page.style("next1", "display").as_deref(), Some("none"));

        quiz.next(&mut page).unwrap();
        assert_eq!(quiz.current(), 0, "unanswered question holds");

        for value in [1, 2, 0, 3] {
            quiz.answer(&mut page, value).unwrap();
            quiz.next(&mut page).unwrap();
        }
        assert_eq!(quiz.current(), 4);
        assert_eq!(store.load().unwrap(), Some(4));
        assert_eq!(page.style(QUIZ_PROGRESS, "width").as_deref(), Some("100%"));
        assert_eq!(page.text(QUIZ_CURRENT).as_deref(), Some("5"));

        quiz.answer(&mut page, 2).unwrap();
        quiz.next(&mut page).unwrap();
        let outcome = quiz.outcome().unwrap();
        assert_eq!(outcome.score, 8);
        assert_eq!(
            page.text(QUIZ_RESULT_TITLE).as_deref(),
            Some("Hay días grises ☁️")
        );
        assert_eq!(page.style(QUIZ_RESULT, "display").as_deref(), Some("block"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn saved_index_resumes() {
        let (_dir, store, mut page) = setup();
        store.store(2).unwrap();
        let mut quiz = Quiz::new(store);
        quiz.init(&mut page).unwrap();
        assert_eq!(quiz.saved(), Some(2));
        assert_eq!(
            page.text(QUIZ_START_BUTTON).as_deref(),
            Some("Continuar Test")
        );
        quiz.click_start(&mut page).unwrap();
        assert!(page.has_class("q3", ACTIVE));
        assert_eq!(
            page.style(QUIZ_QUESTIONS, "display").as_deref(),
            Some("block")
        );
    }

    #[test]
    fn corrupt_progress_fails_init() {
        let (dir, _store, mut page) = setup();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        let mut quiz = Quiz::new(QuizProgressStore::new(path));
        let err = quiz.init(&mut page).unwrap_err();
        assert_eq!(err.code(), "CALM-2201");
    }

    #[test]
    fn rejects_out_of_range_answer() {
        let (_dir, store, mut page) = setup();
        let mut quiz = Quiz::new(store);
        quiz.init(&mut page).unwrap();
        quiz.confirm_start(&mut page).unwrap();
        assert!(quiz.answer(&mut page, 9).is_err());
    }
}
