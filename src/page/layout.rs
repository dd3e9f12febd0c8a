//! Default page layouts: the SOS overlay alone, or the whole site.

use crate::sos::body_scan::BODY_PARTS;
use crate::sos::regions as sos;
use crate::sos::screen::Screen;
use crate::widgets::regions as site;

use super::{MemoryPage, Page};

/// Number of progress dots on the breathing screen.
const BREATH_DOTS: usize = 3;
/// Number of progress dots on the grounding screen.
const GROUNDING_DOTS: usize = 5;

/// Body, trigger buttons and the full SOS overlay tree.
#[must_use]
pub fn sos_overlay_page() -> MemoryPage {
    let mut page = MemoryPage::new();
    build_sos(&mut page);
    page
}

/// Every region the site widgets and the SOS overlay expect.
#[must_use]
pub fn site_page() -> MemoryPage {
    let mut page = MemoryPage::new();
    build_sos(&mut page);
    build_quiz(&mut page);
    build_roi(&mut page);
    build_tools(&mut page);
    build_jar(&mut page);
    build_emotions(&mut page);
    build_faq(&mut page);
    build_modals(&mut page);
    page
}

fn dots(page: &mut MemoryPage, parent: &str, group: &str, count: usize) {
    for i in 0..count {
        page.insert(Some(parent), &format!("{group}-{i}"), &[group]);
    }
}

fn build_sos(page: &mut MemoryPage) {
    page.insert(None, sos::BODY, &[]);
    page.insert(Some(sos::BODY), sos::TRIGGER, &[]);
    page.insert(Some(sos::BODY), sos::BODY_SCAN_DIRECT, &[]);
    page.insert(Some(sos::BODY), sos::OVERLAY, &[]);
    page.set_style(sos::OVERLAY, "display", "none");
    page.insert(Some(sos::OVERLAY), sos::CLOSE_BUTTON, &[]);

    for screen in Screen::ALL {
        page.insert(Some(sos::OVERLAY), screen.id(), &[sos::SCREEN_GROUP]);
    }

    let active = Screen::BodyScanActive.id();
    for part in &BODY_PARTS {
        page.insert(Some(active), part.id, &[sos::BODY_PATH_GROUP]);
    }
    dots(page, active, sos::BODY_SCAN_DOT_GROUP, BODY_PARTS.len());
    page.insert(Some(active), sos::BODY_SCAN_INSTRUCTION, &[]);
    page.insert(Some(active), sos::BODY_SCAN_PAUSE_BUTTON, &[]);

    let breathing = Screen::SuicideBreathing.id();
    page.insert(Some(breathing), sos::BREATHE_CIRCLE, &[]);
    page.set_class_list(sos::BREATHE_CIRCLE, &[sos::BREATHE_CIRCLE]);
    page.insert(Some(breathing), sos::BREATHE_TEXT, &[]);
    page.insert(Some(breathing), sos::BREATHE_TIMER_TEXT, &[]);
    dots(page, breathing, sos::BREATH_DOT_GROUP, BREATH_DOTS);
    page.insert(Some(breathing), sos::CRISIS_CONTINUE_BUTTON, &[]);
    page.set_style(sos::CRISIS_CONTINUE_BUTTON, "display", "none");

    let reasons = Screen::SuicideReasons.id();
    page.insert(Some(reasons), sos::REASONS_NEXT_BUTTON, &[]);
    page.set_disabled(sos::REASONS_NEXT_BUTTON, true);
    page.set_style(sos::REASONS_NEXT_BUTTON, "opacity", "0.5");
    page.set_text(sos::REASONS_NEXT_BUTTON, "Tómate un momento...");

    let grounding = Screen::Grounding.id();
    page.insert(Some(grounding), sos::GROUNDING_ICON, &[]);
    page.insert(Some(grounding), sos::GROUNDING_TITLE, &[]);
    page.insert(Some(grounding), sos::GROUNDING_TEXT, &[]);
    dots(page, grounding, sos::GROUNDING_DOT_GROUP, GROUNDING_DOTS);
}

fn build_quiz(page: &mut MemoryPage) {
    page.insert(Some(sos::BODY), site::QUIZ_SECTION, &[]);
    let parent = Some(site::QUIZ_SECTION);
    page.insert(parent, site::QUIZ_START_BUTTON, &[]);
    page.set_text(site::QUIZ_START_BUTTON, "Comenzar Test");
    page.insert(parent, site::QUIZ_START, &[]);
    page.set_style(site::QUIZ_START, "display", "none");
    page.insert(Some(site::QUIZ_START), site::QUIZ_CONFIRM_START, &[]);
    page.insert(parent, site::QUIZ_QUESTIONS, &[]);
    page.set_style(site::QUIZ_QUESTIONS, "display", "none");
    for n in 1..=crate::widgets::quiz::QUESTION_COUNT {
        let question = format!("q{n}");
        page.insert(
            Some(site::QUIZ_QUESTIONS),
            &question,
            &[site::QUIZ_QUESTION_GROUP],
        );
        page.insert(Some(question.as_str()), &format!("next{n}"), &[]);
    }
    page.insert(Some(site::QUIZ_QUESTIONS), site::QUIZ_CURRENT, &[]);
    page.insert(Some(site::QUIZ_QUESTIONS), site::QUIZ_PROGRESS, &[]);
    page.insert(parent, site::QUIZ_RESULT, &[]);
    page.set_style(site::QUIZ_RESULT, "display", "none");
    page.insert(Some(site::QUIZ_RESULT), site::QUIZ_RESULT_TITLE, &[]);
    page.insert(Some(site::QUIZ_RESULT), site::QUIZ_RESULT_TEXT, &[]);
    page.insert(Some(site::QUIZ_RESULT), site::QUIZ_RESULT_LINK, &[]);
}

fn build_roi(page: &mut MemoryPage) {
    page.insert(Some(sos::BODY), site::ROI_SECTION, &[]);
    let parent = Some(site::ROI_SECTION);
    for id in [
        site::ROI_LOST_HOURS,
        site::ROI_PRODUCTIVITY,
        site::ROI_RELATIONSHIP,
        site::ROI_HEALTH,
        site::ROI_THERAPY,
        site::ROI_CALCULATE,
        site::ROI_RESULT,
    ] {
        page.insert(parent, id, &[]);
    }
    for id in [site::ROI_TOTAL_COST, site::ROI_BENEFIT, site::ROI_PERCENT] {
        page.insert(Some(site::ROI_RESULT), id, &[]);
    }
}

fn build_tools(page: &mut MemoryPage) {
    page.insert(Some(sos::BODY), site::TOOLS_SECTION, &[]);
    let parent = Some(site::TOOLS_SECTION);
    for (button, content) in site::TOOL_TOGGLES {
        page.insert(parent, button, &[]);
        page.insert(parent, content, &[]);
    }
    page.set_text(site::TOOL_TOGGLES[0].0, "Iniciar Mini Test");
    page.set_text(site::TOOL_TOGGLES[1].0, "Medir mi Carga");
    page.insert(parent, site::TOOL_BREATHE_TEXT, &[]);

    let quiz = Some(site::TOOL_TOGGLES[0].1);
    for question in 1..=2 {
        let row = format!("anxiety-q{question}");
        page.insert(quiz, &row, &[]);
        for value in 0..=3 {
            page.insert(
                Some(row.as_str()),
                &format!("anxiety-q{question}-v{value}"),
                &[site::ANXIETY_OPTION_GROUP],
            );
        }
    }
    page.insert(quiz, site::ANXIETY_RESULT, &[]);
    page.set_style(site::ANXIETY_RESULT, "display", "none");
    page.insert(Some(site::ANXIETY_RESULT), site::ANXIETY_RESULT_TEXT, &[]);

    let load = Some(site::TOOL_TOGGLES[1].1);
    for (i, label) in crate::widgets::tools::LOAD_ITEMS.iter().enumerate() {
        let id = format!("check-item-{i}");
        page.insert(load, &id, &[site::CHECK_ITEM_GROUP]);
        page.set_text(&id, label);
    }
    page.insert(load, site::LOAD_BAR, &[]);
    page.insert(load, site::LOAD_TEXT, &[]);
}

fn build_jar(page: &mut MemoryPage) {
    page.insert(Some(sos::BODY), site::JAR_BUTTON, &[]);
    page.set_text(site::JAR_BUTTON, "Abrir el tarro");
    page.insert(Some(sos::BODY), site::JAR_DISPLAY, &[]);
}

fn build_emotions(page: &mut MemoryPage) {
    page.insert(Some(sos::BODY), site::BUBBLES_CONTAINER, &[]);
    page.insert(Some(sos::BODY), site::EMOTION_OVERLAY, &[]);
    page.set_style(site::EMOTION_OVERLAY, "display", "none");
    for id in [
        site::EMOTION_HEADER,
        site::EMOTION_ICON,
        site::EMOTION_TITLE,
        site::EMOTION_DESC,
        site::EMOTION_TIP,
    ] {
        page.insert(Some(site::EMOTION_OVERLAY), id, &[]);
    }
    page.insert(
        Some(site::EMOTION_OVERLAY),
        site::EMOTION_CLOSE,
        &[site::CLOSE_MODAL_GROUP],
    );
}

/// FAQ categories and their questions.
const FAQ: [(&str, &[(&str, &str)]); 2] = [
    (
        "Terapia",
        &[
            (
                "¿Cuánto dura una sesión?",
                "Cada sesión dura alrededor de 50 minutos.",
            ),
            (
                "¿Las sesiones en línea funcionan igual?",
                "Sí. La evidencia muestra resultados equivalentes a la terapia presencial.",
            ),
        ],
    ),
    (
        "Crisis",
        &[(
            "¿Qué hago si estoy en peligro inmediato?",
            "Llama al 911 o acude al servicio de urgencias más cercano.",
        )],
    ),
];

fn build_faq(page: &mut MemoryPage) {
    page.insert(Some(sos::BODY), site::FAQ_SECTION, &[]);
    let mut n = 0;
    for (c, (category, entries)) in FAQ.iter().enumerate() {
        let cat = format!("faq-category-{c}");
        page.insert(Some(site::FAQ_SECTION), &cat, &[site::FAQ_CATEGORY_GROUP]);
        page.set_text(&cat, category);
        for (question, answer) in *entries {
            let q = format!("faq-q-{n}");
            let a = format!("faq-a-{n}");
            page.insert(Some(cat.as_str()), &q, &[site::FAQ_QUESTION_GROUP]);
            page.set_text(&q, question);
            page.insert(Some(cat.as_str()), &a, &[site::FAQ_ANSWER_GROUP]);
            page.set_text(&a, answer);
            n += 1;
        }
    }
}

fn build_modals(page: &mut MemoryPage) {
    for name in site::MODAL_NAMES {
        let trigger = format!("{}{name}", site::READ_MORE_PREFIX);
        let modal = format!("{}{name}", site::MODAL_PREFIX);
        page.insert(Some(sos::BODY), &trigger, &[site::READ_MORE_GROUP]);
        page.insert(Some(sos::BODY), &modal, &[site::MODAL_OVERLAY_GROUP]);
        page.set_style(&modal, "display", "none");
        page.insert(
            Some(modal.as_str()),
            &format!("{modal}-close"),
            &[site::CLOSE_MODAL_GROUP],
        );
    }
}
