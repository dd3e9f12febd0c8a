//! Region ids and groups owned by the site widgets.

// Wellness quiz.
pub const QUIZ_SECTION: &str = "quiz";
pub const QUIZ_START_BUTTON: &str = "startQuizButton";
pub const QUIZ_START: &str = "quizStart";
pub const QUIZ_CONFIRM_START: &str = "confirmStart";
pub const QUIZ_QUESTIONS: &str = "quizQuestions";
pub const QUIZ_QUESTION_GROUP: &str = "quiz-question";
pub const QUIZ_CURRENT: &str = "currentQuestion";
pub const QUIZ_PROGRESS: &str = "progressFill";
pub const QUIZ_RESULT: &str = "quizResult";
pub const QUIZ_RESULT_TITLE: &str = "resultTitle";
pub const QUIZ_RESULT_TEXT: &str = "resultText";
pub const QUIZ_RESULT_LINK: &str = "quizResultLink";

// ROI calculator.
pub const ROI_SECTION: &str = "roi-calculator";
pub const ROI_LOST_HOURS: &str = "lost-hours";
pub const ROI_PRODUCTIVITY: &str = "productivity-cost";
pub const ROI_RELATIONSHIP: &str = "relationship-impact";
pub const ROI_HEALTH: &str = "health-impact";
pub const ROI_THERAPY: &str = "therapy-cost";
pub const ROI_CALCULATE: &str = "calculate-btn";
pub const ROI_RESULT: &str = "result";
pub const ROI_TOTAL_COST: &str = "total-cost";
pub const ROI_BENEFIT: &str = "benefit";
pub const ROI_PERCENT: &str = "roi";

// Self-help tools.
pub const TOOLS_SECTION: &str = "tools";
/// (button, content) pairs toggled open and closed.
pub const TOOL_TOGGLES: [(&str, &str); 2] = [
    ("btn-text-quiz", "content-quiz"),
    ("btn-text-load", "content-load"),
];
pub const TOOL_BREATHE_TEXT: &str = "breatheText";
pub const ANXIETY_OPTION_GROUP: &str = "option-btn";
pub const ANXIETY_RESULT: &str = "quiz-result";
pub const ANXIETY_RESULT_TEXT: &str = "result-text";
pub const CHECK_ITEM_GROUP: &str = "check-item";
pub const LOAD_BAR: &str = "load-bar";
pub const LOAD_TEXT: &str = "load-text";

// Calm jar.
pub const JAR_BUTTON: &str = "btn-open-jar";
pub const JAR_DISPLAY: &str = "jar-display";

// Emotion wheel.
pub const BUBBLES_CONTAINER: &str = "bubbles-container";
pub const EMOTION_BUBBLE_GROUP: &str = "emotion-bubble";
pub const EMOTION_OVERLAY: &str = "emotion-card-overlay";
pub const EMOTION_HEADER: &str = "emotion-header-bg";
pub const EMOTION_ICON: &str = "emotion-icon";
pub const EMOTION_TITLE: &str = "emotion-title";
pub const EMOTION_DESC: &str = "emotion-desc";
pub const EMOTION_TIP: &str = "emotion-tip";
pub const EMOTION_CLOSE: &str = "emotion-close";

// FAQ accordion.
pub const FAQ_SECTION: &str = "faq";
pub const FAQ_CATEGORY_GROUP: &str = "faq-category";
pub const FAQ_QUESTION_GROUP: &str = "faq-question";
pub const FAQ_ANSWER_GROUP: &str = "faq-answer";

// Read-more modals.
pub const MODAL_NAMES: [&str; 3] = ["ansiedad", "depresion", "pareja"];
pub const READ_MORE_PREFIX: &str = "read-more-";
pub const MODAL_PREFIX: &str = "modal-";
pub const READ_MORE_GROUP: &str = "read-more";
pub const MODAL_OVERLAY_GROUP: &str = "modal-overlay";
pub const CLOSE_MODAL_GROUP: &str = "close-modal-btn";

// Shared marker classes.
pub const ACTIVE: &str = "active";
pub const SELECTED: &str = "selected";
pub const OPEN: &str = "open";
pub const SHOW: &str = "show";
