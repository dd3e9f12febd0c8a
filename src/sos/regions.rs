//! Region ids and marker classes the SOS overlay reads and writes.

pub const OVERLAY: &str = "sos-overlay";
pub const BODY: &str = "body";
pub const TRIGGER: &str = "btn-sos-trigger";
pub const CLOSE_BUTTON: &str = "close-sos-btn";
pub const BODY_SCAN_DIRECT: &str = "btn-open-bodyscan-direct";

pub const SCREEN_GROUP: &str = "sos-screen";

// Body scan.
pub const BODY_PATH_GROUP: &str = "body-path";
pub const BODY_SCAN_DOT_GROUP: &str = "bs-dot";
pub const BODY_SCAN_INSTRUCTION: &str = "bs-text-instruction";
pub const BODY_SCAN_PAUSE_BUTTON: &str = "btn-bs-pause";

// Crisis breathing.
pub const BREATH_DOT_GROUP: &str = "breath-dot";
pub const BREATHE_CIRCLE: &str = "crisis-breathe-circle";
pub const BREATHE_TEXT: &str = "crisis-breathe-text";
pub const BREATHE_TIMER_TEXT: &str = "crisis-timer-text";
pub const CRISIS_CONTINUE_BUTTON: &str = "btn-crisis-continue";

// Grounding.
pub const GROUNDING_DOT_GROUP: &str = "grounding-dot";
pub const GROUNDING_ICON: &str = "grounding-icon";
pub const GROUNDING_TITLE: &str = "grounding-title";
pub const GROUNDING_TEXT: &str = "grounding-text";

// Suicide-risk sub-flow.
pub const REASONS_NEXT_BUTTON: &str = "btn-reasons-next";

// Marker classes.
pub const ACTIVE: &str = "active";
pub const COMPLETED: &str = "completed";
pub const PAUSED: &str = "paused";
pub const FILL_ACTIVE: &str = "fill-active";
pub const FILL_RELAX: &str = "fill-relax";
pub const FADE_IN: &str = "fade-in";
