//! SOS screens and the triage routing table.

use std::fmt;

/// One mutually exclusive view inside the SOS overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Entry menu.
    #[default]
    Entry,
    /// Second triage question (disconnection vs panic).
    Triage2,
    /// Immediate danger: emergency contacts.
    Risk,
    SuicideValidation,
    SuicideBreathing,
    SuicideReasons,
    SuicideContract,
    SuicideFinal,
    BodyScanIntro,
    BodyScanActive,
    BodyScanFinal,
    CalmIntro,
    Grounding,
    Final,
}

impl Screen {
    /// Every screen, in page order.
    pub const ALL: [Self; 14] = [
        Self::Entry,
        Self::Triage2,
        Self::Risk,
        Self::SuicideValidation,
        Self::SuicideBreathing,
        Self::SuicideReasons,
        Self::SuicideContract,
        Self::SuicideFinal,
        Self::BodyScanIntro,
        Self::BodyScanActive,
        Self::BodyScanFinal,
        Self::CalmIntro,
        Self::Grounding,
        Self::Final,
    ];

    /// Region id of the screen on the page.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Entry => "sos-screen-1",
            Self::Triage2 => "sos-screen-triage-2",
            Self::Risk => "sos-screen-risk",
            Self::SuicideValidation => "sos-screen-suicide-validation",
            Self::SuicideBreathing => "sos-screen-suicide-breathing",
            Self::SuicideReasons => "sos-screen-suicide-reasons",
            Self::SuicideContract => "sos-screen-suicide-contract",
            Self::SuicideFinal => "sos-screen-suicide-final",
            Self::BodyScanIntro => "sos-screen-bs-intro",
            Self::BodyScanActive => "sos-screen-bs-active",
            Self::BodyScanFinal => "sos-screen-bs-final",
            Self::CalmIntro => "sos-screen-calm-intro",
            Self::Grounding => "sos-screen-grounding",
            Self::Final => "sos-screen-final",
        }
    }

    /// Resolve a region id back to a screen.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }

    /// Short kebab-case name used by scenario scripts and the CLI.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.id().trim_start_matches("sos-screen-")
    }

    /// Resolve a short name (`bs-intro`) or a full id (`sos-screen-bs-intro`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::from_id(name).or_else(|| Self::ALL.into_iter().find(|s| s.name() == name))
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Static triage table: option tag → target screen.
const CHOICE_ROUTES: [(&str, Screen); 5] = [
    ("suicide", Screen::SuicideValidation),
    ("triage-2", Screen::Triage2),
    ("risk", Screen::Risk),
    ("disconnect", Screen::BodyScanIntro),
    ("panic", Screen::CalmIntro),
];

/// Look up a triage tag. Unknown tags route nowhere.
#[must_use]
pub fn route_choice(tag: &str) -> Option<Screen> {
    CHOICE_ROUTES
        .iter()
        .find(|(t, _)| *t == tag)
        .map(|(_, screen)| *screen)
}

/// Every known triage tag.
pub fn choice_tags() -> impl Iterator<Item = &'static str> {
    CHOICE_ROUTES.iter().map(|(tag, _)| *tag)
}
