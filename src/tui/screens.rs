//! Terminal copy and menu options for each SOS screen.

#![allow(missing_docs)]

use crate::page::Page;
use crate::sos::regions;
use crate::sos::{Screen, SosAction, SosState};

/// Static text shown above a screen's live content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenCopy {
    pub title: &'static str,
    pub lines: &'static [&'static str],
}

/// One selectable option: press `key` to dispatch `action`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub key: char,
    pub label: &'static str,
    pub action: SosAction,
}

impl MenuItem {
    fn new(key: char, label: &'static str, action: SosAction) -> Self {
        Self { key, label, action }
    }
}

#[must_use]
pub const fn copy(screen: Screen) -> ScreenCopy {
    match screen {
        Screen::Entry => ScreenCopy {
            title: "Estás a salvo aquí",
            lines: &[
                "Vamos a ir paso a paso.",
                "¿Qué describe mejor lo que sientes ahora?",
            ],
        },
        Screen::Triage2 => ScreenCopy {
            title: "Gracias por contarme",
            lines: &["¿Cuál de estas se parece más a lo que vives?"],
        },
        Screen::Risk => ScreenCopy {
            title: "Tu seguridad es lo primero",
            lines: &[
                "Llama ahora al 911 si estás en peligro inmediato.",
                "Línea de la Vida (24 h, gratuita): 800 911 2000.",
                "Si puedes, busca a alguien de confianza que esté cerca.",
            ],
        },
        Screen::SuicideValidation => ScreenCopy {
            title: "Lo que sientes es real y pesa mucho",
            lines: &[
                "No estás solo/a. Ese dolor puede cambiar, aunque hoy no lo parezca.",
                "Antes de cualquier cosa, respiremos juntos un momento.",
            ],
        },
        Screen::SuicideBreathing => ScreenCopy {
            title: "Respiración 4-7-8",
            lines: &["Inhala 4 segundos, retén 7, exhala 8."],
        },
        Screen::SuicideReasons => ScreenCopy {
            title: "Tus razones",
            lines: &[
                "Piensa en una persona, un lugar o algo que quieras volver a ver.",
                "Tómate el tiempo que necesites.",
            ],
        },
        Screen::SuicideContract => ScreenCopy {
            title: "Un compromiso por hoy",
            lines: &[
                "Me comprometo a no hacerme daño en las próximas horas",
                "y a buscar ayuda si la necesito.",
            ],
        },
        Screen::SuicideFinal => ScreenCopy {
            title: "Gracias por quedarte",
            lines: &[
                "Habla hoy con alguien de confianza o con un profesional.",
                "Línea de la Vida: 800 911 2000.",
            ],
        },
        Screen::BodyScanIntro => ScreenCopy {
            title: "Escaneo corporal",
            lines: &[
                "Vamos a tensar y soltar cinco zonas del cuerpo.",
                "Sigue las indicaciones a tu ritmo.",
            ],
        },
        Screen::BodyScanActive => ScreenCopy {
            title: "Escaneo corporal",
            lines: &[],
        },
        Screen::BodyScanFinal => ScreenCopy {
            title: "Bien hecho",
            lines: &["Nota cómo se siente tu cuerpo ahora."],
        },
        Screen::CalmIntro => ScreenCopy {
            title: "El pánico pasa",
            lines: &[
                "Lo que sientes es incómodo, pero no peligroso.",
                "Vamos a anclarte al presente con tus sentidos.",
            ],
        },
        Screen::Grounding => ScreenCopy {
            title: "Técnica 5-4-3-2-1",
            lines: &[],
        },
        Screen::Final => ScreenCopy {
            title: "Lo lograste",
            lines: &["Quédate un momento aquí. Vuelve cuando lo necesites."],
        },
    }
}

/// Options available on the current screen. Some depend on live state, such
/// as the breathing continue button or the locked reasons button.
#[must_use]
pub fn menu(state: &SosState, page: &dyn Page) -> Vec<MenuItem> {
    let choice = |tag: &str| SosAction::Choice(tag.to_string());
    let back = || MenuItem::new('b', "Volver al inicio", SosAction::Reset);
    match state.screen {
        Screen::Entry => vec![
            MenuItem::new('1', "Tengo pensamientos de hacerme daño", choice("suicide")),
            MenuItem::new('2', "Estoy en peligro inmediato", choice("risk")),
            MenuItem::new('3', "Me siento abrumado/a", choice("triage-2")),
        ],
        Screen::Triage2 => vec![
            MenuItem::new('1', "Me siento desconectado/a de mi cuerpo", choice("disconnect")),
            MenuItem::new('2', "Siento pánico o ansiedad intensa", choice("panic")),
            back(),
        ],
        Screen::Risk => vec![back()],
        Screen::SuicideValidation => vec![
            MenuItem::new('1', "Respirar juntos", SosAction::StartBreathing),
            back(),
        ],
        Screen::SuicideBreathing => {
            let continue_visible = page
                .style(regions::CRISIS_CONTINUE_BUTTON, "display")
                .is_some_and(|d| d != "none");
            if continue_visible {
                vec![MenuItem::new('1', "Continuar", SosAction::ShowSuicideReasons)]
            } else if state.breathing.breathing {
                vec![MenuItem::new('s', "Detener", SosAction::StopBreathing)]
            } else {
                vec![MenuItem::new('1', "Volver a empezar", SosAction::StartBreathing)]
            }
        }
        Screen::SuicideReasons => {
            if page.is_disabled(regions::REASONS_NEXT_BUTTON) {
                vec![MenuItem::new(
                    '1',
                    "Ya pensé en mis razones",
                    SosAction::EnableReasonsNext,
                )]
            } else {
                vec![MenuItem::new(
                    '1',
                    "He reflexionado (Continuar)",
                    SosAction::ShowSuicideContract,
                )]
            }
        }
        Screen::SuicideContract => vec![MenuItem::new(
            '1',
            "Me comprometo",
            SosAction::FinishSuicideModule,
        )],
        Screen::BodyScanIntro => vec![
            MenuItem::new('1', "Comenzar", SosAction::StartBodyScan),
            back(),
        ],
        Screen::BodyScanActive => {
            let pause = if state.body_scan.paused {
                "Reanudar"
            } else {
                "Pausar"
            };
            vec![
                MenuItem::new('p', pause, SosAction::TogglePause),
                MenuItem::new('s', "Terminar ahora", SosAction::SkipBodyScan),
            ]
        }
        Screen::BodyScanFinal => vec![
            MenuItem::new('1', "Seguir con 5-4-3-2-1", SosAction::StartGrounding),
            MenuItem::new('2', "Repetir el escaneo", SosAction::StartBodyScan),
            back(),
        ],
        Screen::CalmIntro => vec![
            MenuItem::new('1', "Empezar", SosAction::StartGrounding),
            back(),
        ],
        Screen::Grounding => vec![MenuItem::new('n', "Siguiente", SosAction::NextGrounding)],
        Screen::SuicideFinal | Screen::Final => vec![back()],
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::page::layout::sos_overlay_page;

    #[test]
    fn every_screen_has_a_title_and_an_exit() {
        let page = sos_overlay_page();
        for screen in Screen::ALL {
            assert!(!copy(screen).title.is_empty(), "{screen}");
            let state = SosState {
                screen,
                ..SosState::default()
            };
            assert!(!menu(&state, &page).is_empty(), "{screen} has no options");
        }
    }

    #[test]
    fn menu_keys_are_unique_per_screen() {
        let page = sos_overlay_page();
        for screen in Screen::ALL {
            let state = SosState {
                screen,
                ..SosState::default()
            };
            let items = menu(&state, &page);
            let keys: HashSet<char> = items.iter().map(|i| i.key).collect();
            assert_eq!(keys.len(), items.len(), "{screen}");
        }
    }

    #[test]
    fn entry_options_use_routable_tags() {
        let page = sos_overlay_page();
        for item in menu(&SosState::default(), &page) {
            let SosAction::Choice(tag) = item.action else {
                panic!("entry option is not a choice");
            };
            assert!(crate::sos::route_choice(&tag).is_some());
        }
    }

    #[test]
    fn reasons_option_follows_button_lock() {
        let mut page = sos_overlay_page();
        let state = SosState {
            screen: Screen::SuicideReasons,
            ..SosState::default()
        };
        assert_eq!(menu(&state, &page)[0].action, SosAction::EnableReasonsNext);
        page.set_disabled(regions::REASONS_NEXT_BUTTON, false);
        assert_eq!(
            menu(&state, &page)[0].action,
            SosAction::ShowSuicideContract
        );
    }
}
