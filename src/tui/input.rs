//! Key routing for the SOS terminal runtime.
//!
//! Precedence: quit keys, then escape, then overlay-level keys, then the
//! current screen's menu. While the overlay is closed only the open keys
//! (and quit) do anything.

#![allow(missing_docs)]

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::sos::{OverlayPhase, SosAction};

use super::screens::MenuItem;

#[derive(Debug, Clone, Copy)]
pub struct InputContext<'a> {
    pub phase: OverlayPhase,
    pub menu: &'a [MenuItem],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    Quit,
    /// Close widget modals, then the overlay if it is active.
    Escape,
    Sos(SosAction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpBinding {
    pub keys: &'static str,
    pub description: &'static str,
}

const CLOSED_HELP: [HelpBinding; 3] = [
    HelpBinding {
        keys: "o",
        description: "abrir SOS",
    },
    HelpBinding {
        keys: "x",
        description: "escaneo corporal directo",
    },
    HelpBinding {
        keys: "q",
        description: "salir",
    },
];

const OPEN_HELP: [HelpBinding; 3] = [
    HelpBinding {
        keys: "esc/c",
        description: "cerrar",
    },
    HelpBinding {
        keys: "r",
        description: "reiniciar",
    },
    HelpBinding {
        keys: "q",
        description: "salir",
    },
];

/// Footer key hints for the overlay phase.
#[must_use]
pub const fn help_bindings(phase: OverlayPhase) -> &'static [HelpBinding] {
    if phase.is_open() {
        &OPEN_HELP
    } else {
        &CLOSED_HELP
    }
}

/// Resolve one key press. `None` means the key does nothing here.
#[must_use]
pub fn resolve_key(key: &KeyEvent, context: InputContext<'_>) -> Option<InputAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Some(InputAction::Quit);
        }
        KeyCode::Char('q') => return Some(InputAction::Quit),
        KeyCode::Esc => return Some(InputAction::Escape),
        _ => {}
    }

    if !context.phase.is_open() {
        return match key.code {
            KeyCode::Char('o') | KeyCode::Enter => Some(InputAction::Sos(SosAction::Open)),
            KeyCode::Char('x') => Some(InputAction::Sos(SosAction::OpenBodyScanDirect)),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('c') => Some(InputAction::Sos(SosAction::Close)),
        KeyCode::Char('r') => Some(InputAction::Sos(SosAction::Reset)),
        KeyCode::Char(ch) => context
            .menu
            .iter()
            .find(|item| item.key == ch)
            .map(|item| InputAction::Sos(item.action.clone())),
        KeyCode::Enter => context
            .menu
            .first()
            .map(|item| InputAction::Sos(item.action.clone())),
        _ => None,
    }
}
