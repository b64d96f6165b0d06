//! Key translation layer.
//!
//! Keeps key handling separate from app behavior: a key maps to an [`Action`]
//! depending on the active screen and mode.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{Mode, Screen};

/// Everything a key can trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Leave a prompt without applying it
    Cancel,
    /// Apply the prompt's input
    CommitPrompt,
    Move(i32, i32),
    Page(i32),

    // Sheet list
    Refresh,
    NewSheet,
    DeleteRecord,
    DownloadRecord,

    // Sheet editor
    Import,
    EditCell,
    RenameColumn,
    EditTitle,
    ToggleRow,
    ToggleColumn,
    DeleteSelected,
    AppendRow,
    AppendColumn,
    Export,
    Save,
    Back,
}

/// Translate a key event to an action for the current screen and mode.
///
/// Returns `None` if the key has no binding in the current context. In
/// prompt mode unbound keys are text input.
pub fn translate(screen: Screen, mode: Mode, key: KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    if mode == Mode::Prompt {
        return match key.code {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Char('g') if ctrl => Some(Action::Cancel),
            KeyCode::Enter => Some(Action::CommitPrompt),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => return Some(Action::Move(0, -1)),
        KeyCode::Down | KeyCode::Char('j') => return Some(Action::Move(0, 1)),
        KeyCode::PageUp => return Some(Action::Page(-1)),
        KeyCode::PageDown => return Some(Action::Page(1)),
        _ => {}
    }

    match screen {
        Screen::List => match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Char('n') => Some(Action::NewSheet),
            KeyCode::Char('d') | KeyCode::Delete => Some(Action::DeleteRecord),
            KeyCode::Enter | KeyCode::Char('w') => Some(Action::DownloadRecord),
            _ => None,
        },

        Screen::Editor => match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::Back),
            KeyCode::Left | KeyCode::Char('h') => Some(Action::Move(-1, 0)),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::Move(1, 0)),
            KeyCode::Tab => Some(Action::Move(1, 0)),
            KeyCode::BackTab => Some(Action::Move(-1, 0)),

            KeyCode::Char('o') => Some(Action::Import),
            KeyCode::Enter | KeyCode::Char('i') => Some(Action::EditCell),
            KeyCode::Char('R') => Some(Action::RenameColumn),
            KeyCode::Char('t') => Some(Action::EditTitle),
            KeyCode::Char(' ') => Some(Action::ToggleRow),
            KeyCode::Char('c') => Some(Action::ToggleColumn),
            KeyCode::Char('d') | KeyCode::Delete => Some(Action::DeleteSelected),
            KeyCode::Char('a') => Some(Action::AppendRow),
            KeyCode::Char('A') => Some(Action::AppendColumn),
            KeyCode::Char('e') => Some(Action::Export),
            KeyCode::Char('s') if ctrl => Some(Action::Save),
            KeyCode::Char('S') => Some(Action::Save),
            _ => None,
        },
    }
}

/// One-line key reference for the status bar.
pub fn status_hint(screen: Screen) -> &'static str {
    match screen {
        Screen::List => "jk:move  Enter:download  d:delete  n:new  r:refresh  q:quit",
        Screen::Editor => {
            "o:import  i:edit  R:rename  t:title  SPC/c:select row/col  d:delete  a/A:add  e:export  S:save  q:back"
        }
    }
}
