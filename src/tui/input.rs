use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::prelude::*;
use std::io;

use super::actions::{ApplyResult, apply_action, handle_prompt_text};
use super::app::App;
use super::keymap::translate;
use super::ui;

/// Route one key press. Returns `ApplyResult::Quit` when the app should exit.
pub(crate) fn handle_key(app: &mut App, key: KeyEvent) -> ApplyResult {
    app.status_message.clear();

    if let Some(action) = translate(app.screen, app.mode, key) {
        return apply_action(app, action);
    }

    // Text entry fallback (not bound in the keymap).
    handle_prompt_text(app, key);
    ApplyResult::Continue
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        // The loading state has been drawn; fetch now and redraw.
        if app.needs_refresh {
            app.refresh_list();
            continue;
        }

        if let Event::Key(key) = event::read()? {
            // Only process key press events (Windows reports Press + Release)
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if handle_key(app, key) == ApplyResult::Quit {
                return Ok(());
            }
        }
    }
}
