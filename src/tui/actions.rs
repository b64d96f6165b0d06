use crossterm::event::{self, KeyCode, KeyModifiers};

use super::app::{App, Mode, PromptKind, Screen};
use super::keymap::Action;

/// Edit a text buffer with UTF-8 aware cursor movement.
fn handle_text_input(buffer: &mut String, cursor: &mut usize, key: event::KeyEvent) {
    match key.code {
        KeyCode::Left => {
            if *cursor > 0 {
                let mut new_pos = *cursor - 1;
                while new_pos > 0 && !buffer.is_char_boundary(new_pos) {
                    new_pos -= 1;
                }
                *cursor = new_pos;
            }
        }
        KeyCode::Right => {
            if *cursor < buffer.len() {
                let mut new_pos = *cursor + 1;
                while new_pos < buffer.len() && !buffer.is_char_boundary(new_pos) {
                    new_pos += 1;
                }
                *cursor = new_pos;
            }
        }
        KeyCode::Home => *cursor = 0,
        KeyCode::End => *cursor = buffer.len(),
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            buffer.drain(..*cursor);
            *cursor = 0;
        }
        KeyCode::Backspace => {
            if *cursor > 0 {
                let mut del_start = *cursor - 1;
                while del_start > 0 && !buffer.is_char_boundary(del_start) {
                    del_start -= 1;
                }
                buffer.drain(del_start..*cursor);
                *cursor = del_start;
            }
        }
        KeyCode::Delete => {
            if *cursor < buffer.len() {
                let mut del_end = *cursor + 1;
                while del_end < buffer.len() && !buffer.is_char_boundary(del_end) {
                    del_end += 1;
                }
                buffer.drain(*cursor..del_end);
            }
        }
        KeyCode::Char(c) => {
            if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                buffer.insert(*cursor, c);
                *cursor += c.len_utf8();
            }
        }
        _ => {}
    }
}

/// Result of applying an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyResult {
    Continue,
    Quit,
}

/// Apply an action to the application state.
///
/// Returns `ApplyResult::Quit` if the application should exit.
pub fn apply_action(app: &mut App, action: Action) -> ApplyResult {
    match action {
        Action::Quit => return ApplyResult::Quit,
        Action::Cancel => app.cancel_prompt(),
        Action::CommitPrompt => app.commit_prompt(),
        Action::Move(dx, dy) => app.move_cursor(dx, dy),
        Action::Page(dir) => {
            let delta = app.visible_rows as i32 * dir;
            app.move_cursor(0, delta);
        }

        Action::Refresh => {
            app.list.begin_loading();
            app.needs_refresh = true;
        }
        Action::NewSheet => app.open_editor(),
        Action::DeleteRecord => app.delete_current_record(),
        Action::DownloadRecord => app.download_current_record(),

        Action::Import => app.start_prompt(PromptKind::ImportPath),
        Action::EditCell => app.start_prompt(PromptKind::EditCell),
        Action::RenameColumn => app.start_prompt(PromptKind::RenameColumn),
        Action::EditTitle => app.start_prompt(PromptKind::Title),
        Action::AppendColumn => app.start_prompt(PromptKind::AddColumn),
        Action::ToggleRow => app.toggle_row(),
        Action::ToggleColumn => app.toggle_column(),
        Action::DeleteSelected => app.delete_selected(),
        Action::AppendRow => app.append_row(),
        Action::Export => app.export(),
        Action::Save => app.save(),
        Action::Back => {
            if app.screen == Screen::Editor {
                app.show_list();
            }
        }
    }
    ApplyResult::Continue
}

pub fn handle_prompt_text(app: &mut App, key: event::KeyEvent) {
    if app.mode == Mode::Prompt {
        handle_text_input(&mut app.input_buffer, &mut app.input_cursor, key);
    }
}
