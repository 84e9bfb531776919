use crate::application::{App, AppMode};
use crate::infrastructure::ClipboardService;
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match app.mode {
            AppMode::Normal => Self::handle_normal_mode(app, key, modifiers),
            AppMode::Editing => Self::handle_editing_mode(app, key),
            AppMode::Help => Self::handle_help_mode(app, key),
        }
    }

    fn handle_normal_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('n') => {
                    app.add_row();
                    return;
                }
                KeyCode::Char('d') => {
                    app.remove_focused_row();
                    return;
                }
                _ => {}
            }
        }

        app.status_message = None;

        match key {
            KeyCode::Tab | KeyCode::Down | KeyCode::Char('j') => app.focus_next(),
            KeyCode::BackTab | KeyCode::Up | KeyCode::Char('k') => app.focus_previous(),
            KeyCode::Enter | KeyCode::F(2) | KeyCode::Char(' ') => app.activate(),
            KeyCode::Char('a') => app.add_row(),
            KeyCode::Char('d') | KeyCode::Delete => app.remove_focused_row(),
            KeyCode::Backspace => app.clear_focused(),
            KeyCode::Char('y') => {
                if let Some(text) = app.copy_text() {
                    let result = ClipboardService::copy(&text).map(|_| text);
                    app.set_copy_result(result);
                }
            }
            KeyCode::F(1) | KeyCode::Char('?') => {
                app.mode = AppMode::Help;
                app.help_scroll = 0;
            }
            KeyCode::Char('q') => {
                // Will be handled by main loop
            }
            // digits start editing the focused input right away
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' || c == '-' => {
                app.start_editing();
                if matches!(app.mode, AppMode::Editing) {
                    app.insert_char(c);
                }
            }
            _ => {}
        }
    }

    fn handle_editing_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => app.finish_editing(),
            KeyCode::Tab | KeyCode::Down => {
                app.finish_editing();
                app.focus_next();
            }
            KeyCode::BackTab | KeyCode::Up => {
                app.finish_editing();
                app.focus_previous();
            }
            KeyCode::Esc => app.cancel_editing(),
            KeyCode::Backspace => app.delete_backward(),
            KeyCode::Delete => app.delete_forward(),
            KeyCode::Left => app.move_cursor_left(),
            KeyCode::Right => app.move_cursor_right(),
            KeyCode::Home => app.move_cursor_home(),
            KeyCode::End => app.move_cursor_end(),
            KeyCode::Char(c) => app.insert_char(c),
            _ => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.mode = AppMode::Normal;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.help_scroll = app.help_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }
}
