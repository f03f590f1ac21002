//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes. Dispatch is screen-first (the login screen
//! captures everything), then mode-first for the directory overlays.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, LoginFocus, Mode, Screen};

/// Handle a keyboard event against the current screen and mode.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<()> {
    if app.screen() == Screen::Login {
        return handle_login_input(app, key).await;
    }

    match app.mode {
        Mode::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.mode = Mode::Normal;
            }
        }
        Mode::ConfirmingQuit => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.should_quit = true;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.mode = Mode::Normal;
            }
            _ => {}
        },
        Mode::Searching => handle_search_input(app, key),
        Mode::Editing => handle_edit_input(app, key),
        Mode::ConfirmingDelete => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.confirm_delete();
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.cancel_delete();
            }
            _ => {}
        },
        Mode::Normal => handle_directory_input(app, key),
    }

    Ok(())
}

fn handle_directory_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.mode = Mode::ConfirmingQuit;
        }
        KeyCode::Char('?') => {
            app.mode = Mode::ShowingHelp;
        }
        KeyCode::Char('/') => {
            app.search_term.clear();
            app.mode = Mode::Searching;
        }
        KeyCode::Char('f') => {
            app.cycle_search_field();
        }
        KeyCode::Esc => {
            app.clear_search();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.select_prev();
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.select_next();
        }
        KeyCode::Left | KeyCode::Char('p') => {
            let previous = app.current_page.saturating_sub(1);
            app.change_page(previous);
        }
        KeyCode::Right | KeyCode::Char('n') => {
            app.change_page(app.current_page + 1);
        }
        KeyCode::Char(c @ '1'..='9') => {
            // Jump straight to a numbered page; out-of-range digits are ignored
            app.change_page(c.to_digit(10).unwrap_or(1) as u64);
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(user) = app.selected_user() {
                app.begin_edit(&user);
            }
        }
        KeyCode::Char('d') => {
            if let Some(user) = app.selected_user() {
                app.begin_delete(&user);
            }
        }
        KeyCode::Char('r') => {
            app.refresh();
        }
        KeyCode::Char('L') => {
            app.logout();
        }
        _ => {}
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.mode = Mode::Normal;
            app.clear_search();
        }
        KeyCode::Enter => {
            // Keep the search term active
            app.mode = Mode::Normal;
        }
        KeyCode::Backspace => {
            app.search_term.pop();
            app.selection = 0;
        }
        KeyCode::Char(c) => {
            app.search_term.push(c);
            // Reset selection when the filter changes
            app.selection = 0;
        }
        _ => {}
    }
}

fn handle_edit_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.cancel_edit();
        }
        KeyCode::Enter => {
            app.submit_edit();
        }
        KeyCode::Down | KeyCode::Tab => {
            if let Some(ref mut form) = app.edit_form {
                form.focus = form.focus.next();
            }
        }
        KeyCode::Up | KeyCode::BackTab => {
            if let Some(ref mut form) = app.edit_form {
                form.focus = form.focus.prev();
            }
        }
        KeyCode::Backspace => {
            if let Some(ref mut form) = app.edit_form {
                form.focused_field_mut().pop();
            }
        }
        KeyCode::Char(c) => {
            if app.can_add_edit_char() {
                if let Some(ref mut form) = app.edit_form {
                    form.focused_field_mut().push(c);
                }
            }
        }
        _ => {}
    }
}

async fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Esc => {
            // Quit if on login screen
            app.should_quit = true;
        }
        KeyCode::Down | KeyCode::Tab => {
            app.login.focus = app.login.focus.next();
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.login.focus = app.login.focus.prev();
        }
        KeyCode::Enter => match app.login.focus {
            LoginFocus::Email => {
                app.login.focus = LoginFocus::Password;
            }
            LoginFocus::ShowPassword => {
                app.login.show_password = !app.login.show_password;
            }
            LoginFocus::Password | LoginFocus::Button => {
                // Awaited inline; each submission is an independent attempt
                app.submit_login().await;
            }
        },
        KeyCode::Backspace => match app.login.focus {
            LoginFocus::Email => {
                app.login.email.pop();
            }
            LoginFocus::Password => {
                app.login.password.pop();
            }
            LoginFocus::ShowPassword | LoginFocus::Button => {}
        },
        KeyCode::Char(' ') if app.login.focus == LoginFocus::ShowPassword => {
            app.login.show_password = !app.login.show_password;
        }
        KeyCode::Char(c) => match app.login.focus {
            LoginFocus::Email => {
                if app.can_add_email_char() {
                    app.login.email.push(c);
                }
            }
            LoginFocus::Password => {
                if app.can_add_password_char() {
                    app.login.password.push(c);
                }
            }
            LoginFocus::ShowPassword | LoginFocus::Button => {}
        },
        _ => {}
    }
    Ok(())
}
