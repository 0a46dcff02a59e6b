//! Keyboard and mouse input handling.
//!
//! Maps terminal events to [`App`] actions.  Actions that need I/O come
//! back as [`Command`]s for the main loop to run.
//!
//! ## For contributors
//!
//! To add a new keybinding:
//!
//! 1. Add a method on [`App`] for the action (if one doesn't exist).
//! 2. Add a `KeyCode` match arm in [`handle_key_event`] that calls it.
//! 3. Update the help text in [`crate::ui`]'s status bar.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};

use crate::app::{App, Command};
use crate::share::SharePlatform;
use crate::view::Tab;

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Vec<Command> {
    if key.kind != KeyEventKind::Press {
        return Vec::new();
    }

    // While a share menu is open the platform keys pick a target; anything
    // else closes the menu first, like a click outside it.
    if app.view.open_menu().is_some() {
        if let Some(platform) = hotkey_platform(key.code) {
            return app.dispatch_share_from_menu(platform);
        }
        app.dismiss_menus();
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('s')) {
            return Vec::new();
        }
    }

    let command = match key.code {
        KeyCode::Char('q') => {
            app.quit = true;
            None
        }
        KeyCode::Esc => {
            app.escape();
            None
        }
        KeyCode::Tab => {
            app.next_tab();
            None
        }
        KeyCode::Char('1') => {
            app.select_tab(Tab::All);
            None
        }
        KeyCode::Char('2') => {
            app.select_tab(Tab::Popular);
            None
        }
        KeyCode::Char('3') => {
            app.select_tab(Tab::Favorites);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.select_next();
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.select_previous();
            None
        }
        KeyCode::Home | KeyCode::Char('g') => {
            app.select_first();
            None
        }
        KeyCode::End | KeyCode::Char('G') => {
            app.select_last();
            None
        }
        KeyCode::Char('f') => app.toggle_favorite_for_selection(),
        KeyCode::Char('s') => {
            app.toggle_share_menu_for_selection();
            None
        }
        KeyCode::Char('y') => app.copy_selected_link(),
        KeyCode::Char('o') => app.open_selected(),
        KeyCode::Enter => app.activate_selection(),
        KeyCode::Char('r') => Some(app.begin_refresh()),
        KeyCode::Char('F') => Some(app.begin_ingest()),
        _ => None,
    };

    command.into_iter().collect()
}

fn hotkey_platform(code: KeyCode) -> Option<SharePlatform> {
    match code {
        KeyCode::Char(c) => SharePlatform::from_hotkey(c),
        _ => None,
    }
}

/// Any click closes open share menus.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    if let MouseEventKind::Down(_) = mouse.kind {
        app.dismiss_menus();
    }
}
