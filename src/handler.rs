use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use tokio::sync::mpsc;

use crate::app::{App, AppMode};
use crate::event::Event;
use crate::source::{spawn_children_fetch, spawn_roots_fetch};

/// Handle a key event, dispatching on the current mode.
pub fn handle_key_event(app: &mut App, key: KeyEvent, tx: &mpsc::UnboundedSender<Event>) {
    match app.mode {
        AppMode::Normal => handle_normal_key(app, key, tx),
        AppMode::Filter => handle_filter_key(app, key),
        AppMode::Search => handle_search_key(app, key),
        AppMode::Help => handle_help_key(app, key),
    }
}

fn handle_normal_key(app: &mut App, key: KeyEvent, tx: &mpsc::UnboundedSender<Event>) {
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
        KeyCode::Char('g') | KeyCode::Home => app.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.select_last(),

        KeyCode::Enter => {
            // Toggle: collapse when expanded, expand otherwise.
            if app.tree_state.selected_is_expanded() {
                app.collapse_selected();
            } else {
                expand_and_fetch(app, tx);
            }
        }
        KeyCode::Char('l') | KeyCode::Right => expand_and_fetch(app, tx),
        KeyCode::Char('h') | KeyCode::Left => app.collapse_selected(),

        KeyCode::Char('/') => app.open_filter(),
        KeyCode::Char('p') if key.modifiers.contains(KeyModifiers::CONTROL) => app.open_search(),
        KeyCode::Char('?') => app.toggle_help(),

        KeyCode::Char('r') => {
            app.set_status_message("Reloading...".to_string());
            spawn_roots_fetch(app.source.clone(), tx.clone());
        }
        KeyCode::Char('w') => {
            app.watcher_active = !app.watcher_active;
            let state = if app.watcher_active { "on" } else { "off" };
            app.set_status_message(format!("Watcher {state}"));
        }

        KeyCode::Esc => {
            if app.tree_state.is_filtering {
                app.clear_filter();
            }
        }
        _ => {}
    }
}

fn expand_and_fetch(app: &mut App, tx: &mpsc::UnboundedSender<Event>) {
    if let Some(path) = app.expand_selected() {
        spawn_children_fetch(app.source.clone(), path, tx.clone());
    }
}

fn handle_filter_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.clear_filter(),
        KeyCode::Enter => app.confirm_filter(),
        KeyCode::Backspace => app.filter_delete_char(),
        KeyCode::Down => app.select_next(),
        KeyCode::Up => app.select_previous(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.filter_input_char(c)
        }
        _ => {}
    }
}

fn handle_search_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_search(),
        KeyCode::Enter => app.accept_search(),
        KeyCode::Backspace => app.search_delete_char(),
        KeyCode::Down => app.search_select_next(),
        KeyCode::Up => app.search_select_previous(),
        KeyCode::Char('j') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.search_select_next()
        }
        KeyCode::Char('k') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.search_select_previous()
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.close_search(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.search_input_char(c)
        }
        _ => {}
    }
}

fn handle_help_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Enter => {
            app.mode = AppMode::Normal;
        }
        _ => {}
    }
}

/// Handle a mouse event (scroll wheel navigation in normal mode).
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    if app.mode != AppMode::Normal {
        return;
    }
    match mouse.kind {
        MouseEventKind::ScrollDown => app.select_next(),
        MouseEventKind::ScrollUp => app.select_previous(),
        _ => {}
    }
}
