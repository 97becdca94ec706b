use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use dunder_core::Route;
use ratatui::layout::Rect;
use tracing::debug;
use crate::app::{App, ChatPage, FocusPane, InputMode};
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize => {}
        AppEvent::Tick => app.tick_animation(),
    }
    app.poll_reply().await;
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        // Route shortcuts, in sidebar order
        KeyCode::Char(c @ '1'..='6') => {
            let index = c as usize - '1' as usize;
            if let Some(route) = Route::all().get(index).copied() {
                app.navigate(route);
            }
            return;
        }
        KeyCode::Tab | KeyCode::BackTab => {
            app.focus = match app.focus {
                FocusPane::Sidebar if app.chat.is_some() => FocusPane::Chat,
                _ => FocusPane::Sidebar,
            };
            return;
        }
        _ => {}
    }

    match app.focus {
        FocusPane::Sidebar => handle_sidebar(app, key),
        FocusPane::Chat => handle_chat_normal(app, key),
    }
}

fn handle_sidebar(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.sidebar_down(),
        KeyCode::Char('k') | KeyCode::Up => app.sidebar_up(),
        KeyCode::Char('g') | KeyCode::Home => app.sidebar_cursor = 0,
        KeyCode::Char('G') | KeyCode::End => app.sidebar_cursor = Route::all().len() - 1,
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => app.open_sidebar_selection(),
        _ => {}
    }
}

fn handle_chat_normal(app: &mut App, key: KeyEvent) {
    let Some(page) = app.chat.as_mut() else {
        app.focus = FocusPane::Sidebar;
        return;
    };

    match key.code {
        KeyCode::Char('i') | KeyCode::Char('/') | KeyCode::Enter => {
            app.input_mode = InputMode::Editing;
        }
        KeyCode::Char('h') | KeyCode::Left | KeyCode::Esc => {
            page.view.selected = None;
            app.focus = FocusPane::Sidebar;
        }

        // Message cursor
        KeyCode::Char('k') | KeyCode::Up => page.select_prev_message(),
        KeyCode::Char('j') | KeyCode::Down => page.select_next_message(),
        KeyCode::Char('r') => {
            if !page.replay_selected() {
                debug!("nothing to replay");
            }
        }
        KeyCode::Char('t') => page.toggle_selected_details(),

        // Scrolling
        KeyCode::PageUp => page.view.scroll_up(page.view.height.max(2) / 2),
        KeyCode::PageDown => page.view.scroll_down(page.view.height.max(2) / 2),
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            page.view.scroll_up(page.view.height.max(2) / 2);
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            page.view.scroll_down(page.view.height.max(2) / 2);
        }
        KeyCode::End | KeyCode::Char('G') => page.view.scroll_to_bottom(),
        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        app.input_mode = InputMode::Normal;
        return;
    }

    if key.code == KeyCode::Enter {
        if let Err(e) = app.submit_input() {
            debug!(reason = %e, "submission refused");
        }
        return;
    }

    let Some(page) = app.chat.as_mut() else {
        app.input_mode = InputMode::Normal;
        return;
    };
    // The input is disabled while a request is outstanding
    if page.is_busy() {
        return;
    }
    edit_input(page, key);
}

fn edit_input(page: &mut ChatPage, key: KeyEvent) {
    match key.code {
        KeyCode::Backspace => {
            if page.cursor > 0 {
                page.cursor -= 1;
                let byte_pos = char_to_byte_index(&page.input, page.cursor);
                page.input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = page.input.chars().count();
            if page.cursor < char_count {
                let byte_pos = char_to_byte_index(&page.input, page.cursor);
                page.input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            page.cursor = page.cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = page.input.chars().count();
            page.cursor = (page.cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            page.cursor = 0;
        }
        KeyCode::End => {
            page.cursor = page.input.chars().count();
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(&page.input, page.cursor);
            page.input.insert(byte_pos, c);
            page.cursor += 1;
        }
        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let x = mouse.column;
    let y = mouse.row;

    let in_sidebar = app.sidebar_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);
    let in_thread = app.thread_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);

    match mouse.kind {
        MouseEventKind::ScrollDown => {
            if in_thread {
                if let Some(page) = app.chat.as_mut() {
                    page.view.scroll_down(3);
                }
            } else if in_sidebar {
                app.sidebar_down();
            }
        }
        MouseEventKind::ScrollUp => {
            if in_thread {
                if let Some(page) = app.chat.as_mut() {
                    page.view.scroll_up(3);
                }
            } else if in_sidebar {
                app.sidebar_up();
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dunder_core::Dispatcher;

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn app_at(route: Route) -> App {
        App::new(Dispatcher::new("http://127.0.0.1:9"), None, route)
    }

    async fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_event(app, key(KeyCode::Char(c))).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_sidebar_opens_chat_in_editing_mode() {
        let mut app = app_at(Route::About);
        handle_event(&mut app, key(KeyCode::Down)).await.unwrap();
        handle_event(&mut app, key(KeyCode::Enter)).await.unwrap();

        assert_eq!(app.route, Route::Orchestrator);
        assert_eq!(app.focus, FocusPane::Chat);
        assert_eq!(app.input_mode, InputMode::Editing);
    }

    #[tokio::test]
    async fn test_utf8_editing() {
        let mut app = app_at(Route::Finance);
        app.focus = FocusPane::Chat;
        app.input_mode = InputMode::Editing;

        type_text(&mut app, "açã").await;
        handle_event(&mut app, key(KeyCode::Left)).await.unwrap();
        handle_event(&mut app, key(KeyCode::Backspace)).await.unwrap();
        type_text(&mut app, "é").await;

        let page = app.chat.as_ref().unwrap();
        assert_eq!(page.input, "aéã");
        assert_eq!(page.cursor, 2);
    }

    #[tokio::test]
    async fn test_input_ignored_while_busy() {
        let mut app = app_at(Route::Finance);
        app.focus = FocusPane::Chat;
        app.input_mode = InputMode::Editing;

        type_text(&mut app, "total?").await;
        handle_event(&mut app, key(KeyCode::Enter)).await.unwrap();

        // The single-threaded test runtime has not run the request task yet
        let page = app.chat.as_ref().unwrap();
        assert!(page.is_busy());
        assert_eq!(page.input, "");
        assert_eq!(page.cursor, 0);

        type_text(&mut app, "mais").await;
        handle_event(&mut app, key(KeyCode::Backspace)).await.unwrap();
        handle_event(&mut app, key(KeyCode::End)).await.unwrap();

        let page = app.chat.as_ref().unwrap();
        assert!(page.is_busy());
        assert_eq!(page.input, "");
        assert_eq!(page.cursor, 0);
        let messages = page.widget.session().messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages.get(1).unwrap().content, "total?");
    }

    #[tokio::test]
    async fn test_digit_shortcut_navigates() {
        let mut app = app_at(Route::About);
        handle_event(&mut app, key(KeyCode::Char('6'))).await.unwrap();
        assert_eq!(app.route, Route::Michael);
        handle_event(&mut app, key(KeyCode::Char('q'))).await.unwrap();
        assert!(app.should_quit);
    }
}
