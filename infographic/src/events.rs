//! Event handling for the infographic TUI

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};

use crate::app::{App, Screen, SlotAction};
use crate::ui::Overlay;

/// Result of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
    NeedsRedraw,
}

/// Handle a terminal event
pub fn handle_event(app: &mut App, event: Event) -> EventResult {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key_event(app, key),
        Event::Mouse(mouse) => handle_mouse_event(app, mouse),
        Event::Resize(_, _) => EventResult::NeedsRedraw,
        _ => EventResult::Continue,
    }
}

/// Handle a mouse event
fn handle_mouse_event(app: &mut App, mouse: MouseEvent) -> EventResult {
    if app.screen != Screen::Feed || app.has_overlay() {
        return EventResult::Continue;
    }
    match mouse.kind {
        MouseEventKind::ScrollUp => {
            app.select_prev();
            EventResult::NeedsRedraw
        }
        MouseEventKind::ScrollDown => {
            app.select_next();
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Handle a key event
fn handle_key_event(app: &mut App, key: KeyEvent) -> EventResult {
    // Global shortcuts (always work)
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return EventResult::Quit;
    }

    // Handle overlay keys first
    if app.has_overlay() {
        return handle_overlay_key(app, key);
    }

    match app.screen {
        Screen::Input => handle_input_screen(app, key),
        Screen::Feed => handle_feed_screen(app, key),
    }
}

/// Keys on the topic screen: everything printable goes into the topic.
fn handle_input_screen(app: &mut App, key: KeyEvent) -> EventResult {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('l') => app.request_slot_action(SlotAction::Load),
            KeyCode::Char('w') => app.open_creative(),
            KeyCode::Char('t') => app.toggle_theme(),
            _ => return EventResult::Continue,
        }
        return EventResult::NeedsRedraw;
    }

    match key.code {
        KeyCode::Esc => return EventResult::Quit,
        KeyCode::Enter => app.submit_topic(),
        KeyCode::F(1) => app.toggle_help(),
        KeyCode::Char(c) => {
            app.clear_status();
            app.input_mut().insert(c);
        }
        KeyCode::Backspace => app.input_mut().backspace(),
        KeyCode::Delete => app.input_mut().delete(),
        KeyCode::Left => app.input_mut().left(),
        KeyCode::Right => app.input_mut().right(),
        KeyCode::Home => app.input_mut().home(),
        KeyCode::End => app.input_mut().end(),
        _ => return EventResult::Continue,
    }
    EventResult::NeedsRedraw
}

/// Keys on the feed screen
fn handle_feed_screen(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Char('q') => return EventResult::Quit,

        // Navigation
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev(),
        KeyCode::Char('g') | KeyCode::Home => app.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.select_last(),
        KeyCode::Char(' ') => app.skip_reveal(),

        // Cards
        KeyCode::Char('m') => app.load_more(),
        KeyCode::Char('r') => app.regenerate_selected(),
        KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
        KeyCode::Char('c') => app.cycle_chart(),
        KeyCode::Char('w') => app.open_creative(),

        // Session
        KeyCode::Char('s') => app.request_slot_action(SlotAction::Save),
        KeyCode::Char('L') => app.request_slot_action(SlotAction::Load),
        KeyCode::Char('X') => app.request_slot_action(SlotAction::Clear),
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('x') | KeyCode::Esc => {
            app.feed.dismiss_error();
            app.clear_status();
        }
        KeyCode::Char('n') => app.back_to_input(),
        KeyCode::Char('?') | KeyCode::F(1) => app.toggle_help(),

        _ => return EventResult::Continue,
    }
    EventResult::NeedsRedraw
}

/// Handle keys when an overlay is shown
fn handle_overlay_key(app: &mut App, key: KeyEvent) -> EventResult {
    if matches!(app.overlay(), Some(Overlay::Help)) {
        return match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::F(1) => {
                app.close_overlay();
                EventResult::NeedsRedraw
            }
            _ => EventResult::Continue,
        };
    }

    match key.code {
        KeyCode::Esc => app.close_overlay(),
        KeyCode::Enter => app.run_creative(),
        _ => {
            let Some(form) = app.creative_form_mut() else {
                return EventResult::Continue;
            };
            match key.code {
                KeyCode::Up => form.prev_tool(),
                KeyCode::Down => form.next_tool(),
                KeyCode::Tab | KeyCode::BackTab => form.next_field(),
                KeyCode::Char(c) => form.editor_mut().insert(c),
                KeyCode::Backspace => form.editor_mut().backspace(),
                KeyCode::Delete => form.editor_mut().delete(),
                KeyCode::Left => form.editor_mut().left(),
                KeyCode::Right => form.editor_mut().right(),
                KeyCode::Home => form.editor_mut().home(),
                KeyCode::End => form.editor_mut().end(),
                _ => return EventResult::Continue,
            }
        }
    }
    EventResult::NeedsRedraw
}

#[cfg(test)]
mod tests {
    use super::*;
    use infographic_core::{Card, MemorySlot, MockGenerator, MockResponse};
    use std::sync::Arc;

    fn app(responses: Vec<MockResponse>) -> App {
        App::new(
            Arc::new(MockGenerator::new(responses)),
            Box::new(MemorySlot::new()),
        )
    }

    fn press(app: &mut App, code: KeyCode) -> EventResult {
        handle_event(app, Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn ctrl(app: &mut App, c: char) -> EventResult {
        handle_event(
            app,
            Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)),
        )
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let mut app = app(vec![]);
        assert_eq!(ctrl(&mut app, 'c'), EventResult::Quit);
        app.toggle_help();
        assert_eq!(ctrl(&mut app, 'c'), EventResult::Quit);
    }

    #[test]
    fn test_letters_go_into_topic() {
        let mut app = app(vec![]);
        for c in "quit?".chars() {
            assert_eq!(press(&mut app, KeyCode::Char(c)), EventResult::NeedsRedraw);
        }
        assert_eq!(app.input().as_str(), "quit?");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.input().as_str(), "quit");
        assert_eq!(press(&mut app, KeyCode::Esc), EventResult::Quit);
    }

    #[tokio::test]
    async fn test_enter_submits_topic() {
        let mut app = app(vec![MockResponse::cards(vec![Card::title("Tea")])]);
        for c in "Tea".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, Screen::Feed);
        assert!(app.feed.is_busy());
        assert_eq!(app.feed.topic(), Some("Tea"));
    }

    #[test]
    fn test_feed_keys() {
        let mut app = app(vec![]);
        app.feed
            .restore(vec![Card::title("Tea"), Card::text("Tea is old.")]);
        app.screen = Screen::Feed;

        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.selected(), 1);
        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.selected(), 0);

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.feed.len(), 1);

        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.pending_slot_action(), Some(SlotAction::Save));

        let dark = app.theme.mode;
        press(&mut app, KeyCode::Char('t'));
        assert_ne!(app.theme.mode, dark);

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.screen, Screen::Input);
        assert!(app.feed.is_empty());
    }

    #[test]
    fn test_help_overlay_swallows_keys() {
        let mut app = app(vec![]);
        app.feed.restore(vec![Card::title("Tea")]);
        app.screen = Screen::Feed;

        press(&mut app, KeyCode::Char('?'));
        assert!(app.has_overlay());
        assert_eq!(press(&mut app, KeyCode::Char('d')), EventResult::Continue);
        assert_eq!(app.feed.len(), 1);
        press(&mut app, KeyCode::Esc);
        assert!(!app.has_overlay());
    }

    #[test]
    fn test_creative_overlay_typing_and_enter() {
        let mut app = app(vec![]);
        ctrl(&mut app, 'w');
        assert!(app.has_overlay());

        press(&mut app, KeyCode::Down);
        for c in "dedicated".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);

        assert!(!app.has_overlay());
        assert_eq!(app.feed.len(), 1);
        assert_eq!(app.feed.cards()[0].kind().tag(), "explode");
    }

    #[test]
    fn test_error_dismissed() {
        let mut app = app(vec![]);
        app.feed.restore(vec![Card::title("Tea")]);
        app.feed.set_error("boom");
        app.screen = Screen::Feed;

        press(&mut app, KeyCode::Char('x'));
        assert!(app.feed.error().is_none());
    }
}
