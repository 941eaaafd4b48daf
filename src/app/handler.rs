use crate::app::action::Action;
use crate::app::commands::{self, ParsedCommand};
use crate::app::event::AppEvent;
use crate::app::state::*;
use crate::ui::theme::Attr;
use crate::ui::window::WindowKind;
use chrono::{DateTime, Utc};
use crossterm::event::{Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub fn handle_event(state: &mut AppState, event: AppEvent) -> Vec<Action> {
    match event {
        AppEvent::Terminal(cevent) => {
            state.dirty = true;
            handle_terminal(state, cevent)
        }
        AppEvent::Message {
            from,
            body,
            timestamp,
            private,
        } => handle_message(state, &from, &body, timestamp, private),
        AppEvent::Presence(contact) => {
            handle_presence(state, &contact);
            vec![]
        }
        AppEvent::SessionError { from, text } => {
            handle_session_error(state, &from, &text);
            vec![]
        }
        AppEvent::Tick => {
            if state.config.ui.clock {
                state.dirty = true;
            }
            vec![]
        }
        AppEvent::TrayTick => vec![Action::PollTray],
    }
}

fn handle_message(
    state: &mut AppState,
    from: &str,
    body: &str,
    timestamp: Option<DateTime<Utc>>,
    private: bool,
) -> Vec<Action> {
    let kind = if private {
        WindowKind::PrivateInRoom
    } else {
        WindowKind::Chat
    };
    let win = state.window_mut_or_create(from, kind);
    match win.incoming() {
        Some(mut incoming) => incoming.print_incoming_message(timestamp, from, body),
        None => {
            tracing::warn!(%from, kind = win.kind().label(), "message for a window without chat support");
            win.print_line('-', Attr::Them, &format!("{}: {}", from, body));
        }
    }

    let is_current = state.current_window().identity() == from;
    state.note_activity(from);

    if !is_current && state.config.ui.bell_on_message {
        vec![Action::Bell]
    } else {
        vec![]
    }
}

fn handle_presence(state: &mut AppState, contact: &Contact) {
    state.console_mut().show_contact(contact);
    state.note_activity(CONSOLE);

    if let Some(win) = state.window_mut(&contact.barejid) {
        win.show_contact(contact);
        state.note_activity(&contact.barejid);
    }
}

/// Routes a session error to the conversation's window (or the console).
/// When the window does not handle it, the error is printed generically.
fn handle_session_error(state: &mut AppState, from: &str, text: &str) {
    let identity = match state.find(from) {
        Some(_) => from.to_string(),
        None => CONSOLE.to_string(),
    };
    let Some(win) = state.window_mut(&identity) else {
        return;
    };
    if !win.handle_error_message(from, text) {
        win.print_line('-', Attr::Error, &format!("Error from {}: {}", from, text));
    }
    tracing::debug!(%from, %text, window = %identity, "session error");
    state.note_activity(&identity);
}

fn handle_terminal(state: &mut AppState, event: CEvent) -> Vec<Action> {
    match event {
        CEvent::Key(key) if key.kind != KeyEventKind::Release => handle_key(state, key),
        CEvent::Resize(cols, rows) => {
            state.resize(cols, rows);
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return vec![Action::Quit];
    }

    if key.modifiers.contains(KeyModifiers::ALT) {
        if let KeyCode::Char(c @ '0'..='9') = key.code {
            let n = c.to_digit(10).unwrap_or(0) as usize;
            let idx = if n == 0 { 9 } else { n - 1 };
            state.switch_to(idx);
            return vec![];
        }
    }

    let rows = state.page_rows();
    match key.code {
        KeyCode::Enter => {
            let text = state.input.take_text();
            submit(state, &text)
        }
        KeyCode::Backspace => {
            state.input.delete_back();
            vec![]
        }
        KeyCode::Left => {
            state.input.move_left();
            vec![]
        }
        KeyCode::Right => {
            state.input.move_right();
            vec![]
        }
        KeyCode::Up => {
            state.input.history_up();
            vec![]
        }
        KeyCode::Down => {
            state.input.history_down();
            vec![]
        }
        KeyCode::PageUp => {
            state.current_window_mut().page_up(rows);
            vec![]
        }
        KeyCode::PageDown => {
            state.current_window_mut().page_down(rows);
            vec![]
        }
        KeyCode::Char(c) => {
            state.input.insert_char(c);
            vec![]
        }
        _ => vec![],
    }
}

fn submit(state: &mut AppState, text: &str) -> Vec<Action> {
    if text.trim().is_empty() {
        return vec![];
    }
    if text.starts_with('/') {
        return handle_command(state, text);
    }

    let identity = state.current_window().identity().to_string();
    let kind = state.current_window().kind();
    if matches!(kind, WindowKind::Console | WindowKind::Command | WindowKind::Other) {
        state.print_to(&identity, '-', Attr::Error, "Not in a conversation. Try /help.");
    } else {
        print_outgoing(state, &identity, text);
    }
    vec![]
}

/// Echoes our own message into a conversation window.
fn print_outgoing(state: &mut AppState, identity: &str, text: &str) {
    let Some(win) = state.window_mut(identity) else {
        return;
    };
    let mut pen = win.print_time('-');
    pen.write_attr(Attr::Me, "me: ");
    pen.write(text);
    win.commit(pen);
    state.note_activity(identity);
    tracing::debug!(to = identity, "outgoing message");
}

/// Identity of the window `/help` writes into.
const HELP_WINDOW: &str = "Help";

fn handle_command(state: &mut AppState, text: &str) -> Vec<Action> {
    let current = state.current_window().identity().to_string();
    match commands::parse_command(text) {
        Some(ParsedCommand::Msg { target, text }) => {
            state.window_mut_or_create(&target, WindowKind::Chat);
            if let Some(idx) = state.find(&target) {
                state.switch_to(idx);
            }
            if let Some(text) = text {
                print_outgoing(state, &target, &text);
            }
            vec![]
        }
        Some(ParsedCommand::Join { room }) => {
            state.window_mut_or_create(&room, WindowKind::MultiUserChat);
            if let Some(idx) = state.find(&room) {
                state.switch_to(idx);
            }
            vec![]
        }
        Some(ParsedCommand::Win { number }) => {
            if !state.switch_to(number - 1) {
                state.print_to(&current, '-', Attr::Error, &format!("No window {}.", number));
            }
            vec![]
        }
        Some(ParsedCommand::Close) => {
            if !state.close(&current) {
                state.print_to(&current, '-', Attr::Error, "Cannot close the console window.");
            }
            vec![]
        }
        Some(ParsedCommand::Quit) => vec![Action::Quit],
        Some(ParsedCommand::Help) => {
            let win = state.window_mut_or_create(HELP_WINDOW, WindowKind::Command);
            for line in commands::HELP {
                win.print_line('-', Attr::Text, line);
            }
            if let Some(idx) = state.find(HELP_WINDOW) {
                state.switch_to(idx);
            }
            vec![]
        }
        None => {
            state.print_to(
                &current,
                '-',
                Attr::Error,
                &format!("Unknown command: {}", text.trim()),
            );
            vec![]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::tray::UnreadSource;
    use crate::ui::render::line_text;

    fn state() -> AppState {
        AppState::new(AppConfig::default(), 80, 24)
    }

    fn last_line(state: &AppState, identity: &str) -> String {
        let idx = state.find(identity).unwrap();
        state.windows()[idx]
            .lines()
            .last()
            .map(line_text)
            .unwrap_or_default()
    }

    fn type_line(state: &mut AppState, text: &str) -> Vec<Action> {
        for c in text.chars() {
            handle_key(state, KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
        handle_key(state, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))
    }

    fn message(from: &str, body: &str, private: bool) -> AppEvent {
        AppEvent::Message {
            from: from.into(),
            body: body.into(),
            timestamp: None,
            private,
        }
    }

    #[test]
    fn test_message_opens_chat_window() {
        let mut s = state();
        handle_event(&mut s, message("alice@example.org", "hello", false));
        let idx = s.find("alice@example.org").unwrap();
        assert_eq!(s.windows()[idx].kind(), WindowKind::Chat);
        assert!(last_line(&s, "alice@example.org").ends_with(" - alice@example.org: hello"));
        assert_eq!(s.total_unread(), 1);
    }

    #[test]
    fn test_private_message_opens_private_window() {
        let mut s = state();
        handle_event(&mut s, message("room@conf/bob", "/me nods", true));
        let idx = s.find("room@conf/bob").unwrap();
        assert_eq!(s.windows()[idx].kind(), WindowKind::PrivateInRoom);
        assert!(last_line(&s, "room@conf/bob").ends_with(" - *room@conf/bob nods"));
    }

    #[test]
    fn test_message_to_room_identity_falls_back() {
        let mut s = state();
        type_line(&mut s, "/join room@conf");
        handle_event(&mut s, message("room@conf", "hi", false));
        assert!(last_line(&s, "room@conf").ends_with(" - room@conf: hi"));
    }

    #[test]
    fn test_bell_only_for_background_windows() {
        let mut cfg = AppConfig::default();
        cfg.ui.bell_on_message = true;
        let mut s = AppState::new(cfg, 80, 24);
        let actions = handle_event(&mut s, message("alice", "ping", false));
        assert_eq!(actions, vec![Action::Bell]);

        let idx = s.find("alice").unwrap();
        s.switch_to(idx);
        let actions = handle_event(&mut s, message("alice", "ping", false));
        assert!(actions.is_empty());
    }

    #[test]
    fn test_presence_goes_to_console_and_chat() {
        let mut s = state();
        handle_event(&mut s, message("carol@example.org", "hey", false));
        handle_event(
            &mut s,
            AppEvent::Presence(Contact {
                barejid: "carol@example.org".into(),
                name: Some("Carol".into()),
                presence: Some("xa".into()),
                status: None,
                last_activity: None,
            }),
        );
        assert!(last_line(&s, CONSOLE).ends_with(" - Carol is xa"));
        assert!(last_line(&s, "carol@example.org").ends_with(" - Carol is xa"));
    }

    #[test]
    fn test_unhandled_error_is_printed_by_caller() {
        let mut s = state();
        handle_event(&mut s, message("dave", "hi", false));
        handle_event(
            &mut s,
            AppEvent::SessionError {
                from: "dave".into(),
                text: "service-unavailable".into(),
            },
        );
        assert!(last_line(&s, "dave").ends_with(" - Error from dave: service-unavailable"));

        handle_event(
            &mut s,
            AppEvent::SessionError {
                from: "nobody".into(),
                text: "item-not-found".into(),
            },
        );
        assert!(last_line(&s, CONSOLE).ends_with(" - Error from nobody: item-not-found"));
    }

    #[test]
    fn test_room_conflict_handled_by_room() {
        let mut s = state();
        type_line(&mut s, "/join room@conf");
        handle_event(
            &mut s,
            AppEvent::SessionError {
                from: "room@conf".into(),
                text: "conflict".into(),
            },
        );
        assert!(last_line(&s, "room@conf").ends_with(" - Nickname already in use."));
    }

    #[test]
    fn test_msg_command_echoes_and_switches() {
        let mut s = state();
        type_line(&mut s, "/msg bob hi bob");
        assert_eq!(s.current_window().identity(), "bob");
        assert!(last_line(&s, "bob").ends_with(" - me: hi bob"));
        assert_eq!(s.total_unread(), 0);

        type_line(&mut s, "plain text");
        assert!(last_line(&s, "bob").ends_with(" - me: plain text"));
    }

    #[test]
    fn test_close_and_quit_commands() {
        let mut s = state();
        type_line(&mut s, "/close");
        assert!(last_line(&s, CONSOLE).ends_with("Cannot close the console window."));

        type_line(&mut s, "/msg bob");
        type_line(&mut s, "/close");
        assert!(s.find("bob").is_none());
        assert_eq!(s.current_index(), 0);

        assert_eq!(type_line(&mut s, "/quit"), vec![Action::Quit]);
    }

    #[test]
    fn test_help_opens_command_window() {
        let mut s = state();
        type_line(&mut s, "/help");
        assert_eq!(s.current_window().identity(), HELP_WINDOW);
        assert_eq!(s.current_window().kind(), WindowKind::Command);
        assert_eq!(s.current_window().line_count(), commands::HELP.len());
        assert_eq!(s.total_unread(), 0);

        type_line(&mut s, "/help");
        assert_eq!(s.windows().len(), 2);
        assert_eq!(s.current_window().line_count(), 2 * commands::HELP.len());

        type_line(&mut s, "hello");
        assert!(last_line(&s, HELP_WINDOW).ends_with("Not in a conversation. Try /help."));
    }

    #[test]
    fn test_alt_digit_switches_window() {
        let mut s = state();
        handle_event(&mut s, message("alice", "hi", false));
        handle_key(&mut s, KeyEvent::new(KeyCode::Char('2'), KeyModifiers::ALT));
        assert_eq!(s.current_window().identity(), "alice");
        assert_eq!(s.total_unread(), 0);
    }

    #[test]
    fn test_tray_tick_requests_poll() {
        let mut s = state();
        assert_eq!(handle_event(&mut s, AppEvent::TrayTick), vec![Action::PollTray]);
    }
}
