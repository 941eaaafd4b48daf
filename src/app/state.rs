use crate::config::AppConfig;
use crate::tray::UnreadSource;
use crate::ui::theme::Attr;
use crate::ui::window::{Window, WindowKind};
use chrono::{DateTime, Local};

pub const CONSOLE: &str = "Console";

/// A roster entry as delivered by the session layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub barejid: String,
    pub name: Option<String>,
    pub presence: Option<String>,
    pub status: Option<String>,
    pub last_activity: Option<DateTime<Local>>,
}

#[derive(Debug)]
pub struct InputState {
    pub text: String,
    pub cursor: usize,
    pub history: Vec<String>,
    pub history_index: Option<usize>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            cursor: 0,
            history: Vec::new(),
            history_index: None,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn delete_back(&mut self) {
        if self.cursor > 0 {
            let prev = self.text[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.text.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.text[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn move_right(&mut self) {
        if let Some(c) = self.text[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    pub fn take_text(&mut self) -> String {
        let text = std::mem::take(&mut self.text);
        self.cursor = 0;
        self.history_index = None;
        if !text.is_empty() {
            self.history.push(text.clone());
        }
        text
    }

    pub fn history_up(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let idx = match self.history_index {
            Some(i) if i > 0 => i - 1,
            Some(_) => return,
            None => self.history.len() - 1,
        };
        self.history_index = Some(idx);
        self.text = self.history[idx].clone();
        self.cursor = self.text.len();
    }

    pub fn history_down(&mut self) {
        match self.history_index {
            Some(i) if i + 1 < self.history.len() => {
                self.history_index = Some(i + 1);
                self.text = self.history[i + 1].clone();
                self.cursor = self.text.len();
            }
            Some(_) => {
                self.history_index = None;
                self.text.clear();
                self.cursor = 0;
            }
            None => {}
        }
    }
}

/// Open windows, in display order. Index 0 is always the console.
pub struct AppState {
    pub config: AppConfig,
    windows: Vec<Window>,
    current: usize,
    pub input: InputState,
    pub cols: u16,
    pub rows: u16,
    pub should_quit: bool,
    pub dirty: bool,
}

impl AppState {
    pub fn new(config: AppConfig, cols: u16, rows: u16) -> Self {
        Self {
            config,
            windows: vec![Window::create(CONSOLE, cols, WindowKind::Console)],
            current: 0,
            input: InputState::new(),
            cols,
            rows,
            should_quit: false,
            dirty: true,
        }
    }

    /// Rows available to the current window once the chrome is drawn.
    pub fn page_rows(&self) -> usize {
        self.rows.saturating_sub(3) as usize
    }

    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_window(&self) -> &Window {
        &self.windows[self.current]
    }

    pub fn current_window_mut(&mut self) -> &mut Window {
        &mut self.windows[self.current]
    }

    pub fn console_mut(&mut self) -> &mut Window {
        &mut self.windows[0]
    }

    pub fn find(&self, identity: &str) -> Option<usize> {
        self.windows.iter().position(|w| w.identity() == identity)
    }

    pub fn window_mut(&mut self, identity: &str) -> Option<&mut Window> {
        self.windows.iter_mut().find(|w| w.identity() == identity)
    }

    /// Returns the window for `identity`, creating it with `kind` on first use.
    /// An existing window keeps the kind it was created with.
    pub fn window_mut_or_create(&mut self, identity: &str, kind: WindowKind) -> &mut Window {
        let idx = match self.find(identity) {
            Some(idx) => idx,
            None => {
                self.windows.push(Window::create(identity, self.cols, kind));
                self.dirty = true;
                self.windows.len() - 1
            }
        };
        &mut self.windows[idx]
    }

    /// Bookkeeping after a line was written to `identity`: unread counting for
    /// background windows, bottom pinning for windows that are not paged.
    pub fn note_activity(&mut self, identity: &str) {
        let Some(idx) = self.find(identity) else {
            return;
        };
        let rows = self.page_rows();
        let is_current = idx == self.current;
        let win = &mut self.windows[idx];
        if !is_current {
            win.unread += 1;
        }
        if !win.paged {
            win.scroll_to_bottom(rows);
        }
        self.dirty = true;
    }

    pub fn print_to(&mut self, identity: &str, marker: char, attr: Attr, text: &str) {
        if let Some(win) = self.window_mut(identity) {
            win.print_line(marker, attr, text);
            self.note_activity(identity);
        }
    }

    pub fn switch_to(&mut self, idx: usize) -> bool {
        if idx >= self.windows.len() {
            return false;
        }
        self.current = idx;
        let rows = self.page_rows();
        let win = &mut self.windows[idx];
        win.unread = 0;
        if !win.paged {
            win.scroll_to_bottom(rows);
        }
        self.dirty = true;
        true
    }

    /// Closes and destroys a window. The console cannot be closed.
    pub fn close(&mut self, identity: &str) -> bool {
        let Some(idx) = self.find(identity) else {
            return false;
        };
        if idx == 0 {
            return false;
        }
        let win = self.windows.remove(idx);
        win.destroy();
        if self.current == idx {
            self.switch_to(0);
        } else if self.current > idx {
            self.current -= 1;
        }
        self.dirty = true;
        true
    }

    /// Destroys every window except the console.
    pub fn close_all(&mut self) {
        for win in self.windows.drain(1..) {
            win.destroy();
        }
        self.current = 0;
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        let page = self.page_rows();
        for win in self.windows.iter_mut() {
            win.resize(cols);
            if !win.paged {
                win.scroll_to_bottom(page);
            }
        }
        self.dirty = true;
    }
}

impl UnreadSource for AppState {
    fn total_unread(&self) -> usize {
        self.windows.iter().map(|w| w.unread).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn state() -> AppState {
        AppState::new(AppConfig::default(), 80, 24)
    }

    #[test]
    fn test_console_always_present() {
        let mut s = state();
        assert_eq!(s.windows().len(), 1);
        assert_eq!(s.current_window().kind(), WindowKind::Console);
        assert!(!s.close(CONSOLE));
        assert_eq!(s.windows().len(), 1);
    }

    #[test]
    fn test_window_created_once_per_identity() {
        let mut s = state();
        s.window_mut_or_create("alice@example.org", WindowKind::Chat);
        let win = s.window_mut_or_create("alice@example.org", WindowKind::MultiUserChat);
        assert_eq!(win.kind(), WindowKind::Chat);
        assert_eq!(s.windows().len(), 2);
    }

    #[test]
    fn test_unread_accounting() {
        let mut s = state();
        s.window_mut_or_create("alice", WindowKind::Chat);
        s.window_mut_or_create("bob", WindowKind::Chat);
        s.print_to("alice", '-', Attr::Text, "one");
        s.print_to("alice", '-', Attr::Text, "two");
        s.print_to("bob", '-', Attr::Text, "three");
        s.print_to(CONSOLE, '-', Attr::Text, "current");
        assert_eq!(s.total_unread(), 3);

        assert!(s.switch_to(1));
        assert_eq!(s.total_unread(), 1);
        assert!(!s.switch_to(9));
    }

    #[test]
    fn test_close_current_falls_back_to_console() {
        let mut s = state();
        s.window_mut_or_create("alice", WindowKind::Chat);
        s.window_mut_or_create("bob", WindowKind::Chat);
        s.switch_to(2);
        assert!(s.close("bob"));
        assert_eq!(s.current_index(), 0);
        assert!(s.find("bob").is_none());
        assert!(!s.close("bob"));
    }

    #[test]
    fn test_close_earlier_window_keeps_current() {
        let mut s = state();
        s.window_mut_or_create("alice", WindowKind::Chat);
        s.window_mut_or_create("bob", WindowKind::Chat);
        s.switch_to(2);
        assert!(s.close("alice"));
        assert_eq!(s.current_window().identity(), "bob");
    }

    #[test]
    fn test_background_window_pinned_to_bottom() {
        let mut s = state();
        s.window_mut_or_create("alice", WindowKind::Chat);
        for i in 0..40 {
            s.print_to("alice", '-', Attr::Text, &format!("{}", i));
        }
        let rows = s.page_rows();
        let win = s.window_mut("alice").unwrap();
        assert_eq!(win.y_pos(), 40 - rows);
    }

    #[test]
    fn test_resize_widens_existing_windows() {
        let mut s = AppState::new(AppConfig::default(), 20, 10);
        s.print_to(CONSOLE, '-', Attr::Text, "0123456789abcdefghijklmnop");
        s.resize(60, 10);
        assert_eq!(s.current_window().cols(), 60);

        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
        terminal.draw(|f| s.current_window().refresh(f)).unwrap();
        let buf = terminal.backend().buffer();
        let row: String = (0..60u16).map(|x| buf[(x, 1u16)].symbol().to_string()).collect();
        assert!(row.trim_end().ends_with(" - 0123456789abcdefghijklmnop"), "{:?}", row);
    }

    #[test]
    fn test_input_history() {
        let mut input = InputState::new();
        for c in "hello".chars() {
            input.insert_char(c);
        }
        assert_eq!(input.take_text(), "hello");
        input.history_up();
        assert_eq!(input.text, "hello");
        input.history_down();
        assert!(input.text.is_empty());
    }
}
