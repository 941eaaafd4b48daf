//! Conversation windows.
//!
//! A [`Window`] owns a pad: a bounded scrollback of rendered lines that is
//! larger than the visible area. Rendering only ever appends whole lines to the
//! pad, and [`Window::refresh`] blits the scrolled region onto the screen.
//!
//! Per-kind behavior is resolved by matching on [`WindowKind`]. Incoming chat
//! messages can only be printed through an [`IncomingWindow`], which exists
//! for the one-to-one kinds only.

use crate::app::state::Contact;
use crate::ui::layout;
use crate::ui::muc;
use crate::ui::render::{self, LinePen};
use crate::ui::theme::{Attr, Theme};
use chrono::{DateTime, Local, Utc};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use std::collections::VecDeque;
use unicode_width::UnicodeWidthChar;

/// Maximum number of lines kept in a window's scrollback.
pub const PAD_SIZE: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    Console,
    Chat,
    MultiUserChat,
    PrivateInRoom,
    Command,
    /// Auxiliary buffers opened by the session layer.
    #[allow(dead_code)]
    Other,
}

impl WindowKind {
    pub fn supports_incoming(self) -> bool {
        matches!(self, WindowKind::Chat | WindowKind::PrivateInRoom)
    }

    pub fn label(self) -> &'static str {
        match self {
            WindowKind::Console => "console",
            WindowKind::Chat => "chat",
            WindowKind::MultiUserChat => "room",
            WindowKind::PrivateInRoom => "private",
            WindowKind::Command => "command",
            WindowKind::Other => "other",
        }
    }
}

/// Bounded line store with a scroll cursor. When full, the oldest line is
/// evicted and the cursor follows the content it was showing.
///
/// Lines longer than the pad width continue on the following rows, so the
/// scroll cursor and paging count display rows, not logical lines.
#[derive(Debug)]
struct Pad {
    lines: VecDeque<Line<'static>>,
    capacity: usize,
    cols: u16,
    y_pos: usize,
}

impl Pad {
    fn new(capacity: usize, cols: u16) -> Self {
        Self {
            lines: VecDeque::new(),
            capacity,
            cols,
            y_pos: 0,
        }
    }

    fn push(&mut self, line: Line<'static>) {
        if self.lines.len() >= self.capacity {
            if let Some(evicted) = self.lines.pop_front() {
                let rows = row_count(&evicted, self.cols);
                self.y_pos = self.y_pos.saturating_sub(rows);
            }
        }
        self.lines.push_back(line);
    }

    fn total_rows(&self) -> usize {
        self.lines.iter().map(|l| row_count(l, self.cols)).sum()
    }

    fn rows(&self) -> impl Iterator<Item = Line<'static>> + '_ {
        self.lines.iter().flat_map(|l| wrap_line(l, self.cols))
    }

    fn bottom(&self, rows: usize) -> usize {
        self.total_rows().saturating_sub(rows)
    }
}

fn row_count(line: &Line<'_>, cols: u16) -> usize {
    let cols = cols.max(1) as usize;
    line.width().div_ceil(cols).max(1)
}

/// Splits a line into rows of at most `cols` display columns, keeping the
/// style of every span.
fn wrap_line(line: &Line<'_>, cols: u16) -> Vec<Line<'static>> {
    let cols = cols.max(1) as usize;
    let mut rows = Vec::new();
    let mut row: Vec<Span<'static>> = Vec::new();
    let mut width = 0;

    for span in &line.spans {
        let mut chunk = String::new();
        for c in span.content.chars() {
            let w = c.width().unwrap_or(0);
            if width + w > cols && width > 0 {
                if !chunk.is_empty() {
                    row.push(Span::styled(std::mem::take(&mut chunk), span.style));
                }
                rows.push(Line::from(std::mem::take(&mut row)));
                width = 0;
            }
            chunk.push(c);
            width += w;
        }
        if !chunk.is_empty() {
            row.push(Span::styled(chunk, span.style));
        }
    }
    rows.push(Line::from(row));
    rows
}

#[derive(Debug)]
pub struct Window {
    identity: String,
    kind: WindowKind,
    pad: Pad,
    pub unread: usize,
    pub paged: bool,
    pub history_shown: bool,
}

impl Window {
    pub fn create(title: &str, cols: u16, kind: WindowKind) -> Self {
        tracing::debug!(identity = title, kind = kind.label(), cols, "creating window");
        Self {
            identity: title.to_string(),
            kind,
            pad: Pad::new(PAD_SIZE, cols),
            unread: 0,
            paged: false,
            history_shown: false,
        }
    }

    /// Releases the window. Consuming `self` rules out a second destroy.
    pub fn destroy(self) {
        tracing::debug!(identity = %self.identity, lines = self.pad.lines.len(), "destroying window");
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    #[cfg(test)]
    pub fn lines(&self) -> impl Iterator<Item = &Line<'static>> {
        self.pad.lines.iter()
    }

    #[cfg(test)]
    pub fn line_count(&self) -> usize {
        self.pad.lines.len()
    }

    #[cfg(test)]
    pub fn y_pos(&self) -> usize {
        self.pad.y_pos
    }

    #[cfg(test)]
    pub fn cols(&self) -> u16 {
        self.pad.cols
    }

    /// Changes the pad width. Rows are re-wrapped at the new width; the scroll
    /// cursor is kept inside the pad.
    pub fn resize(&mut self, cols: u16) {
        self.pad.cols = cols;
        let last = self.pad.total_rows().saturating_sub(1);
        self.pad.y_pos = self.pad.y_pos.min(last);
    }

    /// Starts a line holding only the timestamp prefix. Finish it with
    /// [`Window::commit`].
    pub fn print_time(&self, marker: char) -> LinePen {
        let mut pen = LinePen::new();
        render::print_time(&mut pen, Local::now(), marker);
        pen
    }

    pub fn commit(&mut self, pen: LinePen) {
        self.pad.push(pen.finish());
    }

    pub fn print_line(&mut self, marker: char, attr: Attr, text: &str) {
        let mut pen = LinePen::new();
        render::print_line(&mut pen, Local::now(), marker, attr, text);
        self.commit(pen);
    }

    pub fn show_contact(&mut self, contact: &Contact) {
        let mut pen = LinePen::new();
        render::show_contact(&mut pen, Local::now(), contact);
        self.commit(pen);
    }

    /// Returns true if the error was rendered in this window. On false the
    /// caller is expected to display it.
    pub fn handle_error_message(&mut self, from: &str, err_msg: &str) -> bool {
        match self.kind {
            WindowKind::MultiUserChat => muc::handle_error_message(self, from, err_msg),
            WindowKind::Console
            | WindowKind::Chat
            | WindowKind::PrivateInRoom
            | WindowKind::Command
            | WindowKind::Other => false,
        }
    }

    pub fn incoming(&mut self) -> Option<IncomingWindow<'_>> {
        if self.kind.supports_incoming() {
            Some(IncomingWindow { window: self })
        } else {
            None
        }
    }

    pub fn page_up(&mut self, rows: usize) {
        self.pad.y_pos = self.pad.y_pos.saturating_sub(rows.max(1));
        self.paged = true;
    }

    pub fn page_down(&mut self, rows: usize) {
        let bottom = self.pad.bottom(rows);
        self.pad.y_pos = (self.pad.y_pos + rows.max(1)).min(bottom);
        if self.pad.y_pos == bottom {
            self.paged = false;
        }
    }

    pub fn scroll_to_bottom(&mut self, rows: usize) {
        self.pad.y_pos = self.pad.bottom(rows);
        self.paged = false;
    }

    /// Draws the pad rows starting at the scroll cursor into the shared
    /// window area of the frame.
    pub fn refresh(&self, frame: &mut Frame) {
        let area = layout::compute_layout(frame.area()).window;
        let area = Rect {
            width: area.width.min(self.pad.cols),
            ..area
        };
        let rows: Vec<Line> = self
            .pad
            .rows()
            .skip(self.pad.y_pos)
            .take(area.height as usize)
            .collect();
        frame.render_widget(Paragraph::new(rows).style(Theme::message_text()), area);
    }
}

/// A window that accepts incoming one-to-one messages.
pub struct IncomingWindow<'a> {
    window: &'a mut Window,
}

impl IncomingWindow<'_> {
    pub fn print_incoming_message(
        &mut self,
        stamp: Option<DateTime<Utc>>,
        from: &str,
        message: &str,
    ) {
        let mut pen = LinePen::new();
        render::print_incoming_message(&mut pen, Local::now(), stamp, from, message);
        self.window.commit(pen);
    }
}
