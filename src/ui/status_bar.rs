use crate::app::state::*;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

/// Window list: `[n]` per window, highlighted when current, with an unread
/// count for background windows that have new lines.
pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut parts: Vec<Span> = vec![Span::styled(" ", Theme::status_bar())];

    for (i, win) in state.windows().iter().enumerate() {
        let (text, style) = if i == state.current_index() {
            (format!("[{}:{}]", i + 1, win.identity()), Theme::window_current())
        } else if win.unread > 0 {
            (format!("[{}+{}]", i + 1, win.unread), Theme::window_unread())
        } else {
            (format!("[{}]", i + 1), Theme::status_bar())
        };
        parts.push(Span::styled(text, style));
        parts.push(Span::styled(" ", Theme::status_bar()));
    }

    // Pad to fill remaining space
    let used: usize = parts.iter().map(|s| s.content.width()).sum();
    let remaining = (area.width as usize).saturating_sub(used);
    parts.push(Span::styled(" ".repeat(remaining), Theme::status_bar()));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
