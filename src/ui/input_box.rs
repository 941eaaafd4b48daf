use crate::app::state::*;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

const PROMPT: &str = "> ";

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let input_text = &state.input.text;
    let line = Line::from(vec![
        Span::styled(PROMPT, Theme::timestamp()),
        Span::styled(input_text.as_str(), Theme::input_text()),
    ]);
    frame.render_widget(Paragraph::new(line), area);

    let cursor_cols = input_text[..state.input.cursor].width() as u16;
    let cursor_x = area.x + PROMPT.len() as u16 + cursor_cols;
    frame.set_cursor_position((cursor_x.min(area.right().saturating_sub(1)), area.y));
}
