mod input_box;
pub mod layout;
pub mod muc;
pub mod render;
mod status_bar;
pub mod theme;
pub mod window;

use crate::app::state::AppState;
use chrono::Local;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use theme::Theme;

pub fn render(frame: &mut Frame, state: &AppState) {
    let app_layout = layout::compute_layout(frame.area());

    render_title_bar(frame, app_layout.title_bar, state);
    state.current_window().refresh(frame);
    status_bar::render(frame, app_layout.status_bar, state);
    input_box::render(frame, app_layout.input, state);
}

fn render_title_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let win = state.current_window();
    let mut title = format!(" talkpad | {} ({})", win.identity(), win.kind().label());
    if win.paged {
        title.push_str(" [paged]");
    }
    if win.history_shown {
        title.push_str(" [history]");
    }
    let clock = if state.config.ui.clock {
        Local::now().format("%H:%M ").to_string()
    } else {
        String::new()
    };
    let pad = (area.width as usize).saturating_sub(title.chars().count() + clock.len());

    let line = Line::from(vec![
        Span::raw(title),
        Span::raw(" ".repeat(pad)),
        Span::raw(clock),
    ]);
    frame.render_widget(Paragraph::new(line).style(Theme::title_bar()), area);
}
