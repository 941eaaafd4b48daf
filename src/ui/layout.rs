use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct AppLayout {
    pub title_bar: Rect,
    pub window: Rect,
    pub status_bar: Rect,
    pub input: Rect,
}

/// One row of chrome above the window area and two below it.
pub fn compute_layout(area: Rect) -> AppLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(0),    // Current window
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Input line
        ])
        .split(area);

    AppLayout {
        title_bar: chunks[0],
        window: chunks[1],
        status_bar: chunks[2],
        input: chunks[3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_area_reserves_chrome() {
        let layout = compute_layout(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.title_bar, Rect::new(0, 0, 80, 1));
        assert_eq!(layout.window, Rect::new(0, 1, 80, 21));
        assert_eq!(layout.status_bar, Rect::new(0, 22, 80, 1));
        assert_eq!(layout.input, Rect::new(0, 23, 80, 1));
    }
}
