//! Line formatting for conversation windows.
//!
//! Everything here is stateless: each routine writes into a [`LinePen`] and
//! the owning window appends the finished line in one step.

use crate::app::state::Contact;
use crate::ui::theme::Attr;
use chrono::{DateTime, Local, TimeDelta, Utc};
use ratatui::text::{Line, Span};

pub const TIME_FORMAT: &str = "%H:%M:%S";

/// A line under construction, with curses-style attribute on/off.
#[derive(Debug, Default)]
pub struct LinePen {
    spans: Vec<Span<'static>>,
    active: Vec<Attr>,
}

impl LinePen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attr_on(&mut self, attr: Attr) {
        self.active.push(attr);
    }

    /// Turns off the most recent matching `attr_on`. Unmatched calls are ignored.
    pub fn attr_off(&mut self, attr: Attr) {
        if let Some(pos) = self.active.iter().rposition(|a| *a == attr) {
            self.active.remove(pos);
        }
    }

    pub fn current_attr(&self) -> Attr {
        self.active.last().copied().unwrap_or(Attr::Text)
    }

    #[cfg(test)]
    pub fn active_attrs(&self) -> &[Attr] {
        &self.active
    }

    /// Writes text in the current attribute. Control characters become spaces
    /// so the pen can never produce more than one line.
    pub fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let clean: String = text
            .chars()
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect();
        self.spans
            .push(Span::styled(clean, self.current_attr().style()));
    }

    pub fn write_attr(&mut self, attr: Attr, text: &str) {
        self.attr_on(attr);
        self.write(text);
        self.attr_off(attr);
    }

    pub fn finish(self) -> Line<'static> {
        Line::from(self.spans)
    }
}

/// Plain text of a rendered line, without styling.
#[cfg(test)]
pub fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}

pub fn print_time(pen: &mut LinePen, now: DateTime<Local>, marker: char) {
    pen.write_attr(Attr::Time, &format!("{} {} ", now.format(TIME_FORMAT), marker));
}

pub fn print_line(pen: &mut LinePen, now: DateTime<Local>, marker: char, attr: Attr, text: &str) {
    print_time(pen, now, marker);
    pen.write_attr(attr, text);
}

pub fn presence_attr(presence: Option<&str>) -> Attr {
    match presence {
        Some("online") => Attr::Online,
        Some("away") => Attr::Away,
        Some("chat") => Attr::Chat,
        Some("dnd") => Attr::Dnd,
        Some("xa") => Attr::Xa,
        _ => Attr::Offline,
    }
}

pub fn presence_colour_on(pen: &mut LinePen, presence: Option<&str>) {
    pen.attr_on(presence_attr(presence));
}

pub fn presence_colour_off(pen: &mut LinePen, presence: Option<&str>) {
    pen.attr_off(presence_attr(presence));
}

/// Formats an idle span as `[<h>h]<m>m<s>s`, carrying each remainder down.
pub fn format_idle(span: TimeDelta) -> String {
    let mut secs = span.num_seconds().max(0);
    let hours = secs / 3600;
    secs -= hours * 3600;
    let minutes = secs / 60;
    secs -= minutes * 60;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{}h", hours));
    }
    out.push_str(&format!("{}m{}s", minutes, secs));
    out
}

pub fn show_contact(pen: &mut LinePen, now: DateTime<Local>, contact: &Contact) {
    let presence = contact.presence.as_deref();

    print_time(pen, now, '-');
    presence_colour_on(pen, presence);

    pen.write(contact.name.as_deref().unwrap_or(&contact.barejid));
    pen.write(&format!(" is {}", presence.unwrap_or("offline")));

    if let Some(last_activity) = contact.last_activity {
        pen.write(", idle ");
        pen.write(&format_idle(now - last_activity));
    }

    if let Some(ref status) = contact.status {
        pen.write(&format!(", \"{}\"", status));
    }

    presence_colour_off(pen, presence);
}

pub fn print_incoming_message(
    pen: &mut LinePen,
    now: DateTime<Local>,
    stamp: Option<DateTime<Utc>>,
    from: &str,
    message: &str,
) {
    match stamp {
        None => print_time(pen, now, '-'),
        Some(stamp) => {
            let local = stamp.with_timezone(&Local);
            pen.write_attr(Attr::Time, &format!("{} - ", local.format(TIME_FORMAT)));
        }
    }

    if let Some(action) = message.strip_prefix("/me ") {
        pen.attr_on(Attr::Them);
        pen.write(&format!("*{} ", from));
        pen.write(action);
        pen.attr_off(Attr::Them);
    } else {
        pen.write_attr(Attr::Them, &format!("{}: ", from));
        pen.write(message);
    }
}
