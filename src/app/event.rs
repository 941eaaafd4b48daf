use crate::app::state::Contact;
use chrono::{DateTime, Utc};
use crossterm::event::Event as CrosstermEvent;

#[derive(Debug)]
pub enum AppEvent {
    /// Terminal input event
    Terminal(CrosstermEvent),

    // The next three are produced by the external session layer only.
    /// One-to-one message from the session layer. `private` marks a private
    /// message sent through a room.
    #[allow(dead_code)]
    Message {
        from: String,
        body: String,
        timestamp: Option<DateTime<Utc>>,
        private: bool,
    },

    /// Contact presence update
    #[allow(dead_code)]
    Presence(Contact),

    /// Error reported by the session layer for a conversation
    #[allow(dead_code)]
    SessionError {
        from: String,
        text: String,
    },

    /// Clock tick for the title bar
    Tick,

    /// Unread indicator poll
    TrayTick,
}
