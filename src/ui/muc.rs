//! Room-specific behavior for multi-user chat windows.

use crate::ui::theme::Attr;
use crate::ui::window::Window;

/// Room error handler. Only a nickname conflict is rendered here; anything
/// else is left for the caller to display.
pub fn handle_error_message(window: &mut Window, from: &str, err_msg: &str) -> bool {
    if err_msg == "conflict" {
        tracing::debug!(room = %window.identity(), %from, "nickname conflict");
        window.print_line('-', Attr::Text, "Nickname already in use.");
        true
    } else {
        false
    }
}
