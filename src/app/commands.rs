//! User slash-command parser.
//!
//! Parses `/command arg1 arg2 ...` input lines into typed [`ParsedCommand`]
//! values that the event handler can act on.

/// A parsed user command. Each variant corresponds to a `/command`.
#[derive(Debug, PartialEq)]
pub enum ParsedCommand {
    Msg { target: String, text: Option<String> },
    Join { room: String },
    Win { number: usize },
    Close,
    Quit,
    Help,
}

/// Parse a slash-command string into a [`ParsedCommand`].
///
/// Returns `None` if the input does not start with `/`, is not a recognized
/// command, or is missing a required argument. Commands are case-insensitive.
pub fn parse_command(input: &str) -> Option<ParsedCommand> {
    let input = input.trim();
    let rest = input.strip_prefix('/')?;

    let parts: Vec<&str> = rest.splitn(3, ' ').collect();
    let cmd = parts.first()?.to_lowercase();

    match cmd.as_str() {
        "msg" => {
            let target = parts.get(1).filter(|s| !s.is_empty())?.to_string();
            let text = parts
                .get(2)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(String::from);
            Some(ParsedCommand::Msg { target, text })
        }
        "join" => {
            let room = parts.get(1).filter(|s| !s.is_empty())?.to_string();
            Some(ParsedCommand::Join { room })
        }
        "win" => {
            let number = parts.get(1)?.parse::<usize>().ok().filter(|n| *n > 0)?;
            Some(ParsedCommand::Win { number })
        }
        "close" => Some(ParsedCommand::Close),
        "quit" | "exit" => Some(ParsedCommand::Quit),
        "help" => Some(ParsedCommand::Help),
        _ => None,
    }
}

pub const HELP: &[&str] = &[
    "/msg <id> [text]  Open a chat window, optionally sending text",
    "/join <room>      Open a room window",
    "/win <n>          Switch to window n (also Alt+1..9)",
    "/close            Close the current window",
    "/quit             Exit",
    "PageUp/PageDown scroll the current window.",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_msg() {
        assert_eq!(
            parse_command("/msg alice@example.org hi there"),
            Some(ParsedCommand::Msg {
                target: "alice@example.org".into(),
                text: Some("hi there".into()),
            })
        );
        assert_eq!(
            parse_command("/MSG bob"),
            Some(ParsedCommand::Msg {
                target: "bob".into(),
                text: None,
            })
        );
        assert_eq!(parse_command("/msg"), None);
    }

    #[test]
    fn test_parse_win() {
        assert_eq!(parse_command("/win 3"), Some(ParsedCommand::Win { number: 3 }));
        assert_eq!(parse_command("/win 0"), None);
        assert_eq!(parse_command("/win x"), None);
    }

    #[test]
    fn test_parse_other() {
        assert_eq!(
            parse_command("/join room@conf.example.org"),
            Some(ParsedCommand::Join {
                room: "room@conf.example.org".into()
            })
        );
        assert_eq!(parse_command("/close"), Some(ParsedCommand::Close));
        assert_eq!(parse_command("/exit"), Some(ParsedCommand::Quit));
        assert_eq!(parse_command("hello"), None);
        assert_eq!(parse_command("/frobnicate"), None);
    }
}
