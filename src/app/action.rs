#[derive(Debug, PartialEq)]
pub enum Action {
    Quit,
    Bell,
    PollTray,
}
