pub const HELP_TEXT: &str =
    "Commands: /new, /theme, /suggest [n], /help, /quit. Anything else is sent as a message.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    New,
    Theme,
    /// List suggestions, or fill the input with the n-th one (1-based).
    Suggest(Option<usize>),
    Help,
    Quit,
}

/// Returns `None` for anything that is not a known command, including other
/// `/`-prefixed text, which is sent as a message.
pub fn parse_slash_command(input: &str) -> Option<SlashCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let mut words = trimmed.split_whitespace();
    let command = words.next().unwrap_or(trimmed);

    let parsed = match command {
        "/new" => SlashCommand::New,
        "/theme" => SlashCommand::Theme,
        "/suggest" => SlashCommand::Suggest(words.next().and_then(|arg| arg.parse().ok())),
        "/help" => SlashCommand::Help,
        "/quit" => SlashCommand::Quit,
        _ => return None,
    };

    Some(parsed)
}
