use super::quick_actions::QUICK_ACTIONS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatInput {
    Noop,
    Message(String),
    /// Zero-based index into `QUICK_ACTIONS`.
    Quick(usize),
    Clear,
    History,
    Minimize,
    Close,
    Help,
    Unknown { command: String, arg: String },
}

/// Slash commands drive the panel; any other text is a message.
pub fn parse_chat_input(text: &str) -> ChatInput {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return ChatInput::Noop;
    }

    let Some(slash_tail) = trimmed.strip_prefix('/') else {
        return ChatInput::Message(trimmed.to_string());
    };
    let command_len = slash_tail
        .chars()
        .take_while(|ch| ch.is_ascii_alphanumeric() || *ch == '_')
        .count();
    if command_len == 0 {
        return ChatInput::Message(trimmed.to_string());
    }
    let command = slash_tail[..command_len].to_ascii_lowercase();
    let arg = slash_tail[command_len..].trim();

    match command.as_str() {
        "quick" => match arg.parse::<usize>() {
            Ok(number) if (1..=QUICK_ACTIONS.len()).contains(&number) => {
                ChatInput::Quick(number - 1)
            }
            _ => unknown(command, arg),
        },
        "clear" => ChatInput::Clear,
        "history" => ChatInput::History,
        "minimize" => ChatInput::Minimize,
        "close" | "quit" | "exit" => ChatInput::Close,
        "help" => ChatInput::Help,
        _ => unknown(command, arg),
    }
}

fn unknown(command: String, arg: &str) -> ChatInput {
    ChatInput::Unknown {
        command,
        arg: arg.to_string(),
    }
}
