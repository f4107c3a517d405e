mod commands;
mod exchange;
mod history;
mod message;
mod panel;
mod quick_actions;
mod storage;

pub use commands::{parse_chat_input, ChatInput};
pub use exchange::{ChatReply, ChatRequest};
pub use history::{BoundedHistoryStore, HISTORY_KEY, LIVE_BUFFER_LIMIT};
pub use message::{ChatMessage, FruitCard, MessageKind, Sender};
pub use panel::ChatPanel;
pub use quick_actions::{
    QuickAction, CHAT_HELP_COMMANDS, CONNECTION_APOLOGY, QUICK_ACTIONS, QUICK_ACTIONS_PROMPT,
    WELCOME_MESSAGE,
};
pub use storage::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
