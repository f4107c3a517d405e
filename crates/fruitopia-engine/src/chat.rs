use anyhow::Result;
use fruitopia_contracts::chat::{
    BoundedHistoryStore, ChatMessage, ChatPanel, ChatRequest, KeyValueStore, MessageKind, Sender,
    CONNECTION_APOLOGY, QUICK_ACTIONS, QUICK_ACTIONS_PROMPT, WELCOME_MESSAGE,
};
use serde_json::{json, Value};

use crate::client::FruitopiaClient;

/// One chat widget: transcript, server session, and panel state. The
/// transcript is flushed after every successful exchange, on close, and on drop.
pub struct ChatSession<S: KeyValueStore> {
    client: FruitopiaClient,
    history: BoundedHistoryStore<S>,
    session_id: Option<String>,
    panel: ChatPanel,
    loaded: bool,
}

impl<S: KeyValueStore> ChatSession<S> {
    pub fn new(client: FruitopiaClient, store: S) -> Self {
        Self {
            client,
            history: BoundedHistoryStore::new(store),
            session_id: None,
            panel: ChatPanel::default(),
            loaded: false,
        }
    }

    /// Opens the panel. The first open loads the stored transcript and
    /// greets the user.
    pub fn open(&mut self) {
        if !self.loaded {
            let restored = self.history.load().len();
            log::debug!("restored {restored} chat messages");
            self.loaded = true;
            self.greet();
        }
        self.panel.open();
    }

    pub fn toggle(&mut self) {
        if self.panel.open {
            self.panel.close();
        } else {
            self.open();
        }
    }

    pub fn minimize(&mut self) {
        self.panel.minimize();
    }

    pub fn close(&mut self) -> Result<()> {
        self.panel.close();
        self.flush()
    }

    /// Sends `text` and returns the bot's answer (or the apology when the
    /// exchange failed). Blank input is ignored.
    pub fn send(&mut self, text: &str) -> Option<&ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if !self.loaded {
            self.open();
        }
        self.history.append(ChatMessage::user(text));
        let request = ChatRequest {
            message: text.to_string(),
            session_id: self.session_id.clone(),
        };
        match self.client.chat_message(&request) {
            Ok(reply) => {
                if self.session_id.is_none() {
                    self.session_id = reply.session_id.filter(|id| !id.is_empty());
                }
                self.history.append(ChatMessage::bot(reply.response));
                if let Err(err) = self.history.flush() {
                    log::warn!("{err:#}");
                }
            }
            Err(err) => {
                log::warn!("chat exchange failed: {err:#}");
                self.history.append(ChatMessage::bot(CONNECTION_APOLOGY));
            }
        }
        self.history.buffer().last()
    }

    /// `index` is zero-based into the quick action table.
    pub fn send_quick_action(&mut self, index: usize) -> Option<&ChatMessage> {
        let action = QUICK_ACTIONS.get(index)?;
        self.send(action.prompt)
    }

    /// Drops the transcript everywhere and starts a fresh conversation.
    pub fn clear(&mut self) -> Result<()> {
        self.history.clear()?;
        self.session_id = None;
        self.loaded = true;
        self.history.append(ChatMessage::bot(WELCOME_MESSAGE));
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        if !self.loaded {
            return Ok(());
        }
        self.history.flush()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.history.buffer()
    }

    pub fn full_history(&self) -> &[ChatMessage] {
        self.history.history()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn panel(&self) -> ChatPanel {
        self.panel
    }

    pub fn store_mut(&mut self) -> &mut S {
        self.history.store_mut()
    }

    fn greet(&mut self) {
        self.history.append(ChatMessage::bot(WELCOME_MESSAGE));
        let actions = QUICK_ACTIONS
            .iter()
            .map(|action| json!({"label": action.label, "prompt": action.prompt}))
            .collect::<Vec<_>>();
        self.history.append(ChatMessage::new(
            QUICK_ACTIONS_PROMPT,
            Sender::Bot,
            MessageKind::QuickActions,
            Some(Value::Array(actions)),
        ));
    }
}

impl<S: KeyValueStore> Drop for ChatSession<S> {
    fn drop(&mut self) {
        if let Err(err) = self.flush() {
            log::warn!("chat history not saved: {err:#}");
        }
    }
}
