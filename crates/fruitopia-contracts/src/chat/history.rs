use anyhow::Context;
use serde_json::Value;

use super::message::ChatMessage;
use super::storage::KeyValueStore;

pub const HISTORY_KEY: &str = "fruitopia_chat_history";

/// Number of most recent messages shown after a reload.
pub const LIVE_BUFFER_LIMIT: usize = 10;

/// Append-only chat transcript. `history` is everything ever persisted;
/// `buffer` is what the view shows, seeded on load with the most recent
/// `LIVE_BUFFER_LIMIT` entries and extended by appends.
#[derive(Debug)]
pub struct BoundedHistoryStore<S: KeyValueStore> {
    store: S,
    history: Vec<ChatMessage>,
    buffer: Vec<ChatMessage>,
}

impl<S: KeyValueStore> BoundedHistoryStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            history: Vec::new(),
            buffer: Vec::new(),
        }
    }

    /// Absent or corrupted state loads as an empty history.
    pub fn load(&mut self) -> &[ChatMessage] {
        self.history = self
            .store
            .get(HISTORY_KEY)
            .map(|raw| decode_history(&raw))
            .unwrap_or_default();
        let keep_from = self.history.len().saturating_sub(LIVE_BUFFER_LIMIT);
        self.buffer = self.history[keep_from..].to_vec();
        &self.history
    }

    pub fn append(&mut self, message: ChatMessage) {
        self.buffer.push(message.clone());
        self.history.push(message);
    }

    /// Writes the entire history, not just the buffer.
    pub fn flush(&mut self) -> anyhow::Result<()> {
        let encoded =
            serde_json::to_string(&self.history).context("failed to encode chat history")?;
        self.store
            .set(HISTORY_KEY, encoded)
            .context("failed to persist chat history")
    }

    /// Removes persisted state first; memory is only reset once that succeeds.
    pub fn clear(&mut self) -> anyhow::Result<()> {
        self.store
            .remove(HISTORY_KEY)
            .context("failed to clear chat history")?;
        self.history.clear();
        self.buffer.clear();
        Ok(())
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn buffer(&self) -> &[ChatMessage] {
        &self.buffer
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

fn decode_history(raw: &str) -> Vec<ChatMessage> {
    let parsed = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            log::warn!("stored chat history is not a list; starting empty");
            return Vec::new();
        }
        Err(err) => {
            log::warn!("error loading chat history: {err}");
            return Vec::new();
        }
    };
    let total = parsed.len();
    let messages = parsed
        .into_iter()
        .filter_map(|item| serde_json::from_value::<ChatMessage>(item).ok())
        .collect::<Vec<_>>();
    if messages.len() < total {
        log::warn!(
            "skipped {} unreadable chat history entries",
            total - messages.len()
        );
    }
    messages
}

#[cfg(test)]
mod tests {
    use crate::chat::message::ChatMessage;
    use crate::chat::storage::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};

    use super::{BoundedHistoryStore, HISTORY_KEY, LIVE_BUFFER_LIMIT};

    #[test]
    fn absent_state_loads_empty() {
        let mut history = BoundedHistoryStore::new(MemoryKeyValueStore::new());
        assert!(history.load().is_empty());
        assert!(history.buffer().is_empty());
    }

    #[test]
    fn corrupted_blob_loads_empty() -> anyhow::Result<()> {
        let mut store = MemoryKeyValueStore::new();
        store.set(HISTORY_KEY, "{{ definitely not json".to_string())?;
        let mut history = BoundedHistoryStore::new(store);
        assert!(history.load().is_empty());

        history
            .store_mut()
            .set(HISTORY_KEY, r#"{"messages": []}"#.to_string())?;
        assert!(history.load().is_empty());
        Ok(())
    }

    #[test]
    fn reload_keeps_full_history_and_recent_buffer() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("chat.json");

        let mut writer = BoundedHistoryStore::new(FileKeyValueStore::new(&path));
        writer.load();
        for idx in 0..15 {
            writer.append(ChatMessage::user(format!("message {idx}")));
        }
        writer.flush()?;

        let mut reader = BoundedHistoryStore::new(FileKeyValueStore::new(&path));
        assert_eq!(reader.load().len(), 15);
        assert_eq!(reader.buffer().len(), LIVE_BUFFER_LIMIT);
        assert_eq!(reader.buffer()[0].text, "message 5");
        assert_eq!(reader.buffer()[9].text, "message 14");
        assert_eq!(reader.history()[0].text, "message 0");
        Ok(())
    }

    #[test]
    fn short_history_is_fully_buffered() -> anyhow::Result<()> {
        let mut history = BoundedHistoryStore::new(MemoryKeyValueStore::new());
        for idx in 0..3 {
            history.append(ChatMessage::bot(format!("m{idx}")));
        }
        history.flush()?;
        history.load();
        assert_eq!(history.buffer().len(), 3);
        Ok(())
    }

    #[test]
    fn unreadable_entries_are_skipped() -> anyhow::Result<()> {
        let mut store = MemoryKeyValueStore::new();
        store.set(
            HISTORY_KEY,
            r#"[{"id":"msg_1","text":"hi","sender":"user","timestamp":"2024-03-01T10:15:00Z"},
                {"id":"msg_2","text":"broken","sender":"alien","timestamp":"never"}]"#
                .to_string(),
        )?;
        let mut history = BoundedHistoryStore::new(store);
        assert_eq!(history.load().len(), 1);
        Ok(())
    }

    #[test]
    fn clear_resets_memory_and_persisted_state() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("chat.json");
        let mut history = BoundedHistoryStore::new(FileKeyValueStore::new(&path));
        history.append(ChatMessage::user("hello"));
        history.flush()?;

        history.clear()?;
        assert!(history.history().is_empty());
        assert!(history.buffer().is_empty());

        let mut reloaded = BoundedHistoryStore::new(FileKeyValueStore::new(&path));
        assert!(reloaded.load().is_empty());
        Ok(())
    }
}
