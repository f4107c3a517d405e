use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

/// String blobs under well-known keys, local-storage style.
pub trait KeyValueStore {
    fn get(&mut self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> anyhow::Result<()>;
    fn remove(&mut self, key: &str) -> anyhow::Result<()>;
}

/// One JSON object file holding every key. Reads always refresh from disk;
/// writes merge the touched key into whatever is on disk.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    path: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&mut self, key: &str) -> Option<String> {
        read_json_object(&self.path)?
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn set(&mut self, key: &str, value: String) -> anyhow::Result<()> {
        let mut on_disk = read_json_object(&self.path).unwrap_or_default();
        on_disk.insert(key.to_string(), Value::String(value));
        write_json_object(&self.path, &on_disk)
    }

    fn remove(&mut self, key: &str) -> anyhow::Result<()> {
        let Some(mut on_disk) = read_json_object(&self.path) else {
            return Ok(());
        };
        if on_disk.remove(key).is_none() {
            return Ok(());
        }
        write_json_object(&self.path, &on_disk)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: HashMap<String, String>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&mut self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> anyhow::Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> anyhow::Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

fn read_json_object(path: &Path) -> Option<Map<String, Value>> {
    let raw = std::fs::read_to_string(path).ok()?;
    let parsed: Value = serde_json::from_str(&raw).ok()?;
    parsed.as_object().cloned()
}

fn write_json_object(path: &Path, payload: &Map<String, Value>) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(
        path,
        serde_json::to_string_pretty(&Value::Object(payload.clone()))?,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{FileKeyValueStore, KeyValueStore};

    #[test]
    fn file_store_basic() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let mut store = FileKeyValueStore::new(temp.path().join("store.json"));
        assert_eq!(store.get("key"), None);
        store.set("key", "value".to_string())?;
        assert_eq!(store.get("key").as_deref(), Some("value"));
        store.remove("key")?;
        assert_eq!(store.get("key"), None);
        Ok(())
    }

    #[test]
    fn file_store_merges_with_concurrent_writer() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("store.json");
        let mut store_a = FileKeyValueStore::new(&path);
        let mut store_b = FileKeyValueStore::new(&path);

        store_a.set("a", "1".to_string())?;
        store_b.set("b", "2".to_string())?;
        store_a.remove("missing")?;

        let mut reloaded = FileKeyValueStore::new(path);
        assert_eq!(reloaded.get("a").as_deref(), Some("1"));
        assert_eq!(reloaded.get("b").as_deref(), Some("2"));
        Ok(())
    }

    #[test]
    fn unreadable_file_reads_as_empty() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("store.json");
        std::fs::write(&path, "{not json")?;
        let mut store = FileKeyValueStore::new(&path);
        assert_eq!(store.get("key"), None);
        store.set("key", "fresh".to_string())?;
        assert_eq!(store.get("key").as_deref(), Some("fresh"));
        Ok(())
    }
}
