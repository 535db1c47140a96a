use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::constants::{NICKNAME_KEY_PREFIX, THEME_KEY, USER_ID_KEY};
use crate::models::Theme;

/// Persisted key-value store, the terminal counterpart of device-local storage.
///
/// Values live in memory behind a lock and are written through to a YAML
/// file on every mutation. A store without a path never touches disk.
pub struct LocalStore {
    values: RwLock<BTreeMap<String, String>>,
    path: Option<PathBuf>,
}

impl LocalStore {
    /// Open the store at `path`. A missing or corrupt file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), %err, "Ignoring unreadable local storage");
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        LocalStore {
            values: RwLock::new(values),
            path: Some(path),
        }
    }

    pub fn in_memory() -> Self {
        LocalStore {
            values: RwLock::new(BTreeMap::new()),
            path: None,
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .ok()
            .and_then(|values| values.get(key).cloned())
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        {
            let mut values = self
                .values
                .write()
                .map_err(|_| anyhow::anyhow!("local storage lock poisoned"))?;
            values.insert(key.into(), value.into());
        }
        self.flush()
    }

    /// Remove a key, returning its previous value
    pub fn remove(&self, key: &str) -> Result<Option<String>> {
        let previous = {
            let mut values = self
                .values
                .write()
                .map_err(|_| anyhow::anyhow!("local storage lock poisoned"))?;
            values.remove(key)
        };
        if previous.is_some() {
            self.flush()?;
        }
        Ok(previous)
    }

    fn flush(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = {
            let values = self
                .values
                .read()
                .map_err(|_| anyhow::anyhow!("local storage lock poisoned"))?;
            serde_yaml::to_string(&*values)?
        };
        fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// Current user's id; blank values count as absent
    pub fn user_id(&self) -> Option<String> {
        self.get(USER_ID_KEY).filter(|id| !id.trim().is_empty())
    }

    pub fn set_user_id(&self, user_id: &str) -> Result<()> {
        self.set(USER_ID_KEY, user_id.trim())
    }

    pub fn theme(&self) -> Theme {
        self.get(THEME_KEY)
            .and_then(|t| t.parse().ok())
            .unwrap_or_default()
    }

    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        self.set(THEME_KEY, theme.as_str())
    }

    pub fn nickname(&self, recipient_id: &str) -> Option<String> {
        self.get(&format!("{}{}", NICKNAME_KEY_PREFIX, recipient_id))
    }

    /// Store a nickname; an empty one clears it
    pub fn set_nickname(&self, recipient_id: &str, nickname: &str) -> Result<()> {
        let key = format!("{}{}", NICKNAME_KEY_PREFIX, recipient_id);
        if nickname.trim().is_empty() {
            self.remove(&key).map(|_| ())
        } else {
            self.set(key, nickname.trim())
        }
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.yaml");

        let store = LocalStore::open(&path);
        store.set_user_id("42").unwrap();
        store.set_theme(Theme::Green).unwrap();

        let reopened = LocalStore::open(&path);
        assert_eq!(reopened.user_id().as_deref(), Some("42"));
        assert_eq!(reopened.theme(), Theme::Green);
    }

    #[test]
    fn test_blank_user_id_is_absent() {
        let store = LocalStore::in_memory();
        assert_eq!(store.user_id(), None);
        store.set(USER_ID_KEY, "  ").unwrap();
        assert_eq!(store.user_id(), None);
    }

    #[test]
    fn test_remove_and_nicknames() {
        let store = LocalStore::in_memory();
        store.set_nickname("u7", " Bobby ").unwrap();
        assert_eq!(store.nickname("u7").as_deref(), Some("Bobby"));
        store.set_nickname("u7", "").unwrap();
        assert_eq!(store.nickname("u7"), None);
        assert_eq!(store.remove("missing").unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.yaml");
        fs::write(&path, "- not\n- a map").unwrap();
        let store = LocalStore::open(&path);
        assert_eq!(store.get(USER_ID_KEY), None);
    }
}
