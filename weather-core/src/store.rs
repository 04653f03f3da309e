//! User document store.
//!
//! Users are stored as whole documents keyed by `user_id`; every write
//! replaces the stored document.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use crate::{StoreError, model::User};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn load_all(&self) -> Result<Vec<User>, StoreError>;

    async fn get(&self, user_id: &str) -> Result<Option<User>, StoreError>;

    /// Create or overwrite the document for `user.user_id`.
    async fn save(&self, user: &User) -> Result<(), StoreError>;

    /// Overwrite an existing document. Fails with `NotFound` if absent.
    async fn update(&self, user: &User) -> Result<(), StoreError> {
        if self.get(&user.user_id).await?.is_none() {
            return Err(StoreError::NotFound(user.user_id.clone()));
        }
        self.save(user).await
    }
}

/// All users in one JSON file, as an object keyed by user id.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io { path: self.path.display().to_string(), source }
    }

    fn read(&self) -> Result<BTreeMap<String, User>, StoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        Ok(serde_json::from_str(&contents)?)
    }

    fn write(&self, users: &BTreeMap<String, User>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        // Write beside the target, then rename over it.
        let json = serde_json::to_string_pretty(users)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl UserStore for JsonFileStore {
    async fn load_all(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.read()?.into_values().collect())
    }

    async fn get(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.read()?.remove(user_id))
    }

    async fn save(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.read()?;
        users.insert(user.user_id.clone(), user.clone());
        self.write(&users)?;

        tracing::debug!(user_id = %user.user_id, path = %self.path.display(), "user saved");
        Ok(())
    }
}

/// In-process store, handy for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: Mutex<BTreeMap<String, User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let map = users.into_iter().map(|u| (u.user_id.clone(), u)).collect();
        Self { users: Mutex::new(map) }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn load_all(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.lock().values().cloned().collect())
    }

    async fn get(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.lock().get(user_id).cloned())
    }

    async fn save(&self, user: &User) -> Result<(), StoreError> {
        self.users.lock().insert(user.user_id.clone(), user.clone());
        Ok(())
    }
}
