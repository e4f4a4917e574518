//! # mb-store-json
//! message-board/crates/mb-plugins/mb-store-json/src/lib.rs
//! Whole-file JSON implementation of `MessageRepo`.
//! Every mutation loads the full collection, changes it, and rewrites the
//! snapshot in one piece.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use mb_core::error::{AppError, Result};
use mb_core::models::{Message, VoteDirection, VoteTally};
use mb_core::traits::MessageRepo;
use tokio::fs;
use tokio::sync::Mutex;

pub struct JsonMessageStore {
    /// Snapshot file (e.g., "./messages.json")
    path: PathBuf,
    /// Held across each load-mutate-save cycle. Only serializes writers
    /// inside this process; other processes sharing the file can still
    /// clobber each other.
    write_lock: Mutex<()>,
}

impl JsonMessageStore {
    /// Opens the store, writing an empty collection if the file is missing.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        };

        if !store.exists().await? {
            log::info!("Initializing empty message store at {}", store.path.display());
            store.save(&[]).await?;
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the full collection. A missing file reads as empty; anything
    /// unparsable is an error, never an empty board.
    pub async fn load(&self) -> Result<Vec<Message>> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.unreadable(e)),
        };

        let messages: Vec<Message> =
            serde_json::from_slice(&raw).map_err(|e| self.unreadable(e.into()))?;
        log::debug!("Loaded {} messages from {}", messages.len(), self.path.display());
        Ok(messages)
    }

    /// Overwrites the snapshot with `messages`.
    ///
    /// Writes a sibling temp file first and renames it into place, so a
    /// crash mid-write leaves the previous snapshot intact.
    pub async fn save(&self, messages: &[Message]) -> Result<()> {
        let json = serde_json::to_vec_pretty(messages).map_err(|e| self.unwritable(e.into()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| self.unwritable(e))?;
        }

        let temp = self.temp_path();
        fs::write(&temp, &json).await.map_err(|e| self.unwritable(e))?;
        fs::rename(&temp, &self.path).await.map_err(|e| self.unwritable(e))?;

        log::debug!("Saved {} messages to {}", messages.len(), self.path.display());
        Ok(())
    }

    async fn exists(&self) -> Result<bool> {
        match fs::metadata(&self.path).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(self.unreadable(e)),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("messages.json"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn unreadable(&self, source: io::Error) -> AppError {
        log::error!("Message store {} is unreadable: {}", self.path.display(), source);
        AppError::StorageUnreadable {
            path: self.path.clone(),
            source,
        }
    }

    fn unwritable(&self, source: io::Error) -> AppError {
        log::error!("Message store {} is unwritable: {}", self.path.display(), source);
        AppError::StorageUnwritable {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl MessageRepo for JsonMessageStore {
    async fn list_messages(&self) -> Result<Vec<Message>> {
        self.load().await
    }

    async fn append_message(&self, message: Message) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut messages = self.load().await?;
        messages.push(message);
        self.save(&messages).await
    }

    /// Linear scan; the first message with a matching id wins.
    async fn cast_vote(&self, id: &str, direction: VoteDirection) -> Result<VoteTally> {
        let _guard = self.write_lock.lock().await;

        let mut messages = self.load().await?;
        let tally = match messages.iter_mut().find(|m| m.id == id) {
            Some(message) => message.apply_vote(direction),
            None => return Err(AppError::NotFound(id.to_string())),
        };
        self.save(&messages).await?;

        log::debug!("Recorded {} vote on {}", direction, id);
        Ok(tally)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn sample(id: &str, text: &str) -> Message {
        Message {
            id: id.into(),
            user: "0A1B2C3D".into(),
            ip: "192.168.1.7".into(),
            time: "2024-01-02 03:04:05".into(),
            text: text.into(),
            upvotes: 0,
            downvotes: 0,
        }
    }

    async fn store_in(dir: &TempDir) -> JsonMessageStore {
        JsonMessageStore::open(dir.path().join("messages.json")).await.unwrap()
    }

    #[tokio::test]
    async fn test_open_initializes_empty_collection() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;

        assert!(store.path().exists());
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let store = JsonMessageStore::open(dir.path().join("nested/deeper/board.json"))
            .await
            .unwrap();

        assert!(store.path().exists());
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        std::fs::remove_file(store.path()).unwrap();

        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;

        let mut voted = sample("2", "**multi**\nline \"quoted\" <tag> & ünïcode");
        voted.upvotes = 7;
        voted.downvotes = 2;
        let messages = vec![sample("1", "first"), voted, sample("3", "")];

        store.save(&messages).await.unwrap();
        assert_eq!(store.load().await.unwrap(), messages);
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        std::fs::write(store.path(), b"{ not json").unwrap();

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, AppError::StorageUnreadable { .. }));

        // A corrupt store must not be papered over by a write either.
        let err = store.append_message(sample("1", "hi")).await.unwrap_err();
        assert!(matches!(err, AppError::StorageUnreadable { .. }));
        assert_eq!(std::fs::read(store.path()).unwrap(), b"{ not json");
    }

    #[tokio::test]
    async fn test_unwritable_target_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        // Renaming a file over a directory fails on every platform.
        std::fs::remove_file(store.path()).unwrap();
        std::fs::create_dir(store.path()).unwrap();

        let err = store.save(&[sample("1", "hi")]).await.unwrap_err();
        assert!(matches!(err, AppError::StorageUnwritable { .. }));
    }

    #[tokio::test]
    async fn test_append_keeps_insertion_order() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;

        for (id, text) in [("a", "one"), ("b", "two"), ("c", "three")] {
            store.append_message(sample(id, text)).await.unwrap();
        }

        let ids: Vec<_> = store
            .list_messages()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_cast_vote_persists_counters() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        store.append_message(sample("m1", "vote on me")).await.unwrap();

        for _ in 0..3 {
            store.cast_vote("m1", VoteDirection::Up).await.unwrap();
        }
        let tally = store.cast_vote("m1", VoteDirection::Down).await.unwrap();
        assert_eq!(tally, VoteTally { upvotes: 3, downvotes: 1 });

        let reopened = store_in(&dir).await;
        assert_eq!(reopened.load().await.unwrap()[0].tally(), tally);
    }

    #[tokio::test]
    async fn test_vote_on_unknown_id_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        store.append_message(sample("m1", "hello")).await.unwrap();
        let before = std::fs::read(store.path()).unwrap();

        let err = store.cast_vote("nope", VoteDirection::Up).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref id) if id == "nope"));
        assert_eq!(std::fs::read(store.path()).unwrap(), before);
    }

    #[tokio::test]
    async fn test_concurrent_votes_are_not_lost() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(store_in(&dir).await);
        store.append_message(sample("m1", "popular")).await.unwrap();

        let tasks: Vec<_> = (0..20)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.cast_vote("m1", VoteDirection::Up).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(store.load().await.unwrap()[0].upvotes, 20);
    }
}
