//! File-backed entry log
//!
//! Every append rewrites the whole file: load, push, pretty-print to a sibling
//! temporary file, rename over the original. The read-modify-write cycle runs
//! under an async mutex so appends from one process never overwrite each other.
//! Several processes sharing one file are not coordinated.

use async_trait::async_trait;
use hyper::body::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

use super::path::{Clock, PathPolicy, SystemClock};
use super::{parse_entries, trailing_slice, EntryStore, Record, StoreError};

/// Entry log persisted as a JSON array on disk
pub struct FileStore {
    policy: PathPolicy,
    clock: Arc<dyn Clock>,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(policy: PathPolicy) -> Self {
        Self::with_clock(policy, Arc::new(SystemClock))
    }

    pub fn with_clock(policy: PathPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            policy,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the log file currently in use
    pub fn current_path(&self) -> PathBuf {
        self.policy.resolve(self.clock.today())
    }

    /// Dated logs are created empty on first access for their day.
    async fn ensure_exists(&self, path: &Path) -> Result<(), StoreError> {
        if !self.policy.is_dated() {
            return Ok(());
        }
        let exists = fs::try_exists(path)
            .await
            .map_err(|e| StoreError::io(path, e))?;
        if exists {
            return Ok(());
        }
        write_entries(path, &[]).await
    }
}

#[async_trait]
impl EntryStore for FileStore {
    async fn append(&self, record: Record) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let path = self.current_path();

        let mut entries = load_entries(&path).await?;
        entries.push(record);
        write_entries(&path, &entries).await
    }

    async fn read_recent(&self, limit: i64) -> Result<Vec<Record>, StoreError> {
        let _guard = self.write_lock.lock().await;
        let path = self.current_path();
        self.ensure_exists(&path).await?;

        let entries = load_entries(&path).await?;
        Ok(trailing_slice(&entries, limit).to_vec())
    }

    async fn read_raw(&self) -> Result<Option<Bytes>, StoreError> {
        let _guard = self.write_lock.lock().await;
        let path = self.current_path();
        self.ensure_exists(&path).await?;

        match fs::read(&path).await {
            Ok(content) => Ok(Some(Bytes::from(content))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }
}

/// Load the log; a missing file reads as empty, so does non-array content.
async fn load_entries(path: &Path) -> Result<Vec<Record>, StoreError> {
    match fs::read(path).await {
        Ok(content) => Ok(parse_entries(&content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(StoreError::io(path, e)),
    }
}

async fn write_entries(path: &Path, entries: &[Record]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }
    }

    let content = serde_json::to_vec_pretty(entries)?;
    let tmp = temp_path(path);
    fs::write(&tmp, content)
        .await
        .map_err(|e| StoreError::io(&tmp, e))?;
    fs::rename(&tmp, path)
        .await
        .map_err(|e| StoreError::io(path, e))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
