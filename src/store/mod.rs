//! Entry log storage
//!
//! An entry log is an append-only, ordered list of arbitrary JSON records.
//! The [`EntryStore`] trait is the seam between the HTTP handlers and disk;
//! [`FileStore`] persists the log as one pretty-printed JSON array per path,
//! [`MemoryStore`] keeps it in process for tests.

mod file;
#[cfg(test)]
mod memory;
pub mod path;

pub use file::FileStore;
#[cfg(test)]
pub use memory::MemoryStore;
pub use path::PathPolicy;

use async_trait::async_trait;
use hyper::body::Bytes;
use serde_json::Value;

/// A single caller-supplied record, stored verbatim
pub type Record = Value;

/// Storage errors surfaced to the handlers
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the log file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The log could not be serialized.
    #[error("failed to encode entry log: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Append-only record storage
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Append one record at the end of the current log.
    async fn append(&self, record: Record) -> Result<(), StoreError>;

    /// Trailing records of the current log, see [`trailing_slice`].
    async fn read_recent(&self, limit: i64) -> Result<Vec<Record>, StoreError>;

    /// Raw bytes of the current log, `None` when it does not exist.
    async fn read_raw(&self) -> Result<Option<Bytes>, StoreError>;
}

/// Select the trailing part of an entry log.
///
/// - `limit > 0`: the last `limit` records (all of them if fewer)
/// - `limit == 0`: the whole log
/// - `limit < 0`: the log without its first `|limit|` records
pub fn trailing_slice(entries: &[Record], limit: i64) -> &[Record] {
    let len = entries.len();
    let magnitude = usize::try_from(limit.unsigned_abs()).unwrap_or(usize::MAX);
    let start = match limit {
        0 => 0,
        l if l > 0 => len.saturating_sub(magnitude),
        _ => magnitude.min(len),
    };
    &entries[start..]
}

/// Decode file content into an entry log; anything but a JSON array is empty.
pub fn parse_entries(content: &[u8]) -> Vec<Record> {
    match serde_json::from_slice::<Value>(content) {
        Ok(Value::Array(entries)) => entries,
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn numbered(n: i64) -> Vec<Record> {
        (1..=n).map(|i| json!({ "n": i })).collect()
    }

    #[test]
    fn test_trailing_slice_positive() {
        let entries = numbered(5);
        assert_eq!(trailing_slice(&entries, 2), &entries[3..]);
        assert_eq!(trailing_slice(&entries, 5), &entries[..]);
        assert_eq!(trailing_slice(&entries, 50), &entries[..]);
    }

    #[test]
    fn test_trailing_slice_zero_returns_everything() {
        let entries = numbered(3);
        assert_eq!(trailing_slice(&entries, 0).len(), 3);
    }

    #[test]
    fn test_trailing_slice_negative_drops_head() {
        let entries = numbered(5);
        assert_eq!(trailing_slice(&entries, -2), &entries[2..]);
        assert!(trailing_slice(&entries, -9).is_empty());
        assert!(trailing_slice(&entries, i64::MIN).is_empty());
    }

    #[test]
    fn test_trailing_slice_empty_log() {
        assert!(trailing_slice(&[], 10).is_empty());
        assert!(trailing_slice(&[], -1).is_empty());
    }

    #[test]
    fn test_parse_entries() {
        assert_eq!(parse_entries(b"[1, 2]"), vec![json!(1), json!(2)]);
        assert!(parse_entries(b"{}").is_empty());
        assert!(parse_entries(b"not json").is_empty());
        assert!(parse_entries(b"").is_empty());
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::io(
            std::path::Path::new("data/x.json"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("data/x.json"), "expected path in: {msg}");
        assert!(msg.contains("denied"), "expected cause in: {msg}");
    }
}
