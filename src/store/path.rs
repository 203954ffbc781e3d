//! Log file path resolution
//!
//! The dated policy keys the log by calendar date, one file per day; the
//! static policy uses the same file for the whole service lifetime.

use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};

use crate::config::{StoreConfig, StoreMode};

/// Source of the current calendar date
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// How the log file path is derived
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPolicy {
    /// `<dir>/<YYYY-MM-DD>.json`
    Dated { dir: PathBuf },
    /// Always the same file
    Static { file: PathBuf },
}

impl PathPolicy {
    pub fn from_config(store: &StoreConfig) -> Self {
        match store.mode {
            StoreMode::Dated => Self::Dated {
                dir: PathBuf::from(&store.dir),
            },
            StoreMode::Static => Self::Static {
                file: PathBuf::from(&store.file),
            },
        }
    }

    /// Log file for the given date
    pub fn resolve(&self, date: NaiveDate) -> PathBuf {
        match self {
            Self::Dated { dir } => dated_file(dir, date),
            Self::Static { file } => file.clone(),
        }
    }

    pub const fn is_dated(&self) -> bool {
        matches!(self, Self::Dated { .. })
    }
}

fn dated_file(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}.json", date.format("%Y-%m-%d")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_dated_path_is_zero_padded() {
        let policy = PathPolicy::Dated {
            dir: PathBuf::from("data"),
        };
        assert_eq!(
            policy.resolve(date(2024, 3, 5)),
            PathBuf::from("data/2024-03-05.json")
        );
    }

    #[test]
    fn test_dated_path_rolls_over() {
        let policy = PathPolicy::Dated {
            dir: PathBuf::from("data"),
        };
        assert_ne!(
            policy.resolve(date(2024, 12, 31)),
            policy.resolve(date(2025, 1, 1))
        );
    }

    #[test]
    fn test_static_path_ignores_date() {
        let policy = PathPolicy::Static {
            file: PathBuf::from("data/data.json"),
        };
        assert_eq!(
            policy.resolve(date(2024, 1, 1)),
            policy.resolve(date(2030, 6, 30))
        );
        assert!(!policy.is_dated());
    }
}
