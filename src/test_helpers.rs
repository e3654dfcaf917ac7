//! Shared test utilities for the nlist test suite.
//!
//! Fixtures are built inline in a `TempDir` rather than copied from disk, so
//! every test shows the exact tree it runs against.
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_article(tmp.path(), "data/news/index.txt", "Front\nbody\n");
//! let feed = discover(...);
//! assert_eq!(feed_names(&feed), vec!["index"]);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::types::{Article, Feed};
use chrono::{Local, TimeZone};

// =========================================================================
// Fixture setup
// =========================================================================

/// Write `contents` to `root/relative`, creating parent directories.
pub fn write_article(root: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

/// An article that never touched the filesystem, dated 2024-05-01 12:00 local.
pub fn sample_article(name: &str, title: &str) -> Article {
    Article {
        path: PathBuf::from(format!("/nonexistent/{name}.txt")),
        name: name.to_string(),
        parent: None,
        title: title.to_string(),
        pubdate: Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    }
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// All article names in feed order.
pub fn feed_names(feed: &Feed) -> Vec<&str> {
    feed.iter().map(|a| a.name.as_str()).collect()
}

/// All article titles in feed order.
pub fn feed_titles(feed: &Feed) -> Vec<&str> {
    feed.iter().map(|a| a.title.as_str()).collect()
}
