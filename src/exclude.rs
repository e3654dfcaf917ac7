//! Exclusion list for unfiltered listings.
//!
//! The list is a plain text file with one substring per line. Any article
//! whose full path contains one of them is left out of listings, but can
//! still be requested by its exact name.
//!
//! The file is read again on every check, so edits apply immediately
//! without any reload step. A missing file excludes nothing.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct ExclusionFilter {
    list: PathBuf,
}

impl ExclusionFilter {
    pub fn new(list: impl Into<PathBuf>) -> Self {
        Self { list: list.into() }
    }

    /// True when `path` contains any non-empty line of the list.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let file = match File::open(&self.list) {
            Ok(file) => file,
            Err(err) => {
                warn!(list = %self.list.display(), error = %err, "Cannot open exclude file");
                return false;
            }
        };

        let haystack = path.to_string_lossy();
        for line in BufReader::new(file).split(b'\n') {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    warn!(list = %self.list.display(), error = %err, "Reading exclude file failed");
                    return false;
                }
            };
            let pattern = String::from_utf8_lossy(&line);
            let pattern = pattern.trim_end_matches(['\r', '\n']);
            if !pattern.is_empty() && haystack.contains(pattern) {
                return true;
            }
        }
        false
    }
}
