//! Article discovery.
//!
//! Walks the data root and collects the articles a [`Selector`] asks for,
//! newest first by file name, up to a fixed count.
//!
//! ## Traversal
//!
//! The walk is depth-first. Siblings are visited in descending byte order of
//! their names, so `2024-05-01-launch.txt` comes before `2024-04-12-notes.txt`
//! and a directory is fully listed before its smaller-named siblings.
//! Symlinks are followed.
//!
//! ## Gates
//!
//! A regular file becomes an article only if it passes all three:
//!
//! | Gate | Passes when |
//! |------|-------------|
//! | parent | no parent selected and the file sits directly in the root, or the file is below the root and its containing directory's name equals the selected parent |
//! | article | no article selected and the path is not excluded, or the file name equals the selected article |
//! | extension | the file name ends in `.txt` |
//!
//! ## Failures
//!
//! An unreadable root yields an empty feed. Unreadable entries and files
//! are logged and skipped; they do not count toward the limit.

use crate::exclude::ExclusionFilter;
use crate::naming::{article_name, is_article_file};
use crate::request::Selector;
use crate::types::{Article, Feed};
use chrono::{DateTime, Local};
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum DiscoverError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("No article name in file name: {0}")]
    Unnamed(PathBuf),
}

/// Traversal limits.
#[derive(Debug, Clone, Copy)]
pub struct DiscoverOptions {
    /// Maximum number of articles in the feed
    pub max_count: usize,
    /// Deepest level visited below the root (`1` = root files only)
    pub max_depth: Option<usize>,
}

impl DiscoverOptions {
    pub fn new(max_count: usize) -> Self {
        Self {
            max_count,
            max_depth: None,
        }
    }
}

pub fn discover(
    root: &Path,
    selector: &Selector,
    exclusions: &ExclusionFilter,
    options: DiscoverOptions,
) -> Feed {
    let mut feed = Feed::with_limit(options.max_count);

    if let Err(err) = fs::read_dir(root) {
        warn!(root = %root.display(), error = %err, "Cannot open data directory");
        return feed;
    }

    let mut walker = WalkDir::new(root)
        .follow_links(true)
        .min_depth(1)
        .sort_by(|a, b| b.file_name().cmp(a.file_name()));
    if let Some(depth) = options.max_depth {
        walker = walker.max_depth(depth);
    }

    for result in walker {
        if feed.is_full() {
            break;
        }
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "Skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() || !accepts(&entry, selector, exclusions) {
            continue;
        }
        match build_article(&entry) {
            Ok(article) => {
                feed.push(article);
            }
            Err(err) => {
                debug!(path = %entry.path().display(), error = %err, "Skipping article");
            }
        }
    }

    feed
}

fn accepts(entry: &DirEntry, selector: &Selector, exclusions: &ExclusionFilter) -> bool {
    let file_name = entry.file_name().to_string_lossy();

    let parent_ok = match &selector.parent {
        None => entry.depth() == 1,
        // The data root's own name never counts as a parent.
        Some(parent) => {
            entry.depth() > 1 && containing_dir_name(entry).as_deref() == Some(parent.as_str())
        }
    };
    if !parent_ok {
        return false;
    }

    let article_ok = match &selector.article {
        None => !exclusions.is_excluded(entry.path()),
        Some(article) => file_name.as_ref() == article.as_str(),
    };

    article_ok && is_article_file(&file_name)
}

fn containing_dir_name(entry: &DirEntry) -> Option<String> {
    entry
        .path()
        .parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
}

fn build_article(entry: &DirEntry) -> Result<Article, DiscoverError> {
    let path = entry.path();
    let file_name = entry.file_name().to_string_lossy();
    let name = article_name(&file_name)
        .ok_or_else(|| DiscoverError::Unnamed(path.to_path_buf()))?
        .to_string();

    let title = read_title(path)?;
    let modified = entry.metadata().map_err(std::io::Error::from)?.modified()?;
    let parent = if entry.depth() == 1 {
        None
    } else {
        containing_dir_name(entry)
    };

    Ok(Article {
        path: path.to_path_buf(),
        name,
        parent,
        title,
        pubdate: DateTime::<Local>::from(modified),
    })
}

/// First line of the file, without `\n` or `\r\n`. Empty files give `""`.
fn read_title(path: &Path) -> std::io::Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut line = Vec::new();
    reader.read_until(b'\n', &mut line)?;
    let title = String::from_utf8_lossy(&line);
    Ok(title.trim_end_matches('\n').trim_end_matches('\r').to_string())
}
