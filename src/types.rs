//! Shared types produced by discovery and consumed by rendering.
//!
//! Both types live for exactly one request: a [`Feed`] is filled once by
//! [`crate::discover::discover`] and then only read by the renderer.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::PathBuf;

/// One discovered content entry, built from a `.txt` file.
///
/// Articles are never mutated after discovery. A file that cannot be read,
/// or whose name would be empty, never becomes an `Article`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Article {
    /// Full path of the source file
    pub path: PathBuf,
    /// File name up to the first `.` (`2024-05-01-launch.txt` → `2024-05-01-launch`)
    pub name: String,
    /// Containing directory name, `None` for files directly in the data root
    pub parent: Option<String>,
    /// First line of the file without its line terminator
    pub title: String,
    /// Modification time of the file
    pub pubdate: DateTime<Local>,
}

impl Article {
    /// `parent/name` for nested articles, plain `name` at the top level.
    pub fn qualified_name(&self) -> String {
        match &self.parent {
            Some(parent) => format!("{parent}/{}", self.name),
            None => self.name.clone(),
        }
    }
}

/// Ordered, bounded list of articles in discovery order.
#[derive(Debug, Clone, Serialize)]
pub struct Feed {
    articles: Vec<Article>,
    #[serde(skip)]
    limit: usize,
}

impl Feed {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            articles: Vec::with_capacity(limit.min(64)),
            limit,
        }
    }

    /// Append an article. Returns `false` and drops the article once the
    /// feed already holds `limit` entries.
    pub fn push(&mut self, article: Article) -> bool {
        if self.is_full() {
            return false;
        }
        self.articles.push(article);
        true
    }

    pub fn is_full(&self) -> bool {
        self.articles.len() >= self.limit
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Article> {
        self.articles.iter()
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }
}

impl<'a> IntoIterator for &'a Feed {
    type Item = &'a Article;
    type IntoIter = std::slice::Iter<'a, Article>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
