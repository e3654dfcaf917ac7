//! Request path parsing.
//!
//! A request is a short slash-separated string taken from `QUERY_STRING`:
//!
//! ```text
//! (absent)                 → root listing, HTML
//! /news/                   → news/index.txt
//! /news/update.html        → news/update.txt
//! /launch.html             → launch.txt from the root
//! /rss                     → root listing, RSS
//! ```
//!
//! Only the last directory segment is kept as the parent, so `/a/b/c.html`
//! selects `c.txt` inside any directory named `b`.
//!
//! [`validate`] is the boundary check and runs before [`Selector::parse`];
//! parsing itself never fails.

use crate::naming::{INDEX_ARTICLE, PAGE_SUFFIX, page_to_article_file};
use thiserror::Error;

/// Longest request string accepted.
pub const MAX_QUERY_LEN: usize = 64;

/// Leading segment that switches output to RSS.
pub const RSS_MARKER: &str = "rss";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RequestError {
    #[error("You are trying to send very long query!")]
    TooLong(usize),
    #[error("HTML escaped ampersand in cgi query string \"{0}\"")]
    EscapedAmpersand(String),
    #[error("You are trying to send wrong query!")]
    InvalidCharacter { position: usize, character: char },
}

/// Reject anything that is not a plain path.
///
/// Allowed: ASCII letters, digits, `/`, `_`, and a single `.` exactly five
/// characters from the end (the dot of `.html`).
pub fn validate(query: &str) -> Result<(), RequestError> {
    if query.len() > MAX_QUERY_LEN {
        return Err(RequestError::TooLong(query.len()));
    }
    if query.contains("&amp;") {
        return Err(RequestError::EscapedAmpersand(query.to_string()));
    }
    let dot_position = query.len().checked_sub(5);
    for (position, character) in query.char_indices() {
        let allowed = character.is_ascii_alphanumeric()
            || character == '/'
            || character == '_'
            || (character == '.' && Some(position) == dot_position);
        if !allowed {
            return Err(RequestError::InvalidCharacter {
                position,
                character,
            });
        }
    }
    Ok(())
}

/// Output format chosen by the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Html,
    Rss,
}

/// The `(parent, article)` pair a request selects.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selector {
    /// Directory name the article must live in; `None` means the data root
    pub parent: Option<String>,
    /// Exact file name to select; `None` lists every non-excluded article
    pub article: Option<String>,
    pub mode: OutputMode,
}

impl Selector {
    /// Parse a raw request string. `None` is the root listing in HTML.
    pub fn parse(query: Option<&str>) -> Self {
        let Some(query) = query else {
            return Self::default();
        };

        let mut parent = None;
        let mut article = None;
        for segment in query.split('/').filter(|s| !s.is_empty()) {
            if segment.contains(PAGE_SUFFIX) {
                article = Some(page_to_article_file(segment));
            } else {
                parent = Some(segment.to_string());
            }
        }

        let mode = if query.trim_start_matches('/').starts_with(RSS_MARKER) {
            parent = None;
            OutputMode::Rss
        } else {
            OutputMode::Html
        };

        if parent.is_some() && article.is_none() {
            article = Some(INDEX_ARTICLE.to_string());
        }

        Self {
            parent,
            article,
            mode,
        }
    }

    pub fn is_rss(&self) -> bool {
        self.mode == OutputMode::Rss
    }
}
