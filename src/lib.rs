//! # nlist
//!
//! A CGI program that lists a directory of plain-text articles as an HTML
//! page or an RSS feed. Every invocation serves exactly one request and
//! keeps no state between requests.
//!
//! # Architecture: Two Stages per Request
//!
//! ```text
//! 1. Discover  data/ + request  →  Feed       (filesystem → ordered articles)
//! 2. Render    templates + Feed →  response   (%%MACRO%% expansion)
//! ```
//!
//! The feed is built completely before the first body byte is written, and
//! rendering only reads it.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`request`] | Query validation and `(parent, article)` selector parsing |
//! | [`naming`] | `.txt` article and `.html` page filename conventions |
//! | [`exclude`] | Substring exclusion list for unfiltered listings |
//! | [`discover`] | Reverse-name directory walk producing the [`types::Feed`] |
//! | [`render`] | Macro registry and recursive template expansion |
//! | [`cgi`] | CGI environment, response headers, error pages |
//! | [`config`] | TOML configuration loading and validation |
//! | [`text`] | HTML escaping and date layouts |
//! | [`logging`] | Tracing subscriber setup |
//! | [`output`] | CLI formatting for `scan` and `check` |
//! | [`types`] | `Article` and `Feed` |
//!
//! # Design Decisions
//!
//! ## File Names Are the Order
//!
//! Articles are listed in descending file-name order, not by modification
//! time. Date-prefixed names (`2024_05_01_launch.txt`) therefore list newest
//! first, and renaming a file is how an author reorders the front page.
//!
//! ## Templates Are Plain Files
//!
//! Pages are produced from static template files under `htmldir` with
//! `%%NAME%%` placeholders. Designers edit HTML and RSS directly; a typo in
//! a macro name shows up on the page rather than failing the request.
//!
//! ## Fail Soft Inside a Page
//!
//! Once headers are out, nothing aborts the response: unreadable articles are
//! skipped, missing templates and unknown macros leave inline markers.
//! Requests are rejected only up front, for a malformed query or an unusable
//! configuration.

pub mod cgi;
pub mod config;
pub mod discover;
pub mod exclude;
pub mod logging;
pub mod naming;
pub mod output;
pub mod render;
pub mod request;
pub mod text;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
