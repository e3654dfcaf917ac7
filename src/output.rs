//! CLI output formatting for the `scan` and `check` commands.
//!
//! # Information-First Display
//!
//! Each article leads with its position and title; the file it came from
//! is an indented context line:
//!
//! ```text
//! Feed (html, 2 of 10)
//! 001 Second
//!     Article: b
//!     Source: b.txt
//!     Date: Wed May  1 12:00:00 2024
//! 002 Front
//!     Article: news/index
//!     Source: news/index.txt
//!     Date: Wed May  1 12:00:00 2024
//! ```
//!
//! `format_*` functions return lines and do no I/O; `print_*` wrappers
//! write them to stdout.

use crate::request::{OutputMode, Selector};
use crate::text::ctime;
use crate::types::{Article, Feed};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Empty titles show the article name in parentheses.
fn article_header(index: usize, article: &Article) -> String {
    if article.title.is_empty() {
        format!("{} ({})", format_index(index), article.name)
    } else {
        format!("{} {}", format_index(index), article.title)
    }
}

fn mode_label(mode: OutputMode) -> &'static str {
    match mode {
        OutputMode::Html => "html",
        OutputMode::Rss => "rss",
    }
}

/// Format a discovered feed with paths shown relative to `data_root`.
pub fn format_feed(feed: &Feed, selector: &Selector, data_root: &Path) -> Vec<String> {
    let mut lines = vec![format!(
        "Feed ({}, {} of {})",
        mode_label(selector.mode),
        feed.len(),
        feed.limit()
    )];

    if feed.is_empty() {
        lines.push("    (no articles)".to_string());
        return lines;
    }

    for (i, article) in feed.iter().enumerate() {
        let source = article.path.strip_prefix(data_root).unwrap_or(&article.path);
        lines.push(article_header(i + 1, article));
        lines.push(format!("    Article: {}", article.qualified_name()));
        lines.push(format!("    Source: {}", source.display()));
        lines.push(format!("    Date: {}", ctime(&article.pubdate)));
    }
    lines
}

pub fn print_feed(feed: &Feed, selector: &Selector, data_root: &Path) {
    for line in format_feed(feed, selector, data_root) {
        println!("{}", line);
    }
}

/// One line per check: `ok` or `missing` followed by what was checked.
pub fn format_check(results: &[(String, bool)]) -> Vec<String> {
    results
        .iter()
        .map(|(what, ok)| format!("{:<8}{}", if *ok { "ok" } else { "missing" }, what))
        .collect()
}

/// What failed, in check order.
pub fn failed_checks(results: &[(String, bool)]) -> Vec<&str> {
    results
        .iter()
        .filter(|(_, ok)| !ok)
        .map(|(what, _)| what.as_str())
        .collect()
}

pub fn print_check(results: &[(String, bool)]) {
    for line in format_check(results) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use std::path::PathBuf;

    fn feed_of(articles: Vec<Article>) -> Feed {
        let mut feed = Feed::with_limit(10);
        for article in articles {
            feed.push(article);
        }
        feed
    }

    #[test]
    fn feed_lists_articles_with_context() {
        let mut nested = sample_article("index", "Front");
        nested.parent = Some("news".to_string());
        nested.path = PathBuf::from("/srv/data/news/index.txt");
        let mut top = sample_article("b", "Second");
        top.path = PathBuf::from("/srv/data/b.txt");

        let lines = format_feed(
            &feed_of(vec![top, nested]),
            &Selector::default(),
            Path::new("/srv/data"),
        );
        assert_eq!(
            lines,
            vec![
                "Feed (html, 2 of 10)",
                "001 Second",
                "    Article: b",
                "    Source: b.txt",
                "    Date: Wed May  1 12:00:00 2024",
                "002 Front",
                "    Article: news/index",
                "    Source: news/index.txt",
                "    Date: Wed May  1 12:00:00 2024",
            ]
        );
    }

    #[test]
    fn untitled_article_shows_name() {
        let lines = format_feed(
            &feed_of(vec![sample_article("draft", "")]),
            &Selector::parse(Some("rss")),
            Path::new("/srv/data"),
        );
        assert_eq!(lines[0], "Feed (rss, 1 of 10)");
        assert_eq!(lines[1], "001 (draft)");
    }

    #[test]
    fn empty_feed_says_so() {
        let lines = format_feed(&Feed::with_limit(5), &Selector::default(), Path::new("/"));
        assert_eq!(lines, vec!["Feed (html, 0 of 5)", "    (no articles)"]);
    }

    #[test]
    fn check_lines_are_aligned() {
        let lines = format_check(&[
            ("datadir /srv/data".to_string(), true),
            ("template main.html".to_string(), false),
        ]);
        assert_eq!(
            lines,
            vec!["ok      datadir /srv/data", "missing template main.html"]
        );
    }

    #[test]
    fn failed_checks_lists_only_missing() {
        let results = [
            ("datadir /srv/data".to_string(), true),
            ("template main.html".to_string(), false),
            ("template story.html".to_string(), false),
        ];
        assert_eq!(
            failed_checks(&results),
            vec!["template main.html", "template story.html"]
        );
        assert!(failed_checks(&results[..1]).is_empty());
    }
}
