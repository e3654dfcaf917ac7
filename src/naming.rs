//! Filename conventions shared by request parsing and discovery.
//!
//! Articles are plain `.txt` files. Their public name is everything before
//! the first dot, so `2024-05-01-launch.txt` is served as
//! `2024-05-01-launch.html`:
//!
//! ```text
//! data/
//! ├── 2024-05-01-launch.txt    → /2024-05-01-launch.html
//! ├── 2024-04-12-notes.txt     → /2024-04-12-notes.html
//! └── news/
//!     ├── index.txt            → /news/         (section landing article)
//!     └── 2024-03-02-update.txt → /news/2024-03-02-update.html
//! ```
//!
//! Sorting is by file name only, descending, so date-prefixed names list
//! newest first.

/// Suffix every article file carries.
pub const ARTICLE_SUFFIX: &str = ".txt";

/// Suffix that marks a request segment as an article selector.
pub const PAGE_SUFFIX: &str = ".html";

/// Article shown when a section is requested without naming an article.
pub const INDEX_ARTICLE: &str = "index.txt";

/// Derive an article name from a file name: the part before the first `.`.
///
/// Returns `None` when that part is empty (`.txt`, `.hidden.txt`).
///
/// - `"2024-05-01-launch.txt"` → `Some("2024-05-01-launch")`
/// - `"notes.v2.txt"` → `Some("notes")`
/// - `".txt"` → `None`
pub fn article_name(file_name: &str) -> Option<&str> {
    let stem = match file_name.find('.') {
        Some(dot) => &file_name[..dot],
        None => file_name,
    };
    (!stem.is_empty()).then_some(stem)
}

/// Suffix check only; `README.TXT` and `notes.txt.bak` are not articles.
pub fn is_article_file(file_name: &str) -> bool {
    file_name.ends_with(ARTICLE_SUFFIX)
}

/// Map a requested page segment to the file it selects.
///
/// Everything from the first `.` on is replaced by `.txt`:
/// `"launch.html"` → `"launch.txt"`, `"a.b.html"` → `"a.txt"`.
pub fn page_to_article_file(segment: &str) -> String {
    let stem = match segment.find('.') {
        Some(dot) => &segment[..dot],
        None => segment,
    };
    format!("{stem}{ARTICLE_SUFFIX}")
}
