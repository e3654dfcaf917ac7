//! Macro expansion over static template files.
//!
//! Templates are plain text with `%%NAME%%` placeholders. Each template is
//! rendered against a [`Table`], the set of macro names valid in it, and an
//! optional current [`Article`]:
//!
//! ```text
//! main.html           Table::Front    HEADER FOOTER STORY
//! ├── header.html     Table::Fragment
//! ├── footer.html     Table::Fragment
//! └── story.html      Table::Story    NAME TITLE DATE ARTICLE LINK BODY   (once per article)
//!
//! summary.rss         Table::Rss      ITEMS
//! └── summary_item.rss Table::RssItem TITLE LINK DATE BODY              (once per article)
//! ```
//!
//! `BASEURL` and `CTYPE` resolve in every table.
//!
//! ## Scanning
//!
//! Templates are processed one line at a time. On each line, text up to a
//! `%%` is copied, the text up to the next `%%` is the macro name, and
//! scanning resumes after it. A `%%` with no partner on the same line is
//! copied as-is together with the rest of the line.
//!
//! ## Failures
//!
//! Nothing here aborts a page. A template that cannot be opened, an unknown
//! macro, or an unreadable article body each leave a visible marker in the
//! output and rendering carries on. Only write errors on the sink propagate.
//!
//! Expansion depth follows the nesting written into the templates. There is
//! no cycle check: a template that includes itself recurses until the stack
//! runs out.

use crate::text::{ctime, escape_html};
use crate::types::{Article, Feed};
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

const DELIMITER: &[u8] = b"%%";

/// Shown for a story whose first line is empty.
pub const UNTITLED: &str = "NONAMEZ";

pub const MAIN_TEMPLATE: &str = "main.html";
pub const HEADER_TEMPLATE: &str = "header.html";
pub const FOOTER_TEMPLATE: &str = "footer.html";
pub const STORY_TEMPLATE: &str = "story.html";
pub const RSS_TEMPLATE: &str = "summary.rss";
pub const RSS_ITEM_TEMPLATE: &str = "summary_item.rss";

/// Every template file the standard registry refers to.
pub const TEMPLATE_FILES: &[&str] = &[
    MAIN_TEMPLATE,
    HEADER_TEMPLATE,
    FOOTER_TEMPLATE,
    STORY_TEMPLATE,
    RSS_TEMPLATE,
    RSS_ITEM_TEMPLATE,
];

/// Which macro names a template may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Front,
    Fragment,
    Story,
    Rss,
    RssItem,
}

impl Table {
    fn label(self) -> &'static str {
        match self {
            Table::Front => "render_front",
            Table::Fragment => "render_fragment",
            Table::Story => "render_front_story",
            Table::Rss => "render_rss",
            Table::RssItem => "render_rss_item",
        }
    }

    /// Markers end with a visible break in HTML and a plain newline in RSS.
    fn line_end(self) -> &'static str {
        match self {
            Table::Front | Table::Fragment | Table::Story => "<br>\n",
            Table::Rss | Table::RssItem => "\n",
        }
    }
}

/// A value printed straight into the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    BaseUrl,
    ContentType,
    /// Title as written
    Title,
    /// Title with markup escaped and line breaks dropped
    EscapedTitle,
    /// Title, or [`UNTITLED`] when empty
    Name,
    /// Modification time in `ctime` layout
    Date,
    /// `<baseurl>/<name>.html`
    Link,
    /// `parent/name`, or `name` at the top level
    Article,
    /// File contents after the first line
    Body,
}

/// What a macro expands to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expansion {
    /// Render `template` once with the current article
    Include { template: PathBuf, table: Table },
    /// Render `template` once per feed article, each as the current article
    ForEach { template: PathBuf, table: Table },
    Field(Field),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroEntry {
    pub name: String,
    pub expansion: Expansion,
}

impl MacroEntry {
    pub fn include(name: &str, template: impl Into<PathBuf>, table: Table) -> Self {
        Self {
            name: name.to_string(),
            expansion: Expansion::Include {
                template: template.into(),
                table,
            },
        }
    }

    pub fn for_each(name: &str, template: impl Into<PathBuf>, table: Table) -> Self {
        Self {
            name: name.to_string(),
            expansion: Expansion::ForEach {
                template: template.into(),
                table,
            },
        }
    }

    pub fn field(name: &str, field: Field) -> Self {
        Self {
            name: name.to_string(),
            expansion: Expansion::Field(field),
        }
    }

    /// Template rendered by this macro, if any.
    pub fn template(&self) -> Option<&Path> {
        match &self.expansion {
            Expansion::Include { template, .. } | Expansion::ForEach { template, .. } => {
                Some(template)
            }
            Expansion::Field(_) => None,
        }
    }
}

/// Macro name → entry, per table, plus entries valid in every table.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    global: HashMap<String, MacroEntry>,
    tables: HashMap<Table, HashMap<String, MacroEntry>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The macro vocabulary served by nlist, with templates under `html_dir`.
    pub fn standard(html_dir: &Path) -> Self {
        let mut registry = Self::new();

        registry.register_global(MacroEntry::field("BASEURL", Field::BaseUrl));
        registry.register_global(MacroEntry::field("CTYPE", Field::ContentType));

        registry.register(
            Table::Front,
            MacroEntry::include("HEADER", html_dir.join(HEADER_TEMPLATE), Table::Fragment),
        );
        registry.register(
            Table::Front,
            MacroEntry::include("FOOTER", html_dir.join(FOOTER_TEMPLATE), Table::Fragment),
        );
        registry.register(
            Table::Front,
            MacroEntry::for_each("STORY", html_dir.join(STORY_TEMPLATE), Table::Story),
        );

        for (name, field) in [
            ("NAME", Field::Name),
            ("TITLE", Field::Title),
            ("DATE", Field::Date),
            ("ARTICLE", Field::Article),
            ("LINK", Field::Link),
            ("BODY", Field::Body),
        ] {
            registry.register(Table::Story, MacroEntry::field(name, field));
        }

        registry.register(
            Table::Rss,
            MacroEntry::for_each("ITEMS", html_dir.join(RSS_ITEM_TEMPLATE), Table::RssItem),
        );

        for (name, field) in [
            ("TITLE", Field::EscapedTitle),
            ("LINK", Field::Link),
            ("DATE", Field::Date),
            ("BODY", Field::Body),
        ] {
            registry.register(Table::RssItem, MacroEntry::field(name, field));
        }

        registry
    }

    pub fn register(&mut self, table: Table, entry: MacroEntry) {
        self.tables
            .entry(table)
            .or_default()
            .insert(entry.name.clone(), entry);
    }

    pub fn register_global(&mut self, entry: MacroEntry) {
        self.global.insert(entry.name.clone(), entry);
    }

    /// Exact-name lookup; table entries shadow global ones.
    pub fn lookup(&self, table: Table, name: &str) -> Option<&MacroEntry> {
        self.tables
            .get(&table)
            .and_then(|entries| entries.get(name))
            .or_else(|| self.global.get(name))
    }
}

/// Per-request rendering state. Everything is borrowed and read-only.
pub struct Renderer<'a> {
    registry: &'a Registry,
    feed: &'a Feed,
    base_url: &'a str,
    content_type: &'a str,
}

impl<'a> Renderer<'a> {
    pub fn new(
        registry: &'a Registry,
        feed: &'a Feed,
        base_url: &'a str,
        content_type: &'a str,
    ) -> Self {
        Self {
            registry,
            feed,
            base_url,
            content_type,
        }
    }

    /// Expand `template` into `out`, resolving macros in `table` against
    /// `context`.
    pub fn render<W: Write + ?Sized>(
        &self,
        out: &mut W,
        template: &Path,
        table: Table,
        context: Option<&Article>,
    ) -> io::Result<()> {
        let file = match File::open(template) {
            Ok(file) => file,
            Err(err) => {
                warn!(template = %template.display(), error = %err, "Cannot open template");
                return write!(
                    out,
                    "ERROR: fopen: {}: {}{}",
                    template.display(),
                    err,
                    table.line_end()
                );
            }
        };

        let mut reader = BufReader::new(file);
        let mut line = Vec::new();
        loop {
            line.clear();
            match reader.read_until(b'\n', &mut line) {
                Ok(0) => break,
                Ok(_) => self.expand_line(out, &line, table, context)?,
                Err(err) => {
                    warn!(template = %template.display(), error = %err, "Reading template failed");
                    return write!(
                        out,
                        "ERROR: read: {}: {}{}",
                        template.display(),
                        err,
                        table.line_end()
                    );
                }
            }
        }
        Ok(())
    }

    fn expand_line<W: Write + ?Sized>(
        &self,
        out: &mut W,
        line: &[u8],
        table: Table,
        context: Option<&Article>,
    ) -> io::Result<()> {
        let mut rest = line;
        while let Some(open) = find_delimiter(rest) {
            let after_open = &rest[open + DELIMITER.len()..];
            let Some(close) = find_delimiter(after_open) else {
                break;
            };
            out.write_all(&rest[..open])?;
            let name = String::from_utf8_lossy(&after_open[..close]);
            self.expand(out, &name, table, context)?;
            rest = &after_open[close + DELIMITER.len()..];
        }
        out.write_all(rest)
    }

    fn expand<W: Write + ?Sized>(
        &self,
        out: &mut W,
        name: &str,
        table: Table,
        context: Option<&Article>,
    ) -> io::Result<()> {
        let Some(entry) = self.registry.lookup(table, name) else {
            return write!(
                out,
                "{}: unknown macro '{}'{}",
                table.label(),
                escape_html(name),
                table.line_end()
            );
        };

        match &entry.expansion {
            Expansion::Include { template, table } => self.render(out, template, *table, context),
            Expansion::ForEach { template, table } => {
                for article in self.feed {
                    self.render(out, template, *table, Some(article))?;
                }
                Ok(())
            }
            Expansion::Field(field) => self.field(out, *field, table, context),
        }
    }

    fn field<W: Write + ?Sized>(
        &self,
        out: &mut W,
        field: Field,
        table: Table,
        context: Option<&Article>,
    ) -> io::Result<()> {
        match field {
            Field::BaseUrl => return out.write_all(self.base_url.as_bytes()),
            Field::ContentType => return out.write_all(self.content_type.as_bytes()),
            _ => {}
        }

        // Article fields print nothing outside an item template.
        let Some(article) = context else {
            return Ok(());
        };

        match field {
            Field::Title => out.write_all(article.title.as_bytes()),
            Field::EscapedTitle => out.write_all(escape_html(&article.title).as_bytes()),
            Field::Name if article.title.is_empty() => out.write_all(UNTITLED.as_bytes()),
            Field::Name => out.write_all(article.title.as_bytes()),
            Field::Date => out.write_all(ctime(&article.pubdate).as_bytes()),
            Field::Link => write!(out, "{}/{}.html", self.base_url, article.name),
            Field::Article => out.write_all(article.qualified_name().as_bytes()),
            Field::Body => self.body(out, article, table),
            Field::BaseUrl | Field::ContentType => Ok(()),
        }
    }

    fn body<W: Write + ?Sized>(&self, out: &mut W, article: &Article, table: Table) -> io::Result<()> {
        let file = match File::open(&article.path) {
            Ok(file) => file,
            Err(err) => {
                warn!(path = %article.path.display(), error = %err, "Cannot open article body");
                return write!(
                    out,
                    "{}: fopen: {}: {}{}",
                    table.label(),
                    article.path.display(),
                    err,
                    table.line_end()
                );
            }
        };

        self.stream_body(BufReader::new(file), &article.path, out, table)
    }

    /// Copy `reader` from its second line on. A read error ends the body
    /// with a marker; only write errors on `out` are returned.
    fn stream_body<R: BufRead, W: Write + ?Sized>(
        &self,
        mut reader: R,
        path: &Path,
        out: &mut W,
        table: Table,
    ) -> io::Result<()> {
        if let Err(err) = reader.read_until(b'\n', &mut Vec::new()) {
            return read_failed(out, path, &err, table);
        }
        loop {
            let chunk = match reader.fill_buf() {
                Ok(chunk) if chunk.is_empty() => return Ok(()),
                Ok(chunk) => chunk,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return read_failed(out, path, &err, table),
            };
            out.write_all(chunk)?;
            let len = chunk.len();
            reader.consume(len);
        }
    }
}

fn read_failed<W: Write + ?Sized>(
    out: &mut W,
    path: &Path,
    err: &io::Error,
    table: Table,
) -> io::Result<()> {
    warn!(path = %path.display(), error = %err, "Reading article body failed");
    write!(
        out,
        "{}: read: {}: {}{}",
        table.label(),
        path.display(),
        err,
        table.line_end()
    )
}

fn find_delimiter(haystack: &[u8]) -> Option<usize> {
    haystack
        .windows(DELIMITER.len())
        .position(|window| window == DELIMITER)
}
