//! CGI request handling: from `QUERY_STRING` to a complete response on
//! stdout.
//!
//! ```text
//! QUERY_STRING ──validate──▶ Selector ──discover──▶ Feed ──render──▶ stdout
//!                  │
//!                  └─ invalid: "Status: 400" and a one-line reason
//! ```
//!
//! The content-type header is written before any body bytes. HTML pages use
//! the configured `ct_html`; the RSS feed always uses
//! [`RSS_CONTENT_TYPE`].

use crate::config::Config;
use crate::discover::{DiscoverOptions, discover};
use crate::exclude::ExclusionFilter;
use crate::render::{MAIN_TEMPLATE, RSS_TEMPLATE, Registry, Renderer, Table};
use crate::request::{OutputMode, RequestError, Selector, validate};
use crate::text::{escape_html, rfc822};
use chrono::Utc;
use std::env;
use std::io::{self, Write};
use tracing::{debug, warn};

pub const RSS_CONTENT_TYPE: &str = "application/rss+xml; charset=utf-8";

/// Content type for the error page when no configuration could be loaded.
pub const FALLBACK_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// The parts of the CGI environment nlist reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CgiRequest {
    pub query: Option<String>,
    pub remote_addr: Option<String>,
}

impl CgiRequest {
    pub fn from_env() -> Self {
        Self {
            query: env::var("QUERY_STRING").ok(),
            remote_addr: env::var("REMOTE_ADDR").ok(),
        }
    }

    pub fn with_query(query: &str) -> Self {
        Self {
            query: Some(query.to_string()),
            remote_addr: None,
        }
    }
}

/// What was sent back, for the request log line.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Served { mode: OutputMode, articles: usize },
    Rejected(RequestError),
    Failed,
}

/// Content type announced for `mode`.
pub fn content_type(config: &Config, mode: OutputMode) -> &str {
    match mode {
        OutputMode::Html => &config.ct_html,
        OutputMode::Rss => RSS_CONTENT_TYPE,
    }
}

/// Serve one request: validate, discover, write headers, render.
pub fn respond<W: Write + ?Sized>(
    config: &Config,
    request: &CgiRequest,
    out: &mut W,
) -> io::Result<Outcome> {
    if let Some(query) = request.query.as_deref()
        && let Err(err) = validate(query)
    {
        warn!(query, error = %err, "Rejected query");
        reject(out, &err)?;
        return Ok(Outcome::Rejected(err));
    }

    let selector = Selector::parse(request.query.as_deref());
    debug!(?selector, "Parsed request");

    let options = DiscoverOptions {
        max_count: config.max_entries,
        max_depth: config.max_depth,
    };
    let exclusions = ExclusionFilter::new(&config.excludefile);
    let feed = discover(&config.datadir, &selector, &exclusions, options);

    write_header(out, content_type(config, selector.mode))?;

    let registry = Registry::standard(&config.htmldir);
    let renderer = Renderer::new(&registry, &feed, &config.baseurl, &config.ct_html);
    let (template, table) = match selector.mode {
        OutputMode::Html => (config.htmldir.join(MAIN_TEMPLATE), Table::Front),
        OutputMode::Rss => (config.htmldir.join(RSS_TEMPLATE), Table::Rss),
    };
    renderer.render(out, &template, table, None)?;

    Ok(Outcome::Served {
        mode: selector.mode,
        articles: feed.len(),
    })
}

pub fn write_header<W: Write + ?Sized>(out: &mut W, content_type: &str) -> io::Result<()> {
    write!(out, "Content-Type: {content_type}\r\n\r\n")
}

/// Client error response for a malformed query.
pub fn reject<W: Write + ?Sized>(out: &mut W, err: &RequestError) -> io::Result<()> {
    write!(out, "Status: 400\r\n\r\n{err}\n")
}

/// Complete error page for failures that stop the request before any
/// output was produced.
pub fn render_error<W: Write + ?Sized>(
    out: &mut W,
    content_type: &str,
    message: &str,
) -> io::Result<()> {
    write_header(out, content_type)?;
    writeln!(out, "<html><head><title>Error</title></head><body>")?;
    writeln!(out, "<h2>Error</h2><p><b>{}</b><p>", escape_html(message))?;
    writeln!(out, "Time: <b>{}</b><br>", rfc822(&Utc::now()))?;
    writeln!(out, "</body></html>")
}
