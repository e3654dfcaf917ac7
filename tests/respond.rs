//! End-to-end requests against a site laid out on disk: config file,
//! templates, exclusion list and article tree.

use nlist::cgi::{CgiRequest, Outcome, respond};
use nlist::config::{Config, load_config};
use nlist::request::OutputMode;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Lay out a site under `root` and load its config the way the binary does.
fn site(root: &Path) -> Config {
    write(root, "html/main.html", "%%HEADER%%%%STORY%%%%FOOTER%%");
    write(root, "html/header.html", "<html><body>\n");
    write(root, "html/footer.html", "</body></html>\n");
    write(
        root,
        "html/story.html",
        "<h2><a href=\"%%LINK%%\">%%TITLE%%</a></h2>\n%%BODY%%",
    );
    write(root, "html/summary.rss", "<channel>\n%%ITEMS%%</channel>\n");
    write(
        root,
        "html/summary_item.rss",
        "<item><title>%%TITLE%%</title><link>%%LINK%%</link></item>\n",
    );
    write(root, "exclude", "draft\n");

    let config_path = root.join("nlist.conf");
    fs::write(
        &config_path,
        format!(
            r#"datadir = "{root}/data"
htmldir = "{root}/html"
excludefile = "{root}/exclude"
baseurl = "https://example.org"
ct_html = "text/html; charset=utf-8"
max_entries = 10
"#,
            root = root.display()
        ),
    )
    .unwrap();
    load_config(&config_path).unwrap()
}

fn serve(config: &Config, query: Option<&str>) -> (Outcome, String) {
    let request = match query {
        Some(q) => CgiRequest::with_query(q),
        None => CgiRequest::default(),
    };
    let mut out = Vec::new();
    let outcome = respond(config, &request, &mut out).unwrap();
    (outcome, String::from_utf8(out).unwrap())
}

#[test]
fn front_page_lists_root_articles_newest_name_first() {
    let tmp = TempDir::new().unwrap();
    let config = site(tmp.path());
    write(tmp.path(), "data/a.txt", "First\nalpha body\n");
    write(tmp.path(), "data/b.txt", "Second\nbeta body\n");

    let (outcome, body) = serve(&config, None);
    assert_eq!(
        outcome,
        Outcome::Served {
            mode: OutputMode::Html,
            articles: 2
        }
    );
    assert_eq!(
        body,
        "Content-Type: text/html; charset=utf-8\r\n\r\n\
         <html><body>\n\
         <h2><a href=\"https://example.org/b.html\">Second</a></h2>\n\
         beta body\n\
         <h2><a href=\"https://example.org/a.html\">First</a></h2>\n\
         alpha body\n\
         </body></html>\n"
    );
}

#[test]
fn section_request_serves_its_index() {
    let tmp = TempDir::new().unwrap();
    let config = site(tmp.path());
    write(tmp.path(), "data/top.txt", "Top\n");
    write(tmp.path(), "data/news/index.txt", "Front\nnews body\n");
    write(tmp.path(), "data/news/other.txt", "Other\n");

    let (outcome, body) = serve(&config, Some("/news/"));
    assert_eq!(
        outcome,
        Outcome::Served {
            mode: OutputMode::Html,
            articles: 1
        }
    );
    assert!(body.contains(">Front</a>"));
    assert!(body.contains("news body\n"));
    assert!(!body.contains("Top"));
    assert!(!body.contains("Other"));
}

#[test]
fn rss_feed_uses_rss_templates_and_content_type() {
    let tmp = TempDir::new().unwrap();
    let config = site(tmp.path());
    write(tmp.path(), "data/a.txt", "Fish & Chips\n");
    write(tmp.path(), "data/news/index.txt", "Nested\n");

    let (outcome, body) = serve(&config, Some("/rss"));
    assert_eq!(
        outcome,
        Outcome::Served {
            mode: OutputMode::Rss,
            articles: 1
        }
    );
    assert_eq!(
        body,
        "Content-Type: application/rss+xml; charset=utf-8\r\n\r\n\
         <channel>\n\
         <item><title>Fish &amp; Chips</title><link>https://example.org/a.html</link></item>\n\
         </channel>\n"
    );
}

#[test]
fn excluded_article_is_hidden_from_listing_but_served_by_name() {
    let tmp = TempDir::new().unwrap();
    let config = site(tmp.path());
    write(tmp.path(), "data/public.txt", "Public\n");
    write(tmp.path(), "data/draft_plan.txt", "Plan\n");

    let (_, listing) = serve(&config, None);
    assert!(listing.contains(">Public</a>"));
    assert!(!listing.contains("Plan"));

    let (outcome, direct) = serve(&config, Some("/draft_plan.html"));
    assert_eq!(
        outcome,
        Outcome::Served {
            mode: OutputMode::Html,
            articles: 1
        }
    );
    assert!(direct.contains(">Plan</a>"));
    assert!(!direct.contains("Public"));
}

#[test]
fn max_entries_caps_the_listing() {
    let tmp = TempDir::new().unwrap();
    let mut config = site(tmp.path());
    config.max_entries = 2;
    for name in ["a", "b", "c", "d"] {
        write(tmp.path(), &format!("data/{name}.txt"), &format!("Title {name}\n"));
    }

    let (outcome, body) = serve(&config, None);
    assert_eq!(
        outcome,
        Outcome::Served {
            mode: OutputMode::Html,
            articles: 2
        }
    );
    assert!(body.contains("Title d"));
    assert!(body.contains("Title c"));
    assert!(!body.contains("Title b"));
}

#[test]
fn malformed_query_gets_400_and_no_page() {
    let tmp = TempDir::new().unwrap();
    let config = site(tmp.path());
    write(tmp.path(), "data/a.txt", "First\n");

    for query in ["/a.b.html", "/news?x=1", "/a&amp;b"] {
        let (outcome, body) = serve(&config, Some(query));
        assert!(matches!(outcome, Outcome::Rejected(_)), "{query}");
        assert!(body.starts_with("Status: 400\r\n\r\n"), "{query}");
        assert!(!body.contains("<html>"), "{query}");
    }
}
