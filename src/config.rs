//! Site configuration module.
//!
//! Handles loading and validating the TOML configuration file. Every request
//! reads it once at startup; nothing is cached between requests.
//!
//! ## Config File Location
//!
//! `/etc/nlist.conf` unless `--config` names another file.
//!
//! ## Configuration Options
//!
//! ```toml
//! datadir = "/var/www/nlist/data"          # Article tree (required)
//! htmldir = "/var/www/nlist/html"          # Template directory (required)
//! excludefile = "/var/www/nlist/exclude"   # Exclusion list (required, may be absent on disk)
//! baseurl = "https://example.org"          # Printed by %%BASEURL%% (required)
//! ct_html = "text/html; charset=utf-8"     # HTML content type (required)
//! logfile = "/var/log/nlist.log"           # Optional, stderr when omitted
//! max_entries = 10                         # Articles per page
//! max_depth = 4                            # Optional traversal depth limit
//! ```
//!
//! Unknown keys are rejected to catch typos early. A missing required key
//! is reported by name.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Used when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/nlist.conf";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Settings for one nlist installation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Root of the article tree.
    pub datadir: PathBuf,
    /// Directory holding `main.html`, `story.html`, `summary.rss` and friends.
    pub htmldir: PathBuf,
    /// Newline-separated list of path substrings hidden from listings.
    pub excludefile: PathBuf,
    /// Site URL without trailing slash, printed by `%%BASEURL%%`.
    pub baseurl: String,
    /// Content type sent with HTML pages and printed by `%%CTYPE%%`.
    pub ct_html: String,
    /// Log destination; stderr when absent.
    #[serde(default)]
    pub logfile: Option<PathBuf>,
    /// Maximum number of articles listed.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    /// Deepest directory level searched below `datadir`.
    #[serde(default)]
    pub max_depth: Option<usize>,
}

fn default_max_entries() -> usize {
    10
}

impl Config {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_entries == 0 {
            return Err(ConfigError::Validation(
                "max_entries must be at least 1".into(),
            ));
        }
        if self.max_depth == Some(0) {
            return Err(ConfigError::Validation(
                "max_depth must be at least 1 when set".into(),
            ));
        }
        if self.ct_html.trim().is_empty() {
            return Err(ConfigError::Validation("ct_html must not be empty".into()));
        }
        if self.baseurl.trim().is_empty() {
            return Err(ConfigError::Validation("baseurl must not be empty".into()));
        }
        Ok(())
    }
}

/// Parse and validate configuration text.
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load config from the file at `path`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Returns a fully-commented stock config with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# nlist Configuration
# ===================
# Required keys have no default. Unknown keys will cause an error.

# Directory tree holding the articles. Each article is a .txt file whose
# first line is its title. Files directly in this directory form the front
# page; subdirectories are sections served from their index.txt.
datadir = "/var/www/nlist/data"

# Directory holding the templates:
#   main.html, header.html, footer.html, story.html   (HTML pages)
#   summary.rss, summary_item.rss                     (RSS feed)
htmldir = "/var/www/nlist/html"

# One substring per line. Articles whose path contains any of them are left
# out of listings but can still be opened directly. A missing file hides
# nothing.
excludefile = "/var/www/nlist/exclude"

# Site URL without trailing slash, printed by %%BASEURL%% and used in
# %%LINK%%.
baseurl = "https://example.org"

# Content type of HTML pages, printed by %%CTYPE%%.
ct_html = "text/html; charset=utf-8"

# Log file, opened in append mode. Logs go to stderr when omitted.
# logfile = "/var/log/nlist.log"

# Number of articles listed on a page and in the feed.
max_entries = 10

# Deepest directory level searched below datadir (1 = datadir only).
# Unlimited when omitted.
# max_depth = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MINIMAL: &str = r#"
datadir = "/srv/data"
htmldir = "/srv/html"
excludefile = "/srv/exclude"
baseurl = "https://example.org"
ct_html = "text/html"
"#;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = parse_config(MINIMAL).unwrap();
        assert_eq!(config.datadir, PathBuf::from("/srv/data"));
        assert_eq!(config.max_entries, 10);
        assert_eq!(config.max_depth, None);
        assert_eq!(config.logfile, None);
    }

    #[test]
    fn optional_keys_are_read() {
        let toml = format!("{MINIMAL}logfile = \"/var/log/nlist.log\"\nmax_entries = 3\nmax_depth = 2\n");
        let config = parse_config(&toml).unwrap();
        assert_eq!(config.logfile, Some(PathBuf::from("/var/log/nlist.log")));
        assert_eq!(config.max_entries, 3);
        assert_eq!(config.max_depth, Some(2));
    }

    #[test]
    fn missing_required_key_is_named() {
        let toml = MINIMAL.replace("baseurl = \"https://example.org\"\n", "");
        let err = parse_config(&toml).unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
        assert!(err.to_string().contains("baseurl"));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let toml = format!("{MINIMAL}colour = \"blue\"\n");
        let err = parse_config(&toml).unwrap_err();
        assert!(err.to_string().contains("colour"));
    }

    #[test]
    fn zero_max_entries_fails_validation() {
        let toml = format!("{MINIMAL}max_entries = 0\n");
        assert!(matches!(
            parse_config(&toml),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn zero_max_depth_fails_validation() {
        let toml = format!("{MINIMAL}max_depth = 0\n");
        assert!(matches!(
            parse_config(&toml),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn empty_content_type_fails_validation() {
        let toml = MINIMAL.replace("ct_html = \"text/html\"", "ct_html = \" \"");
        assert!(matches!(
            parse_config(&toml),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn stock_config_parses() {
        let config = parse_config(stock_config_toml()).unwrap();
        assert_eq!(config.max_entries, 10);
        assert_eq!(config.ct_html, "text/html; charset=utf-8");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nlist.conf");
        fs::write(&path, MINIMAL).unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.baseurl, "https://example.org");
    }

    #[test]
    fn load_config_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_config(&tmp.path().join("absent.conf"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
