use clap::{Parser, Subcommand};
use nlist::cgi::{self, CgiRequest, Outcome};
use nlist::config;
use nlist::discover::{DiscoverOptions, discover};
use nlist::exclude::ExclusionFilter;
use nlist::render::TEMPLATE_FILES;
use nlist::request::{Selector, validate};
use nlist::{logging, output};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "nlist")]
#[command(about = "CGI lister for directories of plain-text articles")]
#[command(long_about = "\
CGI lister for directories of plain-text articles

Run without a command from a web server: the request is read from
QUERY_STRING and the response is written to stdout.

Data layout:

  data/
  ├── 2024_05_01_launch.txt        # First line is the title
  ├── 2024_04_12_notes.txt         # Listed newest first by file name
  └── news/
      ├── index.txt                # Shown for /news/
      └── 2024_03_02_update.txt    # Shown for /news/2024_03_02_update.html

Requests:

  (none)                  front page, newest articles from data/
  /news/                  news/index.txt
  /news/update.html       news/update.txt
  /rss                    RSS feed of the front page

Run 'nlist gen-config' to print a documented configuration file.")]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Answer one request from the CGI environment (default)
    Cgi,
    /// List the articles a request would select
    Scan {
        /// Request path, as it would appear in QUERY_STRING
        #[arg(long)]
        query: Option<String>,
        /// Print the feed as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate the configuration, data directory and templates
    Check,
    /// Print a stock configuration with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Cgi) {
        Command::Cgi => run_cgi(&cli.config)?,
        Command::Scan { query, json } => {
            let config = config::load_config(&cli.config)?;
            logging::init(None);
            if let Some(query) = query.as_deref() {
                validate(query)?;
            }
            let selector = Selector::parse(query.as_deref());
            let feed = discover(
                &config.datadir,
                &selector,
                &ExclusionFilter::new(&config.excludefile),
                DiscoverOptions {
                    max_count: config.max_entries,
                    max_depth: config.max_depth,
                },
            );
            if json {
                println!("{}", serde_json::to_string_pretty(&feed)?);
            } else {
                output::print_feed(&feed, &selector, &config.datadir);
            }
        }
        Command::Check => {
            let config = config::load_config(&cli.config)?;
            println!("==> Checking {}", cli.config.display());
            let mut results = vec![
                (
                    format!("datadir {}", config.datadir.display()),
                    config.datadir.is_dir(),
                ),
                (
                    format!("excludefile {}", config.excludefile.display()),
                    config.excludefile.is_file(),
                ),
            ];
            for name in TEMPLATE_FILES {
                let path = config.htmldir.join(name);
                results.push((format!("template {}", path.display()), path.is_file()));
            }
            output::print_check(&results);
            let failed = output::failed_checks(&results);
            if !failed.is_empty() {
                return Err(format!("{} of {} checks failed", failed.len(), results.len()).into());
            }
            println!("==> Configuration is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// One CGI request. Configuration problems become an error page; only
/// failures writing to stdout are returned.
fn run_cgi(config_path: &std::path::Path) -> io::Result<()> {
    let started = Instant::now();
    let request = CgiRequest::from_env();
    let loaded = config::load_config(config_path);
    logging::init(loaded.as_ref().ok().and_then(|c| c.logfile.as_deref()));

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let outcome = match &loaded {
        Ok(config) => cgi::respond(config, &request, &mut out)?,
        Err(err) => {
            error!(config = %config_path.display(), error = %err, "Cannot load configuration");
            cgi::render_error(
                &mut out,
                cgi::FALLBACK_CONTENT_TYPE,
                &format!("load_conf: file '{}': {err}", config_path.display()),
            )?;
            Outcome::Failed
        }
    };
    out.flush()?;

    info!(
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        query = request.query.as_deref().unwrap_or(""),
        remote_addr = request.remote_addr.as_deref().unwrap_or("-"),
        ?outcome,
        "Request finished"
    );
    Ok(())
}
