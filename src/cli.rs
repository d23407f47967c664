//! CLI parsing and orchestration. Parses args, resolves the API key, runs one scrape or
//! search, and renders the result. Maps errors to exit codes.

use crate::api::{ApiError, FirecrawlClient};
use crate::config::{self, Config};
use crate::credentials;
use crate::model::ContentFormat;
use crate::render;
use clap::{ArgAction, ArgGroup, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use std::ffi::OsString;
use std::io::{self, Write};
use std::time::Duration;
use thiserror::Error;

/// Suffixes of script files that may show up in argv when the tool is launched through a wrapper.
const SCRIPT_SUFFIXES: &[&str] = &[".py"];
/// Options that consume the following token as their value.
const VALUE_OPTIONS: &[&str] = &["--url", "--search", "--format", "--limit"];

/// CLI error carrying exit code and message.
#[derive(Debug, Error)]
pub enum CliRunError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Config(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl CliRunError {
    /// Every runtime failure exits 1. Usage errors never get here; clap exits 2 for those.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliRunError::InvalidInput(_)
            | CliRunError::Config(_)
            | CliRunError::Api(_)
            | CliRunError::Output(_) => 1,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "firescrape", version)]
#[command(about = "Scrape a URL or search the web via the Firecrawl API")]
#[command(group(ArgGroup::new("mode").required(true).args(["url", "search"])))]
#[command(
    after_help = "Requires FIRECRAWL_API_KEY in the environment or in ~/.claude/.env. Optional config file keys (api_url, user_agent) live in ./firescrape.toml or <config dir>/firescrape/config.toml."
)]
pub struct Args {
    /// URL to scrape.
    #[arg(long, value_parser = parse_non_empty)]
    pub url: Option<String>,

    /// Search query.
    #[arg(long, value_name = "QUERY", value_parser = parse_non_empty)]
    pub search: Option<String>,

    /// Output format for scraping: markdown, html, or text.
    #[arg(long, default_value = "markdown", value_parser = parse_format)]
    pub format: ContentFormat,

    /// Max results for search.
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
    pub limit: u32,

    /// Only extract main content (default: true). Pass --main-only=false for the full page.
    #[arg(
        long,
        default_value_t = true,
        num_args = 0..=1,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub main_only: bool,

    /// Suppress progress output (errors only).
    #[arg(short, long)]
    pub quiet: bool,

    /// Debug logging and verbose error chain.
    #[arg(long)]
    pub verbose: bool,
}

/// What one invocation does. Built once from [Args] and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Scrape {
        url: String,
        format: ContentFormat,
        main_only: bool,
    },
    Search {
        query: String,
        limit: u32,
    },
}

impl Args {
    pub fn mode(&self) -> Result<Mode, CliRunError> {
        match (&self.url, &self.search) {
            (Some(url), None) => Ok(Mode::Scrape {
                url: url.clone(),
                format: self.format,
                main_only: self.main_only,
            }),
            (None, Some(query)) => Ok(Mode::Search {
                query: query.clone(),
                limit: self.limit,
            }),
            _ => Err(CliRunError::InvalidInput(
                "Exactly one of --url or --search is required.".to_string(),
            )),
        }
    }
}

fn parse_non_empty(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("value must not be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

fn parse_format(s: &str) -> Result<ContentFormat, String> {
    match s.to_lowercase().as_str() {
        "markdown" => Ok(ContentFormat::Markdown),
        "html" => Ok(ContentFormat::Html),
        "text" => Ok(ContentFormat::Text),
        _ => Err(format!(
            "Invalid --format value: '{}'. Use markdown, html, or text.",
            s
        )),
    }
}

/// Drop stray script paths (e.g. `firecrawl_scrape.py`) from argv before parsing.
///
/// The program name is always kept. A token is only dropped when it is a bare positional;
/// option names, `--opt=value` forms and values following a value-taking option are kept.
pub fn strip_script_args<I>(argv: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut iter = argv.into_iter();
    let mut kept: Vec<OsString> = iter.next().into_iter().collect();
    let mut expects_value = false;
    for arg in iter {
        let text = arg.to_string_lossy();
        let is_option = text.starts_with('-');
        let is_script = SCRIPT_SUFFIXES.iter().any(|s| text.ends_with(s));
        let drop = !expects_value && !is_option && is_script;
        let next_expects_value = is_option && VALUE_OPTIONS.contains(&&*text);
        if !drop {
            kept.push(arg.clone());
        }
        expects_value = next_expects_value;
    }
    kept
}

fn build_client(api_key: String, config: &Config) -> Result<FirecrawlClient, CliRunError> {
    let mut builder = FirecrawlClient::builder().api_key(api_key);
    if let Some(url) = &config.api_url {
        builder = builder.base_url(url.clone());
    }
    if let Some(ua) = &config.user_agent {
        builder = builder.user_agent(ua.clone());
    }
    Ok(builder.build()?)
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg} ({elapsed})") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Run `call` behind a spinner on stderr unless quiet. The spinner is cleared before returning.
fn with_spinner<T>(quiet: bool, message: &str, call: impl FnOnce() -> T) -> T {
    if quiet {
        return call();
    }
    let pb = spinner(message);
    let result = call();
    pb.finish_and_clear();
    result
}

/// Perform the request for `mode` and render the result to `out`.
///
/// Nothing is written to `out` unless the request succeeded.
pub fn execute<W: Write>(
    mode: &Mode,
    client: &FirecrawlClient,
    out: &mut W,
    quiet: bool,
) -> Result<(), CliRunError> {
    match mode {
        Mode::Scrape {
            url,
            format,
            main_only,
        } => {
            if !quiet {
                eprintln!("Scraping: {}", url);
            }
            let result = with_spinner(quiet, "Waiting for Firecrawl", || {
                client.scrape(url, &[*format], *main_only)
            })?;
            if !quiet {
                eprintln!("✓ Scrape complete\n");
            }
            tracing::debug!(
                "Scrape returned {} markdown bytes, {} html bytes, {} links",
                result.markdown.len(),
                result.html.len(),
                result.links.len()
            );
            render::write_scrape(out, &result, *format)?;
        }
        Mode::Search { query, limit } => {
            if !quiet {
                eprintln!("Searching: {}", query);
            }
            let result = with_spinner(quiet, "Waiting for Firecrawl", || {
                client.search(query, *limit)
            })?;
            if !quiet {
                eprintln!("✓ Search complete\n");
            }
            tracing::debug!("Search returned {} results", result.results.len());
            render::write_search(out, &result)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Entry point for the CLI. Returns Ok(()) on success; Err with exit code and message on failure.
pub fn run(args: &Args) -> Result<(), CliRunError> {
    let mode = args.mode()?;
    let config = config::load_config()
        .map_err(CliRunError::Config)?
        .unwrap_or_default();
    let api_key = credentials::resolve_api_key();
    if api_key.is_empty() {
        tracing::debug!("No API key found");
    }
    let client = build_client(api_key, &config)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(&mode, &client, &mut out, args.quiet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use std::error::Error;

    fn argv(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(argv(args))
    }

    fn client_for(server: &mockito::Server, key: &str) -> Result<FirecrawlClient, ApiError> {
        FirecrawlClient::builder()
            .api_key(key)
            .base_url(server.url())
            .build()
    }

    #[test]
    fn scrape_defaults() -> Result<(), Box<dyn Error>> {
        let args = parse(&["firescrape", "--url", "https://example.com"])?;
        assert_eq!(
            args.mode()?,
            Mode::Scrape {
                url: "https://example.com".into(),
                format: ContentFormat::Markdown,
                main_only: true,
            }
        );
        Ok(())
    }

    #[test]
    fn search_defaults() -> Result<(), Box<dyn Error>> {
        let args = parse(&["firescrape", "--search", "firecrawl tutorial"])?;
        assert_eq!(
            args.mode()?,
            Mode::Search {
                query: "firecrawl tutorial".into(),
                limit: 5,
            }
        );
        Ok(())
    }

    #[test]
    fn both_modes_conflict() {
        let err = parse(&["firescrape", "--url", "https://a", "--search", "q"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn no_mode_is_usage_error() {
        let err = parse(&["firescrape", "--format", "html"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn mode_requires_exactly_one_target() {
        let mut args = Args {
            url: None,
            search: None,
            format: ContentFormat::Markdown,
            limit: 5,
            main_only: true,
            quiet: false,
            verbose: false,
        };
        assert!(matches!(args.mode(), Err(CliRunError::InvalidInput(_))));
        args.url = Some("https://a".into());
        args.search = Some("q".into());
        assert!(matches!(args.mode(), Err(CliRunError::InvalidInput(_))));
    }

    #[test]
    fn empty_values_rejected() {
        assert!(parse(&["firescrape", "--url", ""]).is_err());
        assert!(parse(&["firescrape", "--search", "  "]).is_err());
    }

    #[test]
    fn limit_must_be_positive() -> Result<(), Box<dyn Error>> {
        assert!(parse(&["firescrape", "--search", "q", "--limit", "0"]).is_err());
        assert!(parse(&["firescrape", "--search", "q", "--limit", "x"]).is_err());
        let args = parse(&["firescrape", "--search", "q", "--limit", "10"])?;
        assert_eq!(args.limit, 10);
        Ok(())
    }

    #[test]
    fn parse_format_all() {
        assert_eq!(parse_format("markdown").unwrap(), ContentFormat::Markdown);
        assert_eq!(parse_format("html").unwrap(), ContentFormat::Html);
        assert_eq!(parse_format("text").unwrap(), ContentFormat::Text);
        assert_eq!(parse_format("HTML").unwrap(), ContentFormat::Html);
        assert!(parse_format("pdf").is_err());
    }

    #[test]
    fn main_only_flag_forms() -> Result<(), Box<dyn Error>> {
        assert!(parse(&["firescrape", "--url", "https://a", "--main-only"])?.main_only);
        assert!(!parse(&["firescrape", "--url", "https://a", "--main-only=false"])?.main_only);
        assert!(parse(&["firescrape", "--main-only", "--url", "https://a"])?.main_only);
        Ok(())
    }

    #[test]
    fn strip_script_args_drops_stray_script_path() {
        let out = strip_script_args(argv(&[
            "firescrape",
            "scripts/firecrawl_scrape.py",
            "--search",
            "q",
        ]));
        assert_eq!(out, argv(&["firescrape", "--search", "q"]));
    }

    #[test]
    fn strip_script_args_keeps_option_values() {
        let input = argv(&[
            "firescrape",
            "--url",
            "https://example.com/setup.py",
            "--format=html",
        ]);
        assert_eq!(strip_script_args(input.clone()), input);
        let input = argv(&["firescrape", "--url=https://example.com/setup.py"]);
        assert_eq!(strip_script_args(input.clone()), input);
        let input = argv(&["firescrape", "--search", "run.py"]);
        assert_eq!(strip_script_args(input.clone()), input);
    }

    #[test]
    fn strip_script_args_keeps_program_name() {
        let input = argv(&["firecrawl_scrape.py", "--url", "https://a"]);
        assert_eq!(strip_script_args(input.clone()), input);
    }

    #[test]
    fn stripped_args_parse() -> Result<(), Box<dyn Error>> {
        let args = Args::try_parse_from(strip_script_args(argv(&[
            "firescrape",
            "firecrawl_scrape.py",
            "--url",
            "https://example.com",
        ])))?;
        assert_eq!(args.url.as_deref(), Some("https://example.com"));
        Ok(())
    }

    #[test]
    fn search_renders_numbered_results() -> Result<(), Box<dyn Error>> {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/v1/search")
            .with_status(200)
            .with_body(
                r#"{"success": true, "data": [{"title": "T1", "url": "https://a", "description": "d1"}]}"#,
            )
            .create();
        let client = client_for(&server, "fc-test")?;
        let mode = Mode::Search {
            query: "firecrawl tutorial".into(),
            limit: 5,
        };
        let mut out = Vec::new();
        execute(&mode, &client, &mut out, true)?;
        mock.assert();
        let text = String::from_utf8(out)?;
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(&lines[..3], ["1. T1", "   https://a", "   d1..."]);
        Ok(())
    }

    #[test]
    fn scrape_server_error_exits_one_without_output() -> Result<(), Box<dyn Error>> {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/v1/scrape")
            .with_status(500)
            .with_body("server error")
            .create();
        let client = client_for(&server, "fc-test")?;
        let mode = Mode::Scrape {
            url: "https://example.com".into(),
            format: ContentFormat::Markdown,
            main_only: true,
        };
        let mut out = Vec::new();
        let err = execute(&mode, &client, &mut out, true).unwrap_err();
        assert!(out.is_empty());
        assert_eq!(err.exit_code(), 1);
        let msg = err.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("server error"));
        Ok(())
    }

    #[test]
    fn scrape_renders_markdown_even_when_html_requested() -> Result<(), Box<dyn Error>> {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/v1/scrape")
            .with_status(200)
            .with_body(
                r##"{"success": true, "data": {"markdown": "# md", "html": "<h1>html</h1>"}}"##,
            )
            .create();
        let client = client_for(&server, "fc-test")?;
        let mode = Mode::Scrape {
            url: "https://example.com".into(),
            format: ContentFormat::Html,
            main_only: true,
        };
        let mut out = Vec::new();
        execute(&mode, &client, &mut out, true)?;
        assert_eq!(String::from_utf8(out)?, "# md\n");
        Ok(())
    }

    #[test]
    fn missing_key_fails_before_network() -> Result<(), Box<dyn Error>> {
        let mut server = mockito::Server::new();
        let mock = server.mock("POST", mockito::Matcher::Any).expect(0).create();
        let client = client_for(&server, "")?;
        let mode = Mode::Search {
            query: "q".into(),
            limit: 5,
        };
        let mut out = Vec::new();
        let err = execute(&mode, &client, &mut out, true).unwrap_err();
        mock.assert();
        assert!(matches!(err, CliRunError::Api(ApiError::MissingApiKey)));
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("FIRECRAWL_API_KEY"));
        Ok(())
    }

    #[test]
    fn build_client_applies_config() -> Result<(), Box<dyn Error>> {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/v1/search")
            .match_header("user-agent", "custom/1.0")
            .with_status(200)
            .with_body(r#"{"success": true, "data": []}"#)
            .create();
        let config = Config {
            api_url: Some(format!("{}/", server.url())),
            user_agent: Some("custom/1.0".into()),
        };
        let client = build_client("fc-test".into(), &config)?;
        let result = client.search("q", 1)?;
        mock.assert();
        assert!(result.results.is_empty());
        Ok(())
    }

    #[test]
    fn cli_run_error_exit_codes() {
        assert_eq!(CliRunError::InvalidInput("x".into()).exit_code(), 1);
        assert_eq!(CliRunError::Config("x".into()).exit_code(), 1);
        assert_eq!(CliRunError::Api(ApiError::MissingApiKey).exit_code(), 1);
        assert_eq!(
            CliRunError::Api(ApiError::Status {
                status: 500,
                body: "server error".into()
            })
            .exit_code(),
            1
        );
    }
}
