use anyhow::{Context, Result};
use book_finder::config::{default_config_path, find_config_file, load_config, Config};
use book_finder::lookup::{HttpLookupService, LookupService};
use book_finder::search::{SearchOptions, SearchOrchestrator, SearchState};
use book_finder::ui::{self, ResultRow, Spinner, Status, Tone, ViewModel};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Input used by the `test-search` command
const TEST_SEARCH_INPUT: &str = "Republic – Plato";

/// Book Finder - find download links for a list of books
#[derive(Parser, Debug)]
#[command(name = "book-finder")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Find download links for a batch of \"Title – Author\" books", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v for debug, -vv for trace)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Lookup service base URL (overrides configuration)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Give up on a search after this many seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

impl OutputFormat {
    fn resolve(self) -> Self {
        match self {
            OutputFormat::Auto if std::io::stdout().is_terminal() => OutputFormat::Table,
            OutputFormat::Auto => OutputFormat::Json,
            other => other,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Look up a batch of books, one "Title – Author" per line
    #[command(alias = "s")]
    Search {
        /// Read the book list from a file
        #[arg(long, short, conflicts_with = "entries")]
        file: Option<PathBuf>,

        /// Book entries, one per argument; read from stdin when omitted
        entries: Vec<String>,
    },

    /// Run a search for a single well-known book
    TestSearch,

    /// Check that the lookup service is up
    Health,

    /// Write the default configuration to a file
    InitConfig {
        /// Destination (default: the per-user config path)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show recognised environment variables
    Env,
}

/// Print all recognised environment variables
fn print_env_vars() {
    println!("Book Finder - Environment Variables");
    println!();
    println!("Service:");
    println!("  BOOK_FINDER_SERVICE__BASE_URL      Lookup service base URL (default: http://localhost:5000)");
    println!("  BOOK_FINDER_SERVICE__SEARCH_PATH   Search endpoint path (default: /search)");
    println!("  BOOK_FINDER_SERVICE__HEALTH_PATH   Health endpoint path (default: /health)");
    println!();
    println!("HTTP:");
    println!("  BOOK_FINDER_HTTP__TIMEOUT_SECONDS          Search timeout (default: none)");
    println!("  BOOK_FINDER_HTTP__CONNECT_TIMEOUT_SECONDS  Connect timeout (default: 10)");
    println!("  BOOK_FINDER_HTTP__USER_AGENT               User-Agent header");
    println!();
    println!("Logging:");
    println!("  BOOK_FINDER_LOGGING__LEVEL    Log level (default: info)");
    println!("  BOOK_FINDER_LOGGING__FORMAT   Set to \"json\" for structured logs");
    println!("  RUST_LOG                      Overrides the log filter entirely");
    println!();
    println!("Example:");
    println!("  export BOOK_FINDER_SERVICE__BASE_URL=\"http://books.internal:5000\"");
}

fn init_tracing(cli: &Cli, config: &Config) {
    let level = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let level = if cli.quiet { "error" } else { level };

    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("book_finder={}", level)),
    );

    // Logs go to stderr so JSON results on stdout stay parseable
    let (json, text) = if config.logging.is_json() {
        let layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr);
        (Some(layer), None)
    } else {
        let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
        (None, Some(layer))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(text)
        .init();
}

/// Load configuration and apply command line overrides
fn resolve_config(cli: &Cli) -> Result<(Config, Option<PathBuf>)> {
    let path = cli.config.clone().or_else(find_config_file);
    let mut config = load_config(path.as_deref())?;

    if let Some(base_url) = &cli.base_url {
        config.service.base_url = base_url.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.http.timeout_seconds = Some(timeout);
    }
    config.validate()?;

    Ok((config, path))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if matches!(cli.command, Commands::Env) {
        print_env_vars();
        return Ok(ExitCode::SUCCESS);
    }

    let (config, config_path) = resolve_config(&cli)?;
    init_tracing(&cli, &config);
    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    match &cli.command {
        Commands::Search { file, entries } => {
            let raw = read_input(file.as_ref(), entries)?;
            run_search(&cli, &config, &raw).await
        }
        Commands::TestSearch => run_search(&cli, &config, TEST_SEARCH_INPUT).await,
        Commands::Health => check_health(&cli, &config).await,
        Commands::InitConfig { path, force } => {
            init_config(&Config::default(), path.clone(), *force)
        }
        Commands::Env => Ok(ExitCode::SUCCESS),
    }
}

/// Collect the raw book list from a file, the arguments, or stdin
fn read_input(file: Option<&PathBuf>, entries: &[String]) -> Result<String> {
    if let Some(path) = file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()));
    }

    if !entries.is_empty() {
        return Ok(entries.join("\n"));
    }

    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .context("Failed to read book list from stdin")?;
    Ok(raw)
}

async fn run_search(cli: &Cli, config: &Config, raw: &str) -> Result<ExitCode> {
    let service = Arc::new(HttpLookupService::new(config)?);
    tracing::debug!("Search endpoint: {}", service.search_url());
    let mut orchestrator =
        SearchOrchestrator::new(service).with_options(SearchOptions::from_config(&config.http));

    let format = cli.output.resolve();
    let show_spinner = !cli.quiet && format == OutputFormat::Table && ui::is_terminal();
    let spinner_task = show_spinner.then(|| tokio::spawn(follow_loading(orchestrator.subscribe())));

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let state = orchestrator.search_with_cancel(raw, &cancel).await;
    if let Some(task) = spinner_task {
        let _ = task.await;
    }

    if let Some(elapsed) = orchestrator.last_duration() {
        tracing::debug!("Lookup took {:.2}s", elapsed.as_secs_f64());
    }

    output_view(&ui::render(&state), format, cli.quiet)?;

    Ok(match state {
        SearchState::Error(_) => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}

/// Show a spinner for as long as the search is loading
async fn follow_loading(mut states: watch::Receiver<SearchState>) {
    let mut spinner: Option<Spinner> = None;
    loop {
        let state = states.borrow_and_update().clone();
        if state.is_loading() && spinner.is_none() {
            spinner = Some(Spinner::new("Searching for books..."));
        }
        if state.is_settled() || states.changed().await.is_err() {
            break;
        }
    }
    if let Some(spinner) = spinner {
        spinner.finish();
    }
}

fn output_view(view: &ViewModel, format: OutputFormat, quiet: bool) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(view)?);
        return Ok(());
    }

    match view {
        ViewModel::Error { message } => {
            eprintln!("{}", ui::status_line(Status::Error, message));
        }
        ViewModel::Empty => {
            if !quiet {
                println!(
                    "{}",
                    ui::status_line(Status::Warning, "No download links found for these books")
                );
            }
        }
        ViewModel::Results { books, rows } => {
            if !quiet {
                println!(
                    "{}",
                    ui::status_line(
                        Status::Success,
                        &format!("Found {} links for {} books", rows.len(), books)
                    )
                );
            }
            if format == OutputFormat::Plain {
                print!("{}", plain_rows(rows));
            } else {
                println!("{}", results_table(rows));
            }
        }
        ViewModel::Idle | ViewModel::Loading => {}
    }
    Ok(())
}

fn tone_color(tone: Tone) -> comfy_table::Color {
    match tone {
        Tone::Primary => comfy_table::Color::Blue,
        Tone::Success => comfy_table::Color::Green,
        Tone::Warning => comfy_table::Color::Yellow,
        Tone::Info => comfy_table::Color::Cyan,
        Tone::Secondary => comfy_table::Color::Grey,
    }
}

/// Results table; title and author appear once per book
fn results_table(rows: &[ResultRow]) -> comfy_table::Table {
    use comfy_table::{Attribute, Cell, Table};

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Title", "Author", "Source", "Download"]);

    for row in rows {
        let (title, author) = if row.starts_group() {
            (
                ui::truncate_with_ellipsis(&row.title, 50),
                ui::truncate_with_ellipsis(&row.author, 30),
            )
        } else {
            (String::new(), String::new())
        };

        table.add_row(vec![
            Cell::new(title).add_attribute(Attribute::Bold),
            Cell::new(author),
            Cell::new(&row.badge.label).fg(tone_color(row.badge.tone)),
            Cell::new(&row.link),
        ]);
    }
    table
}

fn plain_rows(rows: &[ResultRow]) -> String {
    let mut out = String::new();
    for row in rows {
        if row.starts_group() {
            out.push_str(&format!("{} – {}\n", row.title, row.author));
        }
        out.push_str(&format!("  {}: {}\n", row.badge.label, row.link));
    }
    out
}

async fn check_health(cli: &Cli, config: &Config) -> Result<ExitCode> {
    let service = HttpLookupService::new(config)?;
    match service.health().await {
        Ok(status) if status.is_healthy() => {
            if !cli.quiet {
                println!(
                    "{}",
                    ui::status_line(
                        Status::Success,
                        &format!("{} is {}", config.service.base_url, status.status)
                    )
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Ok(status) => {
            eprintln!(
                "{}",
                ui::status_line(
                    Status::Warning,
                    &format!("{} reported {}", config.service.base_url, status.status)
                )
            );
            Ok(ExitCode::FAILURE)
        }
        Err(e) => {
            eprintln!("{}", ui::status_line(Status::Error, &e.to_string()));
            Ok(ExitCode::FAILURE)
        }
    }
}

fn init_config(config: &Config, path: Option<PathBuf>, force: bool) -> Result<ExitCode> {
    let path = match path.or_else(default_config_path) {
        Some(path) => path,
        None => PathBuf::from(book_finder::config::LOCAL_CONFIG_FILE),
    };

    if path.exists() && !force {
        eprintln!(
            "{}",
            ui::status_line(
                Status::Error,
                &format!("{} already exists (use --force to overwrite)", path.display())
            )
        );
        return Ok(ExitCode::FAILURE);
    }

    config.save(&path)?;
    println!(
        "{}",
        ui::status_line(Status::Success, &format!("Wrote {}", path.display()))
    );
    Ok(ExitCode::SUCCESS)
}
