//! medinstruct - find medication instructions in OCR text
//!
//! Matches typed queries or previously extracted label text against a
//! local drug catalog and prints the instructions of the best candidates.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use medinstruct_cli::output::{self, Status};
use medinstruct_cli::progress;
use medinstruct_core::catalog::CatalogStore;
use medinstruct_core::config::{Config, MAX_RESULTS_LIMIT};
use medinstruct_core::error::{exit_codes, Error, ErrorCode};
use medinstruct_core::source::{InlineText, StdinText, TextFile, TextSource};
use medinstruct_core::validation::Validator;
use medinstruct_search::{MatchOptions, MatchResult, Matcher};
use medinstruct_telemetry::{LogFormat, TelemetryConfig, Timer};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Message shown when a search has no text
const EMPTY_QUERY: &str = "Please enter a medicine name to search";

#[derive(Parser)]
#[command(name = "medinstruct")]
#[command(about = "Find medication instructions in OCR text")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to .medinstruct.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Catalog file
    #[arg(long, global = true, env = "MEDINSTRUCT_CATALOG")]
    catalog: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Machine-readable JSON output
    #[arg(long, global = true)]
    json: bool,

    /// Minimum score for a result (0.0 - 1.0)
    #[arg(long, global = true, conflicts_with = "strict")]
    cutoff: Option<f64>,

    /// Maximum number of results
    #[arg(long, global = true)]
    max_results: Option<usize>,

    /// Use the strict cutoff instead of the recall cutoff
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog for a typed medicine name
    Search {
        /// Text to search for
        text: Vec<String>,
    },

    /// Match previously extracted OCR text from a file, or `-` for stdin
    Scan {
        /// Text file (.txt, .text, .ocr) or `-`
        input: String,
    },

    /// Manage the drug catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List all entries
    List,

    /// Show one entry by exact name
    Show {
        /// Drug name
        name: String,
    },

    /// Add an entry
    Add {
        /// Drug name
        name: String,
        /// Usage instructions
        instructions: String,
    },

    /// Replace the name and instructions of an entry
    Update {
        /// Entry id
        id: u64,
        /// New drug name
        name: String,
        /// New usage instructions
        instructions: String,
    },

    /// Remove an entry
    Remove {
        /// Entry id
        id: u64,
    },

    /// Print the catalog as a JSON object of name to instructions
    Export,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Check the configuration for errors
    Validate,
}

/// Settings after applying command-line overrides to the configuration
struct Settings {
    options: MatchOptions,
    catalog_path: PathBuf,
    max_text_bytes: usize,
}

impl Settings {
    fn resolve(cli: &Cli, config: &Config) -> medinstruct_core::Result<Self> {
        let matching = &config.schema.matching;
        let cutoff = match (cli.cutoff, cli.strict) {
            (Some(cutoff), _) => cutoff,
            (None, true) => matching.strict_cutoff,
            (None, false) => matching.cutoff,
        };
        let max_results = cli.max_results.unwrap_or(matching.max_results);

        Validator::new()
            .range("cutoff", cutoff, 0.0, 1.0)
            .range("max-results", max_results, 1, MAX_RESULTS_LIMIT)
            .validate()
            .to_result()?;

        Ok(Self {
            options: MatchOptions::new(cutoff, max_results),
            catalog_path: cli
                .catalog
                .clone()
                .unwrap_or_else(|| PathBuf::from(&config.schema.catalog.path)),
            max_text_bytes: config.schema.input.max_text_bytes,
        })
    }
}

/// JSON shape of `search` and `scan`
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MatchReport<'a> {
    source: String,
    text: &'a str,
    cutoff: f64,
    max_results: usize,
    results: &'a [MatchResult],
}

fn main() {
    let cli = Cli::parse();

    let code = match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            report_error(&err, cli.json);
            error_exit_code(&err)
        }
    };

    std::process::exit(code);
}

fn run(cli: &Cli) -> Result<i32> {
    let config = Config::load(cli.config.as_deref())?;
    init_logging(cli, &config)?;

    match &cli.command {
        Commands::Search { text } => run_search(text, &prepare(cli, &config)?, cli.json),
        Commands::Scan { input } => run_scan(input, &prepare(cli, &config)?, cli.json),
        Commands::Catalog { action } => run_catalog(action, &prepare(cli, &config)?, cli.json),
        Commands::Config { action } => match action {
            ConfigAction::Show => run_config_show(&config),
            ConfigAction::Validate => run_config_validate(&config, cli.json),
        },
    }
}

/// Reject an invalid configuration, then apply command-line overrides
fn prepare(cli: &Cli, config: &Config) -> medinstruct_core::Result<Settings> {
    config.ensure_valid()?;
    Settings::resolve(cli, config)
}

fn init_logging(cli: &Cli, config: &Config) -> Result<()> {
    let logging = &config.schema.logging;
    let level = if cli.verbose { "debug" } else { logging.level.as_str() };
    let (format, format_error) = match logging.format.parse::<LogFormat>() {
        Ok(format) => (format, None),
        Err(e) => (LogFormat::default(), Some(e)),
    };

    medinstruct_telemetry::init_with_config(TelemetryConfig::new(level, format))
        .map_err(|e| Error::config(e.to_string()))?;
    if let Some(e) = format_error {
        warn!("{}; using compact logs", e);
    }
    debug!(session_id = %medinstruct_telemetry::session_id(), config = ?config.path, "starting");
    Ok(())
}

fn run_search(text: &[String], settings: &Settings, json: bool) -> Result<i32> {
    let query = text.join(" ");
    if query.trim().is_empty() {
        return Err(Error::invalid_input(EMPTY_QUERY).into());
    }

    run_match(&InlineText(query.trim().to_string()), settings, json)
}

fn run_scan(input: &str, settings: &Settings, json: bool) -> Result<i32> {
    if input == "-" {
        run_match(&StdinText::new(settings.max_text_bytes), settings, json)
    } else {
        let source = TextFile::new(input).with_limit(settings.max_text_bytes);
        run_match(&source, settings, json)
    }
}

fn run_match(source: &dyn TextSource, settings: &Settings, json: bool) -> Result<i32> {
    let text = source.extract_text()?;
    debug!(source = %source.describe(), chars = text.chars().count(), "text extracted");

    let store = CatalogStore::open(&settings.catalog_path)?;
    if store.is_empty() && !json {
        Status::warning(&format!(
            "Catalog {} is empty; add entries with `medinstruct catalog add`",
            settings.catalog_path.display()
        ));
    }
    let entries = store.len();
    let matcher = Matcher::new(store);

    let spinner = if json {
        progress::hidden()
    } else {
        progress::spinner("Matching...")
    };
    let timer = Timer::start("match");
    let results = matcher.match_with(&text, &settings.options);
    let elapsed = timer.stop();
    progress::finish(&spinner);

    if json {
        let report = MatchReport {
            source: source.describe(),
            text: &text,
            cutoff: settings.options.cutoff,
            max_results: settings.options.max_results,
            results: &results,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(exit_codes::SUCCESS);
    }

    if results.is_empty() {
        Status::info("No matching medicine found");
    } else {
        output::print_matches(&format!("Results for {}", source.describe()), &results);
    }
    println!(
        "{}",
        format!(
            "Checked {} in {}",
            output::format_count(entries, "entry", "entries"),
            output::format_duration(elapsed)
        )
        .dimmed()
    );

    Ok(exit_codes::SUCCESS)
}

fn run_catalog(action: &CatalogAction, settings: &Settings, json: bool) -> Result<i32> {
    let mut store = CatalogStore::open(&settings.catalog_path)?;

    match action {
        CatalogAction::List => {
            let records = store.list();
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else if records.is_empty() {
                Status::info("Catalog is empty");
            } else {
                Status::header(&format!(
                    "Catalog ({})",
                    output::format_count(records.len(), "entry", "entries")
                ));
                for record in records {
                    println!(
                        "{:>4}  {}  {}",
                        record.id.dimmed(),
                        record.name.bold(),
                        output::truncate(&record.instructions.replace('\n', " "), 60)
                    );
                }
            }
        }
        CatalogAction::Show { name } => {
            let Some(record) = store.find(name) else {
                let mut err = Error::new(
                    ErrorCode::CatalogEntryNotFound,
                    format!("No catalog entry named '{}'", name),
                );
                if let Some(suggestion) = store.suggest(name) {
                    err = err.with_suggestion(format!("Did you mean '{}'?", suggestion));
                }
                return Err(err.into());
            };

            if json {
                println!("{}", serde_json::to_string_pretty(record)?);
            } else {
                Status::header(&record.name);
                println!("{}", record.instructions);
                println!();
                println!(
                    "{}",
                    format!("id {} · added {}", record.id, record.created_at.format("%Y-%m-%d"))
                        .dimmed()
                );
            }
        }
        CatalogAction::Add { name, instructions } => {
            let record = store
                .add(name, instructions)
                .map_err(|e| e.with_context(format!("While adding {}", name.trim())))?;
            store.save()?;
            Status::success(&format!("Successfully added {} (id {})", record.name, record.id));
        }
        CatalogAction::Update {
            id,
            name,
            instructions,
        } => {
            let record = store.update(*id, name, instructions)?;
            store.save()?;
            Status::success(&format!("Successfully updated {} (id {})", record.name, record.id));
        }
        CatalogAction::Remove { id } => {
            let record = store.remove(*id)?;
            store.save()?;
            Status::success(&format!("Removed {} (id {})", record.name, record.id));
        }
        CatalogAction::Export => {
            println!("{}", serde_json::to_string_pretty(&store.export_map())?);
        }
    }

    Ok(exit_codes::SUCCESS)
}

fn run_config_show(config: &Config) -> Result<i32> {
    if let Some(path) = &config.path {
        println!("{}", format!("# {}", path.display()).dimmed());
    }
    print!("{}", config.to_toml_string()?);
    Ok(exit_codes::SUCCESS)
}

fn run_config_validate(config: &Config, json: bool) -> Result<i32> {
    let result = config.validate();

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for warning in result.warnings() {
            Status::warning(&warning.to_string());
        }
        for error in result.errors() {
            Status::error(&error.to_string());
        }
        if result.is_valid() {
            let source = config
                .path
                .as_ref()
                .map_or_else(|| "defaults".to_string(), |p| p.display().to_string());
            Status::success(&format!("Configuration is valid ({})", source));
        }
    }

    Ok(if result.is_valid() {
        exit_codes::SUCCESS
    } else {
        exit_codes::CONFIG_ERROR
    })
}

fn error_exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<Error>()
        .map_or(exit_codes::FAILURE, Error::exit_code)
}

fn report_error(err: &anyhow::Error, json: bool) {
    let Some(error) = err.downcast_ref::<Error>() else {
        Status::error(&format!("{:#}", err));
        return;
    };

    if json {
        let report = serde_json::to_string_pretty(&error.to_report())
            .context("Failed to serialize error report");
        match report {
            Ok(report) => eprintln!("{}", report),
            Err(e) => Status::error(&format!("{:#}", e)),
        }
        return;
    }

    Status::error(&error.message);
    if let Some(context) = &error.context {
        eprintln!("  {}", context.dimmed());
    }
    if let Some(suggestion) = &error.suggestion {
        eprintln!("  {} {}", "hint:".cyan(), suggestion);
    }
}
