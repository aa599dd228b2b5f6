// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! docsort: AI-assisted document organizer
//!
//! Classifies documents from a short text preview and moves them into
//! category folders after confirmation.

use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use docsort::classifier::{ClassificationClient, OllamaClient};
use docsort::config::{AppConfig, Provider};
use docsort::ledger::Ledger;
use docsort::organizer::{MovePlan, MoveReport, Organizer};
use docsort::pipeline::{confirm_and_execute, AnalysisStats, Pipeline, RunOutcome};
use docsort::Result;

/// docsort CLI - AI-assisted document organizer
#[derive(Parser, Debug)]
#[command(name = "docsort")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version)]
#[command(
    about = "Classify documents by content and move them into category folders",
    long_about = None
)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (JSON format)
    #[arg(short, long, default_value = "docsort.json", global = true)]
    config: PathBuf,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable trace logging (most verbose)
    #[arg(long, global = true)]
    trace: bool,

    /// Suppress non-essential output (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a directory, preview the proposed moves and apply them
    Organize {
        /// Directory to organize
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Move without asking for confirmation
        #[arg(short, long)]
        yes: bool,

        /// Where to write the analysis snapshot (overrides config)
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },

    /// Analyze a directory and write the snapshot without moving anything
    Analyze {
        /// Directory to analyze
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Where to write the analysis snapshot (overrides config)
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },

    /// Apply the moves recorded in an existing snapshot
    Apply {
        /// Directory the category folders are created under
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// Snapshot to read (overrides config)
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Move without asking for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show classifier status
    Status,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Generate default configuration file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "docsort.json")]
        output: PathBuf,
    },

    /// Validate configuration file
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Credentials may live in a .env file next to the working directory
    dotenvy::dotenv().ok();

    let filter = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let mut config = AppConfig::load(&cli.config)?;

    match cli.command {
        Some(Commands::Organize { root, yes, snapshot }) => {
            override_snapshot(&mut config, snapshot);
            run_organize(config, &root, yes).await
        }
        Some(Commands::Analyze { root, snapshot }) => {
            override_snapshot(&mut config, snapshot);
            run_analyze(config, &root).await
        }
        Some(Commands::Apply { root, snapshot, yes }) => {
            override_snapshot(&mut config, snapshot);
            run_apply(config, &root, yes)
        }
        Some(Commands::Config { action }) => run_config_command(config, action, &cli.config),
        Some(Commands::Status) => run_status(config).await,
        None => run_organize(config, Path::new("."), false).await,
    }
}

fn override_snapshot(config: &mut AppConfig, snapshot: Option<PathBuf>) {
    if let Some(path) = snapshot {
        config.organize.snapshot_path = path;
    }
}

/// Analyze, preview, confirm and move
async fn run_organize(config: AppConfig, root: &Path, yes: bool) -> Result<()> {
    let client = ClassificationClient::from_config(&config)?;
    info!("Using {} classifier ({})", client.backend_name(), config.classifier.model);

    let pipeline = Pipeline::new(config, client);
    let summary = pipeline.run(root, |plan| confirm_moves(plan, yes)).await?;

    print_analysis(&summary.stats, &pipeline.config().organize.snapshot_path);
    print_outcome(&summary.outcome);
    Ok(())
}

/// Analyze and write the snapshot only
async fn run_analyze(config: AppConfig, root: &Path) -> Result<()> {
    let client = ClassificationClient::from_config(&config)?;
    let pipeline = Pipeline::new(config, client);

    let (ledger, stats) = pipeline.analyze(root).await;
    pipeline.persist(&ledger)?;
    print_analysis(&stats, &pipeline.config().organize.snapshot_path);

    if ledger.is_empty() {
        println!("No files were analyzed.");
    } else {
        print!("{}", render_plan(&pipeline.organizer(root).plan(&ledger)));
    }
    Ok(())
}

/// Execute the moves recorded in a snapshot
fn run_apply(config: AppConfig, root: &Path, yes: bool) -> Result<()> {
    let snapshot = &config.organize.snapshot_path;
    let ledger = Ledger::load(snapshot)?;
    info!("Loaded {} record(s) from {:?}", ledger.len(), snapshot);

    let organizer = Organizer::new(root, config.organize.min_confidence);
    let (_, outcome) = confirm_and_execute(&ledger, &organizer, |plan| confirm_moves(plan, yes))?;
    print_outcome(&outcome);
    Ok(())
}

/// Show the dry-run preview and ask whether to proceed
fn confirm_moves(plan: &MovePlan, yes: bool) -> Result<bool> {
    print!("{}", render_plan(plan));

    if yes {
        return Ok(true);
    }
    Ok(prompt_confirm(&format!("Proceed with moving {} files?", plan.ready_count()))?)
}

fn prompt_confirm(prompt: &str) -> io::Result<bool> {
    print!("\n{} (y/n): ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(is_affirmative(&input))
}

/// Only an explicit yes confirms; anything else cancels
fn is_affirmative(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Dry-run preview, always ending with the number of files that will move
fn render_plan(plan: &MovePlan) -> String {
    let rule = "=".repeat(50);
    format!(
        "\n{rule}\nDRY RUN PREVIEW\n{rule}\n{plan}{}\n{} of {} file(s) ready to move.\n",
        "-".repeat(50),
        plan.ready_count(),
        plan.entries.len(),
    )
}

fn print_analysis(stats: &AnalysisStats, snapshot: &Path) {
    println!("\n{:=<30}", "");
    println!("Analyzed {} of {} files", stats.classified, stats.discovered);
    println!("  Unsupported: {}", stats.unsupported);
    println!("  Unreadable: {}", stats.extraction_failed);
    println!("  Classifier failures: {}", stats.classification_failed);
    println!("  Duplicates: {}", stats.duplicate);
    println!("Results saved to {:?}", snapshot);
    println!("{:=<30}", "");
}

fn print_outcome(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::NothingAnalyzed => println!("No files were analyzed. Exiting."),
        RunOutcome::Cancelled => println!("Operation cancelled. No files were moved."),
        RunOutcome::Completed(report) => print_report(report),
    }
}

fn print_report(report: &MoveReport) {
    println!("\n{:=<50}", "");
    println!("COMPLETE");
    println!("Successfully Moved: {}", report.moved);
    println!("Skipped (Low Conf/Dupes): {}", report.skipped);
    println!("Errors: {}", report.errors);
    println!("{:=<50}", "");
}

/// Run config commands
fn run_config_command(config: AppConfig, action: ConfigCommands, config_path: &Path) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            let json = serde_json::to_string_pretty(&config)?;
            println!("{}", json);
        }
        ConfigCommands::Generate { output } => {
            AppConfig::default().save(&output)?;
            println!("Generated config at {:?}", output);
        }
        ConfigCommands::Validate => {
            config.validate()?;
            println!("Configuration at {:?} is valid", config_path);
            println!("  Provider: {:?}", config.classifier.provider);
            println!("  Model: {}", config.classifier.model);
            println!("  Categories: {}", config.categories.join(", "));
            println!("  Confidence threshold: {}", config.organize.min_confidence);
        }
    }

    Ok(())
}

/// Run status check
async fn run_status(config: AppConfig) -> Result<()> {
    println!("docsort v{} Status", env!("CARGO_PKG_VERSION"));
    println!("======================");
    println!("Provider: {:?}", config.classifier.provider);
    println!("Model: {}", config.classifier.model);

    match config.classifier.provider {
        Provider::Gemini => match config.api_key() {
            Ok(_) => println!("Credentials: {} is set", config.classifier.api_key_env),
            Err(e) => println!("Credentials: Error - {}", e),
        },
        Provider::Ollama => {
            let url = config.classifier.url.as_deref()
                .unwrap_or(docsort::classifier::ollama::DEFAULT_BASE_URL);
            let timeout = std::time::Duration::from_secs(config.classifier.timeout_secs);
            let client = OllamaClient::new(url, &config.classifier.model, timeout)?;

            match client.health_check().await {
                Ok(()) => println!("Ollama: Running"),
                Err(e) => {
                    println!("Ollama: Error - {}", e);
                    return Ok(());
                }
            }
            match client.model_available().await {
                Ok(true) => println!("Model available"),
                Ok(false) => warn!(
                    "Model '{}' not found. Try: ollama pull {}",
                    config.classifier.model, config.classifier.model
                ),
                Err(e) => println!("Error listing models: {}", e),
            }
        }
    }

    println!("\nCategories: {}", config.categories.join(", "));
    println!("Snapshot: {:?}", config.organize.snapshot_path);

    Ok(())
}
