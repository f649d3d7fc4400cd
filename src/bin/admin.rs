//! CLI administration tool for wordle-pb.
//!
//! Seeds and inspects the record store through the same typed client the
//! application uses, and shows the effective dev proxy configuration.
//!
//! # Usage
//!
//! ```bash
//! # Generate the numeric categories into imports/
//! cargo run --bin admin -- generate numbers --out imports
//!
//! # Sample the Wikipedle category from a page-title dump
//! cargo run --bin admin -- generate wikipedia --dump enwiki-all-titles-in-ns0.gz
//!
//! # Import every category file in imports/
//! cargo run --bin admin -- import --dir imports --yes
//!
//! # Apply a schema export first, then import the categories
//! cargo run --bin admin -- import --collections collections.json --yes
//!
//! # Show record counts per collection
//! cargo run --bin admin -- check
//!
//! # Print the dev proxy configuration in effect
//! cargo run --bin admin -- config
//! ```
//!
//! # Environment Variables
//!
//! - `POCKETBASE_URL`: record store base (default: `http://127.0.0.1:5173/`)
//! - `PB_ADMIN_EMAIL` / `PB_ADMIN_PASSWORD` (optional): superuser credentials
//!   used before importing or checking; required for `--collections`
//! - `DEV_CONFIG` (optional): dev proxy TOML file shown by `config`

use wordle_pb::application::services::{ImportService, import_collections_file};
use wordle_pb::application::services::number_generator::{
    DEFAULT_WORD_COUNT, generate_floatle, generate_intle, write_import,
};
use wordle_pb::application::services::wikipedia_generator::generate_wikipedle;
use wordle_pb::config::{self, Config};
use wordle_pb::devserver::DevConfig;
use wordle_pb::domain::collection::Collection;
use wordle_pb::infrastructure::pocketbase::{
    self, CollectionHandle, ListOptions, PocketBase, SUPERUSERS_COLLECTION,
};
use wordle_pb::telemetry;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI tool for managing wordle-pb data.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Import collection schemas and category files into the record store
    Import {
        /// Directory holding `*.json` category files
        #[arg(short, long, default_value = "imports")]
        dir: PathBuf,

        /// `collections.json` schema export to apply before the categories
        #[arg(long)]
        collections: Option<PathBuf>,

        /// Drop collections missing from the schema export, with their records
        #[arg(long, requires = "collections")]
        delete_missing: bool,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Generate category files
    Generate {
        #[command(subcommand)]
        what: GenerateAction,
    },

    /// Show record counts per collection
    Check {
        /// Only check this collection
        #[arg(short, long)]
        collection: Option<String>,
    },

    /// Print the effective dev proxy configuration
    Config,
}

/// Generation subcommands.
#[derive(Subcommand)]
enum GenerateAction {
    /// Intle and Floatle categories of random numbers
    Numbers {
        /// Output directory
        #[arg(short, long, default_value = "imports")]
        out: PathBuf,

        /// Words per category
        #[arg(short, long, default_value_t = DEFAULT_WORD_COUNT)]
        count: usize,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Wikipedle category sampled from a gzipped page-title dump
    Wikipedia {
        /// Gzipped dump, one title per line
        #[arg(short, long)]
        dump: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "imports")]
        out: PathBuf,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env().context("Failed to load configuration")?;
    telemetry::init(&config.log_level, &config.log_format)?;

    match cli.command {
        Commands::Import {
            dir,
            collections,
            delete_missing,
            yes,
        } => {
            let schema = collections.as_deref().map(|path| (path, delete_missing));
            handle_import(&config, &dir, schema, yes).await?
        }
        Commands::Generate {
            what: GenerateAction::Numbers { out, count, seed },
        } => handle_generate_numbers(&out, count, seed)?,
        Commands::Generate {
            what: GenerateAction::Wikipedia { dump, out, seed },
        } => handle_generate_wikipedia(&dump, &out, seed)?,
        Commands::Check { collection } => handle_check(&config, collection).await?,
        Commands::Config => handle_config(&config)?,
    }

    Ok(())
}

/// Installs the process-wide client and signs in as superuser when
/// credentials are set.
async fn connect(config: &Config) -> Result<&'static PocketBase> {
    let client = PocketBase::connect(
        &config.pocketbase_url,
        Duration::from_secs(config.http_timeout_seconds),
    )
    .context("Failed to build PocketBase client")?;
    let client = pocketbase::init(client)?;

    let credential = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
    match (credential("PB_ADMIN_EMAIL"), credential("PB_ADMIN_PASSWORD")) {
        (Some(email), Some(password)) => {
            client
                .auth_with_password(SUPERUSERS_COLLECTION, &email, &password)
                .await
                .context("Superuser authentication failed")?;
            println!("  Signed in as {}", email.cyan());
        }
        _ => println!(
            "{}",
            "  PB_ADMIN_EMAIL/PB_ADMIN_PASSWORD not set, continuing anonymously".yellow()
        ),
    }

    Ok(client)
}

/// Applies the optional schema export, then imports every category file in
/// `dir`.
///
/// # Flow
///
/// 1. Check that there is something to import
/// 2. Confirm (unless `--yes`)
/// 3. Import the schema export, if given
/// 4. Import categories, skipping those that already exist
/// 5. Print the report
async fn handle_import(
    config: &Config,
    dir: &Path,
    schema: Option<(&Path, bool)>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "📥 Import Categories".bright_blue().bold());
    println!();

    let has_dir = dir.is_dir();
    if !has_dir && schema.is_none() {
        println!(
            "{}",
            format!("  Directory {} not found", dir.display()).yellow()
        );
        println!();
        println!(
            "  Generate one with: {} admin -- generate numbers --out {}",
            "cargo run --bin".bright_cyan(),
            dir.display()
        );
        return Ok(());
    }

    if let Some((path, delete_missing)) = schema {
        println!("  Schema:  {}", path.display().to_string().cyan());
        if delete_missing {
            println!(
                "{}",
                "  Collections missing from the schema will be deleted".red()
            );
        }
    }
    if has_dir {
        println!("  Source:  {}", dir.display().to_string().cyan());
    }
    println!("  Target:  {}", config.pocketbase_url.cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Run this import?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let client = connect(config).await?;

    if let Some((path, delete_missing)) = schema {
        let count = import_collections_file(client, path, delete_missing)
            .await
            .context("Collection schema import failed")?;
        println!(
            "  {} {} collection(s)",
            "SCHEMA  ".green(),
            count.to_string().bright_white()
        );
    }

    if !has_dir {
        println!(
            "{}",
            format!("  Directory {} not found, no categories imported", dir.display()).yellow()
        );
        println!();
        return Ok(());
    }

    let report = ImportService::new(client).import_dir(dir).await;

    println!();
    for name in &report.imported {
        println!("  {} {}", "IMPORTED".green(), name.cyan());
    }
    for name in &report.skipped_existing {
        println!("  {} {}", "EXISTS  ".bright_black(), name.cyan());
    }
    for path in &report.failed_files {
        println!("  {} {}", "FAILED  ".red(), path.display());
    }
    println!();
    println!(
        "  Words created: {}",
        report.words_created.to_string().bright_white().bold()
    );
    if report.words_failed > 0 {
        println!(
            "  Words failed:  {}",
            report.words_failed.to_string().red().bold()
        );
    }
    println!();

    if report.failed_files.is_empty() {
        println!("{}", "✅ Import finished".green().bold());
    } else {
        println!("{}", "⚠️  Import finished with failures".yellow().bold());
    }
    println!();

    Ok(())
}

/// Writes `intle.json` and `floatle.json` into `out`.
fn handle_generate_numbers(out: &Path, count: usize, seed: Option<u64>) -> Result<()> {
    println!("{}", "🎲 Generate Numeric Categories".bright_blue().bold());
    println!();

    let mut rng = seeded_rng(seed);

    for import in [
        generate_intle(&mut rng, count),
        generate_floatle(&mut rng, count),
    ] {
        let path = write_import(out, &import)
            .with_context(|| format!("Failed to write {} import", import.name))?;
        println!(
            "  {} {} words -> {}",
            import.name.cyan(),
            import.words.len().to_string().bright_white(),
            path.display().to_string().bright_black()
        );
    }

    println!();
    println!("{}", "✅ Done".green().bold());
    println!();

    Ok(())
}

/// Writes `wikipedle.json` into `out`, sampled from `dump`.
fn handle_generate_wikipedia(dump: &Path, out: &Path, seed: Option<u64>) -> Result<()> {
    println!("{}", "📚 Generate Wikipedle".bright_blue().bold());
    println!();
    println!("  Dump: {}", dump.display().to_string().cyan());

    let mut rng = seeded_rng(seed);
    let sample = generate_wikipedle(dump, &mut rng)
        .with_context(|| format!("Failed to read dump {}", dump.display()))?;
    let path = write_import(out, &sample.import)
        .with_context(|| format!("Failed to write {} import", sample.import.name))?;

    println!(
        "  {} {} of {} titles -> {}",
        sample.import.name.cyan(),
        sample.import.words.len().to_string().bright_white(),
        sample.lines_read,
        path.display().to_string().bright_black()
    );
    println!();
    println!("{}", "✅ Done".green().bold());
    println!();

    Ok(())
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

/// Prints the total record count and a sample for each collection.
///
/// # Output Format
///
/// ```text
/// 🔍 Collections
///
///   categories  12       Animals
///   words       48211    cat
/// ```
async fn handle_check(config: &Config, collection: Option<String>) -> Result<()> {
    println!("{}", "🔍 Collections".bright_blue().bold());
    println!();

    let client = connect(config).await?;
    println!();

    let names: Vec<String> = match collection {
        Some(name) => vec![name],
        None => Collection::ALL.iter().map(|c| c.name().to_string()).collect(),
    };

    let mut failures = 0;
    for name in names {
        match sample(client.collection(&name)).await {
            Ok((total, example)) => println!(
                "  {:<12} {:<8} {}",
                name.cyan(),
                total.to_string().bright_white().bold(),
                example.unwrap_or_else(|| "-".to_string()).bright_black()
            ),
            Err(e) => {
                failures += 1;
                println!("  {:<12} {}", name.cyan(), e.to_string().red());
            }
        }
    }
    println!();

    if failures > 0 {
        anyhow::bail!("{failures} collection(s) could not be read");
    }

    Ok(())
}

/// Total item count and a display value of the first record.
async fn sample(handle: CollectionHandle) -> Result<(i64, Option<String>)> {
    let options = ListOptions::default();
    let result = match handle {
        CollectionHandle::Categories(service) => {
            let page = service.get_list(1, 1, &options).await?;
            (page.total_items, page.items.first().map(|c| c.name.clone()))
        }
        CollectionHandle::Words(service) => {
            let page = service.get_list(1, 1, &options).await?;
            (page.total_items, page.items.first().map(|w| w.word.clone()))
        }
        CollectionHandle::Other(service) => {
            let page = service.get_list(1, 1, &options).await?;
            (page.total_items, page.items.first().map(|r| r.id.clone()))
        }
    };
    Ok(result)
}

/// Prints the dev proxy configuration as TOML.
fn handle_config(config: &Config) -> Result<()> {
    let dev = DevConfig::load_or_default(config.dev_config_path.as_deref())?;

    println!("{}", "⚙️  Dev Server Configuration".bright_blue().bold());
    println!();
    match &config.dev_config_path {
        Some(path) => println!("  Source: {}", path.display().to_string().cyan()),
        None => println!("  Source: {}", "built-in defaults".cyan()),
    }
    println!("  Mode:   {}", config.app_env.to_string().cyan());
    println!();
    println!("{}", dev.to_toml_string()?);

    Ok(())
}
