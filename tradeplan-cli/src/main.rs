//! TradePlan CLI — quote acquisition and trade recommendation commands.
//!
//! Commands:
//! - `plan` — run the full pipeline: cache-or-fetch quotes, prompt for a
//!   portfolio budget, emit the recommended-trades workbook
//! - `fetch` — refresh the quote cache only (no allocation, no workbook)
//! - `cache status` — report cache presence, age, and freshness

mod sheet;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tradeplan_core::budget::parse_budget;
use tradeplan_core::{
    allocate, IexProvider, Pipeline, PlanConfig, QuoteCache, QuoteOrigin, StdoutProgress,
    ThreadPacer, Universe,
};

const TOKEN_ENV: &str = "IEX_CLOUD_API_TOKEN";

#[derive(Parser)]
#[command(
    name = "tradeplan",
    about = "TradePlan CLI — equal-weight trade recommendations from batch quotes"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Acquire quotes (cache or provider), allocate a budget, write the
    /// recommended-trades workbook.
    Plan {
        /// Path to a TOML config file. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Portfolio budget in whole currency units. Prompted interactively
        /// when omitted.
        #[arg(long)]
        budget: Option<u64>,

        /// Refetch even if the cache is still inside its expiry window.
        #[arg(long, default_value_t = false)]
        force: bool,

        /// Provider access token. Falls back to $IEX_CLOUD_API_TOKEN.
        #[arg(long)]
        token: Option<String>,
    },
    /// Refresh the quote cache without producing a workbook.
    Fetch {
        /// Path to a TOML config file. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Refetch even if the cache is still inside its expiry window.
        #[arg(long, default_value_t = false)]
        force: bool,

        /// Provider access token. Falls back to $IEX_CLOUD_API_TOKEN.
        #[arg(long)]
        token: Option<String>,
    },
    /// Cache inspection commands.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Report primary/backup presence, age, and freshness.
    Status {
        /// Path to a TOML config file. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Plan {
            config,
            budget,
            force,
            token,
        } => run_plan(config, budget, force, token),
        Commands::Fetch {
            config,
            force,
            token,
        } => run_fetch(config, force, token),
        Commands::Cache { action } => match action {
            CacheAction::Status { config } => run_cache_status(config),
        },
    }
}

fn load_config(path: Option<PathBuf>) -> Result<PlanConfig> {
    match path {
        Some(path) => PlanConfig::from_file(&path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(PlanConfig::default()),
    }
}

/// Resolve the provider token: flag first, then the environment. The token
/// is passed through opaquely and never printed or persisted.
fn resolve_token(flag: Option<String>) -> Result<String> {
    if let Some(token) = flag {
        return Ok(token);
    }
    match std::env::var(TOKEN_ENV) {
        Ok(token) if !token.is_empty() => Ok(token),
        _ => bail!("no provider token: pass --token or set ${TOKEN_ENV}"),
    }
}

fn run_plan(
    config_path: Option<PathBuf>,
    budget_flag: Option<u64>,
    force: bool,
    token: Option<String>,
) -> Result<()> {
    if let Some(0) = budget_flag {
        bail!("--budget must be greater than zero");
    }

    let config = load_config(config_path)?;
    let universe = Universe::from_csv_file(&config.storage.universe_path())?;
    let token = resolve_token(token)?;
    let provider = IexProvider::new(config.provider.base_url.as_str(), token)?;
    let pipeline = Pipeline::new(&config, &provider);

    let acquisition = pipeline.acquire(&universe, force, &mut ThreadPacer, &StdoutProgress)?;
    report_origin(&acquisition.origin, &pipeline);

    let budget = match budget_flag {
        Some(value) => value,
        None => prompt_budget()?,
    };

    let plan = allocate(&acquisition.quotes, budget as f64)?;
    sheet::write_plan(&plan, &config.output.file, &config.output.sheet)?;

    println!();
    println!("=== Recommended Trades ===");
    println!("Symbols:        {}", plan.len());
    println!("Budget:         ${budget}");
    println!("Position size:  ${:.2}", plan.position_size);
    println!("Invested:       ${:.2}", plan.invested());
    println!("Workbook:       {}", config.output.file.display());

    Ok(())
}

fn run_fetch(config_path: Option<PathBuf>, force: bool, token: Option<String>) -> Result<()> {
    let config = load_config(config_path)?;
    let universe = Universe::from_csv_file(&config.storage.universe_path())?;
    let token = resolve_token(token)?;
    let provider = IexProvider::new(config.provider.base_url.as_str(), token)?;
    let pipeline = Pipeline::new(&config, &provider);

    let acquisition = pipeline.acquire(&universe, force, &mut ThreadPacer, &StdoutProgress)?;
    report_origin(&acquisition.origin, &pipeline);

    println!(
        "{} quote(s) in {}",
        acquisition.quotes.len(),
        config.storage.cache_path().display()
    );
    Ok(())
}

fn run_cache_status(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let cache = QuoteCache::new(config.storage.cache_path(), config.storage.backup_path());

    println!("Cache:   {}", cache.primary_path().display());

    if !cache.exists() {
        println!("Status:  absent — next run will fetch");
        print_backup_line(&cache);
        return Ok(());
    }

    match cache.age() {
        Ok(age) => {
            let created = chrono::DateTime::<chrono::Local>::from(cache.created_at()?);
            println!("Created: {}", created.format("%Y-%m-%d %H:%M:%S"));
            println!("Age:     {}", format_age(age));
            let verdict = if age < config.storage.expiry() {
                "valid"
            } else {
                "expired — next run will rotate and refetch"
            };
            println!(
                "Status:  {verdict} (expiry window {} day(s))",
                config.storage.expire_days
            );
        }
        Err(e) => println!("Status:  unknown — {e}"),
    }

    match cache.load() {
        Ok(quotes) => println!("Rows:    {}", quotes.len()),
        Err(e) => println!("Rows:    unreadable — {e}"),
    }

    print_backup_line(&cache);
    Ok(())
}

fn print_backup_line(cache: &QuoteCache) {
    if cache.backup_path().exists() {
        println!("Backup:  {}", cache.backup_path().display());
    } else {
        println!("Backup:  none");
    }
}

fn report_origin(origin: &QuoteOrigin, pipeline: &Pipeline) {
    match origin {
        QuoteOrigin::Cache => println!(
            "Using cached quotes from {}",
            pipeline.cache().primary_path().display()
        ),
        QuoteOrigin::Fresh => println!("Fetched fresh quotes from provider"),
    }
}

/// Interactive budget entry with a re-prompt loop. Validation is one
/// attempt at a time; only this boundary loops.
fn prompt_budget() -> Result<u64> {
    let stdin = std::io::stdin();
    loop {
        print!("Enter the value of your portfolio: ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        let read = stdin.read_line(&mut line)?;
        if read == 0 {
            bail!("budget input stream closed");
        }

        match parse_budget(&line) {
            Ok(budget) => return Ok(budget),
            Err(e) => println!("{e}"),
        }
    }
}

fn format_age(age: Duration) -> String {
    let secs = age.as_secs();
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else if secs < 86_400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86_400, (secs % 86_400) / 3600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_age_buckets() {
        assert_eq!(format_age(Duration::from_secs(45)), "45s");
        assert_eq!(format_age(Duration::from_secs(150)), "2m");
        assert_eq!(format_age(Duration::from_secs(3 * 3600 + 120)), "3h 2m");
        assert_eq!(
            format_age(Duration::from_secs(2 * 86_400 + 5 * 3600)),
            "2d 5h"
        );
    }

    #[test]
    fn token_flag_wins_over_environment() {
        let token = resolve_token(Some("sk_flag".into())).unwrap();
        assert_eq!(token, "sk_flag");
    }
}
