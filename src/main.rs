// src/main.rs
// =============================================================================
// This is the entry point of the CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr, `RUST_LOG`, default `warn`)
// 3. Build the config, cache store and HTTP client
// 4. Dispatch to the subcommand handler and print the result
// 5. Exit with 0 on success, 2 on an unexpected error
//
// Network trouble is not an error here: the pipeline falls back to built-in
// data on its own. Exit code 2 is for things like an unreadable config file.
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use portfolio_projects::github::parse_repo_reference;
use portfolio_projects::{
    FileStore, KeyValueStore, MemoryStore, Portfolio, PortfolioConfig, Project,
    ProjectCollection, ReqwestHttpClient, Source,
};
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_logging();

    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so `projects --json` output stays machine-readable
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(&cli)?;

    match cli.command {
        Commands::Projects { json } => {
            let portfolio = build_portfolio(&cli, config)?;
            let collection = portfolio.fetch_github_projects().await;
            print_collection(&collection, json)
        }
        Commands::Readme { ref repo, ref branch } => {
            let reference = parse_repo_reference(repo)
                .with_context(|| format!("could not read repository '{}'", repo))?;
            if let Some(owner) = reference.owner {
                config.account = owner;
            }
            let portfolio = build_portfolio(&cli, config)?;
            let readme = portfolio
                .fetch_readme_on_demand(&reference.name, branch.as_deref())
                .await;
            println!("{}", readme);
            Ok(())
        }
        Commands::ClearCache => {
            let portfolio = build_portfolio(&cli, config)?;
            portfolio.clear_cache().context("could not clear the cache")?;
            println!("Cache cleared");
            Ok(())
        }
    }
}

// Config file first, then command-line overrides
fn load_config(cli: &Cli) -> Result<PortfolioConfig> {
    let mut config = match &cli.config {
        Some(path) => PortfolioConfig::from_json_file(path)
            .with_context(|| format!("could not load config from {}", path.display()))?,
        None => PortfolioConfig::default(),
    };

    if let Some(account) = &cli.account {
        config.account = account.clone();
    }
    if let Some(policy) = cli.cache {
        config.cache_policy = policy;
    }
    if let Some(secs) = cli.timeout_secs {
        config.timeout_secs = Some(secs);
    }

    debug!(?config, "effective configuration");
    Ok(config)
}

fn build_portfolio(cli: &Cli, config: PortfolioConfig) -> Result<Portfolio> {
    let store: Box<dyn KeyValueStore> = match &cli.cache_file {
        Some(path) => {
            let store = FileStore::open(path)
                .with_context(|| format!("could not open cache file {}", path.display()))?;
            debug!(path = %store.path().display(), "using file cache");
            Box::new(store)
        }
        None => Box::new(MemoryStore::new()),
    };

    let timeout = config.timeout_secs.map(Duration::from_secs);
    let client = ReqwestHttpClient::new(timeout).context("could not create HTTP client")?;

    Portfolio::new(config, Box::new(client), store).context("invalid configuration")
}

fn print_collection(collection: &ProjectCollection, json: bool) -> Result<()> {
    if json {
        let output = serde_json::to_string_pretty(collection)?;
        println!("{}", output);
    } else {
        print_table(collection);
    }
    Ok(())
}

// Prints the collection as a human-readable table
fn print_table(collection: &ProjectCollection) {
    println!("{:<40} {:<40} {:<25} {:<40}", "NAME", "TITLE", "LANGUAGES", "TECHNOLOGIES");
    println!("{}", "=".repeat(148));

    for project in &collection.other_projects {
        println!(
            "{:<40} {:<40} {:<25} {:<40}",
            clip(&project.name, 39),
            clip(&project.title, 39),
            clip(&project.languages.join(", "), 24),
            clip(&project.technologies.join(", "), 40),
        );
    }

    println!();
    println!("Most recent: {}", describe(&collection.most_recent));
    println!("Total: {} project(s), source: {}", collection.len(), source_label(collection.source));
}

fn describe(project: &Project) -> String {
    match project.updated_at {
        Some(updated_at) => format!("{} (updated {})", project.name, updated_at.format("%Y-%m-%d")),
        None => project.name.clone(),
    }
}

fn source_label(source: Source) -> &'static str {
    match source {
        Source::Live => "GitHub",
        Source::Cache => "cache",
        Source::Fallback => "built-in fallback",
    }
}

// Truncates on character boundaries for display
fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
