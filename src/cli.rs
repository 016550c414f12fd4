// src/cli.rs
// =============================================================================
// This file defines the command-line interface using the `clap` crate.
//
// Global options pick the account, the cache and the timeout; they override
// whatever the optional `--config` file says. Subcommands:
//
// - projects:     run the whole pipeline and print the result
// - readme:       print one README
// - clear-cache:  wipe the cache file
// =============================================================================

use clap::{Parser, Subcommand};
use portfolio_projects::CachePolicy;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "portfolio-projects",
    version,
    about = "Builds portfolio project cards from a GitHub account",
    long_about = "portfolio-projects lists a GitHub account's repositories, reads their READMEs \
                  and infers a title, description, languages and technologies for each one. \
                  When GitHub is unreachable it prints the built-in project list instead."
)]
pub struct Cli {
    /// JSON config file; missing fields keep their defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// GitHub account to list (overrides the config file)
    #[arg(long, global = true)]
    pub account: Option<String>,

    /// Cache policy (overrides the config file)
    #[arg(long, value_enum, global = true)]
    pub cache: Option<CachePolicy>,

    /// Where cached data is kept. Without it the cache lives in memory
    /// for this run only.
    #[arg(long, global = true)]
    pub cache_file: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the account's projects with their inferred metadata
    ///
    /// Example: portfolio-projects projects --json
    Projects {
        /// Output the collection as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print one repository's README
    ///
    /// Example: portfolio-projects readme timeo-java --branch master
    Readme {
        /// Repository name, owner/name, or a github.com URL
        repo: String,

        /// Branch to read from (defaults to the configured branch)
        #[arg(long)]
        branch: Option<String>,
    },

    /// Remove every cached entry
    ClearCache,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "portfolio-projects",
            "projects",
            "--json",
            "--cache",
            "daily",
            "--timeout-secs",
            "5",
        ]);
        assert!(matches!(cli.command, Commands::Projects { json: true }));
        assert_eq!(cli.cache, Some(CachePolicy::Daily));
        assert_eq!(cli.timeout_secs, Some(5));
    }

    #[test]
    fn test_readme_arguments() {
        let cli = Cli::parse_from(["portfolio-projects", "readme", "timeo-java", "--branch", "master"]);
        match cli.command {
            Commands::Readme { repo, branch } => {
                assert_eq!(repo, "timeo-java");
                assert_eq!(branch.as_deref(), Some("master"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
