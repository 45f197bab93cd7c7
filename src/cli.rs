//! Command-line interface parsing for PantryChef
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! the `Config` the rest of the program runs with.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::data::{RecipeId, DEFAULT_RESULT_COUNT};
use crate::storage::{FileStore, MemoryStore, SharedStore};

/// Largest result count the recipe service accepts
const MAX_RESULT_COUNT: i64 = 100;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// A list position was not a positive whole number
    #[error("Invalid position: '{0}'. Positions start at 1, as shown by `pantrychef list`")]
    InvalidPosition(String),
}

/// PantryChef - find recipes for what is already in your pantry
#[derive(Parser, Debug)]
#[command(name = "pantrychef")]
#[command(about = "Pantry-based recipe search with cached results and offline favorites")]
#[command(version)]
pub struct Cli {
    /// Directory for the ingredient list, cached search and favorites
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Spoonacular API key
    #[arg(long, global = true, env = "SPOONACULAR_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Number of recipes to request per search
    #[arg(
        long,
        global = true,
        value_name = "N",
        default_value_t = DEFAULT_RESULT_COUNT,
        value_parser = clap::value_parser!(u32).range(1..=MAX_RESULT_COUNT)
    )]
    pub results: u32,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// What to do this run
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add one or more ingredients to the pantry
    Add {
        #[arg(required = true, value_name = "INGREDIENT")]
        ingredients: Vec<String>,
    },
    /// Remove the ingredient at a position shown by `list`
    Remove {
        #[arg(value_parser = parse_position_arg)]
        position: usize,
    },
    /// Show the ingredient list
    List,
    /// Add every word of an OCR transcript to the pantry
    Scan {
        #[arg(value_name = "TRANSCRIPT")]
        transcript: PathBuf,
    },
    /// Find recipes for the current ingredients
    Search,
    /// Star a recipe from the last search
    Favorite { id: RecipeId },
    /// Unstar a recipe
    Unfavorite { id: RecipeId },
    /// List starred recipes
    Favorites {
        /// Also fetch cooking instructions for each favorite
        #[arg(long)]
        instructions: bool,
    },
    /// Show cooking instructions for a recipe
    Info { id: RecipeId },
}

/// Parses a 1-based list position as shown to the user.
///
/// # Returns
/// * `Ok(usize)` with the position unchanged
/// * `Err(CliError::InvalidPosition)` for zero, negatives or non-numbers
pub fn parse_position_arg(s: &str) -> Result<usize, CliError> {
    match s.trim().parse::<usize>() {
        Ok(position) if position >= 1 => Ok(position),
        _ => Err(CliError::InvalidPosition(s.to_string())),
    }
}

/// Runtime configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct Config {
    /// Explicit storage directory, if one was given
    pub data_dir: Option<PathBuf>,
    /// API key for the recipe service
    pub api_key: Option<String>,
    /// Recipes requested per search
    pub result_count: u32,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_filter: &'static str,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            api_key: None,
            result_count: DEFAULT_RESULT_COUNT,
            log_filter: "pantrychef=warn",
        }
    }
}

impl Config {
    /// Creates a Config from parsed CLI arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            data_dir: cli.data_dir.clone(),
            api_key: cli
                .api_key
                .as_deref()
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(str::to_string),
            result_count: cli.results,
            log_filter: if cli.verbose {
                "pantrychef=debug"
            } else {
                "pantrychef=warn"
            },
        }
    }

    /// Opens the store every component persists into
    ///
    /// Falls back to an in-memory store when no data directory can be found,
    /// in which case nothing outlives this run.
    pub fn open_store(&self) -> SharedStore {
        if let Some(dir) = &self.data_dir {
            return Arc::new(FileStore::with_dir(dir.clone()));
        }

        match FileStore::new() {
            Some(store) => Arc::new(store),
            None => {
                tracing::warn!("No data directory available, nothing will be saved");
                Arc::new(MemoryStore::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::KeyValueStore;

    #[test]
    fn test_parse_position_arg_accepts_positive() {
        assert_eq!(parse_position_arg("1").unwrap(), 1);
        assert_eq!(parse_position_arg("12").unwrap(), 12);
    }

    #[test]
    fn test_parse_position_arg_rejects_zero_and_garbage() {
        for bad in ["0", "-1", "two", ""] {
            let err = parse_position_arg(bad).unwrap_err();
            assert!(err.to_string().contains("Invalid position"));
        }
    }

    #[test]
    fn test_cli_parse_add_multiple() {
        let cli = Cli::parse_from(["pantrychef", "add", "egg", "flour"]);
        assert_eq!(
            cli.command,
            Command::Add {
                ingredients: vec!["egg".to_string(), "flour".to_string()]
            }
        );
    }

    #[test]
    fn test_cli_add_requires_ingredient() {
        assert!(Cli::try_parse_from(["pantrychef", "add"]).is_err());
    }

    #[test]
    fn test_cli_parse_remove_position() {
        let cli = Cli::parse_from(["pantrychef", "remove", "2"]);
        assert_eq!(cli.command, Command::Remove { position: 2 });
        assert!(Cli::try_parse_from(["pantrychef", "remove", "0"]).is_err());
    }

    #[test]
    fn test_cli_parse_favorites_flag() {
        let cli = Cli::parse_from(["pantrychef", "favorites", "--instructions"]);
        assert_eq!(cli.command, Command::Favorites { instructions: true });
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["pantrychef", "search", "--results", "10", "--data-dir", "/tmp/pc"]);
        assert_eq!(cli.command, Command::Search);
        assert_eq!(cli.results, 10);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/pc")));
    }

    #[test]
    fn test_cli_results_range() {
        assert!(Cli::try_parse_from(["pantrychef", "search", "--results", "0"]).is_err());
        assert!(Cli::try_parse_from(["pantrychef", "search", "--results", "101"]).is_err());
    }

    #[test]
    fn test_config_from_cli_defaults() {
        let cli = Cli::parse_from(["pantrychef", "list"]);
        let config = Config::from_cli(&cli);
        assert_eq!(config.result_count, DEFAULT_RESULT_COUNT);
        assert_eq!(config.log_filter, "pantrychef=warn");
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_config_from_cli_blank_api_key_is_none() {
        let cli = Cli::parse_from(["pantrychef", "search", "--api-key", "  "]);
        assert!(Config::from_cli(&cli).api_key.is_none());
    }

    #[test]
    fn test_config_from_cli_verbose() {
        let cli = Cli::parse_from(["pantrychef", "-v", "list"]);
        assert_eq!(Config::from_cli(&cli).log_filter, "pantrychef=debug");
    }

    #[test]
    fn test_config_open_store_uses_data_dir() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = Config {
            data_dir: Some(temp_dir.path().to_path_buf()),
            ..Config::default()
        };

        let store = config.open_store();
        store.put("favorites", "[]").unwrap();

        assert!(temp_dir.path().join("favorites.json").exists());
    }
}
