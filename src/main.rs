//! PantryChef - find recipes for the ingredients you already have
//!
//! Keeps an ingredient list, searches the Spoonacular API with it (reusing
//! the last response while the list is unchanged) and stores favorite recipes
//! for offline viewing.

use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pantrychef::app::{render_recipe, App};
use pantrychef::cli::{Cli, Command, Config};
use pantrychef::data::{SpoonacularClient, TranscriptRecognizer};

/// Sets up stderr logging, honoring `RUST_LOG` when present
fn init_logging(config: &Config) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli);
    init_logging(&config);

    if let Err(e) = run(cli.command, &config).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Executes one subcommand against the configured storage and service
async fn run(command: Command, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let client = Arc::new(
        SpoonacularClient::new(config.api_key.clone()).with_result_count(config.result_count),
    );
    let app = App::new(config.open_store(), client.clone(), client);

    match command {
        Command::Add { ingredients } => {
            for item in app.add_ingredients(&ingredients) {
                println!("Added {}", item);
            }
        }
        Command::Remove { position } => {
            let removed = app.remove_ingredient(position)?;
            println!("Removed {}", removed);
        }
        Command::List => {
            let items = app.ingredients();
            if items.is_empty() {
                println!("No ingredients yet. Add some with `pantrychef add`.");
            }
            for (i, item) in items.iter().enumerate() {
                println!("{:>3}. {}", i + 1, item);
            }
        }
        Command::Scan { transcript } => {
            let words = app.scan(&TranscriptRecognizer, &transcript)?;
            println!("Added {} recognized word(s)", words.len());
        }
        Command::Search => {
            let list = app.search().await?;
            if list.from_cache {
                println!("(ingredients unchanged, showing saved results)");
            }
            if list.recipes.is_empty() {
                println!("No recipes found.");
            }
            for recipe in &list.recipes {
                println!("{}", render_recipe(recipe, app.is_favorite(recipe.id)));
            }
        }
        Command::Favorite { id } => {
            let favorited = app.favorite(id)?;
            if favorited.newly_added {
                println!("Starred {}", favorited.recipe.title);
            } else {
                println!("{} is already a favorite", favorited.recipe.title);
            }
        }
        Command::Unfavorite { id } => {
            let recipe = app.unfavorite(id)?;
            println!("Unstarred {}", recipe.title);
        }
        Command::Favorites { instructions } => {
            if app.favorites().is_empty() {
                println!("No favorites yet.");
            } else if instructions {
                for (recipe, steps) in app.favorites_with_instructions().await {
                    println!("{}\n{}\n", render_recipe(&recipe, true), steps);
                }
            } else {
                for recipe in app.favorites() {
                    println!("{}", render_recipe(&recipe, true));
                }
            }
        }
        Command::Info { id } => {
            println!("{}", app.instructions(id).await?);
        }
    }

    Ok(())
}
