use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

use smart_fridge::api_connection::ImageProvider;
use smart_fridge::cli::{parse_args, Command};
use smart_fridge::config::{AppConfig, IMAGE_API_KEY_ENV_VAR};
use smart_fridge::data_loader::load_into_store;
use smart_fridge::expiry::ExpiryDetails;
use smart_fridge::label_reader::analyze_label_text;
use smart_fridge::logging::LoggingConfig;
use smart_fridge::models::StoredItem;
use smart_fridge::recipe_engine::RecommendationEngine;
use smart_fridge::reminders::{check_and_send, notifier_from_config};
use smart_fridge::store::MemoryStore;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
struct ListedItem<'a> {
    item: &'a StoredItem,
    #[serde(flatten)]
    expiry: ExpiryDetails,
}

fn describe_items<'a>(items: &'a [StoredItem], now: &DateTime<Local>) -> Vec<ListedItem<'a>> {
    items
        .iter()
        .map(|stored| ListedItem {
            item: stored,
            expiry: ExpiryDetails::at(stored.item.expiry_date, now),
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env().context("Invalid configuration")?;
    LoggingConfig::from_env().init()?;

    let cli_args = parse_args();
    let now = Local::now();
    let today = now.date_naive();

    let store = MemoryStore::new();
    if let Some(path) = &cli_args.inventory {
        load_into_store(Path::new(path), &store)
            .with_context(|| format!("Failed to load inventory from '{}'", path))?;
    } else if !matches!(cli_args.command, Command::ReadLabel { .. }) {
        warn!("No --inventory given, starting with an empty fridge");
    }

    match cli_args.command {
        Command::Suggest => {
            let image_provider = if config.image_api_key_present {
                let provider = ImageProvider::openai(IMAGE_API_KEY_ENV_VAR);
                Some(match &config.image_api_base_url {
                    Some(url) => provider.with_base_url(url),
                    None => provider,
                })
            } else {
                info!("{} not set, skipping image generation", IMAGE_API_KEY_ENV_VAR);
                None
            };
            let engine = RecommendationEngine::new(image_provider, config.image_timeout);
            let response = engine
                .suggest(&store, today)
                .await
                .context("Failed to generate recipe suggestions")?;
            print_json(&response)?;
        }
        Command::List { compartment } => {
            let items = match compartment {
                Some(compartment) => store.by_compartment(compartment)?,
                None => store.list()?,
            };
            print_json(&describe_items(&items, &now))?;
        }
        Command::Expiring { days } => {
            let items = store.expiring(days, today)?;
            print_json(&describe_items(&items, &now))?;
        }
        Command::Stats => {
            print_json(&store.stats(today)?)?;
        }
        Command::Remind { email, days } => {
            let notifier = notifier_from_config(&config).context("Failed to set up reminder delivery")?;
            let outcome = check_and_send(&store, notifier.as_ref(), &email, days, today).await?;
            print_json(&outcome)?;
        }
        Command::ReadLabel { text } => {
            print_json(&analyze_label_text(&text, today))?;
        }
    }

    Ok(())
}
