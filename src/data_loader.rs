use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

use crate::models::{Category, Compartment, InventoryItem};
use crate::store::MemoryStore;

pub const NAME_COL: &str = "name";
pub const CATEGORY_COL: &str = "category";
pub const COMPARTMENT_COL: &str = "compartment";
pub const EXPIRY_COL: &str = "expiry_date";

#[derive(Debug, Deserialize)]
struct InventoryRow {
    name: String,
    category: Category,
    compartment: Compartment,
    expiry_date: NaiveDate,
    #[serde(default)]
    image_path: Option<String>,
}

/// Reads `name,category,compartment,expiry_date[,image_path]` rows.
/// Rows with an empty name are skipped.
pub fn load_inventory_csv(csv_path: &Path) -> Result<Vec<(InventoryItem, Option<String>)>> {
    if !csv_path.exists() {
        return Err(anyhow::anyhow!("Inventory CSV file not found at: {:?}", csv_path));
    }

    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open inventory CSV file at {:?}", csv_path))?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(file);

    let headers = rdr.headers()?.clone();
    for required in [NAME_COL, CATEGORY_COL, COMPARTMENT_COL, EXPIRY_COL] {
        if !headers.iter().any(|h| h == required) {
            return Err(anyhow::anyhow!("Column '{}' not found", required));
        }
    }

    let mut items = Vec::new();
    for (row_index, result) in rdr.deserialize::<InventoryRow>().enumerate() {
        // +2: one for the header, one for 1-based line numbers
        let row = result.with_context(|| format!("Failed to read inventory row {}", row_index + 2))?;
        if row.name.is_empty() {
            debug!(row = row_index + 2, "Skipping inventory row with empty name");
            continue;
        }
        let image_path = row.image_path.filter(|p| !p.is_empty());
        items.push((
            InventoryItem::new(row.name, row.category, row.compartment, row.expiry_date),
            image_path,
        ));
    }

    Ok(items)
}

pub fn load_into_store(csv_path: &Path, store: &MemoryStore) -> Result<usize> {
    let rows = load_inventory_csv(csv_path)?;
    let count = rows.len();
    for (item, image_path) in rows {
        store.create(item, image_path)?;
    }
    info!(count, path = ?csv_path, "Loaded inventory");
    Ok(count)
}
