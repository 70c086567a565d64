//! Expiry-aware recipe recommendations.
//!
//! Ranking is a pure function of the inventory snapshot and the date
//! ([`rank`]). [`RecommendationEngine`] wraps it with the
//! inventory read and the optional, best-effort image enrichment.

use chrono::NaiveDate;
use futures_util::future::join_all;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::api_connection::ImageGenerator;
use crate::errors::{GenerationError, ImageApiError};
use crate::expiry::{days_until_expiry, RECIPE_EXPIRING_DAYS};
use crate::models::InventoryItem;
use crate::recipe_catalog::{RecipeTemplate, RECIPE_CATALOG};
use crate::store::InventorySource;

pub const MAX_SUGGESTIONS: usize = 3;
pub const FROM_FRIDGE_SUFFIX: &str = " (來自冰箱)";
pub const EMPTY_INVENTORY_MESSAGE: &str = "冰箱裡沒有食材，無法生成食譜建議";

/// Variant order gives `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSuggestion {
    pub name: String,
    pub description: String,
    pub difficulty: String,
    pub cooking_time: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub tips: String,
    pub priority: Priority,
    pub expiring_ingredients: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionResponse {
    pub suggestions: Vec<RecipeSuggestion>,
    pub ingredients_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn suggest_from_template(
    template: &RecipeTemplate,
    inventory: &[&InventoryItem],
    is_expiring: impl Fn(&InventoryItem) -> bool,
) -> Option<RecipeSuggestion> {
    let matched: Vec<&InventoryItem> = inventory
        .iter()
        .copied()
        .filter(|item| template.matches(&item.name))
        .collect();
    if matched.is_empty() {
        return None;
    }

    let expiring_ingredients: Vec<String> = matched
        .iter()
        .filter(|item| is_expiring(**item))
        .map(|item| item.name.clone())
        .collect();

    let priority = if !expiring_ingredients.is_empty() {
        Priority::High
    } else if matched.len() >= 2 {
        Priority::Medium
    } else {
        Priority::Low
    };

    let mut ingredients: Vec<String> = matched
        .iter()
        .map(|item| format!("{}{}", item.name, FROM_FRIDGE_SUFFIX))
        .collect();
    ingredients.extend(
        template
            .base_ingredients
            .iter()
            .filter(|base| !matched.iter().any(|item| item.name.contains(*base)))
            .map(|base| base.to_string()),
    );

    Some(RecipeSuggestion {
        name: template.name.to_string(),
        description: template.description.to_string(),
        difficulty: template.difficulty.to_string(),
        cooking_time: template.cooking_time.to_string(),
        ingredients,
        instructions: to_strings(template.instructions),
        tips: template.tips.to_string(),
        priority,
        expiring_ingredients,
        image_url: None,
    })
}

fn freeform_suggestion(inventory: &[&InventoryItem], expiring: &[&InventoryItem]) -> RecipeSuggestion {
    RecipeSuggestion {
        name: "創意料理".to_string(),
        description: "根據您的食材自由創作".to_string(),
        difficulty: "中等".to_string(),
        cooking_time: "20分鐘".to_string(),
        ingredients: inventory.iter().map(|item| item.name.clone()).collect(),
        instructions: to_strings(&[
            "將所有食材洗淨並準備",
            "根據食材特性決定烹調方式",
            "適當調味後即可享用",
        ]),
        tips: "發揮創意，嘗試不同的搭配方式".to_string(),
        priority: if expiring.is_empty() { Priority::Medium } else { Priority::High },
        expiring_ingredients: expiring.iter().map(|item| item.name.clone()).collect(),
        image_url: None,
    }
}

/// Outcome of ranking the catalog against an inventory snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum Ranking {
    /// Nothing to rank.
    Empty,
    /// Catalog recipes, best first, at most [`MAX_SUGGESTIONS`].
    Ranked(Vec<RecipeSuggestion>),
    /// No catalog recipe matched any item.
    Freeform(RecipeSuggestion),
}

impl Ranking {
    pub fn into_suggestions(self) -> Vec<RecipeSuggestion> {
        match self {
            Ranking::Empty => Vec::new(),
            Ranking::Ranked(suggestions) => suggestions,
            Ranking::Freeform(suggestion) => vec![suggestion],
        }
    }
}

/// Ranks catalog recipes against `items` as of `today`.
pub fn rank(items: &[InventoryItem], today: NaiveDate) -> Ranking {
    if items.is_empty() {
        return Ranking::Empty;
    }

    // Soonest-expiring first; stable so equal dates keep input order.
    let mut inventory: Vec<&InventoryItem> = items.iter().collect();
    inventory.sort_by_key(|item| item.expiry_date);

    let is_expiring =
        |item: &InventoryItem| days_until_expiry(item.expiry_date, today) <= RECIPE_EXPIRING_DAYS;
    let expiring: Vec<&InventoryItem> = inventory.iter().copied().filter(|i| is_expiring(*i)).collect();

    let mut matched: Vec<RecipeSuggestion> = RECIPE_CATALOG
        .iter()
        .filter_map(|template| suggest_from_template(template, &inventory, is_expiring))
        .collect();

    if matched.is_empty() {
        debug!(items = items.len(), "No catalog recipe matched, using freeform suggestion");
        return Ranking::Freeform(freeform_suggestion(&inventory, &expiring));
    }

    // sort_by is stable: equal priorities keep catalog order.
    matched.sort_by(|a, b| b.priority.cmp(&a.priority));
    matched.truncate(MAX_SUGGESTIONS);
    Ranking::Ranked(matched)
}

/// Flattened [`rank`]: at most [`MAX_SUGGESTIONS`] entries, or the single
/// freeform suggestion. An empty inventory yields an empty list.
pub fn generate_suggestions(items: &[InventoryItem], today: NaiveDate) -> Vec<RecipeSuggestion> {
    rank(items, today).into_suggestions()
}

pub fn image_prompt(suggestion: &RecipeSuggestion) -> String {
    format!(
        "A beautiful, appetizing photo of {} ({}). Professional food photography, well-lit, restaurant quality presentation.",
        suggestion.name, suggestion.description
    )
}

pub struct RecommendationEngine<G> {
    image_generator: Option<G>,
    image_timeout: Duration,
}

impl<G: ImageGenerator> RecommendationEngine<G> {
    pub fn new(image_generator: Option<G>, image_timeout: Duration) -> Self {
        Self {
            image_generator,
            image_timeout,
        }
    }

    /// Reads the inventory from `source` and builds the response.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] only when the inventory cannot be read.
    pub async fn suggest(
        &self,
        source: &impl InventorySource,
        today: NaiveDate,
    ) -> Result<SuggestionResponse, GenerationError> {
        let items = source.all_items()?;

        if items.is_empty() {
            info!("Inventory is empty, no recipe suggestions");
            return Ok(SuggestionResponse {
                suggestions: Vec::new(),
                ingredients_count: 0,
                message: Some(EMPTY_INVENTORY_MESSAGE.to_string()),
            });
        }

        let suggestions = match rank(&items, today) {
            Ranking::Ranked(mut ranked) => {
                self.enrich_with_images(&mut ranked).await;
                ranked
            }
            other => other.into_suggestions(),
        };
        info!(
            items = items.len(),
            suggestions = suggestions.len(),
            "Generated recipe suggestions"
        );

        Ok(SuggestionResponse {
            suggestions,
            ingredients_count: items.len(),
            message: None,
        })
    }

    /// Fetches one image per suggestion concurrently. Each call fails on its
    /// own; failures and timeouts leave `image_url` unset.
    pub async fn enrich_with_images(&self, suggestions: &mut [RecipeSuggestion]) {
        let Some(generator) = &self.image_generator else {
            debug!("No image generator configured, skipping image generation");
            return;
        };

        let prompts: Vec<String> = suggestions.iter().map(image_prompt).collect();
        let results = join_all(prompts.iter().map(|prompt| async move {
            match tokio::time::timeout(self.image_timeout, generator.generate_image(prompt)).await {
                Ok(result) => result,
                Err(_) => Err(ImageApiError::Timeout(self.image_timeout)),
            }
        }))
        .await;

        for (suggestion, result) in suggestions.iter_mut().zip(results) {
            match result {
                Ok(url) => {
                    debug!(recipe = %suggestion.name, "Image generated");
                    suggestion.image_url = Some(url);
                }
                Err(e) => {
                    warn!(recipe = %suggestion.name, error = %e, "Failed to generate recipe image");
                }
            }
        }
    }
}
