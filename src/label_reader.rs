//! Guesses a food item from label text produced by an upstream OCR step.
//!
//! This is keyword lookup plus date extraction, nothing more.

use chrono::{Duration, NaiveDate};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use crate::models::Category;

struct KnownFood {
    name: &'static str,
    category: Category,
    shelf_life_days: i64,
    keywords: &'static [&'static str],
}

const KNOWN_FOODS: &[KnownFood] = &[
    KnownFood { name: "牛奶", category: Category::Dairy, shelf_life_days: 7, keywords: &["牛奶", "鮮奶", "milk"] },
    KnownFood { name: "優酪乳", category: Category::Dairy, shelf_life_days: 10, keywords: &["優酪乳", "優格", "yogurt"] },
    KnownFood { name: "雞蛋", category: Category::Dairy, shelf_life_days: 14, keywords: &["雞蛋", "蛋", "egg"] },
    KnownFood { name: "麵包", category: Category::Snacks, shelf_life_days: 3, keywords: &["麵包", "吐司", "bread"] },
    KnownFood { name: "餅乾", category: Category::Snacks, shelf_life_days: 30, keywords: &["餅乾", "cookie", "biscuit"] },
    KnownFood { name: "蘋果", category: Category::Produce, shelf_life_days: 7, keywords: &["蘋果", "apple"] },
    KnownFood { name: "香蕉", category: Category::Produce, shelf_life_days: 5, keywords: &["香蕉", "banana"] },
    KnownFood { name: "雞肉", category: Category::Meat, shelf_life_days: 3, keywords: &["雞肉", "雞", "chicken"] },
    KnownFood { name: "豬肉", category: Category::Meat, shelf_life_days: 3, keywords: &["豬肉", "豬", "pork"] },
    KnownFood { name: "牛肉", category: Category::Meat, shelf_life_days: 4, keywords: &["牛肉", "牛", "beef"] },
    KnownFood { name: "魚", category: Category::Meat, shelf_life_days: 2, keywords: &["魚", "fish"] },
    KnownFood { name: "果汁", category: Category::Beverages, shelf_life_days: 7, keywords: &["果汁", "juice"] },
    KnownFood { name: "可樂", category: Category::Beverages, shelf_life_days: 90, keywords: &["可樂", "cola", "coke"] },
    KnownFood { name: "醬油", category: Category::Condiments, shelf_life_days: 180, keywords: &["醬油", "soy sauce"] },
    KnownFood { name: "沙拉醬", category: Category::Condiments, shelf_life_days: 30, keywords: &["沙拉醬", "dressing"] },
];

const UNKNOWN_FOOD: &str = "未知食品";
const UNKNOWN_SHELF_LIFE_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodRecognition {
    pub name: String,
    pub category: Category,
    pub expiry_date: NaiveDate,
    pub confidence: f64,
    pub possible_results: Vec<String>,
}

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(\d{4})[年/-](\d{1,2})[月/-](\d{1,2})日?|(\d{1,2})/(\d{1,2})/(\d{4})")
            .unwrap_or_else(|e| panic!("invalid label date pattern: {}", e))
    })
}

/// First valid date printed in `text`: `YYYY年M月D日`, `YYYY-M-D`, `YYYY/M/D`
/// or US-style `M/D/YYYY`.
pub fn extract_date(text: &str) -> Option<NaiveDate> {
    date_pattern().captures_iter(text).find_map(|caps| {
        let num = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
        if let (Some(y), Some(m), Some(d)) = (num(1), num(2), num(3)) {
            NaiveDate::from_ymd_opt(y as i32, m, d)
        } else {
            let (m, d, y) = (num(4)?, num(5)?, num(6)?);
            NaiveDate::from_ymd_opt(y as i32, m, d)
        }
    })
}

pub fn analyze_label_text(text: &str, today: NaiveDate) -> FoodRecognition {
    let lower_text = text.to_lowercase();
    let text_len = text.chars().count().max(1) as f64;

    let mut best: Option<(&KnownFood, f64)> = None;
    for food in KNOWN_FOODS {
        for keyword in food.keywords {
            if text.contains(keyword) || lower_text.contains(&keyword.to_lowercase()) {
                let score = keyword.chars().count() as f64 / text_len;
                if best.map_or(true, |(_, best_score)| score > best_score) {
                    best = Some((food, score));
                }
            }
        }
    }

    let printed_date = extract_date(text);

    match best {
        Some((food, score)) => {
            let expiry_date =
                printed_date.unwrap_or_else(|| today + Duration::days(food.shelf_life_days));
            let mut possible_results = vec![food.name.to_string()];
            possible_results.extend(
                KNOWN_FOODS
                    .iter()
                    .filter(|other| other.category == food.category && other.name != food.name)
                    .take(2)
                    .map(|other| other.name.to_string()),
            );
            FoodRecognition {
                name: food.name.to_string(),
                category: food.category,
                expiry_date,
                confidence: (0.5 + score).min(0.9),
                possible_results,
            }
        }
        None => FoodRecognition {
            name: UNKNOWN_FOOD.to_string(),
            category: Category::Other,
            expiry_date: today + Duration::days(UNKNOWN_SHELF_LIFE_DAYS),
            confidence: 0.2,
            possible_results: vec!["食品1".to_string(), "食品2".to_string(), "食品3".to_string()],
        },
    }
}
