use chrono::{NaiveDate, TimeDelta, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::sync::RwLock;

use crate::errors::StoreError;
use crate::expiry::STATS_EXPIRING_DAYS;
use crate::models::{Compartment, InventoryItem, ItemPatch, StoredItem};

/// Rough number of items a full fridge holds, for `space_used`.
const FRIDGE_CAPACITY: usize = 30;

/// The single read the recommendation engine depends on.
pub trait InventorySource {
    fn all_items(&self) -> Result<Vec<InventoryItem>, StoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FridgeStats {
    pub total_items: usize,
    pub expiring_items: usize,
    pub categories_count: usize,
    /// Percentage, capped at 100.
    pub space_used: u32,
}

struct Inner {
    items: BTreeMap<u64, StoredItem>,
    next_id: u64,
}

/// In-process inventory. Nothing is persisted.
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                items: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    pub fn create(
        &self,
        item: InventoryItem,
        image_path: Option<String>,
    ) -> Result<StoredItem, StoreError> {
        if item.name.trim().is_empty() {
            return Err(StoreError::Validation("食品名稱不能為空".to_string()));
        }
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let id = inner.next_id;
        inner.next_id += 1;
        let stored = StoredItem {
            id,
            item,
            image_path,
            created_at: Utc::now(),
        };
        inner.items.insert(id, stored.clone());
        Ok(stored)
    }

    pub fn get(&self, id: u64) -> Result<Option<StoredItem>, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(inner.items.get(&id).cloned())
    }

    /// Applies the set fields of `patch`. Returns `None` for an unknown id.
    pub fn update(&self, id: u64, patch: ItemPatch) -> Result<Option<StoredItem>, StoreError> {
        if matches!(&patch.name, Some(name) if name.trim().is_empty()) {
            return Err(StoreError::Validation("食品名稱不能為空".to_string()));
        }
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let Some(existing) = inner.items.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            existing.item.name = name;
        }
        if let Some(category) = patch.category {
            existing.item.category = category;
        }
        if let Some(compartment) = patch.compartment {
            existing.item.compartment = compartment;
        }
        if let Some(expiry_date) = patch.expiry_date {
            existing.item.expiry_date = expiry_date;
        }
        if patch.image_path.is_some() {
            existing.image_path = patch.image_path;
        }
        Ok(Some(existing.clone()))
    }

    pub fn delete(&self, id: u64) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        Ok(inner.items.remove(&id).is_some())
    }

    pub fn list(&self) -> Result<Vec<StoredItem>, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(inner.items.values().cloned().collect())
    }

    pub fn by_compartment(&self, compartment: Compartment) -> Result<Vec<StoredItem>, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(inner
            .items
            .values()
            .filter(|stored| stored.item.compartment == compartment)
            .cloned()
            .collect())
    }

    /// Items expiring on or before `today + days`, already-expired ones
    /// included, soonest first. A window past the calendar range saturates.
    pub fn expiring(&self, days: i64, today: NaiveDate) -> Result<Vec<StoredItem>, StoreError> {
        let cutoff = TimeDelta::try_days(days)
            .and_then(|window| today.checked_add_signed(window))
            .unwrap_or(if days >= 0 { NaiveDate::MAX } else { NaiveDate::MIN });
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        let mut items: Vec<StoredItem> = inner
            .items
            .values()
            .filter(|stored| stored.item.expiry_date <= cutoff)
            .cloned()
            .collect();
        items.sort_by_key(|stored| stored.item.expiry_date);
        Ok(items)
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(inner.items.len())
    }

    pub fn stats(&self, today: NaiveDate) -> Result<FridgeStats, StoreError> {
        let total_items = self.count()?;
        let expiring_items = self.expiring(STATS_EXPIRING_DAYS, today)?.len();
        let categories_count = {
            let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
            inner
                .items
                .values()
                .map(|stored| stored.item.category)
                .collect::<HashSet<_>>()
                .len()
        };
        let space_used = if total_items == 0 {
            0
        } else {
            let pct = (total_items as f64 / FRIDGE_CAPACITY as f64 * 100.0).round() as u32;
            pct.min(100)
        };
        Ok(FridgeStats {
            total_items,
            expiring_items,
            categories_count,
            space_used,
        })
    }
}

impl InventorySource for MemoryStore {
    fn all_items(&self) -> Result<Vec<InventoryItem>, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(inner.items.values().map(|stored| stored.item.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn item(name: &str, category: Category, expiry: NaiveDate) -> InventoryItem {
        InventoryItem::new(name, category, Compartment::MiddleShelf1, expiry)
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let store = MemoryStore::new();
        let a = store.create(item("雞蛋", Category::Dairy, date(2025, 1, 5)), None).unwrap();
        let b = store.create(item("蔥", Category::Produce, date(2025, 1, 9)), None).unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_create_rejects_blank_name() {
        let store = MemoryStore::new();
        let result = store.create(item("  ", Category::Other, date(2025, 1, 5)), None);
        assert!(matches!(result, Err(StoreError::Validation(_))));
    }

    #[test]
    fn test_update_patches_only_given_fields() {
        let store = MemoryStore::new();
        let created = store.create(item("牛奶", Category::Dairy, date(2025, 1, 5)), None).unwrap();
        let patch = ItemPatch {
            compartment: Some(Compartment::LeftDoorUpper),
            ..Default::default()
        };
        let updated = store.update(created.id, patch).unwrap().unwrap();
        assert_eq!(updated.item.name, "牛奶");
        assert_eq!(updated.item.compartment, Compartment::LeftDoorUpper);
        assert!(store.update(99, ItemPatch::default()).unwrap().is_none());
    }

    #[test]
    fn test_delete() {
        let store = MemoryStore::new();
        let created = store.create(item("牛奶", Category::Dairy, date(2025, 1, 5)), None).unwrap();
        assert!(store.delete(created.id).unwrap());
        assert!(!store.delete(created.id).unwrap());
        assert!(store.get(created.id).unwrap().is_none());
    }

    #[test]
    fn test_by_compartment() {
        let store = MemoryStore::new();
        store.create(item("牛奶", Category::Dairy, date(2025, 1, 5)), None).unwrap();
        let mut apple = item("蘋果", Category::Produce, date(2025, 1, 5));
        apple.compartment = Compartment::Crisper;
        store.create(apple, None).unwrap();

        let crisper = store.by_compartment(Compartment::Crisper).unwrap();
        assert_eq!(crisper.len(), 1);
        assert_eq!(crisper[0].item.name, "蘋果");
    }

    #[test]
    fn test_expiring_includes_expired_and_sorts() {
        let today = date(2025, 1, 10);
        let store = MemoryStore::new();
        store.create(item("later", Category::Other, date(2025, 1, 13)), None).unwrap();
        store.create(item("expired", Category::Other, date(2025, 1, 8)), None).unwrap();
        store.create(item("far", Category::Other, date(2025, 1, 30)), None).unwrap();

        let names: Vec<String> = store
            .expiring(3, today)
            .unwrap()
            .into_iter()
            .map(|s| s.item.name)
            .collect();
        assert_eq!(names, vec!["expired", "later"]);
    }

    #[test]
    fn test_expiring_with_huge_window_saturates() {
        let today = date(2025, 1, 1);
        let store = MemoryStore::new();
        store.create(item("expired", Category::Other, date(2024, 12, 30)), None).unwrap();
        store.create(item("far", Category::Other, date(2030, 1, 1)), None).unwrap();

        assert_eq!(store.expiring(1_000_000_000, today).unwrap().len(), 2);
        assert_eq!(store.expiring(i64::MAX, today).unwrap().len(), 2);
        assert!(store.expiring(-1_000_000_000, today).unwrap().is_empty());
        assert!(store.expiring(i64::MIN, today).unwrap().is_empty());
    }

    #[test]
    fn test_stats() {
        let today = date(2025, 1, 10);
        let store = MemoryStore::new();
        assert_eq!(
            store.stats(today).unwrap(),
            FridgeStats { total_items: 0, expiring_items: 0, categories_count: 0, space_used: 0 }
        );

        store.create(item("雞蛋", Category::Dairy, date(2025, 1, 12)), None).unwrap();
        store.create(item("牛奶", Category::Dairy, date(2025, 1, 20)), None).unwrap();
        store.create(item("蔥", Category::Produce, date(2025, 1, 15)), None).unwrap();

        let stats = store.stats(today).unwrap();
        assert_eq!(stats.total_items, 3);
        assert_eq!(stats.expiring_items, 2);
        assert_eq!(stats.categories_count, 2);
        assert_eq!(stats.space_used, 10);
    }

    #[test]
    fn test_space_used_is_capped() {
        let store = MemoryStore::new();
        for i in 0..45 {
            store.create(item(&format!("item{}", i), Category::Snacks, date(2025, 2, 1)), None).unwrap();
        }
        assert_eq!(store.stats(date(2025, 1, 1)).unwrap().space_used, 100);
    }
}
