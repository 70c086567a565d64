use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "乳製品", alias = "dairy")]
    Dairy,
    #[serde(rename = "肉類", alias = "meat")]
    Meat,
    #[serde(rename = "蔬菜水果", alias = "produce")]
    Produce,
    #[serde(rename = "飲料", alias = "beverages")]
    Beverages,
    #[serde(rename = "調味料", alias = "condiments")]
    Condiments,
    #[serde(rename = "剩菜", alias = "leftovers")]
    Leftovers,
    #[serde(rename = "零食", alias = "snacks")]
    Snacks,
    #[serde(rename = "其他", alias = "other")]
    Other,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Dairy => "乳製品",
            Category::Meat => "肉類",
            Category::Produce => "蔬菜水果",
            Category::Beverages => "飲料",
            Category::Condiments => "調味料",
            Category::Leftovers => "剩菜",
            Category::Snacks => "零食",
            Category::Other => "其他",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Physical storage location inside the fridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Compartment {
    #[serde(rename = "頂層架", alias = "top-shelf")]
    TopShelf,
    #[serde(rename = "中層架1", alias = "middle-shelf-1")]
    MiddleShelf1,
    #[serde(rename = "中層架2", alias = "middle-shelf-2")]
    MiddleShelf2,
    #[serde(rename = "中層架3", alias = "middle-shelf-3")]
    MiddleShelf3,
    #[serde(rename = "底層架", alias = "bottom-shelf")]
    BottomShelf,
    #[serde(rename = "蔬果盒", alias = "crisper")]
    Crisper,
    #[serde(rename = "左門頂層", alias = "left-door-top")]
    LeftDoorTop,
    #[serde(rename = "左門上層", alias = "left-door-upper")]
    LeftDoorUpper,
    #[serde(rename = "左門下層", alias = "left-door-lower")]
    LeftDoorLower,
    #[serde(rename = "左門底層", alias = "left-door-bottom")]
    LeftDoorBottom,
    #[serde(rename = "右門頂層", alias = "right-door-top")]
    RightDoorTop,
    #[serde(rename = "右門上層", alias = "right-door-upper")]
    RightDoorUpper,
    #[serde(rename = "右門下層", alias = "right-door-lower")]
    RightDoorLower,
    #[serde(rename = "右門底層", alias = "right-door-bottom")]
    RightDoorBottom,
}

impl Compartment {
    pub fn label(&self) -> &'static str {
        match self {
            Compartment::TopShelf => "頂層架",
            Compartment::MiddleShelf1 => "中層架1",
            Compartment::MiddleShelf2 => "中層架2",
            Compartment::MiddleShelf3 => "中層架3",
            Compartment::BottomShelf => "底層架",
            Compartment::Crisper => "蔬果盒",
            Compartment::LeftDoorTop => "左門頂層",
            Compartment::LeftDoorUpper => "左門上層",
            Compartment::LeftDoorLower => "左門下層",
            Compartment::LeftDoorBottom => "左門底層",
            Compartment::RightDoorTop => "右門頂層",
            Compartment::RightDoorUpper => "右門上層",
            Compartment::RightDoorLower => "右門下層",
            Compartment::RightDoorBottom => "右門底層",
        }
    }
}

impl fmt::Display for Compartment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A food item as the engine sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub name: String,
    pub category: Category,
    pub compartment: Compartment,
    pub expiry_date: NaiveDate,
}

impl InventoryItem {
    pub fn new(
        name: impl Into<String>,
        category: Category,
        compartment: Compartment,
        expiry_date: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            compartment,
            expiry_date,
        }
    }
}

/// An item owned by the store, with its identity and bookkeeping fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredItem {
    pub id: u64,
    #[serde(flatten)]
    pub item: InventoryItem,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Partial update applied by `MemoryStore::update`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub compartment: Option<Compartment>,
    pub expiry_date: Option<NaiveDate>,
    pub image_path: Option<String>,
}
