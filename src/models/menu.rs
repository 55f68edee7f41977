//! Restaurant menu model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

/// Menu section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
pub enum MenuCategory {
    /// Starters.
    Starters,
    /// Main course.
    #[serde(rename = "Main Course")]
    #[sqlx(rename = "Main Course")]
    MainCourse,
    /// Desserts.
    Desserts,
    /// Beverages.
    Beverages,
    /// Special offers.
    #[serde(rename = "Special Offers")]
    #[sqlx(rename = "Special Offers")]
    SpecialOffers,
}

/// Dietary label on a menu item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DietaryTag {
    /// No meat or fish.
    Vegetarian,
    /// No animal products.
    Vegan,
    /// No gluten.
    #[serde(rename = "Gluten-Free")]
    GlutenFree,
    /// Allergen warning.
    #[serde(rename = "Contains Nuts")]
    ContainsNuts,
}

impl DietaryTag {
    /// The label stored inside the `dietary_tags` JSON array.
    pub fn as_str(self) -> &'static str {
        match self {
            DietaryTag::Vegetarian => "Vegetarian",
            DietaryTag::Vegan => "Vegan",
            DietaryTag::GlutenFree => "Gluten-Free",
            DietaryTag::ContainsNuts => "Contains Nuts",
        }
    }
}

/// Longest accepted item description, in characters.
pub const MAX_DESCRIPTION_CHARS: u64 = 500;

/// A dish or drink on the menu.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MenuItem {
    /// Primary key.
    pub id: i64,
    /// Display name; unique ignoring case.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Price.
    pub price: f64,
    /// Menu section.
    pub category: MenuCategory,
    /// Dietary labels.
    pub dietary_tags: Json<Vec<DietaryTag>>,
    /// Currently orderable.
    pub is_available: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}
