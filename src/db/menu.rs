//! Menu item repository.

use chrono::Utc;
use serde::Deserialize;
use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use validator::Validate;

use crate::error::{HotelError, HotelResult};
use crate::models::{DietaryTag, MAX_DESCRIPTION_CHARS, MenuCategory, MenuItem};

/// Fields for a new menu item.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewMenuItem {
    /// Display name; unique ignoring case.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Description.
    #[validate(length(max = MAX_DESCRIPTION_CHARS))]
    pub description: Option<String>,
    /// Price; must be positive.
    #[validate(range(exclusive_min = 0.0))]
    pub price: f64,
    /// Menu section.
    pub category: MenuCategory,
    /// Dietary labels.
    #[serde(default)]
    pub dietary_tags: Vec<DietaryTag>,
    /// Currently orderable.
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

/// Partial menu item update.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MenuItemUpdate {
    /// New name.
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    /// New description.
    #[validate(length(max = MAX_DESCRIPTION_CHARS))]
    pub description: Option<String>,
    /// New price.
    #[validate(range(exclusive_min = 0.0))]
    pub price: Option<f64>,
    /// New section.
    pub category: Option<MenuCategory>,
    /// Replacement dietary labels.
    pub dietary_tags: Option<Vec<DietaryTag>>,
    /// New availability.
    pub is_available: Option<bool>,
}

/// Listing filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuFilter {
    /// Only this section.
    pub category: Option<MenuCategory>,
    /// Only items carrying this label.
    pub dietary_tag: Option<DietaryTag>,
}

/// Access to the `menu_items` table.
#[derive(Debug, Clone)]
pub struct MenuRepository {
    pool: SqlitePool,
}

impl MenuRepository {
    /// Creates a repository over `pool`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts an item; a name already on the menu (ignoring case) is a conflict.
    pub async fn create(&self, data: NewMenuItem) -> HotelResult<MenuItem> {
        self.ensure_name_free(&data.name, None).await?;
        let now = Utc::now();
        let item = sqlx::query_as::<_, MenuItem>(
            "INSERT INTO menu_items (name, description, price, category, dietary_tags, is_available, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(data.name.trim())
        .bind(&data.description)
        .bind(data.price)
        .bind(data.category)
        .bind(Json(&data.dietary_tags))
        .bind(data.is_available)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| HotelError::from_unique_violation(e, "A menu item with this name already exists"))?;
        Ok(item)
    }

    /// Finds an item by id.
    pub async fn find_by_id(&self, id: i64) -> HotelResult<Option<MenuItem>> {
        let item = sqlx::query_as::<_, MenuItem>("SELECT * FROM menu_items WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(item)
    }

    /// Items ordered by category then name, optionally filtered.
    pub async fn find_all(&self, filter: &MenuFilter) -> HotelResult<Vec<MenuItem>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM menu_items WHERE 1 = 1");
        if let Some(category) = filter.category {
            qb.push(" AND category = ").push_bind(category);
        }
        if let Some(tag) = filter.dietary_tag {
            qb.push(" AND EXISTS (SELECT 1 FROM json_each(menu_items.dietary_tags) WHERE json_each.value = ")
                .push_bind(tag.as_str())
                .push(")");
        }
        qb.push(" ORDER BY category, name");

        let items = qb.build_query_as::<MenuItem>().fetch_all(&self.pool).await?;
        Ok(items)
    }

    /// Applies a partial update with the same rules as creation.
    pub async fn update(&self, id: i64, data: MenuItemUpdate) -> HotelResult<MenuItem> {
        if let Some(name) = &data.name {
            self.ensure_name_free(name, Some(id)).await?;
        }
        let item = sqlx::query_as::<_, MenuItem>(
            "UPDATE menu_items SET
                name = COALESCE(?, name),
                description = COALESCE(?, description),
                price = COALESCE(?, price),
                category = COALESCE(?, category),
                dietary_tags = COALESCE(?, dietary_tags),
                is_available = COALESCE(?, is_available),
                updated_at = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(data.name.as_deref().map(str::trim))
        .bind(data.description)
        .bind(data.price)
        .bind(data.category)
        .bind(data.dietary_tags.map(Json))
        .bind(data.is_available)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| HotelError::from_unique_violation(e, "A menu item with this name already exists"))?
        .ok_or_else(|| HotelError::not_found("Menu item", id))?;
        Ok(item)
    }

    /// Deletes an item.
    pub async fn delete(&self, id: i64) -> HotelResult<()> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(HotelError::not_found("Menu item", id));
        }
        Ok(())
    }

    async fn ensure_name_free(&self, name: &str, except: Option<i64>) -> HotelResult<()> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM menu_items WHERE lower(name) = lower(?) AND id != COALESCE(?, -1))",
        )
        .bind(name.trim())
        .bind(except)
        .fetch_one(&self.pool)
        .await?;
        if taken {
            return Err(HotelError::conflict(format!(
                "A menu item named '{}' already exists",
                name.trim()
            )));
        }
        Ok(())
    }
}
