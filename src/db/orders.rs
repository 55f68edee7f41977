//! Room-service order repository.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::SqlitePool;
use sqlx::types::Json;
use validator::{Validate, ValidationError};

use crate::error::{HotelError, HotelResult};
use crate::models::{Order, OrderItem, OrderStatus, order_total};

use super::decimal_to_f64;

/// Fields for a new order; the total is computed from the items.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewOrder {
    /// Ordered lines.
    #[validate(custom(function = "validate_items"))]
    pub items: Vec<OrderItem>,
    /// Delivery room.
    #[validate(length(min = 1, max = 20))]
    pub room_number: Option<String>,
    /// Notes for the kitchen.
    #[validate(length(max = 500))]
    pub special_notes: Option<String>,
}

/// Partial order update. New items recompute the total.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct OrderUpdate {
    /// Replacement lines.
    #[validate(custom(function = "validate_items"))]
    pub items: Option<Vec<OrderItem>>,
    /// New delivery room.
    #[validate(length(min = 1, max = 20))]
    pub room_number: Option<String>,
    /// New kitchen progress.
    pub status: Option<OrderStatus>,
    /// New notes.
    #[validate(length(max = 500))]
    pub special_notes: Option<String>,
}

fn validate_items(items: &[OrderItem]) -> Result<(), ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::new("empty").with_message("an order needs at least one item".into()));
    }
    for item in items {
        if item.quantity == 0 {
            return Err(ValidationError::new("quantity").with_message("quantity must be at least 1".into()));
        }
        if item.price < Decimal::ZERO {
            return Err(ValidationError::new("price").with_message("price cannot be negative".into()));
        }
        if item.name.trim().is_empty() {
            return Err(ValidationError::new("name").with_message("item name is required".into()));
        }
    }
    Ok(())
}

/// Access to the `orders` table.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a repository over `pool`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a pending order for `user_id`.
    pub async fn create(&self, user_id: i64, data: NewOrder) -> HotelResult<Order> {
        let now = Utc::now();
        let total = order_total(&data.items);
        let order = sqlx::query_as::<_, Order>(
            "INSERT INTO orders (user_id, room_number, items, total_price, status, special_notes, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(user_id)
        .bind(&data.room_number)
        .bind(Json(&data.items))
        .bind(decimal_to_f64(total))
        .bind(OrderStatus::Pending)
        .bind(&data.special_notes)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(order)
    }

    /// Finds an order by id.
    pub async fn find_by_id(&self, id: i64) -> HotelResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(order)
    }

    /// All orders, newest first.
    pub async fn find_all(&self) -> HotelResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>("SELECT * FROM orders ORDER BY created_at DESC, id DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(orders)
    }

    /// Orders placed by one account, newest first.
    pub async fn find_by_user(&self, user_id: i64) -> HotelResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    /// Applies a partial update.
    pub async fn update(&self, id: i64, data: OrderUpdate) -> HotelResult<Order> {
        let total = data.items.as_deref().map(|items| decimal_to_f64(order_total(items)));
        let order = sqlx::query_as::<_, Order>(
            "UPDATE orders SET
                items = COALESCE(?, items),
                total_price = COALESCE(?, total_price),
                room_number = COALESCE(?, room_number),
                status = COALESCE(?, status),
                special_notes = COALESCE(?, special_notes),
                updated_at = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(data.items.map(Json))
        .bind(total)
        .bind(data.room_number)
        .bind(data.status)
        .bind(data.special_notes)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| HotelError::not_found("Order", id))?;
        Ok(order)
    }

    /// Deletes an order.
    pub async fn delete(&self, id: i64) -> HotelResult<()> {
        let result = sqlx::query("DELETE FROM orders WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(HotelError::not_found("Order", id));
        }
        Ok(())
    }
}
