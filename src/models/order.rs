//! Room-service order model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use crate::error::HotelError;

/// Kitchen progress of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Received.
    Pending,
    /// In the kitchen.
    Preparing,
    /// Handed over.
    Delivered,
    /// Called off.
    Cancelled,
}

impl OrderStatus {
    /// The lowercase label stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = HotelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "preparing" => Ok(OrderStatus::Preparing),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(HotelError::InvalidStatus {
                entity: "order",
                value: other.to_string(),
            }),
        }
    }
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Menu item ordered, if it came from the menu.
    #[serde(default)]
    pub menu_item_id: Option<i64>,
    /// Display name.
    pub name: String,
    /// Count, at least one.
    pub quantity: u32,
    /// Unit price.
    pub price: Decimal,
}

impl OrderItem {
    /// quantity × price.
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.price
    }
}

/// Sum of all line totals.
pub fn order_total(items: &[OrderItem]) -> Decimal {
    items.iter().map(OrderItem::line_total).sum()
}

/// A room-service order.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    /// Primary key.
    pub id: i64,
    /// Ordering account.
    pub user_id: Option<i64>,
    /// Delivery room.
    pub room_number: Option<String>,
    /// Ordered lines.
    pub items: Json<Vec<OrderItem>>,
    /// Order total.
    pub total_price: f64,
    /// Kitchen progress.
    pub status: OrderStatus,
    /// Notes for the kitchen.
    pub special_notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_order_total_sums_quantity_times_price() {
        let items = vec![
            OrderItem {
                menu_item_id: Some(1),
                name: "Soup".to_string(),
                quantity: 2,
                price: dec("6.50"),
            },
            OrderItem {
                menu_item_id: None,
                name: "Tea".to_string(),
                quantity: 3,
                price: dec("2.10"),
            },
        ];
        assert_eq!(order_total(&items), dec("19.30"));
    }

    #[test]
    fn test_empty_order_total_is_zero() {
        assert_eq!(order_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_item_accepts_numeric_price() {
        let item: OrderItem =
            serde_json::from_str(r#"{"name": "Coffee", "quantity": 1, "price": 3.5}"#).unwrap();
        assert_eq!(item.price, dec("3.5"));
        assert!(item.menu_item_id.is_none());
    }
}
