//! Order documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bazaar_core::{OrderId, Price, UserId};

/// A checked-out order.
///
/// `items` is a frozen snapshot: it holds names and prices, not item
/// references, so later catalog edits never change a stored order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderLine>,
    pub total_price: Price,
    pub order_date: DateTime<Utc>,
}

/// One line of an order snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub name: String,
    pub price: Price,
    pub qty: i64,
}
