use serde::{Deserialize, Serialize};

/// Lifecycle of an order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Shipped,
    Delivered,
}

/// A customer order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order identifier
    #[swagger(read_only)]
    pub id: u64,
    /// Ordered lines
    #[validate(count(min = 1))]
    pub lines: Vec<OrderLine>,
    pub status: OrderStatus,
    /// Note for the back office
    #[swagger(groups("admin"))]
    pub internal_note: Option<String>,
    #[serde(skip)]
    pub cache_key: String,
}

/// One line of an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    #[validate(length(min = 1, max = 64), not_blank)]
    pub sku: String,
    #[validate(range(min = 1, max = 100))]
    pub quantity: u32,
}

/// No order matches
#[derive(Debug)]
pub struct NotFound {
    pub message: String,
}

pub struct OrderController;

impl OrderController {
    /// List orders.
    ///
    /// @param page: int Page number
    /// @return Vec<Order>
    #[swagger(get = "/orders", tag = "orders", param(location = "query", name = "page", type = "integer"))]
    pub fn list(&self, page: u32) -> Vec<Order> {
        let _ = page;
        Vec::new()
    }

    /// Show an order.
    ///
    /// @param id: u64 Order identifier
    /// @return Order
    /// @throws NotFound
    #[swagger(get = "/orders/{id}", tag = "orders", param(location = "path", name = "id"))]
    pub fn show(&self, id: u64) -> Result<Order, NotFound> {
        Err(NotFound {
            message: format!("no order {}", id),
        })
    }

    /// Delete an order.
    ///
    /// @param id: u64 Order identifier
    /// @return ()
    #[deprecated]
    #[swagger(delete = "/orders/{id}", tag = "orders", param(location = "path", name = "id"))]
    pub fn delete(&self, id: u64) {
        let _ = id;
    }

    fn audit(&self) {}
}
