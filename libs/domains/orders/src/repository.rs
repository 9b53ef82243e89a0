//! Order repository trait

use async_trait::async_trait;
use axum_helpers::Pagination;
use uuid::Uuid;

use crate::error::OrderResult;
use crate::models::{Order, OrderFilter, OrderScope, OrderStatus, Payment, TimelineEntry};

/// Repository trait for order storage operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Store a new order
    async fn create(&self, order: Order) -> OrderResult<Order>;

    /// Get order by ID
    async fn get_by_id(&self, id: Uuid) -> OrderResult<Option<Order>>;

    /// Orders visible in `scope`, newest first
    async fn list(
        &self,
        scope: OrderScope,
        filter: OrderFilter,
        page: Pagination,
    ) -> OrderResult<Vec<Order>>;

    async fn count(&self, scope: OrderScope, filter: OrderFilter) -> OrderResult<u64>;

    /// Next value of the order-number sequence, starting at 1
    async fn next_sequence(&self) -> OrderResult<u64>;

    /// Apply a status change recorded in `entry`, only if the stored status is
    /// still `from`. Returns `None` when the order moved underneath us.
    async fn save_transition(
        &self,
        id: Uuid,
        from: OrderStatus,
        entry: TimelineEntry,
    ) -> OrderResult<Option<Order>>;

    /// Overwrite the payment sub-document
    async fn save_payment(&self, id: Uuid, payment: Payment) -> OrderResult<()>;
}
