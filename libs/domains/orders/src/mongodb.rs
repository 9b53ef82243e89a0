//! MongoDB implementation of OrderRepository

use async_trait::async_trait;
use axum_helpers::Pagination;
use chrono::Utc;
use database::mongodb::query::{bson_of, id_filter};
use futures_util::TryStreamExt;
use mongodb::bson::{Bson, Document, doc, to_bson};
use mongodb::options::{FindOptions, IndexOptions, ReturnDocument};
use mongodb::{Collection, Database, IndexModel};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{OrderError, OrderResult};
use crate::models::{Order, OrderFilter, OrderScope, OrderStatus, Payment, TimelineEntry};
use crate::repository::OrderRepository;

/// Counter document backing order numbers
const ORDER_COUNTER: &str = "orders";

/// MongoDB-based order repository
#[derive(Clone)]
pub struct MongoOrderRepository {
    collection: Collection<Order>,
    counters: Collection<Document>,
}

impl MongoOrderRepository {
    /// Create a new MongoDB order repository
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection("orders"),
            counters: database.collection("counters"),
        }
    }

    /// Create indexes for efficient querying
    pub async fn create_indexes(&self) -> OrderResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "orderNumber": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_order_number".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "customer": 1, "createdAt": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_customer_created".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "artisan": 1, "createdAt": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_artisan_created".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Order indexes created successfully");
        Ok(())
    }

    fn build_filter(scope: OrderScope, filter: &OrderFilter) -> Document {
        let mut doc = match scope {
            OrderScope::Customer(id) => doc! { "customer": bson_of(&id) },
            OrderScope::Artisan(id) => doc! { "artisan": bson_of(&id) },
        };

        if let Some(status) = filter.status {
            doc.insert("status", status.to_string());
        }

        doc
    }
}

#[async_trait]
impl OrderRepository for MongoOrderRepository {
    #[instrument(skip(self, order), fields(order_id = %order.id, order_number = %order.order_number))]
    async fn create(&self, order: Order) -> OrderResult<Order> {
        self.collection.insert_one(&order).await?;
        tracing::info!(
            customer_id = %order.customer,
            artisan_id = %order.artisan,
            total = order.pricing.total,
            "Order created"
        );
        Ok(order)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> OrderResult<Option<Order>> {
        let order = self.collection.find_one(id_filter(&id)).await?;
        Ok(order)
    }

    #[instrument(skip(self))]
    async fn list(
        &self,
        scope: OrderScope,
        filter: OrderFilter,
        page: Pagination,
    ) -> OrderResult<Vec<Order>> {
        let options = FindOptions::builder()
            .sort(doc! { "createdAt": -1 })
            .skip(page.skip())
            .limit(page.limit as i64)
            .build();

        let cursor = self
            .collection
            .find(Self::build_filter(scope, &filter))
            .with_options(options)
            .await?;
        let orders: Vec<Order> = cursor.try_collect().await?;
        Ok(orders)
    }

    #[instrument(skip(self))]
    async fn count(&self, scope: OrderScope, filter: OrderFilter) -> OrderResult<u64> {
        let count = self
            .collection
            .count_documents(Self::build_filter(scope, &filter))
            .await?;
        Ok(count)
    }

    #[instrument(skip(self))]
    async fn next_sequence(&self) -> OrderResult<u64> {
        let counter = self
            .counters
            .find_one_and_update(
                doc! { "_id": ORDER_COUNTER },
                doc! { "$inc": { "seq": 1_i64 } },
            )
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| OrderError::Internal("Order counter was not created".to_string()))?;

        match counter.get("seq") {
            Some(Bson::Int64(seq)) => Ok(*seq as u64),
            Some(Bson::Int32(seq)) => Ok(*seq as u64),
            _ => Err(OrderError::Internal(
                "Order counter has no numeric sequence".to_string(),
            )),
        }
    }

    #[instrument(skip(self, entry), fields(to = %entry.status))]
    async fn save_transition(
        &self,
        id: Uuid,
        from: OrderStatus,
        entry: TimelineEntry,
    ) -> OrderResult<Option<Order>> {
        let mut filter = id_filter(&id);
        filter.insert("status", from.to_string());

        let update = doc! {
            "$set": {
                "status": entry.status.to_string(),
                "updatedAt": bson_of(&entry.timestamp),
            },
            "$push": { "timeline": to_bson(&entry)? },
        };

        let order = self
            .collection
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .await?;

        if order.is_some() {
            tracing::info!(order_id = %id, from = %from, to = %entry.status, "Order status updated");
        }
        Ok(order)
    }

    #[instrument(skip(self, payment), fields(status = %payment.status))]
    async fn save_payment(&self, id: Uuid, payment: Payment) -> OrderResult<()> {
        let update = doc! {
            "$set": {
                "payment": to_bson(&payment)?,
                "updatedAt": bson_of(&Utc::now()),
            }
        };

        let result = self.collection.update_one(id_filter(&id), update).await?;
        if result.matched_count == 0 {
            return Err(OrderError::NotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_by_scope() {
        let id = Uuid::now_v7();

        let customer = MongoOrderRepository::build_filter(OrderScope::Customer(id), &OrderFilter::default());
        assert_eq!(customer.len(), 1);
        assert_eq!(customer.get("customer"), Some(&bson_of(&id)));

        let artisan = MongoOrderRepository::build_filter(OrderScope::Artisan(id), &OrderFilter::default());
        assert!(artisan.contains_key("artisan"));
        assert!(!artisan.contains_key("customer"));
    }

    #[test]
    fn test_filter_by_status() {
        let filter = OrderFilter {
            status: Some(OrderStatus::InProduction),
            ..Default::default()
        };
        let doc = MongoOrderRepository::build_filter(OrderScope::Customer(Uuid::now_v7()), &filter);
        assert_eq!(doc.get_str("status").unwrap(), "in_production");
    }
}
