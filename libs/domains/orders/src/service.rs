//! Order service layer

use axum_helpers::Pagination;
use chrono::Utc;
use domain_users::{AuthUser, Role};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::catalog::ProductCatalog;
use crate::error::{OrderError, OrderResult};
use crate::models::{
    CreateOrder, MessageResponse, Order, OrderFilter, OrderItem, OrderListResponse, OrderScope,
    Pricing, ShippingDetails, UpdatePayment, UpdateStatus, format_order_number,
};
use crate::repository::OrderRepository;

/// Default page size for order history
pub const ORDER_PAGE_SIZE: u64 = 10;

/// Order service: checkout, history and fulfilment updates
pub struct OrderService<R: OrderRepository, C: ProductCatalog> {
    repository: Arc<R>,
    catalog: Arc<C>,
}

impl<R: OrderRepository, C: ProductCatalog> OrderService<R, C> {
    pub fn new(repository: R, catalog: C) -> Self {
        Self {
            repository: Arc::new(repository),
            catalog: Arc::new(catalog),
        }
    }

    /// Price the cart from current catalog prices and place the order.
    ///
    /// The whole order is attributed to the owner of the first item's product.
    #[instrument(skip(self, input), fields(items = input.items.len()))]
    pub async fn create(&self, customer: Uuid, input: CreateOrder) -> OrderResult<Order> {
        input.validate()?;

        let mut items = Vec::with_capacity(input.items.len());
        let mut artisan = None;
        for line in input.items {
            let product = self
                .catalog
                .find(line.product)
                .await?
                .ok_or(OrderError::ProductNotFound(line.product))?;

            if !product.available {
                return Err(OrderError::OutOfStock(product.title));
            }

            artisan.get_or_insert(product.artisan);
            items.push(OrderItem {
                product: product.id,
                quantity: line.quantity,
                price: product.price,
                customizations: line.customizations,
            });
        }
        let artisan = artisan
            .ok_or_else(|| OrderError::Validation("At least one item is required".to_string()))?;

        // Reject before consuming an order number
        Pricing::from_items(&items)?;

        let sequence = self.repository.next_sequence().await?;
        let order_number = format_order_number(Utc::now().timestamp_millis(), sequence);

        let shipping = ShippingDetails {
            address: input.shipping.address,
            method: input.shipping.method,
            tracking_number: None,
            estimated_delivery: None,
            actual_delivery: None,
        };

        let order = Order::new(order_number, customer, artisan, items, shipping, input.notes)?;
        self.repository.create(order).await
    }

    /// Artisans see orders attributed to them; everyone else sees what they bought.
    #[instrument(skip(self, caller), fields(user_id = %caller.id))]
    pub async fn list(&self, caller: &AuthUser, filter: OrderFilter) -> OrderResult<OrderListResponse> {
        let scope = match caller.role {
            Role::Artisan => OrderScope::Artisan(caller.id),
            Role::Vendor | Role::Customer => OrderScope::Customer(caller.id),
        };

        let page = Pagination::new(filter.page, filter.limit, ORDER_PAGE_SIZE);
        let orders = self.repository.list(scope, filter.clone(), page).await?;
        let total = self.repository.count(scope, filter).await?;

        Ok(OrderListResponse {
            orders,
            total_pages: page.total_pages(total),
            current_page: page.page,
            total,
        })
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid, caller: Uuid) -> OrderResult<Order> {
        let order = self.load(id).await?;
        if !order.involves(caller) {
            return Err(access_denied());
        }
        Ok(order)
    }

    #[instrument(skip(self, caller, input), fields(user_id = %caller.id, status = %input.status))]
    pub async fn update_status(
        &self,
        id: Uuid,
        caller: &AuthUser,
        input: UpdateStatus,
    ) -> OrderResult<Order> {
        input.validate()?;

        let mut order = self.load(id).await?;
        if caller.role != Role::Artisan || order.artisan != caller.id {
            return Err(access_denied());
        }

        let from = order.status;
        let entry = order.transition(input.status, input.note)?;

        self.repository
            .save_transition(id, from, entry)
            .await?
            .ok_or_else(|| {
                OrderError::Validation(
                    "Order status changed while updating; reload and try again".to_string(),
                )
            })
    }

    #[instrument(skip(self, input), fields(status = %input.payment_status))]
    pub async fn update_payment(
        &self,
        id: Uuid,
        caller: Uuid,
        input: UpdatePayment,
    ) -> OrderResult<MessageResponse> {
        input.validate()?;

        let mut order = self.load(id).await?;
        if !order.involves(caller) {
            return Err(access_denied());
        }

        order.record_payment(input.payment_status, input.transaction_id);
        self.repository.save_payment(id, order.payment).await?;

        info!(order_id = %id, user_id = %caller, "Payment status updated");
        Ok(MessageResponse {
            message: "Payment status updated successfully".to_string(),
        })
    }

    async fn load(&self, id: Uuid) -> OrderResult<Order> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(OrderError::NotFound(id))
    }
}

fn access_denied() -> OrderError {
    OrderError::Forbidden("Access denied".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogProduct, MockProductCatalog};
    use crate::models::{OrderStatus, PaymentStatus, ShippingAddress};
    use crate::repository::MockOrderRepository;
    use serde_json::json;

    fn user(role: Role) -> AuthUser {
        AuthUser {
            id: Uuid::now_v7(),
            email: format!("{role}@example.com"),
            role,
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
        }
    }

    fn catalog_product(artisan: Uuid, price: i64, available: bool) -> CatalogProduct {
        CatalogProduct {
            id: Uuid::now_v7(),
            title: "Hand-Thrown Ceramic Bowl Set".to_string(),
            artisan,
            price,
            available,
        }
    }

    fn checkout(products: &[(Uuid, u32)]) -> CreateOrder {
        let items: Vec<_> = products
            .iter()
            .map(|(id, quantity)| json!({ "product": id, "quantity": quantity }))
            .collect();
        serde_json::from_value(json!({
            "items": items,
            "shipping": { "address": { "city": "New York", "country": "USA" } },
            "notes": "Gift wrap please"
        }))
        .unwrap()
    }

    fn stored_order(customer: Uuid, artisan: Uuid) -> Order {
        Order::new(
            format_order_number(1_700_000_000_000, 1),
            customer,
            artisan,
            vec![OrderItem {
                product: Uuid::now_v7(),
                quantity: 1,
                price: 8_500,
                customizations: vec![],
            }],
            ShippingDetails {
                address: ShippingAddress::default(),
                method: None,
                tracking_number: None,
                estimated_delivery: None,
                actual_delivery: None,
            },
            None,
        )
        .unwrap()
    }

    fn catalog_of(products: Vec<CatalogProduct>) -> MockProductCatalog {
        let mut catalog = MockProductCatalog::new();
        catalog
            .expect_find()
            .returning(move |id| Ok(products.iter().find(|p| p.id == id).cloned()));
        catalog
    }

    #[tokio::test]
    async fn test_create_prices_from_catalog() {
        let artisan = Uuid::now_v7();
        let bowl = catalog_product(artisan, 4_000, true);
        let input = checkout(&[(bowl.id, 3)]);

        let mut repo = MockOrderRepository::new();
        repo.expect_next_sequence().times(1).returning(|| Ok(42));
        repo.expect_create().returning(Ok);

        let service = OrderService::new(repo, catalog_of(vec![bowl]));
        let customer = Uuid::now_v7();
        let order = service.create(customer, input).await.unwrap();

        assert_eq!(order.customer, customer);
        assert_eq!(order.artisan, artisan);
        assert_eq!(order.items[0].price, 4_000);
        assert_eq!(order.pricing.subtotal, 12_000);
        assert_eq!(order.pricing.shipping, 0);
        assert_eq!(order.pricing.tax, 960);
        assert_eq!(order.pricing.total, 12_960);
        assert!(order.order_number.starts_with("ART-"));
        assert!(order.order_number.ends_with("-0042"));
        assert_eq!(order.notes.customer.as_deref(), Some("Gift wrap please"));
    }

    #[tokio::test]
    async fn test_create_attributes_first_artisan() {
        let first = catalog_product(Uuid::now_v7(), 1_000, true);
        let second = catalog_product(Uuid::now_v7(), 2_000, true);
        let input = checkout(&[(first.id, 1), (second.id, 2)]);
        let expected = first.artisan;

        let mut repo = MockOrderRepository::new();
        repo.expect_next_sequence().returning(|| Ok(1));
        repo.expect_create().returning(Ok);

        let service = OrderService::new(repo, catalog_of(vec![first, second]));
        let order = service.create(Uuid::now_v7(), input).await.unwrap();

        assert_eq!(order.artisan, expected);
        assert_eq!(order.pricing.subtotal, 5_000);
        assert_eq!(order.pricing.total, 6_900);
    }

    #[tokio::test]
    async fn test_create_unknown_product() {
        let missing = Uuid::now_v7();

        let mut repo = MockOrderRepository::new();
        repo.expect_next_sequence().never();
        repo.expect_create().never();

        let service = OrderService::new(repo, catalog_of(vec![]));
        let result = service.create(Uuid::now_v7(), checkout(&[(missing, 1)])).await;
        assert!(matches!(result, Err(OrderError::ProductNotFound(id)) if id == missing));
    }

    #[tokio::test]
    async fn test_create_out_of_stock() {
        let sold_out = catalog_product(Uuid::now_v7(), 1_000, false);
        let input = checkout(&[(sold_out.id, 1)]);

        let mut repo = MockOrderRepository::new();
        repo.expect_create().never();

        let service = OrderService::new(repo, catalog_of(vec![sold_out]));
        let result = service.create(Uuid::now_v7(), input).await;
        assert!(matches!(result, Err(OrderError::OutOfStock(title)) if title == "Hand-Thrown Ceramic Bowl Set"));
    }

    #[tokio::test]
    async fn test_create_rejects_total_beyond_i64() {
        let pricey = catalog_product(Uuid::now_v7(), 3_000_000_000, true);
        let input = checkout(&[(pricey.id, 4_000_000_000)]);

        let mut repo = MockOrderRepository::new();
        repo.expect_next_sequence().never();
        repo.expect_create().never();

        let service = OrderService::new(repo, catalog_of(vec![pricey]));
        let result = service.create(Uuid::now_v7(), input).await;
        assert!(matches!(result, Err(OrderError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_cart_before_lookup() {
        let mut catalog = MockProductCatalog::new();
        catalog.expect_find().never();

        let service = OrderService::new(MockOrderRepository::new(), catalog);
        let result = service.create(Uuid::now_v7(), checkout(&[])).await;
        assert!(matches!(result, Err(OrderError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_list_scope_follows_role() {
        let artisan = user(Role::Artisan);
        let artisan_id = artisan.id;

        let mut repo = MockOrderRepository::new();
        repo.expect_list()
            .withf(move |scope, _, page| {
                *scope == OrderScope::Artisan(artisan_id) && page.limit == ORDER_PAGE_SIZE
            })
            .returning(|_, _, _| Ok(vec![]));
        repo.expect_count().returning(|_, _| Ok(0));

        let service = OrderService::new(repo, MockProductCatalog::new());
        let response = service.list(&artisan, OrderFilter::default()).await.unwrap();
        assert_eq!(response.total, 0);
        assert_eq!(response.current_page, 1);

        let vendor = user(Role::Vendor);
        let vendor_id = vendor.id;
        let mut repo = MockOrderRepository::new();
        repo.expect_list()
            .withf(move |scope, _, _| *scope == OrderScope::Customer(vendor_id))
            .returning(|_, _, _| Ok(vec![]));
        repo.expect_count().returning(|_, _| Ok(0));

        let service = OrderService::new(repo, MockProductCatalog::new());
        service.list(&vendor, OrderFilter::default()).await.unwrap();
    }

    #[tokio::test]
    async fn test_get_by_stranger_is_denied() {
        let order = stored_order(Uuid::now_v7(), Uuid::now_v7());
        let id = order.id;

        let mut repo = MockOrderRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(order.clone())));

        let service = OrderService::new(repo, MockProductCatalog::new());
        let result = service.get(id, Uuid::now_v7()).await;
        assert!(matches!(result, Err(OrderError::Forbidden(msg)) if msg == "Access denied"));
    }

    #[tokio::test]
    async fn test_update_status_by_owning_artisan() {
        let artisan = user(Role::Artisan);
        let order = stored_order(Uuid::now_v7(), artisan.id);
        let id = order.id;
        let stored = order.clone();

        let mut repo = MockOrderRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        repo.expect_save_transition()
            .withf(|_, from, entry| {
                *from == OrderStatus::Pending
                    && entry.status == OrderStatus::Confirmed
                    && entry.note.as_deref() == Some("Status updated to confirmed")
            })
            .times(1)
            .returning(move |_, _, entry| {
                let mut updated = order.clone();
                updated.status = entry.status;
                updated.timeline.push(entry);
                Ok(Some(updated))
            });

        let service = OrderService::new(repo, MockProductCatalog::new());
        let updated = service
            .update_status(
                id,
                &artisan,
                UpdateStatus {
                    status: OrderStatus::Confirmed,
                    note: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, OrderStatus::Confirmed);
        assert_eq!(updated.timeline.len(), 2);
    }

    #[tokio::test]
    async fn test_update_status_by_customer_is_denied() {
        let customer = user(Role::Customer);
        let order = stored_order(customer.id, Uuid::now_v7());
        let id = order.id;

        let mut repo = MockOrderRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(order.clone())));
        repo.expect_save_transition().never();

        let service = OrderService::new(repo, MockProductCatalog::new());
        let result = service
            .update_status(
                id,
                &customer,
                UpdateStatus {
                    status: OrderStatus::Cancelled,
                    note: None,
                },
            )
            .await;
        assert!(matches!(result, Err(OrderError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_update_status_rejects_skipping_ahead() {
        let artisan = user(Role::Artisan);
        let order = stored_order(Uuid::now_v7(), artisan.id);
        let id = order.id;

        let mut repo = MockOrderRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(order.clone())));
        repo.expect_save_transition().never();

        let service = OrderService::new(repo, MockProductCatalog::new());
        let result = service
            .update_status(
                id,
                &artisan,
                UpdateStatus {
                    status: OrderStatus::Delivered,
                    note: None,
                },
            )
            .await;
        assert!(matches!(result, Err(OrderError::InvalidTransition { .. })));
    }

    #[tokio::test]
    async fn test_update_status_lost_race() {
        let artisan = user(Role::Artisan);
        let order = stored_order(Uuid::now_v7(), artisan.id);
        let id = order.id;

        let mut repo = MockOrderRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(order.clone())));
        repo.expect_save_transition().returning(|_, _, _| Ok(None));

        let service = OrderService::new(repo, MockProductCatalog::new());
        let result = service
            .update_status(
                id,
                &artisan,
                UpdateStatus {
                    status: OrderStatus::Confirmed,
                    note: None,
                },
            )
            .await;
        assert!(matches!(result, Err(OrderError::Validation(_))));
    }

    #[tokio::test]
    async fn test_customer_marks_paid() {
        let customer = Uuid::now_v7();
        let order = stored_order(customer, Uuid::now_v7());
        let id = order.id;

        let mut repo = MockOrderRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(order.clone())));
        repo.expect_save_payment()
            .withf(|_, payment| {
                payment.status == PaymentStatus::Paid
                    && payment.paid_at.is_some()
                    && payment.transaction_id.as_deref() == Some("pi_3Nx")
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let service = OrderService::new(repo, MockProductCatalog::new());
        let response = service
            .update_payment(
                id,
                customer,
                UpdatePayment {
                    payment_status: PaymentStatus::Paid,
                    transaction_id: Some("pi_3Nx".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(response.message, "Payment status updated successfully");
    }

    #[tokio::test]
    async fn test_payment_by_stranger_is_denied() {
        let order = stored_order(Uuid::now_v7(), Uuid::now_v7());
        let id = order.id;

        let mut repo = MockOrderRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(order.clone())));
        repo.expect_save_payment().never();

        let service = OrderService::new(repo, MockProductCatalog::new());
        let result = service
            .update_payment(
                id,
                Uuid::now_v7(),
                UpdatePayment {
                    payment_status: PaymentStatus::Failed,
                    transaction_id: None,
                },
            )
            .await;
        assert!(matches!(result, Err(OrderError::Forbidden(_))));
    }
}
