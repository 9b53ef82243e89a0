//! HTTP handlers for orders API

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Json, Router};
use axum_helpers::errors::responses::{
    BadRequestUuidResponse, BadRequestValidationResponse, ForbiddenResponse,
    InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
};
use axum_helpers::{UuidPath, ValidatedJson};
use domain_users::AuthUser;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::catalog::ProductCatalog;
use crate::error::OrderResult;
use crate::models::{
    CreateOrder, Customization, MessageResponse, Order, OrderFilter, OrderItem, OrderItemInput,
    OrderListResponse, OrderNotes, OrderStatus, Payment, PaymentStatus, Pricing, ShippingAddress,
    ShippingDetails, ShippingInput, TimelineEntry, UpdatePayment, UpdateStatus,
};
use crate::repository::OrderRepository;
use crate::service::OrderService;

type SharedService<R, C> = Arc<OrderService<R, C>>;

/// OpenAPI documentation for Orders API
#[derive(OpenApi)]
#[openapi(
    paths(list_orders, create_order, get_order, update_status, update_payment),
    components(
        schemas(
            Order, OrderItem, Customization, Pricing, ShippingDetails, ShippingAddress,
            Payment, PaymentStatus, OrderNotes, TimelineEntry, OrderStatus, CreateOrder,
            OrderItemInput, ShippingInput, UpdateStatus, UpdatePayment, OrderListResponse,
            MessageResponse
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Orders", description = "Checkout, fulfilment status and payment tracking")
    )
)]
pub struct ApiDoc;

/// Create the orders router; nest under `/orders`. Every route needs a caller.
pub fn router<R, C>(service: OrderService<R, C>) -> Router
where
    R: OrderRepository + 'static,
    C: ProductCatalog + 'static,
{
    Router::new()
        .route("/", get(list_orders::<R, C>).post(create_order::<R, C>))
        .route("/{id}", get(get_order::<R, C>))
        .route("/{id}/status", put(update_status::<R, C>))
        .route("/{id}/payment", put(update_payment::<R, C>))
        .with_state(Arc::new(service))
}

/// The caller's orders, newest first
#[utoipa::path(
    get,
    path = "",
    params(OrderFilter),
    responses(
        (status = 200, description = "Page of orders", body = OrderListResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Orders"
)]
async fn list_orders<R: OrderRepository, C: ProductCatalog>(
    State(service): State<SharedService<R, C>>,
    user: AuthUser,
    Query(filter): Query<OrderFilter>,
) -> OrderResult<Json<OrderListResponse>> {
    Ok(Json(service.list(&user, filter).await?))
}

/// Place an order
#[utoipa::path(
    post,
    path = "",
    request_body = CreateOrder,
    responses(
        (status = 201, description = "Order placed", body = Order),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Orders"
)]
async fn create_order<R: OrderRepository, C: ProductCatalog>(
    State(service): State<SharedService<R, C>>,
    user: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateOrder>,
) -> OrderResult<impl IntoResponse> {
    let order = service.create(user.id, input).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Get an order the caller bought or fulfils
#[utoipa::path(
    get,
    path = "/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order found", body = Order),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Orders"
)]
async fn get_order<R: OrderRepository, C: ProductCatalog>(
    State(service): State<SharedService<R, C>>,
    user: AuthUser,
    UuidPath(id): UuidPath,
) -> OrderResult<Json<Order>> {
    Ok(Json(service.get(id, user.id).await?))
}

/// Move the order along its fulfilment path (owning artisan only)
#[utoipa::path(
    put,
    path = "/{id}/status",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateStatus,
    responses(
        (status = 200, description = "Status updated", body = Order),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Orders"
)]
async fn update_status<R: OrderRepository, C: ProductCatalog>(
    State(service): State<SharedService<R, C>>,
    user: AuthUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateStatus>,
) -> OrderResult<Json<Order>> {
    Ok(Json(service.update_status(id, &user, input).await?))
}

/// Record a payment outcome (customer or artisan)
#[utoipa::path(
    put,
    path = "/{id}/payment",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdatePayment,
    responses(
        (status = 200, description = "Payment updated", body = MessageResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Orders"
)]
async fn update_payment<R: OrderRepository, C: ProductCatalog>(
    State(service): State<SharedService<R, C>>,
    user: AuthUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdatePayment>,
) -> OrderResult<Json<MessageResponse>> {
    Ok(Json(service.update_payment(id, user.id, input).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogProduct, MockProductCatalog};
    use crate::repository::MockOrderRepository;
    use axum::body::Body;
    use axum::http::{Request, header};
    use domain_users::Role;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use uuid::Uuid;

    fn app(repo: MockOrderRepository, catalog: MockProductCatalog) -> Router {
        Router::new().nest("/orders", router(OrderService::new(repo, catalog)))
    }

    fn caller(role: Role) -> AuthUser {
        AuthUser {
            id: Uuid::now_v7(),
            email: "jennifer@example.com".to_string(),
            role,
            first_name: "Jennifer".to_string(),
            last_name: "Smith".to_string(),
        }
    }

    fn request(method: &str, uri: &str, body: Option<Value>, user: Option<AuthUser>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.extension(user);
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn stored_order(customer: Uuid, artisan: Uuid) -> Order {
        Order::new(
            "ART-1700000000000-0001".to_string(),
            customer,
            artisan,
            vec![OrderItem {
                product: Uuid::now_v7(),
                quantity: 2,
                price: 3_000,
                customizations: vec![],
            }],
            ShippingDetails {
                address: ShippingAddress::default(),
                method: Some("standard".to_string()),
                tracking_number: None,
                estimated_delivery: None,
                actual_delivery: None,
            },
            None,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_order_returns_created() {
        let product = CatalogProduct {
            id: Uuid::now_v7(),
            title: "Sterling Silver Leaf Necklace".to_string(),
            artisan: Uuid::now_v7(),
            price: 5_000,
            available: true,
        };
        let product_id = product.id;

        let mut catalog = MockProductCatalog::new();
        catalog
            .expect_find()
            .returning(move |_| Ok(Some(product.clone())));

        let mut repo = MockOrderRepository::new();
        repo.expect_next_sequence().returning(|| Ok(3));
        repo.expect_create().returning(Ok);

        let response = app(repo, catalog)
            .oneshot(request(
                "POST",
                "/orders",
                Some(json!({
                    "items": [{ "product": product_id, "quantity": 1 }],
                    "shipping": { "address": { "city": "Chicago" } }
                })),
                Some(caller(Role::Customer)),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["status"], "pending");
        assert_eq!(body["pricing"]["total"], 6_900);
        assert_eq!(body["timeline"][0]["note"], "Order created");
        assert_eq!(body["payment"]["status"], "pending");
    }

    #[tokio::test]
    async fn test_create_with_zero_quantity() {
        let mut catalog = MockProductCatalog::new();
        catalog.expect_find().never();

        let response = app(MockOrderRepository::new(), catalog)
            .oneshot(request(
                "POST",
                "/orders",
                Some(json!({
                    "items": [{ "product": Uuid::now_v7(), "quantity": 0 }],
                    "shipping": { "address": {} }
                })),
                Some(caller(Role::Customer)),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_with_unknown_product() {
        let mut catalog = MockProductCatalog::new();
        catalog.expect_find().returning(|_| Ok(None));

        let missing = Uuid::now_v7();
        let response = app(MockOrderRepository::new(), catalog)
            .oneshot(request(
                "POST",
                "/orders",
                Some(json!({
                    "items": [{ "product": missing, "quantity": 1 }],
                    "shipping": { "address": {} }
                })),
                Some(caller(Role::Customer)),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["message"], format!("Product {missing} not found"));
    }

    #[tokio::test]
    async fn test_list_requires_token() {
        let response = app(MockOrderRepository::new(), MockProductCatalog::new())
            .oneshot(request("GET", "/orders", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_list_envelope() {
        let user = caller(Role::Customer);
        let order = stored_order(user.id, Uuid::now_v7());

        let mut repo = MockOrderRepository::new();
        repo.expect_list()
            .withf(|_, filter, page| filter.status == Some(OrderStatus::Shipped) && page.page == 2)
            .returning(move |_, _, _| Ok(vec![order.clone()]));
        repo.expect_count().returning(|_, _| Ok(11));

        let response = app(repo, MockProductCatalog::new())
            .oneshot(request("GET", "/orders?status=shipped&page=2", None, Some(user)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["total"], 11);
        assert_eq!(body["totalPages"], 2);
        assert_eq!(body["currentPage"], 2);
        assert_eq!(body["orders"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_other_customers_order() {
        let order = stored_order(Uuid::now_v7(), Uuid::now_v7());
        let uri = format!("/orders/{}", order.id);

        let mut repo = MockOrderRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(order.clone())));

        let response = app(repo, MockProductCatalog::new())
            .oneshot(request("GET", &uri, None, Some(caller(Role::Customer))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Access denied");
    }

    #[tokio::test]
    async fn test_get_missing_order() {
        let mut repo = MockOrderRepository::new();
        repo.expect_get_by_id().returning(|_| Ok(None));

        let uri = format!("/orders/{}", Uuid::now_v7());
        let response = app(repo, MockProductCatalog::new())
            .oneshot(request("GET", &uri, None, Some(caller(Role::Customer))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Order not found");
    }

    #[tokio::test]
    async fn test_invalid_status_transition() {
        let artisan = caller(Role::Artisan);
        let order = stored_order(Uuid::now_v7(), artisan.id);
        let uri = format!("/orders/{}/status", order.id);

        let mut repo = MockOrderRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(order.clone())));
        repo.expect_save_transition().never();

        let response = app(repo, MockProductCatalog::new())
            .oneshot(request(
                "PUT",
                &uri,
                Some(json!({ "status": "shipped" })),
                Some(artisan),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Cannot change order status from pending to shipped");
    }

    #[tokio::test]
    async fn test_update_payment_by_artisan() {
        let artisan = caller(Role::Artisan);
        let order = stored_order(Uuid::now_v7(), artisan.id);
        let uri = format!("/orders/{}/payment", order.id);

        let mut repo = MockOrderRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(order.clone())));
        repo.expect_save_payment().returning(|_, _| Ok(()));

        let response = app(repo, MockProductCatalog::new())
            .oneshot(request(
                "PUT",
                &uri,
                Some(json!({ "paymentStatus": "paid", "transactionId": "ch_1" })),
                Some(artisan),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Payment status updated successfully");
    }
}
