use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ConflictResponse,
        ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    UuidPath, ValidatedJson,
};
use domain_users::{ArtisanOnly, AuthUser, Authorized};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::models::{
    AddReview, CreateProduct, CustomOption, CustomOptionType, Dimensions, FavoriteResponse,
    MessageResponse, Product, ProductAvailability, ProductCategory, ProductFilter, ProductImage,
    ProductListResponse, ProductSort, RatingBreakdown, Ratings, Review, ShippingInfo,
    UpdateProduct, Weight,
};
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        featured_products,
        get_product,
        create_product,
        update_product,
        delete_product,
        add_review,
        toggle_favorite,
    ),
    components(
        schemas(
            Product, CreateProduct, UpdateProduct, ProductCategory, ProductImage, Dimensions,
            Weight, CustomOption, CustomOptionType, ProductAvailability, ShippingInfo,
            Ratings, RatingBreakdown, Review, AddReview, ProductSort, ProductListResponse,
            FavoriteResponse, MessageResponse
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            ConflictResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Craft listings, reviews and favorites")
    )
)]
pub struct ApiDoc;

/// Create the products router; nest under `/products`.
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/featured", get(featured_products))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/{id}/reviews", post(add_review))
        .route("/{id}/favorite", post(toggle_favorite))
        .with_state(shared_service)
}

/// List active products
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(ProductFilter),
    responses(
        (status = 200, description = "Page of products", body = ProductListResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Query(filter): Query<ProductFilter>,
) -> ProductResult<Json<ProductListResponse>> {
    Ok(Json(service.list_products(filter).await?))
}

/// Featured products, newest first
#[utoipa::path(
    get,
    path = "/featured",
    tag = "Products",
    responses(
        (status = 200, description = "Featured products", body = Vec<Product>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn featured_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> ProductResult<Json<Vec<Product>>> {
    Ok(Json(service.featured_products().await?))
}

/// Get a product by ID and count the view
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
) -> ProductResult<Json<Product>> {
    Ok(Json(service.get_product(id).await?))
}

/// List a new product (artisans only)
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer" = []))
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Authorized(user, _): Authorized<ArtisanOnly>,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> ProductResult<impl IntoResponse> {
    let product = service.create_product(user.id, input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product (owner only)
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer" = []))
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    user: AuthUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> ProductResult<Json<Product>> {
    Ok(Json(service.update_product(id, user.id, input).await?))
}

/// Delete a product (owner only)
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted", body = MessageResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer" = []))
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    user: AuthUser,
    UuidPath(id): UuidPath,
) -> ProductResult<Json<MessageResponse>> {
    Ok(Json(service.delete_product(id, user.id).await?))
}

/// Review a product, once per user
#[utoipa::path(
    post,
    path = "/{id}/reviews",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = AddReview,
    responses(
        (status = 201, description = "Review added", body = Product),
        (status = 400, response = ConflictResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer" = []))
)]
async fn add_review<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    user: AuthUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<AddReview>,
) -> ProductResult<impl IntoResponse> {
    let product = service.add_review(id, user.id, input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Favorite or unfavorite a product
#[utoipa::path(
    post,
    path = "/{id}/favorite",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "New favorite state", body = FavoriteResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer" = []))
)]
async fn toggle_favorite<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    user: AuthUser,
    UuidPath(id): UuidPath,
) -> ProductResult<Json<FavoriteResponse>> {
    Ok(Json(service.toggle_favorite(id, user.id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockProductRepository;
    use axum::{
        body::Body,
        http::{header, Request},
    };
    use domain_users::Role;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    fn app(repo: MockProductRepository) -> Router {
        Router::new().nest("/products", router(ProductService::new(repo)))
    }

    fn caller(role: Role) -> AuthUser {
        AuthUser {
            id: Uuid::now_v7(),
            email: "sarah@example.com".to_string(),
            role,
            first_name: "Sarah".to_string(),
            last_name: "Chen".to_string(),
        }
    }

    fn request(method: &str, uri: &str, body: Option<Value>, user: Option<AuthUser>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(user) = user {
            builder = builder.extension(user);
        }
        let body = body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty);
        builder.body(body).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn product_body() -> Value {
        json!({
            "title": "Handwoven Wool Throw",
            "description": "Merino throw woven on a floor loom",
            "category": "textiles",
            "price": 18000,
            "materials": ["merino wool"],
            "images": [{ "url": "https://img.example.com/throw.jpg", "isPrimary": true }]
        })
    }

    #[tokio::test]
    async fn test_create_product_as_artisan() {
        let mut repo = MockProductRepository::new();
        repo.expect_create().returning(Ok);

        let artisan = caller(Role::Artisan);
        let artisan_id = artisan.id;
        let response = app(repo)
            .oneshot(request("POST", "/products", Some(product_body()), Some(artisan)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["artisan"], artisan_id.to_string());
        assert_eq!(body["category"], "textiles");
        assert_eq!(body["ratings"]["count"], 0);
    }

    #[tokio::test]
    async fn test_create_product_as_customer_is_forbidden() {
        let mut repo = MockProductRepository::new();
        repo.expect_create().never();

        let response = app(repo)
            .oneshot(request(
                "POST",
                "/products",
                Some(product_body()),
                Some(caller(Role::Customer)),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Access denied. Required role: artisan");
    }

    #[tokio::test]
    async fn test_create_product_without_token_is_unauthorized() {
        let response = app(MockProductRepository::new())
            .oneshot(request("POST", "/products", Some(product_body()), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_product_missing_title_is_bad_request() {
        let mut repo = MockProductRepository::new();
        repo.expect_create().never();

        let mut body = product_body();
        body["title"] = json!("  ");
        let response = app(repo)
            .oneshot(request("POST", "/products", Some(body), Some(caller(Role::Artisan))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_product_invalid_uuid() {
        let response = app(MockProductRepository::new())
            .oneshot(request("GET", "/products/not-a-uuid", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_missing_product_is_not_found() {
        let mut repo = MockProductRepository::new();
        repo.expect_get_by_id().returning(|_| Ok(None));

        let uri = format!("/products/{}", Uuid::now_v7());
        let response = app(repo)
            .oneshot(request("GET", &uri, None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Product not found");
    }

    #[tokio::test]
    async fn test_list_products_envelope() {
        let mut repo = MockProductRepository::new();
        repo.expect_list().returning(|_, _| Ok(vec![]));
        repo.expect_count().returning(|_| Ok(0));

        let response = app(repo)
            .oneshot(request(
                "GET",
                "/products?category=pottery&minPrice=1000&sortBy=price&sortOrder=asc",
                None,
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["total"], 0);
        assert_eq!(body["currentPage"], 1);
        assert_eq!(body["totalPages"], 0);
    }

    #[tokio::test]
    async fn test_duplicate_review_is_bad_request() {
        let reviewer = caller(Role::Customer);
        let mut product = crate::models::Product::new(
            Uuid::now_v7(),
            serde_json::from_value(product_body()).unwrap(),
        );
        product.reviews.push(Review {
            user: reviewer.id,
            rating: 5,
            comment: None,
            images: vec![],
            created_at: chrono::Utc::now(),
        });
        let uri = format!("/products/{}/reviews", product.id);

        let mut repo = MockProductRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(product.clone())));
        repo.expect_push_review().never();

        let response = app(repo)
            .oneshot(request("POST", &uri, Some(json!({ "rating": 4 })), Some(reviewer)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "You have already reviewed this product");
    }

    #[tokio::test]
    async fn test_review_rating_out_of_range() {
        let mut repo = MockProductRepository::new();
        repo.expect_get_by_id().never();

        let uri = format!("/products/{}/reviews", Uuid::now_v7());
        let response = app(repo)
            .oneshot(request(
                "POST",
                &uri,
                Some(json!({ "rating": 6 })),
                Some(caller(Role::Customer)),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
