use async_trait::async_trait;
use axum_helpers::Pagination;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::{Product, ProductFilter, Ratings, Review, UpdateProduct};

/// Repository trait for Product persistence
///
/// This trait defines the data access interface for products.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a new product
    async fn create(&self, product: Product) -> ProductResult<Product>;

    /// Get a product by ID
    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>>;

    /// Active products matching the filter, one page
    async fn list(&self, filter: ProductFilter, page: Pagination) -> ProductResult<Vec<Product>>;

    /// Count active products matching a filter
    async fn count(&self, filter: ProductFilter) -> ProductResult<u64>;

    /// Featured active products, newest first
    async fn featured(&self, limit: i64) -> ProductResult<Vec<Product>>;

    /// Bump the view counter by one
    async fn increment_views(&self, id: Uuid) -> ProductResult<()>;

    /// Update an existing product
    async fn update(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product>;

    /// Delete a product by ID
    async fn delete(&self, id: Uuid) -> ProductResult<bool>;

    /// Append a review unless its author already reviewed the product.
    ///
    /// `None` when the product is missing or the author has a review already.
    async fn push_review(&self, id: Uuid, review: Review) -> ProductResult<Option<Product>>;

    /// Overwrite the rating aggregate if the product still holds exactly
    /// `review_count` reviews. `false` when a newer review got there first.
    async fn set_ratings(
        &self,
        id: Uuid,
        ratings: Ratings,
        review_count: usize,
    ) -> ProductResult<bool>;

    /// Add or remove `user` from the favorites set, returning the updated product
    async fn set_favorite(
        &self,
        id: Uuid,
        user: Uuid,
        favorited: bool,
    ) -> ProductResult<Option<Product>>;
}
