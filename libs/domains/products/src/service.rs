use axum_helpers::Pagination;
use chrono::Utc;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{
    AddReview, CreateProduct, FavoriteResponse, MessageResponse, Product, ProductFilter,
    ProductListResponse, Ratings, Review, UpdateProduct,
};
use crate::repository::ProductRepository;

/// Default page size for the product list
pub const PRODUCT_PAGE_SIZE: u64 = 12;

/// How many featured products the storefront shows
pub const FEATURED_LIMIT: i64 = 8;

/// Attempts at writing the rating aggregate before leaving it to a newer review
const RATING_ATTEMPTS: usize = 3;

/// Product service containing business logic
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self, filter: ProductFilter) -> ProductResult<ProductListResponse> {
        let page = Pagination::new(filter.page, filter.limit, PRODUCT_PAGE_SIZE);
        let products = self.repository.list(filter.clone(), page).await?;
        let total = self.repository.count(filter).await?;

        Ok(ProductListResponse {
            products,
            total_pages: page.total_pages(total),
            current_page: page.page,
            total,
        })
    }

    #[instrument(skip(self))]
    pub async fn featured_products(&self) -> ProductResult<Vec<Product>> {
        self.repository.featured(FEATURED_LIMIT).await
    }

    /// Fetch a product and count the view.
    ///
    /// The counter update is best effort and never fails the read.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> ProductResult<Product> {
        let mut product = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        match self.repository.increment_views(id).await {
            Ok(()) => product.views += 1,
            Err(e) => tracing::warn!(product_id = %id, error = %e, "Failed to count product view"),
        }

        Ok(product)
    }

    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create_product(
        &self,
        artisan: Uuid,
        input: CreateProduct,
    ) -> ProductResult<Product> {
        input.validate()?;
        self.repository
            .create(Product::new(artisan, input))
            .await
    }

    #[instrument(skip(self, input))]
    pub async fn update_product(
        &self,
        id: Uuid,
        caller: Uuid,
        input: UpdateProduct,
    ) -> ProductResult<Product> {
        input.validate()?;
        self.ensure_owner(id, caller, "Not authorized to update this product")
            .await?;
        self.repository.update(id, input).await
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid, caller: Uuid) -> ProductResult<MessageResponse> {
        self.ensure_owner(id, caller, "Not authorized to delete this product")
            .await?;
        self.repository.delete(id).await?;

        Ok(MessageResponse {
            message: "Product deleted successfully".to_string(),
        })
    }

    /// Add the caller's review, then recompute the rating aggregate from
    /// the full review list.
    #[instrument(skip(self, input), fields(rating = input.rating))]
    pub async fn add_review(
        &self,
        id: Uuid,
        user: Uuid,
        input: AddReview,
    ) -> ProductResult<Product> {
        input.validate()?;

        let product = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))?;
        if product.has_review_from(user) {
            return Err(ProductError::AlreadyReviewed(user));
        }

        let review = Review {
            user,
            rating: input.rating,
            comment: input.comment,
            images: input.images,
            created_at: Utc::now(),
        };

        // The push filter rejects a concurrent second review from the same user
        let mut product = self
            .repository
            .push_review(id, review)
            .await?
            .ok_or(ProductError::AlreadyReviewed(user))?;

        // The aggregate is only written while the review count still matches
        // the snapshot it was computed from; otherwise reload and recompute.
        for _ in 0..RATING_ATTEMPTS {
            let ratings = Ratings::from_reviews(&product.reviews);
            if self
                .repository
                .set_ratings(id, ratings, product.reviews.len())
                .await?
            {
                product.ratings = ratings;
                return Ok(product);
            }
            product = self
                .repository
                .get_by_id(id)
                .await?
                .ok_or(ProductError::NotFound(id))?;
        }

        tracing::warn!(product_id = %id, "Ratings left to the most recent reviewer");
        Ok(product)
    }

    #[instrument(skip(self))]
    pub async fn toggle_favorite(&self, id: Uuid, user: Uuid) -> ProductResult<FavoriteResponse> {
        let product = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        let favorited = !product.is_favorited_by(user);
        let updated = self
            .repository
            .set_favorite(id, user, favorited)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        Ok(FavoriteResponse {
            is_favorited: updated.is_favorited_by(user),
            favorites_count: updated.favorites.len(),
        })
    }

    async fn ensure_owner(&self, id: Uuid, caller: Uuid, message: &str) -> ProductResult<()> {
        let product = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        if product.artisan != caller {
            return Err(ProductError::Forbidden(message.to_string()));
        }
        Ok(())
    }
}
