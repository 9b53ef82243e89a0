//! Read-side queries backing the AI endpoints

use async_trait::async_trait;
use domain_products::Product;
use domain_users::User;
use uuid::Uuid;

use crate::error::AiResult;

/// Minimum artisan rating for vendor recommendations and vice versa
pub const PARTNER_MIN_RATING: f64 = 4.0;

/// Mentors need this many years and this rating
pub const MENTOR_MIN_EXPERIENCE: i32 = 5;
pub const MENTOR_MIN_RATING: f64 = 4.5;

/// Apprentices have at most this many years
pub const APPRENTICE_MAX_EXPERIENCE: i32 = 2;

/// Which active accounts a user search targets
#[derive(Debug, Clone, PartialEq)]
pub enum UserMatch {
    /// Artisans with any of the specialties, rated at least [`PARTNER_MIN_RATING`]
    Artisans { specialties: Vec<String> },
    /// Vendors preferring any of the artisan types, rated at least [`PARTNER_MIN_RATING`]
    Vendors { artisan_types: Vec<String> },
    /// Experienced, highly rated artisans in the specialties
    Mentors { specialties: Vec<String> },
    /// Newcomer artisans in the specialties
    Apprentices { specialties: Vec<String> },
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AiRepository: Send + Sync {
    async fn find_user(&self, id: Uuid) -> AiResult<Option<User>>;

    /// Active products in `category` sharing at least one material
    async fn similar_products(
        &self,
        category: String,
        materials: Vec<String>,
        limit: i64,
    ) -> AiResult<Vec<Product>>;

    /// Active products in the categories and price range, best rated then most viewed
    async fn products_for(
        &self,
        categories: Vec<String>,
        min_price: i64,
        max_price: i64,
        limit: i64,
    ) -> AiResult<Vec<Product>>;

    /// Active users matching `criteria`, never `exclude`
    async fn find_users(
        &self,
        criteria: UserMatch,
        exclude: Option<Uuid>,
        limit: i64,
    ) -> AiResult<Vec<User>>;
}
