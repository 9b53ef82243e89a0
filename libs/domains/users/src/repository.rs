use async_trait::async_trait;
use axum_helpers::Pagination;
use uuid::Uuid;

use crate::error::UserResult;
use crate::models::{ArtisanFilter, Profile, RoleProfile, User, VendorFilter};

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account
    async fn create(&self, user: User) -> UserResult<User>;

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    /// Lookup by normalized email
    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>>;

    async fn exists_by_email(&self, email: &str) -> UserResult<bool>;

    /// Replace the shared profile, returning the updated account
    async fn update_profile(&self, id: Uuid, profile: Profile) -> UserResult<Option<User>>;

    /// Replace the role-specific sub-document, returning the updated account
    async fn update_role_profile(&self, id: Uuid, details: RoleProfile)
    -> UserResult<Option<User>>;

    async fn set_avatar(&self, id: Uuid, avatar_url: String) -> UserResult<()>;

    async fn touch_last_login(&self, id: Uuid) -> UserResult<()>;

    /// Active artisans matching the filter, one page
    async fn list_artisans(
        &self,
        filter: ArtisanFilter,
        page: Pagination,
    ) -> UserResult<Vec<User>>;

    async fn count_artisans(&self, filter: ArtisanFilter) -> UserResult<u64>;

    /// Active vendors matching the filter, one page
    async fn list_vendors(&self, filter: VendorFilter, page: Pagination) -> UserResult<Vec<User>>;

    async fn count_vendors(&self, filter: VendorFilter) -> UserResult<u64>;
}
