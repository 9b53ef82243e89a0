//! User Service - accounts, credentials and directory listings

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum_helpers::{JwtAuth, Pagination};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthUser;
use crate::error::{UserError, UserResult};
use crate::models::{
    ArtisanFilter, ArtisanListResponse, AuthResponse, AvatarResponse, LoginRequest,
    PublicUserProfile, RegisterRequest, RoleProfile, UpdateProfile, User, UserResponse,
    VendorFilter, VendorListResponse, normalize_email,
};
use crate::repository::UserRepository;

/// Default page size for the artisan and vendor directories
pub const DIRECTORY_PAGE_SIZE: u64 = 12;

pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    jwt: JwtAuth,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R, jwt: JwtAuth) -> Self {
        Self {
            repository: Arc::new(repository),
            jwt,
        }
    }

    #[instrument(skip(self, input), fields(email = %input.email, role = %input.role))]
    pub async fn register(&self, input: RegisterRequest) -> UserResult<AuthResponse> {
        input.validate()?;

        let email = normalize_email(&input.email);
        if self.repository.exists_by_email(&email).await? {
            return Err(UserError::DuplicateEmail(email));
        }

        let password_hash = hash_password(&input.password)?;
        let mut profile = input.profile;
        profile.first_name = profile.first_name.trim().to_string();
        profile.last_name = profile.last_name.trim().to_string();

        let user = self
            .repository
            .create(User::new(email, password_hash, input.role, profile))
            .await?;

        let token = self.issue_token(&user)?;
        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginRequest) -> UserResult<AuthResponse> {
        let email = normalize_email(&input.email);
        let mut user = self
            .repository
            .get_by_email(&email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !verify_password(&input.password, &user.password)? {
            tracing::info!(user_id = %user.id, "Login rejected: bad password");
            return Err(UserError::InvalidCredentials);
        }
        if !user.is_active {
            return Err(UserError::Inactive);
        }

        self.repository.touch_last_login(user.id).await?;
        user.last_login = Some(chrono::Utc::now());

        let token = self.issue_token(&user)?;
        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }

    /// The caller's own account
    #[instrument(skip(self))]
    pub async fn me(&self, id: Uuid) -> UserResult<UserResponse> {
        self.repository
            .get_by_id(id)
            .await?
            .map(UserResponse::from)
            .ok_or(UserError::NotFound)
    }

    #[instrument(skip(self))]
    pub async fn get_public_profile(&self, id: Uuid) -> UserResult<PublicUserProfile> {
        self.repository
            .get_by_id(id)
            .await?
            .map(PublicUserProfile::from)
            .ok_or(UserError::NotFound)
    }

    #[instrument(skip(self, input))]
    pub async fn update_profile(&self, id: Uuid, input: UpdateProfile) -> UserResult<UserResponse> {
        input.validate()?;

        let user = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound)?;

        let mut profile = user.profile;
        input.profile.apply_to(&mut profile);

        self.repository
            .update_profile(id, profile)
            .await?
            .map(UserResponse::from)
            .ok_or(UserError::NotFound)
    }

    /// Replace the caller's role-specific sub-document.
    ///
    /// The sub-document must match the stored role; ratings are kept as stored.
    #[instrument(skip(self, details), fields(role = %details.role()))]
    pub async fn update_role_profile(
        &self,
        id: Uuid,
        mut details: RoleProfile,
    ) -> UserResult<UserResponse> {
        let user = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound)?;

        if user.role() != details.role() {
            return Err(UserError::Forbidden(format!(
                "Access denied. Required role: {}",
                details.role()
            )));
        }
        details.keep_ratings_from(&user.details);

        self.repository
            .update_role_profile(id, details)
            .await?
            .map(UserResponse::from)
            .ok_or(UserError::NotFound)
    }

    #[instrument(skip(self))]
    pub async fn list_artisans(&self, filter: ArtisanFilter) -> UserResult<ArtisanListResponse> {
        let page = Pagination::new(filter.page, filter.limit, DIRECTORY_PAGE_SIZE);
        let artisans = self
            .repository
            .list_artisans(filter.clone(), page)
            .await?;
        let total = self.repository.count_artisans(filter).await?;

        Ok(ArtisanListResponse {
            artisans: artisans.into_iter().map(PublicUserProfile::from).collect(),
            total_pages: page.total_pages(total),
            current_page: page.page,
            total,
        })
    }

    #[instrument(skip(self))]
    pub async fn list_vendors(&self, filter: VendorFilter) -> UserResult<VendorListResponse> {
        let page = Pagination::new(filter.page, filter.limit, DIRECTORY_PAGE_SIZE);
        let vendors = self.repository.list_vendors(filter.clone(), page).await?;
        let total = self.repository.count_vendors(filter).await?;

        Ok(VendorListResponse {
            vendors: vendors.into_iter().map(PublicUserProfile::from).collect(),
            total_pages: page.total_pages(total),
            current_page: page.page,
            total,
        })
    }

    /// Store a generated placeholder avatar; image hosting is not wired up.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn upload_avatar(&self, user: &AuthUser) -> UserResult<AvatarResponse> {
        let avatar_url = placeholder_avatar(&user.first_name);
        self.repository
            .set_avatar(user.id, avatar_url.clone())
            .await?;
        Ok(AvatarResponse { avatar_url })
    }

    fn issue_token(&self, user: &User) -> UserResult<String> {
        self.jwt
            .create_token(user.id, &user.email, &user.role().to_string())
            .map_err(|e| {
                tracing::error!("Failed to create access token: {:?}", e);
                UserError::Token("Failed to create token".to_string())
            })
    }
}

pub fn placeholder_avatar(first_name: &str) -> String {
    let initial = first_name
        .trim()
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_else(|| "U".to_string());
    format!("https://via.placeholder.com/200x200/8B7355/FFFFFF?text={initial}")
}

/// Argon2id PHC string with a random salt
pub fn hash_password(password: &str) -> UserResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::PasswordHash(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> UserResult<bool> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
