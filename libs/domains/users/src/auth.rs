//! Request authentication and role gating.
//!
//! [`authenticate`] runs on every request and resolves a bearer token to an
//! [`AuthUser`] stored in the request extensions. Handlers then opt in with
//! extractors:
//!
//! ```ignore
//! async fn create_product(
//!     Authorized(user, _): Authorized<ArtisanOnly>,   // 401 / 403
//!     ValidatedJson(input): ValidatedJson<CreateProduct>, // 400
//! ) { ... }
//! ```

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_helpers::{AppError, JwtAuth, bearer_token};
use std::marker::PhantomData;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::{Role, User};
use crate::repository::UserRepository;

/// The authenticated caller, resolved from an active account
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role(),
            first_name: user.profile.first_name.clone(),
            last_name: user.profile.last_name.clone(),
        }
    }
}

/// Why a presented token did not yield an [`AuthUser`]
#[derive(Debug, Clone, PartialEq)]
pub enum AuthFailure {
    /// Bad signature, expired, unknown or inactive account
    InvalidToken,
    /// The account lookup itself failed
    Lookup(String),
}

/// Resolves bearer tokens to active accounts
pub struct Authenticator<R: UserRepository> {
    jwt: JwtAuth,
    repository: Arc<R>,
}

impl<R: UserRepository> Clone for Authenticator<R> {
    fn clone(&self) -> Self {
        Self {
            jwt: self.jwt.clone(),
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: UserRepository> Authenticator<R> {
    pub fn new(jwt: JwtAuth, repository: R) -> Self {
        Self {
            jwt,
            repository: Arc::new(repository),
        }
    }

    pub async fn resolve(&self, token: &str) -> Result<AuthUser, AuthFailure> {
        let claims = self.jwt.verify_token(token).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            AuthFailure::InvalidToken
        })?;
        let id = Uuid::parse_str(&claims.sub).map_err(|_| AuthFailure::InvalidToken)?;

        match self.repository.get_by_id(id).await {
            Ok(Some(user)) if user.is_active => Ok(AuthUser::from(&user)),
            Ok(_) => Err(AuthFailure::InvalidToken),
            Err(e) => Err(AuthFailure::Lookup(e.to_string())),
        }
    }
}

/// Middleware attaching the caller's identity, if any, to the request.
///
/// Never rejects on its own; public routes stay reachable without a token.
pub async fn authenticate<R: UserRepository + 'static>(
    State(authenticator): State<Authenticator<R>>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(request.headers()) {
        match authenticator.resolve(&token).await {
            Ok(user) => {
                request.extensions_mut().insert(user);
            }
            Err(failure) => {
                request.extensions_mut().insert(failure);
            }
        }
    }
    next.run(request).await
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        match parts.extensions.get::<AuthFailure>() {
            Some(AuthFailure::Lookup(msg)) => Err(AppError::InternalServerError(msg.clone())),
            Some(AuthFailure::InvalidToken) => {
                Err(AppError::Unauthorized("Token is not valid".to_string()))
            }
            None => Err(AppError::Unauthorized(
                "No token, authorization denied".to_string(),
            )),
        }
    }
}

/// Set of roles an endpoint accepts
pub trait RoleGuard: Send + Sync + 'static {
    const ROLES: &'static [Role];
}

pub struct ArtisanOnly;
pub struct VendorOnly;
pub struct CustomerOnly;

impl RoleGuard for ArtisanOnly {
    const ROLES: &'static [Role] = &[Role::Artisan];
}

impl RoleGuard for VendorOnly {
    const ROLES: &'static [Role] = &[Role::Vendor];
}

impl RoleGuard for CustomerOnly {
    const ROLES: &'static [Role] = &[Role::Customer];
}

/// An [`AuthUser`] whose role is in `G::ROLES`; 403 otherwise
pub struct Authorized<G: RoleGuard>(pub AuthUser, pub PhantomData<G>);

impl<S, G> FromRequestParts<S> for Authorized<G>
where
    S: Send + Sync,
    G: RoleGuard,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        if !G::ROLES.contains(&user.role) {
            let required = G::ROLES
                .iter()
                .map(Role::to_string)
                .collect::<Vec<_>>()
                .join(" or ");
            return Err(AppError::Forbidden(format!(
                "Access denied. Required role: {required}"
            )));
        }

        Ok(Self(user, PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Profile;
    use crate::repository::MockUserRepository;
    use axum::{
        Router,
        body::Body,
        http::{Request as HttpRequest, StatusCode, header},
        middleware,
        routing::get,
    };
    use axum_helpers::JwtConfig;
    use tower::ServiceExt;

    fn jwt() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new("a-test-secret-that-is-long-enough-123").unwrap())
    }

    fn user(role: Role, active: bool) -> User {
        let mut user = User::new(
            "emily@example.com".to_string(),
            "hash".to_string(),
            role,
            Profile {
                first_name: "Emily".to_string(),
                last_name: "Johnson".to_string(),
                ..Default::default()
            },
        );
        user.is_active = active;
        user
    }

    async fn whoami(user: AuthUser) -> String {
        user.email
    }

    async fn artisan_only(Authorized(user, _): Authorized<ArtisanOnly>) -> String {
        user.first_name
    }

    fn app(repository: MockUserRepository) -> Router {
        let authenticator = Authenticator::new(jwt(), repository);
        Router::new()
            .route("/me", get(whoami))
            .route("/studio", get(artisan_only))
            .layer(middleware::from_fn_with_state(
                authenticator,
                authenticate::<MockUserRepository>,
            ))
    }

    fn get_with_token(uri: &str, token: Option<&str>) -> HttpRequest<Body> {
        let mut builder = HttpRequest::get(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let response = app(MockUserRepository::new())
            .oneshot(get_with_token("/me", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_garbage_token_is_unauthorized() {
        let response = app(MockUserRepository::new())
            .oneshot(get_with_token("/me", Some("not-a-jwt")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_token_resolves_user() {
        let account = user(Role::Customer, true);
        let token = jwt()
            .create_token(account.id, &account.email, "customer")
            .unwrap();

        let mut repo = MockUserRepository::new();
        let id = account.id;
        repo.expect_get_by_id()
            .with(mockall::predicate::eq(id))
            .returning(move |_| Ok(Some(account.clone())));

        let response = app(repo)
            .oneshot(get_with_token("/me", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_inactive_account_is_rejected() {
        let account = user(Role::Artisan, false);
        let token = jwt()
            .create_token(account.id, &account.email, "artisan")
            .unwrap();

        let mut repo = MockUserRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(account.clone())));

        let response = app(repo)
            .oneshot(get_with_token("/me", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_lookup_failure_is_server_error() {
        let account = user(Role::Artisan, true);
        let token = jwt()
            .create_token(account.id, &account.email, "artisan")
            .unwrap();

        let mut repo = MockUserRepository::new();
        repo.expect_get_by_id()
            .returning(|_| Err(crate::error::UserError::Database("timeout".to_string())));

        let response = app(repo)
            .oneshot(get_with_token("/me", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_wrong_role_is_forbidden() {
        let account = user(Role::Customer, true);
        let token = jwt()
            .create_token(account.id, &account.email, "customer")
            .unwrap();

        let mut repo = MockUserRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(account.clone())));

        let response = app(repo)
            .oneshot(get_with_token("/studio", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_matching_role_passes_guard() {
        let account = user(Role::Artisan, true);
        let token = jwt()
            .create_token(account.id, &account.email, "artisan")
            .unwrap();

        let mut repo = MockUserRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(account.clone())));

        let response = app(repo)
            .oneshot(get_with_token("/studio", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
