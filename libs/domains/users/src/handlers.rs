//! HTTP handlers for the auth and users APIs

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use axum_helpers::{
    UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ConflictResponse,
        ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::auth::{ArtisanOnly, AuthUser, Authorized, CustomerOnly, VendorOnly};
use crate::error::UserResult;
use crate::models::{
    ArtisanFilter, ArtisanListResponse, ArtisanProfile, ArtisanSort, AuthResponse,
    AvatarResponse, CustomerProfile, LoginRequest, Profile, ProfileUpdate, PublicUserProfile,
    RegisterRequest, Role, RoleProfile, UpdateProfile, UserResponse, VendorFilter,
    VendorListResponse, VendorProfile,
};
use crate::repository::UserRepository;
use crate::service::UserService;

#[derive(OpenApi)]
#[openapi(
    paths(
        register,
        login,
        me,
        get_profile,
        update_profile,
        update_artisan_profile,
        update_vendor_profile,
        update_customer_profile,
        list_artisans,
        list_vendors,
        upload_avatar,
    ),
    components(
        schemas(
            RegisterRequest, LoginRequest, AuthResponse, UserResponse, PublicUserProfile,
            Profile, ProfileUpdate, UpdateProfile, Role, RoleProfile, ArtisanProfile,
            VendorProfile, CustomerProfile, ArtisanSort, ArtisanListResponse,
            VendorListResponse, AvatarResponse
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
        (name = "Auth", description = "Registration and login"),
        (name = "Users", description = "Profiles and artisan/vendor directories")
    )
)]
pub struct ApiDoc;

/// Routes for `/auth/*` and `/users/*`; merge at the API root.
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/users/profile", put(update_profile))
        .route("/users/profile/{id}", get(get_profile))
        .route("/users/artisan-profile", put(update_artisan_profile))
        .route("/users/vendor-profile", put(update_vendor_profile))
        .route("/users/customer-profile", put(update_customer_profile))
        .route("/users/artisans", get(list_artisans))
        .route("/users/vendors", get(list_vendors))
        .route("/users/upload-avatar", post(upload_avatar))
        .with_state(shared_service)
}

/// Create an account and sign in
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn register<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> UserResult<impl IntoResponse> {
    let response = service.register(input).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Exchange credentials for a token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn login<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> UserResult<Json<AuthResponse>> {
    Ok(Json(service.login(input).await?))
}

/// The caller's own account
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current account", body = UserResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer" = []))
)]
async fn me<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    user: AuthUser,
) -> UserResult<Json<UserResponse>> {
    Ok(Json(service.me(user.id).await?))
}

/// Public profile of any user
#[utoipa::path(
    get,
    path = "/users/profile/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Public profile", body = PublicUserProfile),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_profile<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    UuidPath(id): UuidPath,
) -> UserResult<Json<PublicUserProfile>> {
    Ok(Json(service.get_public_profile(id).await?))
}

/// Update the caller's shared profile
#[utoipa::path(
    put,
    path = "/users/profile",
    tag = "Users",
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer" = []))
)]
async fn update_profile<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    user: AuthUser,
    ValidatedJson(input): ValidatedJson<UpdateProfile>,
) -> UserResult<Json<UserResponse>> {
    Ok(Json(service.update_profile(user.id, input).await?))
}

/// Replace the caller's artisan profile
#[utoipa::path(
    put,
    path = "/users/artisan-profile",
    tag = "Users",
    request_body = ArtisanProfile,
    responses(
        (status = 200, description = "Artisan profile updated", body = UserResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer" = []))
)]
async fn update_artisan_profile<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Authorized(user, _): Authorized<ArtisanOnly>,
    ValidatedJson(artisan_profile): ValidatedJson<ArtisanProfile>,
) -> UserResult<Json<UserResponse>> {
    let details = RoleProfile::Artisan { artisan_profile };
    Ok(Json(service.update_role_profile(user.id, details).await?))
}

/// Replace the caller's vendor profile
#[utoipa::path(
    put,
    path = "/users/vendor-profile",
    tag = "Users",
    request_body = VendorProfile,
    responses(
        (status = 200, description = "Vendor profile updated", body = UserResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer" = []))
)]
async fn update_vendor_profile<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Authorized(user, _): Authorized<VendorOnly>,
    ValidatedJson(vendor_profile): ValidatedJson<VendorProfile>,
) -> UserResult<Json<UserResponse>> {
    let details = RoleProfile::Vendor { vendor_profile };
    Ok(Json(service.update_role_profile(user.id, details).await?))
}

/// Replace the caller's customer profile
#[utoipa::path(
    put,
    path = "/users/customer-profile",
    tag = "Users",
    request_body = CustomerProfile,
    responses(
        (status = 200, description = "Customer profile updated", body = UserResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer" = []))
)]
async fn update_customer_profile<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Authorized(user, _): Authorized<CustomerOnly>,
    ValidatedJson(customer_profile): ValidatedJson<CustomerProfile>,
) -> UserResult<Json<UserResponse>> {
    let details = RoleProfile::Customer { customer_profile };
    Ok(Json(service.update_role_profile(user.id, details).await?))
}

/// Artisan directory
#[utoipa::path(
    get,
    path = "/users/artisans",
    tag = "Users",
    params(ArtisanFilter),
    responses(
        (status = 200, description = "Page of artisans", body = ArtisanListResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_artisans<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Query(filter): Query<ArtisanFilter>,
) -> UserResult<Json<ArtisanListResponse>> {
    Ok(Json(service.list_artisans(filter).await?))
}

/// Vendor directory
#[utoipa::path(
    get,
    path = "/users/vendors",
    tag = "Users",
    params(VendorFilter),
    responses(
        (status = 200, description = "Page of vendors", body = VendorListResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_vendors<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Query(filter): Query<VendorFilter>,
) -> UserResult<Json<VendorListResponse>> {
    Ok(Json(service.list_vendors(filter).await?))
}

/// Assign a generated avatar
#[utoipa::path(
    post,
    path = "/users/upload-avatar",
    tag = "Users",
    responses(
        (status = 200, description = "Avatar stored", body = AvatarResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer" = []))
)]
async fn upload_avatar<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    user: AuthUser,
) -> UserResult<Json<AvatarResponse>> {
    Ok(Json(service.upload_avatar(&user).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::repository::MockUserRepository;
    use axum::{
        body::Body,
        http::{Request, header},
    };
    use axum_helpers::{JwtAuth, JwtConfig};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use uuid::Uuid;

    fn app(repo: MockUserRepository) -> Router {
        let jwt = JwtAuth::new(&JwtConfig::new("a-test-secret-that-is-long-enough-123").unwrap());
        router(UserService::new(repo, jwt))
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

    fn json_request(method: &str, uri: &str, body: Value, user: Option<AuthUser>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(user) = user {
            builder = builder.extension(user);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_register_returns_created() {
        let mut repo = MockUserRepository::new();
        repo.expect_exists_by_email().returning(|_| Ok(false));
        repo.expect_create().returning(Ok);

        let response = app(repo)
            .oneshot(json_request(
                "POST",
                "/auth/register",
                json!({
                    "email": "jennifer@example.com",
                    "password": "password123",
                    "role": "customer",
                    "profile": { "firstName": "Jennifer", "lastName": "Smith" }
                }),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert!(body["token"].as_str().is_some());
        assert_eq!(body["user"]["role"], "customer");
        assert!(body["user"].get("password").is_none());
    }

    #[tokio::test]
    async fn test_register_duplicate_is_bad_request() {
        let mut repo = MockUserRepository::new();
        repo.expect_exists_by_email().returning(|_| Ok(true));

        let response = app(repo)
            .oneshot(json_request(
                "POST",
                "/auth/register",
                json!({
                    "email": "jennifer@example.com",
                    "password": "password123",
                    "role": "customer",
                    "profile": { "firstName": "Jennifer", "lastName": "Smith" }
                }),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "User already exists with this email");
    }

    #[tokio::test]
    async fn test_me_requires_token() {
        let response = app(MockUserRepository::new())
            .oneshot(
                Request::get("/auth/me")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["message"], "No token, authorization denied");
    }

    #[tokio::test]
    async fn test_public_profile_hides_email() {
        let user = User::new(
            "sarah@example.com".to_string(),
            "hash".to_string(),
            Role::Artisan,
            Profile {
                first_name: "Sarah".to_string(),
                last_name: "Chen".to_string(),
                ..Default::default()
            },
        );
        let id = user.id;

        let mut repo = MockUserRepository::new();
        repo.expect_get_by_id()
            .with(mockall::predicate::eq(id))
            .returning(move |_| Ok(Some(user.clone())));

        let response = app(repo)
            .oneshot(
                Request::get(format!("/users/profile/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body.get("email").is_none());
        assert!(body.get("password").is_none());
        assert_eq!(body["role"], "artisan");
    }

    #[tokio::test]
    async fn test_role_profile_wrong_role_is_forbidden() {
        let mut repo = MockUserRepository::new();
        repo.expect_update_role_profile().never();

        let response = app(repo)
            .oneshot(json_request(
                "PUT",
                "/users/artisan-profile",
                json!({ "experience": 3 }),
                Some(caller(Role::Customer)),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Access denied. Required role: artisan");
    }

    #[tokio::test]
    async fn test_update_profile_rejects_long_bio() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_id().never();

        let response = app(repo)
            .oneshot(json_request(
                "PUT",
                "/users/profile",
                json!({ "profile": { "bio": "x".repeat(501) } }),
                Some(caller(Role::Customer)),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_vendors_envelope() {
        let mut repo = MockUserRepository::new();
        repo.expect_list_vendors().returning(|_, _| Ok(vec![]));
        repo.expect_count_vendors().returning(|_| Ok(0));

        let response = app(repo)
            .oneshot(
                Request::get("/users/vendors?businessType=retailer")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["vendors"], json!([]));
        assert_eq!(body["totalPages"], 0);
        assert_eq!(body["currentPage"], 1);
    }
}
