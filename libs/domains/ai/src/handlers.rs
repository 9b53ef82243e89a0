//! HTTP handlers for the AI API

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_helpers::errors::responses::{
    BadRequestUuidResponse, BadRequestValidationResponse, ForbiddenResponse,
    InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
};
use axum_helpers::{UuidPath, ValidatedJson};
use domain_users::{ArtisanOnly, AuthUser, Authorized};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::AiResult;
use crate::models::{
    ContentType, GenerateContentRequest, GeneratedContent, MarketAnalysis, MentorshipRequest,
    MentorshipResponse, PriceBounds, PriceSuggestion, RecommendationKind, RecommendationResponse,
    Recommendations, SeekerType, SuggestPriceRequest, TranscribeRequest, TranscribeResponse,
};
use crate::repository::AiRepository;
use crate::service::AiService;

/// OpenAPI documentation for AI API
#[derive(OpenApi)]
#[openapi(
    paths(
        transcribe_audio,
        suggest_price,
        generate_content,
        recommendations,
        mentorship_match,
    ),
    components(
        schemas(
            TranscribeRequest, TranscribeResponse, SuggestPriceRequest, PriceSuggestion,
            MarketAnalysis, PriceBounds, GenerateContentRequest, GeneratedContent, ContentType,
            RecommendationResponse, Recommendations, RecommendationKind, MentorshipRequest,
            MentorshipResponse, SeekerType
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
        (name = "AI", description = "Pricing help, marketing copy and matchmaking")
    )
)]
pub struct ApiDoc;

/// Create the AI router; nest under `/ai`. Every route needs a caller.
pub fn router<R: AiRepository + 'static>(service: AiService<R>) -> Router {
    Router::new()
        .route("/transcribe-audio", post(transcribe_audio::<R>))
        .route("/suggest-price", post(suggest_price::<R>))
        .route("/generate-content", post(generate_content::<R>))
        .route("/recommendations/{user_id}", get(recommendations::<R>))
        .route("/mentorship-match", post(mentorship_match::<R>))
        .with_state(Arc::new(service))
}

/// Transcribe a recorded artisan story
#[utoipa::path(
    post,
    path = "/transcribe-audio",
    request_body = TranscribeRequest,
    responses(
        (status = 200, description = "Transcript", body = TranscribeResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "AI"
)]
async fn transcribe_audio<R: AiRepository>(
    State(service): State<Arc<AiService<R>>>,
    _user: AuthUser,
    ValidatedJson(input): ValidatedJson<TranscribeRequest>,
) -> AiResult<Json<TranscribeResponse>> {
    Ok(Json(service.transcribe(input).await?))
}

/// Suggest a price from comparable listings (artisans only)
#[utoipa::path(
    post,
    path = "/suggest-price",
    request_body = SuggestPriceRequest,
    responses(
        (status = 200, description = "Price suggestion", body = PriceSuggestion),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "AI"
)]
async fn suggest_price<R: AiRepository>(
    State(service): State<Arc<AiService<R>>>,
    Authorized(_user, _): Authorized<ArtisanOnly>,
    ValidatedJson(input): ValidatedJson<SuggestPriceRequest>,
) -> AiResult<Json<PriceSuggestion>> {
    Ok(Json(service.suggest_price(input).await?))
}

/// Draft marketing content for a product
#[utoipa::path(
    post,
    path = "/generate-content",
    request_body = GenerateContentRequest,
    responses(
        (status = 200, description = "Generated content", body = GeneratedContent),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "AI"
)]
async fn generate_content<R: AiRepository>(
    State(service): State<Arc<AiService<R>>>,
    _user: AuthUser,
    ValidatedJson(input): ValidatedJson<GenerateContentRequest>,
) -> AiResult<Json<GeneratedContent>> {
    Ok(Json(service.generate_content(input).await?))
}

/// Products or partners suited to a user
#[utoipa::path(
    get,
    path = "/recommendations/{user_id}",
    params(("user_id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Recommendations", body = RecommendationResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "AI"
)]
async fn recommendations<R: AiRepository>(
    State(service): State<Arc<AiService<R>>>,
    _user: AuthUser,
    UuidPath(user_id): UuidPath,
) -> AiResult<Json<RecommendationResponse>> {
    Ok(Json(service.recommendations(user_id).await?))
}

/// Pair apprentices with master artisans
#[utoipa::path(
    post,
    path = "/mentorship-match",
    request_body = MentorshipRequest,
    responses(
        (status = 200, description = "Matches", body = MentorshipResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "AI"
)]
async fn mentorship_match<R: AiRepository>(
    State(service): State<Arc<AiService<R>>>,
    user: AuthUser,
    ValidatedJson(input): ValidatedJson<MentorshipRequest>,
) -> AiResult<Json<MentorshipResponse>> {
    Ok(Json(service.mentorship_match(user.id, input).await?))
}
