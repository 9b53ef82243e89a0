//! HTTP handlers for events API

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_helpers::errors::responses::{
    BadRequestUuidResponse, BadRequestValidationResponse, ConflictResponse, ForbiddenResponse,
    InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
};
use axum_helpers::{UuidPath, ValidatedJson};
use domain_users::AuthUser;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::EventResult;
use crate::models::{
    Address, Attendee, AttendeeStatus, Capacity, Coordinates, CreateEvent, Event, EventFilter,
    EventImage, EventListResponse, EventLocation, EventPricing, EventSort, EventStatus, EventType,
    GroupDiscount, LocationType, MessageResponse, Recurrence, RecurrenceFrequency,
    RegisterForEvent, RegistrationResponse, Requirements, Schedule, SkillLevel, Sponsor,
    UpdateEvent,
};
use crate::repository::EventRepository;
use crate::service::EventService;

/// OpenAPI documentation for Events API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_events,
        featured_events,
        get_event,
        create_event,
        update_event,
        register,
        cancel_registration,
    ),
    components(
        schemas(
            Event, CreateEvent, UpdateEvent, EventType, EventStatus, EventLocation,
            LocationType, Address, Coordinates, Schedule, Recurrence, RecurrenceFrequency,
            Capacity, EventPricing, GroupDiscount, EventImage, Requirements, SkillLevel,
            Attendee, AttendeeStatus, Sponsor, EventSort, EventListResponse,
            RegisterForEvent, RegistrationResponse, MessageResponse
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
        (name = "Events", description = "Exhibitions, workshops and markets")
    )
)]
pub struct ApiDoc;

/// Create the events router; nest under `/events`.
pub fn router<R: EventRepository + 'static>(service: EventService<R>) -> Router {
    Router::new()
        .route("/", get(list_events::<R>).post(create_event::<R>))
        .route("/featured", get(featured_events::<R>))
        .route("/{id}", get(get_event::<R>).put(update_event::<R>))
        .route(
            "/{id}/register",
            post(register::<R>).delete(cancel_registration::<R>),
        )
        .with_state(Arc::new(service))
}

/// List published events
#[utoipa::path(
    get,
    path = "",
    params(EventFilter),
    responses(
        (status = 200, description = "Page of events", body = EventListResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    tag = "Events"
)]
async fn list_events<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    Query(filter): Query<EventFilter>,
) -> EventResult<Json<EventListResponse>> {
    Ok(Json(service.list(filter).await?))
}

/// Upcoming featured events, soonest first
#[utoipa::path(
    get,
    path = "/featured",
    responses(
        (status = 200, description = "Featured events", body = Vec<Event>),
        (status = 500, response = InternalServerErrorResponse)
    ),
    tag = "Events"
)]
async fn featured_events<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
) -> EventResult<Json<Vec<Event>>> {
    Ok(Json(service.featured().await?))
}

/// Get event by ID
#[utoipa::path(
    get,
    path = "/{id}",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event found", body = Event),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    tag = "Events"
)]
async fn get_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    UuidPath(id): UuidPath,
) -> EventResult<Json<Event>> {
    Ok(Json(service.get_by_id(id).await?))
}

/// Create an event organized by the caller
#[utoipa::path(
    post,
    path = "",
    request_body = CreateEvent,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Events"
)]
async fn create_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    user: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateEvent>,
) -> EventResult<impl IntoResponse> {
    let event = service.create(user.id, input).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// Update an event (organizer only)
#[utoipa::path(
    put,
    path = "/{id}",
    params(("id" = Uuid, Path, description = "Event ID")),
    request_body = UpdateEvent,
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Events"
)]
async fn update_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    user: AuthUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateEvent>,
) -> EventResult<Json<Event>> {
    Ok(Json(service.update(id, user.id, input).await?))
}

/// Register the caller for an event
#[utoipa::path(
    post,
    path = "/{id}/register",
    params(("id" = Uuid, Path, description = "Event ID")),
    request_body(content = RegisterForEvent, description = "Optional attendee notes"),
    responses(
        (status = 200, description = "Registered", body = RegistrationResponse),
        (status = 400, response = ConflictResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Events"
)]
async fn register<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    user: AuthUser,
    UuidPath(id): UuidPath,
    body: Option<Json<RegisterForEvent>>,
) -> EventResult<Json<RegistrationResponse>> {
    let input = body.map(|Json(input)| input).unwrap_or_default();
    Ok(Json(service.register(id, user.id, input).await?))
}

/// Cancel the caller's registration
#[utoipa::path(
    delete,
    path = "/{id}/register",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Registration cancelled", body = MessageResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Events"
)]
async fn cancel_registration<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    user: AuthUser,
    UuidPath(id): UuidPath,
) -> EventResult<Json<MessageResponse>> {
    Ok(Json(service.cancel_registration(id, user.id).await?))
}
