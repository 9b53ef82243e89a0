//! Event service layer

use axum_helpers::Pagination;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::error::{EventError, EventResult};
use crate::models::{
    CreateEvent, Event, EventFilter, EventListResponse, MessageResponse, RegisterForEvent,
    RegistrationResponse, UpdateEvent,
};
use crate::repository::EventRepository;

/// Default page size for the event list
pub const EVENT_PAGE_SIZE: u64 = 12;

/// How many upcoming featured events are shown
pub const FEATURED_LIMIT: i64 = 6;

/// Conditional writes retried against a fresh read before giving up
const WRITE_ATTEMPTS: usize = 3;

/// Event service: listing, organizer edits and attendee registration
pub struct EventService<R: EventRepository> {
    repository: Arc<R>,
}

impl<R: EventRepository> EventService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, filter: EventFilter) -> EventResult<EventListResponse> {
        let page = Pagination::new(filter.page, filter.limit, EVENT_PAGE_SIZE);
        let events = self.repository.list(filter.clone(), page).await?;
        let total = self.repository.count(filter).await?;

        Ok(EventListResponse {
            events,
            total_pages: page.total_pages(total),
            current_page: page.page,
            total,
        })
    }

    #[instrument(skip(self))]
    pub async fn featured(&self) -> EventResult<Vec<Event>> {
        self.repository.featured(Utc::now(), FEATURED_LIMIT).await
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: Uuid) -> EventResult<Event> {
        self.load(id).await
    }

    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create(&self, organizer: Uuid, input: CreateEvent) -> EventResult<Event> {
        input.validate()?;
        self.repository.create(Event::new(organizer, input)).await
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: Uuid, caller: Uuid, input: UpdateEvent) -> EventResult<Event> {
        input.validate()?;

        for _ in 0..WRITE_ATTEMPTS {
            let mut event = self.load(id).await?;
            if event.organizer != caller {
                return Err(EventError::Forbidden(
                    "Not authorized to update this event".to_string(),
                ));
            }

            let from = event.status;
            event.apply_update(input.clone())?;
            if let Some(updated) = self.repository.update_details(&event, from).await? {
                return Ok(updated);
            }
        }
        Err(EventError::Contended)
    }

    #[instrument(skip(self, input))]
    pub async fn register(
        &self,
        id: Uuid,
        user: Uuid,
        input: RegisterForEvent,
    ) -> EventResult<RegistrationResponse> {
        input.validate()?;

        // A lost race shows up on the next read as Full, AlreadyRegistered or NotOpen
        for _ in 0..WRITE_ATTEMPTS {
            let mut event = self.load(id).await?;
            let attendee = event.register(user, input.notes.clone())?;
            if let Some(event) = self.repository.add_attendee(id, attendee).await? {
                info!(event_id = %id, user_id = %user, attendees = event.capacity.current_attendees, "Registered for event");
                return Ok(RegistrationResponse {
                    message: "Successfully registered for event".to_string(),
                    event,
                });
            }
        }
        Err(EventError::Contended)
    }

    #[instrument(skip(self))]
    pub async fn cancel_registration(&self, id: Uuid, user: Uuid) -> EventResult<MessageResponse> {
        let mut event = self.load(id).await?;
        event.cancel_registration(user)?;
        let event = self
            .repository
            .remove_attendee(id, user)
            .await?
            .ok_or(EventError::NotRegistered)?;

        info!(event_id = %id, user_id = %user, attendees = event.capacity.current_attendees, "Event registration cancelled");
        Ok(MessageResponse {
            message: "Successfully cancelled event registration".to_string(),
        })
    }

    async fn load(&self, id: Uuid) -> EventResult<Event> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(EventError::NotFound(id))
    }
}
