//! Event repository trait

use async_trait::async_trait;
use axum_helpers::Pagination;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::EventResult;
use crate::models::{Attendee, Event, EventFilter, EventStatus};

/// Repository trait for event storage operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Store a new event
    async fn create(&self, event: Event) -> EventResult<Event>;

    /// Get event by ID
    async fn get_by_id(&self, id: Uuid) -> EventResult<Option<Event>>;

    /// Published events matching the filter, one page
    async fn list(&self, filter: EventFilter, page: Pagination) -> EventResult<Vec<Event>>;

    /// Count published events matching the filter
    async fn count(&self, filter: EventFilter) -> EventResult<u64>;

    /// Featured published events starting at or after `from`, soonest first
    async fn featured(&self, from: DateTime<Utc>, limit: i64) -> EventResult<Vec<Event>>;

    /// Append `attendee` and resync the cached count in one write.
    ///
    /// `None` unless the event is still published, has a free seat and does
    /// not list the user yet.
    async fn add_attendee(&self, id: Uuid, attendee: Attendee) -> EventResult<Option<Event>>;

    /// Drop `user` from the attendee list and resync the cached count.
    /// `None` when the user is not listed.
    async fn remove_attendee(&self, id: Uuid, user: Uuid) -> EventResult<Option<Event>>;

    /// Write the organizer-editable fields of `event`, leaving attendees untouched.
    ///
    /// `None` when the stored status is no longer `from` or the attendee
    /// count has grown past the new capacity.
    async fn update_details(&self, event: &Event, from: EventStatus)
        -> EventResult<Option<Event>>;
}
