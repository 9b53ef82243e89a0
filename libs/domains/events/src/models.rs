//! Event domain models

use axum_helpers::SortOrder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::{EventError, EventResult};

/// Kind of gathering
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EventType {
    Exhibition,
    Workshop,
    Market,
    Competition,
    Networking,
    Online,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LocationType {
    Physical,
    Online,
    Hybrid,
}

/// Publication lifecycle
///
/// ```text
/// draft ──► published ──► completed
///   │           │
///   └───────────┴──► cancelled
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Draft,
    Published,
    Cancelled,
    Completed,
}

impl EventStatus {
    pub fn can_transition_to(self, next: EventStatus) -> bool {
        use EventStatus::*;
        matches!(
            (self, next),
            (Draft, Published) | (Draft, Cancelled) | (Published, Cancelled) | (Published, Completed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, EventStatus::Cancelled | EventStatus::Completed)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventLocation {
    #[serde(rename = "type")]
    pub location_type: LocationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub online_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceFrequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recurrence {
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<RecurrenceFrequency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    #[serde(with = "stored_instant")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "stored_instant")]
    pub end_date: DateTime<Utc>,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Free-form, e.g. "3 hours"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring: Option<Recurrence>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Capacity {
    /// Unlimited when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attendees: Option<u32>,
    /// Always equals `attendees.len()`
    #[serde(default)]
    pub current_attendees: u32,
    #[serde(default)]
    pub is_waitlist: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupDiscount {
    pub min_group_size: u32,
    pub discount_percentage: f64,
}

/// Ticket pricing; amounts in cents
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventPricing {
    #[serde(default = "default_true")]
    pub is_free: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub early_bird_price: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub early_bird_end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub group_discounts: Vec<GroupDiscount>,
}

impl Default for EventPricing {
    fn default() -> Self {
        Self {
            is_free: true,
            price: None,
            currency: default_currency(),
            early_bird_price: None,
            early_bird_end_date: None,
            group_discounts: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventImage {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    All,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Requirements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_level: Option<SkillLevel>,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AttendeeStatus {
    #[default]
    Registered,
    Attended,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub user: Uuid,
    pub registered_at: DateTime<Utc>,
    #[serde(default)]
    pub status: AttendeeStatus,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Sponsor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contribution: Option<String>,
}

/// Event document stored in the `events` collection
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub organizer: Uuid,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub location: EventLocation,
    pub schedule: Schedule,
    #[serde(default)]
    pub capacity: Capacity,
    #[serde(default)]
    pub pricing: EventPricing,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<EventImage>,
    #[serde(default)]
    pub requirements: Requirements,
    #[serde(default)]
    pub attendees: Vec<Attendee>,
    #[serde(default)]
    pub featured_artisans: Vec<Uuid>,
    #[serde(default)]
    pub sponsors: Vec<Sponsor>,
    #[serde(default)]
    pub status: EventStatus,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(with = "stored_instant")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "stored_instant")]
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn new(organizer: Uuid, input: CreateEvent) -> Self {
        let now = Utc::now();
        let mut event = Self {
            id: Uuid::now_v7(),
            title: input.title.trim().to_string(),
            description: input.description,
            organizer,
            event_type: input.event_type,
            location: input.location,
            schedule: input.schedule,
            capacity: input.capacity.unwrap_or_default(),
            pricing: input.pricing.unwrap_or_default(),
            categories: input.categories,
            tags: input.tags,
            images: input.images,
            requirements: input.requirements.unwrap_or_default(),
            attendees: Vec::new(),
            featured_artisans: input.featured_artisans,
            sponsors: input.sponsors,
            status: input.status.unwrap_or_default(),
            is_featured: false,
            created_at: now,
            updated_at: now,
        };
        event.sync_attendee_count();
        event
    }

    pub fn is_registered(&self, user: Uuid) -> bool {
        self.attendees.iter().any(|attendee| attendee.user == user)
    }

    pub fn is_full(&self) -> bool {
        self.capacity
            .max_attendees
            .is_some_and(|max| self.attendees.len() >= max as usize)
    }

    /// Cached count follows the attendee list
    pub fn sync_attendee_count(&mut self) {
        self.capacity.current_attendees = self.attendees.len() as u32;
    }

    /// Append `user` to the attendee list, returning the new record.
    ///
    /// Checks run in order: published, not already registered, not full.
    pub fn register(&mut self, user: Uuid, notes: Option<String>) -> EventResult<Attendee> {
        if self.status != EventStatus::Published {
            return Err(EventError::NotOpen);
        }
        if self.is_registered(user) {
            return Err(EventError::AlreadyRegistered);
        }
        if self.is_full() {
            return Err(EventError::Full);
        }

        let attendee = Attendee {
            user,
            registered_at: Utc::now(),
            status: AttendeeStatus::Registered,
            notes: notes.unwrap_or_default(),
        };
        self.attendees.push(attendee.clone());
        self.sync_attendee_count();
        Ok(attendee)
    }

    /// Remove `user` from the attendee list
    pub fn cancel_registration(&mut self, user: Uuid) -> EventResult<()> {
        let index = self
            .attendees
            .iter()
            .position(|attendee| attendee.user == user)
            .ok_or(EventError::NotRegistered)?;

        self.attendees.remove(index);
        self.sync_attendee_count();
        Ok(())
    }

    /// Apply an organizer edit. Attendees and the organizer are not editable.
    pub fn apply_update(&mut self, update: UpdateEvent) -> EventResult<()> {
        if let Some(next) = update.status {
            if next != self.status && !self.status.can_transition_to(next) {
                return Err(EventError::InvalidTransition {
                    from: self.status,
                    to: next,
                });
            }
        }
        if update
            .max_attendees
            .is_some_and(|max| (max as usize) < self.attendees.len())
        {
            return Err(EventError::Validation(
                "Max attendees cannot be less than the number of registered attendees"
                    .to_string(),
            ));
        }

        if let Some(title) = update.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(event_type) = update.event_type {
            self.event_type = event_type;
        }
        if let Some(location) = update.location {
            self.location = location;
        }
        if let Some(schedule) = update.schedule {
            self.schedule = schedule;
        }
        if let Some(max_attendees) = update.max_attendees {
            self.capacity.max_attendees = Some(max_attendees);
        }
        if let Some(is_waitlist) = update.is_waitlist {
            self.capacity.is_waitlist = is_waitlist;
        }
        if let Some(pricing) = update.pricing {
            self.pricing = pricing;
        }
        if let Some(categories) = update.categories {
            self.categories = categories;
        }
        if let Some(tags) = update.tags {
            self.tags = tags;
        }
        if let Some(images) = update.images {
            self.images = images;
        }
        if let Some(requirements) = update.requirements {
            self.requirements = requirements;
        }
        if let Some(featured_artisans) = update.featured_artisans {
            self.featured_artisans = featured_artisans;
        }
        if let Some(sponsors) = update.sponsors {
            self.sponsors = sponsors;
        }
        if let Some(status) = update.status {
            self.status = status;
        }

        if self.schedule.end_date < self.schedule.start_date {
            return Err(EventError::Validation(
                "End date must not precede start date".to_string(),
            ));
        }

        self.sync_attendee_count();
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// DTO for creating an event; the caller becomes the organizer
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "valid_new_event"))]
pub struct CreateEvent {
    #[validate(custom(function = "non_blank"), length(max = 200))]
    pub title: String,
    #[validate(custom(function = "non_blank"))]
    pub description: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub location: EventLocation,
    pub schedule: Schedule,
    #[serde(default)]
    pub capacity: Option<Capacity>,
    #[serde(default)]
    pub pricing: Option<EventPricing>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<EventImage>,
    #[serde(default)]
    pub requirements: Option<Requirements>,
    #[serde(default)]
    pub featured_artisans: Vec<Uuid>,
    #[serde(default)]
    pub sponsors: Vec<Sponsor>,
    /// `draft` (default) or `published`
    #[serde(default)]
    pub status: Option<EventStatus>,
}

/// DTO for editing an event; absent fields are left as stored
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEvent {
    #[validate(custom(function = "non_blank"), length(max = 200))]
    pub title: Option<String>,
    #[validate(custom(function = "non_blank"))]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<EventType>,
    pub location: Option<EventLocation>,
    pub schedule: Option<Schedule>,
    #[validate(range(min = 1))]
    pub max_attendees: Option<u32>,
    pub is_waitlist: Option<bool>,
    pub pricing: Option<EventPricing>,
    pub categories: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub images: Option<Vec<EventImage>>,
    pub requirements: Option<Requirements>,
    pub featured_artisans: Option<Vec<Uuid>>,
    pub sponsors: Option<Vec<Sponsor>>,
    pub status: Option<EventStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterForEvent {
    #[serde(default)]
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// `sortBy` for the event list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum EventSort {
    #[default]
    #[serde(rename = "schedule.startDate")]
    StartDate,
    #[serde(rename = "createdAt")]
    CreatedAt,
    #[serde(rename = "title")]
    Title,
}

impl EventSort {
    pub fn field(&self) -> &'static str {
        match self {
            EventSort::StartDate => "schedule.startDate",
            EventSort::CreatedAt => "createdAt",
            EventSort::Title => "title",
        }
    }
}

/// Query parameters for the published event list
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EventFilter {
    #[serde(rename = "type")]
    pub event_type: Option<EventType>,
    /// Comma-separated, any of which matches
    pub category: Option<String>,
    /// City substring, case-insensitive
    pub location: Option<String>,
    /// Earliest start date, inclusive
    pub start_date: Option<DateTime<Utc>>,
    /// Latest start date, inclusive
    pub end_date: Option<DateTime<Utc>>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub sort_by: Option<EventSort>,
    pub sort_order: Option<SortOrder>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventListResponse {
    pub events: Vec<Event>,
    pub total_pages: u64,
    pub current_page: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegistrationResponse {
    pub message: String,
    pub event: Event,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Dates are stored as fixed-width RFC 3339 strings with millisecond
/// precision so that lexical order in the collection is time order.
pub mod stored_instant {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// The stored form, also used for query bounds
    pub fn format(at: &DateTime<Utc>) -> String {
        at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(at))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        DateTime::<Utc>::deserialize(deserializer)
    }
}

fn default_true() -> bool {
    true
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn valid_new_event(event: &CreateEvent) -> Result<(), ValidationError> {
    if event.schedule.end_date < event.schedule.start_date {
        return Err(ValidationError::new("schedule")
            .with_message("End date must not precede start date".into()));
    }
    if event.status.is_some_and(|status| status.is_terminal()) {
        return Err(ValidationError::new("status")
            .with_message("New events start as draft or published".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn create_input() -> CreateEvent {
        serde_json::from_value(json!({
            "title": "Pottery Wheel Workshop",
            "description": "Learn to center and throw on the wheel",
            "type": "workshop",
            "location": { "type": "physical", "address": { "city": "San Francisco" } },
            "schedule": {
                "startDate": "2026-11-14T17:00:00Z",
                "endDate": "2026-11-14T20:00:00Z"
            },
            "capacity": { "maxAttendees": 2 },
            "pricing": { "isFree": false, "price": 7500 }
        }))
        .unwrap()
    }

    fn published() -> Event {
        let mut event = Event::new(Uuid::now_v7(), create_input());
        event.status = EventStatus::Published;
        event
    }

    #[test]
    fn test_new_event_defaults() {
        let event = Event::new(Uuid::now_v7(), create_input());
        assert_eq!(event.status, EventStatus::Draft);
        assert_eq!(event.schedule.timezone, "UTC");
        assert_eq!(event.capacity.current_attendees, 0);
        assert_eq!(event.pricing.price, Some(7500));
        assert!(!event.pricing.is_free);
    }

    #[test]
    fn test_register_until_full() {
        let mut event = published();
        event.register(Uuid::now_v7(), None).unwrap();
        event.register(Uuid::now_v7(), Some("vegetarian".to_string())).unwrap();

        let result = event.register(Uuid::now_v7(), None);
        assert!(matches!(result, Err(EventError::Full)));
        assert_eq!(event.capacity.current_attendees, 2);
        assert_eq!(event.attendees.len(), 2);
    }

    #[test]
    fn test_double_registration_is_conflict() {
        let mut event = published();
        let user = Uuid::now_v7();
        event.register(user, None).unwrap();

        assert!(matches!(
            event.register(user, None),
            Err(EventError::AlreadyRegistered)
        ));
        assert_eq!(event.capacity.current_attendees, 1);
    }

    #[test]
    fn test_register_requires_published() {
        let mut event = Event::new(Uuid::now_v7(), create_input());
        assert!(matches!(
            event.register(Uuid::now_v7(), None),
            Err(EventError::NotOpen)
        ));
    }

    #[test]
    fn test_unlimited_capacity() {
        let mut event = published();
        event.capacity.max_attendees = None;
        for _ in 0..5 {
            event.register(Uuid::now_v7(), None).unwrap();
        }
        assert_eq!(event.capacity.current_attendees, 5);
    }

    #[test]
    fn test_cancel_registration() {
        let mut event = published();
        let user = Uuid::now_v7();
        event.register(user, None).unwrap();
        event.cancel_registration(user).unwrap();

        assert!(event.attendees.is_empty());
        assert_eq!(event.capacity.current_attendees, 0);
        assert!(matches!(
            event.cancel_registration(user),
            Err(EventError::NotRegistered)
        ));
    }

    #[test]
    fn test_status_transitions() {
        use EventStatus::*;
        assert!(Draft.can_transition_to(Published));
        assert!(Draft.can_transition_to(Cancelled));
        assert!(Published.can_transition_to(Completed));
        assert!(!Draft.can_transition_to(Completed));
        assert!(!Cancelled.can_transition_to(Published));
        assert!(!Completed.can_transition_to(Draft));
    }

    #[test]
    fn test_apply_update_rejects_invalid_transition() {
        let mut event = Event::new(Uuid::now_v7(), create_input());
        event.status = EventStatus::Completed;

        let result = event.apply_update(UpdateEvent {
            status: Some(EventStatus::Published),
            title: Some("Renamed".to_string()),
            ..Default::default()
        });
        assert!(matches!(result, Err(EventError::InvalidTransition { .. })));
        assert_eq!(event.title, "Pottery Wheel Workshop");
    }

    #[test]
    fn test_apply_update_keeps_capacity_above_attendees() {
        let mut event = published();
        event.capacity.max_attendees = Some(5);
        for _ in 0..3 {
            event.register(Uuid::now_v7(), None).unwrap();
        }

        let result = event.apply_update(UpdateEvent {
            max_attendees: Some(1),
            ..Default::default()
        });
        assert!(matches!(result, Err(EventError::Validation(_))));
        assert_eq!(event.capacity.max_attendees, Some(5));

        event
            .apply_update(UpdateEvent {
                max_attendees: Some(3),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(event.capacity.max_attendees, Some(3));
        assert!(event.is_full());
    }

    #[test]
    fn test_stored_dates_sort_as_time() {
        let whole = "2026-11-14T16:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let half = "2026-11-14T16:00:00.5Z".parse::<DateTime<Utc>>().unwrap();

        assert_eq!(stored_instant::format(&whole), "2026-11-14T16:00:00.000Z");
        assert!(stored_instant::format(&whole) < stored_instant::format(&half));

        let event = Event::new(Uuid::now_v7(), create_input());
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["schedule"]["startDate"], "2026-11-14T17:00:00.000Z");
        let back: Event = serde_json::from_value(json).unwrap();
        assert_eq!(back.schedule.start_date, event.schedule.start_date);
    }

    #[test]
    fn test_apply_update_rejects_inverted_schedule() {
        let mut event = Event::new(Uuid::now_v7(), create_input());
        let mut schedule = event.schedule.clone();
        schedule.end_date = schedule.start_date - Duration::hours(1);

        let result = event.apply_update(UpdateEvent {
            schedule: Some(schedule),
            ..Default::default()
        });
        assert!(matches!(result, Err(EventError::Validation(_))));
    }

    #[test]
    fn test_create_validation() {
        assert!(create_input().validate().is_ok());

        let mut inverted = create_input();
        inverted.schedule.end_date = inverted.schedule.start_date - Duration::hours(2);
        assert!(inverted.validate().is_err());

        let mut completed = create_input();
        completed.status = Some(EventStatus::Completed);
        assert!(completed.validate().is_err());

        let mut blank = create_input();
        blank.description = " ".to_string();
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_unknown_location_type_is_rejected() {
        let mut body = serde_json::to_value(create_input()).unwrap();
        body["location"]["type"] = json!("underwater");
        assert!(serde_json::from_value::<CreateEvent>(body).is_err());
    }
}
