//! Events Domain
//!
//! Exhibitions, workshops and markets organized by members, with an
//! embedded attendee list whose cached count is recomputed on every
//! registration change.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   Registration Flow                      │
//! ├──────────────────────────────────────────────────────────┤
//! │                                                          │
//! │  POST /events/{id}/register                              │
//! │        │                                                 │
//! │        ▼                                                 │
//! │  load event ─► Event::register ─► conditional $push      │
//! │                  │                 published, unlisted,  │
//! │                  │                 seat free, count      │
//! │                  │                 resynced in place     │
//! │                  ├─ not published  → 400                 │
//! │                  ├─ already listed → 400                 │
//! │                  └─ at capacity    → 400                 │
//! │                                                          │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod error;
pub mod handlers;
mod models;
mod mongodb;
mod repository;
mod service;

pub use error::{EventError, EventResult};
pub use handlers::{ApiDoc, router};
pub use models::{
    Attendee, AttendeeStatus, Capacity, CreateEvent, Event, EventFilter, EventLocation,
    EventPricing, EventStatus, EventType, LocationType, Schedule, UpdateEvent,
};
pub use mongodb::MongoEventRepository;
pub use repository::EventRepository;
pub use service::EventService;
