//! MongoDB implementation of EventRepository

use async_trait::async_trait;
use axum_helpers::{Pagination, SortOrder};
use chrono::{DateTime, Utc};
use database::mongodb::query::{bson_of, contains_ci, id_filter, in_csv};
use futures_util::TryStreamExt;
use mongodb::bson::{Bson, Document, doc, to_bson};
use mongodb::options::{FindOptions, IndexOptions, ReturnDocument};
use mongodb::{Collection, Database, IndexModel};
use tracing::instrument;
use uuid::Uuid;

use crate::error::EventResult;
use crate::models::{Attendee, Event, EventFilter, EventStatus, stored_instant};
use crate::repository::EventRepository;

/// MongoDB-based event repository
#[derive(Clone)]
pub struct MongoEventRepository {
    collection: Collection<Event>,
}

impl MongoEventRepository {
    /// Create a new MongoDB event repository
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection("events"),
        }
    }

    /// Create indexes for efficient querying
    pub async fn create_indexes(&self) -> EventResult<()> {
        let indexes = vec![
            // Published listing ordered by start date
            IndexModel::builder()
                .keys(doc! { "status": 1, "schedule.startDate": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_status_start".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "isFeatured": 1, "status": 1, "schedule.startDate": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_featured".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "categories": 1 })
                .build(),
            IndexModel::builder()
                .keys(doc! { "organizer": 1 })
                .build(),
            IndexModel::builder()
                .keys(doc! { "attendees.user": 1 })
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Event indexes created successfully");
        Ok(())
    }

    /// Build filter document from EventFilter
    fn build_filter(filter: &EventFilter) -> Document {
        let mut doc = doc! { "status": EventStatus::Published.to_string() };

        if let Some(event_type) = filter.event_type {
            doc.insert("type", event_type.to_string());
        }

        if let Some(categories) = filter.category.as_deref().and_then(in_csv) {
            doc.insert("categories", categories);
        }

        if let Some(city) = filter.location.as_deref().filter(|c| !c.trim().is_empty()) {
            doc.insert("location.address.city", contains_ci(city));
        }

        // Start date window
        let mut start = Document::new();
        if let Some(from) = filter.start_date {
            start.insert("$gte", stored_instant::format(&from));
        }
        if let Some(to) = filter.end_date {
            start.insert("$lte", stored_instant::format(&to));
        }
        if !start.is_empty() {
            doc.insert("schedule.startDate", start);
        }

        doc
    }

    fn build_sort(filter: &EventFilter) -> Document {
        let field = filter.sort_by.unwrap_or_default().field();
        let order = filter.sort_order.unwrap_or(SortOrder::Asc);
        let mut sort = Document::new();
        sort.insert(field, order.direction());
        sort
    }

    /// Published, not yet listing `user`, and below capacity when one is set
    fn registration_filter(id: Uuid, user: Uuid) -> Document {
        let mut filter = id_filter(&id);
        filter.insert("status", EventStatus::Published.to_string());
        filter.insert("attendees.user", doc! { "$ne": bson_of(&user) });
        filter.insert(
            "$or",
            vec![
                doc! { "capacity.maxAttendees": Bson::Null },
                doc! { "$expr": { "$lt": [{ "$size": "$attendees" }, "$capacity.maxAttendees"] } },
            ],
        );
        filter
    }

    fn registration_update(attendee: &Attendee) -> EventResult<Vec<Document>> {
        // $literal keeps user-supplied notes from being read as expressions
        let attendee = to_bson(attendee)?;
        Ok(vec![
            doc! {
                "$set": {
                    "attendees": { "$concatArrays": ["$attendees", [{ "$literal": attendee }]] },
                    "updatedAt": stored_instant::format(&Utc::now()),
                }
            },
            Self::resync_count(),
        ])
    }

    fn cancellation_update(user: Uuid) -> Vec<Document> {
        vec![
            doc! {
                "$set": {
                    "attendees": {
                        "$filter": {
                            "input": "$attendees",
                            "cond": { "$ne": ["$$this.user", bson_of(&user)] },
                        }
                    },
                    "updatedAt": stored_instant::format(&Utc::now()),
                }
            },
            Self::resync_count(),
        ]
    }

    /// Cached count follows the attendee list inside the same write
    fn resync_count() -> Document {
        doc! { "$set": { "capacity.currentAttendees": { "$size": "$attendees" } } }
    }

    /// Filter and `$set` for an organizer edit. Attendees and the organizer
    /// are never written.
    fn details_update(event: &Event, from: EventStatus) -> EventResult<(Document, Document)> {
        let mut filter = id_filter(&event.id);
        filter.insert("status", from.to_string());

        let mut set = doc! {
            "title": event.title.as_str(),
            "description": event.description.as_str(),
            "type": event.event_type.to_string(),
            "location": to_bson(&event.location)?,
            "schedule": to_bson(&event.schedule)?,
            "capacity.isWaitlist": event.capacity.is_waitlist,
            "pricing": to_bson(&event.pricing)?,
            "categories": event.categories.clone(),
            "tags": event.tags.clone(),
            "images": to_bson(&event.images)?,
            "requirements": to_bson(&event.requirements)?,
            "featuredArtisans": to_bson(&event.featured_artisans)?,
            "sponsors": to_bson(&event.sponsors)?,
            "status": event.status.to_string(),
            "updatedAt": stored_instant::format(&event.updated_at),
        };
        if let Some(max) = event.capacity.max_attendees {
            set.insert("capacity.maxAttendees", i64::from(max));
            filter.insert(
                "$expr",
                doc! { "$lte": [{ "$size": "$attendees" }, i64::from(max)] },
            );
        }

        Ok((filter, doc! { "$set": set }))
    }
}

#[async_trait]
impl EventRepository for MongoEventRepository {
    #[instrument(skip(self, event), fields(event_id = %event.id, title = %event.title))]
    async fn create(&self, event: Event) -> EventResult<Event> {
        self.collection.insert_one(&event).await?;
        tracing::info!(organizer_id = %event.organizer, "Event created");
        Ok(event)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> EventResult<Option<Event>> {
        let event = self.collection.find_one(id_filter(&id)).await?;
        Ok(event)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: EventFilter, page: Pagination) -> EventResult<Vec<Event>> {
        let options = FindOptions::builder()
            .sort(Self::build_sort(&filter))
            .skip(page.skip())
            .limit(page.limit as i64)
            .build();

        let cursor = self
            .collection
            .find(Self::build_filter(&filter))
            .with_options(options)
            .await?;
        let events: Vec<Event> = cursor.try_collect().await?;
        Ok(events)
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: EventFilter) -> EventResult<u64> {
        let count = self
            .collection
            .count_documents(Self::build_filter(&filter))
            .await?;
        Ok(count)
    }

    #[instrument(skip(self))]
    async fn featured(&self, from: DateTime<Utc>, limit: i64) -> EventResult<Vec<Event>> {
        let filter = doc! {
            "isFeatured": true,
            "status": EventStatus::Published.to_string(),
            "schedule.startDate": { "$gte": stored_instant::format(&from) },
        };
        let options = FindOptions::builder()
            .sort(doc! { "schedule.startDate": 1 })
            .limit(limit)
            .build();

        let cursor = self.collection.find(filter).with_options(options).await?;
        let events: Vec<Event> = cursor.try_collect().await?;
        Ok(events)
    }

    #[instrument(skip(self, attendee), fields(user_id = %attendee.user))]
    async fn add_attendee(&self, id: Uuid, attendee: Attendee) -> EventResult<Option<Event>> {
        let event = self
            .collection
            .find_one_and_update(
                Self::registration_filter(id, attendee.user),
                Self::registration_update(&attendee)?,
            )
            .return_document(ReturnDocument::After)
            .await?;
        Ok(event)
    }

    #[instrument(skip(self))]
    async fn remove_attendee(&self, id: Uuid, user: Uuid) -> EventResult<Option<Event>> {
        let mut filter = id_filter(&id);
        filter.insert("attendees.user", bson_of(&user));

        let event = self
            .collection
            .find_one_and_update(filter, Self::cancellation_update(user))
            .return_document(ReturnDocument::After)
            .await?;
        Ok(event)
    }

    #[instrument(skip(self, event), fields(event_id = %event.id, status = %event.status))]
    async fn update_details(
        &self,
        event: &Event,
        from: EventStatus,
    ) -> EventResult<Option<Event>> {
        let (filter, update) = Self::details_update(event, from)?;
        let updated = self
            .collection
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .await?;

        if updated.is_some() {
            tracing::info!("Event updated");
        }
        Ok(updated)
    }
}
