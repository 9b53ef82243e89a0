//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use axum_helpers::{Pagination, SortOrder};
use chrono::Utc;
use database::mongodb::query::{bson_of, contains_ci, id_filter, in_csv};
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc, to_bson},
    options::{FindOptions, IndexOptions, ReturnDocument},
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::UserResult;
use crate::models::{ArtisanFilter, Profile, RoleProfile, User, VendorFilter};
use crate::repository::UserRepository;

/// MongoDB implementation of the UserRepository
#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<User>("users"),
        }
    }

    /// Create the unique email index and the directory lookup indexes
    pub async fn init_indexes(&self) -> UserResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_email_unique".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "role": 1, "isActive": 1, "createdAt": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_role_active".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "artisanProfile.specialties": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_artisan_specialties".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("User indexes created successfully");
        Ok(())
    }

    fn build_artisan_filter(filter: &ArtisanFilter) -> Document {
        let mut doc = doc! { "role": "artisan", "isActive": true };

        if let Some(specialties) = filter.specialty.as_deref().and_then(in_csv) {
            doc.insert("artisanProfile.specialties", specialties);
        }
        if let Some(ref location) = filter.location {
            doc.insert("profile.location.city", contains_ci(location));
        }
        if let Some(min_rating) = filter.min_rating {
            doc.insert("artisanProfile.ratings.average", doc! { "$gte": min_rating });
        }
        if let Some(experience) = filter.experience {
            doc.insert("artisanProfile.experience", doc! { "$gte": experience });
        }

        doc
    }

    fn build_vendor_filter(filter: &VendorFilter) -> Document {
        let mut doc = doc! { "role": "vendor", "isActive": true };

        if let Some(ref business_type) = filter.business_type {
            doc.insert("vendorProfile.businessType", business_type.as_str());
        }
        if let Some(ref location) = filter.location {
            doc.insert("profile.location.city", contains_ci(location));
        }
        if let Some(min_rating) = filter.min_rating {
            doc.insert("vendorProfile.vendorRating.average", doc! { "$gte": min_rating });
        }

        doc
    }

    async fn find_page(
        &self,
        filter: Document,
        sort: Document,
        page: Pagination,
    ) -> UserResult<Vec<User>> {
        let options = FindOptions::builder()
            .sort(sort)
            .skip(page.skip())
            .limit(page.limit as i64)
            .build();

        let cursor = self.collection.find(filter).with_options(options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn update_and_fetch(&self, id: Uuid, mut set: Document) -> UserResult<Option<User>> {
        set.insert("updatedAt", bson_of(&Utc::now()));

        let user = self
            .collection
            .find_one_and_update(id_filter(&id), doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?;
        Ok(user)
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create(&self, user: User) -> UserResult<User> {
        self.collection.insert_one(&user).await?;
        tracing::info!(user_id = %user.id, role = %user.role(), "User registered");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        Ok(self.collection.find_one(id_filter(&id)).await?)
    }

    #[instrument(skip(self))]
    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }

    #[instrument(skip(self))]
    async fn exists_by_email(&self, email: &str) -> UserResult<bool> {
        let count = self
            .collection
            .count_documents(doc! { "email": email })
            .await?;
        Ok(count > 0)
    }

    #[instrument(skip(self, profile))]
    async fn update_profile(&self, id: Uuid, profile: Profile) -> UserResult<Option<User>> {
        let user = self
            .update_and_fetch(id, doc! { "profile": to_bson(&profile)? })
            .await?;
        tracing::info!(user_id = %id, "Profile updated");
        Ok(user)
    }

    #[instrument(skip(self, details), fields(role = %details.role()))]
    async fn update_role_profile(
        &self,
        id: Uuid,
        details: RoleProfile,
    ) -> UserResult<Option<User>> {
        let set = match details {
            RoleProfile::Artisan { artisan_profile } => {
                doc! { "artisanProfile": to_bson(&artisan_profile)? }
            }
            RoleProfile::Vendor { vendor_profile } => {
                doc! { "vendorProfile": to_bson(&vendor_profile)? }
            }
            RoleProfile::Customer { customer_profile } => {
                doc! { "customerProfile": to_bson(&customer_profile)? }
            }
        };

        let user = self.update_and_fetch(id, set).await?;
        tracing::info!(user_id = %id, "Role profile updated");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn set_avatar(&self, id: Uuid, avatar_url: String) -> UserResult<()> {
        self.update_and_fetch(id, doc! { "profile.avatar": avatar_url })
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn touch_last_login(&self, id: Uuid) -> UserResult<()> {
        self.collection
            .update_one(
                id_filter(&id),
                doc! { "$set": { "lastLogin": bson_of(&Utc::now()) } },
            )
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_artisans(
        &self,
        filter: ArtisanFilter,
        page: Pagination,
    ) -> UserResult<Vec<User>> {
        let sort_by = filter.sort_by.unwrap_or_default();
        let order = filter.sort_order.unwrap_or(SortOrder::Desc);
        let mut sort = Document::new();
        sort.insert(sort_by.field(), order.direction());

        self.find_page(Self::build_artisan_filter(&filter), sort, page)
            .await
    }

    #[instrument(skip(self))]
    async fn count_artisans(&self, filter: ArtisanFilter) -> UserResult<u64> {
        let count = self
            .collection
            .count_documents(Self::build_artisan_filter(&filter))
            .await?;
        Ok(count)
    }

    #[instrument(skip(self))]
    async fn list_vendors(&self, filter: VendorFilter, page: Pagination) -> UserResult<Vec<User>> {
        self.find_page(
            Self::build_vendor_filter(&filter),
            doc! { "createdAt": -1 },
            page,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn count_vendors(&self, filter: VendorFilter) -> UserResult<u64> {
        let count = self
            .collection
            .count_documents(Self::build_vendor_filter(&filter))
            .await?;
        Ok(count)
    }
}
