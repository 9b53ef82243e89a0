//! MongoDB implementation of AiRepository

use async_trait::async_trait;
use database::mongodb::query::{bson_of, id_filter};
use domain_products::Product;
use domain_users::User;
use futures_util::TryStreamExt;
use mongodb::bson::{Document, doc};
use mongodb::options::FindOptions;
use mongodb::{Collection, Database};
use tracing::instrument;
use uuid::Uuid;

use crate::error::AiResult;
use crate::repository::{
    APPRENTICE_MAX_EXPERIENCE, AiRepository, MENTOR_MIN_EXPERIENCE, MENTOR_MIN_RATING,
    PARTNER_MIN_RATING, UserMatch,
};

#[derive(Clone)]
pub struct MongoAiRepository {
    users: Collection<User>,
    products: Collection<Product>,
}

impl MongoAiRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            users: database.collection("users"),
            products: database.collection("products"),
        }
    }

    fn user_filter(criteria: &UserMatch, exclude: Option<Uuid>) -> Document {
        let mut filter = match criteria {
            UserMatch::Artisans { specialties } => doc! {
                "role": "artisan",
                "artisanProfile.specialties": { "$in": specialties.clone() },
                "artisanProfile.ratings.average": { "$gte": PARTNER_MIN_RATING },
            },
            UserMatch::Vendors { artisan_types } => doc! {
                "role": "vendor",
                "vendorProfile.preferredArtisanTypes": { "$in": artisan_types.clone() },
                "vendorProfile.vendorRating.average": { "$gte": PARTNER_MIN_RATING },
            },
            UserMatch::Mentors { specialties } => doc! {
                "role": "artisan",
                "artisanProfile.specialties": { "$in": specialties.clone() },
                "artisanProfile.experience": { "$gte": MENTOR_MIN_EXPERIENCE },
                "artisanProfile.ratings.average": { "$gte": MENTOR_MIN_RATING },
            },
            UserMatch::Apprentices { specialties } => doc! {
                "role": "artisan",
                "artisanProfile.specialties": { "$in": specialties.clone() },
                "artisanProfile.experience": { "$lte": APPRENTICE_MAX_EXPERIENCE },
            },
        };

        filter.insert("isActive", true);
        if let Some(id) = exclude {
            filter.insert("_id", doc! { "$ne": bson_of(&id) });
        }
        filter
    }

    async fn find_products(
        &self,
        filter: Document,
        sort: Option<Document>,
        limit: i64,
    ) -> AiResult<Vec<Product>> {
        let mut options = FindOptions::builder().limit(limit).build();
        options.sort = sort;
        let cursor = self.products.find(filter).with_options(options).await?;
        Ok(cursor.try_collect().await?)
    }
}

#[async_trait]
impl AiRepository for MongoAiRepository {
    #[instrument(skip(self))]
    async fn find_user(&self, id: Uuid) -> AiResult<Option<User>> {
        Ok(self.users.find_one(id_filter(&id)).await?)
    }

    #[instrument(skip(self))]
    async fn similar_products(
        &self,
        category: String,
        materials: Vec<String>,
        limit: i64,
    ) -> AiResult<Vec<Product>> {
        let filter = doc! {
            "category": category,
            "materials": { "$in": materials },
            "isActive": true,
        };
        self.find_products(filter, None, limit).await
    }

    #[instrument(skip(self))]
    async fn products_for(
        &self,
        categories: Vec<String>,
        min_price: i64,
        max_price: i64,
        limit: i64,
    ) -> AiResult<Vec<Product>> {
        let filter = doc! {
            "category": { "$in": categories },
            "price": { "$gte": min_price, "$lte": max_price },
            "isActive": true,
        };
        let sort = doc! { "ratings.average": -1, "views": -1 };
        self.find_products(filter, Some(sort), limit).await
    }

    #[instrument(skip(self))]
    async fn find_users(
        &self,
        criteria: UserMatch,
        exclude: Option<Uuid>,
        limit: i64,
    ) -> AiResult<Vec<User>> {
        let options = FindOptions::builder().limit(limit).build();
        let cursor = self
            .users
            .find(Self::user_filter(&criteria, exclude))
            .with_options(options)
            .await?;
        Ok(cursor.try_collect().await?)
    }
}
