//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use axum_helpers::{Pagination, SortOrder};
use chrono::Utc;
use database::mongodb::query::{bson_of, id_filter, in_csv, range};
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson, Document},
    options::{FindOptions, IndexOptions, ReturnDocument},
    Collection, Database, IndexModel,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, ProductFilter, Ratings, Review, UpdateProduct};
use crate::repository::ProductRepository;

/// MongoDB implementation of the ProductRepository
#[derive(Clone)]
pub struct MongoProductRepository {
    collection: Collection<Product>,
}

impl MongoProductRepository {
    /// Create a new MongoProductRepository
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<Product>("products");
        Self { collection }
    }

    /// Initialize indexes for optimal query performance
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let indexes = vec![
            // Text search on title, description and tags
            IndexModel::builder()
                .keys(doc! { "title": "text", "description": "text", "tags": "text" })
                .options(
                    IndexOptions::builder()
                        .name("idx_text_search".to_string())
                        .build(),
                )
                .build(),
            // Category + price for filtered listing
            IndexModel::builder()
                .keys(doc! { "category": 1, "price": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_category_price".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "artisan": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_artisan".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "isFeatured": 1, "isActive": 1, "createdAt": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_featured".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Product indexes created successfully");
        Ok(())
    }

    /// Build a MongoDB filter document from ProductFilter
    fn build_filter(filter: &ProductFilter) -> Document {
        let mut doc = doc! { "isActive": true };

        if let Some(category) = filter.category {
            doc.insert("category", category.to_string());
        }

        if let Some(ref artisan) = filter.artisan {
            doc.insert("artisan", bson_of(artisan));
        }

        if let Some(price) = range(filter.min_price, filter.max_price) {
            doc.insert("price", price);
        }

        if let Some(materials) = filter.materials.as_deref().and_then(in_csv) {
            doc.insert("materials", materials);
        }

        if let Some(colors) = filter.colors.as_deref().and_then(in_csv) {
            doc.insert("colors", colors);
        }

        if let Some(search) = filter.search.as_deref().map(str::trim) {
            if !search.is_empty() {
                doc.insert("$text", doc! { "$search": search });
            }
        }

        doc
    }

    fn build_sort(filter: &ProductFilter) -> Document {
        let field = filter.sort_by.unwrap_or_default().field();
        let order = filter.sort_order.unwrap_or(SortOrder::Desc);
        let mut sort = Document::new();
        sort.insert(field, order.direction());
        sort
    }

    /// `$set` body touching only the fields present in the update, so
    /// concurrent review, favorite and view writes are never overwritten.
    fn update_set(input: &UpdateProduct) -> ProductResult<Document> {
        let mut set = Document::new();
        if let Some(title) = &input.title {
            set.insert("title", title.trim());
        }
        if let Some(description) = &input.description {
            set.insert("description", description.as_str());
        }
        if let Some(category) = &input.category {
            set.insert("category", to_bson(category)?);
        }
        if let Some(subcategory) = &input.subcategory {
            set.insert("subcategory", subcategory.as_str());
        }
        if let Some(images) = &input.images {
            set.insert("images", to_bson(images)?);
        }
        if let Some(price) = input.price {
            set.insert("price", price);
        }
        if let Some(original_price) = input.original_price {
            set.insert("originalPrice", original_price);
        }
        if let Some(dimensions) = &input.dimensions {
            set.insert("dimensions", to_bson(dimensions)?);
        }
        if let Some(weight) = &input.weight {
            set.insert("weight", to_bson(weight)?);
        }
        if let Some(materials) = &input.materials {
            set.insert("materials", materials.clone());
        }
        if let Some(techniques) = &input.techniques {
            set.insert("techniques", techniques.clone());
        }
        if let Some(colors) = &input.colors {
            set.insert("colors", colors.clone());
        }
        if let Some(tags) = &input.tags {
            set.insert("tags", tags.clone());
        }
        if let Some(availability) = &input.availability {
            set.insert("availability", to_bson(availability)?);
        }
        if let Some(shipping) = &input.shipping {
            set.insert("shipping", to_bson(shipping)?);
        }
        if let Some(is_active) = input.is_active {
            set.insert("isActive", is_active);
        }
        set.insert("updatedAt", bson_of(&Utc::now()));
        Ok(set)
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, product), fields(product_title = %product.title))]
    async fn create(&self, product: Product) -> ProductResult<Product> {
        self.collection.insert_one(&product).await?;

        tracing::info!(product_id = %product.id, artisan_id = %product.artisan, "Product created successfully");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let product = self.collection.find_one(id_filter(&id)).await?;
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: ProductFilter, page: Pagination) -> ProductResult<Vec<Product>> {
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
        let products: Vec<Product> = cursor.try_collect().await?;

        Ok(products)
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: ProductFilter) -> ProductResult<u64> {
        let count = self
            .collection
            .count_documents(Self::build_filter(&filter))
            .await?;
        Ok(count)
    }

    #[instrument(skip(self))]
    async fn featured(&self, limit: i64) -> ProductResult<Vec<Product>> {
        let options = FindOptions::builder()
            .sort(doc! { "createdAt": -1 })
            .limit(limit)
            .build();

        let cursor = self
            .collection
            .find(doc! { "isFeatured": true, "isActive": true })
            .with_options(options)
            .await?;
        let products: Vec<Product> = cursor.try_collect().await?;

        Ok(products)
    }

    #[instrument(skip(self))]
    async fn increment_views(&self, id: Uuid) -> ProductResult<()> {
        self.collection
            .update_one(id_filter(&id), doc! { "$inc": { "views": 1 } })
            .await?;
        Ok(())
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product> {
        let update = doc! { "$set": Self::update_set(&input)? };

        let updated = self
            .collection
            .find_one_and_update(id_filter(&id), update)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        tracing::info!(product_id = %id, "Product updated successfully");
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let result = self.collection.delete_one(id_filter(&id)).await?;

        if result.deleted_count == 0 {
            return Err(ProductError::NotFound(id));
        }

        tracing::info!(product_id = %id, "Product deleted successfully");
        Ok(true)
    }

    #[instrument(skip(self, review), fields(user_id = %review.user, rating = review.rating))]
    async fn push_review(&self, id: Uuid, review: Review) -> ProductResult<Option<Product>> {
        let mut filter = id_filter(&id);
        filter.insert("reviews.user", doc! { "$ne": bson_of(&review.user) });

        let update = doc! {
            "$push": { "reviews": to_bson(&review)? },
            "$set": { "updatedAt": bson_of(&Utc::now()) }
        };

        let product = self
            .collection
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .await?;
        Ok(product)
    }

    #[instrument(skip(self, ratings))]
    async fn set_ratings(
        &self,
        id: Uuid,
        ratings: Ratings,
        review_count: usize,
    ) -> ProductResult<bool> {
        let mut filter = id_filter(&id);
        filter.insert(
            "$expr",
            doc! { "$eq": [{ "$size": "$reviews" }, review_count as i64] },
        );

        let result = self
            .collection
            .update_one(filter, doc! { "$set": { "ratings": to_bson(&ratings)? } })
            .await?;

        let applied = result.matched_count > 0;
        if applied {
            tracing::info!(product_id = %id, average = ratings.average, count = ratings.count, "Ratings recomputed");
        }
        Ok(applied)
    }

    #[instrument(skip(self))]
    async fn set_favorite(
        &self,
        id: Uuid,
        user: Uuid,
        favorited: bool,
    ) -> ProductResult<Option<Product>> {
        let update = if favorited {
            doc! { "$addToSet": { "favorites": bson_of(&user) } }
        } else {
            doc! { "$pull": { "favorites": bson_of(&user) } }
        };

        let product = self
            .collection
            .find_one_and_update(id_filter(&id), update)
            .return_document(ReturnDocument::After)
            .await?;
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProductCategory, ProductSort};

    #[test]
    fn test_build_filter_empty_lists_active_only() {
        let filter = ProductFilter::default();
        let doc = MongoProductRepository::build_filter(&filter);
        assert_eq!(doc.len(), 1);
        assert!(doc.get_bool("isActive").unwrap());
    }

    #[test]
    fn test_build_filter_with_category() {
        let filter = ProductFilter {
            category: Some(ProductCategory::Pottery),
            ..Default::default()
        };
        let doc = MongoProductRepository::build_filter(&filter);
        assert_eq!(doc.get_str("category").unwrap(), "pottery");
    }

    #[test]
    fn test_build_filter_with_price_range() {
        let filter = ProductFilter {
            min_price: Some(1000),
            max_price: Some(5000),
            ..Default::default()
        };
        let doc = MongoProductRepository::build_filter(&filter);
        let price = doc.get_document("price").unwrap();
        assert_eq!(price.get_i64("$gte").unwrap(), 1000);
        assert_eq!(price.get_i64("$lte").unwrap(), 5000);
    }

    #[test]
    fn test_build_filter_with_csv_lists_and_search() {
        let filter = ProductFilter {
            materials: Some("silver,gold".to_string()),
            colors: Some("blue".to_string()),
            search: Some("bowl".to_string()),
            ..Default::default()
        };
        let doc = MongoProductRepository::build_filter(&filter);
        assert!(doc.contains_key("materials"));
        assert!(doc.contains_key("colors"));
        assert_eq!(
            doc.get_document("$text").unwrap().get_str("$search").unwrap(),
            "bowl"
        );
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let filter = ProductFilter {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(!MongoProductRepository::build_filter(&filter).contains_key("$text"));
    }

    #[test]
    fn test_update_set_only_touches_present_fields() {
        let input = UpdateProduct {
            title: Some("  Blue bowl ".to_string()),
            price: Some(4200),
            is_active: Some(false),
            ..Default::default()
        };
        let set = MongoProductRepository::update_set(&input).unwrap();

        assert_eq!(set.get_str("title").unwrap(), "Blue bowl");
        assert_eq!(set.get_i64("price").unwrap(), 4200);
        assert!(!set.get_bool("isActive").unwrap());
        assert!(set.contains_key("updatedAt"));
        assert_eq!(set.len(), 4);
        for untouched in ["reviews", "ratings", "favorites", "views", "artisan"] {
            assert!(!set.contains_key(untouched));
        }
    }

    #[test]
    fn test_update_set_stores_enums_lowercase() {
        let input = UpdateProduct {
            category: Some(ProductCategory::Glass),
            ..Default::default()
        };
        let set = MongoProductRepository::update_set(&input).unwrap();
        assert_eq!(set.get_str("category").unwrap(), "glass");
    }

    #[test]
    fn test_build_sort_defaults_to_newest() {
        let sort = MongoProductRepository::build_sort(&ProductFilter::default());
        assert_eq!(sort.get_i32("createdAt").unwrap(), -1);

        let by_price = MongoProductRepository::build_sort(&ProductFilter {
            sort_by: Some(ProductSort::Price),
            sort_order: Some(SortOrder::Asc),
            ..Default::default()
        });
        assert_eq!(by_price.get_i32("price").unwrap(), 1);
    }
}
