//! Product lookups needed at checkout

use async_trait::async_trait;
use database::mongodb::query::id_filter;
use domain_products::Product;
use mongodb::{Collection, Database};
use tracing::instrument;
use uuid::Uuid;

use crate::error::OrderResult;

/// The slice of a product an order line snapshots
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogProduct {
    pub id: Uuid,
    pub title: String,
    pub artisan: Uuid,
    /// Unit price in cents
    pub price: i64,
    pub available: bool,
}

impl From<Product> for CatalogProduct {
    fn from(product: Product) -> Self {
        Self {
            available: product.is_available(),
            id: product.id,
            title: product.title,
            artisan: product.artisan,
            price: product.price,
        }
    }
}

/// Read-only view of the product catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn find(&self, id: Uuid) -> OrderResult<Option<CatalogProduct>>;
}

/// Catalog backed by the `products` collection
#[derive(Clone)]
pub struct MongoProductCatalog {
    collection: Collection<Product>,
}

impl MongoProductCatalog {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection("products"),
        }
    }
}

#[async_trait]
impl ProductCatalog for MongoProductCatalog {
    #[instrument(skip(self))]
    async fn find(&self, id: Uuid) -> OrderResult<Option<CatalogProduct>> {
        let product = self.collection.find_one(id_filter(&id)).await?;
        Ok(product.map(CatalogProduct::from))
    }
}
