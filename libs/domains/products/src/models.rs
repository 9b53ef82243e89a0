use axum_helpers::SortOrder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Craft category
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProductCategory {
    Pottery,
    Jewelry,
    Textiles,
    Woodwork,
    Metalwork,
    Glass,
    Leather,
    Ceramics,
    Sculpture,
    Other,
}

/// Product image
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    #[validate(length(min = 1))]
    pub url: String,
    /// Alternative text for accessibility
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Dimensions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default = "default_length_unit")]
    pub unit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Weight {
    pub value: f64,
    #[serde(default = "default_weight_unit")]
    pub unit: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CustomOptionType {
    Text,
    Color,
    Size,
    Material,
}

/// A buyer-selectable customization
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomOption {
    pub name: String,
    #[serde(rename = "type")]
    pub option_type: CustomOptionType,
    #[serde(default)]
    pub options: Vec<String>,
    /// Cents added to the unit price
    #[serde(default)]
    pub price_modifier: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductAvailability {
    #[serde(default = "default_true")]
    pub in_stock: bool,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    #[serde(default)]
    pub is_customizable: bool,
    #[serde(default)]
    pub custom_options: Vec<CustomOption>,
}

impl Default for ProductAvailability {
    fn default() -> Self {
        Self {
            in_stock: true,
            quantity: default_quantity(),
            is_customizable: false,
            custom_options: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
    /// Grams
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    /// Cents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_cost: Option<i64>,
    #[serde(default)]
    pub free_shipping: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<String>,
}

/// Review counts per star value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct RatingBreakdown {
    pub five: i64,
    pub four: i64,
    pub three: i64,
    pub two: i64,
    pub one: i64,
}

impl RatingBreakdown {
    pub fn total(&self) -> i64 {
        self.five + self.four + self.three + self.two + self.one
    }
}

/// Rating aggregate, always derived from the review list
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct Ratings {
    pub average: f64,
    pub count: i64,
    #[serde(default)]
    pub breakdown: RatingBreakdown,
}

impl Ratings {
    /// Recompute average, count and histogram from the full review list.
    pub fn from_reviews(reviews: &[Review]) -> Self {
        let mut breakdown = RatingBreakdown::default();
        let mut sum = 0_i64;

        for review in reviews {
            sum += i64::from(review.rating);
            match review.rating {
                5 => breakdown.five += 1,
                4 => breakdown.four += 1,
                3 => breakdown.three += 1,
                2 => breakdown.two += 1,
                _ => breakdown.one += 1,
            }
        }

        let count = reviews.len() as i64;
        let average = if count == 0 {
            0.0
        } else {
            sum as f64 / count as f64
        };

        Self {
            average,
            count,
            breakdown,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub user: Uuid,
    /// 1 to 5
    pub rating: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Product document stored in the `products` collection
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    /// Owning artisan
    pub artisan: Uuid,
    pub title: String,
    pub description: String,
    pub category: ProductCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    /// Price in cents
    pub price: i64,
    /// Pre-discount price in cents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<i64>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Weight>,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub techniques: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub availability: ProductAvailability,
    #[serde(default)]
    pub shipping: ShippingInfo,
    #[serde(default)]
    pub ratings: Ratings,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub views: i64,
    /// Users who favorited this product
    #[serde(default)]
    pub favorites: Vec<Uuid>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(artisan: Uuid, input: CreateProduct) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            artisan,
            title: input.title.trim().to_string(),
            description: input.description,
            category: input.category,
            subcategory: input.subcategory,
            images: input.images,
            price: input.price,
            original_price: input.original_price,
            currency: input.currency.unwrap_or_else(default_currency),
            dimensions: input.dimensions,
            weight: input.weight,
            materials: input.materials,
            techniques: input.techniques,
            colors: input.colors,
            tags: input.tags,
            availability: input.availability.unwrap_or_default(),
            shipping: input.shipping.unwrap_or_default(),
            ratings: Ratings::default(),
            reviews: Vec::new(),
            views: 0,
            favorites: Vec::new(),
            is_featured: false,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Purchasable right now
    pub fn is_available(&self) -> bool {
        self.is_active && self.availability.in_stock && self.availability.quantity > 0
    }

    pub fn has_review_from(&self, user: Uuid) -> bool {
        self.reviews.iter().any(|review| review.user == user)
    }

    pub fn is_favorited_by(&self, user: Uuid) -> bool {
        self.favorites.contains(&user)
    }
}

/// DTO for listing a new product
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    #[validate(custom(function = "non_blank"), length(max = 200))]
    pub title: String,
    #[validate(custom(function = "non_blank"), length(max = 5000))]
    pub description: String,
    pub category: ProductCategory,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[validate(length(min = 1, message = "At least one image is required"), nested)]
    pub images: Vec<ProductImage>,
    /// Cents
    #[validate(range(min = 0))]
    pub price: i64,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub original_price: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
    #[serde(default)]
    pub weight: Option<Weight>,
    pub materials: Vec<String>,
    #[serde(default)]
    pub techniques: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub availability: Option<ProductAvailability>,
    #[serde(default)]
    pub shipping: Option<ShippingInfo>,
}

/// DTO for editing a product; absent fields are left as stored
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    #[validate(custom(function = "non_blank"), length(max = 200))]
    pub title: Option<String>,
    #[validate(custom(function = "non_blank"), length(max = 5000))]
    pub description: Option<String>,
    pub category: Option<ProductCategory>,
    pub subcategory: Option<String>,
    #[validate(length(min = 1), nested)]
    pub images: Option<Vec<ProductImage>>,
    #[validate(range(min = 0))]
    pub price: Option<i64>,
    #[validate(range(min = 0))]
    pub original_price: Option<i64>,
    pub dimensions: Option<Dimensions>,
    pub weight: Option<Weight>,
    pub materials: Option<Vec<String>>,
    pub techniques: Option<Vec<String>>,
    pub colors: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub availability: Option<ProductAvailability>,
    pub shipping: Option<ShippingInfo>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct AddReview {
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub comment: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// `sortBy` for the product list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum ProductSort {
    #[default]
    #[serde(rename = "createdAt")]
    CreatedAt,
    #[serde(rename = "price")]
    Price,
    #[serde(rename = "title")]
    Title,
    #[serde(rename = "views")]
    Views,
    #[serde(rename = "ratings.average")]
    Rating,
}

impl ProductSort {
    pub fn field(&self) -> &'static str {
        match self {
            ProductSort::CreatedAt => "createdAt",
            ProductSort::Price => "price",
            ProductSort::Title => "title",
            ProductSort::Views => "views",
            ProductSort::Rating => "ratings.average",
        }
    }
}

/// Query parameters for filtering products
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductFilter {
    pub category: Option<ProductCategory>,
    /// Owning artisan
    pub artisan: Option<Uuid>,
    /// Cents, inclusive
    pub min_price: Option<i64>,
    /// Cents, inclusive
    pub max_price: Option<i64>,
    /// Comma-separated, any of which matches
    pub materials: Option<String>,
    /// Comma-separated, any of which matches
    pub colors: Option<String>,
    /// Full-text search over title, description and tags
    pub search: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub sort_by: Option<ProductSort>,
    pub sort_order: Option<SortOrder>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductListResponse {
    pub products: Vec<Product>,
    pub total_pages: u64,
    pub current_page: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteResponse {
    pub is_favorited: bool,
    pub favorites_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

fn default_true() -> bool {
    true
}

fn default_quantity() -> i32 {
    1
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_length_unit() -> String {
    "cm".to_string()
}

fn default_weight_unit() -> String {
    "g".to_string()
}

fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
