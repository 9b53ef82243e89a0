//! Request and response shapes for the AI endpoints

use chrono::{DateTime, Utc};
use domain_products::Product;
use domain_users::PublicUserProfile;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TranscribeRequest {
    #[serde(default)]
    pub audio_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TranscribeResponse {
    pub transcription: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuggestPriceRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub dimensions: Option<String>,
    #[serde(default)]
    pub techniques: Vec<String>,
    /// Years
    #[serde(default)]
    #[validate(range(min = 0, max = 100))]
    pub artisan_experience: Option<u32>,
}

/// Cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct PriceBounds {
    pub min: i64,
    pub max: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarketAnalysis {
    /// Cents, rounded
    pub average_price: i64,
    pub price_range: PriceBounds,
    pub similar_products: usize,
}

impl MarketAnalysis {
    /// Statistics over comparable prices; all zero when there are none.
    pub fn from_prices(prices: &[i64]) -> Self {
        let (Some(min), Some(max)) = (prices.iter().min(), prices.iter().max()) else {
            return Self::default();
        };
        let count = prices.len() as i64;
        let sum: i64 = prices.iter().sum();

        Self {
            average_price: (2 * sum + count).div_euclid(2 * count),
            price_range: PriceBounds {
                min: *min,
                max: *max,
            },
            similar_products: prices.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceSuggestion {
    /// Cents
    pub suggested_price: i64,
    pub confidence: f64,
    pub reasoning: String,
    pub market_analysis: MarketAnalysis,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContentType {
    #[default]
    SocialMedia,
    ProductDescription,
    MarketingCopy,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    #[validate(length(min = 1, max = 200))]
    pub product_title: String,
    #[serde(default)]
    pub product_description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub content_type: ContentType,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub content: String,
    pub content_type: ContentType,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RecommendationKind {
    Products,
    Users,
}

/// Products for customers, business partners for everyone else
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum Recommendations {
    Products(Vec<Product>),
    Users(Vec<PublicUserProfile>),
}

impl Recommendations {
    pub fn kind(&self) -> RecommendationKind {
        match self {
            Recommendations::Products(_) => RecommendationKind::Products,
            Recommendations::Users(_) => RecommendationKind::Users,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Recommendations::Products(products) => products.len(),
            Recommendations::Users(users) => users.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    pub recommendations: Recommendations,
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SeekerType {
    /// Looking for a master artisan
    Apprentice,
    /// Looking for someone to teach
    Mentor,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MentorshipRequest {
    pub seeker_type: SeekerType,
    #[serde(default)]
    pub specialty: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MentorshipResponse {
    pub matches: Vec<PublicUserProfile>,
    pub seeker_type: SeekerType,
    pub specialty: Vec<String>,
    pub generated_at: DateTime<Utc>,
}
