//! AI service layer: prompt building, reply parsing and role-based matching

use chrono::Utc;
use domain_users::{PublicUserProfile, RoleProfile};
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AiError, AiResult};
use crate::generator::{GenerationRequest, TextGenerator};
use crate::models::{
    ContentType, GenerateContentRequest, GeneratedContent, MarketAnalysis, MentorshipRequest,
    MentorshipResponse, PriceSuggestion, RecommendationResponse, Recommendations, SeekerType,
    SuggestPriceRequest, TranscribeRequest, TranscribeResponse,
};
use crate::repository::{AiRepository, UserMatch};
use crate::transcriber::Transcriber;

pub const PRICING_SYSTEM_PROMPT: &str = "You are an expert pricing consultant for handmade artisan products. Provide fair, market-appropriate pricing suggestions with clear reasoning.";
pub const COPYWRITER_SYSTEM_PROMPT: &str = "You are a creative marketing copywriter specializing in handmade artisan products. Create engaging, authentic content that tells the story of craftsmanship.";

const PRICING_MAX_TOKENS: u32 = 300;
const CONTENT_MAX_TOKENS: u32 = 500;
const PRICING_CONFIDENCE: f64 = 0.85;

/// Comparable products consulted for a price suggestion
pub const SIMILAR_PRODUCTS_LIMIT: i64 = 10;
pub const RECOMMENDATION_LIMIT: i64 = 8;
pub const MENTORSHIP_LIMIT: i64 = 5;

/// Customer price range when none is saved (cents)
pub const DEFAULT_MAX_PRICE: i64 = 100_000;

static DOLLAR_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(\d+(?:\.\d{2})?)").unwrap());

pub struct AiService<R: AiRepository> {
    repository: Arc<R>,
    generator: Arc<dyn TextGenerator>,
    transcriber: Arc<dyn Transcriber>,
}

impl<R: AiRepository> AiService<R> {
    pub fn new(
        repository: R,
        generator: Arc<dyn TextGenerator>,
        transcriber: Arc<dyn Transcriber>,
    ) -> Self {
        Self {
            repository: Arc::new(repository),
            generator,
            transcriber,
        }
    }

    #[instrument(skip(self, input))]
    pub async fn transcribe(&self, input: TranscribeRequest) -> AiResult<TranscribeResponse> {
        let audio_url = input
            .audio_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| AiError::Validation("Audio URL is required".to_string()))?;

        let transcript = self.transcriber.transcribe(&audio_url).await?;
        Ok(TranscribeResponse {
            transcription: transcript.text,
            confidence: transcript.confidence,
        })
    }

    #[instrument(skip(self, input), fields(category = %input.category))]
    pub async fn suggest_price(&self, input: SuggestPriceRequest) -> AiResult<PriceSuggestion> {
        input.validate()?;

        let similar = self
            .repository
            .similar_products(
                input.category.clone(),
                input.materials.clone(),
                SIMILAR_PRODUCTS_LIMIT,
            )
            .await?;
        let prices: Vec<i64> = similar.iter().map(|product| product.price).collect();
        let market = MarketAnalysis::from_prices(&prices);

        let reasoning = self
            .generator
            .generate(GenerationRequest {
                system: PRICING_SYSTEM_PROMPT.to_string(),
                prompt: pricing_prompt(&input, &market),
                max_tokens: PRICING_MAX_TOKENS,
            })
            .await?;

        let suggested_price = extract_price(&reasoning).unwrap_or(market.average_price);
        info!(
            suggested_price,
            similar_products = market.similar_products,
            "Price suggested"
        );

        Ok(PriceSuggestion {
            suggested_price,
            confidence: PRICING_CONFIDENCE,
            reasoning,
            market_analysis: market,
        })
    }

    #[instrument(skip(self, input), fields(content_type = %input.content_type))]
    pub async fn generate_content(
        &self,
        input: GenerateContentRequest,
    ) -> AiResult<GeneratedContent> {
        input.validate()?;

        let content = self
            .generator
            .generate(GenerationRequest {
                system: COPYWRITER_SYSTEM_PROMPT.to_string(),
                prompt: content_prompt(&input),
                max_tokens: CONTENT_MAX_TOKENS,
            })
            .await?;

        Ok(GeneratedContent {
            content,
            content_type: input.content_type,
            generated_at: Utc::now(),
        })
    }

    #[instrument(skip(self))]
    pub async fn recommendations(&self, user_id: Uuid) -> AiResult<RecommendationResponse> {
        let user = self
            .repository
            .find_user(user_id)
            .await?
            .ok_or(AiError::UserNotFound(user_id))?;

        let recommendations = match user.details {
            RoleProfile::Customer { customer_profile } => {
                let preferences = customer_profile.preferences;
                let (min, max) = preferences
                    .price_range
                    .map(|range| (range.min, range.max))
                    .unwrap_or((0, DEFAULT_MAX_PRICE));
                let products = self
                    .repository
                    .products_for(
                        preferences.favorite_categories,
                        min,
                        max,
                        RECOMMENDATION_LIMIT,
                    )
                    .await?;
                Recommendations::Products(products)
            }
            RoleProfile::Vendor { vendor_profile } => {
                let criteria = UserMatch::Artisans {
                    specialties: vendor_profile.preferred_artisan_types,
                };
                Recommendations::Users(self.public_users(criteria, None, RECOMMENDATION_LIMIT).await?)
            }
            RoleProfile::Artisan { artisan_profile } => {
                let criteria = UserMatch::Vendors {
                    artisan_types: artisan_profile.specialties,
                };
                Recommendations::Users(self.public_users(criteria, None, RECOMMENDATION_LIMIT).await?)
            }
        };

        info!(user_id = %user_id, count = recommendations.len(), "Recommendations generated");
        Ok(RecommendationResponse {
            kind: recommendations.kind(),
            recommendations,
            generated_at: Utc::now(),
        })
    }

    #[instrument(skip(self, input), fields(seeker_type = %input.seeker_type))]
    pub async fn mentorship_match(
        &self,
        caller: Uuid,
        input: MentorshipRequest,
    ) -> AiResult<MentorshipResponse> {
        let specialties = input.specialty.clone();
        let criteria = match input.seeker_type {
            SeekerType::Apprentice => UserMatch::Mentors { specialties },
            SeekerType::Mentor => UserMatch::Apprentices { specialties },
        };

        let matches = self
            .public_users(criteria, Some(caller), MENTORSHIP_LIMIT)
            .await?;

        Ok(MentorshipResponse {
            matches,
            seeker_type: input.seeker_type,
            specialty: input.specialty,
            generated_at: Utc::now(),
        })
    }

    async fn public_users(
        &self,
        criteria: UserMatch,
        exclude: Option<Uuid>,
        limit: i64,
    ) -> AiResult<Vec<PublicUserProfile>> {
        let users = self.repository.find_users(criteria, exclude, limit).await?;
        Ok(users.into_iter().map(PublicUserProfile::from).collect())
    }
}

/// First `$12` or `$12.34` in the reply, in cents
pub fn extract_price(text: &str) -> Option<i64> {
    let amount = DOLLAR_AMOUNT.captures(text)?.get(1)?.as_str();
    let (dollars, cents) = amount.split_once('.').unwrap_or((amount, "0"));
    let dollars: i64 = dollars.parse().ok()?;
    let cents: i64 = cents.parse().ok()?;
    dollars.checked_mul(100)?.checked_add(cents)
}

fn dollars(cents: i64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

fn pricing_prompt(input: &SuggestPriceRequest, market: &MarketAnalysis) -> String {
    let market_lines = if market.similar_products == 0 {
        "- No comparable products found".to_string()
    } else {
        format!(
            "- Average similar product price: {}\n- Price range: {} - {}",
            dollars(market.average_price),
            dollars(market.price_range.min),
            dollars(market.price_range.max),
        )
    };
    let experience = input
        .artisan_experience
        .map(|years| format!("{years} years"))
        .unwrap_or_else(|| "not specified".to_string());

    format!(
        "Analyze this handmade product and suggest a fair price:

Title: {title}
Description: {description}
Category: {category}
Materials: {materials}
Dimensions: {dimensions}
Techniques: {techniques}
Artisan Experience: {experience}

Market Analysis:
{market_lines}

Consider factors like:
- Material costs
- Time investment
- Skill level
- Market demand
- Uniqueness

Provide a suggested price with reasoning.",
        title = input.title,
        description = input.description,
        category = input.category,
        materials = input.materials.join(", "),
        dimensions = input.dimensions.as_deref().unwrap_or("not specified"),
        techniques = input.techniques.join(", "),
    )
}

fn content_prompt(input: &GenerateContentRequest) -> String {
    let materials = input.materials.join(", ");
    match input.content_type {
        ContentType::SocialMedia => format!(
            "Create engaging social media posts for this handmade product:
Title: {}
Description: {}
Category: {}
Materials: {materials}

Create 3 different social media posts (Instagram, Facebook, Twitter) that highlight the craftsmanship and story behind this product.",
            input.product_title, input.product_description, input.category,
        ),
        ContentType::ProductDescription => format!(
            "Write compelling product descriptions for this handmade item:
Title: {}
Current Description: {}
Category: {}
Materials: {materials}

Create 3 different product descriptions that appeal to different customer segments.",
            input.product_title, input.product_description, input.category,
        ),
        ContentType::MarketingCopy => format!(
            "Create marketing copy for this artisan product:
Title: {}
Description: {}
Category: {}
Materials: {materials}

Generate email marketing copy, website banner text, and promotional content.",
            input.product_title, input.product_description, input.category,
        ),
    }
}
