use axum_helpers::SortOrder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Account role, fixed at registration
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Artisan,
    Vendor,
    Customer,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SocialMedia {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
}

/// Personal details shared by every role
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[validate(custom(function = "non_blank"))]
    pub first_name: String,
    #[validate(custom(function = "non_blank"))]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500))]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_media: Option<SocialMedia>,
}

/// Average/count pair maintained from reviews, never client-writable
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct RatingSummary {
    #[serde(default)]
    pub average: f64,
    #[serde(default)]
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioItem {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Cents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PricingPreferences {
    /// Cents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<i64>,
    #[serde(default)]
    pub custom_pricing: bool,
    #[serde(default)]
    pub bulk_discounts: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_hours: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ArtisanProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 5000))]
    pub story: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_story_url: Option<String>,
    #[serde(default)]
    pub specialties: Vec<String>,
    /// Years of experience
    #[serde(default)]
    #[validate(range(min = 0, max = 100))]
    pub experience: i32,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub portfolio: Vec<PortfolioItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_preferences: Option<PricingPreferences>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<Availability>,
    #[serde(default)]
    pub ratings: RatingSummary,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkOrderPreferences {
    /// Cents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_order_value: Option<i64>,
    #[serde(default)]
    pub preferred_categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_terms: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VendorProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200))]
    pub business_name: Option<String>,
    /// retailer, wholesaler, distributor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_license: Option<String>,
    #[serde(default)]
    pub preferred_artisan_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bulk_order_preferences: Option<BulkOrderPreferences>,
    #[serde(default)]
    pub vendor_rating: RatingSummary,
}

/// Inclusive price bounds in cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PriceRange {
    pub min: i64,
    pub max: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPreferences {
    #[serde(default)]
    pub favorite_categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<PriceRange>,
    #[serde(default)]
    pub preferred_artisans: Vec<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "valid_price_range"))]
pub struct CustomerProfile {
    #[serde(default)]
    pub preferences: CustomerPreferences,
    #[serde(default)]
    pub wishlist: Vec<Uuid>,
    #[serde(default)]
    pub order_history: Vec<Uuid>,
}

/// Role together with its role-specific sub-document.
///
/// Flattened into [`User`], so a stored document carries `role` plus exactly
/// one of `artisanProfile`, `vendorProfile` or `customerProfile`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum RoleProfile {
    Artisan {
        #[serde(rename = "artisanProfile", default)]
        artisan_profile: ArtisanProfile,
    },
    Vendor {
        #[serde(rename = "vendorProfile", default)]
        vendor_profile: VendorProfile,
    },
    Customer {
        #[serde(rename = "customerProfile", default)]
        customer_profile: CustomerProfile,
    },
}

impl RoleProfile {
    /// Empty sub-document for a freshly registered account
    pub fn empty(role: Role) -> Self {
        match role {
            Role::Artisan => RoleProfile::Artisan {
                artisan_profile: ArtisanProfile::default(),
            },
            Role::Vendor => RoleProfile::Vendor {
                vendor_profile: VendorProfile::default(),
            },
            Role::Customer => RoleProfile::Customer {
                customer_profile: CustomerProfile::default(),
            },
        }
    }

    pub fn role(&self) -> Role {
        match self {
            RoleProfile::Artisan { .. } => Role::Artisan,
            RoleProfile::Vendor { .. } => Role::Vendor,
            RoleProfile::Customer { .. } => Role::Customer,
        }
    }

    /// Carry the stored rating aggregate over to a client-supplied replacement.
    pub fn keep_ratings_from(&mut self, stored: &RoleProfile) {
        match (self, stored) {
            (
                RoleProfile::Artisan { artisan_profile },
                RoleProfile::Artisan {
                    artisan_profile: old,
                },
            ) => artisan_profile.ratings = old.ratings,
            (
                RoleProfile::Vendor { vendor_profile },
                RoleProfile::Vendor {
                    vendor_profile: old,
                },
            ) => vendor_profile.vendor_rating = old.vendor_rating,
            _ => {}
        }
    }
}

/// User document as stored in the `users` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub email: String,
    /// Argon2 PHC string
    pub password: String,
    pub profile: Profile,
    #[serde(flatten)]
    pub details: RoleProfile,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: String, password_hash: String, role: Role, profile: Profile) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            email: normalize_email(&email),
            password: password_hash,
            profile,
            details: RoleProfile::empty(role),
            is_verified: false,
            is_active: true,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn role(&self) -> Role {
        self.details.role()
    }
}

/// Account view returned to its owner; no password
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub email: String,
    pub profile: Profile,
    #[serde(flatten)]
    pub details: RoleProfile,
    pub is_verified: bool,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            profile: user.profile,
            details: user.details,
            is_verified: user.is_verified,
            is_active: user.is_active,
            last_login: user.last_login,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Account view visible to anyone; no password, no email
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicUserProfile {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub profile: Profile,
    #[serde(flatten)]
    pub details: RoleProfile,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            profile: user.profile,
            details: user.details,
            is_verified: user.is_verified,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub role: Role,
    #[validate(nested)]
    pub profile: Profile,
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Partial update of the shared profile; absent fields are left as stored
#[derive(Debug, Clone, Default, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[validate(custom(function = "non_blank"))]
    pub first_name: Option<String>,
    #[validate(custom(function = "non_blank"))]
    pub last_name: Option<String>,
    pub avatar: Option<String>,
    #[validate(length(max = 500))]
    pub bio: Option<String>,
    pub location: Option<Location>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub social_media: Option<SocialMedia>,
}

impl ProfileUpdate {
    pub fn apply_to(self, profile: &mut Profile) {
        if let Some(first_name) = self.first_name {
            profile.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = self.last_name {
            profile.last_name = last_name.trim().to_string();
        }
        if let Some(avatar) = self.avatar {
            profile.avatar = Some(avatar);
        }
        if let Some(bio) = self.bio {
            profile.bio = Some(bio);
        }
        if let Some(location) = self.location {
            profile.location = Some(location);
        }
        if let Some(phone) = self.phone {
            profile.phone = Some(phone);
        }
        if let Some(website) = self.website {
            profile.website = Some(website);
        }
        if let Some(social_media) = self.social_media {
            profile.social_media = Some(social_media);
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct UpdateProfile {
    #[validate(nested)]
    pub profile: ProfileUpdate,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvatarResponse {
    pub avatar_url: String,
}

/// `sortBy` for the artisan directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ArtisanSort {
    #[default]
    CreatedAt,
    Experience,
    Rating,
}

impl ArtisanSort {
    pub fn field(&self) -> &'static str {
        match self {
            ArtisanSort::CreatedAt => "createdAt",
            ArtisanSort::Experience => "artisanProfile.experience",
            ArtisanSort::Rating => "artisanProfile.ratings.average",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ArtisanFilter {
    /// Comma-separated specialties, any of which matches
    pub specialty: Option<String>,
    /// Case-insensitive city substring
    pub location: Option<String>,
    pub min_rating: Option<f64>,
    /// Minimum years of experience
    pub experience: Option<i32>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub sort_by: Option<ArtisanSort>,
    pub sort_order: Option<SortOrder>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct VendorFilter {
    pub business_type: Option<String>,
    /// Case-insensitive city substring
    pub location: Option<String>,
    pub min_rating: Option<f64>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArtisanListResponse {
    pub artisans: Vec<PublicUserProfile>,
    pub total_pages: u64,
    pub current_page: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VendorListResponse {
    pub vendors: Vec<PublicUserProfile>,
    pub total_pages: u64,
    pub current_page: u64,
    pub total: u64,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn default_true() -> bool {
    true
}

fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn valid_price_range(profile: &CustomerProfile) -> Result<(), ValidationError> {
    match profile.preferences.price_range {
        Some(range) if range.min < 0 || range.max < range.min => {
            Err(ValidationError::new("price_range"))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn artisan() -> User {
        let mut user = User::new(
            "  Sarah@Example.COM ".to_string(),
            "$argon2id$hash".to_string(),
            Role::Artisan,
            Profile {
                first_name: "Sarah".to_string(),
                last_name: "Chen".to_string(),
                ..Default::default()
            },
        );
        if let RoleProfile::Artisan { artisan_profile } = &mut user.details {
            artisan_profile.specialties = vec!["pottery".to_string()];
            artisan_profile.ratings = RatingSummary {
                average: 4.8,
                count: 10,
            };
        }
        user
    }

    #[test]
    fn test_new_user_normalizes_email() {
        assert_eq!(artisan().email, "sarah@example.com");
    }

    #[test]
    fn test_role_profile_is_flattened_into_document() {
        let value = serde_json::to_value(artisan()).unwrap();
        assert_eq!(value["role"], "artisan");
        assert_eq!(value["artisanProfile"]["specialties"][0], "pottery");
        assert!(value.get("vendorProfile").is_none());
        assert!(value.get("_id").is_some());
    }

    #[test]
    fn test_user_document_round_trips_through_role_tag() {
        let value = json!({
            "_id": Uuid::now_v7(),
            "email": "marcus@example.com",
            "password": "$argon2id$hash",
            "role": "vendor",
            "profile": { "firstName": "Marcus", "lastName": "Rodriguez" },
            "vendorProfile": { "businessName": "Craft Gallery", "vendorRating": { "average": 4.6, "count": 3 } },
            "createdAt": "2024-03-01T10:00:00Z",
            "updatedAt": "2024-03-01T10:00:00Z"
        });
        let user: User = serde_json::from_value(value).unwrap();
        assert_eq!(user.role(), Role::Vendor);
        assert!(user.is_active);
        match user.details {
            RoleProfile::Vendor { vendor_profile } => {
                assert_eq!(vendor_profile.business_name.as_deref(), Some("Craft Gallery"));
                assert_eq!(vendor_profile.vendor_rating.count, 3);
            }
            other => panic!("unexpected profile {other:?}"),
        }
    }

    #[test]
    fn test_public_profile_never_serializes_email_or_password() {
        let value = serde_json::to_value(PublicUserProfile::from(artisan())).unwrap();
        assert!(value.get("email").is_none());
        assert!(value.get("password").is_none());
        assert_eq!(value["profile"]["firstName"], "Sarah");

        let own = serde_json::to_value(UserResponse::from(artisan())).unwrap();
        assert_eq!(own["email"], "sarah@example.com");
        assert!(own.get("password").is_none());
    }

    #[test]
    fn test_keep_ratings_from_stored_profile() {
        let stored = artisan().details;
        let mut incoming = RoleProfile::Artisan {
            artisan_profile: ArtisanProfile {
                experience: 16,
                ratings: RatingSummary {
                    average: 5.0,
                    count: 999,
                },
                ..Default::default()
            },
        };
        incoming.keep_ratings_from(&stored);

        let RoleProfile::Artisan { artisan_profile } = incoming else {
            panic!("role changed");
        };
        assert_eq!(artisan_profile.experience, 16);
        assert_eq!(artisan_profile.ratings.count, 10);
    }

    #[test]
    fn test_profile_update_validation() {
        let blank = UpdateProfile {
            profile: ProfileUpdate {
                first_name: Some("   ".to_string()),
                ..Default::default()
            },
        };
        assert!(blank.validate().is_err());

        let long_bio = UpdateProfile {
            profile: ProfileUpdate {
                bio: Some("x".repeat(501)),
                ..Default::default()
            },
        };
        assert!(long_bio.validate().is_err());
    }

    #[test]
    fn test_register_request_rejects_short_password() {
        let request: RegisterRequest = serde_json::from_value(json!({
            "email": "jen@example.com",
            "password": "123",
            "role": "customer",
            "profile": { "firstName": "Jennifer", "lastName": "Smith" }
        }))
        .unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let result = serde_json::from_value::<RegisterRequest>(json!({
            "email": "x@example.com",
            "password": "password123",
            "role": "admin",
            "profile": { "firstName": "X", "lastName": "Y" }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_artisan_sort_fields() {
        assert_eq!(ArtisanSort::Rating.field(), "artisanProfile.ratings.average");
        let sort: ArtisanSort = serde_json::from_str("\"createdAt\"").unwrap();
        assert_eq!(sort, ArtisanSort::CreatedAt);
    }
}
