//! Sample marketplace data.

use chrono::{Duration, Utc};
use domain_events::{CreateEvent, Event};
use domain_products::{CreateProduct, Product};
use domain_users::models::{Location, PriceRange};
use domain_users::{
    ArtisanProfile, CustomerProfile, Profile, RatingSummary, Role, RoleProfile, User,
    VendorProfile,
};
use serde_json::json;

pub const PASSWORD: &str = "password123";

fn profile(first_name: &str, last_name: &str, city: &str, state: &str, bio: &str) -> Profile {
    Profile {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        bio: Some(bio.to_string()),
        location: Some(Location {
            city: Some(city.to_string()),
            state: Some(state.to_string()),
            country: Some("USA".to_string()),
            coordinates: None,
        }),
        ..Profile::default()
    }
}

fn account(email: &str, password_hash: &str, profile: Profile, details: RoleProfile) -> User {
    let mut user = User::new(
        email.to_string(),
        password_hash.to_string(),
        details.role(),
        profile,
    );
    user.details = details;
    user.is_verified = true;
    user
}

fn artisan(specialties: &[&str], experience: i32, rating: f64, count: i64, story: &str) -> RoleProfile {
    RoleProfile::Artisan {
        artisan_profile: ArtisanProfile {
            story: Some(story.to_string()),
            specialties: specialties.iter().map(|s| s.to_string()).collect(),
            experience,
            ratings: RatingSummary {
                average: rating,
                count,
            },
            ..ArtisanProfile::default()
        },
    }
}

fn vendor(business_name: &str, business_type: &str, artisan_types: &[&str], rating: f64) -> RoleProfile {
    RoleProfile::Vendor {
        vendor_profile: VendorProfile {
            business_name: Some(business_name.to_string()),
            business_type: Some(business_type.to_string()),
            preferred_artisan_types: artisan_types.iter().map(|s| s.to_string()).collect(),
            vendor_rating: RatingSummary {
                average: rating,
                count: 20,
            },
            ..VendorProfile::default()
        },
    }
}

fn customer(categories: &[&str], min: i64, max: i64) -> RoleProfile {
    let mut customer_profile = CustomerProfile::default();
    customer_profile.preferences.favorite_categories =
        categories.iter().map(|s| s.to_string()).collect();
    customer_profile.preferences.price_range = Some(PriceRange { min, max });
    RoleProfile::Customer { customer_profile }
}

/// Three artisans, two vendors and two customers, all sharing one password hash
pub fn users(password_hash: &str) -> Vec<User> {
    vec![
        account(
            "sarah.chen@example.com",
            password_hash,
            profile("Sarah", "Chen", "San Francisco", "CA", "Ceramic artist working in stoneware and porcelain."),
            artisan(
                &["pottery", "ceramics"],
                15,
                4.8,
                42,
                "I learned to throw on my grandmother's wheel and never stopped.",
            ),
        ),
        account(
            "marcus.rodriguez@example.com",
            password_hash,
            profile("Marcus", "Rodriguez", "Austin", "TX", "Silversmith making one-off rings and pendants."),
            artisan(
                &["jewelry", "metalwork"],
                8,
                4.9,
                31,
                "Every piece starts as a sketch at my kitchen table.",
            ),
        ),
        account(
            "emily.johnson@example.com",
            password_hash,
            profile("Emily", "Johnson", "Portland", "OR", "Weaver and natural dyer."),
            artisan(
                &["textiles", "weaving"],
                12,
                4.7,
                27,
                "My dyes come from plants I grow in my own garden.",
            ),
        ),
        account(
            "buyer@craftgallery.example.com",
            password_hash,
            profile("Craft", "Gallery", "Seattle", "WA", "Independent gallery for handmade goods."),
            vendor("Craft Gallery", "retailer", &["pottery", "textiles"], 4.6),
        ),
        account(
            "orders@modernliving.example.com",
            password_hash,
            profile("Modern", "Living", "Los Angeles", "CA", "Home goods wholesaler."),
            vendor("Modern Living", "wholesaler", &["ceramics", "woodwork"], 4.8),
        ),
        account(
            "jennifer.smith@example.com",
            password_hash,
            profile("Jennifer", "Smith", "New York", "NY", "Collector of handmade ceramics."),
            customer(&["pottery", "jewelry"], 2000, 30000),
        ),
        account(
            "michael.brown@example.com",
            password_hash,
            profile("Michael", "Brown", "Chicago", "IL", "Always looking for unique gifts."),
            customer(&["textiles", "woodwork"], 1000, 20000),
        ),
    ]
}

fn find<'a>(users: &'a [User], first_name: &str) -> eyre::Result<&'a User> {
    users
        .iter()
        .find(|user| user.profile.first_name == first_name)
        .ok_or_else(|| eyre::eyre!("seed user {first_name} is missing"))
}

/// One listing per artisan
pub fn products(artisans: &[User]) -> eyre::Result<Vec<Product>> {
    let listings = [
        (
            "Sarah",
            json!({
                "title": "Hand-Thrown Ceramic Bowl Set",
                "description": "Set of four stoneware bowls thrown on the wheel and finished in a celadon glaze.",
                "category": "pottery",
                "images": [{ "url": "https://images.example.com/bowl-set.jpg", "isPrimary": true }],
                "price": 8500,
                "materials": ["stoneware", "celadon glaze"],
                "techniques": ["wheel throwing"],
                "colors": ["green"],
                "tags": ["kitchen", "tableware"],
                "availability": { "inStock": true, "quantity": 5 },
                "shipping": { "shippingCost": 1200, "processingTime": "3-5 business days" }
            }),
        ),
        (
            "Marcus",
            json!({
                "title": "Hammered Silver Ring",
                "description": "Sterling silver band with a hand-hammered texture.",
                "category": "jewelry",
                "images": [{ "url": "https://images.example.com/silver-ring.jpg", "isPrimary": true }],
                "price": 6500,
                "materials": ["sterling silver"],
                "techniques": ["forging", "hammering"],
                "tags": ["ring", "gift"],
                "availability": {
                    "inStock": true,
                    "quantity": 10,
                    "isCustomizable": true,
                    "customOptions": [
                        { "name": "Size", "type": "size", "options": ["6", "7", "8", "9"], "priceModifier": 0 }
                    ]
                },
                "shipping": { "freeShipping": true }
            }),
        ),
        (
            "Emily",
            json!({
                "title": "Handwoven Wool Throw",
                "description": "Merino wool throw woven on a floor loom and dyed with indigo.",
                "category": "textiles",
                "images": [{ "url": "https://images.example.com/wool-throw.jpg", "isPrimary": true }],
                "price": 18000,
                "materials": ["merino wool", "indigo"],
                "techniques": ["weaving", "natural dyeing"],
                "colors": ["blue"],
                "tags": ["home", "blanket"],
                "availability": { "inStock": true, "quantity": 3 }
            }),
        ),
    ];

    listings
        .into_iter()
        .map(|(first_name, body)| {
            let artisan = find(artisans, first_name)?;
            let input: CreateProduct = serde_json::from_value(body)?;
            let mut product = Product::new(artisan.id, input);
            product.is_featured = true;
            Ok(product)
        })
        .collect()
}

/// A market run by a vendor and a paid workshop run by an artisan
pub fn events(artisans: &[User], vendors: &[User]) -> eyre::Result<Vec<Event>> {
    let sarah = find(artisans, "Sarah")?;
    let gallery = find(vendors, "Craft")?;

    let market_start = Utc::now() + Duration::days(30);
    let workshop_start = Utc::now() + Duration::days(14);

    let market: CreateEvent = serde_json::from_value(json!({
        "title": "Spring Artisan Market",
        "description": "Local makers selling pottery, jewelry and textiles direct to the public.",
        "type": "market",
        "location": {
            "type": "physical",
            "address": { "street": "100 Pike St", "city": "Seattle", "state": "WA", "country": "USA" }
        },
        "schedule": {
            "startDate": market_start.to_rfc3339(),
            "endDate": (market_start + Duration::hours(8)).to_rfc3339(),
            "timezone": "America/Los_Angeles"
        },
        "capacity": { "maxAttendees": 500 },
        "pricing": { "isFree": true },
        "categories": ["pottery", "jewelry", "textiles"],
        "tags": ["market", "spring"],
        "featuredArtisans": artisans.iter().map(|a| a.id).collect::<Vec<_>>(),
        "status": "published"
    }))?;

    let workshop: CreateEvent = serde_json::from_value(json!({
        "title": "Pottery Wheel Workshop",
        "description": "Learn centering, opening and pulling walls on the wheel.",
        "type": "workshop",
        "location": {
            "type": "physical",
            "address": { "city": "San Francisco", "state": "CA", "country": "USA" }
        },
        "schedule": {
            "startDate": workshop_start.to_rfc3339(),
            "endDate": (workshop_start + Duration::hours(3)).to_rfc3339(),
            "timezone": "America/Los_Angeles",
            "duration": "3 hours"
        },
        "capacity": { "maxAttendees": 12 },
        "pricing": { "isFree": false, "price": 7500 },
        "categories": ["pottery"],
        "tags": ["workshop", "beginner"],
        "requirements": { "skillLevel": "beginner", "materials": ["apron"] },
        "status": "published"
    }))?;

    let mut market = Event::new(gallery.id, market);
    market.is_featured = true;
    let workshop = Event::new(sarah.id, workshop);

    Ok(vec![market, workshop])
}
