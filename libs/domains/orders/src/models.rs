//! Order domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::error::{OrderError, OrderResult};

/// Orders over this subtotal ship free (cents)
pub const FREE_SHIPPING_THRESHOLD: i64 = 10_000;

/// Flat shipping charge below the threshold (cents)
pub const FLAT_SHIPPING: i64 = 1_500;

/// Sales tax, percent of subtotal
pub const TAX_PERCENT: i64 = 8;

/// Fulfilment status
///
/// ```text
/// pending ─► confirmed ─► in_production ─► shipped ─► delivered
///    │           │
///    └───────────┴─► cancelled | refunded
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    InProduction,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Pending, Refunded)
                | (Confirmed, InProduction)
                | (Confirmed, Cancelled)
                | (Confirmed, Refunded)
                | (InProduction, Shipped)
                | (Shipped, Delivered)
        )
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Refunded,
}

/// A buyer's choice for one of the product's custom options
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customization {
    pub option: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_modifier: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product: Uuid,
    pub quantity: u32,
    /// Unit price in cents at checkout time
    pub price: i64,
    #[serde(default)]
    pub customizations: Vec<Customization>,
}

impl OrderItem {
    /// `None` when the line does not fit in an `i64` of cents
    pub fn line_total(&self) -> Option<i64> {
        self.price.checked_mul(i64::from(self.quantity))
    }
}

/// Price breakdown in cents; `total = subtotal + shipping + tax - discount`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct Pricing {
    pub subtotal: i64,
    pub shipping: i64,
    pub tax: i64,
    #[serde(default)]
    pub discount: i64,
    pub total: i64,
}

impl Pricing {
    /// `None` on `i64` overflow
    pub fn for_subtotal(subtotal: i64) -> Option<Self> {
        let shipping = if subtotal > FREE_SHIPPING_THRESHOLD {
            0
        } else {
            FLAT_SHIPPING
        };
        // Round half up
        let tax = subtotal
            .checked_mul(TAX_PERCENT)?
            .checked_add(50)?
            .div_euclid(100);
        let total = subtotal.checked_add(shipping)?.checked_add(tax)?;

        Some(Self {
            subtotal,
            shipping,
            tax,
            discount: 0,
            total,
        })
    }

    pub fn from_items(items: &[OrderItem]) -> OrderResult<Self> {
        items
            .iter()
            .try_fold(0i64, |subtotal, item| subtotal.checked_add(item.line_total()?))
            .and_then(Self::for_subtotal)
            .ok_or_else(|| OrderError::Validation("Order total is too large".to_string()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShippingDetails {
    pub address: ShippingAddress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_delivery: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_delivery: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct OrderNotes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artisan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal: Option<String>,
}

/// Append-only status log entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TimelineEntry {
    pub status: OrderStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Order document stored in the `orders` collection
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    /// `ART-<epoch millis>-<sequence>`, assigned once
    pub order_number: String,
    pub customer: Uuid,
    /// Owner of the first line item's product
    pub artisan: Uuid,
    pub items: Vec<OrderItem>,
    pub pricing: Pricing,
    pub shipping: ShippingDetails,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment: Payment,
    #[serde(default)]
    pub notes: OrderNotes,
    #[serde(default)]
    pub timeline: Vec<TimelineEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn new(
        order_number: String,
        customer: Uuid,
        artisan: Uuid,
        items: Vec<OrderItem>,
        shipping: ShippingDetails,
        customer_note: Option<String>,
    ) -> OrderResult<Self> {
        let now = Utc::now();
        Ok(Self {
            id: Uuid::now_v7(),
            order_number,
            customer,
            artisan,
            pricing: Pricing::from_items(&items)?,
            items,
            shipping,
            status: OrderStatus::Pending,
            payment: Payment::default(),
            notes: OrderNotes {
                customer: customer_note,
                ..Default::default()
            },
            timeline: vec![TimelineEntry {
                status: OrderStatus::Pending,
                timestamp: now,
                note: Some("Order created".to_string()),
            }],
            created_at: now,
            updated_at: now,
        })
    }

    /// Customer or attributed artisan
    pub fn involves(&self, user: Uuid) -> bool {
        self.customer == user || self.artisan == user
    }

    /// Move to `next` and log it. Leaves the order untouched on an invalid move.
    pub fn transition(&mut self, next: OrderStatus, note: Option<String>) -> OrderResult<TimelineEntry> {
        if !self.status.can_transition_to(next) {
            return Err(OrderError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }

        let now = Utc::now();
        let entry = TimelineEntry {
            status: next,
            timestamp: now,
            note: Some(
                note.filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| format!("Status updated to {next}")),
            ),
        };

        self.status = next;
        self.timeline.push(entry.clone());
        self.updated_at = now;
        Ok(entry)
    }

    /// Set the payment status; `paid` stamps the paid-at time.
    pub fn record_payment(&mut self, status: PaymentStatus, transaction_id: Option<String>) {
        self.payment.status = status;
        if let Some(transaction_id) = transaction_id {
            self.payment.transaction_id = Some(transaction_id);
        }
        if status == PaymentStatus::Paid {
            self.payment.paid_at = Some(Utc::now());
        }
        self.updated_at = Utc::now();
    }
}

/// `ART-<millis>-<seq>` with the sequence zero-padded to four digits
pub fn format_order_number(epoch_millis: i64, sequence: u64) -> String {
    format!("ART-{epoch_millis}-{sequence:04}")
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    pub product: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: u32,
    #[serde(default)]
    pub customizations: Vec<Customization>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInput {
    pub address: ShippingAddress,
    #[serde(default)]
    pub method: Option<String>,
}

/// Checkout request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrder {
    #[validate(length(min = 1, message = "At least one item is required"), nested)]
    pub items: Vec<OrderItemInput>,
    #[validate(nested)]
    pub shipping: ShippingInput,
    /// Note from the customer
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateStatus {
    pub status: OrderStatus,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePayment {
    pub payment_status: PaymentStatus,
    #[serde(default)]
    #[validate(length(min = 1, max = 200))]
    pub transaction_id: Option<String>,
}

/// Whose orders a listing covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderScope {
    /// Orders the user placed
    Customer(Uuid),
    /// Orders attributed to the artisan
    Artisan(Uuid),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderListResponse {
    pub orders: Vec<Order>,
    pub total_pages: u64,
    pub current_page: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: i64, quantity: u32) -> OrderItem {
        OrderItem {
            product: Uuid::now_v7(),
            quantity,
            price,
            customizations: vec![],
        }
    }

    fn order() -> Order {
        Order::new(
            format_order_number(1_700_000_000_000, 1),
            Uuid::now_v7(),
            Uuid::now_v7(),
            vec![item(4000, 3)],
            ShippingDetails {
                address: ShippingAddress::default(),
                method: None,
                tracking_number: None,
                estimated_delivery: None,
                actual_delivery: None,
            },
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_pricing_over_free_shipping_threshold() {
        let pricing = Pricing::for_subtotal(12_000).unwrap();
        assert_eq!(pricing.shipping, 0);
        assert_eq!(pricing.tax, 960);
        assert_eq!(pricing.total, 12_960);
    }

    #[test]
    fn test_pricing_under_threshold() {
        let pricing = Pricing::for_subtotal(5_000).unwrap();
        assert_eq!(pricing.shipping, 1_500);
        assert_eq!(pricing.tax, 400);
        assert_eq!(pricing.total, 6_900);
    }

    #[test]
    fn test_pricing_threshold_is_exclusive() {
        assert_eq!(Pricing::for_subtotal(10_000).unwrap().shipping, FLAT_SHIPPING);
        assert_eq!(Pricing::for_subtotal(10_001).unwrap().shipping, 0);
    }

    #[test]
    fn test_tax_rounds_to_nearest_cent() {
        // 98.72
        assert_eq!(Pricing::for_subtotal(1_234).unwrap().tax, 99);
        // 98.48
        assert_eq!(Pricing::for_subtotal(1_231).unwrap().tax, 98);
        assert_eq!(Pricing::for_subtotal(0).unwrap().tax, 0);
    }

    #[test]
    fn test_invariant_total() {
        let pricing = Pricing::from_items(&[item(2_500, 2), item(999, 1)]).unwrap();
        assert_eq!(pricing.subtotal, 5_999);
        assert_eq!(
            pricing.total,
            pricing.subtotal + pricing.shipping + pricing.tax - pricing.discount
        );
    }

    #[test]
    fn test_oversized_order_is_rejected_not_overflowed() {
        let line = item(3_000_000_000, 4_000_000_000);
        assert_eq!(line.line_total(), None);
        assert!(matches!(
            Pricing::from_items(&[line]),
            Err(OrderError::Validation(msg)) if msg == "Order total is too large"
        ));

        let near_max = item(i64::MAX / 2, 1);
        assert!(Pricing::from_items(&[near_max.clone(), near_max]).is_err());
        assert_eq!(Pricing::for_subtotal(i64::MAX / 4), None);
    }

    #[test]
    fn test_new_order_starts_pending_with_timeline() {
        let order = order();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.timeline.len(), 1);
        assert_eq!(order.timeline[0].note.as_deref(), Some("Order created"));
        assert_eq!(order.pricing.subtotal, 12_000);
        assert_eq!(order.pricing.total, 12_960);
    }

    #[test]
    fn test_order_number_format() {
        assert_eq!(format_order_number(1_700_000_000_000, 7), "ART-1700000000000-0007");
        assert_eq!(format_order_number(1, 12_345), "ART-1-12345");
    }

    #[test]
    fn test_happy_path_transitions() {
        let mut order = order();
        for next in [
            OrderStatus::Confirmed,
            OrderStatus::InProduction,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
        ] {
            order.transition(next, None).unwrap();
        }
        assert_eq!(order.timeline.len(), 5);
        assert_eq!(
            order.timeline[2].note.as_deref(),
            Some("Status updated to in_production")
        );
    }

    #[test]
    fn test_invalid_transition_leaves_timeline() {
        let mut order = order();
        let result = order.transition(OrderStatus::Shipped, Some("skipping ahead".to_string()));
        assert!(matches!(result, Err(OrderError::InvalidTransition { .. })));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.timeline.len(), 1);
    }

    #[test]
    fn test_cancel_only_before_production() {
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::InProduction.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Refunded));
    }

    #[test]
    fn test_record_payment_stamps_paid_at() {
        let mut order = order();
        order.record_payment(PaymentStatus::Failed, None);
        assert!(order.payment.paid_at.is_none());

        order.record_payment(PaymentStatus::Paid, Some("txn_123".to_string()));
        assert!(order.payment.paid_at.is_some());
        assert_eq!(order.payment.transaction_id.as_deref(), Some("txn_123"));
    }

    #[test]
    fn test_empty_items_fail_validation() {
        let input = CreateOrder {
            items: vec![],
            shipping: ShippingInput {
                address: ShippingAddress::default(),
                method: None,
            },
            notes: None,
        };
        assert!(input.validate().is_err());

        let zero = CreateOrder {
            items: vec![OrderItemInput {
                product: Uuid::now_v7(),
                quantity: 0,
                customizations: vec![],
            }],
            ..input
        };
        assert!(zero.validate().is_err());
    }
}
