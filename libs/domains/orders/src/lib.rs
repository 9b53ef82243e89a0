//! Orders Domain
//!
//! Checkout prices each line from the live catalog, attributes the order to
//! the first item's artisan and stamps an order number from an atomic counter.
//! Fulfilment then follows a fixed status path, each step appended to the
//! order's timeline.
//!
//! ```text
//! pending ─► confirmed ─► in_production ─► shipped ─► delivered
//!    │           │
//!    └───────────┴─► cancelled | refunded
//! ```

mod catalog;
mod error;
pub mod handlers;
mod models;
mod mongodb;
mod repository;
mod service;

pub use catalog::{CatalogProduct, MongoProductCatalog, ProductCatalog};
pub use error::{OrderError, OrderResult};
pub use handlers::{ApiDoc, router};
pub use models::{
    CreateOrder, Order, OrderFilter, OrderItem, OrderStatus, Payment, PaymentStatus, Pricing,
    ShippingAddress, TimelineEntry, format_order_number,
};
pub use mongodb::MongoOrderRepository;
pub use repository::OrderRepository;
pub use service::OrderService;
