//! Small builders for the filter documents the repositories assemble

use mongodb::bson::{Bson, Document, doc, to_bson};
use serde::Serialize;

/// `{ "_id": <id> }`
pub fn id_filter<T: Serialize>(id: &T) -> Document {
    doc! { "_id": to_bson(id).unwrap_or(Bson::Null) }
}

/// Serialize a value the way the driver stores it, `Null` on failure.
pub fn bson_of<T: Serialize>(value: &T) -> Bson {
    to_bson(value).unwrap_or(Bson::Null)
}

/// Case-insensitive substring match with user input escaped.
pub fn contains_ci(input: &str) -> Document {
    doc! { "$regex": regex::escape(input.trim()), "$options": "i" }
}

/// Split a comma-separated query value into trimmed, non-empty parts.
pub fn split_csv(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// `{ "$in": [...] }` over a comma-separated value, or `None` when it has no parts.
pub fn in_csv(input: &str) -> Option<Document> {
    let values = split_csv(input);
    (!values.is_empty()).then(|| doc! { "$in": values })
}

/// Inclusive range condition, or `None` when both bounds are open.
pub fn range<T: Into<Bson>>(min: Option<T>, max: Option<T>) -> Option<Document> {
    let mut condition = Document::new();
    if let Some(min) = min {
        condition.insert("$gte", min);
    }
    if let Some(max) = max {
        condition.insert("$lte", max);
    }
    (!condition.is_empty()).then_some(condition)
}
