//! Records exchanged with the workshop backend.
//!
//! The backend speaks Spanish camelCase JSON and is loose about types: amounts
//! show up as numbers or numeric strings, identifiers as numbers or strings,
//! and list endpoints either return a bare array or wrap it under a plural
//! key. Everything here decodes leniently so a display never fails on a
//! sloppy field.

mod commission;
mod invoice;
mod order;
mod people;
mod rating;
mod status;

pub use commission::{Commission, CommissionOrder};
pub use invoice::Invoice;
pub use order::{Diagnosis, Motorcycle, OrderDetail, Proforma, WorkOrder};
pub use people::{Customer, Employee, User};
pub use rating::{Rating, RatingStats};
pub use status::{CommissionStatus, InvoiceStatus, OrderStatus, ProformaStatus};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parse an amount the way a form field would: numbers pass through,
/// numeric strings are parsed, anything else counts as zero.
pub fn amount_from_value(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

fn id_from_value(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

pub(crate) fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(amount_from_value).unwrap_or(0.0))
}

pub(crate) fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(id_from_value).unwrap_or_default())
}

pub(crate) fn opt_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(id_from_value))
}

fn text_from_value(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Free text; numbers are kept as written, `null` and structures read as empty
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(text_from_value).unwrap_or_default())
}

pub(crate) fn opt_lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(text_from_value))
}

pub(crate) fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .map(amount_from_value)
        .filter(|v| *v > 0.0)
        .map(|v| v.round() as u64)
        .unwrap_or(0))
}

/// Pull a list out of a collection response.
///
/// Accepts a bare array or an object carrying the array under `key`. Any
/// other shape yields an empty list.
pub fn extract_list<T: DeserializeOwned>(
    value: Value,
    key: &str,
) -> Result<Vec<T>, serde_json::Error> {
    match value {
        Value::Array(_) => serde_json::from_value(value),
        Value::Object(mut map) => match map.remove(key) {
            Some(list @ Value::Array(_)) => serde_json::from_value(list),
            _ => Ok(Vec::new()),
        },
        _ => Ok(Vec::new()),
    }
}
