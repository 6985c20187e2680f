//! # Lenient Field Coercion
//!
//! Request bodies come from a browser form or a parsed Excel sheet, so a
//! price may arrive as `118`, `118.5`, `"118"` or `""`, and a serial number
//! may arrive as a bare number. These `deserialize_with` helpers turn any of
//! those into `Option<T>`, yielding `None` for blanks and garbage instead
//! of rejecting the whole body.
//!
//! ```text
//!   JSON value          opt_text         opt_money        opt_rate
//!   ──────────          ────────         ─────────        ────────
//!   null / missing      None             None             None
//!   ""                  None             None             None
//!   "abc"               Some("abc")      None             None
//!   "118.5"             Some("118.5")    Some(₹118.50)    Some(118.5%)
//!   118                 Some("118")      Some(₹118.00)    Some(118%)
//!   true                Some("true")     None             None
//! ```
//!
//! Fields using these must also carry `#[serde(default)]`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::money::Money;
use crate::types::GstRate;

/// Any scalar as text. Blank strings become `None`.
pub fn opt_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(text_of))
}

/// A rupee amount from a number or numeric string.
pub fn opt_money<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Money>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| money_of(&v)))
}

/// A GST percentage from a number or numeric string.
pub fn opt_rate<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<GstRate>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| money_of(&v)).and_then(|m| {
        u32::try_from(m.paise()).ok().map(GstRate::from_bps)
    }))
}

fn text_of(value: Value) -> Option<String> {
    match value {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

// A percentage with two decimals has the same digits as an amount in paise,
// so rates reuse the exact money parser.
fn money_of(value: &Value) -> Option<Money> {
    let money = match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i.checked_mul(100).map(Money::from_paise),
            None => n.as_f64().and_then(Money::from_rupees_f64),
        },
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => s.parse().ok(),
        _ => None,
    };
    money.filter(Money::in_range)
}
