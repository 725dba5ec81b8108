//! Lenient field decoders for [`crate::BuildingRecord`].
//!
//! The dataset is exported from a spreadsheet pipeline, so numbers sometimes
//! arrive as strings and flags as `"true"`. Each decoder accepts the sane
//! shapes and maps everything else to `None`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::RetrofitPriority;

fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn value_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite() && f.fract() == 0.0)
                    .map(|f| f as i64)
            })
        }
        _ => None,
    }
}

/// Decodes a number or numeric string.
///
/// # Errors
///
/// Only fails if the underlying deserializer fails to produce a value.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_f64))
}

/// Decodes a whole number, accepting whole-valued floats and numeric strings.
///
/// # Errors
///
/// Only fails if the underlying deserializer fails to produce a value.
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_i64))
}

/// Like [`lenient_i64`], dropping values outside the `i32` range.
///
/// # Errors
///
/// Only fails if the underlying deserializer fails to produce a value.
pub fn lenient_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_i64(deserializer)?.and_then(|v| i32::try_from(v).ok()))
}

/// Decodes the record identifier, defaulting to 0.
///
/// # Errors
///
/// Only fails if the underlying deserializer fails to produce a value.
pub fn lenient_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_i64(deserializer)?.unwrap_or(0))
}

/// Decodes text, stringifying bare numbers.
///
/// # Errors
///
/// Only fails if the underlying deserializer fails to produce a value.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Decodes a boolean flag, accepting `"true"` / `"false"` strings.
///
/// # Errors
///
/// Only fails if the underlying deserializer fails to produce a value.
pub fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

/// Decodes a tier label. Empty text is absent; unrecognized text is
/// [`RetrofitPriority::Unknown`].
///
/// # Errors
///
/// Only fails if the underlying deserializer fails to produce a value.
pub fn lenient_priority<'de, D>(deserializer: D) -> Result<Option<RetrofitPriority>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => Some(RetrofitPriority::from_label(&s)),
        Some(_) => Some(RetrofitPriority::Unknown),
    })
}
