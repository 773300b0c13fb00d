//! Coercion of loosely typed request fields into the model's types.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde_json::Value;

use envtrack_shared::errors::{AppError, AppResult};

/// Naive layouts accepted besides RFC 3339; they are read as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Blank strings count as absent, like a missing field.
pub fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// Accept a JSON number or a numeric string, as long as it is finite.
pub fn coerce_number(field: &str, raw: &Value) -> AppResult<f64> {
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::validation(format!("valor numérico inválido para '{field}': {raw}")))
}

/// Parse an ISO-8601 date or date-time. Values without an offset are UTC.
pub fn parse_timestamp(field: &str, raw: &str) -> AppResult<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        });

    naive
        .map(|n| Utc.from_utc_datetime(&n))
        .ok_or_else(|| AppError::validation(format!("data inválida para '{field}': {raw}")))
}

pub fn parse_optional_timestamp(field: &str, raw: Option<&str>) -> AppResult<Option<DateTime<Utc>>> {
    non_blank(raw).map(|s| parse_timestamp(field, s)).transpose()
}

/// Owner from a query string, falling back to the configured default.
pub fn resolve_user_id(raw: Option<&str>, default_user_id: i32) -> AppResult<i32> {
    match non_blank(raw) {
        None => Ok(default_user_id),
        Some(s) => s
            .parse::<i32>()
            .map_err(|_| AppError::validation(format!("user_id inválido: {s}"))),
    }
}

/// Owner from a JSON body: an integer or an integer string, like the query form.
pub fn coerce_user_id(raw: Option<&Value>, default_user_id: i32) -> AppResult<i32> {
    match raw {
        None | Some(Value::Null) => Ok(default_user_id),
        Some(Value::String(s)) => resolve_user_id(Some(s), default_user_id),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|id| i32::try_from(id).ok())
            .ok_or_else(|| AppError::validation(format!("user_id inválido: {n}"))),
        Some(other) => Err(AppError::validation(format!("user_id inválido: {other}"))),
    }
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent key (`None`)
/// when paired with `#[serde(default)]`.
pub fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    <Option<T> as serde::Deserialize>::deserialize(deserializer).map(Some)
}
