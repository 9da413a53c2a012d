//! Database value parsing utilities
//!
//! Provides error-safe parsing of stored values.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::Error as SqlError;
use uuid::Uuid;

/// Parse a UUID from a database string column
pub fn parse_uuid(s: &str) -> Result<Uuid, SqlError> {
    Uuid::parse_str(s).map_err(|e| SqlError::FromSqlConversionFailure(0, Type::Text, Box::new(e)))
}

/// Parse an optional UUID from a database string column
pub fn parse_uuid_opt(s: Option<String>) -> Result<Option<Uuid>, SqlError> {
    s.map(|s| parse_uuid(&s)).transpose()
}

/// Parse a DateTime from an RFC3339 string
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, SqlError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| SqlError::FromSqlConversionFailure(0, Type::Text, Box::new(e)))
}

/// Parse one of the model enums from its stored name
pub fn parse_enum<T>(s: &str) -> Result<T, SqlError>
where
    T: FromStr<Err = crate::Error>,
{
    s.parse::<T>()
        .map_err(|e| SqlError::FromSqlConversionFailure(0, Type::Text, Box::new(e)))
}

/// Parse a JSON array of strings (dietary lists, role tasks)
pub fn parse_string_list(s: &str) -> Result<Vec<String>, SqlError> {
    serde_json::from_str(s).map_err(|e| SqlError::FromSqlConversionFailure(0, Type::Text, Box::new(e)))
}

/// Parse an optional JSON document
pub fn parse_json_opt(s: Option<String>) -> Result<Option<serde_json::Value>, SqlError> {
    s.map(|s| {
        serde_json::from_str(&s)
            .map_err(|e| SqlError::FromSqlConversionFailure(0, Type::Text, Box::new(e)))
    })
    .transpose()
}

/// Encode a string list for storage
pub fn string_list_to_sql(items: &[String]) -> crate::Result<String> {
    Ok(serde_json::to_string(items)?)
}

/// Extension trait for converting rusqlite Results to Option
pub trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, SqlError>;
}

impl<T> OptionalExt<T> for Result<T, SqlError> {
    fn optional(self) -> Result<Option<T>, SqlError> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(SqlError::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventStatus;

    #[test]
    fn test_parse_enum_rejects_unknown() {
        assert_eq!(
            parse_enum::<EventStatus>("dish_claiming").unwrap(),
            EventStatus::DishClaiming
        );
        assert!(parse_enum::<EventStatus>("dashboard").is_err());
    }

    #[test]
    fn test_string_list_roundtrip() {
        let items = vec!["vegan".to_string(), "nut-free".to_string()];
        let encoded = string_list_to_sql(&items).unwrap();
        assert_eq!(parse_string_list(&encoded).unwrap(), items);
    }

    #[test]
    fn test_json_opt_none() {
        assert!(parse_json_opt(None).unwrap().is_none());
    }
}
