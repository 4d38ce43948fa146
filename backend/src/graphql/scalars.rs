//! Custom GraphQL scalars.

use std::ops::Deref;

use async_graphql::{InputValueError, InputValueResult, Scalar, ScalarType, Value};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// 64-bit integer carried as a string on the wire so JavaScript clients keep
/// full precision (Discord snowflakes do not fit in a double).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BigInt(pub i64);

#[Scalar(name = "BigInt")]
impl ScalarType for BigInt {
    fn parse(value: Value) -> InputValueResult<Self> {
        match value {
            Value::String(s) => s
                .parse::<i64>()
                .map(BigInt)
                .map_err(|e| InputValueError::custom(format!("invalid BigInt '{}': {}", s, e))),
            Value::Number(n) => n
                .as_i64()
                .map(BigInt)
                .ok_or_else(|| InputValueError::custom("BigInt must be an integer")),
            other => Err(InputValueError::expected_type(other)),
        }
    }

    fn to_value(&self) -> Value {
        Value::String(self.0.to_string())
    }
}

impl From<i64> for BigInt {
    fn from(value: i64) -> Self {
        BigInt(value)
    }
}

impl std::fmt::Display for BigInt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// UTC instant exposed as the `DateTime` scalar. Output is RFC 3339 with a
/// `Z` suffix and only as many fractional digits as needed; input accepts
/// any RFC 3339 offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Timestamp(Utc::now())
    }
}

#[Scalar(name = "DateTime")]
impl ScalarType for Timestamp {
    fn parse(value: Value) -> InputValueResult<Self> {
        match value {
            Value::String(s) => DateTime::parse_from_rfc3339(&s)
                .map(|dt| Timestamp(dt.with_timezone(&Utc)))
                .map_err(|e| InputValueError::custom(format!("invalid DateTime '{}': {}", s, e))),
            other => Err(InputValueError::expected_type(other)),
        }
    }

    fn to_value(&self) -> Value {
        Value::String(self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

impl Deref for Timestamp {
    type Target = DateTime<Utc>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Timestamp(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_string_and_number() {
        assert_eq!(
            BigInt::parse(Value::String("901234567890123456".into())).unwrap(),
            BigInt(901234567890123456)
        );
        assert_eq!(BigInt::parse(Value::from(42)).unwrap(), BigInt(42));
        assert!(BigInt::parse(Value::String("nope".into())).is_err());
        assert!(BigInt::parse(Value::Boolean(true)).is_err());
    }

    #[test]
    fn serializes_as_string() {
        assert_eq!(
            BigInt(901234567890123456).to_value(),
            Value::String("901234567890123456".into())
        );
    }

    #[test]
    fn timestamps_use_z_suffix() {
        let parsed = Timestamp::parse(Value::String("2020-01-01T02:00:00+02:00".into())).unwrap();
        assert_eq!(parsed.to_value(), Value::String("2020-01-01T00:00:00Z".into()));

        let fractional = Timestamp::parse(Value::String("2023-11-02T03:04:05.5Z".into())).unwrap();
        assert_eq!(fractional.to_value(), Value::String("2023-11-02T03:04:05.500Z".into()));

        assert!(Timestamp::parse(Value::String("yesterday".into())).is_err());
    }
}
