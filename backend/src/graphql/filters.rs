//! GraphQL filter input types for flexible querying
//!
//! These types enable Prisma-style filtering on list queries with operators like:
//! - equals, not (equality)
//! - lt, lte, gt, gte (comparisons)
//! - contains, startsWith, endsWith (string matching, optional insensitive mode)
//! - in, notIn (list membership)
//! - isNull (null checks)
//! - recentDays, inPast, inFuture (date arithmetic)
//!
//! Every filter renders to SQL through [FieldFilter]; the generated
//! `*WhereInput` types call it once per populated column.

use async_graphql::{Enum, InputObject};
use chrono::{DateTime, Duration, Utc};

use crate::graphql::orm::{SqlValue, format_timestamp};
use crate::graphql::scalars::{BigInt, Timestamp};

/// A filter on a single column.
pub trait FieldFilter {
    /// Conditions (joined with AND by the caller) and their bind values.
    fn to_sql(&self, column: &str) -> (Vec<String>, Vec<SqlValue>);

    /// Check if filter has any conditions
    fn is_empty(&self) -> bool;
}

/// String comparison mode
#[derive(Enum, Copy, Clone, Debug, Default, Eq, PartialEq)]
#[graphql(name = "QueryMode", rename_items = "lowercase")]
pub enum QueryMode {
    #[default]
    Default,
    Insensitive,
}

#[derive(Default)]
struct SqlParts {
    conditions: Vec<String>,
    values: Vec<SqlValue>,
}

impl SqlParts {
    fn compare(&mut self, column: &str, op: &str, value: Option<SqlValue>) {
        if let Some(value) = value {
            self.conditions.push(format!("{} {} ?", column, op));
            self.values.push(value);
        }
    }

    fn list(&mut self, column: &str, negate: bool, values: Option<Vec<SqlValue>>) {
        let Some(values) = values else { return };
        if values.is_empty() {
            // `in: []` matches nothing, `notIn: []` matches everything
            self.conditions
                .push(if negate { "1 = 1" } else { "1 = 0" }.to_string());
            return;
        }
        let placeholders = vec!["?"; values.len()].join(", ");
        let keyword = if negate { "NOT IN" } else { "IN" };
        self.conditions
            .push(format!("{} {} ({})", column, keyword, placeholders));
        self.values.extend(values);
    }

    fn null_check(&mut self, column: &str, is_null: Option<bool>) {
        match is_null {
            Some(true) => self.conditions.push(format!("{} IS NULL", column)),
            Some(false) => self.conditions.push(format!("{} IS NOT NULL", column)),
            None => {}
        }
    }

    fn finish(self) -> (Vec<String>, Vec<SqlValue>) {
        (self.conditions, self.values)
    }
}

/// Escape LIKE wildcards so user input matches literally.
fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Filter for string fields
#[derive(InputObject, Default, Clone, Debug)]
#[graphql(name = "StringFilter")]
pub struct StringFilter {
    #[graphql(name = "equals")]
    pub equals: Option<String>,
    #[graphql(name = "not")]
    pub not: Option<String>,
    #[graphql(name = "in")]
    pub in_list: Option<Vec<String>>,
    #[graphql(name = "notIn")]
    pub not_in: Option<Vec<String>>,
    #[graphql(name = "lt")]
    pub lt: Option<String>,
    #[graphql(name = "lte")]
    pub lte: Option<String>,
    #[graphql(name = "gt")]
    pub gt: Option<String>,
    #[graphql(name = "gte")]
    pub gte: Option<String>,
    #[graphql(name = "contains")]
    pub contains: Option<String>,
    #[graphql(name = "startsWith")]
    pub starts_with: Option<String>,
    #[graphql(name = "endsWith")]
    pub ends_with: Option<String>,
    /// Case sensitivity for contains/startsWith/endsWith
    #[graphql(name = "mode")]
    pub mode: Option<QueryMode>,
    #[graphql(name = "isNull")]
    pub is_null: Option<bool>,
}

impl StringFilter {
    /// Create an equals filter
    pub fn equals(value: impl Into<String>) -> Self {
        Self {
            equals: Some(value.into()),
            ..Default::default()
        }
    }

    /// Create a contains filter
    pub fn contains(value: impl Into<String>) -> Self {
        Self {
            contains: Some(value.into()),
            ..Default::default()
        }
    }

    fn insensitive(&self) -> bool {
        self.mode == Some(QueryMode::Insensitive)
    }

    fn like(parts: &mut SqlParts, column: &str, pattern: String) {
        parts.conditions.push(format!("{} LIKE ? ESCAPE '\\'", column));
        parts.values.push(SqlValue::String(pattern));
    }
}

impl FieldFilter for StringFilter {
    fn to_sql(&self, column: &str) -> (Vec<String>, Vec<SqlValue>) {
        let mut parts = SqlParts::default();
        let text = |v: &Option<String>| v.clone().map(SqlValue::String);
        let texts = |v: &Option<Vec<String>>| {
            v.clone()
                .map(|items| items.into_iter().map(SqlValue::String).collect())
        };

        parts.compare(column, "=", text(&self.equals));
        parts.compare(column, "<>", text(&self.not));
        parts.list(column, false, texts(&self.in_list));
        parts.list(column, true, texts(&self.not_in));
        parts.compare(column, "<", text(&self.lt));
        parts.compare(column, "<=", text(&self.lte));
        parts.compare(column, ">", text(&self.gt));
        parts.compare(column, ">=", text(&self.gte));

        if let Some(ref needle) = self.contains {
            if self.insensitive() {
                Self::like(&mut parts, column, format!("%{}%", escape_like(needle)));
            } else {
                parts.conditions.push(format!("instr({}, ?) > 0", column));
                parts.values.push(SqlValue::String(needle.clone()));
            }
        }

        if let Some(ref prefix) = self.starts_with {
            if self.insensitive() {
                Self::like(&mut parts, column, format!("{}%", escape_like(prefix)));
            } else {
                parts.conditions.push(format!("substr({}, 1, ?) = ?", column));
                parts
                    .values
                    .push(SqlValue::Int(prefix.chars().count() as i64));
                parts.values.push(SqlValue::String(prefix.clone()));
            }
        }

        if let Some(ref suffix) = self.ends_with {
            if self.insensitive() {
                Self::like(&mut parts, column, format!("%{}", escape_like(suffix)));
            } else if suffix.is_empty() {
                parts.conditions.push(format!("{} IS NOT NULL", column));
            } else {
                parts.conditions.push(format!("substr({}, -?) = ?", column));
                parts
                    .values
                    .push(SqlValue::Int(suffix.chars().count() as i64));
                parts.values.push(SqlValue::String(suffix.clone()));
            }
        }

        parts.null_check(column, self.is_null);
        parts.finish()
    }

    fn is_empty(&self) -> bool {
        self.equals.is_none()
            && self.not.is_none()
            && self.in_list.is_none()
            && self.not_in.is_none()
            && self.lt.is_none()
            && self.lte.is_none()
            && self.gt.is_none()
            && self.gte.is_none()
            && self.contains.is_none()
            && self.starts_with.is_none()
            && self.ends_with.is_none()
            && self.is_null.is_none()
    }
}

/// Numeric filters share one shape; only the value type and its SQL binding differ.
macro_rules! numeric_filter {
    ($name:ident, $gql_name:literal, $ty:ty, $to_sql:expr) => {
        #[derive(InputObject, Default, Clone, Debug)]
        #[graphql(name = $gql_name)]
        pub struct $name {
            #[graphql(name = "equals")]
            pub equals: Option<$ty>,
            #[graphql(name = "not")]
            pub not: Option<$ty>,
            #[graphql(name = "in")]
            pub in_list: Option<Vec<$ty>>,
            #[graphql(name = "notIn")]
            pub not_in: Option<Vec<$ty>>,
            #[graphql(name = "lt")]
            pub lt: Option<$ty>,
            #[graphql(name = "lte")]
            pub lte: Option<$ty>,
            #[graphql(name = "gt")]
            pub gt: Option<$ty>,
            #[graphql(name = "gte")]
            pub gte: Option<$ty>,
            #[graphql(name = "isNull")]
            pub is_null: Option<bool>,
        }

        impl $name {
            /// Create an equals filter
            pub fn equals(value: $ty) -> Self {
                Self {
                    equals: Some(value),
                    ..Default::default()
                }
            }

            /// Create an in-list filter
            pub fn in_list(values: Vec<$ty>) -> Self {
                Self {
                    in_list: Some(values),
                    ..Default::default()
                }
            }

            /// Create an inclusive range filter
            pub fn between(min: $ty, max: $ty) -> Self {
                Self {
                    gte: Some(min),
                    lte: Some(max),
                    ..Default::default()
                }
            }
        }

        impl FieldFilter for $name {
            fn to_sql(&self, column: &str) -> (Vec<String>, Vec<SqlValue>) {
                let convert: fn(&$ty) -> SqlValue = $to_sql;
                let one = |v: &Option<$ty>| v.as_ref().map(convert);
                let many =
                    |v: &Option<Vec<$ty>>| v.as_ref().map(|items| items.iter().map(convert).collect());

                let mut parts = SqlParts::default();
                parts.compare(column, "=", one(&self.equals));
                parts.compare(column, "<>", one(&self.not));
                parts.list(column, false, many(&self.in_list));
                parts.list(column, true, many(&self.not_in));
                parts.compare(column, "<", one(&self.lt));
                parts.compare(column, "<=", one(&self.lte));
                parts.compare(column, ">", one(&self.gt));
                parts.compare(column, ">=", one(&self.gte));
                parts.null_check(column, self.is_null);
                parts.finish()
            }

            fn is_empty(&self) -> bool {
                self.equals.is_none()
                    && self.not.is_none()
                    && self.in_list.is_none()
                    && self.not_in.is_none()
                    && self.lt.is_none()
                    && self.lte.is_none()
                    && self.gt.is_none()
                    && self.gte.is_none()
                    && self.is_null.is_none()
            }
        }
    };
}

numeric_filter!(IntFilter, "IntFilter", i32, |v| SqlValue::Int(i64::from(*v)));
numeric_filter!(BigIntFilter, "BigIntFilter", BigInt, |v| SqlValue::Int(v.0));
numeric_filter!(FloatFilter, "FloatFilter", f64, |v| SqlValue::Float(*v));

/// Filter for boolean fields
#[derive(InputObject, Default, Clone, Debug)]
#[graphql(name = "BoolFilter")]
pub struct BoolFilter {
    #[graphql(name = "equals")]
    pub equals: Option<bool>,
    #[graphql(name = "not")]
    pub not: Option<bool>,
    #[graphql(name = "isNull")]
    pub is_null: Option<bool>,
}

impl BoolFilter {
    /// Create a filter for true values
    pub fn is_true() -> Self {
        Self {
            equals: Some(true),
            ..Default::default()
        }
    }

    /// Create a filter for false values
    pub fn is_false() -> Self {
        Self {
            equals: Some(false),
            ..Default::default()
        }
    }
}

impl FieldFilter for BoolFilter {
    fn to_sql(&self, column: &str) -> (Vec<String>, Vec<SqlValue>) {
        let mut parts = SqlParts::default();
        parts.compare(column, "=", self.equals.map(SqlValue::Bool));
        parts.compare(column, "<>", self.not.map(SqlValue::Bool));
        parts.null_check(column, self.is_null);
        parts.finish()
    }

    fn is_empty(&self) -> bool {
        self.equals.is_none() && self.not.is_none() && self.is_null.is_none()
    }
}

/// Filter for timestamp fields
#[derive(InputObject, Default, Clone, Debug)]
#[graphql(name = "DateTimeFilter")]
pub struct DateTimeFilter {
    #[graphql(name = "equals")]
    pub equals: Option<Timestamp>,
    #[graphql(name = "not")]
    pub not: Option<Timestamp>,
    #[graphql(name = "in")]
    pub in_list: Option<Vec<Timestamp>>,
    #[graphql(name = "notIn")]
    pub not_in: Option<Vec<Timestamp>>,
    /// Before
    #[graphql(name = "lt")]
    pub lt: Option<Timestamp>,
    /// Before or at
    #[graphql(name = "lte")]
    pub lte: Option<Timestamp>,
    /// After
    #[graphql(name = "gt")]
    pub gt: Option<Timestamp>,
    /// After or at
    #[graphql(name = "gte")]
    pub gte: Option<Timestamp>,
    #[graphql(name = "isNull")]
    pub is_null: Option<bool>,

    // ========================================================================
    // Date Arithmetic Operators
    // ========================================================================
    /// Within the last N days
    #[graphql(name = "recentDays", validator(minimum = 0, maximum = 36500))]
    pub recent_days: Option<i32>,
    /// Before now
    #[graphql(name = "inPast")]
    pub in_past: Option<bool>,
    /// After now
    #[graphql(name = "inFuture")]
    pub in_future: Option<bool>,
}

impl DateTimeFilter {
    /// Create a greater-than-or-equal filter
    pub fn gte(value: DateTime<Utc>) -> Self {
        Self {
            gte: Some(Timestamp(value)),
            ..Default::default()
        }
    }

    /// Create a filter for timestamps within the last N days
    pub fn recent_days(days: i32) -> Self {
        Self {
            recent_days: Some(days),
            ..Default::default()
        }
    }

    fn to_sql_with_now(&self, column: &str, now: DateTime<Utc>) -> (Vec<String>, Vec<SqlValue>) {
        let stamp = |v: &DateTime<Utc>| SqlValue::String(format_timestamp(v));
        let one = |v: &Option<Timestamp>| v.as_ref().map(|t| stamp(&t.0));
        let many = |v: &Option<Vec<Timestamp>>| {
            v.as_ref().map(|items| items.iter().map(|t| stamp(&t.0)).collect())
        };

        let mut parts = SqlParts::default();
        parts.compare(column, "=", one(&self.equals));
        parts.compare(column, "<>", one(&self.not));
        parts.list(column, false, many(&self.in_list));
        parts.list(column, true, many(&self.not_in));
        parts.compare(column, "<", one(&self.lt));
        parts.compare(column, "<=", one(&self.lte));
        parts.compare(column, ">", one(&self.gt));
        parts.compare(column, ">=", one(&self.gte));
        parts.null_check(column, self.is_null);

        if let Some(days) = self.recent_days {
            // Out of the representable range nothing can match
            match Duration::try_days(i64::from(days)).and_then(|d| now.checked_sub_signed(d)) {
                Some(since) => parts.compare(column, ">=", Some(stamp(&since))),
                None => parts.conditions.push("1 = 0".to_string()),
            }
        }
        match self.in_past {
            Some(true) => parts.compare(column, "<", Some(stamp(&now))),
            Some(false) => parts.compare(column, ">=", Some(stamp(&now))),
            None => {}
        }
        match self.in_future {
            Some(true) => parts.compare(column, ">", Some(stamp(&now))),
            Some(false) => parts.compare(column, "<=", Some(stamp(&now))),
            None => {}
        }
        parts.finish()
    }
}

impl FieldFilter for DateTimeFilter {
    fn to_sql(&self, column: &str) -> (Vec<String>, Vec<SqlValue>) {
        self.to_sql_with_now(column, Utc::now())
    }

    fn is_empty(&self) -> bool {
        self.equals.is_none()
            && self.not.is_none()
            && self.in_list.is_none()
            && self.not_in.is_none()
            && self.lt.is_none()
            && self.lte.is_none()
            && self.gt.is_none()
            && self.gte.is_none()
            && self.is_null.is_none()
            && self.recent_days.is_none()
            && self.in_past.is_none()
            && self.in_future.is_none()
    }
}
