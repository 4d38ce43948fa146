//! Field update operation envelopes used by `*UpdateInput` types.
//!
//! Every updatable column is wrapped in one of these, e.g.
//! `{ name: { set: "x" }, active: { set: false }, chain_id: { set: null } }`.
//! Numeric envelopes also accept `increment`, `decrement`, `multiply` and
//! `divide`, applied in that order on top of the current value.

use async_graphql::{InputObject, MaybeUndefined};

use crate::error::{ApiError, ApiResult};
use crate::graphql::orm::{SqlColumn, SqlValue};
use crate::graphql::scalars::{BigInt, Timestamp};

/// A single column assignment rendered for an UPDATE statement.
pub trait FieldUpdate {
    /// `col = <expr>` and its bind values, or `None` when nothing is set.
    fn assignment(&self, column: &str) -> ApiResult<Option<(String, Vec<SqlValue>)>>;
}

/// Operand types accepted by `divide`.
pub trait Divisor {
    fn is_zero(&self) -> bool;
}

impl Divisor for i32 {
    fn is_zero(&self) -> bool {
        *self == 0
    }
}

impl Divisor for BigInt {
    fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Divisor for f64 {
    fn is_zero(&self) -> bool {
        *self == 0.0
    }
}

fn set_value<T: SqlColumn>(column: &str, value: &T) -> (String, Vec<SqlValue>) {
    (format!("{} = ?", column), vec![value.to_sql_value()])
}

fn arithmetic<T: SqlColumn + Divisor>(
    column: &str,
    increment: &Option<T>,
    decrement: &Option<T>,
    multiply: &Option<T>,
    divide: &Option<T>,
) -> ApiResult<Option<(String, Vec<SqlValue>)>> {
    // SQLite yields NULL for x / 0
    if divide.as_ref().is_some_and(Divisor::is_zero) {
        return Err(ApiError::validation(format!("{}: cannot divide by zero", column)));
    }
    let mut expr = column.to_string();
    let mut values = Vec::new();
    for (op, operand) in [("+", increment), ("-", decrement), ("*", multiply), ("/", divide)] {
        if let Some(operand) = operand {
            expr = format!("({} {} ?)", expr, op);
            values.push(operand.to_sql_value());
        }
    }
    if values.is_empty() {
        Ok(None)
    } else {
        Ok(Some((format!("{} = {}", column, expr), values)))
    }
}

macro_rules! set_envelope {
    ($name:ident, $gql_name:literal, $ty:ty) => {
        #[derive(InputObject, Default, Clone, Debug)]
        #[graphql(name = $gql_name)]
        pub struct $name {
            #[graphql(name = "set")]
            pub set: Option<$ty>,
        }

        impl FieldUpdate for $name {
            fn assignment(&self, column: &str) -> ApiResult<Option<(String, Vec<SqlValue>)>> {
                Ok(self.set.as_ref().map(|value| set_value(column, value)))
            }
        }
    };
}

macro_rules! nullable_set_envelope {
    ($name:ident, $gql_name:literal, $ty:ty) => {
        #[derive(InputObject, Default, Clone, Debug)]
        #[graphql(name = $gql_name)]
        pub struct $name {
            #[graphql(name = "set")]
            pub set: MaybeUndefined<$ty>,
        }

        impl FieldUpdate for $name {
            fn assignment(&self, column: &str) -> ApiResult<Option<(String, Vec<SqlValue>)>> {
                Ok(match &self.set {
                    MaybeUndefined::Undefined => None,
                    MaybeUndefined::Null => Some((format!("{} = NULL", column), Vec::new())),
                    MaybeUndefined::Value(value) => Some(set_value(column, value)),
                })
            }
        }
    };
}

macro_rules! numeric_envelope {
    ($name:ident, $gql_name:literal, $ty:ty) => {
        #[derive(InputObject, Default, Clone, Debug)]
        #[graphql(name = $gql_name)]
        pub struct $name {
            #[graphql(name = "set")]
            pub set: Option<$ty>,
            #[graphql(name = "increment")]
            pub increment: Option<$ty>,
            #[graphql(name = "decrement")]
            pub decrement: Option<$ty>,
            #[graphql(name = "multiply")]
            pub multiply: Option<$ty>,
            #[graphql(name = "divide")]
            pub divide: Option<$ty>,
        }

        impl FieldUpdate for $name {
            fn assignment(&self, column: &str) -> ApiResult<Option<(String, Vec<SqlValue>)>> {
                match &self.set {
                    Some(value) => Ok(Some(set_value(column, value))),
                    None => arithmetic(
                        column,
                        &self.increment,
                        &self.decrement,
                        &self.multiply,
                        &self.divide,
                    ),
                }
            }
        }
    };
}

macro_rules! nullable_numeric_envelope {
    ($name:ident, $gql_name:literal, $ty:ty) => {
        #[derive(InputObject, Default, Clone, Debug)]
        #[graphql(name = $gql_name)]
        pub struct $name {
            #[graphql(name = "set")]
            pub set: MaybeUndefined<$ty>,
            #[graphql(name = "increment")]
            pub increment: Option<$ty>,
            #[graphql(name = "decrement")]
            pub decrement: Option<$ty>,
            #[graphql(name = "multiply")]
            pub multiply: Option<$ty>,
            #[graphql(name = "divide")]
            pub divide: Option<$ty>,
        }

        impl FieldUpdate for $name {
            fn assignment(&self, column: &str) -> ApiResult<Option<(String, Vec<SqlValue>)>> {
                match &self.set {
                    MaybeUndefined::Null => Ok(Some((format!("{} = NULL", column), Vec::new()))),
                    MaybeUndefined::Value(value) => Ok(Some(set_value(column, value))),
                    MaybeUndefined::Undefined => arithmetic(
                        column,
                        &self.increment,
                        &self.decrement,
                        &self.multiply,
                        &self.divide,
                    ),
                }
            }
        }
    };
}

set_envelope!(
    StringFieldUpdateOperationsInput,
    "StringFieldUpdateOperationsInput",
    String
);
nullable_set_envelope!(
    NullableStringFieldUpdateOperationsInput,
    "NullableStringFieldUpdateOperationsInput",
    String
);
set_envelope!(
    BoolFieldUpdateOperationsInput,
    "BoolFieldUpdateOperationsInput",
    bool
);
nullable_set_envelope!(
    NullableBoolFieldUpdateOperationsInput,
    "NullableBoolFieldUpdateOperationsInput",
    bool
);
set_envelope!(
    DateTimeFieldUpdateOperationsInput,
    "DateTimeFieldUpdateOperationsInput",
    Timestamp
);
nullable_set_envelope!(
    NullableDateTimeFieldUpdateOperationsInput,
    "NullableDateTimeFieldUpdateOperationsInput",
    Timestamp
);
numeric_envelope!(
    IntFieldUpdateOperationsInput,
    "IntFieldUpdateOperationsInput",
    i32
);
nullable_numeric_envelope!(
    NullableIntFieldUpdateOperationsInput,
    "NullableIntFieldUpdateOperationsInput",
    i32
);
numeric_envelope!(
    BigIntFieldUpdateOperationsInput,
    "BigIntFieldUpdateOperationsInput",
    BigInt
);
nullable_numeric_envelope!(
    NullableBigIntFieldUpdateOperationsInput,
    "NullableBigIntFieldUpdateOperationsInput",
    BigInt
);
numeric_envelope!(
    FloatFieldUpdateOperationsInput,
    "FloatFieldUpdateOperationsInput",
    f64
);
nullable_numeric_envelope!(
    NullableFloatFieldUpdateOperationsInput,
    "NullableFloatFieldUpdateOperationsInput",
    f64
);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn set_wins_over_arithmetic() {
        let op = IntFieldUpdateOperationsInput {
            set: Some(3),
            increment: Some(1),
            ..Default::default()
        };
        assert_eq!(
            op.assignment("amount").unwrap(),
            Some(("amount = ?".to_string(), vec![SqlValue::Int(3)]))
        );
    }

    #[test]
    fn arithmetic_composes() {
        let op = IntFieldUpdateOperationsInput {
            increment: Some(2),
            multiply: Some(10),
            ..Default::default()
        };
        assert_eq!(
            op.assignment("amount").unwrap(),
            Some((
                "amount = ((amount + ?) * ?)".to_string(),
                vec![SqlValue::Int(2), SqlValue::Int(10)]
            ))
        );
        assert_eq!(IntFieldUpdateOperationsInput::default().assignment("amount").unwrap(), None);
    }

    #[test]
    fn nullable_set_null_clears_column() {
        let op = NullableStringFieldUpdateOperationsInput {
            set: MaybeUndefined::Null,
        };
        assert_eq!(
            op.assignment("details").unwrap(),
            Some(("details = NULL".to_string(), vec![]))
        );
        assert_eq!(
            NullableStringFieldUpdateOperationsInput::default()
                .assignment("details")
                .unwrap(),
            None
        );
    }

    #[test]
    fn bool_binds_as_bool() {
        let op = BoolFieldUpdateOperationsInput { set: Some(false) };
        assert_eq!(
            op.assignment("active").unwrap(),
            Some(("active = ?".to_string(), vec![SqlValue::Bool(false)]))
        );
    }

    #[test]
    fn zero_divisor_is_rejected() {
        let op = NullableFloatFieldUpdateOperationsInput {
            divide: Some(0.0),
            ..Default::default()
        };
        assert!(matches!(op.assignment("weight"), Err(ApiError::Validation(_))));

        let op = IntFieldUpdateOperationsInput {
            divide: Some(0),
            ..Default::default()
        };
        assert!(matches!(op.assignment("amount"), Err(ApiError::Validation(_))));

        let op = BigIntFieldUpdateOperationsInput {
            divide: Some(BigInt(2)),
            ..Default::default()
        };
        assert!(op.assignment("amount").unwrap().is_some());
    }
}
