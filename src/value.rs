//! Typed cell values and literal-to-value coercion.
//!
//! Every stored cell is a tagged [`Value`]. Literals arrive as raw text from
//! the statement parsers and are coerced here against the column's declared
//! type token (`INT`, `VARCHAR(100)`, `DECIMAL(10,2)`, ...).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// A typed scalar value stored in a row or produced by a query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Date(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view used by comparisons and aggregates. Text parses as a
    /// whole number or not at all; booleans and dates are not numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Coerce a raw literal against a declared column type token.
    ///
    /// A literal `NULL` (any case) becomes [`Value::Null`] regardless of the
    /// declared type; NOT NULL enforcement happens at the table layer.
    pub fn coerce(raw: &str, declared_type: &str) -> Result<Value> {
        let literal = raw.trim();
        if literal.eq_ignore_ascii_case("null") {
            return Ok(Value::Null);
        }

        let upper = declared_type.to_uppercase();
        if upper.contains("INT") {
            // Fractional literals land in INT columns truncated toward zero.
            if let Ok(n) = literal.parse::<i64>() {
                return Ok(Value::Int(n));
            }
            if let Ok(f) = literal.parse::<f64>() {
                return Ok(Value::Int(f.trunc() as i64));
            }
            return Err(conversion_error(literal, declared_type));
        }
        if upper.contains("DECIMAL") || upper.contains("FLOAT") || upper.contains("DOUBLE") {
            return literal
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| conversion_error(literal, declared_type));
        }
        if upper.contains("BOOL") {
            return match literal.to_lowercase().as_str() {
                "true" | "1" => Ok(Value::Bool(true)),
                "false" | "0" => Ok(Value::Bool(false)),
                _ => Err(conversion_error(literal, declared_type)),
            };
        }
        if upper.contains("DATE") {
            if is_date_literal(literal) {
                return Ok(Value::Date(literal.to_string()));
            }
            return Err(conversion_error(literal, declared_type));
        }

        Ok(Value::Text(literal.to_string()))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Text(s) => write!(f, "{}", s),
            Value::Date(s) => write!(f, "{}", s),
        }
    }
}

fn conversion_error(value: &str, data_type: &str) -> EngineError {
    EngineError::TypeConversion {
        value: value.to_string(),
        data_type: data_type.to_string(),
    }
}

/// Shape check for `YYYY-MM-DD`. No calendar validation beyond the shape.
fn is_date_literal(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && [0, 1, 2, 3, 5, 6, 8, 9].iter().all(|&i| b[i].is_ascii_digit())
}
