//! Single-comparison conditions and their evaluation against result rows.
//!
//! WHERE and HAVING both reduce to one `column OP value` triple. AND/OR
//! chains are out of scope for this dialect.

use regex::Regex;

use crate::schema::ResultRow;

/// Comparison operators usable in WHERE and HAVING.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Like => "LIKE",
        }
    }
}

/// A single `column OP value` comparison. The value is the raw literal text
/// with surrounding quotes already stripped.
#[derive(Clone, Debug, PartialEq)]
pub struct Condition {
    pub column: String,
    pub op: CompareOp,
    pub value: String,
}

impl Condition {
    pub fn new(column: &str, op: CompareOp, value: &str) -> Self {
        Condition {
            column: column.to_string(),
            op,
            value: value.to_string(),
        }
    }

    /// Evaluate against one row.
    ///
    /// A null (or absent) cell matches `=` only when the compared literal is
    /// the text `NULL`, matches `!=`/`<>` for anything else, and never
    /// matches the ordering operators or LIKE.
    pub fn matches(&self, row: &ResultRow) -> bool {
        let cell = match row.get(&self.column) {
            Some(v) if !v.is_null() => v,
            _ => {
                return match self.op {
                    CompareOp::Eq => self.value == "NULL",
                    CompareOp::Ne => self.value != "NULL",
                    _ => false,
                };
            }
        };

        match self.op {
            CompareOp::Eq => cell.to_string() == self.value,
            CompareOp::Ne => cell.to_string() != self.value,
            CompareOp::Like => like_match(&cell.to_string(), &self.value),
            CompareOp::Lt | CompareOp::Le | CompareOp::Gt | CompareOp::Ge => {
                let ordered = match (cell.as_number(), self.value.trim().parse::<f64>().ok()) {
                    (Some(left), Some(right)) => left.partial_cmp(&right),
                    _ => Some(cell.to_string().cmp(&self.value)),
                };
                match ordered {
                    Some(ord) => match self.op {
                        CompareOp::Lt => ord.is_lt(),
                        CompareOp::Le => ord.is_le(),
                        CompareOp::Gt => ord.is_gt(),
                        CompareOp::Ge => ord.is_ge(),
                        _ => false,
                    },
                    None => false,
                }
            }
        }
    }
}

/// SQL LIKE: `%` matches any run, `_` matches one character, everything else
/// is literal. Case-insensitive, anchored at both ends.
fn like_match(text: &str, pattern: &str) -> bool {
    let mut source = String::from("(?i)^");
    for ch in pattern.chars() {
        match ch {
            '%' => source.push_str(".*"),
            '_' => source.push('.'),
            other => source.push_str(&regex::escape(&other.to_string())),
        }
    }
    source.push('$');
    Regex::new(&source)
        .map(|re| re.is_match(text))
        .unwrap_or(false)
}
