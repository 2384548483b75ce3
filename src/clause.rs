//! Clause parsers.
//!
//! The statement parsers slice a statement's tail into clause substrings
//! (everything after WHERE, GROUP BY, HAVING, ORDER BY, LIMIT) and hand each
//! substring to the matching parser here:
//! - WHERE/HAVING: a single `column OP value` triple
//! - ORDER BY: `column [ASC|DESC]`
//! - GROUP BY: comma-separated column names
//! - LIMIT: a row count
//! - select list entries: `*`, `FUNC(column) [AS alias]`, `expr AS alias`,
//!   or a plain column name

use crate::condition::{CompareOp, Condition};
use crate::error::{EngineError, Result};

/// Aggregate functions usable in a select list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AggFunc {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggFunc {
    pub fn from_name(name: &str) -> Option<AggFunc> {
        match name.to_uppercase().as_str() {
            "COUNT" => Some(AggFunc::Count),
            "SUM" => Some(AggFunc::Sum),
            "AVG" => Some(AggFunc::Avg),
            "MIN" => Some(AggFunc::Min),
            "MAX" => Some(AggFunc::Max),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AggFunc::Count => "COUNT",
            AggFunc::Sum => "SUM",
            AggFunc::Avg => "AVG",
            AggFunc::Min => "MIN",
            AggFunc::Max => "MAX",
        }
    }
}

/// One entry of a SELECT column list.
#[derive(Clone, Debug, PartialEq)]
pub enum SelectColumn {
    All,
    Plain { column: String, alias: String },
    Aggregate { func: AggFunc, column: String, alias: String },
}

/// ORDER BY target and direction.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderSpec {
    pub column: String,
    pub descending: bool,
}

/// Parse a WHERE or HAVING substring into its condition triple.
///
/// `construct` names the clause in the syntax error. A value opening a
/// parenthesized SELECT is rejected as an unsupported subquery.
pub fn parse_condition(clause: &str, construct: &str) -> Result<Condition> {
    let clause = clause.trim();
    let (op, op_start, op_end) =
        find_operator(clause).ok_or_else(|| EngineError::syntax(construct))?;

    let raw_value = clause[op_end..].trim();
    if raw_value.is_empty() {
        return Err(EngineError::syntax(construct));
    }
    if is_subquery(raw_value) {
        return Err(EngineError::SubqueryUnsupported);
    }

    let column = strip_qualifier(clause[..op_start].trim());
    if column.is_empty() || !(column.contains('(') || is_identifier(column)) {
        return Err(EngineError::syntax(construct));
    }

    Ok(Condition::new(column, op, strip_outer_quotes(raw_value)))
}

/// Parse an ORDER BY substring: `column [ASC|DESC]`, default ascending.
pub fn parse_order_by(clause: &str) -> Result<OrderSpec> {
    let mut parts = clause.split_whitespace();
    let column = parts.next().ok_or_else(|| EngineError::syntax("ORDER BY"))?;
    let descending = match parts.next() {
        None => false,
        Some(word) if word.eq_ignore_ascii_case("ASC") => false,
        Some(word) if word.eq_ignore_ascii_case("DESC") => true,
        Some(_) => return Err(EngineError::syntax("ORDER BY")),
    };
    if parts.next().is_some() {
        return Err(EngineError::syntax("ORDER BY"));
    }
    Ok(OrderSpec {
        column: strip_qualifier(column).to_string(),
        descending,
    })
}

/// Parse a GROUP BY substring into its column name list.
pub fn parse_group_by(clause: &str) -> Result<Vec<String>> {
    let columns: Vec<String> = clause.split(',').map(|c| c.trim().to_string()).collect();
    if columns.iter().any(|c| c.is_empty()) {
        return Err(EngineError::syntax("GROUP BY"));
    }
    Ok(columns)
}

/// Parse a LIMIT substring. The executor applies it only when positive.
pub fn parse_limit(clause: &str) -> Result<i64> {
    clause
        .trim()
        .parse::<i64>()
        .map_err(|_| EngineError::syntax("LIMIT"))
}

/// Parse one select list entry.
///
/// Never fails: anything that is not `*`, an aggregate call, or an aliased
/// expression is taken as a plain column named by the whole token.
pub fn parse_select_column(token: &str) -> SelectColumn {
    let token = token.trim();
    if token == "*" {
        return SelectColumn::All;
    }
    if let Some(aggregate) = parse_aggregate(token) {
        return aggregate;
    }
    if let Some((expr, alias)) = split_alias(token) {
        return SelectColumn::Plain {
            column: expr.to_string(),
            alias: alias.to_string(),
        };
    }
    SelectColumn::Plain {
        column: token.to_string(),
        alias: token.to_string(),
    }
}

/// Default alias for an unaliased aggregate: `count_all`, `sum_salary`, ...
pub fn default_aggregate_alias(func: AggFunc, column: &str) -> String {
    let suffix = if column == "*" { "all" } else { column };
    format!("{}_{}", func.as_str().to_lowercase(), suffix)
}

fn parse_aggregate(token: &str) -> Option<SelectColumn> {
    let open = token.find('(')?;
    let func = AggFunc::from_name(token[..open].trim())?;
    let close = token.find(')')?;
    if close < open {
        return None;
    }
    let inner = token[open + 1..close].trim();
    if inner != "*" && !is_column_ref(inner) {
        return None;
    }

    let rest = token[close + 1..].trim();
    let alias = if rest.is_empty() {
        default_aggregate_alias(func, inner)
    } else {
        let mut parts = rest.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(keyword), Some(alias), None)
                if keyword.eq_ignore_ascii_case("AS") && is_identifier(alias) =>
            {
                alias.to_string()
            }
            _ => return None,
        }
    };

    Some(SelectColumn::Aggregate {
        func,
        column: inner.to_string(),
        alias,
    })
}

/// Split `expr AS alias` at the last AS whose alias side is a bare
/// identifier.
fn split_alias(token: &str) -> Option<(&str, &str)> {
    let bytes = token.as_bytes();
    if bytes.len() < 4 {
        return None;
    }
    for i in (0..=bytes.len() - 4).rev() {
        if bytes[i..i + 4].eq_ignore_ascii_case(b" AS ") {
            let expr = token[..i].trim();
            let alias = token[i + 4..].trim();
            if !expr.is_empty() && is_identifier(alias) {
                return Some((expr, alias));
            }
        }
    }
    None
}

/// Split a comma-separated list, honoring single/double quoted runs and
/// doubled-quote escapes. Items come back trimmed, quotes still attached.
pub fn split_list(input: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        match quote {
            Some(q) if ch == q => {
                if chars.peek() == Some(&q) {
                    // Doubled quote collapses to one literal quote char.
                    chars.next();
                    current.push(ch);
                } else {
                    quote = None;
                    current.push(ch);
                }
            }
            Some(_) => current.push(ch),
            None => match ch {
                '\'' | '"' => {
                    quote = Some(ch);
                    current.push(ch);
                }
                ',' => {
                    items.push(current.trim().to_string());
                    current.clear();
                }
                _ => current.push(ch),
            },
        }
    }
    items.push(current.trim().to_string());
    items
}

/// Strip one matching pair of outer quotes. A value quoted on only one side
/// keeps its quote character.
pub fn strip_outer_quotes(raw: &str) -> &str {
    let bytes = raw.as_bytes();
    if bytes.len() >= 2
        && (bytes[0] == b'\'' || bytes[0] == b'"')
        && bytes[bytes.len() - 1] == bytes[0]
    {
        &raw[1..raw.len() - 1]
    } else {
        raw
    }
}

/// `alias.column` collapses to the bare column key, which both plain scans
/// and joined rows carry.
pub(crate) fn strip_qualifier(column: &str) -> &str {
    if column.contains('(') {
        return column;
    }
    match column.rfind('.') {
        Some(idx) => &column[idx + 1..],
        None => column,
    }
}

pub(crate) fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// A bare or alias-qualified column name: `salary` or `e.salary`.
pub(crate) fn is_column_ref(s: &str) -> bool {
    match s.split_once('.') {
        Some((qualifier, column)) => is_identifier(qualifier) && is_identifier(column),
        None => is_identifier(s),
    }
}

/// Locate the first comparison operator outside quoted runs. Returns the
/// operator and its byte span.
pub(crate) fn find_operator(clause: &str) -> Option<(CompareOp, usize, usize)> {
    let bytes = clause.as_bytes();
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        match b {
            b'\'' | b'"' => {
                quote = Some(b);
                i += 1;
            }
            b'!' if bytes.get(i + 1) == Some(&b'=') => return Some((CompareOp::Ne, i, i + 2)),
            b'<' => {
                return match bytes.get(i + 1) {
                    Some(b'>') => Some((CompareOp::Ne, i, i + 2)),
                    Some(b'=') => Some((CompareOp::Le, i, i + 2)),
                    _ => Some((CompareOp::Lt, i, i + 1)),
                };
            }
            b'>' => {
                return match bytes.get(i + 1) {
                    Some(b'=') => Some((CompareOp::Ge, i, i + 2)),
                    _ => Some((CompareOp::Gt, i, i + 1)),
                };
            }
            b'=' => return Some((CompareOp::Eq, i, i + 1)),
            _ => {
                if is_like_at(bytes, i) {
                    return Some((CompareOp::Like, i, i + 4));
                }
                i += 1;
            }
        }
    }
    None
}

fn is_like_at(bytes: &[u8], i: usize) -> bool {
    if i + 4 > bytes.len() || !bytes[i..i + 4].eq_ignore_ascii_case(b"LIKE") {
        return false;
    }
    let bounded_left = i == 0 || !is_word_byte(bytes[i - 1]);
    let bounded_right = i + 4 == bytes.len() || !is_word_byte(bytes[i + 4]);
    bounded_left && bounded_right
}

pub(crate) fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_subquery(value: &str) -> bool {
    value
        .strip_prefix('(')
        .map(|rest| {
            let rest = rest.trim_start();
            rest.len() >= 6 && rest.as_bytes()[..6].eq_ignore_ascii_case(b"SELECT")
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_condition_basic() {
        let cond = parse_condition("salary > 50000", "WHERE clause").unwrap();
        assert_eq!(cond.column, "salary");
        assert_eq!(cond.op, CompareOp::Gt);
        assert_eq!(cond.value, "50000");
    }

    #[test]
    fn test_parse_condition_strips_quotes() {
        let cond = parse_condition("name = 'Ann'", "WHERE clause").unwrap();
        assert_eq!(cond.op, CompareOp::Eq);
        assert_eq!(cond.value, "Ann");

        let cond = parse_condition("name = \"Ann\"", "WHERE clause").unwrap();
        assert_eq!(cond.value, "Ann");
    }

    #[test]
    fn test_parse_condition_two_char_operators() {
        assert_eq!(
            parse_condition("a != 1", "WHERE clause").unwrap().op,
            CompareOp::Ne
        );
        assert_eq!(
            parse_condition("a <> 1", "WHERE clause").unwrap().op,
            CompareOp::Ne
        );
        assert_eq!(
            parse_condition("a <= 1", "WHERE clause").unwrap().op,
            CompareOp::Le
        );
        assert_eq!(
            parse_condition("a >= 1", "WHERE clause").unwrap().op,
            CompareOp::Ge
        );
    }

    #[test]
    fn test_parse_condition_like_word_boundary() {
        let cond = parse_condition("name LIKE '%son%'", "WHERE clause").unwrap();
        assert_eq!(cond.op, CompareOp::Like);
        assert_eq!(cond.value, "%son%");

        // A column containing the letters does not trigger the operator.
        assert!(parse_condition("alike 5", "WHERE clause").is_err());
    }

    #[test]
    fn test_parse_condition_qualified_column() {
        let cond = parse_condition("e.department = 'Sales'", "WHERE clause").unwrap();
        assert_eq!(cond.column, "department");
    }

    #[test]
    fn test_parse_condition_aggregate_form() {
        let cond = parse_condition("COUNT(*) > 3", "HAVING clause").unwrap();
        assert_eq!(cond.column, "COUNT(*)");
        assert_eq!(cond.op, CompareOp::Gt);
    }

    #[test]
    fn test_parse_condition_rejects_subquery() {
        let err = parse_condition(
            "salary > (SELECT AVG(salary) FROM employees)",
            "WHERE clause",
        )
        .unwrap_err();
        assert_eq!(err, EngineError::SubqueryUnsupported);
    }

    #[test]
    fn test_parse_condition_rejects_garbage() {
        assert!(parse_condition("salary", "WHERE clause").is_err());
        assert!(parse_condition("= 5", "WHERE clause").is_err());
        assert!(parse_condition("salary >", "WHERE clause").is_err());
    }

    #[test]
    fn test_parse_order_by() {
        let spec = parse_order_by("salary").unwrap();
        assert_eq!(spec.column, "salary");
        assert!(!spec.descending);

        let spec = parse_order_by("salary DESC").unwrap();
        assert!(spec.descending);

        let spec = parse_order_by("salary asc").unwrap();
        assert!(!spec.descending);

        assert!(parse_order_by("salary SIDEWAYS").is_err());
        assert!(parse_order_by("").is_err());
    }

    #[test]
    fn test_parse_group_by() {
        assert_eq!(
            parse_group_by("department, location").unwrap(),
            vec!["department".to_string(), "location".to_string()]
        );
        assert!(parse_group_by("a,,b").is_err());
    }

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit("5").unwrap(), 5);
        assert_eq!(parse_limit(" 10 ").unwrap(), 10);
        assert!(parse_limit("ten").is_err());
    }

    #[test]
    fn test_parse_select_column_plain_and_alias() {
        assert_eq!(parse_select_column("*"), SelectColumn::All);
        assert_eq!(
            parse_select_column("name"),
            SelectColumn::Plain {
                column: "name".into(),
                alias: "name".into()
            }
        );
        assert_eq!(
            parse_select_column("name AS employee"),
            SelectColumn::Plain {
                column: "name".into(),
                alias: "employee".into()
            }
        );
    }

    #[test]
    fn test_parse_select_column_aggregate() {
        assert_eq!(
            parse_select_column("COUNT(*)"),
            SelectColumn::Aggregate {
                func: AggFunc::Count,
                column: "*".into(),
                alias: "count_all".into()
            }
        );
        assert_eq!(
            parse_select_column("avg(salary)"),
            SelectColumn::Aggregate {
                func: AggFunc::Avg,
                column: "salary".into(),
                alias: "avg_salary".into()
            }
        );
        assert_eq!(
            parse_select_column("COUNT(*) as c"),
            SelectColumn::Aggregate {
                func: AggFunc::Count,
                column: "*".into(),
                alias: "c".into()
            }
        );
    }

    #[test]
    fn test_parse_select_column_qualified_is_plain() {
        assert_eq!(
            parse_select_column("e.name"),
            SelectColumn::Plain {
                column: "e.name".into(),
                alias: "e.name".into()
            }
        );
    }

    #[test]
    fn test_split_list_quote_aware() {
        assert_eq!(split_list("1, 'Ann', 2.5"), vec!["1", "'Ann'", "2.5"]);
        assert_eq!(
            split_list("'Smith, John', 30"),
            vec!["'Smith, John'", "30"]
        );
        assert_eq!(split_list("'It''s', 1"), vec!["'It's'", "1"]);
        assert_eq!(split_list("\"a,b\", c"), vec!["\"a,b\"", "c"]);
    }

    #[test]
    fn test_strip_outer_quotes() {
        assert_eq!(strip_outer_quotes("'Ann'"), "Ann");
        assert_eq!(strip_outer_quotes("\"Ann\""), "Ann");
        assert_eq!(strip_outer_quotes("Ann"), "Ann");
        assert_eq!(strip_outer_quotes("''"), "");
        // Unpaired or mismatched quotes stay put.
        assert_eq!(strip_outer_quotes("'Ann"), "'Ann");
        assert_eq!(strip_outer_quotes("'Ann\""), "'Ann\"");
    }

    #[test]
    fn test_parse_aggregate_qualified_column() {
        assert_eq!(
            parse_select_column("COUNT(e.id)"),
            SelectColumn::Aggregate {
                func: AggFunc::Count,
                column: "e.id".into(),
                alias: "count_e.id".into()
            }
        );
    }
}
