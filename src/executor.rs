//! SELECT execution.
//!
//! Runs a parsed SELECT against the current database in fixed pipeline
//! order:
//! 1. scan the base table, or nested-loop join it with the right table
//! 2. filter on WHERE
//! 3. shape the rows: GROUP BY, whole-table aggregation, or projection
//! 4. filter groups on HAVING
//! 5. ORDER BY, then LIMIT
//!
//! Returns the shaped rows together with the result column names, derived
//! from the statement so they are stable even when no rows survive.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::catalog::Database;
use crate::clause::{self, AggFunc, OrderSpec, SelectColumn};
use crate::condition::Condition;
use crate::error::Result;
use crate::parser::{JoinClause, SelectStatement};
use crate::schema::ResultRow;
use crate::table::Table;
use crate::value::Value;

/// Execute a SELECT, producing result rows and their column names.
pub fn execute_select(
    stmt: &SelectStatement,
    db: &Database,
) -> Result<(Vec<ResultRow>, Vec<String>)> {
    let table = db.table(&stmt.table)?;

    let mut rows = match &stmt.join {
        Some(join) => join_rows(table, db.table(&join.table)?, join),
        None => table.scan(),
    };

    if let Some(condition) = &stmt.where_clause {
        rows.retain(|row| condition.matches(row));
    }

    let (mut rows, columns) = if !stmt.group_by.is_empty() {
        group_rows(rows, &stmt.group_by, &stmt.columns)
    } else if has_aggregates(&stmt.columns) {
        aggregate_rows(&rows, &stmt.columns)
    } else {
        project_rows(rows, &stmt.columns, table)
    };

    // HAVING only applies to grouped results.
    if let Some(having) = &stmt.having {
        if !stmt.group_by.is_empty() {
            let resolved = resolve_having(having, &stmt.columns);
            rows.retain(|row| resolved.matches(row));
        }
    }

    if let Some(order) = &stmt.order_by {
        sort_rows(&mut rows, order);
    }

    if let Some(limit) = stmt.limit {
        if limit > 0 {
            rows.truncate(limit as usize);
        }
    }

    Ok((rows, columns))
}

fn has_aggregates(select: &[SelectColumn]) -> bool {
    select
        .iter()
        .any(|c| matches!(c, SelectColumn::Aggregate { .. }))
}

// ==================== JOIN ====================

/// Nested-loop equi-join. Each merged row carries every column twice, as
/// `alias.column` and as the bare name, with the left side winning bare-name
/// collisions.
fn join_rows(left: &Table, right: &Table, join: &JoinClause) -> Vec<ResultRow> {
    let left_rows = left.scan();
    let right_rows = right.scan();
    let mut merged = Vec::new();

    for lrow in &left_rows {
        for rrow in &right_rows {
            if !cells_match(lrow.get(&join.left_column), rrow.get(&join.right_column)) {
                continue;
            }
            let mut row = ResultRow::new();
            merge_side(&mut row, lrow, &join.left_alias);
            merge_side(&mut row, rrow, &join.right_alias);
            merged.push(row);
        }
    }
    merged
}

fn merge_side(row: &mut ResultRow, side: &ResultRow, alias: &str) {
    for (name, value) in side.iter() {
        row.insert(&format!("{alias}.{name}"), value.clone());
        if !row.contains(name) {
            row.insert(name, value.clone());
        }
    }
}

fn cells_match(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => values_equal(a, b),
        (None, None) => true,
        _ => false,
    }
}

/// Typed equality. Int and Float compare numerically; everything else by
/// variant.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(x), Value::Float(y)) => *x as f64 == *y,
        (Value::Float(x), Value::Int(y)) => *x == *y as f64,
        _ => a == b,
    }
}

// ==================== GROUPING ====================

/// Partition rows by the GROUP BY columns (first-seen order) and emit one
/// row per group: the group columns first, then aggregates and stray plain
/// columns from the select list.
fn group_rows(
    rows: Vec<ResultRow>,
    group_by: &[String],
    select: &[SelectColumn],
) -> (Vec<ResultRow>, Vec<String>) {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Vec<ResultRow>> = Vec::new();

    for row in rows {
        let key = group_key(&row, group_by);
        match index.get(&key) {
            Some(&i) => groups[i].push(row),
            None => {
                index.insert(key, groups.len());
                groups.push(vec![row]);
            }
        }
    }

    let mut result = Vec::with_capacity(groups.len());
    for group in &groups {
        let mut row = ResultRow::new();
        for name in group_by {
            row.insert(name, group[0].get(name).cloned().unwrap_or(Value::Null));
        }
        for entry in select {
            match entry {
                SelectColumn::Aggregate { func, column, alias } => {
                    row.insert(alias, evaluate_aggregate(*func, column, group));
                }
                SelectColumn::Plain { column, alias } if !group_by.contains(column) => {
                    row.insert(alias, group[0].get(column).cloned().unwrap_or(Value::Null));
                }
                _ => {}
            }
        }
        result.push(row);
    }

    (result, grouped_columns(group_by, select))
}

fn group_key(row: &ResultRow, group_by: &[String]) -> String {
    group_by
        .iter()
        .map(|col| match row.get(col) {
            Some(value) => value.to_string(),
            None => Value::Null.to_string(),
        })
        .collect::<Vec<_>>()
        .join("|")
}

fn grouped_columns(group_by: &[String], select: &[SelectColumn]) -> Vec<String> {
    let mut columns: Vec<String> = group_by.to_vec();
    for entry in select {
        let alias = match entry {
            SelectColumn::Aggregate { alias, .. } => alias,
            SelectColumn::Plain { column, alias } if !group_by.contains(column) => alias,
            _ => continue,
        };
        if !columns.contains(alias) {
            columns.push(alias.clone());
        }
    }
    columns
}

/// Rewrite a HAVING condition written in aggregate form (`COUNT(*) > 3`) to
/// target the result column it refers to: the matching select entry's alias
/// when one exists, the default alias otherwise.
fn resolve_having(condition: &Condition, select: &[SelectColumn]) -> Condition {
    if let SelectColumn::Aggregate { func, column, alias } =
        clause::parse_select_column(&condition.column)
    {
        let resolved = select
            .iter()
            .find_map(|entry| match entry {
                SelectColumn::Aggregate {
                    func: f,
                    column: c,
                    alias: a,
                } if *f == func && *c == column => Some(a.clone()),
                _ => None,
            })
            .unwrap_or(alias);
        return Condition::new(&resolved, condition.op, &condition.value);
    }
    condition.clone()
}

// ==================== AGGREGATES ====================

/// Whole-table aggregation: always exactly one result row, holding only the
/// aggregate entries of the select list.
fn aggregate_rows(rows: &[ResultRow], select: &[SelectColumn]) -> (Vec<ResultRow>, Vec<String>) {
    let mut row = ResultRow::new();
    let mut columns = Vec::new();
    for entry in select {
        if let SelectColumn::Aggregate { func, column, alias } = entry {
            row.insert(alias, evaluate_aggregate(*func, column, rows));
            if !columns.contains(alias) {
                columns.push(alias.clone());
            }
        }
    }
    (vec![row], columns)
}

fn evaluate_aggregate(func: AggFunc, column: &str, rows: &[ResultRow]) -> Value {
    if func == AggFunc::Count && column == "*" {
        return Value::Int(rows.len() as i64);
    }
    let values = numeric_values(column, rows);
    match func {
        AggFunc::Count => Value::Int(values.len() as i64),
        AggFunc::Sum => Value::Float(values.iter().sum()),
        AggFunc::Avg => {
            if values.is_empty() {
                Value::Float(0.0)
            } else {
                Value::Float(values.iter().sum::<f64>() / values.len() as f64)
            }
        }
        AggFunc::Min => values
            .iter()
            .copied()
            .reduce(f64::min)
            .map(Value::Float)
            .unwrap_or(Value::Null),
        AggFunc::Max => values
            .iter()
            .copied()
            .reduce(f64::max)
            .map(Value::Float)
            .unwrap_or(Value::Null),
    }
}

/// Cells feeding an aggregate. NULL and boolean cells drop out; anything
/// else contributes its numeric value, with non-numeric text counting as 0.
fn numeric_values(column: &str, rows: &[ResultRow]) -> Vec<f64> {
    let mut values = Vec::new();
    for row in rows {
        match row.get(column) {
            None => values.push(0.0),
            Some(Value::Null) | Some(Value::Bool(_)) => {}
            Some(value) => values.push(value.as_number().unwrap_or(0.0)),
        }
    }
    values
}

// ==================== PROJECTION ====================

/// Plain column selection. `*` keeps the base table's declared columns; a
/// named list keeps each entry under its alias, NULL when the row has no
/// such column.
fn project_rows(
    rows: Vec<ResultRow>,
    select: &[SelectColumn],
    table: &Table,
) -> (Vec<ResultRow>, Vec<String>) {
    if matches!(select.first(), Some(SelectColumn::All)) {
        let names = table.column_names();
        let projected = rows
            .into_iter()
            .map(|row| {
                let mut out = ResultRow::new();
                for name in &names {
                    out.insert(name, row.get(name).cloned().unwrap_or(Value::Null));
                }
                out
            })
            .collect();
        return (projected, names);
    }

    let names: Vec<String> = select.iter().map(|entry| alias_of(entry).to_string()).collect();
    let projected = rows
        .into_iter()
        .map(|row| {
            let mut out = ResultRow::new();
            for entry in select {
                let (column, alias) = match entry {
                    SelectColumn::All => ("*", "*"),
                    SelectColumn::Plain { column, alias } => (column.as_str(), alias.as_str()),
                    SelectColumn::Aggregate { column, alias, .. } => {
                        (column.as_str(), alias.as_str())
                    }
                };
                out.insert(alias, row.get(column).cloned().unwrap_or(Value::Null));
            }
            out
        })
        .collect();
    (projected, names)
}

fn alias_of(entry: &SelectColumn) -> &str {
    match entry {
        SelectColumn::All => "*",
        SelectColumn::Plain { alias, .. } => alias,
        SelectColumn::Aggregate { alias, .. } => alias,
    }
}

// ==================== ORDERING ====================

fn sort_rows(rows: &mut [ResultRow], order: &OrderSpec) {
    rows.sort_by(|a, b| {
        let ord = compare_cells(a.get(&order.column), b.get(&order.column));
        if order.descending { ord.reverse() } else { ord }
    });
}

/// Numeric comparison when both cells read as numbers, string comparison of
/// their display forms otherwise. Missing cells sort as NULL, and NULL
/// counts as 0 next to numbers.
fn compare_cells(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.unwrap_or(&Value::Null);
    let b = b.unwrap_or(&Value::Null);
    match (order_key(a), order_key(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

fn order_key(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        _ => value.as_number(),
    }
}
