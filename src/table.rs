//! Table storage.
//!
//! A table keeps its declared columns and typed rows in insertion order.
//! Raw statement values are coerced against the declared column types on the
//! way in, so every stored cell is already typed.

use crate::condition::Condition;
use crate::error::{EngineError, Result};
use crate::schema::{Column, ResultRow, Row, RowId};
use crate::value::Value;

/// One table of an in-memory database.
#[derive(Clone, Debug)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub(crate) rows: Vec<Row>,
    next_row_id: u64,
}

impl Table {
    /// Create an empty table. Column names must be unique.
    pub fn new(name: &str, columns: Vec<Column>) -> Result<Self> {
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(EngineError::ColumnExists(column.name.clone()));
            }
        }
        Ok(Table {
            name: name.to_string(),
            columns,
            rows: Vec::new(),
            next_row_id: 1,
        })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Insert one row of raw values, positionally matched to the declared
    /// columns. Nothing is stored unless every value passes.
    pub fn insert(&mut self, values: &[String]) -> Result<()> {
        if values.len() != self.columns.len() {
            return Err(EngineError::ColumnCountMismatch {
                expected: self.columns.len(),
                got: values.len(),
            });
        }

        let mut row_values = Vec::with_capacity(values.len());
        for (column, raw) in self.columns.iter().zip(values) {
            let value = Value::coerce(raw, &column.data_type)?;
            if value.is_null() && !column.nullable {
                return Err(EngineError::NullViolation(column.name.clone()));
            }
            row_values.push(value);
        }

        let row = Row::new(RowId::new(self.next_row_id), row_values);
        self.next_row_id += 1;
        self.rows.push(row);
        Ok(())
    }

    /// Apply SET assignments to every matching row. Values are coerced once,
    /// against the declared column types, before any row changes.
    pub fn update(
        &mut self,
        assignments: &[(String, String)],
        condition: Option<&Condition>,
    ) -> Result<usize> {
        let mut prepared = Vec::with_capacity(assignments.len());
        for (name, raw) in assignments {
            let idx = self
                .column_index(name)
                .ok_or_else(|| EngineError::ColumnNotFound(name.clone()))?;
            let column = &self.columns[idx];
            let value = Value::coerce(raw, &column.data_type)?;
            if value.is_null() && !column.nullable {
                return Err(EngineError::NullViolation(column.name.clone()));
            }
            prepared.push((idx, value));
        }

        let matching: Vec<usize> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| self.row_matches(row, condition))
            .map(|(i, _)| i)
            .collect();

        for &i in &matching {
            for (idx, value) in &prepared {
                self.rows[i].values[*idx] = value.clone();
            }
        }
        Ok(matching.len())
    }

    /// Delete every matching row, or all rows without a condition.
    pub fn delete(&mut self, condition: Option<&Condition>) -> usize {
        let rows = std::mem::take(&mut self.rows);
        let (matched, kept): (Vec<Row>, Vec<Row>) = rows
            .into_iter()
            .partition(|row| self.row_matches(row, condition));
        self.rows = kept;
        matched.len()
    }

    /// Add a column at the end, backfilling existing rows with the coerced
    /// default value or NULL.
    pub fn add_column(&mut self, column: Column) -> Result<()> {
        if self.column_index(&column.name).is_some() {
            return Err(EngineError::ColumnExists(column.name));
        }
        let backfill = match &column.default_value {
            Some(raw) => Value::coerce(raw, &column.data_type)?,
            None => Value::Null,
        };
        for row in &mut self.rows {
            row.values.push(backfill.clone());
        }
        self.columns.push(column);
        Ok(())
    }

    /// All rows as name/value pairs in declared column order.
    pub fn scan(&self) -> Vec<ResultRow> {
        self.rows.iter().map(|row| self.result_row(row)).collect()
    }

    fn result_row(&self, row: &Row) -> ResultRow {
        let mut result = ResultRow::new();
        for (column, value) in self.columns.iter().zip(&row.values) {
            result.insert(&column.name, value.clone());
        }
        result
    }

    fn row_matches(&self, row: &Row, condition: Option<&Condition>) -> bool {
        match condition {
            Some(cond) => cond.matches(&self.result_row(row)),
            None => true,
        }
    }
}
