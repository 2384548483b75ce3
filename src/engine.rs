//! Engine facade.
//!
//! [`Engine`] owns the catalog and the query history and exposes one entry
//! point, [`Engine::execute_query`]. Every statement, good or bad, comes
//! back as a [`QueryResult`] envelope: errors are reported inside it, never
//! raised past this boundary, and every execution lands in the history.

use std::fmt;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::catalog::Catalog;
use crate::error::{EngineError, Result};
use crate::executor;
use crate::history::{HistoryEntry, QueryHistory};
use crate::parser::{self, Statement};
use crate::sample;
use crate::schema::{Column, ResultRow};
use crate::value::Value;

// ==================== RESULT ENVELOPE ====================

/// Outcome envelope shared by every statement kind.
///
/// `success` message statements fill `message` and `affected_rows`; row
/// statements fill `data` and `columns`; failures carry the error text. The
/// `query` field echoes the cleaned statement.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub success: bool,
    pub data: Vec<ResultRow>,
    pub columns: Vec<String>,
    pub affected_rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub query: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "executionTime")]
    pub execution_time_ms: u64,
}

impl QueryResult {
    pub fn new(query: &str) -> Self {
        QueryResult {
            success: false,
            data: Vec::new(),
            columns: Vec::new(),
            affected_rows: 0,
            message: None,
            error: None,
            query: query.to_string(),
            timestamp: Utc::now(),
            execution_time_ms: 0,
        }
    }
}

/// Snapshot of one table for inspection outside the SQL surface.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSchema {
    pub columns: Vec<Column>,
    pub data: Vec<ResultRow>,
    pub row_count: usize,
    pub column_count: usize,
}

// ==================== ENGINE ====================

/// In-memory SQL engine: catalog, executor, and history behind one call.
pub struct Engine {
    catalog: Catalog,
    history: QueryHistory,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

impl Engine {
    /// An engine with no databases.
    pub fn new() -> Self {
        Engine {
            catalog: Catalog::new(),
            history: QueryHistory::new(),
        }
    }

    /// An engine preloaded with the demo databases, `employee_db` selected.
    pub fn with_sample_data() -> Self {
        let mut engine = Engine::new();
        sample::seed(&mut engine);
        engine
    }

    /// Execute one SQL statement and record it in the history.
    pub fn execute_query(&mut self, sql: &str) -> QueryResult {
        let started = Instant::now();
        let clean = clean_sql(sql);
        let mut result = QueryResult::new(clean);

        match self.run(clean, &mut result) {
            Ok(()) => result.success = true,
            Err(err) => result.error = Some(err.to_string()),
        }
        result.execution_time_ms = started.elapsed().as_millis() as u64;

        self.history.record(&result);
        result
    }

    fn run(&mut self, sql: &str, result: &mut QueryResult) -> Result<()> {
        if sql.is_empty() {
            return Err(EngineError::EmptyQuery);
        }

        match parser::parse(sql)? {
            Statement::CreateDatabase { name } => {
                self.catalog.create_database(&name)?;
                result.message = Some(format!("Database '{name}' created successfully"));
            }
            Statement::DropDatabase { name } => {
                self.catalog.drop_database(&name)?;
                result.message = Some(format!("Database '{name}' dropped successfully"));
            }
            Statement::UseDatabase { name } => {
                self.catalog.use_database(&name)?;
                result.message = Some(format!("Using database '{name}'"));
            }
            Statement::ShowDatabases => {
                result.columns = vec!["Database".to_string()];
                result.data = self
                    .catalog
                    .database_names()
                    .into_iter()
                    .map(|name| {
                        let mut row = ResultRow::new();
                        row.insert("Database", Value::Text(name));
                        row
                    })
                    .collect();
            }
            Statement::ShowTables => {
                let db = self.catalog.current()?;
                let column = format!("Tables_in_{}", db.name);
                result.columns = vec![column.clone()];
                result.data = db
                    .table_names()
                    .into_iter()
                    .map(|name| {
                        let mut row = ResultRow::new();
                        row.insert(&column, Value::Text(name));
                        row
                    })
                    .collect();
            }
            Statement::CreateTable { name, columns } => {
                self.catalog.current_mut()?.create_table(&name, columns)?;
                result.message = Some(format!("Table '{name}' created successfully"));
            }
            Statement::DropTable { name } => {
                self.catalog.current_mut()?.drop_table(&name)?;
                result.message = Some(format!("Table '{name}' dropped successfully"));
            }
            Statement::AlterTableAddColumn { table, column } => {
                let column_name = column.name.clone();
                self.catalog
                    .current_mut()?
                    .table_mut(&table)?
                    .add_column(column)?;
                result.message =
                    Some(format!("Column '{column_name}' added to table '{table}'"));
            }
            Statement::Describe { table } => {
                let db = self.catalog.current()?;
                let table = db.table(&table)?;
                result.columns = ["Field", "Type", "Null", "Key", "Default", "Extra"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect();
                result.data = table.columns.iter().map(describe_row).collect();
            }
            Statement::Insert { table, values } => {
                self.catalog
                    .current_mut()?
                    .table_mut(&table)?
                    .insert(&values)?;
                result.affected_rows = 1;
                result.message = Some(format!("1 row inserted into '{table}'"));
            }
            Statement::Select(select) => {
                let db = self.catalog.current()?;
                let (rows, columns) = executor::execute_select(&select, db)?;
                result.data = rows;
                result.columns = columns;
            }
            Statement::Update {
                table,
                assignments,
                where_clause,
            } => {
                let affected = self
                    .catalog
                    .current_mut()?
                    .table_mut(&table)?
                    .update(&assignments, where_clause.as_ref())?;
                result.affected_rows = affected;
                result.message = Some(format!("{affected} row(s) updated in '{table}'"));
            }
            Statement::Delete {
                table,
                where_clause,
            } => {
                let affected = self
                    .catalog
                    .current_mut()?
                    .table_mut(&table)?
                    .delete(where_clause.as_ref());
                result.affected_rows = affected;
                result.message = Some(format!("{affected} row(s) deleted from '{table}'"));
            }
        }
        Ok(())
    }

    // ==================== INTROSPECTION ====================

    pub fn database_names(&self) -> Vec<String> {
        self.catalog.database_names()
    }

    pub fn current_database(&self) -> Option<&str> {
        self.catalog.current_name()
    }

    /// Tables of the selected database, empty when none is selected.
    pub fn table_names(&self) -> Vec<String> {
        self.catalog
            .current()
            .map(|db| db.table_names())
            .unwrap_or_default()
    }

    /// Schema and rows of one table in the selected database.
    pub fn table_schema(&self, name: &str) -> Option<TableSchema> {
        let table = self.catalog.current().ok()?.table(name).ok()?;
        Some(TableSchema {
            columns: table.columns.clone(),
            data: table.scan(),
            row_count: table.len(),
            column_count: table.columns.len(),
        })
    }

    /// Executed statements, newest first.
    pub fn history(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.history.iter()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

fn clean_sql(sql: &str) -> &str {
    let mut out = sql.trim();
    while out.ends_with(';') {
        out = out.trim_end_matches(';').trim_end();
    }
    out
}

fn describe_row(column: &Column) -> ResultRow {
    let mut row = ResultRow::new();
    row.insert("Field", Value::Text(column.name.clone()));
    row.insert("Type", Value::Text(column.data_type.clone()));
    row.insert(
        "Null",
        Value::Text(if column.nullable { "YES" } else { "NO" }.to_string()),
    );
    row.insert(
        "Key",
        Value::Text(if column.primary_key { "PRI" } else { "" }.to_string()),
    );
    row.insert(
        "Default",
        match &column.default_value {
            Some(value) => Value::Text(value.clone()),
            None => Value::Null,
        },
    );
    row.insert(
        "Extra",
        Value::Text(if column.auto_increment { "auto_increment" } else { "" }.to_string()),
    );
    row
}

// ==================== DISPLAY ====================

impl fmt::Display for QueryResult {
    /// MySQL-client style rendering: an error line, a message line, or an
    /// ASCII table with a row count footer.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.success {
            return write!(
                f,
                "Error: {}",
                self.error.as_deref().unwrap_or("unknown error")
            );
        }
        if let Some(message) = &self.message {
            return write!(f, "{message}");
        }
        if self.columns.is_empty() {
            return write!(f, "Empty set");
        }

        let cells: Vec<Vec<String>> = self
            .data
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(|name| match row.get(name) {
                        Some(value) => value.to_string(),
                        None => Value::Null.to_string(),
                    })
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                cells
                    .iter()
                    .map(|row| row[i].len())
                    .chain([name.len()])
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write_divider(f, &widths)?;
        for (name, width) in self.columns.iter().zip(&widths) {
            write!(f, "| {name:<width$} ")?;
        }
        writeln!(f, "|")?;
        write_divider(f, &widths)?;
        for row in &cells {
            for (cell, width) in row.iter().zip(&widths) {
                write!(f, "| {cell:<width$} ")?;
            }
            writeln!(f, "|")?;
        }
        if !cells.is_empty() {
            write_divider(f, &widths)?;
        }
        write!(f, "{} row(s)", cells.len())
    }
}

fn write_divider(f: &mut fmt::Formatter<'_>, widths: &[usize]) -> fmt::Result {
    for width in widths {
        write!(f, "+{}", "-".repeat(width + 2))?;
    }
    writeln!(f, "+")
}
