//! SqlSim - an in-memory SQL database simulator.
//!
//! A self-contained engine for a restricted SQL dialect: multiple named
//! databases live in memory, statements run against the selected one, and
//! every execution returns the same result envelope whether it produced
//! rows, a status message, or an error.
//!
//! # Features
//!
//! - Multi-database catalog with CREATE/DROP/USE and SHOW introspection
//! - Tables with typed columns, DESCRIBE, and ALTER TABLE ADD COLUMN
//! - SELECT with WHERE, equi-JOIN, GROUP BY, HAVING, ORDER BY and LIMIT
//! - COUNT, SUM, AVG, MIN, MAX aggregates
//! - Uniform result envelope, serializable with serde
//! - Bounded query history, newest first
//! - Optional demo databases for instant experimentation
//!
//! # SQL Syntax
//!
//! ```sql
//! CREATE DATABASE shop;
//! USE shop;
//!
//! CREATE TABLE items (
//!     id INT PRIMARY KEY,
//!     name VARCHAR(100) NOT NULL,
//!     price INT,
//!     added DATE
//! );
//!
//! INSERT INTO items VALUES (1, 'Desk Lamp', 45, '2024-01-15');
//!
//! SELECT category, COUNT(*) AS n, AVG(price) AS avg_price
//! FROM items
//! WHERE price > 10
//! GROUP BY category
//! HAVING n > 2
//! ORDER BY avg_price DESC
//! LIMIT 5;
//!
//! UPDATE items SET price = 39 WHERE id = 1;
//! DELETE FROM items WHERE price < 5;
//! ```
//!
//! # Example
//!
//! ```rust
//! use sqlsim::Engine;
//!
//! // Demo data: employee_db is selected and filled.
//! let mut engine = Engine::with_sample_data();
//!
//! let result = engine.execute_query(
//!     "SELECT name, salary FROM employees WHERE salary >= 90000 ORDER BY salary DESC",
//! );
//! assert!(result.success);
//! assert_eq!(result.columns, vec!["name", "salary"]);
//! println!("{}", result);
//! ```

pub mod catalog;
pub mod clause;
pub mod condition;
pub mod engine;
pub mod error;
pub mod executor;
pub mod history;
pub mod parser;
pub mod sample;
pub mod schema;
pub mod table;
pub mod value;

// Re-exports for convenience
pub use catalog::{Catalog, Database};
pub use clause::{AggFunc, OrderSpec, SelectColumn};
pub use condition::{CompareOp, Condition};
pub use engine::{Engine, QueryResult, TableSchema};
pub use error::{EngineError, Result};
pub use history::{HISTORY_CAPACITY, HistoryEntry, QueryHistory};
pub use parser::{JoinClause, SelectStatement, Statement, parse};
pub use schema::{Column, ResultRow, Row, RowId};
pub use table::Table;
pub use value::Value;
