//! Database catalog.
//!
//! The catalog owns every database and remembers which one is selected.
//! Names are case-sensitive and listed in creation order.

use crate::error::{EngineError, Result};
use crate::schema::Column;
use crate::table::Table;

/// A named collection of tables.
#[derive(Clone, Debug)]
pub struct Database {
    pub name: String,
    tables: Vec<Table>,
}

impl Database {
    fn new(name: &str) -> Self {
        Database {
            name: name.to_string(),
            tables: Vec::new(),
        }
    }

    pub fn table_names(&self) -> Vec<String> {
        self.tables.iter().map(|t| t.name.clone()).collect()
    }

    pub fn table(&self, name: &str) -> Result<&Table> {
        self.tables
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| EngineError::TableNotFound(name.to_string()))
    }

    pub fn table_mut(&mut self, name: &str) -> Result<&mut Table> {
        self.tables
            .iter_mut()
            .find(|t| t.name == name)
            .ok_or_else(|| EngineError::TableNotFound(name.to_string()))
    }

    pub fn create_table(&mut self, name: &str, columns: Vec<Column>) -> Result<()> {
        if self.tables.iter().any(|t| t.name == name) {
            return Err(EngineError::TableExists(name.to_string()));
        }
        self.tables.push(Table::new(name, columns)?);
        Ok(())
    }

    pub fn drop_table(&mut self, name: &str) -> Result<()> {
        let idx = self
            .tables
            .iter()
            .position(|t| t.name == name)
            .ok_or_else(|| EngineError::TableNotFound(name.to_string()))?;
        self.tables.remove(idx);
        Ok(())
    }
}

/// Every database known to the engine plus the current selection.
///
/// The selection always names an existing database; dropping the selected
/// database clears it.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    databases: Vec<Database>,
    current: Option<String>,
}

impl Catalog {
    pub fn new() -> Self {
        Catalog::default()
    }

    pub fn database_names(&self) -> Vec<String> {
        self.databases.iter().map(|d| d.name.clone()).collect()
    }

    /// Name of the selected database, if any.
    pub fn current_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn create_database(&mut self, name: &str) -> Result<()> {
        if self.databases.iter().any(|d| d.name == name) {
            return Err(EngineError::DatabaseExists(name.to_string()));
        }
        self.databases.push(Database::new(name));
        Ok(())
    }

    pub fn drop_database(&mut self, name: &str) -> Result<()> {
        let idx = self
            .databases
            .iter()
            .position(|d| d.name == name)
            .ok_or_else(|| EngineError::DatabaseNotFound(name.to_string()))?;
        self.databases.remove(idx);
        if self.current.as_deref() == Some(name) {
            self.current = None;
        }
        Ok(())
    }

    pub fn use_database(&mut self, name: &str) -> Result<()> {
        if !self.databases.iter().any(|d| d.name == name) {
            return Err(EngineError::DatabaseNotFound(name.to_string()));
        }
        self.current = Some(name.to_string());
        Ok(())
    }

    /// The selected database, or an error if none is selected.
    pub fn current(&self) -> Result<&Database> {
        let name = self
            .current
            .as_deref()
            .ok_or(EngineError::NoDatabaseSelected)?;
        self.databases
            .iter()
            .find(|d| d.name == name)
            .ok_or(EngineError::NoDatabaseSelected)
    }

    pub fn current_mut(&mut self) -> Result<&mut Database> {
        let name = self
            .current
            .clone()
            .ok_or(EngineError::NoDatabaseSelected)?;
        self.databases
            .iter_mut()
            .find(|d| d.name == name)
            .ok_or(EngineError::NoDatabaseSelected)
    }
}
