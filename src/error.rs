use thiserror::Error;

/// Errors raised while parsing or executing a statement.
///
/// Every variant's display string is exactly what the result envelope
/// reports to the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Empty SQL command")]
    EmptyQuery,

    #[error("Invalid {0} syntax")]
    Syntax(String),

    #[error("Invalid database command")]
    InvalidDatabaseCommand,

    #[error("Invalid JOIN condition")]
    InvalidJoinCondition,

    #[error("Unsupported ALTER TABLE operation")]
    UnsupportedAlterOperation,

    #[error("Subqueries are not supported")]
    SubqueryUnsupported,

    #[error("No database selected. Use \"USE database_name\" first.")]
    NoDatabaseSelected,

    #[error("Database '{0}' already exists")]
    DatabaseExists(String),

    #[error("Database '{0}' does not exist")]
    DatabaseNotFound(String),

    #[error("Table '{0}' already exists")]
    TableExists(String),

    #[error("Table '{0}' does not exist")]
    TableNotFound(String),

    #[error("Column '{0}' already exists")]
    ColumnExists(String),

    #[error("Column '{0}' does not exist")]
    ColumnNotFound(String),

    #[error("Column count doesn't match. Expected {expected}, got {got}")]
    ColumnCountMismatch { expected: usize, got: usize },

    #[error("Column '{0}' cannot be NULL")]
    NullViolation(String),

    #[error("Cannot convert '{value}' to {data_type}")]
    TypeConversion { value: String, data_type: String },

    #[error("Unsupported SQL command: {0}")]
    Unsupported(String),
}

impl EngineError {
    /// Shorthand for the `Invalid <construct> syntax` family.
    pub fn syntax(construct: &str) -> Self {
        EngineError::Syntax(construct.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
