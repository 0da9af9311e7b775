// Store configuration
// Everything here has a default, so an empty JSON object is a valid config

use crate::error::Result;
use serde::Deserialize;
use sqlparser::dialect::{
    AnsiDialect, Dialect, GenericDialect, MsSqlDialect, MySqlDialect, PostgreSqlDialect,
    SQLiteDialect,
};

/// SQL dialect handed to the parser when editing statements
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    #[default]
    Generic,
    Ansi,
    Postgres,
    Mysql,
    Sqlite,
    Mssql,
}

impl SqlDialect {
    /// Build the sqlparser dialect for this variant
    pub fn to_dialect(self) -> Box<dyn Dialect> {
        match self {
            SqlDialect::Generic => Box::new(GenericDialect {}),
            SqlDialect::Ansi => Box::new(AnsiDialect {}),
            SqlDialect::Postgres => Box::new(PostgreSqlDialect {}),
            SqlDialect::Mysql => Box::new(MySqlDialect {}),
            SqlDialect::Sqlite => Box::new(SQLiteDialect {}),
            SqlDialect::Mssql => Box::new(MsSqlDialect {}),
        }
    }
}

/// How strictly placeholders are checked during binding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindMode {
    /// Unused parameters and leftover placeholders are ignored
    #[default]
    Lenient,
    /// Unused parameters and leftover placeholders are errors
    Strict,
}

/// Configuration for a QueryStore
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub dialect: SqlDialect,
    pub bind_mode: BindMode,
}

impl StoreConfig {
    /// Parse a configuration from JSON
    ///
    /// ```
    /// use querykit::{BindMode, SqlDialect, StoreConfig};
    ///
    /// let config = StoreConfig::from_json(r#"{"dialect": "postgres"}"#).unwrap();
    /// assert_eq!(config.dialect, SqlDialect::Postgres);
    /// assert_eq!(config.bind_mode, BindMode::Lenient);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
