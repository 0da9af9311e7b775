// querykit - named SQL queries loaded from files
// This is the library root that exposes the public API

pub mod config;
pub mod error;
pub mod query;
pub mod store;

// Re-export commonly used types for convenience
pub use config::{BindMode, SqlDialect, StoreConfig};
pub use error::{QueryError, Result};
pub use query::{bind_params, normalize, Binder, ParamValue, ParameterMap, StatementEditor};
pub use store::{QuerySet, QueryStore};
