// Query store
// Loads named-query files and caches their queries by file path

pub mod loader;

use crate::config::StoreConfig;
use crate::error::{QueryError, Result};
use crate::query::binder::{Binder, ParamValue, ParameterMap};
use crate::query::editor::StatementEditor;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;

pub use loader::parse_named_queries;

/// The queries of one file: name -> normalized SQL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySet {
    queries: HashMap<String, String>,
}

impl QuerySet {
    /// Build a QuerySet from file content
    /// A name that appears twice keeps its last body
    pub fn parse(content: &str) -> Self {
        Self {
            queries: parse_named_queries(content).into_iter().collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.queries.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.queries.contains_key(name)
    }

    /// Query names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.queries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

/// Caches named queries per file and serves them by name
///
/// `load` makes a file the active one; name lookups always go to the active
/// file. Files loaded earlier stay cached when another file becomes active.
///
/// To share a store between threads, wrap it in a `RwLock`: `load` needs
/// `&mut self`, so readers never see a half-built QuerySet.
#[derive(Debug, Default)]
pub struct QueryStore {
    /// Cached queries, keyed by the path they were loaded from
    files: HashMap<String, QuerySet>,
    /// Path used by name lookups
    active: Option<String>,
    /// File contents compiled into the program, checked before the filesystem
    embedded: HashMap<String, Cow<'static, str>>,
    binder: Binder,
    editor: StatementEditor,
}

impl QueryStore {
    /// Create an empty store with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            binder: Binder::new(config.bind_mode),
            editor: StatementEditor::new(config.dialect),
            ..Self::default()
        }
    }

    /// Register file content under `path`
    ///
    /// `load(path)` will use this content instead of reading the filesystem.
    ///
    /// ```
    /// use querykit::QueryStore;
    ///
    /// let mut store = QueryStore::new();
    /// store.embed("queries/users.sql", "-- name: all_users\nSELECT * FROM users;");
    /// store.load("queries/users.sql").unwrap();
    /// assert_eq!(store.get("all_users").unwrap(), "SELECT * FROM users");
    /// ```
    pub fn embed(&mut self, path: impl Into<String>, content: impl Into<Cow<'static, str>>) {
        self.embedded.insert(path.into(), content.into());
    }

    /// Load a named-query file and make it the active file
    ///
    /// Embedded content registered for `path` wins over the filesystem.
    /// The file's previous QuerySet, if any, is replaced as a whole.
    /// On error the cache and the active file are left unchanged.
    ///
    /// Returns the number of queries loaded.
    pub fn load(&mut self, path: &str) -> Result<usize> {
        let (queries, source) = match self.embedded.get(path) {
            Some(content) => (QuerySet::parse(content), "embedded"),
            None => {
                let content = fs::read_to_string(path).map_err(|e| {
                    tracing::warn!(path, error = %e, "failed to read query file");
                    QueryError::Load {
                        path: path.to_string(),
                        source: e,
                    }
                })?;
                (QuerySet::parse(&content), "filesystem")
            }
        };

        let count = queries.len();
        for name in queries.names() {
            tracing::debug!(path, name, "cached query");
        }
        self.files.insert(path.to_string(), queries);
        self.active = Some(path.to_string());

        tracing::info!(path, count, source, "loaded query file");
        Ok(count)
    }

    /// Stop using the active file; cached queries are kept
    pub fn clear_active(&mut self) {
        if let Some(path) = self.active.take() {
            tracing::info!(path = %path, "cleared active query file");
        }
    }

    pub fn active_path(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Cached queries for any previously loaded path
    pub fn query_set(&self, path: &str) -> Option<&QuerySet> {
        self.files.get(path)
    }

    /// Get a query from the active file by name
    pub fn get(&self, name: &str) -> Result<&str> {
        let path = self.active.as_deref().ok_or(QueryError::NoActiveFile)?;

        self.files
            .get(path)
            .and_then(|queries| queries.get(name))
            .ok_or_else(|| QueryError::NotFound {
                name: name.to_string(),
                path: path.to_string(),
            })
    }

    /// Get a query by name, or treat the input as SQL if no such query exists
    ///
    /// Still fails with `NoActiveFile` when nothing has been loaded.
    pub fn get_or_text<'a>(&'a self, name_or_text: &'a str) -> Result<&'a str> {
        match self.get(name_or_text) {
            Err(QueryError::NotFound { .. }) => Ok(name_or_text),
            other => other,
        }
    }

    /// Look up a query (by name or as literal SQL) and bind `params` into it
    pub fn query(&self, name_or_text: &str, params: &ParameterMap) -> Result<String> {
        let sql = self.get_or_text(name_or_text)?;
        Ok(self.binder.bind(sql, params)?.into_owned())
    }

    /// Named query with its SELECT columns replaced
    pub fn select_columns<S: AsRef<str>>(&self, name: &str, columns: &[S]) -> Result<String> {
        let sql = self.get(name)?;
        Ok(self.editor.replace_columns(sql, columns)?.into_owned())
    }

    /// Named query with its WHERE clause replaced by equality conditions
    pub fn where_conditions<'c, I>(&self, name: &str, conditions: I) -> Result<String>
    where
        I: IntoIterator<Item = (&'c String, &'c ParamValue)>,
    {
        let sql = self.get(name)?;
        Ok(self.editor.replace_where(sql, conditions)?.into_owned())
    }

    pub fn binder(&self) -> &Binder {
        &self.binder
    }

    pub fn editor(&self) -> &StatementEditor {
        &self.editor
    }
}
