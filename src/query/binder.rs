// Parameter binder
// Replaces :name placeholders with SQL literals

use crate::config::BindMode;
use crate::error::{QueryError, Result};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Deserialize;
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;

/// Character that introduces a placeholder
pub const PLACEHOLDER_MARKER: char = ':';

/// Identifier-shaped placeholders
/// Matches preceded by ':' are casts (`x::int`) and are skipped by the caller
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":([A-Za-z_][A-Za-z0-9_]*)").expect("valid regex"));

/// Parameter names mapped to their values, in insertion order
pub type ParameterMap = IndexMap<String, ParamValue>;

/// A value that can be bound to a placeholder
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Integer(i64),
    /// Integers above `i64::MAX`
    Unsigned(u64),
    Float(f64),
    Text(String),
}

impl ParamValue {
    /// Render the value as a SQL literal
    /// Text is single-quoted with embedded quotes doubled; numbers are bare
    pub fn to_sql_literal(&self) -> String {
        match self {
            ParamValue::Text(s) => format!("'{}'", s.replace('\'', "''")),
            ParamValue::Integer(i) => i.to_string(),
            ParamValue::Unsigned(u) => u.to_string(),
            ParamValue::Float(f) => f.to_string(),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql_literal())
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(impl From<$t> for ParamValue {
            fn from(value: $t) -> Self {
                ParamValue::Integer(i64::from(value))
            }
        })*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or(ParamValue::Unsigned(value), ParamValue::Integer)
    }
}

impl From<f32> for ParamValue {
    fn from(value: f32) -> Self {
        ParamValue::Float(f64::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

/// Substitute every `:name` token in `sql` with the literal for `name`
///
/// Matching is plain substring matching on the exact token, so `:id` also
/// matches the start of `:identity`. All tokens are replaced in a single scan
/// of the original text; inserted values are never scanned again. When two
/// tokens start at the same position the longer one wins.
///
/// ```
/// use querykit::{bind_params, ParameterMap};
///
/// let mut params = ParameterMap::new();
/// params.insert("name".to_string(), "O'Connor".into());
/// let sql = bind_params("SELECT * FROM users WHERE name = :name", &params);
/// assert_eq!(sql, "SELECT * FROM users WHERE name = 'O''Connor'");
/// ```
pub fn bind_params<'a>(sql: &'a str, params: &ParameterMap) -> Cow<'a, str> {
    let mut names: Vec<&str> = params
        .keys()
        .map(String::as_str)
        .filter(|name| {
            if name.is_empty() {
                tracing::warn!("ignoring parameter with an empty name");
            }
            !name.is_empty()
        })
        .collect();

    if names.is_empty() {
        return Cow::Borrowed(sql);
    }

    // Regex alternation is leftmost-first, so longer names must come first
    names.sort_by(|a, b| b.len().cmp(&a.len()));
    let pattern = names
        .iter()
        .map(|name| format!("{}{}", PLACEHOLDER_MARKER, regex::escape(name)))
        .collect::<Vec<_>>()
        .join("|");
    let tokens = match Regex::new(&pattern) {
        Ok(re) => re,
        // Escaped literals always compile; an oversized pattern is the only way here
        Err(e) => {
            tracing::warn!(error = %e, "placeholder pattern rejected, binding one token at a time");
            return Cow::Owned(bind_sequential(sql, params));
        }
    };

    tokens.replace_all(sql, |caps: &Captures| {
        let name = &caps[0][PLACEHOLDER_MARKER.len_utf8()..];
        params
            .get(name)
            .map(ParamValue::to_sql_literal)
            .unwrap_or_else(|| caps[0].to_string())
    })
}

/// Fallback for pattern-size limits: walks the text once, trying names longest first
fn bind_sequential(sql: &str, params: &ParameterMap) -> String {
    let mut names: Vec<(&String, &ParamValue)> =
        params.iter().filter(|(name, _)| !name.is_empty()).collect();
    names.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let mut out = String::with_capacity(sql.len());
    let mut rest = sql;
    while let Some(pos) = rest.find(PLACEHOLDER_MARKER) {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + PLACEHOLDER_MARKER.len_utf8()..];
        match names.iter().find(|(name, _)| after.starts_with(name.as_str())) {
            Some((name, value)) => {
                out.push_str(&value.to_sql_literal());
                rest = &after[name.len()..];
            }
            None => {
                out.push(PLACEHOLDER_MARKER);
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Binds parameters according to a BindMode
#[derive(Debug, Clone, Copy, Default)]
pub struct Binder {
    mode: BindMode,
}

impl Binder {
    pub fn new(mode: BindMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> BindMode {
        self.mode
    }

    /// Bind `params` into `sql`
    ///
    /// Lenient mode never fails. Strict mode rejects parameters that have no
    /// placeholder and placeholders (outside `::` casts) that have no parameter.
    pub fn bind<'a>(&self, sql: &'a str, params: &ParameterMap) -> Result<Cow<'a, str>> {
        if self.mode == BindMode::Strict {
            Self::check_strict(sql, params)?;
        }
        Ok(bind_params(sql, params))
    }

    fn check_strict(sql: &str, params: &ParameterMap) -> Result<()> {
        for name in params.keys() {
            let token = format!("{}{}", PLACEHOLDER_MARKER, name);
            if name.is_empty() || !sql.contains(&token) {
                tracing::warn!(parameter = %name, "strict binding: unused parameter");
                return Err(QueryError::UnusedParameter(name.clone()));
            }
        }

        let supplied: HashSet<&str> = params.keys().map(String::as_str).collect();
        for caps in PLACEHOLDER.captures_iter(sql) {
            let start = caps.get(0).map_or(0, |m| m.start());
            if sql[..start].ends_with(PLACEHOLDER_MARKER) {
                continue;
            }
            let name = &caps[1];
            if !supplied.contains(name) {
                tracing::warn!(placeholder = %name, "strict binding: unresolved placeholder");
                return Err(QueryError::UnresolvedPlaceholder(name.to_string()));
            }
        }

        Ok(())
    }
}
