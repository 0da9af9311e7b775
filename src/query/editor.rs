// Statement editor
// Rewrites the column list and WHERE clause of a SELECT
// We use the sqlparser crate to parse and re-render the statement

use super::binder::ParamValue;
use crate::config::SqlDialect;
use crate::error::{QueryError, Result};
use sqlparser::ast::{BinaryOperator, Expr, Ident, Select, SelectItem, SetExpr, Statement, Value};
use sqlparser::parser::Parser;
use std::borrow::Cow;

/// Edits SELECT statements through the sqlparser AST
#[derive(Debug, Clone, Copy, Default)]
pub struct StatementEditor {
    dialect: SqlDialect,
}

impl StatementEditor {
    pub fn new(dialect: SqlDialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> SqlDialect {
        self.dialect
    }

    /// Replace the projected columns of a SELECT
    ///
    /// An empty column list returns `sql` untouched without parsing it.
    /// Each column becomes a bare identifier; aliases and expressions are not supported.
    pub fn replace_columns<'a, S: AsRef<str>>(
        &self,
        sql: &'a str,
        columns: &[S],
    ) -> Result<Cow<'a, str>> {
        if columns.is_empty() {
            return Ok(Cow::Borrowed(sql));
        }

        let mut statement = self.parse(sql)?;
        let select = Self::select_mut(&mut statement)?;
        select.projection = columns
            .iter()
            .map(|c| {
                let column: &str = c.as_ref();
                SelectItem::UnnamedExpr(Expr::Identifier(Ident::new(column)))
            })
            .collect();

        tracing::debug!(columns = columns.len(), "replaced SELECT columns");
        Ok(Cow::Owned(statement.to_string()))
    }

    /// Replace the WHERE clause of a SELECT with `col = value AND ...`
    ///
    /// Conditions are joined left to right in iteration order and any existing
    /// WHERE is discarded. An empty iterator returns `sql` untouched without parsing it.
    pub fn replace_where<'a, 'c, I>(&self, sql: &'a str, conditions: I) -> Result<Cow<'a, str>>
    where
        I: IntoIterator<Item = (&'c String, &'c ParamValue)>,
    {
        let Some(selection) = conjunction(conditions) else {
            return Ok(Cow::Borrowed(sql));
        };

        let mut statement = self.parse(sql)?;
        let select = Self::select_mut(&mut statement)?;
        select.selection = Some(selection);

        tracing::debug!("replaced WHERE clause");
        Ok(Cow::Owned(statement.to_string()))
    }

    /// Parse exactly one statement
    fn parse(&self, sql: &str) -> Result<Statement> {
        let dialect = self.dialect.to_dialect();
        let mut ast = Parser::parse_sql(dialect.as_ref(), sql)?;

        // We only edit single statements
        if ast.len() != 1 {
            return Err(QueryError::NotASelect);
        }
        Ok(ast.remove(0))
    }

    /// Get the plain SELECT body of a statement
    /// Set operations (UNION etc.) and VALUES lists are rejected
    fn select_mut(statement: &mut Statement) -> Result<&mut Select> {
        match statement {
            Statement::Query(query) => match query.body.as_mut() {
                SetExpr::Select(select) => Ok(select.as_mut()),
                _ => Err(QueryError::NotASelect),
            },
            _ => Err(QueryError::NotASelect),
        }
    }
}

/// Build `c1 = v1 AND c2 = v2 ...` (left-deep), or None when there are no conditions
pub(crate) fn conjunction<'c, I>(conditions: I) -> Option<Expr>
where
    I: IntoIterator<Item = (&'c String, &'c ParamValue)>,
{
    conditions
        .into_iter()
        .map(|(column, value)| Expr::BinaryOp {
            left: Box::new(Expr::Identifier(Ident::new(column.as_str()))),
            op: BinaryOperator::Eq,
            right: Box::new(Expr::Value(literal(value))),
        })
        .reduce(|acc, eq| Expr::BinaryOp {
            left: Box::new(acc),
            op: BinaryOperator::And,
            right: Box::new(eq),
        })
}

fn literal(value: &ParamValue) -> Value {
    match value {
        ParamValue::Text(s) => Value::SingleQuotedString(s.clone()),
        ParamValue::Integer(i) => Value::Number(i.to_string(), false),
        ParamValue::Unsigned(u) => Value::Number(u.to_string(), false),
        ParamValue::Float(f) => Value::Number(f.to_string(), false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::binder::ParameterMap;

    fn conditions(pairs: &[(&str, ParamValue)]) -> ParameterMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_replace_columns() {
        let editor = StatementEditor::default();
        let sql = editor
            .replace_columns(
                "SELECT id, name, email FROM users WHERE status = 'active'",
                &["id", "username", "last_login_date"],
            )
            .unwrap();

        assert!(sql.contains("SELECT id, username, last_login_date"));
        assert!(sql.contains("FROM users"));
        assert!(sql.contains("WHERE status = 'active'"));
    }

    #[test]
    fn test_empty_columns_skip_parsing() {
        let editor = StatementEditor::default();
        // Not valid SQL, but never parsed
        let sql = "definitely not sql";
        let out = editor.replace_columns::<&str>(sql, &[]).unwrap();
        assert!(matches!(out, Cow::Borrowed(s) if std::ptr::eq(s, sql)));
    }

    #[test]
    fn test_replace_where_with_mixed_values() {
        let editor = StatementEditor::default();
        let conds = conditions(&[("status", "active".into()), ("department_id", 5.into())]);
        let sql = editor
            .replace_where("SELECT id, name, email FROM users", &conds)
            .unwrap();

        assert_eq!(
            sql,
            "SELECT id, name, email FROM users WHERE status = 'active' AND department_id = 5"
        );
    }

    #[test]
    fn test_replace_where_discards_existing_clause() {
        let editor = StatementEditor::default();
        let conds = conditions(&[("age", 30.into())]);
        let sql = editor
            .replace_where("SELECT * FROM users WHERE status = 'inactive'", &conds)
            .unwrap();

        assert_eq!(sql, "SELECT * FROM users WHERE age = 30");
    }

    #[test]
    fn test_replace_where_quotes_text() {
        let editor = StatementEditor::default();
        let conds = conditions(&[("name", "O'Connor".into())]);
        let sql = editor.replace_where("SELECT * FROM users", &conds).unwrap();
        assert_eq!(sql, "SELECT * FROM users WHERE name = 'O''Connor'");
    }

    #[test]
    fn test_empty_conditions_skip_parsing() {
        let editor = StatementEditor::default();
        let sql = "definitely not sql";
        let out = editor.replace_where(sql, &ParameterMap::new()).unwrap();
        assert!(matches!(out, Cow::Borrowed(s) if std::ptr::eq(s, sql)));
    }

    #[test]
    fn test_where_round_trip() {
        let editor = StatementEditor::default();
        let conds = conditions(&[("a", 1.into()), ("b", "x".into()), ("c", 2.5.into())]);
        let sql = editor.replace_where("SELECT a, b FROM t", &conds).unwrap();

        let mut reparsed = editor.parse(&sql).unwrap();
        let select = StatementEditor::select_mut(&mut reparsed).unwrap();
        assert_eq!(select.selection, conjunction(&conds));
    }

    #[test]
    fn test_non_select_is_rejected() {
        let editor = StatementEditor::default();
        let conds = conditions(&[("id", 1.into())]);

        let err = editor
            .replace_where("DELETE FROM users WHERE id = 2", &conds)
            .unwrap_err();
        assert!(matches!(err, QueryError::NotASelect));

        let err = editor
            .replace_columns("SELECT a FROM t UNION SELECT a FROM u", &["a"])
            .unwrap_err();
        assert!(matches!(err, QueryError::NotASelect));

        let err = editor
            .replace_columns("SELECT a FROM t; SELECT b FROM u", &["a"])
            .unwrap_err();
        assert!(matches!(err, QueryError::NotASelect));
    }

    #[test]
    fn test_empty_sql_is_not_a_select() {
        let editor = StatementEditor::default();
        let conds = conditions(&[("id", 1.into())]);

        let err = editor.replace_columns("", &["id"]).unwrap_err();
        assert!(matches!(err, QueryError::NotASelect));

        let err = editor.replace_where("", &conds).unwrap_err();
        assert!(matches!(err, QueryError::NotASelect));
    }

    #[test]
    fn test_invalid_sql_is_a_parse_error() {
        let editor = StatementEditor::default();
        let err = editor.replace_columns("SELEC id FROM", &["id"]).unwrap_err();
        assert!(matches!(err, QueryError::Parse(_)));
    }

    #[test]
    fn test_dialect_is_used() {
        let editor = StatementEditor::new(SqlDialect::Mysql);
        let sql = editor
            .replace_columns("SELECT `id` FROM `users`", &["email"])
            .unwrap();
        assert_eq!(sql, "SELECT email FROM `users`");
    }
}
