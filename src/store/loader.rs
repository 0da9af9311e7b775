// Named-query file scanner
//
// File format:
//
//   -- name: find_user
//   SELECT * FROM users
//   WHERE id = :id;
//
//   -- name: list_users
//   SELECT * FROM users
//
// A query body runs from the line after its marker to the next marker or EOF.

use crate::query::normalize::normalize;
use once_cell::sync::Lazy;
use regex::Regex;

/// `-- name: <token>` at the start of a line, case-sensitive
static MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^--[ \t]*name:[ \t]*(\S+)[ \t]*\r?(?:\n|\z)").expect("valid regex")
});

/// Split file content into `(name, normalized body)` pairs, in file order
///
/// Text before the first marker is ignored. Names are not deduplicated here;
/// the caller decides what a repeated name means.
pub fn parse_named_queries(content: &str) -> Vec<(String, String)> {
    let markers: Vec<_> = MARKER.captures_iter(content).collect();

    markers
        .iter()
        .enumerate()
        .map(|(i, caps)| {
            let body_start = caps.get(0).map_or(0, |m| m.end());
            let body_end = markers
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map_or(content.len(), |m| m.start());
            (caps[1].to_string(), normalize(&content[body_start..body_end]))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_multiple_queries() {
        let content = "-- name: test_query\n\
                       SELECT id, name, email FROM users WHERE status = :status;\n\n\
                       -- name: test_query_with_numbers\n\
                       SELECT id, name, age\n  FROM users\n  WHERE id = :id AND age > :age;\n\n\
                       -- name: test_query_with_special_chars\n\
                       SELECT id, name FROM users WHERE name = :name;";

        let queries = parse_named_queries(content);
        assert_eq!(queries.len(), 3);
        assert_eq!(
            queries[0],
            (
                "test_query".to_string(),
                "SELECT id, name, email FROM users WHERE status = :status".to_string()
            )
        );
        assert_eq!(queries[1].0, "test_query_with_numbers");
        assert_eq!(
            queries[1].1,
            "SELECT id, name, age FROM users WHERE id = :id AND age > :age"
        );
        assert_eq!(queries[2].1, "SELECT id, name FROM users WHERE name = :name");
    }

    #[test]
    fn test_marker_spacing_variants() {
        let content = "--name:a\nSELECT 1\n--   name:\tb   \nSELECT 2\n-- name:c\r\nSELECT 3\r\n";
        let queries = parse_named_queries(content);
        let names: Vec<_> = queries.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(queries[2].1, "SELECT 3");
    }

    #[test]
    fn test_marker_is_case_sensitive() {
        let content = "-- name: a\nSELECT 1\n-- NAME: b\nSELECT 2";
        let queries = parse_named_queries(content);
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].1, "SELECT 1 -- NAME: b SELECT 2");
    }

    #[test]
    fn test_preamble_and_plain_comments_are_ignored() {
        let content = "-- queries for the users table\n\n-- name: a\nSELECT 1";
        let queries = parse_named_queries(content);
        assert_eq!(queries, vec![("a".to_string(), "SELECT 1".to_string())]);
    }

    #[test]
    fn test_marker_must_start_line() {
        let content = "-- name: a\nSELECT 1 -- name: b\n";
        let queries = parse_named_queries(content);
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].1, "SELECT 1 -- name: b");
    }

    #[test]
    fn test_marker_at_eof_has_empty_body() {
        let queries = parse_named_queries("-- name: a\nSELECT 1\n-- name: empty");
        assert_eq!(queries[1], ("empty".to_string(), String::new()));
    }

    #[test]
    fn test_no_markers() {
        assert!(parse_named_queries("SELECT 1;").is_empty());
        assert!(parse_named_queries("").is_empty());
    }
}
