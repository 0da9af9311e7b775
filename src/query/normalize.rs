// Query normalization
// Cached query bodies are stored on a single line without a trailing terminator

/// Collapse whitespace and strip one trailing statement terminator
///
/// Every run of whitespace (spaces, tabs, newlines) becomes a single space and
/// the result is trimmed. A final `;` is removed together with the whitespace
/// in front of it, unless it sits inside an unterminated single-quoted literal.
///
/// ```
/// use querykit::normalize;
///
/// assert_eq!(normalize("SELECT *\n  FROM users;\n"), "SELECT * FROM users");
/// ```
pub fn normalize(sql: &str) -> String {
    if sql.is_empty() {
        return String::new();
    }

    let collapsed = sql.split_whitespace().collect::<Vec<_>>().join(" ");

    match collapsed.strip_suffix(';') {
        Some(body) if !inside_literal(body) => body.trim_end().to_string(),
        _ => collapsed,
    }
}

/// True when `prefix` leaves a single-quoted literal open
/// Doubled quotes ('') keep the parity unchanged, so they need no special case
fn inside_literal(prefix: &str) -> bool {
    prefix.bytes().filter(|&b| b == b'\'').count() % 2 == 1
}
