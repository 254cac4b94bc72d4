//! Search query handling.

/// Build an `ILIKE` pattern matching `query` as a literal substring.
///
/// Returns `None` for an empty or all-whitespace query, which callers treat
/// as "no filter". `\`, `%` and `_` are escaped with PostgreSQL's default
/// `LIKE` escape character.
pub fn substring_pattern(query: &str) -> Option<String> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }

    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for ch in query.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    Some(pattern)
}
