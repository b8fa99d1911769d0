//! Formatters for numbers and labels.

/// Format a number with thousands separators.
///
/// # Examples
///
/// ```text
/// format_thousands(1234567) == "1,234,567"
/// ```
pub fn format_thousands(n: u64) -> String {
    let s = n.to_string();
    let len = s.len();
    let mut result = String::with_capacity(len + len / 3);

    for (i, c) in s.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result
}

/// Format a score or length with four decimals.
pub fn format_score(value: f32) -> String {
    format!("{:.4}", value)
}

/// Truncate to at most `max_len` characters, ending with `...` when cut.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        return ".".repeat(max_len);
    }
    let kept: String = s.chars().take(max_len - 3).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(6.7716), "6.7716");
        assert_eq!(format_score(0.0), "0.0000");
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("short.txt", 20), "short.txt");
        assert_eq!(truncate_str("docs/very/long/path.md", 10), "docs/ve...");
        assert_eq!(truncate_str("abcdef", 2), "..");
        assert_eq!(truncate_str("größenordnung", 6), "grö...");
    }
}
