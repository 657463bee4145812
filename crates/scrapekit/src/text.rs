//! Text normalization helpers

/// Collapse whitespace runs to a single space and trim
///
/// Newlines, tabs and non-breaking spaces all count as whitespace, so a
/// multi-line cell becomes a single line.
pub fn normalize_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut last_was_space = true;

    for c in s.chars() {
        if c.is_whitespace() {
            if !last_was_space {
                result.push(' ');
                last_was_space = true;
            }
        } else {
            result.push(c);
            last_was_space = false;
        }
    }

    if result.ends_with(' ') {
        result.pop();
    }
    result
}

/// Case-insensitive substring match
///
/// Lowercases both sides and nothing else: no accent folding and no
/// whitespace changes beyond what extraction already did.
pub fn contains_keyword(value: &str, keyword: &str) -> bool {
    value.to_lowercase().contains(&keyword.to_lowercase())
}

/// Length in characters
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// First `n` characters of `s`
pub fn take_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  hello   world  "), "hello world");
        assert_eq!(normalize_whitespace("line1\n\n  line2\t"), "line1 line2");
        assert_eq!(normalize_whitespace("a\u{a0}b"), "a b");
        assert_eq!(normalize_whitespace(" \n\t "), "");
        assert_eq!(normalize_whitespace(""), "");
    }

    #[test]
    fn test_contains_keyword() {
        assert!(contains_keyword("Song One", "song"));
        assert!(contains_keyword("SONG", "Song"));
        assert!(contains_keyword("Любимая Песня", "песня"));
        assert!(!contains_keyword("Other", "song"));
        assert!(!contains_keyword("Café", "cafe"));
    }

    #[test]
    fn test_char_len_counts_chars() {
        assert_eq!(char_len("abc"), 3);
        assert_eq!(char_len("Привет"), 6);
    }

    #[test]
    fn test_take_chars() {
        assert_eq!(take_chars("Привет", 3), "При");
        assert_eq!(take_chars("abc", 10), "abc");
        assert_eq!(take_chars("abc", 0), "");
    }
}
