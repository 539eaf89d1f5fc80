// Mask-aware string helpers shared by the phone and email analyzers.

/// Position-aware wildcard comparison.
///
/// Both strings must have the same length in characters. A `*` on either
/// side matches any character; every other pair must be equal ignoring
/// ASCII case.
pub fn wildcard_match(masked: &str, signature: &str) -> bool {
    if masked.chars().count() != signature.chars().count() {
        return false;
    }
    masked
        .chars()
        .zip(signature.chars())
        .all(|(m, s)| m == '*' || s == '*' || m.eq_ignore_ascii_case(&s))
}

/// Number of `*` characters in `text`.
pub fn mask_count(text: &str) -> usize {
    text.chars().filter(|c| *c == '*').count()
}

/// Length of the longest run of consecutive `*` characters.
pub fn longest_mask_run(text: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in text.chars() {
        if c == '*' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// First character if it is not masked.
pub fn leading_visible(text: &str) -> Option<char> {
    text.chars().next().filter(|c| *c != '*')
}

/// Last character if it is not masked.
pub fn trailing_visible(text: &str) -> Option<char> {
    text.chars().last().filter(|c| *c != '*')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_requires_equal_length() {
        assert!(!wildcard_match("g****.com", "gmx.com"));
        assert!(wildcard_match("g****.com", "gmail.com"));
    }

    #[test]
    fn wildcard_is_case_insensitive() {
        assert!(wildcard_match("G***L.COM", "gmail.com"));
        assert!(!wildcard_match("h***l.com", "gmail.com"));
    }

    #[test]
    fn wildcard_in_signature_matches_anything() {
        assert!(wildcard_match("33", "3*"));
    }

    #[test]
    fn mask_runs() {
        assert_eq!(longest_mask_run("j***n**a"), 3);
        assert_eq!(longest_mask_run("john"), 0);
        assert_eq!(mask_count("j***n**a"), 5);
    }

    #[test]
    fn visible_edges() {
        assert_eq!(leading_visible("j***n"), Some('j'));
        assert_eq!(trailing_visible("j***n"), Some('n'));
        assert_eq!(leading_visible("***n"), None);
        assert_eq!(trailing_visible(""), None);
    }
}
