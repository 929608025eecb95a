//! Bounded-text utility.
//!
//! Every boundary-crossing cap (inbound utterance, cypher echo, formatted
//! reply, error string, history snippet) goes through these helpers so the
//! limits are enforced in one place and are always char-safe.

/// Return a prefix of `s` containing at most `max_chars` characters.
///
/// Slices on a character boundary, never mid-codepoint.
pub fn clip(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Clip to `max_chars` and append `...` when anything was cut.
pub fn clip_with_ellipsis(s: &str, max_chars: usize) -> String {
    let clipped = clip(s, max_chars);
    if clipped.len() < s.len() {
        format!("{}...", clipped)
    } else {
        clipped.to_string()
    }
}

/// Clip to `max_chars`, appending `notice` when anything was cut.
///
/// Used for the outbound message ceiling where the cut text is replaced by
/// a fixed truncation notice rather than a bare ellipsis.
pub fn clip_with_notice(s: &str, max_chars: usize, notice: &str) -> String {
    let clipped = clip(s, max_chars);
    if clipped.len() < s.len() {
        format!("{}{}", clipped, notice)
    } else {
        clipped.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_shorter_than_limit() {
        assert_eq!(clip("hello", 10), "hello");
    }

    #[test]
    fn test_clip_exactly_at_limit() {
        assert_eq!(clip("hello", 5), "hello");
    }

    #[test]
    fn test_clip_over_limit() {
        assert_eq!(clip("hello world", 5), "hello");
    }

    #[test]
    fn test_clip_zero() {
        assert_eq!(clip("hello", 0), "");
    }

    #[test]
    fn test_clip_empty() {
        assert_eq!(clip("", 5), "");
    }

    #[test]
    fn test_clip_multibyte_boundary() {
        // Each rocket emoji is one char but four bytes.
        let s = "🚀🚀🚀🚀";
        assert_eq!(clip(s, 2), "🚀🚀");
    }

    #[test]
    fn test_clip_with_ellipsis_cut() {
        assert_eq!(clip_with_ellipsis("abcdef", 3), "abc...");
    }

    #[test]
    fn test_clip_with_ellipsis_untouched() {
        assert_eq!(clip_with_ellipsis("abc", 3), "abc");
        assert_eq!(clip_with_ellipsis("ab", 3), "ab");
    }

    #[test]
    fn test_clip_with_notice_cut() {
        let out = clip_with_notice("abcdef", 4, " [cut]");
        assert_eq!(out, "abcd [cut]");
    }

    #[test]
    fn test_clip_with_notice_untouched() {
        assert_eq!(clip_with_notice("abcd", 4, " [cut]"), "abcd");
    }
}
