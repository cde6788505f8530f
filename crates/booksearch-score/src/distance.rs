//! Approximate edit distance between a highlighted word and its query term.
//!
//! This is not Levenshtein. It only answers "identical", "one edit away" or "further",
//! where "one edit" means exactly one of:
//!
//! - a substitution at a single position,
//! - a transposition of two adjacent characters,
//! - a single insertion or deletion.
//!
//! Anything else saturates at [`SATURATED_DISTANCE`]. The fuzziness policy never tolerates
//! more than two edits, so finer distinctions above one would not change any score.
//!
//! Comparison is case-insensitive and works on chars, not bytes.

/// Distance reported when no single edit explains the difference.
pub const SATURATED_DISTANCE: u8 = 2;

/// Estimates the edit distance between `matched` (the backend's highlighted word) and
/// `query` (the originating search term).
pub fn estimate(matched: &str, query: &str) -> u8 {
    let matched: Vec<char> = matched.to_lowercase().chars().collect();
    let query: Vec<char> = query.to_lowercase().chars().collect();

    let one_edit = if matched.len() == query.len() {
        if matched == query {
            return 0;
        }
        single_substitution(&matched, &query) || adjacent_transposition(&matched, &query)
    } else if matched.len() == query.len() + 1 {
        single_deletion(&matched, &query)
    } else if query.len() == matched.len() + 1 {
        single_deletion(&query, &matched)
    } else {
        false
    };

    if one_edit { 1 } else { SATURATED_DISTANCE }
}

/// Returns true if `a` and `b` (equal length) differ at exactly one position.
fn single_substitution(a: &[char], b: &[char]) -> bool {
    (0..a.len()).any(|i| a[..i] == b[..i] && a[i + 1..] == b[i + 1..])
}

/// Returns true if swapping one adjacent pair in `a` yields `b` (equal length).
fn adjacent_transposition(a: &[char], b: &[char]) -> bool {
    (0..a.len().saturating_sub(1)).any(|i| {
        a[i] == b[i + 1] && a[i + 1] == b[i] && a[..i] == b[..i] && a[i + 2..] == b[i + 2..]
    })
}

/// Returns true if deleting one char from `longer` yields `shorter`.
fn single_deletion(longer: &[char], shorter: &[char]) -> bool {
    (0..longer.len()).any(|i| longer[..i] == shorter[..i] && longer[i + 1..] == shorter[i..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical() {
        assert_eq!(estimate("the", "the"), 0);
        assert_eq!(estimate("", ""), 0);
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(estimate("THE", "the"), 0);
        assert_eq!(estimate("Sea", "sEA"), 0);
    }

    #[test]
    fn adjacent_transposition_is_one() {
        assert_eq!(estimate("teh", "the"), 1);
        // first and last pairs
        assert_eq!(estimate("hte", "the"), 1);
        assert_eq!(estimate("ab", "ba"), 1);
        assert_eq!(estimate("sailro", "sailor"), 1);
    }

    #[test]
    fn substitution_is_one() {
        assert_eq!(estimate("cat", "bat"), 1);
        assert_eq!(estimate("cat", "cot"), 1);
        assert_eq!(estimate("cat", "car"), 1);
        assert_eq!(estimate("a", "b"), 1);
    }

    #[test]
    fn insertion_and_deletion_are_one() {
        assert_eq!(estimate("color", "colour"), 1);
        assert_eq!(estimate("colour", "color"), 1);
        assert_eq!(estimate("oldman", "old"), SATURATED_DISTANCE);
        assert_eq!(estimate("xsea", "sea"), 1);
        assert_eq!(estimate("seax", "sea"), 1);
        assert_eq!(estimate("s", ""), 1);
    }

    #[test]
    fn everything_else_saturates() {
        assert_eq!(estimate("cat", "dog"), SATURATED_DISTANCE);
        // two substitutions
        assert_eq!(estimate("abcd", "xbcy"), SATURATED_DISTANCE);
        // non-adjacent swap
        assert_eq!(estimate("abc", "cba"), SATURATED_DISTANCE);
        // same length difference but two edits
        assert_eq!(estimate("abcd", "abx"), SATURATED_DISTANCE);
    }

    #[test]
    fn large_length_difference_saturates() {
        assert_eq!(estimate("mariner", "mar"), SATURATED_DISTANCE);
        assert_eq!(estimate("", "sea"), SATURATED_DISTANCE);
    }

    #[test]
    fn multibyte_chars() {
        assert_eq!(estimate("café", "cafe"), 1);
        assert_eq!(estimate("CAFÉ", "café"), 0);
        assert_eq!(estimate("naïve", "naive"), 1);
    }
}
