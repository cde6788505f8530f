//! Length-based fuzziness policy.

/// Shortest term length (in chars) that tolerates one edit.
pub const FUZZY_ONE_MIN_LEN: usize = 4;

/// Shortest term length (in chars) that tolerates two edits.
pub const FUZZY_TWO_MIN_LEN: usize = 8;

/// Largest fuzziness the policy ever assigns.
pub const MAX_FUZZINESS: u8 = 2;

/// Returns the maximum edit distance allowed for a term.
///
/// Length is counted in chars, so multi-byte terms are not penalized for their encoding.
pub fn max_fuzzy(term: &str) -> u8 {
    let len = term.chars().count();
    if len >= FUZZY_TWO_MIN_LEN {
        MAX_FUZZINESS
    } else if len >= FUZZY_ONE_MIN_LEN {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoints() {
        assert_eq!(max_fuzzy("cat"), 0);
        assert_eq!(max_fuzzy("frog"), 1);
        assert_eq!(max_fuzzy("rabbits"), 1);
        assert_eq!(max_fuzzy("elephant"), 2);
    }

    #[test]
    fn empty_term_is_exact() {
        assert_eq!(max_fuzzy(""), 0);
    }

    #[test]
    fn monotonic_in_length() {
        let mut previous = 0;
        for len in 0..20 {
            let term = "x".repeat(len);
            let current = max_fuzzy(&term);
            assert!(current >= previous, "fuzziness dropped at length {len}");
            previous = current;
        }
        assert_eq!(previous, MAX_FUZZINESS);
    }

    #[test]
    fn counts_chars_not_bytes() {
        // three chars, six bytes
        assert_eq!(max_fuzzy("éèê"), 0);
        assert_eq!(max_fuzzy("ñandú"), 1);
    }
}
