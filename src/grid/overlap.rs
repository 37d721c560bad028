/// Overlap-aware occurrence counting
///
/// The window advances one position after every comparison, including after a
/// match, so successive occurrences may share characters.

/// Count occurrences of `word` in `haystack`, permitting overlaps.
pub fn count_overlapping(haystack: &[u8], word: &[u8]) -> u64 {
    if word.is_empty() || word.len() > haystack.len() {
        return 0;
    }
    haystack.windows(word.len()).filter(|w| *w == word).count() as u64
}

/// Count occurrences reading `line` in its natural order and reversed.
pub fn count_bidirectional(line: &[u8], word: &[u8]) -> u64 {
    if word.is_empty() || word.len() > line.len() {
        return 0;
    }
    let reversed: Vec<u8> = line.iter().rev().copied().collect();
    count_overlapping(line, word) + count_overlapping(&reversed, word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_matches_are_all_counted() {
        assert_eq!(count_overlapping(b"aaaa", b"aaa"), 2);
        assert_eq!(count_overlapping(b"aaaaa", b"aa"), 4);
        assert_eq!(count_overlapping(b"rotatorotator", b"rotator"), 2);
    }

    #[test]
    fn differs_from_non_overlapping_count() {
        let s = "abababa";
        assert_eq!(s.matches("aba").count(), 2);
        assert_eq!(count_overlapping(s.as_bytes(), b"aba"), 3);
    }

    #[test]
    fn no_match() {
        assert_eq!(count_overlapping(b"xxxxxxxxxx", b"rotator"), 0);
        assert_eq!(count_overlapping(b"rot", b"rotator"), 0);
        assert_eq!(count_overlapping(b"anything", b""), 0);
    }

    #[test]
    fn match_at_both_ends() {
        assert_eq!(count_overlapping(b"abxxab", b"ab"), 2);
        assert_eq!(count_overlapping(b"ab", b"ab"), 1);
    }

    #[test]
    fn bidirectional_reads_both_ways() {
        assert_eq!(count_bidirectional(b"rotatorxxx", b"rotator"), 2);
        assert_eq!(count_bidirectional(b"xxdrow", b"word"), 1);
        assert_eq!(count_bidirectional(b"wordxx", b"word"), 1);
        assert_eq!(count_bidirectional(b"a", b"a"), 2);
    }
}
