//! Total ordering over match outcomes.

use std::cmp::Ordering;

/// Outcome of matching one candidate against one query.
///
/// Results sort ascending with better matches first. Comparison priority:
/// higher ratio of consecutive matched characters, then earlier first-match
/// index, then shorter candidate, then candidate text. An empty query
/// matches everything and orders purely by candidate text.
#[derive(Copy, Clone, Debug)]
pub struct MatchResult<'a> {
    is_subsequence: bool,
    query_is_empty: bool,
    /// Matched characters that immediately follow the previous match.
    consecutive_steps: u32,
    /// Upper bound on `consecutive_steps` for this query (query length - 1).
    possible_steps: u32,
    /// Byte index of the first matched character.
    first_match: u32,
    candidate_len: u32,
    text: &'a str,
}

impl<'a> MatchResult<'a> {
    pub(crate) fn miss(text: &'a str) -> Self {
        MatchResult {
            is_subsequence: false,
            query_is_empty: false,
            consecutive_steps: 0,
            possible_steps: 0,
            first_match: 0,
            candidate_len: text.len() as u32,
            text,
        }
    }

    pub(crate) fn empty_query(text: &'a str) -> Self {
        MatchResult {
            is_subsequence: true,
            query_is_empty: true,
            consecutive_steps: 0,
            possible_steps: 0,
            first_match: 0,
            candidate_len: text.len() as u32,
            text,
        }
    }

    pub(crate) fn subsequence(
        text: &'a str,
        consecutive_steps: u32,
        possible_steps: u32,
        first_match: u32,
    ) -> Self {
        MatchResult {
            is_subsequence: true,
            query_is_empty: false,
            consecutive_steps,
            possible_steps,
            first_match,
            candidate_len: text.len() as u32,
            text,
        }
    }

    /// Whether the query is a subsequence of the candidate.
    #[inline]
    pub fn is_subsequence(&self) -> bool {
        self.is_subsequence
    }

    /// The candidate text this result was computed for.
    #[inline]
    pub fn text(&self) -> &'a str {
        self.text
    }
}

impl Ord for MatchResult<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.query_is_empty && other.query_is_empty {
            return self.text.cmp(other.text);
        }

        // Ratio comparison without floats: a/b vs c/d  <=>  a*d vs c*b.
        let ours = u64::from(self.consecutive_steps) * u64::from(other.possible_steps);
        let theirs = u64::from(other.consecutive_steps) * u64::from(self.possible_steps);

        theirs
            .cmp(&ours)
            .then_with(|| self.first_match.cmp(&other.first_match))
            .then_with(|| self.candidate_len.cmp(&other.candidate_len))
            .then_with(|| self.text.cmp(other.text))
    }
}

impl PartialOrd for MatchResult<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for MatchResult<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MatchResult<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consecutive_ratio_wins() {
        // "ba" fully consecutive vs. one gap: 1/1 beats 0/1.
        let tight = MatchResult::subsequence("banana", 1, 1, 0);
        let loose = MatchResult::subsequence("bxaxx", 0, 1, 0);
        assert!(tight < loose);
    }

    #[test]
    fn earlier_first_match_breaks_ratio_ties() {
        let early = MatchResult::subsequence("banana", 1, 1, 0);
        let late = MatchResult::subsequence("abanana", 1, 1, 1);
        assert!(early < late);
    }

    #[test]
    fn shorter_candidate_breaks_position_ties() {
        let short = MatchResult::subsequence("bar", 1, 1, 0);
        let long = MatchResult::subsequence("barricade", 1, 1, 0);
        assert!(short < long);
    }

    #[test]
    fn text_is_the_final_tie_break() {
        let a = MatchResult::subsequence("bad", 1, 1, 0);
        let b = MatchResult::subsequence("bat", 1, 1, 0);
        assert!(a < b);
        assert_eq!(a, MatchResult::subsequence("bad", 1, 1, 0));
    }

    #[test]
    fn empty_query_orders_by_text() {
        let a = MatchResult::empty_query("abacus");
        let b = MatchResult::empty_query("banana");
        assert!(a < b);
    }

    #[test]
    fn single_character_query_has_no_ratio() {
        // possible_steps == 0 on both sides; first match decides.
        let early = MatchResult::subsequence("xab", 0, 0, 0);
        let late = MatchResult::subsequence("axb", 0, 0, 1);
        assert!(early < late);
    }
}
