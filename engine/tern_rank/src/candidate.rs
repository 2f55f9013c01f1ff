//! Interned completion candidates.

use smallvec::SmallVec;

use crate::bitset::LetterBitset;
use crate::result::MatchResult;

/// One interned insertion text with its precomputed letter mask.
///
/// Candidates are owned by the [`CandidateRepository`](crate::CandidateRepository)
/// and live for the process lifetime.
#[derive(Debug)]
pub struct Candidate {
    text: String,
    letters: LetterBitset,
}

impl Candidate {
    pub(crate) fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let letters = LetterBitset::from_str(&text);
        Candidate { text, letters }
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn letters(&self) -> LetterBitset {
        self.letters
    }

    /// Cheap necessary condition: can `query_bits` possibly be a
    /// subsequence of this candidate? Must be checked before
    /// [`query_match_result`](Self::query_match_result).
    #[inline]
    pub fn matches_query_bits(&self, query_bits: LetterBitset) -> bool {
        self.letters.contains(query_bits)
    }

    /// Scan for the query as a case-insensitive subsequence, placing each
    /// query character at the leftmost position after the previous match.
    pub fn query_match_result(&self, query: &str) -> MatchResult<'_> {
        if query.is_empty() {
            return MatchResult::empty_query(&self.text);
        }

        let text = self.text.as_bytes();
        let mut indices: SmallVec<[u32; 16]> = SmallVec::new();
        let mut cursor = 0usize;

        for query_byte in query.bytes() {
            let wanted = query_byte.to_ascii_lowercase();
            match text[cursor..]
                .iter()
                .position(|byte| byte.to_ascii_lowercase() == wanted)
            {
                Some(offset) => {
                    let index = cursor + offset;
                    indices.push(index as u32);
                    cursor = index + 1;
                }
                None => return MatchResult::miss(&self.text),
            }
        }

        let consecutive = indices.windows(2).filter(|w| w[1] == w[0] + 1).count() as u32;
        let possible = (indices.len() - 1) as u32;
        MatchResult::subsequence(&self.text, consecutive, possible, indices[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_and_gapped_subsequences() {
        let candidate = Candidate::new("push_back");
        assert!(candidate.query_match_result("push").is_subsequence());
        assert!(candidate.query_match_result("pb").is_subsequence());
        assert!(candidate.query_match_result("pk").is_subsequence());
        assert!(!candidate.query_match_result("kb").is_subsequence());
        assert!(!candidate.query_match_result("pushz").is_subsequence());
    }

    #[test]
    fn matching_is_case_insensitive() {
        let candidate = Candidate::new("FooBar");
        assert!(candidate.query_match_result("foobar").is_subsequence());
        assert!(candidate.query_match_result("FB").is_subsequence());
        assert!(candidate.query_match_result("fOoB").is_subsequence());
    }

    #[test]
    fn empty_query_always_matches() {
        assert!(Candidate::new("anything").query_match_result("").is_subsequence());
        assert!(Candidate::new("").query_match_result("").is_subsequence());
    }

    #[test]
    fn consecutive_run_beats_scattered_match() {
        let banana = Candidate::new("banana");
        let scattered = Candidate::new("bxaxx");
        assert!(banana.query_match_result("ba") < scattered.query_match_result("ba"));
    }

    #[test]
    fn bitset_agrees_with_scan() {
        let candidate = Candidate::new("abc");
        assert!(candidate.matches_query_bits(LetterBitset::from_str("cab")));
        assert!(!candidate.matches_query_bits(LetterBitset::from_str("x")));
    }
}
