//! Property tests for the ranking pipeline.
//!
//! The bitset prefilter must be sound (a rejection implies the full scan
//! would also reject), and ranking must select exactly the candidates the
//! query is a subsequence of, idempotently.

use proptest::prelude::*;
use tern_data::CompletionData;
use tern_rank::{rank_candidates, CandidateRepository, LetterBitset};

/// Straightforward reference implementation of the subsequence check.
fn is_subsequence_naive(query: &str, text: &str) -> bool {
    let mut text_bytes = text.bytes().map(|b| b.to_ascii_lowercase());
    'query: for wanted in query.bytes().map(|b| b.to_ascii_lowercase()) {
        for have in text_bytes.by_ref() {
            if have == wanted {
                continue 'query;
            }
        }
        return false;
    }
    true
}

proptest! {
    #[test]
    fn bitset_prefilter_is_sound(
        query in "[a-zA-Z]{0,6}",
        text in "[a-zA-Z_0-9]{0,12}",
    ) {
        let query_bits = LetterBitset::from_str(&query);
        let text_bits = LetterBitset::from_str(&text);
        if !text_bits.contains(query_bits) {
            prop_assert!(
                !is_subsequence_naive(&query, &text),
                "bitset rejected {query:?} on {text:?} but the scan accepts it"
            );
        }
    }

    #[test]
    fn rank_selects_exactly_the_subsequence_matches(
        query in "[a-z]{0,4}",
        texts in prop::collection::vec("[a-zA-Z_]{0,8}", 0..12),
    ) {
        let repo = CandidateRepository::new();
        let snapshot: Vec<CompletionData> =
            texts.iter().map(|t| CompletionData::new(t.clone())).collect();

        let ranked = rank_candidates(&repo, &query, &snapshot);

        let expected = texts
            .iter()
            .filter(|t| is_subsequence_naive(&query, t))
            .count();
        prop_assert_eq!(ranked.len(), expected);
        for data in &ranked {
            prop_assert!(is_subsequence_naive(&query, &data.insertion_text));
        }
    }

    #[test]
    fn rank_is_idempotent(
        query in "[a-z]{0,4}",
        texts in prop::collection::vec("[a-zA-Z_]{0,8}", 0..12),
    ) {
        let repo = CandidateRepository::new();
        let snapshot: Vec<CompletionData> =
            texts.iter().map(|t| CompletionData::new(t.clone())).collect();

        let once = rank_candidates(&repo, &query, &snapshot);
        let twice = rank_candidates(&repo, &query, &once);
        prop_assert_eq!(once, twice);
    }
}
