//! The filter → score → sort pipeline over a candidate snapshot.

use tern_data::CompletionData;

use crate::bitset::LetterBitset;
use crate::repository::CandidateRepository;
use crate::result::MatchResult;

struct RankedEntry<'a> {
    data: &'a CompletionData,
    result: MatchResult<'static>,
}

/// Filter and order a snapshot of raw candidates against a query.
///
/// Candidates whose letter mask cannot cover the query's are rejected
/// before any scanning. Survivors are scanned for a case-insensitive
/// subsequence match and sorted by [`MatchResult`], better matches first.
/// The sort is stable, so equal results keep their snapshot order.
pub fn rank_candidates(
    repository: &CandidateRepository,
    query: &str,
    snapshot: &[CompletionData],
) -> Vec<CompletionData> {
    let query_bits = LetterBitset::from_str(query);
    let interned = repository.candidates_for_strings(snapshot);

    let mut ranked: Vec<RankedEntry<'_>> = Vec::with_capacity(snapshot.len());
    for (data, candidate) in snapshot.iter().zip(interned) {
        if !candidate.matches_query_bits(query_bits) {
            continue;
        }
        let result = candidate.query_match_result(query);
        if result.is_subsequence() {
            ranked.push(RankedEntry { data, result });
        }
    }

    ranked.sort_by(|a, b| a.result.cmp(&b.result));
    ranked.into_iter().map(|entry| entry.data.clone()).collect()
}
