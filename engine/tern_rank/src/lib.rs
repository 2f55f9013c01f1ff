//! Query-time fuzzy filtering and ranking of completion candidates.
//!
//! The pipeline is deliberately two-phase: a 26-bit letter-set prefilter
//! rejects candidates that cannot possibly contain the query as a
//! subsequence, and only survivors pay for the character-by-character
//! subsequence scan. Candidates are interned in a sharded repository so the
//! bitset is computed once per distinct insertion text, ever.

mod bitset;
mod candidate;
mod rank;
mod repository;
mod result;

pub use bitset::LetterBitset;
pub use candidate::Candidate;
pub use rank::rank_candidates;
pub use repository::CandidateRepository;
pub use result::MatchResult;
