//! Sharded concurrent store of interned candidates.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tern_data::CompletionData;

use crate::candidate::Candidate;

/// Number of shards; keyed by a cheap hash of the leading bytes.
const NUM_SHARDS: usize = 16;

/// Interns insertion texts as [`Candidate`]s so the letter mask is computed
/// once per distinct string.
///
/// Thread-safe and idempotent: interning the same text twice, from any
/// threads, yields the same `&'static Candidate`. Storage is leaked; a
/// candidate observed once stays valid for the process lifetime.
pub struct CandidateRepository {
    shards: [RwLock<FxHashMap<&'static str, &'static Candidate>>; NUM_SHARDS],
}

impl CandidateRepository {
    pub fn new() -> Self {
        CandidateRepository {
            shards: std::array::from_fn(|_| RwLock::new(FxHashMap::default())),
        }
    }

    #[inline]
    fn shard_for(text: &str) -> usize {
        let mut hash = 0u32;
        for byte in text.bytes().take(8) {
            hash = hash.wrapping_mul(31).wrapping_add(u32::from(byte));
        }
        (hash as usize) % NUM_SHARDS
    }

    /// Intern one insertion text.
    pub fn intern(&self, text: &str) -> &'static Candidate {
        let shard = &self.shards[Self::shard_for(text)];

        // Fast path: already interned.
        {
            let guard = shard.read();
            if let Some(&candidate) = guard.get(text) {
                return candidate;
            }
        }

        let mut guard = shard.write();

        // Re-check after taking the write lock.
        if let Some(&candidate) = guard.get(text) {
            return candidate;
        }

        let candidate: &'static Candidate = Box::leak(Box::new(Candidate::new(text)));
        guard.insert(candidate.text(), candidate);
        candidate
    }

    /// Intern every insertion text of a candidate batch, preserving order.
    pub fn candidates_for_strings(&self, batch: &[CompletionData]) -> Vec<&'static Candidate> {
        batch
            .iter()
            .map(|data| self.intern(&data.insertion_text))
            .collect()
    }

    /// Number of distinct interned candidates.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.read().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CandidateRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_idempotent() {
        let repo = CandidateRepository::new();
        let first = repo.intern("push_back");
        let second = repo.intern("push_back");
        assert!(std::ptr::eq(first, second));
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn distinct_texts_get_distinct_candidates() {
        let repo = CandidateRepository::new();
        let a = repo.intern("alpha");
        let b = repo.intern("beta");
        assert!(!std::ptr::eq(a, b));
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn batch_interning_preserves_order_and_length() {
        let repo = CandidateRepository::new();
        let batch = [
            CompletionData::new("banana"),
            CompletionData::new("abacus"),
            CompletionData::new("banana"),
        ];
        let interned = repo.candidates_for_strings(&batch);
        assert_eq!(interned.len(), 3);
        assert_eq!(interned[0].text(), "banana");
        assert_eq!(interned[1].text(), "abacus");
        assert!(std::ptr::eq(interned[0], interned[2]));
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn concurrent_interning_agrees() {
        use std::sync::Arc;
        use std::thread;

        let repo = Arc::new(CandidateRepository::new());
        let mut handles = Vec::new();

        for _ in 0..4 {
            let repo = Arc::clone(&repo);
            handles.push(thread::spawn(move || {
                (0..100)
                    .map(|i| repo.intern(&format!("candidate_{i}")) as *const Candidate as usize)
                    .collect::<Vec<_>>()
            }));
        }

        let mut results = handles.into_iter().map(|h| h.join().unwrap());
        let first = results.next().unwrap();
        for other in results {
            assert_eq!(first, other);
        }
        assert_eq!(repo.len(), 100);
    }
}
