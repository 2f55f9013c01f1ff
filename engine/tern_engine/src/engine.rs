//! Shared worker state and the three background worker loops.
//!
//! The parse worker, the completion worker, and the sorting pool all hold a
//! reference-counted [`EngineState`] and signal each other exclusively
//! through its cells, latch, and snapshot lock; no worker knows about any
//! other directly.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Condvar, Mutex, RwLock};
use tern_data::{CompletionData, UnsavedFile};
use tern_rank::{rank_candidates, CandidateRepository};
use tracing::{debug, trace};

use crate::cache::TuCache;
use crate::future::Promise;
use crate::slot::{Interrupted, LatestValueSlot, ParseCell};

pub(crate) struct ParseTask {
    pub path: PathBuf,
    pub unsaved: Vec<UnsavedFile>,
    pub flags: Vec<String>,
}

pub(crate) struct CompletionTask {
    pub path: PathBuf,
    pub line: u32,
    pub column: u32,
    pub unsaved: Vec<UnsavedFile>,
    pub flags: Vec<String>,
}

pub(crate) struct SortTask {
    pub query: String,
    pub promise: Promise<Vec<CompletionData>>,
}

struct ReadyState {
    ready: bool,
    closed: bool,
}

/// Flag + condition meaning "a snapshot has been published since the last
/// new-cursor request". Sorting workers park here; the completion worker
/// broadcasts after each publish; a new empty-query request clears the flag
/// so nothing ranks the outgoing snapshot.
pub(crate) struct ReadyLatch {
    state: Mutex<ReadyState>,
    cond: Condvar,
}

impl ReadyLatch {
    fn new() -> Self {
        ReadyLatch {
            state: Mutex::new(ReadyState {
                ready: false,
                closed: false,
            }),
            cond: Condvar::new(),
        }
    }

    pub fn set(&self) {
        let mut state = self.state.lock();
        state.ready = true;
        drop(state);
        self.cond.notify_all();
    }

    pub fn clear(&self) {
        self.state.lock().ready = false;
    }

    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        drop(state);
        self.cond.notify_all();
    }

    /// Block until the flag is set. Returns `false` once the latch closes.
    pub fn wait(&self) -> bool {
        let mut state = self.state.lock();
        loop {
            if state.closed {
                return false;
            }
            if state.ready {
                return true;
            }
            self.cond.wait(&mut state);
        }
    }
}

/// Everything the workers share.
pub(crate) struct EngineState {
    /// The parser mutex. Holding the guard is the only way to reach the
    /// backend.
    pub cache: Mutex<TuCache>,
    /// Most recent raw candidate set; exclusive to publish, shared to rank.
    pub snapshot: RwLock<Vec<CompletionData>>,
    pub parse_task: ParseCell<ParseTask>,
    pub complete_task: LatestValueSlot<CompletionTask>,
    pub sort_task: LatestValueSlot<SortTask>,
    pub ready: ReadyLatch,
    pub repository: CandidateRepository,
    shutdown: AtomicBool,
}

impl EngineState {
    pub fn new(cache: TuCache) -> Self {
        EngineState {
            cache: Mutex::new(cache),
            snapshot: RwLock::new(Vec::new()),
            parse_task: ParseCell::new(),
            complete_task: LatestValueSlot::new(),
            sort_task: LatestValueSlot::new(),
            ready: ReadyLatch::new(),
            repository: CandidateRepository::new(),
            shutdown: AtomicBool::new(false),
        }
    }

    pub fn shutting_down(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// Permanently cancel every wait so the worker loops exit. Closing is
    /// sticky on purpose: a worker that is mid-task right now must still
    /// observe the shutdown on its *next* blocking call, not only if it
    /// happened to be parked when this ran. Called once, when the engine
    /// drops.
    pub fn begin_shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
        self.parse_task.close();
        self.ready.close();
        self.complete_task.close();
        self.sort_task.close();
    }
}

/// Parse worker: applies queued translation-unit updates, one at a time,
/// under the parser mutex. The cell stays pending for the whole execution
/// so the completion worker can yield to it.
pub(crate) fn parse_worker(state: &EngineState) {
    while let Some(task) = state.parse_task.take() {
        debug!(path = %task.path.display(), "applying queued translation unit update");
        {
            let mut cache = state.cache.lock();
            cache.update(&task.path, &task.unsaved, &task.flags);
        }
        state.parse_task.finish();
    }
    trace!("parse worker exiting");
}

/// Completion worker: turns queued completion requests into published
/// candidate snapshots.
pub(crate) fn completion_worker(state: &EngineState) {
    loop {
        let task = match state.complete_task.get() {
            Ok(task) => task,
            Err(Interrupted) => {
                if state.shutting_down() {
                    break;
                }
                continue;
            }
        };

        // A queued or running parse wins the parser: the cursor has moved
        // on, and a fresh completion request will follow the fresh parse.
        if state.parse_task.pending() {
            debug!(path = %task.path.display(), "parse pending, dropping completion request");
            continue;
        }

        let candidates = {
            let mut cache = state.cache.lock();
            cache.complete_at(&task.path, task.line, task.column, &task.unsaved, &task.flags)
        };

        debug!(count = candidates.len(), "publishing candidate snapshot");
        *state.snapshot.write() = candidates;
        state.ready.set();
    }
    trace!("completion worker exiting");
}

/// Sorting worker: waits for a published snapshot and a ranking request,
/// then ranks under the shared snapshot lock and resolves the request's
/// future. Any cancelled wait restarts the loop from the ready gate.
pub(crate) fn sorting_worker(state: &EngineState) {
    loop {
        if !state.ready.wait() {
            break;
        }

        let task = match state.sort_task.get() {
            Ok(task) => task,
            Err(Interrupted) => {
                if state.shutting_down() {
                    break;
                }
                continue;
            }
        };

        let ranked = {
            let snapshot = state.snapshot.read();
            rank_candidates(&state.repository, &task.query, &snapshot)
        };
        task.promise.resolve(ranked);
    }
    trace!("sorting worker exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn latch_set_passes_waiters() {
        let latch = Arc::new(ReadyLatch::new());
        let waiter = {
            let latch = Arc::clone(&latch);
            thread::spawn(move || latch.wait())
        };
        thread::sleep(Duration::from_millis(20));
        latch.set();
        assert!(waiter.join().unwrap());
    }

    #[test]
    fn latch_stays_passable_until_cleared() {
        let latch = ReadyLatch::new();
        latch.set();
        assert!(latch.wait());
        assert!(latch.wait());
        latch.clear();
        latch.close();
        assert!(!latch.wait());
    }

    #[test]
    fn latch_close_releases_waiters() {
        let latch = Arc::new(ReadyLatch::new());
        let waiter = {
            let latch = Arc::clone(&latch);
            thread::spawn(move || latch.wait())
        };
        thread::sleep(Duration::from_millis(20));
        latch.close();
        assert!(!waiter.join().unwrap());
    }
}
