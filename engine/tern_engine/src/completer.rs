//! The public engine surface.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tern_data::{CompletionData, Diagnostic, UnsavedFile};
use tracing::{debug, trace};

use crate::backend::ParseBackend;
use crate::cache::{EngineError, TuCache};
use crate::engine::{
    completion_worker, parse_worker, sorting_worker, CompletionTask, EngineState, ParseTask,
    SortTask,
};
use crate::future::{Promise, TaskFuture};

/// Lower bound on the sorting pool size.
pub const MIN_ASYNC_THREADS: usize = 2;

/// Upper bound on the sorting pool size.
pub const MAX_ASYNC_THREADS: usize = 4;

/// Engine configuration. There are no files, environment variables, or
/// flags behind this; what you construct is what runs.
#[derive(Clone, Debug)]
pub struct CompleterConfig {
    pub min_async_threads: usize,
    pub max_async_threads: usize,
    /// Spawn the workers during construction. Kept off by default so
    /// single-threaded test environments stay deterministic.
    pub threading_enabled_initially: bool,
}

impl Default for CompleterConfig {
    fn default() -> Self {
        CompleterConfig {
            min_async_threads: MIN_ASYNC_THREADS,
            max_async_threads: MAX_ASYNC_THREADS,
            threading_enabled_initially: false,
        }
    }
}

impl CompleterConfig {
    #[must_use]
    pub fn with_threading_enabled(mut self, enabled: bool) -> Self {
        self.threading_enabled_initially = enabled;
        self
    }

    #[must_use]
    pub fn with_thread_bounds(mut self, min: usize, max: usize) -> Self {
        self.min_async_threads = min;
        self.max_async_threads = max;
        self
    }

    /// Sorting pool size: hardware parallelism clamped to the configured
    /// bounds.
    pub fn sorting_pool_size(&self) -> usize {
        let hardware = thread::available_parallelism()
            .map(std::num::NonZero::get)
            .unwrap_or(1);
        self.min_async_threads
            .max(self.max_async_threads.min(hardware))
    }
}

struct WorkerHandles {
    parse: JoinHandle<()>,
    completion: JoinHandle<()>,
    sorters: Vec<JoinHandle<()>>,
}

/// A concurrent code-completion engine around a single-threaded parser
/// backend.
///
/// The backend is shared but single-entrant, so every call into it funnels
/// through one mutex — held in turn by the parse worker, the completion
/// worker, or a synchronous caller. Asynchronous requests go through
/// single-cell mailboxes with latest-wins semantics: a burst of keystrokes
/// collapses into the one request that still matters, and every superseded
/// request's future resolves as cancelled.
pub struct Completer {
    state: Arc<EngineState>,
    config: CompleterConfig,
    workers: Option<WorkerHandles>,
}

impl Completer {
    /// Build an engine around a backend. The backend's index is created
    /// here; failure to create it is the only fatal construction error.
    pub fn new(
        backend: Box<dyn ParseBackend>,
        config: CompleterConfig,
    ) -> Result<Self, EngineError> {
        let cache = TuCache::new(backend)?;
        let state = Arc::new(EngineState::new(cache));
        let mut completer = Completer {
            state,
            config,
            workers: None,
        };
        if completer.config.threading_enabled_initially {
            completer.enable_threading();
        }
        Ok(completer)
    }

    /// Spawn the parse worker, the completion worker, and the sorting pool.
    /// Idempotent. Until this is called, asynchronous completion requests
    /// resolve immediately to empty.
    pub fn enable_threading(&mut self) {
        if self.workers.is_some() {
            return;
        }

        let parse = {
            let state = Arc::clone(&self.state);
            thread::spawn(move || parse_worker(&state))
        };
        let completion = {
            let state = Arc::clone(&self.state);
            thread::spawn(move || completion_worker(&state))
        };
        let sorters = (0..self.config.sorting_pool_size())
            .map(|_| {
                let state = Arc::clone(&self.state);
                thread::spawn(move || sorting_worker(&state))
            })
            .collect::<Vec<_>>();

        debug!(sorters = sorters.len(), "background workers started");
        self.workers = Some(WorkerHandles {
            parse,
            completion,
            sorters,
        });
    }

    /// Whether the background workers are running.
    pub fn threading_enabled(&self) -> bool {
        self.workers.is_some()
    }

    /// Parse or reparse a file on the caller's thread, blocking on the
    /// parser mutex.
    pub fn update_translation_unit(
        &self,
        path: &Path,
        unsaved: &[UnsavedFile],
        flags: &[String],
    ) {
        let mut cache = self.state.cache.lock();
        cache.update(path, unsaved, flags);
    }

    /// Queue a parse for the background worker. A request made while one is
    /// already queued or executing is dropped, not queued behind it.
    pub fn update_translation_unit_async(
        &self,
        path: PathBuf,
        unsaved: Vec<UnsavedFile>,
        flags: Vec<String>,
    ) {
        let accepted = self.state.parse_task.submit(ParseTask {
            path,
            unsaved,
            flags,
        });
        if !accepted {
            trace!("parse already pending, dropping async update");
        }
    }

    /// Raw candidates at a location, on the caller's thread.
    ///
    /// Never reparses up front: the backend reparses by itself when the
    /// buffers changed, and an explicit reparse immediately before code
    /// completion would parse the whole file twice.
    pub fn candidates_for_location(
        &self,
        path: &Path,
        line: u32,
        column: u32,
        unsaved: &[UnsavedFile],
        flags: &[String],
    ) -> Vec<CompletionData> {
        let mut cache = self.state.cache.lock();
        cache.complete_at(path, line, column, unsaved, flags)
    }

    /// Ranked candidates for a query at a location, computed by the
    /// background pipeline.
    ///
    /// An empty query means the cursor moved: the sorting pool is flushed,
    /// a fresh completion is requested, and the future resolves once the
    /// new snapshot has been ranked. A non-empty query refines the existing
    /// snapshot without touching the parser. If the parser is busy when an
    /// empty-query request arrives, the future resolves to empty at once
    /// and the client retries after the update.
    pub fn candidates_for_query_and_location_async(
        &self,
        query: &str,
        path: PathBuf,
        line: u32,
        column: u32,
        unsaved: Vec<UnsavedFile>,
        flags: Vec<String>,
    ) -> TaskFuture<Vec<CompletionData>> {
        if self.workers.is_none() {
            return TaskFuture::ready(Vec::new());
        }

        if query.is_empty() {
            if self.updating_translation_unit() {
                return TaskFuture::ready(Vec::new());
            }

            // Require a fresh publish, then reset the sorting pool to the
            // top of its loop. Clearing first means a woken worker finds
            // the gate down and parks instead of re-reading the outgoing
            // snapshot.
            self.state.ready.clear();
            self.state.sort_task.interrupt_wait();
        }

        let (promise, future) = Promise::pair();

        // The sort task must be installed before the completion task: the
        // completion worker may publish and broadcast immediately, and that
        // wake-up would be lost with no sort task in place.
        self.state.sort_task.set(SortTask {
            query: query.to_owned(),
            promise,
        });

        if query.is_empty() {
            self.state.complete_task.set(CompletionTask {
                path,
                line,
                column,
                unsaved,
                flags,
            });
        }

        future
    }

    /// Current diagnostics for a file, `Ignored` entries filtered out.
    /// Non-blocking: returns empty while the parser is busy.
    pub fn diagnostics(&self, path: &Path) -> Vec<Diagnostic> {
        match self.state.cache.try_lock() {
            Some(mut cache) => cache.diagnostics(path),
            None => Vec::new(),
        }
    }

    /// Whether something holds the parser right now.
    #[must_use]
    pub fn updating_translation_unit(&self) -> bool {
        self.state.cache.try_lock().is_none()
    }
}

impl Drop for Completer {
    fn drop(&mut self) {
        self.state.begin_shutdown();
        if let Some(workers) = self.workers.take() {
            let _ = workers.parse.join();
            let _ = workers.completion.join();
            for sorter in workers.sorters {
                let _ = sorter.join();
            }
        }
    }
}
