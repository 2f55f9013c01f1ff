//! Tern: a concurrent code-completion engine.
//!
//! The engine wraps an external incremental parser — a blocking,
//! single-entrant C library behind the [`ParseBackend`] trait — and keeps it
//! responsive to per-keystroke traffic with three cooperating background
//! workers:
//!
//! - the **parse worker** applies translation-unit updates,
//! - the **completion worker** produces raw candidate snapshots at the
//!   cursor location, and
//! - a small **sorting pool** filters and ranks the latest snapshot against
//!   the user's query.
//!
//! Every entry into the parser is serialized through one mutex. Requests
//! travel through single-cell latest-wins mailboxes, so a burst of
//! keystrokes collapses into the newest request and superseded futures
//! resolve as cancelled. Ranking itself lives in [`tern_rank`].

mod backend;
mod cache;
mod completer;
mod engine;
mod future;
mod slot;

pub use backend::{BackendError, ParseBackend, UnitHandle};
pub use cache::EngineError;
pub use completer::{Completer, CompleterConfig, MAX_ASYNC_THREADS, MIN_ASYNC_THREADS};
pub use future::{Poll, Promise, TaskFuture};

pub use tern_data::{
    CompletionData, CompletionKind, Diagnostic, DiagnosticSeverity, Location, UnsavedFile,
};
