//! The seam to the external parser.
//!
//! The real backend is a C library: blocking, non-reentrant, and oblivious
//! to threads. Everything the engine needs from it fits behind this
//! object-safe trait, and the engine guarantees the implementation is only
//! ever entered by one thread at a time (see [`TuCache`](crate::cache)).

use std::error::Error;
use std::fmt;
use std::path::Path;

use tern_data::{CompletionData, Diagnostic, UnsavedFile};

/// Opaque identifier for one live translation unit inside the backend.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct UnitHandle(u64);

impl UnitHandle {
    pub fn new(raw: u64) -> Self {
        UnitHandle(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// A failure reported by the parser backend.
#[derive(Clone, Debug)]
pub struct BackendError {
    message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        BackendError {
            message: message.into(),
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for BackendError {}

/// The incremental parser the engine drives.
///
/// All methods block for as long as the underlying work takes; the work is
/// bounded by file size. None of them may be called concurrently — the
/// engine serializes every entry through a single mutex.
pub trait ParseBackend: Send {
    /// Create the process-wide index all units live in. Called exactly once,
    /// before any other method; failure is fatal to engine construction.
    fn create_index(&mut self) -> Result<(), BackendError>;

    /// Parse a file from scratch into a new translation unit.
    fn parse(
        &mut self,
        path: &Path,
        flags: &[String],
        unsaved: &[UnsavedFile],
    ) -> Result<UnitHandle, BackendError>;

    /// Incrementally re-analyze a unit against new buffer contents. Far
    /// cheaper than a fresh parse; also the only call that precompiles the
    /// preamble.
    fn reparse(&mut self, unit: UnitHandle, unsaved: &[UnsavedFile]) -> Result<(), BackendError>;

    /// Raw completion candidates at a cursor location.
    fn complete_at(
        &mut self,
        unit: UnitHandle,
        path: &Path,
        line: u32,
        column: u32,
        unsaved: &[UnsavedFile],
    ) -> Vec<CompletionData>;

    /// Current diagnostics for a unit, unfiltered.
    fn unit_diagnostics(&mut self, unit: UnitHandle) -> Vec<Diagnostic>;

    /// Release one translation unit.
    fn dispose_unit(&mut self, unit: UnitHandle);

    /// Release the index. Called exactly once, after every unit is disposed.
    fn dispose_index(&mut self);
}
