//! The translation-unit cache.

use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use tern_data::{CompletionData, Diagnostic, UnsavedFile};
use tracing::{debug, warn};

use crate::backend::{BackendError, ParseBackend, UnitHandle};

/// Fatal engine-construction failure.
#[derive(Debug)]
pub enum EngineError {
    /// The backend could not create its translation-unit index.
    IndexCreation(BackendError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::IndexCreation(err) => {
                write!(f, "failed to create the parser index: {err}")
            }
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EngineError::IndexCreation(err) => Some(err),
        }
    }
}

/// Path → translation-unit map owning the backend.
///
/// The backend is reachable only through this cache, and the engine wraps
/// the cache in the parser mutex, so holding `&mut TuCache` *is* the
/// exclusive right to enter the parser. Units live until the cache is
/// dropped; there is no eviction.
pub(crate) struct TuCache {
    backend: Box<dyn ParseBackend>,
    units: FxHashMap<PathBuf, UnitHandle>,
}

impl TuCache {
    /// Wrap a backend, creating its index. The index and every unit created
    /// later are released when the cache drops.
    pub fn new(mut backend: Box<dyn ParseBackend>) -> Result<Self, EngineError> {
        backend.create_index().map_err(EngineError::IndexCreation)?;
        Ok(TuCache {
            backend,
            units: FxHashMap::default(),
        })
    }

    /// Get the unit for `path`, parsing it first if the cache misses.
    ///
    /// A hit returns the cached handle untouched: completion must not
    /// reparse up front, because the backend already reparses on its own
    /// when buffers changed and doing both parses the file twice per
    /// keystroke. `None` means the file does not parse at all.
    pub fn ensure(
        &mut self,
        path: &Path,
        unsaved: &[UnsavedFile],
        flags: &[String],
    ) -> Option<UnitHandle> {
        if let Some(&unit) = self.units.get(path) {
            return Some(unit);
        }
        let unit = self.create_unit(path, unsaved, flags)?;
        self.units.insert(path.to_path_buf(), unit);
        Some(unit)
    }

    /// Reparse `path` against the given buffers, parsing from scratch if no
    /// unit exists yet. A failed reparse evicts the unit.
    pub fn update(&mut self, path: &Path, unsaved: &[UnsavedFile], flags: &[String]) {
        if let Some(&unit) = self.units.get(path) {
            debug!(path = %path.display(), "reparsing translation unit");
            if let Err(err) = self.backend.reparse(unit, unsaved) {
                warn!(path = %path.display(), error = %err, "reparse failed, evicting unit");
                self.backend.dispose_unit(unit);
                self.units.remove(path);
            }
        } else {
            self.ensure(path, unsaved, flags);
        }
    }

    /// Raw candidates at a location. Empty when the file cannot be parsed.
    pub fn complete_at(
        &mut self,
        path: &Path,
        line: u32,
        column: u32,
        unsaved: &[UnsavedFile],
        flags: &[String],
    ) -> Vec<CompletionData> {
        let Some(unit) = self.ensure(path, unsaved, flags) else {
            return Vec::new();
        };
        self.backend.complete_at(unit, path, line, column, unsaved)
    }

    /// Current diagnostics for `path`, with `Ignored` entries filtered out.
    /// Empty when no unit exists.
    pub fn diagnostics(&mut self, path: &Path) -> Vec<Diagnostic> {
        let Some(&unit) = self.units.get(path) else {
            return Vec::new();
        };
        self.backend
            .unit_diagnostics(unit)
            .into_iter()
            .filter(|diagnostic| !diagnostic.is_ignored())
            .collect()
    }

    fn create_unit(
        &mut self,
        path: &Path,
        unsaved: &[UnsavedFile],
        flags: &[String],
    ) -> Option<UnitHandle> {
        debug!(path = %path.display(), "parsing new translation unit");
        let unit = match self.backend.parse(path, flags, unsaved) {
            Ok(unit) => unit,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "translation unit failed to parse");
                return None;
            }
        };

        // The backend only precompiles the preamble during a reparse, so one
        // immediate reparse here halves the latency of every later update.
        if let Err(err) = self.backend.reparse(unit, unsaved) {
            warn!(path = %path.display(), error = %err, "initial reparse failed");
            self.backend.dispose_unit(unit);
            return None;
        }

        Some(unit)
    }
}

impl Drop for TuCache {
    fn drop(&mut self) {
        for (_, unit) in self.units.drain() {
            self.backend.dispose_unit(unit);
        }
        self.backend.dispose_index();
    }
}
