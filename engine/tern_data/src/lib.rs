//! Shared value types for the Tern completion engine.
//!
//! Everything in this crate is a plain value: buffers handed in by the
//! editor, raw candidates handed back by the parser, and diagnostics.
//! Behavior lives in `tern_rank` and `tern_engine`.

mod completion;
mod diagnostic;
mod unsaved;

pub use completion::{CompletionData, CompletionKind};
pub use diagnostic::{Diagnostic, DiagnosticSeverity, Location};
pub use unsaved::UnsavedFile;
