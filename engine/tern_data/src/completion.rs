//! Raw completion candidates as produced by the parser backend.

use std::fmt;

/// Broad classification of a completion candidate.
///
/// The parser reports a fine-grained cursor kind; the engine only needs
/// enough to drive menu icons, so anything unrecognized maps to `Unknown`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CompletionKind {
    Struct,
    Class,
    Enum,
    Function,
    Variable,
    Macro,
    Parameter,
    Namespace,
    #[default]
    Unknown,
}

impl fmt::Display for CompletionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CompletionKind::Struct => "struct",
            CompletionKind::Class => "class",
            CompletionKind::Enum => "enum",
            CompletionKind::Function => "function",
            CompletionKind::Variable => "variable",
            CompletionKind::Macro => "macro",
            CompletionKind::Parameter => "parameter",
            CompletionKind::Namespace => "namespace",
            CompletionKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// One raw candidate from a code-complete-at-location call.
///
/// Immutable once produced. `insertion_text` is what ranking operates on;
/// the remaining fields are carried through untouched for the editor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompletionData {
    /// Text inserted into the buffer when the candidate is accepted.
    pub insertion_text: String,
    /// Short form shown in the completion menu.
    pub menu_text: String,
    /// Trailing annotation in the menu (usually the result type).
    pub extra_menu_info: String,
    /// Full signature or documentation for the preview window.
    pub detailed_info: String,
    /// Candidate classification.
    pub kind: CompletionKind,
}

impl CompletionData {
    /// Create a candidate with the given insertion text; the display
    /// fields default to empty and `kind` to `Unknown`.
    pub fn new(insertion_text: impl Into<String>) -> Self {
        CompletionData {
            insertion_text: insertion_text.into(),
            ..CompletionData::default()
        }
    }

    /// Set the menu text.
    #[must_use]
    pub fn with_menu_text(mut self, menu_text: impl Into<String>) -> Self {
        self.menu_text = menu_text.into();
        self
    }

    /// Set the extra menu annotation.
    #[must_use]
    pub fn with_extra_menu_info(mut self, info: impl Into<String>) -> Self {
        self.extra_menu_info = info.into();
        self
    }

    /// Set the detailed preview text.
    #[must_use]
    pub fn with_detailed_info(mut self, info: impl Into<String>) -> Self {
        self.detailed_info = info.into();
        self
    }

    /// Set the candidate kind.
    #[must_use]
    pub fn with_kind(mut self, kind: CompletionKind) -> Self {
        self.kind = kind;
        self
    }
}
