use crate::model::TextRange;

/// Errors raised by store, selection and dispatch operations.
///
/// Every operation that returns one of these has left the session untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnnotateError {
    #[error("page {requested} is out of range (1-{total})")]
    PageOutOfRange { requested: usize, total: usize },

    #[error("'{0}' is not a page number")]
    InvalidPageInput(String),

    #[error("selection {start}-{end} is outside the page ({len} characters)", start = .range.start_offset, end = .range.end_offset)]
    SelectionOutOfBounds { range: TextRange, len: usize },

    #[error("selection overlaps the {tag} span \"{text}\"")]
    OverlappingSelection { tag: &'static str, text: String },

    #[error("the last page cannot be deleted")]
    LastPage,

    #[error("no pages loaded")]
    NoPages,
}

/// How a front end should surface an [`AnnotateError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Inline message or input revert
    Validation,
    /// Blocking alert; state is unchanged
    LastPageDeletion,
}

impl AnnotateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnnotateError::LastPage => ErrorKind::LastPageDeletion,
            _ => ErrorKind::Validation,
        }
    }
}

/// Errors raised while reading a dataset
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to parse dataset JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("dataset contains no text")]
    Empty,
}

pub type Result<T, E = AnnotateError> = std::result::Result<T, E>;
