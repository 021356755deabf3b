//! Tagline Core - Platform-agnostic span annotation library
//!
//! This crate holds the annotation model for paginated text datasets: pages,
//! tagged spans, the active tag, the keyboard command reducer and the export
//! record. It's designed to work both in native CLI and WASM environments.

pub mod app;
pub mod command;
pub mod cursor;
pub mod dataset;
pub mod error;
pub mod export;
pub mod model;
pub mod selection;
pub mod session;
pub mod store;

pub use app::{App, EditorCell, Effect, Mode};
pub use command::{parse_page_jump, Command, Key};
pub use cursor::CursorState;
pub use dataset::{Dataset, Row};
pub use error::{AnnotateError, DatasetError, ErrorKind};
pub use export::{
    build_export_record, reply_success, to_json, ExportAnnotation, ExportPage, ExportRecord,
    EXPORT_FILE_NAME, EXPORT_PATH,
};
pub use model::{color_of, Page, Segment, Span, Tag, TextRange};
pub use session::{Session, TagIndicator};
pub use store::{PageStore, Progress};
