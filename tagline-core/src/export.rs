use serde::{Deserialize, Serialize};

use crate::model::{Page, Span};
use crate::session::Session;
use crate::store::PageStore;

/// File name offered for the local download
pub const EXPORT_FILE_NAME: &str = "labeled_dataset.json";

/// Path the export payload is POSTed to, relative to the server root
pub const EXPORT_PATH: &str = "/exportData/json";

/// Export format: every page with its resolved annotations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExportRecord {
    pub dataset_name: String,
    pub pages: Vec<ExportPage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExportPage {
    pub page_id: i64,
    pub text: String,
    pub annotations: Vec<ExportAnnotation>,
}

/// One tagged span; `start`/`end` are character offsets into the page text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExportAnnotation {
    pub tag: String,
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl From<&Span> for ExportAnnotation {
    fn from(span: &Span) -> Self {
        // Offsets come from the range recorded at selection time, so a
        // repeated substring resolves to the occurrence that was tagged.
        Self {
            tag: span.tag.name().to_string(),
            start: span.range.start_offset,
            end: span.range.end_offset,
            text: span.text.clone(),
        }
    }
}

impl From<&Page> for ExportPage {
    fn from(page: &Page) -> Self {
        Self {
            page_id: page.id,
            text: page.text().to_string(),
            annotations: page.spans().iter().map(ExportAnnotation::from).collect(),
        }
    }
}

/// Walk every page of `store` and build the export record
pub fn build_export_record(dataset_name: &str, store: &PageStore) -> ExportRecord {
    ExportRecord {
        dataset_name: dataset_name.to_string(),
        pages: store.pages().iter().map(ExportPage::from).collect(),
    }
}

impl From<&Session> for ExportRecord {
    fn from(session: &Session) -> Self {
        build_export_record(&session.dataset_name, &session.store)
    }
}

/// Serialize the record into the payload shared by both export sinks
pub fn to_json(record: &ExportRecord) -> serde_json::Result<String> {
    serde_json::to_string(record)
}

/// Read the `success` flag from a persistence endpoint reply.
///
/// The reply is informational: a missing field, a non-boolean value or a
/// body that is not JSON all yield `None`.
pub fn reply_success(body: &str) -> Option<bool> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("success")?
        .as_bool()
}
