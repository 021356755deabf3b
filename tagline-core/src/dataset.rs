//! Reading `{id, text}` rows into a session.

use serde::Deserialize;

use crate::error::DatasetError;
use crate::session::Session;
use crate::store::PageStore;

/// A single dataset row
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Row {
    pub id: i64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub name: String,
    pub rows: Vec<Row>,
}

impl Dataset {
    /// Parse a JSON array of `{"id": .., "text": ..}` objects
    pub fn from_json_str(name: &str, json: &str) -> Result<Self, DatasetError> {
        let rows: Vec<Row> = serde_json::from_str(json)?;
        Self::non_empty(name, rows)
    }

    /// One page per non-blank line, numbered from 1
    pub fn from_lines(name: &str, content: &str) -> Result<Self, DatasetError> {
        let rows = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .enumerate()
            .map(|(i, line)| Row {
                id: (i + 1) as i64,
                text: line.to_string(),
            })
            .collect();
        Self::non_empty(name, rows)
    }

    fn non_empty(name: &str, rows: Vec<Row>) -> Result<Self, DatasetError> {
        if rows.is_empty() {
            return Err(DatasetError::Empty);
        }
        Ok(Self {
            name: name.to_string(),
            rows,
        })
    }

    pub fn into_session(self) -> Session {
        let store = PageStore::from_rows(self.rows.into_iter().map(|r| (r.id, r.text)));
        Session::new(self.name, store)
    }
}
