use serde::{Deserialize, Serialize};

use super::{Tag, TextRange};

/// A tagged run of characters on one page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    pub text: String,
    pub tag: Tag,
    pub page_index: usize,
    #[serde(flatten)]
    pub range: TextRange,
}

impl Span {
    pub fn new(page_index: usize, tag: Tag, range: TextRange, text: String) -> Self {
        Self {
            text,
            tag,
            page_index,
            range,
        }
    }
}
