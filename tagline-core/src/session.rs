use crate::model::{color_of, Tag, NO_TAG_COLOR};
use crate::store::PageStore;

/// Per-session annotation state: the page store plus the active tag.
///
/// Front ends own exactly one of these and route every mutation through it.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub dataset_name: String,
    pub store: PageStore,
    pub(crate) active_tag: Option<Tag>,
}

/// Label and color describing the active tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagIndicator {
    pub label: &'static str,
    pub color: &'static str,
}

impl Session {
    pub fn new(dataset_name: impl Into<String>, store: PageStore) -> Self {
        Self {
            dataset_name: dataset_name.into(),
            store,
            active_tag: None,
        }
    }

    pub fn active_tag(&self) -> Option<Tag> {
        self.active_tag
    }

    pub fn indicator(&self) -> TagIndicator {
        match self.active_tag {
            Some(tag) => TagIndicator {
                label: tag.name(),
                color: color_of(tag.name()),
            },
            None => TagIndicator {
                label: "no tag",
                color: NO_TAG_COLOR,
            },
        }
    }
}
