use serde::{Deserialize, Serialize};

/// Color used for names outside the tag set.
pub const DEFAULT_COLOR: &str = "#9e9e9e";

/// Color of the "no tag" indicator.
pub const NO_TAG_COLOR: &str = "#ffffff";

/// Entity label that can be attached to a span
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tag {
    Firma,
    Pozitif,
    Notr,
    Negatif,
}

impl Tag {
    pub fn all() -> &'static [Tag] {
        &[Tag::Firma, Tag::Pozitif, Tag::Notr, Tag::Negatif]
    }

    /// Wire name, as written to the export record
    pub fn name(&self) -> &'static str {
        match self {
            Tag::Firma => "FIRMA",
            Tag::Pozitif => "POZITIF",
            Tag::Notr => "NOTR",
            Tag::Negatif => "NEGATIF",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tag::Firma => "Company",
            Tag::Pozitif => "Positive",
            Tag::Notr => "Neutral",
            Tag::Negatif => "Negative",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Tag::Firma => "#4a90e2",
            Tag::Pozitif => "#2ecc71",
            Tag::Notr => "#f1c40f",
            Tag::Negatif => "#e74c3c",
        }
    }

    /// Same color as [`Tag::color`], split into channels for terminal backends
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Tag::Firma => (0x4a, 0x90, 0xe2),
            Tag::Pozitif => (0x2e, 0xcc, 0x71),
            Tag::Notr => (0xf1, 0xc4, 0x0f),
            Tag::Negatif => (0xe7, 0x4c, 0x3c),
        }
    }

    pub fn parse(name: &str) -> Option<Tag> {
        Tag::all().iter().copied().find(|t| t.name() == name)
    }

    /// Shortcut digit mapping: 1 = FIRMA, 2 = POZITIF, 3 = NOTR, 4 = NEGATIF
    pub fn from_digit(digit: u32) -> Option<Tag> {
        match digit {
            1 => Some(Tag::Firma),
            2 => Some(Tag::Pozitif),
            3 => Some(Tag::Notr),
            4 => Some(Tag::Negatif),
            _ => None,
        }
    }
}

/// Look up the display color for a tag name.
///
/// The empty string is the "no tag" sentinel. Any other unknown name gets
/// [`DEFAULT_COLOR`].
pub fn color_of(name: &str) -> &'static str {
    if name.is_empty() {
        return NO_TAG_COLOR;
    }
    Tag::parse(name).map(|t| t.color()).unwrap_or(DEFAULT_COLOR)
}
