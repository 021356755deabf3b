pub mod page;
pub mod span;
pub mod tag;
pub mod text_range;

pub use page::{Page, Segment};
pub use span::Span;
pub use tag::{color_of, Tag, DEFAULT_COLOR, NO_TAG_COLOR};
pub use text_range::{char_slice, TextRange};
