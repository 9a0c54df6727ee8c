pub mod budget;
pub mod document;
pub mod events;
pub mod order;
pub mod value;

pub use document::{FormatOptions, FormattedDocument, SessionDocument, format_document};
pub use order::{OrderKey, sort_documents};
