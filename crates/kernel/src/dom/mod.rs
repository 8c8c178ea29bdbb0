//! In-memory document model.
//!
//! Blocks decorate markup into this arena instead of a browser DOM. The
//! `hidden` class and `data-*` attributes are the contract other code relies
//! on; [`Document::to_html`] is the serialization boundary.

mod document;
mod html;

pub use document::{Document, FieldMatch, NodeId, NodeKind};
pub use html::html_escape;

/// Class toggled by the filter engine; the sole visibility signal.
pub const HIDDEN_CLASS: &str = "hidden";

/// Name of the `data-*` attribute carrying a filter field.
pub fn data_attr(field: &str) -> String {
    format!("data-{}", field.trim().to_lowercase().replace([' ', '_'], "-"))
}
