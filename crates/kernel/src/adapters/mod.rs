//! Domain adapters: turn feed rows into list items for a block kind.
//!
//! Each adapter prepares the loaded items (ordering, date windows, derived
//! fields) and provides the card template the list renderer calls.

pub mod dates;
pub mod events;
pub mod news;
pub mod picture;

use chrono::NaiveDate;

use crate::dom::{Document, NodeId};
use crate::feed::Item;

pub use dates::{format_date, format_date_range, parse_date_text, parse_sheet_date};
pub use events::EventsMode;
pub use picture::{optimized_picture, optimized_picture_html};

/// Derived field holding the display date.
pub const FORMATTED_DATE: &str = "formattedDate";
/// Derived field holding serialized `<picture>` markup.
pub const PICTURE: &str = "picture";

/// First non-blank text among `names`.
pub(crate) fn first_text(item: &Item, names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| item.text(name))
        .map(|text| text.trim().to_string())
        .find(|text| !text.is_empty())
}

/// First parseable date among `names`.
pub(crate) fn first_date(item: &Item, names: &[&str]) -> Option<NaiveDate> {
    names
        .iter()
        .filter_map(|name| item.field(name))
        .find_map(parse_sheet_date)
}

/// Attach optimized picture markup for the item's `image`, if any.
pub(crate) fn derive_picture(item: &mut Item) {
    if let Some(src) = first_text(item, &["image"]) {
        let alt = item.text_or_empty("title");
        item.derive(PICTURE, optimized_picture_html(&src, &alt));
    }
}

/// Append `<tag class=class>text</tag>` to `parent` when `text` is present.
pub(crate) fn append_text(
    doc: &mut Document,
    parent: NodeId,
    tag: &str,
    class: &str,
    text: Option<&str>,
) {
    let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
        return;
    };
    let node = doc.create_element_with_class(tag, class);
    doc.set_text(node, text);
    doc.append_child(parent, node);
}

/// Card heading, linked to the item's page when it has one.
pub(crate) fn append_title(doc: &mut Document, parent: NodeId, item: &Item) {
    let heading = doc.create_element("h3");
    let title = item.text_or_empty("title");
    match first_text(item, &["path"]) {
        Some(path) => {
            let link = doc.create_element("a");
            doc.set_attr(link, "href", &path);
            doc.set_text(link, &title);
            doc.append_child(heading, link);
        }
        None => doc.set_text(heading, &title),
    }
    doc.append_child(parent, heading);
}

/// Card image wrapper around the derived picture markup.
pub(crate) fn append_picture(doc: &mut Document, parent: NodeId, item: &Item, class: &str) {
    let Some(picture) = item.derived(PICTURE) else {
        return;
    };
    let wrapper = doc.create_element_with_class("div", class);
    let raw = doc.create_raw(picture);
    doc.append_child(wrapper, raw);
    doc.append_child(parent, wrapper);
}
