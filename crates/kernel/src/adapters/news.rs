//! News listing: newest first, one card per article.

use std::cmp::Reverse;

use tracing::debug;

use super::{
    FORMATTED_DATE, append_picture, append_text, append_title, derive_picture, first_date,
    first_text, format_date,
};
use crate::dom::{Document, NodeId};
use crate::feed::Item;

const DATE_FIELDS: [&str; 3] = ["publishDate", "date", "lastModified"];

/// Attach display fields and sort newest first. Undated articles go last,
/// keeping their feed order.
pub fn prepare(items: &mut [Item]) {
    for item in items.iter_mut() {
        if let Some(date) = first_date(item, &DATE_FIELDS) {
            item.derive(FORMATTED_DATE, format_date(date));
        }
        derive_picture(item);
    }
    items.sort_by_key(|item| Reverse(first_date(item, &DATE_FIELDS)));
    debug!(items = items.len(), "news items prepared");
}

/// `<article class="news-card">` with image, date, linked title and
/// description.
pub fn render_card(doc: &mut Document, item: &Item) -> NodeId {
    let card = doc.create_element_with_class("article", "news-card");
    append_picture(doc, card, item, "news-card-image");

    let body = doc.create_element_with_class("div", "news-card-body");
    append_text(doc, body, "p", "news-card-date", item.derived(FORMATTED_DATE));
    append_title(doc, body, item);
    append_text(
        doc,
        body,
        "p",
        "news-card-description",
        first_text(item, &["description"]).as_deref(),
    );
    doc.append_child(card, body);
    card
}
