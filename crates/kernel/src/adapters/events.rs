//! Event listing: upcoming or past events relative to a given day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    FORMATTED_DATE, append_picture, append_text, append_title, derive_picture, first_date,
    first_text, format_date_range,
};
use crate::dom::{Document, NodeId};
use crate::feed::Item;

const START_FIELDS: [&str; 2] = ["startDate", "date"];
const END_FIELDS: [&str; 1] = ["endDate"];

/// Which events a listing shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventsMode {
    /// Events that have not ended, soonest first.
    #[default]
    Upcoming,
    /// Events that have ended, most recent first.
    Past,
    /// Every event, soonest first; undated events last.
    All,
}

fn event_span(item: &Item) -> Option<(NaiveDate, NaiveDate)> {
    let start = first_date(item, &START_FIELDS)?;
    let end = first_date(item, &END_FIELDS).filter(|end| *end >= start).unwrap_or(start);
    Some((start, end))
}

/// Keep the events `mode` selects as of `today`, order them and attach
/// display fields.
///
/// Undated events only appear in [`EventsMode::All`].
pub fn prepare(items: Vec<Item>, today: NaiveDate, mode: EventsMode) -> Vec<Item> {
    let loaded = items.len();
    let mut kept: Vec<(Option<(NaiveDate, NaiveDate)>, Item)> = items
        .into_iter()
        .map(|item| (event_span(&item), item))
        .filter(|(span, _)| match (mode, span) {
            (EventsMode::All, _) => true,
            (EventsMode::Upcoming, Some((_, end))) => *end >= today,
            (EventsMode::Past, Some((_, end))) => *end < today,
            (_, None) => false,
        })
        .collect();

    match mode {
        EventsMode::Past => kept.sort_by(|a, b| b.0.cmp(&a.0)),
        EventsMode::Upcoming | EventsMode::All => {
            kept.sort_by_key(|(span, _)| (span.is_none(), *span));
        }
    }

    let items: Vec<Item> = kept
        .into_iter()
        .map(|(span, mut item)| {
            if let Some((start, end)) = span {
                item.derive(FORMATTED_DATE, format_date_range(start, end));
            }
            derive_picture(&mut item);
            item
        })
        .collect();

    debug!(loaded, kept = items.len(), ?mode, %today, "event items prepared");
    items
}

/// `<article class="event-card">` with image, date range, type, linked
/// title, location and description.
pub fn render_card(doc: &mut Document, item: &Item) -> NodeId {
    let card = doc.create_element_with_class("article", "event-card");
    append_picture(doc, card, item, "event-card-image");

    let body = doc.create_element_with_class("div", "event-card-body");
    append_text(doc, body, "p", "event-card-date", item.derived(FORMATTED_DATE));
    append_text(
        doc,
        body,
        "p",
        "event-card-type",
        first_text(item, &["eventType", "type"]).as_deref(),
    );
    append_title(doc, body, item);
    append_text(
        doc,
        body,
        "p",
        "event-card-location",
        first_text(item, &["location"]).as_deref(),
    );
    append_text(
        doc,
        body,
        "p",
        "event-card-description",
        first_text(item, &["description"]).as_deref(),
    );
    doc.append_child(card, body);
    card
}
