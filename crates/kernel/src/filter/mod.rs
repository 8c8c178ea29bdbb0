//! Client-side filtering of item elements.
//!
//! Filter definitions are parsed from authoring rows, each type builder
//! renders a control and subscribes to the block's event bus, and the engine
//! partitions the shared element pool into visible and `hidden` elements.
//!
//! - [`FilterDefinition`]: name, type, fields, decoration and current value
//! - [`apply_filters`]: the engine pass
//! - [`decorate_filters`]: builds every control and wires the engine

mod block;
pub mod builders;
mod definition;
mod engine;
mod query;

pub use block::{FilterHost, FilterLabels, FilterState, decorate_filters};
pub use builders::{SliderControl, SliderPhase};
pub use definition::{FilterConfigRow, FilterDefinition, FilterType, FilterValue, plain_text};
pub use engine::{apply_filters, element_matches, parse_number};
pub use query::events_from_query;
