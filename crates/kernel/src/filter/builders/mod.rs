//! Per-type filter control builders.
//!
//! Each builder renders its control into the filter container and
//! subscribes one listener that updates the filter's value and requests a
//! filter pass.

mod checkbox;
mod dropdown;
mod slider;
mod text;

pub use checkbox::build_checkbox;
pub use dropdown::build_dropdown;
pub use slider::{SliderControl, SliderPhase, build_slider};
pub use text::build_text;

use std::collections::BTreeSet;

use super::definition::FilterDefinition;
use crate::dom::{Document, FieldMatch, NodeId, html_escape};
use crate::events::{BlockEvent, FilterInput};

/// Wrapper element shared by every control: `<tag class="filter filter-<type>">`.
fn filter_wrapper(doc: &mut Document, container: NodeId, def: &FilterDefinition, tag: &str) -> NodeId {
    let wrapper = doc.create_element(tag);
    doc.add_class(wrapper, "filter");
    doc.add_class(wrapper, &format!("filter-{}", def.filter_type));
    doc.set_attr(wrapper, "data-filter", &def.param_name());
    doc.append_child(container, wrapper);
    wrapper
}

/// Options for choice controls: the decoration fragments, or the distinct
/// values observed in the element pool when no decoration was authored.
fn choice_options(doc: &Document, index_root: NodeId, def: &FilterDefinition) -> Vec<(String, String)> {
    let declared = def.decoration_options();
    if !declared.is_empty() {
        return declared;
    }

    let field = def.primary_field().to_string();
    let observed: BTreeSet<String> = doc
        .elements_with_data(index_root, std::slice::from_ref(&field), FieldMatch::All)
        .into_iter()
        .filter_map(|el| doc.data(el, &field))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    observed
        .into_iter()
        .map(|v| {
            let label = html_escape(&v);
            (v, label)
        })
        .collect()
}

/// Committed input addressed to filter `name`.
fn committed_input<'a>(event: &'a BlockEvent, name: &str) -> Option<&'a FilterInput> {
    match event {
        BlockEvent::Change { filter, input } if filter == name => Some(input),
        _ => None,
    }
}

/// Format a slider number without trailing zeros.
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        let text = format!("{value:.2}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
