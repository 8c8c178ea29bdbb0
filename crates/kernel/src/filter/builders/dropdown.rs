//! Dropdown filter: a single selected value.

use super::{choice_options, committed_input, filter_wrapper};
use crate::dom::{Document, NodeId};
use crate::events::{BlockEvent, EventBus, FilterInput};
use crate::filter::{FilterHost, FilterState, FilterValue, plain_text};

/// Render a labelled `<select>` and subscribe its change listener.
///
/// The first option clears the selection.
pub fn build_dropdown<C>(
    doc: &mut Document,
    state: &mut FilterState,
    container: NodeId,
    index: usize,
    bus: &mut EventBus<C, BlockEvent>,
) where
    C: FilterHost + 'static,
{
    let Some(def) = state.filters.get(index) else {
        return;
    };
    let name = def.name.clone();
    let param = def.param_name();
    let id = format!("filter-{param}");

    let wrapper = filter_wrapper(doc, container, def, "div");
    let label = doc.create_element("label");
    doc.set_attr(label, "for", &id);
    doc.set_text(label, &name);
    doc.append_child(wrapper, label);

    let select = doc.create_element("select");
    doc.set_attr(select, "id", &id);
    doc.set_attr(select, "name", &param);
    doc.append_child(wrapper, select);

    let mut options: Vec<(String, NodeId)> = Vec::new();
    let all = doc.create_element("option");
    doc.set_attr(all, "value", "");
    doc.set_attr(all, "selected", "");
    doc.set_text(all, &state.labels.all);
    doc.append_child(select, all);
    options.push((String::new(), all));

    for (value, label_html) in choice_options(doc, state.index_root, def) {
        let option = doc.create_element("option");
        doc.set_attr(option, "value", &value);
        doc.set_text(option, &plain_text(&label_html));
        doc.append_child(select, option);
        options.push((value, option));
    }

    bus.subscribe(&format!("dropdown:{name}"), move |ctx: &mut C, event, out| {
        let Some(FilterInput::Value(selected)) = committed_input(event, &name) else {
            return;
        };
        let selected = selected.trim();

        let (doc, state) = ctx.filter_parts();
        let Some(def) = state.filters.get_mut(index) else {
            return;
        };
        def.value = if selected.is_empty() {
            FilterValue::Unset
        } else {
            FilterValue::One(selected.to_string())
        };

        for (value, option) in &options {
            if value == selected {
                doc.set_attr(*option, "selected", "");
            } else {
                doc.remove_attr(*option, "selected");
            }
        }
        out.emit(BlockEvent::RenderFilters);
    });
}
