//! Checkbox filter: any number of options, matched with OR.

use std::collections::BTreeSet;

use tracing::debug;

use super::{choice_options, committed_input, filter_wrapper};
use crate::dom::{Document, NodeId};
use crate::events::{BlockEvent, EventBus, FilterInput};
use crate::filter::{FilterHost, FilterState, FilterValue};

/// Render a fieldset of checkboxes and subscribe its change listener.
pub fn build_checkbox<C>(
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

    let wrapper = filter_wrapper(doc, container, def, "fieldset");
    let legend = doc.create_element("legend");
    doc.set_text(legend, &name);
    doc.append_child(wrapper, legend);

    let mut inputs: Vec<(String, NodeId)> = Vec::new();
    for (value, label_html) in choice_options(doc, state.index_root, def) {
        let label = doc.create_element("label");
        let input = doc.create_element("input");
        doc.set_attr(input, "type", "checkbox");
        doc.set_attr(input, "name", &param);
        doc.set_attr(input, "value", &value);
        let text = doc.create_raw(&label_html);
        doc.append_child(label, input);
        doc.append_child(label, text);
        doc.append_child(wrapper, label);
        inputs.push((value, input));
    }

    if let Some(def) = state.filters.get_mut(index) {
        def.value = FilterValue::Many(BTreeSet::new());
    }

    bus.subscribe(&format!("checkbox:{name}"), move |ctx: &mut C, event, out| {
        let Some(FilterInput::Toggle { option, checked }) = committed_input(event, &name) else {
            return;
        };
        let Some((value, input)) = inputs.iter().find(|(v, _)| v == option) else {
            debug!(filter = %name, option = %option, "unknown checkbox option");
            return;
        };

        let (doc, state) = ctx.filter_parts();
        let Some(def) = state.filters.get_mut(index) else {
            return;
        };
        if !matches!(def.value, FilterValue::Many(_)) {
            def.value = FilterValue::Many(BTreeSet::new());
        }
        if let FilterValue::Many(selected) = &mut def.value {
            if *checked {
                selected.insert(value.clone());
            } else {
                selected.remove(value);
            }
        }

        if *checked {
            doc.set_attr(*input, "checked", "");
        } else {
            doc.remove_attr(*input, "checked");
        }
        out.emit(BlockEvent::RenderFilters);
    });
}
