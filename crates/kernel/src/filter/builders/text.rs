//! Free-text filter over one or more fields.

use super::{committed_input, filter_wrapper};
use crate::dom::{Document, NodeId};
use crate::events::{BlockEvent, EventBus, FilterInput};
use crate::filter::{FilterHost, FilterState, FilterValue, plain_text};

pub fn build_text<C>(
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

    let input = doc.create_element("input");
    doc.set_attr(input, "type", "search");
    doc.set_attr(input, "id", &id);
    doc.set_attr(input, "name", &param);
    if let Some(placeholder) = def.decoration.first() {
        doc.set_attr(input, "placeholder", &plain_text(placeholder));
    }
    doc.append_child(wrapper, input);

    bus.subscribe(&format!("text:{name}"), move |ctx: &mut C, event, out| {
        let Some(FilterInput::Value(term)) = committed_input(event, &name) else {
            return;
        };
        let term = term.trim();

        let (doc, state) = ctx.filter_parts();
        let Some(def) = state.filters.get_mut(index) else {
            return;
        };
        if term.is_empty() {
            def.value = FilterValue::Unset;
            doc.remove_attr(input, "value");
        } else {
            def.value = FilterValue::One(term.to_string());
            doc.set_attr(input, "value", term);
        }
        out.emit(BlockEvent::RenderFilters);
    });
}
