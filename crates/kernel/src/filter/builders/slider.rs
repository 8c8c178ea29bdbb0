//! Numeric range slider.
//!
//! Moving a handle only refreshes the decoration text; the filter pass runs
//! when the handle is released, since re-filtering on every movement would
//! walk the whole element pool for each frame.

use tracing::debug;

use super::{filter_wrapper, format_number};
use crate::dom::{Document, FieldMatch, NodeId};
use crate::events::{BlockEvent, EventBus, FilterInput};
use crate::filter::{FilterHost, FilterState, FilterValue, parse_number, plain_text};

/// Lifecycle of a slider control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderPhase {
    /// No numeric bounds available yet; movement is ignored.
    Uninitialized,
    /// Bounds known, handles at their initial position.
    Ready,
    /// Handles moved since the last commit.
    Dragging,
    /// Last movement was committed to the filter.
    Committed,
}

/// Runtime state of one slider.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderControl {
    pub phase: SliderPhase,
    pub min: f64,
    pub max: f64,
    pub low: f64,
    pub high: f64,
    /// Set once a position has been committed.
    pub committed: bool,
    /// Decoration template with `{low}` and `{high}` placeholders.
    pub template: String,
}

impl SliderControl {
    pub fn new(template: &str) -> Self {
        Self {
            phase: SliderPhase::Uninitialized,
            min: 0.0,
            max: 0.0,
            low: 0.0,
            high: 0.0,
            committed: false,
            template: template.to_string(),
        }
    }

    /// Set the bounds and move to `Ready`. Non-finite or inverted bounds leave
    /// the slider uninitialized.
    pub fn mount(&mut self, min: f64, max: f64) -> bool {
        if !min.is_finite() || !max.is_finite() || min > max {
            return false;
        }
        self.min = min;
        self.max = max;
        self.low = min;
        self.high = max;
        self.committed = false;
        self.phase = SliderPhase::Ready;
        true
    }

    /// Move the handles. Returns false when the movement was ignored.
    pub fn drag(&mut self, low: f64, high: f64) -> bool {
        if self.phase == SliderPhase::Uninitialized || !low.is_finite() || !high.is_finite() {
            return false;
        }
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        self.low = low.clamp(self.min, self.max);
        self.high = high.clamp(self.min, self.max);
        self.phase = SliderPhase::Dragging;
        true
    }

    /// Commit the current position.
    pub fn commit(&mut self) -> Option<(f64, f64)> {
        if self.phase == SliderPhase::Uninitialized {
            return None;
        }
        self.phase = SliderPhase::Committed;
        self.committed = true;
        Some((self.low, self.high))
    }

    /// Decoration text for the current position.
    pub fn decoration(&self) -> String {
        self.template
            .replace("{low}", &format_number(self.low))
            .replace("{high}", &format_number(self.high))
    }
}

/// Bounds observed across every element carrying the filter's fields.
fn observed_bounds(doc: &Document, state: &FilterState, fields: &[String]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for el in doc.elements_with_data(state.index_root, fields, FieldMatch::All) {
        let lo = parse_number(fields.first().and_then(|f| doc.data(el, f)));
        let hi = match fields.get(1) {
            Some(field) => parse_number(doc.data(el, field)),
            None => lo,
        };
        if lo.is_finite() {
            min = min.min(lo);
        }
        if hi.is_finite() {
            max = max.max(hi);
        }
    }
    (min, max)
}

/// Render the slider, mount it on the observed bounds and subscribe its
/// `Input` (live) and `Change` (commit) listener.
pub fn build_slider<C>(
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
    let template = def
        .decoration
        .first()
        .map(|d| plain_text(d))
        .unwrap_or_else(|| state.labels.range.clone());
    let fields = def.filter_fields.clone();

    let wrapper = filter_wrapper(doc, container, def, "div");
    let title = doc.create_element_with_class("p", "filter-title");
    doc.set_text(title, &name);
    doc.append_child(wrapper, title);

    let track = doc.create_element_with_class("div", "slider");
    doc.append_child(wrapper, track);
    let low_input = range_input(doc, track, &param, "low");
    let high_input = range_input(doc, track, &param, "high");
    let decoration = doc.create_element_with_class("p", "slider-decoration");
    doc.append_child(wrapper, decoration);

    let mut control = SliderControl::new(&template);
    let (min, max) = observed_bounds(doc, state, &fields);
    if control.mount(min, max) {
        doc.set_data(track, "min", &format_number(min));
        doc.set_data(track, "max", &format_number(max));
        for input in [low_input, high_input] {
            doc.set_attr(input, "min", &format_number(min));
            doc.set_attr(input, "max", &format_number(max));
        }
        sync_controls(doc, &control, low_input, high_input, decoration);
        if let Some(def) = state.filters.get_mut(index) {
            def.value = FilterValue::Range { low: min, high: max };
        }
    } else {
        debug!(filter = %name, "no numeric values, slider left uninitialized");
        doc.add_class(wrapper, "filter-disabled");
        doc.set_attr(low_input, "disabled", "");
        doc.set_attr(high_input, "disabled", "");
    }
    state.sliders.insert(name.clone(), control);

    bus.subscribe(&format!("slider:{name}"), move |ctx: &mut C, event, out| {
        let (input, commit) = match event {
            BlockEvent::Input { filter, input } if *filter == name => (input, false),
            BlockEvent::Change { filter, input } if *filter == name => (input, true),
            _ => return,
        };

        let (doc, state) = ctx.filter_parts();
        let Some(control) = state.sliders.get_mut(&name) else {
            return;
        };
        if control.phase == SliderPhase::Uninitialized {
            debug!(filter = %name, "slider not ready");
            return;
        }

        match input {
            FilterInput::Range { low, high } => {
                if !control.drag(*low, *high) {
                    debug!(filter = %name, "slider movement ignored");
                    return;
                }
            }
            FilterInput::Release if commit => {}
            _ => return,
        }
        sync_controls(doc, control, low_input, high_input, decoration);

        if !commit {
            return;
        }
        let Some((low, high)) = control.commit() else {
            return;
        };
        if let Some(def) = state.filters.get_mut(index) {
            def.value = FilterValue::Range { low, high };
        }
        out.emit(BlockEvent::RenderFilters);
    });
}

fn range_input(doc: &mut Document, track: NodeId, param: &str, handle: &str) -> NodeId {
    let input = doc.create_element_with_class("input", &format!("slider-{handle}"));
    doc.set_attr(input, "type", "range");
    doc.set_attr(input, "name", &format!("{param}-{handle}"));
    doc.append_child(track, input);
    input
}

fn sync_controls(
    doc: &mut Document,
    control: &SliderControl,
    low_input: NodeId,
    high_input: NodeId,
    decoration: NodeId,
) {
    doc.set_attr(low_input, "value", &format_number(control.low));
    doc.set_attr(high_input, "value", &format_number(control.high));
    doc.set_text(decoration, &control.decoration());
}
