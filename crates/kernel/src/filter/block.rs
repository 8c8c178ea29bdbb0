//! Filter block: builds the configured controls and wires the engine.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, warn};

use super::builders::{self, SliderControl};
use super::definition::{FilterConfigRow, FilterDefinition, FilterType, FilterValue};
use super::engine::apply_filters;
use crate::dom::{Document, NodeId};
use crate::events::{BlockEvent, EventBus, FilterInput};

/// Default slider decoration.
pub const DEFAULT_RANGE_LABEL: &str = "from {low} to {high}";

/// Localized strings used by the filter controls.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterLabels {
    /// Dropdown option that clears the selection.
    pub all: String,
    /// Slider decoration with `{low}` and `{high}` placeholders.
    pub range: String,
}

impl Default for FilterLabels {
    fn default() -> Self {
        Self {
            all: "All".to_string(),
            range: DEFAULT_RANGE_LABEL.to_string(),
        }
    }
}

/// Filter definitions plus the runtime state of their controls.
#[derive(Debug, Clone)]
pub struct FilterState {
    pub filters: Vec<FilterDefinition>,
    /// Root of the filterable element pool.
    pub index_root: NodeId,
    /// Slider controls keyed by filter name.
    pub sliders: BTreeMap<String, SliderControl>,
    pub labels: FilterLabels,
}

impl FilterState {
    pub fn new(index_root: NodeId) -> Self {
        Self {
            filters: Vec::new(),
            index_root,
            sliders: BTreeMap::new(),
            labels: FilterLabels::default(),
        }
    }

    pub fn with_labels(mut self, labels: FilterLabels) -> Self {
        self.labels = labels;
        self
    }

    pub fn filter(&self, name: &str) -> Option<&FilterDefinition> {
        self.filters.iter().find(|f| f.name == name)
    }

    pub fn slider(&self, name: &str) -> Option<&SliderControl> {
        self.sliders.get(name)
    }

    /// Drop every definition and control, keeping the pool and labels.
    pub fn reset(&mut self) {
        self.filters.clear();
        self.sliders.clear();
    }

    /// `Change` events that re-apply the current selections to freshly built
    /// controls. Sliders that were never committed are left out so they
    /// mount on the new bounds.
    pub fn selection_events(&self) -> Vec<BlockEvent> {
        let mut events = Vec::new();
        for def in &self.filters {
            let change = |input: FilterInput| BlockEvent::Change {
                filter: def.name.clone(),
                input,
            };
            match &def.value {
                FilterValue::Many(selected) => {
                    events.extend(selected.iter().map(|option| {
                        change(FilterInput::Toggle {
                            option: option.clone(),
                            checked: true,
                        })
                    }));
                }
                FilterValue::One(value) if !value.is_empty() => {
                    events.push(change(FilterInput::Value(value.clone())));
                }
                FilterValue::Range { low, high }
                    if self.slider(&def.name).is_some_and(|c| c.committed) =>
                {
                    events.push(change(FilterInput::Range {
                        low: *low,
                        high: *high,
                    }));
                }
                _ => {}
            }
        }
        events
    }
}

/// Context type that owns a document and a filter state.
///
/// Listeners registered by the builders reach both through this trait.
pub trait FilterHost {
    fn filter_parts(&mut self) -> (&mut Document, &mut FilterState);
}

/// Build every configured filter into `container` and subscribe the engine.
///
/// A missing container or an empty configuration means the block has no
/// filters: nothing is built and no listener is registered. Returns the
/// number of filters built.
pub fn decorate_filters<C>(
    ctx: &mut C,
    bus: &mut EventBus<C, BlockEvent>,
    container: Option<NodeId>,
    rows: &[FilterConfigRow],
) -> usize
where
    C: FilterHost + 'static,
{
    let Some(container) = container else {
        debug!("no filter container, filters disabled");
        return 0;
    };

    let mut seen = BTreeSet::new();
    let definitions: Vec<FilterDefinition> = rows
        .iter()
        .filter_map(FilterDefinition::from_config)
        .filter(|def| {
            let fresh = seen.insert(def.name.clone());
            if !fresh {
                warn!(filter = %def.name, "duplicate filter name, row skipped");
            }
            fresh
        })
        .collect();
    if definitions.is_empty() {
        debug!(rows = rows.len(), "no usable filter rows");
        return 0;
    }

    let count = definitions.len();
    for definition in definitions {
        let (doc, state) = ctx.filter_parts();
        let index = state.filters.len();
        let filter_type = definition.filter_type;
        state.filters.push(definition);

        match filter_type {
            FilterType::Checkbox => builders::build_checkbox(doc, state, container, index, bus),
            FilterType::Dropdown => builders::build_dropdown(doc, state, container, index, bus),
            FilterType::Slider => builders::build_slider(doc, state, container, index, bus),
            FilterType::Text => builders::build_text(doc, state, container, index, bus),
        }
    }

    bus.subscribe("filter-engine", |ctx: &mut C, event, _| {
        if *event == BlockEvent::RenderFilters {
            let (doc, state) = ctx.filter_parts();
            apply_filters(doc, state.index_root, &state.filters);
        }
    });

    info!(filters = count, "filters decorated");
    count
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::dom::HIDDEN_CLASS;
    use crate::events::FilterInput;
    use crate::filter::builders::test_support::{Host, host};

    #[test]
    fn missing_container_disables_filters() {
        let (mut host, _, _) = host(&[]);
        let mut bus: EventBus<Host, BlockEvent> = EventBus::new();
        let rows = vec![FilterConfigRow::new("Topic", "checkbox", "topic", "AI")];

        assert_eq!(decorate_filters(&mut host, &mut bus, None, &rows), 0);
        assert_eq!(bus.listener_count(), 0);
        assert!(host.state.filters.is_empty());
    }

    #[test]
    fn empty_configuration_registers_nothing() {
        let (mut host, container, _) = host(&[]);
        let mut bus: EventBus<Host, BlockEvent> = EventBus::new();

        assert_eq!(decorate_filters(&mut host, &mut bus, Some(container), &[]), 0);
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn change_event_runs_engine() {
        let (mut host, container, els) = host(&[
            &[("topic", "AI")],
            &[("topic", "Cloud")],
        ]);
        let mut bus: EventBus<Host, BlockEvent> = EventBus::new();
        let rows = vec![FilterConfigRow::new("Topic", "checkbox", "topic", "AI\nCloud")];

        assert_eq!(decorate_filters(&mut host, &mut bus, Some(container), &rows), 1);

        bus.dispatch(
            &mut host,
            BlockEvent::Change {
                filter: "Topic".to_string(),
                input: FilterInput::Toggle {
                    option: "Cloud".to_string(),
                    checked: true,
                },
            },
        );

        assert!(host.doc.has_class(els[0], HIDDEN_CLASS));
        assert!(!host.doc.has_class(els[1], HIDDEN_CLASS));
    }

    #[test]
    fn duplicate_names_keep_first_row() {
        let (mut host, container, els) = host(&[
            &[("topic", "AI"), ("region", "EMEA")],
            &[("topic", "Cloud"), ("region", "APAC")],
        ]);
        let mut bus: EventBus<Host, BlockEvent> = EventBus::new();
        let rows = vec![
            FilterConfigRow::new("Topic", "checkbox", "topic", "AI\nCloud"),
            FilterConfigRow::new("Topic", "dropdown", "region", ""),
        ];

        assert_eq!(decorate_filters(&mut host, &mut bus, Some(container), &rows), 1);
        assert_eq!(host.state.filters[0].filter_type, FilterType::Checkbox);

        bus.dispatch(
            &mut host,
            BlockEvent::Change {
                filter: "Topic".to_string(),
                input: FilterInput::Toggle {
                    option: "AI".to_string(),
                    checked: true,
                },
            },
        );
        assert!(!host.doc.has_class(els[0], HIDDEN_CLASS));
        assert!(host.doc.has_class(els[1], HIDDEN_CLASS));
    }

    #[test]
    fn selection_events_replay_committed_values() {
        let (mut host, container, _) = host(&[
            &[("topic", "AI"), ("kind", "Talk"), ("price", "10")],
            &[("topic", "Cloud"), ("kind", "Demo"), ("price", "40")],
        ]);
        let mut bus: EventBus<Host, BlockEvent> = EventBus::new();
        let rows = vec![
            FilterConfigRow::new("Topic", "checkbox", "topic", ""),
            FilterConfigRow::new("Kind", "dropdown", "kind", ""),
            FilterConfigRow::new("Price", "slider", "price", ""),
        ];
        decorate_filters(&mut host, &mut bus, Some(container), &rows);

        // Nothing chosen yet: the slider sits on its mount bounds.
        assert!(host.state.selection_events().is_empty());

        let change = |filter: &str, input| BlockEvent::Change {
            filter: filter.to_string(),
            input,
        };
        bus.dispatch(
            &mut host,
            change(
                "Topic",
                FilterInput::Toggle {
                    option: "Cloud".to_string(),
                    checked: true,
                },
            ),
        );
        bus.dispatch(&mut host, change("Kind", FilterInput::Value("Demo".to_string())));
        bus.dispatch(&mut host, change("Price", FilterInput::Range { low: 20.0, high: 40.0 }));

        assert_eq!(
            host.state.selection_events(),
            vec![
                change(
                    "Topic",
                    FilterInput::Toggle {
                        option: "Cloud".to_string(),
                        checked: true,
                    },
                ),
                change("Kind", FilterInput::Value("Demo".to_string())),
                change("Price", FilterInput::Range { low: 20.0, high: 40.0 }),
            ]
        );
    }
}
