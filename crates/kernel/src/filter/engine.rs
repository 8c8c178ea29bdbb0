//! Filter engine.
//!
//! Partitions the elements under a root into visible and hidden. Every filter
//! can only add to the hidden set, so definition order does not change the
//! result; an element hidden by an earlier filter is not evaluated again.

use tracing::debug;

use super::definition::{FilterDefinition, FilterType, FilterValue};
use crate::dom::{Document, FieldMatch, HIDDEN_CLASS, NodeId};

/// Run every filter over the elements under `root`.
pub fn apply_filters(doc: &mut Document, root: NodeId, filters: &[FilterDefinition]) {
    let mut all_fields: Vec<String> = Vec::new();
    for filter in filters {
        for field in &filter.filter_fields {
            if !all_fields.contains(field) {
                all_fields.push(field.clone());
            }
        }
    }

    let reset = if filters.is_empty() {
        doc.descendants(root)
    } else {
        doc.elements_with_data(root, &all_fields, FieldMatch::Any)
    };
    for el in reset {
        doc.remove_class(el, HIDDEN_CLASS);
    }

    for filter in filters {
        let mut hidden = 0usize;
        for el in doc.elements_with_data(root, &filter.filter_fields, FieldMatch::All) {
            if doc.has_class(el, HIDDEN_CLASS) {
                continue;
            }
            if !element_matches(filter, doc, el) {
                doc.add_class(el, HIDDEN_CLASS);
                hidden += 1;
            }
        }
        debug!(filter = %filter.name, kind = %filter.filter_type, hidden, "filter applied");
    }
}

/// Whether `filter` accepts element `el`.
pub fn element_matches(filter: &FilterDefinition, doc: &Document, el: NodeId) -> bool {
    match filter.filter_type {
        FilterType::Checkbox => {
            let value = doc.data(el, filter.primary_field()).unwrap_or("");
            match &filter.value {
                FilterValue::Many(selected) => selected.is_empty() || selected.contains(value),
                FilterValue::One(selected) => selected.is_empty() || selected == value,
                _ => true,
            }
        }
        FilterType::Dropdown => {
            let value = doc.data(el, filter.primary_field()).unwrap_or("");
            match &filter.value {
                FilterValue::One(selected) => {
                    selected.is_empty() || value.is_empty() || selected == value
                }
                _ => true,
            }
        }
        FilterType::Slider => {
            let FilterValue::Range { low, high } = &filter.value else {
                return true;
            };
            let (min, max) = element_range(filter, doc, el);
            // Comparisons with NaN are false, so malformed ranges never match.
            *low <= max && *high >= min
        }
        FilterType::Text => {
            let FilterValue::One(needle) = &filter.value else {
                return true;
            };
            let needle = needle.trim().to_lowercase();
            needle.is_empty()
                || filter.filter_fields.iter().any(|field| {
                    doc.data(el, field)
                        .is_some_and(|v| v.to_lowercase().contains(&needle))
                })
        }
    }
}

/// Numeric range carried by an element: first field is the minimum, second
/// (if any) the maximum.
fn element_range(filter: &FilterDefinition, doc: &Document, el: NodeId) -> (f64, f64) {
    let min = parse_number(doc.data(el, filter.primary_field()));
    let max = match filter.filter_fields.get(1) {
        Some(field) => parse_number(doc.data(el, field)),
        None => min,
    };
    (min, max)
}

/// Parse an attribute as a number; missing or malformed values are NaN.
pub fn parse_number(value: Option<&str>) -> f64 {
    value
        .map(|v| v.trim().replace(',', ""))
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn pool(values: &[&[(&str, &str)]]) -> (Document, NodeId, Vec<NodeId>) {
        let mut doc = Document::new();
        let root = doc.create_element("ul");
        let mut els = Vec::new();
        for attrs in values {
            let el = doc.create_element("li");
            for (field, value) in *attrs {
                doc.set_data(el, field, value);
            }
            doc.append_child(root, el);
            els.push(el);
        }
        (doc, root, els)
    }

    fn hidden(doc: &Document, els: &[NodeId]) -> Vec<bool> {
        els.iter().map(|el| doc.has_class(*el, HIDDEN_CLASS)).collect()
    }

    fn many(values: &[&str]) -> FilterValue {
        FilterValue::Many(values.iter().map(|v| v.to_string()).collect::<BTreeSet<_>>())
    }

    #[test]
    fn zero_filters_show_everything() {
        let (mut doc, root, els) = pool(&[&[("topic", "ai")], &[("topic", "cloud")]]);
        doc.add_class(els[0], HIDDEN_CLASS);

        apply_filters(&mut doc, root, &[]);
        assert_eq!(hidden(&doc, &els), vec![false, false]);

        doc.add_class(els[1], HIDDEN_CLASS);
        let topic = FilterDefinition::new("Topic", FilterType::Checkbox, &["topic"]);
        apply_filters(&mut doc, root, &[topic]);
        assert_eq!(hidden(&doc, &els), vec![false, false]);
    }

    #[test]
    fn checkbox_is_or_within_and_across_filters() {
        let (mut doc, root, els) = pool(&[
            &[("topic", "ai"), ("region", "emea")],
            &[("topic", "cloud"), ("region", "emea")],
            &[("topic", "data"), ("region", "emea")],
            &[("topic", "ai"), ("region", "apac")],
        ]);
        let topic = FilterDefinition::new("Topic", FilterType::Checkbox, &["topic"])
            .with_value(many(&["ai", "cloud"]));
        let region = FilterDefinition::new("Region", FilterType::Checkbox, &["region"])
            .with_value(many(&["emea"]));

        apply_filters(&mut doc, root, &[topic, region]);

        assert_eq!(hidden(&doc, &els), vec![false, false, true, true]);
    }

    #[test]
    fn empty_checkbox_selection_matches_everything() {
        let (mut doc, root, els) = pool(&[&[("topic", "ai")], &[("topic", "")]]);
        let topic =
            FilterDefinition::new("Topic", FilterType::Checkbox, &["topic"]).with_value(many(&[]));

        apply_filters(&mut doc, root, &[topic]);

        assert_eq!(hidden(&doc, &els), vec![false, false]);
    }

    #[test]
    fn dropdown_select_then_clear_restores_visibility() {
        let (mut doc, root, els) = pool(&[
            &[("region", "emea")],
            &[("region", "apac")],
            &[("region", "")],
        ]);
        let mut region = FilterDefinition::new("Region", FilterType::Dropdown, &["region"])
            .with_value(FilterValue::One("emea".to_string()));

        apply_filters(&mut doc, root, std::slice::from_ref(&region));
        assert_eq!(hidden(&doc, &els), vec![false, true, false]);

        region.value = FilterValue::One(String::new());
        apply_filters(&mut doc, root, std::slice::from_ref(&region));
        assert_eq!(hidden(&doc, &els), vec![false, false, false]);
    }

    #[test]
    fn slider_matches_overlapping_ranges() {
        let (mut doc, root, els) = pool(&[
            &[("min", "0"), ("max", "20")],
            &[("min", "60"), ("max", "100")],
            &[("min", "50"), ("max", "55")],
        ]);
        let price = FilterDefinition::new("Price", FilterType::Slider, &["min", "max"])
            .with_value(FilterValue::Range {
                low: 10.0,
                high: 50.0,
            });

        apply_filters(&mut doc, root, &[price]);

        assert_eq!(hidden(&doc, &els), vec![false, true, false]);
    }

    #[test]
    fn slider_rejects_malformed_numbers() {
        let (mut doc, root, els) = pool(&[
            &[("min", "abc"), ("max", "20")],
            &[("min", "5"), ("max", "")],
            &[("min", "1,000"), ("max", "2,000")],
        ]);
        let price = FilterDefinition::new("Price", FilterType::Slider, &["min", "max"])
            .with_value(FilterValue::Range {
                low: 0.0,
                high: 5000.0,
            });

        apply_filters(&mut doc, root, &[price]);

        assert_eq!(hidden(&doc, &els), vec![true, true, false]);
    }

    #[test]
    fn single_field_slider_uses_point_range() {
        let (mut doc, root, els) = pool(&[&[("year", "2019")], &[("year", "2024")]]);
        let year = FilterDefinition::new("Year", FilterType::Slider, &["year"]).with_value(
            FilterValue::Range {
                low: 2020.0,
                high: 2025.0,
            },
        );

        apply_filters(&mut doc, root, &[year]);

        assert_eq!(hidden(&doc, &els), vec![true, false]);
    }

    #[test]
    fn text_filter_is_case_insensitive_substring() {
        let (mut doc, root, els) = pool(&[
            &[("title", "Rust at Scale"), ("description", "")],
            &[("title", "Other"), ("description", "mentions rust")],
            &[("title", "Nothing"), ("description", "here")],
        ]);
        let search = FilterDefinition::new("Search", FilterType::Text, &["title", "description"])
            .with_value(FilterValue::One("RUST".to_string()));

        apply_filters(&mut doc, root, &[search]);

        assert_eq!(hidden(&doc, &els), vec![false, false, true]);
    }

    #[test]
    fn order_of_filters_does_not_change_result() {
        let rows: &[&[(&str, &str)]] = &[
            &[("topic", "ai"), ("region", "emea")],
            &[("topic", "cloud"), ("region", "apac")],
            &[("topic", "ai"), ("region", "apac")],
        ];
        let topic = FilterDefinition::new("Topic", FilterType::Checkbox, &["topic"])
            .with_value(many(&["ai"]));
        let region = FilterDefinition::new("Region", FilterType::Dropdown, &["region"])
            .with_value(FilterValue::One("apac".to_string()));

        let (mut a, root_a, els_a) = pool(rows);
        apply_filters(&mut a, root_a, &[topic.clone(), region.clone()]);
        let (mut b, root_b, els_b) = pool(rows);
        apply_filters(&mut b, root_b, &[region, topic]);

        assert_eq!(hidden(&a, &els_a), hidden(&b, &els_b));
        assert_eq!(hidden(&a, &els_a), vec![true, true, false]);
    }

    #[test]
    fn elements_without_filter_fields_are_untouched() {
        let (mut doc, root, els) = pool(&[&[("topic", "cloud")], &[("other", "x")]]);
        doc.add_class(els[1], HIDDEN_CLASS);
        let topic = FilterDefinition::new("Topic", FilterType::Checkbox, &["topic"])
            .with_value(many(&["ai"]));

        apply_filters(&mut doc, root, &[topic]);

        assert_eq!(hidden(&doc, &els), vec![true, true]);
    }

    #[test]
    fn parse_number_handles_garbage() {
        assert_eq!(parse_number(Some(" 42 ")), 42.0);
        assert_eq!(parse_number(Some("1,500.5")), 1500.5);
        assert!(parse_number(Some("n/a")).is_nan());
        assert!(parse_number(None).is_nan());
    }
}
