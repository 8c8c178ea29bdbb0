//! Filter selections carried in a URL query string.

use url::form_urlencoded;

use super::definition::{FilterDefinition, FilterType};
use crate::events::{BlockEvent, FilterInput};

/// Translate `name=value` query pairs into committed filter events.
///
/// Checkbox values may repeat or be comma separated; slider values are
/// `low-high` or `low..high`. Pairs that name no filter are ignored.
pub fn events_from_query(filters: &[FilterDefinition], query: &str) -> Vec<BlockEvent> {
    let query = query.trim_start_matches('?');
    let mut events = Vec::new();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let key = key.to_lowercase();
        let Some(filter) = filters.iter().find(|f| f.param_name() == key) else {
            continue;
        };
        let change = |input| BlockEvent::Change {
            filter: filter.name.clone(),
            input,
        };

        match filter.filter_type {
            FilterType::Checkbox => {
                for option in value.split(',').map(str::trim).filter(|o| !o.is_empty()) {
                    events.push(change(FilterInput::Toggle {
                        option: option.to_string(),
                        checked: true,
                    }));
                }
            }
            FilterType::Dropdown | FilterType::Text => {
                events.push(change(FilterInput::Value(value.into_owned())));
            }
            FilterType::Slider => {
                if let Some((low, high)) = parse_range(&value) {
                    events.push(change(FilterInput::Range { low, high }));
                }
            }
        }
    }

    events
}

fn parse_range(value: &str) -> Option<(f64, f64)> {
    let value = value.trim();
    let (low, high) = match value.split_once("..") {
        Some(pair) => pair,
        None => {
            // Skip a leading sign so "-5-10" splits after the first number.
            let split = value.get(1..)?.find('-')? + 1;
            (&value[..split], &value[split + 1..])
        }
    };
    let low = low.trim().parse::<f64>().ok()?;
    let high = high.trim().parse::<f64>().ok()?;
    Some((low, high))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn filters() -> Vec<FilterDefinition> {
        vec![
            FilterDefinition::new("Topic", FilterType::Checkbox, &["topic"]),
            FilterDefinition::new("Event Type", FilterType::Dropdown, &["type"]),
            FilterDefinition::new("Price", FilterType::Slider, &["min", "max"]),
            FilterDefinition::new("Search", FilterType::Text, &["title"]),
        ]
    }

    #[test]
    fn checkbox_values_repeat_or_split() {
        let events = events_from_query(&filters(), "?topic=AI,Cloud&topic=Data&page=2");
        let options: Vec<String> = events
            .iter()
            .map(|e| match e {
                BlockEvent::Change {
                    input: FilterInput::Toggle { option, .. },
                    ..
                } => option.clone(),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(options, vec!["AI", "Cloud", "Data"]);
    }

    #[test]
    fn dropdown_text_and_slider() {
        let events = events_from_query(&filters(), "event-type=Webinar&price=10-50&search=rust+lang");
        assert_eq!(
            events,
            vec![
                BlockEvent::Change {
                    filter: "Event Type".to_string(),
                    input: FilterInput::Value("Webinar".to_string()),
                },
                BlockEvent::Change {
                    filter: "Price".to_string(),
                    input: FilterInput::Range {
                        low: 10.0,
                        high: 50.0
                    },
                },
                BlockEvent::Change {
                    filter: "Search".to_string(),
                    input: FilterInput::Value("rust lang".to_string()),
                },
            ]
        );
    }

    #[test]
    fn parses_ranges() {
        assert_eq!(parse_range("10-50"), Some((10.0, 50.0)));
        assert_eq!(parse_range("-5-10"), Some((-5.0, 10.0)));
        assert_eq!(parse_range("1.5..2.5"), Some((1.5, 2.5)));
        assert_eq!(parse_range("oops"), None);
        assert_eq!(parse_range(""), None);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        assert!(events_from_query(&filters(), "page=3&q=x").is_empty());
    }
}
