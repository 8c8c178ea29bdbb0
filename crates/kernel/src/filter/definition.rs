//! Filter definitions and their authoring rows.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::warn;

#[allow(clippy::unwrap_used)]
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Control and predicate kind of a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    Checkbox,
    Dropdown,
    Slider,
    Text,
}

impl FromStr for FilterType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "checkbox" | "checkboxes" => Ok(Self::Checkbox),
            "dropdown" | "select" => Ok(Self::Dropdown),
            "slider" | "range" => Ok(Self::Slider),
            "text" | "search" => Ok(Self::Text),
            other => Err(format!("unknown filter type '{other}'")),
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Checkbox => "checkbox",
            Self::Dropdown => "dropdown",
            Self::Slider => "slider",
            Self::Text => "text",
        };
        f.write_str(name)
    }
}

/// Current selection of a filter.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FilterValue {
    #[default]
    Unset,
    One(String),
    Many(BTreeSet<String>),
    Range { low: f64, high: f64 },
}

impl FilterValue {
    /// True when the filter imposes no constraint.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Unset => true,
            Self::One(v) => v.is_empty(),
            Self::Many(set) => set.is_empty(),
            Self::Range { .. } => false,
        }
    }
}

/// One row of the filter authoring table.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfigRow {
    pub name: String,
    pub filter_type: String,
    /// Comma-separated attribute names.
    pub filter_fields: String,
    /// Newline-separated HTML fragments.
    pub decoration: String,
}

impl FilterConfigRow {
    pub fn new(name: &str, filter_type: &str, filter_fields: &str, decoration: &str) -> Self {
        Self {
            name: name.to_string(),
            filter_type: filter_type.to_string(),
            filter_fields: filter_fields.to_string(),
            decoration: decoration.to_string(),
        }
    }

    /// Read a sheet row. Column names are matched ignoring case, spaces,
    /// dashes and underscores, so `Filter Type` and `filterType` both work.
    pub fn from_row(row: &Map<String, Value>) -> Option<Self> {
        let lookup = |wanted: &str| -> String {
            row.iter()
                .find(|(k, _)| normalize_column(k) == wanted)
                .and_then(|(_, v)| match v {
                    Value::String(s) => Some(s.clone()),
                    Value::Null => None,
                    other => Some(other.to_string()),
                })
                .unwrap_or_default()
        };

        let name = lookup("name");
        if name.trim().is_empty() {
            return None;
        }
        Some(Self {
            name,
            filter_type: lookup("filtertype"),
            filter_fields: lookup("filterfields"),
            decoration: lookup("decoration"),
        })
    }
}

fn normalize_column(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// A configured filter and its current selection.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterDefinition {
    pub name: String,
    pub filter_type: FilterType,
    /// One attribute name, or a min/max pair for sliders.
    pub filter_fields: Vec<String>,
    /// Sanitized HTML fragments.
    pub decoration: Vec<String>,
    pub value: FilterValue,
}

impl FilterDefinition {
    pub fn new(name: &str, filter_type: FilterType, fields: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            filter_type,
            filter_fields: fields.iter().map(|f| f.to_string()).collect(),
            decoration: Vec::new(),
            value: FilterValue::Unset,
        }
    }

    pub fn with_decoration(mut self, fragments: &[&str]) -> Self {
        self.decoration = fragments.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn with_value(mut self, value: FilterValue) -> Self {
        self.value = value;
        self
    }

    /// Build a definition from an authoring row.
    ///
    /// Rows with an unknown type or no fields are skipped.
    pub fn from_config(row: &FilterConfigRow) -> Option<Self> {
        let filter_type = match row.filter_type.parse::<FilterType>() {
            Ok(t) => t,
            Err(e) => {
                warn!(filter = %row.name, error = %e, "skipping filter");
                return None;
            }
        };

        let filter_fields: Vec<String> = row
            .filter_fields
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect();
        if filter_fields.is_empty() {
            warn!(filter = %row.name, "skipping filter without fields");
            return None;
        }

        let decoration = row
            .decoration
            .lines()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(ammonia::clean)
            .collect();

        Some(Self {
            name: row.name.trim().to_string(),
            filter_type,
            filter_fields,
            decoration,
            value: FilterValue::Unset,
        })
    }

    /// Field consulted by single-field predicates.
    pub fn primary_field(&self) -> &str {
        self.filter_fields.first().map(String::as_str).unwrap_or("")
    }

    /// Query-string parameter name for this filter.
    pub fn param_name(&self) -> String {
        self.name.trim().to_lowercase().replace(' ', "-")
    }

    /// Options declared by the decoration: `(value, label html)`.
    pub fn decoration_options(&self) -> Vec<(String, String)> {
        self.decoration
            .iter()
            .map(|fragment| (plain_text(fragment), fragment.clone()))
            .filter(|(value, _)| !value.is_empty())
            .collect()
    }
}

/// Text content of an HTML fragment.
pub fn plain_text(html: &str) -> String {
    TAG_RE
        .replace_all(html, "")
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}
