//! Omni YAML rendering.
//!
//! Output has up to two top-level groups, `dimensions:` then `measures:`.
//! Each record is a name header followed by its properties in
//! [`PROPERTY_ORDER`], then any other keys in the order they were produced.

use serde::{Deserialize, Serialize};

use super::format::{is_plain_safe, quote_single, scalar, IndentWriter};
use super::{OmniView, OutputGroup, OutputRecord};
use crate::lookml::Value;

/// Canonical property order within a record.
pub const PROPERTY_ORDER: &[&str] = &[
    "sql",
    "label",
    "group_label",
    "description",
    "format",
    "aggregate_type",
    "custom_primary_key_sql",
    "hidden",
    "primary_key",
    "ignored",
    "aliases",
    "tags",
    "links",
    "drill_fields",
    "drill_queries",
    "filters",
    "display_order",
    "view_label",
    "suggest_from_field",
    "suggestion_list",
    "order_by_field",
    "required_access_grants",
    "timeframes",
    "convert_tz",
    "groups",
    "bin_boundaries",
    "filter_single_select_only",
];

/// Lists rendered one item per line.
const BLOCK_LISTS: &[&str] = &["timeframes"];

/// Layout settings for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Spaces per indentation level.
    pub indent_width: usize,
    /// Descriptions longer than this render as `|` block literals.
    pub block_description_threshold: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent_width: 2,
            block_description_threshold: 60,
        }
    }
}

/// Render a mapped view to Omni YAML. An empty view renders as `""`.
pub fn render(view: &OmniView, options: &RenderOptions) -> String {
    let mut w = IndentWriter::new(options.indent_width.max(1));

    let groups: [(OutputGroup, Vec<&OutputRecord>); 2] = [
        (OutputGroup::Dimensions, view.dimension_records().collect()),
        (OutputGroup::Measures, view.measure_records().collect()),
    ];

    for (group, records) in groups {
        if records.is_empty() {
            continue;
        }
        if !w.is_empty() {
            w.blank_line();
        }
        w.write_line(&format!("{}:", group.header()));
        w.nested(|w| {
            for (i, record) in records.iter().enumerate() {
                if i > 0 {
                    w.blank_line();
                }
                render_record(w, record, options);
            }
        });
    }

    w.finish()
}

fn render_record(w: &mut IndentWriter, record: &OutputRecord, options: &RenderOptions) {
    w.write_line(&format!("{}:", scalar(&record.name)));
    w.nested(|w| {
        for (key, value) in ordered_properties(record) {
            render_property(w, key, value, options);
        }
    });
}

/// Properties in canonical order, then everything else as produced.
pub fn ordered_properties(record: &OutputRecord) -> Vec<(&str, &Value)> {
    let known = PROPERTY_ORDER
        .iter()
        .filter_map(|key| record.get(key).map(|value| (*key, value)));
    let rest = record
        .properties
        .iter()
        .filter(|(key, _)| !PROPERTY_ORDER.contains(&key.as_str()))
        .map(|(key, value)| (key.as_str(), value));
    known.chain(rest).collect()
}

fn render_property(w: &mut IndentWriter, key: &str, value: &Value, options: &RenderOptions) {
    match value {
        Value::Bool(b) => w.write_line(&format!("{}: {}", key, b)),
        Value::List(items) if BLOCK_LISTS.contains(&key) => {
            w.write_line(&format!("{}:", key));
            w.nested(|w| {
                w.write_line("[");
                w.nested(|w| {
                    for (i, item) in items.iter().enumerate() {
                        let suffix = if i + 1 < items.len() { "," } else { "" };
                        w.write_line(&format!("{}{}", flow_item(item), suffix));
                    }
                });
                w.write_line("]");
            });
        }
        Value::List(items) if items.is_empty() => w.write_line(&format!("{}: []", key)),
        Value::List(items) => {
            let items: Vec<String> = items.iter().map(|item| flow_item(item)).collect();
            w.write_line(&format!("{}: [ {} ]", key, items.join(", ")));
        }
        Value::Str(s)
            if key == "description"
                && s.chars().count() > options.block_description_threshold
                && s.trim() == s
                && !s.contains('\n') =>
        {
            w.write_line(&format!("{}: |", key));
            w.nested(|w| w.write_line(s));
        }
        Value::Str(s) => w.write_line(&format!("{}: {}", key, scalar(s))),
    }
}

/// An item inside a `[ ... ]` flow sequence.
fn flow_item(item: &str) -> String {
    let flow_safe = !item.contains([',', '[', ']', '{', '}']);
    if flow_safe && is_plain_safe(item) {
        item.to_string()
    } else {
        quote_single(item)
    }
}
