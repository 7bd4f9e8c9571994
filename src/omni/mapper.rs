//! Property mapping from LookML objects to Omni records.
//!
//! Mapping runs in a fixed order per object:
//!
//! 1. `sql` column references are rewritten to quoted bare columns
//! 2. every other property goes through the [rule table](super::rules)
//! 3. missing labels, descriptions, group labels and aggregates are synthesized
//! 4. dimension groups are cut down to the fields Omni supports on them
//! 5. name rewrite rules are applied

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::rewrite::{resolve_name, NameRewrite};
use super::rules::{self, PropertyRule};
use super::OutputRecord;
use crate::lookml::patterns::strip_terminator;
use crate::lookml::{ObjectKind, SourceObject, Value};

/// `${TABLE}.col`, `${TABLE}."col"`, optionally wrapped in quotes.
static TABLE_COLUMN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^"?\$\{TABLE\}\."?(\w+)"?"?$"#).unwrap());

/// Fields a dimension group keeps under [`DimensionGroupFields::Restricted`].
pub const DIMENSION_GROUP_FIELDS: &[&str] = &["sql", "group_label", "label", "description"];

/// Measure name prefixes that name their aggregate, e.g. `sum_revenue`.
const AGGREGATE_PREFIXES: &[&str] = &["sum", "count", "avg", "max", "min"];

const DEFAULT_DIMENSION_GROUP_LABEL: &str = "Dimensions";
const DEFAULT_MEASURE_GROUP_LABEL: &str = "Measures";
const BUSINESS_FACING_TAG: &str = "business_facing";

/// How a falsy or absent `hidden` is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HiddenPolicy {
    /// Emit nothing.
    #[default]
    Omit,
    /// Tag visible dimensions with `business_facing`.
    BusinessFacingTag,
}

/// How a missing description is synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptionStyle {
    /// The label itself.
    #[default]
    Label,
    /// `Description for <label>`.
    DescriptionFor,
}

/// Which properties a dimension group keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionGroupFields {
    /// Only [`DIMENSION_GROUP_FIELDS`].
    #[default]
    Restricted,
    /// Everything the rules produced, including `timeframes`.
    All,
}

/// Policies for the mapping step.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MapperOptions {
    pub hidden_policy: HiddenPolicy,
    pub description_style: DescriptionStyle,
    pub dimension_group_fields: DimensionGroupFields,
    /// Output name overrides, first match wins.
    #[serde(rename = "rename")]
    pub rewrites: Vec<NameRewrite>,
}

impl MapperOptions {
    pub fn with_hidden_policy(mut self, policy: HiddenPolicy) -> Self {
        self.hidden_policy = policy;
        self
    }

    pub fn with_description_style(mut self, style: DescriptionStyle) -> Self {
        self.description_style = style;
        self
    }

    pub fn with_dimension_group_fields(mut self, fields: DimensionGroupFields) -> Self {
        self.dimension_group_fields = fields;
        self
    }

    pub fn with_rewrite(mut self, rewrite: NameRewrite) -> Self {
        self.rewrites.push(rewrite);
        self
    }
}

/// Map one scanned object to its Omni record.
pub fn map_object(object: &SourceObject, options: &MapperOptions) -> OutputRecord {
    let mut record = OutputRecord::new(object.kind, &object.name);

    if let Some(sql) = object.get("sql") {
        record.set("sql", map_sql(sql));
    }

    let type_format = apply_rules(object, &mut record);
    if let Some(format) = type_format {
        if !record.contains("format") {
            record.set("format", Value::str(format));
        }
    }

    if object.kind.is_dimension_like() {
        apply_dimension_defaults(object, &mut record, options);
    } else {
        apply_measure_defaults(object, &mut record);
    }

    if object.kind == ObjectKind::DimensionGroup
        && options.dimension_group_fields == DimensionGroupFields::Restricted
    {
        record
            .properties
            .retain(|key, _| DIMENSION_GROUP_FIELDS.contains(&key.as_str()));
    }

    let label = record.get_str("label").unwrap_or_default();
    if let Some(name) = resolve_name(&options.rewrites, object.kind, &object.name, label) {
        tracing::debug!(from = %object.name, to = name, "renamed record");
        record.name = name.to_string();
    }

    tracing::trace!(
        kind = object.kind.keyword(),
        name = %record.name,
        properties = record.properties.len(),
        "mapped object"
    );
    record
}

/// Rewrite a simple `${TABLE}` column reference to `"column"`.
///
/// Anything more complex keeps its expression with the terminator removed.
pub fn map_sql(value: &Value) -> Value {
    let Some(sql) = value.as_str() else {
        return value.clone();
    };
    let sql = strip_terminator(sql);
    match TABLE_COLUMN.captures(&sql) {
        Some(caps) => Value::Str(format!("\"{}\"", &caps[1])),
        None => Value::Str(sql),
    }
}

/// Apply the rule table. Returns the format implied by a dimension `type`.
fn apply_rules(object: &SourceObject, record: &mut OutputRecord) -> Option<&'static str> {
    let mut type_format = None;

    for (key, value) in &object.properties {
        match rules::rule_for(key) {
            Some(PropertyRule::Sql) | Some(PropertyRule::Drop) => {}
            Some(PropertyRule::BooleanFlag { target }) => {
                if value.is_truthy() {
                    record.set(target, Value::Bool(true));
                }
            }
            Some(PropertyRule::FormatLookup) => match value {
                Value::Str(name) => record.set("format", Value::Str(rules::value_format(name))),
                other => record.set("format", other.clone()),
            },
            Some(PropertyRule::KindType) => {
                if let Some(kind_type) = value.as_str() {
                    type_format = apply_type(object, kind_type, record);
                }
            }
            Some(PropertyRule::RenameTerminated { target }) => match value {
                Value::Str(s) => record.set(target, Value::Str(strip_terminator(s))),
                other => record.set(target, other.clone()),
            },
            Some(PropertyRule::WildcardFilteredList) => {
                let fields: Vec<String> = value
                    .clone()
                    .into_items()
                    .into_iter()
                    .filter(|field| !field.contains(rules::WILDCARD))
                    .collect();
                if !fields.is_empty() {
                    record.set(key, Value::List(fields));
                }
            }
            Some(PropertyRule::CollectList { target }) => {
                let mut items = match record.properties.shift_remove(target) {
                    Some(existing) => existing.into_items(),
                    None => Vec::new(),
                };
                items.extend(value.clone().into_items());
                record.set(target, Value::List(items));
            }
            None => record.set(key, value.clone()),
        }
    }

    type_format
}

/// Interpret `type` for the object's kind.
fn apply_type(
    object: &SourceObject,
    kind_type: &str,
    record: &mut OutputRecord,
) -> Option<&'static str> {
    match object.kind {
        ObjectKind::Measure => {
            match rules::aggregate_type(kind_type) {
                Some(aggregate) => record.set("aggregate_type", Value::str(aggregate)),
                None if kind_type == rules::CALCULATED_MEASURE_TYPE => {}
                None => tracing::debug!(
                    measure = %object.name,
                    "measure type {} has no aggregate", kind_type
                ),
            }
            None
        }
        ObjectKind::Dimension | ObjectKind::DimensionGroup => match kind_type {
            "string" if object.name.ends_with("_id") => Some("ID"),
            "number" => Some("NUMBER"),
            _ => None,
        },
    }
}

fn apply_dimension_defaults(
    object: &SourceObject,
    record: &mut OutputRecord,
    options: &MapperOptions,
) {
    let label = ensure_label(object, record);

    if !has_text(record, "group_label") {
        let group_label = match object.kind {
            ObjectKind::DimensionGroup => title_case(&object.name),
            _ => match object.name.split_once('_') {
                Some((first, _)) if !first.is_empty() => capitalize(first),
                _ => DEFAULT_DIMENSION_GROUP_LABEL.to_string(),
            },
        };
        record.set("group_label", Value::Str(group_label));
    }

    if !has_text(record, "description") {
        let description = match options.description_style {
            DescriptionStyle::Label => label,
            DescriptionStyle::DescriptionFor => format!("Description for {}", label),
        };
        record.set("description", Value::Str(description));
    }

    if options.hidden_policy == HiddenPolicy::BusinessFacingTag
        && !record.contains("hidden")
        && !record.contains("tags")
    {
        record.set("tags", Value::list([BUSINESS_FACING_TAG]));
    }
}

fn apply_measure_defaults(object: &SourceObject, record: &mut OutputRecord) {
    if !record.contains("aggregate_type") && object.get("type").is_none() {
        record.set("aggregate_type", Value::str(rules::DEFAULT_AGGREGATE));
    }

    ensure_label(object, record);

    if !has_text(record, "group_label") {
        let group_label = match object.name.split_once('_') {
            Some((prefix, rest)) if AGGREGATE_PREFIXES.contains(&prefix) && !rest.is_empty() => {
                title_case(rest)
            }
            _ => DEFAULT_MEASURE_GROUP_LABEL.to_string(),
        };
        record.set("group_label", Value::Str(group_label));
    }
}

/// Make sure the record carries a non-empty label and return it.
fn ensure_label(object: &SourceObject, record: &mut OutputRecord) -> String {
    if let Some(label) = record.get_str("label").filter(|l| !l.trim().is_empty()) {
        return label.to_string();
    }
    let label = title_case(&object.name);
    record.set("label", Value::Str(label.clone()));
    label
}

fn has_text(record: &OutputRecord, key: &str) -> bool {
    match record.get(key) {
        Some(Value::Str(s)) => !s.trim().is_empty(),
        Some(_) => true,
        None => false,
    }
}

/// `order_created_at` -> `Order Created At`.
pub fn title_case(name: &str) -> String {
    let words: Vec<String> = name
        .split('_')
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect();
    if words.is_empty() {
        name.to_string()
    } else {
        words.join(" ")
    }
}

/// Upper-case the first character, lower-case the rest.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
