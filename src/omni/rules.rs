//! Property rule table.
//!
//! Each LookML property key maps to one effect. Keys without an entry pass
//! through to the Omni record unchanged.

/// The effect a source property has on the output record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyRule {
    /// Column reference rewrite, handled before every other rule.
    Sql,
    /// Emit `target: true` when truthy, nothing otherwise.
    BooleanFlag { target: &'static str },
    /// Look up `value_format_name` in [`VALUE_FORMATS`].
    FormatLookup,
    /// `type`, interpreted per object kind.
    KindType,
    /// Strip the terminator and store under a new key.
    RenameTerminated { target: &'static str },
    /// Remove wildcard entries; omit the key when nothing is left.
    WildcardFilteredList,
    /// Normalize a scalar or list into a list under `target`.
    CollectList { target: &'static str },
    /// Never emitted.
    Drop,
}

/// Source key to rule.
pub static PROPERTY_RULES: &[(&str, PropertyRule)] = &[
    ("sql", PropertyRule::Sql),
    ("hidden", PropertyRule::BooleanFlag { target: "hidden" }),
    (
        "primary_key",
        PropertyRule::BooleanFlag {
            target: "primary_key",
        },
    ),
    ("value_format_name", PropertyRule::FormatLookup),
    ("type", PropertyRule::KindType),
    (
        "sql_distinct_key",
        PropertyRule::RenameTerminated {
            target: "custom_primary_key_sql",
        },
    ),
    ("drill_fields", PropertyRule::WildcardFilteredList),
    ("alias", PropertyRule::CollectList { target: "aliases" }),
    ("aliases", PropertyRule::CollectList { target: "aliases" }),
    ("link", PropertyRule::CollectList { target: "links" }),
    ("links", PropertyRule::CollectList { target: "links" }),
    ("case", PropertyRule::Drop),
];

/// LookML `value_format_name` to Omni `format`.
pub static VALUE_FORMATS: &[(&str, &str)] = &[
    ("decimal_0", "NUMBER_0"),
    ("decimal_1", "NUMBER_1"),
    ("decimal_2", "NUMBER_2"),
    ("percent_0", "PERCENT_0"),
    ("percent_1", "PERCENT_1"),
    ("percent_2", "PERCENT_2"),
    ("usd", "CURRENCY"),
    ("eur", "EURCURRENCY"),
    ("gbp", "GBPCURRENCY"),
];

/// LookML measure `type` to Omni `aggregate_type`.
pub static AGGREGATE_TYPES: &[(&str, &str)] = &[
    ("count", "count"),
    ("count_distinct", "count_distinct"),
    ("sum", "sum"),
    ("average", "avg"),
    ("avg", "avg"),
    ("max", "max"),
    ("min", "min"),
    ("median", "median"),
    ("sum_distinct", "sum_distinct_on"),
    ("list", "list"),
];

/// Measure type that marks a calculated measure.
pub const CALCULATED_MEASURE_TYPE: &str = "number";

/// Aggregate assumed for measures that declare no type.
pub const DEFAULT_AGGREGATE: &str = "sum";

/// Marker of a drill set reference in `drill_fields`.
pub const WILDCARD: char = '*';

/// Find the rule for a source key.
pub fn rule_for(key: &str) -> Option<PropertyRule> {
    PROPERTY_RULES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, rule)| *rule)
}

/// Map a `value_format_name`; unknown names pass through upper-cased.
pub fn value_format(name: &str) -> String {
    VALUE_FORMATS
        .iter()
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.to_string())
        .unwrap_or_else(|| name.to_uppercase())
}

/// Map a measure type to its aggregate, if it has one.
pub fn aggregate_type(measure_type: &str) -> Option<&'static str> {
    AGGREGATE_TYPES
        .iter()
        .find(|(k, _)| *k == measure_type)
        .map(|(_, v)| *v)
}
