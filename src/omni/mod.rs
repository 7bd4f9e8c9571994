//! Omni target side: mapped field records and their YAML rendering.
//!
//! ```text
//! SourceObject ──[mapper + rules]──▶ OutputRecord ──[OmniView]──▶ render ──▶ YAML
//! ```

pub mod format;
pub mod mapper;
pub mod render;
pub mod rewrite;
pub mod rules;

pub use mapper::{
    map_object, map_sql, DescriptionStyle, DimensionGroupFields, HiddenPolicy, MapperOptions,
};
pub use render::{render, RenderOptions};
pub use rewrite::NameRewrite;

use indexmap::IndexMap;
use serde::Serialize;

use crate::lookml::{ObjectKind, SourceObject, Value};

/// Top-level group a record is rendered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputGroup {
    Dimensions,
    Measures,
}

impl OutputGroup {
    pub fn for_kind(kind: ObjectKind) -> Self {
        if kind.is_dimension_like() {
            OutputGroup::Dimensions
        } else {
            OutputGroup::Measures
        }
    }

    /// The YAML header line, without the colon.
    pub fn header(&self) -> &'static str {
        match self {
            OutputGroup::Dimensions => "dimensions",
            OutputGroup::Measures => "measures",
        }
    }
}

/// One mapped Omni field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRecord {
    pub group: OutputGroup,
    /// The LookML kind the record came from.
    pub kind: ObjectKind,
    pub name: String,
    pub properties: IndexMap<String, Value>,
}

impl OutputRecord {
    pub fn new(kind: ObjectKind, name: impl Into<String>) -> Self {
        Self {
            group: OutputGroup::for_kind(kind),
            kind,
            name: name.into(),
            properties: IndexMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub(crate) fn set(&mut self, key: &str, value: Value) {
        self.properties.insert(key.to_string(), value);
    }
}

/// All mapped records of one conversion, in first-seen order per kind.
///
/// A record re-declared under the same name and kind replaces the earlier one
/// but keeps its position. Names are unique per output group.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OmniView {
    pub dimensions: IndexMap<String, OutputRecord>,
    pub dimension_groups: IndexMap<String, OutputRecord>,
    pub measures: IndexMap<String, OutputRecord>,
}

impl OmniView {
    /// Map every scanned object into a view.
    pub fn from_objects(objects: &[SourceObject], options: &MapperOptions) -> Self {
        let mut view = OmniView::default();
        for object in objects {
            view.insert(map_object(object, options));
        }
        view
    }

    /// Add a record, replacing any record of the same output group and name.
    ///
    /// Dimensions and dimension groups share the `dimensions:` mapping, so a
    /// dimension group replaces a same-named dimension and vice versa.
    pub fn insert(&mut self, record: OutputRecord) {
        let (map, sibling) = match record.kind {
            ObjectKind::Dimension => (&mut self.dimensions, Some(&mut self.dimension_groups)),
            ObjectKind::DimensionGroup => (&mut self.dimension_groups, Some(&mut self.dimensions)),
            ObjectKind::Measure => (&mut self.measures, None),
        };
        if let Some(replaced) = sibling.and_then(|other| other.shift_remove(&record.name)) {
            tracing::debug!(
                name = %record.name,
                replaced = replaced.kind.keyword(),
                "record replaces a same-named record"
            );
        }
        map.insert(record.name.clone(), record);
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty() && self.dimension_groups.is_empty() && self.measures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dimensions.len() + self.dimension_groups.len() + self.measures.len()
    }

    /// Records of the `dimensions` group: plain dimensions, then dimension groups.
    pub fn dimension_records(&self) -> impl Iterator<Item = &OutputRecord> {
        self.dimensions.values().chain(self.dimension_groups.values())
    }

    pub fn measure_records(&self) -> impl Iterator<Item = &OutputRecord> {
        self.measures.values()
    }

    /// Look up a record by output name across all groups.
    pub fn get(&self, name: &str) -> Option<&OutputRecord> {
        self.dimensions
            .get(name)
            .or_else(|| self.dimension_groups.get(name))
            .or_else(|| self.measures.get(name))
    }
}
