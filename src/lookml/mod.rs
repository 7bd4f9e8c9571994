//! LookML source side: scanned field declarations.
//!
//! The scanner recognizes three declaration kinds inside a view body:
//!
//! - **dimension**: a single column or expression
//! - **dimension_group**: a time dimension expanded over timeframes
//! - **measure**: an aggregation
//!
//! # Example
//!
//! ```ignore
//! use lookml_omni::lookml;
//!
//! let objects = lookml::scan(r#"
//!     dimension: status {
//!       type: string
//!       sql: ${TABLE}.status ;;
//!     }
//! "#);
//! assert_eq!(objects[0].name, "status");
//! ```

pub(crate) mod patterns;
pub mod scanner;

pub use scanner::{scan, scan_with_diagnostics};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The declaration keyword that opened an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Dimension,
    DimensionGroup,
    Measure,
}

impl ObjectKind {
    /// The LookML keyword for this kind.
    pub fn keyword(&self) -> &'static str {
        match self {
            ObjectKind::Dimension => "dimension",
            ObjectKind::DimensionGroup => "dimension_group",
            ObjectKind::Measure => "measure",
        }
    }

    /// Parse a declaration keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "dimension" => Some(ObjectKind::Dimension),
            "dimension_group" => Some(ObjectKind::DimensionGroup),
            "measure" => Some(ObjectKind::Measure),
            _ => None,
        }
    }

    /// Dimensions and dimension groups share the dimension defaults.
    pub fn is_dimension_like(&self) -> bool {
        matches!(self, ObjectKind::Dimension | ObjectKind::DimensionGroup)
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A raw property value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Str(String),
    Bool(bool),
    List(Vec<String>),
}

impl Value {
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// `yes`/`true` in either scanned or string form.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Str(s) => matches!(s.as_str(), "yes" | "true"),
            Value::List(_) => false,
        }
    }

    /// Scalars become one-element lists.
    pub fn into_items(self) -> Vec<String> {
        match self {
            Value::Str(s) => vec![s],
            Value::Bool(b) => vec![b.to_string()],
            Value::List(items) => items,
        }
    }
}

/// One scanned declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceObject {
    pub kind: ObjectKind,
    pub name: String,
    /// Properties in the order they appeared.
    pub properties: IndexMap<String, Value>,
    /// 1-based line of the declaration.
    pub line: usize,
}

impl SourceObject {
    pub fn new(kind: ObjectKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            properties: IndexMap::new(),
            line: 0,
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

/// Result of scanning a LookML source.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Declarations in source order.
    pub objects: Vec<SourceObject>,
    /// Lines the scanner did not translate.
    pub diagnostics: Vec<Diagnostic>,
}

impl ScanResult {
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Warning)
    }
}

/// A note about a source line the scanner did not translate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// 1-based source line.
    pub line: usize,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    /// A line or value that was dropped unexpectedly.
    pub fn warning(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    /// Content skipped on purpose (case blocks, nested blocks).
    pub fn skipped(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            severity: Severity::Skipped,
            message: message.into(),
        }
    }
}

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Unrecognized or unterminated input.
    Warning,
    /// Recognized content that is not translated.
    Skipped,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Skipped => "skipped",
        };
        write!(f, "{}: {} (line {})", level, self.message, self.line)
    }
}
