//! # lookml-omni
//!
//! Converts LookML field declarations into Omni view YAML.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    LookML source text                    │
//! │        (dimensions, dimension groups, measures)          │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [lookml::scan]
//! ┌─────────────────────────────────────────────────────────┐
//! │              SourceObject (kind, name, props)            │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [omni::mapper + rule table]
//! ┌─────────────────────────────────────────────────────────┐
//! │              OmniView (dimensions, measures)             │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [omni::render]
//! ┌─────────────────────────────────────────────────────────┐
//! │                       Omni YAML                          │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod convert;
pub mod fallback;
pub mod lookml;
pub mod omni;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::convert::{convert, convert_with_fallback, ConvertError, ConvertOptions};
    pub use crate::fallback::{CommandProvider, FallbackProvider, FallbackRequest};
    pub use crate::lookml::{scan, scan_with_diagnostics, ObjectKind, SourceObject, Value};
    pub use crate::omni::{
        map_object, render, DescriptionStyle, DimensionGroupFields, HiddenPolicy, MapperOptions,
        NameRewrite, OmniView, OutputGroup, OutputRecord, RenderOptions,
    };
}

pub use convert::{convert, ConvertOptions, ConvertOutput};
pub use lookml::{scan, SourceObject};
pub use omni::{render, OmniView};
