//! End-to-end conversion from LookML to Omni YAML.
//!
//! ```text
//! LookML Source → Scan → SourceObjects → Map → OmniView → Render → YAML
//! ```
//!
//! # Example
//!
//! ```ignore
//! use lookml_omni::convert::{convert, ConvertOptions};
//!
//! let lookml = r#"
//!     measure: total_revenue {
//!       type: sum
//!       sql: ${TABLE}.revenue ;;
//!     }
//! "#;
//!
//! let output = convert(lookml, &ConvertOptions::default());
//! println!("{}", output.yaml);
//! ```

use crate::fallback::{FallbackError, FallbackProvider, FallbackRequest};
use crate::lookml::{self, Diagnostic, SourceObject};
use crate::omni::{self, MapperOptions, OmniView, RenderOptions};

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur when a conversion has to fall back.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("No dimensions or measures recognized in input")]
    EmptyOutput,

    #[error("Fallback error: {0}")]
    Fallback(#[from] FallbackError),
}

pub type ConvertResult<T> = Result<T, ConvertError>;

// ============================================================================
// Options
// ============================================================================

/// Options for conversion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvertOptions {
    /// Property mapping policies.
    pub mapper: MapperOptions,
    /// YAML layout.
    pub render: RenderOptions,
    /// Report skipped lines in [`ConvertOutput::warnings`].
    pub strict: bool,
}

impl ConvertOptions {
    pub fn with_mapper(mut self, mapper: MapperOptions) -> Self {
        self.mapper = mapper;
        self
    }

    pub fn with_render(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

// ============================================================================
// Result Types
// ============================================================================

/// Result of converting a LookML source.
#[derive(Debug, Clone)]
pub struct ConvertOutput {
    /// The rendered Omni YAML. Empty when nothing was recognized.
    pub yaml: String,

    /// The scanned declarations.
    pub objects: Vec<SourceObject>,

    /// The mapped view.
    pub view: OmniView,

    /// Skipped lines, only collected in strict mode.
    pub warnings: Vec<Diagnostic>,
}

impl ConvertOutput {
    /// True when no declaration was recognized.
    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }
}

/// Where the final YAML came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Converter,
    Fallback,
}

/// Result of [`convert_with_fallback`].
#[derive(Debug, Clone)]
pub struct ResolvedOutput {
    pub yaml: String,
    pub origin: Origin,
    pub warnings: Vec<Diagnostic>,
}

// ============================================================================
// Conversion
// ============================================================================

/// Convert LookML text to Omni YAML.
///
/// Never fails: unrecognized lines are skipped. Check
/// [`ConvertOutput::is_empty`] for input that held no declarations.
pub fn convert(source: &str, options: &ConvertOptions) -> ConvertOutput {
    let scanned = lookml::scan_with_diagnostics(source);
    for diagnostic in &scanned.diagnostics {
        tracing::debug!("{}", diagnostic);
    }

    let view = OmniView::from_objects(&scanned.objects, &options.mapper);
    let yaml = omni::render(&view, &options.render);

    let warnings = if options.strict {
        scanned.diagnostics
    } else {
        Vec::new()
    };

    ConvertOutput {
        yaml,
        objects: scanned.objects,
        view,
        warnings,
    }
}

/// Convert, substituting the fallback's answer when nothing was recognized.
///
/// Returns [`ConvertError::EmptyOutput`] when the fallback has no answer either.
pub fn convert_with_fallback(
    source: &str,
    options: &ConvertOptions,
    fallback: &dyn FallbackProvider,
) -> ConvertResult<ResolvedOutput> {
    let output = convert(source, options);
    if !output.is_empty() {
        return Ok(ResolvedOutput {
            yaml: output.yaml,
            origin: Origin::Converter,
            warnings: output.warnings,
        });
    }

    let reason = ConvertError::EmptyOutput.to_string();
    tracing::debug!("converter output empty, asking fallback");
    let request = FallbackRequest::new(source).with_prior_error(&reason);
    match fallback.complete(&request)? {
        Some(yaml) => Ok(ResolvedOutput {
            yaml,
            origin: Origin::Fallback,
            warnings: output.warnings,
        }),
        None => Err(ConvertError::EmptyOutput),
    }
}
