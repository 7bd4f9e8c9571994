//! YAML formatting utilities for Omni view emission.
//!
//! Provides scalar quoting and indentation management.

use once_cell::sync::Lazy;
use regex::Regex;

/// Plain scalars YAML would read as booleans or null.
const YAML_RESERVED: &[&str] = &[
    "true", "false", "yes", "no", "on", "off", "y", "n", "null", "~",
];

/// Integer and special float forms YAML resolves to numbers.
static YAML_NUMERIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[-+]?(?:0x[0-9a-f_]+|0o[0-7_]+|0b[01_]+|\.inf|\.nan|[0-9][0-9_]*)$").unwrap()
});

/// Characters that cannot start a plain scalar.
const YAML_INDICATORS: &[char] = &[
    '-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%', '@', '`',
];

/// Check if a string can be written as a plain YAML scalar.
///
/// Conservative: anything that might change meaning when parsed back is
/// reported as needing quotes.
#[must_use]
pub fn is_plain_safe(s: &str) -> bool {
    if s.is_empty() || s.trim() != s || s.chars().any(char::is_control) {
        return false;
    }
    if YAML_RESERVED.contains(&s.to_ascii_lowercase().as_str()) || is_numeric(s) {
        return false;
    }
    if s.starts_with(YAML_INDICATORS) {
        return false;
    }
    !(s.contains(": ") || s.contains(" #") || s.ends_with(':'))
}

/// True when a plain scalar would be read back as a number.
fn is_numeric(s: &str) -> bool {
    YAML_NUMERIC.is_match(s) || s.parse::<f64>().is_ok()
}

/// Quote a string with single quotes, doubling embedded quotes.
#[must_use]
pub fn quote_single(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Write a scalar plainly when safe, single-quoted otherwise.
#[must_use]
pub fn scalar(s: &str) -> String {
    if is_plain_safe(s) {
        s.to_string()
    } else {
        quote_single(s)
    }
}

/// A writer that manages indentation for YAML output.
pub struct IndentWriter {
    buffer: String,
    indent_str: String,
    current_indent: usize,
}

impl IndentWriter {
    /// Create a writer indenting by `width` spaces per level.
    #[must_use]
    pub fn new(width: usize) -> Self {
        Self {
            buffer: String::new(),
            indent_str: " ".repeat(width),
            current_indent: 0,
        }
    }

    /// Increase indentation level.
    pub fn indent(&mut self) {
        self.current_indent += 1;
    }

    /// Decrease indentation level.
    pub fn dedent(&mut self) {
        self.current_indent = self.current_indent.saturating_sub(1);
    }

    /// Write a complete line at the current indentation.
    pub fn write_line(&mut self, s: &str) {
        for _ in 0..self.current_indent {
            self.buffer.push_str(&self.indent_str);
        }
        self.buffer.push_str(s);
        self.buffer.push('\n');
    }

    /// Write an empty line (no indentation).
    pub fn blank_line(&mut self) {
        self.buffer.push('\n');
    }

    /// Run `f` one level deeper.
    pub fn nested<F: FnOnce(&mut Self)>(&mut self, f: F) {
        self.indent();
        f(self);
        self.dedent();
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Consume the writer and return the output.
    #[must_use]
    pub fn finish(self) -> String {
        self.buffer
    }
}
