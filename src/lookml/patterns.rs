//! Line patterns recognized by the scanner.

use once_cell::sync::Lazy;
use regex::Regex;

/// `dimension: name {`, `dimension_group: name {`, `measure: name {`
pub(crate) static DECLARATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(dimension_group|dimension|measure):\s*(\w+)\s*\{").unwrap());

/// `case: {`
pub(crate) static CASE_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^case:\s*\{$").unwrap());

/// Any other nested block such as `link: {`.
pub(crate) static BLOCK_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\w+:\s*\{$").unwrap());

/// `timeframes: [` with the items on following lines.
pub(crate) static LIST_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\w+):\s*\[$").unwrap());

/// `timeframes: [raw, date]` on one line.
pub(crate) static INLINE_LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w+):\s*\[(.*)\]\s*(?:;;)?$").unwrap());

/// One item of a multi-line list.
pub(crate) static LIST_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^"?([\w.*]+)"?\s*,?$"#).unwrap());

/// `sql:` or `sql_<suffix>:` opening a statement.
pub(crate) static STATEMENT_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(sql(?:_\w+)?):\s*(.*)$").unwrap());

/// The statement prefix left on the first buffered line.
pub(crate) static STATEMENT_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^sql(?:_\w+)?:\s*").unwrap());

/// `key: value` with an optional terminator.
pub(crate) static PROPERTY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w+):\s*(.+?)(?:\s*;;)?$").unwrap());

/// Statement terminator with surrounding whitespace.
pub(crate) static TERMINATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*;;\s*$").unwrap());

/// Strip a trailing `;;` and surrounding whitespace.
pub(crate) fn strip_terminator(value: &str) -> String {
    TERMINATOR.replace(value, "").trim().to_string()
}

/// Strip one pair of surrounding double quotes.
pub(crate) fn unquote(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}
