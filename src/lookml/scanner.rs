//! Line scanner for LookML field declarations.
//!
//! The scanner is a single pass over trimmed lines with one active context at
//! a time:
//!
//! ```text
//! top level ──decl──▶ properties ──case: {──▶ block skip (depth counted)
//!                         │  ▲
//!                         │  └──── `}` at depth 0 / `]` / `;;` ────┐
//!                         ├──key: [──▶ list collection ─────────────┤
//!                         └──sql: …──▶ statement continuation ──────┘
//! ```
//!
//! The object's own closing `}` returns to the top level, where view-level
//! blocks (`filter:`, `parameter:`, `set:`) are skipped.
//!
//! Unrecognized lines never fail the scan; they are recorded as diagnostics
//! and skipped.

use super::patterns::{
    strip_terminator, unquote, BLOCK_OPEN, CASE_OPEN, DECLARATION, INLINE_LIST, LIST_ITEM,
    LIST_OPEN, PROPERTY, STATEMENT_OPEN, STATEMENT_PREFIX,
};
use super::{Diagnostic, ObjectKind, ScanResult, SourceObject, Value};

const TERMINATOR: &str = ";;";

/// Scan LookML text into declarations, discarding diagnostics.
pub fn scan(text: &str) -> Vec<SourceObject> {
    scan_with_diagnostics(text).objects
}

/// Scan LookML text into declarations and report every skipped line.
pub fn scan_with_diagnostics(text: &str) -> ScanResult {
    let mut scanner = Scanner::default();
    for (index, line) in text.lines().enumerate() {
        scanner.feed(index + 1, line);
    }
    scanner.finish()
}

/// The context the next line is interpreted in.
#[derive(Debug, Default)]
enum Context {
    #[default]
    Properties,
    /// Inside `case: {` or another nested block.
    BlockSkip { depth: usize },
    /// Inside `key: [` waiting for `]`.
    List { key: String, items: Vec<String> },
    /// Inside a `sql:` value waiting for `;;`.
    Statement {
        key: String,
        lines: Vec<String>,
        start: usize,
    },
}

#[derive(Debug, Default)]
struct Scanner {
    current: Option<SourceObject>,
    context: Context,
    result: ScanResult,
}

impl Scanner {
    fn feed(&mut self, line_no: usize, line: &str) {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return;
        }

        if let Some(caps) = DECLARATION.captures(trimmed) {
            self.finalize();
            // The pattern only admits the three keywords.
            if let Some(kind) = ObjectKind::from_keyword(&caps[1]) {
                let mut object = SourceObject::new(kind, &caps[2]);
                object.line = line_no;
                self.current = Some(object);
            }
            let rest = trimmed[caps.get(0).map_or(trimmed.len(), |m| m.end())..].trim();
            self.declaration_rest(line_no, rest);
            return;
        }

        if self.current.is_none() {
            self.result.diagnostics.push(Diagnostic::skipped(
                line_no,
                format!("outside a field declaration: {}", trimmed),
            ));
            return;
        }

        match std::mem::take(&mut self.context) {
            Context::Properties => self.property_line(line_no, trimmed),
            Context::BlockSkip { depth } => self.block_line(trimmed, depth),
            Context::List { key, items } => self.list_line(line_no, trimmed, key, items),
            Context::Statement { key, lines, start } => {
                self.statement_line(trimmed, key, lines, start)
            }
        }
    }

    /// Text after `name {` on the declaration line, e.g. `measure: n { type: count }`.
    fn declaration_rest(&mut self, line_no: usize, rest: &str) {
        match rest.strip_suffix('}') {
            Some(body) if !opens_block(body) => {
                let body = body.trim();
                if !body.is_empty() {
                    self.property_line(line_no, body);
                }
                self.finalize();
            }
            _ if !rest.is_empty() => self.property_line(line_no, rest),
            _ => {}
        }
    }

    fn property_line(&mut self, line_no: usize, trimmed: &str) {
        if trimmed == "}" {
            // The object's own closing brace ends it.
            self.finalize();
            return;
        }

        if CASE_OPEN.is_match(trimmed) {
            self.result
                .diagnostics
                .push(Diagnostic::skipped(line_no, "case block is not translated"));
            self.context = Context::BlockSkip { depth: 1 };
            return;
        }

        if let Some(caps) = LIST_OPEN.captures(trimmed) {
            self.context = Context::List {
                key: caps[1].to_string(),
                items: Vec::new(),
            };
            return;
        }

        if let Some(caps) = INLINE_LIST.captures(trimmed) {
            let items = split_items(&caps[2]);
            self.insert(&caps[1], Value::List(items));
            return;
        }

        if let Some(caps) = STATEMENT_OPEN.captures(trimmed) {
            let key = caps[1].to_string();
            let value = caps[2].trim();
            if value.ends_with(TERMINATOR) {
                self.insert(&key, Value::Str(strip_terminator(value)));
            } else {
                self.context = Context::Statement {
                    lines: vec![format!("{}: {}", key, value)],
                    key,
                    start: line_no,
                };
            }
            return;
        }

        if BLOCK_OPEN.is_match(trimmed) {
            self.result.diagnostics.push(Diagnostic::skipped(
                line_no,
                format!("nested block is not translated: {}", trimmed),
            ));
            self.context = Context::BlockSkip { depth: 1 };
            return;
        }

        if let Some(caps) = PROPERTY.captures(trimmed) {
            let value = parse_scalar(&caps[2]);
            self.insert(&caps[1], value);
            return;
        }

        tracing::debug!(line = line_no, "skipping unrecognized line: {}", trimmed);
        self.result.diagnostics.push(Diagnostic::warning(
            line_no,
            format!("unrecognized line: {}", trimmed),
        ));
    }

    fn block_line(&mut self, trimmed: &str, depth: usize) {
        let depth = if trimmed == "}" {
            depth - 1
        } else if opens_block(trimmed) {
            depth + 1
        } else {
            depth
        };

        if depth > 0 {
            self.context = Context::BlockSkip { depth };
        }
    }

    fn list_line(&mut self, line_no: usize, trimmed: &str, key: String, mut items: Vec<String>) {
        let (body, closes) = match trimmed.trim_end_matches(',').strip_suffix(']') {
            Some(body) => (body, true),
            None if trimmed == "}" => ("", true),
            None => (trimmed, false),
        };

        for piece in body.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match LIST_ITEM.captures(piece) {
                Some(caps) => items.push(caps[1].to_string()),
                None => self.result.diagnostics.push(Diagnostic::warning(
                    line_no,
                    format!("unrecognized {} item: {}", key, piece),
                )),
            }
        }

        if closes {
            self.insert(&key, Value::List(items));
            if trimmed == "}" {
                // An unclosed list runs into the object's own brace.
                self.finalize();
            }
        } else {
            self.context = Context::List { key, items };
        }
    }

    fn statement_line(&mut self, trimmed: &str, key: String, mut lines: Vec<String>, start: usize) {
        lines.push(trimmed.to_string());
        if !trimmed.ends_with(TERMINATOR) {
            self.context = Context::Statement { key, lines, start };
            return;
        }

        let joined = lines
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let value = strip_terminator(&joined);
        let value = STATEMENT_PREFIX.replace(&value, "").trim().to_string();
        self.insert(&key, Value::Str(value));
    }

    fn insert(&mut self, key: &str, value: Value) {
        if let Some(object) = self.current.as_mut() {
            object.properties.insert(key.to_string(), value);
        }
    }

    fn finalize(&mut self) {
        if let Context::Statement { key, start, .. } = std::mem::take(&mut self.context) {
            self.result.diagnostics.push(Diagnostic::warning(
                start,
                format!("unterminated {} statement discarded", key),
            ));
        }

        if let Some(object) = self.current.take() {
            tracing::trace!(
                kind = object.kind.keyword(),
                name = %object.name,
                properties = object.properties.len(),
                "scanned object"
            );
            self.result.objects.push(object);
        }
    }

    fn finish(mut self) -> ScanResult {
        self.finalize();
        self.result
    }
}

/// Convert a property's raw text into a value.
fn parse_scalar(raw: &str) -> Value {
    let value = strip_terminator(raw);
    let value = unquote(&value);
    match value {
        "yes" | "true" => Value::Bool(true),
        "no" | "false" => Value::Bool(false),
        other => Value::Str(other.to_string()),
    }
}

/// A line opens a nested block when it has more `{` than `}`.
///
/// Balanced templating such as `{{ value }}` does not count.
fn opens_block(line: &str) -> bool {
    line.matches('{').count() > line.matches('}').count()
}

/// Split the body of an inline `[a, b, c]` list.
fn split_items(body: &str) -> Vec<String> {
    body.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| unquote(item).to_string())
        .collect()
}
