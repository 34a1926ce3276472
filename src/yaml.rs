//! Styled YAML output for a JSON-encoded document.
//!
//! The styling policy exists purely for readability and carries no semantic
//! weight: arrays and objects are always block style, scalars are plain
//! single-line values unless they contain a newline, in which case a literal
//! block is emitted. Strings that YAML would misread as numbers, booleans or
//! structure markers are double-quoted with JSON escapes (a valid YAML
//! subset). The pass is idempotent: re-parsing the produced YAML and
//! re-encoding it yields the same text.

use serde_json::Value;

use crate::error::{Error, Result};

/// Converts JSON bytes to styled YAML with the default indent of 4.
pub fn json_to_yaml(json: &[u8]) -> Result<String> {
    Marshaler::new().json_to_yaml(json)
}

/// YAML marshaler with a configurable indent width.
#[derive(Debug, Clone)]
pub struct Marshaler {
    indent: usize,
}

impl Default for Marshaler {
    fn default() -> Self {
        Self { indent: 4 }
    }
}

impl Marshaler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent.max(1);
        self
    }

    /// Parses a JSON payload into a generic tree and re-encodes it as YAML
    /// under the styling policy.
    pub fn json_to_yaml(&self, json: &[u8]) -> Result<String> {
        let value: Value = serde_json::from_slice(json)
            .map_err(|e| Error::Serialization(format!("invalid JSON input: {}", e)))?;
        let mut out = String::new();
        match &value {
            Value::Object(map) if !map.is_empty() => self.write_map(map, &mut out, 0),
            Value::Array(items) if !items.is_empty() => self.write_seq(items, &mut out, 0),
            other => {
                self.write_inline_scalar(other, &mut out);
                out.push('\n');
            }
        }
        Ok(out)
    }

    fn write_map(&self, map: &serde_json::Map<String, Value>, out: &mut String, indent: usize) {
        for (key, value) in map {
            push_indent(out, indent);
            out.push_str(&scalar_text(key));
            out.push(':');
            self.write_entry_value(value, out, indent);
        }
    }

    fn write_seq(&self, items: &[Value], out: &mut String, indent: usize) {
        for item in items {
            match item {
                Value::Object(map) if !map.is_empty() => {
                    // Render the map indented two columns past the dash, then
                    // splice the dash into the first line.
                    let mut block = String::new();
                    self.write_map(map, &mut block, indent + 2);
                    splice_dash(out, &block, indent);
                }
                Value::Array(inner) if !inner.is_empty() => {
                    let mut block = String::new();
                    self.write_seq(inner, &mut block, indent + 2);
                    splice_dash(out, &block, indent);
                }
                other => {
                    push_indent(out, indent);
                    out.push('-');
                    match other {
                        Value::String(s) if s.contains('\n') => {
                            self.write_literal_block(s, out, indent + 2)
                        }
                        _ => {
                            out.push(' ');
                            self.write_inline_scalar(other, out);
                            out.push('\n');
                        }
                    }
                }
            }
        }
    }

    /// Writes the value part of a `key:` line, choosing inline, nested block
    /// or literal style.
    fn write_entry_value(&self, value: &Value, out: &mut String, indent: usize) {
        match value {
            Value::Object(map) if !map.is_empty() => {
                out.push('\n');
                self.write_map(map, out, indent + self.indent);
            }
            Value::Array(items) if !items.is_empty() => {
                out.push('\n');
                self.write_seq(items, out, indent + self.indent);
            }
            Value::String(s) if s.contains('\n') => {
                self.write_literal_block(s, out, indent + self.indent)
            }
            other => {
                out.push(' ');
                self.write_inline_scalar(other, out);
                out.push('\n');
            }
        }
    }

    fn write_inline_scalar(&self, value: &Value, out: &mut String) {
        match value {
            Value::Null => out.push_str("null"),
            Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => out.push_str(&n.to_string()),
            Value::String(s) => out.push_str(&scalar_text(s)),
            Value::Object(_) => out.push_str("{}"),
            Value::Array(_) => out.push_str("[]"),
        }
    }

    /// Emits a multi-line string as a literal block scalar.
    fn write_literal_block(&self, s: &str, out: &mut String, indent: usize) {
        let (header, body) = if s.ends_with('\n') {
            (" |", &s[..s.len() - 1])
        } else {
            (" |-", s)
        };
        out.push_str(header);
        out.push('\n');
        for line in body.split('\n') {
            if line.is_empty() {
                out.push('\n');
            } else {
                push_indent(out, indent);
                out.push_str(line);
                out.push('\n');
            }
        }
    }
}

fn push_indent(out: &mut String, indent: usize) {
    for _ in 0..indent {
        out.push(' ');
    }
}

/// Splices a `- ` sequence marker into the first line of an already rendered
/// block whose lines are indented two columns past `indent`.
fn splice_dash(out: &mut String, block: &str, indent: usize) {
    let mut first = true;
    for line in block.split_inclusive('\n') {
        if first {
            push_indent(out, indent);
            out.push_str("- ");
            out.push_str(line.trim_start_matches(' '));
            first = false;
        } else {
            out.push_str(line);
        }
    }
}

/// A scalar string, quoted only when plain style would change its meaning.
fn scalar_text(s: &str) -> String {
    if needs_quotes(s) {
        // JSON string escaping is a valid YAML double-quoted form.
        serde_json::to_string(s).unwrap_or_else(|_| format!("{:?}", s))
    } else {
        s.to_string()
    }
}

fn needs_quotes(s: &str) -> bool {
    if s.is_empty() || s.starts_with(' ') || s.ends_with(' ') {
        return true;
    }
    let first = s.chars().next().unwrap();
    if "-?:,[]{}#&*!|>'\"%@`".contains(first) {
        return true;
    }
    if s.contains(": ") || s.ends_with(':') || s.contains(" #") {
        return true;
    }
    if s.chars().any(|c| c.is_control()) {
        return true;
    }
    // Plain style would parse these as non-string scalars.
    if s.parse::<f64>().is_ok() {
        return true;
    }
    matches!(
        s,
        "null" | "Null" | "NULL" | "~" | "true" | "True" | "TRUE" | "false" | "False" | "FALSE"
            | "yes" | "Yes" | "YES" | "no" | "No" | "NO" | "on" | "On" | "ON" | "off" | "Off"
            | "OFF"
    )
}
