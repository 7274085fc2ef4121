//! Pretty-compact JSON writer.
//!
//! Containers that fit on one line within `max_length` columns are written
//! inline with a space after every `:` and `,`; anything longer is broken
//! into one member per line. Key order is whatever the value holds, so with
//! `serde_json`'s `preserve_order` the file's original order is kept.

use serde_json::Value;

use crate::error::Result;

/// Layout options for [`to_string_compact`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactOptions {
    pub indent: String,
    pub max_length: usize,
}

impl Default for CompactOptions {
    fn default() -> Self {
        CompactOptions {
            indent: "\t".to_string(),
            max_length: 35,
        }
    }
}

/// Serializes `value` using the pretty-compact layout.
///
/// An empty indent disables wrapping entirely.
pub fn to_string_compact(value: &Value, options: &CompactOptions) -> Result<String> {
    let max_length = if options.indent.is_empty() {
        usize::MAX
    } else {
        options.max_length
    };
    let writer = CompactWriter {
        indent: &options.indent,
        max_length,
    };
    writer.write(value, "", 0)
}

struct CompactWriter<'a> {
    indent: &'a str,
    max_length: usize,
}

impl CompactWriter<'_> {
    /// `reserved` is the width already claimed on the line by a key prefix
    /// and trailing comma.
    fn write(&self, value: &Value, current_indent: &str, reserved: usize) -> Result<String> {
        let compact = serde_json::to_string(value)?;
        let available = self
            .max_length
            .saturating_sub(width(current_indent) + reserved);

        if width(&compact) <= available {
            let spaced = space_separators(&compact);
            if width(&spaced) <= available {
                return Ok(spaced);
            }
        }

        let next_indent = format!("{}{}", current_indent, self.indent);
        let (start, end, items) = match value {
            Value::Array(elements) => {
                let last = elements.len().saturating_sub(1);
                let items = elements
                    .iter()
                    .enumerate()
                    .map(|(i, element)| {
                        self.write(element, &next_indent, if i == last { 0 } else { 1 })
                    })
                    .collect::<Result<Vec<_>>>()?;
                ('[', ']', items)
            }
            Value::Object(map) => {
                let last = map.len().saturating_sub(1);
                let items = map
                    .iter()
                    .enumerate()
                    .map(|(i, (key, member))| -> Result<String> {
                        let key_part = format!("{}: ", serde_json::to_string(key)?);
                        let trailing = if i == last { 0 } else { 1 };
                        let member =
                            self.write(member, &next_indent, width(&key_part) + trailing)?;
                        Ok(format!("{}{}", key_part, member))
                    })
                    .collect::<Result<Vec<_>>>()?;
                ('{', '}', items)
            }
            _ => return Ok(compact),
        };

        if items.is_empty() {
            return Ok(compact);
        }

        Ok(format!(
            "{start}\n{next_indent}{body}\n{current_indent}{end}",
            body = items.join(&format!(",\n{}", next_indent)),
        ))
    }
}

/// Line width in UTF-16 code units, so characters outside the BMP count twice.
fn width(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Adds a space after every `:` and `,` that is not inside a string literal.
fn space_separators(compact: &str) -> String {
    let mut out = String::with_capacity(compact.len() + compact.len() / 4);
    let mut in_string = false;
    let mut escaped = false;

    for c in compact.chars() {
        out.push(c);
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            ':' | ',' => out.push(' '),
            _ => {}
        }
    }
    out
}
