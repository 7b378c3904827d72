//! Strict grammar checking with line/column diagnostics.

use serde::Deserialize;
use serde::de::IgnoredAny;

use super::JsonError;

/// Position of the first bracket that nests past the allowed depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DepthOverflow {
    pub line: usize,
    pub column: usize,
}

/// Find the first `[` or `{` that takes nesting past `max_depth`.
///
/// Brackets inside string literals are skipped. Columns are 1-based byte
/// offsets, matching `serde_json`'s diagnostics.
pub(crate) fn find_depth_overflow(bytes: &[u8], max_depth: usize) -> Option<DepthOverflow> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut line = 1;
    let mut column = 0;

    for &b in bytes {
        if b == b'\n' {
            line += 1;
            column = 0;
        } else {
            column += 1;
        }

        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                if depth > max_depth {
                    return Some(DepthOverflow { line, column });
                }
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    None
}

/// Check `bytes` against the JSON grammar without building a value.
///
/// There is no nesting limit here; deep input grows the stack on the heap
/// instead of overflowing it.
pub(crate) fn check(bytes: &[u8]) -> Result<(), JsonError> {
    let mut de = serde_json::Deserializer::from_slice(bytes);
    de.disable_recursion_limit();
    IgnoredAny::deserialize(serde_stacker::Deserializer::new(&mut de)).map_err(syntax_error)?;
    de.end().map_err(syntax_error)
}

/// Split a `serde_json` error into position and bare message.
pub(crate) fn syntax_error(err: serde_json::Error) -> JsonError {
    let full = err.to_string();
    let message = match full.rfind(" at line ") {
        Some(idx) => full[..idx].to_string(),
        None => full,
    };
    JsonError::Syntax {
        line: err.line(),
        column: err.column(),
        message,
    }
}
