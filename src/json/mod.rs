//! JSON helpers: syntax checking, decoding, and schema validation.
//!
//! Decoding is done by `serde_json`; when a decode fails the input is run
//! through the strict grammar checker so the caller gets a line/column
//! diagnostic instead of a bare "invalid JSON".

pub mod schema;
pub mod syntax;

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::constants::DEFAULT_JSON_MAX_DEPTH;

pub use schema::SchemaViolation;

/// Errors from the JSON helpers.
#[derive(Error, Debug)]
pub enum JsonError {
    #[error("Parse error on line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("The JSON string is not valid UTF-8: {0}")]
    Encoding(#[source] std::str::Utf8Error),

    #[error("The JSON data exceeds the maximum nesting depth of {max_depth} at line {line}, column {column}")]
    Depth {
        max_depth: usize,
        line: usize,
        column: usize,
    },

    /// Grammatically valid JSON that does not fit the requested type.
    #[error("The JSON data could not be decoded: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("The JSON file path \"{}\" is either not a file or it does not exist.", .path.display())]
    NotFound { path: PathBuf },

    #[error("The JSON file \"{}\" could not be read: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("The JSON schema is not valid: {0}")]
    InvalidSchema(String),

    #[error("{}", format_violations(.errors))]
    Schema { errors: Vec<SchemaViolation> },
}

fn format_violations(errors: &[SchemaViolation]) -> String {
    let mut out = String::from("The JSON data does not match the schema:");
    for e in errors {
        out.push_str("\n  - ");
        out.push_str(&e.to_string());
    }
    out
}

/// Parses and validates JSON documents.
#[derive(Debug, Clone, Copy)]
pub struct JsonTool {
    max_depth: usize,
}

impl Default for JsonTool {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonTool {
    /// Create a tool with the default maximum nesting depth (512).
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_JSON_MAX_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Check `text` against the strict JSON grammar.
    ///
    /// Only malformed input fails; the nesting limit applies to decoding.
    pub fn check_syntax(&self, text: &str) -> Result<(), JsonError> {
        syntax::check(text.as_bytes())
    }

    /// Decode `input` into `T`.
    ///
    /// Use `T = serde_json::Value` for a dynamic tree. A literal `null`
    /// decodes to `Value::Null`, never to an error.
    pub fn parse<T: DeserializeOwned>(&self, input: impl AsRef<[u8]>) -> Result<T, JsonError> {
        self.parse_with_depth(input, self.max_depth)
    }

    /// Like [`JsonTool::parse`] with an explicit nesting limit.
    pub fn parse_with_depth<T: DeserializeOwned>(
        &self,
        input: impl AsRef<[u8]>,
        max_depth: usize,
    ) -> Result<T, JsonError> {
        let bytes = input.as_ref();
        let text = std::str::from_utf8(bytes).map_err(JsonError::Encoding)?;

        if let Some(overflow) = syntax::find_depth_overflow(bytes, max_depth) {
            return Err(JsonError::Depth {
                max_depth,
                line: overflow.line,
                column: overflow.column,
            });
        }

        let mut de = serde_json::Deserializer::from_str(text);
        de.disable_recursion_limit();
        let decoded = T::deserialize(serde_stacker::Deserializer::new(&mut de)).and_then(|value| {
            de.end()?;
            Ok(value)
        });

        match decoded {
            Ok(value) => Ok(value),
            Err(err) => {
                syntax::check(bytes)?;
                Err(JsonError::Decode(err))
            }
        }
    }

    /// Read and decode a JSON file.
    pub fn parse_file<T: DeserializeOwned>(&self, path: impl AsRef<Path>) -> Result<T, JsonError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(JsonError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let contents = std::fs::read(path).map_err(|source| JsonError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = contents.len(), "read JSON file");

        self.parse(contents)
    }

    /// Validate `data` against `schema`, reporting every violation.
    pub fn validate(&self, schema: &Value, data: &Value) -> Result<(), JsonError> {
        schema::validate(schema, data)
    }
}
