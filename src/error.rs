//! Structured error types for deckfit.
//!
//! Errors here are reserved for programmer and environment failures: a deck
//! spec that is not valid JSON, a font file that exists but cannot be
//! parsed, an unreadable file, or a build attempted while error findings
//! remain. Content that merely does not fit is reported as findings, never
//! as an error.

use std::path::PathBuf;

use thiserror::Error;

/// The unified error type returned by the public deckfit API.
#[derive(Debug, Error)]
pub enum DeckError {
    /// JSON input failed to parse as a deck spec or options document.
    #[error("Failed to parse input: {source}{}", hint_suffix(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },

    /// A font file could not be read or parsed.
    #[error("Font error in '{}': {message}", .path.display())]
    Font { path: PathBuf, message: String },

    /// A file could not be read or written.
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The build step refused to produce an artifact because error findings remain.
    #[error("Build blocked by {error_count} error finding(s):\n{summary}")]
    BuildBlocked { error_count: usize, summary: String },
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {hint}")
    }
}

impl From<serde_json::Error> for DeckError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the deck schema. Check field names, content \"type\" tags and placeholder types.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        DeckError::Parse { source: e, hint }
    }
}

impl DeckError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DeckError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_errors_carry_a_hint() {
        let err: DeckError = serde_json::from_str::<serde_json::Value>("{ \"a\": 1, }")
            .unwrap_err()
            .into();
        let msg = err.to_string();
        assert!(msg.contains("Hint: Check for trailing commas"), "got: {msg}");
    }

    #[test]
    fn test_eof_errors_mention_truncation() {
        let err: DeckError = serde_json::from_str::<serde_json::Value>("{ \"a\": ")
            .unwrap_err()
            .into();
        assert!(err.to_string().contains("truncated"));
    }
}
