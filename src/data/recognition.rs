//! Text recognition collaborator
//!
//! Turns a captured image into the words printed on it. Recognition itself is
//! delegated to an external OCR tool; `TranscriptRecognizer` consumes the text
//! such a tool writes out.

use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while recognizing text
#[derive(Debug, Error)]
pub enum RecognitionError {
    /// The input could not be read
    #[error("Failed to read {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Produces the ordered words found in an image
pub trait TextRecognizer {
    fn recognize(&self, input: &Path) -> Result<Vec<String>, RecognitionError>;
}

/// Reads an OCR transcript and yields its whitespace-separated words in order
#[derive(Debug, Clone, Copy, Default)]
pub struct TranscriptRecognizer;

impl TextRecognizer for TranscriptRecognizer {
    fn recognize(&self, input: &Path) -> Result<Vec<String>, RecognitionError> {
        let text = fs::read_to_string(input).map_err(|source| RecognitionError::Unreadable {
            path: input.display().to_string(),
            source,
        })?;

        Ok(text.split_whitespace().map(str::to_string).collect())
    }
}
