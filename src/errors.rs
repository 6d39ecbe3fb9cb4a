// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::{fmt, io};

use plotters::drawing::DrawingAreaErrorKind;

#[derive(Debug)]
pub enum SeqforgeError {
    Io(io::Error),
    Format(String),
    /// A requested sequence length that is not a positive integer.
    InvalidLength(String),
    /// Composition of a zero-length sequence is undefined.
    EmptySequence,
    Remote(String),
    Json(serde_json::Error),
    Csv(csv::Error),
    /// Drawing or encoding the length chart failed.
    Chart(String),
}

// These allow conversion to SeqforgeError, required for main() to return Result<()> and for '?'
// to work.

impl From<io::Error> for SeqforgeError {
    fn from(e: io::Error) -> Self {
        SeqforgeError::Io(e)
    }
}

impl From<String> for SeqforgeError {
    fn from(s: String) -> Self {
        SeqforgeError::Format(s)
    }
}

impl From<reqwest::Error> for SeqforgeError {
    fn from(e: reqwest::Error) -> Self {
        SeqforgeError::Remote(e.to_string())
    }
}

impl From<serde_json::Error> for SeqforgeError {
    fn from(e: serde_json::Error) -> Self {
        SeqforgeError::Json(e)
    }
}

impl From<csv::Error> for SeqforgeError {
    fn from(e: csv::Error) -> Self {
        SeqforgeError::Csv(e)
    }
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for SeqforgeError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        SeqforgeError::Chart(e.to_string())
    }
}

impl fmt::Display for SeqforgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeqforgeError::Io(e) => write!(f, "I/O error: {}", e),
            SeqforgeError::Format(msg) => write!(f, "Format error: {}", msg),
            SeqforgeError::InvalidLength(input) => write!(
                f,
                "Sequence length must be a positive integer (got '{}')",
                input
            ),
            SeqforgeError::EmptySequence => {
                write!(f, "Cannot compute composition of an empty sequence")
            }
            SeqforgeError::Remote(msg) => write!(f, "Remote service error: {}", msg),
            SeqforgeError::Json(e) => write!(f, "Malformed JSON response: {}", e),
            SeqforgeError::Csv(e) => write!(f, "CSV error: {}", e),
            SeqforgeError::Chart(msg) => write!(f, "Chart error: {}", msg),
        }
    }
}

impl std::error::Error for SeqforgeError {}
