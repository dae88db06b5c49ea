//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters
//! (durable storage, password hashing, quiz content). Each trait exposes
//! strongly typed errors so adapters map their failures into predictable
//! variants instead of stringly-typed results.

use thiserror::Error;

use super::document::Document;
use super::quiz::Quiz;

/// Errors surfaced by the document persistence adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    /// The durable copy could not be read.
    #[error("failed to read document: {message}")]
    Read {
        /// Adapter-provided description.
        message: String,
    },
    /// The durable copy exists but did not parse.
    #[error("failed to parse document: {message}")]
    Parse {
        /// Adapter-provided description.
        message: String,
    },
    /// The document could not be written durably.
    #[error("failed to write document: {message}")]
    Write {
        /// Adapter-provided description.
        message: String,
    },
}

impl PersistenceError {
    /// Helper for read failures.
    pub fn read(message: impl Into<String>) -> Self {
        Self::Read {
            message: message.into(),
        }
    }

    /// Helper for parse failures.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Helper for write failures.
    pub fn write(message: impl Into<String>) -> Self {
        Self::Write {
            message: message.into(),
        }
    }
}

/// Durable storage for the whole document.
///
/// `load` distinguishes "no document yet" (first run, `Ok(None)`) from a
/// present-but-unreadable document so the store never silently replaces
/// data it failed to read.
pub trait DocumentPersistence: Send + Sync {
    /// Read the durable document, if one exists.
    fn load(&self) -> Result<Option<Document>, PersistenceError>;

    /// Durably replace the document.
    fn persist(&self, document: &Document) -> Result<(), PersistenceError>;
}

/// Error surfaced by the password hashing adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("password hashing failed: {message}")]
pub struct PasswordHashError {
    /// Adapter-provided description.
    pub message: String,
}

/// Password hashing as an external capability.
///
/// The domain stores and compares only opaque hash strings; scheme and
/// parameters live entirely inside the adapter.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into an opaque string.
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Whether `password` matches the previously produced `hash`.
    ///
    /// An unparseable stored hash verifies as `false`.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Error surfaced by the quiz source adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("quiz source failed: {message}")]
pub struct QuizSourceError {
    /// Adapter-provided description.
    pub message: String,
}

/// Provider of the daily quiz question.
///
/// Remote generation is out of scope; the shipped adapter serves a fixed
/// fallback question.
pub trait QuizSource: Send + Sync {
    /// The question of the day.
    fn daily(&self) -> Result<Quiz, QuizSourceError>;
}
