//! # Domain Models
//!
//! A diary has exactly one entity: the entry.
//! Identifiers are integers assigned by the store, never by a client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Store-assigned entry identifier.
pub type EntryId = i64;

/// A persisted diary entry as it travels over the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub id: EntryId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Reserved for a future edit feature; equal to `created_at` today.
    pub updated_at: DateTime<Utc>,
}

/// Validated payload for an insert.
///
/// The only constructor is [`NewEntry::parse`], so holding one proves the
/// content is trimmed and non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    content: String,
}

impl NewEntry {
    pub const REQUIRED_MESSAGE: &'static str = "Content is required";

    /// Trims `raw` and rejects it when missing or blank.
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        match raw.map(str::trim) {
            Some(content) if !content.is_empty() => Ok(Self {
                content: content.to_string(),
            }),
            _ => Err(AppError::Validation(Self::REQUIRED_MESSAGE.into())),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn into_content(self) -> String {
        self.content
    }
}

/// Body of `POST /api/entries`.
///
/// `content` stays optional so a missing field reaches validation instead of
/// failing deserialization with a less useful message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateEntryRequest {
    #[serde(default)]
    pub content: Option<String>,
}

/// JSON error payload returned by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
