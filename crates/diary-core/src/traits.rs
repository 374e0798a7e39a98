//! # Core Traits (Ports)
//!
//! Any storage plugin must implement these traits to be used by the binary.

use async_trait::async_trait;

use crate::models::{DiaryEntry, EntryId, NewEntry};

/// Data persistence contract for diary entries.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait EntryRepo: Send + Sync {
    /// All entries, newest first.
    async fn list_entries(&self) -> anyhow::Result<Vec<DiaryEntry>>;

    /// Inserts the entry and returns the stored row, re-read by its new id.
    async fn create_entry(&self, entry: NewEntry) -> anyhow::Result<DiaryEntry>;

    /// Hard delete. Deleting an id that does not exist is not an error.
    async fn delete_entry(&self, id: EntryId) -> anyhow::Result<()>;
}
