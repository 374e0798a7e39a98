//! # EntryStore
//!
//! The storage handle injected into request handlers. Startup may fail to
//! reach the database; the server still comes up and every operation then
//! reports [`AppError::NotReady`] instead of touching a missing pool.

use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::traits::EntryRepo;

#[derive(Clone)]
pub enum EntryStore {
    Ready(Arc<dyn EntryRepo>),
    NotReady,
}

impl EntryStore {
    pub fn ready<R: EntryRepo + 'static>(repo: R) -> Self {
        EntryStore::Ready(Arc::new(repo))
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, EntryStore::Ready(_))
    }

    /// The backing repository, or `NotReady` if startup never produced one.
    pub fn repo(&self) -> Result<&dyn EntryRepo> {
        match self {
            EntryStore::Ready(repo) => Ok(repo.as_ref()),
            EntryStore::NotReady => Err(AppError::NotReady),
        }
    }
}

impl std::fmt::Debug for EntryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryStore::Ready(_) => f.write_str("EntryStore::Ready"),
            EntryStore::NotReady => f.write_str("EntryStore::NotReady"),
        }
    }
}
