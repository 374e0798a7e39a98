//! The client state machine.

use diary_core::{DiaryEntry, EntryId};

use crate::api::EntryApi;

pub const LOAD_FAILED: &str = "Failed to load diary entries";
pub const SAVE_FAILED: &str = "Failed to save entry";
pub const DELETE_FAILED: &str = "Failed to delete entry";
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this entry?";

/// Asks the user a yes/no question before a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// What a user action ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Guard rejected it locally; nothing was sent.
    Ignored,
    /// The server accepted it and local state now reflects it.
    Applied,
    /// The request failed; `error` is set and entries are untouched.
    Failed,
}

/// Local copy of the diary plus the composer.
///
/// Every mutating call borrows the client mutably, so one client never has
/// two submits or deletes in flight.
pub struct DiaryClient<A> {
    api: A,
    entries: Vec<DiaryEntry>,
    is_adding: bool,
    new_entry: String,
    is_loading: bool,
    error: Option<String>,
}

impl<A: EntryApi> DiaryClient<A> {
    /// Starts in the loading state; call [`DiaryClient::mount`] once.
    pub fn new(api: A) -> Self {
        Self {
            api,
            entries: Vec::new(),
            is_adding: false,
            new_entry: String::new(),
            is_loading: true,
            error: None,
        }
    }

    pub fn entries(&self) -> &[DiaryEntry] {
        &self.entries
    }

    pub fn is_adding(&self) -> bool {
        self.is_adding
    }

    pub fn draft(&self) -> &str {
        &self.new_entry
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fetches the full list, replacing whatever was held.
    pub async fn mount(&mut self) -> Outcome {
        self.is_loading = true;
        let outcome = match self.api.list().await {
            Ok(entries) => {
                self.entries = entries;
                Outcome::Applied
            }
            Err(err) => {
                log::error!("loading entries: {err}");
                self.error = Some(LOAD_FAILED.to_owned());
                Outcome::Failed
            }
        };
        self.is_loading = false;
        outcome
    }

    /// Returns `false` if the composer was already open.
    pub fn open_composer(&mut self) -> bool {
        if self.is_adding {
            return false;
        }
        self.is_adding = true;
        true
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.new_entry = text.into();
    }

    /// Sends the draft. A blank draft, or a closed composer, sends nothing.
    pub async fn submit(&mut self) -> Outcome {
        if !self.is_adding || self.new_entry.trim().is_empty() {
            return Outcome::Ignored;
        }

        match self.api.create(self.new_entry.clone()).await {
            Ok(saved) => {
                self.entries.insert(0, saved);
                self.new_entry.clear();
                self.is_adding = false;
                Outcome::Applied
            }
            Err(err) => {
                log::error!("saving entry: {err}");
                self.error = Some(SAVE_FAILED.to_owned());
                Outcome::Failed
            }
        }
    }

    pub fn cancel(&mut self) {
        self.is_adding = false;
        self.new_entry.clear();
    }

    /// Deletes `id` after `confirm` agrees. The entry leaves the local list
    /// only once the server has accepted the delete.
    pub async fn delete(&mut self, id: EntryId, confirm: &impl Confirm) -> Outcome {
        if !confirm.confirm(DELETE_PROMPT) {
            return Outcome::Ignored;
        }

        match self.api.delete(id).await {
            Ok(()) => {
                self.entries.retain(|entry| entry.id != id);
                Outcome::Applied
            }
            Err(err) => {
                log::error!("deleting entry {id}: {err}");
                self.error = Some(DELETE_FAILED.to_owned());
                Outcome::Failed
            }
        }
    }
}
