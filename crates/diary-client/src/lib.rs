//! # diary-client
//!
//! Client-side view of the diary: a cached copy of the entry list kept in
//! step with the server, the composer for drafting a new entry, and a
//! render-ready [`View`] of both.
//!
//! The store is the only id authority. Nothing is added to or removed from
//! the local list until the server has confirmed it.

pub mod api;
pub mod state;
pub mod view;

pub use api::{ClientError, EntryApi, HttpEntryApi};
pub use state::{Confirm, DiaryClient, Outcome};
pub use view::{format_date, paragraphs, DiaryView, EntryView, Paragraph, View};
