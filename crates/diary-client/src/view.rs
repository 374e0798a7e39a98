//! Render-ready snapshot of a [`DiaryClient`].
//!
//! A view borrows from the client and carries no behaviour; any front end
//! (HTML, terminal, tests) can lay it out.

use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone, Utc};
use diary_core::{DiaryEntry, EntryId};

use crate::api::EntryApi;
use crate::state::DiaryClient;

pub const TITLE: &str = "My Diary";
pub const LOADING_MESSAGE: &str = "Loading diary entries...";
pub const EMPTY_MESSAGE: &str = "No entries yet. Click 'New Entry' to get started!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View<'a> {
    /// Initial fetch in flight; nothing else is shown.
    Loading,
    Diary(DiaryView<'a>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiaryView<'a> {
    pub title: &'static str,
    /// The "New Entry" button; hidden while the composer is open.
    pub show_new_entry: bool,
    /// Shown next to everything else, never instead of it.
    pub error: Option<&'a str>,
    /// The open composer's draft.
    pub composer: Option<&'a str>,
    pub entries: Vec<EntryView<'a>>,
    /// Placeholder when there are no entries.
    pub empty_message: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryView<'a> {
    pub id: EntryId,
    pub date: String,
    pub paragraphs: Vec<Paragraph<'a>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paragraph<'a> {
    Text(&'a str),
    /// An empty line; rendered as a visible break rather than collapsed.
    LineBreak,
}

/// One paragraph per line of `content`.
pub fn paragraphs(content: &str) -> Vec<Paragraph<'_>> {
    content
        .split('\n')
        .map(|line| {
            if line.is_empty() {
                Paragraph::LineBreak
            } else {
                Paragraph::Text(line)
            }
        })
        .collect()
}

/// `Oct 19, 2026, 03:04 PM` in the given zone.
pub fn format_date<Tz>(at: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.with_timezone(tz).format("%b %-d, %Y, %I:%M %p").to_string()
}

impl<'a> EntryView<'a> {
    pub fn new<Tz>(entry: &'a DiaryEntry, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Self {
            id: entry.id,
            date: format_date(&entry.created_at, tz),
            paragraphs: paragraphs(&entry.content),
        }
    }
}

impl<A: EntryApi> DiaryClient<A> {
    /// The current state as it should appear, dates in local time.
    pub fn view(&self) -> View<'_> {
        self.view_in(&Local)
    }

    pub fn view_in<Tz>(&self, tz: &Tz) -> View<'_>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        if self.is_loading() {
            return View::Loading;
        }

        let entries: Vec<_> = self
            .entries()
            .iter()
            .map(|entry| EntryView::new(entry, tz))
            .collect();

        View::Diary(DiaryView {
            title: TITLE,
            show_new_entry: !self.is_adding(),
            error: self.error(),
            composer: self.is_adding().then(|| self.draft()),
            empty_message: entries.is_empty().then_some(EMPTY_MESSAGE),
            entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ClientError, MockEntryApi};
    use reqwest::StatusCode;

    fn entry_at(id: EntryId, content: &str, at: DateTime<Utc>) -> DiaryEntry {
        DiaryEntry {
            id,
            content: content.into(),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn each_line_is_a_paragraph() {
        assert_eq!(
            paragraphs("Hello\nWorld"),
            vec![Paragraph::Text("Hello"), Paragraph::Text("World")]
        );
    }

    #[test]
    fn empty_lines_become_visible_breaks() {
        assert_eq!(
            paragraphs("a\n\nb"),
            vec![Paragraph::Text("a"), Paragraph::LineBreak, Paragraph::Text("b")]
        );
    }

    #[test]
    fn dates_use_the_short_us_format() {
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 15, 4, 0).unwrap();
        assert_eq!(format_date(&at, &Utc), "Oct 19, 2026, 03:04 PM");

        let morning = Utc.with_ymd_and_hms(2026, 1, 5, 9, 30, 0).unwrap();
        assert_eq!(format_date(&morning, &Utc), "Jan 5, 2026, 09:30 AM");
    }

    #[tokio::test]
    async fn loading_hides_everything_else() {
        let client = DiaryClient::new(MockEntryApi::new());
        assert_eq!(client.view(), View::Loading);
    }

    #[tokio::test]
    async fn error_is_shown_alongside_the_rest() {
        let mut api = MockEntryApi::new();
        api.expect_list()
            .returning(|| Err(ClientError::Status(StatusCode::SERVICE_UNAVAILABLE)));
        let mut client = DiaryClient::new(api);
        client.mount().await;
        client.open_composer();
        client.set_draft("draft");

        let View::Diary(view) = client.view_in(&Utc) else {
            panic!("expected the diary view");
        };
        assert_eq!(view.error, Some("Failed to load diary entries"));
        assert_eq!(view.composer, Some("draft"));
        assert!(!view.show_new_entry);
        assert_eq!(view.empty_message, Some(EMPTY_MESSAGE));
    }

    #[tokio::test]
    async fn entries_render_in_state_order() {
        let newer = entry_at(2, "Hello\nWorld", Utc.with_ymd_and_hms(2026, 10, 19, 15, 4, 0).unwrap());
        let older = entry_at(1, "first", Utc.with_ymd_and_hms(2026, 10, 18, 8, 0, 0).unwrap());
        let listed = vec![newer, older];

        let mut api = MockEntryApi::new();
        api.expect_list().return_once(move || Ok(listed));
        let mut client = DiaryClient::new(api);
        client.mount().await;

        let View::Diary(view) = client.view_in(&Utc) else {
            panic!("expected the diary view");
        };
        assert!(view.show_new_entry);
        assert_eq!(view.composer, None);
        assert_eq!(view.empty_message, None);
        assert_eq!(
            view.entries,
            vec![
                EntryView {
                    id: 2,
                    date: "Oct 19, 2026, 03:04 PM".into(),
                    paragraphs: vec![Paragraph::Text("Hello"), Paragraph::Text("World")],
                },
                EntryView {
                    id: 1,
                    date: "Oct 18, 2026, 08:00 AM".into(),
                    paragraphs: vec![Paragraph::Text("first")],
                },
            ]
        );
    }
}
