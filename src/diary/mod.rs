//! Diary entry storage on the backend

mod summary;
mod types;

use chrono::{Days, NaiveDate};
use kong_diary_calendar::{build_month_grid, CalendarGrid, YearMonth};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::auth::Auth;
use crate::config::ClientOptions;
use crate::error::{Error, Result};
use crate::fetch::{check_status, parse_json, Fetch, FetchBuilder};

pub use summary::*;
pub use types::*;

/// Client for the diary endpoints
///
/// Every call is made on behalf of the user signed in through the shared
/// [`Auth`].
pub struct DiaryClient {
    /// The base URL of the backend
    url: String,

    /// HTTP client used for requests
    client: Client,

    auth: Arc<Auth>,

    /// Client options
    options: ClientOptions,
}

impl DiaryClient {
    /// Create a new DiaryClient
    pub(crate) fn new(url: &str, client: Client, auth: Arc<Auth>, options: ClientOptions) -> Self {
        Self {
            url: url.to_string(),
            client,
            auth,
            options,
        }
    }

    fn get_diary_url(&self, path: &str) -> String {
        format!("{}/api/v1/diaries{}", self.url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: FetchBuilder<'_>) -> Result<T> {
        let response = self.auth.send_authorized(request).await?;
        parse_json(response).await
    }

    /// Create an entry for the signed-in user
    ///
    /// With `auto_analyze_mood` on, a draft without a mood is scored first.
    pub async fn create(&self, draft: DiaryDraft) -> Result<DiaryEntry> {
        let session = self.auth.require_session()?;
        let draft = if self.options.auto_analyze_mood {
            draft.analyzed()
        } else {
            draft
        };

        let url = self.get_diary_url("/create");
        let request = Fetch::post(&self.client, &url)
            .query("userId", session.user_id)
            .json(&draft)?;

        let record: DiaryRecord = self.send(request).await?;
        let entry = record.into_entry(session.user_id)?;
        log::info!("created entry {} for {}", entry.id, entry.date);
        Ok(entry)
    }

    /// All entries of the signed-in user in `month`, in backend order
    ///
    /// Records that cannot be decoded or normalized are skipped.
    pub async fn list_month(&self, month: YearMonth) -> Result<Vec<DiaryEntry>> {
        let session = self.auth.require_session()?;
        let url = self.get_diary_url(&format!("/user/{}", session.user_id));
        let request = Fetch::get(&self.client, &url).query("yearMonth", month.compact());

        let records: Vec<serde_json::Value> = self.send(request).await?;
        let mut entries = Vec::with_capacity(records.len());
        for (index, value) in records.into_iter().enumerate() {
            let record: DiaryRecord = match serde_json::from_value(value) {
                Ok(record) => record,
                Err(err) => {
                    log::warn!("skipping record {} of {}: {}", index, month, err);
                    continue;
                }
            };
            let id = record.id;
            match record.into_entry(session.user_id) {
                Ok(entry) => entries.push(entry),
                Err(err) => log::warn!("skipping entry {}: {}", id, err),
            }
        }
        log::debug!("{} entries in {}", entries.len(), month);
        Ok(entries)
    }

    /// Entries of the seven days starting at `start`, in date order
    ///
    /// A week spanning two months fetches both.
    pub async fn list_week(&self, start: NaiveDate) -> Result<Vec<DiaryEntry>> {
        let end = start
            .checked_add_days(Days::new(6))
            .ok_or_else(|| Error::general(format!("no week starts at {}", start)))?;

        let first = YearMonth::of(start);
        let last = YearMonth::of(end);

        let mut entries = self.list_month(first).await?;
        if last != first {
            entries.extend(self.list_month(last).await?);
        }

        entries.retain(|entry| entry.date >= start && entry.date <= end);
        entries.sort_by_key(|entry| entry.date);
        Ok(entries)
    }

    /// Replace the content of entry `id`
    pub async fn update(&self, id: i64, draft: DiaryDraft) -> Result<DiaryEntry> {
        let session = self.auth.require_session()?;
        let url = self.get_diary_url(&format!("/update/{}", id));
        let request = Fetch::put(&self.client, &url).json(&draft)?;

        let record: DiaryRecord = self.send(request).await?;
        let entry = record.into_entry(session.user_id)?;
        log::info!("updated entry {}", entry.id);
        Ok(entry)
    }

    /// Delete entry `id`
    pub async fn delete(&self, id: i64) -> Result<()> {
        let url = self.get_diary_url(&format!("/delete/{}", id));
        let response = self
            .auth
            .send_authorized(Fetch::delete(&self.client, &url))
            .await?;
        check_status(response).await?;
        log::info!("deleted entry {}", id);
        Ok(())
    }

    /// The calendar grid of `month` with the user's entries attached
    pub async fn month_grid(&self, month: YearMonth) -> Result<CalendarGrid<DiaryEntry>> {
        let entries = self.list_month(month).await?;
        Ok(build_month_grid(month.first_day(), entries)?)
    }

    /// Mood counts of `month`
    pub async fn mood_summary(&self, month: YearMonth) -> Result<MoodSummary> {
        let entries = self.list_month(month).await?;
        Ok(MoodSummary::from_entries(month, &entries))
    }
}
