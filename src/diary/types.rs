//! Diary entries, their wire records and drafts

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use kong_diary_calendar::Dated;
use kong_diary_mood::{score_text, EmotionLabel, DEFAULT_EMOJI};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::wire::{id_from_str_or_number, opt_id_from_str_or_number};

/// A diary entry, normalized from its wire record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntry {
    pub id: i64,
    pub owner_id: i64,
    pub date: NaiveDate,
    pub title: String,
    pub body: String,
    pub mood: Option<EmotionLabel>,
    pub emoji: Option<String>,
    pub sentiment_text: Option<String>,
    pub weather: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl DiaryEntry {
    /// Stored emoji, else the emoji of the mood, else the paw.
    pub fn display_emoji(&self) -> &str {
        match (&self.emoji, self.mood) {
            (Some(emoji), _) if !emoji.trim().is_empty() => emoji,
            (_, Some(mood)) => mood.emoji(),
            _ => DEFAULT_EMOJI,
        }
    }

    /// The mood used for summaries: entries without one count as neutral.
    pub fn effective_mood(&self) -> EmotionLabel {
        self.mood.unwrap_or_default()
    }
}

impl Dated for DiaryEntry {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// `sentiment` arrives either as a bare label or as an analysis object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SentimentField {
    Label(String),
    Detail {
        #[serde(default)]
        sentiment: Option<String>,
        #[serde(default)]
        emoji: Option<String>,
        #[serde(default)]
        text: Option<String>,
    },
}

/// `LocalDateTime` as a string or as Jackson's `[y, m, d, h, min, s, nanos]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Text(String),
    Parts(Vec<i64>),
}

impl Timestamp {
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        match self {
            Timestamp::Text(text) => parse_timestamp_text(text.trim()),
            Timestamp::Parts(parts) => {
                let part = |index: usize| parts.get(index).copied().unwrap_or(0);
                let date = NaiveDate::from_ymd_opt(
                    i32::try_from(part(0)).ok()?,
                    u32::try_from(part(1)).ok()?,
                    u32::try_from(part(2)).ok()?,
                )?;
                let time = NaiveTime::from_hms_nano_opt(
                    u32::try_from(part(3)).ok()?,
                    u32::try_from(part(4)).ok()?,
                    u32::try_from(part(5)).ok()?,
                    u32::try_from(part(6)).ok()?,
                )?;
                Some(date.and_time(time))
            }
        }
    }
}

fn parse_timestamp_text(text: &str) -> Option<NaiveDateTime> {
    if let Ok(timestamp) = text.parse::<NaiveDateTime>() {
        return Some(timestamp);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.naive_local());
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(timestamp);
    }
    parse_entry_date(text)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Parses `yyyy-MM-dd`, `yyyy-MM-ddT...` or `yyyyMMdd`.
pub fn parse_entry_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    let day = raw.split(|c: char| c == 'T' || c == ' ').next().unwrap_or(raw);

    let parsed = if day.len() == 8 && day.bytes().all(|b| b.is_ascii_digit()) {
        NaiveDate::parse_from_str(day, "%Y%m%d")
    } else {
        NaiveDate::parse_from_str(day, "%Y-%m-%d")
    };
    parsed.map_err(|_| Error::invalid_entry(format!("unrecognized date {:?}", raw)))
}

/// An entry as the backend sends it
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryRecord {
    #[serde(deserialize_with = "id_from_str_or_number")]
    pub id: i64,

    #[serde(default, deserialize_with = "opt_id_from_str_or_number")]
    pub user_id: Option<i64>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub content: Option<String>,

    #[serde(default)]
    pub date: Option<String>,

    #[serde(default)]
    pub mood: Option<String>,

    #[serde(default)]
    pub emotion: Option<String>,

    #[serde(default)]
    pub sentiment: Option<SentimentField>,

    #[serde(default)]
    pub emoji: Option<String>,

    #[serde(default)]
    pub sentiment_text: Option<String>,

    #[serde(default)]
    pub weather: Option<String>,

    #[serde(default)]
    pub created_at: Option<Timestamp>,

    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

impl DiaryRecord {
    /// Normalize the record into a [`DiaryEntry`].
    ///
    /// The mood is read from `mood`, then `emotion`, then `sentiment`; the
    /// first one present decides and unknown names become neutral. A record
    /// without `userId` belongs to `fallback_owner`.
    pub fn into_entry(self, fallback_owner: i64) -> Result<DiaryEntry> {
        let raw_date = non_blank(self.date)
            .ok_or_else(|| Error::invalid_entry(format!("entry {} has no date", self.id)))?;
        let date = parse_entry_date(&raw_date)?;

        let (detail_label, detail_emoji, detail_text) = match self.sentiment {
            Some(SentimentField::Label(label)) => (Some(label), None, None),
            Some(SentimentField::Detail {
                sentiment,
                emoji,
                text,
            }) => (sentiment, emoji, text),
            None => (None, None, None),
        };

        let mood = non_blank(self.mood)
            .or_else(|| non_blank(self.emotion))
            .or_else(|| non_blank(detail_label))
            .map(|name| EmotionLabel::from_name_or_default(&name));

        let created_at = self.created_at.as_ref().and_then(Timestamp::to_naive);
        if self.created_at.is_some() && created_at.is_none() {
            log::debug!("entry {} has an unreadable createdAt", self.id);
        }

        Ok(DiaryEntry {
            id: self.id,
            owner_id: self.user_id.unwrap_or(fallback_owner),
            date,
            title: self.title.unwrap_or_default(),
            body: self.content.unwrap_or_default(),
            mood,
            emoji: non_blank(self.emoji).or_else(|| non_blank(detail_emoji)),
            sentiment_text: non_blank(self.sentiment_text).or_else(|| non_blank(detail_text)),
            weather: non_blank(self.weather),
            created_at,
            updated_at: self.updated_at.as_ref().and_then(Timestamp::to_naive),
        })
    }
}

/// A new entry, or the replacement content of an existing one
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DiaryDraft {
    pub title: String,
    pub body: String,
    pub date: Option<NaiveDate>,
    pub mood: Option<EmotionLabel>,
    pub emoji: Option<String>,
    pub sentiment_text: Option<String>,
    pub weather: Option<String>,
}

impl DiaryDraft {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    /// The day the entry belongs to
    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_mood(mut self, mood: EmotionLabel) -> Self {
        self.mood = Some(mood);
        self
    }

    pub fn with_weather(mut self, weather: impl Into<String>) -> Self {
        self.weather = Some(weather.into());
        self
    }

    /// Fill mood, emoji and sentiment text from the body when no mood is set.
    pub fn analyzed(mut self) -> Self {
        if self.mood.is_some() {
            return self;
        }
        let score = score_text(&self.body);
        log::debug!("draft scored as {} ({})", score.label, score.score);
        self.mood = Some(score.label);
        self.emoji.get_or_insert_with(|| score.label.emoji().to_string());
        self.sentiment_text
            .get_or_insert_with(|| score.label.description().to_string());
        self
    }

    /// A draft carrying the content of an existing entry
    pub fn from_entry(entry: &DiaryEntry) -> Self {
        Self {
            title: entry.title.clone(),
            body: entry.body.clone(),
            date: Some(entry.date),
            mood: entry.mood,
            emoji: entry.emoji.clone(),
            sentiment_text: entry.sentiment_text.clone(),
            weather: entry.weather.clone(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DraftBody<'a> {
    title: &'a str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mood: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    emoji: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sentiment_text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    weather: Option<&'a str>,
}

impl Serialize for DiaryDraft {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        DraftBody {
            title: &self.title,
            content: &self.body,
            date: self.date.map(|date| date.format("%Y-%m-%d").to_string()),
            mood: self.mood.map(|mood| mood.as_str().to_uppercase()),
            emoji: self.emoji.as_deref(),
            sentiment_text: self.sentiment_text.as_deref(),
            weather: self.weather.as_deref(),
        }
        .serialize(serializer)
    }
}
