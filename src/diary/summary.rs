//! Per-month mood statistics

use kong_diary_calendar::YearMonth;
use kong_diary_mood::EmotionLabel;
use serde::Serialize;
use std::collections::BTreeMap;

use super::types::DiaryEntry;

/// How often each mood occurs among a month's entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoodSummary {
    pub month: YearMonth,
    pub counts: BTreeMap<EmotionLabel, usize>,
    pub total: usize,
}

impl MoodSummary {
    /// Count `entries`; entries without a mood count as neutral.
    pub fn from_entries<'a, I>(month: YearMonth, entries: I) -> Self
    where
        I: IntoIterator<Item = &'a DiaryEntry>,
    {
        let mut counts = BTreeMap::new();
        let mut total = 0;
        for entry in entries {
            *counts.entry(entry.effective_mood()).or_insert(0) += 1;
            total += 1;
        }
        Self {
            month,
            counts,
            total,
        }
    }

    pub fn count(&self, label: EmotionLabel) -> usize {
        self.counts.get(&label).copied().unwrap_or(0)
    }

    /// The most frequent mood, earlier labels winning ties. `None` for an
    /// empty month.
    pub fn dominant(&self) -> Option<EmotionLabel> {
        let mut best: Option<(EmotionLabel, usize)> = None;
        for label in EmotionLabel::ALL {
            let count = self.count(label);
            if count == 0 {
                continue;
            }
            match best {
                Some((_, top)) if top >= count => {}
                _ => best = Some((label, count)),
            }
        }
        best.map(|(label, _)| label)
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
