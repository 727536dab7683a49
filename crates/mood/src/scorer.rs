//! Keyword-frequency mood scorer
//!
//! Each label owns a list of Korean word stems. The score of a label is the
//! number of non-overlapping, case-insensitive occurrences of its stems in
//! the text; `neutral` starts at [`NEUTRAL_BIAS`] so that text without any
//! keyword resolves to it. The highest score wins and ties go to the label
//! declared first in [`EmotionLabel`]; `neutral` is declared last, so a
//! single keyword of any other label beats the bias.

use serde::{Deserialize, Serialize};

use crate::EmotionLabel;

/// Starting score of the neutral label.
pub const NEUTRAL_BIAS: u32 = 1;

// One row per label, in canonical order. Stems must not repeat within a row.
const KEYWORDS: [(EmotionLabel, &[&str]); 13] = [
    (EmotionLabel::Happy, &["좋아", "행복", "기쁘", "즐거", "웃", "좋았"]),
    (EmotionLabel::Sad, &["슬프", "우울", "눈물", "아쉽", "그립", "속상", "서운"]),
    (EmotionLabel::Angry, &["화나", "짜증", "열받", "분노", "화가", "빡치", "싫"]),
    (EmotionLabel::Excited, &["신나", "신남", "설레", "설렘", "기대", "흥분", "두근", "떨림"]),
    (EmotionLabel::Calm, &["평화", "고요", "차분", "편안", "안정", "여유", "평온"]),
    (EmotionLabel::Anxious, &["걱정", "불안", "초조", "두렵", "무섭", "떨리", "긴장", "조마조마"]),
    (EmotionLabel::Tired, &["피곤", "지침", "힘들", "졸림", "지친", "쉬고"]),
    (EmotionLabel::Bored, &["지루", "심심", "따분", "무료"]),
    (EmotionLabel::Confused, &["혼란", "헷갈", "모르겠", "복잡"]),
    (EmotionLabel::Hopeful, &["희망", "바라", "다짐", "꿈꾸"]),
    (EmotionLabel::Lonely, &["외롭", "외로", "쓸쓸", "혼자", "고독"]),
    (EmotionLabel::Surprised, &["놀라", "놀랐", "깜짝", "헐"]),
    (EmotionLabel::Neutral, &["보통", "그냥", "평범", "무난", "괜찮", "그저"]),
];

/// Winning label and its score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodScore {
    pub label: EmotionLabel,
    pub score: u32,
}

impl Default for MoodScore {
    fn default() -> Self {
        Self {
            label: EmotionLabel::Neutral,
            score: NEUTRAL_BIAS,
        }
    }
}

/// Keyword stems of a label.
pub fn keywords_for(label: EmotionLabel) -> &'static [&'static str] {
    KEYWORDS
        .iter()
        .find(|(candidate, _)| *candidate == label)
        .map(|(_, stems)| *stems)
        .unwrap_or(&[])
}

/// Scores every label for `text`, in canonical order.
pub fn score_breakdown(text: &str) -> Vec<(EmotionLabel, u32)> {
    let haystack = text.to_lowercase();

    KEYWORDS
        .iter()
        .map(|(label, stems)| {
            let hits: usize = stems
                .iter()
                .map(|stem| haystack.matches(&stem.to_lowercase()).count())
                .sum();
            let bias = if *label == EmotionLabel::Neutral {
                NEUTRAL_BIAS
            } else {
                0
            };
            (*label, bias + hits as u32)
        })
        .collect()
}

/// Picks the mood label for `text`.
///
/// Blank text short-circuits to `neutral` with the bias score.
pub fn score_text(text: &str) -> MoodScore {
    if text.trim().is_empty() {
        return MoodScore::default();
    }

    let mut best: Option<MoodScore> = None;
    for (label, score) in score_breakdown(text) {
        match best {
            Some(current) if score <= current.score => {}
            _ => best = Some(MoodScore { label, score }),
        }
    }

    let result = best.unwrap_or_default();
    log::debug!("Scored text as {} ({})", result.label, result.score);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_label_has_keywords() {
        for label in EmotionLabel::ALL {
            assert!(!keywords_for(label).is_empty(), "{} has no keywords", label);
        }
    }

    #[test]
    fn test_table_is_in_canonical_order() {
        let labels: Vec<EmotionLabel> = KEYWORDS.iter().map(|(label, _)| *label).collect();
        assert_eq!(labels, EmotionLabel::ALL.to_vec());
    }

    #[test]
    fn test_stems_do_not_repeat() {
        for (label, stems) in KEYWORDS.iter() {
            let mut sorted = stems.to_vec();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), stems.len(), "{} repeats a stem", label);
        }
    }

    #[test]
    fn test_breakdown_applies_neutral_bias() {
        let breakdown = score_breakdown("abc");
        for (label, score) in breakdown {
            let expected = if label == EmotionLabel::Neutral { 1 } else { 0 };
            assert_eq!(score, expected);
        }
    }
}
