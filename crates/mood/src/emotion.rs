//! Emotion labels and their display attributes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::MoodError;

/// Paw emoji shown for an entry that carries no mood at all.
pub const DEFAULT_EMOJI: &str = "🐱";

/// Color used when no label is known.
pub const DEFAULT_COLOR: &str = "#C2E4B8";

/// Description used when no label is known.
pub const DEFAULT_DESCRIPTION: &str = "오늘 하루는 어땠나요?";

/// Mood category of a diary entry.
///
/// The declaration order is canonical: the scorer breaks ties in favor of
/// the label declared first, and `Ord` follows the same order. `Neutral`
/// comes last so its starting bias never outranks a matched keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionLabel {
    Happy,
    Sad,
    Angry,
    Excited,
    #[serde(alias = "peaceful")]
    Calm,
    Anxious,
    Tired,
    Bored,
    Confused,
    Hopeful,
    Lonely,
    Surprised,
    Neutral,
}

impl EmotionLabel {
    /// All labels in canonical order.
    pub const ALL: [EmotionLabel; 13] = [
        EmotionLabel::Happy,
        EmotionLabel::Sad,
        EmotionLabel::Angry,
        EmotionLabel::Excited,
        EmotionLabel::Calm,
        EmotionLabel::Anxious,
        EmotionLabel::Tired,
        EmotionLabel::Bored,
        EmotionLabel::Confused,
        EmotionLabel::Hopeful,
        EmotionLabel::Lonely,
        EmotionLabel::Surprised,
        EmotionLabel::Neutral,
    ];

    /// Lowercase wire name of the label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Angry => "angry",
            Self::Neutral => "neutral",
            Self::Excited => "excited",
            Self::Calm => "calm",
            Self::Anxious => "anxious",
            Self::Tired => "tired",
            Self::Bored => "bored",
            Self::Confused => "confused",
            Self::Hopeful => "hopeful",
            Self::Lonely => "lonely",
            Self::Surprised => "surprised",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Happy => "😸",
            Self::Sad => "😿",
            Self::Angry => "😾",
            Self::Neutral => "😽",
            Self::Excited => "😻",
            Self::Calm => "😌",
            Self::Anxious => "🙀",
            Self::Tired => "💤",
            Self::Bored => "🥱",
            Self::Confused => "🤨",
            Self::Hopeful => "🌟",
            Self::Lonely => "💔",
            Self::Surprised => "😮",
        }
    }

    /// Hex color used to paint calendar cells for this label.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Happy => "#FFD166",
            Self::Sad => "#8EBBFF",
            Self::Angry => "#FF7B7B",
            Self::Neutral => "#C2E4B8",
            Self::Excited => "#FF9F66",
            Self::Calm => "#8EDFD0",
            Self::Anxious => "#C8A4FF",
            Self::Tired => "#C4C4C4",
            Self::Bored => "#D9CBB8",
            Self::Confused => "#F2C6DE",
            Self::Hopeful => "#FFE08A",
            Self::Lonely => "#A7B4D9",
            Self::Surprised => "#FFB5A7",
        }
    }

    /// Short comment shown next to an entry tagged with this label.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Happy => "오늘은 행복한 하루였네요! 좋은 일이 있었나봐요.",
            Self::Sad => "오늘은 조금 슬픈 하루였군요. 내일은 더 좋은 일이 있을 거예요.",
            Self::Angry => "화가 나는 일이 있었나봐요. 깊게 숨을 쉬고 마음을 진정시켜보세요.",
            Self::Neutral => "담담한 하루를 보내셨네요. 때로는 평범한 날도 소중해요.",
            Self::Excited => "무언가에 설레고 기대되는 일이 있나봐요!",
            Self::Calm => "평온하고 차분한 하루를 보내셨네요. 이 기분을 유지해보세요.",
            Self::Anxious => "불안한 마음이 느껴져요. 걱정이 있다면 누군가와 나눠보는 건 어떨까요?",
            Self::Tired => "오늘 많이 지치셨나봐요. 충분한 휴식을 취하세요.",
            Self::Bored => "조금 지루한 하루였나봐요. 새로운 일을 시도해보는 건 어떨까요?",
            Self::Confused => "머릿속이 복잡한 하루였군요. 생각을 천천히 정리해보세요.",
            Self::Hopeful => "희망찬 하루였네요! 그 마음을 내일도 간직해보세요.",
            Self::Lonely => "외로운 마음이 느껴져요. 소중한 사람에게 연락해보는 건 어떨까요?",
            Self::Surprised => "깜짝 놀랄 일이 있었나봐요!",
        }
    }

    /// Parses a label leniently: unknown or empty input becomes `Neutral`.
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            log::debug!("Unknown emotion label {:?}, using neutral", name);
            Self::Neutral
        })
    }
}

impl Default for EmotionLabel {
    fn default() -> Self {
        Self::Neutral
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmotionLabel {
    type Err = MoodError;

    /// Case-insensitive; accepts `peaceful` as an alias of `calm`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = match s.trim().to_lowercase().as_str() {
            "happy" => Self::Happy,
            "sad" => Self::Sad,
            "angry" => Self::Angry,
            "neutral" => Self::Neutral,
            "excited" => Self::Excited,
            "calm" | "peaceful" => Self::Calm,
            "anxious" => Self::Anxious,
            "tired" => Self::Tired,
            "bored" => Self::Bored,
            "confused" => Self::Confused,
            "hopeful" => Self::Hopeful,
            "lonely" => Self::Lonely,
            "surprised" => Self::Surprised,
            _ => return Err(MoodError::UnknownLabel(s.to_string())),
        };
        Ok(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("HAPPY".parse::<EmotionLabel>(), Ok(EmotionLabel::Happy));
        assert_eq!(" Lonely ".parse::<EmotionLabel>(), Ok(EmotionLabel::Lonely));
        assert_eq!("peaceful".parse::<EmotionLabel>(), Ok(EmotionLabel::Calm));
    }

    #[test]
    fn test_unknown_label() {
        assert_eq!(
            "grumpy".parse::<EmotionLabel>(),
            Err(MoodError::UnknownLabel("grumpy".to_string()))
        );
        assert_eq!(EmotionLabel::from_name_or_default("grumpy"), EmotionLabel::Neutral);
        assert_eq!(EmotionLabel::from_name_or_default(""), EmotionLabel::Neutral);
    }

    #[test]
    fn test_display_attributes_are_distinct() {
        let mut emojis: Vec<&str> = EmotionLabel::ALL.iter().map(|l| l.emoji()).collect();
        emojis.sort();
        emojis.dedup();
        assert_eq!(emojis.len(), EmotionLabel::ALL.len());
        assert!(!emojis.contains(&DEFAULT_EMOJI));

        for label in EmotionLabel::ALL {
            assert!(label.color().starts_with('#'));
            assert_eq!(label.as_str().parse::<EmotionLabel>(), Ok(label));
        }
    }

    #[test]
    fn test_order_follows_declaration() {
        assert!(EmotionLabel::Happy < EmotionLabel::Excited);
        assert!(EmotionLabel::Surprised < EmotionLabel::Neutral);
        assert_eq!(EmotionLabel::ALL.last(), Some(&EmotionLabel::Neutral));
        let mut sorted = EmotionLabel::ALL.to_vec();
        sorted.sort();
        assert_eq!(sorted, EmotionLabel::ALL.to_vec());
    }
}
