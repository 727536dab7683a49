//! Kong diary mood tagging
//!
//! This crate holds the closed set of emotion labels a diary entry can carry,
//! their display attributes (emoji, color, description), and the keyword
//! scorer that picks a label for free text.
//!
//! # Example
//!
//! ```
//! use kong_diary_mood::{score_text, EmotionLabel};
//!
//! let result = score_text("오늘은 정말 행복했다");
//! assert_eq!(result.label, EmotionLabel::Happy);
//! assert_eq!(result.label.emoji(), "😸");
//! ```

pub mod emotion;
pub mod scorer;

use thiserror::Error;

pub use emotion::{EmotionLabel, DEFAULT_COLOR, DEFAULT_DESCRIPTION, DEFAULT_EMOJI};
pub use scorer::{keywords_for, score_breakdown, score_text, MoodScore, NEUTRAL_BIAS};

/// Error type for strict label parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoodError {
    #[error("Unknown emotion label: {0}")]
    UnknownLabel(String),
}
