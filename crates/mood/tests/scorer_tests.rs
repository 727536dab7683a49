use kong_diary_mood::{keywords_for, score_text, EmotionLabel, MoodScore};

#[test]
fn test_empty_text_is_neutral() {
    assert_eq!(
        score_text(""),
        MoodScore {
            label: EmotionLabel::Neutral,
            score: 1
        }
    );
    assert_eq!(score_text("   \n").label, EmotionLabel::Neutral);
}

#[test]
fn test_text_without_keywords_is_neutral() {
    let result = score_text("오늘은 도서관에 갔다");
    assert_eq!(result.label, EmotionLabel::Neutral);
    assert_eq!(result.score, 1);
}

#[test]
fn test_single_label_counts_occurrences() {
    // 우울 twice and 눈물 once
    let result = score_text("우울하고 눈물이 났다. 정말 우울해");
    assert_eq!(result.label, EmotionLabel::Sad);
    assert_eq!(result.score, 3);
}

#[test]
fn test_score_grows_with_keyword_count() {
    let once = score_text("피곤");
    let twice = score_text("피곤 피곤");
    let thrice = score_text("피곤 피곤 피곤");
    assert_eq!(once.label, EmotionLabel::Tired);
    assert!(once.score < twice.score);
    assert!(twice.score < thrice.score);
    assert_eq!(thrice.score, 3);
}

#[test]
fn test_tie_prefers_first_declared_label() {
    // happy(1), neutral(1 from bias) and excited(1) tie; happy is declared first
    let result = score_text("오늘 너무 행복하고 신나");
    assert_eq!(result.label, EmotionLabel::Happy);
    assert_eq!(result.score, 1);
}

#[test]
fn test_single_keyword_beats_neutral_bias() {
    let result = score_text("짜증");
    assert_eq!(result.label, EmotionLabel::Angry);
    assert_eq!(result.score, 1);

    let result = score_text("두근");
    assert_eq!(result.label, EmotionLabel::Excited);
    assert_eq!(result.score, 1);

    let result = score_text("깜짝");
    assert_eq!(result.label, EmotionLabel::Surprised);
}

#[test]
fn test_neutral_keyword_adds_to_bias() {
    let result = score_text("그냥 보통");
    assert_eq!(result.label, EmotionLabel::Neutral);
    assert_eq!(result.score, 3);
}

#[test]
fn test_clear_winner_beats_earlier_labels() {
    let result = score_text("행복했지만 너무 외롭고 쓸쓸했다");
    assert_eq!(result.label, EmotionLabel::Lonely);
    assert_eq!(result.score, 2);
}

#[test]
fn test_matching_is_case_insensitive() {
    // ASCII text never matches the Korean stems, but casing must not matter either way
    assert_eq!(score_text("HAPPY day"), score_text("happy DAY"));
}

#[test]
fn test_every_keyword_alone_scores_its_label() {
    for label in EmotionLabel::ALL {
        let bias = if label == EmotionLabel::Neutral { 1 } else { 0 };
        for stem in keywords_for(label) {
            let result = score_text(stem);
            assert_eq!(result.label, label, "{} did not score {}", stem, label);
            assert_eq!(result.score, 1 + bias, "{} scored {}", stem, result.score);
        }
    }
}

#[test]
fn test_repeated_keyword_scores_its_count() {
    for label in EmotionLabel::ALL {
        if label == EmotionLabel::Neutral {
            continue;
        }
        let stem = keywords_for(label)[0];
        let text = format!("{} 그리고 {}", stem, stem);
        let result = score_text(&text);
        assert_eq!(result.label, label);
        assert_eq!(result.score, 2);
    }
}
