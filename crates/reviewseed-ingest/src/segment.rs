//! Sentence splitting for Japanese review text.

use reviewseed_store::SentenceEntity;

/// Characters that end a sentence. The terminator stays with its sentence.
const TERMINATORS: &[char] = &['。', '！', '？', '!', '?', '\n'];

/// Title used for blank reviews.
const DEFAULT_TITLE: &str = "レビュー";
const TITLE_MAX_CHARS: usize = 30;

fn is_terminator(c: char) -> bool {
    TERMINATORS.contains(&c)
}

/// Line boundaries, including `\r`, form feeds, and the Unicode separators.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Split text into trimmed, non-empty sentences. A trailing fragment without
/// a terminator is kept as the last sentence.
pub fn split_into_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if is_terminator(c) {
            let end = i + c.len_utf8();
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            start = end;
        }
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }
    sentences
}

/// Wrap sentences as `{review_id}-sentence-{nn}` entities with zeroed annotations.
pub fn sentence_entities(review_id: &str, sentences: &[String]) -> Vec<SentenceEntity> {
    sentences
        .iter()
        .enumerate()
        .map(|(i, text)| {
            SentenceEntity::new(format!("{}-sentence-{:02}", review_id, i + 1), text.clone())
        })
        .collect()
}

/// Short title: the first sentence of the first line, at most 30 characters.
pub fn create_title(text: &str) -> String {
    let first_line = text.trim().split(is_line_break).next().unwrap_or("").trim();
    if first_line.is_empty() {
        return DEFAULT_TITLE.to_string();
    }
    let mut sentence = first_line
        .split(is_terminator)
        .next()
        .unwrap_or("")
        .trim();
    if sentence.is_empty() {
        sentence = first_line;
    }
    truncate_chars(sentence, TITLE_MAX_CHARS)
}

/// Keep the first `max` characters, appending `…` if anything was cut.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_keeps_terminators_and_tail() {
        assert_eq!(
            split_into_sentences("今日は晴れ。明日は雨？よろしく"),
            vec!["今日は晴れ。", "明日は雨？", "よろしく"]
        );
    }

    #[test]
    fn test_split_handles_ascii_marks_and_newlines() {
        assert_eq!(
            split_into_sentences("Great!  Really?\n\n  最高！ "),
            vec!["Great!", "Really?", "最高！"]
        );
    }

    #[test]
    fn test_split_empty() {
        assert!(split_into_sentences("").is_empty());
        assert!(split_into_sentences(" \n\n ").is_empty());
    }

    #[test]
    fn test_sentence_entity_ids() {
        let entities = sentence_entities(
            "prod-001-rev-0003",
            &["一。".to_string(), "二。".to_string()],
        );
        assert_eq!(entities[0].id, "prod-001-rev-0003-sentence-01");
        assert_eq!(entities[1].id, "prod-001-rev-0003-sentence-02");
        assert_eq!(entities[1].text, "二。");
    }

    #[test]
    fn test_create_title() {
        assert_eq!(create_title("音質が良い。でも高い。"), "音質が良い");
        assert_eq!(create_title("   "), "レビュー");
        assert_eq!(create_title("。残り"), "。残り");
        let long = "あ".repeat(40);
        assert_eq!(create_title(&long), format!("{}…", "あ".repeat(30)));
    }

    #[test]
    fn test_create_title_stops_at_any_line_break() {
        assert_eq!(create_title("一行目\r二行目\r\n三行目"), "一行目");
        assert_eq!(create_title("上の段\u{2028}下の段"), "上の段");
        assert_eq!(create_title("\r\n  前置き\n本文"), "前置き");
    }
}
