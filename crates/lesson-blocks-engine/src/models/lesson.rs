use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::render::render_text;

pub type LessonId = i64;

const ELLIPSIS: &str = "...";

/// A lesson as listed within a course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonSummary {
    pub id: LessonId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl LessonSummary {
    /// Plain-text excerpt of the lesson content
    pub fn preview(&self, max_chars: usize) -> String {
        content_preview(&self.content, max_chars)
    }
}

/// Course display order: lessons with an explicit order first (ascending),
/// then the rest newest first. Lessons without a creation time sort last.
pub fn lesson_order(a: &LessonSummary, b: &LessonSummary) -> Ordering {
    match (a.order, b.order) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.created_at.cmp(&a.created_at),
    }
}

pub fn sort_lessons(lessons: &mut [LessonSummary]) {
    lessons.sort_by(lesson_order);
}

/// Cut `text` to at most `max_chars` characters, ending in `...` when cut.
pub fn truncate_content(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Plain-text excerpt of persisted lesson content, whitespace collapsed
pub fn content_preview(raw: &str, max_chars: usize) -> String {
    let text = render_text(&codec::deserialize(raw));
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_content(&collapsed, max_chars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn lesson(id: LessonId, order: Option<i64>, created_day: Option<u32>) -> LessonSummary {
        LessonSummary {
            id,
            title: format!("Lesson {id}"),
            description: None,
            content: String::new(),
            order,
            created_at: created_day.map(|d| Utc.with_ymd_and_hms(2024, 3, d, 9, 0, 0).unwrap()),
        }
    }

    #[test]
    fn ordered_lessons_first_then_newest() {
        let mut lessons = vec![
            lesson(1, None, Some(1)),
            lesson(2, Some(2), Some(5)),
            lesson(3, None, Some(10)),
            lesson(4, Some(1), Some(2)),
            lesson(5, None, None),
        ];
        sort_lessons(&mut lessons);
        let ids: Vec<_> = lessons.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![4, 2, 3, 1, 5]);
    }

    #[rstest]
    #[case("", 50, "")]
    #[case("short", 50, "short")]
    #[case("exactly10!", 10, "exactly10!")]
    #[case("this is eleven", 10, "this is...")]
    #[case("привет, мир", 8, "приве...")]
    #[case("abcdef", 2, "...")]
    fn truncates(#[case] text: &str, #[case] max: usize, #[case] expected: &str) {
        assert_eq!(truncate_content(text, max), expected);
    }

    #[test]
    fn preview_of_structured_content() {
        let raw = r#"{"blocks":[{"type":"heading","data":{"level":1,"text":"Loops"}},{"type":"paragraph","data":{"text":"A <b>loop</b> repeats   work."}}]}"#;
        assert_eq!(content_preview(raw, 50), "Loops A loop repeats work.");
        assert_eq!(content_preview(raw, 12), "Loops A l...");
    }

    #[test]
    fn preview_of_legacy_content() {
        assert_eq!(content_preview("<p>Hello</p>\n<p>World</p>", 50), "Hello World");
    }

    #[test]
    fn deserializes_backend_lesson() {
        let json = r#"{"id":3,"title":"Intro","content":"<p>x</p>","order":null,"createdAt":"2024-03-01T09:00:00Z"}"#;
        let lesson: LessonSummary = serde_json::from_str(json).unwrap();
        assert_eq!(lesson.order, None);
        assert_eq!(lesson.created_at, Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()));
        assert_eq!(lesson.preview(50), "x");
    }
}
