use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseModule {
    pub id: String,
    pub course_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub content: ModuleContent,
    pub order_index: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModuleContent {
    Lesson {
        #[serde(default)]
        sections: Vec<LessonSection>,
    },
    Quiz {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        quiz_id: Option<String>,
    },
    Exercise {
        #[serde(default)]
        sections: Vec<LessonSection>,
    },
}

impl ModuleContent {
    pub fn is_quiz(&self) -> bool {
        matches!(self, ModuleContent::Quiz { .. })
    }

    /// Empty for quizzes.
    pub fn sections(&self) -> &[LessonSection] {
        match self {
            ModuleContent::Lesson { sections } | ModuleContent::Exercise { sections } => sections,
            ModuleContent::Quiz { .. } => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalloutType {
    #[default]
    Info,
    Warning,
    Success,
    Tip,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LessonSection {
    Text {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    Image {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    Video {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    Callout {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default)]
        callout_type: CalloutType,
    },
    List {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default)]
        items: Vec<String>,
    },
}

impl LessonSection {
    pub fn content(&self) -> &str {
        match self {
            LessonSection::Text { content, .. }
            | LessonSection::Image { content, .. }
            | LessonSection::Video { content, .. }
            | LessonSection::Callout { content, .. }
            | LessonSection::List { content, .. } => content,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            LessonSection::Text { title, .. }
            | LessonSection::Image { title, .. }
            | LessonSection::Video { title, .. }
            | LessonSection::Callout { title, .. }
            | LessonSection::List { title, .. } => title.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn lesson_content_parses_tagged_sections() {
        let content: ModuleContent = serde_json::from_value(json!({
            "type": "lesson",
            "sections": [
                { "type": "text", "content": "Blocks link to their parent." },
                { "type": "callout", "content": "Never share your seed phrase.", "callout_type": "warning" },
                { "type": "list", "content": "Key terms", "items": ["block", "hash"] }
            ]
        }))
        .unwrap();

        assert!(!content.is_quiz());
        let sections = content.sections();
        assert_eq!(sections.len(), 3);
        assert!(matches!(
            sections[1],
            LessonSection::Callout { callout_type: CalloutType::Warning, .. }
        ));
        match &sections[2] {
            LessonSection::List { items, .. } => assert_eq!(items, &vec!["block", "hash"]),
            other => panic!("expected list section, got {:?}", other),
        }
    }

    #[test]
    fn quiz_content_carries_no_sections() {
        let content: ModuleContent =
            serde_json::from_value(json!({ "type": "quiz", "quiz_id": "q-1" })).unwrap();

        assert!(content.is_quiz());
        assert!(content.sections().is_empty());
    }

    #[test]
    fn unknown_section_type_is_rejected() {
        let result: Result<LessonSection, _> =
            serde_json::from_value(json!({ "type": "audio", "content": "x" }));
        assert!(result.is_err());
    }
}
