use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub duration_minutes: u32,
    pub difficulty: Difficulty,
    pub icon: String,
    pub color: String,
    pub order_index: i32,
    pub is_locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_demo: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prerequisite_course_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// Unlocked courses are always open. A locked course opens once its
    /// prerequisite is in `completed_course_ids`; without a prerequisite it
    /// stays closed.
    pub fn is_accessible(&self, completed_course_ids: &HashSet<String>) -> bool {
        if !self.is_locked {
            return true;
        }
        self.prerequisite_course_id
            .as_ref()
            .is_some_and(|id| completed_course_ids.contains(id))
    }

    pub fn is_demo(&self) -> bool {
        self.is_demo.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(is_locked: bool, prerequisite: Option<&str>) -> Course {
        let now = Utc::now();
        Course {
            id: "c2".to_string(),
            title: "Smart Contracts".to_string(),
            description: "Write your first contract".to_string(),
            category: "development".to_string(),
            duration_minutes: 90,
            difficulty: Difficulty::Beginner,
            icon: "code".to_string(),
            color: "#4f46e5".to_string(),
            order_index: 2,
            is_locked,
            is_demo: None,
            prerequisite_course_id: prerequisite.map(str::to_string),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn unlocked_course_without_prerequisite_is_open() {
        assert!(course(false, None).is_accessible(&HashSet::new()));
    }

    #[test]
    fn locked_course_opens_after_prerequisite() {
        let c = course(true, Some("c1"));
        assert!(!c.is_accessible(&HashSet::new()));

        let done: HashSet<String> = ["c1".to_string()].into_iter().collect();
        assert!(c.is_accessible(&done));
    }

    #[test]
    fn locked_course_without_prerequisite_stays_closed() {
        let done: HashSet<String> = ["c1".to_string()].into_iter().collect();
        assert!(!course(true, None).is_accessible(&done));
    }

    #[test]
    fn optional_fields_are_omitted_when_absent() {
        let value = serde_json::to_value(course(false, None)).unwrap();
        assert_eq!(value["difficulty"], "beginner");
        assert!(value.get("is_demo").is_none());
        assert!(value.get("prerequisite_course_id").is_none());
    }
}
