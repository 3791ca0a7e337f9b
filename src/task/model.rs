#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Ongoing,
    Completed,
}

impl TaskStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Ongoing => "ongoing",
            Self::Completed => "completed",
        }
    }

    /// Accepts the lowercase names used in the data file plus a couple
    /// of spellings people actually type.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "pending" | "todo" => Some(Self::Pending),
            "ongoing" | "doing" => Some(Self::Ongoing),
            "completed" | "done" => Some(Self::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: u64,
    pub description: String,
    pub status: TaskStatus,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_accepts_names_and_aliases() {
        assert_eq!(TaskStatus::parse("pending"), Some(TaskStatus::Pending));
        assert_eq!(TaskStatus::parse(" Ongoing "), Some(TaskStatus::Ongoing));
        assert_eq!(TaskStatus::parse("done"), Some(TaskStatus::Completed));
        assert_eq!(TaskStatus::parse("cancelled"), None);
        assert_eq!(TaskStatus::parse(""), None);
    }

    #[test]
    fn status_serializes_by_lowercase_name() {
        let json = serde_json::to_string(&TaskStatus::Ongoing).unwrap();
        assert_eq!(json, "\"ongoing\"");
        let back: TaskStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(back, TaskStatus::Completed);
    }

    #[test]
    fn task_round_trips_through_json() {
        let task = Task {
            id: 7,
            description: "water the plants".to_owned(),
            status: TaskStatus::Pending,
            created_at: "2025-01-02T03:04:05Z".to_owned(),
        };
        let json = serde_json::to_string(&task).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }
}
