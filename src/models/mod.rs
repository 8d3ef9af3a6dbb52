use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents a user in the system.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    pub id: String,
    /// Unique system-wide; immutable after creation.
    pub name: String,
    pub display_name: String,
    pub creation_time: DateTime<Utc>,
}

/// Represents a team of users.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Team {
    pub id: String,
    /// Unique system-wide.
    pub name: String,
    pub description: String,
    /// The admin is always present in `members`.
    pub admin: String,
    pub members: Vec<String>,
    pub creation_time: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoardStatus {
    Open,
    Closed,
}

impl fmt::Display for BoardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardStatus::Open => write!(f, "OPEN"),
            BoardStatus::Closed => write!(f, "CLOSED"),
        }
    }
}

/// Represents a board owned by a team.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Board {
    pub id: String,
    /// Unique within the owning team.
    pub name: String,
    pub description: String,
    /// Immutable after creation.
    pub team_id: String,
    pub status: BoardStatus,
    pub creation_time: DateTime<Utc>,
    /// Set when the board is closed.
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Open,
    InProgress,
    Complete,
}

impl TaskStatus {
    pub const VALID_VALUES: &'static str = "OPEN, IN_PROGRESS, COMPLETE";

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "OPEN" => Some(TaskStatus::Open),
            "IN_PROGRESS" => Some(TaskStatus::InProgress),
            "COMPLETE" => Some(TaskStatus::Complete),
            _ => None,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Open => write!(f, "OPEN"),
            TaskStatus::InProgress => write!(f, "IN_PROGRESS"),
            TaskStatus::Complete => write!(f, "COMPLETE"),
        }
    }
}

/// Represents a task on a board.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Task {
    pub id: String,
    /// Unique within the owning board.
    pub title: String,
    pub description: String,
    /// Immutable after creation.
    pub board_id: String,
    pub assignee: Option<String>,
    pub status: TaskStatus,
    pub creation_time: DateTime<Utc>,
}

/// Response body for create endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct IdResponse {
    pub id: String,
}

/// Response body for mutating endpoints that return no record.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_status_round_trips_through_json() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
        let back: TaskStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TaskStatus::InProgress);
    }

    #[test]
    fn task_status_parse_rejects_unknown_values() {
        assert_eq!(TaskStatus::parse("COMPLETE"), Some(TaskStatus::Complete));
        assert_eq!(TaskStatus::parse("DONE"), None);
        assert_eq!(TaskStatus::parse("open"), None);
    }

    #[test]
    fn board_status_serializes_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&BoardStatus::Closed).unwrap(),
            "\"CLOSED\""
        );
        assert_eq!(BoardStatus::Open.to_string(), "OPEN");
    }
}
