// src/validators.rs
//
// Stateless input validation. Uniqueness and cross-entity checks stay in the
// entity handlers, which hold the collection snapshots.

use std::sync::OnceLock;

use regex::Regex;
use uuid::Uuid;

use crate::config::{
    MAX_DESCRIPTION_LENGTH, MAX_DISPLAY_NAME_LENGTH, MAX_DISPLAY_NAME_UPDATE_LENGTH,
    MAX_NAME_LENGTH,
};
use crate::errors::ApiError;
use crate::models::TaskStatus;

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid name pattern"))
}

/// Required, trimmed, non-empty.
pub fn required(value: &str, field: &str) -> Result<String, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

fn max_length(value: &str, field: &str, max: usize) -> Result<(), ApiError> {
    if value.chars().count() > max {
        return Err(ApiError::validation(format!(
            "{} must be <= {} characters",
            field, max
        )));
    }
    Ok(())
}

/// User names carry a restricted character set on top of the length limit.
pub fn user_name(value: &str) -> Result<String, ApiError> {
    let name = required(value, "User name")?;
    max_length(&name, "User name", MAX_NAME_LENGTH)?;
    if !name_pattern().is_match(&name) {
        return Err(ApiError::validation(
            "User name can only contain letters, numbers, hyphens, and underscores",
        ));
    }
    Ok(name)
}

/// Team names, board names and task titles: required and <= 64 characters.
pub fn entity_name(value: &str, field: &str) -> Result<String, ApiError> {
    let name = required(value, field)?;
    max_length(&name, field, MAX_NAME_LENGTH)?;
    Ok(name)
}

/// Descriptions may be empty; <= 128 characters otherwise.
pub fn description(value: &str) -> Result<String, ApiError> {
    let value = value.trim();
    max_length(value, "Description", MAX_DESCRIPTION_LENGTH)?;
    Ok(value.to_string())
}

/// Display names may be empty. Updates allow a longer limit than creation.
pub fn display_name(value: &str, is_update: bool) -> Result<String, ApiError> {
    let value = value.trim();
    let max = if is_update {
        MAX_DISPLAY_NAME_UPDATE_LENGTH
    } else {
        MAX_DISPLAY_NAME_LENGTH
    };
    max_length(value, "Display name", max)?;
    Ok(value.to_string())
}

/// Identifier fields on the user endpoints must be well-formed UUIDs.
pub fn uuid_ref(value: &str, field: &str) -> Result<String, ApiError> {
    let value = required(value, field)?;
    Uuid::parse_str(&value)
        .map_err(|_| ApiError::validation(format!("{} must be a valid UUID", field)))?;
    Ok(value)
}

pub fn task_status(value: &str) -> Result<TaskStatus, ApiError> {
    let value = required(value, "Status")?;
    TaskStatus::parse(&value).ok_or_else(|| {
        ApiError::validation(format!(
            "Status must be one of: {}",
            TaskStatus::VALID_VALUES
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_name_enforces_charset() {
        assert!(user_name("alice_doe-1").is_ok());
        assert!(user_name("alice doe").is_err());
        assert!(user_name("alice!").is_err());
        assert!(user_name("").is_err());
        assert!(user_name("   ").is_err());
    }

    #[test]
    fn user_name_enforces_length() {
        assert!(user_name(&"a".repeat(64)).is_ok());
        assert!(user_name(&"a".repeat(65)).is_err());
    }

    #[test]
    fn entity_name_allows_spaces() {
        assert!(entity_name("Sprint 1", "Board name").is_ok());
        assert!(entity_name("", "Board name").is_err());
        assert!(entity_name(&"b".repeat(65), "Board name").is_err());
    }

    #[test]
    fn description_allows_empty_and_caps_length() {
        assert_eq!(description("").unwrap(), "");
        assert_eq!(description("  padded  ").unwrap(), "padded");
        assert!(description(&"d".repeat(128)).is_ok());
        assert!(description(&"d".repeat(129)).is_err());
    }

    #[test]
    fn display_name_limit_is_wider_on_update() {
        let long = "d".repeat(100);
        assert!(display_name(&long, false).is_err());
        assert!(display_name(&long, true).is_ok());
        assert!(display_name(&"d".repeat(129), true).is_err());
    }

    #[test]
    fn uuid_ref_rejects_malformed_ids() {
        assert!(uuid_ref("not-a-uuid", "User ID").is_err());
        assert!(uuid_ref("", "User ID").is_err());
        let id = Uuid::new_v4().to_string();
        assert_eq!(uuid_ref(&id, "User ID").unwrap(), id);
    }

    #[test]
    fn task_status_names_the_allowed_set() {
        assert_eq!(task_status("IN_PROGRESS").unwrap(), TaskStatus::InProgress);
        let err = task_status("BLOCKED").unwrap_err();
        assert!(err.to_string().contains("OPEN, IN_PROGRESS, COMPLETE"));
    }
}
