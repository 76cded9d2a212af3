use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Completion flag.
    pub done: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /tasks`.
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct NewTask {
    /// 1 to 500 characters.
    #[validate(length(min = 1, max = 500))]
    #[schema(example = "Write the release notes")]
    pub name: String,
    /// Up to 1000 characters.
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    /// Defaults to `false`.
    #[serde(default)]
    pub done: bool,
}

/// Body of `PATCH /tasks/{id}`. Only supplied fields change.
///
/// `description` distinguishes an absent key (leave as is) from an explicit
/// `null` (clear it).
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct PatchTask {
    #[validate(length(min = 1, max = 500))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    #[validate(length(max = 1000))]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub done: Option<bool>,
}

impl PatchTask {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.done.is_none()
    }
}

/// Marks a key that appeared in the body, even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_validation() {
        let valid_input = NewTask {
            name: "Valid Task".to_string(),
            description: Some("Valid Description".to_string()),
            done: false,
        };
        assert!(valid_input.validate().is_ok());

        let empty_name = NewTask {
            name: "".to_string(),
            description: None,
            done: false,
        };
        assert!(empty_name.validate().is_err());

        let long_name = NewTask {
            name: "a".repeat(501),
            description: None,
            done: false,
        };
        assert!(long_name.validate().is_err());

        let long_description = NewTask {
            name: "Valid".to_string(),
            description: Some("b".repeat(1001)),
            done: true,
        };
        assert!(long_description.validate().is_err());
    }

    #[test]
    fn test_done_defaults_to_false() {
        let task: NewTask = serde_json::from_str(r#"{"name":"Buy milk"}"#).unwrap();
        assert!(!task.done);
        assert!(task.description.is_none());
    }

    #[test]
    fn test_patch_distinguishes_null_from_absent() {
        let absent: PatchTask = serde_json::from_str(r#"{"done":true}"#).unwrap();
        assert_eq!(absent.description, None);

        let cleared: PatchTask = serde_json::from_str(r#"{"description":null}"#).unwrap();
        assert_eq!(cleared.description, Some(None));
        assert!(!cleared.is_empty());

        let empty: PatchTask = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_patch_validation() {
        let patch: PatchTask =
            serde_json::from_value(serde_json::json!({ "description": "c".repeat(1001) }))
                .unwrap();
        assert!(patch.validate().is_err());

        let patch: PatchTask = serde_json::from_str(r#"{"name":""}"#).unwrap();
        assert!(patch.validate().is_err());
    }
}
