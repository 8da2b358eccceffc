//! Prototype data models.

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;
use uuid::Uuid;

pub const TITLE_MAX_LEN: usize = 255;
pub const DESCRIPTION_MAX_LEN: usize = 255;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, Default, PartialEq, Eq)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Private,
    Public,
}

/// A prototype record: an arbitrary JSON document owned by exactly one user.
///
/// `owner_id` is immutable after creation. The owner holds full implicit
/// rights and is never stored in the collaborator relation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Prototype {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub content: serde_json::Value,
    pub visibility: Visibility,
    pub owner_id: Uuid,
    #[ts(type = "number")]
    pub created_at: i64,
    #[ts(type = "number")]
    pub updated_at: i64,
}

impl Prototype {
    pub fn new(create: PrototypeCreate, owner_id: Uuid) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            id: Uuid::new_v4(),
            title: create.title,
            description: create.description,
            content: create.content,
            visibility: create.visibility,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update. Omitted fields keep their current value;
    /// an explicit `"description": null` clears the description.
    pub fn apply(&mut self, update: PrototypeUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(content) = update.content {
            self.content = content;
        }
        if let Some(visibility) = update.visibility {
            self.visibility = visibility;
        }
        self.updated_at = chrono::Utc::now().timestamp_millis();
    }
}

/// Fields accepted on prototype creation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PrototypeCreate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: serde_json::Value,
    #[serde(default)]
    pub visibility: Visibility,
}

/// Fields accepted on prototype update, all optional.
///
/// `description` distinguishes "omitted" (keep) from an explicit null
/// (clear), so it is a nested option.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PrototypeUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[ts(optional, type = "string | null")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub content: Option<serde_json::Value>,
    #[serde(default)]
    pub visibility: Option<Visibility>,
}

// A present field always deserializes to `Some(inner)`, so `null` becomes
// `Some(None)` while a missing field falls back to the `None` default.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_description_omitted_vs_null() {
        let omitted: PrototypeUpdate = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(omitted.description, None);

        let cleared: PrototypeUpdate = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(cleared.description, Some(None));

        let set: PrototypeUpdate =
            serde_json::from_str(r#"{"description": "hello"}"#).unwrap();
        assert_eq!(set.description, Some(Some("hello".to_string())));
    }

    #[test]
    fn test_apply_clears_description_on_explicit_null() {
        let mut proto = Prototype::new(
            PrototypeCreate {
                title: "demo".to_string(),
                description: Some("old".to_string()),
                content: serde_json::json!({}),
                visibility: Visibility::Private,
            },
            Uuid::new_v4(),
        );

        proto.apply(PrototypeUpdate::default());
        assert_eq!(proto.description.as_deref(), Some("old"));

        proto.apply(PrototypeUpdate {
            description: Some(None),
            ..Default::default()
        });
        assert_eq!(proto.description, None);
    }
}
