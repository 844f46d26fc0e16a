use serde::{Deserialize, Serialize};

use crate::domain::DocumentId;

/// Body for POST `/_api/document` and `/_api/edge`: `{}` when the server
/// should assign the key, `{"_key": K}` for a client-supplied key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewEntityBody {
    #[serde(rename = "_key", default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl NewEntityBody {
    pub fn with_key(key: Option<&str>) -> Self {
        Self {
            key: key.map(str::to_string),
        }
    }
}

/// The `_id`/`_key`/`_rev` triple the store returns for create and update
/// operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentHeader {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    #[serde(rename = "_key")]
    pub key: String,
    #[serde(rename = "_rev")]
    pub rev: String,
}

/// Collection descriptor served by GET `/_api/collection/{identifier}`.
///
/// `status` and `collection_type` stay as raw wire codes so descriptors with
/// codes this client does not know survive a round-trip; decode them with
/// [`crate::domain::CollectionStatus::from_code`] and
/// [`crate::domain::CollectionType::from_code`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub id: String,
    pub name: String,
    pub status: i32,
    #[serde(rename = "type")]
    pub collection_type: i32,
    #[serde(rename = "isSystem", default)]
    pub is_system: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_entity_body_serializes_empty_without_key() {
        let body = NewEntityBody::with_key(None);
        assert_eq!(serde_json::to_string(&body).expect("serialize"), "{}");
    }

    #[test]
    fn new_entity_body_serializes_wire_key_field() {
        let body = NewEntityBody::with_key(Some("alice"));
        assert_eq!(
            serde_json::to_string(&body).expect("serialize"),
            "{\"_key\":\"alice\"}"
        );
    }

    #[test]
    fn collection_info_keeps_unknown_codes() {
        let raw = r#"{"id":"9001","name":"users","status":42,"type":17,"isSystem":false}"#;
        let info: CollectionInfo = serde_json::from_str(raw).expect("deserialize");
        assert_eq!(info.status, 42);
        assert_eq!(info.collection_type, 17);
        let back = serde_json::to_value(&info).expect("serialize");
        assert_eq!(back["status"], 42);
        assert_eq!(back["type"], 17);
    }

    #[test]
    fn collection_info_defaults_is_system() {
        let raw = r#"{"id":"9001","name":"users","status":3,"type":2}"#;
        let info: CollectionInfo = serde_json::from_str(raw).expect("deserialize");
        assert!(!info.is_system);
    }
}
