use serde::Deserialize;
use serde_json::Value;

use super::{Message, MessageStatus, StateAccessor};

const DELETED_STATE: &str = "DELETED";

/// `StateAccessor` over a JSON snapshot of the host store.
///
/// Messages live under `entities.posts.posts.<id>` and profiles under
/// `entities.users.profiles.<user_id>`. Anything missing or oddly shaped reads as absent.
#[derive(Debug, Clone, Default)]
pub struct JsonState {
    root: Value,
}

#[derive(Debug, Deserialize)]
struct PostRecord {
    id: String,
    #[serde(default)]
    user_id: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    root_id: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

impl From<PostRecord> for Message {
    fn from(record: PostRecord) -> Self {
        let status = match record.state.as_deref() {
            Some(DELETED_STATE) => MessageStatus::Deleted,
            _ => MessageStatus::Active,
        };
        Message {
            id: record.id,
            user_id: record.user_id,
            body: record.message.unwrap_or_default(),
            status,
            root_id: record.root_id.filter(|root| !root.is_empty()),
            kind: record.kind.unwrap_or_default(),
        }
    }
}

impl JsonState {
    pub fn new(root: Value) -> Self {
        Self { root }
    }
}

impl StateAccessor for JsonState {
    fn message(&self, id: &str) -> Option<Message> {
        let raw = self
            .root
            .get("entities")?
            .get("posts")?
            .get("posts")?
            .get(id)?;
        match PostRecord::deserialize(raw) {
            Ok(record) => Some(record.into()),
            Err(err) => {
                tracing::warn!(message_id = id, %err, "malformed message in state snapshot");
                None
            }
        }
    }

    fn username(&self, user_id: &str) -> Option<Value> {
        self.root
            .get("entities")?
            .get("users")?
            .get("profiles")?
            .get(user_id)?
            .get("username")
            .cloned()
    }
}
