use serde_json::Value;
use strum::{AsRefStr, Display};

use crate::format::trim_host;

mod json;

pub use json::JsonState;

/// Prefix the host uses for system-generated message types.
const SYSTEM_KIND_PREFIX: &str = "system_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum MessageStatus {
    #[default]
    Active,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    pub id: String,
    pub user_id: String,
    pub body: String,
    pub status: MessageStatus,
    pub root_id: Option<String>,
    pub kind: String,
}

impl Message {
    pub fn is_system(&self) -> bool {
        self.kind.starts_with(SYSTEM_KIND_PREFIX)
    }

    pub fn is_deleted(&self) -> bool {
        self.status == MessageStatus::Deleted
    }

    pub fn has_body(&self) -> bool {
        !trim_host(&self.body).is_empty()
    }

    pub fn is_thread_reply(&self) -> bool {
        self.root_id
            .as_deref()
            .is_some_and(|root| !root.trim().is_empty())
    }
}

/// What the host hands over when the user picks the quote action.
#[derive(Debug, Clone, Copy)]
pub enum MessageRef<'a> {
    Id(&'a str),
    Message(&'a Message),
}

impl<'a> MessageRef<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            MessageRef::Id(id) => id,
            MessageRef::Message(message) => &message.id,
        }
    }
}

impl<'a> From<&'a str> for MessageRef<'a> {
    fn from(id: &'a str) -> Self {
        MessageRef::Id(id)
    }
}

impl<'a> From<&'a Message> for MessageRef<'a> {
    fn from(message: &'a Message) -> Self {
        MessageRef::Message(message)
    }
}

/// Read-only view of the host store. Both lookups are synchronous and side-effect free.
pub trait StateAccessor: Send + Sync {
    fn message(&self, id: &str) -> Option<Message>;

    /// Raw username value for a user profile; validation happens in the resolver.
    fn username(&self, user_id: &str) -> Option<Value>;
}
