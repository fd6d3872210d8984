//! Change events for the dashboard push channel
//!
//! Ephemeral notifications sent over the SSE fanout when a resource
//! changes. Never persisted; a dashboard that is not connected at publish
//! time never sees the event. On an id-qualified delete, clients remove the
//! entity locally; on everything else they re-fetch the affected collection
//! from the canonical store rather than trusting the embedded payload.

use serde::{Deserialize, Serialize};

/// What happened to the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    Create,
    Update,
    Delete,
}

/// A change notification on the wire between the broadcaster and clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Resource collection name ("students", "faculty", "assignments")
    pub resource: String,
    pub action: ChangeAction,
    /// Id of the affected entity (delete events)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Snapshot of the affected entity (create/update events)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ChangeEvent {
    pub fn created<T: Serialize>(resource: &str, data: &T) -> Self {
        Self {
            resource: resource.to_string(),
            action: ChangeAction::Create,
            id: None,
            data: serde_json::to_value(data).ok(),
        }
    }

    pub fn updated<T: Serialize>(resource: &str, data: &T) -> Self {
        Self {
            resource: resource.to_string(),
            action: ChangeAction::Update,
            id: None,
            data: serde_json::to_value(data).ok(),
        }
    }

    pub fn deleted(resource: &str, id: &str) -> Self {
        Self {
            resource: resource.to_string(),
            action: ChangeAction::Delete,
            id: Some(id.to_string()),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_event_carries_id_not_data() {
        let event = ChangeEvent::deleted("assignments", "abc-123");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["resource"], "assignments");
        assert_eq!(json["action"], "delete");
        assert_eq!(json["id"], "abc-123");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn create_event_embeds_payload() {
        let event = ChangeEvent::created("students", &serde_json::json!({"sid": "S1"}));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["action"], "create");
        assert_eq!(json["data"]["sid"], "S1");
        assert!(json.get("id").is_none());
    }
}
