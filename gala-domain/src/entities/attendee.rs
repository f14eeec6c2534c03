// Attendee and attendee group entities

use serde::{Deserialize, Serialize};

use crate::value_objects::{AttendeeId, EventId, GroupId, GroupType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendeeGroup {
    pub id: GroupId,
    pub event_id: EventId,
    pub name: String,
    pub group_type: GroupType,
    /// Hex SHA-256 of the join password; `None` means the group is open.
    pub password_hash: Option<String>,
}

/// Group as exposed to clients, without the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct AttendeeGroupView {
    pub id: GroupId,
    pub event_id: EventId,
    pub name: String,
    pub group_type: GroupType,
    pub password_protected: bool,
}

impl From<&AttendeeGroup> for AttendeeGroupView {
    fn from(group: &AttendeeGroup) -> Self {
        Self {
            id: group.id,
            event_id: group.event_id,
            name: group.name.clone(),
            group_type: group.group_type,
            password_protected: group.password_hash.is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendee {
    pub id: AttendeeId,
    pub event_id: EventId,
    pub group_id: Option<GroupId>,
    pub name: String,
    pub banned: bool,
    pub joined_at: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewGroup {
    pub name: String,
    #[serde(default)]
    pub group_type: GroupType,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JoinRequest {
    pub invite_code: String,
    pub name: String,
    #[serde(default)]
    pub group_id: Option<GroupId>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Case-insensitive key used to recognise a returning guest.
pub fn attendee_name_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
