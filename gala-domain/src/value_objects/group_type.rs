// Attendee group type value object

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupType {
    Regular,
    Vip,
    Invited,
    Admin,
}

impl GroupType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupType::Regular => "regular",
            GroupType::Vip => "vip",
            GroupType::Invited => "invited",
            GroupType::Admin => "admin",
        }
    }
}

impl Default for GroupType {
    fn default() -> Self {
        GroupType::Regular
    }
}

impl From<&str> for GroupType {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "vip" => GroupType::Vip,
            "invited" => GroupType::Invited,
            "admin" => GroupType::Admin,
            _ => GroupType::Regular,
        }
    }
}
