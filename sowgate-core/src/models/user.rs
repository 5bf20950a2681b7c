use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Which workflow operations a user may invoke is decided by the calling
/// layer from this role; the workflow engine itself never re-checks it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    HiringManager,
    OpsTeam,
    Supplier,
    Approver,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HiringManager => "HIRING_MANAGER",
            Self::OpsTeam => "OPS_TEAM",
            Self::Supplier => "SUPPLIER",
            Self::Approver => "APPROVER",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "HIRING_MANAGER" => Some(Self::HiringManager),
            "OPS_TEAM" => Some(Self::OpsTeam),
            "SUPPLIER" => Some(Self::Supplier),
            "APPROVER" => Some(Self::Approver),
            _ => None,
        }
    }

    /// Human-readable name used in authorization error messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::HiringManager => "Hiring Manager",
            Self::OpsTeam => "OPS",
            Self::Supplier => "Supplier",
            Self::Approver => "Approver",
        }
    }
}
