use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A billable deliverable on a SOW. Created together with its parent SOW
/// and immutable afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub id: Uuid,
    pub sow_id: Uuid,
    pub title: String,
    pub amount_cents: i64,
    pub due_date: Option<NaiveDate>,
    pub order_index: i64,
    pub recurring: bool,
    pub acceptance_criteria: Option<String>,
    pub acceptance_method: Option<AcceptanceMethod>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AcceptanceMethod {
    #[serde(rename = "Sign-off")]
    SignOff,
    #[serde(rename = "Test report")]
    TestReport,
    #[serde(rename = "Demo")]
    Demo,
    #[serde(rename = "Documentation")]
    Documentation,
}

impl AcceptanceMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SignOff => "Sign-off",
            Self::TestReport => "Test report",
            Self::Demo => "Demo",
            Self::Documentation => "Documentation",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Sign-off" => Some(Self::SignOff),
            "Test report" => Some(Self::TestReport),
            "Demo" => Some(Self::Demo),
            "Documentation" => Some(Self::Documentation),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateMilestoneInput {
    pub title: String,
    pub amount_cents: i64,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub recurring: bool,
    #[serde(default)]
    pub acceptance_criteria: Option<String>,
    #[serde(default)]
    pub acceptance_method: Option<AcceptanceMethod>,
}
