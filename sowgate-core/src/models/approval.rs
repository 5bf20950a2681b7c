use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// One review stage in the fixed pipeline, in order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowStep {
    OpsReview,
    SupplierReview,
    FinancialApproval,
}

impl WorkflowStep {
    /// The fixed step sequence, in pipeline order.
    pub const ALL: [WorkflowStep; 3] = [
        Self::OpsReview,
        Self::SupplierReview,
        Self::FinancialApproval,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpsReview => "OPS_REVIEW",
            Self::SupplierReview => "SUPPLIER_REVIEW",
            Self::FinancialApproval => "FINANCIAL_APPROVAL",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "OPS_REVIEW" => Some(Self::OpsReview),
            "SUPPLIER_REVIEW" => Some(Self::SupplierReview),
            "FINANCIAL_APPROVAL" => Some(Self::FinancialApproval),
            _ => None,
        }
    }
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "APPROVED" => Some(Self::Approved),
            "REJECTED" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// The approval record for one (SOW, step) pair. At most one row exists
/// per pair; the row is created PENDING when its step becomes reachable
/// and acted on exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SowApproval {
    pub id: Uuid,
    pub sow_id: Uuid,
    pub step: WorkflowStep,
    pub status: ApprovalStatus,
    pub ops_approver_id: Option<Uuid>,
    pub supplier_user_id: Option<Uuid>,
    pub financial_approver_id: Option<Uuid>,
    pub acted_at: Option<DateTime<Utc>>,
    pub comment: Option<String>,
}
