use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::milestone::CreateMilestoneInput;

/// A Statement of Work routed through the approval pipeline.
///
/// `total_value_cents` is the sum of the milestone amounts, computed once
/// at creation time and never recomputed afterward. Monetary amounts are
/// integer cents throughout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub template_type: SowTemplateType,
    pub language: Option<String>,
    pub effective_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub cost_center: Option<String>,
    pub location: Option<String>,
    pub out_of_scope: Option<String>,
    pub assumptions: Option<String>,
    pub client_poc_name: Option<String>,
    pub client_poc_email: Option<String>,
    pub total_value_cents: Option<i64>,
    pub payment_terms: Option<String>,
    pub status: SowStatus,
    pub vendor_id: Option<Uuid>,
    pub submitted_by_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Pipeline states. Transitions only ever move forward; the two rejected
/// states and `Active` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SowStatus {
    Draft,
    Submitted,
    OpsApproved,
    SupplierRejected,
    PendingFinancialApproval,
    /// Reserved: present in the domain's status set but no transition
    /// produces it (financial approval moves straight to `Active`).
    FinanciallyApproved,
    FinanciallyRejected,
    Active,
}

impl SowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Submitted => "SUBMITTED",
            Self::OpsApproved => "OPS_APPROVED",
            Self::SupplierRejected => "SUPPLIER_REJECTED",
            Self::PendingFinancialApproval => "PENDING_FINANCIAL_APPROVAL",
            Self::FinanciallyApproved => "FINANCIALLY_APPROVED",
            Self::FinanciallyRejected => "FINANCIALLY_REJECTED",
            Self::Active => "ACTIVE",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "DRAFT" => Some(Self::Draft),
            "SUBMITTED" => Some(Self::Submitted),
            "OPS_APPROVED" => Some(Self::OpsApproved),
            "SUPPLIER_REJECTED" => Some(Self::SupplierRejected),
            "PENDING_FINANCIAL_APPROVAL" => Some(Self::PendingFinancialApproval),
            "FINANCIALLY_APPROVED" => Some(Self::FinanciallyApproved),
            "FINANCIALLY_REJECTED" => Some(Self::FinanciallyRejected),
            "ACTIVE" => Some(Self::Active),
            _ => None,
        }
    }
}

impl fmt::Display for SowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SowTemplateType {
    ManagedProject,
    ManagedService,
    #[serde(rename = "T_M")]
    TM,
}

impl SowTemplateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ManagedProject => "MANAGED_PROJECT",
            Self::ManagedService => "MANAGED_SERVICE",
            Self::TM => "T_M",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "MANAGED_PROJECT" => Some(Self::ManagedProject),
            "MANAGED_SERVICE" => Some(Self::ManagedService),
            "T_M" => Some(Self::TM),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateSowInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub template_type: Option<SowTemplateType>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub effective_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub cost_center: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub out_of_scope: Option<String>,
    #[serde(default)]
    pub assumptions: Option<String>,
    #[serde(default)]
    pub client_poc_name: Option<String>,
    #[serde(default)]
    pub client_poc_email: Option<String>,
    #[serde(default)]
    pub payment_terms: Option<String>,
    #[serde(default)]
    pub vendor_id: Option<Uuid>,
    #[serde(default)]
    pub milestones: Vec<CreateMilestoneInput>,
}
