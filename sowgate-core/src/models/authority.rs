use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The maximum monetary value a given approver may financially approve.
/// One row per user; seeded and administered outside the workflow engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureAuthorityLimit {
    pub user_id: Uuid,
    pub limit_amount_cents: i64,
}

/// Projection returned by the financial-approver eligibility query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibleApprover {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}
