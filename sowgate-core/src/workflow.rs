//! The SOW approval workflow engine.
//!
//! A SOW moves DRAFT → SUBMITTED → OPS_APPROVED → PENDING_FINANCIAL_APPROVAL
//! → ACTIVE, with SUPPLIER_REJECTED and FINANCIALLY_REJECTED as terminal
//! deviations. The three review steps are data, not branching: [`rule`]
//! maps each step to its precondition, outcome statuses, actor column and
//! the step it unlocks, and the shared transition bodies consult that
//! table. Adding or reordering steps does not touch the bodies.
//!
//! Every transition re-reads the SOW status inside its own transaction and
//! commits either all of its writes or none of them. Transitions are
//! deliberately not idempotent: re-running one fails its precondition
//! instead of silently succeeding, which guards against duplicate
//! submissions. Role authorization belongs to the calling layer; the
//! engine trusts the `actor_id` it is handed.

use chrono::Utc;
use rusqlite::params;
use tracing::info;
use uuid::Uuid;

use crate::db::{self, Database};
use crate::error::{Error, Result};
use crate::models::{ApprovalStatus, EligibleApprover, SowStatus, WorkflowStep};

/// How one review step behaves: the status required to act on it, the
/// statuses its outcomes produce, which approval column records the actor,
/// and which step an approval unlocks.
struct StepRule {
    required: SowStatus,
    approved: SowStatus,
    rejected: Option<SowStatus>,
    actor_column: &'static str,
    unlocks: Option<WorkflowStep>,
    approve_action: &'static str,
    reject_action: &'static str,
}

const OPS_REVIEW: StepRule = StepRule {
    required: SowStatus::Submitted,
    approved: SowStatus::OpsApproved,
    rejected: None,
    actor_column: "ops_approver_id",
    unlocks: Some(WorkflowStep::SupplierReview),
    approve_action: "pass OPS review",
    reject_action: "fail OPS review",
};

const SUPPLIER_REVIEW: StepRule = StepRule {
    required: SowStatus::OpsApproved,
    approved: SowStatus::PendingFinancialApproval,
    rejected: Some(SowStatus::SupplierRejected),
    actor_column: "supplier_user_id",
    unlocks: Some(WorkflowStep::FinancialApproval),
    approve_action: "be accepted by the supplier",
    reject_action: "be rejected by the supplier",
};

const FINANCIAL_APPROVAL: StepRule = StepRule {
    required: SowStatus::PendingFinancialApproval,
    approved: SowStatus::Active,
    rejected: Some(SowStatus::FinanciallyRejected),
    actor_column: "financial_approver_id",
    unlocks: None,
    approve_action: "be financially approved",
    reject_action: "be financially rejected",
};

fn rule(step: WorkflowStep) -> &'static StepRule {
    match step {
        WorkflowStep::OpsReview => &OPS_REVIEW,
        WorkflowStep::SupplierReview => &SUPPLIER_REVIEW,
        WorkflowStep::FinancialApproval => &FINANCIAL_APPROVAL,
    }
}

impl Database {
    /// DRAFT → SUBMITTED. Records the submitting user and creates the
    /// OPS_REVIEW approval as PENDING.
    pub fn submit_sow(&self, sow_id: Uuid, submitted_by: Uuid) -> Result<()> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        let (status, _) = db::sow_for_update(&tx, sow_id)?;
        if status != SowStatus::Draft {
            return Err(Error::InvalidStatus {
                action: "be submitted",
                required: SowStatus::Draft,
                actual: status,
            });
        }
        tx.execute(
            "UPDATE sows SET status = ?1, submitted_by_id = ?2, updated_at = ?3 WHERE id = ?4",
            params![
                SowStatus::Submitted.as_str(),
                submitted_by.to_string(),
                Utc::now().to_rfc3339(),
                sow_id.to_string()
            ],
        )?;
        db::upsert_step_pending(&tx, sow_id, WorkflowStep::OpsReview)?;
        tx.commit()?;
        info!(%sow_id, %submitted_by, "SOW submitted");
        Ok(())
    }

    /// SUBMITTED → OPS_APPROVED; unlocks the supplier review.
    pub fn ops_approve(&self, sow_id: Uuid, actor_id: Uuid, comment: Option<&str>) -> Result<()> {
        self.approve_step(WorkflowStep::OpsReview, sow_id, actor_id, comment)
    }

    /// OPS_APPROVED → PENDING_FINANCIAL_APPROVAL; unlocks financial approval.
    pub fn supplier_accept(
        &self,
        sow_id: Uuid,
        actor_id: Uuid,
        comment: Option<&str>,
    ) -> Result<()> {
        self.approve_step(WorkflowStep::SupplierReview, sow_id, actor_id, comment)
    }

    /// OPS_APPROVED → SUPPLIER_REJECTED (terminal).
    pub fn supplier_reject(
        &self,
        sow_id: Uuid,
        actor_id: Uuid,
        comment: Option<&str>,
    ) -> Result<()> {
        self.reject_step(WorkflowStep::SupplierReview, sow_id, actor_id, comment)
    }

    /// PENDING_FINANCIAL_APPROVAL → ACTIVE (terminal), provided the
    /// actor's signature authority limit covers the SOW's total value.
    pub fn financial_approve(
        &self,
        sow_id: Uuid,
        actor_id: Uuid,
        comment: Option<&str>,
    ) -> Result<()> {
        self.approve_step(WorkflowStep::FinancialApproval, sow_id, actor_id, comment)
    }

    /// PENDING_FINANCIAL_APPROVAL → FINANCIALLY_REJECTED (terminal).
    pub fn financial_reject(
        &self,
        sow_id: Uuid,
        actor_id: Uuid,
        comment: Option<&str>,
    ) -> Result<()> {
        self.reject_step(WorkflowStep::FinancialApproval, sow_id, actor_id, comment)
    }

    /// Users whose signature authority limit covers the given total value,
    /// smallest sufficient authority first. `None` means the SOW carries
    /// no value yet and yields an empty list without touching the store.
    pub fn eligible_financial_approvers(
        &self,
        total_value_cents: Option<i64>,
    ) -> Result<Vec<EligibleApprover>> {
        let Some(total) = total_value_cents else {
            return Ok(Vec::new());
        };
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT u.id, u.name, u.email FROM signature_authority_limits l \
             JOIN users u ON u.id = l.user_id \
             WHERE l.limit_amount_cents >= ?1 \
             ORDER BY l.limit_amount_cents ASC",
        )?;
        let approvers = stmt
            .query_map([total], |row| {
                Ok(EligibleApprover {
                    id: db::read_uuid(row, 0)?,
                    name: row.get(1)?,
                    email: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(approvers)
    }

    /// Idempotently materialize PENDING rows for all three steps of a SOW.
    /// Existing rows, whatever their status, are left untouched.
    pub fn ensure_approval_steps(&self, sow_id: Uuid) -> Result<()> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        db::sow_for_update(&tx, sow_id)?;
        for step in WorkflowStep::ALL {
            db::insert_step_if_absent(&tx, sow_id, step)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn approve_step(
        &self,
        step: WorkflowStep,
        sow_id: Uuid,
        actor_id: Uuid,
        comment: Option<&str>,
    ) -> Result<()> {
        let r = rule(step);
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        let (status, total_value_cents) = db::sow_for_update(&tx, sow_id)?;
        if status != r.required {
            return Err(Error::InvalidStatus {
                action: r.approve_action,
                required: r.required,
                actual: status,
            });
        }
        if step == WorkflowStep::FinancialApproval {
            // An absent total value counts as zero; ties are allowed. An
            // actor with no limit row at all is rejected outright.
            let total_cents = total_value_cents.unwrap_or(0);
            let Some(limit_cents) = db::signature_limit(&tx, actor_id)? else {
                return Err(Error::InsufficientAuthority {
                    limit_cents: 0,
                    total_cents,
                });
            };
            if limit_cents < total_cents {
                return Err(Error::InsufficientAuthority {
                    limit_cents,
                    total_cents,
                });
            }
        }
        let changed = db::mark_step(
            &tx,
            sow_id,
            step,
            ApprovalStatus::Approved,
            r.actor_column,
            actor_id,
            comment,
        )?;
        if changed == 0 {
            return Err(Error::ApprovalMissing { sow_id, step });
        }
        tx.execute(
            "UPDATE sows SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![r.approved.as_str(), Utc::now().to_rfc3339(), sow_id.to_string()],
        )?;
        if let Some(next) = r.unlocks {
            db::upsert_step_pending(&tx, sow_id, next)?;
        }
        tx.commit()?;
        info!(%sow_id, %actor_id, step = step.as_str(), status = r.approved.as_str(), "step approved");
        Ok(())
    }

    fn reject_step(
        &self,
        step: WorkflowStep,
        sow_id: Uuid,
        actor_id: Uuid,
        comment: Option<&str>,
    ) -> Result<()> {
        let r = rule(step);
        let Some(rejected) = r.rejected else {
            return Err(Error::InvalidInput("step has no rejection transition"));
        };
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        let (status, _) = db::sow_for_update(&tx, sow_id)?;
        if status != r.required {
            return Err(Error::InvalidStatus {
                action: r.reject_action,
                required: r.required,
                actual: status,
            });
        }
        let changed = db::mark_step(
            &tx,
            sow_id,
            step,
            ApprovalStatus::Rejected,
            r.actor_column,
            actor_id,
            comment,
        )?;
        if changed == 0 {
            return Err(Error::ApprovalMissing { sow_id, step });
        }
        tx.execute(
            "UPDATE sows SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![rejected.as_str(), Utc::now().to_rfc3339(), sow_id.to_string()],
        )?;
        tx.commit()?;
        info!(%sow_id, %actor_id, step = step.as_str(), status = rejected.as_str(), "step rejected");
        Ok(())
    }
}
