use chrono::Utc;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{ApprovalStatus, SowApproval, WorkflowStep};

use super::{read_enum, read_ts_opt, read_uuid, read_uuid_opt, Database};

impl Database {
    /// Approval rows of a SOW in pipeline-step order.
    pub fn list_approvals(&self, sow_id: Uuid) -> Result<Vec<SowApproval>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT id, sow_id, step, status, ops_approver_id, supplier_user_id, \
             financial_approver_id, acted_at, comment FROM sow_approvals WHERE sow_id = ?1 \
             ORDER BY CASE step \
                 WHEN 'OPS_REVIEW' THEN 0 \
                 WHEN 'SUPPLIER_REVIEW' THEN 1 \
                 ELSE 2 END",
        )?;
        let approvals = stmt
            .query_map([sow_id.to_string()], approval_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(approvals)
    }
}

// Transaction-scoped helpers used by the workflow transitions. All take a
// plain `Connection` so they run inside the caller's transaction.

/// Create the step's row as PENDING only if it does not exist yet.
pub(crate) fn insert_step_if_absent(
    conn: &Connection,
    sow_id: Uuid,
    step: WorkflowStep,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO sow_approvals (id, sow_id, step, status, created_at) \
         VALUES (?1, ?2, ?3, 'PENDING', ?4) \
         ON CONFLICT(sow_id, step) DO NOTHING",
        params![
            Uuid::new_v4().to_string(),
            sow_id.to_string(),
            step.as_str(),
            Utc::now().to_rfc3339()
        ],
    )?;
    Ok(())
}

/// Create the step's row as PENDING, or reset an existing row to PENDING.
/// Transitions use this to unlock the next step.
pub(crate) fn upsert_step_pending(
    conn: &Connection,
    sow_id: Uuid,
    step: WorkflowStep,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO sow_approvals (id, sow_id, step, status, created_at) \
         VALUES (?1, ?2, ?3, 'PENDING', ?4) \
         ON CONFLICT(sow_id, step) DO UPDATE SET status = 'PENDING'",
        params![
            Uuid::new_v4().to_string(),
            sow_id.to_string(),
            step.as_str(),
            Utc::now().to_rfc3339()
        ],
    )?;
    Ok(())
}

/// Mark a step APPROVED or REJECTED, recording the acting user in the
/// step's actor column plus timestamp and comment. Returns the number of
/// rows updated; zero means the row is missing and the caller must abort
/// its transaction.
pub(crate) fn mark_step(
    conn: &Connection,
    sow_id: Uuid,
    step: WorkflowStep,
    status: ApprovalStatus,
    actor_column: &'static str,
    actor_id: Uuid,
    comment: Option<&str>,
) -> rusqlite::Result<usize> {
    conn.execute(
        &format!(
            "UPDATE sow_approvals SET status = ?1, {actor_column} = ?2, acted_at = ?3, \
             comment = ?4 WHERE sow_id = ?5 AND step = ?6"
        ),
        params![
            status.as_str(),
            actor_id.to_string(),
            Utc::now().to_rfc3339(),
            comment,
            sow_id.to_string(),
            step.as_str()
        ],
    )
}

fn approval_from_row(row: &Row) -> rusqlite::Result<SowApproval> {
    Ok(SowApproval {
        id: read_uuid(row, 0)?,
        sow_id: read_uuid(row, 1)?,
        step: read_enum(row, 2, WorkflowStep::from_str)?,
        status: read_enum(row, 3, ApprovalStatus::from_str)?,
        ops_approver_id: read_uuid_opt(row, 4)?,
        supplier_user_id: read_uuid_opt(row, 5)?,
        financial_approver_id: read_uuid_opt(row, 6)?,
        acted_at: read_ts_opt(row, 7)?,
        comment: row.get(8)?,
    })
}
