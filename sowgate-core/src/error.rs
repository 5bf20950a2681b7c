use uuid::Uuid;

use crate::models::{SowStatus, WorkflowStep};

pub type Result<T> = std::result::Result<T, Error>;

/// Everything the core can fail with. Workflow transitions surface these
/// without retrying; callers decide how to render them.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The SOW is not in the status a transition requires. Nothing was
    /// persisted.
    #[error("SOW must be {required} to {action} (current status: {actual})")]
    InvalidStatus {
        action: &'static str,
        required: SowStatus,
        actual: SowStatus,
    },

    /// Financial approval attempted by a user whose signature authority
    /// limit is below the SOW's total value (an actor holding no limit
    /// row at all is rejected regardless of the value).
    #[error("signature authority limit {limit_cents} is below this SOW value {total_cents}")]
    InsufficientAuthority { limit_cents: i64, total_cents: i64 },

    #[error("SOW not found: {0}")]
    SowNotFound(Uuid),

    /// A transition's approval-row update matched no row. Raised before
    /// commit so the whole transaction rolls back.
    #[error("no {step} approval row exists for SOW {sow_id}")]
    ApprovalMissing { sow_id: Uuid, step: WorkflowStep },

    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("could not determine a data directory for the database")]
    NoDataDir,

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Db(#[from] rusqlite::Error),
}
