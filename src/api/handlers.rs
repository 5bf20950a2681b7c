use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use sowgate_core::models::{
    CreateSowInput, EligibleApprover, Milestone, Role, Sow, SowApproval,
};

use super::{ApiError, AppState, CurrentUser};

#[derive(Debug, Deserialize, Default)]
pub struct ActionBody {
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SowDetail {
    pub sow: Sow,
    pub milestones: Vec<Milestone>,
    pub approvals: Vec<SowApproval>,
}

pub async fn list_sows(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<Vec<Sow>>, ApiError> {
    Ok(Json(state.db.list_sows()?))
}

pub async fn create_sow(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<CreateSowInput>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    user.require(Role::HiringManager, "create a SOW")?;
    let sow = state.db.create_sow(input)?;
    Ok((StatusCode::CREATED, Json(json!({ "id": sow.id }))))
}

pub async fn get_sow(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SowDetail>, ApiError> {
    let sow = state.db.get_sow(id)?;
    let milestones = state.db.get_milestones(id)?;
    let approvals = state.db.list_approvals(id)?;
    Ok(Json(SowDetail {
        sow,
        milestones,
        approvals,
    }))
}

pub async fn submit_sow(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let user = user.require(Role::HiringManager, "submit")?;
    state.db.submit_sow(id, user.id)?;
    Ok(Json(json!({ "ok": true })))
}

pub async fn ops_approve(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    body: Option<Json<ActionBody>>,
) -> Result<Json<Value>, ApiError> {
    let user = user.require(Role::OpsTeam, "approve")?;
    state.db.ops_approve(id, user.id, comment(&body))?;
    Ok(Json(json!({ "ok": true })))
}

pub async fn supplier_accept(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    body: Option<Json<ActionBody>>,
) -> Result<Json<Value>, ApiError> {
    let user = user.require(Role::Supplier, "accept")?;
    state.db.supplier_accept(id, user.id, comment(&body))?;
    Ok(Json(json!({ "ok": true })))
}

pub async fn supplier_reject(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    body: Option<Json<ActionBody>>,
) -> Result<Json<Value>, ApiError> {
    let user = user.require(Role::Supplier, "reject")?;
    state.db.supplier_reject(id, user.id, comment(&body))?;
    Ok(Json(json!({ "ok": true })))
}

pub async fn financial_approve(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    body: Option<Json<ActionBody>>,
) -> Result<Json<Value>, ApiError> {
    let user = user.require(Role::Approver, "financially approve")?;
    state.db.financial_approve(id, user.id, comment(&body))?;
    Ok(Json(json!({ "ok": true })))
}

pub async fn financial_reject(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    body: Option<Json<ActionBody>>,
) -> Result<Json<Value>, ApiError> {
    let user = user.require(Role::Approver, "financially reject")?;
    state.db.financial_reject(id, user.id, comment(&body))?;
    Ok(Json(json!({ "ok": true })))
}

/// Approvers able to sign off the SOW's total value, smallest sufficient
/// authority first.
pub async fn eligible_approvers(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<EligibleApprover>>, ApiError> {
    let sow = state.db.get_sow(id)?;
    let approvers = state
        .db
        .eligible_financial_approvers(sow.total_value_cents)?;
    Ok(Json(approvers))
}

fn comment(body: &Option<Json<ActionBody>>) -> Option<&str> {
    body.as_ref().and_then(|Json(b)| b.comment.as_deref())
}
