use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{CreateSowInput, Milestone, Sow, SowStatus, SowTemplateType};

use super::{
    read_date_opt, read_enum, read_enum_opt, read_ts, read_uuid, read_uuid_opt, Database,
};

const SOW_COLUMNS: &str = "id, title, description, template_type, language, effective_date, \
     end_date, cost_center, location, out_of_scope, assumptions, client_poc_name, \
     client_poc_email, total_value_cents, payment_terms, status, vendor_id, submitted_by_id, \
     created_at, updated_at";

impl Database {
    /// Create a SOW in DRAFT together with its milestones, in one
    /// transaction. The total value is the sum of the milestone amounts
    /// (NULL when there are none) and is not recomputed afterward.
    pub fn create_sow(&self, input: CreateSowInput) -> Result<Sow> {
        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(Error::InvalidInput("title is required"));
        }
        for m in &input.milestones {
            if m.title.trim().is_empty() {
                return Err(Error::InvalidInput("milestone title is required"));
            }
            if m.amount_cents <= 0 {
                return Err(Error::InvalidInput("milestone amount must be positive"));
            }
        }

        let total_value_cents = if input.milestones.is_empty() {
            None
        } else {
            Some(input.milestones.iter().map(|m| m.amount_cents).sum())
        };
        let template_type = input.template_type.unwrap_or(SowTemplateType::ManagedProject);
        let id = Uuid::new_v4();
        let now = Utc::now();

        let mut conn = self.lock();
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO sows (id, title, description, template_type, language, effective_date, \
             end_date, cost_center, location, out_of_scope, assumptions, client_poc_name, \
             client_poc_email, total_value_cents, payment_terms, status, vendor_id, \
             created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
            params![
                id.to_string(),
                title,
                input.description,
                template_type.as_str(),
                input.language,
                input.effective_date.map(|d| d.to_string()),
                input.end_date.map(|d| d.to_string()),
                input.cost_center,
                input.location,
                input.out_of_scope,
                input.assumptions,
                input.client_poc_name,
                input.client_poc_email,
                total_value_cents,
                input.payment_terms,
                SowStatus::Draft.as_str(),
                input.vendor_id.map(|v| v.to_string()),
                now.to_rfc3339(),
                now.to_rfc3339(),
            ],
        )?;
        for (order_index, m) in input.milestones.iter().enumerate() {
            tx.execute(
                "INSERT INTO milestones (id, sow_id, title, amount_cents, due_date, order_index, \
                 recurring, acceptance_criteria, acceptance_method, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    Uuid::new_v4().to_string(),
                    id.to_string(),
                    m.title.trim(),
                    m.amount_cents,
                    m.due_date.map(|d| d.to_string()),
                    order_index as i64,
                    m.recurring,
                    m.acceptance_criteria,
                    m.acceptance_method.map(|a| a.as_str()),
                    now.to_rfc3339(),
                ],
            )?;
        }
        tx.commit()?;

        Ok(Sow {
            id,
            title,
            description: input.description,
            template_type,
            language: input.language,
            effective_date: input.effective_date,
            end_date: input.end_date,
            cost_center: input.cost_center,
            location: input.location,
            out_of_scope: input.out_of_scope,
            assumptions: input.assumptions,
            client_poc_name: input.client_poc_name,
            client_poc_email: input.client_poc_email,
            total_value_cents,
            payment_terms: input.payment_terms,
            status: SowStatus::Draft,
            vendor_id: input.vendor_id,
            submitted_by_id: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Fetch one SOW or fail with [`Error::SowNotFound`].
    pub fn get_sow(&self, id: Uuid) -> Result<Sow> {
        self.lock()
            .query_row(
                &format!("SELECT {SOW_COLUMNS} FROM sows WHERE id = ?1"),
                [id.to_string()],
                sow_from_row,
            )
            .optional()?
            .ok_or(Error::SowNotFound(id))
    }

    /// All SOWs, most recently updated first.
    pub fn list_sows(&self) -> Result<Vec<Sow>> {
        let conn = self.lock();
        let mut stmt =
            conn.prepare(&format!("SELECT {SOW_COLUMNS} FROM sows ORDER BY updated_at DESC"))?;
        let sows = stmt
            .query_map([], sow_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(sows)
    }

    /// Milestones of a SOW in insertion order.
    pub fn get_milestones(&self, sow_id: Uuid) -> Result<Vec<Milestone>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT id, sow_id, title, amount_cents, due_date, order_index, recurring, \
             acceptance_criteria, acceptance_method FROM milestones \
             WHERE sow_id = ?1 ORDER BY order_index",
        )?;
        let milestones = stmt
            .query_map([sow_id.to_string()], milestone_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(milestones)
    }
}

/// Status and total value of a SOW, read inside a transition's transaction
/// immediately before the precondition check.
pub(crate) fn sow_for_update(conn: &Connection, id: Uuid) -> Result<(SowStatus, Option<i64>)> {
    conn.query_row(
        "SELECT status, total_value_cents FROM sows WHERE id = ?1",
        [id.to_string()],
        |row| Ok((read_enum(row, 0, SowStatus::from_str)?, row.get(1)?)),
    )
    .optional()?
    .ok_or(Error::SowNotFound(id))
}

fn sow_from_row(row: &Row) -> rusqlite::Result<Sow> {
    Ok(Sow {
        id: read_uuid(row, 0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        template_type: read_enum(row, 3, SowTemplateType::from_str)?,
        language: row.get(4)?,
        effective_date: read_date_opt(row, 5)?,
        end_date: read_date_opt(row, 6)?,
        cost_center: row.get(7)?,
        location: row.get(8)?,
        out_of_scope: row.get(9)?,
        assumptions: row.get(10)?,
        client_poc_name: row.get(11)?,
        client_poc_email: row.get(12)?,
        total_value_cents: row.get(13)?,
        payment_terms: row.get(14)?,
        status: read_enum(row, 15, SowStatus::from_str)?,
        vendor_id: read_uuid_opt(row, 16)?,
        submitted_by_id: read_uuid_opt(row, 17)?,
        created_at: read_ts(row, 18)?,
        updated_at: read_ts(row, 19)?,
    })
}

fn milestone_from_row(row: &Row) -> rusqlite::Result<Milestone> {
    Ok(Milestone {
        id: read_uuid(row, 0)?,
        sow_id: read_uuid(row, 1)?,
        title: row.get(2)?,
        amount_cents: row.get(3)?,
        due_date: read_date_opt(row, 4)?,
        order_index: row.get(5)?,
        recurring: row.get(6)?,
        acceptance_criteria: row.get(7)?,
        acceptance_method: read_enum_opt(row, 8, crate::models::AcceptanceMethod::from_str)?,
    })
}
