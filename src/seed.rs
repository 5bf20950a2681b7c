//! Demo dataset: four roles' worth of users, two signature authority
//! limits, one vendor and one sample DRAFT SOW. Idempotent; safe to
//! re-run against an existing database.

use sowgate_core::db::Database;
use sowgate_core::models::{
    AcceptanceMethod, CreateMilestoneInput, CreateSowInput, Role, SowTemplateType,
};

pub fn run(db: &Database) -> anyhow::Result<()> {
    db.upsert_user("Alex Hiring", "hm@vms.local", Role::HiringManager)?;
    db.upsert_user("Sam Ops", "ops@vms.local", Role::OpsTeam)?;
    db.upsert_user("Taylor Supplier", "supplier@vms.local", Role::Supplier)?;
    let approver50 = db.upsert_user("Jordan Approver", "approver50@vms.local", Role::Approver)?;
    let approver200 =
        db.upsert_user("Morgan Senior Approver", "approver200@vms.local", Role::Approver)?;

    db.upsert_signature_limit(approver50.id, 50_000_00)?;
    db.upsert_signature_limit(approver200.id, 200_000_00)?;

    let vendor = db.upsert_vendor(
        "Acme Staffing Inc.",
        "SUP-001",
        Some("contracts@acme.example.com"),
    )?;

    // One sample SOW in DRAFT, only on a fresh database.
    if db.list_sows()?.is_empty() {
        db.create_sow(CreateSowInput {
            title: "Sample SOW - IT Implementation".into(),
            description: Some("Draft statement of work for Phase 1 implementation.".into()),
            template_type: Some(SowTemplateType::ManagedProject),
            vendor_id: Some(vendor.id),
            milestones: vec![
                CreateMilestoneInput {
                    title: "Discovery and design".into(),
                    amount_cents: 20_000_00,
                    acceptance_method: Some(AcceptanceMethod::SignOff),
                    ..Default::default()
                },
                CreateMilestoneInput {
                    title: "Build and integration".into(),
                    amount_cents: 40_000_00,
                    acceptance_method: Some(AcceptanceMethod::TestReport),
                    ..Default::default()
                },
                CreateMilestoneInput {
                    title: "Go-live and handover".into(),
                    amount_cents: 15_000_00,
                    acceptance_method: Some(AcceptanceMethod::Documentation),
                    ..Default::default()
                },
            ],
            ..Default::default()
        })?;
    }

    println!("Seed complete. Users:");
    println!("  Hiring Manager:  hm@vms.local");
    println!("  OPS Team:        ops@vms.local");
    println!("  Supplier:        supplier@vms.local");
    println!("  Approver $50k:   approver50@vms.local");
    println!("  Approver $200k:  approver200@vms.local");
    Ok(())
}
