use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use sowgate::{api, seed};
use sowgate_core::db::Database;
use sowgate_core::models::User;

fn setup() -> (Router, Database) {
    let db = Database::open_in_memory().unwrap();
    seed::run(&db).unwrap();
    (api::create_router(db.clone()), db)
}

fn user(db: &Database, email: &str) -> User {
    db.get_user_by_email(email).unwrap().unwrap()
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    as_user: Option<&User>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(u) = as_user {
        builder = builder.header("x-user-id", u.id.to_string());
    }
    let request = match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn sow_body(amount_cents: i64) -> Value {
    json!({
        "title": "Network refresh",
        "template_type": "MANAGED_PROJECT",
        "milestones": [
            { "title": "Phase 1", "amount_cents": amount_cents }
        ]
    })
}

async fn create_sow(app: &Router, hm: &User, amount_cents: i64) -> String {
    let (status, body) = send(app, "POST", "/api/sows", Some(hm), Some(sow_body(amount_cents))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn requests_without_identity_are_unauthorized() {
    let (app, _db) = setup();
    let (status, body) = send(&app, "GET", "/api/sows", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");
}

#[tokio::test]
async fn only_the_hiring_manager_may_create_sows() {
    let (app, db) = setup();
    let supplier = user(&db, "supplier@vms.local");

    let (status, body) =
        send(&app, "POST", "/api/sows", Some(&supplier), Some(sow_body(10_000_00))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("Hiring Manager"));
}

#[tokio::test]
async fn workflow_actions_enforce_the_role_map() {
    let (app, db) = setup();
    let hm = user(&db, "hm@vms.local");
    let ops = user(&db, "ops@vms.local");
    let id = create_sow(&app, &hm, 10_000_00).await;

    // OPS cannot submit; the hiring manager cannot OPS-approve.
    let (status, _) = send(&app, "POST", &format!("/api/sows/{id}/submit"), Some(&ops), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) =
        send(&app, "POST", &format!("/api/sows/{id}/ops-approve"), Some(&hm), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The role failure never reached the engine.
    let (_, detail) = send(&app, "GET", &format!("/api/sows/{id}"), Some(&hm), None).await;
    assert_eq!(detail["sow"]["status"], "DRAFT");
}

#[tokio::test]
async fn a_sow_travels_the_full_pipeline_over_http() {
    let (app, db) = setup();
    let hm = user(&db, "hm@vms.local");
    let ops = user(&db, "ops@vms.local");
    let supplier = user(&db, "supplier@vms.local");
    let approver50 = user(&db, "approver50@vms.local");

    let id = create_sow(&app, &hm, 40_000_00).await;

    let (status, _) = send(&app, "POST", &format!("/api/sows/{id}/submit"), Some(&hm), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/sows/{id}/ops-approve"),
        Some(&ops),
        Some(json!({ "comment": "capacity confirmed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Both seeded approvers cover $40k; the smaller limit comes first.
    let (status, approvers) = send(
        &app,
        "GET",
        &format!("/api/sows/{id}/eligible-approvers"),
        Some(&hm),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let emails: Vec<&str> = approvers
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["email"].as_str().unwrap())
        .collect();
    assert_eq!(emails, vec!["approver50@vms.local", "approver200@vms.local"]);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/sows/{id}/supplier-accept"),
        Some(&supplier),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/sows/{id}/financial-approve"),
        Some(&approver50),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, detail) = send(&app, "GET", &format!("/api/sows/{id}"), Some(&hm), None).await;
    assert_eq!(detail["sow"]["status"], "ACTIVE");
    let approvals = detail["approvals"].as_array().unwrap();
    assert_eq!(approvals.len(), 3);
    assert!(approvals.iter().all(|a| a["status"] == "APPROVED"));
    assert_eq!(approvals[0]["comment"], "capacity confirmed");
}

#[tokio::test]
async fn resubmitting_is_a_conflict() {
    let (app, db) = setup();
    let hm = user(&db, "hm@vms.local");
    let id = create_sow(&app, &hm, 10_000_00).await;

    let (status, _) = send(&app, "POST", &format!("/api/sows/{id}/submit"), Some(&hm), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) =
        send(&app, "POST", &format!("/api/sows/{id}/submit"), Some(&hm), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("DRAFT"));
}

#[tokio::test]
async fn insufficient_signature_authority_is_forbidden() {
    let (app, db) = setup();
    let hm = user(&db, "hm@vms.local");
    let ops = user(&db, "ops@vms.local");
    let supplier = user(&db, "supplier@vms.local");
    let approver50 = user(&db, "approver50@vms.local");
    let approver200 = user(&db, "approver200@vms.local");

    let id = create_sow(&app, &hm, 100_000_00).await;
    send(&app, "POST", &format!("/api/sows/{id}/submit"), Some(&hm), None).await;
    send(&app, "POST", &format!("/api/sows/{id}/ops-approve"), Some(&ops), None).await;
    send(&app, "POST", &format!("/api/sows/{id}/supplier-accept"), Some(&supplier), None).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/sows/{id}/financial-approve"),
        Some(&approver50),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("signature authority"));

    let (_, detail) = send(&app, "GET", &format!("/api/sows/{id}"), Some(&hm), None).await;
    assert_eq!(detail["sow"]["status"], "PENDING_FINANCIAL_APPROVAL");

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/sows/{id}/financial-approve"),
        Some(&approver200),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unknown_sows_are_not_found() {
    let (app, db) = setup();
    let hm = user(&db, "hm@vms.local");
    let (status, _) = send(
        &app,
        "GET",
        "/api/sows/00000000-0000-0000-0000-000000000000",
        Some(&hm),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
