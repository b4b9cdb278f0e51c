mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;

use common::{
    bearer_token, create_test_student, create_test_user, setup_test_app, unique_admission_number,
};
use school_transit::modules::auth::model::UserRole;
use school_transit::state::AppState;

async fn admin_token(pool: &PgPool, state: &AppState) -> String {
    let admin = create_test_user(pool, UserRole::SchoolAdmin, None, "secret123").await;
    bearer_token(state, &admin, UserRole::SchoolAdmin)
}

fn authed_json(method: Method, uri: &str, token: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn admission_payload(admission_number: &str) -> Value {
    json!({
        "admissionNumber": admission_number,
        "firstName": "Amina",
        "lastName": "Odhiambo",
        "className": "Blue House",
        "grade": "Grade 3",
        "parentContact": "0711000222",
    })
}

async fn send(app: &Router, request: Request<Body>) -> axum::response::Response {
    app.clone().oneshot(request).await.unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn student_routes_require_school_admin_role(pool: PgPool) {
    let (app, state) = setup_test_app(pool.clone());

    let no_token = send(
        &app,
        Request::builder()
            .method("GET")
            .uri("/api/students")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(no_token.status(), StatusCode::UNAUTHORIZED);

    let driver = create_test_user(&pool, UserRole::Driver, Some("KAA 111A"), "secret123").await;
    let driver_token = bearer_token(&state, &driver, UserRole::Driver);
    let wrong_role = send(
        &app,
        authed_json(Method::GET, "/api/students", &driver_token, &json!({})),
    )
    .await;
    assert_eq!(wrong_role.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn dashboard_partitions_students_and_counts_them(pool: PgPool) {
    let (app, state) = setup_test_app(pool.clone());
    let token = admin_token(&pool, &state).await;

    create_test_student(&pool, &unique_admission_number(), "active").await;
    create_test_student(&pool, &unique_admission_number(), "active").await;
    create_test_student(&pool, &unique_admission_number(), "withdrawn").await;

    let response = send(
        &app,
        Request::builder()
            .method("GET")
            .uri("/api/students")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["summary"]["totalStudents"], 3);
    assert_eq!(body["data"]["summary"]["activeStudents"], 2);
    assert_eq!(body["data"]["summary"]["withdrawnStudents"], 1);
    assert_eq!(body["data"]["admissions"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["withdrawals"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["parentContactChanges"], json!([]));
}

#[sqlx::test(migrations = "./migrations")]
async fn admission_uppercases_the_number_and_defaults_the_date(pool: PgPool) {
    let (app, state) = setup_test_app(pool.clone());
    let token = admin_token(&pool, &state).await;

    let response = send(
        &app,
        authed_json(
            Method::POST,
            "/api/students/admissions",
            &token,
            &admission_payload("adm-lower-1"),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let student = &body["data"]["student"];
    assert_eq!(student["admissionNumber"], "ADM-LOWER-1");
    assert_eq!(student["status"], "active");
    assert!(student["admissionDate"].is_string());
    assert!(student["withdrawalDate"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn admission_rejects_duplicate_numbers(pool: PgPool) {
    let (app, state) = setup_test_app(pool.clone());
    let token = admin_token(&pool, &state).await;

    let admission_number = unique_admission_number();
    let first = send(
        &app,
        authed_json(
            Method::POST,
            "/api/students/admissions",
            &token,
            &admission_payload(&admission_number),
        ),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    // Same number in a different case still collides after normalization.
    let second = send(
        &app,
        authed_json(
            Method::POST,
            "/api/students/admissions",
            &token,
            &admission_payload(&admission_number.to_lowercase()),
        ),
    )
    .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn parent_contact_change_updates_row_and_writes_one_audit_record(pool: PgPool) {
    let (app, state) = setup_test_app(pool.clone());
    let token = admin_token(&pool, &state).await;
    let student_id = create_test_student(&pool, &unique_admission_number(), "active").await;

    let response = send(
        &app,
        authed_json(
            Method::PATCH,
            &format!("/api/students/{student_id}/parent-contact"),
            &token,
            &json!({ "parentContact": "0722999888" }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["student"]["parentContact"], "0722999888");

    let audit: Vec<(String, String)> = sqlx::query_as(
        "SELECT previous_contact, new_contact
         FROM student_parent_contact_changes
         WHERE student_id = $1",
    )
    .bind(student_id)
    .fetch_all(&pool)
    .await
    .unwrap();

    assert_eq!(
        audit,
        vec![("0711000222".to_string(), "0722999888".to_string())]
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn parent_contact_change_rejects_the_current_value(pool: PgPool) {
    let (app, state) = setup_test_app(pool.clone());
    let token = admin_token(&pool, &state).await;
    let student_id = create_test_student(&pool, &unique_admission_number(), "active").await;

    let response = send(
        &app,
        authed_json(
            Method::PATCH,
            &format!("/api/students/{student_id}/parent-contact"),
            &token,
            &json!({ "parentContact": "0711000222" }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The rejected attempt must leave no audit row behind.
    let audit_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM student_parent_contact_changes WHERE student_id = $1",
    )
    .bind(student_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(audit_count, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn parent_contact_change_rolls_back_when_the_audit_insert_fails(pool: PgPool) {
    let (app, state) = setup_test_app(pool.clone());
    let admin = create_test_user(&pool, UserRole::SchoolAdmin, None, "secret123").await;
    let token = bearer_token(&state, &admin, UserRole::SchoolAdmin);
    let student_id = create_test_student(&pool, &unique_admission_number(), "active").await;

    // Deleting the admin makes the audit insert violate its FK after the
    // student row has already been updated inside the transaction.
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(admin.id)
        .execute(&pool)
        .await
        .unwrap();

    let response = send(
        &app,
        authed_json(
            Method::PATCH,
            &format!("/api/students/{student_id}/parent-contact"),
            &token,
            &json!({ "parentContact": "0722999888" }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let stored: String =
        sqlx::query_scalar("SELECT parent_contact FROM students WHERE id = $1")
            .bind(student_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(stored, "0711000222");

    let audit_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM student_parent_contact_changes WHERE student_id = $1",
    )
    .bind(student_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(audit_count, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn parent_contact_change_404s_for_unknown_students(pool: PgPool) {
    let (app, state) = setup_test_app(pool.clone());
    let token = admin_token(&pool, &state).await;

    let response = send(
        &app,
        authed_json(
            Method::PATCH,
            "/api/students/999999/parent-contact",
            &token,
            &json!({ "parentContact": "0722999888" }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn withdrawal_is_terminal(pool: PgPool) {
    let (app, state) = setup_test_app(pool.clone());
    let token = admin_token(&pool, &state).await;
    let student_id = create_test_student(&pool, &unique_admission_number(), "active").await;

    let first = send(
        &app,
        authed_json(
            Method::PATCH,
            &format!("/api/students/{student_id}/withdrawal"),
            &token,
            &json!({ "withdrawalReason": "Relocated" }),
        ),
    )
    .await;

    assert_eq!(first.status(), StatusCode::OK);
    let body = body_json(first).await;
    let student = &body["data"]["student"];
    assert_eq!(student["status"], "withdrawn");
    assert_eq!(student["withdrawalReason"], "Relocated");
    // Date defaulted to today since the payload left it blank.
    assert!(student["withdrawalDate"].is_string());

    let second = send(
        &app,
        authed_json(
            Method::PATCH,
            &format!("/api/students/{student_id}/withdrawal"),
            &token,
            &json!({}),
        ),
    )
    .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn master_data_update_rejects_payloads_with_no_usable_fields(pool: PgPool) {
    let (app, state) = setup_test_app(pool.clone());
    let token = admin_token(&pool, &state).await;
    let student_id = create_test_student(&pool, &unique_admission_number(), "active").await;

    for payload in [json!({}), json!({ "firstName": "   ", "grade": "" })] {
        let response = send(
            &app,
            authed_json(
                Method::PATCH,
                &format!("/api/students/{student_id}/master-data"),
                &token,
                &payload,
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn master_data_update_touches_only_the_provided_fields(pool: PgPool) {
    let (app, state) = setup_test_app(pool.clone());
    let token = admin_token(&pool, &state).await;
    let admission_number = unique_admission_number();
    let student_id = create_test_student(&pool, &admission_number, "active").await;

    let response = send(
        &app,
        authed_json(
            Method::PATCH,
            &format!("/api/students/{student_id}/master-data"),
            &token,
            &json!({ "grade": "Grade 4", "ignoredField": "ignored" }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let student = &body["data"]["student"];
    assert_eq!(student["grade"], "Grade 4");
    assert_eq!(student["admissionNumber"], admission_number);
    assert_eq!(student["firstName"], "Amina");
    assert_eq!(student["className"], "Blue House");
}

#[sqlx::test(migrations = "./migrations")]
async fn master_data_update_rejects_an_admission_number_already_in_use(pool: PgPool) {
    let (app, state) = setup_test_app(pool.clone());
    let token = admin_token(&pool, &state).await;

    let taken = unique_admission_number();
    create_test_student(&pool, &taken, "active").await;
    let student_id = create_test_student(&pool, &unique_admission_number(), "active").await;

    let response = send(
        &app,
        authed_json(
            Method::PATCH,
            &format!("/api/students/{student_id}/master-data"),
            &token,
            &json!({ "admissionNumber": taken }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}
