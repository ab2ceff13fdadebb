//! HTTP client tests against a mock CRM backend.
//!
//! Run with: `cargo test -p prometheus-client --test http_client`

use std::sync::Arc;
use std::time::Duration;

use mockito::{Matcher, Server};
use prometheus_client::{
    CrmApi, HttpCrmApi, StaticToken, compute_tuition_for_student, create_contract_for_student,
};
use prometheus_core::budget::BudgetBalanceQuery;
use prometheus_core::contract::RetryPolicy;
use prometheus_shared::AppError;
use prometheus_shared::types::{ContractId, StudentId};
use rust_decimal_macros::dec;
use serde_json::json;

// ============================================================================
// Test Helpers
// ============================================================================

const TOKEN: &str = "test-token";

fn client(server: &Server) -> HttpCrmApi {
    HttpCrmApi::new(&server.url(), Arc::new(StaticToken::new(Some(TOKEN.into()))))
        .expect("Failed to create test client")
}

fn bearer() -> String {
    format!("Bearer {TOKEN}")
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(3, Duration::from_millis(1))
}

async fn mock_student(server: &mut Server, id: u64, admission_year: serde_json::Value) -> mockito::Mock {
    server
        .mock("GET", format!("/api/students/{id}").as_str())
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "id": id, "admissionYear": admission_year }).to_string())
        .create_async()
        .await
}

async fn mock_fees(server: &mut Server, body: serde_json::Value) -> mockito::Mock {
    server
        .mock("GET", "/api/tuition-fees")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}

// ============================================================================
// Payments
// ============================================================================

#[tokio::test]
async fn test_planned_payments_request_and_normalization() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/planned-payments/")
        .match_header("authorization", bearer().as_str())
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("contract_id".into(), "5".into()),
            Matcher::UrlEncoded("all".into(), "true".into()),
            Matcher::Regex(r"(^|&)_=\d+".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "data": [
                    { "ID": 1, "paymentName": "Платеж 2", "paymentDate": "2024-10-01T00:00:00Z", "plannedAmount": "150000" },
                    { "ID": 2, "paymentName": "Платеж 1", "paymentDate": "2024-09-01", "plannedAmount": 100000 }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let plan = client(&server)
        .planned_payments(ContractId::new(5))
        .await
        .expect("planned payments");

    mock.assert_async().await;
    assert_eq!(plan.len(), 2);
    assert_eq!(plan[0].planned_amount, dec!(150000));
    assert_eq!(plan[1].payment_name, "Платеж 1");
    assert!(plan.iter().all(|p| p.contract_id == ContractId::new(5)));
}

#[tokio::test]
async fn test_payment_facts_amount_spellings() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/payment-facts")
        .match_query(Matcher::UrlEncoded("contract_id".into(), "5".into()))
        .with_status(200)
        .with_body(json!({ "data": [{ "Amount": 120000 }, { "amount": "80000.50" }] }).to_string())
        .create_async()
        .await;

    let facts = client(&server)
        .payment_facts(ContractId::new(5))
        .await
        .expect("payment facts");

    let total: rust_decimal::Decimal = facts.iter().map(|f| f.amount).sum();
    assert_eq!(total, dec!(200000.50));
}

// ============================================================================
// Errors
// ============================================================================

#[tokio::test]
async fn test_missing_token_sends_nothing() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/payment-facts")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let api = HttpCrmApi::new(&server.url(), Arc::new(StaticToken::new(None))).expect("client");
    let err = api
        .payment_facts(ContractId::new(1))
        .await
        .expect_err("must fail without a token");

    mock.assert_async().await;
    assert!(err.requires_login());
}

#[tokio::test]
async fn test_status_mapping_keeps_server_message() {
    let mut server = Server::new_async().await;
    let _not_found = server
        .mock("GET", "/api/students/404")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(json!({ "error": "Student not found" }).to_string())
        .create_async()
        .await;
    let _broken = server
        .mock("GET", "/api/tuition-fees")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("upstream exploded")
        .create_async()
        .await;

    let api = client(&server);

    match api.student(StudentId::new(404)).await {
        Err(AppError::NotFound(message)) => assert_eq!(message, "Student not found"),
        other => panic!("expected NotFound, got {other:?}"),
    }
    match api.tuition_fees().await {
        Err(AppError::ExternalService(message)) => assert_eq!(message, "upstream exploded"),
        other => panic!("expected ExternalService, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_backend_is_external_service_error() {
    let api = HttpCrmApi::with_timeout(
        "http://127.0.0.1:9",
        Arc::new(StaticToken::new(Some(TOKEN.into()))),
        Duration::from_secs(2),
    )
    .expect("client");

    let err = api.tuition_fees().await.expect_err("nothing listens on port 9");
    assert!(matches!(err, AppError::ExternalService(_)));
}

// ============================================================================
// Budget balance
// ============================================================================

#[tokio::test]
async fn test_budget_balance_query() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/budget/balance")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("department".into(), "Администрация".into()),
            Matcher::UrlEncoded("budgetItem".into(), "Хозяйственные расходы".into()),
            Matcher::UrlEncoded("registerItem".into(), "Канцелярия".into()),
        ]))
        .with_status(200)
        .with_body(json!({ "registerBalance": 400000 }).to_string())
        .create_async()
        .await;

    let query = BudgetBalanceQuery {
        department: "Администрация".into(),
        budget_item: "Хозяйственные расходы".into(),
        register_item: "Канцелярия".into(),
        requested_amount: dec!(500000),
    };
    let balance = client(&server).budget_balance(&query).await.expect("balance");

    mock.assert_async().await;
    assert_eq!(balance, dec!(400000));
}

// ============================================================================
// Debtors and comments
// ============================================================================

#[tokio::test]
async fn test_debtors_page() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/payment-reconciliation/debtors")
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_status(200)
        .with_body(
            json!({
                "data": [{
                    "contractId": 5,
                    "contractNumber": "Д-005",
                    "studentFullName": "Иванов Иван",
                    "studentClass": "5 А",
                    "debtAmount": "250000",
                    "comment": "обещали до пятницы"
                }],
                "currentPage": 2,
                "totalPages": 2,
                "totalRows": 21,
                "pageSize": 20
            })
            .to_string(),
        )
        .create_async()
        .await;

    let page = client(&server).debtors(2).await.expect("debtors");

    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].debt_amount, dec!(250000));
    assert!(page.has_prev());
    assert!(!page.has_next());
}

#[tokio::test]
async fn test_save_comment_posts_json() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/contracts/5/comment")
        .match_header("authorization", bearer().as_str())
        .match_body(Matcher::Json(json!({ "comment": "позвонить маме" })))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    client(&server)
        .save_contract_comment(ContractId::new(5), "позвонить маме")
        .await
        .expect("comment saved");

    mock.assert_async().await;
}

// ============================================================================
// Contract creation
// ============================================================================

#[tokio::test]
async fn test_compute_tuition_grandfathers_early_students() {
    let mut server = Server::new_async().await;
    let _student = mock_student(&mut server, 7, json!(2022)).await;
    let _fees = mock_fees(
        &mut server,
        json!({ "byYear": { "2021": 3000000, "2023": 3429500, "2024": 3610000 } }),
    ).await;

    let resolution = compute_tuition_for_student(&client(&server), StudentId::new(7))
        .await
        .expect("tuition");

    assert_eq!(resolution.amount, dec!(3429500));
    assert_eq!(resolution.used_year, Some(2023));
}

#[tokio::test]
async fn test_create_contract_sends_resolved_amount() {
    let mut server = Server::new_async().await;
    let _student = mock_student(&mut server, 7, json!(2024)).await;
    let _fees = mock_fees(&mut server, json!([{ "year": 2023, "amount": 3429500 }, { "year": 2024, "amount": 3610000 }])).await;
    let create = server
        .mock("POST", "/api/contracts")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({ "studentId": 7 })),
            Matcher::Regex(r#""totalAmount":3610000(\.0)?"#.into()),
        ]))
        .with_status(201)
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;

    let resolution = create_contract_for_student(&client(&server), StudentId::new(7), &fast_retry())
        .await
        .expect("contract created");

    create.assert_async().await;
    assert_eq!(resolution.amount, dec!(3610000));
}

#[tokio::test]
async fn test_create_contract_omits_zero_amount() {
    let mut server = Server::new_async().await;
    let _student = mock_student(&mut server, 7, json!(null)).await;
    let _fees = mock_fees(&mut server, json!({})).await;
    let create = server
        .mock("POST", "/api/contracts")
        .match_body(Matcher::Json(json!({ "studentId": 7 })))
        .with_status(201)
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;

    let resolution = create_contract_for_student(&client(&server), StudentId::new(7), &fast_retry())
        .await
        .expect("contract created");

    create.assert_async().await;
    assert_eq!(resolution.used_year, None);
}

#[tokio::test]
async fn test_create_contract_gives_up_after_three_duplicates() {
    let mut server = Server::new_async().await;
    let _student = mock_student(&mut server, 7, json!(2024)).await;
    let _fees = mock_fees(&mut server, json!({ "byYear": { "2024": 3610000 } })).await;
    let create = server
        .mock("POST", "/api/contracts")
        .with_status(409)
        .with_body(
            json!({
                "error": "duplicate key value violates unique constraint \"contracts_contract_number_key\""
            })
            .to_string(),
        )
        .expect(3)
        .create_async()
        .await;

    let err = create_contract_for_student(&client(&server), StudentId::new(7), &fast_retry())
        .await
        .expect_err("every attempt collides");

    create.assert_async().await;
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_create_contract_does_not_retry_other_errors() {
    let mut server = Server::new_async().await;
    let _student = mock_student(&mut server, 7, json!(2024)).await;
    let _fees = mock_fees(&mut server, json!({ "byYear": { "2024": 3610000 } })).await;
    let create = server
        .mock("POST", "/api/contracts")
        .with_status(400)
        .with_body(json!({ "error": "student is archived" }).to_string())
        .expect(1)
        .create_async()
        .await;

    let err = create_contract_for_student(&client(&server), StudentId::new(7), &fast_retry())
        .await
        .expect_err("validation error");

    create.assert_async().await;
    assert!(matches!(err, AppError::Validation(_)));
}
