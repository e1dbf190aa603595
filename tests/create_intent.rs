mod support;

use axum::http::StatusCode;
use rentpay::domain::payment::{CreateIntentRequest, PaymentKind};
use rentpay::processor::mock::MockProcessor;
use rentpay::service::payment_service::PaymentService;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use support::{MemoryDirectory, MemoryLedger};

fn request(amount: &str) -> CreateIntentRequest {
    CreateIntentRequest {
        amount: Decimal::from_str(amount).unwrap(),
        currency: None,
        tenant_id: "42".to_string(),
        property_id: None,
        description: None,
        kind: Some(PaymentKind::Rent),
    }
}

fn service(
    ledger: &Arc<MemoryLedger>,
    directory: &Arc<MemoryDirectory>,
    processor: &Arc<MockProcessor>,
) -> PaymentService {
    PaymentService {
        payments_repo: ledger.clone(),
        tenants_repo: directory.clone(),
        processor: processor.clone(),
    }
}

#[tokio::test]
async fn pending_ledger_row_exists_before_response_returns() {
    let ledger = Arc::new(MemoryLedger::new());
    let directory = Arc::new(MemoryDirectory::with_tenant(
        "42",
        "Ada Tenant",
        Some("ada@example.com"),
    ));
    let processor = Arc::new(MockProcessor::new("ALWAYS_SUCCESS"));

    let resp = service(&ledger, &directory, &processor)
        .create_intent(request("25.00"))
        .await
        .unwrap();

    assert!(!resp.client_secret.is_empty());
    let row = ledger.row(&resp.payment_intent_id).unwrap();
    assert_eq!(row.status, "PENDING");
    assert_eq!(row.amount, Decimal::from_str("25.00").unwrap());
    assert_eq!(row.currency, "usd");
    assert_eq!(row.tenant_id, "42");
}

#[tokio::test]
async fn payment_kind_is_forwarded_as_processor_metadata() {
    let ledger = Arc::new(MemoryLedger::new());
    let directory = Arc::new(MemoryDirectory::with_tenant("42", "Ada Tenant", None));
    let processor = Arc::new(MockProcessor::new("ALWAYS_SUCCESS"));

    service(&ledger, &directory, &processor)
        .create_intent(request("25.00"))
        .await
        .unwrap();

    let seen = processor.last_intent.lock().unwrap().clone().unwrap();
    assert_eq!(seen.kind.as_deref(), Some("rent"));
    assert_eq!(seen.amount_minor, 2500);
}

#[tokio::test]
async fn created_customer_id_is_persisted_for_reuse() {
    let ledger = Arc::new(MemoryLedger::new());
    let directory = Arc::new(MemoryDirectory::with_tenant("42", "Ada Tenant", None));
    let processor = Arc::new(MockProcessor::new("ALWAYS_SUCCESS"));

    let resp = service(&ledger, &directory, &processor)
        .create_intent(request("25.00"))
        .await
        .unwrap();

    assert_eq!(resp.customer, "cus_mock_42");
    assert_eq!(
        directory.contact("42").unwrap().processor_customer_id.as_deref(),
        Some("cus_mock_42")
    );
}

#[tokio::test]
async fn unknown_tenant_is_a_404_with_no_ledger_write() {
    let ledger = Arc::new(MemoryLedger::new());
    let directory = Arc::new(MemoryDirectory::new());
    let processor = Arc::new(MockProcessor::new("ALWAYS_SUCCESS"));

    let (status, body) = service(&ledger, &directory, &processor)
        .create_intent(request("25.00"))
        .await
        .unwrap_err();

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.error.code, "TENANT_NOT_FOUND");
    assert!(ledger.rows.lock().unwrap().is_empty());
}

#[tokio::test]
async fn processor_rejection_surfaces_its_message() {
    let ledger = Arc::new(MemoryLedger::new());
    let directory = Arc::new(MemoryDirectory::with_tenant("42", "Ada Tenant", None));
    let processor = Arc::new(MockProcessor::new("ALWAYS_REJECT"));

    let (status, body) = service(&ledger, &directory, &processor)
        .create_intent(request("25.00"))
        .await
        .unwrap_err();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.error.code, "PROCESSOR_REJECTED");
    assert!(ledger.rows.lock().unwrap().is_empty());
}
