use rentpay::processor::mock::MockProcessor;
use rentpay::processor::{CustomerRequest, IntentRequest, ProcessorClient, ProcessorError};

fn intent_request(customer_id: &str) -> IntentRequest {
    IntentRequest {
        amount_minor: 2500,
        currency: "usd".to_string(),
        customer_id: customer_id.to_string(),
        tenant_id: "42".to_string(),
        property_id: None,
        description: None,
        kind: None,
    }
}

#[tokio::test]
async fn creates_intent_with_non_empty_client_secret() {
    let processor = MockProcessor::new("ALWAYS_SUCCESS");

    let customer = processor
        .create_customer(CustomerRequest {
            tenant_id: "42".to_string(),
            name: "Ada Tenant".to_string(),
            email: "ada@example.com".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(customer.id, "cus_mock_42");

    let intent = processor
        .create_payment_intent(intent_request(&customer.id))
        .await
        .unwrap();
    assert!(!intent.client_secret.is_empty());
    assert!(intent.id.starts_with("pi_mock_"));
}

#[tokio::test]
async fn rejection_carries_processor_message() {
    let processor = MockProcessor::new("ALWAYS_REJECT");

    let err = processor
        .create_payment_intent(intent_request("cus_mock_42"))
        .await
        .unwrap_err();
    match err {
        ProcessorError::Rejected(message) => assert!(message.contains("2500")),
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn vanished_customer_resolves_to_none() {
    let processor = MockProcessor::new("CUSTOMER_GONE");
    let found = processor.retrieve_customer("cus_mock_42").await.unwrap();
    assert!(found.is_none());
}
