use crate::processor::{
    Customer, CustomerRequest, IntentRequest, PaymentIntent, ProcessorClient, ProcessorError,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// In-memory processor for tests and local runs. `behavior` mirrors the
/// real client's failure surface without any network; the last intent
/// request is kept so tests can assert what went over the wire.
pub struct MockProcessor {
    pub behavior: String,
    pub last_intent: Mutex<Option<IntentRequest>>,
    counter: AtomicU64,
}

impl MockProcessor {
    pub fn new(behavior: &str) -> Self {
        Self {
            behavior: behavior.to_string(),
            last_intent: Mutex::new(None),
            counter: AtomicU64::new(0),
        }
    }

    fn next(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::Relaxed)
    }
}

#[async_trait::async_trait]
impl ProcessorClient for MockProcessor {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn create_customer(&self, request: CustomerRequest) -> Result<Customer, ProcessorError> {
        if self.behavior == "ALWAYS_REJECT" {
            return Err(ProcessorError::Rejected("mock rejection".to_string()));
        }
        Ok(Customer {
            id: format!("cus_mock_{}", request.tenant_id),
            email: Some(request.email),
        })
    }

    async fn retrieve_customer(
        &self,
        customer_id: &str,
    ) -> Result<Option<Customer>, ProcessorError> {
        if self.behavior == "CUSTOMER_GONE" {
            return Ok(None);
        }
        Ok(Some(Customer {
            id: customer_id.to_string(),
            email: None,
        }))
    }

    async fn create_payment_intent(
        &self,
        request: IntentRequest,
    ) -> Result<PaymentIntent, ProcessorError> {
        if let Ok(mut last) = self.last_intent.lock() {
            *last = Some(request.clone());
        }
        match self.behavior.as_str() {
            "ALWAYS_REJECT" => Err(ProcessorError::Rejected(format!(
                "mock decline for amount {}",
                request.amount_minor
            ))),
            "ALWAYS_NETWORK_ERROR" => {
                Err(ProcessorError::Network("mock network failure".to_string()))
            }
            _ => {
                let n = self.next();
                Ok(PaymentIntent {
                    id: format!("pi_mock_{n}"),
                    client_secret: format!("pi_mock_{n}_secret_{}", request.customer_id),
                })
            }
        }
    }
}
