use serde::Deserialize;

pub mod mock;
pub mod stripe;

#[derive(Debug, Clone)]
pub struct CustomerRequest {
    pub tenant_id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Customer {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct IntentRequest {
    pub amount_minor: i64,
    pub currency: String,
    pub customer_id: String,
    pub tenant_id: String,
    pub property_id: Option<String>,
    pub description: Option<String>,
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessorError {
    #[error("processor rejected request: {0}")]
    Rejected(String),
    #[error("processor api error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("processor unreachable: {0}")]
    Network(String),
    #[error("unexpected processor response: {0}")]
    Malformed(String),
}

/// Outbound calls to the hosted payment processor. Owns no state; every
/// invocation is an independent HTTP exchange.
#[async_trait::async_trait]
pub trait ProcessorClient: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns the stable processor-side customer for a tenant, creating
    /// one when none exists yet.
    async fn create_customer(&self, request: CustomerRequest) -> Result<Customer, ProcessorError>;

    async fn retrieve_customer(&self, customer_id: &str)
        -> Result<Option<Customer>, ProcessorError>;

    async fn create_payment_intent(
        &self,
        request: IntentRequest,
    ) -> Result<PaymentIntent, ProcessorError>;
}
