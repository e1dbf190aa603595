use crate::processor::{
    Customer, CustomerRequest, IntentRequest, PaymentIntent, ProcessorClient, ProcessorError,
};
use reqwest::StatusCode;

/// Stripe-compatible processor client. All endpoints take form-encoded
/// bodies with the secret key as basic-auth username.
pub struct StripeProcessor {
    pub base_url: String,
    pub secret_key: String,
    pub timeout_ms: u64,
    pub client: reqwest::Client,
}

impl StripeProcessor {
    pub fn new(base_url: String, secret_key: String, timeout_ms: u64) -> Self {
        Self {
            base_url,
            secret_key,
            timeout_ms,
            client: reqwest::Client::new(),
        }
    }

    async fn post_form<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ProcessorError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .post(url)
            .basic_auth(&self.secret_key, Option::<&str>::None)
            .form(params)
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await
            .map_err(|e| ProcessorError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }

        resp.json::<T>()
            .await
            .map_err(|e| ProcessorError::Malformed(e.to_string()))
    }
}

#[async_trait::async_trait]
impl ProcessorClient for StripeProcessor {
    fn name(&self) -> &'static str {
        "stripe"
    }

    async fn create_customer(&self, request: CustomerRequest) -> Result<Customer, ProcessorError> {
        self.post_form(
            "/v1/customers",
            &[
                ("name", request.name),
                ("email", request.email),
                ("metadata[tenant_id]", request.tenant_id),
            ],
        )
        .await
    }

    async fn retrieve_customer(
        &self,
        customer_id: &str,
    ) -> Result<Option<Customer>, ProcessorError> {
        let url = format!("{}/v1/customers/{}", self.base_url, customer_id);
        let resp = self
            .client
            .get(url)
            .basic_auth(&self.secret_key, Option::<&str>::None)
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await
            .map_err(|e| ProcessorError::Network(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }

        let customer = resp
            .json::<Customer>()
            .await
            .map_err(|e| ProcessorError::Malformed(e.to_string()))?;
        Ok(Some(customer))
    }

    async fn create_payment_intent(
        &self,
        request: IntentRequest,
    ) -> Result<PaymentIntent, ProcessorError> {
        let mut params = vec![
            ("amount", request.amount_minor.to_string()),
            ("currency", request.currency),
            ("customer", request.customer_id),
            ("metadata[tenant_id]", request.tenant_id),
        ];
        if let Some(property_id) = request.property_id {
            params.push(("metadata[property_id]", property_id));
        }
        if let Some(kind) = request.kind {
            params.push(("metadata[kind]", kind));
        }
        if let Some(description) = request.description {
            params.push(("description", description));
        }

        self.post_form("/v1/payment_intents", &params).await
    }
}

fn api_error(status: StatusCode, body: &str) -> ProcessorError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(ToString::to_string)
        })
        .unwrap_or_else(|| body.chars().take(200).collect());

    if status.is_client_error() {
        ProcessorError::Rejected(message)
    } else {
        ProcessorError::Api {
            status: status.as_u16(),
            message,
        }
    }
}
