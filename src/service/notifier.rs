use crate::repo::tenants_repo::TenantContact;
use rust_decimal::Decimal;
use serde_json::json;

/// Receipt dispatch as the event processor sees it. Implementations may
/// not fail the caller; all errors stay inside `payment_receipt`.
#[async_trait::async_trait]
pub trait ReceiptSender: Send + Sync {
    async fn payment_receipt(
        &self,
        contact: &TenantContact,
        processor_ref: &str,
        amount: Decimal,
        currency: &str,
    );
}

/// Best-effort receipt dispatch through the platform notification relay.
/// Nothing here may fail the webhook request: every error is logged and
/// dropped, and each send carries its own timeout so acknowledgment is
/// never blocked on a slow relay.
#[derive(Clone)]
pub struct Notifier {
    pub base_url: String,
    pub timeout_ms: u64,
    pub client: reqwest::Client,
}

impl Notifier {
    pub fn new(base_url: String, timeout_ms: u64) -> Self {
        Self {
            base_url,
            timeout_ms,
            client: reqwest::Client::new(),
        }
    }

    async fn send(&self, channel: &str, processor_ref: &str, payload: serde_json::Value) {
        let url = format!("{}/v1/{channel}", self.base_url);
        let result = self
            .client
            .post(url)
            .json(&payload)
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await;

        match result {
            Ok(resp) if resp.status().is_success() => {
                tracing::info!(channel, processor_ref, "receipt dispatched");
            }
            Ok(resp) => {
                tracing::warn!(
                    channel,
                    processor_ref,
                    status = resp.status().as_u16(),
                    "notification relay rejected receipt"
                );
            }
            Err(e) => {
                tracing::warn!(channel, processor_ref, error = %e, "receipt dispatch failed");
            }
        }
    }
}

#[async_trait::async_trait]
impl ReceiptSender for Notifier {
    async fn payment_receipt(
        &self,
        contact: &TenantContact,
        processor_ref: &str,
        amount: Decimal,
        currency: &str,
    ) {
        if contact.email.is_none() && contact.phone.is_none() {
            tracing::info!(
                tenant_id = %contact.tenant_id,
                processor_ref,
                "no contact details on file, skipping receipt"
            );
            return;
        }

        if let Some(email) = &contact.email {
            self.send(
                "email",
                processor_ref,
                json!({
                    "to": email,
                    "template": "payment_receipt",
                    "params": {
                        "name": contact.full_name,
                        "amount": amount,
                        "currency": currency,
                        "reference": processor_ref,
                    }
                }),
            )
            .await;
        }

        if let Some(phone) = &contact.phone {
            self.send(
                "sms",
                processor_ref,
                json!({
                    "to": phone,
                    "body": format!(
                        "Your rent payment of {amount} {} was received. Ref {processor_ref}",
                        currency.to_uppercase()
                    ),
                }),
            )
            .await;
        }
    }
}
