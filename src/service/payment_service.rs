use crate::domain::payment::{
    major_to_minor, CreateIntentRequest, CreateIntentResponse, ErrorEnvelope, ErrorPayload,
};
use crate::processor::{CustomerRequest, IntentRequest, ProcessorClient, ProcessorError};
use crate::repo::payments_repo::{PaymentLedger, PendingPaymentInput};
use crate::repo::tenants_repo::{ContactDirectory, TenantContact};
use axum::http::StatusCode;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

const DEFAULT_CURRENCY: &str = "usd";

/// Outbound payment-creation flow: validate, resolve the tenant to a
/// processor customer, create the intent, write the pending ledger row.
/// The pending row must exist before the response returns so the later
/// webhook has something to update.
#[derive(Clone)]
pub struct PaymentService {
    pub payments_repo: Arc<dyn PaymentLedger>,
    pub tenants_repo: Arc<dyn ContactDirectory>,
    pub processor: Arc<dyn ProcessorClient>,
}

impl PaymentService {
    pub async fn create_intent(
        &self,
        req: CreateIntentRequest,
    ) -> Result<CreateIntentResponse, (StatusCode, ErrorEnvelope)> {
        let amount_minor = validate_amount(req.amount)?;
        let currency = req
            .currency
            .clone()
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string())
            .to_lowercase();

        let tenant = self
            .tenants_repo
            .find_by_id(&req.tenant_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| {
                (
                    StatusCode::NOT_FOUND,
                    err("TENANT_NOT_FOUND", "no tenant with that id"),
                )
            })?;

        let customer_id = self.ensure_customer(&tenant).await.map_err(processor_err)?;

        let intent = self
            .processor
            .create_payment_intent(IntentRequest {
                amount_minor,
                currency: currency.clone(),
                customer_id: customer_id.clone(),
                tenant_id: tenant.tenant_id.clone(),
                property_id: req.property_id.clone(),
                description: req.description.clone(),
                kind: req.kind.as_ref().map(|k| k.as_str().to_string()),
            })
            .await
            .map_err(processor_err)?;

        self.payments_repo
            .insert_pending(&PendingPaymentInput {
                payment_id: Uuid::new_v4(),
                processor_ref: intent.id.clone(),
                tenant_id: tenant.tenant_id.clone(),
                property_id: req.property_id,
                amount: req.amount,
                currency: currency.clone(),
                description: req.description,
            })
            .await
            .map_err(internal)?;

        tracing::info!(
            processor_ref = %intent.id,
            tenant_id = %tenant.tenant_id,
            %currency,
            "payment intent created, ledger row pending"
        );

        Ok(CreateIntentResponse {
            client_secret: intent.client_secret,
            payment_intent_id: intent.id,
            customer: customer_id,
        })
    }

    /// Reuses the stored processor customer when it still resolves;
    /// otherwise creates one and persists the id for the next payment.
    async fn ensure_customer(&self, tenant: &TenantContact) -> Result<String, ProcessorError> {
        if let Some(existing) = &tenant.processor_customer_id {
            if let Some(customer) = self.processor.retrieve_customer(existing).await? {
                return Ok(customer.id);
            }
            tracing::warn!(
                tenant_id = %tenant.tenant_id,
                customer_id = %existing,
                "stored processor customer no longer resolves, recreating"
            );
        }

        let created = self
            .processor
            .create_customer(CustomerRequest {
                tenant_id: tenant.tenant_id.clone(),
                name: tenant.full_name.clone(),
                email: tenant.email.clone().unwrap_or_default(),
            })
            .await?;

        if let Err(e) = self
            .tenants_repo
            .set_processor_customer(&tenant.tenant_id, &created.id)
            .await
        {
            tracing::warn!(
                tenant_id = %tenant.tenant_id,
                error = %e,
                "failed to persist processor customer id"
            );
        }

        Ok(created.id)
    }
}

pub fn validate_amount(amount: Decimal) -> Result<i64, (StatusCode, ErrorEnvelope)> {
    if amount <= Decimal::ZERO {
        return Err((
            StatusCode::BAD_REQUEST,
            err("INVALID_AMOUNT", "amount must be positive"),
        ));
    }
    major_to_minor(amount).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            err("INVALID_AMOUNT", "amount has sub-cent precision"),
        )
    })
}

fn err(code: &str, message: &str) -> ErrorEnvelope {
    ErrorEnvelope {
        error: ErrorPayload {
            code: code.to_string(),
            message: message.to_string(),
            details: None,
        },
    }
}

fn internal(e: anyhow::Error) -> (StatusCode, ErrorEnvelope) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        err("INTERNAL_ERROR", &e.to_string()),
    )
}

fn processor_err(e: ProcessorError) -> (StatusCode, ErrorEnvelope) {
    match e {
        ProcessorError::Rejected(message) => {
            (StatusCode::BAD_REQUEST, err("PROCESSOR_REJECTED", &message))
        }
        ProcessorError::Api { status, message } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorEnvelope {
                error: ErrorPayload {
                    code: "PROCESSOR_ERROR".to_string(),
                    message,
                    details: Some(format!("processor status {status}")),
                },
            },
        ),
        ProcessorError::Network(message) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            err("PROCESSOR_UNREACHABLE", &message),
        ),
        ProcessorError::Malformed(message) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            err("PROCESSOR_RESPONSE_INVALID", &message),
        ),
    }
}
