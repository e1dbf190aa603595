use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Completed => "COMPLETED",
            PaymentStatus::Failed => "FAILED",
        }
    }

    pub fn parse(s: &str) -> Option<PaymentStatus> {
        match s {
            "PENDING" => Some(PaymentStatus::Pending),
            "COMPLETED" => Some(PaymentStatus::Completed),
            "FAILED" => Some(PaymentStatus::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentKind {
    Rent,
    Deposit,
    Fee,
}

impl PaymentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentKind::Rent => "rent",
            PaymentKind::Deposit => "deposit",
            PaymentKind::Fee => "fee",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntentRequest {
    pub amount: Decimal,
    pub currency: Option<String>,
    pub tenant_id: String,
    pub property_id: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<PaymentKind>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntentResponse {
    pub client_secret: String,
    pub payment_intent_id: String,
    pub customer: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentView {
    pub payment_id: Uuid,
    pub processor_ref: String,
    pub tenant_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub status: PaymentStatus,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorPayload,
}

#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

/// Converts a processor-reported minor-unit amount to the major-unit value
/// stored in the ledger. Every currency this service accepts has a
/// minor-unit exponent of 2.
pub fn minor_to_major(amount_minor: i64) -> Decimal {
    Decimal::new(amount_minor, 2)
}

/// Converts a major-unit amount to the minor units the processor wire
/// expects. None when the amount carries sub-cent precision.
pub fn major_to_minor(amount: Decimal) -> Option<i64> {
    let scaled = amount * Decimal::new(100, 0);
    if scaled.fract().is_zero() {
        scaled.trunc().try_into().ok()
    } else {
        None
    }
}
