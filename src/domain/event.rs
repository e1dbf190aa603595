use serde::Deserialize;

/// Raw webhook envelope as delivered by the processor, parsed after
/// signature verification.
#[derive(Debug, Clone, Deserialize)]
pub struct EventEnvelope {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: EventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    pub object: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntentObject {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub last_payment_error: Option<PaymentErrorObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentErrorObject {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomerObject {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceObject {
    pub id: String,
    #[serde(default)]
    pub payment_intent: Option<String>,
    #[serde(rename = "amount_paid", default)]
    pub amount_paid: Option<i64>,
    #[serde(rename = "amount_due", default)]
    pub amount_due: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
}

/// Closed vocabulary of processor notifications this service handles.
/// Anything outside it lands in Unhandled and is acknowledged without a
/// handler run.
#[derive(Debug, Clone)]
pub enum InboundEvent {
    PaymentSucceeded(PaymentIntentObject),
    PaymentFailed(PaymentIntentObject),
    CustomerCreated(CustomerObject),
    InvoicePaymentSucceeded(InvoiceObject),
    InvoicePaymentFailed(InvoiceObject),
    Unhandled { event_type: String },
}

impl InboundEvent {
    pub fn classify(envelope: &EventEnvelope) -> Result<InboundEvent, serde_json::Error> {
        let object = envelope.data.object.clone();
        let event = match envelope.event_type.as_str() {
            "payment_intent.succeeded" => {
                InboundEvent::PaymentSucceeded(serde_json::from_value(object)?)
            }
            "payment_intent.payment_failed" => {
                InboundEvent::PaymentFailed(serde_json::from_value(object)?)
            }
            "customer.created" => InboundEvent::CustomerCreated(serde_json::from_value(object)?),
            "invoice.payment_succeeded" => {
                InboundEvent::InvoicePaymentSucceeded(serde_json::from_value(object)?)
            }
            "invoice.payment_failed" => {
                InboundEvent::InvoicePaymentFailed(serde_json::from_value(object)?)
            }
            other => InboundEvent::Unhandled {
                event_type: other.to_string(),
            },
        };
        Ok(event)
    }

    pub fn kind(&self) -> &str {
        match self {
            InboundEvent::PaymentSucceeded(_) => "payment_intent.succeeded",
            InboundEvent::PaymentFailed(_) => "payment_intent.payment_failed",
            InboundEvent::CustomerCreated(_) => "customer.created",
            InboundEvent::InvoicePaymentSucceeded(_) => "invoice.payment_succeeded",
            InboundEvent::InvoicePaymentFailed(_) => "invoice.payment_failed",
            InboundEvent::Unhandled { event_type } => event_type,
        }
    }
}
