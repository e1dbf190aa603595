use crate::domain::event::{CustomerObject, InboundEvent, InvoiceObject, PaymentIntentObject};
use crate::domain::payment::{minor_to_major, PaymentStatus};
use crate::domain::transitions::{plan_transition, TransitionDecision};
use crate::repo::payments_repo::PaymentLedger;
use crate::repo::tenants_repo::ContactDirectory;
use crate::service::notifier::ReceiptSender;
use anyhow::Result;
use rust_decimal::Decimal;
use std::sync::Arc;

/// What processing a verified event amounted to. Every variant is
/// acknowledged 200 to the processor; the distinction exists for logging
/// and tests, not for the HTTP response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// A ledger row transitioned to a terminal state.
    Applied,
    /// Redelivery of a terminal event the ledger already reflects.
    AlreadyApplied,
    /// Event type outside the handled vocabulary, or a variant with no
    /// ledger effect.
    Ignored,
    /// Something to reconcile by hand: unknown reference, conflicting
    /// terminal states, or a handler error.
    Anomaly,
}

enum TerminalUpdate {
    Completed { amount: Decimal, currency: String },
    Failed { message: String },
}

impl TerminalUpdate {
    fn status(&self) -> PaymentStatus {
        match self {
            TerminalUpdate::Completed { .. } => PaymentStatus::Completed,
            TerminalUpdate::Failed { .. } => PaymentStatus::Failed,
        }
    }
}

/// Routes one verified event to exactly one handler. Handler failures are
/// logged with the event type and reference id and folded into the
/// acknowledgment; the processor contract is acknowledge fast, process
/// tolerantly.
#[derive(Clone)]
pub struct EventProcessor {
    pub payments_repo: Arc<dyn PaymentLedger>,
    pub tenants_repo: Arc<dyn ContactDirectory>,
    pub notifier: Arc<dyn ReceiptSender>,
}

impl EventProcessor {
    pub async fn process(&self, event: InboundEvent) -> ProcessOutcome {
        let kind = event.kind().to_string();
        let result = match event {
            InboundEvent::PaymentSucceeded(intent) => self.payment_succeeded(intent).await,
            InboundEvent::PaymentFailed(intent) => self.payment_failed(intent).await,
            InboundEvent::CustomerCreated(customer) => self.customer_created(customer),
            InboundEvent::InvoicePaymentSucceeded(invoice) => {
                self.invoice_settled(invoice).await
            }
            InboundEvent::InvoicePaymentFailed(invoice) => self.invoice_failed(invoice).await,
            InboundEvent::Unhandled { event_type } => {
                tracing::info!(%event_type, "ignoring unhandled event type");
                Ok(ProcessOutcome::Ignored)
            }
        };

        match result {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(event_type = %kind, error = %e, "event handler failed");
                ProcessOutcome::Anomaly
            }
        }
    }

    async fn payment_succeeded(&self, intent: PaymentIntentObject) -> Result<ProcessOutcome> {
        let amount = minor_to_major(intent.amount);
        self.apply_terminal(
            &intent.id,
            TerminalUpdate::Completed {
                amount,
                currency: intent.currency,
            },
        )
        .await
    }

    async fn payment_failed(&self, intent: PaymentIntentObject) -> Result<ProcessOutcome> {
        let message = intent
            .last_payment_error
            .as_ref()
            .and_then(|e| e.message.clone())
            .unwrap_or_else(|| "payment failed".to_string());

        self.apply_terminal(&intent.id, TerminalUpdate::Failed { message })
            .await
    }

    fn customer_created(&self, customer: CustomerObject) -> Result<ProcessOutcome> {
        // Bookkeeping only; the outbound path stores the id it creates,
        // so this event needs nothing beyond a visible log line.
        tracing::info!(
            customer_id = %customer.id,
            email = customer.email.as_deref().unwrap_or(""),
            "processor customer created"
        );
        Ok(ProcessOutcome::Ignored)
    }

    /// Invoice events carry the payment intent they settled; when present,
    /// they fold into the same terminal-transition path.
    async fn invoice_settled(&self, invoice: InvoiceObject) -> Result<ProcessOutcome> {
        let Some(reference) = invoice.payment_intent else {
            tracing::info!(invoice_id = %invoice.id, "invoice event without payment intent, ignoring");
            return Ok(ProcessOutcome::Ignored);
        };
        let Some(amount_minor) = invoice.amount_paid else {
            tracing::warn!(invoice_id = %invoice.id, "paid invoice missing amount, ignoring");
            return Ok(ProcessOutcome::Ignored);
        };
        let Some(currency) = invoice.currency else {
            tracing::warn!(invoice_id = %invoice.id, "paid invoice missing currency, ignoring");
            return Ok(ProcessOutcome::Ignored);
        };

        self.apply_terminal(
            &reference,
            TerminalUpdate::Completed {
                amount: minor_to_major(amount_minor),
                currency,
            },
        )
        .await
    }

    async fn invoice_failed(&self, invoice: InvoiceObject) -> Result<ProcessOutcome> {
        let Some(reference) = invoice.payment_intent else {
            tracing::info!(invoice_id = %invoice.id, "invoice event without payment intent, ignoring");
            return Ok(ProcessOutcome::Ignored);
        };

        self.apply_terminal(
            &reference,
            TerminalUpdate::Failed {
                message: "invoice payment failed".to_string(),
            },
        )
        .await
    }

    /// Shared terminal-transition core. The guarded UPDATE in the repo is
    /// what makes redelivery idempotent; the read before it classifies the
    /// no-op cases for the log. Receipts go out only when this call
    /// performed the transition, which caps notifications at one per
    /// payment.
    async fn apply_terminal(
        &self,
        reference: &str,
        update: TerminalUpdate,
    ) -> Result<ProcessOutcome> {
        let incoming = update.status();

        let Some(record) = self.payments_repo.find_by_reference(reference).await? else {
            tracing::error!(
                processor_ref = %reference,
                status = incoming.as_str(),
                "event references unknown payment record, needs reconciliation"
            );
            return Ok(ProcessOutcome::Anomaly);
        };

        let current = record.status().unwrap_or(PaymentStatus::Pending);
        match plan_transition(current, incoming) {
            TransitionDecision::Apply => {}
            TransitionDecision::AlreadyApplied => {
                tracing::info!(
                    processor_ref = %reference,
                    status = incoming.as_str(),
                    "redelivered terminal event, no-op"
                );
                return Ok(ProcessOutcome::AlreadyApplied);
            }
            TransitionDecision::ConflictingTerminal => {
                tracing::error!(
                    processor_ref = %reference,
                    current = current.as_str(),
                    incoming = incoming.as_str(),
                    "conflicting terminal event ignored, needs reconciliation"
                );
                return Ok(ProcessOutcome::Anomaly);
            }
        }

        match update {
            TerminalUpdate::Completed { amount, currency } => {
                let transitioned = self
                    .payments_repo
                    .mark_completed(reference, amount, &currency)
                    .await?;
                if !transitioned {
                    // Lost the race to a concurrent delivery; the row is
                    // already terminal.
                    return Ok(ProcessOutcome::AlreadyApplied);
                }
                tracing::info!(
                    processor_ref = %reference,
                    status = incoming.as_str(),
                    "payment record transitioned"
                );
                self.send_receipt(&record.tenant_id, reference, amount, &currency)
                    .await;
                Ok(ProcessOutcome::Applied)
            }
            TerminalUpdate::Failed { message } => {
                let transitioned = self.payments_repo.mark_failed(reference, &message).await?;
                if !transitioned {
                    return Ok(ProcessOutcome::AlreadyApplied);
                }
                tracing::info!(
                    processor_ref = %reference,
                    status = incoming.as_str(),
                    reason = %message,
                    "payment record transitioned"
                );
                Ok(ProcessOutcome::Applied)
            }
        }
    }

    async fn send_receipt(&self, tenant_id: &str, reference: &str, amount: Decimal, currency: &str) {
        match self.tenants_repo.find_by_id(tenant_id).await {
            Ok(Some(contact)) => {
                self.notifier
                    .payment_receipt(&contact, reference, amount, currency)
                    .await;
            }
            Ok(None) => {
                tracing::warn!(tenant_id, processor_ref = %reference, "no tenant row for receipt");
            }
            Err(e) => {
                tracing::warn!(
                    tenant_id,
                    processor_ref = %reference,
                    error = %e,
                    "contact lookup failed, receipt skipped"
                );
            }
        }
    }
}
