use crate::domain::payment::PaymentStatus;
use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};
use uuid::Uuid;

pub struct PendingPaymentInput {
    pub payment_id: Uuid,
    pub processor_ref: String,
    pub tenant_id: String,
    pub property_id: Option<String>,
    pub amount: Decimal,
    pub currency: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StoredPayment {
    pub payment_id: Uuid,
    pub processor_ref: String,
    pub tenant_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub status: String,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredPayment {
    pub fn status(&self) -> Option<PaymentStatus> {
        PaymentStatus::parse(&self.status)
    }
}

/// Ledger access as the services see it. `PaymentsRepo` is the Postgres
/// implementation; tests substitute an in-memory one.
#[async_trait::async_trait]
pub trait PaymentLedger: Send + Sync {
    async fn insert_pending(&self, input: &PendingPaymentInput) -> Result<()>;

    async fn find_by_reference(&self, processor_ref: &str) -> Result<Option<StoredPayment>>;

    /// Moves a pending row to COMPLETED with the processor-reported
    /// amount. The status guard makes redelivery and out-of-order
    /// terminal events no-ops; the return value says whether this call
    /// performed the transition.
    async fn mark_completed(
        &self,
        processor_ref: &str,
        amount: Decimal,
        currency: &str,
    ) -> Result<bool>;

    async fn mark_failed(&self, processor_ref: &str, error_message: &str) -> Result<bool>;
}

#[derive(Clone)]
pub struct PaymentsRepo {
    pub pool: PgPool,
}

#[async_trait::async_trait]
impl PaymentLedger for PaymentsRepo {
    async fn insert_pending(&self, input: &PendingPaymentInput) -> Result<()> {
        PaymentsRepo::insert_pending(self, input).await
    }

    async fn find_by_reference(&self, processor_ref: &str) -> Result<Option<StoredPayment>> {
        PaymentsRepo::find_by_reference(self, processor_ref).await
    }

    async fn mark_completed(
        &self,
        processor_ref: &str,
        amount: Decimal,
        currency: &str,
    ) -> Result<bool> {
        PaymentsRepo::mark_completed(self, processor_ref, amount, currency).await
    }

    async fn mark_failed(&self, processor_ref: &str, error_message: &str) -> Result<bool> {
        PaymentsRepo::mark_failed(self, processor_ref, error_message).await
    }
}

impl PaymentsRepo {
    pub async fn insert_pending(&self, input: &PendingPaymentInput) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO payments (
                payment_id, processor_ref, tenant_id, property_id,
                amount, currency, description, status
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, 'PENDING')
            "#,
        )
        .bind(input.payment_id)
        .bind(&input.processor_ref)
        .bind(&input.tenant_id)
        .bind(&input.property_id)
        .bind(input.amount)
        .bind(&input.currency)
        .bind(&input.description)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_reference(&self, processor_ref: &str) -> Result<Option<StoredPayment>> {
        let row = sqlx::query(
            r#"
            SELECT payment_id, processor_ref, tenant_id, amount, currency,
                   status, error_message, created_at, updated_at
            FROM payments
            WHERE processor_ref = $1
            "#,
        )
        .bind(processor_ref)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(to_stored))
    }

    pub async fn find_by_id(&self, payment_id: Uuid) -> Result<Option<StoredPayment>> {
        let row = sqlx::query(
            r#"
            SELECT payment_id, processor_ref, tenant_id, amount, currency,
                   status, error_message, created_at, updated_at
            FROM payments
            WHERE payment_id = $1
            "#,
        )
        .bind(payment_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(to_stored))
    }

    /// Moves a pending row to COMPLETED with the processor-reported amount.
    /// The status guard makes redelivery and out-of-order terminal events
    /// no-ops; the return value says whether this call performed the
    /// transition.
    pub async fn mark_completed(
        &self,
        processor_ref: &str,
        amount: Decimal,
        currency: &str,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE payments
            SET status = 'COMPLETED', amount = $2, currency = $3,
                error_message = NULL, processed_at = now(), updated_at = now()
            WHERE processor_ref = $1 AND status = 'PENDING'
            "#,
        )
        .bind(processor_ref)
        .bind(amount)
        .bind(currency)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn mark_failed(&self, processor_ref: &str, error_message: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE payments
            SET status = 'FAILED', error_message = $2,
                processed_at = now(), updated_at = now()
            WHERE processor_ref = $1 AND status = 'PENDING'
            "#,
        )
        .bind(processor_ref)
        .bind(error_message)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

fn to_stored(row: sqlx::postgres::PgRow) -> StoredPayment {
    StoredPayment {
        payment_id: row.get("payment_id"),
        processor_ref: row.get("processor_ref"),
        tenant_id: row.get("tenant_id"),
        amount: row.get("amount"),
        currency: row.get("currency"),
        status: row.get("status"),
        error_message: row.get("error_message"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
