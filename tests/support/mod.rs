use anyhow::Result;
use chrono::Utc;
use rentpay::repo::payments_repo::{PaymentLedger, PendingPaymentInput, StoredPayment};
use rentpay::repo::tenants_repo::{ContactDirectory, TenantContact};
use rentpay::service::notifier::ReceiptSender;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// Ledger backed by a map, with the same PENDING-guard semantics as the
/// Postgres repo.
pub struct MemoryLedger {
    pub rows: Mutex<HashMap<String, StoredPayment>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_pending(reference: &str, tenant_id: &str, amount: Decimal) -> Self {
        let ledger = Self::new();
        ledger.put(pending_row(reference, tenant_id, amount));
        ledger
    }

    pub fn put(&self, row: StoredPayment) {
        self.rows
            .lock()
            .unwrap()
            .insert(row.processor_ref.clone(), row);
    }

    pub fn row(&self, reference: &str) -> Option<StoredPayment> {
        self.rows.lock().unwrap().get(reference).cloned()
    }
}

pub fn pending_row(reference: &str, tenant_id: &str, amount: Decimal) -> StoredPayment {
    let now = Utc::now();
    StoredPayment {
        payment_id: Uuid::new_v4(),
        processor_ref: reference.to_string(),
        tenant_id: tenant_id.to_string(),
        amount,
        currency: "usd".to_string(),
        status: "PENDING".to_string(),
        error_message: None,
        created_at: now,
        updated_at: now,
    }
}

#[async_trait::async_trait]
impl PaymentLedger for MemoryLedger {
    async fn insert_pending(&self, input: &PendingPaymentInput) -> Result<()> {
        let now = Utc::now();
        self.put(StoredPayment {
            payment_id: input.payment_id,
            processor_ref: input.processor_ref.clone(),
            tenant_id: input.tenant_id.clone(),
            amount: input.amount,
            currency: input.currency.clone(),
            status: "PENDING".to_string(),
            error_message: None,
            created_at: now,
            updated_at: now,
        });
        Ok(())
    }

    async fn find_by_reference(&self, processor_ref: &str) -> Result<Option<StoredPayment>> {
        Ok(self.row(processor_ref))
    }

    async fn mark_completed(
        &self,
        processor_ref: &str,
        amount: Decimal,
        currency: &str,
    ) -> Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(processor_ref) {
            Some(row) if row.status == "PENDING" => {
                row.status = "COMPLETED".to_string();
                row.amount = amount;
                row.currency = currency.to_string();
                row.error_message = None;
                row.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_failed(&self, processor_ref: &str, error_message: &str) -> Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(processor_ref) {
            Some(row) if row.status == "PENDING" => {
                row.status = "FAILED".to_string();
                row.error_message = Some(error_message.to_string());
                row.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

pub struct MemoryDirectory {
    pub contacts: Mutex<HashMap<String, TenantContact>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self {
            contacts: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_tenant(tenant_id: &str, full_name: &str, email: Option<&str>) -> Self {
        let directory = Self::new();
        directory.contacts.lock().unwrap().insert(
            tenant_id.to_string(),
            TenantContact {
                tenant_id: tenant_id.to_string(),
                full_name: full_name.to_string(),
                email: email.map(ToString::to_string),
                phone: None,
                processor_customer_id: None,
            },
        );
        directory
    }

    pub fn contact(&self, tenant_id: &str) -> Option<TenantContact> {
        self.contacts.lock().unwrap().get(tenant_id).cloned()
    }
}

#[async_trait::async_trait]
impl ContactDirectory for MemoryDirectory {
    async fn find_by_id(&self, tenant_id: &str) -> Result<Option<TenantContact>> {
        Ok(self.contact(tenant_id))
    }

    async fn set_processor_customer(
        &self,
        tenant_id: &str,
        processor_customer_id: &str,
    ) -> Result<()> {
        if let Some(contact) = self.contacts.lock().unwrap().get_mut(tenant_id) {
            contact.processor_customer_id = Some(processor_customer_id.to_string());
        }
        Ok(())
    }
}

/// Records receipt attempts instead of sending anything.
pub struct RecordingNotifier {
    pub sends: Mutex<Vec<(String, Decimal, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            sends: Mutex::new(Vec::new()),
        }
    }

    pub fn send_count(&self) -> usize {
        self.sends.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl ReceiptSender for RecordingNotifier {
    async fn payment_receipt(
        &self,
        _contact: &TenantContact,
        processor_ref: &str,
        amount: Decimal,
        currency: &str,
    ) {
        self.sends.lock().unwrap().push((
            processor_ref.to_string(),
            amount,
            currency.to_string(),
        ));
    }
}
