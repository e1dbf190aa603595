use anyhow::Result;
use sqlx::{PgPool, Row};

#[derive(Debug, Clone)]
pub struct TenantContact {
    pub tenant_id: String,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub processor_customer_id: Option<String>,
}

/// Tenant contact lookup as the services see it; Postgres in production,
/// in-memory in tests.
#[async_trait::async_trait]
pub trait ContactDirectory: Send + Sync {
    async fn find_by_id(&self, tenant_id: &str) -> Result<Option<TenantContact>>;

    async fn set_processor_customer(
        &self,
        tenant_id: &str,
        processor_customer_id: &str,
    ) -> Result<()>;
}

#[derive(Clone)]
pub struct TenantsRepo {
    pub pool: PgPool,
}

#[async_trait::async_trait]
impl ContactDirectory for TenantsRepo {
    async fn find_by_id(&self, tenant_id: &str) -> Result<Option<TenantContact>> {
        TenantsRepo::find_by_id(self, tenant_id).await
    }

    async fn set_processor_customer(
        &self,
        tenant_id: &str,
        processor_customer_id: &str,
    ) -> Result<()> {
        TenantsRepo::set_processor_customer(self, tenant_id, processor_customer_id).await
    }
}

impl TenantsRepo {
    pub async fn find_by_id(&self, tenant_id: &str) -> Result<Option<TenantContact>> {
        let row = sqlx::query(
            r#"
            SELECT tenant_id, full_name, email, phone, processor_customer_id
            FROM tenants
            WHERE tenant_id = $1
            "#,
        )
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| TenantContact {
            tenant_id: r.get("tenant_id"),
            full_name: r.get("full_name"),
            email: r.get("email"),
            phone: r.get("phone"),
            processor_customer_id: r.get("processor_customer_id"),
        }))
    }

    pub async fn set_processor_customer(
        &self,
        tenant_id: &str,
        processor_customer_id: &str,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE tenants SET processor_customer_id = $2, updated_at = now() WHERE tenant_id = $1",
        )
        .bind(tenant_id)
        .bind(processor_customer_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
