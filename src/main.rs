use axum::routing::{get, post};
use axum::Router;
use rentpay::config::AppConfig;
use rentpay::processor::stripe::StripeProcessor;
use rentpay::repo::payments_repo::PaymentsRepo;
use rentpay::repo::tenants_repo::TenantsRepo;
use rentpay::service::event_processor::EventProcessor;
use rentpay::service::notifier::Notifier;
use rentpay::service::payment_service::PaymentService;
use rentpay::webhook::verify::WebhookVerifier;
use rentpay::AppState;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&cfg.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let payments_repo = PaymentsRepo { pool: pool.clone() };
    let tenants_repo = TenantsRepo { pool: pool.clone() };

    let processor = Arc::new(StripeProcessor::new(
        cfg.processor_base_url.clone(),
        cfg.processor_secret_key.clone(),
        cfg.processor_timeout_ms,
    ));
    let notifier = Notifier::new(cfg.notify_base_url.clone(), cfg.notify_timeout_ms);

    let payment_service = PaymentService {
        payments_repo: Arc::new(payments_repo.clone()),
        tenants_repo: Arc::new(tenants_repo.clone()),
        processor,
    };
    let event_processor = EventProcessor {
        payments_repo: Arc::new(payments_repo.clone()),
        tenants_repo: Arc::new(tenants_repo),
        notifier: Arc::new(notifier),
    };

    let state = AppState {
        payment_service,
        event_processor,
        payments_repo,
        verifier: WebhookVerifier::new(cfg.webhook_secret.clone(), cfg.webhook_tolerance_secs),
    };

    let app = Router::new()
        .route("/health", get(rentpay::http::handlers::payments::health))
        .route(
            "/payments/intent",
            post(rentpay::http::handlers::payments::create_intent),
        )
        .route(
            "/payments/:payment_id",
            get(rentpay::http::handlers::payments::get_payment),
        )
        .route(
            "/webhooks/processor",
            post(rentpay::http::handlers::webhooks::receive_event),
        )
        .route("/ops/readiness", get(rentpay::http::handlers::ops::readiness))
        .route("/ops/liveness", get(rentpay::http::handlers::ops::liveness))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
