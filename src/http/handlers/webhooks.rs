use crate::domain::event::InboundEvent;
use crate::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;

/// Inbound processor webhook. Verification failures get a 400 and nothing
/// is processed; everything verified is acknowledged 200, including event
/// types this service deliberately ignores and anomalies it only logs.
pub async fn receive_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let envelope = match state.verifier.verify(&body, &headers) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::warn!(error = %e, "webhook rejected");
            return StatusCode::BAD_REQUEST;
        }
    };

    let event = match InboundEvent::classify(&envelope) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(
                event_id = %envelope.id,
                event_type = %envelope.event_type,
                error = %e,
                "webhook payload does not match its declared type"
            );
            return StatusCode::BAD_REQUEST;
        }
    };

    let outcome = state.event_processor.process(event).await;
    tracing::debug!(
        event_id = %envelope.id,
        event_type = %envelope.event_type,
        ?outcome,
        "webhook acknowledged"
    );
    StatusCode::OK
}
