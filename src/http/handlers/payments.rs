use crate::domain::payment::{CreateIntentRequest, ErrorEnvelope, ErrorPayload, PaymentView};
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

pub async fn create_intent(
    State(state): State<AppState>,
    Json(req): Json<CreateIntentRequest>,
) -> impl IntoResponse {
    match state.payment_service.create_intent(req).await {
        Ok(resp) => (StatusCode::OK, Json(resp)).into_response(),
        Err((status, body)) => (status, Json(body)).into_response(),
    }
}

pub async fn get_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.payments_repo.find_by_id(payment_id).await {
        Ok(Some(record)) => {
            let status = match record.status() {
                Some(status) => status,
                None => {
                    return error_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "CORRUPT_STATUS",
                        "payment row carries an unknown status",
                    )
                }
            };
            let view = PaymentView {
                payment_id: record.payment_id,
                processor_ref: record.processor_ref,
                tenant_id: record.tenant_id,
                amount: record.amount,
                currency: record.currency,
                status,
                error_message: record.error_message,
                created_at: record.created_at,
                updated_at: record.updated_at,
            };
            (StatusCode::OK, Json(view)).into_response()
        }
        Ok(None) => error_response(StatusCode::NOT_FOUND, "PAYMENT_NOT_FOUND", "no such payment"),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", &e.to_string()),
    }
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

fn error_response(status: StatusCode, code: &str, message: &str) -> axum::response::Response {
    (
        status,
        Json(ErrorEnvelope {
            error: ErrorPayload {
                code: code.to_string(),
                message: message.to_string(),
                details: None,
            },
        }),
    )
        .into_response()
}
