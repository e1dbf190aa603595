use crate::domain::event::EventEnvelope;
use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_HEADER: &str = "processor-signature";

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("missing {SIGNATURE_HEADER} header")]
    MissingSignature,
    #[error("malformed signature header: {0}")]
    MalformedHeader(String),
    #[error("event timestamp outside tolerance window")]
    StaleTimestamp,
    #[error("signature mismatch")]
    SignatureMismatch,
    #[error("malformed event payload: {0}")]
    MalformedPayload(String),
}

/// Validates inbound webhook authenticity against the shared secret.
/// The signature header carries `t=<unix seconds>,v1=<hex hmac>` where the
/// hmac is computed over `<t>.<raw body>`.
#[derive(Clone)]
pub struct WebhookVerifier {
    pub secret: String,
    pub tolerance_secs: i64,
}

impl WebhookVerifier {
    pub fn new(secret: String, tolerance_secs: i64) -> Self {
        Self {
            secret,
            tolerance_secs,
        }
    }

    pub fn verify(&self, body: &[u8], headers: &HeaderMap) -> Result<EventEnvelope, VerifyError> {
        let header = headers
            .get(SIGNATURE_HEADER)
            .ok_or(VerifyError::MissingSignature)?
            .to_str()
            .map_err(|_| VerifyError::MalformedHeader("not valid ascii".to_string()))?;

        self.verify_at(body, header, Utc::now())
    }

    pub fn verify_at(
        &self,
        body: &[u8],
        signature_header: &str,
        now: DateTime<Utc>,
    ) -> Result<EventEnvelope, VerifyError> {
        let parsed = SignatureHeader::parse(signature_header)?;

        if (now.timestamp() - parsed.timestamp).abs() > self.tolerance_secs {
            return Err(VerifyError::StaleTimestamp);
        }

        let expected = self.expected_signature(parsed.timestamp, body)?;
        let valid = parsed
            .signatures
            .iter()
            .any(|sig| constant_time_eq(expected.as_bytes(), sig.as_bytes()));
        if !valid {
            return Err(VerifyError::SignatureMismatch);
        }

        serde_json::from_slice(body).map_err(|e| VerifyError::MalformedPayload(e.to_string()))
    }

    pub fn sign(&self, timestamp: i64, body: &[u8]) -> Result<String, VerifyError> {
        let signature = self.expected_signature(timestamp, body)?;
        Ok(format!("t={timestamp},v1={signature}"))
    }

    fn expected_signature(&self, timestamp: i64, body: &[u8]) -> Result<String, VerifyError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| VerifyError::MalformedHeader(format!("hmac init: {e}")))?;
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(body);
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

struct SignatureHeader {
    timestamp: i64,
    signatures: Vec<String>,
}

impl SignatureHeader {
    fn parse(header: &str) -> Result<SignatureHeader, VerifyError> {
        let mut timestamp: Option<i64> = None;
        let mut signatures = Vec::new();

        for part in header.split(',') {
            match part.split_once('=') {
                Some(("t", v)) => {
                    timestamp = Some(v.parse().map_err(|_| {
                        VerifyError::MalformedHeader("non-numeric timestamp".to_string())
                    })?);
                }
                Some(("v1", v)) => signatures.push(v.to_string()),
                _ => {}
            }
        }

        let timestamp = timestamp
            .ok_or_else(|| VerifyError::MalformedHeader("missing timestamp".to_string()))?;
        if signatures.is_empty() {
            return Err(VerifyError::MalformedHeader(
                "missing v1 signature".to_string(),
            ));
        }

        Ok(SignatureHeader {
            timestamp,
            signatures,
        })
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .fold(0u8, |acc, (x, y)| acc | (x ^ y))
            == 0
}
