//! HTTP classification of domain errors

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ledgerflow_domain::LedgerFlowError;
use tracing::{error, warn};

/// Wrapper classifying `LedgerFlowError` into HTTP responses
///
/// The body is the serialized error itself (`type` plus `message`), so
/// callers branch on a stable machine-readable label instead of status
/// text.
#[derive(Debug)]
pub struct ApiError(pub LedgerFlowError);

impl ApiError {
    /// Status code for the wrapped error.
    ///
    /// Caller faults land in the 4xx range, upstream provider failures
    /// are bad gateways, and everything operational is a 500.
    pub fn status_code(&self) -> StatusCode {
        use LedgerFlowError as E;
        match &self.0 {
            E::InvalidInput(_) => StatusCode::BAD_REQUEST,
            E::AuthUnavailable(_) => StatusCode::UNAUTHORIZED,
            E::NoParty(_) => StatusCode::NOT_FOUND,
            E::InvalidLineItem(_) => StatusCode::UNPROCESSABLE_ENTITY,
            E::RegistryLogin(_)
            | E::RegistryParse(_)
            | E::PartyCreateFailed(_)
            | E::InvoiceCreateFailed(_)
            | E::AccountingSchemeMissing(_)
            | E::PaymentFinalizeFailed(_)
            | E::DocumentFetchFailed(_)
            | E::EmailDispatchFailed(_)
            | E::Network(_) => StatusCode::BAD_GATEWAY,
            E::Config(_) | E::Storage(_) | E::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<LedgerFlowError> for ApiError {
    fn from(err: LedgerFlowError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = %status, error = %self.0, "request failed");
        } else {
            warn!(status = %status, error = %self.0, "request rejected");
        }
        (status, Json(self.0)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_faults_map_to_4xx() {
        let cases = [
            (LedgerFlowError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (LedgerFlowError::InvalidLineItem("x".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (LedgerFlowError::NoParty("x".into()), StatusCode::NOT_FOUND),
            (LedgerFlowError::AuthUnavailable("x".into()), StatusCode::UNAUTHORIZED),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError(err).status_code(), expected);
        }
    }

    #[test]
    fn upstream_faults_map_to_bad_gateway() {
        let upstream = [
            LedgerFlowError::RegistryLogin("x".into()),
            LedgerFlowError::RegistryParse("x".into()),
            LedgerFlowError::PartyCreateFailed("x".into()),
            LedgerFlowError::InvoiceCreateFailed("x".into()),
            LedgerFlowError::AccountingSchemeMissing("x".into()),
            LedgerFlowError::PaymentFinalizeFailed("x".into()),
            LedgerFlowError::DocumentFetchFailed("x".into()),
            LedgerFlowError::EmailDispatchFailed("x".into()),
            LedgerFlowError::Network("x".into()),
        ];
        for err in upstream {
            assert_eq!(ApiError(err).status_code(), StatusCode::BAD_GATEWAY);
        }
    }

    #[test]
    fn operational_faults_map_to_500() {
        let internal = [
            LedgerFlowError::Config("x".into()),
            LedgerFlowError::Storage("x".into()),
            LedgerFlowError::Internal("x".into()),
        ];
        for err in internal {
            assert_eq!(ApiError(err).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}
