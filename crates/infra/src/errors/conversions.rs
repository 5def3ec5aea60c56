//! Conversions from external infrastructure errors into domain errors.

use ledgerflow_domain::LedgerFlowError;
use reqwest::Error as HttpError;
use std::io::Error as IoError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub LedgerFlowError);

impl From<InfraError> for LedgerFlowError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<LedgerFlowError> for InfraError {
    fn from(value: LedgerFlowError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoLedgerFlowError {
    fn into_ledgerflow(self) -> LedgerFlowError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → LedgerFlowError */
/* -------------------------------------------------------------------------- */

impl IntoLedgerFlowError for HttpError {
    fn into_ledgerflow(self) -> LedgerFlowError {
        if self.is_timeout() {
            return LedgerFlowError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return LedgerFlowError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => LedgerFlowError::AuthUnavailable(message),
                429 => LedgerFlowError::Network(message),
                400..=499 => LedgerFlowError::InvalidInput(message),
                500..=599 => LedgerFlowError::Network(message),
                _ => LedgerFlowError::Network(message),
            };
        }

        LedgerFlowError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_ledgerflow())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → LedgerFlowError */
/* -------------------------------------------------------------------------- */

impl IntoLedgerFlowError for IoError {
    fn into_ledgerflow(self) -> LedgerFlowError {
        use std::io::ErrorKind;

        match self.kind() {
            ErrorKind::NotFound => LedgerFlowError::Storage("file not found".into()),
            ErrorKind::PermissionDenied => {
                LedgerFlowError::Storage("permission denied on token store path".into())
            }
            ErrorKind::AlreadyExists => LedgerFlowError::Storage("file already exists".into()),
            _ => LedgerFlowError::Storage(self.to_string()),
        }
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_ledgerflow())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → LedgerFlowError */
/* -------------------------------------------------------------------------- */

impl IntoLedgerFlowError for serde_json::Error {
    fn into_ledgerflow(self) -> LedgerFlowError {
        LedgerFlowError::Internal(format!("JSON serialization failed: {self}"))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(value.into_ledgerflow())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
