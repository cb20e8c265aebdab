//! Error taxonomy for the submission pipeline.
//!
//! The hosted backend reports failures as an opaque payload whose
//! human-readable `message` is the only classification signal available.
//! `classify` keeps that substring heuristic behind a single function so the
//! predicate list can be swapped without touching orchestration code.

use thiserror::Error;

/// Failure reported by a hosted-backend call (storage upload or row insert).
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct BackendError {
    /// Human-readable message as returned by the service.
    pub message: String,

    /// HTTP status, when a response was received at all.
    pub status: Option<u16>,

    /// True when the request never produced a response (DNS, connect,
    /// timeout); these always classify as connectivity problems.
    pub transport: bool,
}

impl BackendError {
    /// Error carried in a service response body.
    pub fn service(message: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            message: message.into(),
            status,
            transport: false,
        }
    }

    /// Error raised before any response arrived.
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            transport: true,
        }
    }
}

/// Errors that abort a submission attempt.
///
/// Validation failures are not represented here; they are reported field by
/// field before the pipeline starts (see `validation`).
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("backend client is not configured")]
    NotConfigured,

    #[error("upload failed: {0}")]
    Upload(#[source] BackendError),

    #[error("insert failed: {0}")]
    Persistence(#[source] BackendError),
}

pub type SubmitResult<T> = Result<T, SubmitError>;

/// Coarse classification used to pick the user-facing error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotConfigured,
    AccessDenied,
    BucketMissing,
    UploadFailed,
    Connectivity,
    Generic,
}

impl ErrorKind {
    /// Notification copy for each classification (product copy, pt-BR).
    pub fn user_message(self) -> &'static str {
        match self {
            ErrorKind::NotConfigured => {
                "Erro de configuração. Verifique as credenciais do serviço e tente novamente."
            }
            ErrorKind::AccessDenied => {
                "Bloqueado pela política de acesso (403). Entre em contato com o suporte."
            }
            ErrorKind::BucketMissing => {
                "Erro de configuração do storage. Entre em contato com o suporte."
            }
            ErrorKind::UploadFailed => {
                "Erro no upload da conta de luz. Verifique o arquivo e tente novamente."
            }
            ErrorKind::Connectivity => "Erro de conexão. Verifique sua internet e tente novamente.",
            ErrorKind::Generic => "Erro ao enviar dados. Tente novamente.",
        }
    }
}

/// Map an aborted submission onto an `ErrorKind`.
///
/// Predicates run in priority order: access denial, bucket misconfiguration,
/// upload-stage failure, connectivity, generic fallback.
pub fn classify(err: &SubmitError) -> ErrorKind {
    let backend = match err {
        SubmitError::NotConfigured => return ErrorKind::NotConfigured,
        SubmitError::Upload(e) | SubmitError::Persistence(e) => e,
    };
    let msg = backend.message.to_lowercase();

    if msg.contains("row-level security") || backend.status == Some(403) {
        ErrorKind::AccessDenied
    } else if msg.contains("bucket not found") {
        ErrorKind::BucketMissing
    } else if matches!(err, SubmitError::Upload(_)) || msg.contains("upload") {
        ErrorKind::UploadFailed
    } else if backend.transport || msg.contains("supabase") {
        ErrorKind::Connectivity
    } else {
        ErrorKind::Generic
    }
}

/// True when an insert error indicates a missing or unknown column, i.e. the
/// hosted table predates the attribution migration.
pub fn is_schema_mismatch(err: &BackendError) -> bool {
    let msg = err.message.to_lowercase();
    msg.contains("column") || msg.contains("does not exist")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_access_denied_by_message() {
        let err = SubmitError::Persistence(BackendError::service(
            "new row violates row-level security policy",
            Some(401),
        ));
        assert_eq!(classify(&err), ErrorKind::AccessDenied);
    }

    #[test]
    fn test_classify_access_denied_by_status() {
        let err = SubmitError::Persistence(BackendError::service("forbidden", Some(403)));
        assert_eq!(classify(&err), ErrorKind::AccessDenied);
    }

    #[test]
    fn test_classify_bucket_missing_wins_over_upload_stage() {
        // An upload whose body says the bucket is gone is a misconfiguration,
        // not a retryable upload failure.
        let err = SubmitError::Upload(BackendError::service("Bucket not found", Some(404)));
        assert_eq!(classify(&err), ErrorKind::BucketMissing);
    }

    #[test]
    fn test_classify_upload_stage() {
        let err = SubmitError::Upload(BackendError::transport("connection reset by peer"));
        assert_eq!(classify(&err), ErrorKind::UploadFailed);
    }

    #[test]
    fn test_classify_connectivity() {
        let err = SubmitError::Persistence(BackendError::transport("error sending request"));
        assert_eq!(classify(&err), ErrorKind::Connectivity);
    }

    #[test]
    fn test_classify_generic_fallback() {
        let err = SubmitError::Persistence(BackendError::service(
            "duplicate key value violates unique constraint",
            Some(409),
        ));
        assert_eq!(classify(&err), ErrorKind::Generic);
    }

    #[test]
    fn test_schema_mismatch_markers() {
        assert!(is_schema_mismatch(&BackendError::service(
            "column \"utm_source\" of relation \"formulario_contatos\" does not exist",
            Some(400),
        )));
        assert!(is_schema_mismatch(&BackendError::service(
            "Could not find the 'utm_medium' column in the schema cache",
            Some(400),
        )));
        assert!(!is_schema_mismatch(&BackendError::service(
            "permission denied",
            Some(403),
        )));
    }
}
