//! Error types module
//!
//! Per-file failures in the ingestion pipeline are classified into [`IngestError`].
//! None of them ever reach the host: the orchestrator logs each one at the level
//! given by [`IngestError::log_level`] and carries on with whatever metadata it has.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected branches like an unconvertible file
    Debug,
    /// Warning level - for recoverable issues like a stale local path
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be reported to operators.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "UPLOAD_TRANSPORT_FAILURE")
    fn error_code(&self) -> &'static str;

    /// Whether a later attempt could succeed without operator action
    fn is_recoverable(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The file is not an image the codec can convert. Expected for documents, video, etc.
    #[error("Conversion unsupported: {0}")]
    ConversionUnsupported(String),

    /// An image backend failed while decoding or encoding.
    #[error("Conversion backend {backend} failed: {message}")]
    ConversionBackendFailure { backend: String, message: String },

    /// The remote put failed. The local file is still removed.
    #[error("Upload of {key} failed: {message}")]
    UploadTransportFailure { key: String, message: String },

    /// Nothing left on disk to work with; treated as already handled.
    #[error("Local file missing: {0}")]
    LocalFileMissing(String),

    /// Object store credentials are absent; fatal to activation only.
    #[error("Object store credentials are not configured")]
    CredentialsMissing,

    /// The host could not resolve or persist attachment data.
    #[error("Host error: {0}")]
    Host(String),
}

impl IngestError {
    pub fn log_level(&self) -> LogLevel {
        ErrorMetadata::log_level(self)
    }
}

impl ErrorMetadata for IngestError {
    fn error_code(&self) -> &'static str {
        match self {
            IngestError::ConversionUnsupported(_) => "CONVERSION_UNSUPPORTED",
            IngestError::ConversionBackendFailure { .. } => "CONVERSION_BACKEND_FAILURE",
            IngestError::UploadTransportFailure { .. } => "UPLOAD_TRANSPORT_FAILURE",
            IngestError::LocalFileMissing(_) => "LOCAL_FILE_MISSING",
            IngestError::CredentialsMissing => "CREDENTIALS_MISSING",
            IngestError::Host(_) => "HOST_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(
            self,
            IngestError::UploadTransportFailure { .. } | IngestError::Host(_)
        )
    }

    fn log_level(&self) -> LogLevel {
        match self {
            IngestError::ConversionUnsupported(_) | IngestError::LocalFileMissing(_) => {
                LogLevel::Debug
            }
            IngestError::CredentialsMissing | IngestError::Host(_) => LogLevel::Warn,
            IngestError::ConversionBackendFailure { .. }
            | IngestError::UploadTransportFailure { .. } => LogLevel::Error,
        }
    }
}

impl From<anyhow::Error> for IngestError {
    fn from(err: anyhow::Error) -> Self {
        IngestError::Host(format!("{:#}", err))
    }
}
