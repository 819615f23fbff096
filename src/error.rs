use thiserror::Error;

/// Which half of a key pair an operation was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// PKCS#8 private key used for signing.
    Private,
    /// SPKI public key used for verification.
    Public,
}

impl KeyKind {
    fn prompt(&self) -> &'static str {
        match self {
            KeyKind::Private => "Paste a PKCS#8 private key PEM",
            KeyKind::Public => "Paste an SPKI public key PEM",
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Malformed PEM: {0}")]
    MalformedPem(String),

    #[error("Malformed signature: {0}")]
    MalformedSignature(String),

    #[error("{}", .0.prompt())]
    MissingKey(KeyKind),

    #[error("Generate a signature first")]
    MissingSignature,

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Another operation is already in progress")]
    OperationInProgress,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::MalformedPem(_) => ErrorCode::MalformedPem,
            Error::MalformedSignature(_) => ErrorCode::MalformedSignature,
            Error::MissingKey(_) => ErrorCode::MissingKey,
            Error::MissingSignature => ErrorCode::MissingSignature,
            Error::InvalidKey(_) => ErrorCode::InvalidKey,
            Error::KeyGeneration(_) => ErrorCode::KeyGeneration,
            Error::Signing(_) => ErrorCode::SigningFailed,
            Error::OperationInProgress => ErrorCode::OperationInProgress,
            Error::Json(_) | Error::Io(_) => ErrorCode::Configuration,
        }
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error::MalformedPem(err.to_string())
    }
}

impl From<rsa::pkcs8::Error> for Error {
    fn from(err: rsa::pkcs8::Error) -> Self {
        Error::InvalidKey(err.to_string())
    }
}

impl From<rsa::pkcs8::spki::Error> for Error {
    fn from(err: rsa::pkcs8::spki::Error) -> Self {
        Error::InvalidKey(err.to_string())
    }
}

/// Error codes for structured operation outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "MALFORMED_PEM")]
    MalformedPem,
    #[serde(rename = "MALFORMED_SIGNATURE")]
    MalformedSignature,
    #[serde(rename = "MISSING_KEY")]
    MissingKey,
    #[serde(rename = "MISSING_SIGNATURE")]
    MissingSignature,
    #[serde(rename = "INVALID_KEY")]
    InvalidKey,
    #[serde(rename = "KEY_GENERATION_FAILED")]
    KeyGeneration,
    #[serde(rename = "SIGNING_FAILED")]
    SigningFailed,
    #[serde(rename = "OPERATION_IN_PROGRESS")]
    OperationInProgress,
    #[serde(rename = "CONFIGURATION")]
    Configuration,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorCode::MalformedPem => "MALFORMED_PEM",
            ErrorCode::MalformedSignature => "MALFORMED_SIGNATURE",
            ErrorCode::MissingKey => "MISSING_KEY",
            ErrorCode::MissingSignature => "MISSING_SIGNATURE",
            ErrorCode::InvalidKey => "INVALID_KEY",
            ErrorCode::KeyGeneration => "KEY_GENERATION_FAILED",
            ErrorCode::SigningFailed => "SIGNING_FAILED",
            ErrorCode::OperationInProgress => "OPERATION_IN_PROGRESS",
            ErrorCode::Configuration => "CONFIGURATION",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_messages() {
        assert_eq!(
            Error::MissingKey(KeyKind::Private).to_string(),
            "Paste a PKCS#8 private key PEM"
        );
        assert_eq!(
            Error::MissingKey(KeyKind::Public).to_string(),
            "Paste an SPKI public key PEM"
        );
        assert_eq!(
            Error::MissingSignature.to_string(),
            "Generate a signature first"
        );
    }

    #[test]
    fn test_error_code_serde() {
        let json = serde_json::to_string(&ErrorCode::MissingSignature).unwrap();
        assert_eq!(json, "\"MISSING_SIGNATURE\"");
        let code: ErrorCode = serde_json::from_str("\"INVALID_KEY\"").unwrap();
        assert_eq!(code, ErrorCode::InvalidKey);
        assert_eq!(code.to_string(), "INVALID_KEY");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::MalformedPem("x".into()).code(),
            ErrorCode::MalformedPem
        );
        assert_eq!(
            Error::OperationInProgress.code(),
            ErrorCode::OperationInProgress
        );
        assert_eq!(
            Error::MissingKey(KeyKind::Public).code(),
            ErrorCode::MissingKey
        );
    }
}
