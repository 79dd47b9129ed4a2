use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of every failure the pipeline can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Validation,
    Io,
    Crypto,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Private key parse error: {0}")]
    PrivateKeyParse(String),
    #[error("Keystore error: {0}")]
    Keystore(String),
    #[error("Passphrase capture failed: {0}")]
    Passphrase(String),
    #[error("Signature failure: {0}")]
    SignatureFailure(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Parse(_) => ErrorKind::Parse,
            Error::Validation(_) => ErrorKind::Validation,
            Error::Io { .. } => ErrorKind::Io,
            Error::PrivateKeyParse(_)
            | Error::Keystore(_)
            | Error::Passphrase(_)
            | Error::SignatureFailure(_) => ErrorKind::Crypto,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Malformed user input: signatures, type tokens, literals and ABI lookups.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid method signature '{0}'")]
    InvalidSignature(String),
    #[error("Invalid type '{0}'")]
    UnknownType(String),
    #[error("Invalid {kind} '{value}': {reason}")]
    InvalidValue {
        kind: String,
        value: String,
        reason: String,
    },
    #[error("Invalid or mismatched array signature and/or value '{0}'")]
    UnbalancedArray(String),
    #[error("Nested arrays are not supported: '{0}'")]
    NestedArray(String),
    #[error("Mismatched array length for {kind}, expected {expected} got {got}")]
    ArrayLength {
        kind: String,
        expected: usize,
        got: usize,
    },
    #[error("Mismatched length, expected {expected} got {got}")]
    ArityMismatch { expected: usize, got: usize },
    #[error("Missing function '{0}' in ABI")]
    UnknownMethod(String),
    #[error("Invalid ABI: {0}")]
    Interface(String),
}

impl ParseError {
    pub(crate) fn invalid(
        kind: impl ToString,
        value: impl Into<String>,
        reason: impl ToString,
    ) -> Self {
        ParseError::InvalidValue {
            kind: kind.to_string(),
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}

/// Illegal flag combinations and out-of-range transaction fields.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("flag --bin is required for contract deployments")]
    MissingBytecode,
    #[error("flag --bin is only valid for contract deployments")]
    UnexpectedBytecode,
    #[error("flag --to can't be set for contract deployments")]
    RecipientForbidden,
    #[error("flag --to is required for {0}")]
    MissingRecipient(&'static str),
    #[error("a method signature (or --abi with a method name) is required for call")]
    MissingMethod,
    #[error("ether transfers accept at most one message argument, got {0}")]
    TooManyArguments(usize),
    #[error("flag --{flag} can't be negative: '{value}'")]
    Negative { flag: &'static str, value: String },
    #[error("flag --{flag} is not a valid number: '{value}'")]
    InvalidNumber { flag: &'static str, value: String },
    #[error("one of --key or --keystore is required")]
    MissingKey,
    #[error("flags --key and --keystore can't both be set")]
    ConflictingKeys,
}
