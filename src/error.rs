use thiserror::Error;

/// Error type for token tracking and chain operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The RPC URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A contract read call failed or its return data could not be decoded
    #[error("Contract call failed: {0}")]
    Contract(String),

    /// The signer could not be constructed from the provided key
    #[error("Failed to sign transaction: {0}")]
    Signing(String),

    /// Broadcasting a transaction or fetching its receipt failed
    #[error("Transaction error: {0}")]
    TxResponse(String),

    /// Reading or writing the persisted token list failed
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// The persisted token list could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for tokend operations.
///
/// The error type defaults to [`Error`] but can be overridden, so the alias
/// does not shadow `std::result::Result` in glob imports.
pub type Result<T, E = Error> = std::result::Result<T, E>;
