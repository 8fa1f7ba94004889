//! Error types for the Contextor domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all Contextor operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Language model / embedding endpoints ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Vector index and conversation store ---
    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    // --- Web search and page fetch ---
    #[error("Web error: {0}")]
    Web(#[from] WebError),

    // --- Corpus chunking ---
    #[error("Chunking error: {0}")]
    Chunk(#[from] ChunkError),

    // --- Context assembly ---
    #[error("Assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Embedding generation failed: {0}")]
    EmbeddingFailed(String),

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Conversation store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<ProviderError> for IndexError {
    fn from(err: ProviderError) -> Self {
        Self::EmbeddingFailed(err.to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum WebError {
    #[error("Search request failed: {0}")]
    SearchFailed(String),

    #[error("Fetch failed for {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Malformed search payload: {0}")]
    MalformedPayload(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChunkError {
    #[error("Invalid chunker configuration: {0}")]
    InvalidConfig(String),

    #[error("Message {index} in conversation '{conversation}' has no timestamp")]
    MissingTimestamp { conversation: String, index: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssemblyError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 503,
            message: "Service unavailable".into(),
        });
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("Service unavailable"));
    }

    #[test]
    fn missing_timestamp_names_the_message() {
        let err = ChunkError::MissingTimestamp {
            conversation: "trip-planning".into(),
            index: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("trip-planning"));
        assert!(msg.contains('3'));
    }

    #[test]
    fn provider_error_converts_into_embedding_failure() {
        let err: IndexError = ProviderError::Network("connection refused".into()).into();
        assert!(matches!(err, IndexError::EmbeddingFailed(ref m) if m.contains("refused")));
    }
}
