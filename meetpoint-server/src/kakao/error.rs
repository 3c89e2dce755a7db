//! Kakao client error types.

/// Errors from the Kakao Local API.
#[derive(Debug, thiserror::Error)]
pub enum KakaoError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid or missing REST API key
    #[error("unauthorized: check KAKAO_API_KEY")]
    Unauthorized,

    /// Rate limited by the API
    #[error("rate limited by Kakao API")]
    RateLimited,

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },
}
