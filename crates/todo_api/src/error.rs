/// Failures surfaced by [`crate::TodoService`] implementations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TodoApiError {
    /// The todo text was empty after trimming.
    #[error("todo body is required")]
    EmptyBody,
    /// No todo has the requested id.
    #[error("todo `{0}` not found")]
    NotFound(String),
    /// The backend answered with a non-success status.
    #[error("todo API returned {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Backend `error` field, or a generic description when absent.
        message: String,
    },
    /// The request never produced a response.
    #[error("todo API request failed: {0}")]
    Transport(String),
    /// The response body did not match the expected shape.
    #[error("todo API response could not be decoded: {0}")]
    Decode(String),
}
