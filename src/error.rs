/// Error types for the ipscrape library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// URL argument failed syntactic validation.
    #[error("{url} is an invalid URL, must specify fqdn, ex. https://www.example.com")]
    InvalidUrl { url: String },

    /// The page fetch failed (connection, TLS, or read error).
    #[error("failed to fetch {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("{url} returned HTTP status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },
}

/// Convenience type alias for Results using the library error.
pub type Result<T> = std::result::Result<T, Error>;
