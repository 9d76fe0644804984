use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the crate.
///
/// Upstream failures (`UpstreamStatus`, `Network`) are expected outcomes: the
/// resolver turns them into an unavailable lookup result instead of raising.
/// Store failures are fatal and propagate to the caller.
#[derive(Debug, Error)]
pub enum Error {
    #[error("upstream returned status {0}")]
    UpstreamStatus(u16),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("store I/O error: {0}")]
    StoreIo(#[from] std::io::Error),

    #[error("store encoding error: {0}")]
    StoreEncoding(#[from] bincode::Error),

    #[error("missing configuration: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_status_message_contains_code() {
        let err = Error::UpstreamStatus(404);
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn config_error_names_the_missing_key() {
        let err = Error::Config("LASTFM_API_KEY is not set".to_string());
        assert!(err.to_string().contains("LASTFM_API_KEY"));
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io.into();
        match err {
            Error::StoreIo(_) => (),
            other => panic!("expected StoreIo, got {other:?}"),
        }
    }
}
