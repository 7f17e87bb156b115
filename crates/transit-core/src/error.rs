use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[error("TOML write error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("incompatible database {name:?} version {version} (expected {expected_name:?} version <= {expected_version})")]
    Schema {
        name: String,
        version: u32,
        expected_name: &'static str,
        expected_version: u32,
    },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("API returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("Malformed response body: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_names_both_versions() {
        let err = StoreError::Schema {
            name: "transit-stations".into(),
            version: 3,
            expected_name: "transit-stations",
            expected_version: 1,
        };
        let text = err.to_string();
        assert!(text.contains("version 3"));
        assert!(text.contains("<= 1"));
    }

    #[test]
    fn status_error_display() {
        let err = FetchError::Status(reqwest::StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "API returned status 404 Not Found");
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: StoreError = io.into();
        assert!(matches!(err, StoreError::Io(_)));
    }
}
