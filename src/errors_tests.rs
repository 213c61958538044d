//! Unit tests for error handling
//!
//! Tests error types, conversions, and error message formatting.

#[cfg(test)]
mod tests {
    use std::io;

    use crate::errors::AllycatError;

    // ====== Error Type Tests ======

    #[test]
    fn test_custom_error() {
        let error = AllycatError::Custom("Test error message".to_string());
        assert_eq!(format!("{error}"), "Test error message");
    }

    #[test]
    fn test_config_error() {
        let error = AllycatError::ConfigError("CHUNK_SIZE must be positive".to_string());
        assert!(matches!(error, AllycatError::ConfigError(_)));
        assert!(format!("{error}").contains("Configuration"));
    }

    #[test]
    fn test_graph_error_display() {
        let error = AllycatError::GraphError("Neo.ClientError.Security.Unauthorized".to_string());
        assert_eq!(
            format!("{error}"),
            "Graph database error: Neo.ClientError.Security.Unauthorized"
        );
    }

    #[test]
    fn test_llm_error() {
        let error = AllycatError::LlmError("model not found".to_string());
        assert!(matches!(error, AllycatError::LlmError(_)));
    }

    // ====== Error Conversion Tests ======

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let err: AllycatError = io_err.into();
        assert!(matches!(err, AllycatError::Io(_)));
    }

    #[test]
    fn test_error_from_parse_int() {
        let parse_err = "not a number".parse::<i64>().unwrap_err();
        let err: AllycatError = parse_err.into();
        assert!(matches!(err, AllycatError::ParseError(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{broken").unwrap_err();
        let err: AllycatError = json_err.into();
        assert!(matches!(err, AllycatError::Serialization(_)));
    }

    #[test]
    fn test_error_from_url() {
        let url_err = url::Url::parse("not a url").unwrap_err();
        let err: AllycatError = url_err.into();
        assert!(matches!(err, AllycatError::UrlParse(_)));
    }
}
