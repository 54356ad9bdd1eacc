//! Error types for the observability layer

pub type Result<T> = std::result::Result<T, ObserveError>;

#[derive(Debug, thiserror::Error)]
pub enum ObserveError {
    /// Instrumentation phase outside of before (0) / after (1)
    #[error("invalid when={value} during {channel} {message}")]
    InvalidWhen {
        value: i64,
        channel: String,
        message: String,
    },

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Encoding name not supported by file sinks
    #[error("Unknown encoding '{encoding}' for '{path}'")]
    UnknownEncoding { encoding: String, path: String },

    /// Character that cannot be represented in the sink's encoding
    #[error("'{encoding}' codec can't encode character {character:?}")]
    Encode { encoding: String, character: char },

    /// Syslog endpoint could not be resolved
    #[error("Syslog address '{address}' could not be resolved: {message}")]
    SyslogAddress { address: String, message: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl ObserveError {
    /// Create an invalid instrumentation phase error
    pub fn invalid_when(value: i64, channel: impl Into<String>, message: impl Into<String>) -> Self {
        ObserveError::InvalidWhen {
            value,
            channel: channel.into(),
            message: message.into(),
        }
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        ObserveError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an unknown encoding error
    pub fn unknown_encoding(encoding: impl Into<String>, path: impl Into<String>) -> Self {
        ObserveError::UnknownEncoding {
            encoding: encoding.into(),
            path: path.into(),
        }
    }

    /// Create an encode error
    pub fn encode(encoding: impl Into<String>, character: char) -> Self {
        ObserveError::Encode {
            encoding: encoding.into(),
            character,
        }
    }

    /// Create a syslog address error
    pub fn syslog_address(address: impl Into<String>, message: impl Into<String>) -> Self {
        ObserveError::SyslogAddress {
            address: address.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        ObserveError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_when_names_channel_and_message() {
        let err = ObserveError::invalid_when(99, "global.app", "loading");
        assert!(matches!(err, ObserveError::InvalidWhen { value: 99, .. }));
        assert_eq!(err.to_string(), "invalid when=99 during global.app loading");
    }

    #[test]
    fn test_error_display() {
        let err = ObserveError::unknown_encoding("klingon", "/var/log/app.log");
        assert_eq!(
            err.to_string(),
            "Unknown encoding 'klingon' for '/var/log/app.log'"
        );

        let err = ObserveError::encode("ascii", 'é');
        assert_eq!(err.to_string(), "'ascii' codec can't encode character 'é'");
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = ObserveError::io_operation("opening log file", "cannot open app.log", io_err);

        assert!(matches!(err, ObserveError::IoOperation { .. }));
        assert!(err.to_string().contains("opening log file"));
        assert!(err.to_string().contains("cannot open app.log"));
    }
}
