///
/// Error types for the osd platform layer.
///
/// Timeouts and unsupported capabilities are not errors; they are reported
/// through plain return values. What remains is creation failure, misuse
/// that would be undefined behaviour in a native layer, and host I/O.
///

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OsdError {
    #[error("Failed to create thread: {0}")]
    ThreadCreation(#[source] std::io::Error),

    #[error("Thread '{name}' panicked before returning")]
    ThreadPanicked { name: String },

    #[error("Contract violation: {0}")]
    ContractViolation(String),

    #[error("Invalid environment variable '{name}': {reason}")]
    InvalidEnv { name: String, reason: String },

    #[error("Failed to parse config at {path}: {reason}")]
    ConfigParse { path: PathBuf, reason: String },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl OsdError {
    pub fn contract(message: impl Into<String>) -> Self {
        OsdError::ContractViolation(message.into())
    }

    pub fn is_contract_violation(&self) -> bool {
        matches!(self, OsdError::ContractViolation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = OsdError::ThreadCreation(std::io::Error::other("no more threads"));
        assert!(err.to_string().contains("Failed to create thread"));
        assert!(err.to_string().contains("no more threads"));

        let err = OsdError::ThreadPanicked {
            name: "audio".to_string(),
        };
        assert!(err.to_string().contains("audio"));
        assert!(err.to_string().contains("panicked"));

        let err = OsdError::contract("release without holding");
        assert!(err.is_contract_violation());
        assert!(err.to_string().contains("Contract violation"));
        assert!(err.to_string().contains("release without holding"));

        let err = OsdError::InvalidEnv {
            name: "A=B".to_string(),
            reason: "name contains '='".to_string(),
        };
        assert!(err.to_string().contains("A=B"));
        assert!(err.to_string().contains("contains '='"));

        let err = OsdError::ConfigParse {
            path: PathBuf::from("/tmp/osd.toml"),
            reason: "expected a table".to_string(),
        };
        assert!(err.to_string().contains("/tmp/osd.toml"));
        assert!(err.to_string().contains("expected a table"));
        assert!(!err.is_contract_violation());
    }

    #[test]
    fn test_io_error_converts() {
        fn open_missing() -> Result<(), OsdError> {
            std::fs::read("/definitely/not/here/osd")?;
            Ok(())
        }
        assert!(matches!(open_missing(), Err(OsdError::Io(_))));
    }
}
