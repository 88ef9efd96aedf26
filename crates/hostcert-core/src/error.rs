use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for hostcert operations
pub type Result<T> = std::result::Result<T, HostcertError>;

/// Errors that can occur while provisioning a machine
#[derive(Error, Debug)]
pub enum HostcertError {
    /// Filesystem read/write/permission failure
    #[error("io error at {}: {source}", path.display())]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// Another process holds the CA bootstrap lock
    #[error("CA bootstrap already in progress (lock file {} exists)", path.display())]
    BootstrapLocked {
        /// Path of the lock file
        path: PathBuf,
    },

    /// Certificate building or signing failed
    #[error("certificate error: {0}")]
    Crypto(#[from] rcgen::Error),

    /// Private key generation or encoding failed
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// A PEM certificate on disk could not be decoded
    #[error("failed to parse certificate {}: {reason}", path.display())]
    CertificateParse {
        /// Certificate file
        path: PathBuf,
        /// Parser message
        reason: String,
    },

    /// Malformed or missing required input
    #[error("invalid input: {0}")]
    Validation(String),

    /// Host descriptor encoding/decoding failed
    #[error("descriptor serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Filesystem failures, including a held bootstrap lock
    Io,
    /// Key generation, signing, or certificate decoding failures
    Crypto,
    /// Rejected input
    Validation,
    /// Descriptor encoding failures
    Serialization,
}

impl HostcertError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Shorthand for a validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Which taxonomy bucket this error falls into
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } | Self::BootstrapLocked { .. } => ErrorKind::Io,
            Self::Crypto(_) | Self::KeyGeneration(_) | Self::CertificateParse { .. } => {
                ErrorKind::Crypto
            }
            Self::Validation(_) => ErrorKind::Validation,
            Self::Serialization(_) => ErrorKind::Serialization,
        }
    }

    /// Returns true if the error was caused by rejected input
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let io = HostcertError::io("/tmp/x", std::io::Error::other("boom"));
        assert_eq!(io.kind(), ErrorKind::Io);
        assert!(io.to_string().contains("/tmp/x"));

        let locked = HostcertError::BootstrapLocked {
            path: PathBuf::from("/out/certs/.bootstrap.lock"),
        };
        assert_eq!(locked.kind(), ErrorKind::Io);

        let invalid = HostcertError::validation("no SAN entries");
        assert_eq!(invalid.kind(), ErrorKind::Validation);
        assert!(invalid.is_validation());

        let keygen = HostcertError::KeyGeneration("rng".into());
        assert_eq!(keygen.kind(), ErrorKind::Crypto);
    }
}
