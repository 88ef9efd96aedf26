//! Server certificate issuance.
//!
//! Every call generates a new key and certificate and overwrites whatever is
//! at the target paths; there is no reuse across runs.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::authority::load_issuer;
use crate::error::Result;
use crate::files;
use crate::keys::KeyAlgorithm;
use crate::san::SubjectAltName;
use crate::template;

/// Signs server certificates with an existing CA.
#[derive(Debug, Clone)]
pub struct ServerCertIssuer {
    ca_cert_path: PathBuf,
    ca_key_path: PathBuf,
    key_algorithm: KeyAlgorithm,
}

/// Where an issued certificate ended up and what it is valid for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCertificate {
    /// Certificate PEM
    pub cert_path: PathBuf,
    /// Private key PEM
    pub key_path: PathBuf,
    /// SAN entries in the order they were embedded
    pub sans: Vec<SubjectAltName>,
}

impl ServerCertIssuer {
    /// Issuer backed by the CA at the given paths. The CA must already exist.
    pub fn new(ca_cert_path: impl Into<PathBuf>, ca_key_path: impl Into<PathBuf>) -> Self {
        Self {
            ca_cert_path: ca_cert_path.into(),
            ca_key_path: ca_key_path.into(),
            key_algorithm: KeyAlgorithm::default(),
        }
    }

    /// Key algorithm for the server key (RSA 2048 unless changed).
    #[must_use]
    pub fn key_algorithm(self, key_algorithm: KeyAlgorithm) -> Self {
        Self {
            key_algorithm,
            ..self
        }
    }

    /// Issue a certificate for `sans` and write it with its key.
    ///
    /// Input is validated before anything is read or written; all crypto
    /// finishes before the first write.
    pub fn issue<S: AsRef<str>>(
        &self,
        sans: &[S],
        organization: &str,
        cert_path: &Path,
        key_path: &Path,
    ) -> Result<IssuedCertificate> {
        let sans = SubjectAltName::normalize(sans)?;
        self.key_algorithm.validate()?;

        debug!(ca = %self.ca_cert_path.display(), "loading CA");
        let issuer = load_issuer(&self.ca_cert_path, &self.ca_key_path)?;

        let key = self.key_algorithm.generate()?;
        let cert = template::server_params(organization, &sans)?.signed_by(&key, &issuer)?;

        files::write_private(key_path, key.serialize_pem().as_bytes())?;
        files::write_public(cert_path, cert.pem().as_bytes())?;

        info!(
            path = %cert_path.display(),
            sans = %sans.iter().map(ToString::to_string).collect::<Vec<_>>().join(","),
            "server certificate issued"
        );

        Ok(IssuedCertificate {
            cert_path: cert_path.to_path_buf(),
            key_path: key_path.to_path_buf(),
            sans,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authority::CertificateAuthority;

    #[test]
    fn test_issue_without_ca_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let issuer = ServerCertIssuer::new(dir.path().join("ca.pem"), dir.path().join("ca-key.pem"))
            .key_algorithm(KeyAlgorithm::EcdsaP256);

        let err = issuer
            .issue(
                &["10.0.0.5"],
                "acme",
                &dir.path().join("server.pem"),
                &dir.path().join("server-key.pem"),
            )
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Io);
        assert!(!dir.path().join("server.pem").exists());
    }

    #[test]
    fn test_issue_reports_sans() {
        let dir = tempfile::tempdir().unwrap();
        let ca = CertificateAuthority::new(dir.path()).key_algorithm(KeyAlgorithm::EcdsaP256);
        ca.bootstrap().unwrap();

        let issued = ServerCertIssuer::new(&ca.paths().ca_cert, &ca.paths().ca_key)
            .key_algorithm(KeyAlgorithm::EcdsaP256)
            .issue(
                &["", "10.0.0.5", "host.example.com"],
                "acme",
                &dir.path().join("server.pem"),
                &dir.path().join("server-key.pem"),
            )
            .unwrap();

        assert_eq!(issued.sans.len(), 2);
        assert!(issued.sans[0].is_ip());
        assert!(issued.cert_path.exists());
        assert!(issued.key_path.exists());
    }
}
