//! Certificate Authority bootstrap.
//!
//! Creates the shared CA and client certificate under `certs/` exactly once
//! per output root. Later runs find the CA certificate and leave everything
//! untouched, so client certificates already handed out stay valid.

use std::path::{Path, PathBuf};

use rcgen::{Issuer, KeyPair};
use tracing::{debug, info};

use crate::error::{HostcertError, Result};
use crate::files::{self, BootstrapLock};
use crate::keys::KeyAlgorithm;
use crate::layout::CaPaths;
use crate::policy::{CA_COMMON_NAME, CLIENT_COMMON_NAME, DEFAULT_ORGANIZATION};
use crate::template;

/// Lock file guarding a first-time bootstrap.
pub const BOOTSTRAP_LOCK_FILE: &str = ".bootstrap.lock";

/// Result of a successful bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// The CA certificate already existed; nothing was written.
    AlreadyPresent,
    /// CA and client material were generated and written.
    Created,
}

/// Bootstraps the self-signed CA and the client certificate it signs.
#[derive(Debug, Clone)]
pub struct CertificateAuthority {
    certs_dir: PathBuf,
    paths: CaPaths,
    key_algorithm: KeyAlgorithm,
    organization: String,
}

impl CertificateAuthority {
    /// CA rooted at `certs_dir` with the default key algorithm.
    pub fn new(certs_dir: impl Into<PathBuf>) -> Self {
        let certs_dir = certs_dir.into();
        Self {
            paths: CaPaths::in_dir(&certs_dir),
            certs_dir,
            key_algorithm: KeyAlgorithm::default(),
            organization: DEFAULT_ORGANIZATION.to_string(),
        }
    }

    /// Key algorithm for the CA and client keys.
    #[must_use]
    pub fn key_algorithm(self, key_algorithm: KeyAlgorithm) -> Self {
        Self {
            key_algorithm,
            ..self
        }
    }

    /// Organization written into both subjects.
    #[must_use]
    pub fn organization(self, organization: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            ..self
        }
    }

    /// Where the four artifacts live.
    pub fn paths(&self) -> &CaPaths {
        &self.paths
    }

    /// True once the CA certificate exists.
    pub fn is_bootstrapped(&self) -> bool {
        self.paths.ca_cert.exists()
    }

    /// Create the CA and client material unless the CA certificate exists.
    ///
    /// The CA certificate is written last: if any earlier step fails, the
    /// next run will still see an un-bootstrapped root and try again.
    pub fn bootstrap(&self) -> Result<BootstrapOutcome> {
        if self.is_bootstrapped() {
            info!(path = %self.paths.ca_cert.display(), "CA certificate found, skipping bootstrap");
            return Ok(BootstrapOutcome::AlreadyPresent);
        }

        files::ensure_dir(&self.certs_dir)?;
        let _lock = BootstrapLock::acquire(self.certs_dir.join(BOOTSTRAP_LOCK_FILE))?;

        // Someone may have finished a bootstrap between our check and the lock.
        if self.is_bootstrapped() {
            info!(path = %self.paths.ca_cert.display(), "CA created concurrently, skipping bootstrap");
            return Ok(BootstrapOutcome::AlreadyPresent);
        }

        debug!(algorithm = %self.key_algorithm, "generating CA key");
        let ca_key = self.key_algorithm.generate()?;
        let ca_key_pem = ca_key.serialize_pem();
        let ca_params = template::ca_params(&self.organization, CA_COMMON_NAME);
        let ca_cert = ca_params.self_signed(&ca_key)?;
        let issuer = Issuer::new(ca_params, ca_key);

        debug!("generating client certificate");
        let client_key = self.key_algorithm.generate()?;
        let client_cert = template::client_params(&self.organization, CLIENT_COMMON_NAME)
            .signed_by(&client_key, &issuer)?;

        files::write_private(&self.paths.ca_key, ca_key_pem.as_bytes())?;
        files::write_private(&self.paths.client_key, client_key.serialize_pem().as_bytes())?;
        files::write_public(&self.paths.client_cert, client_cert.pem().as_bytes())?;
        files::write_public(&self.paths.ca_cert, ca_cert.pem().as_bytes())?;

        info!(dir = %self.certs_dir.display(), "CA and client certificates created");
        Ok(BootstrapOutcome::Created)
    }
}

/// Load an existing CA as a signer.
pub(crate) fn load_issuer(ca_cert_path: &Path, ca_key_path: &Path) -> Result<Issuer<'static, KeyPair>> {
    let cert_pem = std::fs::read_to_string(ca_cert_path)
        .map_err(|e| HostcertError::io(ca_cert_path, e))?;
    let key_pem = std::fs::read_to_string(ca_key_path)
        .map_err(|e| HostcertError::io(ca_key_path, e))?;
    let key = KeyPair::from_pem(&key_pem)?;
    Ok(Issuer::from_ca_cert_pem(&cert_pem, key)?)
}
