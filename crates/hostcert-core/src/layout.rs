//! Paths under an output root.
//!
//! ```text
//! <root>/certs/                 shared CA + client material
//! <root>/machines/<name>/       per-machine server material + descriptor
//! ```

use std::path::{Path, PathBuf};

use crate::descriptor::AuthOptions;

/// CA certificate.
pub const CA_CERT_FILE: &str = "ca.pem";
/// CA private key.
pub const CA_KEY_FILE: &str = "ca-key.pem";
/// Client certificate.
pub const CLIENT_CERT_FILE: &str = "cert.pem";
/// Client private key.
pub const CLIENT_KEY_FILE: &str = "key.pem";
/// Server certificate.
pub const SERVER_CERT_FILE: &str = "server.pem";
/// Server private key.
pub const SERVER_KEY_FILE: &str = "server-key.pem";
/// Machine-local copy of the SSH private key.
pub const SSH_KEY_FILE: &str = "id_rsa";
/// Host descriptor.
pub const DESCRIPTOR_FILE: &str = "config.json";

const CERTS_DIR: &str = "certs";
const MACHINES_DIR: &str = "machines";

/// Directory layout rooted at an output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    /// Create a layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The output root itself.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Shared `certs/` directory.
    pub fn certs_dir(&self) -> PathBuf {
        self.root.join(CERTS_DIR)
    }

    /// A file inside `certs/`.
    pub fn certs_file(&self, name: &str) -> PathBuf {
        self.certs_dir().join(name)
    }

    /// `machines/` directory holding every machine tree.
    pub fn machines_dir(&self) -> PathBuf {
        self.root.join(MACHINES_DIR)
    }

    /// `machines/<machine>/`.
    pub fn machine_dir(&self, machine: &str) -> PathBuf {
        self.machines_dir().join(machine)
    }

    /// A file inside `machines/<machine>/`.
    pub fn machine_file(&self, machine: &str, name: &str) -> PathBuf {
        self.machine_dir(machine).join(name)
    }

    /// Paths of the shared CA and client material.
    pub fn ca_paths(&self) -> CaPaths {
        CaPaths::in_dir(self.certs_dir())
    }

    /// Authentication section of the descriptor for `machine`.
    ///
    /// CA and client paths point into the shared `certs/` tree, server paths
    /// into the machine tree.
    pub fn auth_options(&self, machine: &str) -> AuthOptions {
        let shared = self.ca_paths();
        AuthOptions {
            cert_dir: self.certs_dir(),
            ca_cert_path: shared.ca_cert,
            ca_private_key_path: shared.ca_key,
            ca_cert_remote_path: String::new(),
            server_cert_path: self.machine_file(machine, SERVER_CERT_FILE),
            server_key_path: self.machine_file(machine, SERVER_KEY_FILE),
            client_key_path: shared.client_key,
            server_cert_remote_path: String::new(),
            server_key_remote_path: String::new(),
            client_cert_path: shared.client_cert,
            server_cert_sans: None,
            store_path: self.machine_dir(machine),
        }
    }
}

/// The four files produced by a CA bootstrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaPaths {
    /// CA certificate (also the bootstrap sentinel)
    pub ca_cert: PathBuf,
    /// CA private key
    pub ca_key: PathBuf,
    /// Client certificate
    pub client_cert: PathBuf,
    /// Client private key
    pub client_key: PathBuf,
}

impl CaPaths {
    /// Standard file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            ca_cert: dir.join(CA_CERT_FILE),
            ca_key: dir.join(CA_KEY_FILE),
            client_cert: dir.join(CLIENT_CERT_FILE),
            client_key: dir.join(CLIENT_KEY_FILE),
        }
    }
}
