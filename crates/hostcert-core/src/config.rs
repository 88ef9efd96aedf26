//! Provisioning configuration.
//!
//! Built once by the caller and handed to each component; nothing in the
//! core reads flags or environment variables on its own.

use std::net::IpAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{HostcertError, Result};
use crate::keys::KeyAlgorithm;
use crate::layout::OutputLayout;
use crate::policy;

/// Everything one provisioning run needs to know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionConfig {
    /// Output root holding `certs/` and `machines/`.
    pub out_dir: PathBuf,

    /// Machine name (directory under `machines/`).
    pub machine_name: String,

    /// Server IP address (optional if `server_dns` is set).
    pub server_ip: Option<String>,

    /// Server DNS name (optional if `server_ip` is set).
    pub server_dns: Option<String>,

    /// SSH private key to copy into the machine directory.
    pub ssh_key_path: PathBuf,

    /// SSH user recorded in the descriptor.
    #[serde(default = "default_ssh_user")]
    pub ssh_user: String,

    /// SSH port recorded in the descriptor.
    #[serde(default = "default_ssh_port")]
    pub ssh_port: u16,

    /// Algorithm for every generated key.
    #[serde(default)]
    pub key_algorithm: KeyAlgorithm,

    /// Organization for the CA and client subjects.
    #[serde(default = "default_organization")]
    pub organization: String,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("out"),
            machine_name: String::new(),
            server_ip: None,
            server_dns: None,
            ssh_key_path: PathBuf::new(),
            ssh_user: default_ssh_user(),
            ssh_port: default_ssh_port(),
            key_algorithm: KeyAlgorithm::default(),
            organization: default_organization(),
        }
    }
}

impl ProvisionConfig {
    /// Check required fields and formats.
    pub fn validate(&self) -> Result<()> {
        let name = self.machine_name.trim();
        if name.is_empty() {
            return Err(HostcertError::validation("machine name must be set"));
        }
        if name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(HostcertError::validation(format!(
                "machine name {name:?} must not contain path separators"
            )));
        }

        let ip = non_empty(self.server_ip.as_deref());
        let dns = non_empty(self.server_dns.as_deref());
        if ip.is_none() && dns.is_none() {
            return Err(HostcertError::validation(
                "server IP or server DNS name must be set",
            ));
        }
        if let Some(ip) = ip {
            ip.parse::<IpAddr>().map_err(|_| {
                HostcertError::validation(format!("server IP {ip:?} is not an IP address"))
            })?;
        }

        if self.ssh_key_path.as_os_str().is_empty() {
            return Err(HostcertError::validation("SSH key path must be set"));
        }
        if self.ssh_user.trim().is_empty() {
            return Err(HostcertError::validation("SSH user must not be empty"));
        }
        if self.ssh_port == 0 {
            return Err(HostcertError::validation("SSH port must not be 0"));
        }
        self.key_algorithm.validate()
    }

    /// Resolve the output root and SSH key path against `cwd`.
    #[must_use]
    pub fn absolute_against(self, cwd: &Path) -> Self {
        Self {
            out_dir: absolute(cwd, self.out_dir),
            ssh_key_path: absolute(cwd, self.ssh_key_path),
            ..self
        }
    }

    /// Resolve relative paths against the process working directory.
    pub fn into_absolute(self) -> Result<Self> {
        let cwd = std::env::current_dir().map_err(|e| HostcertError::io(".", e))?;
        Ok(self.absolute_against(&cwd))
    }

    /// SAN entries for the server certificate: IP first, then DNS.
    pub fn san_list(&self) -> Vec<String> {
        [self.server_ip.as_deref(), self.server_dns.as_deref()]
            .into_iter()
            .filter_map(non_empty)
            .map(str::to_string)
            .collect()
    }

    /// Address recorded as the driver's `IPAddress`: the IP if set, the DNS
    /// name otherwise.
    pub fn advertised_address(&self) -> Option<&str> {
        non_empty(self.server_ip.as_deref()).or_else(|| non_empty(self.server_dns.as_deref()))
    }

    /// Organization embedded in the server certificate: the DNS name if set.
    pub fn server_organization(&self) -> &str {
        non_empty(self.server_dns.as_deref()).unwrap_or(&self.organization)
    }

    /// Layout of the output root.
    pub fn layout(&self) -> OutputLayout {
        OutputLayout::new(&self.out_dir)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn absolute(cwd: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}

fn default_ssh_user() -> String {
    policy::DEFAULT_SSH_USER.to_string()
}

const fn default_ssh_port() -> u16 {
    policy::DEFAULT_SSH_PORT
}

fn default_organization() -> String {
    policy::DEFAULT_ORGANIZATION.to_string()
}
