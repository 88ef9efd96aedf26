//! End-to-end provisioning of one machine.
//!
//! Runs the steps strictly in order and stops at the first error:
//!
//! ```text
//! bootstrap CA ─► machines/<name>/ ─► copy ca/cert/key + ssh key
//!              ─► issue server cert ─► build descriptor ─► save config.json
//! ```

use std::path::PathBuf;

use tracing::info;

use crate::authority::{BootstrapOutcome, CertificateAuthority};
use crate::config::ProvisionConfig;
use crate::descriptor::{HostDescriptorBuilder, MachineSpec};
use crate::error::{HostcertError, Result};
use crate::files;
use crate::layout::{
    CA_CERT_FILE, CA_KEY_FILE, CLIENT_CERT_FILE, CLIENT_KEY_FILE, SERVER_CERT_FILE,
    SERVER_KEY_FILE, SSH_KEY_FILE,
};
use crate::server::{IssuedCertificate, ServerCertIssuer};
use crate::store::DescriptorStore;

/// What a provisioning run produced.
#[derive(Debug, Clone)]
pub struct ProvisionReport {
    /// Whether the CA was created by this run
    pub bootstrap: BootstrapOutcome,
    /// The server certificate
    pub server: IssuedCertificate,
    /// `machines/<name>/config.json`
    pub descriptor_path: PathBuf,
}

/// Drives one provisioning run from an immutable config.
#[derive(Debug, Clone)]
pub struct Provisioner {
    config: ProvisionConfig,
}

impl Provisioner {
    /// Validates `config` and makes its paths absolute.
    pub fn new(config: ProvisionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: config.into_absolute()?,
        })
    }

    /// Like [`Provisioner::new`] but for a config whose paths are already
    /// absolute.
    pub fn from_absolute(config: ProvisionConfig) -> Result<Self> {
        config.validate()?;
        if !config.out_dir.is_absolute() || !config.ssh_key_path.is_absolute() {
            return Err(HostcertError::validation(
                "output directory and SSH key path must be absolute",
            ));
        }
        Ok(Self { config })
    }

    /// The resolved configuration.
    pub fn config(&self) -> &ProvisionConfig {
        &self.config
    }

    /// Run every step.
    pub fn run(&self) -> Result<ProvisionReport> {
        let config = &self.config;
        let layout = config.layout();
        let machine = config.machine_name.trim();
        info!(machine, out_dir = %config.out_dir.display(), "provisioning machine");

        let bootstrap = CertificateAuthority::new(layout.certs_dir())
            .key_algorithm(config.key_algorithm)
            .organization(config.organization.clone())
            .bootstrap()?;

        let machine_dir = layout.machine_dir(machine);
        files::ensure_dir(&machine_dir)?;

        files::copy_file(
            &layout.certs_file(CA_CERT_FILE),
            &layout.machine_file(machine, CA_CERT_FILE),
        )?;
        files::copy_file(
            &layout.certs_file(CLIENT_CERT_FILE),
            &layout.machine_file(machine, CLIENT_CERT_FILE),
        )?;
        files::copy_private(
            &layout.certs_file(CLIENT_KEY_FILE),
            &layout.machine_file(machine, CLIENT_KEY_FILE),
        )?;
        let local_ssh_key = layout.machine_file(machine, SSH_KEY_FILE);
        files::copy_private(&config.ssh_key_path, &local_ssh_key)?;

        let server = ServerCertIssuer::new(
            layout.machine_file(machine, CA_CERT_FILE),
            layout.certs_file(CA_KEY_FILE),
        )
        .key_algorithm(config.key_algorithm)
        .issue(
            &config.san_list(),
            config.server_organization(),
            &layout.machine_file(machine, SERVER_CERT_FILE),
            &layout.machine_file(machine, SERVER_KEY_FILE),
        )?;

        let address = config
            .advertised_address()
            .ok_or_else(|| HostcertError::validation("server IP or server DNS name must be set"))?;
        let host = HostDescriptorBuilder::new(
            MachineSpec {
                name: machine.to_string(),
                store_path: machine_dir,
                ip_address: address.to_string(),
                ssh_user: config.ssh_user.clone(),
                ssh_key_path: config.ssh_key_path.clone(),
                ssh_port: config.ssh_port,
                local_ssh_key,
            },
            layout.auth_options(machine),
        )
        .build()?;

        let descriptor_path = DescriptorStore::new(layout.root()).save(&host)?;

        Ok(ProvisionReport {
            bootstrap,
            server,
            descriptor_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_config() {
        let err = Provisioner::new(ProvisionConfig::default()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_from_absolute_rejects_relative_paths() {
        let config = ProvisionConfig {
            machine_name: "node1".into(),
            server_ip: Some("10.0.0.5".into()),
            ssh_key_path: PathBuf::from("id_rsa"),
            ..ProvisionConfig::default()
        };
        assert!(Provisioner::from_absolute(config).unwrap_err().is_validation());
    }

    #[test]
    fn test_new_makes_paths_absolute() {
        let config = ProvisionConfig {
            machine_name: "node1".into(),
            server_ip: Some("10.0.0.5".into()),
            ssh_key_path: PathBuf::from("id_rsa"),
            ..ProvisionConfig::default()
        };
        let provisioner = Provisioner::new(config).unwrap();
        assert!(provisioner.config().out_dir.is_absolute());
        assert!(provisioner.config().ssh_key_path.is_absolute());
    }
}
