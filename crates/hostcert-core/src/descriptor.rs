//! Host descriptor (`config.json`) types and builder.
//!
//! Field names follow docker-machine's on-disk schema so the machine can be
//! driven by any tool that reads a docker-machine store.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{HostcertError, Result};
use crate::policy;

/// A provisioned machine as docker-machine stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HostDescriptor {
    /// Schema version of this record
    pub config_version: u32,
    /// Driver parameters
    pub driver: GenericDriver,
    /// Name of the driver that produced `driver`
    pub driver_name: String,
    /// Auth, engine and swarm options
    pub host_options: HostOptions,
    /// Machine name
    pub name: String,
}

/// Parameters of the `generic` driver (an existing host reachable over SSH).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GenericDriver {
    /// Fields shared by every driver
    #[serde(flatten)]
    pub base: BaseDriver,
    /// Engine TLS port
    pub engine_port: u16,
    /// Machine-local copy of the SSH key
    #[serde(rename = "SSHKey")]
    pub ssh_key: PathBuf,
}

/// Fields shared by every docker-machine driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BaseDriver {
    #[serde(rename = "IPAddress")]
    pub ip_address: String,
    pub machine_name: String,
    #[serde(rename = "SSHUser")]
    pub ssh_user: String,
    #[serde(rename = "SSHPort")]
    pub ssh_port: u16,
    #[serde(rename = "SSHKeyPath")]
    pub ssh_key_path: PathBuf,
    pub store_path: PathBuf,
    #[serde(default)]
    pub swarm_master: bool,
    #[serde(default)]
    pub swarm_host: String,
    #[serde(default)]
    pub swarm_discovery: String,
}

/// Everything under `HostOptions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HostOptions {
    #[serde(default)]
    pub driver: String,
    #[serde(default)]
    pub memory: u64,
    #[serde(default)]
    pub disk: u64,
    pub engine_options: EngineOptions,
    pub swarm_options: SwarmOptions,
    pub auth_options: AuthOptions,
}

/// Paths to the TLS material used to talk to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthOptions {
    pub cert_dir: PathBuf,
    pub ca_cert_path: PathBuf,
    pub ca_private_key_path: PathBuf,
    #[serde(default)]
    pub ca_cert_remote_path: String,
    pub server_cert_path: PathBuf,
    pub server_key_path: PathBuf,
    pub client_key_path: PathBuf,
    #[serde(default)]
    pub server_cert_remote_path: String,
    #[serde(default)]
    pub server_key_remote_path: String,
    pub client_cert_path: PathBuf,
    #[serde(rename = "ServerCertSANs", default)]
    pub server_cert_sans: Option<Vec<String>>,
    pub store_path: PathBuf,
}

/// Docker engine options. Opaque to us apart from the policy defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EngineOptions {
    #[serde(default)]
    pub arbitrary_flags: Option<Vec<String>>,
    #[serde(default)]
    pub dns: Option<Vec<String>>,
    #[serde(default)]
    pub graph_dir: String,
    #[serde(default)]
    pub env: Option<Vec<String>>,
    #[serde(default)]
    pub ipv6: bool,
    #[serde(default)]
    pub insecure_registry: Option<Vec<String>>,
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    #[serde(default)]
    pub log_level: String,
    #[serde(default)]
    pub storage_driver: String,
    #[serde(default)]
    pub selinux_enabled: bool,
    pub tls_verify: bool,
    #[serde(default)]
    pub registry_mirror: Option<Vec<String>>,
    #[serde(rename = "InstallURL")]
    pub install_url: String,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            arbitrary_flags: None,
            dns: None,
            graph_dir: String::new(),
            env: None,
            ipv6: false,
            insecure_registry: None,
            labels: None,
            log_level: String::new(),
            storage_driver: String::new(),
            selinux_enabled: false,
            tls_verify: policy::ENGINE_TLS_VERIFY,
            registry_mirror: None,
            install_url: policy::ENGINE_INSTALL_URL.to_string(),
        }
    }
}

/// Swarm options. Opaque to us apart from the policy defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SwarmOptions {
    #[serde(default)]
    pub is_swarm: bool,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub discovery: String,
    #[serde(default)]
    pub agent: bool,
    #[serde(default)]
    pub master: bool,
    pub host: String,
    pub image: String,
    pub strategy: String,
    #[serde(default)]
    pub heartbeat: u64,
    #[serde(default)]
    pub overcommit: f64,
    #[serde(default)]
    pub arbitrary_flags: Option<Vec<String>>,
    #[serde(default)]
    pub arbitrary_join_flags: Option<Vec<String>>,
    #[serde(default)]
    pub env: Option<Vec<String>>,
    #[serde(default)]
    pub is_experimental: bool,
}

impl Default for SwarmOptions {
    fn default() -> Self {
        Self {
            is_swarm: false,
            address: String::new(),
            discovery: String::new(),
            agent: false,
            master: false,
            host: policy::SWARM_HOST.to_string(),
            image: policy::SWARM_IMAGE.to_string(),
            strategy: policy::SWARM_STRATEGY.to_string(),
            heartbeat: 0,
            overcommit: 0.0,
            arbitrary_flags: None,
            arbitrary_join_flags: None,
            env: None,
            is_experimental: false,
        }
    }
}

/// Identity and SSH access of the machine being described.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineSpec {
    /// Machine name (also the directory name under `machines/`)
    pub name: String,
    /// `machines/<name>/`
    pub store_path: PathBuf,
    /// Address clients use to reach the engine
    pub ip_address: String,
    /// SSH login user
    pub ssh_user: String,
    /// Caller-supplied SSH private key
    pub ssh_key_path: PathBuf,
    /// SSH port
    pub ssh_port: u16,
    /// Copy of the SSH key inside the machine directory
    pub local_ssh_key: PathBuf,
}

/// Assembles a [`HostDescriptor`] from already-resolved inputs. Does no I/O
/// and no path normalization.
#[derive(Debug, Clone)]
pub struct HostDescriptorBuilder {
    machine: MachineSpec,
    auth: AuthOptions,
    engine: EngineOptions,
    swarm: SwarmOptions,
}

impl HostDescriptorBuilder {
    /// Start from the policy defaults for engine and swarm options.
    pub fn new(machine: MachineSpec, auth: AuthOptions) -> Self {
        Self {
            machine,
            auth,
            engine: EngineOptions::default(),
            swarm: SwarmOptions::default(),
        }
    }

    /// Replace the engine options block.
    #[must_use]
    pub fn engine_options(self, engine: EngineOptions) -> Self {
        Self { engine, ..self }
    }

    /// Replace the swarm options block.
    #[must_use]
    pub fn swarm_options(self, swarm: SwarmOptions) -> Self {
        Self { swarm, ..self }
    }

    /// Validate required fields and produce the descriptor.
    pub fn build(self) -> Result<HostDescriptor> {
        let machine = self.machine;
        if machine.name.trim().is_empty() {
            return Err(HostcertError::validation("machine name must not be empty"));
        }
        if machine.ip_address.trim().is_empty() {
            return Err(HostcertError::validation("IP address must not be empty"));
        }
        if machine.ssh_user.trim().is_empty() {
            return Err(HostcertError::validation("SSH user must not be empty"));
        }
        if machine.ssh_port == 0 {
            return Err(HostcertError::validation("SSH port must not be 0"));
        }

        Ok(HostDescriptor {
            config_version: policy::CONFIG_VERSION,
            driver: GenericDriver {
                base: BaseDriver {
                    ip_address: machine.ip_address,
                    machine_name: machine.name.clone(),
                    ssh_user: machine.ssh_user,
                    ssh_port: machine.ssh_port,
                    ssh_key_path: machine.ssh_key_path,
                    store_path: machine.store_path,
                    swarm_master: false,
                    swarm_host: String::new(),
                    swarm_discovery: String::new(),
                },
                engine_port: policy::ENGINE_PORT,
                ssh_key: machine.local_ssh_key,
            },
            driver_name: policy::DRIVER_NAME.to_string(),
            host_options: HostOptions {
                driver: String::new(),
                memory: 0,
                disk: 0,
                engine_options: self.engine,
                swarm_options: self.swarm,
                auth_options: self.auth,
            },
            name: machine.name,
        })
    }
}
