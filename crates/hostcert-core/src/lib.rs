//! # hostcert-core
//!
//! TLS identity and host descriptor provisioning for docker-machine style
//! stores.
//!
//! ## Components
//!
//! - **CertificateAuthority**: one self-signed CA + client certificate per
//!   output root, created once and reused afterwards
//! - **ServerCertIssuer**: a fresh server certificate per run, bound to the
//!   machine's IP and/or DNS name
//! - **HostDescriptorBuilder**: the `config.json` record (identity, driver,
//!   auth paths, engine and swarm options)
//! - **DescriptorStore**: writes that record to `machines/<name>/config.json`
//!
//! ## Layout
//!
//! ```text
//! <out>/certs/{ca.pem, ca-key.pem, cert.pem, key.pem}
//! <out>/machines/<name>/{ca.pem, cert.pem, key.pem, id_rsa,
//!                        server.pem, server-key.pem, config.json}
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use hostcert_core::{ProvisionConfig, Provisioner};
//!
//! let config = ProvisionConfig {
//!     machine_name: "node1".into(),
//!     server_ip: Some("203.0.113.9".into()),
//!     ssh_key_path: "/home/me/.ssh/id_rsa".into(),
//!     ..ProvisionConfig::default()
//! };
//! let report = Provisioner::new(config)?.run()?;
//! println!("descriptor: {}", report.descriptor_path.display());
//! ```

pub mod authority;
pub mod config;
pub mod descriptor;
mod error;
pub mod files;
pub mod inspect;
pub mod keys;
pub mod layout;
pub mod policy;
pub mod provision;
pub mod san;
pub mod server;
pub mod store;
mod template;

pub use authority::{BootstrapOutcome, CertificateAuthority};
pub use config::ProvisionConfig;
pub use descriptor::{
    AuthOptions, EngineOptions, HostDescriptor, HostDescriptorBuilder, MachineSpec, SwarmOptions,
};
pub use error::{ErrorKind, HostcertError, Result};
pub use inspect::{verify_issued_by, CertificateSummary};
pub use keys::KeyAlgorithm;
pub use layout::OutputLayout;
pub use provision::{ProvisionReport, Provisioner};
pub use san::SubjectAltName;
pub use server::{IssuedCertificate, ServerCertIssuer};
pub use store::DescriptorStore;
