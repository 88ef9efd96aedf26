//! Hard-coded provisioning policy.
//!
//! Every default that ends up in a certificate or in `config.json` lives
//! here so it can be audited (and overridden) in one place.

/// Schema version written to `ConfigVersion` (docker-machine's current version).
pub const CONFIG_VERSION: u32 = 3;

/// Driver name for machines provisioned out-of-band.
pub const DRIVER_NAME: &str = "generic";

/// Port the docker engine listens on for TLS connections.
pub const ENGINE_PORT: u16 = 2376;

/// Where the engine gets installed from.
pub const ENGINE_INSTALL_URL: &str = "https://get.docker.com";

/// Engine TLS verification.
pub const ENGINE_TLS_VERIFY: bool = true;

/// Swarm manager listen endpoint.
pub const SWARM_HOST: &str = "tcp://0.0.0.0:3376";

/// Swarm image reference.
pub const SWARM_IMAGE: &str = "swarm:latest";

/// Swarm placement strategy.
pub const SWARM_STRATEGY: &str = "spread";

/// Default SSH user recorded in the descriptor.
pub const DEFAULT_SSH_USER: &str = "root";

/// Default SSH port recorded in the descriptor.
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Default RSA modulus size.
pub const DEFAULT_RSA_BITS: u32 = 2048;

/// Smallest RSA modulus we will generate.
pub const MIN_RSA_BITS: u32 = 2048;

/// Largest RSA modulus rcgen's ring backend will load.
pub const MAX_RSA_BITS: u32 = 4096;

/// Organization used when none is configured.
pub const DEFAULT_ORGANIZATION: &str = "hostcert";

/// Common name of the bootstrap CA.
pub const CA_COMMON_NAME: &str = "hostcert CA";

/// Common name of the shared client certificate.
pub const CLIENT_COMMON_NAME: &str = "hostcert client";

/// CA validity: 10 years.
pub const CA_VALIDITY_DAYS: i64 = 10 * 365;

/// Leaf validity (client and server), same as docker-machine.
pub const LEAF_VALIDITY_DAYS: i64 = 1080;
