//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use hostcert_core::KeyAlgorithm;
use std::path::PathBuf;

/// Provision docker-machine TLS material and host descriptors
///
/// Creates a CA on first use, issues a server certificate for the machine
/// and writes machines/<name>/config.json in docker-machine's format.
#[derive(Parser, Debug)]
#[command(name = "hostcert")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Bootstrap the CA, issue a server certificate and write config.json
    Provision(ProvisionArgs),

    /// Show a machine's certificates and check them against the CA
    Inspect(InspectArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),
}

// ============================================================================
// Provision command
// ============================================================================

#[derive(Args, Debug)]
pub struct ProvisionArgs {
    /// Machine name (directory under machines/)
    #[arg(short = 'n', long)]
    pub machine_name: String,

    /// SSH private key copied into the machine directory
    #[arg(short = 'k', long)]
    pub ssh_key_path: PathBuf,

    /// Server IP address
    #[arg(long, required_unless_present = "server_dns")]
    pub server_ip: Option<String>,

    /// Server DNS name
    #[arg(long)]
    pub server_dns: Option<String>,

    /// Output root [default: out]
    #[arg(short, long, env = "HOSTCERT_OUT_DIR")]
    pub out_dir: Option<PathBuf>,

    /// SSH user recorded in config.json [default: root]
    #[arg(long)]
    pub ssh_user: Option<String>,

    /// SSH port recorded in config.json [default: 22]
    #[arg(long)]
    pub ssh_port: Option<u16>,

    /// Key algorithm: rsa, rsa:<bits>, ecdsa-p256 or ecdsa-p384 [default: rsa]
    #[arg(long)]
    pub key_algorithm: Option<KeyAlgorithm>,

    /// Organization for the CA and client certificates [default: current user]
    #[arg(long)]
    pub organization: Option<String>,
}

// ============================================================================
// Inspect command
// ============================================================================

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Machine name
    #[arg(short = 'n', long)]
    pub machine_name: String,

    /// Output root [default: out]
    #[arg(short, long, env = "HOSTCERT_OUT_DIR")]
    pub out_dir: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// Config command
// ============================================================================

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Value to set
        value: String,
    },

    /// Show configuration file path
    Path,
}
