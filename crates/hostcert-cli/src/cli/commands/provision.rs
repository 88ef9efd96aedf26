//! `hostcert provision` - CA bootstrap, server certificate and descriptor.

use anyhow::{Context as _, Result};
use colored::Colorize;
use hostcert_core::{BootstrapOutcome, ProvisionConfig, Provisioner};
use tracing::debug;

use super::Context;
use crate::cli::args::ProvisionArgs;
use crate::config::default_organization;

pub fn execute(ctx: &Context, args: ProvisionArgs) -> Result<()> {
    let config = resolve(ctx, args);
    debug!(?config, "resolved provisioning config");
    let machine = config.machine_name.clone();

    let report = Provisioner::new(config)?
        .run()
        .with_context(|| format!("provisioning machine {machine:?} failed"))?;

    match report.bootstrap {
        BootstrapOutcome::Created => {
            println!("{} Client cert files successfully created", "✓".green().bold());
        }
        BootstrapOutcome::AlreadyPresent => {
            println!("{} Using existing CA and client cert files", "✓".green().bold());
        }
    }
    println!("{} Server cert files successfully created", "✓".green().bold());
    if ctx.verbose {
        println!("  {} {}", "cert:".dimmed(), report.server.cert_path.display());
        println!("  {} {}", "key:".dimmed(), report.server.key_path.display());
        let sans: Vec<String> = report.server.sans.iter().map(ToString::to_string).collect();
        println!("  {} {}", "SANs:".dimmed(), sans.join(", "));
    }
    println!("{} config.json successfully created", "✓".green().bold());
    println!("  {}", report.descriptor_path.display().to_string().cyan());

    Ok(())
}

/// Merge flags over the config file over built-in defaults.
fn resolve(ctx: &Context, args: ProvisionArgs) -> ProvisionConfig {
    let defaults = ProvisionConfig::default();
    let file = &ctx.config;

    ProvisionConfig {
        out_dir: ctx.out_dir(args.out_dir),
        machine_name: args.machine_name,
        server_ip: args.server_ip,
        server_dns: args.server_dns,
        ssh_key_path: args.ssh_key_path,
        ssh_user: args
            .ssh_user
            .or_else(|| file.ssh_user.clone())
            .unwrap_or(defaults.ssh_user),
        ssh_port: args.ssh_port.or(file.ssh_port).unwrap_or(defaults.ssh_port),
        key_algorithm: args
            .key_algorithm
            .or(file.key_algorithm)
            .unwrap_or(defaults.key_algorithm),
        organization: args
            .organization
            .or_else(|| file.organization.clone())
            .or_else(default_organization)
            .unwrap_or(defaults.organization),
    }
}
