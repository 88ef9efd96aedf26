//! `hostcert config` - CLI configuration management.

use anyhow::Result;
use colored::Colorize;

use super::Context;
use crate::cli::args::{ConfigArgs, ConfigCommands};
use crate::config::Config;

pub fn execute(ctx: &Context, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => {
            show_config(ctx);
            Ok(())
        }
        ConfigCommands::Set { key, value } => set_config(ctx, &key, &value),
        ConfigCommands::Path => show_path(),
    }
}

fn show_config(ctx: &Context) {
    let config = &ctx.config;
    let unset = || "(not set)".dimmed().to_string();

    println!("{}", "Current Configuration:".bold());
    println!();
    println!(
        "  {} {}",
        "out_dir:".bold(),
        config.out_dir.as_ref().map_or_else(unset, |p| p.display().to_string())
    );
    println!("  {} {}", "ssh_user:".bold(), config.ssh_user.clone().unwrap_or_else(unset));
    println!(
        "  {} {}",
        "ssh_port:".bold(),
        config.ssh_port.map_or_else(unset, |p| p.to_string())
    );
    println!(
        "  {} {}",
        "key_algorithm:".bold(),
        config.key_algorithm.map_or_else(unset, |a| a.to_string())
    );
    println!(
        "  {} {}",
        "organization:".bold(),
        config.organization.clone().unwrap_or_else(unset)
    );
}

fn set_config(ctx: &Context, key: &str, value: &str) -> Result<()> {
    let mut config = ctx.config.clone();
    config.set(key, value)?;
    config.save()?;

    println!("{} {} set to {}.", "Success:".green().bold(), key, value.cyan());
    Ok(())
}

fn show_path() -> Result<()> {
    let path = Config::path()?;
    println!("{}", path.display());
    Ok(())
}
