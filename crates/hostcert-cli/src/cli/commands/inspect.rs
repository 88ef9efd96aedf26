//! `hostcert inspect` - summarize a machine's certificates.

use anyhow::{bail, Result};
use colored::Colorize;
use hostcert_core::layout::{CA_CERT_FILE, CLIENT_CERT_FILE, SERVER_CERT_FILE};
use hostcert_core::{verify_issued_by, CertificateSummary, OutputLayout};
use serde::Serialize;

use super::Context;
use crate::cli::args::InspectArgs;

#[derive(Debug, Serialize)]
struct Entry {
    role: &'static str,
    #[serde(flatten)]
    summary: CertificateSummary,
    signed_by_ca: bool,
}

pub fn execute(ctx: &Context, args: &InspectArgs) -> Result<()> {
    let layout = OutputLayout::new(ctx.out_dir(args.out_dir.clone()));
    let machine = args.machine_name.as_str();
    let ca_path = layout.certs_file(CA_CERT_FILE);
    if !ca_path.is_file() {
        bail!(
            "No CA found at {}\n\nRun `hostcert provision` first.",
            ca_path.display()
        );
    }

    let mut entries = Vec::new();
    for (role, path) in [
        ("ca", ca_path.clone()),
        ("client", layout.machine_file(machine, CLIENT_CERT_FILE)),
        ("server", layout.machine_file(machine, SERVER_CERT_FILE)),
    ] {
        let summary = CertificateSummary::from_pem_file(&path)?;
        let signed_by_ca = verify_issued_by(&path, &ca_path)?;
        entries.push(Entry {
            role,
            summary,
            signed_by_ca,
        });
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for entry in &entries {
        print_entry(entry);
    }
    Ok(())
}

fn print_entry(entry: &Entry) {
    let s = &entry.summary;
    println!("{} {}", entry.role.to_uppercase().bold(), s.path.display().to_string().dimmed());
    println!("  {} {}", "subject:".bold(), s.subject);
    println!("  {} {}", "issuer:".bold(), s.issuer);
    println!("  {} {}", "serial:".bold(), s.serial);

    let validity = format!("{} .. {}", s.not_before.format("%Y-%m-%d"), s.not_after.format("%Y-%m-%d"));
    if s.is_current() {
        println!("  {} {}", "valid:".bold(), validity.green());
    } else {
        println!("  {} {} (expired or not yet valid)", "valid:".bold(), validity.red());
    }

    if !s.sans.is_empty() {
        let sans: Vec<String> = s.sans.iter().map(ToString::to_string).collect();
        println!("  {} {}", "SANs:".bold(), sans.join(", ").cyan());
    }

    let chain = if entry.signed_by_ca {
        "signed by CA".green()
    } else {
        "NOT signed by CA".red().bold()
    };
    println!("  {} {}", "chain:".bold(), chain);
    println!();
}
