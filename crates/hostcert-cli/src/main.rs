//! hostcert - docker-machine TLS provisioning
//!
//! Bootstraps a CA, issues a server certificate and writes the host
//! descriptor for one machine.

use std::process::ExitCode;

use colored::Colorize;

fn main() -> ExitCode {
    match hostcert_cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
