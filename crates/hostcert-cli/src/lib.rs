//! # hostcert-cli
//!
//! Command-line front end for `hostcert-core`.
//!
//! ## Commands
//!
//! - **provision**: CA bootstrap, server certificate and `config.json` for one machine
//! - **inspect**: summarize a machine's certificates and check them against the CA
//! - **config**: show, locate or edit the defaults file

pub mod cli;
pub mod config;

pub use cli::run;
