//! Subject Alternative Name entries.

use std::fmt;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use crate::error::{HostcertError, Result};

/// A single SAN entry, classified by whether it parses as an IP literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum SubjectAltName {
    /// IPv4 or IPv6 address
    Ip(IpAddr),
    /// Anything that is not an IP literal, kept verbatim
    Dns(String),
}

impl SubjectAltName {
    /// Classify a raw entry. Non-IP entries become DNS names unchanged.
    pub fn classify(entry: &str) -> Result<Self> {
        if let Ok(ip) = entry.parse::<IpAddr>() {
            return Ok(Self::Ip(ip));
        }
        // X.509 dNSName is an IA5String.
        if !entry.is_ascii() {
            return Err(HostcertError::validation(format!(
                "SAN entry {entry:?} is neither an IP address nor an ASCII DNS name"
            )));
        }
        Ok(Self::Dns(entry.to_string()))
    }

    /// Normalize a SAN list: trim each entry, drop blank entries and
    /// duplicates (first one wins) and classify the rest. Fails if nothing is
    /// left.
    pub fn normalize<S: AsRef<str>>(entries: &[S]) -> Result<Vec<Self>> {
        let mut sans: Vec<Self> = Vec::with_capacity(entries.len());
        for entry in entries {
            let entry = entry.as_ref().trim();
            if entry.is_empty() {
                continue;
            }
            let san = Self::classify(entry)?;
            if !sans.contains(&san) {
                sans.push(san);
            }
        }
        if sans.is_empty() {
            return Err(HostcertError::validation(
                "at least one non-empty SAN entry (IP address or DNS name) is required",
            ));
        }
        Ok(sans)
    }

    /// True for IP entries
    #[must_use]
    pub const fn is_ip(&self) -> bool {
        matches!(self, Self::Ip(_))
    }
}

impl fmt::Display for SubjectAltName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ip(ip) => write!(f, "{ip}"),
            Self::Dns(name) => write!(f, "{name}"),
        }
    }
}
