//! Reading issued certificates back from disk.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use x509_parser::certificate::X509Certificate;
use x509_parser::extensions::GeneralName;

use crate::error::{HostcertError, Result};
use crate::san::SubjectAltName;

/// What a certificate says about itself.
#[derive(Debug, Clone, Serialize)]
pub struct CertificateSummary {
    /// File the certificate was read from
    pub path: PathBuf,
    /// Subject distinguished name
    pub subject: String,
    /// Issuer distinguished name
    pub issuer: String,
    /// Serial number (hex)
    pub serial: String,
    /// Not valid before
    pub not_before: DateTime<Utc>,
    /// Not valid after
    pub not_after: DateTime<Utc>,
    /// CA basic constraint
    pub is_ca: bool,
    /// IP and DNS SAN entries
    pub sans: Vec<SubjectAltName>,
}

impl CertificateSummary {
    /// Parse the first certificate in a PEM file.
    pub fn from_pem_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let der = read_der(path)?;
        let cert = parse(&der, path)?;

        let sans = match cert.subject_alternative_name() {
            Ok(Some(ext)) => ext
                .value
                .general_names
                .iter()
                .filter_map(general_name_to_san)
                .collect(),
            Ok(None) => Vec::new(),
            Err(e) => return Err(parse_error(path, e)),
        };

        Ok(Self {
            path: path.to_path_buf(),
            subject: cert.subject().to_string(),
            issuer: cert.issuer().to_string(),
            serial: cert.raw_serial_as_string(),
            not_before: asn1_to_utc(cert.validity().not_before, path)?,
            not_after: asn1_to_utc(cert.validity().not_after, path)?,
            is_ca: cert.is_ca(),
            sans,
        })
    }

    /// Whether the certificate is valid right now.
    #[must_use]
    pub fn is_current(&self) -> bool {
        let now = Utc::now();
        self.not_before <= now && now <= self.not_after
    }
}

/// Check that `cert_path` was signed by the CA in `ca_path`.
///
/// Returns `Ok(false)` when the signature or issuer name does not match;
/// errors are reserved for unreadable or unparsable files.
pub fn verify_issued_by(cert_path: impl AsRef<Path>, ca_path: impl AsRef<Path>) -> Result<bool> {
    let (cert_path, ca_path) = (cert_path.as_ref(), ca_path.as_ref());
    let cert_der = read_der(cert_path)?;
    let ca_der = read_der(ca_path)?;
    let cert = parse(&cert_der, cert_path)?;
    let ca = parse(&ca_der, ca_path)?;

    if cert.issuer() != ca.subject() {
        return Ok(false);
    }
    Ok(cert.verify_signature(Some(ca.public_key())).is_ok())
}

fn read_der(path: &Path) -> Result<Vec<u8>> {
    let content = std::fs::read(path).map_err(|e| HostcertError::io(path, e))?;
    let pems = pem::parse_many(&content).map_err(|e| parse_error(path, e))?;
    pems.into_iter()
        .find(|p| p.tag() == "CERTIFICATE")
        .map(|p| p.into_contents())
        .ok_or_else(|| parse_error(path, "no CERTIFICATE block found"))
}

fn parse<'a>(der: &'a [u8], path: &Path) -> Result<X509Certificate<'a>> {
    let (_, cert) = x509_parser::parse_x509_certificate(der).map_err(|e| parse_error(path, e))?;
    Ok(cert)
}

fn parse_error(path: &Path, reason: impl ToString) -> HostcertError {
    HostcertError::CertificateParse {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn general_name_to_san(name: &GeneralName<'_>) -> Option<SubjectAltName> {
    match name {
        GeneralName::DNSName(dns) => Some(SubjectAltName::Dns((*dns).to_string())),
        GeneralName::IPAddress(bytes) => match bytes.len() {
            4 => {
                let octets: [u8; 4] = (*bytes).try_into().ok()?;
                Some(SubjectAltName::Ip(IpAddr::V4(Ipv4Addr::from(octets))))
            }
            16 => {
                let octets: [u8; 16] = (*bytes).try_into().ok()?;
                Some(SubjectAltName::Ip(IpAddr::V6(Ipv6Addr::from(octets))))
            }
            _ => None,
        },
        _ => None,
    }
}

/// Convert an ASN.1 `GeneralizedTime` / `UTCTime` to `DateTime<Utc>`.
fn asn1_to_utc(t: x509_parser::time::ASN1Time, path: &Path) -> Result<DateTime<Utc>> {
    utc_from_secs(t.timestamp(), path)
}

fn utc_from_secs(secs: i64, path: &Path) -> Result<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| parse_error(path, format!("validity timestamp {secs} is out of range")))
}
