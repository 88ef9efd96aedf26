//! Certificate templates for the CA and its two kinds of leaves.

use rcgen::{
    BasicConstraints, CertificateParams, DistinguishedName, DnType, ExtendedKeyUsagePurpose, IsCa,
    KeyUsagePurpose, SanType, SerialNumber,
};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::error::Result;
use crate::policy::{CA_VALIDITY_DAYS, LEAF_VALIDITY_DAYS};
use crate::san::SubjectAltName;

/// Self-signed CA: unconstrained, may sign certificates and CRLs.
pub fn ca_params(organization: &str, common_name: &str) -> CertificateParams {
    let mut params = CertificateParams::default();
    params.distinguished_name = distinguished_name(organization, common_name);
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params.key_usages = vec![
        KeyUsagePurpose::KeyCertSign,
        KeyUsagePurpose::CrlSign,
        KeyUsagePurpose::DigitalSignature,
    ];
    set_validity(&mut params, CA_VALIDITY_DAYS);
    params.serial_number = Some(random_serial());
    params
}

/// Client leaf used by the invoking user to authenticate to the engine.
pub fn client_params(organization: &str, common_name: &str) -> CertificateParams {
    let mut params = CertificateParams::default();
    params.distinguished_name = distinguished_name(organization, common_name);
    params.is_ca = IsCa::ExplicitNoCa;
    params.key_usages = vec![KeyUsagePurpose::DigitalSignature];
    params.extended_key_usages = vec![ExtendedKeyUsagePurpose::ClientAuth];
    params.use_authority_key_identifier_extension = true;
    set_validity(&mut params, LEAF_VALIDITY_DAYS);
    params.serial_number = Some(random_serial());
    params
}

/// Server leaf bound to `sans`.
pub fn server_params(organization: &str, sans: &[SubjectAltName]) -> Result<CertificateParams> {
    let mut params = CertificateParams::default();

    let mut dn = DistinguishedName::new();
    dn.push(DnType::OrganizationName, organization);
    if let Some(first) = sans.first() {
        dn.push(DnType::CommonName, first.to_string());
    }
    params.distinguished_name = dn;

    params.subject_alt_names = sans
        .iter()
        .map(|san| match san {
            SubjectAltName::Ip(ip) => Ok(SanType::IpAddress(*ip)),
            SubjectAltName::Dns(name) => Ok(SanType::DnsName(name.clone().try_into()?)),
        })
        .collect::<std::result::Result<Vec<_>, rcgen::Error>>()?;

    params.is_ca = IsCa::ExplicitNoCa;
    params.key_usages = vec![
        KeyUsagePurpose::DigitalSignature,
        KeyUsagePurpose::KeyEncipherment,
        KeyUsagePurpose::KeyAgreement,
    ];
    params.extended_key_usages = vec![ExtendedKeyUsagePurpose::ServerAuth];
    params.use_authority_key_identifier_extension = true;
    set_validity(&mut params, LEAF_VALIDITY_DAYS);
    params.serial_number = Some(random_serial());
    Ok(params)
}

fn distinguished_name(organization: &str, common_name: &str) -> DistinguishedName {
    let mut dn = DistinguishedName::new();
    dn.push(DnType::OrganizationName, organization);
    dn.push(DnType::CommonName, common_name);
    dn
}

fn set_validity(params: &mut CertificateParams, days: i64) {
    let now = OffsetDateTime::now_utc();
    params.not_before = now;
    params.not_after = now + Duration::days(days);
}

fn random_serial() -> SerialNumber {
    let serial = Uuid::new_v4();
    // Low 64 bits of a v4 UUID.
    #[allow(clippy::cast_possible_truncation)]
    let serial = serial.as_u128() as u64;
    SerialNumber::from(serial)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ca_params() {
        let params = ca_params("acme", "acme CA");
        assert!(matches!(params.is_ca, IsCa::Ca(BasicConstraints::Unconstrained)));
        assert!(params.key_usages.contains(&KeyUsagePurpose::KeyCertSign));
        assert!(params.not_after > params.not_before);
    }

    #[test]
    fn test_server_params_sans() {
        let sans = SubjectAltName::normalize(&["10.0.0.5", "host.example.com"]).unwrap();
        let params = server_params("acme", &sans).unwrap();
        assert_eq!(params.subject_alt_names.len(), 2);
        assert!(matches!(params.subject_alt_names[0], SanType::IpAddress(_)));
        assert!(matches!(params.subject_alt_names[1], SanType::DnsName(_)));
        assert_eq!(params.extended_key_usages, vec![ExtendedKeyUsagePurpose::ServerAuth]);
    }

    #[test]
    fn test_serials_differ() {
        let a = client_params("acme", "client");
        let b = client_params("acme", "client");
        assert_ne!(a.serial_number, b.serial_number);
    }
}
