//! Key algorithm selection and key pair generation.

use std::fmt;
use std::str::FromStr;

use rcgen::KeyPair;
use rsa::pkcs8::{EncodePrivateKey, LineEnding};
use rsa::RsaPrivateKey;
use serde::{Deserialize, Serialize};

use crate::error::{HostcertError, Result};
use crate::policy::{DEFAULT_RSA_BITS, MAX_RSA_BITS, MIN_RSA_BITS};

/// Key algorithm choices.
///
/// Serialized as `rsa`, `rsa:<bits>`, `ecdsa-p256` or `ecdsa-p384`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum KeyAlgorithm {
    /// RSA with the given modulus size (docker-machine compatible)
    Rsa {
        /// Modulus size in bits
        bits: u32,
    },
    /// ECDSA with P-256 curve
    EcdsaP256,
    /// ECDSA with P-384 curve
    EcdsaP384,
}

impl Default for KeyAlgorithm {
    fn default() -> Self {
        Self::Rsa {
            bits: DEFAULT_RSA_BITS,
        }
    }
}

impl KeyAlgorithm {
    /// Reject key sizes we refuse to generate.
    pub fn validate(self) -> Result<()> {
        match self {
            Self::Rsa { bits } if bits < MIN_RSA_BITS => Err(HostcertError::validation(format!(
                "RSA keys must be at least {MIN_RSA_BITS} bits, got {bits}"
            ))),
            Self::Rsa { bits } if bits > MAX_RSA_BITS => Err(HostcertError::validation(format!(
                "RSA keys must be at most {MAX_RSA_BITS} bits, got {bits}"
            ))),
            // ring only accepts whole-byte moduli.
            Self::Rsa { bits } if bits % 8 != 0 => Err(HostcertError::validation(format!(
                "RSA key size must be a multiple of 8 bits, got {bits}"
            ))),
            _ => Ok(()),
        }
    }

    /// Generate a fresh key pair.
    pub fn generate(self) -> Result<KeyPair> {
        self.validate()?;
        match self {
            Self::Rsa { bits } => {
                // rcgen's ring backend cannot generate RSA keys, only load them.
                let mut rng = rand::thread_rng();
                let key = RsaPrivateKey::new(&mut rng, bits as usize)
                    .map_err(|e| HostcertError::KeyGeneration(e.to_string()))?;
                let pem = key
                    .to_pkcs8_pem(LineEnding::LF)
                    .map_err(|e| HostcertError::KeyGeneration(e.to_string()))?;
                Ok(KeyPair::from_pem(pem.as_str())?)
            }
            Self::EcdsaP256 => Ok(KeyPair::generate_for(&rcgen::PKCS_ECDSA_P256_SHA256)?),
            Self::EcdsaP384 => Ok(KeyPair::generate_for(&rcgen::PKCS_ECDSA_P384_SHA384)?),
        }
    }
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rsa { bits } if *bits == DEFAULT_RSA_BITS => write!(f, "rsa"),
            Self::Rsa { bits } => write!(f, "rsa:{bits}"),
            Self::EcdsaP256 => write!(f, "ecdsa-p256"),
            Self::EcdsaP384 => write!(f, "ecdsa-p384"),
        }
    }
}

impl FromStr for KeyAlgorithm {
    type Err = HostcertError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "rsa" => Ok(Self::default()),
            "ecdsa-p256" | "p256" => Ok(Self::EcdsaP256),
            "ecdsa-p384" | "p384" => Ok(Self::EcdsaP384),
            other => {
                let bits = other
                    .strip_prefix("rsa:")
                    .and_then(|b| b.parse::<u32>().ok())
                    .ok_or_else(|| {
                        HostcertError::validation(format!(
                            "unknown key algorithm: {s} (expected rsa, rsa:<bits>, ecdsa-p256, ecdsa-p384)"
                        ))
                    })?;
                let algorithm = Self::Rsa { bits };
                algorithm.validate()?;
                Ok(algorithm)
            }
        }
    }
}

impl TryFrom<String> for KeyAlgorithm {
    type Error = HostcertError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<KeyAlgorithm> for String {
    fn from(value: KeyAlgorithm) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_rsa_2048() {
        assert_eq!(KeyAlgorithm::default(), KeyAlgorithm::Rsa { bits: 2048 });
        assert_eq!(KeyAlgorithm::default().to_string(), "rsa");
    }

    #[test]
    fn test_parse() {
        assert_eq!("rsa".parse::<KeyAlgorithm>().unwrap(), KeyAlgorithm::default());
        assert_eq!(
            "RSA:4096".parse::<KeyAlgorithm>().unwrap(),
            KeyAlgorithm::Rsa { bits: 4096 }
        );
        assert_eq!("ecdsa-p256".parse::<KeyAlgorithm>().unwrap(), KeyAlgorithm::EcdsaP256);
        assert_eq!("p384".parse::<KeyAlgorithm>().unwrap(), KeyAlgorithm::EcdsaP384);
        assert!("dsa".parse::<KeyAlgorithm>().is_err());
        assert!("rsa:abc".parse::<KeyAlgorithm>().is_err());
    }

    #[test]
    fn test_small_rsa_rejected() {
        let err = "rsa:1024".parse::<KeyAlgorithm>().unwrap_err();
        assert!(err.is_validation());
        assert!(KeyAlgorithm::Rsa { bits: 512 }.generate().unwrap_err().is_validation());
    }

    #[test]
    fn test_unloadable_rsa_sizes_rejected() {
        for input in ["rsa:4104", "rsa:8192", "rsa:2050"] {
            let err = input.parse::<KeyAlgorithm>().unwrap_err();
            assert!(err.is_validation(), "{input}: {err}");
        }
        assert!(KeyAlgorithm::Rsa { bits: 4104 }.generate().unwrap_err().is_validation());
        assert!(KeyAlgorithm::Rsa { bits: 3072 }.validate().is_ok());
        assert!(KeyAlgorithm::Rsa { bits: 4096 }.validate().is_ok());
    }

    #[test]
    fn test_display_roundtrip() {
        for algorithm in [
            KeyAlgorithm::default(),
            KeyAlgorithm::Rsa { bits: 3072 },
            KeyAlgorithm::EcdsaP256,
            KeyAlgorithm::EcdsaP384,
        ] {
            assert_eq!(algorithm.to_string().parse::<KeyAlgorithm>().unwrap(), algorithm);
        }
    }

    #[test]
    fn test_generate_ecdsa() {
        let key = KeyAlgorithm::EcdsaP256.generate().unwrap();
        assert!(key.serialize_pem().contains("PRIVATE KEY"));
    }
}
