//! Private key generation and PKCS#8 PEM export.

use pkcs8::der::pem::PemLabel;
use pkcs8::pkcs5::pbes2;
use pkcs8::{EncodePrivateKey, EncryptedPrivateKeyInfo, LineEnding, PrivateKeyInfo, SecretDocument};
use rand_core::{OsRng, RngCore};

use super::{KeyError, KeyType};
use crate::constants::PBKDF2_ITERATIONS;

const DEFAULT_RSA_BITS: u32 = 2048;

/// Generate a key of `key_type` and return its unencrypted PKCS#8 DER.
///
/// `bits = None` picks the algorithm default. The generated key is
/// zeroized when it goes out of scope here; only the DER document leaves.
pub(crate) fn generate(key_type: KeyType, bits: Option<u32>) -> Result<SecretDocument, KeyError> {
    let unsupported_bits = |bits: u32| KeyError::Generation {
        key_type,
        message: format!("{bits} bits is not a supported size for {key_type} keys"),
    };

    match key_type {
        KeyType::Rsa => {
            let bits = bits.unwrap_or(DEFAULT_RSA_BITS);
            let key = rsa::RsaPrivateKey::new(&mut OsRng, bits as usize).map_err(|e| {
                KeyError::Generation {
                    key_type,
                    message: e.to_string(),
                }
            })?;
            to_der(&key)
        }
        KeyType::Dsa => {
            let size = dsa_key_size(bits).ok_or_else(|| unsupported_bits(bits.unwrap_or_default()))?;
            let components = dsa::Components::generate(&mut OsRng, size);
            let key = dsa::SigningKey::generate(&mut OsRng, components);
            to_der(&key)
        }
        KeyType::Ec => match bits.unwrap_or(256) {
            256 => to_der(&p256::SecretKey::random(&mut OsRng)),
            384 => to_der(&p384::SecretKey::random(&mut OsRng)),
            other => Err(unsupported_bits(other)),
        },
        KeyType::Ed25519 => match bits {
            None | Some(256) => to_der(&ed25519_dalek::SigningKey::generate(&mut OsRng)),
            Some(other) => Err(unsupported_bits(other)),
        },
    }
}

#[allow(deprecated)]
fn dsa_key_size(bits: Option<u32>) -> Option<dsa::KeySize> {
    match bits.unwrap_or(2048) {
        1024 => Some(dsa::KeySize::DSA_1024_160),
        2048 => Some(dsa::KeySize::DSA_2048_256),
        3072 => Some(dsa::KeySize::DSA_3072_256),
        _ => None,
    }
}

fn to_der(key: &impl EncodePrivateKey) -> Result<SecretDocument, KeyError> {
    key.to_pkcs8_der().map_err(export_error)
}

/// Encode a PKCS#8 document as PEM, encrypting it when a passphrase is given.
pub(crate) fn export(doc: &SecretDocument, passphrase: Option<&str>) -> Result<String, KeyError> {
    let pem = match passphrase {
        None => doc.to_pem(PrivateKeyInfo::PEM_LABEL, LineEnding::LF),
        Some(passphrase) => {
            encrypt(doc, passphrase)?.to_pem(EncryptedPrivateKeyInfo::PEM_LABEL, LineEnding::LF)
        }
    }
    .map_err(export_error)?;

    Ok(pem.as_str().to_owned())
}

/// PBES2 with PBKDF2-SHA256 and AES-256-CBC, as `openssl pkcs8 -topk8 -v2 aes-256-cbc`.
fn encrypt(doc: &SecretDocument, passphrase: &str) -> Result<SecretDocument, KeyError> {
    let mut salt = [0u8; 16];
    let mut iv = [0u8; 16];
    OsRng.fill_bytes(&mut salt);
    OsRng.fill_bytes(&mut iv);

    let params = pbes2::Parameters::pbkdf2_sha256_aes256cbc(PBKDF2_ITERATIONS, &salt, &iv)
        .map_err(export_error)?;
    let info = PrivateKeyInfo::try_from(doc.as_bytes()).map_err(export_error)?;
    info.encrypt_with_params(params, passphrase).map_err(export_error)
}

fn export_error(err: impl std::fmt::Display) -> KeyError {
    KeyError::Export(err.to_string())
}
