//! Private key loading and public key extraction.

use pkcs8::der::pem::PemLabel;
use pkcs8::spki::EncodePublicKey;
use pkcs8::{
    DecodePrivateKey, EncodePrivateKey, EncryptedPrivateKeyInfo, LineEnding, PrivateKeyInfo,
    SecretDocument,
};
use rsa::pkcs1::DecodeRsaPrivateKey;

use super::{KeyError, KeyType, P256_OID, P384_OID};

/// OpenSSL's traditional RSA key block.
const PKCS1_LABEL: &str = "RSA PRIVATE KEY";
/// OpenSSL's traditional EC key block.
const SEC1_LABEL: &str = "EC PRIVATE KEY";

/// Decode a PEM private key into PKCS#8, decrypting it when needed.
///
/// Unencrypted PKCS#1 (`RSA PRIVATE KEY`) and SEC1 (`EC PRIVATE KEY`) blocks
/// are accepted too and re-encoded as PKCS#8.
pub(crate) fn load(pem: &str, passphrase: Option<&str>) -> Result<SecretDocument, KeyError> {
    let (label, doc) = SecretDocument::from_pem(pem).map_err(load_error)?;

    if label == EncryptedPrivateKeyInfo::PEM_LABEL {
        let passphrase = passphrase.ok_or_else(|| {
            KeyError::Load("the private key is encrypted but no passphrase was given".to_string())
        })?;
        let encrypted = EncryptedPrivateKeyInfo::try_from(doc.as_bytes()).map_err(load_error)?;
        return encrypted.decrypt(passphrase).map_err(load_error);
    }

    if label == PKCS1_LABEL {
        let key = rsa::RsaPrivateKey::from_pkcs1_der(doc.as_bytes()).map_err(load_error)?;
        return key.to_pkcs8_der().map_err(load_error);
    }

    if label == SEC1_LABEL {
        return sec1_to_pkcs8(doc.as_bytes());
    }

    if label != PrivateKeyInfo::PEM_LABEL {
        return Err(KeyError::Load(format!("unexpected PEM label \"{label}\"")));
    }

    // Reject documents that are not structurally PKCS#8.
    PrivateKeyInfo::try_from(doc.as_bytes()).map_err(load_error)?;
    Ok(doc)
}

/// Re-encode a SEC1 EC key as PKCS#8. The curve must be P-256 or P-384.
fn sec1_to_pkcs8(der: &[u8]) -> Result<SecretDocument, KeyError> {
    if let Ok(key) = p256::SecretKey::from_sec1_der(der) {
        return key.to_pkcs8_der().map_err(load_error);
    }
    match p384::SecretKey::from_sec1_der(der) {
        Ok(key) => key.to_pkcs8_der().map_err(load_error),
        Err(_) => Err(KeyError::Inspect(
            "the EC private key is not on a supported curve (P-256, P-384)".to_string(),
        )),
    }
}

/// Derive the SPKI PEM public key from a decoded private key.
pub(crate) fn public_key_pem(doc: &SecretDocument) -> Result<String, KeyError> {
    let der = doc.as_bytes();
    let info = PrivateKeyInfo::try_from(der).map_err(load_error)?;
    let oid = info.algorithm.oid;

    let pem = if oid == KeyType::Rsa.oid() {
        rsa::RsaPrivateKey::from_pkcs8_der(der)
            .map_err(inspect_error)?
            .to_public_key()
            .to_public_key_pem(LineEnding::LF)
    } else if oid == KeyType::Dsa.oid() {
        dsa::SigningKey::from_pkcs8_der(der)
            .map_err(inspect_error)?
            .verifying_key()
            .to_public_key_pem(LineEnding::LF)
    } else if oid == KeyType::Ec.oid() {
        let curve = info.algorithm.parameters_oid().map_err(inspect_error)?;
        if curve == P256_OID {
            p256::SecretKey::from_pkcs8_der(der)
                .map_err(inspect_error)?
                .public_key()
                .to_public_key_pem(LineEnding::LF)
        } else if curve == P384_OID {
            p384::SecretKey::from_pkcs8_der(der)
                .map_err(inspect_error)?
                .public_key()
                .to_public_key_pem(LineEnding::LF)
        } else {
            return Err(KeyError::Inspect(format!("unsupported elliptic curve {curve}")));
        }
    } else if oid == KeyType::Ed25519.oid() {
        ed25519_dalek::SigningKey::from_pkcs8_der(der)
            .map_err(inspect_error)?
            .verifying_key()
            .to_public_key_pem(LineEnding::LF)
    } else {
        return Err(KeyError::Inspect(format!("unsupported key algorithm {oid}")));
    };

    pem.map_err(inspect_error)
}

fn load_error(err: impl std::fmt::Display) -> KeyError {
    KeyError::Load(err.to_string())
}

fn inspect_error(err: impl std::fmt::Display) -> KeyError {
    KeyError::Inspect(err.to_string())
}
