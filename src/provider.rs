//! Asymmetric signing capability.
//!
//! [`SignatureEngine`](crate::engine::SignatureEngine) and
//! [`KeyGenerator`](crate::keygen::KeyGenerator) only talk to keys through
//! [`CryptoProvider`], so the string-to-sign contract can be exercised with a
//! deterministic stand-in as well as with real RSA.

use rand::rngs::OsRng;
use rsa::pkcs1v15::{Signature as Pkcs1v15Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

use crate::error::Error;

/// Modulus size for generated keys.
pub const MODULUS_BITS: usize = 2048;

/// Public exponent for generated keys (F4).
pub const PUBLIC_EXPONENT: u32 = 65537;

/// Freshly generated key pair as DER bytes.
#[derive(Clone)]
pub struct RawKeyPair {
    /// SubjectPublicKeyInfo DER.
    pub spki: Vec<u8>,
    /// PKCS#8 PrivateKeyInfo DER.
    pub pkcs8: Vec<u8>,
}

impl std::fmt::Debug for RawKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawKeyPair")
            .field("spki_len", &self.spki.len())
            .field("pkcs8_len", &self.pkcs8.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Capability trait
// ---------------------------------------------------------------------------

/// Key generation, import, sign and verify for one signature scheme.
pub trait CryptoProvider: Send + Sync {
    /// Imported private key ready for signing.
    type SigningKey;
    /// Imported public key ready for verification.
    type VerifyingKey;

    /// Generate an independent key pair.
    fn generate_key_pair(&self) -> Result<RawKeyPair, Error>;

    /// Import PKCS#8 DER as a signing key.
    fn import_signing_key(&self, pkcs8_der: &[u8]) -> Result<Self::SigningKey, Error>;

    /// Import SPKI DER as a verification key.
    fn import_verifying_key(&self, spki_der: &[u8]) -> Result<Self::VerifyingKey, Error>;

    /// Sign `data`, returning raw signature bytes.
    fn sign(&self, key: &Self::SigningKey, data: &[u8]) -> Result<Vec<u8>, Error>;

    /// Check `signature` over `data`.
    ///
    /// A signature that does not match is `Ok(false)`, not an error.
    fn verify(
        &self,
        key: &Self::VerifyingKey,
        data: &[u8],
        signature: &[u8],
    ) -> Result<bool, Error>;
}

// ---------------------------------------------------------------------------
// RSASSA-PKCS1-v1_5 with SHA-256
// ---------------------------------------------------------------------------

/// RSASSA-PKCS1-v1_5 over SHA-256 backed by the `rsa` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct RsaPkcs1Sha256;

impl CryptoProvider for RsaPkcs1Sha256 {
    type SigningKey = SigningKey<Sha256>;
    type VerifyingKey = VerifyingKey<Sha256>;

    fn generate_key_pair(&self) -> Result<RawKeyPair, Error> {
        let mut rng = OsRng;
        let exponent = BigUint::from(PUBLIC_EXPONENT);
        let private_key = RsaPrivateKey::new_with_exp(&mut rng, MODULUS_BITS, &exponent)
            .map_err(|e| Error::KeyGeneration(e.to_string()))?;
        let public_key = RsaPublicKey::from(&private_key);

        let pkcs8 = private_key
            .to_pkcs8_der()
            .map_err(|e| Error::KeyGeneration(e.to_string()))?;
        let spki = public_key
            .to_public_key_der()
            .map_err(|e| Error::KeyGeneration(e.to_string()))?;

        Ok(RawKeyPair {
            spki: spki.as_bytes().to_vec(),
            pkcs8: pkcs8.as_bytes().to_vec(),
        })
    }

    fn import_signing_key(&self, pkcs8_der: &[u8]) -> Result<Self::SigningKey, Error> {
        let private_key = RsaPrivateKey::from_pkcs8_der(pkcs8_der)?;
        Ok(SigningKey::<Sha256>::new(private_key))
    }

    fn import_verifying_key(&self, spki_der: &[u8]) -> Result<Self::VerifyingKey, Error> {
        let public_key = RsaPublicKey::from_public_key_der(spki_der)?;
        Ok(VerifyingKey::<Sha256>::new(public_key))
    }

    fn sign(&self, key: &Self::SigningKey, data: &[u8]) -> Result<Vec<u8>, Error> {
        let signature: Pkcs1v15Signature = key
            .try_sign(data)
            .map_err(|e| Error::Signing(e.to_string()))?;
        Ok(signature.to_vec())
    }

    fn verify(
        &self,
        key: &Self::VerifyingKey,
        data: &[u8],
        signature: &[u8],
    ) -> Result<bool, Error> {
        let signature = match Pkcs1v15Signature::try_from(signature) {
            Ok(sig) => sig,
            Err(_) => return Ok(false),
        };
        Ok(key.verify(data, &signature).is_ok())
    }
}

// ---------------------------------------------------------------------------
// Deterministic stand-in for tests
// ---------------------------------------------------------------------------


#[cfg(test)]
mod tests {
    use super::*;

    const SIGNER_PRIVATE_PEM: &str = include_str!("../testdata/signer-private.pem");
    const SIGNER_PUBLIC_PEM: &str = include_str!("../testdata/signer-public.pem");
    const OTHER_PUBLIC_PEM: &str = include_str!("../testdata/other-public.pem");

    fn der(pem: &str) -> Vec<u8> {
        crate::pem::decode_pem_to_bytes(pem).unwrap()
    }

    #[test]
    fn test_rsa_sign_and_verify() {
        let provider = RsaPkcs1Sha256;
        let signing = provider.import_signing_key(&der(SIGNER_PRIVATE_PEM)).unwrap();
        let verifying = provider.import_verifying_key(&der(SIGNER_PUBLIC_PEM)).unwrap();

        let sig = provider.sign(&signing, b"payload").unwrap();
        assert_eq!(sig.len(), MODULUS_BITS / 8);
        assert!(provider.verify(&verifying, b"payload", &sig).unwrap());
        assert!(!provider.verify(&verifying, b"payload!", &sig).unwrap());
    }

    #[test]
    fn test_rsa_wrong_key_is_false() {
        let provider = RsaPkcs1Sha256;
        let signing = provider.import_signing_key(&der(SIGNER_PRIVATE_PEM)).unwrap();
        let other = provider.import_verifying_key(&der(OTHER_PUBLIC_PEM)).unwrap();

        let sig = provider.sign(&signing, b"payload").unwrap();
        assert!(!provider.verify(&other, b"payload", &sig).unwrap());
    }

    #[test]
    fn test_rsa_truncated_signature_is_false() {
        let provider = RsaPkcs1Sha256;
        let verifying = provider.import_verifying_key(&der(SIGNER_PUBLIC_PEM)).unwrap();
        assert!(!provider.verify(&verifying, b"payload", &[1, 2, 3]).unwrap());
    }

    #[test]
    fn test_rsa_import_rejects_swapped_halves() {
        let provider = RsaPkcs1Sha256;
        assert!(matches!(
            provider.import_signing_key(&der(SIGNER_PUBLIC_PEM)),
            Err(Error::InvalidKey(_))
        ));
        assert!(matches!(
            provider.import_verifying_key(&der(SIGNER_PRIVATE_PEM)),
            Err(Error::InvalidKey(_))
        ));
        assert!(matches!(
            provider.import_verifying_key(b"garbage"),
            Err(Error::InvalidKey(_))
        ));
    }

    #[test]
    fn test_fake_provider_pairs_are_independent() {
        let provider = fake::FakeProvider::default();
        let a = provider.generate_key_pair().unwrap();
        let b = provider.generate_key_pair().unwrap();
        assert_ne!(a.pkcs8, b.pkcs8);

        let key_a = provider.import_signing_key(&a.pkcs8).unwrap();
        let pub_b = provider.import_verifying_key(&b.spki).unwrap();
        let sig = provider.sign(&key_a, b"x").unwrap();
        assert!(!provider.verify(&pub_b, b"x", &sig).unwrap());
    }
}
