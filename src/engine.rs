//! Sign and verify string-to-sign payloads with PEM keys.

use tracing::{debug, warn};

use crate::error::{Error, KeyKind};
use crate::fields::{build_string_to_sign, SigningFields, StringToSign};
use crate::pem::decode_pem_to_bytes;
use crate::provider::{CryptoProvider, RsaPkcs1Sha256};
use crate::signature::Signature;

/// Signs and verifies payout payloads using an injected [`CryptoProvider`].
///
/// The engine holds no per-operation state; every call decodes and imports
/// its key afresh and drops it when done.
#[derive(Debug, Clone, Default)]
pub struct SignatureEngine<P = RsaPkcs1Sha256> {
    provider: P,
}

impl SignatureEngine<RsaPkcs1Sha256> {
    /// Engine backed by RSASSA-PKCS1-v1_5 / SHA-256.
    pub fn rsa() -> Self {
        Self::new(RsaPkcs1Sha256)
    }
}

impl<P: CryptoProvider> SignatureEngine<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// See [`build_string_to_sign`].
    pub fn build_string_to_sign(&self, fields: &SigningFields) -> StringToSign {
        build_string_to_sign(fields)
    }

    /// Sign the UTF-8 bytes of `string_to_sign` with a PKCS#8 PEM private key.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingKey`] if the PEM is empty or whitespace.
    /// - [`Error::MalformedPem`] if the PEM body is not base64.
    /// - [`Error::InvalidKey`] if the bytes are not a usable private key.
    pub fn sign(
        &self,
        string_to_sign: &StringToSign,
        private_key_pem: &str,
    ) -> Result<Signature, Error> {
        if private_key_pem.trim().is_empty() {
            return Err(Error::MissingKey(KeyKind::Private));
        }
        debug!(payload_len = string_to_sign.as_bytes().len(), "signing payload");

        let der = decode_pem_to_bytes(private_key_pem).map_err(|e| {
            warn!(error = %e, "private key PEM could not be decoded");
            e
        })?;
        let key = self.provider.import_signing_key(&der).map_err(|e| {
            warn!(error = %e, "private key import failed");
            e
        })?;
        let raw = self.provider.sign(&key, string_to_sign.as_bytes())?;

        Ok(Signature::from_bytes(&raw))
    }

    /// Check `signature` over `string_to_sign` with an SPKI PEM public key.
    ///
    /// Returns `Ok(false)` when everything decodes and imports but the
    /// signature does not match.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingKey`] if the PEM is empty or whitespace.
    /// - [`Error::MissingSignature`] if the signature is empty.
    /// - [`Error::MalformedPem`] / [`Error::MalformedSignature`] on bad base64.
    /// - [`Error::InvalidKey`] if the bytes are not a usable public key.
    pub fn verify(
        &self,
        string_to_sign: &StringToSign,
        signature: &Signature,
        public_key_pem: &str,
    ) -> Result<bool, Error> {
        if public_key_pem.trim().is_empty() {
            return Err(Error::MissingKey(KeyKind::Public));
        }
        if signature.as_base64().trim().is_empty() {
            return Err(Error::MissingSignature);
        }
        debug!(payload_len = string_to_sign.as_bytes().len(), "verifying signature");

        let der = decode_pem_to_bytes(public_key_pem).map_err(|e| {
            warn!(error = %e, "public key PEM could not be decoded");
            e
        })?;
        let signature_bytes = signature.decode().map_err(|e| {
            warn!(error = %e, "signature could not be decoded");
            e
        })?;
        let key = self.provider.import_verifying_key(&der).map_err(|e| {
            warn!(error = %e, "public key import failed");
            e
        })?;

        let valid = self
            .provider
            .verify(&key, string_to_sign.as_bytes(), &signature_bytes)?;
        if !valid {
            debug!("signature did not match payload");
        }
        Ok(valid)
    }
}
