//! Form-session state for the signing and key generation widgets.
//!
//! Each operation is split into `begin_*` (raise the busy flag and snapshot
//! inputs), `run` on the returned request (the crypto work, which may happen
//! elsewhere) and `complete_*` (lower the flag and record the outcome). The
//! busy flag is advisory: a second `begin_*` while one is outstanding is
//! rejected with [`Error::OperationInProgress`]. A request that is dropped
//! without being completed leaves the flag raised until `cancel` is called.

use tracing::debug;

use crate::config::SessionConfig;
use crate::engine::SignatureEngine;
use crate::error::Error;
use crate::fields::{SigningFields, StringToSign};
use crate::keygen::{KeyGenerator, KeyPair};
use crate::provider::{CryptoProvider, RsaPkcs1Sha256};
use crate::signature::{header_line, Signature};

/// Lifecycle of the most recent operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OperationStatus {
    #[default]
    Idle,
    InProgress,
    Succeeded,
    /// Holds the human-readable error message.
    Failed(String),
}

// ---------------------------------------------------------------------------
// Signing session
// ---------------------------------------------------------------------------

/// Inputs captured by [`SignatureSession::begin_sign`].
#[derive(Debug, Clone)]
pub struct SignRequest {
    string_to_sign: StringToSign,
    private_key_pem: String,
}

impl SignRequest {
    pub fn string_to_sign(&self) -> &StringToSign {
        &self.string_to_sign
    }

    pub fn run<P: CryptoProvider>(self, engine: &SignatureEngine<P>) -> SignResponse {
        let result = engine.sign(&self.string_to_sign, &self.private_key_pem);
        SignResponse {
            string_to_sign: self.string_to_sign,
            result,
        }
    }
}

/// Outcome of a [`SignRequest`].
#[derive(Debug)]
pub struct SignResponse {
    string_to_sign: StringToSign,
    result: Result<Signature, Error>,
}

/// Inputs captured by [`SignatureSession::begin_verify`].
#[derive(Debug, Clone)]
pub struct VerifyRequest {
    string_to_sign: StringToSign,
    signature: Signature,
    public_key_pem: String,
}

impl VerifyRequest {
    pub fn string_to_sign(&self) -> &StringToSign {
        &self.string_to_sign
    }

    pub fn run<P: CryptoProvider>(self, engine: &SignatureEngine<P>) -> VerifyResponse {
        let result = engine.verify(&self.string_to_sign, &self.signature, &self.public_key_pem);
        VerifyResponse {
            string_to_sign: self.string_to_sign,
            result,
        }
    }
}

/// Outcome of a [`VerifyRequest`].
#[derive(Debug)]
pub struct VerifyResponse {
    string_to_sign: StringToSign,
    result: Result<bool, Error>,
}

/// State behind the signature widget: payload fields, pasted keys, the last
/// signature and the verification verdict for the current string-to-sign.
#[derive(Debug)]
pub struct SignatureSession<P = RsaPkcs1Sha256> {
    engine: SignatureEngine<P>,
    fields: SigningFields,
    string_to_sign: StringToSign,
    private_key_pem: String,
    public_key_pem: String,
    signature: Signature,
    verified: Option<bool>,
    error: Option<String>,
    status: OperationStatus,
}

impl SignatureSession<RsaPkcs1Sha256> {
    pub fn rsa(config: &SessionConfig) -> Self {
        Self::new(SignatureEngine::rsa(), config)
    }
}

impl Default for SignatureSession<RsaPkcs1Sha256> {
    fn default() -> Self {
        Self::rsa(&SessionConfig::default())
    }
}

impl<P: CryptoProvider> SignatureSession<P> {
    pub fn new(engine: SignatureEngine<P>, config: &SessionConfig) -> Self {
        let fields = config.initial_fields.clone();
        let string_to_sign = fields.string_to_sign();
        Self {
            engine,
            fields,
            string_to_sign,
            private_key_pem: String::new(),
            public_key_pem: String::new(),
            signature: Signature::default(),
            verified: None,
            error: None,
            status: OperationStatus::Idle,
        }
    }

    pub fn engine(&self) -> &SignatureEngine<P> {
        &self.engine
    }

    pub fn fields(&self) -> &SigningFields {
        &self.fields
    }

    pub fn string_to_sign(&self) -> &StringToSign {
        &self.string_to_sign
    }

    pub fn private_key_pem(&self) -> &str {
        &self.private_key_pem
    }

    pub fn public_key_pem(&self) -> &str {
        &self.public_key_pem
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Verdict for the current string-to-sign, if one has been computed.
    pub fn verified(&self) -> Option<bool> {
        self.verified
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn status(&self) -> &OperationStatus {
        &self.status
    }

    pub fn is_busy(&self) -> bool {
        self.status == OperationStatus::InProgress
    }

    /// `X-Custom-Signature` header for the current signature, empty if none.
    pub fn header_line(&self) -> String {
        header_line(&self.signature)
    }

    // -- Field edits ----------------------------------------------------------

    pub fn set_reference(&mut self, value: &str) {
        self.fields.reference = value.to_string();
        self.fields_changed();
    }

    pub fn set_amount(&mut self, value: &str) {
        self.fields.amount = value.to_string();
        self.fields_changed();
    }

    pub fn set_country(&mut self, value: &str) {
        self.fields.country = value.to_string();
        self.fields_changed();
    }

    pub fn set_service_code(&mut self, value: &str) {
        self.fields.service_code = value.to_string();
        self.fields_changed();
    }

    pub fn set_fields(&mut self, fields: SigningFields) {
        self.fields = fields;
        self.fields_changed();
    }

    pub fn set_private_key_pem(&mut self, pem: &str) {
        self.private_key_pem = pem.to_string();
    }

    pub fn set_public_key_pem(&mut self, pem: &str) {
        self.public_key_pem = pem.to_string();
    }

    /// A verdict belongs to one exact string-to-sign; drop it when that moves.
    fn fields_changed(&mut self) {
        let next = self.fields.string_to_sign();
        if next != self.string_to_sign {
            self.string_to_sign = next;
            self.verified = None;
        }
    }

    fn acquire(&mut self) -> Result<(), Error> {
        if self.is_busy() {
            debug!("rejecting operation while another is in progress");
            return Err(Error::OperationInProgress);
        }
        self.error = None;
        self.status = OperationStatus::InProgress;
        Ok(())
    }

    /// Abandon an outstanding `begin_*` whose request will never complete.
    ///
    /// Returns `false` if nothing was in progress. Fields, keys, the last
    /// signature and the last verdict are left as they are.
    pub fn cancel(&mut self) -> bool {
        if !self.is_busy() {
            return false;
        }
        debug!("cancelling outstanding operation");
        self.status = OperationStatus::Idle;
        true
    }

    fn record_failure(&mut self, err: &Error) {
        let message = err.to_string();
        self.error = Some(message.clone());
        self.status = OperationStatus::Failed(message);
    }

    // -- Signing --------------------------------------------------------------

    /// Start signing the current string-to-sign with the pasted private key.
    pub fn begin_sign(&mut self) -> Result<SignRequest, Error> {
        self.acquire()?;
        self.verified = None;
        Ok(SignRequest {
            string_to_sign: self.string_to_sign.clone(),
            private_key_pem: self.private_key_pem.clone(),
        })
    }

    /// Record a signing outcome. On failure the previous signature is kept.
    pub fn complete_sign(&mut self, response: SignResponse) -> Result<Signature, Error> {
        match response.result {
            Ok(signature) => {
                if response.string_to_sign != self.string_to_sign {
                    debug!("fields changed while signing; signature covers the earlier payload");
                }
                self.signature = signature.clone();
                self.status = OperationStatus::Succeeded;
                Ok(signature)
            }
            Err(e) => {
                self.record_failure(&e);
                Err(e)
            }
        }
    }

    /// Sign synchronously with the session's own engine.
    pub fn sign(&mut self) -> Result<Signature, Error> {
        let request = self.begin_sign()?;
        let response = request.run(&self.engine);
        self.complete_sign(response)
    }

    // -- Verification ---------------------------------------------------------

    /// Start verifying the current signature against the current
    /// string-to-sign with the pasted public key.
    pub fn begin_verify(&mut self) -> Result<VerifyRequest, Error> {
        self.acquire()?;
        Ok(VerifyRequest {
            string_to_sign: self.string_to_sign.clone(),
            signature: self.signature.clone(),
            public_key_pem: self.public_key_pem.clone(),
        })
    }

    /// Record a verification outcome.
    ///
    /// Errors mark the session unverified. A verdict computed for a
    /// string-to-sign that has since been edited is returned but not stored.
    pub fn complete_verify(&mut self, response: VerifyResponse) -> Result<bool, Error> {
        let current = response.string_to_sign == self.string_to_sign;
        if !current {
            debug!("fields changed while verifying; discarding verdict");
        }
        match response.result {
            Ok(valid) => {
                if current {
                    self.verified = Some(valid);
                }
                self.status = OperationStatus::Succeeded;
                Ok(valid)
            }
            Err(e) => {
                self.record_failure(&e);
                if current {
                    self.verified = Some(false);
                }
                Err(e)
            }
        }
    }

    /// Verify synchronously with the session's own engine.
    pub fn verify(&mut self) -> Result<bool, Error> {
        let request = self.begin_verify()?;
        let response = request.run(&self.engine);
        self.complete_verify(response)
    }
}

// ---------------------------------------------------------------------------
// Key generation session
// ---------------------------------------------------------------------------

/// Marker returned by [`KeygenSession::begin_generate`].
#[derive(Debug, Clone, Copy)]
pub struct GenerateRequest;

impl GenerateRequest {
    pub fn run<P: CryptoProvider>(self, generator: &KeyGenerator<P>) -> GenerateResponse {
        GenerateResponse {
            result: generator.generate_key_pair(),
        }
    }
}

/// Outcome of a [`GenerateRequest`].
#[derive(Debug)]
pub struct GenerateResponse {
    result: Result<KeyPair, Error>,
}

/// State behind the key generation widget.
#[derive(Debug)]
pub struct KeygenSession<P = RsaPkcs1Sha256> {
    generator: KeyGenerator<P>,
    key_pair: Option<KeyPair>,
    error: Option<String>,
    status: OperationStatus,
}

impl Default for KeygenSession<RsaPkcs1Sha256> {
    fn default() -> Self {
        Self::new(KeyGenerator::rsa())
    }
}

impl<P: CryptoProvider> KeygenSession<P> {
    pub fn new(generator: KeyGenerator<P>) -> Self {
        Self {
            generator,
            key_pair: None,
            error: None,
            status: OperationStatus::Idle,
        }
    }

    pub fn generator(&self) -> &KeyGenerator<P> {
        &self.generator
    }

    pub fn key_pair(&self) -> Option<&KeyPair> {
        self.key_pair.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn status(&self) -> &OperationStatus {
        &self.status
    }

    pub fn is_busy(&self) -> bool {
        self.status == OperationStatus::InProgress
    }

    pub fn begin_generate(&mut self) -> Result<GenerateRequest, Error> {
        if self.is_busy() {
            return Err(Error::OperationInProgress);
        }
        self.error = None;
        self.status = OperationStatus::InProgress;
        Ok(GenerateRequest)
    }

    /// Abandon an outstanding [`begin_generate`](Self::begin_generate).
    ///
    /// Returns `false` if nothing was in progress.
    pub fn cancel(&mut self) -> bool {
        if !self.is_busy() {
            return false;
        }
        debug!("cancelling outstanding key generation");
        self.status = OperationStatus::Idle;
        true
    }

    /// Record a generation outcome. On failure the previous pair is kept.
    pub fn complete_generate(&mut self, response: GenerateResponse) -> Result<KeyPair, Error> {
        match response.result {
            Ok(pair) => {
                self.key_pair = Some(pair.clone());
                self.status = OperationStatus::Succeeded;
                Ok(pair)
            }
            Err(e) => {
                let message = e.to_string();
                self.error = Some(message.clone());
                self.status = OperationStatus::Failed(message);
                Err(e)
            }
        }
    }

    pub fn generate(&mut self) -> Result<KeyPair, Error> {
        let request = self.begin_generate()?;
        let response = request.run(&self.generator);
        self.complete_generate(response)
    }
}
