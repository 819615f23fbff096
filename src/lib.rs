//! # paysign
//!
//! Payload signing helpers for the payments API documentation.
//!
//! Payout requests carry an `X-Custom-Signature` header: an RSASSA-PKCS1-v1_5
//! / SHA-256 signature over a canonical string-to-sign built from four request
//! fields. This crate builds that string, signs and verifies it with PEM keys,
//! and generates demo RSA-2048 key pairs.
//!
//! ## Features
//!
//! - **String-to-sign**: trimmed `reference`, `amount`, `country` and
//!   `service_code`, concatenated in that order with no separator
//! - **Signing / Verification**: PKCS#8 private keys, SPKI public keys, base64
//!   signatures
//! - **PEM Codec**: 64-column base64 armor for raw DER key bytes
//! - **Key Generation**: RSA-2048, public exponent 65537
//! - **Sessions**: form state for the signing and key generation widgets,
//!   with a cooperative busy flag and verdict invalidation on field edits
//!
//! ## Quick Start
//!
//! ```rust
//! use paysign::{generate_key_pair, SignatureEngine, SigningFields};
//!
//! let key_pair = generate_key_pair().unwrap();
//! let engine = SignatureEngine::rsa();
//!
//! let fields = SigningFields::new("TXN213687756272200", "1000", "KE", "MPESAB2C");
//! let string_to_sign = engine.build_string_to_sign(&fields);
//! assert_eq!(string_to_sign.as_str(), "TXN2136877562722001000KEMPESAB2C");
//!
//! let signature = engine.sign(&string_to_sign, &key_pair.private_key_pem).unwrap();
//! let is_valid = engine
//!     .verify(&string_to_sign, &signature, &key_pair.public_key_pem)
//!     .unwrap();
//! assert!(is_valid);
//!
//! println!("{}", paysign::header_line(&signature));
//! ```
//!
//! ## Error Handling
//!
//! Every fallible operation returns `Result<T, Error>`. A signature that
//! decodes but does not match is `Ok(false)`; missing inputs, bad base64 and
//! unusable keys are distinct [`Error`] variants with user-facing messages.
//!
//! ## Logging
//!
//! Operations emit `tracing` events. Key material and signatures are never
//! logged; install a subscriber in the host application to see them.

pub mod config;
pub mod engine;
pub mod error;
pub mod fields;
pub mod keygen;
pub mod pem;
pub mod provider;
pub mod session;
pub mod signature;

pub use config::SessionConfig;
pub use engine::SignatureEngine;
pub use error::{Error, ErrorCode, KeyKind};
pub use fields::{build_string_to_sign, SigningFields, StringToSign};
pub use keygen::{generate_key_pair, KeyGenerator, KeyPair};
pub use pem::{decode_pem_to_bytes, encode_to_pem, PemLabel};
pub use provider::{CryptoProvider, RawKeyPair, RsaPkcs1Sha256};
pub use session::{KeygenSession, OperationStatus, SignatureSession};
pub use signature::{header_line, Signature, SIGNATURE_HEADER};
