//! PEM armor for raw DER key bytes.
//!
//! Encoding is RFC 7468 PEM: base64 wrapped at 64 characters per line between
//! `-----BEGIN {label}-----` / `-----END {label}-----` lines. Decoding accepts
//! strict PEM first and then falls back to a lenient reading of pasted text:
//! every dash-delimited armor marker and all whitespace are dropped, and the
//! body is decoded with optional `=` padding.

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use rsa::pkcs8::der::pem::{self, LineEnding};

use crate::error::Error;

const DASHES: &str = "-----";

/// Standard alphabet, padding optional, trailing bits ignored.
pub(crate) const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// PEM labels used by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PemLabel {
    /// SubjectPublicKeyInfo DER.
    PublicKey,
    /// PKCS#8 PrivateKeyInfo DER.
    PrivateKey,
}

impl PemLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PemLabel::PublicKey => "PUBLIC KEY",
            PemLabel::PrivateKey => "PRIVATE KEY",
        }
    }
}

impl std::fmt::Display for PemLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encode raw bytes as PEM text under the given label.
///
/// The output has no trailing newline.
pub fn encode_to_pem(raw: &[u8], label: PemLabel) -> Result<String, Error> {
    let mut encoded = pem::encode_string(label.as_str(), LineEnding::LF, raw)
        .map_err(|e| Error::MalformedPem(e.to_string()))?;
    while encoded.ends_with('\n') {
        encoded.pop();
    }
    Ok(encoded)
}

/// Decode PEM text back to its raw bytes.
///
/// The label is not checked; callers learn whether the payload is the right
/// kind of key when it is imported.
///
/// # Errors
///
/// Returns [`Error::MalformedPem`] if the stripped body is not valid base64.
pub fn decode_pem_to_bytes(text: &str) -> Result<Vec<u8>, Error> {
    if let Ok((_label, der)) = pem::decode_vec(text.trim().as_bytes()) {
        return Ok(der);
    }
    let body = strip_armor(text);
    Ok(LENIENT_BASE64.decode(body)?)
}

/// Remove `-----LABEL-----` markers (dash runs of five or more) and all
/// whitespace.
fn strip_armor(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(DASHES) {
        let open_end = start + dash_run(&rest[start..]);
        let after = &rest[open_end..];
        let label_len = after.find('-').unwrap_or(after.len());
        let close_len = dash_run(&after[label_len..]);

        if label_len > 0 && close_len >= DASHES.len() {
            out.push_str(&rest[..start]);
            rest = &after[label_len + close_len..];
        } else {
            out.push_str(&rest[..open_end]);
            rest = after;
        }
    }
    out.push_str(rest);
    out.retain(|c| !c.is_whitespace());
    out
}

fn dash_run(s: &str) -> usize {
    s.bytes().take_while(|&b| b == b'-').count()
}
