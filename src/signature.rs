//! Signature values and their HTTP transport form.

use base64::{engine::general_purpose, Engine as _};

use crate::error::Error;
use crate::pem::LENIENT_BASE64;

/// HTTP header that carries the base64 signature on payout requests.
pub const SIGNATURE_HEADER: &str = "X-Custom-Signature";

/// A base64-encoded signature over a string-to-sign.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Signature(String);

impl Signature {
    /// Wrap raw signature bytes.
    pub fn from_bytes(raw: &[u8]) -> Self {
        Self(general_purpose::STANDARD.encode(raw))
    }

    /// Wrap base64 text as received, without decoding it.
    pub fn from_base64(b64: &str) -> Self {
        Self(b64.to_string())
    }

    pub fn as_base64(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode to the raw signature bytes.
    ///
    /// Whitespace anywhere in the text is ignored and `=` padding is optional.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedSignature`] if the text is not valid base64.
    pub fn decode(&self) -> Result<Vec<u8>, Error> {
        let compact: String = self.0.chars().filter(|c| !c.is_whitespace()).collect();
        LENIENT_BASE64
            .decode(compact)
            .map_err(|e| Error::MalformedSignature(e.to_string()))
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Render the `X-Custom-Signature: <base64>` header line.
///
/// An empty signature renders as an empty string.
pub fn header_line(signature: &Signature) -> String {
    if signature.is_empty() {
        return String::new();
    }
    format!("{}: {}", SIGNATURE_HEADER, signature)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_roundtrip() {
        let sig = Signature::from_bytes(&[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(sig.as_base64(), "3q2+7w==");
        assert_eq!(sig.decode().unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn test_malformed_base64() {
        let sig = Signature::from_base64("%%% not base64 %%%");
        assert!(matches!(sig.decode(), Err(Error::MalformedSignature(_))));
    }

    #[test]
    fn test_surrounding_whitespace_tolerated() {
        let sig = Signature::from_base64("  3q2+7w==\n");
        assert_eq!(sig.decode().unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn test_wrapped_signature_decodes() {
        let sig = Signature::from_base64("3q2+\n7w==");
        assert_eq!(sig.decode().unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);

        let crlf = Signature::from_base64("3q2+\r\n 7w==\r\n");
        assert_eq!(crlf.decode().unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn test_missing_padding_tolerated() {
        let sig = Signature::from_base64("3q2+7w");
        assert_eq!(sig.decode().unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn test_header_line() {
        let sig = Signature::from_base64("c2ln");
        assert_eq!(header_line(&sig), "X-Custom-Signature: c2ln");
        assert_eq!(header_line(&Signature::default()), "");
    }
}
