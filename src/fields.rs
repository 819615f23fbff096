use serde::{Deserialize, Serialize};

/// The payout request fields covered by the signature.
///
/// Values are kept exactly as entered; trimming happens when the
/// string-to-sign is built.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct SigningFields {
    /// `transaction.reference`
    pub reference: String,
    /// `transaction.amount`
    pub amount: String,
    /// `originator.country`
    pub country: String,
    /// `transaction.service_code`
    pub service_code: String,
}

impl SigningFields {
    pub fn new(reference: &str, amount: &str, country: &str, service_code: &str) -> Self {
        Self {
            reference: reference.to_string(),
            amount: amount.to_string(),
            country: country.to_string(),
            service_code: service_code.to_string(),
        }
    }

    /// The sample payout used throughout the API documentation.
    pub fn example() -> Self {
        Self::new("TXN213687756272200", "1000", "KE", "MPESAB2C")
    }

    /// Build the canonical string-to-sign for these fields.
    pub fn string_to_sign(&self) -> StringToSign {
        build_string_to_sign(self)
    }
}

/// Canonical payload a signature is computed over.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct StringToSign(String);

impl StringToSign {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// UTF-8 bytes fed to the signature algorithm.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for StringToSign {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for StringToSign {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for StringToSign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Concatenate the trimmed fields in the order reference, amount, country,
/// service code. No separator is inserted.
pub fn build_string_to_sign(fields: &SigningFields) -> StringToSign {
    let parts = [
        fields.reference.trim(),
        fields.amount.trim(),
        fields.country.trim(),
        fields.service_code.trim(),
    ];
    StringToSign(parts.concat())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_string_to_sign() {
        let s = build_string_to_sign(&SigningFields::example());
        assert_eq!(s.as_str(), "TXN2136877562722001000KEMPESAB2C");
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let padded = SigningFields::new(" A ", "\t1\n", "  KE", "X  ");
        let plain = SigningFields::new("A", "1", "KE", "X");
        assert_eq!(padded.string_to_sign(), plain.string_to_sign());
        assert_eq!(plain.string_to_sign().as_str(), "A1KEX");
    }

    #[test]
    fn test_inner_whitespace_is_kept() {
        let fields = SigningFields::new("TXN 1", "10", "KE", "B2C");
        assert_eq!(fields.string_to_sign().as_str(), "TXN 110KEB2C");
    }

    #[test]
    fn test_field_order_matters() {
        let a = SigningFields::new("A", "1", "", "");
        let b = SigningFields::new("1", "A", "", "");
        assert_ne!(a.string_to_sign(), b.string_to_sign());
    }

    #[test]
    fn test_empty_fields() {
        let s = build_string_to_sign(&SigningFields::default());
        assert_eq!(s.as_str(), "");
        assert!(s.as_bytes().is_empty());
    }

    #[test]
    fn test_utf8_bytes() {
        let fields = SigningFields::new("réf", "1", "CI", "OM");
        let s = fields.string_to_sign();
        assert_eq!(s.as_bytes(), "réf1CIOM".as_bytes());
        assert_eq!(s.as_bytes().len(), 9);
    }

    #[test]
    fn test_serde_roundtrip() {
        let fields = SigningFields::example();
        let json = serde_json::to_string(&fields).unwrap();
        assert!(json.contains("\"service_code\":\"MPESAB2C\""));
        let back: SigningFields = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fields);
    }
}
