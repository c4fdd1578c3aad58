//! # Name Encoding
//!
//! File: cli/src/common/encoding.rs
//!
//! Resource ids contain `/` and `{}`, so wherever they have to appear as a
//! single path segment (editor URLs, folder and file names) they are
//! URL-safe base64 encoded. Decoding accepts input with or without padding.
//!
use crate::core::error::{EditorError, Result};
use base64::{
    alphabet,
    engine::{general_purpose::GeneralPurposeConfig, DecodePaddingMode, GeneralPurpose},
    Engine as _,
};

const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

pub fn b64encode_str(value: &str) -> String {
    URL_SAFE_LENIENT.encode(value.as_bytes())
}

pub fn b64decode_str(value: &str) -> Result<String> {
    let bytes = URL_SAFE_LENIENT
        .decode(value)
        .map_err(|e| EditorError::invalid(format!("Invalid base64 value '{}': {}", value, e)))?;
    String::from_utf8(bytes)
        .map_err(|_| EditorError::invalid(format!("Base64 value '{}' is not UTF-8", value)).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_id_encoding_is_path_safe() {
        let id = "/subscriptions/{}/resourcegroups/{}/providers/microsoft.databricks/workspaces/{}/virtualnetworkpeerings";
        let encoded = b64encode_str(id);
        assert!(!encoded.contains('/'));
        assert!(!encoded.contains('+'));
        assert_eq!(b64decode_str(&encoded).unwrap(), id);
    }

    #[test]
    fn test_decode_without_padding() {
        // "ab" encodes to "YWI=".
        assert_eq!(b64decode_str("YWI").unwrap(), "ab");
        assert_eq!(b64decode_str("YWI=").unwrap(), "ab");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = b64decode_str("***").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EditorError>(),
            Some(EditorError::InvalidApiUsage(_))
        ));
    }
}
