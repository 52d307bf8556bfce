//! Storage encoding for the free-form `metas` column.
//!
//! The column holds one JSON object of string values. Every read and write of
//! that representation goes through this module.

use std::collections::BTreeMap;

/// Decoded metas: string keys to string values.
pub type Metas = BTreeMap<String, String>;

/// Decodes stored metas; an empty column is an empty map.
pub fn decode_metas(raw: &str) -> serde_json::Result<Metas> {
    if raw.trim().is_empty() {
        return Ok(Metas::new());
    }
    serde_json::from_str(raw)
}

/// Encodes metas into their stored form.
pub fn encode_metas(metas: &Metas) -> serde_json::Result<String> {
    serde_json::to_string(metas)
}

#[cfg(test)]
mod tests {
    use super::{decode_metas, encode_metas, Metas};

    #[test]
    fn empty_column_decodes_to_empty_map() {
        assert!(decode_metas("").unwrap().is_empty());
        assert!(decode_metas("{}").unwrap().is_empty());
    }

    #[test]
    fn encoded_form_is_a_json_object() {
        let mut metas = Metas::new();
        metas.insert("color".to_string(), "red".to_string());
        assert_eq!(encode_metas(&metas).unwrap(), r#"{"color":"red"}"#);
    }

    #[test]
    fn non_string_values_are_rejected() {
        assert!(decode_metas(r#"{"n":1}"#).is_err());
        assert!(decode_metas("[]").is_err());
    }
}
