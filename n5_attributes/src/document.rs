//! Attribute document access by [`N5Url`].
//!
//! These functions read and write the attribute of an in-memory attribute document addressed by the attribute path of an [`N5Url`].
//! Loading and storing the document is the responsibility of the caller, typically with a store that gets and sets the encoded document of the group at [`N5Url::normalize_group_path`].
//! [`attributes_from_slice`] and [`attributes_to_vec`] convert between the document and its encoded bytes.
//!
//! A document is a single-writer resource, concurrent writes to the same document must be serialized by the caller.

use n5_url::N5Url;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{AttributeError, AttributePath, MaterializeOptions};

/// Get the attribute of `document` at the attribute path of `url`.
///
/// # Errors
/// Returns an [`AttributeError`] if the attribute path is invalid or the attribute is not present, see [`AttributePath::navigate`].
pub fn get_attribute<'a>(
    document: Option<&'a Value>,
    url: &N5Url,
) -> Result<&'a Value, AttributeError> {
    AttributePath::from_url(url, None)?.navigate(document)
}

/// Get the attribute of `document` at the attribute path of `url` and deserialize it.
///
/// # Errors
/// Returns an [`AttributeError`] if the attribute path is invalid, the attribute is not present, or it cannot be deserialized.
pub fn get_attribute_as<T: DeserializeOwned>(
    document: Option<&Value>,
    url: &N5Url,
) -> Result<T, AttributeError> {
    AttributePath::from_url(url, None)?.navigate_as(document)
}

/// Set the attribute of `document` at the attribute path of `url` to `value`.
///
/// Returns the updated document, or a new document if `document` is [`None`].
///
/// # Errors
/// Returns an [`AttributeError`] if the attribute path is invalid or `value` cannot be serialized.
pub fn set_attribute<T: Serialize>(
    document: Option<Value>,
    url: &N5Url,
    value: T,
) -> Result<Value, AttributeError> {
    set_attribute_opt(document, url, value, &MaterializeOptions::default())
}

/// Set the attribute of `document` at the attribute path of `url` to `value` with non-default [`MaterializeOptions`].
///
/// # Errors
/// Returns an [`AttributeError`] if the attribute path is invalid or `value` cannot be serialized.
pub fn set_attribute_opt<T: Serialize>(
    document: Option<Value>,
    url: &N5Url,
    value: T,
    options: &MaterializeOptions,
) -> Result<Value, AttributeError> {
    AttributePath::from_url(url, None)?
        .with_leaf(value)?
        .materialize_opt(document, options)
}

/// Decode an attribute document from JSON bytes.
///
/// # Errors
/// Returns [`AttributeError::Serialization`] if `bytes` is not valid JSON.
pub fn attributes_from_slice(bytes: &[u8]) -> Result<Value, AttributeError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Encode an attribute document as pretty-printed JSON bytes.
///
/// # Errors
/// Returns [`AttributeError::Serialization`] if `document` cannot be serialized.
pub fn attributes_to_vec(document: &Value) -> Result<Vec<u8>, AttributeError> {
    Ok(serde_json::to_vec_pretty(document)?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn get_and_set() {
        let url = N5Url::parse("/data.n5?volumes/raw#pixelResolution/dimensions[2]").unwrap();
        let document = set_attribute(None, &url, 40.0).unwrap();
        assert_eq!(document["pixelResolution"]["dimensions"][2], json!(40.0));
        assert_eq!(get_attribute(Some(&document), &url).unwrap(), &json!(40.0));
        assert_eq!(get_attribute_as::<f64>(Some(&document), &url).unwrap(), 40.0);
    }

    #[test]
    fn set_root() {
        let url = N5Url::parse("/data.n5?g").unwrap();
        let document =
            set_attribute(Some(json!({"old": 1})), &url, json!({"new": 2})).unwrap();
        assert_eq!(document, json!({"new": 2}));
        assert_eq!(get_attribute(Some(&document), &url).unwrap(), &document);
    }

    #[test]
    fn encode_decode() {
        let document = json!({"dimensions": [100, 200], "dataType": "uint8"});
        let bytes = attributes_to_vec(&document).unwrap();
        assert_eq!(attributes_from_slice(&bytes).unwrap(), document);
        assert!(matches!(
            attributes_from_slice(b"{not json"),
            Err(AttributeError::Serialization(_))
        ));
    }
}
