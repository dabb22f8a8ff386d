//! Attribute paths.
//!
//! An [`AttributePath`] is a chain of [`AttributePathToken`]s produced by tokenizing a normalized attribute path.
//! Each token is an object key or an array index, and the chain may end with a leaf value to write.

use derive_more::Display;
use n5_url::{normalize::normalize_attribute_path, N5Url};
use serde::Serialize;
use serde_json::Value;

use crate::AttributeError;

/// Escape the delimiters of an attribute path in an object key.
///
/// A key of `.` or `..` is escaped so that it is not treated as a dot segment.
fn escape_key(key: &str) -> String {
    let mut escaped = String::with_capacity(key.len());
    if key == "." || key == ".." {
        escaped.push('\\');
    }
    for c in key.chars() {
        if matches!(c, '\\' | '/' | '[' | ']') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn unescape(segment: &str) -> String {
    let mut unescaped = String::with_capacity(segment.len());
    let mut escape = false;
    for c in segment.chars() {
        if !escape && c == '\\' {
            escape = true;
        } else {
            escape = false;
            unescaped.push(c);
        }
    }
    unescaped
}

/// Split an attribute path on unescaped `/`, retaining escapes.
fn split_segments(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut escape = false;
    let mut start = 0;
    for (i, c) in path.char_indices() {
        if escape {
            escape = false;
        } else if c == '\\' {
            escape = true;
        } else if c == '/' {
            segments.push(&path[start..i]);
            start = i + 1;
        }
    }
    segments.push(&path[start..]);
    segments
}

/// A step of an [`AttributePath`].
#[derive(Clone, Debug, PartialEq, Display)]
pub enum AttributePathToken {
    /// A key of a JSON object.
    #[display("{}", escape_key(_0))]
    ObjectKey(String),
    /// An index of a JSON array.
    #[display("[{_0}]")]
    ArrayIndex(usize),
    /// A value to write at the end of the path.
    #[display("{_0}")]
    Leaf(Value),
}

impl AttributePathToken {
    /// Parse a raw segment of a normalized attribute path.
    fn from_segment(segment: &str) -> Result<Self, AttributeError> {
        if let Some(index) = segment
            .strip_prefix('[')
            .and_then(|segment| segment.strip_suffix(']'))
        {
            if !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) {
                return index.parse().map(Self::ArrayIndex).map_err(|_| {
                    AttributeError::InvalidPath(format!("array index {index} is too large"))
                });
            }
        }
        Ok(Self::ObjectKey(unescape(segment)))
    }

    /// Returns true if this is a [`Leaf`](AttributePathToken::Leaf).
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// The kind of JSON element this token steps into.
    pub(crate) fn expected_kind(&self) -> &'static str {
        match self {
            Self::ObjectKey(_) => "object",
            Self::ArrayIndex(_) => "array",
            Self::Leaf(_) => "value",
        }
    }

    /// Returns true if this token can step into `json`, ignoring whether the key or index is present.
    pub(crate) fn is_compatible(&self, json: &Value) -> bool {
        match self {
            Self::ObjectKey(_) => json.is_object(),
            Self::ArrayIndex(_) => json.is_array(),
            Self::Leaf(_) => true,
        }
    }

    /// An empty JSON element this token can step into.
    pub(crate) fn empty_element(&self) -> Value {
        match self {
            Self::ObjectKey(_) => Value::Object(serde_json::Map::new()),
            Self::ArrayIndex(_) => Value::Array(Vec::new()),
            Self::Leaf(_) => Value::Null,
        }
    }
}

/// A tokenized attribute path.
///
/// The tokens are ordered from the root of the attribute document.
/// The parent and child of a token are retrieved by index with [`parent`](AttributePath::parent) and [`child`](AttributePath::child).
///
/// There is at most one [`Leaf`](AttributePathToken::Leaf) token, and it is always last.
///
/// ```
/// # use n5_attributes::{AttributePath, AttributePathToken};
/// let path = AttributePath::parse("a/b[2]/c", None).unwrap();
/// assert_eq!(
///     path.tokens(),
///     &[
///         AttributePathToken::ObjectKey("a".to_string()),
///         AttributePathToken::ObjectKey("b".to_string()),
///         AttributePathToken::ArrayIndex(2),
///         AttributePathToken::ObjectKey("c".to_string()),
///     ]
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub struct AttributePath(Vec<AttributePathToken>);

impl AttributePath {
    /// Tokenize a normalized attribute path.
    ///
    /// The path is split on unescaped `/`.
    /// Segments of the form `[<digits>]` are array indices and all other segments are object keys.
    /// If a `leaf` is supplied, it is appended as the last token.
    ///
    /// The path should be normalized with [`normalize_attribute_path`] first, or use [`AttributePath::parse`].
    ///
    /// # Errors
    /// Returns [`AttributeError::InvalidPath`] if an array index is too large.
    pub fn tokenize(normalized_path: &str, leaf: Option<Value>) -> Result<Self, AttributeError> {
        let path = normalized_path.strip_prefix('/').unwrap_or(normalized_path);
        let mut tokens = split_segments(path)
            .into_iter()
            .filter(|segment| !segment.is_empty())
            .map(AttributePathToken::from_segment)
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(leaf) = leaf {
            tokens.push(AttributePathToken::Leaf(leaf));
        }
        Ok(Self(tokens))
    }

    /// Normalize and tokenize an attribute path.
    ///
    /// # Errors
    /// Returns an [`AttributeError`] if the path cannot be normalized or tokenized.
    pub fn parse(path: &str, leaf: Option<Value>) -> Result<Self, AttributeError> {
        Self::tokenize(&normalize_attribute_path(path)?, leaf)
    }

    /// Tokenize the attribute path of an [`N5Url`].
    ///
    /// An absent attribute path is treated as the root of the attribute document.
    ///
    /// # Errors
    /// Returns an [`AttributeError`] if the attribute path of `url` cannot be normalized or tokenized.
    pub fn from_url(url: &N5Url, leaf: Option<Value>) -> Result<Self, AttributeError> {
        Self::tokenize(&url.normalize_attribute_path()?, leaf)
    }

    /// Create an attribute path from `tokens`.
    ///
    /// # Errors
    /// Returns [`AttributeError::InvalidPath`] if a [`Leaf`](AttributePathToken::Leaf) is not the last token.
    pub fn from_tokens(tokens: Vec<AttributePathToken>) -> Result<Self, AttributeError> {
        if let Some(position) = tokens.iter().position(AttributePathToken::is_leaf) {
            if position + 1 != tokens.len() {
                return Err(AttributeError::InvalidPath(format!(
                    "leaf token at position {position} of {} tokens must be last",
                    tokens.len()
                )));
            }
        }
        Ok(Self(tokens))
    }

    /// Append a leaf `value` to write at the end of the path.
    ///
    /// # Errors
    /// Returns [`AttributeError::InvalidPath`] if the path already has a leaf, or [`AttributeError::Serialization`] if `value` cannot be converted to JSON.
    pub fn with_leaf<T: Serialize>(mut self, value: T) -> Result<Self, AttributeError> {
        if self.leaf().is_some() {
            return Err(AttributeError::InvalidPath(format!(
                "attribute path {self} already has a leaf"
            )));
        }
        self.0
            .push(AttributePathToken::Leaf(serde_json::to_value(value)?));
        Ok(self)
    }

    /// Return the tokens.
    #[must_use]
    pub fn tokens(&self) -> &[AttributePathToken] {
        &self.0
    }

    /// Return the tokens excluding any leaf.
    #[must_use]
    pub fn steps(&self) -> &[AttributePathToken] {
        match self.0.split_last() {
            Some((AttributePathToken::Leaf(_), steps)) => steps,
            _ => &self.0,
        }
    }

    /// Return the leaf value, if present.
    #[must_use]
    pub fn leaf(&self) -> Option<&Value> {
        match self.0.last() {
            Some(AttributePathToken::Leaf(value)) => Some(value),
            _ => None,
        }
    }

    /// Return the number of tokens, including any leaf.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the parent of the token at `index`.
    #[must_use]
    pub fn parent(&self, index: usize) -> Option<&AttributePathToken> {
        index.checked_sub(1).and_then(|parent| self.0.get(parent))
    }

    /// Return the child of the token at `index`.
    #[must_use]
    pub fn child(&self, index: usize) -> Option<&AttributePathToken> {
        self.0.get(index.checked_add(1)?)
    }

    /// Display the first `len` steps as a normalized attribute path.
    pub(crate) fn display_steps(&self, len: usize) -> String {
        self.steps()
            .iter()
            .take(len)
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl std::fmt::Display for AttributePath {
    /// Display the path as a normalized attribute path, excluding any leaf.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_steps(self.steps().len()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn key(key: &str) -> AttributePathToken {
        AttributePathToken::ObjectKey(key.to_string())
    }

    #[test]
    fn tokenize() {
        let path = AttributePath::tokenize("a/b/[2]/c", None).unwrap();
        assert_eq!(
            path.tokens(),
            &[key("a"), key("b"), AttributePathToken::ArrayIndex(2), key("c")]
        );
        assert_eq!(path.leaf(), None);
        assert_eq!(path.to_string(), "a/b/[2]/c");

        let path = AttributePath::tokenize("/[0]/[10]", None).unwrap();
        assert_eq!(
            path.tokens(),
            &[
                AttributePathToken::ArrayIndex(0),
                AttributePathToken::ArrayIndex(10)
            ]
        );
    }

    #[test]
    fn tokenize_empty() {
        assert!(AttributePath::tokenize("", None).unwrap().is_empty());
        assert!(AttributePath::tokenize("/", None).unwrap().is_empty());

        let path = AttributePath::tokenize("/", Some(json!({"a": 1}))).unwrap();
        assert_eq!(path.tokens(), &[AttributePathToken::Leaf(json!({"a": 1}))]);
        assert!(path.steps().is_empty());
    }

    #[test]
    fn tokenize_leaf() {
        let path = AttributePath::tokenize("a/[1]", Some(json!("x"))).unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.leaf(), Some(&json!("x")));
        assert_eq!(path.steps().len(), 2);
        assert_eq!(path.child(1), Some(&AttributePathToken::Leaf(json!("x"))));
        assert_eq!(path.parent(2), Some(&AttributePathToken::ArrayIndex(1)));
        assert_eq!(path.parent(0), None);
        assert_eq!(path.child(2), None);
        assert_eq!(path.to_string(), "a/[1]");
    }

    #[test]
    fn tokenize_escapes() {
        let path = AttributePath::tokenize("a\\/b/\\[0\\]/c\\\\", None).unwrap();
        assert_eq!(path.tokens(), &[key("a/b"), key("[0]"), key("c\\")]);
        assert_eq!(path.to_string(), "a\\/b/\\[0\\]/c\\\\");

        // non-numeric brackets are object keys
        let path = AttributePath::parse("[x]/[]", None).unwrap();
        assert_eq!(path.tokens(), &[key("[x]"), key("[]")]);
    }

    #[test]
    fn tokenize_index_too_large() {
        assert!(matches!(
            AttributePath::tokenize("[99999999999999999999999]", None),
            Err(AttributeError::InvalidPath(_))
        ));
    }

    #[test]
    fn parse_normalizes() {
        let path = AttributePath::parse("/a/./b[2]/../c", None).unwrap();
        assert_eq!(path.tokens(), &[key("a"), key("b"), key("c")]);
        assert!(matches!(
            AttributePath::parse("a/../..", None),
            Err(AttributeError::Normalization(_))
        ));
    }

    #[test]
    fn from_url() {
        let url = N5Url::parse("file:/data.n5?group#scales[1]/x").unwrap();
        let path = AttributePath::from_url(&url, None).unwrap();
        assert_eq!(
            path.tokens(),
            &[key("scales"), AttributePathToken::ArrayIndex(1), key("x")]
        );

        let url = N5Url::parse("file:/data.n5?group").unwrap();
        assert!(AttributePath::from_url(&url, None).unwrap().is_empty());
    }

    #[test]
    fn from_tokens() {
        assert!(AttributePath::from_tokens(vec![key("a"), AttributePathToken::Leaf(json!(1))]).is_ok());
        assert!(matches!(
            AttributePath::from_tokens(vec![AttributePathToken::Leaf(json!(1)), key("a")]),
            Err(AttributeError::InvalidPath(_))
        ));
    }

    #[test]
    fn with_leaf() {
        let path = AttributePath::parse("a", None)
            .unwrap()
            .with_leaf([1u8, 2, 3])
            .unwrap();
        assert_eq!(path.leaf(), Some(&json!([1, 2, 3])));
        assert!(matches!(
            path.with_leaf("again"),
            Err(AttributeError::InvalidPath(_))
        ));
    }

    #[test]
    fn display_round_trip() {
        for key_text in ["plain", "a/b", "[0]", ".", "..", "x\\y", "]["] {
            let path = AttributePath::from_tokens(vec![key(key_text)]).unwrap();
            let reparsed = AttributePath::parse(&path.to_string(), None).unwrap();
            assert_eq!(reparsed, path, "{key_text}");
        }
    }
}
