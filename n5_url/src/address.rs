//! N5 URL addresses.

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::normalize::{normalize_attribute_path, normalize_path, NormalizationError};

/// An error parsing an [`N5Url`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The URL ends with an escape character that escapes nothing.
    #[error("dangling escape character at the end of {0}")]
    DanglingEscape(String),
    /// The URL has a `:` scheme delimiter with an empty scheme.
    #[error("missing scheme name in {0}")]
    MissingScheme(String),
    /// The URL has a scheme with invalid characters.
    #[error("invalid scheme name {0}")]
    InvalidScheme(String),
    /// The URL could not be converted to a [`url::Url`].
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    /// A component passed to [`N5Url::from_parts`] contains an unescaped delimiter of a later component.
    #[error("component {component} contains an unescaped `{delimiter}`")]
    UnescapedDelimiter {
        /// The component.
        component: String,
        /// The delimiter.
        delimiter: char,
    },
}

impl From<url::ParseError> for ParseError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

/// An N5 URL.
///
/// An N5 URL addresses a container, a group within that container, and a path into the attributes of the group:
/// ```text
/// [<scheme>:[//<authority>]][<path>][?<group>][#<attribute>]
/// ```
/// For example, `s3://bucket/data.n5?/volumes/raw#resolution[0]`.
///
/// The group and attribute components are either absent or present.
/// A present component may be empty, which is serialized as a bare `?` or `#`.
///
/// A `\` escapes the following character, so `?`, `#`, `/`, `[`, and `]` can appear literally in a component.
/// Components are stored raw, use the `normalize_*` methods for normalized paths.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct N5Url {
    scheme: Option<String>,
    authority: Option<String>,
    path: String,
    container: String,
    group: Option<String>,
    attribute: Option<String>,
}

/// Find the byte index of the first unescaped `target` in `s`.
fn find_unescaped(s: &str, target: char) -> Option<usize> {
    let mut escape = false;
    for (i, c) in s.char_indices() {
        if escape {
            escape = false;
        } else if c == '\\' {
            escape = true;
        } else if c == target {
            return Some(i);
        }
    }
    None
}

/// Split `s` at the first unescaped `delimiter`, excluding the delimiter.
fn split_unescaped(s: &str, delimiter: char) -> (&str, Option<&str>) {
    match find_unescaped(s, delimiter) {
        Some(i) => (&s[..i], Some(&s[i + delimiter.len_utf8()..])),
        None => (s, None),
    }
}

fn has_dangling_escape(s: &str) -> bool {
    let mut escape = false;
    for c in s.chars() {
        escape = !escape && c == '\\';
    }
    escape
}

/// Check that `component` has no unescaped `delimiters` and no dangling escape, so it is unchanged when joined with the components after it.
fn check_component(component: &str, delimiters: &[char]) -> Result<(), ParseError> {
    if has_dangling_escape(component) {
        return Err(ParseError::DanglingEscape(component.to_string()));
    }
    for &delimiter in delimiters {
        if find_unescaped(component, delimiter).is_some() {
            return Err(ParseError::UnescapedDelimiter {
                component: component.to_string(),
                delimiter,
            });
        }
    }
    Ok(())
}

/// Returns true if `scheme` is `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`.
fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Split a leading scheme from `s`.
///
/// A single letter scheme is a drive letter (e.g. `C:`) and is left as part of the path.
fn split_scheme(s: &str) -> Result<(Option<&str>, &str), ParseError> {
    let Some(colon) = s.find(|c: char| matches!(c, ':' | '/' | '\\')) else {
        return Ok((None, s));
    };
    if !s[colon..].starts_with(':') {
        return Ok((None, s));
    }
    let scheme = &s[..colon];
    if scheme.is_empty() {
        Err(ParseError::MissingScheme(s.to_string()))
    } else if scheme.len() == 1 && scheme.starts_with(|c: char| c.is_ascii_alphabetic()) {
        Ok((None, s))
    } else if is_valid_scheme(scheme) {
        Ok((Some(scheme), &s[colon + 1..]))
    } else {
        Err(ParseError::InvalidScheme(scheme.to_string()))
    }
}

impl N5Url {
    /// Parse an N5 URL.
    ///
    /// The attribute is the text after the first unescaped `#`, and the group is the text before it and after the first unescaped `?`.
    /// The remainder is the container, made up of an optional scheme, an optional `//` prefixed authority, and a path.
    ///
    /// # Errors
    /// Returns a [`ParseError`] if the URL has a malformed scheme or ends in a dangling escape.
    pub fn parse(url: &str) -> Result<Self, ParseError> {
        if has_dangling_escape(url) {
            return Err(ParseError::DanglingEscape(url.to_string()));
        }
        let (container, attribute) = split_unescaped(url, '#');
        let (container, group) = split_unescaped(container, '?');
        let (scheme, hierarchical) = split_scheme(container)?;
        let (authority, path) = match hierarchical.strip_prefix("//") {
            Some(rest) => {
                let end = find_unescaped(rest, '/').unwrap_or(rest.len());
                (Some(&rest[..end]), &rest[end..])
            }
            None => (None, hierarchical),
        };
        Ok(Self {
            scheme: scheme.map(str::to_string),
            authority: authority.map(str::to_string),
            path: path.to_string(),
            container: container.to_string(),
            group: group.map(str::to_string),
            attribute: attribute.map(str::to_string),
        })
    }

    /// Create an N5 URL from its container, group, and attribute components.
    ///
    /// A [`None`] group or attribute is absent from the URL, whereas an empty one is written as a bare `?` or `#`.
    ///
    /// The components are used as is, so the container must escape any `?` or `#` and the group any `#`.
    ///
    /// # Errors
    /// Returns a [`ParseError`] if
    /// - the container contains an unescaped `?` or `#`, or the group an unescaped `#`,
    /// - the container or group ends with a dangling escape, or
    /// - the composed URL is not valid.
    pub fn from_parts(
        container: Option<&str>,
        group: Option<&str>,
        attribute: Option<&str>,
    ) -> Result<Self, ParseError> {
        let container = container.unwrap_or_default();
        check_component(container, &['?', '#'])?;
        if let Some(group) = group {
            check_component(group, &['#'])?;
        }

        let mut url = container.to_string();
        if let Some(group) = group {
            url.push('?');
            url.push_str(group);
        }
        if let Some(attribute) = attribute {
            url.push('#');
            url.push_str(attribute);
        }
        Self::parse(&url)
    }

    /// Return the scheme, if present.
    #[must_use]
    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    /// Return the authority, if present.
    #[must_use]
    pub fn authority(&self) -> Option<&str> {
        self.authority.as_deref()
    }

    /// Return the path of the container, excluding any scheme and authority.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Return the container path, including any scheme and authority.
    #[must_use]
    pub fn container_path(&self) -> &str {
        &self.container
    }

    /// Return the raw group path, if present.
    #[must_use]
    pub fn group_path(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Return the raw attribute path, if present.
    #[must_use]
    pub fn attribute_path(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    /// Return the normalized container path.
    ///
    /// # Errors
    /// Returns a [`NormalizationError`] if the container path cannot be normalized.
    pub fn normalize_container_path(&self) -> Result<String, NormalizationError> {
        normalize_path(&self.container)
    }

    /// Return the normalized group path.
    ///
    /// An absent group normalizes to an empty path.
    ///
    /// # Errors
    /// Returns a [`NormalizationError`] if the group path cannot be normalized.
    pub fn normalize_group_path(&self) -> Result<String, NormalizationError> {
        normalize_path(self.group.as_deref().unwrap_or_default())
    }

    /// Return the normalized attribute path.
    ///
    /// An absent attribute normalizes to an empty path.
    ///
    /// # Errors
    /// Returns a [`NormalizationError`] if the attribute path cannot be normalized.
    pub fn normalize_attribute_path(&self) -> Result<String, NormalizationError> {
        normalize_attribute_path(self.attribute.as_deref().unwrap_or_default())
    }

    /// Returns true if the container path is absolute.
    ///
    /// A path is absolute if it starts with `/` or a drive letter prefix such as `C:`.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        let mut chars = self.path.chars();
        match (chars.next(), chars.next()) {
            (Some('/'), _) => true,
            (Some(drive), Some(':')) => drive.is_ascii_alphabetic(),
            _ => false,
        }
    }

    /// Convert the container to a [`url::Url`].
    ///
    /// # Errors
    /// Returns [`ParseError::InvalidUrl`] if the container has no scheme or is not a valid URL.
    pub fn container_url(&self) -> Result<url::Url, ParseError> {
        if self.scheme.is_none() {
            return Err(ParseError::InvalidUrl(format!(
                "container {} has no scheme",
                self.container
            )));
        }
        Ok(url::Url::parse(&self.container)?)
    }

    pub(crate) fn group_part(&self) -> String {
        self.group
            .as_ref()
            .map_or_else(String::new, |group| format!("?{group}"))
    }

    pub(crate) fn attribute_part(&self) -> String {
        self.attribute
            .as_ref()
            .map_or_else(String::new, |attribute| format!("#{attribute}"))
    }
}

impl fmt::Display for N5Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.container,
            self.group_part(),
            self.attribute_part()
        )
    }
}

impl FromStr for N5Url {
    type Err = ParseError;

    fn from_str(url: &str) -> Result<Self, Self::Err> {
        Self::parse(url)
    }
}

impl TryFrom<&str> for N5Url {
    type Error = ParseError;

    fn try_from(url: &str) -> Result<Self, Self::Error> {
        Self::parse(url)
    }
}

impl TryFrom<String> for N5Url {
    type Error = ParseError;

    fn try_from(url: String) -> Result<Self, Self::Error> {
        Self::parse(&url)
    }
}

impl From<N5Url> for String {
    fn from(url: N5Url) -> Self {
        url.to_string()
    }
}
