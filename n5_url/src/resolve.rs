//! Relative N5 URL resolution.
//!
//! Resolution follows relative URI reference resolution, but applies it separately at the container, group, and attribute level.
//! A relative group is resolved against the group of the base, and a relative attribute against the attribute of the base.

use crate::{N5Url, ParseError};

/// Write `relative` resolved against `base` for a group or attribute component with `marker` (`?` or `#`).
///
/// An absolute `relative` replaces `base`, a non-empty one is appended to it, and an empty one keeps it.
fn push_component(resolved: &mut String, marker: char, base: Option<&str>, relative: &str) {
    resolved.push(marker);
    match base {
        Some(base) if relative.is_empty() => resolved.push_str(base),
        Some(base) if !relative.starts_with('/') => {
            resolved.push_str(base);
            resolved.push('/');
            resolved.push_str(relative);
        }
        _ => resolved.push_str(relative),
    }
}

impl N5Url {
    /// Resolve a `relative` N5 URL against this URL.
    ///
    /// - If `relative` has a scheme, it is returned unchanged.
    /// - If `relative` has an authority, its authority, path, group, and attribute are used with the scheme of this URL.
    /// - If `relative` has a path, it replaces the path of this URL if absolute, otherwise it is appended to it.
    ///   The group and attribute of `relative` are used.
    /// - Otherwise, the group of `relative` is resolved against the group of this URL.
    ///   If `relative` has no group, its attribute is resolved against the attribute of this URL.
    ///
    /// ```
    /// # use n5_url::N5Url;
    /// let base = N5Url::parse("file:/root?group1").unwrap();
    /// let relative = N5Url::parse("?sub").unwrap();
    /// assert_eq!(base.resolve(&relative).unwrap().to_string(), "file:/root?group1/sub");
    /// ```
    ///
    /// # Errors
    /// Returns a [`ParseError`] if the resolved URL is not valid.
    pub fn resolve(&self, relative: &N5Url) -> Result<N5Url, ParseError> {
        if relative.scheme().is_some() {
            return Ok(relative.clone());
        }

        let mut resolved = String::new();
        if let Some(scheme) = self.scheme() {
            resolved.push_str(scheme);
            resolved.push(':');
        }

        if let Some(authority) = relative.authority() {
            resolved.push_str("//");
            resolved.push_str(authority);
            resolved.push_str(relative.path());
            resolved.push_str(&relative.group_part());
            resolved.push_str(&relative.attribute_part());
        } else {
            if let Some(authority) = self.authority() {
                resolved.push_str("//");
                resolved.push_str(authority);
            }
            if !relative.path().is_empty() {
                if !relative.is_absolute() && !self.path().is_empty() {
                    resolved.push_str(self.path());
                    if !self.path().ends_with('/') {
                        resolved.push('/');
                    }
                } else if self.authority().is_some() && !relative.path().starts_with('/') {
                    // the path must be separated from the authority
                    resolved.push('/');
                }
                resolved.push_str(relative.path());
                resolved.push_str(&relative.group_part());
                resolved.push_str(&relative.attribute_part());
            } else {
                resolved.push_str(self.path());
                if let Some(group) = relative.group_path() {
                    push_component(&mut resolved, '?', self.group_path(), group);
                    resolved.push_str(&relative.attribute_part());
                } else {
                    resolved.push_str(&self.group_part());
                    if let Some(attribute) = relative.attribute_path() {
                        push_component(&mut resolved, '#', self.attribute_path(), attribute);
                    } else {
                        resolved.push_str(&self.attribute_part());
                    }
                }
            }
        }

        let resolved = N5Url::parse(&resolved)?;
        log::trace!("Resolved {relative} against {self} as {resolved}");
        Ok(resolved)
    }

    /// Parse `relative` and resolve it against this URL.
    ///
    /// See [`N5Url::resolve`].
    ///
    /// # Errors
    /// Returns a [`ParseError`] if `relative` or the resolved URL is not valid.
    pub fn resolve_str(&self, relative: &str) -> Result<N5Url, ParseError> {
        self.resolve(&N5Url::parse(relative)?)
    }
}
