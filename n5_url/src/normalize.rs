//! Path normalization.
//!
//! Container, group, and attribute paths are normalized by collapsing `.` and `..` segments and dropping empty segments.
//! A backslash (`\`) escapes exactly the following character, so it is never treated as a delimiter or dot segment.
//!
//! There are two flavours:
//! - [`normalize_path`] treats `/` as the only delimiter and emits segments unescaped.
//! - [`normalize_attribute_path`] additionally treats `[` and `]` as delimiters so that `a[0]` becomes `a/[0]`.
//!   Escapes are retained in the output so that literal delimiters survive tokenization.

use derive_more::From;
use thiserror::Error;

/// A path could not be normalized, because a `..` segment had no preceding segment to remove.
#[derive(Clone, Debug, PartialEq, Eq, From, Error)]
#[error("cannot normalize path {0}: `..` has no parent segment")]
pub struct NormalizationError(String);

impl NormalizationError {
    /// Return the path that could not be normalized.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Plain,
    Attribute,
}

/// A path segment.
///
/// `literal` holds the unescaped text, `raw` the text with escapes retained.
#[derive(Default)]
struct Segment {
    literal: String,
    raw: String,
    escaped: bool,
}

impl Segment {
    fn push(&mut self, c: char) {
        self.literal.push(c);
        self.raw.push(c);
    }

    fn push_escaped(&mut self, c: char) {
        self.literal.push(c);
        self.raw.push('\\');
        self.raw.push(c);
        self.escaped = true;
    }

    fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

struct Normalizer<'a> {
    path: &'a str,
    segments: Vec<Segment>,
    current: Segment,
}

impl<'a> Normalizer<'a> {
    fn new(path: &'a str) -> Self {
        Self {
            path,
            segments: Vec::new(),
            current: Segment::default(),
        }
    }

    fn close(&mut self) -> Result<(), NormalizationError> {
        let segment = std::mem::take(&mut self.current);
        if segment.is_empty() {
            return Ok(());
        }
        if !segment.escaped {
            match segment.literal.as_str() {
                "." => return Ok(()),
                ".." => {
                    return self
                        .segments
                        .pop()
                        .map(|_| ())
                        .ok_or_else(|| NormalizationError(self.path.to_string()));
                }
                _ => {}
            }
        }
        self.segments.push(segment);
        Ok(())
    }

    fn run(mut self, mode: Mode) -> Result<String, NormalizationError> {
        let mut escape = false;
        for c in self.path.chars() {
            if escape {
                escape = false;
                self.current.push_escaped(c);
                continue;
            }
            match (c, mode) {
                ('\\', _) => escape = true,
                ('/', _) => self.close()?,
                ('[', Mode::Attribute) => {
                    self.close()?;
                    self.current.push('[');
                }
                (']', Mode::Attribute) => {
                    self.current.push(']');
                    self.close()?;
                }
                _ => self.current.push(c),
            }
        }
        // A dangling escape has nothing to escape, keep it literally
        if escape {
            self.current.push_escaped('\\');
        }
        self.close()?;

        let segments = self
            .segments
            .iter()
            .map(|segment| match mode {
                Mode::Plain => segment.literal.as_str(),
                Mode::Attribute => segment.raw.as_str(),
            })
            .collect::<Vec<_>>()
            .join("/");
        if self.path.starts_with('/') {
            Ok(format!("/{segments}"))
        } else {
            Ok(segments)
        }
    }
}

/// Normalize a container or group path.
///
/// `.` segments and empty segments are removed and `..` segments remove the preceding segment.
/// A leading `/` is retained.
/// Escaped characters are emitted without their escape, so `a\/b/c` normalizes to `a/b/c` where the first `/` was part of the segment `a/b`.
/// Normalization is therefore only idempotent for paths without escapes: `\..` normalizes to `..`, which cannot be normalized again.
///
/// ```
/// # use n5_url::normalize::normalize_path;
/// assert_eq!(normalize_path("/a/b/../c").unwrap(), "/a/c");
/// assert_eq!(normalize_path("./a/./b").unwrap(), "a/b");
/// ```
///
/// # Errors
/// Returns a [`NormalizationError`] if a `..` segment has no preceding segment to remove.
pub fn normalize_path(path: &str) -> Result<String, NormalizationError> {
    Normalizer::new(path).run(Mode::Plain)
}

/// Normalize an attribute path.
///
/// Behaves like [`normalize_path`], but `[` and `]` also delimit segments: `[` opens a new segment and `]` closes the current one.
/// As a result, array indices always form their own segment (`a/b[2]/c` normalizes to `a/b/[2]/c`).
///
/// Escapes are kept in the output, so normalization of an attribute path is idempotent.
///
/// # Errors
/// Returns a [`NormalizationError`] if a `..` segment has no preceding segment to remove.
pub fn normalize_attribute_path(path: &str) -> Result<String, NormalizationError> {
    Normalizer::new(path).run(Mode::Attribute)
}
