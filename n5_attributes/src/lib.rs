//! Attribute path navigation and materialization for N5 attribute documents.
//!
//! The attributes of an N5 group are stored in a JSON document.
//! The attribute component of an [`N5Url`](n5_url::N5Url) (after the `#`) addresses an element within that document, for example `scales[0]/factor`.
//!
//! An [`AttributePath`] is a tokenized attribute path which can
//! - [navigate](AttributePath::navigate) an existing document to read an element, or
//! - [materialize](AttributePath::materialize) a leaf value into a document, creating or replacing any structure along the way.
//!
//! ```
//! # use n5_attributes::AttributePath;
//! # use serde_json::json;
//! let write = AttributePath::parse("scales[1]/factor", Some(json!(2))).unwrap();
//! let document = write.materialize(Some(json!({"units": "nm"}))).unwrap();
//! assert_eq!(document, json!({"units": "nm", "scales": [null, {"factor": 2}]}));
//!
//! let read = AttributePath::parse("scales[1]/factor", None).unwrap();
//! assert_eq!(read.navigate(Some(&document)).unwrap(), &json!(2));
//! ```
//!
//! The [`document`] functions read and write attributes addressed by an [`N5Url`](n5_url::N5Url) directly.
//!
//! ## Licence
//! `n5_attributes` is licensed under either of
//! - the Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> or
//! - the MIT license <http://opensource.org/licenses/MIT>, at your option.
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod attribute_path;
pub mod config;
pub mod document;
mod tree;

use std::sync::Arc;

use n5_url::NormalizationError;
use thiserror::Error;

pub use attribute_path::{AttributePath, AttributePathToken};
pub use tree::{MaterializeOptions, MAX_ARRAY_PADDING};

/// An attribute error.
#[derive(Debug, Clone, Error)]
pub enum AttributeError {
    /// An attribute along the path is not present.
    #[error("attribute `{0}` not found")]
    AttributeNotFound(String),
    /// An attribute along the path is not the object or array the path steps into.
    #[error("attribute `{path}` has type {found}, expected {expected}")]
    TypeMismatch {
        /// The path of the attribute.
        path: String,
        /// The kind of JSON element expected.
        expected: &'static str,
        /// The kind of JSON element found.
        found: &'static str,
    },
    /// The attribute path is structurally invalid for the operation.
    #[error("invalid attribute path: {0}")]
    InvalidPath(String),
    /// The attribute path could not be normalized.
    #[error(transparent)]
    Normalization(#[from] NormalizationError),
    /// An error serialising or deserialising JSON.
    #[error(transparent)]
    Serialization(#[from] Arc<serde_json::Error>),
}

impl From<serde_json::Error> for AttributeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(Arc::new(err))
    }
}
