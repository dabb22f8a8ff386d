//! URL addressing for N5 containers, groups, and attributes.
//!
//! An [`N5Url`] names three nested things at once:
//! - a container, such as a directory or a bucket (`file:/data/sample.n5`),
//! - a group within that container, after the first `?` (`?/volumes/raw`), and
//! - a path into the JSON attributes of that group, after the first `#` (`#resolution[0]`).
//!
//! Each component can be normalized with the [`normalize`] functions, which collapse `.` and `..` segments and honour `\` escapes.
//! Relative N5 URLs are resolved against a base with [`N5Url::resolve`], independently at the container, group, and attribute level.
//!
//! This crate does not perform any I/O.
//! Navigating and writing attribute documents is handled by the `n5_attributes` crate.
//!
//! ```
//! # use n5_url::N5Url;
//! let base = N5Url::parse("s3://bucket/sample.n5?volumes#scales").unwrap();
//! let url = base.resolve_str("?raw/../labels").unwrap();
//! assert_eq!(url.to_string(), "s3://bucket/sample.n5?volumes/raw/../labels");
//! assert_eq!(url.normalize_group_path().unwrap(), "volumes/labels");
//! ```
//!
//! ## Licence
//! `n5_url` is licensed under either of
//! - the Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> or
//! - the MIT license <http://opensource.org/licenses/MIT>, at your option.
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod address;
pub mod normalize;
mod resolve;

pub use address::{N5Url, ParseError};
pub use normalize::NormalizationError;
