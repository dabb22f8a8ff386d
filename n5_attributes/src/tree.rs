//! Navigating and materializing JSON attribute trees along an [`AttributePath`].

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{config::global_config, AttributeError, AttributePath, AttributePathToken};

/// The maximum number of elements appended to an array when materializing an index beyond its end.
pub const MAX_ARRAY_PADDING: usize = 1 << 20;

/// Options for [`AttributePath::materialize_opt`].
#[derive(Clone, Copy, Debug)]
pub struct MaterializeOptions {
    numeric_array_fill: bool,
}

impl Default for MaterializeOptions {
    fn default() -> Self {
        Self {
            numeric_array_fill: global_config().numeric_array_fill(),
        }
    }
}

impl MaterializeOptions {
    /// Return the numeric array fill setting.
    ///
    /// See [numeric array fill](crate::config::Config#numeric-array-fill).
    #[must_use]
    pub fn numeric_array_fill(&self) -> bool {
        self.numeric_array_fill
    }

    /// Set whether arrays are padded with `0` rather than `null` when a number is written.
    pub fn set_numeric_array_fill(&mut self, numeric_array_fill: bool) -> &mut Self {
        self.numeric_array_fill = numeric_array_fill;
        self
    }

    /// Set whether arrays are padded with `0` rather than `null` when a number is written.
    #[must_use]
    pub fn with_numeric_array_fill(mut self, numeric_array_fill: bool) -> Self {
        self.numeric_array_fill = numeric_array_fill;
        self
    }
}

fn json_kind(json: &Value) -> &'static str {
    match json {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl AttributePath {
    /// Navigate to the element at this path in the JSON tree `root`.
    ///
    /// Any leaf token is ignored.
    /// A `null` element is treated as absent.
    ///
    /// # Errors
    /// Returns
    /// - [`AttributeError::AttributeNotFound`] if `root` is [`None`] or a key or index along the path is not present, or
    /// - [`AttributeError::TypeMismatch`] if an element along the path is not the object or array the path steps into.
    pub fn navigate<'a>(&self, root: Option<&'a Value>) -> Result<&'a Value, AttributeError> {
        let Some(mut current) = root else {
            return Err(AttributeError::AttributeNotFound(self.to_string()));
        };
        for (depth, token) in self.steps().iter().enumerate() {
            let child = match (token, current) {
                (AttributePathToken::ObjectKey(key), Value::Object(object)) => object.get(key),
                (AttributePathToken::ArrayIndex(index), Value::Array(array)) => array.get(*index),
                (_, Value::Null) => None,
                (token, element) => {
                    return Err(AttributeError::TypeMismatch {
                        path: self.display_steps(depth),
                        expected: token.expected_kind(),
                        found: json_kind(element),
                    });
                }
            };
            current = child
                .ok_or_else(|| AttributeError::AttributeNotFound(self.display_steps(depth + 1)))?;
        }
        Ok(current)
    }

    /// Navigate to the element at this path in the JSON tree `root` and deserialize it.
    ///
    /// # Errors
    /// Returns an [`AttributeError`] if navigation fails or the element cannot be deserialized into `T`.
    pub fn navigate_as<T: DeserializeOwned>(&self, root: Option<&Value>) -> Result<T, AttributeError> {
        let element = self.navigate(root)?;
        Ok(T::deserialize(element)?)
    }

    /// Write the leaf of this path into the JSON tree `root`, creating any missing structure.
    ///
    /// Uses default [`MaterializeOptions`], see [`AttributePath::materialize_opt`].
    ///
    /// # Errors
    /// Returns [`AttributeError::InvalidPath`] if this path has no leaf or an index is too far beyond the end of an array.
    pub fn materialize(&self, root: Option<Value>) -> Result<Value, AttributeError> {
        self.materialize_opt(root, &MaterializeOptions::default())
    }

    /// Write the leaf of this path into the JSON tree `root`, creating any missing structure.
    ///
    /// The kind of each token decides what its parent element must be: an object for a key, or an array for an index.
    /// Missing elements are created.
    /// An existing element of the wrong kind is replaced rather than merged, for example, writing `a/b` into `{"a": 5}` produces `{"a": {"b": ...}}`.
    /// Arrays are padded up to the index being written, see [numeric array fill](crate::config::Config#numeric-array-fill).
    /// At most [`MAX_ARRAY_PADDING`] elements are appended to a single array.
    ///
    /// If the path has no steps, the leaf replaces `root`.
    ///
    /// Returns the root of the tree, which is newly created if `root` is [`None`].
    ///
    /// # Errors
    /// Returns [`AttributeError::InvalidPath`] if this path has no leaf or an index would pad an array by more than [`MAX_ARRAY_PADDING`] elements.
    pub fn materialize_opt(
        &self,
        root: Option<Value>,
        options: &MaterializeOptions,
    ) -> Result<Value, AttributeError> {
        let Some(leaf) = self.leaf() else {
            return Err(AttributeError::InvalidPath(format!(
                "attribute path {self} has no leaf value to write"
            )));
        };
        let Some(first) = self.steps().first() else {
            return Ok(leaf.clone());
        };
        let mut root = root.unwrap_or(Value::Null);
        self.replace_incompatible(&mut root, first, 0);
        self.materialize_step(&mut root, 0, leaf, options)?;
        Ok(root)
    }

    /// Replace `element` at `depth` with an empty element if `token` cannot step into it.
    fn replace_incompatible(&self, element: &mut Value, token: &AttributePathToken, depth: usize) {
        if !token.is_compatible(element) {
            if !element.is_null() {
                log::debug!(
                    "Replacing {} at attribute path `{}` with an empty {}",
                    json_kind(element),
                    self.display_steps(depth),
                    token.expected_kind()
                );
            }
            *element = token.empty_element();
        }
    }

    fn materialize_step(
        &self,
        element: &mut Value,
        depth: usize,
        leaf: &Value,
        options: &MaterializeOptions,
    ) -> Result<(), AttributeError> {
        let steps = self.steps();
        let next = steps.get(depth + 1);
        let child = match (&steps[depth], element) {
            (AttributePathToken::ObjectKey(key), Value::Object(object)) => {
                if next.is_none() {
                    object.insert(key.clone(), leaf.clone());
                    return Ok(());
                }
                object.entry(key.clone()).or_insert(Value::Null)
            }
            (AttributePathToken::ArrayIndex(index), Value::Array(array)) => {
                let index = *index;
                if array.len() <= index {
                    let len = index
                        .checked_add(1)
                        .filter(|len| len - array.len() <= MAX_ARRAY_PADDING)
                        .ok_or_else(|| {
                            AttributeError::InvalidPath(format!(
                                "array index {index} at attribute path `{}` exceeds the maximum padding of {MAX_ARRAY_PADDING} elements",
                                self.display_steps(depth)
                            ))
                        })?;
                    let fill = if next.is_none() && options.numeric_array_fill && leaf.is_number() {
                        Value::from(0)
                    } else {
                        Value::Null
                    };
                    array.resize(len, fill);
                }
                if next.is_none() {
                    array[index] = leaf.clone();
                    return Ok(());
                }
                &mut array[index]
            }
            (token, element) => {
                return Err(AttributeError::TypeMismatch {
                    path: self.display_steps(depth),
                    expected: token.expected_kind(),
                    found: json_kind(element),
                });
            }
        };
        if let Some(next) = next {
            self.replace_incompatible(child, next, depth + 1);
        }
        self.materialize_step(child, depth + 1, leaf, options)
    }
}
