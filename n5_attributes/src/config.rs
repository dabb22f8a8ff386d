//! `n5_attributes` global configuration options.

use std::sync::{OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Global configuration options for the `n5_attributes` crate.
///
/// Retrieve the global [`Config`] with [`global_config`] and modify it with [`global_config_mut`].
///
/// ## Numeric Array Fill
/// > default: [`true`]
///
/// When an attribute is written to an array index beyond the end of the array, the array is padded up to that index.
/// If enabled and the value written is a number, the padding is `0`, otherwise it is `null`.
///
/// For example, writing `7` to `x[3]` of `{}` produces `{"x": [0, 0, 0, 7]}` if enabled, or `{"x": [null, null, null, 7]}` if disabled.
///
/// This can be overridden per write with [`MaterializeOptions`](crate::MaterializeOptions).
#[derive(Debug)]
pub struct Config {
    numeric_array_fill: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            numeric_array_fill: true,
        }
    }
}

impl Config {
    /// Get the [numeric array fill](#numeric-array-fill) configuration.
    #[must_use]
    pub fn numeric_array_fill(&self) -> bool {
        self.numeric_array_fill
    }

    /// Set the [numeric array fill](#numeric-array-fill) configuration.
    pub fn set_numeric_array_fill(&mut self, numeric_array_fill: bool) {
        self.numeric_array_fill = numeric_array_fill;
    }
}

static CONFIG: OnceLock<RwLock<Config>> = OnceLock::new();

/// Returns a reference to the global `n5_attributes` configuration.
///
/// # Panics
/// This function panics if the underlying lock has been poisoned and might panic if the global config is already held by the current thread.
pub fn global_config() -> RwLockReadGuard<'static, Config> {
    CONFIG
        .get_or_init(|| RwLock::new(Config::default()))
        .read()
        .unwrap()
}

/// Returns a mutable reference to the global `n5_attributes` configuration.
///
/// # Panics
/// This function panics if the underlying lock has been poisoned and might panic if the global config is already held by the current thread.
pub fn global_config_mut() -> RwLockWriteGuard<'static, Config> {
    CONFIG
        .get_or_init(|| RwLock::new(Config::default()))
        .write()
        .unwrap()
}
