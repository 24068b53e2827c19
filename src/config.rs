//! # Runtime Configuration
//!
//! Environment-driven settings for the coroutine runtime.
//!
//! ### `OASGATE_STACK_SIZE`
//!
//! Stack size for handler and connection coroutines. Accepts decimal
//! (`32768`) or hexadecimal (`0x8000`). Unparseable values fall back to the
//! default of `0x8000` (32 KB).
//!
//! ```rust
//! use oasgate::config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! config.apply();
//! assert_eq!(may::config().get_stack_size(), config.stack_size);
//! ```

use std::env;
use tracing::{info, warn};

pub const DEFAULT_STACK_SIZE: usize = 0x8000;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Stack size for coroutines in bytes
    pub stack_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        let stack_size = match env::var("OASGATE_STACK_SIZE") {
            Ok(val) => parse_size(&val).unwrap_or_else(|| {
                warn!(value = %val, "Invalid OASGATE_STACK_SIZE, using default");
                DEFAULT_STACK_SIZE
            }),
            Err(_) => DEFAULT_STACK_SIZE,
        };
        RuntimeConfig { stack_size }
    }

    /// Push the settings into `may`. Call before spawning any coroutine.
    pub fn apply(&self) {
        may::config().set_stack_size(self.stack_size);
        info!(stack_size = self.stack_size, "Coroutine runtime configured");
    }
}

/// `0x8000` or `32768`.
pub fn parse_size(val: &str) -> Option<usize> {
    let val = val.trim();
    match val.strip_prefix("0x").or_else(|| val.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => val.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("0x8000"), Some(0x8000));
        assert_eq!(parse_size("0X10"), Some(16));
        assert_eq!(parse_size("16384"), Some(16384));
        assert_eq!(parse_size("lots"), None);
    }

    #[test]
    fn test_default() {
        assert_eq!(RuntimeConfig::default().stack_size, 0x8000);
    }
}
