//! Configuration
//!
//! Validator settings are layered with figment: built-in defaults, then a
//! `.iterpat-validate.toml` file, then `ITERPAT_`-prefixed environment
//! variables.
//!
//! ```toml
//! debug = false
//! output_format = "human"
//!
//! [rule_sets]
//! iterator = true
//! iterable_aggregate = true
//! ```

mod settings;

pub use settings::{
    CONFIG_ENV_PREFIX, DEFAULT_CONFIG_FILENAME, OutputFormat, RuleSetToggles, SettingsLoader,
    ValidatorSettings,
};

use once_cell::sync::OnceCell;
use tracing::warn;

static DEBUG: OnceCell<bool> = OnceCell::new();

/// Fix the process-wide debug flag
///
/// Only the first call has an effect; later calls are logged and ignored.
/// Returns the value in force afterwards.
pub fn init_debug(enabled: bool) -> bool {
    let current = *DEBUG.get_or_init(|| enabled);
    if current != enabled {
        warn!(
            requested = enabled,
            current, "Debug flag already initialized, ignoring change"
        );
    }
    current
}

/// The process-wide debug flag, `false` until [`init_debug`] runs
pub fn debug_enabled() -> bool {
    DEBUG.get().copied().unwrap_or(false)
}
