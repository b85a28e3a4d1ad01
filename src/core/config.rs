//! Engine configuration.
//!
//! Games configure the engine once at setup. The defaults reproduce the
//! standard resolution behavior; games only touch them to tune limits.

use serde::{Deserialize, Serialize};

/// Widest numeric range the feasibility search will enumerate.
pub const DEFAULT_UNBOUNDED_THRESHOLD: i64 = 100;

/// Lower bound used by numeric selections that declare no minimum.
pub const DEFAULT_NUMBER_MIN: i64 = 1;

/// Engine-wide settings.
///
/// ```
/// use rust_tabletop::core::EngineConfig;
///
/// let config = EngineConfig::default().with_unbounded_threshold(20);
/// assert_eq!(config.unbounded_threshold, 20);
/// assert!(config.log_messages);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Numeric selections spanning more values than this are unbounded:
    /// never enumerated, always presented as free entry.
    pub unbounded_threshold: i64,

    /// Minimum of a numeric selection that leaves it unset.
    pub default_number_min: i64,

    /// Append interpolated action messages to the game log on completion.
    pub log_messages: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            unbounded_threshold: DEFAULT_UNBOUNDED_THRESHOLD,
            default_number_min: DEFAULT_NUMBER_MIN,
            log_messages: true,
        }
    }
}

impl EngineConfig {
    /// Set the enumerable numeric range width.
    #[must_use]
    pub fn with_unbounded_threshold(mut self, threshold: i64) -> Self {
        self.unbounded_threshold = threshold;
        self
    }

    /// Set the default numeric minimum.
    #[must_use]
    pub fn with_default_number_min(mut self, min: i64) -> Self {
        self.default_number_min = min;
        self
    }

    /// Disable the message log.
    #[must_use]
    pub fn without_messages(mut self) -> Self {
        self.log_messages = false;
        self
    }
}
