//! Race-specific error types.
//!
//! The per-tick simulation never fails: out-of-range state is clamped in place.
//! Errors only arise at the edges, when configuration is loaded or when a
//! catalog is queried with an identifier it does not know.  The latter is a
//! data bug, so lookups also `debug_assert!` to fail loudly in development
//! builds.

use std::fmt;

/// Top-level error enum for the race core.
#[derive(Debug, Clone, PartialEq)]
pub enum RaceError {
    /// A base car id was not found in the catalog.
    UnknownCar {
        /// The id that was requested.
        id: String,
    },

    /// An upgrade slot name did not match any catalog slot.
    UnknownUpgradeSlot {
        /// The name that was parsed.
        name: String,
    },

    /// The campaign has no events, so no order can be resolved.
    UnknownEvent {
        /// The requested campaign order.
        order: i64,
    },

    /// Configuration value is outside its safe operating range.
    InvalidConfig {
        /// Name of the field (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },

    /// `assets/race.toml` could not be parsed.
    ConfigParse(String),
}

impl fmt::Display for RaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaceError::UnknownCar { id } => write!(f, "unknown base car '{}'", id),
            RaceError::UnknownUpgradeSlot { name } => {
                write!(f, "unknown upgrade slot '{}'", name)
            }
            RaceError::UnknownEvent { order } => {
                write!(f, "no campaign event for order {}", order)
            }
            RaceError::InvalidConfig {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "config value '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
            RaceError::ConfigParse(msg) => write!(f, "failed to parse race config: {}", msg),
        }
    }
}

impl std::error::Error for RaceError {}

/// Convenience alias: a `Result` using `RaceError` as the error type.
pub type RaceResult<T> = Result<T, RaceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_value() {
        let err = RaceError::InvalidConfig {
            name: "zone_span",
            value: 2.0,
            safe_range: "(0.0, 1.0)",
        };
        let text = err.to_string();
        assert!(text.contains("zone_span"));
        assert!(text.contains("(0.0, 1.0)"));
    }
}
