//! error.rs — Configuration errors
//!
//! The core validates its configuration once, when a state is built or
//! reconfigured. A tick never fails; numerical trouble inside a tick is
//! recovered locally and surfaced through [`crate::sim::TickEvent`].

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be within 0..=1, got {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("stern chain share must be within 0..=100 %, got {0}")]
    ChainPercent(f64),

    #[error("{field} stretch allowance must be at least 1.0, got {value}")]
    StretchAllowance { field: &'static str, value: f64 },

    #[error("anchor at {anchor_cm} cm is closer to the dock than the boat length ({min_cm} cm)")]
    AnchorTooClose { anchor_cm: f64, min_cm: f64 },

    #[error("tick rate must be within 1..=1000 Hz, got {0}")]
    TickRate(f64),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Field checks shared by the config sections.
pub(crate) fn finite(field: &'static str, value: f64) -> ConfigResult<f64> {
    if value.is_finite() { Ok(value) } else { Err(ConfigError::NotFinite { field, value }) }
}

pub(crate) fn positive(field: &'static str, value: f64) -> ConfigResult<f64> {
    finite(field, value)?;
    if value > 0.0 { Ok(value) } else { Err(ConfigError::NotPositive { field, value }) }
}

pub(crate) fn non_negative(field: &'static str, value: f64) -> ConfigResult<f64> {
    finite(field, value)?;
    if value >= 0.0 { Ok(value) } else { Err(ConfigError::Negative { field, value }) }
}

pub(crate) fn unit_interval(field: &'static str, value: f64) -> ConfigResult<f64> {
    finite(field, value)?;
    if (0.0..=1.0).contains(&value) { Ok(value) } else { Err(ConfigError::OutOfRange { field, value }) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_checks() {
        assert_eq!(positive("x", 2.0), Ok(2.0));
        assert_eq!(positive("x", 0.0), Err(ConfigError::NotPositive { field: "x", value: 0.0 }));
        assert!(matches!(non_negative("y", f64::NAN), Err(ConfigError::NotFinite { .. })));
        assert_eq!(non_negative("y", 0.0), Ok(0.0));
    }

    #[test]
    fn messages_name_the_field() {
        let e = ConfigError::NotPositive { field: "boat_length_cm", value: -3.0 };
        assert_eq!(e.to_string(), "boat_length_cm must be greater than zero, got -3");
    }
}
