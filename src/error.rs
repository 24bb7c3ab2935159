use std::error::Error;
use std::fmt;

/// Errors surfaced at the three public entry points.
///
/// Nothing inside a scope calculator returns this type for data-shape
/// problems: a calculator skips the offending input and records a
/// [`crate::models::DataGap`] instead, keeping partial facilities
/// computable. Only malformed/out-of-range input, an unresolvable
/// refrigerant lookup, and a Monte Carlo run-count below the minimum
/// are unrecoverable.
#[derive(Debug, Clone, PartialEq)]
pub enum CoreError {
    ValidationFailed(String),
    UnknownRefrigerant(String),
    MonteCarloDegenerate { requested: usize, minimum: usize },
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CoreError::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            CoreError::UnknownRefrigerant(name) => {
                write!(f, "unknown refrigerant: {}", name)
            }
            CoreError::MonteCarloDegenerate { requested, minimum } => write!(
                f,
                "monte carlo run count {} below minimum {}",
                requested, minimum
            ),
        }
    }
}

impl Error for CoreError {}

pub type CoreResult<T> = Result<T, CoreError>;

pub fn validate_positive(value: f64, field: &str) -> CoreResult<()> {
    if value < 0.0 {
        return Err(CoreError::ValidationFailed(format!(
            "{} must be >= 0, got {}",
            field, value
        )));
    }
    Ok(())
}

pub fn validate_sqft(square_feet: f64) -> CoreResult<()> {
    if !(square_feet > 0.0) {
        return Err(CoreError::ValidationFailed(format!(
            "square_feet must be > 0, got {}",
            square_feet
        )));
    }
    Ok(())
}

pub fn validate_unit_fraction(value: f64, field: &str) -> CoreResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(CoreError::ValidationFailed(format!(
            "{} must be within [0, 1], got {}",
            field, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_quantity() {
        assert!(validate_positive(-1.0, "quantity").is_err());
        assert!(validate_positive(0.0, "quantity").is_ok());
    }

    #[test]
    fn rejects_zero_or_negative_sqft() {
        assert!(validate_sqft(0.0).is_err());
        assert!(validate_sqft(-100.0).is_err());
        assert!(validate_sqft(1.0).is_ok());
    }

    #[test]
    fn rejects_leak_rate_above_one() {
        assert!(validate_unit_fraction(1.5, "leak_rate").is_err());
        assert!(validate_unit_fraction(0.1, "leak_rate").is_ok());
    }

    #[test]
    fn display_messages_are_human_readable() {
        let e = CoreError::MonteCarloDegenerate {
            requested: 10,
            minimum: 100,
        };
        assert_eq!(
            e.to_string(),
            "monte carlo run count 10 below minimum 100"
        );
    }
}
