use rust_decimal::Decimal;
use validator::ValidationError;

pub fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("must not be negative".into());
        return Err(err);
    }
    Ok(())
}

/// Widest value a `NUMERIC(5, 2)` weight or option score column holds.
const QUESTION_AMOUNT_LIMIT: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);
/// Widest value a `NUMERIC(8, 2)` rule bound column holds.
const RULE_BOUND_LIMIT: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);
const MAX_SCALE: u32 = 2;

fn fits_column(value: &Decimal, limit: Decimal, code: &'static str) -> Result<(), ValidationError> {
    if value.normalize().scale() > MAX_SCALE {
        let mut err = ValidationError::new(code);
        err.message = Some("at most two decimal places".into());
        return Err(err);
    }
    if value.abs() >= limit {
        let mut err = ValidationError::new(code);
        err.message = Some(format!("must be below {limit}").into());
        return Err(err);
    }
    Ok(())
}

/// Question weights and option scores: `0 <= value < 1000` with at most two decimals, so
/// every store keeps exactly what scoring reads.
pub fn question_amount(value: &Decimal) -> Result<(), ValidationError> {
    non_negative(value)?;
    fits_column(value, QUESTION_AMOUNT_LIMIT, "question_amount")
}

/// Scoring rule bounds: `|value| < 1_000_000` with at most two decimals.
pub fn rule_bound(value: &Decimal) -> Result<(), ValidationError> {
    fits_column(value, RULE_BOUND_LIMIT, "rule_bound")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_negative_accepts_zero_and_rejects_negatives() {
        assert!(non_negative(&Decimal::ZERO).is_ok());
        assert!(non_negative(&Decimal::new(150, 2)).is_ok());
        assert!(non_negative(&Decimal::new(-1, 1)).is_err());
    }

    #[test]
    fn question_amount_limits_scale_and_magnitude() {
        assert!(question_amount(&Decimal::new(123, 2)).is_ok());
        assert!(question_amount(&Decimal::new(800, 2)).is_ok());
        assert!(question_amount(&Decimal::new(1000, 3)).is_ok());
        assert!(question_amount(&Decimal::new(99999, 2)).is_ok());
        assert!(question_amount(&Decimal::new(1234, 3)).is_err());
        assert!(question_amount(&Decimal::new(8555, 3)).is_err());
        assert!(question_amount(&Decimal::from(1000)).is_err());
        assert!(question_amount(&Decimal::MAX).is_err());
        assert!(question_amount(&Decimal::new(-5, 1)).is_err());
    }

    #[test]
    fn rule_bound_allows_negatives_within_range() {
        assert!(rule_bound(&Decimal::new(-2050, 2)).is_ok());
        assert!(rule_bound(&Decimal::from(999_999)).is_ok());
        assert!(rule_bound(&Decimal::from(1_000_000)).is_err());
        assert!(rule_bound(&Decimal::new(1005, 3)).is_err());
    }
}
