/// Rounds `value` to the nearest multiple of `unit`, halves away from zero.
///
/// Units of 1 or less leave the value unchanged.
///
/// # Example
/// ```
/// use tatekae_domain::services::round_to_unit;
///
/// assert_eq!(round_to_unit(1250, 100), 1300);
/// assert_eq!(round_to_unit(-1250, 100), -1300);
/// assert_eq!(round_to_unit(1249, 100), 1200);
/// ```
pub fn round_to_unit(value: i64, unit: i64) -> i64 {
    if unit <= 1 {
        return value;
    }
    let quotient = value / unit;
    let remainder = (value % unit).abs();
    let quotient = if remainder * 2 >= unit {
        quotient + value.signum()
    } else {
        quotient
    };
    quotient * unit
}

/// Rounds the magnitude of `value` up to the next multiple of `unit`.
pub fn round_up_to_unit(value: i64, unit: i64) -> i64 {
    if unit <= 1 {
        return value;
    }
    let quotient = value / unit;
    let quotient = if value % unit != 0 {
        quotient + value.signum()
    } else {
        quotient
    };
    quotient * unit
}
