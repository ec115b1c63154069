use std::time::Duration;

use crate::error::{AppError, AppResult, ValidationError};

const SECS_PER_MIN: u64 = 60;
const SECS_PER_HOUR: u64 = 3_600;

/// Parses `<number>[ms|s|m|h]`; a bare number means seconds.
///
/// # Errors
///
/// Returns an error for an empty, malformed, overflowing, or zero duration.
pub(crate) fn parse_duration_arg(s: &str) -> AppResult<Duration> {
    let value = s.trim();
    if value.is_empty() {
        return Err(AppError::validation(ValidationError::DurationEmpty));
    }

    let split_at = value
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(value.len());
    let (digits, unit) = value.split_at(split_at);
    if digits.is_empty() {
        return Err(AppError::validation(
            ValidationError::InvalidDurationFormat {
                value: value.to_owned(),
            },
        ));
    }
    let number: u64 = digits.parse().map_err(|err| {
        AppError::validation(ValidationError::InvalidDurationNumber {
            value: value.to_owned(),
            source: err,
        })
    })?;

    let duration = match unit {
        "ms" => Duration::from_millis(number),
        "" | "s" => Duration::from_secs(number),
        "m" => Duration::from_secs(scale_secs(number, SECS_PER_MIN)?),
        "h" => Duration::from_secs(scale_secs(number, SECS_PER_HOUR)?),
        other => {
            return Err(AppError::validation(ValidationError::InvalidDurationUnit {
                unit: other.to_owned(),
            }));
        }
    };

    if duration.is_zero() {
        return Err(AppError::validation(ValidationError::DurationZero));
    }
    Ok(duration)
}

fn scale_secs(number: u64, factor: u64) -> AppResult<u64> {
    number
        .checked_mul(factor)
        .ok_or_else(|| AppError::validation(ValidationError::DurationOverflow))
}
