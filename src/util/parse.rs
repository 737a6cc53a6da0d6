use chrono::{DateTime, Duration, FixedOffset, NaiveTime, Utc};

use crate::error::{draft::ValidationError, internal::InternalError, AppError};

/// Parses a u64 value from String
///
/// # Arguments
/// - `value` - The String to attempt to parse into `u64`
///
/// # Returns
/// - `Ok(u64)` - Successfully parsed String to `u64`
/// - `Err(AppError::InternalErr(ParseStringId))` - Failed to parse
///   the string as a u64
pub fn parse_u64_from_string(value: String) -> Result<u64, AppError> {
    let result = value
        .parse::<u64>()
        .map_err(|e| InternalError::ParseStringId { value, source: e })?;

    Ok(result)
}

/// Parses an optional stored ID, passing `None` through.
pub fn parse_optional_u64(value: Option<String>) -> Result<Option<u64>, AppError> {
    value.map(parse_u64_from_string).transpose()
}

/// Resolves a typed `HH:mm` (or `HH:mm:ss`) start time to an absolute instant.
///
/// The time is read as wall-clock time in the fixed `offset_minutes` zone. A time that
/// has already passed today refers to the same time tomorrow. A missing time means now.
///
/// # Arguments
/// - `input` - Raw option value from the command, if supplied
/// - `now` - Current instant
/// - `offset_minutes` - Offset of the community's timezone from UTC
///
/// # Returns
/// - `Ok(DateTime<Utc>)` - Resolved start time, never in the past
/// - `Err(ValidationError::InvalidStartTime)` - Input is not a valid time of day
pub fn parse_start_time(
    input: Option<&str>,
    now: DateTime<Utc>,
    offset_minutes: i32,
) -> Result<DateTime<Utc>, ValidationError> {
    let Some(raw) = input.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(now);
    };

    let invalid = || ValidationError::InvalidStartTime(raw.to_string());

    let time = NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| invalid())?;
    let offset = FixedOffset::east_opt(offset_minutes * 60).ok_or_else(invalid)?;

    let local_date = now.with_timezone(&offset).date_naive();
    let candidate = local_date
        .and_time(time)
        .and_local_timezone(offset)
        .single()
        .ok_or_else(invalid)?
        .with_timezone(&Utc);

    if candidate < now {
        Ok(candidate + Duration::days(1))
    } else {
        Ok(candidate)
    }
}
