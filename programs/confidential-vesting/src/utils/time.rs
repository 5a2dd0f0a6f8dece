//! Plaintext time arithmetic over the public schedule fields.
//! - vesting window is [start, start + duration)
//! - a schedule has started once now >= start (inclusive)

use crate::error::VestingError;

pub fn has_started(now_ts: i64, start_ts: i64) -> bool {
    now_ts >= start_ts
}

/// End of the vesting window, start + duration.
pub fn vesting_end(start_ts: i64, duration: u64) -> Result<i64, VestingError> {
    let duration = i64::try_from(duration).map_err(|_| VestingError::MathOverflow)?;
    start_ts
        .checked_add(duration)
        .ok_or(VestingError::MathOverflow)
}

/// True if now is at or after the vesting end.
pub fn is_after_vesting_end(now_ts: i64, start_ts: i64, duration: u64) -> Result<bool, VestingError> {
    if !has_started(now_ts, start_ts) {
        return Ok(false);
    }
    Ok(now_ts >= vesting_end(start_ts, duration)?)
}
