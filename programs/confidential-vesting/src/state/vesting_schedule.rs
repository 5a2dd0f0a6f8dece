use anchor_lang::prelude::*;

use crate::state::Handle;

/// Per-beneficiary vesting schedule.
#[account]
#[derive(Default, Debug, PartialEq, Eq)]
pub struct VestingSchedule {
    /// Encrypted total entitlement.
    pub total_amount: Handle,
    /// Encrypted running sum of released amounts (monotonic).
    pub released_amount: Handle,
    /// Vesting start (Unix seconds).
    pub start_time: i64,
    /// Vesting window length in seconds.
    pub duration: u64,
    /// Set once on creation, never cleared.
    pub initialized: bool,
}

