use anchor_lang::prelude::*;

/// Error codes for the confidential vesting ledger.
#[error_code]
pub enum VestingError {
    #[msg("Input proof does not authenticate the external ciphertext")]
    InvalidProof,

    #[msg("Unauthorized: caller or engine lacks access")]
    Unauthorized,

    #[msg("Fee is below the entropy provider's published fee")]
    InsufficientFee,

    #[msg("Entropy request is not fulfilled yet")]
    NotReady,

    #[msg("Unknown or already consumed entropy request")]
    UnknownRequest,

    #[msg("Invalid beneficiary (null identity)")]
    InvalidBeneficiary,

    #[msg("Schedule already exists for beneficiary")]
    ScheduleExists,

    #[msg("Schedule not found")]
    ScheduleNotFound,

    #[msg("Release called before start timestamp")]
    NotStarted,

    #[msg("Invalid duration (must be > 0)")]
    InvalidDuration,

    #[msg("Math overflow")]
    MathOverflow,
}
