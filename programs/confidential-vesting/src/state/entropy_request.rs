use anchor_lang::prelude::*;

/// Provider-assigned identifier of an entropy request.
#[derive(
    AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct RequestId(pub u64);

/// Pending entropy request recorded by the gateway.
#[account]
#[derive(Debug, PartialEq, Eq)]
pub struct EntropyRequest {
    pub request_id: RequestId,
    /// Only this identity may consume the request.
    pub requester: Pubkey,
    /// Beneficiary the request was made for.
    pub beneficiary: Pubkey,
    pub requested_at: i64,
}

/// Lifecycle of an entropy request as observed by the gateway.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestStatus {
    /// Never recorded by this gateway.
    Unknown,
    /// Recorded; provider has not fulfilled it.
    Pending,
    /// Recorded and fulfilled; may be consumed once.
    Fulfilled,
    /// Consumed by a schedule creation.
    Consumed,
}
