//! Two-phase entropy gate: request from the provider, then consume once the
//! provider reports fulfillment. Each request can be consumed exactly once and
//! only by the identity that made it.

pub mod provider;

pub use provider::{EntropyProvider, ScriptedEntropyProvider};

use std::collections::{BTreeMap, BTreeSet};

use anchor_lang::prelude::*;

use crate::error::VestingError;
use crate::state::{EntropyRequest, RequestId, RequestStatus};

pub struct RandomnessGateway<P> {
    provider: P,
    pending: BTreeMap<RequestId, EntropyRequest>,
    consumed: BTreeSet<RequestId>,
}

impl<P: EntropyProvider> RandomnessGateway<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            pending: BTreeMap::new(),
            consumed: BTreeSet::new(),
        }
    }

    /// Pay `fee` to the provider and record the pending request.
    pub fn request(
        &mut self,
        tag: [u8; 32],
        fee: u64,
        requester: Pubkey,
        beneficiary: Pubkey,
        now: i64,
    ) -> Result<RequestId> {
        require!(fee >= self.provider.fee(), VestingError::InsufficientFee);

        let request_id = self.provider.request_entropy(tag, fee)?;
        self.pending.insert(
            request_id,
            EntropyRequest {
                request_id,
                requester,
                beneficiary,
                requested_at: now,
            },
        );
        msg!("entropy request {} recorded for {}", request_id.0, requester);
        Ok(request_id)
    }

    pub fn is_fulfilled(&self, request_id: RequestId) -> bool {
        self.provider.is_request_fulfilled(request_id)
    }

    pub fn status(&self, request_id: RequestId) -> RequestStatus {
        if self.consumed.contains(&request_id) {
            RequestStatus::Consumed
        } else if !self.pending.contains_key(&request_id) {
            RequestStatus::Unknown
        } else if self.is_fulfilled(request_id) {
            RequestStatus::Fulfilled
        } else {
            RequestStatus::Pending
        }
    }

    /// Every check [`Self::consume`] makes, without consuming.
    pub fn ensure_consumable(&self, request_id: RequestId, caller: Pubkey) -> Result<&EntropyRequest> {
        require!(self.is_fulfilled(request_id), VestingError::NotReady);
        let request = self
            .pending
            .get(&request_id)
            .ok_or(VestingError::UnknownRequest)?;
        require_keys_eq!(request.requester, caller, VestingError::Unauthorized);
        Ok(request)
    }

    pub fn consume(&mut self, request_id: RequestId, caller: Pubkey) -> Result<EntropyRequest> {
        self.ensure_consumable(request_id, caller)?;
        let request = self
            .pending
            .remove(&request_id)
            .ok_or(VestingError::UnknownRequest)?;
        self.consumed.insert(request_id);
        msg!("entropy request {} consumed", request_id.0);
        Ok(request)
    }

    pub fn pending(&self, request_id: RequestId) -> Option<&EntropyRequest> {
        self.pending.get(&request_id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }
}
