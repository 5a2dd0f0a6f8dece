use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::error::VestingError;
use crate::state::RequestId;

/// External randomness provider, consulted by the gateway.
pub trait EntropyProvider {
    /// Published fee for one request.
    fn fee(&self) -> u64;

    fn request_entropy(&mut self, tag: [u8; 32], payment: u64) -> Result<RequestId>;

    fn is_request_fulfilled(&self, request_id: RequestId) -> bool;
}

#[derive(Clone, Debug)]
struct ScriptedRequest {
    tag: [u8; 32],
    randomness: Option<[u8; 32]>,
}

/// Provider whose fulfillment is driven explicitly through [`Self::fulfill`].
///
/// Ids are assigned sequentially from 1. Fulfilled randomness is the blake3
/// hash of the request tag and id.
#[derive(Clone, Debug)]
pub struct ScriptedEntropyProvider {
    fee: u64,
    next_id: u64,
    collected: u64,
    requests: BTreeMap<RequestId, ScriptedRequest>,
}

impl ScriptedEntropyProvider {
    pub fn new(fee: u64) -> Self {
        Self {
            fee,
            next_id: 1,
            collected: 0,
            requests: BTreeMap::new(),
        }
    }

    /// Mark `request_id` fulfilled. Returns false for unknown ids.
    pub fn fulfill(&mut self, request_id: RequestId) -> bool {
        let Some(req) = self.requests.get_mut(&request_id) else {
            return false;
        };
        if req.randomness.is_none() {
            let mut hasher = blake3::Hasher::new();
            hasher.update(&req.tag);
            hasher.update(&request_id.0.to_le_bytes());
            req.randomness = Some(*hasher.finalize().as_bytes());
        }
        true
    }

    pub fn randomness(&self, request_id: RequestId) -> Option<[u8; 32]> {
        self.requests.get(&request_id).and_then(|r| r.randomness)
    }

    pub fn collected_fees(&self) -> u64 {
        self.collected
    }
}

impl EntropyProvider for ScriptedEntropyProvider {
    fn fee(&self) -> u64 {
        self.fee
    }

    fn request_entropy(&mut self, tag: [u8; 32], payment: u64) -> Result<RequestId> {
        require!(payment >= self.fee, VestingError::InsufficientFee);
        let id = RequestId(self.next_id);
        self.next_id = self.next_id.checked_add(1).ok_or(VestingError::MathOverflow)?;
        self.collected = self.collected.checked_add(payment).ok_or(VestingError::MathOverflow)?;
        self.requests.insert(id, ScriptedRequest { tag, randomness: None });
        Ok(id)
    }

    fn is_request_fulfilled(&self, request_id: RequestId) -> bool {
        self.randomness(request_id).is_some()
    }
}
