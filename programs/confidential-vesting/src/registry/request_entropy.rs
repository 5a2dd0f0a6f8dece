use anchor_lang::prelude::*;

use crate::constants::ENTROPY_TAG_DOMAIN;
use crate::engine::CiphertextStore;
use crate::events::EventSink;
use crate::gateway::EntropyProvider;
use crate::registry::ScheduleRegistry;
use crate::state::RequestId;

impl<S: CiphertextStore, P: EntropyProvider, E: EventSink> ScheduleRegistry<S, P, E> {
    /// First phase of schedule creation: pay for entropy on behalf of
    /// `beneficiary`. Only `caller` may later consume the request.
    pub fn request_entropy(
        &mut self,
        beneficiary: Pubkey,
        fee: u64,
        caller: Pubkey,
        now: i64,
    ) -> Result<RequestId> {
        let request_id = self
            .gateway
            .request(entropy_tag(&beneficiary), fee, caller, beneficiary, now)?;

        self.events.publish(
            EntropyRequested {
                beneficiary,
                request_id,
            }
            .into(),
        );
        Ok(request_id)
    }
}

fn entropy_tag(beneficiary: &Pubkey) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new_derive_key(ENTROPY_TAG_DOMAIN);
    hasher.update(beneficiary.as_ref());
    *hasher.finalize().as_bytes()
}

#[event]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntropyRequested {
    pub beneficiary: Pubkey,
    pub request_id: RequestId,
}
