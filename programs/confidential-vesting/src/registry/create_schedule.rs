use anchor_lang::prelude::*;

use crate::constants::NULL_IDENTITY;
use crate::engine::CiphertextStore;
use crate::error::VestingError;
use crate::events::EventSink;
use crate::gateway::EntropyProvider;
use crate::registry::ScheduleRegistry;
use crate::state::{ExternalCiphertext, InputProof, RequestId, VestingSchedule};
use crate::utils::time;

impl<S: CiphertextStore, P: EntropyProvider, E: EventSink> ScheduleRegistry<S, P, E> {
    /// Second phase: consume a fulfilled entropy request and open the
    /// beneficiary's schedule with an encrypted total starting at `now`.
    #[allow(clippy::too_many_arguments)]
    pub fn create_schedule(
        &mut self,
        beneficiary: Pubkey,
        request_id: RequestId,
        total_amount: &ExternalCiphertext,
        proof: &InputProof,
        duration: u64,
        caller: Pubkey,
        now: i64,
    ) -> Result<()> {
        self.in_operation(|reg| {
            reg.gateway.ensure_consumable(request_id, caller)?;
            require_keys_neq!(beneficiary, NULL_IDENTITY, VestingError::InvalidBeneficiary);
            require!(
                reg.initialized(&beneficiary).is_none(),
                VestingError::ScheduleExists
            );
            require!(duration > 0, VestingError::InvalidDuration);
            time::vesting_end(now, duration)?;

            let total = reg.engine.ingest(total_amount, proof)?;
            reg.engine.grant_self(total)?;
            reg.engine.grant_to(total, beneficiary)?;

            let released = reg.engine.constant_handle(0)?;
            reg.engine.grant_self(released)?;
            reg.engine.grant_to(released, beneficiary)?;

            // Nothing below can fail once the request is consumed.
            reg.gateway.consume(request_id, caller)?;
            reg.schedules.insert(
                beneficiary,
                VestingSchedule {
                    total_amount: total,
                    released_amount: released,
                    start_time: now,
                    duration,
                    initialized: true,
                },
            );
            msg!("schedule created for {} (duration {}s)", beneficiary, duration);

            reg.events.publish(
                ScheduleCreated {
                    beneficiary,
                    start_time: now,
                    duration,
                }
                .into(),
            );
            Ok(())
        })
    }
}

#[event]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleCreated {
    pub beneficiary: Pubkey,
    pub start_time: i64,
    pub duration: u64,
}
