use anchor_lang::prelude::*;

use crate::engine::CiphertextStore;
use crate::error::VestingError;
use crate::events::EventSink;
use crate::gateway::EntropyProvider;
use crate::registry::ScheduleRegistry;
use crate::state::{ExternalCiphertext, Handle, InputProof};
use crate::utils::time;

/// Handles produced by a successful [`ScheduleRegistry::release`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReleaseReceipt {
    /// The released amount as ingested; the beneficiary and the caller may
    /// decrypt it.
    pub amount: Handle,
    /// Releasable amount observed before this release; the beneficiary may
    /// decrypt it.
    pub releasable_before: Handle,
    /// New running total of released amounts.
    pub released_amount: Handle,
}

impl<S: CiphertextStore, P: EntropyProvider, E: EventSink> ScheduleRegistry<S, P, E> {
    /// Add an encrypted amount to the beneficiary's released total.
    ///
    /// The amount is not compared against the releasable bound: doing so needs
    /// an encrypted comparison the substrate does not offer, so over-release is
    /// possible and callers must bound amounts themselves.
    pub fn release(
        &mut self,
        beneficiary: Pubkey,
        amount: &ExternalCiphertext,
        proof: &InputProof,
        caller: Pubkey,
        now: i64,
    ) -> Result<ReleaseReceipt> {
        self.in_operation(|reg| {
            let schedule = reg
                .initialized(&beneficiary)
                .cloned()
                .ok_or(VestingError::ScheduleNotFound)?;
            require!(
                time::has_started(now, schedule.start_time),
                VestingError::NotStarted
            );

            // Reject the input before anything is allocated.
            let amount = reg.engine.ingest(amount, proof)?;
            reg.engine.grant_self(amount)?;
            reg.engine.grant_to(amount, beneficiary)?;
            if caller != beneficiary {
                reg.engine.grant_to(amount, caller)?;
            }

            let releasable_before = reg.releasable_handle(&beneficiary, now)?;
            reg.engine.grant_to(releasable_before, beneficiary)?;

            let released = reg.engine.add(schedule.released_amount, amount)?;
            reg.engine.grant_self(released)?;
            reg.engine.grant_to(released, beneficiary)?;

            if let Some(stored) = reg.schedules.get_mut(&beneficiary) {
                stored.released_amount = released;
            }
            msg!("release applied for {}", beneficiary);

            reg.events.publish(Released { beneficiary, amount }.into());
            Ok(ReleaseReceipt {
                amount,
                releasable_before,
                released_amount: released,
            })
        })
    }
}

#[event]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Released {
    pub beneficiary: Pubkey,
    /// Opaque reference to the released amount.
    pub amount: Handle,
}
