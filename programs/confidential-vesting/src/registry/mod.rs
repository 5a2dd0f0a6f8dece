//! Schedule registry: one confidential vesting schedule per beneficiary.
//!
//! The registry owns the engine, the entropy gateway and the notification
//! sink. Every mutating method takes `&mut self`, so a host serializes
//! operations by owning (or locking) the registry. All preconditions of an
//! operation are checked before any state changes.

pub mod calculate_releasable;
pub mod create_schedule;
pub mod release;
pub mod request_entropy;

pub use create_schedule::*;
pub use release::*;
pub use request_entropy::*;

use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::engine::{AccountingEngine, CiphertextStore};
use crate::events::{EventSink, ProgramLogSink};
use crate::gateway::{EntropyProvider, RandomnessGateway};
use crate::state::{Handle, VestingSchedule};
use crate::utils::time;

pub struct ScheduleRegistry<S, P, E = ProgramLogSink> {
    engine: AccountingEngine<S>,
    gateway: RandomnessGateway<P>,
    events: E,
    schedules: BTreeMap<Pubkey, VestingSchedule>,
    /// beneficiary -> (released handle, releasable handle derived from it)
    releasable: BTreeMap<Pubkey, (Handle, Handle)>,
}

impl<S: CiphertextStore, P: EntropyProvider> ScheduleRegistry<S, P, ProgramLogSink> {
    pub fn new(store: S, provider: P) -> Self {
        Self::with_sink(store, provider, ProgramLogSink)
    }
}

impl<S: CiphertextStore, P: EntropyProvider, E: EventSink> ScheduleRegistry<S, P, E> {
    pub fn with_sink(store: S, provider: P, events: E) -> Self {
        Self {
            engine: AccountingEngine::new(store),
            gateway: RandomnessGateway::new(provider),
            events,
            schedules: BTreeMap::new(),
            releasable: BTreeMap::new(),
        }
    }

    /// Stored schedule, or the zero-valued default if none exists.
    pub fn get_schedule(&self, beneficiary: &Pubkey) -> VestingSchedule {
        self.schedules.get(beneficiary).cloned().unwrap_or_default()
    }

    pub fn schedule_count(&self) -> usize {
        self.schedules.len()
    }

    /// End of the vesting window, `None` without a schedule.
    pub fn vesting_end(&self, beneficiary: &Pubkey) -> Option<i64> {
        let schedule = self.initialized(beneficiary)?;
        time::vesting_end(schedule.start_time, schedule.duration).ok()
    }

    pub fn is_fully_vested(&self, beneficiary: &Pubkey, now: i64) -> bool {
        self.initialized(beneficiary).map_or(false, |s| {
            time::is_after_vesting_end(now, s.start_time, s.duration).unwrap_or(false)
        })
    }

    pub fn engine(&self) -> &AccountingEngine<S> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut AccountingEngine<S> {
        &mut self.engine
    }

    pub fn gateway(&self) -> &RandomnessGateway<P> {
        &self.gateway
    }

    pub fn gateway_mut(&mut self) -> &mut RandomnessGateway<P> {
        &mut self.gateway
    }

    pub fn events(&self) -> &E {
        &self.events
    }

    fn initialized(&self, beneficiary: &Pubkey) -> Option<&VestingSchedule> {
        self.schedules.get(beneficiary).filter(|s| s.initialized)
    }

    /// Run `op` as one logical operation; transient grants end with it.
    fn in_operation<T>(&mut self, op: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let result = op(self);
        self.engine.end_operation();
        result
    }
}

#[cfg(test)]
mod tests;
