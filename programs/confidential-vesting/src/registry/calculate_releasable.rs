use anchor_lang::prelude::*;

use crate::engine::CiphertextStore;
use crate::events::EventSink;
use crate::gateway::EntropyProvider;
use crate::registry::ScheduleRegistry;
use crate::state::Handle;
use crate::utils::time;

impl<S: CiphertextStore, P: EntropyProvider, E: EventSink> ScheduleRegistry<S, P, E> {
    /// Encrypted amount currently releasable for `beneficiary`.
    ///
    /// Zero before the start or without a schedule; otherwise everything not
    /// yet released (`total - released`), independent of elapsed time.
    pub fn calculate_releasable(&mut self, beneficiary: Pubkey, now: i64) -> Result<Handle> {
        self.in_operation(|reg| reg.releasable_handle(&beneficiary, now))
    }

    /// Releasable handle with engine access granted for the current operation.
    /// Reuses the previous result while the released total is unchanged.
    pub(crate) fn releasable_handle(&mut self, beneficiary: &Pubkey, now: i64) -> Result<Handle> {
        let vesting = self
            .initialized(beneficiary)
            .filter(|s| time::has_started(now, s.start_time))
            .map(|s| (s.total_amount, s.released_amount));

        let releasable = match vesting {
            Some((total, released)) => match self.releasable.get(beneficiary) {
                Some(&(cached_for, cached)) if cached_for == released => cached,
                _ => {
                    let diff = self.engine.sub(total, released)?;
                    self.releasable.insert(*beneficiary, (released, diff));
                    diff
                }
            },
            None => self.engine.zero()?,
        };
        let engine = self.engine.principal();
        self.engine.grant_transient(releasable, engine)?;
        Ok(releasable)
    }
}
