use std::collections::{BTreeMap, BTreeSet};

use anchor_lang::prelude::*;

use crate::error::VestingError;
use crate::state::Handle;

/// Handle -> authorized principals.
///
/// Persistent grants live as long as the handle. Transient grants are dropped
/// by [`PermissionLedger::clear_transient`] at the end of each logical
/// operation.
#[derive(Clone, Debug, Default)]
pub struct PermissionLedger {
    persistent: BTreeMap<Handle, BTreeSet<Pubkey>>,
    transient: BTreeMap<Handle, BTreeSet<Pubkey>>,
}

impl PermissionLedger {
    /// Track a freshly allocated handle with an empty permission set.
    pub fn register(&mut self, handle: Handle) {
        self.persistent.entry(handle).or_default();
    }

    /// Number of tracked handles.
    pub fn len(&self) -> usize {
        self.persistent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persistent.is_empty()
    }

    pub fn is_known(&self, handle: &Handle) -> bool {
        self.persistent.contains_key(handle)
    }

    pub fn allow(&mut self, handle: Handle, principal: Pubkey) -> Result<()> {
        let principals = self
            .persistent
            .get_mut(&handle)
            .ok_or(VestingError::Unauthorized)?;
        principals.insert(principal);
        Ok(())
    }

    pub fn allow_transient(&mut self, handle: Handle, principal: Pubkey) -> Result<()> {
        require!(self.is_known(&handle), VestingError::Unauthorized);
        self.transient.entry(handle).or_default().insert(principal);
        Ok(())
    }

    /// Drop a persistent grant. Returns whether the principal had one.
    pub fn revoke(&mut self, handle: Handle, principal: &Pubkey) -> Result<bool> {
        let principals = self
            .persistent
            .get_mut(&handle)
            .ok_or(VestingError::Unauthorized)?;
        Ok(principals.remove(principal))
    }

    pub fn is_allowed(&self, handle: &Handle, principal: &Pubkey) -> bool {
        let granted = |map: &BTreeMap<Handle, BTreeSet<Pubkey>>| {
            map.get(handle).map_or(false, |p| p.contains(principal))
        };
        granted(&self.persistent) || granted(&self.transient)
    }

    /// Persistent principals of `handle`, empty for unknown handles.
    pub fn principals(&self, handle: &Handle) -> Vec<Pubkey> {
        self.persistent
            .get(handle)
            .map(|p| p.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn clear_transient(&mut self) {
        self.transient.clear();
    }

    pub fn has_transient(&self) -> bool {
        !self.transient.is_empty()
    }
}
