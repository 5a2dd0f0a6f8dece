//! Confidential accounting engine.
//!
//! Every handle the rest of the crate touches is allocated here, and every
//! computation is gated on the engine's own principal holding access to each
//! operand. Results start with an empty permission set.

pub mod acl;
pub mod memory;
pub mod store;

pub use acl::PermissionLedger;
pub use memory::MemoryCiphertextStore;
pub use store::CiphertextStore;

use anchor_lang::prelude::*;

use crate::constants::ENGINE_PRINCIPAL;
use crate::error::VestingError;
use crate::state::{ExternalCiphertext, Handle, InputProof};

pub struct AccountingEngine<S> {
    store: S,
    acl: PermissionLedger,
    zero: Option<Handle>,
}

impl<S: CiphertextStore> AccountingEngine<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            acl: PermissionLedger::default(),
            zero: None,
        }
    }

    /// Identity the engine computes as.
    pub fn principal(&self) -> Pubkey {
        ENGINE_PRINCIPAL
    }

    /// Verify and wrap a client ciphertext. The handle has no permissions yet.
    pub fn ingest(&mut self, external: &ExternalCiphertext, proof: &InputProof) -> Result<Handle> {
        let handle = self.store.verify_and_wrap(external, proof)?;
        self.acl.register(handle);
        Ok(handle)
    }

    pub fn grant_self(&mut self, handle: Handle) -> Result<()> {
        self.acl.allow(handle, ENGINE_PRINCIPAL)
    }

    pub fn grant_to(&mut self, handle: Handle, principal: Pubkey) -> Result<()> {
        self.acl.allow(handle, principal)
    }

    /// Grant lasting until [`AccountingEngine::end_operation`].
    pub fn grant_transient(&mut self, handle: Handle, principal: Pubkey) -> Result<()> {
        self.acl.allow_transient(handle, principal)
    }

    pub fn revoke(&mut self, handle: Handle, principal: Pubkey) -> Result<()> {
        self.acl.revoke(handle, &principal)?;
        Ok(())
    }

    pub fn is_allowed(&self, handle: &Handle, principal: &Pubkey) -> bool {
        self.acl.is_allowed(handle, principal)
    }

    pub fn add(&mut self, a: Handle, b: Handle) -> Result<Handle> {
        self.authorize(&a)?;
        self.authorize(&b)?;
        let sum = self.store.hom_add(a, b)?;
        self.acl.register(sum);
        Ok(sum)
    }

    pub fn sub(&mut self, a: Handle, b: Handle) -> Result<Handle> {
        self.authorize(&a)?;
        self.authorize(&b)?;
        let diff = self.store.hom_sub(a, b)?;
        self.acl.register(diff);
        Ok(diff)
    }

    pub fn constant_handle(&mut self, value: u64) -> Result<Handle> {
        let handle = self.store.trivial_encrypt(value)?;
        self.acl.register(handle);
        Ok(handle)
    }

    /// Shared encrypted zero, allocated once and held with engine access.
    /// Never grant other principals on it; use [`Self::constant_handle`] for
    /// a zero that will be handed out.
    pub fn zero(&mut self) -> Result<Handle> {
        if let Some(zero) = self.zero {
            return Ok(zero);
        }
        let zero = self.constant_handle(0)?;
        self.grant_self(zero)?;
        self.zero = Some(zero);
        Ok(zero)
    }

    /// Close the current logical operation: all transient grants lapse.
    pub fn end_operation(&mut self) {
        self.acl.clear_transient();
    }

    pub fn permissions(&self) -> &PermissionLedger {
        &self.acl
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn authorize(&self, handle: &Handle) -> Result<()> {
        require!(
            self.acl.is_allowed(handle, &ENGINE_PRINCIPAL),
            VestingError::Unauthorized
        );
        Ok(())
    }
}
