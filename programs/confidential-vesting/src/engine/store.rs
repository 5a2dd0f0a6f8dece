use anchor_lang::prelude::*;

use crate::state::{ExternalCiphertext, Handle, InputProof};

/// Ciphertext substrate consumed by the [`AccountingEngine`](super::AccountingEngine).
///
/// Implementations hold the encrypted values off-band and hand out opaque
/// handles. They do not check permissions; the engine does that before any
/// call reaches the substrate.
pub trait CiphertextStore {
    /// Authenticate a client-supplied ciphertext and wrap it as a handle.
    /// Fails with `InvalidProof` when `proof` does not match `external`.
    fn verify_and_wrap(&mut self, external: &ExternalCiphertext, proof: &InputProof) -> Result<Handle>;

    /// Encrypted `a + b` (wrapping).
    fn hom_add(&mut self, a: Handle, b: Handle) -> Result<Handle>;

    /// Encrypted `a - b` (wrapping).
    fn hom_sub(&mut self, a: Handle, b: Handle) -> Result<Handle>;

    /// Encrypt a public constant.
    fn trivial_encrypt(&mut self, value: u64) -> Result<Handle>;
}
