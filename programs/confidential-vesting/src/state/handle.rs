use anchor_lang::prelude::*;
use bytemuck::{Pod, Zeroable};

use crate::constants::UNSET_HANDLE;

/// Opaque reference to an encrypted `u64` held by a ciphertext substrate.
///
/// A handle carries no plaintext. Whether anyone may compute over it or
/// request its decryption is decided by the engine's permission ledger.
#[derive(
    AnchorSerialize,
    AnchorDeserialize,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Pod,
    Zeroable,
)]
#[repr(transparent)]
pub struct Handle(pub [u8; 32]);

impl Handle {
    pub fn is_unset(&self) -> bool {
        self.0 == UNSET_HANDLE
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

/// Ciphertext produced by a client for a single `u64` input.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExternalCiphertext {
    pub nonce: [u8; 16],
    pub body: [u8; 8],
}

/// Proof binding an [`ExternalCiphertext`] to the substrate that accepts it.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputProof(pub [u8; 32]);
