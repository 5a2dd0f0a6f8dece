//! In-memory ciphertext substrate.
//!
//! Values are kept in a map keyed by handle; handles are blake3 derivations
//! that reveal nothing about the value. Client inputs are sealed with a
//! blake3 keystream and authenticated with a keyed blake3 tag, so a proof
//! produced for one substrate secret is rejected by any other.

use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::constants::{HANDLE_DOMAIN, KEYSTREAM_DOMAIN, PROOF_KEY_DOMAIN};
use crate::engine::CiphertextStore;
use crate::error::VestingError;
use crate::state::{ExternalCiphertext, Handle, InputProof};

pub struct MemoryCiphertextStore {
    proof_key: [u8; 32],
    stream_key: [u8; 32],
    values: BTreeMap<Handle, u64>,
    next_index: u64,
    next_nonce: u64,
}

impl MemoryCiphertextStore {
    pub fn new(secret: [u8; 32]) -> Self {
        Self {
            proof_key: blake3::derive_key(PROOF_KEY_DOMAIN, &secret),
            stream_key: blake3::derive_key(KEYSTREAM_DOMAIN, &secret),
            values: BTreeMap::new(),
            next_index: 0,
            next_nonce: 0,
        }
    }

    /// Client side: seal `value` for this substrate and prove it.
    pub fn encrypt_input(&mut self, value: u64) -> (ExternalCiphertext, InputProof) {
        let mut nonce = [0u8; 16];
        nonce[..8].copy_from_slice(&self.next_nonce.to_le_bytes());
        self.next_nonce += 1;

        let pad = self.keystream(&nonce);
        let mut body = value.to_le_bytes();
        body.iter_mut().zip(pad.iter()).for_each(|(b, p)| *b ^= p);

        let external = ExternalCiphertext { nonce, body };
        let proof = InputProof(*self.tag(&external).as_bytes());
        (external, proof)
    }

    /// Plaintext behind `handle`, ignoring the permission ledger. Test hook.
    pub fn decrypt_for_test(&self, handle: &Handle) -> Option<u64> {
        self.values.get(handle).copied()
    }

    /// Number of handles allocated so far.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn keystream(&self, nonce: &[u8; 16]) -> [u8; 8] {
        let digest = blake3::keyed_hash(&self.stream_key, nonce);
        let mut pad = [0u8; 8];
        pad.copy_from_slice(&digest.as_bytes()[..8]);
        pad
    }

    fn tag(&self, external: &ExternalCiphertext) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new_keyed(&self.proof_key);
        hasher.update(&external.nonce);
        hasher.update(&external.body);
        hasher.finalize()
    }

    fn value(&self, handle: &Handle) -> Result<u64> {
        Ok(*self.values.get(handle).ok_or(VestingError::Unauthorized)?)
    }

    fn allocate(&mut self, op: &[u8], operands: &[Handle], value: u64) -> Handle {
        let mut hasher = blake3::Hasher::new_derive_key(HANDLE_DOMAIN);
        hasher.update(&self.next_index.to_le_bytes());
        hasher.update(op);
        for operand in operands {
            hasher.update(operand.as_bytes());
        }
        self.next_index += 1;

        let handle = Handle(*hasher.finalize().as_bytes());
        self.values.insert(handle, value);
        handle
    }
}

impl CiphertextStore for MemoryCiphertextStore {
    fn verify_and_wrap(&mut self, external: &ExternalCiphertext, proof: &InputProof) -> Result<Handle> {
        // blake3::Hash equality is constant-time.
        require!(
            self.tag(external) == blake3::Hash::from(proof.0),
            VestingError::InvalidProof
        );

        let pad = self.keystream(&external.nonce);
        let mut plain = external.body;
        plain.iter_mut().zip(pad.iter()).for_each(|(b, p)| *b ^= p);
        Ok(self.allocate(b"input", &[], u64::from_le_bytes(plain)))
    }

    fn hom_add(&mut self, a: Handle, b: Handle) -> Result<Handle> {
        let sum = self.value(&a)?.wrapping_add(self.value(&b)?);
        Ok(self.allocate(b"add", &[a, b], sum))
    }

    fn hom_sub(&mut self, a: Handle, b: Handle) -> Result<Handle> {
        let diff = self.value(&a)?.wrapping_sub(self.value(&b)?);
        Ok(self.allocate(b"sub", &[a, b], diff))
    }

    fn trivial_encrypt(&mut self, value: u64) -> Result<Handle> {
        Ok(self.allocate(b"const", &[], value))
    }
}
