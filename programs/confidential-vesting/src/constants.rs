//! Program-wide constants.

use anchor_lang::prelude::Pubkey;

/// Principal the accounting engine acts as when it computes over handles.
pub const ENGINE_PRINCIPAL: Pubkey = crate::ID;

/// The null identity. Never a valid beneficiary.
pub const NULL_IDENTITY: Pubkey = Pubkey::new_from_array([0u8; 32]);

/// Handle value reserved for "unset"; substrates never allocate it.
pub const UNSET_HANDLE: [u8; 32] = [0u8; 32];

/// blake3 domain tag for entropy request tags derived from a beneficiary.
pub const ENTROPY_TAG_DOMAIN: &str = "confidential-vesting 2026 entropy tag";

/// blake3 domain tag for handle derivation in the in-memory substrate.
pub const HANDLE_DOMAIN: &str = "confidential-vesting 2026 ciphertext handle";

/// blake3 domain tag for the input-proof MAC key in the in-memory substrate.
pub const PROOF_KEY_DOMAIN: &str = "confidential-vesting 2026 input proof key";

/// blake3 domain tag for the keystream used to seal external inputs.
pub const KEYSTREAM_DOMAIN: &str = "confidential-vesting 2026 input keystream";
