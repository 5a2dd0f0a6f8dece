//! Confidential vesting ledger.
//!
//! Beneficiaries hold an encrypted total entitlement and withdraw encrypted
//! amounts from it. Amounts only ever exist as ciphertext handles owned by the
//! [`engine::AccountingEngine`]; schedule creation is gated on a fulfilled
//! entropy request tracked by the [`gateway::RandomnessGateway`]. The
//! [`registry::ScheduleRegistry`] composes both.

use anchor_lang::prelude::*;

pub mod constants;
pub mod engine;
pub mod error;
pub mod events;
pub mod gateway;
pub mod registry;
pub mod state;
pub mod utils;

pub use engine::{AccountingEngine, CiphertextStore, MemoryCiphertextStore, PermissionLedger};
pub use error::VestingError;
pub use events::{EventSink, Notification, ProgramLogSink, RecordingSink};
pub use gateway::{EntropyProvider, RandomnessGateway, ScriptedEntropyProvider};
pub use registry::{ReleaseReceipt, ScheduleRegistry};
pub use state::{EntropyRequest, ExternalCiphertext, Handle, InputProof, RequestId, VestingSchedule};

declare_id!("9Tiv4zu9Pkg63pExNW4gGrd935JJFwkQFFEgwG7KipF6");
