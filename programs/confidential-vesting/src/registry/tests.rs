use anchor_lang::error::Error;
use anchor_lang::prelude::*;

use super::*;
use crate::constants::NULL_IDENTITY;
use crate::engine::MemoryCiphertextStore;
use crate::error::VestingError;
use crate::events::{Notification, RecordingSink};
use crate::gateway::ScriptedEntropyProvider;
use crate::state::{Handle, InputProof, RequestId, RequestStatus};

const NOW: i64 = 1_767_225_600; // 2026-01-01T00:00:00Z
const MONTH: u64 = 30 * 86_400;

type Registry = ScheduleRegistry<MemoryCiphertextStore, ScriptedEntropyProvider, RecordingSink>;

fn key(b: u8) -> Pubkey {
    Pubkey::new_from_array([b; 32])
}

fn registry(fee: u64) -> Registry {
    ScheduleRegistry::with_sink(
        MemoryCiphertextStore::new([42u8; 32]),
        ScriptedEntropyProvider::new(fee),
        RecordingSink::default(),
    )
}

fn assert_err<T: std::fmt::Debug>(res: Result<T>, expected: VestingError) {
    match res.unwrap_err() {
        Error::AnchorError(e) => assert_eq!(e.error_code_number, u32::from(expected)),
        other => panic!("unexpected error: {other:?}"),
    }
}

fn decrypt(reg: &Registry, handle: &Handle) -> u64 {
    reg.engine().store().decrypt_for_test(handle).unwrap()
}

/// Request and fulfill entropy for `beneficiary`, then create a schedule.
fn open_schedule(reg: &mut Registry, beneficiary: Pubkey, caller: Pubkey, total: u64) -> RequestId {
    let id = reg.request_entropy(beneficiary, 10, caller, NOW).unwrap();
    reg.gateway_mut().provider_mut().fulfill(id);
    let (ct, proof) = reg.engine_mut().store_mut().encrypt_input(total);
    reg.create_schedule(beneficiary, id, &ct, &proof, 12 * MONTH, caller, NOW)
        .unwrap();
    id
}

#[test]
fn request_then_create_waits_for_fulfillment() {
    let mut reg = registry(10);
    let (alice, admin) = (key(1), key(2));

    let r1 = reg.request_entropy(alice, 10, admin, NOW).unwrap();
    assert_eq!(reg.gateway().status(r1), RequestStatus::Pending);

    let (ct, proof) = reg.engine_mut().store_mut().encrypt_input(100);
    assert_err(
        reg.create_schedule(alice, r1, &ct, &proof, MONTH, admin, NOW),
        VestingError::NotReady,
    );
    assert!(!reg.get_schedule(&alice).initialized);
    assert_eq!(reg.gateway().pending_count(), 1);
}

#[test]
fn insufficient_fee_records_nothing() {
    let mut reg = registry(10);
    assert_err(
        reg.request_entropy(key(1), 9, key(2), NOW),
        VestingError::InsufficientFee,
    );
    assert_eq!(reg.gateway().pending_count(), 0);
    assert!(reg.events().events.is_empty());
}

#[test]
fn only_requester_can_create_after_fulfillment() {
    let mut reg = registry(10);
    let (alice, admin, mallory) = (key(1), key(2), key(3));

    let r1 = reg.request_entropy(alice, 10, admin, NOW).unwrap();
    reg.gateway_mut().provider_mut().fulfill(r1);

    let (ct, proof) = reg.engine_mut().store_mut().encrypt_input(100);
    assert_err(
        reg.create_schedule(alice, r1, &ct, &proof, MONTH, mallory, NOW),
        VestingError::Unauthorized,
    );
    assert_eq!(reg.gateway().status(r1), RequestStatus::Fulfilled);

    reg.create_schedule(alice, r1, &ct, &proof, MONTH, admin, NOW)
        .unwrap();
    let schedule = reg.get_schedule(&alice);
    assert!(schedule.initialized);
    assert_eq!(schedule.start_time, NOW);
    assert_eq!(schedule.duration, MONTH);
    assert_eq!(decrypt(&reg, &schedule.total_amount), 100);
    assert_eq!(decrypt(&reg, &schedule.released_amount), 0);
    assert_eq!(reg.gateway().status(r1), RequestStatus::Consumed);
}

#[test]
fn null_beneficiary_leaves_request_and_schedules_untouched() {
    let mut reg = registry(10);
    let admin = key(2);
    let r1 = reg.request_entropy(NULL_IDENTITY, 10, admin, NOW).unwrap();
    reg.gateway_mut().provider_mut().fulfill(r1);

    let (ct, proof) = reg.engine_mut().store_mut().encrypt_input(100);
    assert_err(
        reg.create_schedule(NULL_IDENTITY, r1, &ct, &proof, MONTH, admin, NOW),
        VestingError::InvalidBeneficiary,
    );
    assert_eq!(reg.gateway().status(r1), RequestStatus::Fulfilled);
    assert_eq!(reg.schedule_count(), 0);
}

#[test]
fn schedule_is_created_at_most_once() {
    let mut reg = registry(10);
    let (alice, admin) = (key(1), key(2));
    open_schedule(&mut reg, alice, admin, 100);

    let r2 = reg.request_entropy(alice, 10, admin, NOW).unwrap();
    reg.gateway_mut().provider_mut().fulfill(r2);
    let (ct, proof) = reg.engine_mut().store_mut().encrypt_input(500);
    assert_err(
        reg.create_schedule(alice, r2, &ct, &proof, MONTH, admin, NOW + 5),
        VestingError::ScheduleExists,
    );
    // The losing request stays available for another beneficiary.
    assert_eq!(reg.gateway().status(r2), RequestStatus::Fulfilled);
    assert_eq!(decrypt(&reg, &reg.get_schedule(&alice).total_amount), 100);
}

#[test]
fn request_is_consumed_at_most_once() {
    let mut reg = registry(10);
    let admin = key(2);
    let r1 = open_schedule(&mut reg, key(1), admin, 100);

    let (ct, proof) = reg.engine_mut().store_mut().encrypt_input(100);
    assert_err(
        reg.create_schedule(key(4), r1, &ct, &proof, MONTH, admin, NOW),
        VestingError::UnknownRequest,
    );
    assert!(!reg.get_schedule(&key(4)).initialized);
}

#[test]
fn invalid_proof_or_duration_keeps_request_pending() {
    let mut reg = registry(0);
    let (alice, admin) = (key(1), key(2));
    let r1 = reg.request_entropy(alice, 0, admin, NOW).unwrap();
    reg.gateway_mut().provider_mut().fulfill(r1);

    let (ct, _) = reg.engine_mut().store_mut().encrypt_input(100);
    assert_err(
        reg.create_schedule(alice, r1, &ct, &InputProof([1u8; 32]), MONTH, admin, NOW),
        VestingError::InvalidProof,
    );
    let (ct, proof) = reg.engine_mut().store_mut().encrypt_input(100);
    assert_err(
        reg.create_schedule(alice, r1, &ct, &proof, 0, admin, NOW),
        VestingError::InvalidDuration,
    );
    assert_eq!(reg.gateway().status(r1), RequestStatus::Fulfilled);

    reg.create_schedule(alice, r1, &ct, &proof, MONTH, admin, NOW)
        .unwrap();
}

#[test]
fn releasable_is_zero_without_schedule_or_before_start() {
    let mut reg = registry(10);
    let alice = key(1);

    let h = reg.calculate_releasable(alice, NOW).unwrap();
    assert_eq!(decrypt(&reg, &h), 0);

    open_schedule(&mut reg, alice, key(2), 100);
    for now in [i64::MIN, 0, NOW - 1] {
        let h = reg.calculate_releasable(alice, now).unwrap();
        assert_eq!(decrypt(&reg, &h), 0);
    }
}

#[test]
fn releasable_at_start_is_full_total() {
    let mut reg = registry(10);
    let alice = key(1);
    open_schedule(&mut reg, alice, key(2), 100);

    let h = reg.calculate_releasable(alice, NOW).unwrap();
    assert_eq!(decrypt(&reg, &h), 100);
    // Transient engine access does not outlive the query.
    assert!(!reg.engine().is_allowed(&h, &crate::ID));
}

#[test]
fn release_adds_exact_amount_and_reduces_releasable() {
    let mut reg = registry(10);
    let (alice, admin) = (key(1), key(2));
    open_schedule(&mut reg, alice, admin, 100);

    let (ct, proof) = reg.engine_mut().store_mut().encrypt_input(5);
    let receipt = reg.release(alice, &ct, &proof, alice, NOW).unwrap();
    assert_eq!(decrypt(&reg, &receipt.amount), 5);
    assert_eq!(decrypt(&reg, &receipt.releasable_before), 100);
    assert_eq!(decrypt(&reg, &receipt.released_amount), 5);
    assert_eq!(reg.get_schedule(&alice).released_amount, receipt.released_amount);

    let h = reg.calculate_releasable(alice, NOW).unwrap();
    assert_eq!(decrypt(&reg, &h), 95);

    // Not prorated: halfway through the window everything unreleased is releasable.
    let h = reg.calculate_releasable(alice, NOW + (6 * MONTH) as i64).unwrap();
    assert_eq!(decrypt(&reg, &h), 95);
}

#[test]
fn released_amount_is_monotonic() {
    let mut reg = registry(10);
    let alice = key(1);
    open_schedule(&mut reg, alice, key(2), 1_000);

    let mut expected = 0;
    for (i, amount) in [1u64, 10, 0, 250].into_iter().enumerate() {
        let before = decrypt(&reg, &reg.get_schedule(&alice).released_amount);
        let (ct, proof) = reg.engine_mut().store_mut().encrypt_input(amount);
        reg.release(alice, &ct, &proof, alice, NOW + i as i64).unwrap();
        let after = decrypt(&reg, &reg.get_schedule(&alice).released_amount);
        expected += amount;
        assert_eq!(after, before + amount);
        assert_eq!(after, expected);
    }
}

#[test]
fn release_requires_schedule_and_start() {
    let mut reg = registry(10);
    let alice = key(1);
    let (ct, proof) = reg.engine_mut().store_mut().encrypt_input(5);
    assert_err(
        reg.release(alice, &ct, &proof, alice, NOW),
        VestingError::ScheduleNotFound,
    );

    open_schedule(&mut reg, alice, key(2), 100);
    let released = reg.get_schedule(&alice).released_amount;
    assert_err(
        reg.release(alice, &ct, &proof, alice, NOW - 1),
        VestingError::NotStarted,
    );
    assert_eq!(reg.get_schedule(&alice).released_amount, released);
}

#[test]
fn release_does_not_bound_amount_by_releasable() {
    let mut reg = registry(10);
    let alice = key(1);
    open_schedule(&mut reg, alice, key(2), 100);

    let (ct, proof) = reg.engine_mut().store_mut().encrypt_input(150);
    let receipt = reg.release(alice, &ct, &proof, alice, NOW).unwrap();
    assert_eq!(decrypt(&reg, &receipt.released_amount), 150);
    // total - released wraps in u64 arithmetic.
    let h = reg.calculate_releasable(alice, NOW).unwrap();
    assert_eq!(decrypt(&reg, &h), 100u64.wrapping_sub(150));
}

#[test]
fn beneficiary_holds_access_to_own_handles() {
    let mut reg = registry(10);
    let (alice, admin, relayer) = (key(1), key(2), key(5));
    open_schedule(&mut reg, alice, admin, 100);

    let schedule = reg.get_schedule(&alice);
    assert!(reg.engine().is_allowed(&schedule.total_amount, &alice));
    assert!(reg.engine().is_allowed(&schedule.released_amount, &alice));
    assert!(!reg.engine().is_allowed(&schedule.total_amount, &admin));

    let (ct, proof) = reg.engine_mut().store_mut().encrypt_input(5);
    let receipt = reg.release(alice, &ct, &proof, relayer, NOW).unwrap();
    assert!(reg.engine().is_allowed(&receipt.amount, &alice));
    assert!(reg.engine().is_allowed(&receipt.released_amount, &alice));
    assert!(reg.engine().is_allowed(&receipt.releasable_before, &alice));
    // The relayer submitted the amount and may read it back, nothing else.
    assert!(reg.engine().is_allowed(&receipt.amount, &relayer));
    assert!(!reg.engine().is_allowed(&receipt.released_amount, &relayer));
    assert!(!reg.engine().is_allowed(&receipt.releasable_before, &relayer));
    assert!(!reg.engine().permissions().has_transient());
}

#[test]
fn rejected_release_input_changes_nothing() {
    let mut reg = registry(10);
    let alice = key(1);
    open_schedule(&mut reg, alice, key(2), 100);
    let before = reg.get_schedule(&alice);
    let handles = reg.engine().store().len();
    let tracked = reg.engine().permissions().len();
    let events = reg.events().events.len();

    let (ct, _) = reg.engine_mut().store_mut().encrypt_input(5);
    assert_err(
        reg.release(alice, &ct, &InputProof([9u8; 32]), alice, NOW),
        VestingError::InvalidProof,
    );
    assert_eq!(reg.engine().store().len(), handles);
    assert_eq!(reg.engine().permissions().len(), tracked);
    assert_eq!(reg.get_schedule(&alice), before);
    assert_eq!(reg.events().events.len(), events);
}

#[test]
fn repeated_queries_do_not_allocate() {
    let mut reg = registry(10);
    let (alice, bob) = (key(1), key(6));

    let zero = reg.calculate_releasable(bob, NOW).unwrap();
    let handles = reg.engine().store().len();
    for _ in 0..3 {
        assert_eq!(reg.calculate_releasable(bob, NOW).unwrap(), zero);
    }
    assert_eq!(reg.engine().store().len(), handles);

    open_schedule(&mut reg, alice, key(2), 100);
    // Before the start alice shares the same zero.
    assert_eq!(reg.calculate_releasable(alice, NOW - 1).unwrap(), zero);

    let first = reg.calculate_releasable(alice, NOW).unwrap();
    let handles = reg.engine().store().len();
    let tracked = reg.engine().permissions().len();
    for now in [NOW, NOW + 1, NOW + MONTH as i64] {
        assert_eq!(reg.calculate_releasable(alice, now).unwrap(), first);
    }
    assert_eq!(reg.engine().store().len(), handles);
    assert_eq!(reg.engine().permissions().len(), tracked);

    // A release invalidates the cached result.
    let (ct, proof) = reg.engine_mut().store_mut().encrypt_input(30);
    let receipt = reg.release(alice, &ct, &proof, alice, NOW).unwrap();
    assert_eq!(receipt.releasable_before, first);
    let after = reg.calculate_releasable(alice, NOW).unwrap();
    assert_ne!(after, first);
    assert_eq!(decrypt(&reg, &after), 70);
    assert!(reg.engine().is_allowed(&zero, &crate::ID));
    assert!(!reg.engine().is_allowed(&zero, &alice));
}

#[test]
fn notifications_follow_operations() {
    let mut reg = registry(10);
    let (alice, admin) = (key(1), key(2));
    let r1 = open_schedule(&mut reg, alice, admin, 100);
    let (ct, proof) = reg.engine_mut().store_mut().encrypt_input(5);
    let receipt = reg.release(alice, &ct, &proof, alice, NOW).unwrap();

    assert_eq!(
        reg.events().events,
        vec![
            Notification::EntropyRequested(EntropyRequested {
                beneficiary: alice,
                request_id: r1,
            }),
            Notification::ScheduleCreated(ScheduleCreated {
                beneficiary: alice,
                start_time: NOW,
                duration: 12 * MONTH,
            }),
            Notification::Released(Released {
                beneficiary: alice,
                amount: receipt.amount,
            }),
        ]
    );
}

#[test]
fn vesting_window_queries() {
    let mut reg = registry(10);
    let alice = key(1);
    assert_eq!(reg.vesting_end(&alice), None);
    assert!(!reg.is_fully_vested(&alice, NOW));

    open_schedule(&mut reg, alice, key(2), 100);
    let end = NOW + (12 * MONTH) as i64;
    assert_eq!(reg.vesting_end(&alice), Some(end));
    assert!(!reg.is_fully_vested(&alice, end - 1));
    assert!(reg.is_fully_vested(&alice, end));
}

#[test]
fn absent_schedule_reads_as_default() {
    let reg = registry(10);
    let schedule = reg.get_schedule(&key(9));
    assert_eq!(schedule, VestingSchedule::default());
    assert!(schedule.total_amount.is_unset());
}
