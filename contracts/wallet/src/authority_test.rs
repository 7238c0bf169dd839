//! # Authority Governance Test Suite
//!
//! ## Test Coverage
//! - Bootstrap: "owner" first, without consent
//! - Policy validation: impossible thresholds, tagging, duplicates
//! - Update/removal of ordinary authorities
//! - "recovery": own consent, grace-period escalation, delayed requests
//! - Request lifecycle: open, cancel, apply, clear

#![cfg(test)]

use crate::authority::*;
use crate::config::PERIOD_UPDATE_RECOVERY;
use crate::consent::Consent;
use crate::error::{ErrorKind, WalletError};
use crate::storage;
use crate::types::{Authority, KeyAuth, KeyHolder};
use crate::Wallet;
use soroban_sdk::{testutils::Ledger, Address, BytesN, Env, String, Vec};

const T0: u64 = 1_000;
const DAY: u64 = 24 * 60 * 60;

// ============================================================================
// Test Helpers
// ============================================================================

fn setup() -> (Env, Address) {
    let env = Env::default();
    env.ledger().set_timestamp(T0);
    let contract_id = env.register(Wallet, ());
    (env, contract_id)
}

macro_rules! with_contract {
    ($env:expr, $contract_id:expr, $body:block) => {
        $env.as_contract($contract_id, || $body)
    };
}

fn s(env: &Env, v: &str) -> String {
    String::from_str(env, v)
}

fn key(env: &Env, n: u8) -> BytesN<32> {
    BytesN::from_array(env, &[n; 32])
}

/// Authority over keys `n` with weight 1 each.
fn keys(env: &Env, ns: &[u8], threshold: u32) -> Authority {
    let mut key_auths = Vec::new(env);
    for n in ns {
        key_auths.push_back(KeyAuth {
            holder: KeyHolder::Key(key(env, *n)),
            weight: 1,
        });
    }
    Authority {
        key_auths,
        weight_threshold: threshold,
        last_update: 0,
    }
}

fn signed(env: &Env, ns: &[u8]) -> Consent {
    let mut signers = Vec::new(env);
    for n in ns {
        signers.push_back(key(env, *n));
    }
    Consent::new(signers, None)
}

/// "owner" = keys 1,2 (2 of 2), "recovery" = key 3 (1 of 1), both at T0.
fn bootstrap(env: &Env) {
    add_authority(env, &Consent::empty(env), s(env, "owner"), keys(env, &[1, 2], 2), false)
        .unwrap();
    add_authority(env, &signed(env, &[1, 2]), s(env, "recovery"), keys(env, &[3], 1), false)
        .unwrap();
}

fn advance(env: &Env, seconds: u64) {
    let now = env.ledger().timestamp();
    env.ledger().set_timestamp(now + seconds);
}

// ============================================================================
// Creation
// ============================================================================

#[test]
fn test_owner_bootstraps_without_consent() {
    let (env, cid) = setup();
    with_contract!(env, &cid, {
        add_authority(&env, &Consent::empty(&env), s(&env, "owner"), keys(&env, &[1, 2], 2), false)
            .unwrap();

        let owner = storage::get_authority(&env, &s(&env, "owner")).unwrap();
        assert_eq!(owner.last_update, T0 * 1000);
        assert_eq!(owner.weight_threshold, 2);
    });
}

#[test]
fn test_first_authority_must_be_owner() {
    let (env, cid) = setup();
    with_contract!(env, &cid, {
        let result = add_authority(
            &env,
            &Consent::empty(&env),
            s(&env, "recovery"),
            keys(&env, &[1], 1),
            false,
        );
        assert_eq!(result, Err(WalletError::FirstAuthorityMustBeOwner));
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Validation);
        assert!(storage::list_authorities(&env).is_empty());
    });
}

#[test]
fn test_later_authorities_need_owner() {
    let (env, cid) = setup();
    with_contract!(env, &cid, {
        bootstrap(&env);

        let result = add_authority(
            &env,
            &signed(&env, &[1]),
            s(&env, "spender"),
            keys(&env, &[4], 1),
            false,
        );
        assert_eq!(result, Err(WalletError::ThresholdNotMet));
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Authorization);

        add_authority(&env, &signed(&env, &[1, 2]), s(&env, "spender"), keys(&env, &[4], 1), false)
            .unwrap();
        let names: Vec<String> = Vec::from_iter(
            &env,
            storage::list_authorities(&env).iter().map(|entry| entry.name),
        );
        assert_eq!(
            names,
            Vec::from_array(&env, [s(&env, "owner"), s(&env, "recovery"), s(&env, "spender")])
        );
    });
}

#[test]
fn test_duplicate_name_rejected() {
    let (env, cid) = setup();
    with_contract!(env, &cid, {
        bootstrap(&env);
        let result = add_authority(
            &env,
            &signed(&env, &[1, 2]),
            s(&env, "recovery"),
            keys(&env, &[5], 1),
            false,
        );
        assert_eq!(result, Err(WalletError::AuthorityAlreadyExists));
    });
}

#[test]
fn test_impossible_owner_rejected_even_if_tagged() {
    let (env, cid) = setup();
    with_contract!(env, &cid, {
        let result = add_authority(
            &env,
            &Consent::empty(&env),
            s(&env, "owner"),
            keys(&env, &[1], 2),
            true,
        );
        assert_eq!(result, Err(WalletError::ImpossibleAuthority));
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Policy);
    });
}

#[test]
fn test_impossible_authority_needs_tag() {
    let (env, cid) = setup();
    with_contract!(env, &cid, {
        bootstrap(&env);
        let owner = signed(&env, &[1, 2]);

        let result = add_authority(&env, &owner, s(&env, "frozen"), keys(&env, &[4], 2), false);
        assert_eq!(result, Err(WalletError::ImpossibleNotTagged));

        let result = add_authority(&env, &owner, s(&env, "frozen"), keys(&env, &[4], 1), true);
        assert_eq!(result, Err(WalletError::WronglyTaggedImpossible));

        add_authority(&env, &owner, s(&env, "frozen"), keys(&env, &[4], 2), true).unwrap();
        assert!(storage::has_authority(&env, &s(&env, "frozen")));
    });
}

#[test]
fn test_duplicate_key_auth_rejected() {
    let (env, cid) = setup();
    with_contract!(env, &cid, {
        let result = add_authority(
            &env,
            &Consent::empty(&env),
            s(&env, "owner"),
            keys(&env, &[1, 1], 1),
            false,
        );
        assert_eq!(result, Err(WalletError::DuplicateKeyAuth));
    });
}

// ============================================================================
// Update / Removal
// ============================================================================

#[test]
fn test_owner_can_never_be_removed() {
    let (env, cid) = setup();
    with_contract!(env, &cid, {
        bootstrap(&env);
        let result = update_authority(
            &env,
            &signed(&env, &[1, 2, 3]),
            s(&env, "owner"),
            None,
            false,
        );
        assert_eq!(result, Err(WalletError::OwnerNotRemovable));
        assert!(storage::has_authority(&env, &s(&env, "owner")));
    });
}

#[test]
fn test_update_unknown_authority() {
    let (env, cid) = setup();
    with_contract!(env, &cid, {
        bootstrap(&env);
        let result = update_authority(
            &env,
            &signed(&env, &[1, 2]),
            s(&env, "ghost"),
            Some(keys(&env, &[4], 1)),
            false,
        );
        assert_eq!(result, Err(WalletError::UnknownAuthority));
    });
}

#[test]
fn test_owner_updates_ordinary_authority() {
    let (env, cid) = setup();
    with_contract!(env, &cid, {
        bootstrap(&env);
        add_authority(&env, &signed(&env, &[1, 2]), s(&env, "spender"), keys(&env, &[4], 1), false)
            .unwrap();
        advance(&env, 10 * DAY);

        let result = update_authority(
            &env,
            &signed(&env, &[4]),
            s(&env, "spender"),
            Some(keys(&env, &[5], 1)),
            false,
        );
        assert_eq!(result, Err(WalletError::ThresholdNotMet));

        update_authority(
            &env,
            &signed(&env, &[1, 2]),
            s(&env, "spender"),
            Some(keys(&env, &[5], 1)),
            false,
        )
        .unwrap();
        let spender = storage::get_authority(&env, &s(&env, "spender")).unwrap();
        assert_eq!(spender, {
            let mut expected = keys(&env, &[5], 1);
            expected.last_update = (T0 + 10 * DAY) * 1000;
            expected
        });

        update_authority(&env, &signed(&env, &[1, 2]), s(&env, "spender"), None, false).unwrap();
        assert!(!storage::has_authority(&env, &s(&env, "spender")));
    });
}

#[test]
fn test_recovery_overrides_owner() {
    let (env, cid) = setup();
    with_contract!(env, &cid, {
        bootstrap(&env);
        advance(&env, 100 * DAY);

        // recovery alone replaces the owner keys
        update_authority(
            &env,
            &signed(&env, &[3]),
            s(&env, "owner"),
            Some(keys(&env, &[8, 9], 1)),
            false,
        )
        .unwrap();
        let owner = storage::get_authority(&env, &s(&env, "owner")).unwrap();
        assert_eq!(owner.weight_threshold, 1);
    });
}

#[test]
fn test_recovery_updates_itself_and_clears_request() {
    let (env, cid) = setup();
    with_contract!(env, &cid, {
        bootstrap(&env);
        advance(&env, 2 * DAY);
        request_update_recovery(&env, &signed(&env, &[1, 2]), Some(keys(&env, &[6], 1))).unwrap();
        assert!(storage::get_recovery_request(&env).is_some());

        update_authority(
            &env,
            &signed(&env, &[3]),
            s(&env, "recovery"),
            Some(keys(&env, &[7], 1)),
            false,
        )
        .unwrap();
        assert!(storage::get_recovery_request(&env).is_none());
    });
}

// ============================================================================
// Grace Period
// ============================================================================

#[test]
fn test_owner_changes_recovery_within_grace_period() {
    let (env, cid) = setup();
    with_contract!(env, &cid, {
        bootstrap(&env);
        // exactly at the bound is still inside
        advance(&env, DAY);
        update_authority(
            &env,
            &signed(&env, &[1, 2]),
            s(&env, "recovery"),
            Some(keys(&env, &[4], 1)),
            false,
        )
        .unwrap();
        let recovery = storage::get_authority(&env, &s(&env, "recovery")).unwrap();
        assert_eq!(recovery.last_update, (T0 + DAY) * 1000);
    });
}

#[test]
fn test_owner_cannot_change_recovery_after_grace_period() {
    let (env, cid) = setup();
    with_contract!(env, &cid, {
        bootstrap(&env);
        advance(&env, DAY + 1);
        let result = update_authority(
            &env,
            &signed(&env, &[1, 2]),
            s(&env, "recovery"),
            Some(keys(&env, &[4], 1)),
            false,
        );
        assert_eq!(result, Err(WalletError::RecoveryRequestNotFound));
        assert_eq!(result.unwrap_err().kind(), ErrorKind::RequestState);
    });
}

#[test]
fn test_grace_period_still_requires_owner_consent() {
    let (env, cid) = setup();
    with_contract!(env, &cid, {
        bootstrap(&env);
        let result = update_authority(
            &env,
            &signed(&env, &[1]),
            s(&env, "recovery"),
            Some(keys(&env, &[4], 1)),
            false,
        );
        assert_eq!(result, Err(WalletError::RecoveryRequestNotFound));
    });
}

#[test]
fn test_owner_cannot_remove_recovery_after_grace_period() {
    let (env, cid) = setup();
    with_contract!(env, &cid, {
        bootstrap(&env);
        advance(&env, 2 * DAY);
        let result = update_authority(
            &env,
            &signed(&env, &[1, 2]),
            s(&env, "recovery"),
            None,
            false,
        );
        assert_eq!(result, Err(WalletError::RecoveryRequestNotFound));
        assert!(storage::has_authority(&env, &s(&env, "recovery")));
    });
}

// ============================================================================
// Delayed Recovery Requests
// ============================================================================

#[test]
fn test_recovery_request_lifecycle() {
    let (env, cid) = setup();
    with_contract!(env, &cid, {
        bootstrap(&env);
        advance(&env, 2 * DAY);
        let requested_at = (T0 + 2 * DAY) * 1000;

        request_update_recovery(&env, &signed(&env, &[1, 2]), Some(keys(&env, &[6], 1))).unwrap();
        let request = storage::get_recovery_request(&env).unwrap();
        assert_eq!(request.application_time, requested_at + PERIOD_UPDATE_RECOVERY);
        assert_eq!(request.application_time, requested_at + 30 * DAY * 1000);

        advance(&env, 29 * DAY);
        let result = update_authority(
            &env,
            &Consent::empty(&env),
            s(&env, "recovery"),
            Some(keys(&env, &[6], 1)),
            false,
        );
        assert_eq!(result, Err(WalletError::ApplicationTimeNotReached));

        advance(&env, DAY);
        update_authority(
            &env,
            &Consent::empty(&env),
            s(&env, "recovery"),
            Some(keys(&env, &[6], 1)),
            false,
        )
        .unwrap();
        assert!(storage::get_recovery_request(&env).is_none());

        let recovery = storage::get_authority(&env, &s(&env, "recovery")).unwrap();
        assert_eq!(recovery.key_auths, keys(&env, &[6], 1).key_auths);
    });
}

#[test]
fn test_recovery_request_content_must_match() {
    let (env, cid) = setup();
    with_contract!(env, &cid, {
        bootstrap(&env);
        advance(&env, 2 * DAY);
        request_update_recovery(&env, &signed(&env, &[1, 2]), Some(keys(&env, &[6], 1))).unwrap();
        advance(&env, 31 * DAY);

        let result = update_authority(
            &env,
            &Consent::empty(&env),
            s(&env, "recovery"),
            Some(keys(&env, &[7], 1)),
            false,
        );
        assert_eq!(result, Err(WalletError::RequestMismatch));

        // an update request does not allow a removal
        let result = update_authority(
            &env,
            &Consent::empty(&env),
            s(&env, "recovery"),
            None,
            false,
        );
        assert_eq!(result, Err(WalletError::RequestMismatch));
    });
}

#[test]
fn test_recovery_removal_request() {
    let (env, cid) = setup();
    with_contract!(env, &cid, {
        bootstrap(&env);
        advance(&env, 2 * DAY);
        request_update_recovery(&env, &signed(&env, &[1, 2]), None).unwrap();
        advance(&env, 30 * DAY);

        update_authority(&env, &Consent::empty(&env), s(&env, "recovery"), None, false).unwrap();
        assert!(!storage::has_authority(&env, &s(&env, "recovery")));
        assert!(storage::get_recovery_request(&env).is_none());
    });
}

#[test]
fn test_duplicate_signer_blocks_every_path() {
    let (env, cid) = setup();
    with_contract!(env, &cid, {
        bootstrap(&env);
        advance(&env, 2 * DAY);
        request_update_recovery(&env, &signed(&env, &[1, 2]), Some(keys(&env, &[6], 1))).unwrap();
        advance(&env, 30 * DAY);

        let result = update_authority(
            &env,
            &signed(&env, &[3, 3]),
            s(&env, "recovery"),
            Some(keys(&env, &[6], 1)),
            false,
        );
        assert_eq!(result, Err(WalletError::DuplicateSigner));
        assert!(storage::get_recovery_request(&env).is_some());
    });
}

#[test]
fn test_only_one_recovery_request_at_a_time() {
    let (env, cid) = setup();
    with_contract!(env, &cid, {
        bootstrap(&env);
        request_update_recovery(&env, &signed(&env, &[1, 2]), Some(keys(&env, &[6], 1))).unwrap();
        let result = request_update_recovery(&env, &signed(&env, &[1, 2]), None);
        assert_eq!(result, Err(WalletError::RecoveryRequestOngoing));
    });
}

#[test]
fn test_recovery_request_needs_owner() {
    let (env, cid) = setup();
    with_contract!(env, &cid, {
        bootstrap(&env);
        let result = request_update_recovery(&env, &signed(&env, &[3]), Some(keys(&env, &[6], 1)));
        assert_eq!(result, Err(WalletError::ThresholdNotMet));
        assert!(storage::get_recovery_request(&env).is_none());
    });
}

#[test]
fn test_recovery_request_validates_proposal() {
    let (env, cid) = setup();
    with_contract!(env, &cid, {
        bootstrap(&env);
        let result = request_update_recovery(
            &env,
            &signed(&env, &[1, 2]),
            Some(keys(&env, &[6], 2)),
        );
        assert_eq!(result, Err(WalletError::ImpossibleAuthority));
    });
}

#[test]
fn test_recovery_request_requires_existing_recovery() {
    let (env, cid) = setup();
    with_contract!(env, &cid, {
        add_authority(&env, &Consent::empty(&env), s(&env, "owner"), keys(&env, &[1, 2], 2), false)
            .unwrap();
        let result = request_update_recovery(
            &env,
            &signed(&env, &[1, 2]),
            Some(keys(&env, &[6], 1)),
        );
        assert_eq!(result, Err(WalletError::UnknownAuthority));
    });
}

#[test]
fn test_cancel_recovery_request() {
    let (env, cid) = setup();
    with_contract!(env, &cid, {
        bootstrap(&env);
        assert_eq!(
            cancel_request_update_recovery(&env, &signed(&env, &[1, 2])),
            Err(WalletError::RecoveryRequestNotFound)
        );

        request_update_recovery(&env, &signed(&env, &[1, 2]), None).unwrap();
        assert_eq!(
            cancel_request_update_recovery(&env, &signed(&env, &[3])),
            Err(WalletError::ThresholdNotMet)
        );

        cancel_request_update_recovery(&env, &signed(&env, &[1, 2])).unwrap();
        assert!(storage::get_recovery_request(&env).is_none());

        // a new request can be opened again
        request_update_recovery(&env, &signed(&env, &[1, 2]), None).unwrap();
    });
}
