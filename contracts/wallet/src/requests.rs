//! # Request Ledger
//!
//! Pending, time-delayed policy changes. "recovery" has a single slot; each
//! protected target has at most one request, identified by a persisted
//! counter. Lookups scan every pending protection request, which is fine for
//! the handful a wallet holds.

use soroban_sdk::Env;

use crate::error::WalletError;
use crate::storage;
use crate::types::{
    Authority, AuthorityChange, ProtectedTarget, Protection, ProtectionChange, ProtectionRequest,
    RecoveryRequest,
};

// ========================================================================
// Recovery
// ========================================================================

/// Stores a new recovery request. The caller has checked that the slot is
/// free with [`ensure_no_recovery_request`].
pub fn open_recovery_request(
    env: &Env,
    authority: Option<&Authority>,
    application_time: u64,
) -> RecoveryRequest {
    let request = RecoveryRequest {
        change: AuthorityChange::of(authority),
        application_time,
    };
    storage::put_recovery_request(env, &request);
    request
}

pub fn ensure_no_recovery_request(env: &Env) -> Result<(), WalletError> {
    if storage::get_recovery_request(env).is_some() {
        return Err(WalletError::RecoveryRequestOngoing);
    }
    Ok(())
}

/// Checks that the pending recovery request allows `authority` at `now`.
///
/// # Errors
/// - [`WalletError::RecoveryRequestNotFound`] if nothing is pending.
/// - [`WalletError::ApplicationTimeNotReached`] if it is too early.
/// - [`WalletError::RequestMismatch`] if the request proposes something else.
pub fn match_recovery_request(
    env: &Env,
    authority: &Option<Authority>,
    now: u64,
) -> Result<RecoveryRequest, WalletError> {
    let request =
        storage::get_recovery_request(env).ok_or(WalletError::RecoveryRequestNotFound)?;
    if request.application_time > now {
        return Err(WalletError::ApplicationTimeNotReached);
    }
    if AuthorityChange::of(authority.as_ref()) != request.change {
        return Err(WalletError::RequestMismatch);
    }
    Ok(request)
}

pub fn cancel_recovery_request(env: &Env) -> Result<RecoveryRequest, WalletError> {
    let request =
        storage::get_recovery_request(env).ok_or(WalletError::RecoveryRequestNotFound)?;
    storage::remove_recovery_request(env);
    Ok(request)
}

/// Drops the pending recovery request, if any.
pub fn clear_recovery_request(env: &Env) {
    if storage::get_recovery_request(env).is_some() {
        storage::remove_recovery_request(env);
    }
}

// ========================================================================
// Protections
// ========================================================================

pub fn find_for_target(env: &Env, target: &ProtectedTarget) -> Option<ProtectionRequest> {
    storage::list_protection_requests(env)
        .iter()
        .find(|request| request.target == *target)
}

/// First pending request proposing exactly `protection` for `target`.
pub fn find_matching(
    env: &Env,
    target: &ProtectedTarget,
    protection: &Option<Protection>,
) -> Option<ProtectionRequest> {
    let proposed = ProtectionChange::of(protection.as_ref());
    storage::list_protection_requests(env)
        .iter()
        .find(|request| request.target == *target && request.change == proposed)
}

pub fn ensure_no_request_for_target(
    env: &Env,
    target: &ProtectedTarget,
) -> Result<(), WalletError> {
    if find_for_target(env, target).is_some() {
        return Err(WalletError::ProtectionRequestOngoing);
    }
    Ok(())
}

/// Stores a new protection request under the next counter value. The
/// caller has checked with [`ensure_no_request_for_target`] that `target`
/// has none.
///
/// # Errors
/// - [`WalletError::RequestCounterOverflow`] if ids are exhausted.
pub fn open_protection_request(
    env: &Env,
    target: &ProtectedTarget,
    protection: Option<&Protection>,
    application_time: u64,
) -> Result<ProtectionRequest, WalletError> {
    let id = storage::get_protection_request_counter(env)
        .checked_add(1)
        .ok_or(WalletError::RequestCounterOverflow)?;

    let request = ProtectionRequest {
        id,
        target: target.clone(),
        change: ProtectionChange::of(protection),
        application_time,
    };
    storage::put_protection_request(env, &request);
    storage::put_protection_request_counter(env, id);
    Ok(request)
}

/// Finds the request that allows applying `protection` to `target` at `now`.
///
/// # Errors
/// - [`WalletError::RequestMismatch`] if `target` has a request proposing
///   something else.
/// - [`WalletError::ProtectionRequestNotFound`] if `target` has none.
/// - [`WalletError::ApplicationTimeNotReached`] if it is too early.
pub fn match_protection_request(
    env: &Env,
    target: &ProtectedTarget,
    protection: &Option<Protection>,
    now: u64,
) -> Result<ProtectionRequest, WalletError> {
    let request = match find_matching(env, target, protection) {
        Some(request) => request,
        None if find_for_target(env, target).is_some() => {
            return Err(WalletError::RequestMismatch);
        }
        None => return Err(WalletError::ProtectionRequestNotFound),
    };
    if request.application_time > now {
        return Err(WalletError::ApplicationTimeNotReached);
    }
    Ok(request)
}

pub fn cancel_protection_request(env: &Env, id: u32) -> Result<ProtectionRequest, WalletError> {
    let request =
        storage::get_protection_request(env, id).ok_or(WalletError::ProtectionRequestNotFound)?;
    storage::remove_protection_request(env, id);
    Ok(request)
}

/// Removes every request proposing exactly `protection` for `target`.
pub fn consume_matching(
    env: &Env,
    target: &ProtectedTarget,
    protection: &Option<Protection>,
) {
    while let Some(request) = find_matching(env, target, protection) {
        storage::remove_protection_request(env, request.id);
    }
}
