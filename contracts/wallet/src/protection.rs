//! # Protection Governance
//!
//! Protections decide which authority may act on a protected target. Their
//! changes follow the same paths as authority changes, with two differences:
//! the grace period is `grace_period_protection`, and the waiting time of a
//! request is the `delay_update` of the protection currently in place.
//!
//! Any number of protection requests may be pending, but at most one per
//! target.

use soroban_sdk::{log, Env, IntoVal, String};

use crate::config::{self, now_ms};
use crate::consent::Consent;
use crate::error::WalletError;
use crate::events::{
    emit_protection_added, emit_protection_removed, emit_protection_update_cancelled,
    emit_protection_update_requested, emit_protection_updated, ProtectionAddedEvent,
    ProtectionRemovedEvent, ProtectionUpdateCancelledEvent, ProtectionUpdateRequestedEvent,
    ProtectionUpdatedEvent,
};
use crate::requests;
use crate::storage;
use crate::types::{
    AuthorizeRequest, CallTarget, ProtectedTarget, Protection, ProtectionAuthority, OWNER, RECOVERY,
};
use crate::verifier::{consents, require_authority};

/// Validates a change of the protection of `target`.
///
/// Returns the protection currently in place, if any.
fn check_arguments(
    env: &Env,
    target: &ProtectedTarget,
    protection: Option<&Protection>,
    is_new: bool,
) -> Result<Option<Protection>, WalletError> {
    let existing = storage::get_protection(env, target);
    if is_new && existing.is_some() {
        return Err(WalletError::ProtectionAlreadyExists);
    }
    if !is_new && existing.is_none() {
        return Err(WalletError::ProtectionNotFound);
    }

    if let Some(protection) = protection {
        if let ProtectionAuthority::Native(name) = &protection.authority {
            if !storage::has_authority(env, name) {
                return Err(WalletError::UnknownAuthority);
            }
        }
    }
    Ok(existing)
}

/// Protects `target` with `protection`. Requires "owner".
pub fn add_protection(
    env: &Env,
    consent: &Consent,
    target: ProtectedTarget,
    mut protection: Protection,
) -> Result<(), WalletError> {
    check_arguments(env, &target, Some(&protection), true)?;
    require_authority(env, consent, &String::from_str(env, OWNER))?;

    let now = now_ms(env);
    protection.last_update = now;
    storage::put_protection(env, &target, &protection);

    emit_protection_added(
        env,
        ProtectionAddedEvent {
            target,
            timestamp: now,
        },
    );
    Ok(())
}

/// Schedules a change of the protection of `target`; `None` schedules its
/// removal. Returns the request id.
pub fn request_update_protection(
    env: &Env,
    consent: &Consent,
    target: ProtectedTarget,
    protection: Option<Protection>,
) -> Result<u32, WalletError> {
    let existing = check_arguments(env, &target, protection.as_ref(), false)?
        .ok_or(WalletError::ProtectionNotFound)?;
    requests::ensure_no_request_for_target(env, &target)?;
    require_authority(env, consent, &String::from_str(env, OWNER))?;

    let application_time = now_ms(env).saturating_add(existing.delay_update);
    let request =
        requests::open_protection_request(env, &target, protection.as_ref(), application_time)?;

    emit_protection_update_requested(
        env,
        ProtectionUpdateRequestedEvent {
            id: request.id,
            target,
            removal: request.change.is_removal(),
            application_time,
        },
    );
    Ok(request.id)
}

pub fn cancel_request_update_protection(
    env: &Env,
    consent: &Consent,
    id: u32,
) -> Result<(), WalletError> {
    require_authority(env, consent, &String::from_str(env, OWNER))?;
    let request = requests::cancel_protection_request(env, id)?;

    emit_protection_update_cancelled(
        env,
        ProtectionUpdateCancelledEvent {
            id,
            target: request.target,
        },
    );
    Ok(())
}

/// Updates the protection of `target`, or removes it when `protection`
/// is `None`.
pub fn update_protection(
    env: &Env,
    consent: &Consent,
    target: ProtectedTarget,
    protection: Option<Protection>,
) -> Result<(), WalletError> {
    let existing = check_arguments(env, &target, protection.as_ref(), false)?
        .ok_or(WalletError::ProtectionNotFound)?;
    let now = now_ms(env);

    if !consents(env, consent, &String::from_str(env, RECOVERY))? {
        let grace_period = config::load(env).grace_period_protection;
        let mut authorized = false;
        if config::within(existing.last_update, grace_period, now) {
            authorized = consents(env, consent, &String::from_str(env, OWNER))?;
        } else {
            log!(env, "protection not in grace period");
        }
        if !authorized {
            requests::match_protection_request(env, &target, &protection, now)?;
        }
    }

    match &protection {
        None => {
            storage::remove_protection(env, &target);
            emit_protection_removed(
                env,
                ProtectionRemovedEvent {
                    target: target.clone(),
                    timestamp: now,
                },
            );
        }
        Some(protection) => {
            let mut protection = protection.clone();
            protection.last_update = now;
            storage::put_protection(env, &target, &protection);
            emit_protection_updated(
                env,
                ProtectionUpdatedEvent {
                    target: target.clone(),
                    timestamp: now,
                },
            );
        }
    }

    requests::consume_matching(env, &target, &protection);
    Ok(())
}

/// Decides whether `consent` may perform `call` on behalf of the wallet.
///
/// The exact entry point's protection wins over the contract's wildcard;
/// an unprotected call needs "owner". A native protection must be satisfied
/// (an error otherwise), an external one answers for itself.
pub fn authorize(env: &Env, consent: &Consent, call: &CallTarget) -> Result<bool, WalletError> {
    let protection = storage::get_protection(
        env,
        &ProtectedTarget::EntryPoint(call.contract.clone(), call.entry_point.clone()),
    )
    .or_else(|| {
        storage::get_protection(
            env,
            &ProtectedTarget::RemainingEntryPoints(call.contract.clone()),
        )
    });

    let Some(protection) = protection else {
        require_authority(env, consent, &String::from_str(env, OWNER))?;
        return Ok(true);
    };

    match protection.authority {
        ProtectionAuthority::Native(name) => {
            require_authority(env, consent, &name)?;
            Ok(true)
        }
        ProtectionAuthority::External(external) => {
            let request = AuthorizeRequest {
                call: call.clone(),
                signers: consent.signers.clone(),
                caller: consent.caller.clone(),
            };
            let verdict: bool = env.invoke_contract(
                &external.contract,
                &external.entry_point,
                (request,).into_val(env),
            );
            Ok(verdict)
        }
    }
}
