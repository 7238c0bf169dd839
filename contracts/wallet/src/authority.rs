//! # Authority Governance
//!
//! Creation, update and removal of named authorities.
//!
//! ## Consent paths for an update or removal
//! 1. "recovery" consents: applied immediately.
//! 2. Any name but "recovery": "owner" must consent.
//! 3. "recovery" itself additionally accepts:
//!    - "owner" consent while the current "recovery" is within its grace
//!      period, or
//!    - a pending recovery request whose application time has passed and
//!      whose content is exactly the change being applied.
//!
//! A successful change of "recovery" drops any pending recovery request.

use soroban_sdk::{log, Env, String};

use crate::config::{self, now_ms};
use crate::consent::Consent;
use crate::error::WalletError;
use crate::events::{
    emit_authority_added, emit_authority_removed, emit_authority_updated,
    emit_recovery_update_cancelled, emit_recovery_update_requested, AuthorityAddedEvent,
    AuthorityRemovedEvent, AuthorityUpdatedEvent, RecoveryUpdateCancelledEvent,
    RecoveryUpdateRequestedEvent,
};
use crate::requests;
use crate::storage;
use crate::types::{is_owner, is_recovery, Authority, OWNER, RECOVERY};
use crate::verifier::{consents, is_impossible, require_authority};

/// Outcome of argument validation.
struct Checked {
    owner_exists: bool,
    existing: Option<Authority>,
}

/// Validates a change of authority `name` before any consent is evaluated.
///
/// `authority == None` means removal.
fn check_arguments(
    env: &Env,
    name: &String,
    authority: Option<&Authority>,
    impossible: bool,
    is_new: bool,
) -> Result<Checked, WalletError> {
    let owner_exists = storage::has_authority(env, &String::from_str(env, OWNER));
    if is_new && !owner_exists && !is_owner(env, name) {
        return Err(WalletError::FirstAuthorityMustBeOwner);
    }
    if authority.is_none() && is_owner(env, name) {
        return Err(WalletError::OwnerNotRemovable);
    }

    let existing = storage::get_authority(env, name);
    if is_new && existing.is_some() {
        return Err(WalletError::AuthorityAlreadyExists);
    }
    if !is_new && existing.is_none() {
        return Err(WalletError::UnknownAuthority);
    }

    if let Some(authority) = authority {
        validate_policy(env, name, authority, impossible)?;
    }

    Ok(Checked {
        owner_exists,
        existing,
    })
}

/// Rejects authorities that could lock the wallet.
///
/// # Errors
/// - [`WalletError::DuplicateKeyAuth`] if an identity appears twice.
/// - [`WalletError::ImpossibleAuthority`] for an impossible "owner"/"recovery".
/// - [`WalletError::ImpossibleNotTagged`] / [`WalletError::WronglyTaggedImpossible`]
///   when `tagged_impossible` disagrees with the checker.
pub fn validate_policy(
    env: &Env,
    name: &String,
    authority: &Authority,
    tagged_impossible: bool,
) -> Result<(), WalletError> {
    let impossible = is_impossible(authority)?;
    if impossible && (is_owner(env, name) || is_recovery(env, name)) {
        return Err(WalletError::ImpossibleAuthority);
    }
    if impossible != tagged_impossible {
        if impossible {
            return Err(WalletError::ImpossibleNotTagged);
        }
        return Err(WalletError::WronglyTaggedImpossible);
    }
    Ok(())
}

/// Creates authority `name`.
///
/// The first authority must be "owner" and needs no consent; every later
/// one needs "owner".
pub fn add_authority(
    env: &Env,
    consent: &Consent,
    name: String,
    mut authority: Authority,
    impossible: bool,
) -> Result<(), WalletError> {
    let checked = check_arguments(env, &name, Some(&authority), impossible, true)?;
    if checked.owner_exists {
        require_authority(env, consent, &String::from_str(env, OWNER))?;
    }

    let now = now_ms(env);
    authority.last_update = now;
    storage::put_authority(env, &name, &authority);

    emit_authority_added(
        env,
        AuthorityAddedEvent {
            name,
            impossible,
            timestamp: now,
        },
    );
    Ok(())
}

/// Updates authority `name`, or removes it when `authority` is `None`.
pub fn update_authority(
    env: &Env,
    consent: &Consent,
    name: String,
    authority: Option<Authority>,
    impossible: bool,
) -> Result<(), WalletError> {
    let checked = check_arguments(env, &name, authority.as_ref(), impossible, false)?;
    let owner = String::from_str(env, OWNER);
    let recovery = String::from_str(env, RECOVERY);
    let now = now_ms(env);

    if !consents(env, consent, &recovery)? {
        if is_recovery(env, &name) {
            authorize_recovery_change(env, consent, &checked, &authority, now)?;
        } else {
            require_authority(env, consent, &owner)?;
        }
    }

    match authority {
        None => {
            storage::remove_authority(env, &name);
            emit_authority_removed(
                env,
                AuthorityRemovedEvent {
                    name: name.clone(),
                    timestamp: now,
                },
            );
        }
        Some(mut authority) => {
            authority.last_update = now;
            storage::put_authority(env, &name, &authority);
            emit_authority_updated(
                env,
                AuthorityUpdatedEvent {
                    name: name.clone(),
                    impossible,
                    timestamp: now,
                },
            );
        }
    }

    if is_recovery(env, &name) {
        requests::clear_recovery_request(env);
    }
    Ok(())
}

/// Fallback paths for changing "recovery" without its own consent.
fn authorize_recovery_change(
    env: &Env,
    consent: &Consent,
    checked: &Checked,
    authority: &Option<Authority>,
    now: u64,
) -> Result<(), WalletError> {
    let config = config::load(env);
    let last_update = checked
        .existing
        .as_ref()
        .map(|a| a.last_update)
        .unwrap_or_default();

    if config::within(last_update, config.grace_period_recovery, now) {
        if consents(env, consent, &String::from_str(env, OWNER))? {
            return Ok(());
        }
    } else {
        log!(env, "recovery not in grace period");
    }

    requests::match_recovery_request(env, authority, now)?;
    Ok(())
}

/// Schedules a change of "recovery" that "owner" may apply after
/// the configured recovery period.
pub fn request_update_recovery(
    env: &Env,
    consent: &Consent,
    authority: Option<Authority>,
) -> Result<(), WalletError> {
    let recovery = String::from_str(env, RECOVERY);
    check_arguments(env, &recovery, authority.as_ref(), false, false)?;
    requests::ensure_no_recovery_request(env)?;
    require_authority(env, consent, &String::from_str(env, OWNER))?;

    let application_time = now_ms(env).saturating_add(config::load(env).period_update_recovery);
    let request = requests::open_recovery_request(env, authority.as_ref(), application_time);

    emit_recovery_update_requested(
        env,
        RecoveryUpdateRequestedEvent {
            removal: request.change.is_removal(),
            application_time,
        },
    );
    Ok(())
}

pub fn cancel_request_update_recovery(env: &Env, consent: &Consent) -> Result<(), WalletError> {
    require_authority(env, consent, &String::from_str(env, OWNER))?;
    requests::cancel_recovery_request(env)?;

    emit_recovery_update_cancelled(
        env,
        RecoveryUpdateCancelledEvent {
            timestamp: now_ms(env),
        },
    );
    Ok(())
}
