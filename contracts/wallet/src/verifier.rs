//! # Weight Verifier and Impossibility Checker
//!
//! An authority is satisfied when the weights of its entries matched by the
//! action's signers and caller add up to its threshold. Weights are summed
//! in `u64` so that no combination of `u32` weights can wrap.

use soroban_sdk::{log, BytesN, Env, String, Vec};

use crate::consent::Consent;
use crate::error::WalletError;
use crate::storage;
use crate::types::{Authority, KeyHolder};

/// Checks that `consent` satisfies the authority called `name`.
///
/// # Errors
/// - [`WalletError::UnknownAuthority`] if there is no such authority.
/// - [`WalletError::DuplicateSigner`] if a signer appears twice.
/// - [`WalletError::ThresholdNotMet`] if the weight is insufficient.
pub fn verify_authority(env: &Env, consent: &Consent, name: &String) -> Result<(), WalletError> {
    let authority = storage::get_authority(env, name).ok_or(WalletError::UnknownAuthority)?;

    let mut total_weight: u64 = 0;
    let mut seen: Vec<BytesN<32>> = Vec::new(env);
    for signer in consent.signers.iter() {
        if seen.contains(signer.clone()) {
            return Err(WalletError::DuplicateSigner);
        }
        seen.push_back(signer.clone());

        for key_auth in authority.key_auths.iter() {
            if let KeyHolder::Key(key) = &key_auth.holder {
                if *key == signer {
                    total_weight = total_weight.saturating_add(u64::from(key_auth.weight));
                }
            }
        }
    }

    if let Some(caller) = &consent.caller {
        for key_auth in authority.key_auths.iter() {
            if let KeyHolder::Contract(contract) = &key_auth.holder {
                if contract == caller {
                    total_weight = total_weight.saturating_add(u64::from(key_auth.weight));
                }
            }
        }
    }

    if total_weight < u64::from(authority.weight_threshold) {
        return Err(WalletError::ThresholdNotMet);
    }
    Ok(())
}

/// Same check as [`verify_authority`], for call sites with no fallback.
pub fn require_authority(env: &Env, consent: &Consent, name: &String) -> Result<(), WalletError> {
    verify_authority(env, consent, name).map_err(|err| {
        log!(env, "authority {} failed", name.clone());
        err
    })
}

/// Non-fatal form used where another consent path may still succeed.
///
/// A missing authority or an unmet threshold yields `Ok(false)`; a duplicate
/// signer stays an error so that no fallback path can accept it.
pub fn consents(env: &Env, consent: &Consent, name: &String) -> Result<bool, WalletError> {
    match verify_authority(env, consent, name) {
        Ok(()) => Ok(true),
        Err(WalletError::UnknownAuthority) | Err(WalletError::ThresholdNotMet) => {
            log!(env, "authority {} not satisfied", name.clone());
            Ok(false)
        }
        Err(err) => Err(err),
    }
}

/// Whether no achievable set of signers and caller can reach the threshold.
///
/// All keys can co-sign one action, but only one contract can be the caller,
/// so each contract entry is judged together with the full key weight.
///
/// # Errors
/// - [`WalletError::DuplicateKeyAuth`] if an identity appears twice.
pub fn is_impossible(authority: &Authority) -> Result<bool, WalletError> {
    let key_auths = &authority.key_auths;
    let threshold = u64::from(authority.weight_threshold);

    let mut key_weight: u64 = 0;
    for (i, key_auth) in key_auths.iter().enumerate() {
        for other in key_auths.iter().skip(i + 1) {
            if other.holder == key_auth.holder {
                return Err(WalletError::DuplicateKeyAuth);
            }
        }
        if let KeyHolder::Key(_) = key_auth.holder {
            key_weight = key_weight.saturating_add(u64::from(key_auth.weight));
        }
    }

    let mut has_contract = false;
    for key_auth in key_auths.iter() {
        if let KeyHolder::Contract(_) = key_auth.holder {
            has_contract = true;
            if key_weight.saturating_add(u64::from(key_auth.weight)) < threshold {
                return Ok(true);
            }
        }
    }

    if has_contract {
        return Ok(false);
    }
    Ok(key_weight < threshold)
}
