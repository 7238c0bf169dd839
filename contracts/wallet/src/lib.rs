//! # Wallet
//!
//! A custom account contract whose actions are approved by weighted,
//! named authorities.
//!
//! - "owner" is created first and administers the wallet.
//! - "recovery" can override "owner"; "owner" can only replace "recovery"
//!   shortly after its last update or through a request that waits
//!   `period_update_recovery`.
//! - Protections bind a target contract (or one of its entry points) to a
//!   local authority or to an external contract that decides for itself.
//!   Changing one outside its grace period waits for the protection's own
//!   `delay_update`, unless "recovery" consents.
//!
//! Signatures reach the wallet through `__check_auth`. Every other entry
//! point that needs consent first requires the wallet's own authorization,
//! then reads the signers that `__check_auth` verified for the action.

#![no_std]

use soroban_sdk::{
    auth::{Context, CustomAccountInterface},
    contract, contractimpl,
    crypto::Hash,
    Address, Env, String, Vec,
};

mod authority;
mod config;
mod consent;
mod error;
mod events;
mod protection;
mod requests;
mod storage;
mod types;
mod verifier;

pub use config::{
    WalletConfig, GRACE_PERIOD_PROTECTION, GRACE_PERIOD_RECOVERY, PERIOD_UPDATE_RECOVERY,
};
pub use consent::Consent;
pub use error::{ErrorKind, WalletError};
pub use types::{
    Authority, AuthorityChange, AuthorityEntry, AuthorizeRequest, CallTarget, Ed25519Signature,
    ExternalAuthority, KeyAuth, KeyHolder, ProtectedTarget, Protection, ProtectionAuthority,
    ProtectionChange, ProtectionEntry, ProtectionRequest, RecoveryRequest, OWNER, RECOVERY,
};

#[cfg(test)]
mod authority_test;

#[contract]
pub struct Wallet;

#[contractimpl]
impl Wallet {
    // ── Configuration ─────────────────────────────────────────────────────────

    /// Sets the governance periods. Only possible before "owner" exists.
    ///
    /// Takes no consent: whoever deploys the wallet is trusted to configure
    /// it in the same transaction that creates "owner".
    ///
    /// # Errors
    /// - `ConfigLocked` - "owner" already exists
    /// - `InvalidConfig` - Zero recovery period, or a grace period longer
    ///   than it
    pub fn configure(env: Env, config: WalletConfig) -> Result<(), WalletError> {
        config::configure(&env, config)
    }

    pub fn get_config(env: Env) -> WalletConfig {
        config::load(&env)
    }

    // ── Authorities ───────────────────────────────────────────────────────────

    /// Creates an authority.
    ///
    /// # Arguments
    /// * `name` - Authority name; the first one must be "owner"
    /// * `authority` - Key authorizations and threshold
    /// * `impossible` - Must be `true` exactly when the threshold can never
    ///   be reached
    /// * `caller` - Calling contract whose weight should count, if any
    ///
    /// # Errors
    /// - `FirstAuthorityMustBeOwner` - No "owner" yet and `name` is another
    /// - `AuthorityAlreadyExists` - `name` is taken
    /// - `ImpossibleAuthority`, `ImpossibleNotTagged`,
    ///   `WronglyTaggedImpossible` - Threshold check failed
    /// - `ThresholdNotMet` - "owner" did not consent
    pub fn add_authority(
        env: Env,
        name: String,
        authority: Authority,
        impossible: bool,
        caller: Option<Address>,
    ) -> Result<(), WalletError> {
        let consent = if storage::has_authority(&env, &String::from_str(&env, OWNER)) {
            consent::acquire(&env, caller)
        } else {
            Consent::empty(&env)
        };
        authority::add_authority(&env, &consent, name, authority, impossible)
    }

    /// Updates an authority, or removes it when `authority` is `None`.
    ///
    /// # Errors
    /// - `OwnerNotRemovable` - Attempt to remove "owner"
    /// - `UnknownAuthority` - `name` does not exist
    /// - `ThresholdNotMet` - No consent path succeeded
    /// - `RecoveryRequestNotFound`, `ApplicationTimeNotReached`,
    ///   `RequestMismatch` - Delayed "recovery" change not applicable
    pub fn update_authority(
        env: Env,
        name: String,
        authority: Option<Authority>,
        impossible: bool,
        caller: Option<Address>,
    ) -> Result<(), WalletError> {
        let consent = consent::acquire(&env, caller);
        authority::update_authority(&env, &consent, name, authority, impossible)
    }

    /// Schedules a change (`Some`) or removal (`None`) of "recovery".
    pub fn request_update_recovery(
        env: Env,
        authority: Option<Authority>,
        caller: Option<Address>,
    ) -> Result<(), WalletError> {
        let consent = consent::acquire(&env, caller);
        authority::request_update_recovery(&env, &consent, authority)
    }

    pub fn cancel_request_update_recovery(
        env: Env,
        caller: Option<Address>,
    ) -> Result<(), WalletError> {
        let consent = consent::acquire(&env, caller);
        authority::cancel_request_update_recovery(&env, &consent)
    }

    // ── Protections ───────────────────────────────────────────────────────────

    pub fn add_protection(
        env: Env,
        target: ProtectedTarget,
        protection: Protection,
        caller: Option<Address>,
    ) -> Result<(), WalletError> {
        let consent = consent::acquire(&env, caller);
        protection::add_protection(&env, &consent, target, protection)
    }

    /// Schedules a change (`Some`) or removal (`None`) of a protection.
    ///
    /// # Returns
    /// The id of the new request
    pub fn request_update_protection(
        env: Env,
        target: ProtectedTarget,
        protection: Option<Protection>,
        caller: Option<Address>,
    ) -> Result<u32, WalletError> {
        let consent = consent::acquire(&env, caller);
        protection::request_update_protection(&env, &consent, target, protection)
    }

    pub fn cancel_request_update_protection(
        env: Env,
        id: u32,
        caller: Option<Address>,
    ) -> Result<(), WalletError> {
        let consent = consent::acquire(&env, caller);
        protection::cancel_request_update_protection(&env, &consent, id)
    }

    /// Updates (`Some`) or removes (`None`) a protection.
    pub fn update_protection(
        env: Env,
        target: ProtectedTarget,
        protection: Option<Protection>,
        caller: Option<Address>,
    ) -> Result<(), WalletError> {
        let consent = consent::acquire(&env, caller);
        protection::update_protection(&env, &consent, target, protection)
    }

    // ── Authorization ─────────────────────────────────────────────────────────

    /// Answers whether the current action may perform `call`.
    pub fn authorize(
        env: Env,
        call: CallTarget,
        caller: Option<Address>,
    ) -> Result<bool, WalletError> {
        let consent = consent::acquire(&env, caller);
        protection::authorize(&env, &consent, &call)
    }

    /// Fails unless the current action satisfies authority `name`.
    pub fn require_authority(
        env: Env,
        name: String,
        caller: Option<Address>,
    ) -> Result<(), WalletError> {
        let consent = consent::acquire(&env, caller);
        verifier::require_authority(&env, &consent, &name)
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    pub fn get_authorities(env: Env) -> Vec<AuthorityEntry> {
        storage::list_authorities(&env)
    }

    pub fn get_protections(env: Env) -> Vec<ProtectionEntry> {
        storage::list_protections(&env)
    }

    pub fn get_request_update_recovery(env: Env) -> Option<RecoveryRequest> {
        storage::get_recovery_request(&env)
    }

    pub fn get_requests_update_protection(env: Env) -> Vec<ProtectionRequest> {
        storage::list_protection_requests(&env)
    }
}

#[contractimpl]
impl CustomAccountInterface for Wallet {
    type Signature = Vec<Ed25519Signature>;
    type Error = WalletError;

    /// Verifies the signatures of an action and authorizes its contexts.
    ///
    /// Calls to the wallet itself only record the verified signers; the
    /// called entry point evaluates them. Calls to other contracts are
    /// decided here by the protections.
    #[allow(non_snake_case)]
    fn __check_auth(
        env: Env,
        signature_payload: Hash<32>,
        signatures: Vec<Ed25519Signature>,
        auth_contexts: Vec<Context>,
    ) -> Result<(), WalletError> {
        let signers = consent::verify_signatures(&env, &signature_payload, &signatures);
        let consent = Consent::new(signers.clone(), None);

        for context in auth_contexts.iter() {
            match context {
                Context::Contract(c) if c.contract == env.current_contract_address() => {
                    storage::put_pending_signers(&env, &signers);
                }
                Context::Contract(c) => {
                    let call = CallTarget {
                        contract: c.contract,
                        entry_point: c.fn_name,
                    };
                    if !protection::authorize(&env, &consent, &call)? {
                        return Err(WalletError::ExternalAuthorityDenied);
                    }
                }
                _ => return Err(WalletError::UnsupportedAuthorization),
            }
        }
        Ok(())
    }
}
