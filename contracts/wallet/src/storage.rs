//! # Entity Store
//!
//! Typed access to the wallet's persisted entities. Soroban storage cannot
//! be iterated, so every collection that must be listed keeps an index
//! vector next to its entries. Indexes preserve insertion order.

use soroban_sdk::{contracttype, BytesN, Env, String, Vec};

use crate::config::WalletConfig;
use crate::types::{
    Authority, AuthorityEntry, ProtectedTarget, Protection, ProtectionEntry, ProtectionRequest,
    RecoveryRequest,
};

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Config,

    Authority(String),
    AuthorityIndex,

    Protection(ProtectedTarget),
    ProtectionIndex,

    RecoveryRequest,

    ProtectionRequest(u32),
    ProtectionRequestIndex,
    ProtectionRequestCounter,

    /// Signers verified by `__check_auth` for the wallet's own entry points
    PendingSigners,
}

// ========================================================================
// Config
// ========================================================================

pub fn get_config(env: &Env) -> Option<WalletConfig> {
    env.storage().instance().get(&DataKey::Config)
}

pub fn put_config(env: &Env, config: &WalletConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

// ========================================================================
// Authorities
// ========================================================================

pub fn get_authority(env: &Env, name: &String) -> Option<Authority> {
    env.storage()
        .persistent()
        .get(&DataKey::Authority(name.clone()))
}

pub fn has_authority(env: &Env, name: &String) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Authority(name.clone()))
}

pub fn put_authority(env: &Env, name: &String, authority: &Authority) {
    let key = DataKey::Authority(name.clone());
    if !env.storage().persistent().has(&key) {
        let mut index = authority_index(env);
        index.push_back(name.clone());
        env.storage()
            .persistent()
            .set(&DataKey::AuthorityIndex, &index);
    }
    env.storage().persistent().set(&key, authority);
}

pub fn remove_authority(env: &Env, name: &String) {
    env.storage()
        .persistent()
        .remove(&DataKey::Authority(name.clone()));
    let mut index = authority_index(env);
    if let Some(i) = index.first_index_of(name) {
        index.remove(i);
        env.storage()
            .persistent()
            .set(&DataKey::AuthorityIndex, &index);
    }
}

pub fn list_authorities(env: &Env) -> Vec<AuthorityEntry> {
    let mut entries = Vec::new(env);
    for name in authority_index(env).iter() {
        if let Some(authority) = get_authority(env, &name) {
            entries.push_back(AuthorityEntry { name, authority });
        }
    }
    entries
}

fn authority_index(env: &Env) -> Vec<String> {
    env.storage()
        .persistent()
        .get(&DataKey::AuthorityIndex)
        .unwrap_or_else(|| Vec::new(env))
}

// ========================================================================
// Protections
// ========================================================================

pub fn get_protection(env: &Env, target: &ProtectedTarget) -> Option<Protection> {
    env.storage()
        .persistent()
        .get(&DataKey::Protection(target.clone()))
}

pub fn put_protection(env: &Env, target: &ProtectedTarget, protection: &Protection) {
    let key = DataKey::Protection(target.clone());
    if !env.storage().persistent().has(&key) {
        let mut index = protection_index(env);
        index.push_back(target.clone());
        env.storage()
            .persistent()
            .set(&DataKey::ProtectionIndex, &index);
    }
    env.storage().persistent().set(&key, protection);
}

pub fn remove_protection(env: &Env, target: &ProtectedTarget) {
    env.storage()
        .persistent()
        .remove(&DataKey::Protection(target.clone()));
    let mut index = protection_index(env);
    if let Some(i) = index.first_index_of(target) {
        index.remove(i);
        env.storage()
            .persistent()
            .set(&DataKey::ProtectionIndex, &index);
    }
}

pub fn list_protections(env: &Env) -> Vec<ProtectionEntry> {
    let mut entries = Vec::new(env);
    for target in protection_index(env).iter() {
        if let Some(protection) = get_protection(env, &target) {
            entries.push_back(ProtectionEntry { target, protection });
        }
    }
    entries
}

fn protection_index(env: &Env) -> Vec<ProtectedTarget> {
    env.storage()
        .persistent()
        .get(&DataKey::ProtectionIndex)
        .unwrap_or_else(|| Vec::new(env))
}

// ========================================================================
// Recovery Request (single slot)
// ========================================================================

pub fn get_recovery_request(env: &Env) -> Option<RecoveryRequest> {
    env.storage().persistent().get(&DataKey::RecoveryRequest)
}

pub fn put_recovery_request(env: &Env, request: &RecoveryRequest) {
    env.storage()
        .persistent()
        .set(&DataKey::RecoveryRequest, request);
}

pub fn remove_recovery_request(env: &Env) {
    env.storage().persistent().remove(&DataKey::RecoveryRequest);
}

// ========================================================================
// Protection Requests
// ========================================================================

pub fn get_protection_request(env: &Env, id: u32) -> Option<ProtectionRequest> {
    env.storage()
        .persistent()
        .get(&DataKey::ProtectionRequest(id))
}

pub fn put_protection_request(env: &Env, request: &ProtectionRequest) {
    let key = DataKey::ProtectionRequest(request.id);
    if !env.storage().persistent().has(&key) {
        let mut index = protection_request_index(env);
        index.push_back(request.id);
        env.storage()
            .persistent()
            .set(&DataKey::ProtectionRequestIndex, &index);
    }
    env.storage().persistent().set(&key, request);
}

pub fn remove_protection_request(env: &Env, id: u32) {
    env.storage()
        .persistent()
        .remove(&DataKey::ProtectionRequest(id));
    let mut index = protection_request_index(env);
    if let Some(i) = index.first_index_of(id) {
        index.remove(i);
        env.storage()
            .persistent()
            .set(&DataKey::ProtectionRequestIndex, &index);
    }
}

pub fn list_protection_requests(env: &Env) -> Vec<ProtectionRequest> {
    let mut requests = Vec::new(env);
    for id in protection_request_index(env).iter() {
        if let Some(request) = get_protection_request(env, id) {
            requests.push_back(request);
        }
    }
    requests
}

fn protection_request_index(env: &Env) -> Vec<u32> {
    env.storage()
        .persistent()
        .get(&DataKey::ProtectionRequestIndex)
        .unwrap_or_else(|| Vec::new(env))
}

/// Last id handed out; 0 before the first request.
pub fn get_protection_request_counter(env: &Env) -> u32 {
    env.storage()
        .persistent()
        .get(&DataKey::ProtectionRequestCounter)
        .unwrap_or(0u32)
}

pub fn put_protection_request_counter(env: &Env, counter: u32) {
    env.storage()
        .persistent()
        .set(&DataKey::ProtectionRequestCounter, &counter);
}

// ========================================================================
// Pending Signers
// ========================================================================

pub fn put_pending_signers(env: &Env, signers: &Vec<BytesN<32>>) {
    env.storage()
        .temporary()
        .set(&DataKey::PendingSigners, signers);
}

/// Reads and clears the signers recorded for the current action.
pub fn take_pending_signers(env: &Env) -> Vec<BytesN<32>> {
    let signers = env
        .storage()
        .temporary()
        .get(&DataKey::PendingSigners)
        .unwrap_or_else(|| Vec::new(env));
    env.storage().temporary().remove(&DataKey::PendingSigners);
    signers
}
