//! # Wallet Events
//!
//! Every governance change publishes one `#[contractevent]` struct. The macro
//! uses the snake_case struct name as the leading topic, except where that
//! name would exceed the 32-character symbol limit; all fields go into the
//! data payload. Consent evaluation itself is not evented, only the
//! state it lets through.

use soroban_sdk::{contractevent, Env, String};

use crate::types::ProtectedTarget;

/// Emitted when a new authority is created.
#[contractevent]
#[derive(Clone, Debug)]
pub struct AuthorityAddedEvent {
    pub name: String,
    pub impossible: bool,
    pub timestamp: u64,
}

#[contractevent]
#[derive(Clone, Debug)]
pub struct AuthorityUpdatedEvent {
    pub name: String,
    pub impossible: bool,
    pub timestamp: u64,
}

#[contractevent]
#[derive(Clone, Debug)]
pub struct AuthorityRemovedEvent {
    pub name: String,
    pub timestamp: u64,
}

/// Emitted when "owner" schedules a change of "recovery".
///
/// # Fields
/// * `removal` – `true` if the request removes "recovery".
/// * `application_time` – earliest time (ms) the change may be applied.
#[contractevent]
#[derive(Clone, Debug)]
pub struct RecoveryUpdateRequestedEvent {
    pub removal: bool,
    pub application_time: u64,
}

#[contractevent]
#[derive(Clone, Debug)]
pub struct RecoveryUpdateCancelledEvent {
    pub timestamp: u64,
}

#[contractevent]
#[derive(Clone, Debug)]
pub struct ProtectionAddedEvent {
    pub target: ProtectedTarget,
    pub timestamp: u64,
}

#[contractevent]
#[derive(Clone, Debug)]
pub struct ProtectionUpdatedEvent {
    pub target: ProtectedTarget,
    pub timestamp: u64,
}

#[contractevent]
#[derive(Clone, Debug)]
pub struct ProtectionRemovedEvent {
    pub target: ProtectedTarget,
    pub timestamp: u64,
}

/// Emitted when a protection change is scheduled.
///
/// # Fields
/// * `id` – request id, used to cancel it.
/// * `target` – protected target the request applies to.
/// * `removal` – `true` if the request removes the protection.
/// * `application_time` – earliest time (ms) the change may be applied.
#[contractevent(topics = ["protection_update_requested"])]
#[derive(Clone, Debug)]
pub struct ProtectionUpdateRequestedEvent {
    pub id: u32,
    pub target: ProtectedTarget,
    pub removal: bool,
    pub application_time: u64,
}

#[contractevent(topics = ["protection_update_cancelled"])]
#[derive(Clone, Debug)]
pub struct ProtectionUpdateCancelledEvent {
    pub id: u32,
    pub target: ProtectedTarget,
}

pub fn emit_authority_added(e: &Env, event: AuthorityAddedEvent) {
    event.publish(e);
}

pub fn emit_authority_updated(e: &Env, event: AuthorityUpdatedEvent) {
    event.publish(e);
}

pub fn emit_authority_removed(e: &Env, event: AuthorityRemovedEvent) {
    event.publish(e);
}

pub fn emit_recovery_update_requested(e: &Env, event: RecoveryUpdateRequestedEvent) {
    event.publish(e);
}

pub fn emit_recovery_update_cancelled(e: &Env, event: RecoveryUpdateCancelledEvent) {
    event.publish(e);
}

pub fn emit_protection_added(e: &Env, event: ProtectionAddedEvent) {
    event.publish(e);
}

pub fn emit_protection_updated(e: &Env, event: ProtectionUpdatedEvent) {
    event.publish(e);
}

pub fn emit_protection_removed(e: &Env, event: ProtectionRemovedEvent) {
    event.publish(e);
}

pub fn emit_protection_update_requested(e: &Env, event: ProtectionUpdateRequestedEvent) {
    event.publish(e);
}

pub fn emit_protection_update_cancelled(e: &Env, event: ProtectionUpdateCancelledEvent) {
    event.publish(e);
}
