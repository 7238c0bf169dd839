//! # Configuration Module
//!
//! Timing parameters of the wallet's governance. They can be set once, at
//! deployment, before the "owner" authority is created; afterwards they are
//! frozen so that no authority can shorten its own waiting periods.

use soroban_sdk::{contracttype, Env, String};

use crate::error::WalletError;
use crate::storage;
use crate::types::OWNER;

const DAY_MS: u64 = 24 * 60 * 60 * 1000;

/// Window after a "recovery" update during which "owner" may change it again.
pub const GRACE_PERIOD_RECOVERY: u64 = DAY_MS;
/// Window after a protection update during which "owner" may change it again.
pub const GRACE_PERIOD_PROTECTION: u64 = DAY_MS;
/// Delay before a requested "recovery" update may be applied.
pub const PERIOD_UPDATE_RECOVERY: u64 = 30 * DAY_MS;

/// Governance periods, all in milliseconds.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct WalletConfig {
    pub grace_period_recovery: u64,
    pub grace_period_protection: u64,
    pub period_update_recovery: u64,
}

impl Default for WalletConfig {
    fn default() -> Self {
        WalletConfig {
            grace_period_recovery: GRACE_PERIOD_RECOVERY,
            grace_period_protection: GRACE_PERIOD_PROTECTION,
            period_update_recovery: PERIOD_UPDATE_RECOVERY,
        }
    }
}

pub fn load(env: &Env) -> WalletConfig {
    storage::get_config(env).unwrap_or_default()
}

/// Replaces the configuration while the wallet is still unowned.
///
/// A grace period longer than the recovery delay would let "owner" replace
/// "recovery" faster through the grace path than any request could, so
/// both grace periods are bounded by `period_update_recovery`.
///
/// # Errors
/// - [`WalletError::ConfigLocked`] once "owner" exists.
/// - [`WalletError::InvalidConfig`] if the recovery period is zero or a
///   grace period exceeds it.
pub fn configure(env: &Env, config: WalletConfig) -> Result<(), WalletError> {
    if storage::has_authority(env, &String::from_str(env, OWNER)) {
        return Err(WalletError::ConfigLocked);
    }
    if config.period_update_recovery == 0
        || config.grace_period_recovery > config.period_update_recovery
        || config.grace_period_protection > config.period_update_recovery
    {
        return Err(WalletError::InvalidConfig);
    }
    storage::put_config(env, &config);
    Ok(())
}

/// Ledger time in milliseconds.
pub fn now_ms(env: &Env) -> u64 {
    env.ledger().timestamp().saturating_mul(1000)
}

/// `true` while `now` has not passed `last_update + period`.
pub fn within(last_update: u64, period: u64, now: u64) -> bool {
    now <= last_update.saturating_add(period)
}
