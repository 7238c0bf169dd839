use soroban_sdk::{contracttype, Address, BytesN, Env, String, Symbol, Vec};

// ========================================================================
// Authorities
// ========================================================================

/// Name of the authority that bootstraps and administers the wallet.
pub const OWNER: &str = "owner";
/// Name of the authority that can override "owner" after a delay.
pub const RECOVERY: &str = "recovery";

/// Identity that contributes weight to an authority.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub enum KeyHolder {
    /// ed25519 public key, proven by a signature on the action
    Key(BytesN<32>),
    /// Contract, proven by being the caller of the action
    Contract(Address),
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct KeyAuth {
    pub holder: KeyHolder,
    pub weight: u32,
}

/// Weighted multi-signature consent policy.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Authority {
    pub key_auths: Vec<KeyAuth>,
    pub weight_threshold: u32,
    /// Milliseconds; stamped by the wallet, ignored on input
    pub last_update: u64,
}

impl Authority {
    /// Copy used when comparing a proposed change against a pending request.
    pub fn unstamped(&self) -> Authority {
        let mut authority = self.clone();
        authority.last_update = 0;
        authority
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct AuthorityEntry {
    pub name: String,
    pub authority: Authority,
}

pub fn is_owner(env: &Env, name: &String) -> bool {
    *name == String::from_str(env, OWNER)
}

pub fn is_recovery(env: &Env, name: &String) -> bool {
    *name == String::from_str(env, RECOVERY)
}

// ========================================================================
// Protections
// ========================================================================

/// Lookup key of a protection. Exact entry points win over the wildcard.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub enum ProtectedTarget {
    EntryPoint(Address, Symbol),
    RemainingEntryPoints(Address),
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct ExternalAuthority {
    pub contract: Address,
    pub entry_point: Symbol,
}

/// Who decides for a protected target.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub enum ProtectionAuthority {
    /// A local authority, by name
    Native(String),
    /// Delegation to another contract's entry point
    External(ExternalAuthority),
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Protection {
    pub authority: ProtectionAuthority,
    /// Milliseconds a delayed update of this protection has to wait
    pub delay_update: u64,
    /// Milliseconds; stamped by the wallet, ignored on input
    pub last_update: u64,
}

impl Protection {
    pub fn unstamped(&self) -> Protection {
        let mut protection = self.clone();
        protection.last_update = 0;
        protection
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct ProtectionEntry {
    pub target: ProtectedTarget,
    pub protection: Protection,
}

// ========================================================================
// Pending Requests
// ========================================================================

/// Proposed content of a delayed "recovery" change.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub enum AuthorityChange {
    Remove,
    Set(Authority),
}

impl AuthorityChange {
    /// Payload stored for `proposal`; `None` proposes a removal.
    pub fn of(proposal: Option<&Authority>) -> AuthorityChange {
        match proposal {
            None => AuthorityChange::Remove,
            Some(authority) => AuthorityChange::Set(authority.unstamped()),
        }
    }

    pub fn is_removal(&self) -> bool {
        matches!(self, AuthorityChange::Remove)
    }
}

/// Proposed content of a delayed protection change.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub enum ProtectionChange {
    Remove,
    Set(Protection),
}

impl ProtectionChange {
    pub fn of(proposal: Option<&Protection>) -> ProtectionChange {
        match proposal {
            None => ProtectionChange::Remove,
            Some(protection) => ProtectionChange::Set(protection.unstamped()),
        }
    }

    pub fn is_removal(&self) -> bool {
        matches!(self, ProtectionChange::Remove)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct RecoveryRequest {
    pub change: AuthorityChange,
    pub application_time: u64,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct ProtectionRequest {
    pub id: u32,
    pub target: ProtectedTarget,
    pub change: ProtectionChange,
    pub application_time: u64,
}

// ========================================================================
// Authorization
// ========================================================================

/// Signature provided in the wallet's auth entries.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Ed25519Signature {
    pub public_key: BytesN<32>,
    pub signature: BytesN<64>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct CallTarget {
    pub contract: Address,
    pub entry_point: Symbol,
}

/// Payload forwarded to an external authority.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct AuthorizeRequest {
    pub call: CallTarget,
    pub signers: Vec<BytesN<32>>,
    pub caller: Option<Address>,
}
