use soroban_sdk::contracterror;

/// Errors returned by every wallet entry point.
///
/// Codes are stable: clients match on the `Error(Contract, #n)` value.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum WalletError {
    /// The first authority created must be named "owner"
    FirstAuthorityMustBeOwner = 1,
    /// An authority with this name already exists
    AuthorityAlreadyExists = 2,
    /// The named authority does not exist
    UnknownAuthority = 3,
    /// The same identity appears twice in one authority
    DuplicateKeyAuth = 4,
    /// The same signer appears twice in one action
    DuplicateSigner = 5,
    /// A protection already exists for this target
    ProtectionAlreadyExists = 6,
    /// No protection exists for this target
    ProtectionNotFound = 7,
    /// Configuration values are out of range
    InvalidConfig = 8,

    /// "owner" and "recovery" must always be satisfiable
    ImpossibleAuthority = 20,
    /// The authority can never be satisfied but was not tagged as impossible
    ImpossibleNotTagged = 21,
    /// The authority was tagged as impossible but can be satisfied
    WronglyTaggedImpossible = 22,
    /// "owner" can never be removed
    OwnerNotRemovable = 23,
    /// Configuration is frozen once "owner" exists
    ConfigLocked = 24,

    /// Signers and caller do not reach the weight threshold
    ThresholdNotMet = 40,
    /// A delegated authority answered with a denial
    ExternalAuthorityDenied = 41,
    /// Only contract calls can be authorized by this wallet
    UnsupportedAuthorization = 42,

    /// A recovery update request is already pending
    RecoveryRequestOngoing = 60,
    /// There is no pending recovery update request
    RecoveryRequestNotFound = 61,
    /// A protection update request is already pending for this target
    ProtectionRequestOngoing = 62,
    /// No matching protection update request exists
    ProtectionRequestNotFound = 63,
    /// The request exists but its application time has not been reached
    ApplicationTimeNotReached = 64,
    /// The change does not match the content of the pending request
    RequestMismatch = 65,
    /// The protection request counter is exhausted
    RequestCounterOverflow = 66,
}

/// Broad classes of failure, used by clients to decide how to react.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Malformed or missing input, duplicates, existence checks
    Validation,
    /// Input is well-formed but violates a governance rule
    Policy,
    /// Consent was not reached on any applicable path
    Authorization,
    /// Pending request missing, duplicated, early or mismatched
    RequestState,
}

impl WalletError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WalletError::FirstAuthorityMustBeOwner
            | WalletError::AuthorityAlreadyExists
            | WalletError::UnknownAuthority
            | WalletError::DuplicateKeyAuth
            | WalletError::DuplicateSigner
            | WalletError::ProtectionAlreadyExists
            | WalletError::ProtectionNotFound
            | WalletError::InvalidConfig => ErrorKind::Validation,

            WalletError::ImpossibleAuthority
            | WalletError::ImpossibleNotTagged
            | WalletError::WronglyTaggedImpossible
            | WalletError::OwnerNotRemovable
            | WalletError::ConfigLocked => ErrorKind::Policy,

            WalletError::ThresholdNotMet
            | WalletError::ExternalAuthorityDenied
            | WalletError::UnsupportedAuthorization => ErrorKind::Authorization,

            WalletError::RecoveryRequestOngoing
            | WalletError::RecoveryRequestNotFound
            | WalletError::ProtectionRequestOngoing
            | WalletError::ProtectionRequestNotFound
            | WalletError::ApplicationTimeNotReached
            | WalletError::RequestMismatch
            | WalletError::RequestCounterOverflow => ErrorKind::RequestState,
        }
    }
}
