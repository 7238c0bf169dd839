//! # Consent
//!
//! Evidence of who agreed to the current action: the signers whose
//! signatures were verified by `__check_auth`, plus an optional calling
//! contract confirmed by the host.

use soroban_sdk::{crypto::Hash, Address, Bytes, BytesN, Env, Vec};

use crate::storage;
use crate::types::Ed25519Signature;

#[derive(Clone, Debug)]
pub struct Consent {
    /// Verified signer keys, in signature order; duplicates are kept so the
    /// weight verifier can reject them
    pub signers: Vec<BytesN<32>>,
    pub caller: Option<Address>,
}

impl Consent {
    pub fn new(signers: Vec<BytesN<32>>, caller: Option<Address>) -> Self {
        Consent { signers, caller }
    }

    pub fn empty(env: &Env) -> Self {
        Consent {
            signers: Vec::new(env),
            caller: None,
        }
    }
}

/// Collects the consent of the action invoking a wallet entry point.
///
/// Requiring the wallet's own address makes the host run `__check_auth`,
/// which records the verified signers for this action. A claimed caller
/// must authorize the call itself, which a contract does implicitly for
/// its direct invocations.
pub fn acquire(env: &Env, caller: Option<Address>) -> Consent {
    env.current_contract_address().require_auth();
    if let Some(caller) = &caller {
        caller.require_auth();
    }
    Consent::new(storage::take_pending_signers(env), caller)
}

/// Checks every signature against the payload and returns the signer keys.
///
/// An invalid signature traps the host, failing the whole action.
pub fn verify_signatures(
    env: &Env,
    signature_payload: &Hash<32>,
    signatures: &Vec<Ed25519Signature>,
) -> Vec<BytesN<32>> {
    let payload: Bytes = signature_payload.clone().into();
    let mut signers = Vec::new(env);
    for signature in signatures.iter() {
        env.crypto()
            .ed25519_verify(&signature.public_key, &payload, &signature.signature);
        signers.push_back(signature.public_key);
    }
    signers
}
