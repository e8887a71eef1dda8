//! # Domain Invariants
//!
//! Authorization and validation rules checked at the start of each
//! operation, before any state is touched.

use super::entities::InboundEnvelope;
use super::errors::RegistryError;
use super::value_objects::Address;

/// Maximum identifier seed length in bytes.
pub const MAX_SEED_LEN: usize = 32;

/// Invariant: privileged operations are owner-only.
pub fn invariant_owner_only(caller: &Address, owner: &Address) -> Result<(), RegistryError> {
    if caller != owner {
        return Err(RegistryError::Unauthorized { caller: *caller });
    }
    Ok(())
}

/// Invariant: only the configured router may deliver inbound messages.
pub fn invariant_trusted_router(caller: &Address, router: &Address) -> Result<(), RegistryError> {
    if caller != router {
        return Err(RegistryError::Unauthorized { caller: *caller });
    }
    Ok(())
}

/// Invariant: the registry holds enough of the fee token.
pub fn invariant_sufficient_funds(
    token: &Address,
    required: u128,
    available: u128,
) -> Result<(), RegistryError> {
    if available < required {
        return Err(RegistryError::InsufficientFunds {
            token: *token,
            required,
            available,
        });
    }
    Ok(())
}

/// Invariant: inbound envelope origin is well formed.
///
/// Source selector, sender and message id must all be non-zero.
pub fn invariant_well_formed_envelope(envelope: &InboundEnvelope) -> Result<(), RegistryError> {
    if envelope.source_chain_selector == 0 {
        return Err(RegistryError::MalformedPayload(
            "missing source chain selector".to_string(),
        ));
    }
    if envelope.sender.is_zero() {
        return Err(RegistryError::MalformedPayload("missing sender".to_string()));
    }
    if envelope.message_id.is_zero() {
        return Err(RegistryError::MalformedPayload("missing message id".to_string()));
    }
    Ok(())
}
