//! # Domain Errors
//!
//! Error taxonomy for the profile registry. Every failure aborts the
//! triggering operation with no state change.

use super::value_objects::{Address, ChainSelector, MessageId};
use thiserror::Error;

/// Profile registry error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Caller lacks the required role (owner or configured router).
    #[error("Unauthorized caller: {caller:?}")]
    Unauthorized {
        /// Rejected caller.
        caller: Address,
    },

    /// Address already has a registered profile.
    #[error("Profile already registered for {0:?}")]
    DuplicateProfile(Address),

    /// No profile for the given owner or id.
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    /// Receipt queried before any inbound message was accepted.
    #[error("No message received yet")]
    NoMessageReceived,

    /// Payload or envelope does not match the expected layout.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Transport rejects the destination chain.
    #[error("Unsupported route to chain selector {0}")]
    UnsupportedRoute(ChainSelector),

    /// Transport call failed.
    #[error("Transport error: {0}")]
    TransportError(String),

    /// Contract balance cannot cover the transport fee.
    #[error("Insufficient funds in {token:?}: required {required}, available {available}")]
    InsufficientFunds {
        /// Fee token.
        token: Address,
        /// Quoted fee.
        required: u128,
        /// Balance held by the registry.
        available: u128,
    },

    /// Deposit would overflow the registry balance.
    #[error("Balance overflow in {token:?}")]
    BalanceOverflow {
        /// Deposited token.
        token: Address,
    },

    /// Identifier seed does not fit in 32 bytes.
    #[error("Seed too long: {len} > {max} bytes")]
    SeedTooLong {
        /// Seed length in bytes.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },

    /// Inbound message already applied.
    #[error("Message already received: {0}")]
    DuplicateMessage(MessageId),

    /// Invalid send state transition.
    #[error("Invalid send transition: {from} -> {to}")]
    InvalidSendTransition {
        /// Current state
        from: String,
        /// Attempted state
        to: String,
    },

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_route_error() {
        let err = RegistryError::UnsupportedRoute(16015286601757825753);
        assert!(err.to_string().contains("16015286601757825753"));
    }

    #[test]
    fn test_insufficient_funds_error() {
        let err = RegistryError::InsufficientFunds {
            token: Address::ZERO,
            required: 500,
            available: 100,
        };
        let msg = err.to_string();
        assert!(msg.contains("required 500"));
        assert!(msg.contains("available 100"));
    }

    #[test]
    fn test_seed_too_long_error() {
        let err = RegistryError::SeedTooLong { len: 40, max: 32 };
        assert!(err.to_string().contains("40 > 32"));
    }

    #[test]
    fn test_no_message_received_error() {
        let err = RegistryError::NoMessageReceived;
        assert!(err.to_string().contains("No message received"));
    }
}
