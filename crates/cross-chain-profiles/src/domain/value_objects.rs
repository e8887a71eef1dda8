//! # Domain Value Objects
//!
//! Immutable value types for the profile registry.

use super::errors::RegistryError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Integer identifying a destination network for cross-chain routing.
pub type ChainSelector = u64;

// =============================================================================
// ADDRESS (20 bytes)
// =============================================================================

/// A 20-byte account or contract address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The zero address. Used as the native fee token.
    pub const ZERO: Self = Self([0u8; 20]);

    /// Creates an address from a 20-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Creates an address from a slice. Returns None if wrong length.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        <[u8; 20]>::try_from(slice).ok().map(Self)
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns true if this is the zero address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = RegistryError;

    /// Parses a `0x`-prefixed (or bare) hex address. Case is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes = hex::decode(digits)
            .map_err(|e| RegistryError::MalformedPayload(format!("invalid address {s}: {e}")))?;
        Self::from_slice(&bytes).ok_or_else(|| {
            RegistryError::MalformedPayload(format!(
                "invalid address {s}: expected 20 bytes, got {}",
                bytes.len()
            ))
        })
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// 32-BYTE IDENTIFIERS
// =============================================================================

/// 32-byte opaque profile identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ProfileId(pub [u8; 32]);

impl ProfileId {
    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProfileId(0x{})", hex::encode(self.0))
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Message identifier assigned by the router at send time.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MessageId(pub [u8; 32]);

impl MessageId {
    /// The zero id. Never assigned by a router.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Returns true if this is the zero id.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageId(0x{})", hex::encode(self.0))
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

// =============================================================================
// FEES
// =============================================================================

/// Fee quoted by the router for one message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeQuote {
    /// Token the fee is denominated in (`Address::ZERO` for native).
    pub fee_token: Address,
    /// Amount charged.
    pub amount: u128,
}

// =============================================================================
// SEND STATE MACHINE
// =============================================================================

/// Send pipeline state machine.
///
/// `Confirmed` means accepted by the local router, not delivered remotely.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SendState {
    /// Message built, nothing requested yet.
    #[default]
    Idle,
    /// Router returned a fee quote.
    FeeQuoted,
    /// Fee settled and router accepted the message.
    Dispatched,
    /// Audit record emitted.
    Confirmed,
}

impl SendState {
    /// Check if transition is valid.
    pub fn can_transition_to(&self, next: SendState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::FeeQuoted)
                | (Self::FeeQuoted, Self::Dispatched)
                | (Self::Dispatched, Self::Confirmed)
        )
    }

    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed)
    }
}

// =============================================================================
// WELL-KNOWN DEPLOYMENTS
// =============================================================================

/// Router addresses and chain selectors of the public test networks.
pub mod known {
    use super::{Address, ChainSelector};

    /// Sepolia router.
    pub const SEPOLIA_ROUTER: Address = Address([
        0x0b, 0xf3, 0xde, 0x8c, 0x5d, 0x3e, 0x8a, 0x2b, 0x34, 0xd2, 0xbe, 0xeb, 0x17, 0xab, 0xfc,
        0xeb, 0xaf, 0x36, 0x3a, 0x59,
    ]);

    /// Optimism Goerli router.
    pub const OPTIMISM_GOERLI_ROUTER: Address = Address([
        0xcc, 0x5a, 0x0b, 0x91, 0x0d, 0x9e, 0x95, 0x04, 0xa7, 0x56, 0x19, 0x34, 0xbe, 0xd2, 0x94,
        0xc5, 0x12, 0x85, 0xa7, 0x8d,
    ]);

    /// Sepolia chain selector.
    pub const SEPOLIA_SELECTOR: ChainSelector = 16_015_286_601_757_825_753;

    /// Optimism Goerli chain selector.
    pub const OPTIMISM_GOERLI_SELECTOR: ChainSelector = 2_664_363_617_261_496_610;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_parse_mixed_case() {
        let addr: Address = "0x0BF3dE8c5D3e8A2B34D2BEeB17ABfCeBaf363A59".parse().unwrap();
        assert_eq!(addr, known::SEPOLIA_ROUTER);
    }

    #[test]
    fn test_address_parse_goerli_router() {
        let addr: Address = "0xcc5a0B910D9E9504A7561934bed294c51285a78D".parse().unwrap();
        assert_eq!(addr, known::OPTIMISM_GOERLI_ROUTER);
    }

    #[test]
    fn test_address_parse_wrong_length_fails() {
        assert!("0x0BF3".parse::<Address>().is_err());
        assert!("not-hex".parse::<Address>().is_err());
    }

    #[test]
    fn test_address_display_round_trips() {
        let addr = Address::new([0xABu8; 20]);
        let parsed: Address = addr.to_string().parse().unwrap();
        assert_eq!(parsed, addr);
    }

    #[test]
    fn test_address_serde_as_hex_string() {
        let json = serde_json::to_string(&known::SEPOLIA_ROUTER).unwrap();
        assert_eq!(json, "\"0x0bf3de8c5d3e8a2b34d2beeb17abfcebaf363a59\"");
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, known::SEPOLIA_ROUTER);
    }

    #[test]
    fn test_send_state_transitions() {
        assert!(SendState::Idle.can_transition_to(SendState::FeeQuoted));
        assert!(SendState::FeeQuoted.can_transition_to(SendState::Dispatched));
        assert!(SendState::Dispatched.can_transition_to(SendState::Confirmed));
    }

    #[test]
    fn test_send_state_no_skipping() {
        assert!(!SendState::Idle.can_transition_to(SendState::Dispatched));
        assert!(!SendState::FeeQuoted.can_transition_to(SendState::Confirmed));
        assert!(!SendState::Confirmed.can_transition_to(SendState::Idle));
    }

    #[test]
    fn test_send_state_terminal() {
        assert!(SendState::Confirmed.is_terminal());
        assert!(!SendState::Dispatched.is_terminal());
    }
}
