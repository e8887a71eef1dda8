//! # Domain Entities
//!
//! Profiles, the outbound message envelope and the inbound receipt.

use super::value_objects::{Address, ChainSelector, FeeQuote, MessageId, ProfileId};
use serde::{Deserialize, Serialize};

/// Personal profile registered on the home chain.
///
/// Field order is the wire order used by the codec.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Deterministic 32-byte identifier.
    pub id: ProfileId,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Nationality (free text).
    pub nationality: String,
    /// Age in years.
    pub age: u32,
}

/// Caller-supplied profile fields, before an id is assigned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProfile {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Nationality (free text).
    pub nationality: String,
    /// Age in years.
    pub age: u32,
}

impl NewProfile {
    /// Create profile fields.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        nationality: impl Into<String>,
        age: u32,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            nationality: nationality.into(),
            age,
        }
    }

    /// Attach an identifier.
    pub fn with_id(self, id: ProfileId) -> Profile {
        Profile {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            nationality: self.nationality,
            age: self.age,
        }
    }
}

/// Message handed to the router: receiver, opaque payload and fee settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Destination contract on the target chain.
    pub receiver: Address,
    /// Encoded profile.
    pub data: Vec<u8>,
    /// Token the fee is paid in (`Address::ZERO` for native).
    pub fee_token: Address,
    /// Gas limit for the receive callback on the destination chain.
    pub gas_limit: u64,
}

/// Record of a dispatched profile message.
///
/// Field order is part of the audit contract: observers decode
/// `(message_id, destination_chain_selector, receiver, profile, fee_token, fees)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossChainMessage {
    /// Identifier returned by the router.
    pub message_id: MessageId,
    /// Target chain.
    pub destination_chain_selector: ChainSelector,
    /// Destination contract.
    pub receiver: Address,
    /// Embedded profile (nested, not flattened).
    pub profile: Profile,
    /// Token the fee was paid in.
    pub fee_token: Address,
    /// Amount charged.
    pub fees: u128,
}

impl CrossChainMessage {
    /// Assemble the record from a dispatch result.
    pub fn new(
        message_id: MessageId,
        destination_chain_selector: ChainSelector,
        receiver: Address,
        profile: Profile,
        fee: FeeQuote,
    ) -> Self {
        Self {
            message_id,
            destination_chain_selector,
            receiver,
            profile,
            fee_token: fee.fee_token,
            fees: fee.amount,
        }
    }
}

/// Envelope delivered by the router to the receive entry point.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEnvelope {
    /// Router-assigned id.
    pub message_id: MessageId,
    /// Chain the message originated from.
    pub source_chain_selector: ChainSelector,
    /// Origin contract or account.
    pub sender: Address,
    /// Opaque payload.
    pub data: Vec<u8>,
}

/// Latest inbound message accepted by the registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivedMessageReceipt {
    /// Router-assigned id.
    pub message_id: MessageId,
    /// Chain the message originated from.
    pub source_chain_selector: ChainSelector,
    /// Origin contract or account.
    pub sender: Address,
    /// Raw payload as delivered.
    pub data: Vec<u8>,
    /// Decoded profile, when the payload carries one.
    pub profile: Option<Profile>,
}

impl ReceivedMessageReceipt {
    /// Build a receipt from an accepted envelope.
    pub fn from_envelope(envelope: InboundEnvelope, profile: Option<Profile>) -> Self {
        Self {
            message_id: envelope.message_id,
            source_chain_selector: envelope.source_chain_selector,
            sender: envelope.sender,
            data: envelope.data,
            profile,
        }
    }
}

/// Current transport endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Router address trusted for callbacks and used for dispatch.
    pub router_address: Address,
}

impl RouterConfig {
    /// Create a router config.
    pub fn new(router_address: Address) -> Self {
        Self { router_address }
    }

    /// Replace the router address, returning the previous one.
    pub fn rotate(&mut self, new_address: Address) -> Address {
        std::mem::replace(&mut self.router_address, new_address)
    }
}
