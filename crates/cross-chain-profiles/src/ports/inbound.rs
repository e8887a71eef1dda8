//! # Inbound Ports
//!
//! API trait defining what the profile registry exposes to callers and to
//! the router.

use crate::domain::{
    Address, ChainSelector, InboundEnvelope, MessageId, NewProfile, Profile, ProfileId,
    ReceivedMessageReceipt, RegistryError,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result of a successful `add_profile`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRegistration {
    /// Id of the stored profile.
    pub id: ProfileId,
    /// Router id of the message carrying it.
    pub message_id: MessageId,
}

/// Profile registry API - inbound port.
///
/// `caller` is the authenticated identity of whoever invokes the operation.
#[async_trait]
pub trait ProfileRegistryApi: Send + Sync {
    /// Owner identity fixed at construction.
    async fn owner(&self) -> Address;

    /// Current router address.
    async fn router(&self) -> Address;

    /// Replace the router address. Owner-only.
    async fn update_router(&self, caller: Address, new_router: Address)
        -> Result<(), RegistryError>;

    /// Register the caller's profile and send it to `receiver` on
    /// `destination`. Nothing is stored if the send fails.
    async fn add_profile(
        &self,
        caller: Address,
        profile: NewProfile,
        destination: ChainSelector,
        receiver: Address,
    ) -> Result<ProfileRegistration, RegistryError>;

    /// Profile id registered by `user`.
    async fn get_unique_id_by_user(&self, user: Address) -> Result<ProfileId, RegistryError>;

    /// Profile by id.
    async fn get_profile(&self, id: ProfileId) -> Result<Profile, RegistryError>;

    /// Send `profile` to `receiver` on `destination`.
    async fn send_message(
        &self,
        caller: Address,
        destination: ChainSelector,
        receiver: Address,
        profile: Profile,
    ) -> Result<MessageId, RegistryError>;

    /// Router callback for inbound messages.
    async fn on_receive(&self, caller: Address, envelope: InboundEnvelope)
        -> Result<(), RegistryError>;

    /// Total accepted inbound messages.
    async fn get_number_of_received_messages(&self) -> u64;

    /// Latest accepted inbound message.
    async fn get_last_received_message_details(
        &self,
    ) -> Result<ReceivedMessageReceipt, RegistryError>;
}
