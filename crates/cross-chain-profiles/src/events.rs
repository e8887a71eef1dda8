//! # Audit Events
//!
//! Records emitted after a state change commits. `MessageSent` is the sole
//! externally observable proof of dispatch; its `message_id` and
//! `destination_chain_selector` are indexed for filtering.

use crate::domain::{Address, ChainSelector, CrossChainMessage, MessageId, ProfileId};
use serde::{Deserialize, Serialize};

/// Event topic names.
pub mod topics {
    /// Profile registered locally.
    pub const PROFILE_ADDED: &str = "ProfileAdded";
    /// Profile message dispatched.
    pub const MESSAGE_SENT: &str = "MessageSent";
    /// Inbound message accepted.
    pub const MESSAGE_RECEIVED: &str = "MessageReceived";
    /// Router address rotated.
    pub const ROUTER_UPDATED: &str = "RouterUpdated";
    /// Fee balance withdrawn.
    pub const FUNDS_WITHDRAWN: &str = "FundsWithdrawn";
}

/// Registry audit events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryEvent {
    /// Profile registered locally.
    ProfileAdded {
        /// Registering address.
        owner: Address,
        /// New profile id.
        id: ProfileId,
    },
    /// Profile message dispatched.
    MessageSent(CrossChainMessage),
    /// Inbound message accepted.
    MessageReceived {
        /// Router-assigned id.
        message_id: MessageId,
        /// Origin chain.
        source_chain_selector: ChainSelector,
        /// Origin contract.
        sender: Address,
        /// Counter value after this message.
        received_count: u64,
    },
    /// Router address rotated.
    RouterUpdated {
        /// Old address.
        previous: Address,
        /// New address.
        current: Address,
    },
    /// Fee balance withdrawn by the owner.
    FundsWithdrawn {
        /// Token withdrawn.
        token: Address,
        /// Amount.
        amount: u128,
        /// Recipient.
        beneficiary: Address,
    },
}

impl RegistryEvent {
    /// Topic name.
    pub fn topic(&self) -> &'static str {
        match self {
            Self::ProfileAdded { .. } => topics::PROFILE_ADDED,
            Self::MessageSent(_) => topics::MESSAGE_SENT,
            Self::MessageReceived { .. } => topics::MESSAGE_RECEIVED,
            Self::RouterUpdated { .. } => topics::ROUTER_UPDATED,
            Self::FundsWithdrawn { .. } => topics::FUNDS_WITHDRAWN,
        }
    }

    /// The dispatch record, if this is a `MessageSent` event.
    pub fn as_message_sent(&self) -> Option<&CrossChainMessage> {
        match self {
            Self::MessageSent(message) => Some(message),
            _ => None,
        }
    }
}

/// Filter over the indexed fields of `MessageSent`.
///
/// Unset fields match anything.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// Match this message id.
    pub message_id: Option<MessageId>,
    /// Match this destination.
    pub destination_chain_selector: Option<ChainSelector>,
}

impl EventFilter {
    /// Filter on message id.
    pub fn message_id(mut self, id: MessageId) -> Self {
        self.message_id = Some(id);
        self
    }

    /// Filter on destination chain.
    pub fn destination(mut self, selector: ChainSelector) -> Self {
        self.destination_chain_selector = Some(selector);
        self
    }

    /// Check a dispatch record against the filter.
    pub fn matches(&self, message: &CrossChainMessage) -> bool {
        self.message_id.is_none_or(|id| id == message.message_id)
            && self
                .destination_chain_selector
                .is_none_or(|selector| selector == message.destination_chain_selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeeQuote, NewProfile};

    fn sent(id: u8, destination: ChainSelector) -> CrossChainMessage {
        CrossChainMessage::new(
            MessageId([id; 32]),
            destination,
            Address::new([1u8; 20]),
            NewProfile::new("John", "Doe", "American", 30).with_id(ProfileId([2u8; 32])),
            FeeQuote {
                fee_token: Address::ZERO,
                amount: 10,
            },
        )
    }

    #[test]
    fn test_topics() {
        let event = RegistryEvent::MessageSent(sent(1, 5));
        assert_eq!(event.topic(), topics::MESSAGE_SENT);
        assert!(event.as_message_sent().is_some());

        let event = RegistryEvent::RouterUpdated {
            previous: Address::ZERO,
            current: Address::ZERO,
        };
        assert_eq!(event.topic(), topics::ROUTER_UPDATED);
        assert!(event.as_message_sent().is_none());
    }

    #[test]
    fn test_empty_filter_matches_all() {
        assert!(EventFilter::default().matches(&sent(1, 5)));
    }

    #[test]
    fn test_filter_by_indexed_fields() {
        let filter = EventFilter::default().destination(5);
        assert!(filter.matches(&sent(1, 5)));
        assert!(!filter.matches(&sent(1, 6)));

        let filter = EventFilter::default().message_id(MessageId([2u8; 32])).destination(5);
        assert!(!filter.matches(&sent(1, 5)));
        assert!(filter.matches(&sent(2, 5)));
    }
}
