//! # Receive Ledger
//!
//! Latest accepted inbound message plus the total count. Message ids that
//! were already applied are remembered so redelivery is rejected.

use super::entities::ReceivedMessageReceipt;
use super::errors::RegistryError;
use super::value_objects::MessageId;
use std::collections::HashSet;

/// Inbound receipt state.
///
/// `applied` is never pruned: exactly-once delivery holds for the life of
/// the registry, so it grows by one id per accepted message.
#[derive(Clone, Debug, Default)]
pub struct ReceiveLedger {
    last: Option<ReceivedMessageReceipt>,
    received_count: u64,
    applied: HashSet<MessageId>,
}

impl ReceiveLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail if `message_id` was already applied.
    pub fn ensure_fresh(&self, message_id: &MessageId) -> Result<(), RegistryError> {
        if self.applied.contains(message_id) {
            return Err(RegistryError::DuplicateMessage(*message_id));
        }
        Ok(())
    }

    /// Overwrite the latest receipt and bump the counter.
    pub fn record(&mut self, receipt: ReceivedMessageReceipt) -> u64 {
        self.applied.insert(receipt.message_id);
        self.last = Some(receipt);
        self.received_count += 1;
        self.received_count
    }

    /// Total accepted messages.
    pub fn received_count(&self) -> u64 {
        self.received_count
    }

    /// Latest receipt.
    pub fn last(&self) -> Result<&ReceivedMessageReceipt, RegistryError> {
        self.last.as_ref().ok_or(RegistryError::NoMessageReceived)
    }
}
