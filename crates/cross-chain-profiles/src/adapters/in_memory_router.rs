//! In-Memory Router Adapter
//!
//! Implements `RouterClient` port with a simulated cross-chain router.
//!
//! Dispatched messages are queued in an outbox; tests drain it and hand the
//! resulting envelopes to the registry on the destination chain.

use crate::domain::{
    Address, ChainSelector, FeeQuote, InboundEnvelope, MessageId, OutboundMessage, RegistryError,
};
use crate::ports::outbound::RouterClient;
use async_trait::async_trait;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::{debug, info, warn};

/// Flat fee plus a per-payload-byte component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouterFeeSchedule {
    /// Charged for every message.
    pub base_fee: u128,
    /// Charged per payload byte.
    pub per_byte_fee: u128,
}

impl Default for RouterFeeSchedule {
    fn default() -> Self {
        Self {
            base_fee: 100_000,
            per_byte_fee: 16,
        }
    }
}

/// A message accepted by the router, awaiting delivery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoutedPacket {
    /// Router endpoint that accepted it.
    pub router: Address,
    /// Contract that sent it.
    pub sender: Address,
    /// Destination chain.
    pub destination: ChainSelector,
    /// Assigned id.
    pub message_id: MessageId,
    /// Message as handed over.
    pub message: OutboundMessage,
    /// Fee paid.
    pub fee: FeeQuote,
}

impl RoutedPacket {
    /// Envelope as the destination router would deliver it.
    pub fn to_envelope(&self, source_chain_selector: ChainSelector) -> InboundEnvelope {
        InboundEnvelope {
            message_id: self.message_id,
            source_chain_selector,
            sender: self.sender,
            data: self.message.data.clone(),
        }
    }
}

/// Simulated router for one source chain.
pub struct InMemoryRouter {
    /// Chain this router lives on.
    chain_selector: ChainSelector,
    /// Addresses with a live router deployment.
    deployments: RwLock<HashSet<Address>>,
    /// Destination chains with an open lane.
    lanes: RwLock<HashSet<ChainSelector>>,
    /// Accepted fee tokens.
    fee_tokens: RwLock<HashSet<Address>>,
    /// Fee schedule.
    schedule: RouterFeeSchedule,
    /// Accepted, undelivered messages.
    outbox: RwLock<Vec<RoutedPacket>>,
    /// Sequence number mixed into message ids.
    nonce: AtomicU64,
    /// Force `send` to fail.
    failing: AtomicBool,
}

impl InMemoryRouter {
    /// Create a router on `chain_selector` accepting native fees only.
    pub fn new(chain_selector: ChainSelector) -> Self {
        Self {
            chain_selector,
            deployments: RwLock::new(HashSet::new()),
            lanes: RwLock::new(HashSet::new()),
            fee_tokens: RwLock::new(HashSet::from([Address::ZERO])),
            schedule: RouterFeeSchedule::default(),
            outbox: RwLock::new(Vec::new()),
            nonce: AtomicU64::new(0),
            failing: AtomicBool::new(false),
        }
    }

    /// Add a router deployment at `address`.
    pub fn with_router(mut self, address: Address) -> Self {
        self.deployments.get_mut().insert(address);
        self
    }

    /// Open a lane to `destination`.
    pub fn with_lane(mut self, destination: ChainSelector) -> Self {
        self.lanes.get_mut().insert(destination);
        self
    }

    /// Accept `token` for fees.
    pub fn with_fee_token(mut self, token: Address) -> Self {
        self.fee_tokens.get_mut().insert(token);
        self
    }

    /// Replace the fee schedule.
    pub fn with_fee_schedule(mut self, schedule: RouterFeeSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Chain this router lives on.
    pub fn chain_selector(&self) -> ChainSelector {
        self.chain_selector
    }

    /// Deploy a router at `address`.
    pub fn deploy(&self, address: Address) {
        self.deployments.write().insert(address);
    }

    /// Make subsequent `send` calls fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Fee for `message` under the current schedule.
    pub fn fee_for(&self, message: &OutboundMessage) -> u128 {
        self.schedule.base_fee + self.schedule.per_byte_fee * message.data.len() as u128
    }

    /// Snapshot of undelivered messages.
    pub fn outbox(&self) -> Vec<RoutedPacket> {
        self.outbox.read().clone()
    }

    /// Take all undelivered messages.
    pub fn drain_outbox(&self) -> Vec<RoutedPacket> {
        std::mem::take(&mut *self.outbox.write())
    }

    fn ensure_deployed(&self, router: &Address) -> Result<(), RegistryError> {
        if !self.deployments.read().contains(router) {
            return Err(RegistryError::TransportError(format!(
                "no router deployed at {router}"
            )));
        }
        Ok(())
    }

    fn ensure_lane(&self, destination: ChainSelector) -> Result<(), RegistryError> {
        if !self.lanes.read().contains(&destination) {
            return Err(RegistryError::UnsupportedRoute(destination));
        }
        Ok(())
    }

    fn ensure_fee_token(&self, token: &Address) -> Result<(), RegistryError> {
        if !self.fee_tokens.read().contains(token) {
            return Err(RegistryError::TransportError(format!(
                "unsupported fee token {token}"
            )));
        }
        Ok(())
    }
}

/// Generate a message id from the routing context.
fn generate_message_id(
    source: ChainSelector,
    destination: ChainSelector,
    nonce: u64,
    sender: &Address,
    message: &OutboundMessage,
) -> MessageId {
    let mut hasher = Sha256::new();
    hasher.update(source.to_be_bytes());
    hasher.update(destination.to_be_bytes());
    hasher.update(nonce.to_be_bytes());
    hasher.update(sender.as_bytes());
    hasher.update(message.receiver.as_bytes());
    hasher.update(&message.data);
    MessageId(hasher.finalize().into())
}

#[async_trait]
impl RouterClient for InMemoryRouter {
    async fn quote_fee(
        &self,
        router: Address,
        destination: ChainSelector,
        message: &OutboundMessage,
    ) -> Result<FeeQuote, RegistryError> {
        self.ensure_deployed(&router)?;
        self.ensure_lane(destination)?;
        self.ensure_fee_token(&message.fee_token)?;

        let amount = self.fee_for(message);
        debug!(
            "[profiles] Router {} quoted {} to chain {}",
            router, amount, destination
        );
        Ok(FeeQuote {
            fee_token: message.fee_token,
            amount,
        })
    }

    async fn send(
        &self,
        router: Address,
        sender: Address,
        destination: ChainSelector,
        message: &OutboundMessage,
        fee: FeeQuote,
    ) -> Result<MessageId, RegistryError> {
        self.ensure_deployed(&router)?;
        self.ensure_lane(destination)?;
        self.ensure_fee_token(&fee.fee_token)?;

        if self.failing.load(Ordering::SeqCst) {
            warn!("[profiles] Router {} rejected send (forced failure)", router);
            return Err(RegistryError::TransportError("router reverted".to_string()));
        }

        let required = self.fee_for(message);
        if fee.amount < required {
            return Err(RegistryError::TransportError(format!(
                "fee {} below required {}",
                fee.amount, required
            )));
        }

        let nonce = self.nonce.fetch_add(1, Ordering::SeqCst) + 1;
        let message_id =
            generate_message_id(self.chain_selector, destination, nonce, &sender, message);

        info!(
            "[profiles] Router {} accepted message {} for chain {}",
            router, message_id, destination
        );

        self.outbox.write().push(RoutedPacket {
            router,
            sender,
            destination,
            message_id,
            message: message.clone(),
            fee,
        });

        Ok(message_id)
    }
}
