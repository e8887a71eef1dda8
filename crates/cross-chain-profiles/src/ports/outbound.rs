//! # Outbound Ports
//!
//! Traits for external dependencies: the cross-chain router and the audit
//! event sink.

use crate::domain::{Address, ChainSelector, FeeQuote, MessageId, OutboundMessage, RegistryError};
use crate::events::RegistryEvent;
use async_trait::async_trait;

/// Cross-chain router - outbound port.
///
/// `router` is the endpoint address the call is directed at; implementations
/// fail with `TransportError` when no router is deployed there.
#[async_trait]
pub trait RouterClient: Send + Sync {
    /// Quote the fee for sending `message` to `destination`. Read-only.
    ///
    /// Fails with `UnsupportedRoute` when the router has no lane to
    /// `destination`.
    async fn quote_fee(
        &self,
        router: Address,
        destination: ChainSelector,
        message: &OutboundMessage,
    ) -> Result<FeeQuote, RegistryError>;

    /// Dispatch `message` on behalf of `sender`, paying `fee`.
    ///
    /// One delivery attempt per call; no retry.
    async fn send(
        &self,
        router: Address,
        sender: Address,
        destination: ChainSelector,
        message: &OutboundMessage,
        fee: FeeQuote,
    ) -> Result<MessageId, RegistryError>;
}

/// Audit event sink - outbound port.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish an event. Returns the number of live subscribers reached.
    async fn publish(&self, event: RegistryEvent) -> usize;

    /// Total events published.
    fn events_published(&self) -> u64;
}

// =============================================================================
// No-op Implementation
// =============================================================================

/// Event publisher that drops everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopEventPublisher;

#[async_trait]
impl EventPublisher for NoopEventPublisher {
    async fn publish(&self, _event: RegistryEvent) -> usize {
        0
    }

    fn events_published(&self) -> u64 {
        0
    }
}
