//! # Router Gateway
//!
//! The only path across the trust boundary into the external router.
//! Outbound calls go to the currently configured router address; inbound
//! callbacks are accepted only from it. No business validation happens here.

use crate::domain::{
    invariant_trusted_router, Address, ChainSelector, FeeQuote, MessageId, OutboundMessage,
    RegistryError,
};
use crate::ports::outbound::RouterClient;
use std::sync::Arc;
use tracing::{debug, warn};

/// Adapter between the registry pipelines and a [`RouterClient`].
pub struct RouterGateway<R: RouterClient> {
    client: Arc<R>,
}

impl<R: RouterClient> RouterGateway<R> {
    /// Wrap a router client.
    pub fn new(client: Arc<R>) -> Self {
        Self { client }
    }

    /// Underlying client.
    pub fn client(&self) -> &Arc<R> {
        &self.client
    }

    /// Ask `router` for the fee of `message` to `destination`.
    pub async fn quote_fee(
        &self,
        router: Address,
        destination: ChainSelector,
        message: &OutboundMessage,
    ) -> Result<FeeQuote, RegistryError> {
        debug!("[profiles] Quoting fee via {} to chain {}", router, destination);
        self.client.quote_fee(router, destination, message).await
    }

    /// Dispatch `message` through `router`.
    pub async fn send(
        &self,
        router: Address,
        sender: Address,
        destination: ChainSelector,
        message: &OutboundMessage,
        fee: FeeQuote,
    ) -> Result<MessageId, RegistryError> {
        debug!(
            "[profiles] Dispatching via {} to chain {} (fee {})",
            router, destination, fee.amount
        );
        self.client
            .send(router, sender, destination, message, fee)
            .await
    }

    /// Accept an inbound callback only from `router`.
    pub fn authorize_callback(
        &self,
        caller: &Address,
        router: &Address,
    ) -> Result<(), RegistryError> {
        invariant_trusted_router(caller, router).inspect_err(|_| {
            warn!(
                "[profiles] Rejected callback from {} (router is {})",
                caller, router
            );
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryRouter;

    const ROUTER: Address = Address([0xAAu8; 20]);

    fn gateway() -> RouterGateway<InMemoryRouter> {
        RouterGateway::new(Arc::new(
            InMemoryRouter::new(1).with_router(ROUTER).with_lane(2),
        ))
    }

    fn message() -> OutboundMessage {
        OutboundMessage {
            receiver: Address::new([0xBBu8; 20]),
            data: vec![0u8; 32],
            fee_token: Address::ZERO,
            gas_limit: 200_000,
        }
    }

    #[test]
    fn test_authorize_callback() {
        let gateway = gateway();
        assert!(gateway.authorize_callback(&ROUTER, &ROUTER).is_ok());
        assert_eq!(
            gateway.authorize_callback(&Address::ZERO, &ROUTER),
            Err(RegistryError::Unauthorized {
                caller: Address::ZERO
            })
        );
    }

    #[tokio::test]
    async fn test_quote_and_send_pass_through() {
        let gateway = gateway();
        let quote = gateway.quote_fee(ROUTER, 2, &message()).await.unwrap();
        let id = gateway
            .send(ROUTER, Address::new([1u8; 20]), 2, &message(), quote)
            .await
            .unwrap();
        assert_eq!(gateway.client().outbox()[0].message_id, id);
    }

    #[tokio::test]
    async fn test_errors_propagate_unchanged() {
        let gateway = gateway();
        assert_eq!(
            gateway.quote_fee(ROUTER, 3, &message()).await,
            Err(RegistryError::UnsupportedRoute(3))
        );
    }
}
