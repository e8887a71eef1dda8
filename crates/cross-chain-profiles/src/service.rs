//! # Profile Registry Service
//!
//! Wires the profile store, the router gateway and the receive ledger into
//! the public registry surface.
//!
//! ## Execution model
//!
//! Every public operation holds the state lock from start to finish, so
//! operations are serialized and never observe each other's partial state.
//! Fallible work (validation, fee quote, dispatch) runs before any write;
//! writes happen only once nothing can fail, so an error leaves the
//! registry exactly as it was.
//!
//! ## Send pipeline
//!
//! `Idle -> FeeQuoted -> Dispatched -> Confirmed`. `Confirmed` means the
//! local router accepted the message and `MessageSent` was emitted; remote
//! delivery is not tracked.

use crate::algorithms::codec::{decode_profile, encode_profile};
use crate::config::RegistryConfig;
use crate::domain::{
    invariant_owner_only, invariant_sufficient_funds, invariant_well_formed_envelope, Address,
    ChainSelector, CrossChainMessage, InboundEnvelope, MessageId, NewProfile, OutboundMessage,
    Profile, ProfileId, ProfileStore, ReceiveLedger, ReceivedMessageReceipt, RegistryError,
    RouterConfig, SendState,
};
use crate::events::RegistryEvent;
use crate::gateway::RouterGateway;
use crate::ports::inbound::{ProfileRegistration, ProfileRegistryApi};
use crate::ports::outbound::{EventPublisher, RouterClient};

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Operational counters. Not part of registry state: failures still count.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RegistryStats {
    /// Profiles stored.
    pub profiles_registered: u64,
    /// Messages confirmed by the send pipeline.
    pub messages_sent: u64,
    /// Inbound messages accepted.
    pub messages_received: u64,
    /// Callbacks rejected because the caller was not the router.
    pub rejected_callbacks: u64,
    /// Send attempts that failed.
    pub failed_sends: u64,
}

/// Mutable registry state.
#[derive(Debug)]
struct RegistryState {
    router: RouterConfig,
    profiles: ProfileStore,
    ledger: ReceiveLedger,
    /// Fee balances held by the registry, per token.
    balances: HashMap<Address, u128>,
}

/// One pass through the send pipeline.
struct SendAttempt {
    state: SendState,
    correlation_id: Uuid,
}

impl SendAttempt {
    fn new() -> Self {
        Self {
            state: SendState::Idle,
            correlation_id: Uuid::new_v4(),
        }
    }

    fn advance(&mut self, next: SendState) -> Result<(), RegistryError> {
        if !self.state.can_transition_to(next) {
            return Err(RegistryError::InvalidSendTransition {
                from: format!("{:?}", self.state),
                to: format!("{:?}", next),
            });
        }
        debug!(
            correlation_id = %self.correlation_id,
            "[profiles] Send {:?} -> {:?}", self.state, next
        );
        self.state = next;
        Ok(())
    }
}

/// The cross-chain profile registry.
pub struct ProfileRegistryService<R: RouterClient, P: EventPublisher> {
    /// Deployment configuration.
    config: RegistryConfig,
    /// Router gateway.
    gateway: RouterGateway<R>,
    /// Audit event sink.
    events: Arc<P>,
    /// Registry state, locked for the whole of each operation.
    state: Mutex<RegistryState>,
    /// Operational counters.
    stats: RwLock<RegistryStats>,
}

impl<R: RouterClient, P: EventPublisher> ProfileRegistryService<R, P> {
    /// Deploy a registry. `config.owner` becomes the owner and
    /// `config.router` the initial router.
    pub fn new(config: RegistryConfig, router: Arc<R>, events: Arc<P>) -> Self {
        info!(
            owner = %config.owner,
            router = %config.router,
            "[profiles] Registry initialized"
        );
        Self {
            state: Mutex::new(RegistryState {
                router: RouterConfig::new(config.router),
                profiles: ProfileStore::new(),
                ledger: ReceiveLedger::new(),
                balances: HashMap::new(),
            }),
            gateway: RouterGateway::new(router),
            events,
            stats: RwLock::new(RegistryStats::default()),
            config,
        }
    }

    /// Deployment configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Snapshot of the operational counters.
    pub fn stats(&self) -> RegistryStats {
        self.stats.read().clone()
    }

    /// Credit `amount` of `token` to the registry's fee balance.
    /// Returns the new balance. Fails without crediting on overflow.
    pub async fn deposit(&self, token: Address, amount: u128) -> Result<u128, RegistryError> {
        let mut state = self.state.lock().await;
        let balance = state.balances.entry(token).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(RegistryError::BalanceOverflow { token })?;
        debug!("[profiles] Deposit {} of {} (balance {})", amount, token, *balance);
        Ok(*balance)
    }

    /// Fee balance held in `token`.
    pub async fn balance_of(&self, token: Address) -> u128 {
        self.state
            .lock()
            .await
            .balances
            .get(&token)
            .copied()
            .unwrap_or(0)
    }

    /// Move the whole `token` balance to `beneficiary`. Owner-only.
    pub async fn withdraw(
        &self,
        caller: Address,
        beneficiary: Address,
        token: Address,
    ) -> Result<u128, RegistryError> {
        invariant_owner_only(&caller, &self.config.owner)?;

        let mut state = self.state.lock().await;
        let amount = state.balances.remove(&token).unwrap_or(0);
        if amount > 0 {
            info!(
                "[profiles] Withdrew {} of {} to {}",
                amount, token, beneficiary
            );
            self.events
                .publish(RegistryEvent::FundsWithdrawn {
                    token,
                    amount,
                    beneficiary,
                })
                .await;
        }
        Ok(amount)
    }

    /// Send `profile` through `router` instead of the configured router.
    pub async fn send_message_via(
        &self,
        caller: Address,
        router: Address,
        destination: ChainSelector,
        receiver: Address,
        profile: Profile,
    ) -> Result<MessageId, RegistryError> {
        let mut state = self.state.lock().await;
        self.send_pipeline(&mut state, caller, router, destination, receiver, profile)
            .await
    }

    // =========================================================================
    // Send pipeline
    // =========================================================================

    #[instrument(skip(self, state, caller, profile), fields(profile_id = %profile.id))]
    async fn send_pipeline(
        &self,
        state: &mut RegistryState,
        caller: Address,
        router: Address,
        destination: ChainSelector,
        receiver: Address,
        profile: Profile,
    ) -> Result<MessageId, RegistryError> {
        let (attempt, record) = self
            .dispatch(state, router, destination, receiver, profile)
            .await
            .inspect_err(|_| self.stats.write().failed_sends += 1)?;
        self.confirm(state, caller, attempt, record).await
    }

    /// Quote, check funds and hand the message to the router. No writes.
    async fn dispatch(
        &self,
        state: &RegistryState,
        router: Address,
        destination: ChainSelector,
        receiver: Address,
        profile: Profile,
    ) -> Result<(SendAttempt, CrossChainMessage), RegistryError> {
        let mut attempt = SendAttempt::new();
        let message = OutboundMessage {
            receiver,
            data: encode_profile(&profile),
            fee_token: self.config.fee_token,
            gas_limit: self.config.gas_limit,
        };

        let fee = self.gateway.quote_fee(router, destination, &message).await?;
        attempt.advance(SendState::FeeQuoted)?;

        let available = state.balances.get(&fee.fee_token).copied().unwrap_or(0);
        invariant_sufficient_funds(&fee.fee_token, fee.amount, available)?;

        let message_id = self
            .gateway
            .send(
                router,
                self.config.contract_address,
                destination,
                &message,
                fee,
            )
            .await?;
        attempt.advance(SendState::Dispatched)?;

        Ok((
            attempt,
            CrossChainMessage::new(message_id, destination, receiver, profile, fee),
        ))
    }

    /// Settle the fee paid on behalf of `payer` and emit the dispatch record.
    async fn confirm(
        &self,
        state: &mut RegistryState,
        payer: Address,
        mut attempt: SendAttempt,
        record: CrossChainMessage,
    ) -> Result<MessageId, RegistryError> {
        attempt.advance(SendState::Confirmed)?;

        if let Some(balance) = state.balances.get_mut(&record.fee_token) {
            *balance -= record.fees;
        }
        self.stats.write().messages_sent += 1;

        info!(
            correlation_id = %attempt.correlation_id,
            payer = %payer,
            message_id = %record.message_id,
            destination = record.destination_chain_selector,
            fees = record.fees,
            "[profiles] Message sent"
        );

        let message_id = record.message_id;
        self.events.publish(RegistryEvent::MessageSent(record)).await;
        Ok(message_id)
    }

    // =========================================================================
    // Receive pipeline
    // =========================================================================

    #[instrument(skip(self, state, envelope), fields(message_id = %envelope.message_id))]
    async fn receive_pipeline(
        &self,
        state: &mut RegistryState,
        envelope: InboundEnvelope,
    ) -> Result<(), RegistryError> {
        invariant_well_formed_envelope(&envelope)?;
        state.ledger.ensure_fresh(&envelope.message_id)?;

        let profile = if self.config.expect_profile_payload {
            Some(decode_profile(&envelope.data)?)
        } else {
            decode_profile(&envelope.data).ok()
        };

        let receipt = ReceivedMessageReceipt::from_envelope(envelope, profile);
        let event = RegistryEvent::MessageReceived {
            message_id: receipt.message_id,
            source_chain_selector: receipt.source_chain_selector,
            sender: receipt.sender,
            received_count: state.ledger.received_count() + 1,
        };
        let received_count = state.ledger.record(receipt);
        self.stats.write().messages_received += 1;

        info!(received_count, "[profiles] Message received");
        self.events.publish(event).await;
        Ok(())
    }
}

#[async_trait]
impl<R: RouterClient, P: EventPublisher> ProfileRegistryApi for ProfileRegistryService<R, P> {
    async fn owner(&self) -> Address {
        self.config.owner
    }

    async fn router(&self) -> Address {
        self.state.lock().await.router.router_address
    }

    async fn update_router(
        &self,
        caller: Address,
        new_router: Address,
    ) -> Result<(), RegistryError> {
        invariant_owner_only(&caller, &self.config.owner).inspect_err(|_| {
            warn!("[profiles] Router update by non-owner {}", caller);
        })?;

        let mut state = self.state.lock().await;
        let previous = state.router.rotate(new_router);
        info!("[profiles] Router updated {} -> {}", previous, new_router);

        self.events
            .publish(RegistryEvent::RouterUpdated {
                previous,
                current: new_router,
            })
            .await;
        Ok(())
    }

    async fn add_profile(
        &self,
        caller: Address,
        profile: NewProfile,
        destination: ChainSelector,
        receiver: Address,
    ) -> Result<ProfileRegistration, RegistryError> {
        let mut state = self.state.lock().await;
        let profile = state.profiles.prepare(&caller, profile)?;
        let router = state.router.router_address;

        let (attempt, record) = self
            .dispatch(&state, router, destination, receiver, profile.clone())
            .await
            .inspect_err(|e| {
                warn!("[profiles] Profile for {} not registered: {}", caller, e);
                self.stats.write().failed_sends += 1;
            })?;

        let id = state.profiles.commit(caller, profile);
        self.stats.write().profiles_registered += 1;
        info!("[profiles] Profile {} registered for {}", id, caller);
        self.events
            .publish(RegistryEvent::ProfileAdded { owner: caller, id })
            .await;

        let message_id = self.confirm(&mut state, caller, attempt, record).await?;
        Ok(ProfileRegistration { id, message_id })
    }

    async fn get_unique_id_by_user(&self, user: Address) -> Result<ProfileId, RegistryError> {
        self.state.lock().await.profiles.get_profile_by_owner(&user)
    }

    async fn get_profile(&self, id: ProfileId) -> Result<Profile, RegistryError> {
        self.state.lock().await.profiles.get_profile(&id).cloned()
    }

    async fn send_message(
        &self,
        caller: Address,
        destination: ChainSelector,
        receiver: Address,
        profile: Profile,
    ) -> Result<MessageId, RegistryError> {
        let mut state = self.state.lock().await;
        let router = state.router.router_address;
        self.send_pipeline(&mut state, caller, router, destination, receiver, profile)
            .await
    }

    async fn on_receive(
        &self,
        caller: Address,
        envelope: InboundEnvelope,
    ) -> Result<(), RegistryError> {
        let mut state = self.state.lock().await;
        let router = state.router.router_address;
        if let Err(e) = self.gateway.authorize_callback(&caller, &router) {
            self.stats.write().rejected_callbacks += 1;
            return Err(e);
        }
        self.receive_pipeline(&mut state, envelope).await
    }

    async fn get_number_of_received_messages(&self) -> u64 {
        self.state.lock().await.ledger.received_count()
    }

    async fn get_last_received_message_details(
        &self,
    ) -> Result<ReceivedMessageReceipt, RegistryError> {
        self.state.lock().await.ledger.last().cloned()
    }
}
