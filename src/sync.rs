//! Keeps a multisig page's view state in step with the chain.
//!
//! On start the synchronizer fetches the summary and the transaction-id list
//! once, then, if the address holds contract code, records the current block
//! as the cutoff and follows the contract's events. Every event past the
//! cutoff triggers the refetches its [`RefreshPlan`] names. Results are pushed
//! through an unbounded channel tagged with the page's request generation.

use anyhow::{anyhow, Result};
use ethers::contract::LogMeta;
use ethers::prelude::*;
use futures::{Stream, StreamExt};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::contract::{MultiSigClient, MultiSigEvents, MultiSigReader};
use crate::generation::RequestGeneration;
use crate::types::{MultiSigSummary, TransactionFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Confirmation,
    Submission,
    Execution,
    Deposit,
}

/// A decoded contract event and the block it was mined in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractEvent {
    pub kind: EventKind,
    pub block_number: u64,
    /// Transaction the event refers to; `None` for deposits
    pub transaction_id: Option<U256>,
}

impl ContractEvent {
    pub fn from_decoded(event: &MultiSigEvents, block_number: u64) -> Self {
        let (kind, transaction_id) = match event {
            MultiSigEvents::ConfirmationFilter(e) => (EventKind::Confirmation, Some(e.transaction_id)),
            MultiSigEvents::SubmissionFilter(e) => (EventKind::Submission, Some(e.transaction_id)),
            MultiSigEvents::ExecutionFilter(e) => (EventKind::Execution, Some(e.transaction_id)),
            MultiSigEvents::DepositFilter(_) => (EventKind::Deposit, None),
        };
        Self {
            kind,
            block_number,
            transaction_id,
        }
    }

    pub fn from_log(event: &MultiSigEvents, meta: &LogMeta) -> Self {
        Self::from_decoded(event, meta.block_number.as_u64())
    }
}

/// Block number captured when subscriptions were installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventCutoff(u64);

impl EventCutoff {
    pub fn new(block: u64) -> Self {
        Self(block)
    }

    pub fn block(&self) -> u64 {
        self.0
    }

    /// Only events strictly after the cutoff block are acted on
    pub fn admits(&self, event: &ContractEvent) -> bool {
        event.block_number > self.0
    }
}

/// Which parts of the page state an event invalidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshPlan {
    pub summary: bool,
    pub transaction_ids: bool,
}

impl RefreshPlan {
    pub const NONE: RefreshPlan = RefreshPlan {
        summary: false,
        transaction_ids: false,
    };

    pub fn for_event(kind: EventKind) -> Self {
        match kind {
            EventKind::Confirmation | EventKind::Submission => RefreshPlan {
                summary: false,
                transaction_ids: true,
            },
            EventKind::Execution => RefreshPlan {
                summary: true,
                transaction_ids: true,
            },
            EventKind::Deposit => RefreshPlan {
                summary: true,
                transaction_ids: false,
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.summary && !self.transaction_ids
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncPayload {
    Summary(MultiSigSummary),
    TransactionIds(Vec<U256>),
    /// Listeners installed; events at or below `cutoff` are ignored
    Subscribed { cutoff: u64 },
    /// Nothing deployed at the address, so nothing to listen to
    NoContractCode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncUpdate {
    pub generation: RequestGeneration,
    pub payload: SyncPayload,
}

pub struct Synchronizer<R> {
    reader: R,
    filter: TransactionFilter,
    generation: RequestGeneration,
    tx: UnboundedSender<SyncUpdate>,
}

impl<R: MultiSigReader> Synchronizer<R> {
    pub fn new(
        reader: R,
        filter: TransactionFilter,
        generation: RequestGeneration,
        tx: UnboundedSender<SyncUpdate>,
    ) -> Self {
        Self {
            reader,
            filter,
            generation,
            tx,
        }
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// True once the page that owns the receiver is gone
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    fn send(&self, payload: SyncPayload) {
        let update = SyncUpdate {
            generation: self.generation,
            payload,
        };
        if self.tx.send(update).is_err() {
            debug!("Sync receiver dropped (generation {})", self.generation.value());
        }
    }

    pub async fn refresh_summary(&self) {
        match self.reader.summary().await {
            Ok(summary) => self.send(SyncPayload::Summary(summary)),
            Err(e) => warn!("Failed to fetch multisig summary: {:#}", e),
        }
    }

    pub async fn refresh_transaction_ids(&self) {
        match self.reader.transaction_ids(self.filter).await {
            Ok(ids) => {
                debug!("Fetched {} transaction ids", ids.len());
                self.send(SyncPayload::TransactionIds(ids));
            }
            Err(e) => warn!("Failed to fetch transaction ids: {:#}", e),
        }
    }

    pub async fn initial_fetch(&self) {
        self.refresh_summary().await;
        self.refresh_transaction_ids().await;
    }

    /// Decide whether to subscribe; returns the cutoff to filter events with.
    pub async fn prepare_subscription(&self) -> Result<Option<EventCutoff>> {
        if !self.reader.has_code().await? {
            info!("No contract code at address; not subscribing to events");
            self.send(SyncPayload::NoContractCode);
            return Ok(None);
        }

        let cutoff = EventCutoff::new(self.reader.block_number().await?);
        info!("Subscribing to multisig events after block {}", cutoff.block());
        self.send(SyncPayload::Subscribed {
            cutoff: cutoff.block(),
        });
        Ok(Some(cutoff))
    }

    /// Apply one event; returns the refetches that were performed.
    pub async fn handle_event(&self, cutoff: &EventCutoff, event: &ContractEvent) -> RefreshPlan {
        if !cutoff.admits(event) {
            debug!(
                "Ignoring {:?} event from block {} (cutoff {})",
                event.kind,
                event.block_number,
                cutoff.block()
            );
            return RefreshPlan::NONE;
        }

        let plan = RefreshPlan::for_event(event.kind);
        debug!("{:?} event in block {} -> {:?}", event.kind, event.block_number, plan);
        if plan.summary {
            self.refresh_summary().await;
        }
        if plan.transaction_ids {
            self.refresh_transaction_ids().await;
        }
        plan
    }

    /// Consume events until the stream ends or the receiver is dropped.
    pub async fn follow<S>(&self, cutoff: EventCutoff, events: S)
    where
        S: Stream<Item = Result<ContractEvent>>,
    {
        let mut events = Box::pin(events);
        loop {
            tokio::select! {
                _ = self.tx.closed() => {
                    debug!("Page closed; stopping event subscription");
                    break;
                }
                item = events.next() => match item {
                    Some(Ok(event)) => {
                        self.handle_event(&cutoff, &event).await;
                    }
                    Some(Err(e)) => warn!("Event stream error: {:#}", e),
                    None => {
                        debug!("Event stream ended");
                        break;
                    }
                },
            }
        }
    }
}

/// Full synchronizer lifecycle for a live contract: initial fetch, subscription, event loop.
pub async fn run<M: Middleware + 'static>(
    client: MultiSigClient<M>,
    filter: TransactionFilter,
    generation: RequestGeneration,
    tx: UnboundedSender<SyncUpdate>,
) -> Result<()> {
    let sync = Synchronizer::new(client.clone(), filter, generation, tx);
    sync.initial_fetch().await;

    let Some(cutoff) = sync.prepare_subscription().await? else {
        return Ok(());
    };

    let event_filter = client.events();
    let stream = event_filter
        .stream_with_meta()
        .await
        .map_err(|e| anyhow!("Failed to install event filter: {}", e))?;
    let events = stream.map(|item| {
        item.map(|(event, meta)| ContractEvent::from_log(&event, &meta))
            .map_err(|e| anyhow!("Failed to decode event: {}", e))
    });

    sync.follow(cutoff, events).await;
    Ok(())
}
