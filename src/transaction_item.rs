//! Per-transaction row state and the confirm action.

use anyhow::Result;
use ethers::types::U256;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

use crate::contract::{MultiSigReader, MultiSigWriter};
use crate::generation::RequestGeneration;
use crate::submit_form::ActionOutcome;
use crate::types::TransactionRecord;

/// One row of the "Existing Transactions" list.
#[derive(Debug, Clone)]
pub struct TransactionItem {
    id: U256,
    record: Option<TransactionRecord>,
    // Sticky: once executed is observed for this id it never reverts
    executed_seen: bool,
    generation: RequestGeneration,
    loading: bool,
    confirming: bool,
}

impl TransactionItem {
    pub fn new(id: U256) -> Self {
        Self {
            id,
            record: None,
            executed_seen: false,
            generation: RequestGeneration::new(),
            loading: false,
            confirming: false,
        }
    }

    pub fn id(&self) -> U256 {
        self.id
    }

    pub fn record(&self) -> Option<&TransactionRecord> {
        self.record.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_confirming(&self) -> bool {
        self.confirming
    }

    pub fn is_executed(&self) -> bool {
        self.executed_seen
    }

    /// Mark the row as loading under `generation`; older results become stale
    fn fetch_under(&mut self, generation: RequestGeneration) -> RequestGeneration {
        self.loading = true;
        self.generation = generation;
        generation
    }

    /// Apply a fetched record. Returns false when the result was stale and dropped.
    pub fn apply_record(&mut self, generation: RequestGeneration, result: Result<TransactionRecord>) -> bool {
        if !self.generation.is_current(generation) {
            debug!(
                "Dropping stale record for transaction {} (generation {} != {})",
                self.id,
                generation.value(),
                self.generation.value()
            );
            return false;
        }
        self.loading = false;

        match result {
            Ok(record) if record.id == self.id => {
                self.executed_seen |= record.executed;
                self.record = Some(record);
                true
            }
            Ok(record) => {
                warn!("Fetched record {} for row {}; ignoring", record.id, self.id);
                false
            }
            Err(e) => {
                warn!("Failed to fetch transaction {}: {:#}", self.id, e);
                false
            }
        }
    }

    /// Confirm is offered only for a loaded record that has never been seen executed
    pub fn can_confirm(&self) -> bool {
        self.record.is_some() && !self.executed_seen && !self.confirming
    }

    fn begin_confirm(&mut self, generation: RequestGeneration) -> Option<RequestGeneration> {
        if !self.can_confirm() {
            return None;
        }
        self.confirming = true;
        Some(self.fetch_under(generation))
    }

    pub fn finish_confirm(&mut self) {
        self.confirming = false;
    }

    pub fn status_label(&self) -> &'static str {
        if self.executed_seen {
            "✅ Sent"
        } else {
            "⏱ Pending"
        }
    }

    /// "Confirmed Addresses (N out of M)" heading, `None` while nobody has confirmed
    pub fn confirmations_label(&self, required: U256) -> Option<String> {
        let record = self.record.as_ref()?;
        if record.confirmed_by.is_empty() {
            return None;
        }
        Some(format!(
            "Confirmed Addresses ({} out of {})",
            record.confirmed_by.len(),
            required
        ))
    }
}

/// The list of rows, rebuilt whenever the transaction-id list is refetched.
#[derive(Debug, Default)]
pub struct TransactionList {
    items: Vec<TransactionItem>,
    executed_ids: HashSet<U256>,
    // Shared by all rows so a re-added id never reuses an old generation
    counter: RequestGeneration,
}

impl TransactionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[TransactionItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: U256) -> Option<&TransactionItem> {
        self.items.iter().find(|item| item.id == id)
    }

    fn get_mut(&mut self, id: U256) -> Option<&mut TransactionItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// Replace the rows with `ids`. Retained rows keep their last record on
    /// screen; every row is refetched under a fresh generation. Returns the
    /// fetches to dispatch.
    pub fn replace(&mut self, ids: Vec<U256>) -> Vec<(U256, RequestGeneration)> {
        let mut previous: HashMap<U256, TransactionItem> =
            self.items.drain(..).map(|item| (item.id, item)).collect();

        self.items = ids
            .into_iter()
            .map(|id| {
                let mut item = previous.remove(&id).unwrap_or_else(|| TransactionItem::new(id));
                item.executed_seen |= self.executed_ids.contains(&id);
                item
            })
            .collect();

        let counter = &mut self.counter;
        self.items
            .iter_mut()
            .map(|item| (item.id, item.fetch_under(counter.bump())))
            .collect()
    }

    pub fn apply_record(&mut self, id: U256, generation: RequestGeneration, result: Result<TransactionRecord>) -> bool {
        let Some(item) = self.get_mut(id) else {
            debug!("Dropping record for transaction {} no longer listed", id);
            return false;
        };
        let applied = item.apply_record(generation, result);
        if item.executed_seen {
            self.executed_ids.insert(id);
        }
        applied
    }

    /// Mark `id` as confirming; returns the generation its post-confirm refetch runs under
    pub fn begin_confirm(&mut self, id: U256) -> Option<RequestGeneration> {
        let generation = self.counter.bump();
        self.get_mut(id)?.begin_confirm(generation)
    }

    pub fn finish_confirm(&mut self, id: U256) {
        if let Some(item) = self.get_mut(id) {
            item.finish_confirm();
        }
    }
}

/// Confirm `id`, then refetch its record exactly once regardless of the outcome.
pub async fn confirm_and_refresh<C>(client: &C, id: U256) -> ActionOutcome<TransactionRecord>
where
    C: MultiSigReader + MultiSigWriter,
{
    info!("Confirming transaction {}", id);
    let write = client.confirm_transaction(id).await;
    if let Err(e) = &write {
        warn!("confirmTransaction({}) failed: {:#}", id, e);
    }

    let refreshed = client.transaction_record(id).await;
    ActionOutcome { write, refreshed }
}
