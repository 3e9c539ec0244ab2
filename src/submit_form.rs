//! "Create Transaction" form state and the submit action.

use anyhow::Result;
use ethers::types::{Address, Bytes, TxHash, U256};
use tracing::{info, warn};

use crate::contract::{MultiSigReader, MultiSigWriter};
use crate::error::ValidationError;
use crate::types::TransactionFilter;
use crate::utils::{parse_address, parse_eth_str_to_wei};

/// Validated submission, ready to hand to the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRequest {
    pub destination: Address,
    pub value: U256,
    pub data: Bytes,
}

/// Editable form fields plus per-field "touched" tracking.
///
/// Errors are computed from the current text at all times but only shown
/// for fields the user has interacted with.
#[derive(Debug, Clone, Default)]
pub struct SubmitForm {
    pub destination: String,
    pub value: String,
    destination_touched: bool,
    value_touched: bool,
}

impl SubmitForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn touch_destination(&mut self) {
        self.destination_touched = true;
    }

    pub fn touch_value(&mut self) {
        self.value_touched = true;
    }

    pub fn any_touched(&self) -> bool {
        self.destination_touched || self.value_touched
    }

    pub fn destination_error(&self) -> Option<ValidationError> {
        parse_address(&self.destination)
            .err()
            .map(|_| ValidationError::InvalidAddress)
    }

    pub fn value_error(&self) -> Option<ValidationError> {
        parse_eth_str_to_wei(&self.value)
            .err()
            .map(|_| ValidationError::InvalidAmount)
    }

    /// Error to display under the destination field, if any
    pub fn visible_destination_error(&self) -> Option<ValidationError> {
        self.destination_touched.then(|| self.destination_error()).flatten()
    }

    pub fn visible_value_error(&self) -> Option<ValidationError> {
        self.value_touched.then(|| self.value_error()).flatten()
    }

    pub fn is_valid(&self) -> bool {
        self.destination_error().is_none() && self.value_error().is_none()
    }

    /// Submit stays disabled until something was touched and everything validates
    pub fn can_submit(&self) -> bool {
        self.any_touched() && self.is_valid()
    }

    pub fn to_request(&self) -> Result<SubmitRequest, ValidationError> {
        let destination = parse_address(&self.destination).map_err(|_| ValidationError::InvalidAddress)?;
        let value = parse_eth_str_to_wei(&self.value).map_err(|_| ValidationError::InvalidAmount)?;
        Ok(SubmitRequest {
            destination,
            value,
            data: Bytes::default(),
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Result of a write followed by its refetch.
///
/// `write` and `refreshed` fail independently; a failed write still carries
/// whatever the refetch produced.
#[derive(Debug)]
pub struct ActionOutcome<T> {
    pub write: Result<TxHash>,
    pub refreshed: Result<T>,
}

/// Submit the request, then refetch the transaction-id list exactly once,
/// whether or not the submission went through.
pub async fn submit_and_refresh<C>(
    client: &C,
    request: SubmitRequest,
    filter: TransactionFilter,
) -> ActionOutcome<Vec<U256>>
where
    C: MultiSigReader + MultiSigWriter,
{
    info!(
        "Submitting transaction: destination={:?} value={} wei",
        request.destination, request.value
    );
    let write = client
        .submit_transaction(request.destination, request.value, request.data)
        .await;
    if let Err(e) = &write {
        warn!("submitTransaction failed: {:#}", e);
    }

    let refreshed = client.transaction_ids(filter).await;
    ActionOutcome { write, refreshed }
}
