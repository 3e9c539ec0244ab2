//! Typed access to the multisig wallet contract.
//!
//! [`MultiSigClient`] wraps the generated bindings for any middleware: a plain
//! provider for reads, a signer-backed middleware for writes. The reader and
//! writer traits are the seams the synchronizer and UI actions are written
//! against, so they can run against in-memory fakes in tests.

use anyhow::{anyhow, bail, Result};
use ethers::abi::Detokenize;
use ethers::contract::ContractCall;
use ethers::prelude::*;
use std::sync::Arc;
use tracing::{debug, info};

use crate::types::{MultiSigSummary, TransactionFilter, TransactionRecord};

abigen!(
    MultiSig,
    r#"[
        function transactions(uint256) external view returns (address, uint256, bytes, bool)
        function getConfirmations(uint256) external view returns (address[])
        function required() external view returns (uint256)
        function getOwners() external view returns (address[])
        function getTransactionIds(bool pending, bool executed) external view returns (uint256[])
        function submitTransaction(address destination, uint256 value, bytes data) external returns (uint256)
        function confirmTransaction(uint256 transactionId) external
        event Confirmation(address indexed sender, uint256 indexed transactionId)
        event Submission(uint256 indexed transactionId)
        event Execution(uint256 indexed transactionId)
        event Deposit(address indexed sender, uint256 value)
    ]"#
);

/// Read access to a multisig.
#[allow(async_fn_in_trait)]
pub trait MultiSigReader {
    async fn summary(&self) -> Result<MultiSigSummary>;
    async fn transaction_ids(&self, filter: TransactionFilter) -> Result<Vec<U256>>;
    async fn transaction_record(&self, id: U256) -> Result<TransactionRecord>;
    async fn has_code(&self) -> Result<bool>;
    async fn block_number(&self) -> Result<u64>;
}

/// Signed writes against a multisig. Each call resolves once the transaction is mined.
#[allow(async_fn_in_trait)]
pub trait MultiSigWriter {
    async fn submit_transaction(&self, destination: Address, value: U256, data: Bytes) -> Result<TxHash>;
    async fn confirm_transaction(&self, id: U256) -> Result<TxHash>;
}

pub struct MultiSigClient<M> {
    address: Address,
    client: Arc<M>,
    contract: MultiSig<M>,
    /// Explicit `from` for writes through a node-managed account
    sender: Option<Address>,
}

impl<M> Clone for MultiSigClient<M> {
    fn clone(&self) -> Self {
        Self {
            address: self.address,
            client: self.client.clone(),
            contract: self.contract.clone(),
            sender: self.sender,
        }
    }
}

impl<M: Middleware + 'static> MultiSigClient<M> {
    pub fn new(address: Address, client: Arc<M>) -> Self {
        let contract = MultiSig::new(address, client.clone());
        Self {
            address,
            client,
            contract,
            sender: None,
        }
    }

    pub fn with_sender(mut self, sender: Address) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub async fn required_confirmations(&self) -> Result<U256> {
        self.contract
            .required()
            .call()
            .await
            .map_err(|e| anyhow!("required() failed: {}", e))
    }

    pub async fn owners(&self) -> Result<Vec<Address>> {
        self.contract
            .get_owners()
            .call()
            .await
            .map_err(|e| anyhow!("getOwners() failed: {}", e))
    }

    pub async fn balance(&self) -> Result<U256> {
        self.client
            .get_balance(self.address, None)
            .await
            .map_err(|e| anyhow!("Failed to get balance of {:?}: {}", self.address, e))
    }

    /// Destination, value, payload and executed flag of one transaction
    pub async fn transaction(&self, id: U256) -> Result<(Address, U256, Bytes, bool)> {
        self.contract
            .transactions(id)
            .call()
            .await
            .map_err(|e| anyhow!("transactions({}) failed: {}", id, e))
    }

    pub async fn confirmations(&self, id: U256) -> Result<Vec<Address>> {
        self.contract
            .get_confirmations(id)
            .call()
            .await
            .map_err(|e| anyhow!("getConfirmations({}) failed: {}", id, e))
    }

    /// The contract's event filter covering all four event kinds
    pub fn events(&self) -> Event<Arc<M>, M, MultiSigEvents> {
        self.contract.events()
    }

    async fn send_call<D: Detokenize>(&self, mut call: ContractCall<M, D>, what: &str) -> Result<TxHash> {
        if let Some(sender) = self.sender {
            call = call.from(sender);
        }

        let pending = call
            .send()
            .await
            .map_err(|e| anyhow!("{} failed: {}", what, e))?;
        let tx_hash = pending.tx_hash();
        info!("{} sent: {:?}", what, tx_hash);

        let receipt = pending
            .await
            .map_err(|e| anyhow!("{} was not confirmed: {}", what, e))?
            .ok_or_else(|| anyhow!("{} was dropped from the mempool", what))?;

        if receipt.status == Some(U64::zero()) {
            bail!("{} reverted in block {:?}", what, receipt.block_number);
        }
        debug!("{} mined in block {:?}", what, receipt.block_number);
        Ok(tx_hash)
    }
}

impl<M: Middleware + 'static> MultiSigReader for MultiSigClient<M> {
    async fn summary(&self) -> Result<MultiSigSummary> {
        let balance = self.balance().await?;
        if !self.has_code().await? {
            debug!("No contract code at {:?}", self.address);
            return Ok(MultiSigSummary::without_code(balance));
        }

        let required_confirmations = self.required_confirmations().await?;
        let owners = self.owners().await?;
        Ok(MultiSigSummary {
            balance,
            required_confirmations,
            owners,
        })
    }

    async fn transaction_ids(&self, filter: TransactionFilter) -> Result<Vec<U256>> {
        self.contract
            .get_transaction_ids(filter.pending, filter.executed)
            .call()
            .await
            .map_err(|e| anyhow!("getTransactionIds({}, {}) failed: {}", filter.pending, filter.executed, e))
    }

    async fn transaction_record(&self, id: U256) -> Result<TransactionRecord> {
        let (destination, value, data, executed) = self.transaction(id).await?;
        let confirmed_by = self.confirmations(id).await?;
        Ok(TransactionRecord {
            id,
            destination,
            value,
            executed,
            data,
            confirmed_by,
        })
    }

    async fn has_code(&self) -> Result<bool> {
        let code = self
            .client
            .get_code(self.address, None)
            .await
            .map_err(|e| anyhow!("Failed to get code at {:?}: {}", self.address, e))?;
        Ok(!code.is_empty())
    }

    async fn block_number(&self) -> Result<u64> {
        let block = self
            .client
            .get_block_number()
            .await
            .map_err(|e| anyhow!("Failed to get block number: {}", e))?;
        Ok(block.as_u64())
    }
}

impl<M: Middleware + 'static> MultiSigWriter for MultiSigClient<M> {
    async fn submit_transaction(&self, destination: Address, value: U256, data: Bytes) -> Result<TxHash> {
        let call = self.contract.submit_transaction(destination, value, data);
        self.send_call(call, "submitTransaction").await
    }

    async fn confirm_transaction(&self, id: U256) -> Result<TxHash> {
        let call = self.contract.confirm_transaction(id);
        self.send_call(call, &format!("confirmTransaction({})", id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::abi::{encode, Token};
    use ethers::providers::{MockProvider, Provider};

    fn client() -> (MultiSigClient<Provider<MockProvider>>, MockProvider) {
        let (provider, mock) = Provider::mocked();
        let address: Address = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse().unwrap();
        (MultiSigClient::new(address, Arc::new(provider)), mock)
    }

    fn owner(n: u64) -> Address {
        Address::from_low_u64_be(n)
    }

    #[tokio::test]
    async fn test_required_confirmations_decodes_uint() {
        let (client, mock) = client();
        mock.push::<Bytes, _>(Bytes::from(encode(&[Token::Uint(U256::from(2u64))])))
            .unwrap();

        assert_eq!(client.required_confirmations().await.unwrap(), U256::from(2u64));
    }

    #[tokio::test]
    async fn test_owners_decodes_address_array() {
        let (client, mock) = client();
        let encoded = encode(&[Token::Array(vec![
            Token::Address(owner(1)),
            Token::Address(owner(2)),
            Token::Address(owner(3)),
        ])]);
        mock.push::<Bytes, _>(Bytes::from(encoded)).unwrap();

        assert_eq!(client.owners().await.unwrap(), vec![owner(1), owner(2), owner(3)]);
    }

    #[tokio::test]
    async fn test_transaction_ids_decodes_uint_array() {
        let (client, mock) = client();
        let encoded = encode(&[Token::Array(vec![
            Token::Uint(U256::zero()),
            Token::Uint(U256::one()),
        ])]);
        mock.push::<Bytes, _>(Bytes::from(encoded)).unwrap();

        let ids = client
            .transaction_ids(TransactionFilter::default())
            .await
            .unwrap();
        assert_eq!(ids, vec![U256::zero(), U256::one()]);
    }

    #[tokio::test]
    async fn test_transaction_decodes_tuple() {
        let (client, mock) = client();
        let encoded = encode(&[
            Token::Address(owner(9)),
            Token::Uint(U256::exp10(18)),
            Token::Bytes(vec![]),
            Token::Bool(true),
        ]);
        mock.push::<Bytes, _>(Bytes::from(encoded)).unwrap();

        let (destination, value, data, executed) = client.transaction(U256::zero()).await.unwrap();
        assert_eq!(destination, owner(9));
        assert_eq!(value, U256::exp10(18));
        assert!(data.is_empty());
        assert!(executed);
    }

    #[tokio::test]
    async fn test_has_code_false_for_empty_code() {
        let (client, mock) = client();
        mock.push::<Bytes, _>(Bytes::default()).unwrap();

        assert!(!client.has_code().await.unwrap());
    }

    #[tokio::test]
    async fn test_has_code_true_for_deployed_contract() {
        let (client, mock) = client();
        mock.push::<Bytes, _>(Bytes::from(vec![0x60, 0x80, 0x60, 0x40])).unwrap();

        assert!(client.has_code().await.unwrap());
    }

    #[tokio::test]
    async fn test_block_number() {
        let (client, mock) = client();
        mock.push::<U64, _>(U64::from(1234u64)).unwrap();

        assert_eq!(client.block_number().await.unwrap(), 1234);
    }

    #[tokio::test]
    async fn test_balance() {
        let (client, mock) = client();
        mock.push::<U256, _>(U256::from(42u64)).unwrap();

        assert_eq!(client.balance().await.unwrap(), U256::from(42u64));
    }

    #[tokio::test]
    async fn test_read_failure_is_an_error() {
        let (client, _mock) = client();
        // No queued response: the mock transport errors out
        assert!(client.required_confirmations().await.is_err());
    }
}
