//! The chain session handle passed to every component that touches the chain.

use anyhow::{anyhow, Result};
use ethers::prelude::*;
use std::sync::Arc;
use tracing::info;

use crate::config::{self, Config};
use crate::contract::{MultiSigClient, MultiSigReader, MultiSigWriter};
use crate::types::{MultiSigSummary, TransactionFilter, TransactionRecord};
use crate::wallet::{self, WalletBackend};

/// Provider plus signer configuration for one network selection.
///
/// Built once when the network (or RPC, or wallet backend) changes and cloned
/// into background jobs; nothing else holds a provider.
#[derive(Clone, Debug)]
pub struct ChainConnection {
    config: Config,
    provider: Arc<Provider<Http>>,
}

impl ChainConnection {
    pub fn connect(config: Config) -> Result<Self> {
        let provider = Arc::new(config.get_provider()?);
        info!(
            "Chain connection ready: {} (chain_id {}, signer {})",
            config.rpc_url,
            config.chain_id,
            config.wallet_backend.display_name()
        );
        Ok(Self { config, provider })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn provider(&self) -> Arc<Provider<Http>> {
        self.provider.clone()
    }

    /// Read-only client for the multisig at `address`
    pub fn reader(&self, address: Address) -> MultiSigClient<Provider<Http>> {
        MultiSigClient::new(address, self.provider.clone())
    }

    pub fn session(&self, address: Address) -> MultiSigSession {
        MultiSigSession {
            connection: self.clone(),
            reader: self.reader(address),
        }
    }

    /// Chain id reported by the node
    pub async fn chain_id(&self) -> Result<u64> {
        let chain_id = self
            .provider
            .get_chainid()
            .await
            .map_err(|e| anyhow!("Failed to get chain id from {}: {}", self.config.rpc_url, e))?;
        chain_id_to_u64(chain_id)
    }

    /// Display name of the connected network (`local`, `mainnet`, `sepolia`, ...)
    pub async fn network_name(&self) -> Result<String> {
        let chain_id = self.chain_id().await?;
        Ok(display_network_name(chain_id))
    }
}

fn chain_id_to_u64(chain_id: U256) -> Result<u64> {
    if chain_id > U256::from(u64::MAX) {
        return Err(anyhow!("Node reported an out-of-range chain id: {}", chain_id));
    }
    Ok(chain_id.as_u64())
}

pub fn display_network_name(chain_id: u64) -> String {
    config::normalize_network_name(config::network_name(chain_id))
}

enum WriteCall {
    Submit { destination: Address, value: U256, data: Bytes },
    Confirm(U256),
}

async fn dispatch<M: Middleware + 'static>(client: &MultiSigClient<M>, call: WriteCall) -> Result<TxHash> {
    match call {
        WriteCall::Submit { destination, value, data } => client.submit_transaction(destination, value, data).await,
        WriteCall::Confirm(id) => client.confirm_transaction(id).await,
    }
}

/// Reads and signed writes against one multisig through a [`ChainConnection`].
#[derive(Clone)]
pub struct MultiSigSession {
    connection: ChainConnection,
    reader: MultiSigClient<Provider<Http>>,
}

impl MultiSigSession {
    pub fn address(&self) -> Address {
        self.reader.address()
    }

    pub fn reader(&self) -> &MultiSigClient<Provider<Http>> {
        &self.reader
    }

    pub fn connection(&self) -> &ChainConnection {
        &self.connection
    }

    async fn write(&self, call: WriteCall) -> Result<TxHash> {
        let config = self.connection.config();
        match config.wallet_backend {
            WalletBackend::NodeAccount => {
                let from = wallet::node_account(self.connection.provider.as_ref()).await?;
                info!("Signing with node account {:?}", from);
                let client = MultiSigClient::new(self.address(), self.connection.provider()).with_sender(from);
                dispatch(&client, call).await
            }
            WalletBackend::Ledger => {
                // Serialize Ledger/HID access across the entire process.
                let _lock = wallet::ledger_lock().lock().await;
                let ledger = wallet::connect_ledger(config.ledger_account_index, config.chain_id).await?;
                self.write_signed(ledger, call).await
            }
            WalletBackend::PrivateKey => {
                let local = wallet::local_wallet(config.chain_id)?;
                self.write_signed(local, call).await
            }
        }
    }

    async fn write_signed<S: Signer + 'static>(&self, signer: S, call: WriteCall) -> Result<TxHash> {
        info!("Signing with {:?}", signer.address());
        let middleware = SignerMiddleware::new(self.connection.provider.as_ref().clone(), signer);
        let client = MultiSigClient::new(self.address(), Arc::new(middleware));
        dispatch(&client, call).await
    }
}

impl MultiSigReader for MultiSigSession {
    async fn summary(&self) -> Result<MultiSigSummary> {
        self.reader.summary().await
    }

    async fn transaction_ids(&self, filter: TransactionFilter) -> Result<Vec<U256>> {
        self.reader.transaction_ids(filter).await
    }

    async fn transaction_record(&self, id: U256) -> Result<TransactionRecord> {
        self.reader.transaction_record(id).await
    }

    async fn has_code(&self) -> Result<bool> {
        self.reader.has_code().await
    }

    async fn block_number(&self) -> Result<u64> {
        self.reader.block_number().await
    }
}

impl MultiSigWriter for MultiSigSession {
    async fn submit_transaction(&self, destination: Address, value: U256, data: Bytes) -> Result<TxHash> {
        self.write(WriteCall::Submit { destination, value, data }).await
    }

    async fn confirm_transaction(&self, id: U256) -> Result<TxHash> {
        self.write(WriteCall::Confirm(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_network_name() {
        assert_eq!(display_network_name(31337), "local");
        assert_eq!(display_network_name(1337), "local");
        assert_eq!(display_network_name(1), "mainnet");
        assert_eq!(display_network_name(11155111), "sepolia");
    }

    #[test]
    fn test_chain_id_out_of_range_is_an_error() {
        assert_eq!(chain_id_to_u64(U256::from(11155111u64)).unwrap(), 11155111);
        assert_eq!(chain_id_to_u64(U256::from(u64::MAX)).unwrap(), u64::MAX);
        assert!(chain_id_to_u64(U256::from(u64::MAX) + 1).is_err());
    }

    #[test]
    fn test_connect_rejects_invalid_rpc() {
        let config = Config::new("::not-a-url::".into(), 1);
        assert!(ChainConnection::connect(config).is_err());
    }

    #[test]
    fn test_session_is_bound_to_address() {
        let connection = ChainConnection::connect(Config::default()).unwrap();
        let address = Address::from_low_u64_be(0xbeef);
        let session = connection.session(address);

        assert_eq!(session.address(), address);
        assert_eq!(session.reader().address(), address);
        assert_eq!(session.connection().config().chain_id, config::LOCAL_CHAIN_ID);
    }
}
