//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to JSON-RPC endpoint (primary + read failovers)
//! - Query chain state (chain id, block number, balances, receipts, accounts)
//! - Ask fork nodes to impersonate accounts
//! - Handle timeouts and network errors gracefully

use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionReceipt;
use std::future::Future;
use std::time::Duration;

use crate::blockchain::types::{BlockchainConfig, BlockchainError, BlockchainResult, ChainId};
use crate::blockchain::wallet::Wallet;
use crate::config::ImpersonationMode;
use crate::resilience::with_timeout;

/// Type-erased provider shared between the client and contract wrappers.
pub type SharedProvider = DynProvider;

/// Blockchain RPC client wrapper with failover support for reads.
#[derive(Clone)]
pub struct BlockchainClient {
    /// Read providers (primary + failovers).
    providers: Vec<SharedProvider>,
    /// Primary provider that fills and signs with the local wallet.
    signing: Option<SharedProvider>,
    /// Local wallet, if one was configured.
    wallet: Option<Wallet>,
    /// Configuration.
    config: BlockchainConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a new blockchain client.
    ///
    /// # Arguments
    /// * `config` - Blockchain configuration
    /// * `wallet` - Optional local signer for the deployer
    ///
    /// # Returns
    /// A new client or error if the primary URL is malformed
    pub async fn new(config: BlockchainConfig, wallet: Option<Wallet>) -> BlockchainResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let mut providers = Vec::new();

        // 1. Add primary provider
        let primary_url: url::Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        providers.push(ProviderBuilder::new().connect_http(primary_url.clone()).erased());

        // 2. Add failover providers
        for url_str in &config.failover_urls {
            if let Ok(url) = url_str.parse() {
                providers.push(ProviderBuilder::new().connect_http(url).erased());
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        // 3. Signing provider for the local wallet
        let signing = wallet.as_ref().map(|w| {
            ProviderBuilder::new()
                .wallet(w.ethereum_wallet())
                .connect_http(primary_url)
                .erased()
        });

        let client = Self {
            providers,
            signing,
            wallet,
            config: config.clone(),
            timeout_duration,
        };

        // Verify chain ID matches configuration
        match client.verify_chain_id().await {
            Ok(()) => {
                tracing::info!(
                    rpc_url = %config.rpc_url,
                    chain_id = config.chain_id,
                    "Blockchain client initialized"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Blockchain client initialized but chain verification failed"
                );
            }
        }

        Ok(client)
    }

    /// Run a read against each provider in turn until one answers.
    pub async fn read<T, E, F, Fut>(&self, what: &str, call: F) -> BlockchainResult<T>
    where
        F: Fn(SharedProvider) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut last_error = None;
        for (i, provider) in self.providers.iter().enumerate() {
            match with_timeout(self.timeout_duration, call(provider.clone())).await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    tracing::warn!(provider_idx = i, call = what, error = %e, "RPC read failed, trying next provider");
                    last_error = Some(e);
                }
            }
        }
        Err(BlockchainError::Rpc(format!(
            "All RPC providers failed to {}: {}",
            what,
            last_error.map(|e| e.to_string()).unwrap_or_default()
        )))
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != self.config.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: self.config.chain_id,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        self.read("get chain id", |p| async move { p.get_chain_id().await })
            .await
            .map(ChainId)
    }

    /// Network id (`net_version`), which Truffle uses to key deployments.
    pub async fn get_network_id(&self) -> BlockchainResult<u64> {
        self.read("get network id", |p| async move { p.get_net_version().await })
            .await
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> BlockchainResult<u64> {
        self.read("get block number", |p| async move { p.get_block_number().await })
            .await
    }

    /// Get the native balance of an address.
    pub async fn get_balance(&self, address: Address) -> BlockchainResult<U256> {
        self.read("get balance", |p| async move { p.get_balance(address).await })
            .await
    }

    /// Whether any bytecode is deployed at `address`.
    pub async fn has_code(&self, address: Address) -> BlockchainResult<bool> {
        self.read("get code", |p| async move { p.get_code_at(address).await })
            .await
            .map(|code| !code.is_empty())
    }

    /// Get a transaction receipt by hash.
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> BlockchainResult<Option<TransactionReceipt>> {
        self.read("get receipt", |p| async move {
            p.get_transaction_receipt(tx_hash).await
        })
        .await
    }

    /// Accounts managed by the node (`eth_accounts`).
    pub async fn accounts(&self) -> BlockchainResult<Vec<Address>> {
        self.read("list accounts", |p| async move { p.get_accounts().await })
            .await
    }

    /// The account transactions default to: the local wallet, else the node's first account.
    pub async fn default_account(&self) -> BlockchainResult<Address> {
        if let Some(wallet) = &self.wallet {
            return Ok(wallet.address());
        }
        self.accounts()
            .await?
            .first()
            .copied()
            .ok_or(BlockchainError::NoAccounts)
    }

    /// Let the node send transactions from `address` without its key.
    pub async fn impersonate(&self, address: Address, mode: ImpersonationMode) -> BlockchainResult<()> {
        let method = match mode {
            ImpersonationMode::Anvil => "anvil_impersonateAccount",
            ImpersonationMode::Hardhat => "hardhat_impersonateAccount",
            ImpersonationMode::Ganache | ImpersonationMode::None => {
                tracing::debug!(%address, ?mode, "Skipping impersonation");
                return Ok(());
            }
        };

        let provider = self.provider();
        with_timeout(
            self.timeout_duration,
            provider.raw_request::<_, serde_json::Value>(method.into(), (address,)),
        )
        .await?;

        tracing::info!(%address, method, "Impersonating account");
        Ok(())
    }

    /// Get the underlying primary provider.
    pub fn provider(&self) -> SharedProvider {
        self.providers[0].clone()
    }

    /// Provider that can send a transaction from `from`.
    ///
    /// Transactions from the wallet address are signed locally; anything else
    /// goes out as `eth_sendTransaction` for the node to sign.
    pub fn provider_for(&self, from: Address) -> SharedProvider {
        match &self.signing {
            Some(signing) if self.signs_locally(from) => signing.clone(),
            _ => self.provider(),
        }
    }

    /// Whether transactions from `from` are signed with the local wallet.
    pub fn signs_locally(&self, from: Address) -> bool {
        self.wallet.as_ref().is_some_and(|w| w.address() == from)
    }

    /// Get the configuration.
    pub fn config(&self) -> &BlockchainConfig {
        &self.config
    }

    /// Per-call RPC timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout_duration
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .field("wallet", &self.wallet.as_ref().map(|w| w.address()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> BlockchainConfig {
        BlockchainConfig {
            rpc_url: "http://127.0.0.1:1".to_string(),
            rpc_timeout_secs: 2,
            ..BlockchainConfig::default()
        }
    }

    #[tokio::test]
    async fn test_client_creation() {
        // Client creation should succeed even if RPC is unreachable
        let result = BlockchainClient::new(test_config(), None).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_primary_url() {
        let mut config = test_config();
        config.rpc_url = "::not-a-url".to_string();
        let result = BlockchainClient::new(config, None).await;
        assert!(matches!(result, Err(BlockchainError::Rpc(_))));
    }

    #[tokio::test]
    async fn test_rpc_failover() {
        let mut config = test_config();
        config.failover_urls.push("http://127.0.0.1:2".to_string());

        let client = BlockchainClient::new(config, None).await.unwrap();

        let result = client.get_chain_id().await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("All RPC providers failed"));
    }

    #[tokio::test]
    async fn test_wallet_routes_own_transactions() {
        let wallet = Wallet::from_private_key(
            "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
        )
        .unwrap();
        let own = wallet.address();
        let client = BlockchainClient::new(test_config(), Some(wallet)).await.unwrap();

        assert_eq!(client.default_account().await.unwrap(), own);
        assert!(client.signs_locally(own));
        assert!(!client.signs_locally(Address::ZERO));

        let unsigned = BlockchainClient::new(test_config(), None).await.unwrap();
        assert!(!unsigned.signs_locally(own));
    }

    #[tokio::test]
    async fn test_ganache_impersonation_is_noop() {
        let client = BlockchainClient::new(test_config(), None).await.unwrap();
        // No RPC traffic, so an unreachable node is fine
        client
            .impersonate(Address::ZERO, ImpersonationMode::Ganache)
            .await
            .unwrap();
    }
}
