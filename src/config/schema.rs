//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the harness.
//! All types derive Serde traits for deserialization from config files, and
//! the defaults reproduce the mainnet-fork CurveProtocol suite.

use serde::{Deserialize, Serialize};

/// Root configuration for the harness.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HarnessConfig {
    /// Node connection settings.
    pub blockchain: BlockchainConfig,

    /// Accounts that sign or receive transactions.
    pub accounts: AccountsConfig,

    /// Addresses of the external contracts.
    pub contracts: ContractsConfig,

    /// Stablecoin acquisition run before every scenario.
    pub funding: FundingConfig,

    /// Scenario parameters and run control.
    pub scenarios: ScenarioConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Blockchain node configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs, used for reads only.
    #[serde(default)]
    pub failover_urls: Vec<String>,

    /// Chain ID (1 for a mainnet fork, 31337 for a fresh Anvil).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Maximum time to wait for a transaction receipt, in seconds.
    pub receipt_timeout_secs: u64,

    /// Blocks on top of the inclusion block before a transaction counts as confirmed.
    /// Forks mine on demand, so the default is 0.
    pub confirmation_blocks: u32,

    /// Base delay for receipt polling backoff in milliseconds.
    pub poll_base_ms: u64,

    /// Cap for receipt polling backoff in milliseconds.
    pub poll_max_ms: u64,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            chain_id: 1,
            rpc_timeout_secs: 30,
            receipt_timeout_secs: 120,
            confirmation_blocks: 0,
            poll_base_ms: 100,
            poll_max_ms: 2000,
        }
    }
}

/// How the node lets the harness send from an account it holds no key for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImpersonationMode {
    /// Node was started with `--unlock <address>`; nothing to do.
    #[default]
    Ganache,
    /// `anvil_impersonateAccount`.
    Anvil,
    /// `hardhat_impersonateAccount`.
    Hardhat,
    /// Never impersonate.
    None,
}

/// Account configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AccountsConfig {
    /// Pre-funded mainnet account that buys and transfers the stablecoin.
    pub whale: String,

    /// Account that sends native currency and approves the target.
    /// Falls back to the local wallet, then to the node's first account.
    pub deployer: Option<String>,

    /// Impersonation method for the whale.
    pub impersonation: ImpersonationMode,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            whale: "0xfcd22438ad6ed564a1c26151df73f6b33b817b56".to_string(),
            deployer: None,
            impersonation: ImpersonationMode::Ganache,
        }
    }
}

/// External contract addresses.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractsConfig {
    /// Address of the contract under test.
    pub target: Option<String>,

    /// Truffle build artifact of the contract under test, used when `target` is unset.
    pub target_artifact: Option<String>,

    /// Stablecoin (DAI) contract.
    pub stablecoin: String,

    /// Decimals of the stablecoin.
    pub stablecoin_decimals: u8,

    /// USDC contract, reported by `balances`.
    pub usdc: Option<String>,

    /// Curve swap pool, reported by `balances`.
    pub curve_swap: Option<String>,

    /// Curve pool LP token, reported by `balances`.
    pub curve_swap_token: Option<String>,

    /// Uniswap V1 factory.
    pub uniswap_factory: String,
}

impl Default for ContractsConfig {
    fn default() -> Self {
        Self {
            target: None,
            target_artifact: Some("build/contracts/CurveProtocol.json".to_string()),
            stablecoin: "0x6b175474e89094c44da98b954eedeac495271d0f".to_string(),
            stablecoin_decimals: 18,
            usdc: Some("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48".to_string()),
            curve_swap: Some("0xA5407eAE9Ba41422680e2e00537571bcC53efBfD".to_string()),
            curve_swap_token: Some("0xC25a3A3b969415c80451098fa907EC722572917F".to_string()),
            uniswap_factory: "0xc0a47dFe034B400B47bDaD5FecDa2621de6c4d95".to_string(),
        }
    }
}

/// Stablecoin acquisition through the Uniswap V1 exchange.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FundingConfig {
    /// Run the swap before every scenario.
    pub enabled: bool,

    /// Native currency to swap, in ether.
    pub eth_in: String,

    /// `min_tokens` argument of `ethToTokenSwapInput`, in token base units.
    pub min_tokens: u64,

    /// Swap deadline (unix seconds).
    pub deadline: u64,

    /// Gas limit of the swap transaction.
    pub gas: u64,

    /// Minimum stablecoin gain expected from the swap, in whole tokens.
    pub min_token_gain: String,
}

impl Default for FundingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            eth_in: "5".to_string(),
            min_tokens: 1,
            // year 2050
            deadline: 2_525_644_800,
            gas: 4_000_000,
            min_token_gain: "1000".to_string(),
        }
    }
}

/// Scenario parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Native currency sent to the whale so it can pay for token transactions, in ether.
    pub gas_top_up: String,

    /// Stablecoin amount transferred and approved, in whole tokens.
    pub token_amount: String,

    /// Gas limit of `transfer` and `approve`.
    pub token_gas_limit: u64,

    /// Stop the run at the first failing scenario.
    pub fail_fast: bool,

    /// Run only these scenarios (empty = all).
    pub only: Vec<String>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            gas_top_up: "0.1".to_string(),
            token_amount: "100".to_string(),
            token_gas_limit: 800_000,
            fail_fast: true,
            only: Vec::new(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: HarnessConfig = toml::from_str("").unwrap();
        assert_eq!(config.blockchain.rpc_url, "http://localhost:8545");
        assert_eq!(config.funding.deadline, 2_525_644_800);
        assert_eq!(config.scenarios.token_amount, "100");
        assert_eq!(config.accounts.impersonation, ImpersonationMode::Ganache);
    }

    #[test]
    fn test_partial_sections() {
        let config: HarnessConfig = toml::from_str(
            r#"
            [blockchain]
            rpc_url = "http://127.0.0.1:9545"

            [accounts]
            impersonation = "anvil"

            [scenarios]
            only = ["send-ether"]
            "#,
        )
        .unwrap();
        assert_eq!(config.blockchain.rpc_url, "http://127.0.0.1:9545");
        assert_eq!(config.blockchain.chain_id, 1);
        assert_eq!(config.accounts.impersonation, ImpersonationMode::Anvil);
        assert_eq!(config.scenarios.only, vec!["send-ether".to_string()]);
        assert!(config.scenarios.fail_fast);
    }
}
