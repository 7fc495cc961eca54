//! Connected harness: resolved accounts, contracts and amounts.
//!
//! # Responsibilities
//! - Turn a validated `HarnessConfig` into typed addresses and `U256` amounts
//! - Resolve the deployer and the contract under test
//! - Make the whale usable on the node (impersonation)
//! - Execute scenarios for the runner

use alloy::primitives::{Address, U256};
use serde::Serialize;
use std::path::Path;

use crate::assertions::Observation;
use crate::blockchain::{BlockchainClient, Wallet};
use crate::config::HarnessConfig;
use crate::contracts::{artifact, Erc20Token, UniswapV1};
use crate::error::{HarnessError, HarnessResult};
use crate::scenarios::{funding, native, token, Scenario, ScenarioExecutor};
use crate::units::{self, ETHER_DECIMALS};

/// Amounts from the configuration, in base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Amounts {
    pub eth_in: U256,
    pub min_tokens: U256,
    pub deadline: U256,
    pub min_token_gain: U256,
    pub gas_top_up: U256,
    pub token_amount: U256,
}

impl Amounts {
    pub fn from_config(config: &HarnessConfig) -> HarnessResult<Self> {
        let decimals = config.contracts.stablecoin_decimals;
        let parse = |field: &str, value: &str, decimals: u8| {
            units::parse_amount(value, decimals).map_err(|e| HarnessError::invalid(field, e))
        };

        Ok(Self {
            eth_in: parse("funding.eth_in", &config.funding.eth_in, ETHER_DECIMALS)?,
            min_tokens: U256::from(config.funding.min_tokens),
            deadline: U256::from(config.funding.deadline),
            min_token_gain: parse("funding.min_token_gain", &config.funding.min_token_gain, decimals)?,
            gas_top_up: parse("scenarios.gas_top_up", &config.scenarios.gas_top_up, ETHER_DECIMALS)?,
            token_amount: parse("scenarios.token_amount", &config.scenarios.token_amount, decimals)?,
        })
    }
}

/// A configured address and whether the node has code for it.
#[derive(Debug, Clone, Serialize)]
pub struct ContractCheck {
    pub name: String,
    pub address: Address,
    pub has_code: bool,
}

/// One line of the `balances` listing.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceLine {
    pub asset: String,
    pub raw: U256,
    pub formatted: String,
}

/// Everything a scenario needs, connected to a node.
#[derive(Debug, Clone)]
pub struct Harness {
    client: BlockchainClient,
    config: HarnessConfig,
    deployer: Address,
    whale: Address,
    target: Address,
    stablecoin: Erc20Token,
    uniswap: UniswapV1,
    amounts: Amounts,
}

impl Harness {
    /// Connect to the node and resolve every account and contract.
    pub async fn connect(config: HarnessConfig) -> HarnessResult<Self> {
        let amounts = Amounts::from_config(&config)?;
        let whale = parse_address("accounts.whale", &config.accounts.whale)?;
        let stablecoin_address = parse_address("contracts.stablecoin", &config.contracts.stablecoin)?;
        let factory = parse_address("contracts.uniswap_factory", &config.contracts.uniswap_factory)?;

        let wallet = Wallet::from_env()?;
        let client = BlockchainClient::new(config.blockchain.clone(), wallet).await?;

        let deployer = match &config.accounts.deployer {
            Some(deployer) => parse_address("accounts.deployer", deployer)?,
            None => client.default_account().await?,
        };
        let target = resolve_target(&client, &config).await?;

        client.impersonate(whale, config.accounts.impersonation).await?;

        let stablecoin = Erc20Token::new(
            client.clone(),
            stablecoin_address,
            config.contracts.stablecoin_decimals,
            "stablecoin",
        );
        let uniswap = UniswapV1::new(client.clone(), factory);

        tracing::info!(%deployer, %whale, %target, "Harness connected");

        Ok(Self {
            client,
            config,
            deployer,
            whale,
            target,
            stablecoin,
            uniswap,
            amounts,
        })
    }

    pub fn client(&self) -> &BlockchainClient {
        &self.client
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Default account: sends the gas top-up and approves the target.
    pub fn deployer(&self) -> Address {
        self.deployer
    }

    pub fn whale(&self) -> Address {
        self.whale
    }

    /// Contract under test.
    pub fn target(&self) -> Address {
        self.target
    }

    pub fn stablecoin(&self) -> &Erc20Token {
        &self.stablecoin
    }

    pub fn uniswap(&self) -> &UniswapV1 {
        &self.uniswap
    }

    pub fn amounts(&self) -> &Amounts {
        &self.amounts
    }

    /// Check that every configured contract has code on the node.
    pub async fn check_contracts(&self) -> HarnessResult<Vec<ContractCheck>> {
        let contracts = &self.config.contracts;
        let mut named = vec![
            ("target".to_string(), self.target),
            ("stablecoin".to_string(), self.stablecoin.address()),
            ("uniswap_factory".to_string(), self.uniswap.factory()),
        ];
        for (name, value) in [
            ("usdc", &contracts.usdc),
            ("curve_swap", &contracts.curve_swap),
            ("curve_swap_token", &contracts.curve_swap_token),
        ] {
            if let Some(address) = value {
                named.push((name.to_string(), parse_address(name, address)?));
            }
        }

        let mut checks = Vec::with_capacity(named.len());
        for (name, address) in named {
            let has_code = self.client.has_code(address).await?;
            if !has_code {
                tracing::warn!(contract = %name, %address, "No code at configured address");
            }
            checks.push(ContractCheck { name, address, has_code });
        }
        Ok(checks)
    }

    /// Native and token balances of `account` for every configured token.
    pub async fn balances(&self, account: Address) -> HarnessResult<Vec<BalanceLine>> {
        let native = self.client.get_balance(account).await?;
        let mut lines = vec![BalanceLine {
            asset: "ETH".to_string(),
            raw: native,
            formatted: units::format_amount(native, ETHER_DECIMALS),
        }];

        let contracts = &self.config.contracts;
        let mut tokens = vec![self.stablecoin.clone()];
        for (name, value) in [("usdc", &contracts.usdc), ("curve_swap_token", &contracts.curve_swap_token)] {
            if let Some(address) = value {
                let address = parse_address(name, address)?;
                tokens.push(Erc20Token::discover(self.client.clone(), address).await);
            }
        }

        for token in tokens {
            let raw = token.balance_of(account).await?;
            lines.push(BalanceLine {
                asset: token.label().to_string(),
                raw,
                formatted: token.format(raw),
            });
        }
        Ok(lines)
    }
}

impl ScenarioExecutor for Harness {
    async fn setup(&self) -> HarnessResult<Observation> {
        funding::fund_whale(self).await
    }

    async fn execute(&self, scenario: Scenario) -> HarnessResult<Observation> {
        match scenario {
            Scenario::SendEther => native::send_ether(self).await,
            Scenario::TransferToken => token::transfer_token(self).await,
            Scenario::ApproveToken => token::approve_token(self).await,
        }
    }
}

fn parse_address(field: &str, value: &str) -> HarnessResult<Address> {
    value
        .parse()
        .map_err(|e| HarnessError::invalid(field, format!("'{}': {}", value, e)))
}

async fn resolve_target(client: &BlockchainClient, config: &HarnessConfig) -> HarnessResult<Address> {
    if let Some(target) = &config.contracts.target {
        return parse_address("contracts.target", target);
    }

    let path = config
        .contracts
        .target_artifact
        .as_deref()
        .ok_or_else(|| HarnessError::invalid("contracts.target", "no address or artifact configured"))?;
    let network = client.get_network_id().await?;
    let address = artifact::deployed_address(Path::new(path), network)?;
    tracing::info!(artifact = path, network, %address, "Resolved target from artifact");
    Ok(address)
}
