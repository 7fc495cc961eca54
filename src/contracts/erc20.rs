//! ERC-20 token bindings.

use alloy::primitives::{Address, U256};
use alloy::rpc::types::TransactionReceipt;
use alloy::sol;

use crate::blockchain::transaction::track_pending;
use crate::blockchain::{BlockchainClient, BlockchainResult};
use crate::resilience::with_timeout;
use crate::units::format_amount;

sol! {
    #[sol(rpc)]
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
        function approve(address spender, uint256 amount) external returns (bool);
        function decimals() external view returns (uint8);
        function symbol() external view returns (string);
    }
}

/// A deployed ERC-20 token reached through the harness client.
#[derive(Debug, Clone)]
pub struct Erc20Token {
    client: BlockchainClient,
    address: Address,
    decimals: u8,
    label: String,
}

impl Erc20Token {
    pub fn new(client: BlockchainClient, address: Address, decimals: u8, label: impl Into<String>) -> Self {
        Self {
            client,
            address,
            decimals,
            label: label.into(),
        }
    }

    /// Build a token whose symbol and decimals are read from the chain.
    ///
    /// Tokens that do not implement the optional metadata methods fall back
    /// to 18 decimals and their address as label.
    pub async fn discover(client: BlockchainClient, address: Address) -> Self {
        let decimals = client
            .read("read decimals", |p| async move {
                IERC20::new(address, p).decimals().call().await
            })
            .await;
        let symbol = client
            .read("read symbol", |p| async move {
                IERC20::new(address, p).symbol().call().await
            })
            .await;

        let decimals = decimals.unwrap_or_else(|e| {
            tracing::debug!(token = %address, error = %e, "No decimals(), assuming 18");
            18
        });
        let label = symbol.unwrap_or_else(|_| address.to_string());
        Self::new(client, address, decimals, label)
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Render a raw amount of this token as a decimal.
    pub fn format(&self, amount: U256) -> String {
        format_amount(amount, self.decimals)
    }

    /// `balanceOf(owner)`.
    pub async fn balance_of(&self, owner: Address) -> BlockchainResult<U256> {
        let token = self.address;
        self.client
            .read("read token balance", |p| async move {
                IERC20::new(token, p).balanceOf(owner).call().await
            })
            .await
    }

    /// `allowance(owner, spender)`.
    pub async fn allowance(&self, owner: Address, spender: Address) -> BlockchainResult<U256> {
        let token = self.address;
        self.client
            .read("read allowance", |p| async move {
                IERC20::new(token, p).allowance(owner, spender).call().await
            })
            .await
    }

    /// Send `transfer(to, amount)` from `from` and wait for it to confirm.
    pub async fn transfer(
        &self,
        from: Address,
        to: Address,
        amount: U256,
        gas: u64,
    ) -> BlockchainResult<TransactionReceipt> {
        let contract = IERC20::new(self.address, self.client.provider_for(from));
        let call = contract.transfer(to, amount).from(from).gas(gas);
        let pending = with_timeout(self.client.timeout(), call.send()).await?;

        tracing::info!(
            token = %self.label,
            %from,
            %to,
            amount = %self.format(amount),
            "Token transfer submitted"
        );
        self.client.wait_for_confirmation(track_pending(&pending)).await
    }

    /// Send `approve(spender, amount)` from `owner` and wait for it to confirm.
    pub async fn approve(
        &self,
        owner: Address,
        spender: Address,
        amount: U256,
        gas: u64,
    ) -> BlockchainResult<TransactionReceipt> {
        let contract = IERC20::new(self.address, self.client.provider_for(owner));
        let call = contract.approve(spender, amount).from(owner).gas(gas);
        let pending = with_timeout(self.client.timeout(), call.send()).await?;

        tracing::info!(
            token = %self.label,
            %owner,
            %spender,
            amount = %self.format(amount),
            "Token approval submitted"
        );
        self.client.wait_for_confirmation(track_pending(&pending)).await
    }
}
