//! Uniswap V1 factory and exchange bindings, used to buy the stablecoin with
//! native currency on a mainnet fork.

use alloy::primitives::{Address, U256};
use alloy::rpc::types::TransactionReceipt;
use alloy::sol;

use crate::blockchain::transaction::track_pending;
use crate::blockchain::{BlockchainClient, BlockchainError, BlockchainResult};
use crate::resilience::with_timeout;

sol! {
    #[sol(rpc)]
    interface IUniswapFactory {
        function getExchange(address token) external view returns (address exchange);
    }

    #[sol(rpc)]
    interface IUniswapExchange {
        function ethToTokenSwapInput(uint256 min_tokens, uint256 deadline) external payable returns (uint256 tokens_bought);
    }
}

/// Parameters of an `ethToTokenSwapInput` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthSwap {
    /// Account paying the native currency and receiving the tokens.
    pub from: Address,
    /// Native currency sent with the call.
    pub eth_in: U256,
    /// Minimum tokens bought, in base units.
    pub min_tokens: U256,
    /// Unix timestamp after which the exchange rejects the swap.
    pub deadline: U256,
    /// Gas limit.
    pub gas: u64,
}

/// Uniswap V1 factory.
#[derive(Debug, Clone)]
pub struct UniswapV1 {
    client: BlockchainClient,
    factory: Address,
}

impl UniswapV1 {
    pub fn new(client: BlockchainClient, factory: Address) -> Self {
        Self { client, factory }
    }

    pub fn factory(&self) -> Address {
        self.factory
    }

    /// Exchange contract listed for `token`.
    pub async fn exchange_for(&self, token: Address) -> BlockchainResult<Address> {
        let factory = self.factory;
        let exchange = self
            .client
            .read("look up exchange", |p| async move {
                IUniswapFactory::new(factory, p).getExchange(token).call().await
            })
            .await?;

        if exchange == Address::ZERO {
            return Err(BlockchainError::Contract(format!(
                "Uniswap factory {} has no exchange for token {}",
                factory, token
            )));
        }
        Ok(exchange)
    }

    /// Swap native currency for tokens on `exchange` and wait for the receipt.
    pub async fn swap_eth_for_tokens(
        &self,
        exchange: Address,
        swap: EthSwap,
    ) -> BlockchainResult<TransactionReceipt> {
        let contract = IUniswapExchange::new(exchange, self.client.provider_for(swap.from));
        let call = contract
            .ethToTokenSwapInput(swap.min_tokens, swap.deadline)
            .from(swap.from)
            .value(swap.eth_in)
            .gas(swap.gas);
        let pending = with_timeout(self.client.timeout(), call.send()).await?;

        tracing::info!(
            %exchange,
            from = %swap.from,
            eth_in = %swap.eth_in,
            "Swap submitted"
        );
        self.client.wait_for_confirmation(track_pending(&pending)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::sol_types::SolCall;

    #[test]
    fn test_swap_calldata() {
        let call = IUniswapExchange::ethToTokenSwapInputCall {
            min_tokens: U256::from(1u64),
            deadline: U256::from(2_525_644_800u64),
        };
        let data = call.abi_encode();
        assert_eq!(&data[..4], &IUniswapExchange::ethToTokenSwapInputCall::SELECTOR);
        assert_eq!(data.len(), 4 + 64);
        assert_eq!(data[35], 1);
        assert_eq!(
            U256::from_be_slice(&data[36..68]),
            U256::from(2_525_644_800u64)
        );
    }

    #[test]
    fn test_get_exchange_selector() {
        // keccak256("getExchange(address)")
        assert_eq!(IUniswapFactory::getExchangeCall::SELECTOR, [0x06, 0xf2, 0xbf, 0x62]);
    }
}
