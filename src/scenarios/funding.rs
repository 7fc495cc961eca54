//! Setup: buy the stablecoin for the whale on the Uniswap V1 exchange.

use crate::assertions::{assert_gain_at_least, Observation};
use crate::contracts::EthSwap;
use crate::error::HarnessResult;
use crate::harness::Harness;

/// Swap native currency for the stablecoin from the whale and check the gain.
pub async fn fund_whale(harness: &Harness) -> HarnessResult<Observation> {
    let stablecoin = harness.stablecoin();
    let whale = harness.whale();
    let amounts = harness.amounts();

    let exchange = harness.uniswap().exchange_for(stablecoin.address()).await?;
    let before = stablecoin.balance_of(whale).await?;

    let swap = EthSwap {
        from: whale,
        eth_in: amounts.eth_in,
        min_tokens: amounts.min_tokens,
        deadline: amounts.deadline,
        gas: harness.config().funding.gas,
    };
    harness.uniswap().swap_eth_for_tokens(exchange, swap).await?;

    let after = stablecoin.balance_of(whale).await?;
    tracing::debug!(
        before = %stablecoin.format(before),
        after = %stablecoin.format(after),
        "Whale funded"
    );

    Ok(assert_gain_at_least(
        "whale stablecoin balance",
        before,
        after,
        amounts.min_token_gain,
    )?)
}
