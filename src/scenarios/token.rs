//! Stablecoin transfer and approval against the contract under test.

use crate::assertions::{assert_at_least, Observation};
use crate::error::HarnessResult;
use crate::harness::Harness;

/// Transfer the stablecoin from the whale to the target and check the target's balance.
pub async fn transfer_token(harness: &Harness) -> HarnessResult<Observation> {
    let stablecoin = harness.stablecoin();
    let whale = harness.whale();
    let target = harness.target();
    let amount = harness.amounts().token_amount;

    let whale_balance = stablecoin.balance_of(whale).await?;
    tracing::debug!(whale_balance = %stablecoin.format(whale_balance), "Whale stablecoin before transfer");

    stablecoin
        .transfer(whale, target, amount, harness.config().scenarios.token_gas_limit)
        .await?;

    let target_balance = stablecoin.balance_of(target).await?;
    Ok(assert_at_least("target stablecoin balance", target_balance, amount)?)
}

/// Approve the target for the stablecoin from the deployer and check the allowance.
pub async fn approve_token(harness: &Harness) -> HarnessResult<Observation> {
    let stablecoin = harness.stablecoin();
    let owner = harness.deployer();
    let target = harness.target();
    let amount = harness.amounts().token_amount;

    stablecoin
        .approve(owner, target, amount, harness.config().scenarios.token_gas_limit)
        .await?;

    let allowance = stablecoin.allowance(owner, target).await?;
    Ok(assert_at_least("target allowance", allowance, amount)?)
}
