//! Native currency top-up of the whale.

use crate::assertions::{assert_exact_delta, Observation};
use crate::error::HarnessResult;
use crate::harness::Harness;
use crate::units::{format_amount, ETHER_DECIMALS};

/// Send the gas top-up from the deployer to the whale.
///
/// The whale pays no gas here, so its balance must grow by exactly the top-up.
pub async fn send_ether(harness: &Harness) -> HarnessResult<Observation> {
    let client = harness.client();
    let whale = harness.whale();
    let top_up = harness.amounts().gas_top_up;

    let before = client.get_balance(whale).await?;
    let receipt = client.send_value(harness.deployer(), whale, top_up).await?;
    let after = client.get_balance(whale).await?;

    tracing::debug!(
        tx_hash = %receipt.transaction_hash,
        before = %format_amount(before, ETHER_DECIMALS),
        after = %format_amount(after, ETHER_DECIMALS),
        "Top-up confirmed"
    );

    Ok(assert_exact_delta("whale native balance", before, after, top_up)?)
}
