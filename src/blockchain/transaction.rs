//! Transaction submission and confirmation monitoring.
//!
//! # Responsibilities
//! - Build native-currency transfers
//! - Submit transactions through the provider that can sign for the sender
//! - Poll for the receipt with backoff until confirmed or timed out
//! - Turn reverted receipts into errors

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{PendingTransactionBuilder, Provider};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use std::time::Duration;
use tokio::time::{sleep, timeout};

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::resilience::{with_timeout, PollBackoff};

/// Build a plain value transfer. Gas, nonce and fees are filled by the provider.
pub fn value_transfer(from: Address, to: Address, value: U256) -> TransactionRequest {
    TransactionRequest::default()
        .with_from(from)
        .with_to(to)
        .with_value(value)
}

impl BlockchainClient {
    /// Submit a transaction request and return its hash.
    pub async fn send_transaction(&self, tx: TransactionRequest) -> BlockchainResult<TxHash> {
        let from = tx.from.ok_or_else(|| {
            BlockchainError::Rpc("transaction request has no sender".to_string())
        })?;
        let provider = self.provider_for(from);
        let pending = with_timeout(self.timeout(), provider.send_transaction(tx)).await?;
        Ok(track_pending(&pending))
    }

    /// Send native currency and wait for the transfer to confirm.
    pub async fn send_value(
        &self,
        from: Address,
        to: Address,
        value: U256,
    ) -> BlockchainResult<TransactionReceipt> {
        let tx_hash = self.send_transaction(value_transfer(from, to, value)).await?;
        self.wait_for_confirmation(tx_hash).await
    }

    /// Wait for a transaction to be mined, succeed, and reach the configured depth.
    pub async fn wait_for_confirmation(&self, tx_hash: TxHash) -> BlockchainResult<TransactionReceipt> {
        let config = self.config();
        let required_confirmations = config.confirmation_blocks as u64;
        let timeout_secs = config.receipt_timeout_secs;
        let mut backoff = PollBackoff::new(config.poll_base_ms, config.poll_max_ms);

        let result = timeout(Duration::from_secs(timeout_secs), async {
            loop {
                sleep(backoff.next_delay()).await;

                let receipt = match self.get_transaction_receipt(tx_hash).await? {
                    Some(r) => r,
                    None => {
                        tracing::debug!(tx_hash = %tx_hash, polls = backoff.attempts(), "Transaction pending");
                        continue;
                    }
                };

                if !receipt.status() {
                    return Err(BlockchainError::Reverted(format!(
                        "{} (gas used {})",
                        tx_hash, receipt.gas_used
                    )));
                }

                if required_confirmations == 0 {
                    return Ok(receipt);
                }

                let current_block = self.get_block_number().await?;
                let tx_block = receipt.block_number.unwrap_or(current_block);
                let confirmations = current_block.saturating_sub(tx_block);

                if confirmations >= required_confirmations {
                    return Ok(receipt);
                }

                tracing::debug!(
                    tx_hash = %tx_hash,
                    confirmations = confirmations,
                    required = required_confirmations,
                    "Waiting for confirmations"
                );
            }
        })
        .await;

        match result {
            Ok(receipt) => {
                let receipt = receipt?;
                tracing::debug!(
                    tx_hash = %tx_hash,
                    block_number = receipt.block_number,
                    gas_used = receipt.gas_used,
                    "Transaction confirmed"
                );
                Ok(receipt)
            }
            Err(_) => Err(BlockchainError::ConfirmationTimeout(timeout_secs)),
        }
    }
}

/// Log a freshly submitted transaction and hand back its hash.
pub fn track_pending(pending: &PendingTransactionBuilder<alloy::network::Ethereum>) -> TxHash {
    let tx_hash = *pending.tx_hash();
    tracing::debug!(tx_hash = %tx_hash, "Transaction submitted");
    tx_hash
}
