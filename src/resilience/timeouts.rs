//! Timeout enforcement.

use std::future::Future;
use std::time::Duration;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Run an RPC future under a deadline, flattening transport errors into
/// [`BlockchainError::Rpc`] and elapsed deadlines into [`BlockchainError::Timeout`].
pub async fn with_timeout<T, E, F>(duration: Duration, fut: F) -> BlockchainResult<T>
where
    F: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    match tokio::time::timeout(duration, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(BlockchainError::Rpc(e.to_string())),
        Err(_) => Err(BlockchainError::Timeout(duration.as_secs())),
    }
}
