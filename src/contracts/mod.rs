//! Bindings for the external contracts the harness talks to.
//!
//! # Contracts
//! - `erc20`: the stablecoin and any other token reported by `balances`
//! - `uniswap`: Uniswap V1 factory + exchange, used to buy the stablecoin
//! - `artifact`: address of the contract under test from its build artifact

pub mod artifact;
pub mod erc20;
pub mod uniswap;

pub use erc20::Erc20Token;
pub use uniswap::{EthSwap, UniswapV1};
