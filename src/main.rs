//! curve-harness
//!
//! Runs the CurveProtocol integration suite against an Ethereum node.
//!
//! # Architecture Overview
//!
//! ```text
//!   harness.toml ──▶ config ──▶ Harness::connect ──▶ ScenarioRunner
//!                                   │                     │
//!                                   ▼                     ▼
//!                            blockchain client     fund-whale, then
//!                            (timeouts, failover,  send-ether / transfer-token /
//!                             impersonation)       approve-token, each asserted
//!                                   │
//!                                   ▼
//!                            RPC node (mainnet fork)
//! ```

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use curve_harness::config::{loader, HarnessConfig};
use curve_harness::observability::init_logging;
use curve_harness::{Harness, ScenarioRunner};

/// Config file picked up from the working directory when `--config` is not given.
const DEFAULT_CONFIG_PATH: &str = "harness.toml";

#[derive(Parser)]
#[command(name = "curve-harness")]
#[command(about = "Integration suite for the CurveProtocol contract", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scenario suite
    Run {
        /// Run only the named scenario (repeatable)
        #[arg(long)]
        only: Vec<String>,

        /// Keep going after a failing scenario
        #[arg(long)]
        no_fail_fast: bool,

        /// Skip buying the stablecoin before each scenario
        #[arg(long)]
        no_funding: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show native and token balances of an account (defaults to the target)
    Balances {
        #[arg(short, long)]
        account: Option<String>,
    },
    /// Verify the chain id and that every configured contract has code
    Check,
}

fn load(path: Option<&Path>) -> Result<HarnessConfig, loader::ConfigError> {
    match path {
        Some(path) => loader::load_config(path),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            loader::load_config(Path::new(DEFAULT_CONFIG_PATH))
        }
        None => loader::default_config(),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut config = load(cli.config.as_deref())?;

    init_logging(&config.observability);
    tracing::info!("curve-harness v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Run {
            only,
            no_fail_fast,
            no_funding,
            json,
        } => {
            if !only.is_empty() {
                config.scenarios.only = only;
            }
            if no_fail_fast {
                config.scenarios.fail_fast = false;
            }
            if no_funding {
                config.funding.enabled = false;
            }

            let runner = ScenarioRunner::from_config(&config)?;
            let harness = Harness::connect(config).await?;
            let report = runner.run(&harness).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report.render());
            }

            if report.is_success() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Commands::Balances { account } => {
            let harness = Harness::connect(config).await?;
            let account = match account {
                Some(account) => account.parse()?,
                None => harness.target(),
            };

            println!("{}", account);
            for line in harness.balances(account).await? {
                println!("  {:<16} {}", line.asset, line.formatted);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check => {
            let harness = Harness::connect(config).await?;
            harness.client().verify_chain_id().await?;
            let block = harness.client().get_block_number().await?;
            println!("chain id {} at block {}", harness.client().config().chain_id, block);
            println!("deployer {}", harness.deployer());
            println!("whale    {}", harness.whale());

            let mut missing = 0;
            for check in harness.check_contracts().await? {
                let mark = if check.has_code { "ok" } else { "NO CODE" };
                if !check.has_code {
                    missing += 1;
                }
                println!("  {:<8} {:<18} {}", mark, check.name, check.address);
            }

            if missing == 0 {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
