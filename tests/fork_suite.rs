//! Full suite against a live mainnet fork.
//!
//! Start a fork with the whale unlocked, deploy the contract under test, then:
//!
//! ```text
//! anvil --fork-url $MAINNET_RPC --auto-impersonate
//! CURVE_HARNESS_RPC_URL=http://localhost:8545 CURVE_HARNESS_TARGET=0x... \
//!     cargo test --test fork_suite -- --ignored
//! ```

use curve_harness::config::{loader, ImpersonationMode};
use curve_harness::scenarios::ScenarioStatus;
use curve_harness::{Harness, ScenarioRunner};

#[tokio::test]
#[ignore = "Requires a mainnet fork at CURVE_HARNESS_RPC_URL"]
async fn test_full_suite_on_fork() {
    if std::env::var(loader::RPC_URL_ENV_VAR).is_err() {
        eprintln!("Skipping test: {} not set", loader::RPC_URL_ENV_VAR);
        return;
    }

    let mut config = loader::default_config().expect("default config should validate");
    config.accounts.impersonation = ImpersonationMode::Anvil;

    let runner = ScenarioRunner::from_config(&config).unwrap();
    let harness = Harness::connect(config).await.expect("Failed to connect to fork");
    let report = runner.run(&harness).await;

    for outcome in &report.outcomes {
        assert_eq!(
            outcome.status,
            ScenarioStatus::Passed,
            "{} failed: {:?}",
            outcome.name,
            outcome.error
        );
    }
}

#[tokio::test]
#[ignore = "Requires a mainnet fork at CURVE_HARNESS_RPC_URL"]
async fn test_configured_contracts_have_code() {
    if std::env::var(loader::RPC_URL_ENV_VAR).is_err() {
        eprintln!("Skipping test: {} not set", loader::RPC_URL_ENV_VAR);
        return;
    }

    let config = loader::default_config().expect("default config should validate");
    let harness = Harness::connect(config).await.expect("Failed to connect to fork");

    for check in harness.check_contracts().await.unwrap() {
        assert!(check.has_code, "no code for {} at {}", check.name, check.address);
    }
}
