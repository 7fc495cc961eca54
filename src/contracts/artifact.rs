//! Locating the contract under test from a Truffle build artifact.
//!
//! Truffle writes `build/contracts/<Name>.json` with a `networks` map keyed
//! by network id; the deployed address lives at `networks.<id>.address`.

use alloy::primitives::Address;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("cannot read artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed artifact {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{contract} has no deployment for network {network} (deployed on: {available:?})")]
    NotDeployed {
        contract: String,
        network: u64,
        available: Vec<String>,
    },

    #[error("invalid deployed address '{0}'")]
    InvalidAddress(String),
}

#[derive(Debug, Deserialize)]
struct TruffleArtifact {
    #[serde(rename = "contractName", default)]
    contract_name: String,
    #[serde(default)]
    networks: BTreeMap<String, Deployment>,
}

#[derive(Debug, Deserialize)]
struct Deployment {
    address: String,
}

/// Read the deployed address for `network` from an artifact file.
pub fn deployed_address(path: &Path, network: u64) -> Result<Address, ArtifactError> {
    let content = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_deployed_address(&content, network).map_err(|e| match e {
        ArtifactError::Json { source, .. } => ArtifactError::Json {
            path: path.display().to_string(),
            source,
        },
        other => other,
    })
}

/// Resolve the deployed address from artifact JSON.
///
/// A fork started by Ganache often reports a random network id, so when the
/// requested network is missing and the artifact holds exactly one
/// deployment, that deployment is used.
pub fn parse_deployed_address(json: &str, network: u64) -> Result<Address, ArtifactError> {
    let artifact: TruffleArtifact = serde_json::from_str(json).map_err(|source| ArtifactError::Json {
        path: String::new(),
        source,
    })?;

    let deployment = match artifact.networks.get(&network.to_string()) {
        Some(d) => d,
        None if artifact.networks.len() == 1 => {
            let (id, d) = artifact.networks.iter().next().ok_or_else(|| not_deployed(&artifact, network))?;
            tracing::warn!(
                contract = %artifact.contract_name,
                requested = network,
                using = %id,
                "Artifact has no deployment for this network, using its only deployment"
            );
            d
        }
        None => return Err(not_deployed(&artifact, network)),
    };

    deployment
        .address
        .parse()
        .map_err(|_| ArtifactError::InvalidAddress(deployment.address.clone()))
}

fn not_deployed(artifact: &TruffleArtifact, network: u64) -> ArtifactError {
    ArtifactError::NotDeployed {
        contract: artifact.contract_name.clone(),
        network,
        available: artifact.networks.keys().cloned().collect(),
    }
}
