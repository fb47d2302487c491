use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json as json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::{NetError, Result};
use crate::network::Network;

pub const SCHEMA: u32 = 1;

/// On-disk envelope around a network.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredNetwork {
    schema: u32,
    #[serde(default)]
    saved_at: Option<String>,
    network: Network,
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `network` as JSON through a sibling `.tmp` file and a rename.
pub fn save_network(network: &Network, path: &Path) -> Result<()> {
    // JSON has no NaN or inf; such a file would never load back
    network.validate()?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let stored = StoredNetwork {
        schema: SCHEMA,
        saved_at: Some(Utc::now().to_rfc3339()),
        network: network.clone(),
    };
    let tmp = tmp_path(path);
    fs::write(&tmp, json::to_vec_pretty(&stored)?)?;
    fs::rename(&tmp, path)?;
    debug!(path = %path.display(), sizes = ?network.layer_sizes(), "network saved");
    Ok(())
}

/// Read a network written by `save_network` and check that its layers chain.
pub fn load_network(path: &Path) -> Result<Network> {
    let bytes = fs::read(path)?;
    let stored: StoredNetwork = json::from_slice(&bytes)?;
    if stored.schema != SCHEMA {
        return Err(NetError::InvalidNetwork(format!(
            "schema {} (this build reads {SCHEMA})",
            stored.schema
        )));
    }
    stored.network.validate()?;
    debug!(path = %path.display(), sizes = ?stored.network.layer_sizes(), "network loaded");
    Ok(stored.network)
}
