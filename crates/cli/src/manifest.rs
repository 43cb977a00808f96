//! Manifest and arrangement files.

use loadplan_core::Error;
use loadplan_d3::{Arrangement, Cargo, Container};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Cargo to load and, optionally, the container to load it into.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Defaults to the reference truck bed when absent.
    #[serde(default)]
    pub container: Option<Container>,
    pub cargo: Vec<Cargo>,
}

impl Manifest {
    /// Parses a manifest from JSON text.
    pub fn from_json(text: &str) -> Result<Self, Error> {
        serde_json::from_str(text).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Reads a manifest file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&text)?)
    }

    /// The container to plan for.
    pub fn container(&self) -> Container {
        self.container.unwrap_or_default()
    }
}

/// Reads a saved arrangement.
pub fn load_arrangement(path: &Path) -> anyhow::Result<Arrangement> {
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|e| Error::Serialization(e.to_string()).into())
}

/// Writes an arrangement as pretty JSON.
pub fn save_arrangement(arrangement: &Arrangement, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(arrangement)
        .map_err(|e| Error::Serialization(e.to_string()))?;
    std::fs::write(path, json)?;
    Ok(())
}
