//! @ai:module:intent TOML probe loader
//! @ai:module:layer infrastructure
//! @ai:module:public_api ProbeLoader
//! @ai:module:stateless true

use crate::probe::probe::{Probe, ProbeFile};
use anyhow::{Context, Result};
use std::path::Path;
use walkdir::WalkDir;

/// @ai:intent Trait for loading probe definitions
pub trait ProbeLoaderTrait: Send + Sync {
    /// @ai:intent Load all probes from a directory
    fn load_all(&self, probes_dir: &Path) -> Result<Vec<Probe>>;

    /// @ai:intent Load a single probe by ID
    fn load_by_id(&self, probes_dir: &Path, probe_id: &str) -> Result<Option<Probe>>;
}

/// @ai:intent Loads probe definitions from TOML files
/// @ai:effects pure (stateless)
pub struct ProbeLoader;

impl ProbeLoader {
    /// @ai:intent Create a new probe loader
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Parse a single probe file
    /// @ai:pre path points to a valid TOML file
    /// @ai:effects fs:read
    fn parse_probe_file(path: &Path) -> Result<Probe> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read probe file: {}", path.display()))?;

        let probe_file: ProbeFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse probe file: {}", path.display()))?;

        let probe: Probe = probe_file.into();
        probe.validate()?;

        Ok(probe)
    }

    /// @ai:intent Find all TOML files in directory
    /// @ai:effects fs:read
    fn find_probe_files(probes_dir: &Path) -> Vec<std::path::PathBuf> {
        WalkDir::new(probes_dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "toml")
                    .unwrap_or(false)
            })
            .map(|e| e.path().to_path_buf())
            .collect()
    }
}

impl Default for ProbeLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ProbeLoaderTrait for ProbeLoader {
    /// @ai:intent Load all probes from directory
    /// @ai:effects fs:read
    fn load_all(&self, probes_dir: &Path) -> Result<Vec<Probe>> {
        let files = Self::find_probe_files(probes_dir);
        let mut probes = Vec::with_capacity(files.len());

        for path in files {
            match Self::parse_probe_file(&path) {
                Ok(probe) => probes.push(probe),
                Err(e) => {
                    tracing::warn!("Skipping invalid probe file {}: {}", path.display(), e);
                }
            }
        }

        probes.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(probes)
    }

    /// @ai:intent Load a single probe by ID
    /// @ai:effects fs:read
    fn load_by_id(&self, probes_dir: &Path, probe_id: &str) -> Result<Option<Probe>> {
        let all_probes = self.load_all(probes_dir)?;
        Ok(all_probes.into_iter().find(|p| p.id == probe_id))
    }
}
