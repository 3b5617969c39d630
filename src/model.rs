use crate::error::InstallError;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Per-stage configuration file name.
pub const CONFIG_FILE: &str = ".fast-install.yaml";

/// Identifier of the foundational stage whose outputs seed the others.
pub const BOOTSTRAP_STAGE_ID: &str = "00-bootstrap";

#[derive(Debug, Deserialize)]
pub struct StageFile {
    pub stage: StageConfig,
}

/// Stage identity and its upstream requirements, as declared in
/// `.fast-install.yaml` under the `stage` key.
#[derive(Debug, Deserialize)]
pub struct StageConfig {
    pub id: String,
    pub name: String,
    pub description: String,

    #[serde(default)]
    pub requires: Vec<String>,
}

impl StageConfig {
    pub fn validate(&self) -> Result<(), InstallError> {
        if self.id.trim().is_empty() {
            return Err(InstallError::ConfigIncomplete("id"));
        }
        if self.name.trim().is_empty() {
            return Err(InstallError::ConfigIncomplete("name"));
        }
        if self.description.trim().is_empty() {
            return Err(InstallError::ConfigIncomplete("description"));
        }
        Ok(())
    }

    pub fn is_bootstrap(&self) -> bool {
        self.id == BOOTSTRAP_STAGE_ID
    }
}

/// Read and parse stage attributes from the YAML file in `stage_dir`.
pub fn load_stage_config(stage_dir: &Path) -> Result<StageConfig, InstallError> {
    let path = stage_dir.join(CONFIG_FILE);
    if !path.exists() {
        return Err(InstallError::ConfigMissing);
    }
    debug!(path = %path.display(), "reading stage configuration");

    let content = fs::read_to_string(&path).map_err(|source| InstallError::FileRead {
        path: path.clone(),
        source,
    })?;

    let file: StageFile = serde_yaml::from_str(&content)
        .map_err(|e| InstallError::ConfigMalformed(e.to_string()))?;

    file.stage.validate()?;
    Ok(file.stage)
}

/// One expected interface file and whether it was found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceFile {
    pub name: String,
    pub present: bool,
}

/// Presence report for a stage's interface files, in construction order:
/// provider file, globals file, then one variables file per required stage.
#[derive(Debug, Default)]
pub struct InterfaceReport {
    pub files: Vec<InterfaceFile>,
}

impl InterfaceReport {
    pub fn all_present(&self) -> bool {
        self.files.iter().all(|f| f.present)
    }

    pub fn missing(&self) -> Vec<&str> {
        self.files
            .iter()
            .filter(|f| !f.present)
            .map(|f| f.name.as_str())
            .collect()
    }
}
