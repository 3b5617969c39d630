use crate::error::InstallError;
use crate::model::{InterfaceFile, InterfaceReport, BOOTSTRAP_STAGE_ID};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Global variables file produced by the bootstrap stage.
pub const GLOBALS_TFVARS: &str = "00-globals.auto.tfvars.json";

/// Build the expected interface file list for a stage and check each file's
/// presence in `stage_dir`. Read-only: nothing beyond existence probes.
pub fn check_interface_files(
    stage_id: &str,
    required_stages: &[String],
    stage_dir: &Path,
) -> InterfaceReport {
    let mut names = vec![format!("{stage_id}-providers.tf")];
    if stage_id != BOOTSTRAP_STAGE_ID {
        names.push(GLOBALS_TFVARS.to_string());
    }
    names.extend(
        required_stages
            .iter()
            .map(|s| format!("{s}.auto.tfvars.json")),
    );

    let files = names
        .into_iter()
        .map(|name| {
            let present = stage_dir.join(&name).exists();
            InterfaceFile { name, present }
        })
        .collect();
    InterfaceReport { files }
}

/// Locate a sibling stage directory by id, starting from the current stage's
/// directory. `None` means the sibling does not exist on disk, which callers
/// treat as a fallback signal rather than a failure.
///
/// Stages normally live side by side under one root (`root/00-bootstrap`,
/// `root/02-example`). When the current directory is an environment
/// subdirectory (its name lacks the `NN-` prefix, e.g. `root/03-x/prod`) we
/// walk up one extra level to reach the root. Environment-qualified sibling
/// ids such as `03-networking-prod` map to `root/03-networking/prod`.
pub fn resolve_sibling(stage_dir: &Path, sibling_id: &str) -> Option<PathBuf> {
    let name = stage_dir.file_name()?.to_str()?;
    let mut parent = stage_dir.parent()?;
    if !has_stage_prefix(name) {
        parent = parent.parent()?;
    }

    let candidate = parent.join(sibling_id);
    debug!(candidate = %candidate.display(), "probing sibling stage path");
    if candidate.is_dir() {
        return Some(candidate);
    }

    if let Some((base, environment)) = split_environment(sibling_id) {
        let candidate = parent.join(base).join(environment);
        debug!(candidate = %candidate.display(), "probing environment-qualified sibling path");
        if candidate.is_dir() {
            return Some(candidate);
        }
    }

    None
}

/// True for directory names carrying the conventional `NN-` stage prefix.
fn has_stage_prefix(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(a), Some(b), Some('-')) if a.is_ascii_digit() && b.is_ascii_digit()
    )
}

/// Split an environment-qualified stage id on its last hyphen. The base must
/// itself be a full `NN-name` stage id, so `00-bootstrap` is not split.
fn split_environment(id: &str) -> Option<(&str, &str)> {
    let (base, environment) = id.rsplit_once('-')?;
    if has_stage_prefix(base) && !environment.is_empty() {
        Some((base, environment))
    } else {
        None
    }
}

/// Read and parse a JSON tfvars file. Kept for the file-materialization step
/// that will consume fetched bootstrap outputs.
#[allow(dead_code)]
pub fn parse_tfvars(path: &Path) -> Result<serde_json::Value, InstallError> {
    let content = fs::read_to_string(path).map_err(|source| InstallError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|e| InstallError::FileParse {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}
