use crate::error::InstallError;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// External provisioning tool queried for stage outputs.
pub const TOOL: &str = "terraform";

/// How external tool failures are surfaced to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolMode {
    /// Missing executable or non-zero exit aborts the run.
    Strict,
    /// Failures collapse into `None` so the caller can fall back.
    Tolerant,
}

/// Run an external command with an explicit argument list, capturing output.
/// stdout is the result, stderr the error detail on non-zero exit.
pub fn run_tool(program: &str, args: &[&str], cwd: &Path) -> Result<String, InstallError> {
    debug!(program, ?args, cwd = %cwd.display(), "running external tool");
    let output = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .output()
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => InstallError::ToolMissing(program.to_string()),
            _ => InstallError::ToolFailed {
                program: program.to_string(),
                stderr: e.to_string(),
            },
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(InstallError::ToolFailed {
            program: program.to_string(),
            stderr,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Fetch a stage's output values as JSON by running `terraform output -json`
/// in its directory. In tolerant mode any tool failure yields `Ok(None)`.
pub fn stage_outputs(
    stage_dir: &Path,
    mode: ToolMode,
) -> Result<Option<serde_json::Value>, InstallError> {
    let stdout = match run_tool(TOOL, &["output", "-json"], stage_dir) {
        Ok(stdout) => stdout,
        Err(e) if mode == ToolMode::Tolerant => {
            debug!(error = %e, "tolerated external tool failure");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    match serde_json::from_str(&stdout) {
        Ok(value) => Ok(Some(value)),
        Err(_) if mode == ToolMode::Tolerant => Ok(None),
        Err(e) => Err(InstallError::ToolFailed {
            program: TOOL.to_string(),
            stderr: format!("unparseable output: {e}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_executable_is_tool_missing() {
        let dir = TempDir::new().unwrap();
        let err = run_tool("definitely-not-a-real-binary", &["output"], dir.path()).unwrap_err();
        assert!(matches!(err, InstallError::ToolMissing(_)));
    }

    #[test]
    fn nonzero_exit_carries_stderr() {
        let dir = TempDir::new().unwrap();
        let err = run_tool("sh", &["-c", "echo boom >&2; exit 3"], dir.path()).unwrap_err();
        match err {
            InstallError::ToolFailed { program, stderr } => {
                assert_eq!(program, "sh");
                assert_eq!(stderr, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn captures_stdout_on_success() {
        let dir = TempDir::new().unwrap();
        let out = run_tool("sh", &["-c", "echo hello"], dir.path()).unwrap();
        assert_eq!(out, "hello");
    }

    #[test]
    fn runs_in_requested_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("marker"), "").unwrap();
        let out = run_tool("sh", &["-c", "ls"], dir.path()).unwrap();
        assert_eq!(out, "marker");
    }

    // Tests mutating PATH must not interleave.
    static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    // Shadow the real tool with a stub on PATH so stage_outputs is testable
    // without terraform installed.
    fn with_stub_tool(script: &str, f: impl FnOnce(&Path)) {
        let _guard = ENV_LOCK.lock().unwrap();
        let bin = TempDir::new().unwrap();
        let stub = bin.path().join(TOOL);
        fs::write(&stub, format!("#!/bin/sh\n{script}\n")).unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&stub, fs::Permissions::from_mode(0o755)).unwrap();
        }
        let old_path = std::env::var_os("PATH").unwrap_or_default();
        let new_path = format!("{}:{}", bin.path().display(), old_path.to_string_lossy());
        std::env::set_var("PATH", &new_path);
        f(bin.path());
        std::env::set_var("PATH", old_path);
    }

    #[test]
    fn stage_outputs_parses_json() {
        let dir = TempDir::new().unwrap();
        with_stub_tool(r#"echo '{"project_id": {"value": "fast-prod-0"}}'"#, |_| {
            let value = stage_outputs(dir.path(), ToolMode::Strict).unwrap().unwrap();
            assert_eq!(value["project_id"]["value"], "fast-prod-0");
        });
    }

    #[test]
    fn tolerant_mode_swallows_failures() {
        let dir = TempDir::new().unwrap();
        with_stub_tool("echo nope >&2; exit 1", |_| {
            assert!(stage_outputs(dir.path(), ToolMode::Tolerant)
                .unwrap()
                .is_none());
            assert!(matches!(
                stage_outputs(dir.path(), ToolMode::Strict).unwrap_err(),
                InstallError::ToolFailed { .. }
            ));
        });
    }
}
