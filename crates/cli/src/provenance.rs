use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::ffi::OsString;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Sidecar written next to every artifact the CLI produces.
#[derive(Debug, Serialize)]
pub struct Provenance {
    pub code_rev: String,
    pub lib_version: &'static str,
    pub command: &'static str,
    pub callsite: Callsite,
    pub params: Value,
    pub outputs: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct Callsite {
    pub file: &'static str,
    pub line: u32,
}

impl Provenance {
    #[track_caller]
    pub fn new(command: &'static str, params: Value) -> Self {
        let loc = Location::caller();
        Self {
            code_rev: current_git_rev(),
            lib_version: triangulator::VERSION,
            command,
            callsite: Callsite {
                file: loc.file(),
                line: loc.line(),
            },
            params,
            outputs: Vec::new(),
        }
    }
}

/// Write `<artifact stem>.provenance.json` next to `artifact` and return its path.
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, mut prov: Provenance) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let path = provenance_path(artifact);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating provenance dir {}", parent.display()))?;
        }
    }
    prov.outputs.push(artifact.to_string_lossy().into_owned());
    fs::write(&path, serde_json::to_vec_pretty(&prov)?)
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(path = %path.display(), "provenance");
    Ok(path)
}

fn provenance_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("artifact"));
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

/// Commit from `GIT_COMMIT` (build or run time), else `git rev-parse HEAD`, else "unknown".
pub fn current_git_rev() -> String {
    option_env!("GIT_COMMIT")
        .map(str::to_string)
        .filter(|s| !s.is_empty())
        .or_else(|| std::env::var("GIT_COMMIT").ok().filter(|s| !s.is_empty()))
        .or_else(|| {
            let out = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
            out.status
                .success()
                .then(|| String::from_utf8(out.stdout).ok())
                .flatten()
                .map(|s| s.trim().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}
