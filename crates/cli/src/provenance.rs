use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{json, Value};
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What produced a report: the subcommand, its settings and the files it read.
pub struct Payload {
    pub command: &'static str,
    pub params: Value,
    pub inputs: Vec<PathBuf>,
}

impl Payload {
    pub fn new(command: &'static str, params: Value) -> Self {
        Self {
            command,
            params,
            inputs: Vec::new(),
        }
    }

    pub fn with_inputs<P: AsRef<Path>>(mut self, inputs: impl IntoIterator<Item = P>) -> Self {
        self.inputs
            .extend(inputs.into_iter().map(|p| p.as_ref().to_path_buf()));
        self
    }
}

/// One file a report was computed from.
#[derive(Debug, Serialize)]
struct InputRecord {
    path: String,
    bytes: usize,
    /// FNV-1a 64 of the content, hex. Missing files have none.
    fnv1a64: Option<String>,
}

impl InputRecord {
    fn read(path: &Path) -> Self {
        let content = fs::read(path).ok();
        Self {
            path: path.to_string_lossy().into_owned(),
            bytes: content.as_ref().map_or(0, Vec::len),
            fnv1a64: content.map(|c| format!("{:016x}", fnv1a64(&c))),
        }
    }
}

fn fnv1a64(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf2_9ce4_8422_2325, |h, &b| {
        (h ^ u64::from(b)).wrapping_mul(0x0000_0100_0000_01b3)
    })
}

/// Write `<report>.provenance.json` next to a report: code revision, library version,
/// callsite, params, fingerprinted inputs and outputs.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(report: P, payload: Payload) -> Result<PathBuf> {
    let report = report.as_ref();
    let sidecar = report.with_extension("provenance.json");
    let callsite = Location::caller();
    let inputs: Vec<InputRecord> = payload.inputs.iter().map(|p| InputRecord::read(p)).collect();
    let doc = json!({
        "code_rev": code_rev(),
        "sketchgrade": sketchgrade::VERSION,
        "command": payload.command,
        "callsite": format!("{}:{}", callsite.file(), callsite.line()),
        "params": payload.params,
        "inputs": inputs,
        "outputs": [report.to_string_lossy()]
    });
    fs::write(&sidecar, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", sidecar.display()))?;
    Ok(sidecar)
}

/// `GIT_COMMIT` from the build or the environment, else `git rev-parse HEAD`.
pub fn code_rev() -> String {
    option_env!("GIT_COMMIT")
        .map(str::to_string)
        .into_iter()
        .chain(std::env::var("GIT_COMMIT").ok())
        .find(|rev| !rev.is_empty())
        .or_else(git_head)
        .unwrap_or_else(|| "unknown".to_string())
}

fn git_head() -> Option<String> {
    let out = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
    if !out.status.success() {
        return None;
    }
    String::from_utf8(out.stdout).ok().map(|s| s.trim().to_string())
}
