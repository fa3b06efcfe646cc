//! Layout engines backed by external programs or precomputed output.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Error, Result};
use crate::model::LayoutAnalysis;

use super::LayoutEngine;

/// Runs an external layout analysis program.
///
/// The PDF path is appended as the last argument; the program must print
/// layout JSON (see [`LayoutAnalysis::from_json`]) on stdout.
#[derive(Debug, Clone)]
pub struct CommandLayoutEngine {
    program: PathBuf,
    args: Vec<OsString>,
}

impl CommandLayoutEngine {
    /// Create an engine running `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Build from a whitespace-separated command line, e.g. "python -m layout_dump".
    pub fn from_command_line(command: &str) -> Result<Self> {
        let mut parts = command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| Error::LayoutEngine("empty layout command".into()))?;
        Ok(parts.fold(Self::new(program), |engine, arg| engine.with_arg(arg)))
    }

    /// Append a fixed argument placed before the PDF path.
    pub fn with_arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl LayoutEngine for CommandLayoutEngine {
    fn name(&self) -> &str {
        self.program.to_str().unwrap_or("layout-command")
    }

    fn analyze(&mut self, path: &Path) -> Result<LayoutAnalysis> {
        log::info!("Running layout engine {} on {}", self.program.display(), path.display());

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => Error::LayoutEngine(format!(
                    "layout program not found: {}",
                    self.program.display()
                )),
                _ => Error::Io(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::LayoutEngine(format!(
                "{} failed ({}): {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }

        LayoutAnalysis::from_json(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Replays a precomputed analysis for every document.
#[derive(Debug, Clone, Default)]
pub struct StaticLayoutEngine {
    analysis: LayoutAnalysis,
}

impl StaticLayoutEngine {
    /// Wrap an analysis.
    pub fn new(analysis: LayoutAnalysis) -> Self {
        Self { analysis }
    }

    /// Load layout JSON from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(Self::new(LayoutAnalysis::from_json(&json)?))
    }
}

impl LayoutEngine for StaticLayoutEngine {
    fn name(&self) -> &str {
        "static"
    }

    fn analyze(&mut self, _path: &Path) -> Result<LayoutAnalysis> {
        Ok(self.analysis.clone())
    }
}
