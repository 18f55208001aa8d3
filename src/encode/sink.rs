use std::path::{Path, PathBuf};

use crate::foundation::error::{PadError, PadResult};

/// Default artifact file name, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "output.jpg";

/// Destination for the compressed stream of each iteration.
///
/// Each call replaces the previous artifact; iterations are not versioned.
pub trait ArtifactSink {
    /// Persist `bytes`, replacing any earlier artifact.
    fn write_artifact(&mut self, bytes: &[u8]) -> PadResult<()>;
}

/// Writes the artifact to a file, overwriting it every iteration.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    /// Sink writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileSink {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT)
    }
}

impl ArtifactSink for FileSink {
    fn write_artifact(&mut self, bytes: &[u8]) -> PadResult<()> {
        ensure_parent_dir(&self.path)?;
        std::fs::write(&self.path, bytes)
            .map_err(|e| PadError::io(format!("write artifact '{}'", self.path.display()), e))
    }
}

/// Keeps the latest artifact in memory. For tests and dry runs.
#[derive(Debug, Default)]
pub struct InMemorySink {
    last: Option<Vec<u8>>,
    writes: usize,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent artifact, if any.
    pub fn last(&self) -> Option<&[u8]> {
        self.last.as_deref()
    }

    /// Number of artifacts written so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl ArtifactSink for InMemorySink {
    fn write_artifact(&mut self, bytes: &[u8]) -> PadResult<()> {
        self.last = Some(bytes.to_vec());
        self.writes += 1;
        Ok(())
    }
}

/// Create the parent directory of `path` if it has one.
pub fn ensure_parent_dir(path: &Path) -> PadResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            PadError::io(
                format!("create output directory '{}'", parent.display()),
                e,
            )
        })?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
