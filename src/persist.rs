//! Writing a batch of artifacts with all-or-nothing semantics.
//!
//! [`write_all`] writes artifacts one by one; if a write fails, every file already written in the
//! same call is removed again before the error is returned.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::generator::GeneratedArtifact;
use crate::loader::below_root;

/// Where artifacts go.
pub trait ArtifactSink {
    /// Store `artifact`, returning the location written.
    fn write(&mut self, artifact: &GeneratedArtifact) -> io::Result<PathBuf>;
    /// Undo a write made earlier in the batch.
    fn remove(&mut self, location: &Path) -> io::Result<()>;
}

/// Writes under a root directory, normally the directory holding `km.toml`.
#[derive(Debug, Clone)]
pub struct FsSink {
    root: PathBuf,
}

impl FsSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Artifact paths are always placed below the root, even when configured as absolute.
    pub fn location(&self, artifact: &GeneratedArtifact) -> PathBuf {
        below_root(&self.root, &artifact.path)
    }
}

impl ArtifactSink for FsSink {
    fn write(&mut self, artifact: &GeneratedArtifact) -> io::Result<PathBuf> {
        let location = self.location(artifact);
        fs::write(&location, &artifact.content)?;
        Ok(location)
    }

    fn remove(&mut self, location: &Path) -> io::Result<()> {
        fs::remove_file(location)
    }
}

#[derive(Debug, Error)]
#[error("cannot write '{path}': {source}")]
pub struct PersistenceError {
    pub path: String,
    #[source]
    pub source: io::Error,
    /// Files removed again because of this failure.
    pub rolled_back: Vec<PathBuf>,
}

/// Write every artifact or none of them.
///
/// ## Errors
/// - The first failed write, after earlier writes of this batch were removed. Removal failures are
///   logged and do not replace the original error.
pub fn write_all(sink: &mut dyn ArtifactSink, artifacts: &[GeneratedArtifact]) -> Result<Vec<PathBuf>, PersistenceError> {
    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        match sink.write(artifact) {
            Ok(location) => {
                info!(path = %location.display(), "wrote generated file");
                written.push(location);
            }
            Err(source) => {
                let mut rolled_back = Vec::new();
                for location in written {
                    match sink.remove(&location) {
                        Ok(()) => rolled_back.push(location),
                        Err(err) => warn!(path = %location.display(), error = %err, "cannot roll back generated file"),
                    }
                }
                return Err(PersistenceError {
                    path: artifact.path.clone(),
                    source,
                    rolled_back,
                });
            }
        }
    }
    Ok(written)
}
