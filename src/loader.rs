//! Reading and parsing the Go files named by the configuration.
//!
//! A [`SourceLoader`] turns a configured path into a parsed [`SourceFile`]. [`FsLoader`] reads
//! relative to the configuration directory and caches each file once per run, so a source shared
//! by many mappings is parsed once even when several workers ask for it. [`MemoryLoader`] serves
//! fixed text and is what the tests use.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use kmgen_syntax::ast::SourceFile;
use kmgen_syntax::diagnostics::SyntaxError;
use kmgen_syntax::parser;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse '{path}': {}", first_message(.errors))]
    Syntax {
        path: String,
        /// Full text, kept so callers can render the errors with context.
        source_text: String,
        errors: Vec<SyntaxError>,
    },
    #[error("no source registered for '{0}'")]
    NotFound(String),
}

fn first_message(errors: &[SyntaxError]) -> String {
    match errors {
        [] => "invalid source".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{first} (and {} more)", rest.len()),
    }
}

/// Capability to obtain parsed files; shared across scheduler workers.
pub trait SourceLoader: Send + Sync {
    fn load(&self, path: &str) -> Result<Arc<SourceFile>, LoadError>;
}

fn parse_text(path: &str, text: String) -> Result<SourceFile, LoadError> {
    parser::parse_source(&text).map_err(|errors| LoadError::Syntax {
        path: path.to_string(),
        source_text: text,
        errors,
    })
}

/// Place a configured path under `root`; rooted paths (`/p.go`) are taken relative to it too.
pub fn below_root(root: &Path, path: &str) -> PathBuf {
    root.join(path.trim_start_matches(['/', '\\']))
}

type Cache = HashMap<String, Arc<SourceFile>>;

fn lock(cache: &Mutex<Cache>) -> MutexGuard<'_, Cache> {
    // A panicking worker cannot leave a half-inserted entry behind.
    cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Loads files from disk relative to `root`.
#[derive(Debug)]
pub struct FsLoader {
    root: PathBuf,
    cache: Mutex<Cache>,
}

impl FsLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }
}

impl SourceLoader for FsLoader {
    fn load(&self, path: &str) -> Result<Arc<SourceFile>, LoadError> {
        if let Some(file) = lock(&self.cache).get(path) {
            return Ok(Arc::clone(file));
        }

        let full = below_root(&self.root, path);
        tracing::debug!(path = %full.display(), "parsing source file");
        let text = fs::read_to_string(&full).map_err(|source| LoadError::Io {
            path: path.to_string(),
            source,
        })?;
        let file = Arc::new(parse_text(path, text)?);

        // Two workers may race on the same path; keep whichever landed first.
        let mut cache = lock(&self.cache);
        Ok(Arc::clone(cache.entry(path.to_string()).or_insert(file)))
    }
}

/// Serves sources registered up front.
#[derive(Debug, Default)]
pub struct MemoryLoader {
    sources: HashMap<String, String>,
    cache: Mutex<Cache>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, path: impl Into<String>, text: impl Into<String>) -> Self {
        self.sources.insert(path.into(), text.into());
        self
    }
}

impl SourceLoader for MemoryLoader {
    fn load(&self, path: &str) -> Result<Arc<SourceFile>, LoadError> {
        if let Some(file) = lock(&self.cache).get(path) {
            return Ok(Arc::clone(file));
        }
        let text = self
            .sources
            .get(path)
            .ok_or_else(|| LoadError::NotFound(path.to_string()))?;
        let file = Arc::new(parse_text(path, text.clone())?);
        let mut cache = lock(&self.cache);
        Ok(Arc::clone(cache.entry(path.to_string()).or_insert(file)))
    }
}
