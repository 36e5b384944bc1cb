//! Fan work groups out over a fixed pool of workers.
//!
//! Groups sit in one shared queue. Each worker pops a group, runs it to completion with
//! [`process_group`], and sends the artifact or the error on its own channel before popping the
//! next one. A group is never split across workers, so each output file has a single writer.
//! A failing group only loses its own artifact.

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use thiserror::Error;
use tracing::{debug, info};

use crate::generator::{GenerateError, GeneratedArtifact, GeneratorSettings, process_group};
use crate::jobs::WorkGroup;
use crate::loader::SourceLoader;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("cannot start worker pool: {0}")]
    Pool(#[from] ThreadPoolBuildError),
}

/// A group that produced no artifact.
#[derive(Debug, Error)]
#[error("{dir}: {error}")]
pub struct JobError {
    pub dir: String,
    #[source]
    pub error: GenerateError,
}

/// Everything a batch produced, in a stable order.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Sorted by path.
    pub artifacts: Vec<GeneratedArtifact>,
    /// Sorted by directory.
    pub errors: Vec<JobError>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

pub struct Scheduler {
    pool: ThreadPool,
    workers: usize,
    settings: Arc<GeneratorSettings>,
    loader: Arc<dyn SourceLoader>,
}

impl Scheduler {
    /// Build a pool of `workers` threads; zero is raised to one.
    pub fn new(
        workers: usize,
        settings: Arc<GeneratorSettings>,
        loader: Arc<dyn SourceLoader>,
    ) -> Result<Self, ScheduleError> {
        let workers = workers.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("kmgen-worker-{i}"))
            .build()?;
        Ok(Self {
            pool,
            workers,
            settings,
            loader,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Start processing `groups`; results arrive on the returned handle.
    #[tracing::instrument(skip_all, fields(groups = groups.len(), workers = self.workers))]
    pub fn schedule(self, groups: Vec<WorkGroup>) -> ScheduleHandle {
        info!("scheduling work groups");
        let queue = Arc::new(Mutex::new(VecDeque::from(groups)));
        let (artifact_tx, artifacts) = mpsc::channel();
        let (error_tx, errors) = mpsc::channel();

        for worker in 0..self.workers {
            let queue = Arc::clone(&queue);
            let settings = Arc::clone(&self.settings);
            let loader = Arc::clone(&self.loader);
            let artifact_tx = artifact_tx.clone();
            let error_tx = error_tx.clone();
            self.pool.spawn(move || {
                run_worker(worker, &queue, loader.as_ref(), &settings, &artifact_tx, &error_tx);
            });
        }

        ScheduleHandle {
            artifacts,
            errors,
            _pool: self.pool,
        }
    }
}

fn run_worker(
    worker: usize,
    queue: &Mutex<VecDeque<WorkGroup>>,
    loader: &dyn SourceLoader,
    settings: &GeneratorSettings,
    artifacts: &Sender<GeneratedArtifact>,
    errors: &Sender<JobError>,
) {
    loop {
        let next = queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).pop_front();
        let Some(group) = next else {
            debug!(worker, "queue drained");
            return;
        };
        match process_group(&group, loader, settings) {
            Ok(artifact) => {
                debug!(worker, path = %artifact.path, "group done");
                // The receiver is gone only if the caller dropped the handle.
                if artifacts.send(artifact).is_err() {
                    return;
                }
            }
            Err(error) => {
                let _ = errors.send(JobError { dir: group.dir, error });
            }
        }
    }
}

/// Receiving end of a running batch. The worker pool lives as long as the handle.
pub struct ScheduleHandle {
    artifacts: Receiver<GeneratedArtifact>,
    errors: Receiver<JobError>,
    _pool: ThreadPool,
}

impl ScheduleHandle {
    /// Artifacts as they complete; ends once every worker has finished.
    pub fn artifacts(&self) -> impl Iterator<Item = GeneratedArtifact> + '_ {
        self.artifacts.iter()
    }

    /// Errors reported so far, without waiting.
    pub fn drain_errors(&self) -> impl Iterator<Item = JobError> + '_ {
        self.errors.try_iter()
    }

    /// Wait for the whole batch.
    pub fn collect(self) -> BatchReport {
        let mut artifacts: Vec<_> = self.artifacts.iter().collect();
        // All workers have exited once the artifact channel closes.
        let mut errors: Vec<_> = self.errors.iter().collect();
        artifacts.sort_by(|a, b| a.path.cmp(&b.path));
        errors.sort_by(|a, b| a.dir.cmp(&b.dir));
        info!(artifacts = artifacts.len(), errors = errors.len(), "batch finished");
        BatchReport { artifacts, errors }
    }
}
