//! Batch tagging of a directory.
//!
//! The runner enumerates audio files once, then pushes each one through the
//! [`TagPipeline`] on a bounded pool of tokio tasks:
//!
//! 1. Read title and artists from the file
//! 2. Search the catalog with `"<artists joined by ", "> <title>"`
//! 3. Pick the best candidate with the [`Matcher`]
//! 4. Optionally download cover art (failure is advisory)
//! 5. Write the selected fields back
//!
//! Any error in steps 1, 2, 3 or 5 marks the file FAIL; nothing aborts the
//! batch. Submission blocks while all workers are busy.

mod outcome;

pub use outcome::{BatchOutcome, Progress, RunState};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use crate::catalog::{ArtworkFetcher, CatalogSearch, CatalogTrack};
use crate::error::{ArtFetchError, TagError};
use crate::matcher::Matcher;
use crate::metadata::{ArtStatus, LocalTrackInfo, TagStore, TagUpdateSpec, WriteReport};
use crate::scanner;

/// Default number of files processed in parallel.
pub const DEFAULT_WORKERS: usize = 16;

/// Final state of one file.
#[derive(Debug, Clone)]
pub enum FileStatus {
    Success {
        /// Catalog id of the matched track
        track_id: u64,
        report: WriteReport,
    },
    Fail(TagError),
}

impl FileStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, FileStatus::Success { .. })
    }
}

/// Emitted once per file when it reaches SUCCESS or FAIL.
#[derive(Debug, Clone)]
pub struct FileEvent {
    pub path: PathBuf,
    pub status: FileStatus,
    /// Batch progress right after this file was recorded
    pub progress: Progress,
}

/// Receives per-file results while a batch runs.
///
/// Called synchronously from worker tasks; implementations must return
/// quickly and must not block.
pub trait ProgressObserver: Send + Sync {
    fn on_file(&self, event: &FileEvent);
}

impl<F> ProgressObserver for F
where
    F: Fn(&FileEvent) + Send + Sync,
{
    fn on_file(&self, event: &FileEvent) {
        self(event)
    }
}

/// The per-file steps, shared read-only by every worker.
pub struct TagPipeline {
    catalog: Arc<dyn CatalogSearch>,
    artwork: Arc<dyn ArtworkFetcher>,
    store: Arc<dyn TagStore>,
    matcher: Matcher,
    spec: Arc<TagUpdateSpec>,
}

impl TagPipeline {
    pub fn new(
        catalog: Arc<dyn CatalogSearch>,
        artwork: Arc<dyn ArtworkFetcher>,
        store: Arc<dyn TagStore>,
        spec: TagUpdateSpec,
    ) -> Self {
        Self {
            catalog,
            artwork,
            store,
            matcher: Matcher::default(),
            spec: Arc::new(spec),
        }
    }

    pub fn with_matcher(mut self, matcher: Matcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn spec(&self) -> &TagUpdateSpec {
        &self.spec
    }

    /// Read the file's tags on the blocking pool.
    pub async fn read_info(&self, path: &Path) -> Result<LocalTrackInfo, TagError> {
        let store = self.store.clone();
        let owned = path.to_path_buf();
        tokio::task::spawn_blocking(move || store.read(&owned))
            .await
            .map_err(|e| TagError::read(path, e))?
    }

    /// Read, search and match without writing anything.
    pub async fn find_match(
        &self,
        path: &Path,
    ) -> Result<(LocalTrackInfo, CatalogTrack), TagError> {
        let info = self.read_info(path).await?;

        let candidates = self.catalog.search_tracks(&info.search_query()).await?;
        tracing::debug!(
            path = %path.display(),
            candidates = candidates.len(),
            "Catalog search complete"
        );

        let track = self
            .matcher
            .match_track(&info.title, &info.artists[..], &candidates, self.spec.fuzziness)
            .cloned()
            .ok_or_else(|| TagError::NoMatch {
                title: info.title.clone(),
                artists: info.artists.join(", "),
            })?;

        Ok((info, track))
    }

    /// Run every step for one file.
    pub async fn tag_file(&self, path: &Path) -> Result<(CatalogTrack, WriteReport), TagError> {
        let (_, track) = self.find_match(path).await?;

        let mut art_error = None;
        let cover = if self.spec.replace_art {
            let url = track.artwork_url(self.spec.art_resolution);
            match self.artwork.fetch(&url).await {
                Ok(cover) => Some(cover),
                Err(source) => {
                    let err = ArtFetchError { url, source };
                    tracing::warn!(path = %path.display(), "{}", err);
                    art_error = Some(err);
                    None
                }
            }
        } else {
            None
        };

        let store = self.store.clone();
        let spec = self.spec.clone();
        let owned = path.to_path_buf();
        let write_track = track.clone();
        let mut report = tokio::task::spawn_blocking(move || {
            store.write(&owned, &write_track, &spec, cover.as_ref())
        })
        .await
        .map_err(|e| TagError::write(path, e))??;

        if let Some(err) = art_error {
            report.art = ArtStatus::Failed(err);
        }
        Ok((track, report))
    }
}

/// Tags whole directories with a bounded worker pool.
pub struct BatchRunner {
    pipeline: Arc<TagPipeline>,
    workers: usize,
    outcome: Arc<BatchOutcome>,
}

impl BatchRunner {
    pub fn new(pipeline: TagPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            workers: DEFAULT_WORKERS,
            outcome: Arc::new(BatchOutcome::default()),
        }
    }

    /// Set the worker count (at least 1).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Shared handle for reading progress from other threads.
    pub fn outcome(&self) -> Arc<BatchOutcome> {
        self.outcome.clone()
    }

    /// Tag every audio file under `root`.
    ///
    /// Returns once every file is SUCCESS or FAIL.
    pub async fn tag_dir(
        &mut self,
        root: &Path,
        observer: impl ProgressObserver + 'static,
    ) -> Progress {
        let owned = root.to_path_buf();
        let files = match tokio::task::spawn_blocking(move || scanner::enumerate_audio_files(&owned))
            .await
        {
            Ok(files) => files,
            Err(e) => {
                tracing::error!(root = %root.display(), "Directory scan failed: {}", e);
                Vec::new()
            }
        };
        self.tag_files(files, observer).await
    }

    /// Tag an explicit list of files.
    pub async fn tag_files(
        &mut self,
        files: Vec<PathBuf>,
        observer: impl ProgressObserver + 'static,
    ) -> Progress {
        let observer: Arc<dyn ProgressObserver> = Arc::new(observer);
        self.outcome.reset(files.len());
        tracing::info!(files = files.len(), workers = self.workers, "Starting batch");

        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut handles: Vec<(PathBuf, JoinHandle<()>)> = Vec::with_capacity(files.len());

        for path in files {
            // Blocks until a worker is free
            let Ok(permit) = semaphore.clone().acquire_owned().await else {
                tracing::error!("Worker pool closed unexpectedly");
                break;
            };

            let pipeline = self.pipeline.clone();
            let outcome = self.outcome.clone();
            let observer = observer.clone();
            let task_path = path.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                let status = match pipeline.tag_file(&task_path).await {
                    Ok((track, report)) => FileStatus::Success {
                        track_id: track.id,
                        report,
                    },
                    Err(e) => {
                        tracing::warn!(path = %task_path.display(), kind = e.kind(), "{}", e);
                        FileStatus::Fail(e)
                    }
                };
                finish(&outcome, observer.as_ref(), task_path, status);
            });
            handles.push((path, handle));
        }

        for (path, handle) in handles {
            if let Err(e) = handle.await
                && !self.outcome.contains(&path)
            {
                tracing::error!(path = %path.display(), "Tagging task aborted: {}", e);
                let status = FileStatus::Fail(TagError::write(&path, format!("task aborted: {e}")));
                finish(&self.outcome, observer.as_ref(), path, status);
            }
        }

        let progress = self.outcome.complete();
        tracing::info!(
            succeeded = progress.succeeded,
            failed = progress.failed,
            total = progress.total,
            "Batch complete"
        );
        progress
    }
}

fn finish(outcome: &BatchOutcome, observer: &dyn ProgressObserver, path: PathBuf, status: FileStatus) {
    let progress = outcome.record(path.clone(), status.is_success());
    observer.on_file(&FileEvent {
        path,
        status,
        progress,
    });
}
