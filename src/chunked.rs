// src/chunked.rs

//! Processing large collections slice by slice.
//!
//! Each slice runs as its own normal-priority task. When a slice finishes
//! and items remain, the next slice is scheduled as a *new* task, so other
//! work (and other priorities) get a chance to run between slices.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::{debug, error};

use crate::engine::Scheduler;
use crate::errors::{IdleschedError, Result};
use crate::queue::task::panic_message;
use crate::queue::TaskOptions;

type ChunkFn<T> = Box<dyn FnMut(&[T]) -> anyhow::Result<()> + Send + 'static>;
type OnComplete = Box<dyn FnOnce() + Send + 'static>;

/// Builder for a chunked job.
///
/// ```no_run
/// # use idlesched::chunked::ChunkedProcessor;
/// # async fn demo(scheduler: idlesched::Scheduler) -> idlesched::errors::Result<()> {
/// let ids: Vec<u32> = (1..=250).collect();
/// ChunkedProcessor::new(ids, |chunk: &[u32]| {
///     println!("{} cards", chunk.len());
///     Ok(())
/// })
/// .chunk_size(100)
/// .on_complete(|| println!("done"))
/// .submit(&scheduler)?;
/// # Ok(())
/// # }
/// ```
pub struct ChunkedProcessor<T> {
    items: Vec<T>,
    per_chunk: ChunkFn<T>,
    chunk_size: Option<usize>,
    label: String,
    on_complete: Option<OnComplete>,
}

impl<T> fmt::Debug for ChunkedProcessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkedProcessor")
            .field("items", &self.items.len())
            .field("chunk_size", &self.chunk_size)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl<T: Send + 'static> ChunkedProcessor<T> {
    pub fn new<F>(items: Vec<T>, per_chunk: F) -> Self
    where
        F: FnMut(&[T]) -> anyhow::Result<()> + Send + 'static,
    {
        Self {
            items,
            per_chunk: Box::new(per_chunk),
            chunk_size: None,
            label: "chunk".to_string(),
            on_complete: None,
        }
    }

    /// Slice length. Defaults to the scheduler's `default_chunk_size`.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = Some(size);
        self
    }

    /// Called exactly once, after the last slice.
    pub fn on_complete<C>(mut self, on_complete: C) -> Self
    where
        C: FnOnce() + Send + 'static,
    {
        self.on_complete = Some(Box::new(on_complete));
        self
    }

    /// Prefix used for the per-slice task labels.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Schedule the first slice.
    ///
    /// An empty collection completes immediately without scheduling
    /// anything. A zero chunk size is rejected and nothing runs.
    pub fn submit(self, scheduler: &Scheduler) -> Result<()> {
        let chunk_size = self
            .chunk_size
            .unwrap_or(scheduler.options().default_chunk_size);
        if chunk_size == 0 {
            return Err(IdleschedError::InvalidArgument(
                "chunk size must be at least 1".to_string(),
            ));
        }

        if self.items.is_empty() {
            debug!(label = %self.label, "no items to process; completing immediately");
            if let Some(done) = self.on_complete {
                done();
            }
            return Ok(());
        }

        debug!(
            label = %self.label,
            items = self.items.len(),
            chunk_size,
            "processing items in chunks"
        );

        ChunkJob {
            items: self.items,
            next: 0,
            slice_index: 0,
            chunk_size,
            per_chunk: self.per_chunk,
            label: self.label,
            on_complete: self.on_complete,
            scheduler: scheduler.clone(),
        }
        .schedule_next()
    }
}

/// In-flight state of a chunked job, moved from one slice task to the next.
struct ChunkJob<T> {
    items: Vec<T>,
    next: usize,
    slice_index: usize,
    chunk_size: usize,
    per_chunk: ChunkFn<T>,
    label: String,
    on_complete: Option<OnComplete>,
    scheduler: Scheduler,
}

impl<T: Send + 'static> ChunkJob<T> {
    fn schedule_next(self) -> Result<()> {
        let scheduler = self.scheduler.clone();
        let options = TaskOptions::normal().label(format!("{}#{}", self.label, self.slice_index));
        scheduler.try_schedule_task(
            move || {
                self.run_slice();
                Ok(())
            },
            options,
        )?;
        Ok(())
    }

    fn run_slice(mut self) {
        let end = (self.next + self.chunk_size).min(self.items.len());
        let slice = &self.items[self.next..end];
        let per_chunk = &mut self.per_chunk;

        match catch_unwind(AssertUnwindSafe(|| per_chunk(slice))) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                error!(label = %self.label, slice = self.slice_index, error = %format!("{err:#}"), "error processing data chunk");
            }
            Err(payload) => {
                error!(
                    label = %self.label,
                    slice = self.slice_index,
                    error = %panic_message(payload.as_ref()),
                    "error processing data chunk"
                );
            }
        }

        self.next = end;
        self.slice_index += 1;

        if self.next < self.items.len() {
            let label = self.label.clone();
            if let Err(err) = self.schedule_next() {
                error!(label = %label, error = %err, "could not schedule next chunk");
            }
        } else {
            debug!(label = %self.label, slices = self.slice_index, "all chunks processed");
            if let Some(done) = self.on_complete.take() {
                done();
            }
        }
    }
}

/// Process `items` in slices of `chunk_size`, calling `on_complete` once
/// after the last slice.
///
/// Invalid arguments are logged and nothing runs.
pub fn process_in_chunks<T, F, C>(
    scheduler: &Scheduler,
    items: Vec<T>,
    per_chunk: F,
    chunk_size: usize,
    on_complete: C,
) where
    T: Send + 'static,
    F: FnMut(&[T]) -> anyhow::Result<()> + Send + 'static,
    C: FnOnce() + Send + 'static,
{
    let result = ChunkedProcessor::new(items, per_chunk)
        .chunk_size(chunk_size)
        .on_complete(on_complete)
        .submit(scheduler);

    if let Err(err) = result {
        error!(error = %err, "invalid arguments for process_in_chunks");
    }
}
