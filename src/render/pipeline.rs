use parking_lot::Mutex;
use rayon::prelude::*;

use crate::{
    foundation::{
        core::Frame,
        error::{LoopFxError, LoopFxResult},
    },
    fx::effect::EffectInstance,
    render::buffer_pool::{BufferPool, BufferPoolStats},
};

/// Render frame `frame` of a loop of `total` frames.
///
/// This is the primary one-shot API; it is [`EffectInstance::invoke`] with the pool made
/// explicit. Returns a straight-alpha RGBA8 [`Frame`].
pub fn render_frame(
    instance: &EffectInstance,
    input: &Frame,
    frame: u64,
    total: u64,
    pool: &BufferPool,
) -> LoopFxResult<Frame> {
    instance.invoke(input, frame, total, pool)
}

/// How [`render_loop`] schedules frames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderThreading {
    /// Render on a dedicated rayon pool.
    pub parallel: bool,
    /// Frames handed to the pool per batch.
    pub chunk_size: usize,
    /// Worker count; `None` lets rayon decide.
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
        }
    }
}

/// Counters from one [`render_loop`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames in the loop.
    pub frames_total: u64,
    /// Frames produced.
    pub frames_rendered: u64,
    /// Batches the frames were split into.
    pub chunks: u64,
    /// Buffer pool counters, summed over every pool used.
    pub pool: BufferPoolStats,
}

/// A worker-owned pool that reports its counters when the worker is done with it.
struct WorkerPool<'a> {
    pool: BufferPool,
    sink: &'a Mutex<BufferPoolStats>,
}

impl Drop for WorkerPool<'_> {
    fn drop(&mut self) {
        self.sink.lock().merge(&self.pool.stats());
    }
}

/// Render frames `0..total` of `instance` over `input`, ordered by frame index.
///
/// Sequential rendering reuses one pool. Parallel rendering runs each chunk on a dedicated
/// rayon pool where every worker owns its own [`BufferPool`]. The first error aborts the loop.
#[tracing::instrument(skip(instance, input), fields(effect = instance.id()))]
pub fn render_loop(
    instance: &EffectInstance,
    input: &Frame,
    total: u64,
    threading: &RenderThreading,
) -> LoopFxResult<(Vec<Frame>, RenderStats)> {
    if total == 0 {
        return Err(LoopFxError::validation("loop must have at least one frame"));
    }
    let chunk = normalized_chunk_size(threading.chunk_size);
    let mut frames = Vec::with_capacity(usize::try_from(total).unwrap_or(0));
    let mut chunks = 0u64;

    let pool_stats = if threading.parallel {
        let threads = build_thread_pool(threading.threads)?;
        let sink = Mutex::new(BufferPoolStats::default());
        let mut start = 0u64;
        while start < total {
            let end = start.saturating_add(chunk).min(total);
            let rendered = threads.install(|| {
                (start..end)
                    .into_par_iter()
                    .map_init(
                        || WorkerPool {
                            pool: BufferPool::default(),
                            sink: &sink,
                        },
                        |worker, f| instance.invoke(input, f, total, &worker.pool),
                    )
                    .collect::<Vec<_>>()
            });
            for item in rendered {
                frames.push(item?);
            }
            chunks += 1;
            start = end;
        }
        sink.into_inner()
    } else {
        let pool = BufferPool::default();
        let mut start = 0u64;
        while start < total {
            let end = start.saturating_add(chunk).min(total);
            for f in start..end {
                frames.push(instance.invoke(input, f, total, &pool)?);
            }
            chunks += 1;
            start = end;
        }
        pool.stats()
    };

    let stats = RenderStats {
        frames_total: total,
        frames_rendered: frames.len() as u64,
        chunks,
        pool: pool_stats,
    };
    tracing::debug!(
        frames = stats.frames_rendered,
        chunks = stats.chunks,
        parallel = threading.parallel,
        "loop rendered"
    );
    Ok((frames, stats))
}

/// Digests of the frames either side of the loop seam.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct LoopClosureReport {
    /// Frames per loop.
    pub total: u64,
    /// Digest of frame 0.
    pub first: u64,
    /// Digest of frame `total`, which must equal frame 0.
    pub wrapped: u64,
    /// Digest of frame `total - 1`, the last distinct frame.
    pub last: u64,
}

impl LoopClosureReport {
    /// `true` when frame `total` reproduces frame 0 exactly.
    pub fn closes(&self) -> bool {
        self.first == self.wrapped
    }
}

/// Stable 64-bit digest of a frame's size and bytes.
pub fn frame_digest(frame: &Frame) -> u64 {
    let mut h = xxhash_rust::xxh3::Xxh3::new();
    h.update(&frame.width.to_le_bytes());
    h.update(&frame.height.to_le_bytes());
    h.update(&frame.data);
    h.digest()
}

/// Render frames `0`, `total - 1` and `total` and compare the seam.
#[tracing::instrument(skip(instance, input, pool), fields(effect = instance.id()))]
pub fn verify_loop_closure(
    instance: &EffectInstance,
    input: &Frame,
    total: u64,
    pool: &BufferPool,
) -> LoopFxResult<LoopClosureReport> {
    if total == 0 {
        return Err(LoopFxError::validation("loop must have at least one frame"));
    }
    let digest_of = |f: u64| -> LoopFxResult<u64> {
        let out = instance.invoke(input, f, total, pool)?;
        let d = frame_digest(&out);
        pool.recycle(out);
        Ok(d)
    };
    let report = LoopClosureReport {
        total,
        first: digest_of(0)?,
        last: digest_of(total - 1)?,
        wrapped: digest_of(total)?,
    };
    if !report.closes() {
        tracing::warn!(?report, "loop does not close");
    }
    Ok(report)
}

fn build_thread_pool(threads: Option<usize>) -> LoopFxResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(LoopFxError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| LoopFxError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    if chunk_size == 0 {
        1
    } else {
        chunk_size as u64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
