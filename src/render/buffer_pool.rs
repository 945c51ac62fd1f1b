use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use parking_lot::Mutex;

use crate::foundation::core::{Frame, RGBA_CHANNELS};

/// Retention limits for a [`BufferPool`].
#[derive(Debug, Clone, Copy)]
pub struct BufferPoolOpts {
    /// Maximum bytes retained across all buckets.
    pub max_pool_bytes: usize,
    /// Maximum number of retained buffers per `(w, h, channels)` bucket.
    pub max_buffers_per_bucket: usize,
}

impl Default for BufferPoolOpts {
    fn default() -> Self {
        Self {
            max_pool_bytes: 256 * 1024 * 1024,
            max_buffers_per_bucket: 8,
        }
    }
}

/// Shape of a pooled buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferShape {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Interleaved channels per pixel.
    pub channels: usize,
}

impl BufferShape {
    /// Shape of an RGBA8 raster.
    pub fn rgba(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            channels: RGBA_CHANNELS,
        }
    }

    /// Exact byte length of a buffer of this shape.
    pub fn byte_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(self.channels)
    }
}

/// Counters exposed by [`BufferPool::stats`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BufferPoolStats {
    /// Buffers currently parked in the pool.
    pub retained_buffers: usize,
    /// Bytes currently parked in the pool.
    pub retained_bytes: usize,
    /// Buffers currently out on loan.
    pub live_loans: usize,
    /// Fresh allocations made by `acquire`.
    pub alloc_buffers: u64,
    /// Bytes freshly allocated by `acquire`.
    pub alloc_bytes: u64,
    /// Acquisitions satisfied from the pool.
    pub reused_buffers: u64,
    /// Releases discarded because a cap was hit.
    pub dropped_on_release: u64,
}

impl BufferPoolStats {
    /// Add `other`'s counters into `self`.
    pub fn merge(&mut self, other: &Self) {
        self.retained_buffers += other.retained_buffers;
        self.retained_bytes += other.retained_bytes;
        self.live_loans += other.live_loans;
        self.alloc_buffers += other.alloc_buffers;
        self.alloc_bytes += other.alloc_bytes;
        self.reused_buffers += other.reused_buffers;
        self.dropped_on_release += other.dropped_on_release;
    }
}

#[derive(Default)]
struct PoolState {
    stats: BufferPoolStats,
    // Op-level lookup, never per pixel.
    buckets: HashMap<BufferShape, Vec<Vec<u8>>>,
}

/// Reuse arena for pixel buffers keyed by `(width, height, channels)`.
///
/// Acquire/release is a short critical section under an internal lock, so one pool may be
/// shared by reference across threads; giving each worker its own pool avoids the contention.
/// Buffers are handed out as [`PooledBuffer`] loans that return themselves on drop, which makes
/// release happen exactly once on every exit path. Acquired buffers are *not* cleared.
pub struct BufferPool {
    opts: BufferPoolOpts,
    state: Mutex<PoolState>,
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(BufferPoolOpts::default())
    }
}

impl std::fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferPool")
            .field("opts", &self.opts)
            .field("stats", &self.stats())
            .finish()
    }
}

impl BufferPool {
    /// Empty pool with the given limits.
    pub fn new(opts: BufferPoolOpts) -> Self {
        Self {
            opts,
            state: Mutex::new(PoolState::default()),
        }
    }

    /// Snapshot of the pool counters.
    pub fn stats(&self) -> BufferPoolStats {
        self.state.lock().stats.clone()
    }

    /// Borrow a buffer of exactly `width * height * channels` bytes with unspecified contents.
    pub fn acquire(&self, width: u32, height: u32, channels: usize) -> PooledBuffer<'_> {
        self.acquire_shape(BufferShape {
            width,
            height,
            channels,
        })
    }

    /// Borrow a buffer of `shape` with unspecified contents.
    pub fn acquire_shape(&self, shape: BufferShape) -> PooledBuffer<'_> {
        let data = self.take(shape);
        PooledBuffer {
            pool: self,
            shape,
            data: Some(data),
        }
    }

    /// Borrow a buffer of `shape` with every byte set to zero.
    pub fn acquire_zeroed(&self, shape: BufferShape) -> PooledBuffer<'_> {
        let mut buf = self.acquire_shape(shape);
        buf.fill(0);
        buf
    }

    /// Return a loan explicitly. Equivalent to dropping it.
    pub fn release(&self, buffer: PooledBuffer<'_>) {
        drop(buffer);
    }

    /// Hand a finished frame's storage back for reuse.
    pub fn recycle(&self, frame: Frame) {
        let shape = BufferShape::rgba(frame.width, frame.height);
        if frame.data.len() == shape.byte_len() {
            self.give_back(shape, frame.data, false);
        }
    }

    fn take(&self, shape: BufferShape) -> Vec<u8> {
        let len = shape.byte_len();
        let mut st = self.state.lock();
        st.stats.live_loans = st.stats.live_loans.saturating_add(1);

        if let Some(bucket) = st.buckets.get_mut(&shape)
            && let Some(data) = bucket.pop()
        {
            if bucket.is_empty() {
                st.buckets.remove(&shape);
            }
            st.stats.retained_buffers = st.stats.retained_buffers.saturating_sub(1);
            st.stats.retained_bytes = st.stats.retained_bytes.saturating_sub(len);
            st.stats.reused_buffers = st.stats.reused_buffers.saturating_add(1);
            tracing::trace!(?shape, "buffer pool reuse");
            return data;
        }

        st.stats.alloc_buffers = st.stats.alloc_buffers.saturating_add(1);
        st.stats.alloc_bytes = st.stats.alloc_bytes.saturating_add(len as u64);
        drop(st);
        tracing::trace!(?shape, "buffer pool alloc");
        vec![0u8; len]
    }

    fn give_back(&self, shape: BufferShape, data: Vec<u8>, was_loan: bool) {
        let bytes = shape.byte_len();
        let mut guard = self.state.lock();
        let st = &mut *guard;
        if was_loan {
            st.stats.live_loans = st.stats.live_loans.saturating_sub(1);
        }

        if self.opts.max_pool_bytes == 0
            || self.opts.max_buffers_per_bucket == 0
            || st.stats.retained_bytes.saturating_add(bytes) > self.opts.max_pool_bytes
        {
            st.stats.dropped_on_release = st.stats.dropped_on_release.saturating_add(1);
            return;
        }

        let cap = self.opts.max_buffers_per_bucket;
        let bucket = st.buckets.entry(shape).or_default();
        if bucket.len() >= cap {
            st.stats.dropped_on_release = st.stats.dropped_on_release.saturating_add(1);
            return;
        }
        bucket.push(data);
        st.stats.retained_buffers = st.stats.retained_buffers.saturating_add(1);
        st.stats.retained_bytes = st.stats.retained_bytes.saturating_add(bytes);
    }

    /// Drop every retained buffer.
    pub fn clear(&self) {
        let mut st = self.state.lock();
        st.buckets.clear();
        st.stats.retained_buffers = 0;
        st.stats.retained_bytes = 0;
    }
}

/// A buffer on loan from a [`BufferPool`].
///
/// The holder is the exclusive writer. Dropping the loan returns the storage to the pool;
/// [`PooledBuffer::into_frame`] keeps it instead.
pub struct PooledBuffer<'p> {
    pool: &'p BufferPool,
    shape: BufferShape,
    data: Option<Vec<u8>>,
}

impl PooledBuffer<'_> {
    /// Shape the buffer was acquired with.
    pub fn shape(&self) -> BufferShape {
        self.shape
    }

    /// Take ownership of an RGBA buffer as a [`Frame`], ending the loan without returning the
    /// storage. Hand it back later with [`BufferPool::recycle`].
    pub fn into_frame(mut self) -> Frame {
        debug_assert_eq!(self.shape.channels, RGBA_CHANNELS);
        let data = self.detach();
        Frame {
            width: self.shape.width,
            height: self.shape.height,
            data,
        }
    }

    fn detach(&mut self) -> Vec<u8> {
        let data = self.data.take().unwrap_or_default();
        let mut st = self.pool.state.lock();
        st.stats.live_loans = st.stats.live_loans.saturating_sub(1);
        data
    }
}

impl Deref for PooledBuffer<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.data.as_deref().unwrap_or(&[])
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.data.as_deref_mut().unwrap_or(&mut [])
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        if let Some(data) = self.data.take() {
            self.pool.give_back(self.shape, data, true);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/buffer_pool.rs"]
mod tests;
