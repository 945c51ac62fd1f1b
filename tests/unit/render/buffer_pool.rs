use super::*;

#[test]
fn acquire_returns_exact_byte_length() {
    let p = BufferPool::default();
    let b = p.acquire(5, 3, 3);
    assert_eq!(b.len(), 45);
    assert_eq!(b.shape().byte_len(), 45);
}

#[test]
fn released_buffer_is_reused_for_same_shape() {
    let p = BufferPool::default();
    {
        let mut a = p.acquire(4, 4, 4);
        a[0] = 77;
    }
    let b = p.acquire(4, 4, 4);
    let st = p.stats();
    assert_eq!(st.alloc_buffers, 1);
    assert_eq!(st.reused_buffers, 1);
    // Not cleared on acquire.
    assert_eq!(b[0], 77);
}

#[test]
fn acquire_zeroed_clears_reused_storage() {
    let p = BufferPool::default();
    {
        let mut a = p.acquire(2, 2, 4);
        a.fill(9);
    }
    let b = p.acquire_zeroed(BufferShape::rgba(2, 2));
    assert!(b.iter().all(|&v| v == 0));
}

#[test]
fn different_shapes_use_different_buckets() {
    let p = BufferPool::default();
    drop(p.acquire(4, 4, 4));
    drop(p.acquire(4, 4, 3));
    let st = p.stats();
    assert_eq!(st.alloc_buffers, 2);
    assert_eq!(st.retained_buffers, 2);
}

#[test]
fn live_loans_never_alias() {
    let p = BufferPool::default();
    let mut a = p.acquire(2, 2, 4);
    let mut b = p.acquire(2, 2, 4);
    a.fill(1);
    b.fill(2);
    assert!(a.iter().all(|&v| v == 1));
    assert!(b.iter().all(|&v| v == 2));
    assert_eq!(p.stats().live_loans, 2);
    p.release(a);
    p.release(b);
    assert_eq!(p.stats().live_loans, 0);
}

#[test]
fn pool_honors_bucket_cap() {
    let p = BufferPool::new(BufferPoolOpts {
        max_pool_bytes: 1 << 30,
        max_buffers_per_bucket: 1,
    });
    let a = p.acquire(8, 8, 4);
    let b = p.acquire(8, 8, 4);
    p.release(a);
    p.release(b);

    let st = p.stats();
    assert_eq!(st.retained_buffers, 1);
    assert_eq!(st.dropped_on_release, 1);
}

#[test]
fn pool_honors_global_byte_cap() {
    let bytes_8x8 = BufferShape::rgba(8, 8).byte_len();
    let p = BufferPool::new(BufferPoolOpts {
        max_pool_bytes: bytes_8x8,
        max_buffers_per_bucket: 8,
    });
    let a = p.acquire(8, 8, 4);
    let b = p.acquire(8, 8, 4);
    p.release(a);
    p.release(b);

    let st = p.stats();
    assert_eq!(st.retained_bytes, bytes_8x8);
    assert_eq!(st.retained_buffers, 1);
    assert!(st.dropped_on_release >= 1);
}

#[test]
fn loans_are_returned_on_early_error_exit() {
    fn failing(pool: &BufferPool) -> Result<(), &'static str> {
        let _work = pool.acquire(4, 4, 4);
        let _tmp = pool.acquire(4, 4, 3);
        Err("boom")
    }

    let p = BufferPool::default();
    assert!(failing(&p).is_err());
    let st = p.stats();
    assert_eq!(st.live_loans, 0);
    assert_eq!(st.retained_buffers, 2);
}

#[test]
fn into_frame_detaches_and_recycle_returns() {
    let p = BufferPool::default();
    let buf = p.acquire_zeroed(BufferShape::rgba(3, 2));
    let frame = buf.into_frame();
    assert_eq!((frame.width, frame.height, frame.data.len()), (3, 2, 24));
    let st = p.stats();
    assert_eq!(st.live_loans, 0);
    assert_eq!(st.retained_buffers, 0);

    p.recycle(frame);
    assert_eq!(p.stats().retained_buffers, 1);
    drop(p.acquire(3, 2, 4));
    assert_eq!(p.stats().reused_buffers, 1);
}

#[test]
fn clear_drops_retained_buffers() {
    let p = BufferPool::default();
    drop(p.acquire(4, 4, 4));
    p.clear();
    let st = p.stats();
    assert_eq!(st.retained_buffers, 0);
    assert_eq!(st.retained_bytes, 0);
}

#[test]
fn shared_pool_is_usable_across_threads() {
    let p = BufferPool::default();
    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..16 {
                    let mut b = p.acquire(8, 8, 4);
                    b.fill(3);
                }
            });
        }
    });
    let st = p.stats();
    assert_eq!(st.live_loans, 0);
    assert!(st.alloc_buffers <= 4);
}

#[test]
fn stats_merge_sums_counters() {
    let a = BufferPool::default();
    let b = BufferPool::default();
    drop(a.acquire(2, 2, 4));
    drop(b.acquire(2, 2, 4));
    drop(b.acquire(2, 2, 4));

    let mut total = a.stats();
    total.merge(&b.stats());
    assert_eq!(total.alloc_buffers, 2);
    assert_eq!(total.reused_buffers, 1);
    assert_eq!(total.retained_buffers, 2);
    assert_eq!(total.alloc_bytes, 32);
}

#[test]
fn emptied_buckets_are_removed() {
    let p = BufferPool::default();
    for w in 1..=20 {
        drop(p.acquire(w, 1, 4));
    }
    assert_eq!(p.state.lock().buckets.len(), 20);

    let held: Vec<_> = (1..=20).map(|w| p.acquire(w, 1, 4)).collect();
    assert_eq!(p.stats().reused_buffers, 20);
    assert!(p.state.lock().buckets.is_empty());

    drop(held);
    assert_eq!(p.state.lock().buckets.len(), 20);
    assert_eq!(p.stats().retained_buffers, 20);
}
