use serde_json::json;

use super::*;
use crate::fx::{effect::StaticSettings, registry::EffectRegistry};

fn gradient(w: u32, h: u32) -> Frame {
    let mut data = Vec::new();
    for y in 0..h {
        for x in 0..w {
            data.extend_from_slice(&[(x * 17) as u8, (y * 23) as u8, ((x + y) * 9) as u8, 255]);
        }
    }
    Frame::new(w, h, data).unwrap()
}

fn ripple() -> EffectInstance {
    EffectRegistry::builtin()
        .instantiate("ripple", &json!({ "amplitude": 3.0 }), StaticSettings::sized(12, 9))
        .unwrap()
}

#[test]
fn render_frame_matches_invoke() {
    let inst = ripple();
    let pool = BufferPool::default();
    let src = gradient(12, 9);
    assert_eq!(
        render_frame(&inst, &src, 3, 10, &pool).unwrap(),
        inst.invoke(&src, 3, 10, &pool).unwrap()
    );
}

#[test]
fn sequential_loop_is_ordered_and_counted() {
    let inst = ripple();
    let src = gradient(12, 9);
    let threading = RenderThreading {
        chunk_size: 4,
        ..RenderThreading::default()
    };
    let (frames, stats) = render_loop(&inst, &src, 10, &threading).unwrap();
    assert_eq!(frames.len(), 10);
    assert_eq!(stats.frames_total, 10);
    assert_eq!(stats.frames_rendered, 10);
    assert_eq!(stats.chunks, 3);
    assert_eq!(stats.pool.live_loans, 0);

    let pool = BufferPool::default();
    assert_eq!(frames[7], inst.invoke(&src, 7, 10, &pool).unwrap());
}

#[test]
fn parallel_loop_matches_sequential() {
    let inst = ripple();
    let src = gradient(12, 9);
    let (seq, _) = render_loop(&inst, &src, 12, &RenderThreading::default()).unwrap();
    let par_threading = RenderThreading {
        parallel: true,
        chunk_size: 5,
        threads: Some(3),
    };
    let (par, stats) = render_loop(&inst, &src, 12, &par_threading).unwrap();
    assert_eq!(seq, par);
    assert_eq!(stats.chunks, 3);
    assert_eq!(stats.pool.live_loans, 0);
    assert!(stats.pool.alloc_buffers >= 1);
}

#[test]
fn zero_threads_and_zero_frames_are_rejected() {
    let inst = ripple();
    let src = gradient(4, 4);
    let bad = RenderThreading {
        parallel: true,
        threads: Some(0),
        ..RenderThreading::default()
    };
    assert!(render_loop(&inst, &src, 4, &bad).is_err());
    assert!(render_loop(&inst, &src, 0, &RenderThreading::default()).is_err());
}

#[test]
fn chunk_size_zero_is_normalized() {
    assert_eq!(normalized_chunk_size(0), 1);
    assert_eq!(normalized_chunk_size(7), 7);
}

#[test]
fn loop_closure_report_closes() {
    let inst = ripple();
    let pool = BufferPool::default();
    let report = verify_loop_closure(&inst, &gradient(12, 9), 8, &pool).unwrap();
    assert!(report.closes());
    assert_eq!(report.total, 8);
    assert_eq!(pool.stats().live_loans, 0);
}

#[test]
fn digest_depends_on_size_and_bytes() {
    let a = Frame::filled(2, 2, [1, 2, 3, 4]);
    let b = Frame::filled(4, 1, [1, 2, 3, 4]);
    let mut c = a.clone();
    c.data[0] = 9;
    assert_eq!(frame_digest(&a), frame_digest(&a.clone()));
    assert_ne!(frame_digest(&a), frame_digest(&b));
    assert_ne!(frame_digest(&a), frame_digest(&c));
}
