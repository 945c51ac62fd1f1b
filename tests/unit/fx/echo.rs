use serde_json::json;

use super::*;

fn prepare(params: serde_json::Value) -> EchoData {
    let cfg = EffectConfig::from_json(PARAMS, &params).unwrap();
    Echo.precompute(&cfg, &StaticSettings::default())
}

fn blob(w: u32, h: u32) -> Frame {
    let mut data = Vec::new();
    for y in 0..h {
        for x in 0..w {
            let on = (3..7).contains(&x) && (2..6).contains(&y);
            let v = if on { 230 } else { 20 };
            data.extend_from_slice(&[v, v / 2, 255 - v, 100 + (x as u8) * 5]);
        }
    }
    Frame::new(w, h, data).unwrap()
}

#[test]
fn decay_table_is_precomputed() {
    let data = prepare(json!({ "echo_count": 3, "decay": 0.5 }));
    assert_eq!(data.weights.as_slice(), &[1.0, 0.5, 0.25]);
}

#[test]
fn still_echoes_without_feedback_reproduce_the_source() {
    let data = prepare(json!({
        "displacement": 0,
        "rotation": 0,
        "chroma_offset": 0,
        "feedback_strength": 0,
    }));
    let src = blob(10, 8);
    let out = Echo
        .invoke(&data, &src, FrameContext::new(3, 10), &BufferPool::default())
        .unwrap();
    assert_eq!(out, src);
}

#[test]
fn moving_echoes_change_pixels_but_not_alpha() {
    let data = prepare(json!({ "displacement": 3 }));
    let src = blob(10, 8);
    let out = Echo
        .invoke(&data, &src, FrameContext::new(2, 10), &BufferPool::default())
        .unwrap();
    assert_ne!(out.data, src.data);
    for (o, s) in out.data.chunks_exact(4).zip(src.data.chunks_exact(4)) {
        assert_eq!(o[3], s[3]);
    }
}

#[test]
fn dirty_pool_does_not_leak_into_feedback() {
    let data = prepare(json!({ "feedback_strength": 1.0 }));
    let src = blob(10, 8);
    let ctx = FrameContext::new(4, 10);

    let clean = Echo.invoke(&data, &src, ctx, &BufferPool::default()).unwrap();

    let dirty = BufferPool::default();
    let mut held = Vec::new();
    for _ in 0..3 {
        let mut b = dirty.acquire(10, 8, 4);
        b.fill(255);
        held.push(b);
    }
    drop(held);
    let out = Echo.invoke(&data, &src, ctx, &dirty).unwrap();
    assert_eq!(out, clean);
}

#[test]
fn loop_closes_and_is_deterministic() {
    let data = prepare(json!({ "displacement": 5, "rotation": 10, "cycles": 2 }));
    let src = blob(10, 8);
    let pool = BufferPool::default();
    let a = Echo.invoke(&data, &src, FrameContext::new(0, 7), &pool).unwrap();
    let b = Echo.invoke(&data, &src, FrameContext::new(7, 7), &pool).unwrap();
    let c = Echo.invoke(&data, &src, FrameContext::new(0, 7), &pool).unwrap();
    assert_eq!(a, b);
    assert_eq!(a, c);
}

#[test]
fn full_tint_paints_every_pixel() {
    let data = prepare(json!({
        "tint_color": "#FF0000",
        "tint_strength": 1.0,
        "vignette_strength": 0
    }));
    let src = blob(6, 6);
    let out = Echo
        .invoke(&data, &src, FrameContext::new(1, 5), &BufferPool::default())
        .unwrap();
    assert!(out.data.chunks_exact(4).all(|p| p[..3] == [255, 0, 0]));
}

#[test]
fn feedback_accumulates_across_echoes() {
    let still = |feedback: f64| {
        prepare(json!({
            "echo_count": 2,
            "decay": 0.5,
            "pulse_intensity": 0,
            "displacement": 0,
            "rotation": 0,
            "chroma_offset": 0,
            "feedback_strength": feedback,
        }))
    };
    let src = Frame::new(2, 1, vec![100, 50, 20, 255, 10, 155, 181, 90]).unwrap();
    let pool = BufferPool::default();
    let ctx = FrameContext::new(0, 8);

    // Echo 0 copies the source into the feedback; echo 1 reads source + feedback, saturating,
    // and blends it in at half opacity.
    let fed = Echo.invoke(&still(1.0), &src, ctx, &pool).unwrap();
    assert_eq!(fed.data, vec![150, 75, 30, 255, 15, 205, 218, 90]);

    let dry = Echo.invoke(&still(0.0), &src, ctx, &pool).unwrap();
    assert_eq!(dry, src);
    assert_ne!(fed, dry);
}
