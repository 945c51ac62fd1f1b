use serde_json::json;

use super::*;

fn prepare(params: serde_json::Value) -> InterferenceData {
    let cfg = EffectConfig::from_json(PARAMS, &params).unwrap();
    Interference.precompute(&cfg, &StaticSettings::default())
}

fn grey(w: u32, h: u32) -> Frame {
    let mut f = Frame::filled(w, h, [100, 100, 100, 255]);
    for (i, px) in f.data.chunks_exact_mut(4).enumerate() {
        px[3] = (i % 200) as u8 + 50;
    }
    f
}

#[test]
fn zero_strength_without_warp_is_identity() {
    let data = prepare(json!({ "strength": 0, "warp": 0 }));
    let src = grey(9, 7);
    let out = Interference
        .invoke(&data, &src, FrameContext::new(2, 5), &BufferPool::default())
        .unwrap();
    assert_eq!(out, src);
}

#[test]
fn unjittered_gratings_split_the_half_turn() {
    let g = gratings(4, 0.0, 1);
    assert_eq!(g.len(), 4);
    for (k, v) in g.iter().enumerate() {
        assert!((v.hypot() - 1.0).abs() < 1e-12);
        let expected = std::f64::consts::PI * k as f64 / 4.0;
        assert!((v.atan2() - expected).abs() < 1e-12);
    }
    let jittered = gratings(4, 10.0, 1);
    assert_eq!(jittered, gratings(4, 10.0, 1));
    assert_ne!(jittered, g);
}

#[test]
fn fringes_brighten_under_screen_and_keep_alpha() {
    let data = prepare(json!({ "strength": 1.0, "color": "#FFFFFF" }));
    let src = grey(12, 12);
    let out = Interference
        .invoke(&data, &src, FrameContext::new(0, 10), &BufferPool::default())
        .unwrap();
    let mut changed = false;
    for (o, s) in out.data.chunks_exact(4).zip(src.data.chunks_exact(4)) {
        assert!(o[0] >= s[0]);
        assert_eq!(o[3], s[3]);
        changed |= o[0] != s[0];
    }
    assert!(changed);
}

#[test]
fn malformed_color_falls_back_to_white() {
    let data = prepare(json!({ "color": "#12" }));
    assert_eq!(data.color, [255.0; 3]);
    assert_eq!(data.blend, BlendMode::Screen);
}

#[test]
fn warp_only_closes_over_the_loop() {
    let data = prepare(json!({ "strength": 0, "warp": 3, "rotation_cycles": 1.6 }));
    let mut src = grey(12, 10);
    for (i, px) in src.data.chunks_exact_mut(4).enumerate() {
        px[0] = (i * 7 % 256) as u8;
    }
    let pool = BufferPool::default();
    let a = Interference.invoke(&data, &src, FrameContext::new(0, 6), &pool).unwrap();
    let b = Interference.invoke(&data, &src, FrameContext::new(6, 6), &pool).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, src);
}
