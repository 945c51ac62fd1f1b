use serde_json::json;

use super::*;
use crate::fx::{effect::StaticSettings, registry::EffectRegistry};

fn checker(w: u32, h: u32) -> Frame {
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            let v = if (x + y) % 2 == 0 { 220 } else { 30 };
            data.extend_from_slice(&[v, v / 2, 255 - v, 200]);
        }
    }
    Frame::new(w, h, data).unwrap()
}

#[test]
fn memory_layer_reports_info_and_exchanges_png() {
    let mut layer = MemoryLayer::new(checker(3, 2));
    assert_eq!(
        layer.info(),
        LayerInfo {
            width: 3,
            height: 2
        }
    );
    let bytes = layer.to_buffer().unwrap();
    layer.from_buffer(&bytes).unwrap();
    assert_eq!(layer.frame(), &checker(3, 2));
    assert!(layer.from_buffer(b"junk").is_err());
}

#[test]
fn opacity_scales_alpha_only() {
    let mut layer = MemoryLayer::new(Frame::filled(2, 2, [10, 20, 30, 200]));
    layer.adjust_layer_opacity(0.5);
    assert_eq!(layer.frame().pixel(1, 1), [10, 20, 30, 100]);

    layer.adjust_layer_opacity(7.0);
    assert_eq!(layer.frame().pixel(0, 0), [10, 20, 30, 100]);

    layer.adjust_layer_opacity(0.0);
    assert!(layer.frame().data.chunks_exact(4).all(|p| p[3] == 0));
}

#[test]
fn apply_to_layer_writes_effect_output_back() {
    let reg = EffectRegistry::builtin();
    let inst = reg
        .instantiate(
            "vignette",
            &json!({ "strength": 1.0 }),
            StaticSettings::default(),
        )
        .unwrap();
    let pool = BufferPool::default();
    let src = checker(8, 8);
    let mut layer = MemoryLayer::new(src.clone());

    apply_to_layer(&inst, &mut layer, &PngCodec, &pool, 0, 10).unwrap();
    let expected = inst.invoke(&src, 0, 10, &pool).unwrap();
    assert_eq!(layer.frame(), &expected);
    assert_eq!(pool.stats().live_loans, 0);
}

#[test]
fn apply_to_layer_error_leaves_layer_untouched() {
    struct Broken;
    impl Layer for Broken {
        fn info(&self) -> LayerInfo {
            LayerInfo {
                width: 1,
                height: 1,
            }
        }
        fn to_buffer(&self) -> LoopFxResult<Vec<u8>> {
            Ok(b"nope".to_vec())
        }
        fn from_buffer(&mut self, _bytes: &[u8]) -> LoopFxResult<()> {
            panic!("must not be written");
        }
        fn adjust_layer_opacity(&mut self, _factor: f64) {}
    }

    let reg = EffectRegistry::builtin();
    let inst = reg
        .instantiate("grain", &serde_json::Value::Null, StaticSettings::default())
        .unwrap();
    let pool = BufferPool::default();
    assert!(apply_to_layer(&inst, &mut Broken, &PngCodec, &pool, 0, 4).is_err());
}
