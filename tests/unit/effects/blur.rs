use super::*;

#[test]
fn blur_radius_0_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    let mut tmp = vec![0u8; 8];
    let mut out = vec![0u8; 8];
    box_blur(&src, &mut tmp, &mut out, 1, 2, 4, 0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_constant_image_is_identity() {
    let (w, h) = (4u32, 3u32);
    let px = [10u8, 20u8, 30u8];
    let src = px.repeat((w * h) as usize);
    let mut tmp = vec![0u8; src.len()];
    let mut out = vec![0u8; src.len()];
    box_blur(&src, &mut tmp, &mut out, w, h, 3, 3).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_window_averages_with_clamped_edges() {
    // One row, one channel: [0, 0, 90, 0, 0], radius 1 → [0, 30, 30, 30, 0].
    let src = vec![0u8, 0, 90, 0, 0];
    let mut tmp = vec![0u8; 5];
    let mut out = vec![0u8; 5];
    box_blur(&src, &mut tmp, &mut out, 5, 1, 1, 1).unwrap();
    assert_eq!(out, vec![0, 30, 30, 30, 0]);

    // Edge clamping repeats the border value: [90, 0, 0], radius 1 → [60, 30, 0].
    let src = vec![90u8, 0, 0];
    let mut tmp = vec![0u8; 3];
    let mut out = vec![0u8; 3];
    box_blur(&src, &mut tmp, &mut out, 3, 1, 1, 1).unwrap();
    assert_eq!(out, vec![60, 30, 0]);
}

#[test]
fn blur_spreads_energy_from_single_pixel() {
    let (w, h) = (5u32, 5u32);
    let mut src = vec![0u8; (w * h) as usize];
    src[12] = 225;
    let mut tmp = vec![0u8; src.len()];
    let mut out = vec![0u8; src.len()];
    box_blur(&src, &mut tmp, &mut out, w, h, 1, 1).unwrap();

    let nonzero = out.iter().filter(|&&v| v != 0).count();
    assert_eq!(nonzero, 9);
    assert_eq!(out[12], 25);
}

#[test]
fn blur_rejects_mismatched_buffers() {
    let src = vec![0u8; 12];
    let mut tmp = vec![0u8; 11];
    let mut out = vec![0u8; 12];
    assert!(box_blur(&src, &mut tmp, &mut out, 2, 2, 3, 1).is_err());
}

#[test]
fn luma_weights_sum_to_one() {
    assert!((luma(255, 255, 255) - 1.0).abs() < 1e-12);
    assert_eq!(luma(0, 0, 0), 0.0);
    assert!(luma(0, 255, 0) > luma(255, 0, 0));
}

#[test]
fn bright_pass_masks_dark_pixels() {
    let src = vec![250, 250, 250, 255, 10, 10, 10, 255];
    let mut dst = vec![7u8; 6];
    let lit = bright_pass(&src, &mut dst, 0.5).unwrap();
    assert_eq!(lit, 1);
    assert_eq!(dst, vec![250, 250, 250, 0, 0, 0]);
}

#[test]
fn add_glow_saturates_and_keeps_alpha() {
    let mut dst = vec![200, 10, 0, 42];
    add_glow(&mut dst, &[100, 20, 0], 1.0).unwrap();
    assert_eq!(dst, vec![255, 30, 0, 42]);

    let before = dst.clone();
    add_glow(&mut dst, &[255, 255, 255], 0.0).unwrap();
    assert_eq!(dst, before);
}
