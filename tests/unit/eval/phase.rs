use super::*;

#[test]
fn resolve_picks_closest_integer_in_window() {
    assert_eq!(LoopCycles::resolve(2.3).get(), 2);
    assert_eq!(LoopCycles::resolve(2.7).get(), 3);
    assert_eq!(LoopCycles::resolve(7.0).get(), 7);
}

#[test]
fn resolve_never_returns_zero_for_nonzero_input() {
    assert_eq!(LoopCycles::resolve(0.3).get(), 1);
    assert_eq!(LoopCycles::resolve(0.01).get(), 1);
    assert_eq!(LoopCycles::resolve(-0.2).get(), -1);
}

#[test]
fn resolve_zero_and_non_finite_are_zero() {
    assert_eq!(LoopCycles::resolve(0.0).get(), 0);
    assert_eq!(LoopCycles::resolve(f64::NAN).get(), 0);
    assert_eq!(LoopCycles::resolve(f64::INFINITY).get(), 0);
}

#[test]
fn resolve_ties_go_to_smaller_count() {
    assert_eq!(LoopCycles::resolve(2.5).get(), 2);
    assert_eq!(LoopCycles::resolve(0.5).get(), 1);
}

#[test]
fn resolve_keeps_sign() {
    assert_eq!(LoopCycles::resolve(-2.6).get(), -3);
    assert_eq!(LoopCycles::resolve(-1.0).get(), -1);
}

#[test]
fn loop_steps_are_uniform_including_wraparound() {
    let total = 50u64;
    let cycles = LoopCycles::resolve(1.0);
    let expected = TAU / 50.0;
    assert!((expected - 0.1257).abs() < 1e-4);

    for f in 0..total {
        let a = cycles.phase(FrameContext::new(f, total));
        let b = cycles.phase(FrameContext::new((f + 1) % total, total));
        let step = phase_delta(a, b);
        assert!(
            (step - expected).abs() < 1e-9,
            "frame {f}: step {step} != {expected}"
        );
    }
}

#[test]
fn phases_are_distinct_and_in_range() {
    let total = 50u64;
    let cycles = LoopCycles::exact(1);
    let mut seen: Vec<f64> = (0..total)
        .map(|f| cycles.phase(FrameContext::new(f, total)))
        .collect();
    for &p in &seen {
        assert!((0.0..TAU).contains(&p));
    }
    seen.sort_by(|a, b| a.partial_cmp(b).unwrap());
    seen.dedup();
    assert_eq!(seen.len(), total as usize);
}

#[test]
fn frame_total_is_bit_identical_to_frame_zero() {
    for n in [-3i64, 1, 2, 5] {
        let c = LoopCycles::exact(n);
        assert_eq!(
            c.phase(FrameContext::new(0, 24)).to_bits(),
            c.phase(FrameContext::new(24, 24)).to_bits()
        );
    }
}

#[test]
fn negative_cycles_run_backwards() {
    let c = LoopCycles::exact(-1);
    let p1 = c.phase(FrameContext::new(1, 4));
    assert!((p1 - 3.0 * TAU / 4.0).abs() < 1e-12);
    assert!((c.step(4) - 3.0 * TAU / 4.0).abs() < 1e-12);
}

#[test]
fn phase_set_resolves_in_order() {
    let set = PhaseSet::resolve(
        &[LoopCycles::exact(1), LoopCycles::exact(2)],
        FrameContext::new(1, 8),
    );
    assert_eq!(set.len(), 2);
    assert!((set.get(0) - TAU / 8.0).abs() < 1e-12);
    assert!((set.get(1) - TAU / 4.0).abs() < 1e-12);
    assert_eq!(set.get(9), 0.0);
}

#[test]
fn zero_total_is_coerced() {
    let ctx = FrameContext::new(3, 0);
    assert_eq!(ctx.total, 1);
    assert_eq!(ctx.t(), 0.0);
}
