use super::*;

#[test]
fn zero_total_is_coerced() {
    let ctx = FrameContext::new(5, 0);
    assert_eq!(ctx.total, 1);
    assert_eq!(ctx.loop_frame(), 0);
    assert_eq!(ctx.t(), 0.0);
}

#[test]
fn frames_fold_into_the_loop() {
    assert_eq!(FrameContext::new(53, 50).loop_frame(), 3);
    assert_eq!(FrameContext::new(50, 50).t(), FrameContext::new(0, 50).t());
    assert_eq!(FrameContext::new(25, 50).t(), 0.5);
}
