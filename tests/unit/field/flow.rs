use super::*;

fn ripple(amplitude: f64) -> RippleField {
    RippleField {
        center: Point::new(10.0, 10.0),
        half_diag: 14.142,
        frequency: 4.0,
        radial_cycles: 2.0,
        amplitude,
    }
}

#[test]
fn ripple_is_radial_and_bounded() {
    let f = ripple(3.0);
    let p = Point::new(16.0, 12.0);
    let d = polar_ripple(p, &f, 0.7);
    assert!(d.hypot() <= 3.0 + 1e-9);
    // Parallel to the radius vector.
    let r = p - f.center;
    assert!((d.cross(r)).abs() < 1e-9);
}

#[test]
fn ripple_vanishes_at_centre_and_zero_amplitude() {
    assert_eq!(polar_ripple(Point::new(10.0, 10.0), &ripple(5.0), 1.0), Vec2::ZERO);
    assert_eq!(polar_ripple(Point::new(3.0, 4.0), &ripple(0.0), 1.0), Vec2::ZERO);
}

#[test]
fn ripple_phase_is_periodic() {
    let f = ripple(2.0);
    let p = Point::new(4.0, 17.0);
    let a = polar_ripple(p, &f, 0.3);
    let b = polar_ripple(p, &f, 0.3 + TAU);
    assert!((a - b).hypot() < 1e-9);
}

#[test]
fn orbit_offsets_have_orbit_radius() {
    let offs = chromatic_orbit(
        Point::new(3.0, 1.0),
        Point::new(0.0, 0.0),
        0.5,
        &[0.0, 2.0, 4.0],
        2.5,
    );
    for o in offs {
        assert!((o.hypot() - 2.5).abs() < 1e-9);
    }
    assert!((offs[0] - offs[1]).hypot() > 1e-3);
}

#[test]
fn orbit_radius_zero_is_no_offset() {
    let offs = chromatic_orbit(Point::new(3.0, 1.0), Point::ZERO, 1.0, &[0.0, 1.0, 2.0], 0.0);
    assert_eq!(offs, [Vec2::ZERO; 3]);
}

#[test]
fn vortex_influence_falls_off_linearly_and_is_tangential() {
    let v = [Vortex {
        center: Point::new(0.0, 0.0),
        strength: 10.0,
    }];
    let near = vortex_flow(Point::new(2.0, 0.0), &v, 10.0);
    assert!((near.hypot() - 8.0).abs() < 1e-9);
    // Tangent to the +x radius is +y.
    assert!(near.x.abs() < 1e-9 && near.y > 0.0);

    let mid = vortex_flow(Point::new(0.0, 5.0), &v, 10.0);
    assert!((mid.hypot() - 5.0).abs() < 1e-9);

    assert_eq!(vortex_flow(Point::new(10.0, 0.0), &v, 10.0), Vec2::ZERO);
    assert_eq!(vortex_flow(Point::new(0.0, 0.0), &v, 10.0), Vec2::ZERO);
}

#[test]
fn vortices_superpose() {
    let a = Vortex {
        center: Point::new(0.0, 0.0),
        strength: 4.0,
    };
    let b = Vortex {
        center: Point::new(0.0, 0.0),
        strength: -4.0,
    };
    let d = vortex_flow(Point::new(1.0, 1.0), &[a, b], 10.0);
    assert!(d.hypot() < 1e-9);
}
