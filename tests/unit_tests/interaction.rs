use matrixcompare::assert_scalar_eq;
use nalgebra::Point2;
use nlfem::interaction::{smooth_step, InteractionKernel};
use proptest::prelude::*;

/// Integrates `f` over `[a, b]` with a composite Gauss rule.
fn integrate_1d(a: f64, b: f64, f: impl Fn(f64) -> f64) -> f64 {
    let (weights, points) = nlfem_quadrature::univariate::gauss(8);
    let num_intervals = 16;
    let h = (b - a) / num_intervals as f64;
    let mut integral = 0.0;
    for k in 0..num_intervals {
        let left = a + k as f64 * h;
        for (w, [xi]) in weights.iter().zip(&points) {
            integral += 0.5 * h * w * f(left + 0.5 * h * (xi + 1.0));
        }
    }
    integral
}

/// `K * int U(d) * gamma(r) * r^2 dA` for a neighborhood centered at the origin in 2D.
fn radial_second_moment(kernel: InteractionKernel, kappa: f64, delta: f64, eps: f64) -> f64 {
    let k = kernel.kernel(kappa, delta, eps);
    let origin = Point2::origin();
    let integrand = |r: f64| {
        let d = kernel.interface_distance(&origin, &Point2::new(r, 0.0), delta);
        let gamma = kernel.singular_weight(r).unwrap_or(0.0);
        smooth_step(d, eps) * gamma * r * r * 2.0 * std::f64::consts::PI * r
    };
    // Split at the band so that every piece is polynomial
    k * (integrate_1d(0.0, delta - eps, &integrand) + integrate_1d(delta - eps, delta + eps, &integrand))
}

#[test]
fn smooth_step_endpoints() {
    let eps = 0.25;
    assert_eq!(smooth_step(-eps, eps), 0.0);
    assert_eq!(smooth_step(-1.0, eps), 0.0);
    assert_eq!(smooth_step(eps, eps), 1.0);
    assert_eq!(smooth_step(3.0, eps), 1.0);
    assert_scalar_eq!(smooth_step(0.0, eps), 0.5, comp = abs, tol = 1e-15);
}

#[test]
fn smooth_step_matches_odd_polynomial() {
    let eps = 0.5;
    for i in 0..=20 {
        let t = -1.0 + 0.1 * i as f64;
        let expected = 0.5 + 315.0 / 256.0 * t - 105.0 / 64.0 * t.powi(3) + 189.0 / 128.0 * t.powi(5)
            - 45.0 / 64.0 * t.powi(7)
            + 35.0 / 256.0 * t.powi(9);
        assert_scalar_eq!(smooth_step(t * eps, eps), expected, comp = abs, tol = 1e-13);
    }
}

#[test]
fn ball_kernels_normalize_second_moment() {
    for &(delta, eps) in &[(1.0, 0.25), (0.3, 0.01), (2.0, 1.0)] {
        for kernel in [InteractionKernel::Ball, InteractionKernel::BallOrderTwo] {
            let moment = radial_second_moment(kernel, 1.5, delta, eps);
            assert_scalar_eq!(moment, 3.0, comp = abs, tol = 1e-10);
        }
    }
}

#[test]
fn ball_area_includes_smoothing_correction() {
    let (delta, eps): (f64, f64) = (1.0, 0.5);
    let origin = Point2::origin();
    let area = integrate_1d(0.0, delta - eps, |r| 2.0 * std::f64::consts::PI * r)
        + integrate_1d(delta - eps, delta + eps, |r| {
            let d = InteractionKernel::Ball.interface_distance(&origin, &Point2::new(r, 0.0), delta);
            smooth_step(d, eps) * 2.0 * std::f64::consts::PI * r
        });
    assert_scalar_eq!(InteractionKernel::Ball.area(delta, eps), area, comp = abs, tol = 1e-12);
}

#[test]
fn box_kernel_normalizes_sharp_second_moment() {
    // K * int_{[-delta, delta]^2} |y|^2 dy = K * 8 delta^4 / 3
    let delta: f64 = 0.7;
    let k = InteractionKernel::Box.kernel(2.0, delta, 0.1);
    assert_scalar_eq!(k * 8.0 * delta.powi(4) / 3.0, 4.0, comp = abs, tol = 1e-12);
    assert_scalar_eq!(InteractionKernel::Box.area(delta, 0.1), delta * delta, comp = abs, tol = 1e-15);
}

#[test]
fn box_distance_uses_chebyshev_neighborhood() {
    let center = Point2::new(1.0, 1.0);
    let kernel = InteractionKernel::Box;
    assert_scalar_eq!(kernel.interface_distance(&center, &Point2::new(1.4, 1.0), 0.5), 0.1, comp = abs, tol = 1e-14);
    assert_scalar_eq!(kernel.interface_distance(&center, &Point2::new(1.4, 1.4), 0.5), 0.1, comp = abs, tol = 1e-14);
    assert!(kernel.interface_distance(&center, &Point2::new(1.6, 1.0), 0.5) < 0.0);
    // The ball excludes the corner of the box
    assert!(InteractionKernel::Ball.interface_distance(&center, &Point2::new(1.4, 1.4), 0.5) < 0.0);
}

#[test]
fn singular_weight() {
    assert_eq!(InteractionKernel::Ball.singular_weight(0.0), Some(1.0));
    assert_eq!(InteractionKernel::Box.singular_weight(0.0), Some(1.0));
    assert_eq!(InteractionKernel::BallOrderTwo.singular_weight(0.0), None);
    assert_eq!(InteractionKernel::BallOrderTwo.singular_weight(0.5), Some(2.0));
}

#[test]
fn default_kernel_is_ball() {
    assert_eq!(InteractionKernel::default(), InteractionKernel::Ball);
}

proptest! {
    #[test]
    fn smooth_step_is_monotone(a in -2.0..2.0f64, b in -2.0..2.0f64, eps in 0.01..1.0f64) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(smooth_step(lo, eps) <= smooth_step(hi, eps));
    }

    #[test]
    fn smooth_step_is_antisymmetric_about_one_half(d in -2.0..2.0f64, eps in 0.01..1.0f64) {
        prop_assert!((smooth_step(d, eps) + smooth_step(-d, eps) - 1.0).abs() <= 1e-14);
    }

    #[test]
    fn smooth_step_is_strictly_between_zero_and_one_inside_band(t in -0.99..0.99f64, eps in 0.01..1.0f64) {
        let u = smooth_step(t * eps, eps);
        prop_assert!(u > 0.0 && u < 1.0);
    }

    #[test]
    fn kernel_constant_decreases_with_smoothing(kernel in any::<InteractionKernel>(), delta in 0.1..2.0f64, r in 0.0..0.9f64) {
        let sharp = kernel.kernel(1.0, delta, 0.0);
        let smooth = kernel.kernel(1.0, delta, r * delta);
        prop_assert!(smooth <= sharp);
        prop_assert!(smooth > 0.0);
    }
}
