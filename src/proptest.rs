//! Strategies for property-based testing of elements, kernels and settings.
use ::proptest::prelude::*;
use nalgebra::{Point2, Vector2};

use crate::element::{Quad4d2Element, Tri3d2Element};
use crate::interaction::InteractionKernel;
use crate::settings::NonlocalSettings;

pub use nlfem_geometry::proptest::{point2, point3};

impl Arbitrary for InteractionKernel {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            Just(InteractionKernel::Ball),
            Just(InteractionKernel::Box),
            Just(InteractionKernel::BallOrderTwo)
        ]
        .boxed()
    }
}

impl Arbitrary for Tri3d2Element<f64> {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    /// Counter-clockwise triangles whose smallest angle is bounded away from zero.
    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        (point2(), 0.1..5.0f64, 0.0..std::f64::consts::TAU, 0.3..1.0f64, 0.5..2.5f64)
            .prop_map(|(a, length, angle, ratio, opening)| {
                let e1 = Vector2::new(angle.cos(), angle.sin());
                let e2 = Vector2::new(-e1.y, e1.x);
                let b = a + e1 * length;
                let c = a + (e1 * opening.cos() + e2 * opening.sin()) * (length * ratio);
                Tri3d2Element::from_vertices([a, b, c])
            })
            .boxed()
    }
}

impl Arbitrary for Quad4d2Element<f64> {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    /// Counter-clockwise parallelograms with a shear of at most one half.
    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        (point2(), 0.1..5.0f64, 0.1..5.0f64, -0.5..0.5f64)
            .prop_map(|(a, width, height, shear)| {
                let u = Vector2::new(width, 0.0);
                let v = Vector2::new(shear * height, height);
                Quad4d2Element::from_vertices([a, a + u, a + u + v, a + v])
            })
            .boxed()
    }
}

/// Settings with a single-level refinement and moderate parameters.
pub fn nonlocal_settings() -> impl Strategy<Value = NonlocalSettings<f64>> {
    (any::<InteractionKernel>(), 0.1..10.0f64, 0.05..2.0f64, 0.05..0.5f64, -5.0..5.0f64).prop_map(
        |(kernel, kappa, delta, relative_width, forcing)| {
            NonlocalSettings::new(kernel, kappa, delta)
                .with_smoothing_width(relative_width * delta)
                .with_forcing(forcing)
        },
    )
}

/// Points with both coordinates in `[-1, 1]`.
pub fn reference_point2() -> impl Strategy<Value = Point2<f64>> {
    [-1.0..=1.0f64, -1.0..=1.0f64].prop_map(|[x, y]| Point2::new(x, y))
}
