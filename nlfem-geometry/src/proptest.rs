//! Strategies for property-based tests of geometric primitives.
use crate::AxisAlignedBoundingBox;
use nalgebra::{Point2, Point3, U2, U3};
use proptest::prelude::*;

// Coordinates are kept in a moderate range so that distances stay well conditioned
fn coordinate() -> impl Strategy<Value = f64> {
    -10.0..10.0
}

pub fn point2() -> impl Strategy<Value = Point2<f64>> {
    [coordinate(), coordinate()].prop_map(|[x, y]| Point2::new(x, y))
}

pub fn point3() -> impl Strategy<Value = Point3<f64>> {
    [coordinate(), coordinate(), coordinate()].prop_map(|[x, y, z]| Point3::new(x, y, z))
}

pub fn aabb2() -> impl Strategy<Value = AxisAlignedBoundingBox<f64, U2>> {
    (point2(), [0.0..5.0f64, 0.0..5.0f64]).prop_map(|(min, [w, h])| {
        AxisAlignedBoundingBox::new(min.coords, min.coords + nalgebra::vector![w, h])
    })
}

pub fn aabb3() -> impl Strategy<Value = AxisAlignedBoundingBox<f64, U3>> {
    (point3(), [0.0..5.0f64, 0.0..5.0f64, 0.0..5.0f64]).prop_map(|(min, [w, h, d])| {
        AxisAlignedBoundingBox::new(min.coords, min.coords + nalgebra::vector![w, h, d])
    })
}
