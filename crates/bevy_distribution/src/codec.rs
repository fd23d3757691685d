//! Conversion between compound vector curves and per-axis scalar curves.
//!
//! Curve editors only edit [`Curve<f32>`], so a vector curve is split into one
//! curve per axis before editing and combined back afterward.

use bevy::prelude::*;

use crate::curve::{CompoundCurve, Curve, CurveVector};

/// Split a compound curve into one scalar curve per axis.
///
/// Each output curve carries that axis's own key times, values and easing.
pub fn split_curve<V: CurveVector>(compound: &CompoundCurve<V>) -> Vec<Curve<f32>> {
    compound.axes().to_vec()
}

/// Combine per-axis scalar curves into a compound curve.
///
/// Every key of every input curve is kept on its own axis, so axes with
/// different key times keep their shape. Missing axes read as empty curves;
/// surplus curves are ignored.
pub fn combine_curve<V: CurveVector>(components: &[Curve<f32>]) -> CompoundCurve<V> {
    if components.len() > V::AXES {
        warn!(
            "Combining {} curves into a {}-axis curve; ignoring the extra curves",
            components.len(),
            V::AXES
        );
    }
    let axes = components.iter().take(V::AXES).cloned().collect();
    CompoundCurve::from_axes(axes)
}

pub fn split_curve_2d(compound: &CompoundCurve<Vec2>) -> Vec<Curve<f32>> {
    split_curve(compound)
}

pub fn split_curve_3d(compound: &CompoundCurve<Vec3>) -> Vec<Curve<f32>> {
    split_curve(compound)
}

pub fn combine_curve_2d(components: &[Curve<f32>]) -> CompoundCurve<Vec2> {
    combine_curve(components)
}

pub fn combine_curve_3d(components: &[Curve<f32>]) -> CompoundCurve<Vec3> {
    combine_curve(components)
}
