//! # bevy_distribution
//!
//! Values that may be a constant, a random range, a curve over normalized
//! time, or a random range between two curves. Particle systems and other
//! animated properties read them at runtime; editor fields author them.
//!
//! ```
//! use bevy_distribution::{Curve, FloatDistribution};
//!
//! let size = FloatDistribution::curve_range(Curve::linear(0.0, 1.0), Curve::constant(2.0));
//! assert_eq!(size.evaluate(0.5, 0.0), 0.5);
//! ```
//!
//! Vector curves are stored as [`CompoundCurve`]s and converted to and from
//! per-axis [`Curve<f32>`]s with [`split_curve`] and [`combine_curve`].

pub mod codec;
pub mod curve;
pub mod distribution;

pub use codec::{
    combine_curve, combine_curve_2d, combine_curve_3d, split_curve, split_curve_2d, split_curve_3d,
};
pub use curve::{
    CompoundCurve, Curve, CurveKey, CurveVector, Gradient, GradientKey, Interp,
    Vector2Curve, Vector3Curve,
};
pub use distribution::*;
