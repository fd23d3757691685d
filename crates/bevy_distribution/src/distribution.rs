//! Property distributions: values authored as a constant, a random range, a
//! curve over normalized time, or a random range between two curves.
//!
//! Distributions are immutable. Editing one means building a new value with
//! one of the constructors and assigning it back to whatever owns it.

use std::fmt::Debug;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::curve::{CompoundCurve, Curve, Gradient, lerp_color};

/// A value type that can be stored in a [`PropertyDistribution`].
pub trait DistributionValue: Clone + PartialEq + Debug + Send + Sync + 'static {
    /// Time-varying form of the value: a scalar curve, a compound vector curve
    /// or a gradient.
    type Curve: Clone + PartialEq + Debug + Send + Sync + 'static;

    /// Blend between `min` and `max` by `factor` in [0..1].
    fn lerp(min: &Self, max: &Self, factor: f32) -> Self;

    /// Sample `curve` at normalized time `t`.
    fn sample_curve(curve: &Self::Curve, t: f32) -> Self;

    /// A flat curve holding `value`, used when switching a constant to a curve.
    fn flat_curve(value: &Self) -> Self::Curve;
}

impl DistributionValue for f32 {
    type Curve = Curve<f32>;

    fn lerp(min: &Self, max: &Self, factor: f32) -> Self {
        *min + (*max - *min) * factor
    }

    fn sample_curve(curve: &Self::Curve, t: f32) -> Self {
        curve.sample(t)
    }

    fn flat_curve(value: &Self) -> Self::Curve {
        Curve::constant(*value)
    }
}

impl DistributionValue for Vec2 {
    type Curve = CompoundCurve<Vec2>;

    fn lerp(min: &Self, max: &Self, factor: f32) -> Self {
        min.lerp(*max, factor)
    }

    fn sample_curve(curve: &Self::Curve, t: f32) -> Self {
        curve.sample(t)
    }

    fn flat_curve(value: &Self) -> Self::Curve {
        CompoundCurve::constant(*value)
    }
}

impl DistributionValue for Vec3 {
    type Curve = CompoundCurve<Vec3>;

    fn lerp(min: &Self, max: &Self, factor: f32) -> Self {
        min.lerp(*max, factor)
    }

    fn sample_curve(curve: &Self::Curve, t: f32) -> Self {
        curve.sample(t)
    }

    fn flat_curve(value: &Self) -> Self::Curve {
        CompoundCurve::constant(*value)
    }
}

impl DistributionValue for LinearRgba {
    type Curve = Gradient;

    fn lerp(min: &Self, max: &Self, factor: f32) -> Self {
        lerp_color(*min, *max, factor)
    }

    fn sample_curve(curve: &Self::Curve, t: f32) -> Self {
        curve.sample(t)
    }

    fn flat_curve(value: &Self) -> Self::Curve {
        Gradient::constant(*value)
    }
}

/// Which of the four forms a distribution takes.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Reflect)]
pub enum DistributionType {
    #[default]
    Constant,
    RandomRange,
    Curve,
    RandomCurveRange,
}

impl DistributionType {
    pub const ALL: [DistributionType; 4] = [
        DistributionType::Constant,
        DistributionType::RandomRange,
        DistributionType::Curve,
        DistributionType::RandomCurveRange,
    ];

    /// Menu label. Color fields call their curves gradients.
    pub fn label(&self, gradient: bool) -> &'static str {
        match (self, gradient) {
            (Self::Constant, _) => "Constant",
            (Self::RandomRange, _) => "Range",
            (Self::Curve, false) => "Curve",
            (Self::Curve, true) => "Gradient",
            (Self::RandomCurveRange, false) => "Curve range",
            (Self::RandomCurveRange, true) => "Gradient range",
        }
    }

    /// Whether this form stores curves rather than constants.
    pub fn is_curve(&self) -> bool {
        matches!(self, Self::Curve | Self::RandomCurveRange)
    }
}

/// A value that is a constant, a random range, a curve, or a random range
/// between two curves.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(bound(
    serialize = "T: Serialize, T::Curve: Serialize",
    deserialize = "T: Deserialize<'de>, T::Curve: Deserialize<'de>"
))]
pub enum PropertyDistribution<T: DistributionValue> {
    Constant(T),
    RandomRange { min: T, max: T },
    Curve(T::Curve),
    RandomCurveRange { min: T::Curve, max: T::Curve },
}

pub type FloatDistribution = PropertyDistribution<f32>;
pub type Vector2Distribution = PropertyDistribution<Vec2>;
pub type Vector3Distribution = PropertyDistribution<Vec3>;
pub type ColorDistribution = PropertyDistribution<LinearRgba>;

impl<T: DistributionValue> PropertyDistribution<T> {
    pub fn constant(value: T) -> Self {
        Self::Constant(value)
    }

    pub fn range(min: T, max: T) -> Self {
        Self::RandomRange { min, max }
    }

    pub fn curve(curve: T::Curve) -> Self {
        Self::Curve(curve)
    }

    pub fn curve_range(min: T::Curve, max: T::Curve) -> Self {
        Self::RandomCurveRange { min, max }
    }

    pub fn distribution_type(&self) -> DistributionType {
        match self {
            Self::Constant(_) => DistributionType::Constant,
            Self::RandomRange { .. } => DistributionType::RandomRange,
            Self::Curve(_) => DistributionType::Curve,
            Self::RandomCurveRange { .. } => DistributionType::RandomCurveRange,
        }
    }

    /// Lower constant. A constant distribution reports its single value.
    pub fn min_constant(&self) -> Option<&T> {
        match self {
            Self::Constant(value) => Some(value),
            Self::RandomRange { min, .. } => Some(min),
            Self::Curve(_) | Self::RandomCurveRange { .. } => None,
        }
    }

    /// Upper constant. A constant distribution reports its single value.
    pub fn max_constant(&self) -> Option<&T> {
        match self {
            Self::Constant(value) => Some(value),
            Self::RandomRange { max, .. } => Some(max),
            Self::Curve(_) | Self::RandomCurveRange { .. } => None,
        }
    }

    /// Lower curve. A single-curve distribution reports its only curve.
    pub fn min_curve(&self) -> Option<&T::Curve> {
        match self {
            Self::Curve(curve) => Some(curve),
            Self::RandomCurveRange { min, .. } => Some(min),
            Self::Constant(_) | Self::RandomRange { .. } => None,
        }
    }

    /// Upper curve. A single-curve distribution reports its only curve.
    pub fn max_curve(&self) -> Option<&T::Curve> {
        match self {
            Self::Curve(curve) => Some(curve),
            Self::RandomCurveRange { max, .. } => Some(max),
            Self::Constant(_) | Self::RandomRange { .. } => None,
        }
    }

    /// Evaluate at normalized time `t`, blending ranges by `factor` in [0..1].
    pub fn evaluate(&self, t: f32, factor: f32) -> T {
        let factor = factor.clamp(0.0, 1.0);
        match self {
            Self::Constant(value) => value.clone(),
            Self::RandomRange { min, max } => T::lerp(min, max, factor),
            Self::Curve(curve) => T::sample_curve(curve, t),
            Self::RandomCurveRange { min, max } => {
                T::lerp(&T::sample_curve(min, t), &T::sample_curve(max, t), factor)
            }
        }
    }

    /// Evaluate at normalized time `t` with a random blend factor.
    pub fn sample(&self, t: f32) -> T {
        self.evaluate(t, fastrand::f32())
    }
}

impl<T: DistributionValue + Default> Default for PropertyDistribution<T> {
    fn default() -> Self {
        Self::Constant(T::default())
    }
}

impl<T: DistributionValue> From<T> for PropertyDistribution<T> {
    fn from(value: T) -> Self {
        Self::Constant(value)
    }
}
