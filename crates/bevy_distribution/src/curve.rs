//! Keyframed curves and color gradients used as distribution payloads.

use std::fmt::Debug;
use std::marker::PhantomData;

use bevy::prelude::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Keys closer than this are treated as sharing a timestamp.
const TIME_EPSILON: f32 = 1e-6;

// ---------------------------------------------------------------------------
// Interp: easing between two keys
// ---------------------------------------------------------------------------

/// Interpolation mode between keyframes.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Reflect)]
pub enum Interp {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    Constant,
}

impl Interp {
    pub const ALL: [Interp; 5] = [
        Interp::Linear,
        Interp::EaseIn,
        Interp::EaseOut,
        Interp::EaseInOut,
        Interp::Constant,
    ];

    /// Apply easing to a linear factor `t` in [0..1].
    pub fn ease(&self, t: f32) -> f32 {
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            // Hold the left key until the next one.
            Self::Constant => 0.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Linear => "Linear",
            Self::EaseIn => "Ease in",
            Self::EaseOut => "Ease out",
            Self::EaseInOut => "Ease in/out",
            Self::Constant => "Step",
        }
    }
}

/// Locate the segment containing `t` in a sorted list of key times.
///
/// Returns `Ok(i)` when `t` sits exactly on key `i`, or `Err((a, frac))` when it
/// falls strictly between keys `a` and `a + 1`. Callers handle the clamped
/// ends and the empty case themselves.
fn locate(times: impl Iterator<Item = f32>, t: f32) -> Result<usize, (usize, f32)> {
    let mut prev: Option<(usize, f32)> = None;
    for (i, time) in times.enumerate() {
        if (time - t).abs() <= TIME_EPSILON {
            return Ok(i);
        }
        if time > t {
            return match prev {
                Some((a, a_time)) => {
                    let span = time - a_time;
                    if span.abs() < TIME_EPSILON {
                        Ok(a)
                    } else {
                        Err((a, (t - a_time) / span))
                    }
                }
                None => Ok(0),
            };
        }
        prev = Some((i, time));
    }
    Ok(prev.map(|(i, _)| i).unwrap_or(0))
}

// ---------------------------------------------------------------------------
// Curve<T>: keyframed value over normalized time [0..1]
// ---------------------------------------------------------------------------

/// A keyframed curve mapping normalized time [0..1] to a value.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Reflect)]
pub struct Curve<T: Clone + PartialEq + Reflect> {
    pub keys: Vec<CurveKey<T>>,
}

/// Single keyframe in a curve.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Reflect)]
pub struct CurveKey<T: Clone + PartialEq + Reflect> {
    /// Normalized time (0.0 - 1.0).
    pub time: f32,
    /// Value at this keyframe.
    pub value: T,
    /// Interpolation mode to the next key.
    pub interp: Interp,
}

impl Curve<f32> {
    /// Create a flat curve with keys at both ends, so it can be dragged in an editor.
    pub fn constant(value: f32) -> Self {
        Self::linear(value, value)
    }

    /// Create a linear ramp from `start` to `end`.
    pub fn linear(start: f32, end: f32) -> Self {
        Self {
            keys: vec![
                CurveKey {
                    time: 0.0,
                    value: start,
                    interp: Interp::Linear,
                },
                CurveKey {
                    time: 1.0,
                    value: end,
                    interp: Interp::Linear,
                },
            ],
        }
    }

    /// Sample the curve at normalized time `t` (clamped to [0..1]).
    pub fn sample(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match locate(self.keys.iter().map(|k| k.time), t) {
            Ok(i) => self.keys.get(i).map(|k| k.value).unwrap_or(0.0),
            Err((a, frac)) => {
                let (a, b) = (&self.keys[a], &self.keys[a + 1]);
                a.value + (b.value - a.value) * a.interp.ease(frac)
            }
        }
    }

    /// Minimum and maximum key values, for framing a preview.
    pub fn value_range(&self) -> Option<(f32, f32)> {
        self.keys.iter().map(|k| k.value).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    /// Sort keys by time. Editors call this after the user drags a key past a neighbor.
    pub fn sort_keys(&mut self) {
        self.keys.sort_by(|a, b| a.time.total_cmp(&b.time));
    }
}

impl Default for Curve<f32> {
    fn default() -> Self {
        Self::constant(0.0)
    }
}

// ---------------------------------------------------------------------------
// CompoundCurve<V>: one scalar curve per vector axis
// ---------------------------------------------------------------------------

/// Vector types that can be stored in a [`CompoundCurve`].
pub trait CurveVector:
    Copy + Default + PartialEq + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Number of axes.
    const AXES: usize;

    fn axis(&self, index: usize) -> f32;

    fn set_axis(&mut self, index: usize, value: f32);
}

impl CurveVector for Vec2 {
    const AXES: usize = 2;

    fn axis(&self, index: usize) -> f32 {
        self[index]
    }

    fn set_axis(&mut self, index: usize, value: f32) {
        self[index] = value;
    }
}

impl CurveVector for Vec3 {
    const AXES: usize = 3;

    fn axis(&self, index: usize) -> f32 {
        self[index]
    }

    fn set_axis(&mut self, index: usize, value: f32) {
        self[index] = value;
    }
}

/// A keyframed vector curve holding one [`Curve<f32>`] per axis.
///
/// Axes keep their own key times and easing, so an axis can gain a key
/// without reshaping the others. There are always exactly `V::AXES` axes.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(bound = "", from = "CompoundAxes")]
pub struct CompoundCurve<V: CurveVector> {
    axes: Vec<Curve<f32>>,
    #[serde(skip)]
    vector: PhantomData<V>,
}

/// Serialized form of a [`CompoundCurve`]; normalized to the axis count on load.
#[derive(Deserialize)]
struct CompoundAxes {
    axes: Vec<Curve<f32>>,
}

impl<V: CurveVector> From<CompoundAxes> for CompoundCurve<V> {
    fn from(raw: CompoundAxes) -> Self {
        Self::from_axes(raw.axes)
    }
}

/// Two-axis compound curve.
pub type Vector2Curve = CompoundCurve<Vec2>;
/// Three-axis compound curve.
pub type Vector3Curve = CompoundCurve<Vec3>;

impl<V: CurveVector> CompoundCurve<V> {
    /// Build from per-axis curves. Missing axes are empty; extra curves are dropped.
    pub fn from_axes(mut axes: Vec<Curve<f32>>) -> Self {
        axes.truncate(V::AXES);
        axes.resize_with(V::AXES, || Curve { keys: Vec::new() });
        Self {
            axes,
            vector: PhantomData,
        }
    }

    /// A curve with no keys on any axis; samples to the zero vector.
    pub fn empty() -> Self {
        Self::from_axes(Vec::new())
    }

    /// Flat curve holding `value` across [0..1].
    pub fn constant(value: V) -> Self {
        Self::linear(value, value)
    }

    /// Linear ramp from `start` to `end` on every axis.
    pub fn linear(start: V, end: V) -> Self {
        Self::from_axes(
            (0..V::AXES)
                .map(|i| Curve::linear(start.axis(i), end.axis(i)))
                .collect(),
        )
    }

    pub fn axes(&self) -> &[Curve<f32>] {
        &self.axes
    }

    /// Curve of one axis, if `index` is in range.
    pub fn axis(&self, index: usize) -> Option<&Curve<f32>> {
        self.axes.get(index)
    }

    pub fn is_empty(&self) -> bool {
        self.axes.iter().all(|curve| curve.keys.is_empty())
    }

    /// Sample every axis at normalized time `t` (clamped to [0..1]).
    pub fn sample(&self, t: f32) -> V {
        let mut out = V::default();
        for (i, curve) in self.axes.iter().enumerate() {
            out.set_axis(i, curve.sample(t));
        }
        out
    }
}

impl<V: CurveVector> Default for CompoundCurve<V> {
    fn default() -> Self {
        Self::constant(V::default())
    }
}

// ---------------------------------------------------------------------------
// Gradient: color over normalized time [0..1]
// ---------------------------------------------------------------------------

/// A color gradient mapping normalized time [0..1] to an RGBA color.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Reflect)]
pub struct Gradient {
    pub keys: Vec<GradientKey>,
}

/// Single color stop in a gradient.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Reflect)]
pub struct GradientKey {
    /// Normalized time (0.0 - 1.0).
    pub time: f32,
    /// RGBA color at this stop.
    pub color: LinearRgba,
}

impl Gradient {
    /// White fading to transparent white.
    pub fn white_to_transparent() -> Self {
        Self {
            keys: vec![
                GradientKey {
                    time: 0.0,
                    color: LinearRgba::WHITE,
                },
                GradientKey {
                    time: 1.0,
                    color: LinearRgba::new(1.0, 1.0, 1.0, 0.0),
                },
            ],
        }
    }

    /// Single-stop gradient holding one color.
    pub fn constant(color: LinearRgba) -> Self {
        Self {
            keys: vec![GradientKey { time: 0.0, color }],
        }
    }

    /// Sample the gradient at normalized time `t` (clamped to [0..1]).
    pub fn sample(&self, t: f32) -> LinearRgba {
        if self.keys.is_empty() {
            return LinearRgba::WHITE;
        }
        let t = t.clamp(0.0, 1.0);
        match locate(self.keys.iter().map(|k| k.time), t) {
            Ok(i) => self.keys[i].color,
            Err((a, frac)) => lerp_color(self.keys[a].color, self.keys[a + 1].color, frac),
        }
    }

    /// Sort stops by time.
    pub fn sort_keys(&mut self) {
        self.keys.sort_by(|a, b| a.time.total_cmp(&b.time));
    }
}

impl Default for Gradient {
    fn default() -> Self {
        Self::white_to_transparent()
    }
}

/// Linearly interpolate between two colors.
pub fn lerp_color(a: LinearRgba, b: LinearRgba, t: f32) -> LinearRgba {
    LinearRgba::new(
        a.red + (b.red - a.red) * t,
        a.green + (b.green - a.green) * t,
        a.blue + (b.blue - a.blue) * t,
        a.alpha + (b.alpha - a.alpha) * t,
    )
}
