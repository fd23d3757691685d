use bevy::prelude::Vec3;
use bevy_distribution::{
    Curve, CurveKey, Interp, Vector2Curve, Vector3Curve, combine_curve_2d, combine_curve_3d,
    split_curve_2d, split_curve_3d,
};
use proptest::prelude::*;

fn interp() -> impl Strategy<Value = Interp> {
    prop::sample::select(Interp::ALL.to_vec())
}

/// Strictly increasing key times in [0..1], at least 1/64 apart.
fn key_times() -> impl Strategy<Value = Vec<f32>> {
    prop::collection::btree_set(0u32..=64, 0..8)
        .prop_map(|steps| steps.into_iter().map(|s| s as f32 / 64.0).collect())
}

/// One axis curve with its own key times.
fn axis_curve() -> impl Strategy<Value = Curve<f32>> {
    key_times().prop_flat_map(|times| {
        let n = times.len();
        (Just(times), prop::collection::vec((-100.0f32..100.0, interp()), n)).prop_map(
            |(times, keys)| Curve {
                keys: times
                    .into_iter()
                    .zip(keys)
                    .map(|(time, (value, interp))| CurveKey { time, value, interp })
                    .collect(),
            },
        )
    })
}

/// `n` axis curves whose key times generally differ.
fn axes(n: usize) -> impl Strategy<Value = Vec<Curve<f32>>> {
    prop::collection::vec(axis_curve(), n)
}

fn vector2_curve() -> impl Strategy<Value = Vector2Curve> {
    axes(2).prop_map(Vector2Curve::from_axes)
}

fn vector3_curve() -> impl Strategy<Value = Vector3Curve> {
    axes(3).prop_map(Vector3Curve::from_axes)
}

proptest! {
    #[test]
    fn combine_after_split_restores_2d(curve in vector2_curve()) {
        prop_assert_eq!(combine_curve_2d(&split_curve_2d(&curve)), curve);
    }

    #[test]
    fn combine_after_split_restores_3d(curve in vector3_curve()) {
        prop_assert_eq!(combine_curve_3d(&split_curve_3d(&curve)), curve);
    }

    #[test]
    fn split_after_combine_restores_2d_axes(axes in axes(2)) {
        prop_assert_eq!(split_curve_2d(&combine_curve_2d(&axes)), axes);
    }

    #[test]
    fn split_after_combine_restores_3d_axes(axes in axes(3)) {
        prop_assert_eq!(split_curve_3d(&combine_curve_3d(&axes)), axes);
    }

    #[test]
    fn split_axes_sample_like_the_compound(curve in vector3_curve(), t in 0.0f32..=1.0) {
        let axes = split_curve_3d(&curve);
        let v = curve.sample(t);
        prop_assert_eq!(axes[0].sample(t), v.x);
        prop_assert_eq!(axes[1].sample(t), v.y);
        prop_assert_eq!(axes[2].sample(t), v.z);
    }

    #[test]
    fn replacing_one_axis_keeps_the_others(
        curve in vector3_curve(),
        component in 0usize..3,
        replacement in axis_curve(),
        t in 0.0f32..=1.0,
    ) {
        let mut axes = split_curve_3d(&curve);
        axes[component] = replacement.clone();
        let edited = combine_curve_3d(&axes);

        let before = split_curve_3d(&curve);
        let after = split_curve_3d(&edited);
        for axis in (0..3).filter(|&a| a != component) {
            prop_assert_eq!(&after[axis], &before[axis]);
            prop_assert_eq!(after[axis].sample(t), before[axis].sample(t));
        }
        prop_assert_eq!(&after[component], &replacement);
    }
}

#[test]
fn editing_one_axis_leaves_the_others_alone() {
    let original = Vector3Curve::linear(Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0));
    let mut axes = split_curve_3d(&original);
    axes[1] = Curve::constant(7.0);

    let edited = split_curve_3d(&combine_curve_3d(&axes));
    let before = split_curve_3d(&original);
    assert_eq!(edited[0], before[0]);
    assert_eq!(edited[1], Curve::constant(7.0));
    assert_eq!(edited[2], before[2]);
}
