//! Per value kind edit dispatch.
//!
//! Constants and ranges open a value picker (the color picker for colors).
//! Curves open a curve editor for scalars, a per-component curve editor for
//! vectors and a gradient picker for colors.

use bevy::prelude::*;
use bevy_distribution::{
    CompoundCurve, CurveVector, DistributionValue, PropertyDistribution, combine_curve,
    split_curve,
};

use crate::field::{FieldClick, FieldError, RangeHalf};
use crate::session::{ModalRequest, ModalResult, PickerValue};

/// Builds the replacement distribution from an accepted modal result.
///
/// Returns `None` when the result does not fit the request.
pub type CloseHandler<T> =
    Box<dyn FnOnce(ModalResult) -> Option<PropertyDistribution<T>> + Send + Sync>;

/// A modal request together with what to do when it is accepted.
pub struct EditPlan<T: DistributionValue> {
    pub request: ModalRequest,
    pub on_close: CloseHandler<T>,
}

/// Options forwarded to the pickers.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PickerOptions {
    pub allow_hdr: bool,
}

/// A value kind that can be edited by a distribution field.
pub trait DistributionKind: DistributionValue + Default {
    /// Color fields label curve modes as gradients.
    const GRADIENT: bool = false;

    fn value_request(value: &Self, options: &PickerOptions) -> ModalRequest;

    fn from_value_result(result: ModalResult) -> Option<Self>;

    /// Plan the edit of a `Curve` or `RandomCurveRange` distribution.
    fn plan_curve_edit(
        distribution: &PropertyDistribution<Self>,
        click: FieldClick,
    ) -> Result<EditPlan<Self>, FieldError>;
}

/// Plan the edit of a `Constant` or `RandomRange` distribution.
pub fn plan_constant_edit<T: DistributionKind>(
    distribution: &PropertyDistribution<T>,
    click: FieldClick,
    options: &PickerOptions,
) -> Result<EditPlan<T>, FieldError> {
    match distribution {
        PropertyDistribution::Constant(value) => Ok(EditPlan {
            request: T::value_request(value, options),
            on_close: Box::new(|result| {
                T::from_value_result(result).map(PropertyDistribution::constant)
            }),
        }),
        PropertyDistribution::RandomRange { min, max } => {
            let half = click.half;
            let (edited, other) = match half {
                RangeHalf::Min => (min, max.clone()),
                RangeHalf::Max => (max, min.clone()),
            };
            Ok(EditPlan {
                request: T::value_request(edited, options),
                on_close: Box::new(move |result| {
                    let value = T::from_value_result(result)?;
                    Some(match half {
                        RangeHalf::Min => PropertyDistribution::range(value, other),
                        RangeHalf::Max => PropertyDistribution::range(other, value),
                    })
                }),
            })
        }
        other => Err(FieldError::NotApplicable(other.distribution_type())),
    }
}

impl DistributionKind for f32 {
    fn value_request(value: &Self, _options: &PickerOptions) -> ModalRequest {
        ModalRequest::ValuePicker {
            initial: PickerValue::Float(*value),
        }
    }

    fn from_value_result(result: ModalResult) -> Option<Self> {
        match result {
            ModalResult::Value(PickerValue::Float(v)) => Some(v),
            _ => None,
        }
    }

    fn plan_curve_edit(
        distribution: &PropertyDistribution<Self>,
        _click: FieldClick,
    ) -> Result<EditPlan<Self>, FieldError> {
        match distribution {
            PropertyDistribution::Curve(curve) => Ok(EditPlan {
                request: ModalRequest::CurveEditor {
                    curve: curve.clone(),
                },
                on_close: Box::new(|result| match result {
                    ModalResult::Curve(curve) => Some(PropertyDistribution::curve(curve)),
                    _ => None,
                }),
            }),
            PropertyDistribution::RandomCurveRange { min, max } => Ok(EditPlan {
                request: ModalRequest::CurveRangeEditor {
                    min: min.clone(),
                    max: max.clone(),
                },
                on_close: Box::new(|result| match result {
                    ModalResult::CurveRange(min, max) => {
                        Some(PropertyDistribution::curve_range(min, max))
                    }
                    _ => None,
                }),
            }),
            other => Err(FieldError::NotApplicable(other.distribution_type())),
        }
    }
}

fn plan_vector_curve_edit<V>(
    distribution: &PropertyDistribution<V>,
    click: FieldClick,
) -> Result<EditPlan<V>, FieldError>
where
    V: DistributionValue<Curve = CompoundCurve<V>> + CurveVector,
{
    let component = click.component.ok_or(FieldError::MissingComponent)?;

    match distribution {
        PropertyDistribution::Curve(compound) => {
            let mut curves = split_curve(compound);
            let Some(curve) = curves.get(component).cloned() else {
                return Err(FieldError::ComponentOutOfRange {
                    component,
                    components: curves.len(),
                });
            };
            Ok(EditPlan {
                request: ModalRequest::CurveEditor { curve },
                on_close: Box::new(move |result| {
                    let ModalResult::Curve(edited) = result else {
                        return None;
                    };
                    curves[component] = edited;
                    Some(PropertyDistribution::curve(combine_curve(&curves)))
                }),
            })
        }
        PropertyDistribution::RandomCurveRange { min, max } => {
            let mut min_curves = split_curve(min);
            let mut max_curves = split_curve(max);
            let components = min_curves.len().min(max_curves.len());
            if component >= components {
                return Err(FieldError::ComponentOutOfRange {
                    component,
                    components,
                });
            }
            Ok(EditPlan {
                request: ModalRequest::CurveRangeEditor {
                    min: min_curves[component].clone(),
                    max: max_curves[component].clone(),
                },
                on_close: Box::new(move |result| {
                    let ModalResult::CurveRange(edited_min, edited_max) = result else {
                        return None;
                    };
                    min_curves[component] = edited_min;
                    max_curves[component] = edited_max;
                    Some(PropertyDistribution::curve_range(
                        combine_curve(&min_curves),
                        combine_curve(&max_curves),
                    ))
                }),
            })
        }
        other => Err(FieldError::NotApplicable(other.distribution_type())),
    }
}

impl DistributionKind for Vec2 {
    fn value_request(value: &Self, _options: &PickerOptions) -> ModalRequest {
        ModalRequest::ValuePicker {
            initial: PickerValue::Vec2(*value),
        }
    }

    fn from_value_result(result: ModalResult) -> Option<Self> {
        match result {
            ModalResult::Value(PickerValue::Vec2(v)) => Some(v),
            _ => None,
        }
    }

    fn plan_curve_edit(
        distribution: &PropertyDistribution<Self>,
        click: FieldClick,
    ) -> Result<EditPlan<Self>, FieldError> {
        plan_vector_curve_edit(distribution, click)
    }
}

impl DistributionKind for Vec3 {
    fn value_request(value: &Self, _options: &PickerOptions) -> ModalRequest {
        ModalRequest::ValuePicker {
            initial: PickerValue::Vec3(*value),
        }
    }

    fn from_value_result(result: ModalResult) -> Option<Self> {
        match result {
            ModalResult::Value(PickerValue::Vec3(v)) => Some(v),
            _ => None,
        }
    }

    fn plan_curve_edit(
        distribution: &PropertyDistribution<Self>,
        click: FieldClick,
    ) -> Result<EditPlan<Self>, FieldError> {
        plan_vector_curve_edit(distribution, click)
    }
}

impl DistributionKind for LinearRgba {
    const GRADIENT: bool = true;

    fn value_request(value: &Self, options: &PickerOptions) -> ModalRequest {
        ModalRequest::ColorPicker {
            initial: *value,
            allow_hdr: options.allow_hdr,
        }
    }

    fn from_value_result(result: ModalResult) -> Option<Self> {
        match result {
            ModalResult::Color(color) => Some(color),
            _ => None,
        }
    }

    fn plan_curve_edit(
        distribution: &PropertyDistribution<Self>,
        click: FieldClick,
    ) -> Result<EditPlan<Self>, FieldError> {
        match distribution {
            PropertyDistribution::Curve(gradient) => Ok(EditPlan {
                request: ModalRequest::GradientPicker {
                    initial: gradient.clone(),
                },
                on_close: Box::new(|result| match result {
                    ModalResult::Gradient(gradient) => Some(PropertyDistribution::curve(gradient)),
                    _ => None,
                }),
            }),
            PropertyDistribution::RandomCurveRange { min, max } => {
                let half = click.half;
                let (edited, other) = match half {
                    RangeHalf::Min => (min.clone(), max.clone()),
                    RangeHalf::Max => (max.clone(), min.clone()),
                };
                Ok(EditPlan {
                    request: ModalRequest::GradientPicker { initial: edited },
                    on_close: Box::new(move |result| {
                        let ModalResult::Gradient(gradient) = result else {
                            return None;
                        };
                        Some(match half {
                            RangeHalf::Min => PropertyDistribution::curve_range(gradient, other),
                            RangeHalf::Max => PropertyDistribution::curve_range(other, gradient),
                        })
                    }),
                })
            }
            other => Err(FieldError::NotApplicable(other.distribution_type())),
        }
    }
}
