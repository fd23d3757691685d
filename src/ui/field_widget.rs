//! Inline egui rendering of distribution fields.
//!
//! The widget only reads the field. What the user did comes back as a
//! [`FieldAction`] for [`apply_field_action`], so the caller decides which
//! host serves the modals.

use bevy::prelude::*;
use bevy_distribution::{
    CompoundCurve, Curve, CurveVector, DistributionType, Gradient, PropertyDistribution,
};
use bevy_egui::egui;

use super::preview::{color_swatch, curve_plot, gradient_bar};
use super::theme::colors;
use crate::field::{DistributionField, FieldChange, FieldClick, FieldError, RangeHalf};
use crate::kinds::DistributionKind;
use crate::session::ModalEditHost;
use crate::settings::DistributionEditorSettings;

/// What the user did to a field this frame.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldAction<T> {
    /// Open the modal editor for part of the value.
    Click(FieldClick),
    /// Picked another type from the type menu.
    ChangeType(DistributionType),
    /// Dragged or typed an inline constant. `confirmed` is set on the frame
    /// the drag is released or the text field loses focus.
    SetConstant {
        half: RangeHalf,
        value: T,
        confirmed: bool,
    },
    /// Released an inline edit without changing the value that frame.
    Confirm,
}

/// Value kinds that know how to draw themselves inside a field.
pub trait FieldWidget: DistributionKind {
    fn constant_ui(
        ui: &mut egui::Ui,
        value: &Self,
        half: RangeHalf,
        speed: f64,
    ) -> Option<FieldAction<Self>>;

    /// Draw a curve, or both bounds of a curve range.
    fn curves_ui(
        ui: &mut egui::Ui,
        min: &Self::Curve,
        max: Option<&Self::Curve>,
        settings: &DistributionEditorSettings,
    ) -> Option<FieldClick>;
}

fn picker_button(ui: &mut egui::Ui) -> bool {
    ui.small_button("\u{2026}").on_hover_text("Open value picker").clicked()
}

/// How the inline drag values were used this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct DragState {
    changed: bool,
    released: bool,
}

impl DragState {
    fn of(response: &egui::Response) -> Self {
        Self {
            changed: response.changed(),
            released: response.drag_stopped() || response.lost_focus(),
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            changed: self.changed || other.changed,
            released: self.released || other.released,
        }
    }

    fn action<T>(self, half: RangeHalf, value: impl FnOnce() -> T) -> Option<FieldAction<T>> {
        match (self.changed, self.released) {
            (true, confirmed) => Some(FieldAction::SetConstant {
                half,
                value: value(),
                confirmed,
            }),
            (false, true) => Some(FieldAction::Confirm),
            (false, false) => None,
        }
    }
}

fn drag_axes<const N: usize>(
    ui: &mut egui::Ui,
    axes: &mut [f32; N],
    speed: f64,
) -> DragState {
    let mut state = DragState::default();
    for (i, axis) in axes.iter_mut().enumerate() {
        let prefix = ["x:", "y:", "z:"][i.min(2)];
        let response =
            ui.add(egui::DragValue::new(axis).speed(speed).prefix(prefix).max_decimals(3));
        state = state.merge(DragState::of(&response));
    }
    state
}

fn numeric_constant_ui<T, const N: usize>(
    ui: &mut egui::Ui,
    mut axes: [f32; N],
    half: RangeHalf,
    speed: f64,
    build: impl FnOnce([f32; N]) -> T,
) -> Option<FieldAction<T>> {
    let state = drag_axes(ui, &mut axes, speed);
    if picker_button(ui) {
        return Some(FieldAction::Click(FieldClick {
            half,
            component: None,
        }));
    }
    state.action(half, || build(axes))
}

fn vector_curves_ui<V: CurveVector>(
    ui: &mut egui::Ui,
    min: &CompoundCurve<V>,
    max: Option<&CompoundCurve<V>>,
    settings: &DistributionEditorSettings,
) -> Option<FieldClick> {
    let min_axes = min.axes();
    let max_axes = max.map(CompoundCurve::axes);
    let mut click = None;

    for (i, axis) in min_axes.iter().enumerate() {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(["x", "y", "z"][i.min(2)]).color(colors::axis(i)));
            let mut curves: Vec<(&Curve<f32>, egui::Color32)> = vec![(axis, colors::axis(i))];
            if let Some(other) = max_axes.and_then(|axes| axes.get(i)) {
                curves.push((other, colors::TEXT_MUTED));
            }
            let response = curve_plot(ui, &curves, settings.preview_height, settings.preview_samples)
                .on_hover_text("Edit curve");
            if response.clicked() {
                click = Some(FieldClick::component(i));
            }
        });
    }
    click
}

impl FieldWidget for f32 {
    fn constant_ui(
        ui: &mut egui::Ui,
        value: &Self,
        half: RangeHalf,
        speed: f64,
    ) -> Option<FieldAction<Self>> {
        numeric_constant_ui(ui, [*value], half, speed, |[v]| v)
    }

    fn curves_ui(
        ui: &mut egui::Ui,
        min: &Self::Curve,
        max: Option<&Self::Curve>,
        settings: &DistributionEditorSettings,
    ) -> Option<FieldClick> {
        let mut curves = vec![(min, colors::ACCENT_BLUE)];
        if let Some(max) = max {
            curves.push((max, colors::ACCENT_ORANGE));
        }
        curve_plot(ui, &curves, settings.preview_height, settings.preview_samples)
            .on_hover_text("Edit curve")
            .clicked()
            .then(FieldClick::min)
    }
}

impl FieldWidget for Vec2 {
    fn constant_ui(
        ui: &mut egui::Ui,
        value: &Self,
        half: RangeHalf,
        speed: f64,
    ) -> Option<FieldAction<Self>> {
        numeric_constant_ui(ui, value.to_array(), half, speed, Vec2::from_array)
    }

    fn curves_ui(
        ui: &mut egui::Ui,
        min: &Self::Curve,
        max: Option<&Self::Curve>,
        settings: &DistributionEditorSettings,
    ) -> Option<FieldClick> {
        vector_curves_ui(ui, min, max, settings)
    }
}

impl FieldWidget for Vec3 {
    fn constant_ui(
        ui: &mut egui::Ui,
        value: &Self,
        half: RangeHalf,
        speed: f64,
    ) -> Option<FieldAction<Self>> {
        numeric_constant_ui(ui, value.to_array(), half, speed, Vec3::from_array)
    }

    fn curves_ui(
        ui: &mut egui::Ui,
        min: &Self::Curve,
        max: Option<&Self::Curve>,
        settings: &DistributionEditorSettings,
    ) -> Option<FieldClick> {
        vector_curves_ui(ui, min, max, settings)
    }
}

impl FieldWidget for LinearRgba {
    fn constant_ui(
        ui: &mut egui::Ui,
        value: &Self,
        half: RangeHalf,
        _speed: f64,
    ) -> Option<FieldAction<Self>> {
        color_swatch(ui, *value, egui::vec2(40.0, 16.0))
            .on_hover_text("Pick color")
            .clicked()
            .then_some(FieldAction::Click(FieldClick {
                half,
                component: None,
            }))
    }

    fn curves_ui(
        ui: &mut egui::Ui,
        min: &Gradient,
        max: Option<&Gradient>,
        settings: &DistributionEditorSettings,
    ) -> Option<FieldClick> {
        let mut click = None;
        if gradient_bar(ui, min, settings.preview_height).on_hover_text("Edit gradient").clicked() {
            click = Some(FieldClick::min());
        }
        if let Some(max) = max {
            if gradient_bar(ui, max, settings.preview_height).on_hover_text("Edit gradient").clicked() {
                click = Some(FieldClick::max());
            }
        }
        click
    }
}

/// Draw `field` and report what the user did with it.
///
/// The body is disabled while a modal session is open for the field.
pub fn distribution_field_ui<T: FieldWidget>(
    ui: &mut egui::Ui,
    field: &DistributionField<T>,
    settings: &DistributionEditorSettings,
) -> Option<FieldAction<T>> {
    let speed = settings.drag_speed as f64;
    let current = field.value().distribution_type();
    let mut action = None;

    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(field.label()).color(colors::TEXT_SECONDARY));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.add_enabled_ui(!field.is_editing(), |ui| {
                ui.menu_button(
                    egui::RichText::new(current.label(T::GRADIENT)).color(colors::ACCENT_BLUE),
                    |ui| {
                        for ty in DistributionType::ALL {
                            if ui.selectable_label(ty == current, ty.label(T::GRADIENT)).clicked() {
                                if ty != current {
                                    action = Some(FieldAction::ChangeType(ty));
                                }
                                ui.close();
                            }
                        }
                    },
                );
            });
        });
    });

    let body = ui
        .add_enabled_ui(!field.is_editing(), |ui| match field.value() {
            PropertyDistribution::Constant(value) => ui
                .horizontal(|ui| T::constant_ui(ui, value, RangeHalf::Min, speed))
                .inner,
            PropertyDistribution::RandomRange { min, max } => ui
                .horizontal(|ui| {
                    ui.label(egui::RichText::new("min").color(colors::TEXT_MUTED));
                    let min = T::constant_ui(ui, min, RangeHalf::Min, speed);
                    ui.label(egui::RichText::new("max").color(colors::TEXT_MUTED));
                    let max = T::constant_ui(ui, max, RangeHalf::Max, speed);
                    min.or(max)
                })
                .inner,
            PropertyDistribution::Curve(curve) => {
                T::curves_ui(ui, curve, None, settings).map(FieldAction::Click)
            }
            PropertyDistribution::RandomCurveRange { min, max } => {
                T::curves_ui(ui, min, Some(max), settings).map(FieldAction::Click)
            }
        })
        .inner;

    action.or(body)
}

/// Carry out `action` on `field`. Clicks open a modal on `host` and change
/// nothing until the session is accepted.
///
/// A confirmed constant edit reports the whole inline edit, from the value
/// before its first frame.
pub fn apply_field_action<T: DistributionKind>(
    field: &mut DistributionField<T>,
    action: FieldAction<T>,
    host: &mut dyn ModalEditHost,
) -> Result<Option<FieldChange<T>>, FieldError> {
    match action {
        FieldAction::Click(click) => {
            field.click(host, click)?;
            Ok(None)
        }
        FieldAction::ChangeType(ty) => field.set_distribution_type(ty),
        FieldAction::SetConstant {
            half,
            value,
            confirmed,
        } => {
            let change = field.set_constant(half, value)?;
            if confirmed {
                Ok(Some(field.confirm().unwrap_or(change)))
            } else {
                Ok(Some(change))
            }
        }
        FieldAction::Confirm => Ok(field.confirm()),
    }
}
