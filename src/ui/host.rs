//! egui windows that serve modal edit sessions.

use bevy::prelude::*;
use bevy_distribution::{Curve, CurveKey, Gradient, GradientKey, Interp};
use bevy_egui::egui;

use super::preview::{curve_plot, gradient_bar};
use super::theme::{colors, grid_label};
use crate::session::{ModalEditHost, ModalRequest, ModalResult, ModalSession, PickerValue, SessionId};
use crate::settings::DistributionEditorSettings;

/// Working copy of the value a modal is editing. Committed on OK only.
#[derive(Clone, Debug, PartialEq)]
enum Draft {
    Color { color: LinearRgba, allow_hdr: bool },
    Gradient(Gradient),
    Value(PickerValue),
    Curve(Curve<f32>),
    CurveRange { min: Curve<f32>, max: Curve<f32> },
}

impl Draft {
    fn from_request(request: &ModalRequest) -> Self {
        match request {
            ModalRequest::ColorPicker { initial, allow_hdr } => Self::Color {
                color: *initial,
                allow_hdr: *allow_hdr,
            },
            ModalRequest::GradientPicker { initial } => Self::Gradient(initial.clone()),
            ModalRequest::ValuePicker { initial } => Self::Value(*initial),
            ModalRequest::CurveEditor { curve } => Self::Curve(curve.clone()),
            ModalRequest::CurveRangeEditor { min, max } => Self::CurveRange {
                min: min.clone(),
                max: max.clone(),
            },
        }
    }

    fn into_result(self) -> ModalResult {
        match self {
            Self::Color { color, .. } => ModalResult::Color(color),
            Self::Gradient(mut gradient) => {
                gradient.sort_keys();
                ModalResult::Gradient(gradient)
            }
            Self::Value(value) => ModalResult::Value(value),
            Self::Curve(mut curve) => {
                curve.sort_keys();
                ModalResult::Curve(curve)
            }
            Self::CurveRange { mut min, mut max } => {
                min.sort_keys();
                max.sort_keys();
                ModalResult::CurveRange(min, max)
            }
        }
    }
}

struct OpenModal {
    session: ModalSession,
    draft: Draft,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Decision {
    Accept,
    Cancel,
}

/// Shows modal sessions as egui windows. The topmost window takes Escape.
#[derive(Resource, Default)]
pub struct EguiModalHost {
    open: Vec<OpenModal>,
}

impl ModalEditHost for EguiModalHost {
    fn show(&mut self, session: ModalSession) {
        debug!("Showing {:?}", session);
        let draft = Draft::from_request(session.request());
        self.open.push(OpenModal { session, draft });
    }
}

impl EguiModalHost {
    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    pub fn is_open(&self, id: SessionId) -> bool {
        self.open.iter().any(|m| m.session.id() == id)
    }

    /// Resolve session `id` with its current draft. Returns false if it is not open.
    pub fn accept(&mut self, id: SessionId) -> bool {
        self.finish(id, Decision::Accept)
    }

    /// Resolve session `id` without an edit. Returns false if it is not open.
    pub fn cancel(&mut self, id: SessionId) -> bool {
        self.finish(id, Decision::Cancel)
    }

    fn finish(&mut self, id: SessionId, decision: Decision) -> bool {
        let Some(index) = self.open.iter().position(|m| m.session.id() == id) else {
            return false;
        };
        let modal = self.open.remove(index);
        match decision {
            Decision::Accept => modal.session.accept(modal.draft.into_result()),
            Decision::Cancel => modal.session.cancel(),
        }
        true
    }

    /// Draw every open modal and resolve the ones the user closed.
    pub fn draw(&mut self, ctx: &egui::Context, settings: &DistributionEditorSettings) {
        if self.open.is_empty() {
            return;
        }

        let escape_pressed = ctx.input(|i| i.key_pressed(egui::Key::Escape));
        let top = self.open.len() - 1;
        let mut decisions = Vec::new();

        for (index, modal) in self.open.iter_mut().enumerate() {
            let id = modal.session.id();
            let mut window_open = true;
            let mut decision = None;

            egui::Window::new(modal.session.request().kind().title())
                .id(egui::Id::new(("distribution_modal", id)))
                .open(&mut window_open)
                .collapsible(false)
                .resizable(false)
                .default_width(320.0)
                .show(ctx, |ui| {
                    draft_ui(ui, &mut modal.draft, egui::Id::new(id), settings);
                    ui.separator();
                    ui.horizontal(|ui| {
                        if ui.button("OK").clicked() {
                            decision = Some(Decision::Accept);
                        }
                        if ui.button("Cancel").clicked() {
                            decision = Some(Decision::Cancel);
                        }
                    });
                });

            if !window_open || (index == top && escape_pressed) {
                decision = decision.or(Some(Decision::Cancel));
            }
            if let Some(decision) = decision {
                decisions.push((id, decision));
            }
        }

        for (id, decision) in decisions {
            self.finish(id, decision);
        }
    }
}

fn draft_ui(ui: &mut egui::Ui, draft: &mut Draft, salt: egui::Id, settings: &DistributionEditorSettings) {
    let speed = settings.drag_speed as f64;
    match draft {
        Draft::Color { color, allow_hdr } => color_ui(ui, color, *allow_hdr, salt, speed),
        Draft::Gradient(gradient) => {
            gradient_bar(ui, gradient, settings.preview_height.max(16.0));
            ui.add_space(4.0);
            gradient_keys_ui(ui, &mut gradient.keys, speed);
        }
        Draft::Value(value) => value_ui(ui, value, speed),
        Draft::Curve(curve) => {
            curve_plot(ui, &[(&*curve, colors::ACCENT_BLUE)], 120.0, settings.preview_samples);
            ui.add_space(4.0);
            curve_keys_ui(ui, curve, salt, speed);
        }
        Draft::CurveRange { min, max } => {
            curve_plot(
                ui,
                &[(&*min, colors::ACCENT_BLUE), (&*max, colors::ACCENT_ORANGE)],
                120.0,
                settings.preview_samples,
            );
            ui.add_space(4.0);
            egui::CollapsingHeader::new(egui::RichText::new("Min").color(colors::ACCENT_BLUE))
                .id_salt(salt.with("min"))
                .default_open(true)
                .show(ui, |ui| curve_keys_ui(ui, min, salt.with("min"), speed));
            egui::CollapsingHeader::new(egui::RichText::new("Max").color(colors::ACCENT_ORANGE))
                .id_salt(salt.with("max"))
                .default_open(true)
                .show(ui, |ui| curve_keys_ui(ui, max, salt.with("max"), speed));
        }
    }
}

fn color_ui(
    ui: &mut egui::Ui,
    color: &mut LinearRgba,
    allow_hdr: bool,
    salt: egui::Id,
    speed: f64,
) {
    let mut rgba = [
        color.red.clamp(0.0, 1.0),
        color.green.clamp(0.0, 1.0),
        color.blue.clamp(0.0, 1.0),
        color.alpha,
    ];
    if ui.color_edit_button_rgba_unmultiplied(&mut rgba).changed() {
        *color = LinearRgba::new(rgba[0], rgba[1], rgba[2], rgba[3]);
    }

    let max = if allow_hdr { f32::MAX } else { 1.0 };
    egui::Grid::new(salt.with("color_channels"))
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui| {
            for (label, channel, channel_max) in [
                ("R", &mut color.red, max),
                ("G", &mut color.green, max),
                ("B", &mut color.blue, max),
                ("A", &mut color.alpha, 1.0),
            ] {
                grid_label(ui, label);
                ui.add(
                    egui::DragValue::new(channel)
                        .speed(speed)
                        .range(0.0..=channel_max)
                        .max_decimals(3),
                );
                ui.end_row();
            }
        });
}

fn value_ui(ui: &mut egui::Ui, value: &mut PickerValue, speed: f64) {
    ui.horizontal(|ui| match value {
        PickerValue::Float(v) => {
            ui.add(egui::DragValue::new(v).speed(speed).max_decimals(3));
        }
        PickerValue::Vec2(v) => {
            ui.add(egui::DragValue::new(&mut v.x).speed(speed).prefix("x:").max_decimals(3));
            ui.add(egui::DragValue::new(&mut v.y).speed(speed).prefix("y:").max_decimals(3));
        }
        PickerValue::Vec3(v) => {
            ui.add(egui::DragValue::new(&mut v.x).speed(speed).prefix("x:").max_decimals(3));
            ui.add(egui::DragValue::new(&mut v.y).speed(speed).prefix("y:").max_decimals(3));
            ui.add(egui::DragValue::new(&mut v.z).speed(speed).prefix("z:").max_decimals(3));
        }
    });
}

/// Time for a key appended after the last one.
fn next_key_time(last: Option<f32>) -> f32 {
    last.map(|t| (t + 1.0) / 2.0).unwrap_or(0.5).min(1.0)
}

fn remove_button(ui: &mut egui::Ui) -> bool {
    ui.add(egui::Button::new(egui::RichText::new("\u{00d7}").color(colors::STATUS_ERROR)).frame(false))
        .on_hover_text("Remove key")
        .clicked()
}

fn gradient_keys_ui(ui: &mut egui::Ui, keys: &mut Vec<GradientKey>, speed: f64) {
    let mut remove_key = None;
    for (i, key) in keys.iter_mut().enumerate() {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("t:").color(colors::TEXT_MUTED));
            ui.add(egui::DragValue::new(&mut key.time).range(0.0..=1.0).speed(speed).max_decimals(2));
            let mut rgba = [key.color.red, key.color.green, key.color.blue, key.color.alpha];
            if ui.color_edit_button_rgba_unmultiplied(&mut rgba).changed() {
                key.color = LinearRgba::new(rgba[0], rgba[1], rgba[2], rgba[3]);
            }
            if remove_button(ui) {
                remove_key = Some(i);
            }
        });
    }

    if let Some(idx) = remove_key {
        if keys.len() > 1 {
            keys.remove(idx);
        }
    }

    if ui.button(egui::RichText::new("+ Key").color(colors::ACCENT_GREEN)).clicked() {
        let time = next_key_time(keys.last().map(|k| k.time));
        keys.push(GradientKey {
            time,
            color: LinearRgba::WHITE,
        });
    }
}

fn curve_keys_ui(ui: &mut egui::Ui, curve: &mut Curve<f32>, salt: egui::Id, speed: f64) {
    let mut remove_key = None;
    for (i, key) in curve.keys.iter_mut().enumerate() {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("t:").color(colors::TEXT_MUTED));
            ui.add(egui::DragValue::new(&mut key.time).range(0.0..=1.0).speed(speed).max_decimals(2));
            ui.label(egui::RichText::new("v:").color(colors::TEXT_MUTED));
            ui.add(egui::DragValue::new(&mut key.value).speed(speed).max_decimals(3));
            egui::ComboBox::from_id_salt(salt.with(i))
                .width(80.0)
                .selected_text(key.interp.label())
                .show_ui(ui, |ui| {
                    for interp in Interp::ALL {
                        ui.selectable_value(&mut key.interp, interp, interp.label());
                    }
                });
            if remove_button(ui) {
                remove_key = Some(i);
            }
        });
    }

    if let Some(idx) = remove_key {
        curve.keys.remove(idx);
    }

    if ui.button(egui::RichText::new("+ Key").color(colors::ACCENT_GREEN)).clicked() {
        let time = next_key_time(curve.keys.last().map(|k| k.time));
        let value = curve.sample(time);
        curve.keys.push(CurveKey {
            time,
            value,
            interp: Interp::Linear,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{EditOutcome, open_session};

    fn show(host: &mut EguiModalHost, request: ModalRequest) -> (SessionId, crate::session::PendingSession) {
        let (session, pending) = open_session(request);
        let id = session.id();
        host.show(session);
        (id, pending)
    }

    #[test]
    fn accept_sends_the_untouched_draft() {
        let mut host = EguiModalHost::default();
        let (id, pending) = show(
            &mut host,
            ModalRequest::ValuePicker {
                initial: PickerValue::Vec2(Vec2::new(1.0, 2.0)),
            },
        );
        assert!(host.is_open(id));
        assert!(host.accept(id));
        assert_eq!(
            pending.try_outcome(),
            Some(EditOutcome::Accepted(ModalResult::Value(PickerValue::Vec2(Vec2::new(1.0, 2.0)))))
        );
        assert_eq!(host.open_count(), 0);
        assert!(!host.cancel(id));
    }

    #[test]
    fn accepted_curves_are_sorted() {
        let mut curve = Curve::linear(0.0, 1.0);
        curve.keys.reverse();
        let mut host = EguiModalHost::default();
        let (id, pending) = show(&mut host, ModalRequest::CurveEditor { curve });
        host.accept(id);
        assert_eq!(
            pending.try_outcome(),
            Some(EditOutcome::Accepted(ModalResult::Curve(Curve::linear(0.0, 1.0))))
        );
    }

    #[test]
    fn drawing_without_input_resolves_nothing() {
        let mut host = EguiModalHost::default();
        let (_, color) = show(
            &mut host,
            ModalRequest::ColorPicker {
                initial: LinearRgba::RED,
                allow_hdr: true,
            },
        );
        let (_, range) = show(
            &mut host,
            ModalRequest::CurveRangeEditor {
                min: Curve::constant(0.0),
                max: Curve::linear(0.0, 1.0),
            },
        );
        let (_, gradient) = show(
            &mut host,
            ModalRequest::GradientPicker {
                initial: Gradient::white_to_transparent(),
            },
        );

        let ctx = egui::Context::default();
        let settings = DistributionEditorSettings::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| host.draw(ctx, &settings));

        assert_eq!(host.open_count(), 3);
        assert_eq!(color.try_outcome(), None);
        assert_eq!(range.try_outcome(), None);
        assert_eq!(gradient.try_outcome(), None);
    }

    #[test]
    fn two_color_pickers_keep_their_own_channels() {
        let mut host = EguiModalHost::default();
        let (red, red_pending) = show(
            &mut host,
            ModalRequest::ColorPicker {
                initial: LinearRgba::RED,
                allow_hdr: false,
            },
        );
        let (blue, blue_pending) = show(
            &mut host,
            ModalRequest::ColorPicker {
                initial: LinearRgba::BLUE,
                allow_hdr: true,
            },
        );

        let ctx = egui::Context::default();
        let settings = DistributionEditorSettings::default();
        for _ in 0..2 {
            let _ = ctx.run(egui::RawInput::default(), |ctx| host.draw(ctx, &settings));
        }
        assert_eq!(host.open_count(), 2);

        assert!(host.accept(blue));
        assert!(host.accept(red));
        assert_eq!(
            red_pending.try_outcome(),
            Some(EditOutcome::Accepted(ModalResult::Color(LinearRgba::RED)))
        );
        assert_eq!(
            blue_pending.try_outcome(),
            Some(EditOutcome::Accepted(ModalResult::Color(LinearRgba::BLUE)))
        );
    }

    #[test]
    fn escape_cancels_only_the_top_modal() {
        let mut host = EguiModalHost::default();
        let (below, below_pending) = show(
            &mut host,
            ModalRequest::ValuePicker {
                initial: PickerValue::Float(1.0),
            },
        );
        let (top, top_pending) = show(
            &mut host,
            ModalRequest::CurveEditor {
                curve: Curve::constant(1.0),
            },
        );

        let ctx = egui::Context::default();
        let settings = DistributionEditorSettings::default();
        let input = egui::RawInput {
            events: vec![egui::Event::Key {
                key: egui::Key::Escape,
                physical_key: None,
                pressed: true,
                repeat: false,
                modifiers: egui::Modifiers::NONE,
            }],
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| host.draw(ctx, &settings));

        assert!(!host.is_open(top));
        assert!(host.is_open(below));
        assert_eq!(top_pending.try_outcome(), Some(EditOutcome::Cancelled));
        assert_eq!(below_pending.try_outcome(), None);
    }

    #[test]
    fn appended_keys_stay_in_unit_time() {
        assert_eq!(next_key_time(None), 0.5);
        assert_eq!(next_key_time(Some(0.5)), 0.75);
        assert_eq!(next_key_time(Some(1.0)), 1.0);
    }
}
