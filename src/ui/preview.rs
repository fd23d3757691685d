//! Curve and gradient previews drawn inside fields and pickers.

use bevy::prelude::*;
use bevy_distribution::{Curve, Gradient};
use bevy_egui::egui;

use super::theme::colors;

const GRADIENT_SEGMENTS: usize = 64;

pub fn to_color32(c: LinearRgba) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(
        (c.red * 255.0).clamp(0.0, 255.0) as u8,
        (c.green * 255.0).clamp(0.0, 255.0) as u8,
        (c.blue * 255.0).clamp(0.0, 255.0) as u8,
        (c.alpha * 255.0).clamp(0.0, 255.0) as u8,
    )
}

/// Horizontal strip showing `gradient` left to right.
pub fn gradient_bar(ui: &mut egui::Ui, gradient: &Gradient, height: f32) -> egui::Response {
    let desired = egui::vec2(ui.available_width(), height);
    let (rect, response) = ui.allocate_exact_size(desired, egui::Sense::click());
    paint_gradient(ui.painter(), rect, gradient);
    response
}

fn paint_gradient(painter: &egui::Painter, rect: egui::Rect, gradient: &Gradient) {
    if !gradient.keys.is_empty() {
        for seg in 0..GRADIENT_SEGMENTS {
            let t0 = seg as f32 / GRADIENT_SEGMENTS as f32;
            let t1 = (seg + 1) as f32 / GRADIENT_SEGMENTS as f32;
            let color = to_color32(gradient.sample((t0 + t1) * 0.5));

            let seg_rect = egui::Rect::from_min_max(
                egui::pos2(rect.left() + t0 * rect.width(), rect.top()),
                egui::pos2(rect.left() + t1 * rect.width(), rect.bottom()),
            );
            painter.rect_filled(seg_rect, 0.0, color);
        }
    }

    painter.rect_stroke(
        rect,
        egui::CornerRadius::same(2),
        egui::Stroke::new(1.0, colors::WIDGET_BORDER),
        egui::StrokeKind::Inside,
    );
}

/// Filled swatch for a single color.
pub fn color_swatch(ui: &mut egui::Ui, color: LinearRgba, size: egui::Vec2) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());
    let painter = ui.painter();
    painter.rect_filled(rect, egui::CornerRadius::same(2), to_color32(color));
    painter.rect_stroke(
        rect,
        egui::CornerRadius::same(2),
        egui::Stroke::new(1.0, colors::WIDGET_BORDER),
        egui::StrokeKind::Inside,
    );
    response
}

/// Value range covered by all `curves`, padded so flat curves stay visible.
fn plot_range<'a>(curves: impl Iterator<Item = &'a Curve<f32>>) -> (f32, f32) {
    let (lo, hi) = curves
        .filter_map(|curve| curve.value_range())
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), (a, b)| {
            (lo.min(a), hi.max(b))
        });
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if hi - lo < 1e-3 {
        return (lo - 0.5, hi + 0.5);
    }
    let pad = (hi - lo) * 0.1;
    (lo - pad, hi + pad)
}

/// Plot one or more curves over normalized time in a shared value range.
pub fn curve_plot(
    ui: &mut egui::Ui,
    curves: &[(&Curve<f32>, egui::Color32)],
    height: f32,
    samples: usize,
) -> egui::Response {
    let desired = egui::vec2(ui.available_width(), height);
    let (rect, response) = ui.allocate_exact_size(desired, egui::Sense::click());
    let painter = ui.painter();
    painter.rect_filled(rect, egui::CornerRadius::same(2), colors::BG_DARKEST);

    let (lo, hi) = plot_range(curves.iter().map(|(c, _)| *c));
    let samples = samples.max(2);
    let to_screen = |t: f32, v: f32| {
        egui::pos2(
            rect.left() + t * rect.width(),
            rect.bottom() - (v - lo) / (hi - lo) * rect.height(),
        )
    };

    for (curve, color) in curves {
        if curve.keys.is_empty() {
            continue;
        }
        let points: Vec<egui::Pos2> = (0..samples)
            .map(|i| {
                let t = i as f32 / (samples - 1) as f32;
                to_screen(t, curve.sample(t))
            })
            .collect();
        painter.add(egui::Shape::line(points, egui::Stroke::new(1.5, *color)));

        for key in &curve.keys {
            painter.circle_filled(to_screen(key.time.clamp(0.0, 1.0), key.value), 2.5, *color);
        }
    }

    painter.rect_stroke(
        rect,
        egui::CornerRadius::same(2),
        egui::Stroke::new(1.0, colors::WIDGET_BORDER),
        egui::StrokeKind::Inside,
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_curves_get_a_visible_range() {
        let flat = Curve::constant(2.0);
        let (lo, hi) = plot_range([&flat].into_iter());
        assert!(lo < 2.0 && hi > 2.0);
    }

    #[test]
    fn range_covers_every_curve() {
        let a = Curve::linear(0.0, 1.0);
        let b = Curve::linear(-3.0, 0.5);
        let (lo, hi) = plot_range([&a, &b].into_iter());
        assert!(lo <= -3.0 && hi >= 1.0);
    }

    #[test]
    fn empty_input_has_unit_range() {
        assert_eq!(plot_range(std::iter::empty()), (0.0, 1.0));
    }
}
