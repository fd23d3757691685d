use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::settings::DistributionEditorSettings;

/// Resource to track if theme has been applied
#[derive(Resource, Default)]
pub struct ThemeApplied(pub bool);

pub struct ThemePlugin;

impl Plugin for ThemePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ThemeApplied>()
            .add_systems(Update, apply_distribution_theme);
    }
}

/// Color palette shared by the fields and the pickers
pub mod colors {
    use bevy_egui::egui::Color32;

    pub const BG_DARKEST: Color32 = Color32::from_rgb(20, 20, 22);
    pub const BG_DARK: Color32 = Color32::from_rgba_premultiplied(25, 25, 28, 250);

    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(160, 160, 160);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 120, 120);

    pub const ACCENT_BLUE: Color32 = Color32::from_rgb(86, 156, 214);
    pub const ACCENT_GREEN: Color32 = Color32::from_rgb(78, 201, 176);
    pub const ACCENT_ORANGE: Color32 = Color32::from_rgb(206, 145, 87);

    pub const SELECTION_BG: Color32 = Color32::from_rgb(38, 79, 120);

    // Per-axis curve and label colors
    pub const AXIS_X: Color32 = Color32::from_rgb(230, 90, 90);
    pub const AXIS_Y: Color32 = Color32::from_rgb(90, 200, 90);
    pub const AXIS_Z: Color32 = Color32::from_rgb(90, 140, 230);

    pub const WIDGET_BORDER: Color32 = Color32::from_rgb(70, 70, 75);

    pub const STATUS_ERROR: Color32 = Color32::from_rgb(230, 90, 90);

    pub fn axis(component: usize) -> Color32 {
        match component {
            0 => AXIS_X,
            1 => AXIS_Y,
            _ => AXIS_Z,
        }
    }
}

/// Label in the left column of a two column grid
pub fn grid_label(ui: &mut egui::Ui, text: &str) {
    ui.label(egui::RichText::new(text).color(colors::TEXT_SECONDARY));
}

/// Style the fields and pickers draw against.
///
/// Modal windows get the dark fill and border, selections in the type menu
/// and the easing combo use the accent, and drag values share the preview
/// height so a constant and a curve row line up.
pub fn distribution_style(style: &mut egui::Style, preview_height: f32) {
    style.spacing.interact_size.y = preview_height.max(style.spacing.interact_size.y);

    style.visuals.window_fill = colors::BG_DARK;
    style.visuals.window_stroke = egui::Stroke::new(1.0, colors::WIDGET_BORDER);

    style.visuals.selection.bg_fill = colors::SELECTION_BG;
    style.visuals.selection.stroke = egui::Stroke::new(1.0, colors::ACCENT_BLUE);

    // Text edits and curve plots share this background.
    style.visuals.extreme_bg_color = colors::BG_DARKEST;
}

fn apply_distribution_theme(
    mut contexts: EguiContexts,
    mut theme_applied: ResMut<ThemeApplied>,
    settings: Res<DistributionEditorSettings>,
) {
    if theme_applied.0 {
        return;
    }

    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let mut style = (*ctx.style()).clone();
    distribution_style(&mut style, settings.preview_height);
    ctx.set_style(style);
    theme_applied.0 = true;

    info!("Applied distribution editor theme");
}
