use bevy::prelude::*;
use bevy_distribution_editor::bevy_distribution::{
    Curve, Gradient, PropertyDistribution, Vector3Curve,
};
use bevy_distribution_editor::ui::theme::colors;
use bevy_distribution_editor::{
    DistributionChanged, DistributionEditorSettings, DistributionField, EguiModalHost,
    FieldWidget, apply_field_action, distribution_field_ui,
};
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};

pub struct DemoPlugin;

impl Plugin for DemoPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_demo_fields)
            .add_systems(EguiPrimaryContextPass, draw_inspector);
    }
}

fn spawn_demo_fields(mut commands: Commands) {
    commands.spawn(Camera2d);

    let mut size = DistributionField::<f32>::with_value(
        "Size",
        PropertyDistribution::curve_range(Curve::linear(0.2, 1.0), Curve::linear(0.5, 2.0)),
    );
    size.on_changed(|value| debug!("Size distribution is now {:?}", value.distribution_type()));
    size.on_confirmed(|value| info!("Size edit finished: {:?}", value.distribution_type()));

    commands.spawn((Name::new("Size"), size));
    commands.spawn((
        Name::new("Velocity"),
        DistributionField::<Vec3>::with_value(
            "Velocity",
            PropertyDistribution::curve(Vector3Curve::linear(Vec3::Y * 2.0, Vec3::new(1.0, 0.0, -1.0))),
        ),
    ));
    commands.spawn((
        Name::new("Offset"),
        DistributionField::with_value("Offset", PropertyDistribution::range(Vec2::ZERO, Vec2::ONE)),
    ));
    commands.spawn((
        Name::new("Tint"),
        DistributionField::<LinearRgba>::with_value(
            "Tint",
            PropertyDistribution::curve(Gradient::white_to_transparent()),
        ),
    ));
}

fn field_rows<T: FieldWidget>(
    ui: &mut egui::Ui,
    fields: &mut Query<(Entity, &mut DistributionField<T>)>,
    host: &mut EguiModalHost,
    settings: &DistributionEditorSettings,
    changed: &mut MessageWriter<DistributionChanged>,
) {
    for (entity, mut field) in fields.iter_mut() {
        if let Some(action) = distribution_field_ui(ui, &field, settings) {
            match apply_field_action(&mut field, action, host) {
                Ok(Some(change)) => {
                    changed.write(DistributionChanged::new(entity, &field, &change));
                }
                Ok(None) => {}
                Err(e) => warn!("{}: {}", field.label(), e),
            }
        }

        let mid = field.value().evaluate(0.5, 0.5);
        ui.label(
            egui::RichText::new(format!("t=0.5, mid range: {:?}", mid))
                .small()
                .color(colors::TEXT_MUTED),
        );
        ui.separator();
    }
}

fn draw_inspector(
    mut contexts: EguiContexts,
    mut host: ResMut<EguiModalHost>,
    mut settings: ResMut<DistributionEditorSettings>,
    mut changed: MessageWriter<DistributionChanged>,
    mut floats: Query<(Entity, &mut DistributionField<f32>)>,
    mut vec2s: Query<(Entity, &mut DistributionField<Vec2>)>,
    mut vec3s: Query<(Entity, &mut DistributionField<Vec3>)>,
    mut tints: Query<(Entity, &mut DistributionField<LinearRgba>)>,
) -> Result {
    let ctx = contexts.ctx_mut()?;

    egui::Window::new("Distributions")
        .default_width(360.0)
        .show(ctx, |ui| {
            field_rows(ui, &mut floats, &mut host, &settings, &mut changed);
            field_rows(ui, &mut vec3s, &mut host, &settings, &mut changed);
            field_rows(ui, &mut vec2s, &mut host, &settings, &mut changed);
            field_rows(ui, &mut tints, &mut host, &settings, &mut changed);

            egui::CollapsingHeader::new("Settings").show(ui, |ui| {
                let mut allow_hdr = settings.allow_hdr_colors;
                if ui.checkbox(&mut allow_hdr, "HDR colors").changed() {
                    settings.allow_hdr_colors = allow_hdr;
                    settings.save();
                }
            });
        });

    Ok(())
}
