mod field_widget;
mod host;
mod preview;
pub mod theme;

pub use field_widget::*;
pub use host::*;
pub use preview::{color_swatch, curve_plot, gradient_bar};

use bevy::prelude::*;
use bevy_distribution::DistributionType;
use bevy_egui::{EguiContexts, EguiPlugin, EguiPrimaryContextPass};

use crate::field::{DistributionField, FieldChange};
use crate::kinds::DistributionKind;
use crate::settings::DistributionEditorSettings;
use theme::ThemePlugin;

/// Written once for every change to a field: accepted modal edits, type
/// switches and inline constant edits.
///
/// Inline drags write one unconfirmed message per frame and a confirmed one
/// on release. Undo and other consumers that want one entry per edit read
/// only the confirmed messages.
#[derive(Message, Clone, Debug, PartialEq)]
pub struct DistributionChanged {
    pub entity: Entity,
    pub label: String,
    pub kind: DistributionType,
    pub confirmed: bool,
}

impl DistributionChanged {
    pub fn new<T: DistributionKind>(
        entity: Entity,
        field: &DistributionField<T>,
        change: &FieldChange<T>,
    ) -> Self {
        Self {
            entity,
            label: field.label().to_string(),
            kind: change.current.distribution_type(),
            confirmed: change.confirmed,
        }
    }
}

/// Fields, egui modal host and settings for distribution editing.
pub struct DistributionEditorPlugin;

impl Plugin for DistributionEditorPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<EguiPlugin>() {
            app.add_plugins(EguiPlugin::default());
        }

        app.insert_resource(DistributionEditorSettings::load())
            .init_resource::<EguiModalHost>()
            .add_message::<DistributionChanged>()
            .add_plugins(ThemePlugin)
            .add_systems(EguiPrimaryContextPass, draw_modal_windows)
            .add_systems(Update, log_distribution_changes);

        register_kind::<f32>(app);
        register_kind::<Vec2>(app);
        register_kind::<Vec3>(app);
        register_kind::<LinearRgba>(app);
    }
}

fn register_kind<T: DistributionKind>(app: &mut App) {
    app.add_systems(
        Update,
        (sync_picker_options::<T>, poll_distribution_fields::<T>)
            .chain()
            .before(log_distribution_changes),
    );
}

/// Push the HDR option from the settings into every field.
fn sync_picker_options<T: DistributionKind>(
    settings: Res<DistributionEditorSettings>,
    mut fields: Query<&mut DistributionField<T>>,
) {
    let options = settings.picker_options();
    for mut field in &mut fields {
        if field.options() != options {
            field.set_options(options);
        }
    }
}

/// Apply finished modal sessions to their fields.
pub fn poll_distribution_fields<T: DistributionKind>(
    mut fields: Query<(Entity, &mut DistributionField<T>)>,
    mut changed: MessageWriter<DistributionChanged>,
) {
    for (entity, mut field) in &mut fields {
        if !field.is_editing() {
            continue;
        }
        if let Some(change) = field.poll() {
            changed.write(DistributionChanged::new(entity, &field, &change));
        }
    }
}

fn draw_modal_windows(
    mut contexts: EguiContexts,
    mut host: ResMut<EguiModalHost>,
    settings: Res<DistributionEditorSettings>,
) -> Result {
    if host.open_count() == 0 {
        return Ok(());
    }
    let ctx = contexts.ctx_mut()?;
    host.draw(ctx, &settings);
    Ok(())
}

fn log_distribution_changes(mut changed: MessageReader<DistributionChanged>) {
    for event in changed.read() {
        if event.confirmed {
            info!(
                "'{}' on {} is now {}",
                event.label,
                event.entity,
                event.kind.label(false)
            );
        } else {
            debug!("'{}' on {} is being edited", event.label, event.entity);
        }
    }
}
