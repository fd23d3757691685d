//! Demo app: one distribution field of each kind in an inspector window.

mod demo;

use bevy::prelude::*;
use bevy_distribution_editor::DistributionEditorPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Bevy Distribution Editor".to_string(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(DistributionEditorPlugin)
        .add_plugins(demo::DemoPlugin)
        .run();
}
