//! # Bevy Distribution Editor
//!
//! Editor fields for values that may be a constant, a random range, a curve
//! or a random range of two curves.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bevy::prelude::*;
//! use bevy_distribution_editor::{DistributionEditorPlugin, DistributionField};
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(DistributionEditorPlugin)
//!         .add_systems(Startup, |mut commands: Commands| {
//!             commands.spawn(DistributionField::<f32>::new("Size"));
//!         })
//!         .run();
//! }
//! ```
//!
//! ## Editing
//!
//! Draw a field with [`distribution_field_ui`] and hand the returned action
//! to [`apply_field_action`] with the [`EguiModalHost`] resource. Clicking a
//! value opens the matching modal:
//!
//! - **Constant / Random range**: value picker, or the color picker for colors
//! - **Curve / Curve range**: curve editor, one vector component at a time
//! - **Gradient / Gradient range**: gradient picker
//!
//! Accepted edits replace the field's value and write a
//! [`DistributionChanged`] message. Cancelled edits change nothing.

pub mod field;
pub mod kinds;
pub mod session;
pub mod settings;
pub mod ui;

pub use bevy_distribution;

pub use field::{DistributionField, FieldChange, FieldClick, FieldError, RangeHalf};
pub use kinds::{DistributionKind, PickerOptions};
pub use session::{
    EditOutcome, ModalEditHost, ModalKind, ModalRequest, ModalResult, ModalSession,
    PendingSession, PickerValue, SessionId, open_session,
};
pub use settings::DistributionEditorSettings;
pub use ui::{
    DistributionChanged, DistributionEditorPlugin, EguiModalHost, FieldAction, FieldWidget,
    apply_field_action, distribution_field_ui, poll_distribution_fields,
};
