//! Distribution field controller.
//!
//! A [`DistributionField`] owns the bound [`PropertyDistribution`] of one
//! inspector row. Clicks open a modal editor through a [`ModalEditHost`];
//! [`DistributionField::poll`] picks up the outcome and, on accept, assigns
//! the rebuilt distribution and notifies listeners once.
//!
//! Inline constant edits arrive once per frame while the user drags. They
//! notify change listeners each time but only reach confirm listeners when
//! [`DistributionField::confirm`] closes the edit, so an undo stack can
//! record the whole drag as one step.

use bevy::prelude::*;
use bevy_distribution::{DistributionType, DistributionValue, PropertyDistribution};
use thiserror::Error;

use crate::kinds::{CloseHandler, DistributionKind, PickerOptions, plan_constant_edit};
use crate::session::{EditOutcome, ModalEditHost, PendingSession, SessionId, open_session};

/// Which bound of a range the user activated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RangeHalf {
    #[default]
    Min,
    Max,
}

/// A click on a field, as reported by the widget that drew it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FieldClick {
    pub half: RangeHalf,
    /// Vector axis for per-component curve editing.
    pub component: Option<usize>,
}

impl FieldClick {
    pub fn min() -> Self {
        Self {
            half: RangeHalf::Min,
            component: None,
        }
    }

    pub fn max() -> Self {
        Self {
            half: RangeHalf::Max,
            component: None,
        }
    }

    pub fn component(component: usize) -> Self {
        Self {
            half: RangeHalf::Min,
            component: Some(component),
        }
    }
}

/// Why a field operation was not carried out. The field is left unchanged.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    #[error("an edit session is already open for this field")]
    SessionActive,
    #[error("component {component} is out of range for a {components}-component value")]
    ComponentOutOfRange { component: usize, components: usize },
    #[error("vector curves are edited one component at a time")]
    MissingComponent,
    #[error("operation does not apply to a {0:?} distribution")]
    NotApplicable(DistributionType),
}

/// An edit applied to a field.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldChange<T: DistributionValue> {
    /// Value before the edit. For a confirmed inline edit, the value before
    /// the first frame of that edit.
    pub previous: PropertyDistribution<T>,
    pub current: PropertyDistribution<T>,
    /// False for the in-progress frames of an inline edit.
    pub confirmed: bool,
}

pub type ChangeListener<T> = Box<dyn FnMut(&PropertyDistribution<T>) + Send + Sync>;

struct PendingEdit<T: DistributionValue> {
    session: PendingSession,
    on_close: CloseHandler<T>,
}

/// Last known constants and curves, so switching type keeps what the user
/// authored before.
#[derive(Clone, Debug)]
struct ValueCache<T: DistributionValue> {
    min_constant: T,
    max_constant: T,
    min_curve: T::Curve,
    max_curve: T::Curve,
}

impl<T: DistributionValue> ValueCache<T> {
    fn from_value(value: &PropertyDistribution<T>) -> Self {
        match value {
            PropertyDistribution::Constant(v) => Self {
                min_constant: v.clone(),
                max_constant: v.clone(),
                min_curve: T::flat_curve(v),
                max_curve: T::flat_curve(v),
            },
            PropertyDistribution::RandomRange { min, max } => Self {
                min_constant: min.clone(),
                max_constant: max.clone(),
                min_curve: T::flat_curve(min),
                max_curve: T::flat_curve(max),
            },
            PropertyDistribution::Curve(curve) => Self {
                min_constant: T::sample_curve(curve, 0.0),
                max_constant: T::sample_curve(curve, 0.0),
                min_curve: curve.clone(),
                max_curve: curve.clone(),
            },
            PropertyDistribution::RandomCurveRange { min, max } => Self {
                min_constant: T::sample_curve(min, 0.0),
                max_constant: T::sample_curve(max, 0.0),
                min_curve: min.clone(),
                max_curve: max.clone(),
            },
        }
    }

    fn build(&self, ty: DistributionType) -> PropertyDistribution<T> {
        match ty {
            DistributionType::Constant => PropertyDistribution::constant(self.min_constant.clone()),
            DistributionType::RandomRange => PropertyDistribution::range(
                self.min_constant.clone(),
                self.max_constant.clone(),
            ),
            DistributionType::Curve => PropertyDistribution::curve(self.min_curve.clone()),
            DistributionType::RandomCurveRange => {
                PropertyDistribution::curve_range(self.min_curve.clone(), self.max_curve.clone())
            }
        }
    }
}

/// Editable distribution bound to one inspector field.
#[derive(Component)]
pub struct DistributionField<T: DistributionKind> {
    label: String,
    value: PropertyDistribution<T>,
    cache: ValueCache<T>,
    options: PickerOptions,
    pending: Option<PendingEdit<T>>,
    /// Value before the inline edit that is still being dragged.
    inline_start: Option<PropertyDistribution<T>>,
    listeners: Vec<ChangeListener<T>>,
    confirm_listeners: Vec<ChangeListener<T>>,
}

impl<T: DistributionKind> DistributionField<T> {
    /// A field holding a default constant.
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_value(label, PropertyDistribution::default())
    }

    pub fn with_value(label: impl Into<String>, value: PropertyDistribution<T>) -> Self {
        Self {
            label: label.into(),
            cache: ValueCache::from_value(&value),
            value,
            options: PickerOptions::default(),
            pending: None,
            inline_start: None,
            listeners: Vec::new(),
            confirm_listeners: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> &PropertyDistribution<T> {
        &self.value
    }

    pub fn options(&self) -> PickerOptions {
        self.options
    }

    pub fn set_options(&mut self, options: PickerOptions) {
        self.options = options;
    }

    /// Whether a modal session is open for this field.
    pub fn is_editing(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_session(&self) -> Option<SessionId> {
        self.pending.as_ref().map(|p| p.session.id())
    }

    /// Register a listener called after every change, including each frame
    /// of an inline drag.
    pub fn on_changed(
        &mut self,
        listener: impl FnMut(&PropertyDistribution<T>) + Send + Sync + 'static,
    ) {
        self.listeners.push(Box::new(listener));
    }

    /// Register a listener called once per finished edit: an accepted modal
    /// edit, a type switch or a confirmed inline edit.
    pub fn on_confirmed(
        &mut self,
        listener: impl FnMut(&PropertyDistribution<T>) + Send + Sync + 'static,
    ) {
        self.confirm_listeners.push(Box::new(listener));
    }

    /// Whether an inline edit has changed the value and is not yet confirmed.
    pub fn has_unconfirmed_edit(&self) -> bool {
        self.inline_start.is_some()
    }

    /// Replace the bound value from the owning host, without notifying.
    ///
    /// Refused while a session is open, so the session's result is applied to
    /// the value it was opened for.
    pub fn set_value(&mut self, value: PropertyDistribution<T>) -> Result<(), FieldError> {
        if self.pending.is_some() {
            return Err(FieldError::SessionActive);
        }
        self.cache = ValueCache::from_value(&value);
        self.value = value;
        self.inline_start = None;
        Ok(())
    }

    /// Open the modal editor that fits the current distribution.
    pub fn click(
        &mut self,
        host: &mut dyn ModalEditHost,
        click: FieldClick,
    ) -> Result<SessionId, FieldError> {
        if self.pending.is_some() {
            return Err(FieldError::SessionActive);
        }

        let plan = if self.value.distribution_type().is_curve() {
            T::plan_curve_edit(&self.value, click)?
        } else {
            plan_constant_edit(&self.value, click, &self.options)?
        };

        let (session, pending) = open_session(plan.request);
        let id = session.id();
        debug!(
            "Field '{}' opened {:?} session {}",
            self.label,
            pending.kind(),
            id
        );
        host.show(session);
        self.pending = Some(PendingEdit {
            session: pending,
            on_close: plan.on_close,
        });
        Ok(id)
    }

    /// Apply the outcome of the open session, if it has finished.
    ///
    /// Returns the change when the session was accepted.
    pub fn poll(&mut self) -> Option<FieldChange<T>> {
        let outcome = self.pending.as_ref()?.session.try_outcome()?;
        let edit = self.pending.take()?;

        match outcome {
            EditOutcome::Cancelled => {
                debug!("Field '{}' edit {} cancelled", self.label, edit.session.id());
                None
            }
            EditOutcome::Accepted(result) => {
                let Some(value) = (edit.on_close)(result) else {
                    warn!(
                        "Field '{}' ignored a result that does not fit session {}",
                        self.label,
                        edit.session.id()
                    );
                    return None;
                };
                Some(self.commit(value, true))
            }
        }
    }

    /// Switch to another distribution type, reusing the cached constants and
    /// curves. Returns `None` if the field already has that type.
    pub fn set_distribution_type(
        &mut self,
        ty: DistributionType,
    ) -> Result<Option<FieldChange<T>>, FieldError> {
        if self.pending.is_some() {
            return Err(FieldError::SessionActive);
        }
        if self.value.distribution_type() == ty {
            return Ok(None);
        }
        let value = self.cache.build(ty);
        Ok(Some(self.commit(value, true)))
    }

    /// Inline edit of one constant, as typed into the field itself.
    ///
    /// The change stays unconfirmed until [`confirm`](Self::confirm).
    pub fn set_constant(&mut self, half: RangeHalf, value: T) -> Result<FieldChange<T>, FieldError> {
        if self.pending.is_some() {
            return Err(FieldError::SessionActive);
        }
        let rebuilt = match (&self.value, half) {
            (PropertyDistribution::Constant(_), _) => PropertyDistribution::constant(value),
            (PropertyDistribution::RandomRange { max, .. }, RangeHalf::Min) => {
                PropertyDistribution::range(value, max.clone())
            }
            (PropertyDistribution::RandomRange { min, .. }, RangeHalf::Max) => {
                PropertyDistribution::range(min.clone(), value)
            }
            (other, _) => return Err(FieldError::NotApplicable(other.distribution_type())),
        };
        Ok(self.commit(rebuilt, false))
    }

    /// Finish the inline edit in progress, on drag release or focus loss.
    ///
    /// Returns `None` if no inline edit changed the value since the last
    /// confirmation.
    pub fn confirm(&mut self) -> Option<FieldChange<T>> {
        let previous = self.inline_start.take()?;
        for listener in &mut self.confirm_listeners {
            listener(&self.value);
        }
        Some(FieldChange {
            previous,
            current: self.value.clone(),
            confirmed: true,
        })
    }

    fn commit(&mut self, value: PropertyDistribution<T>, confirmed: bool) -> FieldChange<T> {
        self.cache = ValueCache::from_value(&value);
        let replaced = std::mem::replace(&mut self.value, value);
        for listener in &mut self.listeners {
            listener(&self.value);
        }

        let previous = if confirmed {
            let start = self.inline_start.take().unwrap_or(replaced);
            for listener in &mut self.confirm_listeners {
                listener(&self.value);
            }
            start
        } else {
            if self.inline_start.is_none() {
                self.inline_start = Some(replaced.clone());
            }
            replaced
        };

        FieldChange {
            previous,
            current: self.value.clone(),
            confirmed,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use bevy_distribution::{
        Curve, CurveKey, Gradient, Interp, Vector2Curve, Vector3Curve, split_curve_2d,
    };

    use super::*;
    use crate::session::{ModalRequest, ModalResult, ModalSession, PickerValue};

    /// Holds shown sessions so tests can resolve them.
    #[derive(Default)]
    struct TestHost {
        sessions: Vec<ModalSession>,
    }

    impl ModalEditHost for TestHost {
        fn show(&mut self, session: ModalSession) {
            self.sessions.push(session);
        }
    }

    impl TestHost {
        fn take(&mut self) -> ModalSession {
            self.sessions.pop().expect("a session was shown")
        }
    }

    fn counted<T: DistributionKind>(field: &mut DistributionField<T>) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        field.on_changed(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        count
    }

    fn fields_of_every_variant<T: DistributionKind>(
        constant: T,
        other: T,
    ) -> Vec<PropertyDistribution<T>> {
        vec![
            PropertyDistribution::constant(constant.clone()),
            PropertyDistribution::range(constant.clone(), other.clone()),
            PropertyDistribution::curve(T::flat_curve(&constant)),
            PropertyDistribution::curve_range(T::flat_curve(&constant), T::flat_curve(&other)),
        ]
    }

    fn assert_cancel_is_noop<T: DistributionKind>(values: Vec<PropertyDistribution<T>>) {
        for value in values {
            let mut field = DistributionField::with_value("test", value.clone());
            let count = counted(&mut field);
            let mut host = TestHost::default();

            field
                .click(&mut host, FieldClick::component(0))
                .expect("every variant opens a modal");
            assert!(field.is_editing());
            host.take().cancel();

            assert_eq!(field.poll(), None);
            assert_eq!(field.value(), &value);
            assert_eq!(count.load(Ordering::SeqCst), 0);
            assert!(!field.is_editing());
        }
    }

    #[test]
    fn cancel_is_a_noop_for_every_kind_and_variant() {
        assert_cancel_is_noop(fields_of_every_variant(1.0f32, 2.0));
        assert_cancel_is_noop(fields_of_every_variant(Vec2::ONE, Vec2::X));
        assert_cancel_is_noop(fields_of_every_variant(Vec3::ONE, Vec3::Z));
        assert_cancel_is_noop(fields_of_every_variant(LinearRgba::RED, LinearRgba::BLUE));
    }

    #[test]
    fn accepted_constant_rebuilds_and_notifies_once() {
        let mut field = DistributionField::with_value("size", PropertyDistribution::constant(5.0f32));
        let count = counted(&mut field);
        let mut host = TestHost::default();

        field.click(&mut host, FieldClick::min()).expect("constant");
        let session = host.take();
        assert_eq!(
            session.request(),
            &ModalRequest::ValuePicker {
                initial: PickerValue::Float(5.0)
            }
        );
        session.accept(ModalResult::Value(PickerValue::Float(7.0)));

        let change = field.poll().expect("accepted");
        assert_eq!(change.previous, PropertyDistribution::constant(5.0));
        assert_eq!(field.value(), &PropertyDistribution::constant(7.0));
        assert_eq!(count.load(Ordering::SeqCst), 1);

        // Nothing left to deliver.
        assert_eq!(field.poll(), None);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn range_min_edit_leaves_max() {
        let mut field = DistributionField::with_value("speed", PropertyDistribution::range(1.0f32, 9.0));
        let mut host = TestHost::default();

        field.click(&mut host, FieldClick::min()).expect("range");
        host.take().accept(ModalResult::Value(PickerValue::Float(2.0)));
        field.poll();

        assert_eq!(field.value(), &PropertyDistribution::range(2.0, 9.0));
    }

    #[test]
    fn out_of_range_component_opens_nothing() {
        let value = PropertyDistribution::<Vec2>::curve(Vector2Curve::linear(Vec2::ZERO, Vec2::ONE));
        let mut field = DistributionField::with_value("offset", value.clone());
        let mut host = TestHost::default();

        let err = field.click(&mut host, FieldClick::component(2));
        assert_eq!(
            err,
            Err(FieldError::ComponentOutOfRange {
                component: 2,
                components: 2
            })
        );
        assert!(host.sessions.is_empty());
        assert!(!field.is_editing());
        assert_eq!(field.value(), &value);
    }

    #[test]
    fn vector_component_edit_keeps_other_axis() {
        let c_a = Curve {
            keys: vec![
                CurveKey { time: 0.0, value: 0.0, interp: Interp::EaseIn },
                CurveKey { time: 1.0, value: 1.0, interp: Interp::Linear },
            ],
        };
        let c_b = Curve::linear(5.0, 6.0);
        let compound = bevy_distribution::combine_curve_2d(&[c_a.clone(), c_b.clone()]);
        let mut field = DistributionField::<Vec2>::with_value("offset", PropertyDistribution::curve(compound));
        let mut host = TestHost::default();

        field.click(&mut host, FieldClick::component(1)).expect("axis 1");
        let session = host.take();
        assert_eq!(session.request(), &ModalRequest::CurveEditor { curve: c_b });

        // The edit adds a key at a time axis 0 has no key for.
        let mut c_b_edited = Curve::linear(-2.0, 3.0);
        c_b_edited.keys.insert(
            1,
            CurveKey { time: 0.5, value: 8.0, interp: Interp::EaseOut },
        );
        session.accept(ModalResult::Curve(c_b_edited.clone()));
        field.poll().expect("accepted");

        let edited = field.value().min_curve().expect("still a curve");
        assert!((edited.sample(0.75).x - 0.5625).abs() < 1e-6);
        assert_eq!(split_curve_2d(edited), vec![c_a, c_b_edited]);
    }

    #[test]
    fn second_click_while_open_is_rejected() {
        let mut field = DistributionField::with_value("size", PropertyDistribution::constant(1.0f32));
        let mut host = TestHost::default();

        let first = field.click(&mut host, FieldClick::min()).expect("first");
        assert_eq!(field.click(&mut host, FieldClick::min()), Err(FieldError::SessionActive));
        assert_eq!(host.sessions.len(), 1);
        assert_eq!(field.pending_session(), Some(first));
        assert_eq!(
            field.set_value(PropertyDistribution::constant(3.0)),
            Err(FieldError::SessionActive)
        );
    }

    #[test]
    fn unresolved_session_keeps_field_busy() {
        let mut field = DistributionField::with_value("size", PropertyDistribution::constant(1.0f32));
        let mut host = TestHost::default();
        field.click(&mut host, FieldClick::min()).expect("click");

        assert_eq!(field.poll(), None);
        assert!(field.is_editing());

        // Closing the window without a choice counts as cancel.
        host.sessions.clear();
        assert_eq!(field.poll(), None);
        assert!(!field.is_editing());
    }

    #[test]
    fn scalar_curve_range_edits_both_curves() {
        let mut field = DistributionField::<f32>::with_value(
            "size",
            PropertyDistribution::curve_range(Curve::constant(0.0f32), Curve::constant(1.0)),
        );
        let mut host = TestHost::default();
        field.click(&mut host, FieldClick::min()).expect("click");
        host.take().accept(ModalResult::CurveRange(
            Curve::linear(0.0, 2.0),
            Curve::linear(1.0, 3.0),
        ));
        field.poll();
        assert_eq!(
            field.value(),
            &PropertyDistribution::curve_range(Curve::linear(0.0, 2.0), Curve::linear(1.0, 3.0))
        );
    }

    #[test]
    fn gradient_curve_opens_gradient_picker() {
        let gradient = Gradient::white_to_transparent();
        let mut field = DistributionField::<LinearRgba>::with_value("tint", PropertyDistribution::curve(gradient.clone()));
        let mut host = TestHost::default();
        field.click(&mut host, FieldClick::min()).expect("click");
        assert_eq!(
            host.take().request(),
            &ModalRequest::GradientPicker { initial: gradient }
        );
    }

    #[test]
    fn type_switch_reuses_cached_values() {
        let mut field = DistributionField::with_value("size", PropertyDistribution::range(2.0f32, 4.0));
        let count = counted(&mut field);

        let change = field
            .set_distribution_type(DistributionType::RandomCurveRange)
            .expect("idle")
            .expect("type changed");
        assert_eq!(
            change.current,
            PropertyDistribution::curve_range(Curve::constant(2.0), Curve::constant(4.0))
        );

        field
            .set_distribution_type(DistributionType::RandomRange)
            .expect("idle");
        assert_eq!(field.value(), &PropertyDistribution::range(2.0, 4.0));
        assert_eq!(count.load(Ordering::SeqCst), 2);

        assert_eq!(field.set_distribution_type(DistributionType::RandomRange), Ok(None));
    }

    #[test]
    fn vector_type_switch_samples_curve_start() {
        let mut field = DistributionField::with_value(
            "velocity",
            PropertyDistribution::curve(Vector3Curve::linear(Vec3::X, Vec3::Y)),
        );
        field
            .set_distribution_type(DistributionType::Constant)
            .expect("idle");
        assert_eq!(field.value(), &PropertyDistribution::constant(Vec3::X));
    }

    #[test]
    fn inline_constant_edit() {
        let mut field = DistributionField::with_value("size", PropertyDistribution::range(1.0f32, 2.0));
        let change = field.set_constant(RangeHalf::Max, 5.0).expect("range");
        assert_eq!(change.current, PropertyDistribution::range(1.0, 5.0));
        assert!(!change.confirmed);

        field
            .set_distribution_type(DistributionType::Curve)
            .expect("idle");
        assert_eq!(
            field.set_constant(RangeHalf::Min, 3.0),
            Err(FieldError::NotApplicable(DistributionType::Curve))
        );
    }

    fn confirm_count<T: DistributionKind>(field: &mut DistributionField<T>) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        field.on_confirmed(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        count
    }

    #[test]
    fn dragged_constant_confirms_once_on_release() {
        let mut field = DistributionField::with_value("size", PropertyDistribution::constant(1.0f32));
        let changed = counted(&mut field);
        let confirmed = confirm_count(&mut field);

        // One call per drag frame.
        for value in [1.5, 2.0, 2.5] {
            let change = field.set_constant(RangeHalf::Min, value).expect("constant");
            assert!(!change.confirmed);
        }
        assert_eq!(changed.load(Ordering::SeqCst), 3);
        assert_eq!(confirmed.load(Ordering::SeqCst), 0);
        assert!(field.has_unconfirmed_edit());

        let change = field.confirm().expect("drag changed the value");
        assert!(change.confirmed);
        assert_eq!(change.previous, PropertyDistribution::constant(1.0));
        assert_eq!(change.current, PropertyDistribution::constant(2.5));
        assert_eq!(confirmed.load(Ordering::SeqCst), 1);

        // A release with nothing dragged confirms nothing.
        assert_eq!(field.confirm(), None);
        assert_eq!(confirmed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn modal_edits_and_type_switches_are_confirmed() {
        let mut field = DistributionField::with_value("size", PropertyDistribution::constant(1.0f32));
        let confirmed = confirm_count(&mut field);
        let mut host = TestHost::default();

        field.click(&mut host, FieldClick::min()).expect("constant");
        host.take().accept(ModalResult::Value(PickerValue::Float(4.0)));
        assert!(field.poll().expect("accepted").confirmed);
        assert_eq!(confirmed.load(Ordering::SeqCst), 1);

        let change = field
            .set_distribution_type(DistributionType::Curve)
            .expect("idle")
            .expect("type changed");
        assert!(change.confirmed);
        assert_eq!(confirmed.load(Ordering::SeqCst), 2);

        // Cancel confirms nothing.
        field.click(&mut host, FieldClick::min()).expect("curve");
        host.take().cancel();
        assert_eq!(field.poll(), None);
        assert_eq!(confirmed.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn set_value_drops_an_unconfirmed_edit() {
        let mut field = DistributionField::with_value("size", PropertyDistribution::constant(1.0f32));
        field.set_constant(RangeHalf::Min, 2.0).expect("constant");
        field.set_value(PropertyDistribution::constant(9.0)).expect("idle");
        assert!(!field.has_unconfirmed_edit());
        assert_eq!(field.confirm(), None);
    }
}
