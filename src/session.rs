//! Modal edit sessions.
//!
//! A field asks a [`ModalEditHost`] to show a picker and gets a
//! [`PendingSession`] back. The host keeps the matching [`ModalSession`] until
//! the user accepts or cancels, then resolves it. Resolving consumes the
//! session, so each one completes exactly once; a session dropped without
//! being resolved reads as cancelled.

use std::sync::atomic::{AtomicU64, Ordering};

use bevy::prelude::*;
use bevy_distribution::{Curve, Gradient};
use crossbeam_channel::{Receiver, Sender, TryRecvError};

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies one modal session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    fn next() -> Self {
        Self(NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Numeric payload of the value picker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PickerValue {
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
}

/// The kinds of modal editor a field can open.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModalKind {
    ColorPicker,
    GradientPicker,
    ValuePicker,
    CurveEditor,
    CurveRangeEditor,
}

impl ModalKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::ColorPicker => "Color",
            Self::GradientPicker => "Gradient",
            Self::ValuePicker => "Value",
            Self::CurveEditor => "Curve",
            Self::CurveRangeEditor => "Curve Range",
        }
    }
}

/// What a modal editor is asked to show.
#[derive(Clone, Debug, PartialEq)]
pub enum ModalRequest {
    ColorPicker { initial: LinearRgba, allow_hdr: bool },
    GradientPicker { initial: Gradient },
    ValuePicker { initial: PickerValue },
    CurveEditor { curve: Curve<f32> },
    /// Two curves edited together, e.g. the bounds of a curve range.
    CurveRangeEditor { min: Curve<f32>, max: Curve<f32> },
}

impl ModalRequest {
    pub fn kind(&self) -> ModalKind {
        match self {
            Self::ColorPicker { .. } => ModalKind::ColorPicker,
            Self::GradientPicker { .. } => ModalKind::GradientPicker,
            Self::ValuePicker { .. } => ModalKind::ValuePicker,
            Self::CurveEditor { .. } => ModalKind::CurveEditor,
            Self::CurveRangeEditor { .. } => ModalKind::CurveRangeEditor,
        }
    }
}

/// The edited value a modal editor hands back on accept.
#[derive(Clone, Debug, PartialEq)]
pub enum ModalResult {
    Color(LinearRgba),
    Gradient(Gradient),
    Value(PickerValue),
    Curve(Curve<f32>),
    CurveRange(Curve<f32>, Curve<f32>),
}

impl ModalResult {
    pub fn kind(&self) -> ModalKind {
        match self {
            Self::Color(_) => ModalKind::ColorPicker,
            Self::Gradient(_) => ModalKind::GradientPicker,
            Self::Value(_) => ModalKind::ValuePicker,
            Self::Curve(_) => ModalKind::CurveEditor,
            Self::CurveRange(..) => ModalKind::CurveRangeEditor,
        }
    }
}

/// How a modal session ended.
#[derive(Clone, Debug, PartialEq)]
pub enum EditOutcome<P> {
    Accepted(P),
    Cancelled,
}

/// Host side of a session: the request to display and the means to finish it.
pub struct ModalSession {
    id: SessionId,
    request: ModalRequest,
    sender: Sender<EditOutcome<ModalResult>>,
}

impl ModalSession {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn request(&self) -> &ModalRequest {
        &self.request
    }

    /// Finish the session with an edited value.
    ///
    /// A result of a different kind than the request is delivered as a cancel.
    pub fn accept(self, result: ModalResult) {
        if result.kind() != self.request.kind() {
            warn!(
                "Modal session {} expected a {:?} result but got {:?}; treating as cancel",
                self.id,
                self.request.kind(),
                result.kind()
            );
            self.finish(EditOutcome::Cancelled);
            return;
        }
        self.finish(EditOutcome::Accepted(result));
    }

    /// Finish the session without an edit.
    pub fn cancel(self) {
        self.finish(EditOutcome::Cancelled);
    }

    fn finish(self, outcome: EditOutcome<ModalResult>) {
        // The field may have been despawned while the modal was open.
        if self.sender.try_send(outcome).is_err() {
            debug!("Modal session {} finished after its field went away", self.id);
        }
    }
}

impl std::fmt::Debug for ModalSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModalSession")
            .field("id", &self.id)
            .field("kind", &self.request.kind())
            .finish()
    }
}

/// Field side of a session, polled on the UI schedule.
pub struct PendingSession {
    id: SessionId,
    kind: ModalKind,
    receiver: Receiver<EditOutcome<ModalResult>>,
}

impl PendingSession {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn kind(&self) -> ModalKind {
        self.kind
    }

    /// The outcome, once the host has resolved or dropped the session.
    pub fn try_outcome(&self) -> Option<EditOutcome<ModalResult>> {
        match self.receiver.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(EditOutcome::Cancelled),
        }
    }
}

/// Create both halves of a session for `request`.
pub fn open_session(request: ModalRequest) -> (ModalSession, PendingSession) {
    let (sender, receiver) = crossbeam_channel::bounded(1);
    let id = SessionId::next();
    let pending = PendingSession {
        id,
        kind: request.kind(),
        receiver,
    };
    (
        ModalSession {
            id,
            request,
            sender,
        },
        pending,
    )
}

/// Something that can display modal editors.
///
/// `show` must return immediately; the host resolves the session later.
pub trait ModalEditHost {
    fn show(&mut self, session: ModalSession);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_until_resolved() {
        let (session, pending) = open_session(ModalRequest::CurveEditor {
            curve: Curve::constant(1.0),
        });
        assert_eq!(pending.try_outcome(), None);

        session.accept(ModalResult::Curve(Curve::constant(2.0)));
        assert_eq!(
            pending.try_outcome(),
            Some(EditOutcome::Accepted(ModalResult::Curve(Curve::constant(2.0))))
        );
    }

    #[test]
    fn dropped_session_reads_as_cancel() {
        let (session, pending) = open_session(ModalRequest::ValuePicker {
            initial: PickerValue::Float(1.0),
        });
        drop(session);
        assert_eq!(pending.try_outcome(), Some(EditOutcome::Cancelled));
    }

    #[test]
    fn mismatched_result_is_a_cancel() {
        let (session, pending) = open_session(ModalRequest::ColorPicker {
            initial: LinearRgba::RED,
            allow_hdr: false,
        });
        session.accept(ModalResult::Value(PickerValue::Float(3.0)));
        assert_eq!(pending.try_outcome(), Some(EditOutcome::Cancelled));
    }

    #[test]
    fn ids_are_unique() {
        let (a, _) = open_session(ModalRequest::ValuePicker {
            initial: PickerValue::Float(0.0),
        });
        let (b, _) = open_session(ModalRequest::ValuePicker {
            initial: PickerValue::Float(0.0),
        });
        assert_ne!(a.id(), b.id());
    }
}
