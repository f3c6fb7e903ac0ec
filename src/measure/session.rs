//! Measurement point list and its editing operations.

use super::MeasureState;
use crate::geometry::NormPoint;

/// Ordered measurement points of one viewer session.
///
/// Consecutive points form segments: points 0 and 1, 2 and 3, and so on. A
/// trailing odd point waits for its partner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasureSession {
    points: Vec<NormPoint>,
    /// Index of the point being dragged, if any
    dragging: Option<usize>,
}

impl MeasureSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from previously stored points. Invalid points are dropped.
    pub fn from_points(points: impl IntoIterator<Item = NormPoint>) -> Self {
        Self {
            points: points.into_iter().filter(NormPoint::in_unit_square).collect(),
            dragging: None,
        }
    }

    pub fn points(&self) -> &[NormPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn state(&self) -> MeasureState {
        if self.points.is_empty() {
            MeasureState::Idle
        } else {
            MeasureState::PlacingPoints
        }
    }

    /// Append a point.
    ///
    /// Points must be finite and inside the image. Nothing is added while a
    /// point is being dragged. Returns whether the point was added.
    pub fn add_point(&mut self, point: NormPoint) -> bool {
        if self.dragging.is_some() || !point.in_unit_square() {
            return false;
        }
        self.points.push(point);
        true
    }

    /// Remove the last point.
    pub fn undo(&mut self) -> Option<NormPoint> {
        let removed = self.points.pop();
        if self.dragging.is_some_and(|idx| idx >= self.points.len()) {
            self.dragging = None;
        }
        removed
    }

    /// Remove all points.
    pub fn reset(&mut self) {
        self.points.clear();
        self.dragging = None;
    }

    /// Completed pairs as `(index of first point, a, b)`.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, NormPoint, NormPoint)> + '_ {
        self.points
            .chunks_exact(2)
            .enumerate()
            .map(|(i, pair)| (i * 2, pair[0], pair[1]))
    }

    pub fn segment_count(&self) -> usize {
        self.points.len() / 2
    }

    /// A point has been placed and waits for its partner.
    pub fn has_pending_point(&self) -> bool {
        self.points.len() % 2 == 1
    }

    /// Start dragging the point at `idx`. Returns false for unknown indices.
    pub fn begin_drag(&mut self, idx: usize) -> bool {
        if idx < self.points.len() {
            self.dragging = Some(idx);
            true
        } else {
            false
        }
    }

    /// Move the dragged point, clamped into the image.
    pub fn drag_to(&mut self, point: NormPoint) -> bool {
        if !point.is_finite() {
            return false;
        }
        match self.dragging.and_then(|idx| self.points.get_mut(idx)) {
            Some(slot) => {
                *slot = point.clamped();
                true
            }
            None => false,
        }
    }

    pub fn end_drag(&mut self) {
        self.dragging = None;
    }

    pub fn dragging(&self) -> Option<usize> {
        self.dragging
    }
}
