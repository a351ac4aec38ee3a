use crate::geometry::curve::SplineCurve;
use crate::math::Point2;
use crate::operations::query::NearestControlPoint;
use crate::solver::EditCommand;

/// Default pointer pick radius around control points.
pub const DEFAULT_PICK_RADIUS: f64 = 5.0;

/// Default marker speed in distance units per second.
pub const DEFAULT_MARKER_SPEED: f64 = 2.0;

/// Pointer input as delivered by the host window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Primary button went down at a position.
    Pressed(Point2),
    /// Pointer moved while the button is held.
    Dragged(Point2),
    /// Primary button went up.
    Released,
}

/// Turns pointer events into control-point edits.
///
/// A press within the pick radius of a control point grabs it; while
/// grabbed, every press or drag moves it under the pointer.
#[derive(Debug, Clone)]
pub struct DragController {
    pick_radius: f64,
    selected: Option<usize>,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(DEFAULT_PICK_RADIUS)
    }
}

impl DragController {
    /// Creates a controller with the given pick radius.
    #[must_use]
    pub fn new(pick_radius: f64) -> Self {
        Self {
            pick_radius,
            selected: None,
        }
    }

    /// Returns the grabbed control point, if any.
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Handles one pointer event against the current reference path.
    pub fn handle(&mut self, event: PointerEvent, reference: &SplineCurve) -> Option<EditCommand> {
        let position = match event {
            PointerEvent::Released => {
                self.selected = None;
                return None;
            }
            PointerEvent::Pressed(position) => {
                if self.selected.is_none() {
                    self.selected =
                        NearestControlPoint::new(position, self.pick_radius).execute(reference);
                }
                position
            }
            PointerEvent::Dragged(position) => position,
        };

        self.selected.map(|index| EditCommand::SetPointPosition {
            index,
            x: position.x,
            y: position.y,
        })
    }
}

/// Relaxation passes per cycle, adjusted by the host's up/down keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IterationControl {
    count: usize,
}

impl IterationControl {
    /// Creates a control starting at `count`.
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self { count }
    }

    /// Returns the current pass count.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Adds one pass.
    pub fn increase(&mut self) {
        self.count = self.count.saturating_add(1);
    }

    /// Removes one pass, stopping at zero.
    pub fn decrease(&mut self) {
        self.count = self.count.saturating_sub(1);
    }
}

/// A point travelling along a closed curve at constant speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    distance: f64,
    speed: f64,
}

impl Default for Marker {
    fn default() -> Self {
        Self::new(1.0, DEFAULT_MARKER_SPEED)
    }
}

impl Marker {
    /// Creates a marker at `distance` moving at `speed` units per second.
    #[must_use]
    pub fn new(distance: f64, speed: f64) -> Self {
        Self { distance, speed }
    }

    /// Returns the distance travelled along the curve.
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Advances by `elapsed` seconds, wrapping at `total_length`.
    pub fn advance(&mut self, elapsed: f64, total_length: f64) {
        self.distance += self.speed * elapsed;
        if total_length > 0.0 {
            self.distance = self.distance.rem_euclid(total_length);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference() -> SplineCurve {
        SplineCurve::new(
            &[
                Point2::new(0.0, 0.0),
                Point2::new(50.0, 0.0),
                Point2::new(50.0, 50.0),
                Point2::new(0.0, 50.0),
            ],
            true,
        )
        .unwrap()
    }

    #[test]
    fn press_near_node_grabs_and_moves_it() {
        let mut drag = DragController::default();
        let cmd = drag.handle(PointerEvent::Pressed(Point2::new(48.0, 2.0)), &reference());
        assert_eq!(drag.selected(), Some(1));
        assert_eq!(
            cmd,
            Some(EditCommand::SetPointPosition {
                index: 1,
                x: 48.0,
                y: 2.0
            })
        );
    }

    #[test]
    fn drag_follows_pointer_until_release() {
        let mut drag = DragController::default();
        let path = reference();
        drag.handle(PointerEvent::Pressed(Point2::new(1.0, 1.0)), &path);
        let cmd = drag.handle(PointerEvent::Dragged(Point2::new(30.0, 30.0)), &path);
        assert_eq!(
            cmd,
            Some(EditCommand::SetPointPosition {
                index: 0,
                x: 30.0,
                y: 30.0
            })
        );
        assert_eq!(drag.handle(PointerEvent::Released, &path), None);
        assert_eq!(drag.selected(), None);
        assert_eq!(drag.handle(PointerEvent::Dragged(Point2::new(1.0, 1.0)), &path), None);
    }

    #[test]
    fn press_in_empty_space_selects_nothing() {
        let mut drag = DragController::default();
        let cmd = drag.handle(PointerEvent::Pressed(Point2::new(25.0, 25.0)), &reference());
        assert_eq!(cmd, None);
        assert_eq!(drag.selected(), None);
    }

    #[test]
    fn iteration_count_floors_at_zero() {
        let mut control = IterationControl::new(1);
        control.decrease();
        control.decrease();
        assert_eq!(control.count(), 0);
        control.increase();
        control.increase();
        assert_eq!(control.count(), 2);
    }

    #[test]
    fn marker_wraps_at_total_length() {
        let mut marker = Marker::default();
        marker.advance(2.0, 10.0);
        assert_relative_eq!(marker.distance(), 5.0);
        marker.advance(3.0, 10.0);
        assert_relative_eq!(marker.distance(), 1.0);
    }

    #[test]
    fn marker_ignores_empty_curve() {
        let mut marker = Marker::new(0.0, 2.0);
        marker.advance(1.0, 0.0);
        assert_relative_eq!(marker.distance(), 2.0);
    }
}
