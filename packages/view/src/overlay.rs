//! Insights overlay identity and dragging.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ScreenPoint, ScreenRect, ScreenSize};

/// Identifies one opening of the insights overlay.
///
/// Every open gets a fresh id, so a delayed event naming an older overlay
/// can be told apart from the one currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OverlayId(pub u64);

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "overlay-{}", self.0)
    }
}

/// An in-progress drag of the insights overlay by its header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pointer_start: ScreenPoint,
    overlay_start: ScreenPoint,
    padding: f64,
}

impl DragSession {
    /// Starts a drag with the pointer at `pointer` and the overlay's top-left
    /// corner at `overlay_origin`. The overlay is kept `padding` pixels
    /// inside the container.
    #[must_use]
    pub const fn begin(pointer: ScreenPoint, overlay_origin: ScreenPoint, padding: f64) -> Self {
        Self {
            pointer_start: pointer,
            overlay_start: overlay_origin,
            padding,
        }
    }

    /// Where the overlay's top-left corner goes for the current pointer
    /// position, clamped inside `container`.
    ///
    /// When the overlay is larger than the container the near edge wins.
    #[must_use]
    pub fn position_for(
        &self,
        pointer: ScreenPoint,
        container: ScreenRect,
        overlay: ScreenSize,
    ) -> ScreenPoint {
        let left = self.overlay_start.x + (pointer.x - self.pointer_start.x);
        let top = self.overlay_start.y + (pointer.y - self.pointer_start.y);

        ScreenPoint::new(
            clamp_to(
                left,
                container.left + self.padding,
                container.right() - overlay.width - self.padding,
            ),
            clamp_to(
                top,
                container.top + self.padding,
                container.bottom() - overlay.height - self.padding,
            ),
        )
    }
}

fn clamp_to(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTAINER: ScreenRect = ScreenRect::new(0.0, 0.0, 800.0, 600.0);
    const OVERLAY: ScreenSize = ScreenSize::new(320.0, 240.0);

    #[test]
    fn follows_pointer_delta() {
        let drag = DragSession::begin(
            ScreenPoint::new(100.0, 100.0),
            ScreenPoint::new(50.0, 60.0),
            10.0,
        );
        let position = drag.position_for(ScreenPoint::new(130.0, 80.0), CONTAINER, OVERLAY);
        assert_eq!(position, ScreenPoint::new(80.0, 40.0));
    }

    #[test]
    fn clamps_inside_container_with_padding() {
        let drag = DragSession::begin(
            ScreenPoint::new(100.0, 100.0),
            ScreenPoint::new(50.0, 60.0),
            10.0,
        );

        let top_left = drag.position_for(ScreenPoint::new(-500.0, -500.0), CONTAINER, OVERLAY);
        assert_eq!(top_left, ScreenPoint::new(10.0, 10.0));

        let bottom_right =
            drag.position_for(ScreenPoint::new(5000.0, 5000.0), CONTAINER, OVERLAY);
        assert_eq!(bottom_right, ScreenPoint::new(470.0, 350.0));
    }

    #[test]
    fn oversized_overlay_pins_to_near_edge() {
        let drag = DragSession::begin(ScreenPoint::default(), ScreenPoint::default(), 10.0);
        let position = drag.position_for(
            ScreenPoint::new(300.0, 300.0),
            ScreenRect::new(100.0, 50.0, 200.0, 100.0),
            OVERLAY,
        );
        assert_eq!(position, ScreenPoint::new(110.0, 60.0));
    }

    #[test]
    fn overlay_ids_display() {
        assert_eq!(OverlayId(3).to_string(), "overlay-3");
    }
}
