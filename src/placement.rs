//! Geometry for the floating dropdown panel.
//!
//! Pure functions of the trigger's bounding box, the viewport, text
//! direction, and device class. Recomputed on every open; nothing here is
//! cached or read from ambient globals, so the math is testable in
//! isolation.

use neurorecall_notifications_config::TextDirection;

use crate::constants::{
    DROPDOWN_WIDTH, MOBILE_BREAKPOINT, MOBILE_INSET, MOBILE_MAX_HEIGHT_RATIO, TRIGGER_GAP,
    VIEWPORT_MARGIN,
};

/// Bounding box of the bell trigger, in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

/// Viewport dimensions in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

/// Mobile vs desktop presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Mobile,
    Desktop,
}

impl DeviceClass {
    /// Classify from the fixed viewport breakpoint.
    pub fn from_viewport(viewport: Viewport) -> Self {
        if viewport.width <= MOBILE_BREAKPOINT {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }
}

/// Which horizontal offset pins the panel on desktop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HorizontalAnchor {
    /// Offset of the panel's left edge from the viewport's left edge.
    Left(f32),
    /// Offset of the panel's right edge from the viewport's right edge.
    Right(f32),
}

/// Fixed-position style for the dropdown panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropdownPlacement {
    /// Trigger not measurable yet; render layered but without coordinates
    /// until a measurement arrives.
    Unanchored,
    /// Near-full-width sheet pinned under the top edge, behind a backdrop.
    /// Width is implied by the left and right insets.
    Mobile {
        top: f32,
        left: f32,
        right: f32,
        max_height: f32,
    },
    /// Panel anchored below the trigger.
    Desktop {
        top: f32,
        anchor: HorizontalAnchor,
    },
}

/// Compute where the dropdown panel goes.
///
/// The panel never extends past the visible viewport: on desktop the
/// horizontal anchor is clamped so the 320px panel keeps a 10px margin from
/// the nearer edge, and on mobile the panel is pinned near the top with a
/// capped height regardless of direction.
pub fn place_dropdown(
    trigger: Option<TriggerRect>,
    viewport: Viewport,
    direction: TextDirection,
    device: DeviceClass,
) -> DropdownPlacement {
    let Some(trigger) = trigger else {
        return DropdownPlacement::Unanchored;
    };

    if device == DeviceClass::Mobile {
        return DropdownPlacement::Mobile {
            top: MOBILE_INSET,
            left: MOBILE_INSET,
            right: MOBILE_INSET,
            max_height: viewport.height * MOBILE_MAX_HEIGHT_RATIO,
        };
    }

    let top = trigger.bottom + TRIGGER_GAP;

    let anchor = match direction {
        TextDirection::Rtl => {
            // Panel grows rightward from the trigger's left edge
            let mut left = trigger.left;
            if left + DROPDOWN_WIDTH > viewport.width {
                left = viewport.width - DROPDOWN_WIDTH - VIEWPORT_MARGIN;
            }
            HorizontalAnchor::Left(left)
        }
        TextDirection::Ltr => {
            // Panel grows leftward from the trigger's right edge
            let right = if trigger.right - DROPDOWN_WIDTH < 0.0 {
                viewport.width - DROPDOWN_WIDTH - VIEWPORT_MARGIN
            } else {
                viewport.width - trigger.right
            };
            HorizontalAnchor::Right(right)
        }
    };

    DropdownPlacement::Desktop { top, anchor }
}
