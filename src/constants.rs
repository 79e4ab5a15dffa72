// Constants module for neurorecall-notifications
// Centralizes magic numbers for better maintainability

// ============================================================================
// Dropdown Geometry Constants
// ============================================================================

/// Fixed width of the dropdown panel on desktop, in CSS pixels
pub(crate) const DROPDOWN_WIDTH: f32 = 320.0;

/// Viewport width at or below which the mobile layout is used
pub(crate) const MOBILE_BREAKPOINT: f32 = 768.0;

/// Gap between the trigger's bottom edge and the panel's top edge
pub(crate) const TRIGGER_GAP: f32 = 5.0;

/// Margin kept between the panel and the viewport edge when clamping
pub(crate) const VIEWPORT_MARGIN: f32 = 10.0;

/// Inset from the viewport edges for the mobile sheet
pub(crate) const MOBILE_INSET: f32 = 5.0;

/// Fraction of the viewport height the mobile sheet may occupy
pub(crate) const MOBILE_MAX_HEIGHT_RATIO: f32 = 0.9;

// ============================================================================
// Channel and Buffer Constants
// ============================================================================

/// Buffer size for the controller input channel
pub(crate) const INPUT_CHANNEL_CAPACITY: usize = 16;
