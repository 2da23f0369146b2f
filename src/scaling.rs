//! Zoom-adaptive size scaling for overlay elements.
//!
//! Overlays live in canvas space but must stay legible on screen, so their
//! design-time base sizes are corrected for the current zoom before drawing.

use crate::config::ScalingConfig;

/// Smallest zoom used in scaling math. Degenerate zooms are clamped here
/// rather than rejected, so sizes stay finite.
pub const MIN_ZOOM: f32 = 1e-3;

/// How a base size responds to zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalingPolicy {
    /// `base / zoom`: identical apparent size on screen at every zoom.
    /// Used for stroke widths and resize handles.
    Constant,
    /// Power-curve shrink below zoom 1, linear growth above it. Used for
    /// markers, which should neither balloon when zoomed out nor vanish
    /// when zoomed in.
    Adaptive,
}

fn clamp_zoom(zoom: f32) -> f32 {
    if zoom.is_finite() {
        zoom.max(MIN_ZOOM)
    } else {
        MIN_ZOOM
    }
}

fn adaptive_multiplier(zoom: f32, config: &ScalingConfig) -> f32 {
    if zoom < 1.0 {
        zoom.powf(config.shrink_exponent)
    } else {
        1.0 + (zoom - 1.0) * config.growth_rate
    }
}

/// Convert a base (zoom = 1) size into the size to render at `zoom`.
pub fn scaled_size(base: f32, zoom: f32, policy: ScalingPolicy, config: &ScalingConfig) -> f32 {
    let zoom = clamp_zoom(zoom);
    match policy {
        ScalingPolicy::Constant => base / zoom,
        ScalingPolicy::Adaptive => base * adaptive_multiplier(zoom, config) / zoom,
    }
}

/// Zoom-corrected sizes for edge rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeScaledSizes {
    pub stroke_width: f32,
    pub marker_size: f32,
    pub source_marker_offset: f32,
    pub target_marker_offset: f32,
}

pub fn edge_scaled_sizes(zoom: f32, config: &ScalingConfig) -> EdgeScaledSizes {
    EdgeScaledSizes {
        stroke_width: scaled_size(config.stroke_width, zoom, ScalingPolicy::Constant, config),
        marker_size: scaled_size(config.marker_size, zoom, ScalingPolicy::Adaptive, config),
        source_marker_offset: scaled_size(
            config.source_marker_offset,
            zoom,
            ScalingPolicy::Adaptive,
            config,
        ),
        target_marker_offset: scaled_size(
            config.target_marker_offset,
            zoom,
            ScalingPolicy::Adaptive,
            config,
        ),
    }
}

/// Zoom-corrected sizes for resize handles, floored at the configured
/// minimum so handles stay grabbable at high zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeHandleScaledSizes {
    pub size: f32,
    pub offset: f32,
}

pub fn resize_handle_scaled_sizes(zoom: f32, config: &ScalingConfig) -> ResizeHandleScaledSizes {
    let size = scaled_size(config.handle_size, zoom, ScalingPolicy::Constant, config);
    ResizeHandleScaledSizes {
        size: size.max(config.min_handle_size),
        offset: scaled_size(config.handle_offset, zoom, ScalingPolicy::Constant, config),
    }
}
