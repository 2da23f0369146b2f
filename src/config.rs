use serde::{Deserialize, Serialize};

/// Collision resolution tuning (see [`crate::collision::resolve`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollisionConfig {
    /// Hard cap on resolution passes.
    pub iterations: usize,
    /// Minimum penetration (px) before a pair is pushed apart. Filters
    /// floating-point jitter from counting as overlap.
    pub overlap_threshold: f32,
    /// Symmetric inflation (px) applied to every box before comparison so
    /// resolved nodes keep visual breathing room.
    pub margin: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            iterations: 50,
            overlap_threshold: 0.5,
            margin: 20.0,
        }
    }
}

/// Proximity auto-connection tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProximityConfig {
    /// Center-to-center distance (px) under which a connectable neighbor
    /// becomes a candidate.
    pub connect_distance: f32,
    /// Fractional attachment position along the handle side for edges
    /// created by proximity connection.
    pub attach_t: f32,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            connect_distance: 200.0,
            attach_t: 0.5,
        }
    }
}

/// Edge routing tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Debounce delay in milliseconds for scheduled routing passes.
    pub debounce_ms: u64,
    /// Length (px) of the straight stub leaving each port before the route
    /// may turn.
    pub port_stub: f32,
    /// Clearance (px) kept between a detour channel and the node boxes it
    /// routes around.
    pub detour_pad: f32,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 50,
            port_stub: 20.0,
            detour_pad: 24.0,
        }
    }
}

/// Base (zoom = 1) sizes for zoom-scaled overlay elements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalingConfig {
    pub stroke_width: f32,
    pub marker_size: f32,
    pub source_marker_offset: f32,
    /// Kept larger than `source_marker_offset` so the arrowhead clears the
    /// target node at every zoom.
    pub target_marker_offset: f32,
    pub handle_size: f32,
    pub handle_offset: f32,
    /// Floor for the scaled resize-handle size.
    pub min_handle_size: f32,
    /// Exponent of the sub-unity shrink curve in adaptive scaling.
    pub shrink_exponent: f32,
    /// Linear growth rate above zoom 1 in adaptive scaling.
    pub growth_rate: f32,
}

impl Default for ScalingConfig {
    fn default() -> Self {
        Self {
            stroke_width: 2.0,
            marker_size: 10.0,
            source_marker_offset: 6.0,
            target_marker_offset: 14.0,
            handle_size: 12.0,
            handle_offset: 6.0,
            min_handle_size: 8.0,
            shrink_exponent: 0.4,
            growth_rate: 0.5,
        }
    }
}

/// Aggregate configuration for the whole engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CanvasConfig {
    pub collision: CollisionConfig,
    pub proximity: ProximityConfig,
    pub routing: RoutingConfig,
    pub scaling: ScalingConfig,
}
