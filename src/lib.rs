//! Interactive canvas layout engine.
//!
//! Geometry and connection state for a pannable/zoomable workspace of
//! heterogeneous nodes: proximity auto-connection, iterative overlap
//! resolution, debounced orthogonal edge routing, zoom-adaptive overlay
//! sizing, and z-order management. The host owns the node/edge store and
//! the renderer; this crate only consumes snapshots and hands back
//! positions, edges, and routes.

pub mod collision;
pub mod config;
pub mod error;
pub mod layering;
pub mod model;
pub mod proximity;
pub mod routing;
pub mod scaling;

pub use collision::{CollisionOutcome, ExcludedPairs, resolve};
pub use config::{
    CanvasConfig, CollisionConfig, ProximityConfig, RoutingConfig, ScalingConfig,
};
pub use error::{LayoutError, Result};
pub use layering::LayerManager;
pub use model::{
    CanvasNode, HandleSide, NodeBox, NodeType, Point, RouteMap, Size, WorkspaceEdge,
};
pub use proximity::{ProximityCandidate, ProximityConnectionManager};
pub use routing::{
    DebouncedEdgeRouting, EdgeRouter, EdgeSolver, OrthogonalSolver,
    create_debounced_edge_routing,
};
pub use scaling::{
    EdgeScaledSizes, ResizeHandleScaledSizes, ScalingPolicy, edge_scaled_sizes,
    resize_handle_scaled_sizes, scaled_size,
};
