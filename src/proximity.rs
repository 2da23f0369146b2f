//! Proximity-based auto-connection.
//!
//! While a node is dragged, the manager scans the mirrored board for a
//! connectable neighbor within reach and holds at most one transient
//! candidate. Dropping the node commits the candidate into a real edge;
//! dragging away clears it. The manager mirrors the host's node/edge store
//! and never mutates host state directly: new edges are handed back through
//! the `on_edges_change` callback.

use tracing::debug;
use uuid::Uuid;

use crate::config::ProximityConfig;
use crate::model::{
    CanvasNode, HandleSide, Point, Size, WorkspaceEdge, can_connect, pair_key,
};

/// A potential connection detected during a drag. Ephemeral: superseded by
/// the next `check_proximity` call or consumed by `commit`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProximityCandidate {
    pub dragged_node_id: String,
    pub other_node_id: String,
    /// Non-bridge endpoint of the edge that a commit would create. Direction
    /// is normalized at detection time so the edge shape does not depend on
    /// which node was dragged.
    pub source_node_id: String,
    /// Bridge (thread) endpoint.
    pub target_node_id: String,
    pub source_handle: HandleSide,
    pub target_handle: HandleSide,
}

/// Host callback invoked with the full edge list after a successful commit.
pub type EdgesChanged = Box<dyn FnMut(&[WorkspaceEdge])>;
/// Host callback for edge selection notifications (pass-through).
pub type SelectedEdgeChanged = Box<dyn FnMut(Option<&str>)>;

pub struct ProximityConnectionManager {
    config: ProximityConfig,
    nodes: Vec<CanvasNode>,
    edges: Vec<WorkspaceEdge>,
    candidate: Option<ProximityCandidate>,
    on_edges_change: EdgesChanged,
    on_selected_edge_change: Option<SelectedEdgeChanged>,
}

impl std::fmt::Debug for ProximityConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProximityConnectionManager")
            .field("nodes", &self.nodes.len())
            .field("edges", &self.edges.len())
            .field("candidate", &self.candidate)
            .finish()
    }
}

impl ProximityConnectionManager {
    pub fn new(config: ProximityConfig, on_edges_change: EdgesChanged) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            edges: Vec::new(),
            candidate: None,
            on_edges_change,
            on_selected_edge_change: None,
        }
    }

    pub fn with_selection_callback(mut self, callback: SelectedEdgeChanged) -> Self {
        self.on_selected_edge_change = Some(callback);
        self
    }

    /// Replace the mirrored node snapshot. Never transitions the candidate
    /// state by itself.
    pub fn sync_nodes(&mut self, nodes: Vec<CanvasNode>) {
        self.nodes = nodes;
    }

    /// Replace the mirrored edge snapshot.
    pub fn sync_edges(&mut self, edges: Vec<WorkspaceEdge>) {
        self.edges = edges;
    }

    pub fn candidate(&self) -> Option<&ProximityCandidate> {
        self.candidate.as_ref()
    }

    /// Forward an edge-selection notification to the host. The manager
    /// computes nothing here.
    pub fn select_edge(&mut self, edge_id: Option<&str>) {
        if let Some(callback) = self.on_selected_edge_change.as_mut() {
            callback(edge_id);
        }
    }

    /// Scan for a connectable neighbor of the dragged node at its proposed
    /// position. Holds the nearest eligible neighbor as the candidate, or
    /// clears the held candidate when nothing is in reach anymore. Unknown
    /// dragged ids are ignored.
    pub fn check_proximity(&mut self, dragged_node_id: &str, position: Point, dimensions: Size) {
        let Some(dragged) = self.nodes.iter().find(|n| n.id == dragged_node_id) else {
            return;
        };
        let dragged_type = dragged.node_type;
        let dragged_center = Point::new(
            position.x + dimensions.width / 2.0,
            position.y + dimensions.height / 2.0,
        );

        let mut best: Option<(f32, &CanvasNode)> = None;
        for other in &self.nodes {
            if other.id == dragged_node_id {
                continue;
            }
            if !can_connect(dragged_type, other.node_type) {
                continue;
            }
            if self.edge_exists(dragged_node_id, &other.id) {
                continue;
            }
            let center = other.center();
            let dx = center.x - dragged_center.x;
            let dy = center.y - dragged_center.y;
            let distance = (dx * dx + dy * dy).sqrt();
            if distance >= self.config.connect_distance {
                continue;
            }
            // Strict comparison keeps the first-encountered node on ties.
            match best {
                Some((best_distance, _)) if distance >= best_distance => {}
                _ => best = Some((distance, other)),
            }
        }

        match best {
            Some((distance, other)) => {
                let candidate = build_candidate(
                    dragged_node_id,
                    dragged_type.bridges_connections(),
                    dragged_center,
                    other,
                );
                debug!(
                    dragged = dragged_node_id,
                    other = other.id.as_str(),
                    distance,
                    "proximity candidate"
                );
                self.candidate = Some(candidate);
            }
            None => {
                // Proximity is transient: moving out of reach drops the
                // candidate immediately.
                if self
                    .candidate
                    .as_ref()
                    .is_some_and(|c| c.dragged_node_id == dragged_node_id)
                {
                    self.candidate = None;
                }
            }
        }
    }

    /// Turn the held candidate into a real edge, appended to the mirrored
    /// list and reported through `on_edges_change`. Idempotent per
    /// candidate: with nothing held this is a no-op.
    pub fn commit_proximity_connection(&mut self) {
        let Some(candidate) = self.candidate.take() else {
            return;
        };
        let edge = WorkspaceEdge {
            edge_id: format!("edge-{}", Uuid::new_v4()),
            source_node_id: candidate.source_node_id,
            target_node_id: candidate.target_node_id,
            source_handle: candidate.source_handle,
            target_handle: candidate.target_handle,
            source_t: self.config.attach_t,
            target_t: self.config.attach_t,
        };
        debug!(edge = edge.edge_id.as_str(), "proximity connection committed");
        self.edges.push(edge);
        (self.on_edges_change)(&self.edges);
    }

    fn edge_exists(&self, a: &str, b: &str) -> bool {
        let key = pair_key(a, b);
        self.edges.iter().any(|e| e.pair_key() == key)
    }
}

/// Handle sides come from relative horizontal position: the left node emits
/// from its right handle into the right node's left handle. Source/target
/// are normalized so the bridge node is always the target.
fn build_candidate(
    dragged_node_id: &str,
    dragged_is_bridge: bool,
    dragged_center: Point,
    other: &CanvasNode,
) -> ProximityCandidate {
    let (source_id, target_id, source_center_x, target_center_x) = if dragged_is_bridge {
        (
            other.id.clone(),
            dragged_node_id.to_string(),
            other.center().x,
            dragged_center.x,
        )
    } else {
        (
            dragged_node_id.to_string(),
            other.id.clone(),
            dragged_center.x,
            other.center().x,
        )
    };
    let source_handle = if source_center_x <= target_center_x {
        HandleSide::Right
    } else {
        HandleSide::Left
    };
    ProximityCandidate {
        dragged_node_id: dragged_node_id.to_string(),
        other_node_id: other.id.clone(),
        source_node_id: source_id,
        target_node_id: target_id,
        source_handle,
        target_handle: source_handle.opposite(),
    }
}
