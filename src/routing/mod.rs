//! Edge route computation.
//!
//! [`EdgeRouter`] turns a node/edge snapshot into a routing request for an
//! [`EdgeSolver`] and extracts per-edge bend points from the solved
//! polylines. [`debounce::DebouncedEdgeRouting`] wraps a router for the
//! drag-time path, where geometry changes far faster than routes are worth
//! recomputing.

pub mod debounce;
pub mod solver;

use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::model::{CanvasNode, HandleSide, Point, RouteMap, WorkspaceEdge};

pub use debounce::{DebouncedEdgeRouting, create_debounced_edge_routing};
pub use solver::{EdgeSolver, EdgeTask, OrthogonalSolver, PinnedBox, Port, RouteRequest};

/// Routes edges between pinned nodes via a solver supplied at construction.
/// The solver is stateless across calls and shared with the debounce worker
/// through the `Arc`.
#[derive(Clone)]
pub struct EdgeRouter {
    solver: Arc<dyn EdgeSolver>,
}

impl EdgeRouter {
    pub fn new(solver: Arc<dyn EdgeSolver>) -> Self {
        Self { solver }
    }

    /// Compute bend points for every edge in the snapshot. Edges whose
    /// endpoints are missing from `nodes` map to an empty bend list (the
    /// renderer falls back to a straight connector); they are not errors.
    pub fn compute_edge_routes(
        &self,
        nodes: &[CanvasNode],
        edges: &[WorkspaceEdge],
    ) -> Result<RouteMap> {
        let mut routes = RouteMap::new();
        let mut tasks = Vec::with_capacity(edges.len());
        for edge in edges {
            routes.insert(edge.edge_id.clone(), Vec::new());
            let source = nodes.iter().find(|n| n.id == edge.source_node_id);
            let target = nodes.iter().find(|n| n.id == edge.target_node_id);
            let (Some(source), Some(target)) = (source, target) else {
                continue;
            };
            tasks.push(EdgeTask {
                edge_id: edge.edge_id.clone(),
                source: attachment_port(source, edge.source_handle, edge.source_t),
                target: attachment_port(target, edge.target_handle, edge.target_t),
                source_box: pinned_box(source),
                target_box: pinned_box(target),
            });
        }

        let response = self.solver.solve(&RouteRequest { tasks })?;
        for (edge_id, points) in response.paths {
            routes.insert(edge_id, extract_bend_points(&points));
        }
        debug!(edges = edges.len(), "edge routing pass complete");
        Ok(routes)
    }
}

/// Port position implied by a handle side and T fraction along that side.
fn attachment_port(node: &CanvasNode, side: HandleSide, t: f32) -> Port {
    let x = match side {
        HandleSide::Left => node.position.x,
        HandleSide::Right => node.position.x + node.dimensions.width,
    };
    Port {
        x,
        y: node.position.y + node.dimensions.height * t.clamp(0.0, 1.0),
        side,
    }
}

fn pinned_box(node: &CanvasNode) -> PinnedBox {
    PinnedBox {
        x: node.position.x,
        y: node.position.y,
        width: node.dimensions.width,
        height: node.dimensions.height,
    }
}

/// Interior turns only: the port endpoints themselves are excluded, and a
/// two-point polyline yields no bends at all.
fn extract_bend_points(points: &[(f32, f32)]) -> Vec<Point> {
    if points.len() <= 2 {
        return Vec::new();
    }
    points[1..points.len() - 1]
        .iter()
        .map(|&(x, y)| Point::new(x, y))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NodeType, Size};

    fn node(id: &str, x: f32, y: f32) -> CanvasNode {
        CanvasNode::new(
            id,
            NodeType::Document,
            Point::new(x, y),
            Size::new(100.0, 100.0),
        )
    }

    fn edge(id: &str, source: &str, target: &str) -> WorkspaceEdge {
        WorkspaceEdge {
            edge_id: id.to_string(),
            source_node_id: source.to_string(),
            target_node_id: target.to_string(),
            source_handle: HandleSide::Right,
            target_handle: HandleSide::Left,
            source_t: 0.5,
            target_t: 0.5,
        }
    }

    fn router() -> EdgeRouter {
        EdgeRouter::new(Arc::new(OrthogonalSolver::default()))
    }

    #[test]
    fn routes_exclude_port_endpoints() {
        let nodes = vec![node("a", 0.0, 0.0), node("b", 300.0, 200.0)];
        let routes = router()
            .compute_edge_routes(&nodes, &[edge("edge-1", "a", "b")])
            .unwrap();
        let bends = routes.get("edge-1").unwrap();
        assert_eq!(bends.len(), 2);
        // Ports sit at (100, 50) and (300, 250); bends share the channel x.
        assert_eq!(bends[0].x, bends[1].x);
        assert_eq!(bends[0].y, 50.0);
        assert_eq!(bends[1].y, 250.0);
    }

    #[test]
    fn horizontally_aligned_nodes_yield_no_bends() {
        let nodes = vec![node("a", 0.0, 0.0), node("b", 300.0, 0.0)];
        let routes = router()
            .compute_edge_routes(&nodes, &[edge("edge-1", "a", "b")])
            .unwrap();
        assert!(routes.get("edge-1").unwrap().is_empty());
    }

    #[test]
    fn missing_endpoint_maps_to_empty_route() {
        let nodes = vec![node("a", 0.0, 0.0)];
        let routes = router()
            .compute_edge_routes(&nodes, &[edge("edge-1", "a", "ghost")])
            .unwrap();
        assert_eq!(routes.get("edge-1"), Some(&Vec::new()));
    }

    #[test]
    fn attachment_port_honors_t_fraction() {
        let n = node("a", 0.0, 0.0);
        let port = attachment_port(&n, HandleSide::Left, 0.25);
        assert_eq!((port.x, port.y), (0.0, 25.0));
        let port = attachment_port(&n, HandleSide::Right, 2.0);
        // Out-of-range T clamps to the side's end.
        assert_eq!((port.x, port.y), (100.0, 100.0));
    }

    #[test]
    fn each_pass_supersedes_nothing_it_does_not_name() {
        let nodes = vec![node("a", 0.0, 0.0), node("b", 300.0, 200.0)];
        let routes = router()
            .compute_edge_routes(&nodes, &[edge("edge-1", "a", "b"), edge("edge-2", "b", "a")])
            .unwrap();
        assert_eq!(routes.len(), 2);
    }
}
