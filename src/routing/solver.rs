//! Orthogonal edge solver.
//!
//! Nodes are pinned: the solver never relocates them, it only routes edges
//! between fixed attachment ports as horizontal/vertical polylines. The
//! default implementation leaves each port through a short straight stub,
//! then joins the stubs either through a vertical mid-channel (ports facing
//! each other) or a detour channel above/below both node boxes (ports facing
//! away), and finally compresses collinear runs out of the path.

use crate::config::RoutingConfig;
use crate::error::{LayoutError, Result};
use crate::model::HandleSide;

/// Coordinate sanity limit; paths beyond this are treated as solver failure.
const COORD_LIMIT: f32 = 100_000.0;
/// Collinearity / duplicate-point tolerance when compressing paths.
const PATH_EPS: f32 = 1e-4;

/// A fixed attachment point on a pinned node.
#[derive(Debug, Clone, Copy)]
pub struct Port {
    pub x: f32,
    pub y: f32,
    pub side: HandleSide,
}

/// Pinned bounding box of an endpoint node, used to keep detours clear of
/// the nodes they connect.
#[derive(Debug, Clone, Copy)]
pub struct PinnedBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// One edge to route between two fixed ports.
#[derive(Debug, Clone)]
pub struct EdgeTask {
    pub edge_id: String,
    pub source: Port,
    pub target: Port,
    pub source_box: PinnedBox,
    pub target_box: PinnedBox,
}

/// A routing pass over a fixed board.
#[derive(Debug, Clone, Default)]
pub struct RouteRequest {
    pub tasks: Vec<EdgeTask>,
}

/// Full polylines per task, in task order, endpoints included.
#[derive(Debug, Clone)]
pub struct RouteResponse {
    pub paths: Vec<(String, Vec<(f32, f32)>)>,
}

/// Seam for the routing backend. Owned by the [`crate::routing::EdgeRouter`]
/// that is constructed with it; no global solver state.
pub trait EdgeSolver: Send + Sync {
    fn solve(&self, request: &RouteRequest) -> Result<RouteResponse>;
}

#[derive(Debug, Clone)]
pub struct OrthogonalSolver {
    config: RoutingConfig,
}

impl Default for OrthogonalSolver {
    fn default() -> Self {
        Self::new(RoutingConfig::default())
    }
}

impl OrthogonalSolver {
    pub fn new(config: RoutingConfig) -> Self {
        Self { config }
    }
}

impl EdgeSolver for OrthogonalSolver {
    fn solve(&self, request: &RouteRequest) -> Result<RouteResponse> {
        let mut paths = Vec::with_capacity(request.tasks.len());
        for task in &request.tasks {
            let points = route_task(task, &self.config)?;
            if !path_coords_reasonable(&points) {
                return Err(LayoutError::SolverFailed {
                    edge_id: task.edge_id.clone(),
                    reason: "path escaped coordinate limits".to_string(),
                });
            }
            paths.push((task.edge_id.clone(), points));
        }
        Ok(RouteResponse { paths })
    }
}

fn port_point(port: Port) -> (f32, f32) {
    (port.x, port.y)
}

fn stub_point(port: Port, length: f32) -> (f32, f32) {
    match port.side {
        HandleSide::Left => (port.x - length, port.y),
        HandleSide::Right => (port.x + length, port.y),
    }
}

/// Whether the stub leaving `from` points toward `to`'s x position.
fn stub_faces(from: Port, to_x: f32) -> bool {
    match from.side {
        HandleSide::Left => to_x <= from.x,
        HandleSide::Right => to_x >= from.x,
    }
}

fn route_task(task: &EdgeTask, config: &RoutingConfig) -> Result<Vec<(f32, f32)>> {
    for (point, which) in [(task.source, "source"), (task.target, "target")] {
        if !point.x.is_finite() || !point.y.is_finite() {
            return Err(LayoutError::SolverFailed {
                edge_id: task.edge_id.clone(),
                reason: format!("non-finite {which} port"),
            });
        }
    }

    let sp = port_point(task.source);
    let tp = port_point(task.target);
    let stub = config.port_stub;
    let so = stub_point(task.source, stub);
    let to = stub_point(task.target, stub);

    let facing = stub_faces(task.source, to.0) && stub_faces(task.target, so.0);
    let points = if facing {
        // H-V-H through a vertical channel midway between the stub ends.
        let mid_x = (so.0 + to.0) / 2.0;
        vec![sp, (mid_x, sp.1), (mid_x, tp.1), tp]
    } else {
        // Ports face away from each other: leave both stubs, then cross
        // through a horizontal channel clear of both node boxes.
        let channel_y = detour_channel_y(task, config.detour_pad);
        vec![
            sp,
            so,
            (so.0, channel_y),
            (to.0, channel_y),
            to,
            tp,
        ]
    };
    Ok(compress_path(&points))
}

/// Horizontal channel for wrap-around routes: just above or just below the
/// union of the two endpoint boxes, whichever is closer to the ports.
fn detour_channel_y(task: &EdgeTask, pad: f32) -> f32 {
    let top = task.source_box.y.min(task.target_box.y) - pad;
    let bottom = (task.source_box.y + task.source_box.height)
        .max(task.target_box.y + task.target_box.height)
        + pad;
    let mid = (task.source.y + task.target.y) / 2.0;
    if (mid - top).abs() <= (bottom - mid).abs() {
        top
    } else {
        bottom
    }
}

/// Drop duplicate points and interior points collinear with both neighbors.
fn compress_path(points: &[(f32, f32)]) -> Vec<(f32, f32)> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    let mut out: Vec<(f32, f32)> = Vec::with_capacity(points.len());
    out.push(points[0]);
    for idx in 1..points.len() - 1 {
        let prev = out[out.len() - 1];
        let curr = points[idx];
        if (curr.0 - prev.0).abs() <= PATH_EPS && (curr.1 - prev.1).abs() <= PATH_EPS {
            continue;
        }
        let next = points[idx + 1];
        let dx1 = curr.0 - prev.0;
        let dy1 = curr.1 - prev.1;
        let dx2 = next.0 - curr.0;
        let dy2 = next.1 - curr.1;
        if (dx1.abs() <= PATH_EPS && dx2.abs() <= PATH_EPS)
            || (dy1.abs() <= PATH_EPS && dy2.abs() <= PATH_EPS)
        {
            continue;
        }
        out.push(curr);
    }
    let last = points[points.len() - 1];
    let tail = out[out.len() - 1];
    if (last.0 - tail.0).abs() > PATH_EPS || (last.1 - tail.1).abs() > PATH_EPS {
        out.push(last);
    }
    out
}

fn path_coords_reasonable(points: &[(f32, f32)]) -> bool {
    points
        .iter()
        .all(|(x, y)| x.is_finite() && y.is_finite() && x.abs() <= COORD_LIMIT && y.abs() <= COORD_LIMIT)
}
