use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A point in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Kind of a canvas node. Connection compatibility is data on the variant
/// (see [`NodeType::bridges_connections`]) so new kinds are a data change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeType {
    Document,
    Image,
    AiChatThread,
}

impl NodeType {
    /// Whether this kind acts as a connection bridge. A pair of nodes is
    /// connectable exactly when one side bridges and the other does not,
    /// so two bridges or two non-bridges never connect.
    pub fn bridges_connections(self) -> bool {
        matches!(self, NodeType::AiChatThread)
    }
}

/// Whether an edge may exist between nodes of these two kinds.
pub fn can_connect(a: NodeType, b: NodeType) -> bool {
    a.bridges_connections() != b.bridges_connections()
}

/// A node mirrored from the host's workspace store. The engine never mutates
/// host nodes; it only reads snapshots pushed through the sync entry points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub position: Point,
    pub dimensions: Size,
}

impl CanvasNode {
    pub fn new(
        id: impl Into<String>,
        node_type: NodeType,
        position: Point,
        dimensions: Size,
    ) -> Self {
        Self {
            id: id.into(),
            node_type,
            position,
            dimensions,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.position.x + self.dimensions.width / 2.0,
            self.position.y + self.dimensions.height / 2.0,
        )
    }
}

/// Side of a node where an edge attaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HandleSide {
    Left,
    Right,
}

impl HandleSide {
    pub fn opposite(self) -> Self {
        match self {
            HandleSide::Left => HandleSide::Right,
            HandleSide::Right => HandleSide::Left,
        }
    }
}

/// An edge between two canvas nodes. `source_t` / `target_t` are the
/// fractional attachment positions (0..=1) along the handle side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceEdge {
    pub edge_id: String,
    pub source_node_id: String,
    pub target_node_id: String,
    pub source_handle: HandleSide,
    pub target_handle: HandleSide,
    pub source_t: f32,
    pub target_t: f32,
}

impl WorkspaceEdge {
    /// Unordered endpoint key, used to de-duplicate connections between the
    /// same node pair regardless of direction.
    pub fn pair_key(&self) -> (String, String) {
        pair_key(&self.source_node_id, &self.target_node_id)
    }
}

/// Sorted unordered pair of node ids.
pub fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// Axis-aligned box fed to collision resolution. Derived from a
/// [`CanvasNode`] for a single pass and discarded afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeBox {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl NodeBox {
    pub fn new(id: impl Into<String>, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_node(node: &CanvasNode) -> Self {
        Self {
            id: node.id.clone(),
            x: node.position.x,
            y: node.position.y,
            width: node.dimensions.width,
            height: node.dimensions.height,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }
}

/// Bend points per edge id. An empty list means the renderer should draw a
/// straight connector between the two ports.
pub type RouteMap = BTreeMap<String, Vec<Point>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridge_rule_pairs() {
        assert!(can_connect(NodeType::Document, NodeType::AiChatThread));
        assert!(can_connect(NodeType::AiChatThread, NodeType::Image));
        assert!(!can_connect(NodeType::Document, NodeType::Image));
        assert!(!can_connect(NodeType::Document, NodeType::Document));
        assert!(!can_connect(NodeType::AiChatThread, NodeType::AiChatThread));
    }

    #[test]
    fn pair_key_is_order_independent() {
        assert_eq!(pair_key("b", "a"), pair_key("a", "b"));
        assert_eq!(pair_key("a", "b"), ("a".to_string(), "b".to_string()));
    }

    #[test]
    fn node_serde_round_trip_uses_camel_case() {
        let node = CanvasNode::new(
            "n1",
            NodeType::AiChatThread,
            Point::new(10.0, 20.0),
            Size::new(320.0, 240.0),
        );
        let json = serde_json::to_string(&node).unwrap();
        assert!(json.contains("\"type\":\"aiChatThread\""));
        let back: CanvasNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }
}
