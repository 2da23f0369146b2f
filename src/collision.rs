//! Iterative pairwise overlap resolution.
//!
//! Boxes are inflated by a fixed margin, then overlapping pairs are pushed
//! apart along the axis of smaller penetration until a pass moves nothing or
//! the iteration cap is reached. Pure: no state survives between calls.

use std::collections::{BTreeMap, HashSet};

use crate::config::CollisionConfig;
use crate::model::{NodeBox, Point, pair_key};

/// Result of one resolution run. `positions` holds post-resolution top-left
/// coordinates for boxes that moved at least once; untouched boxes are
/// omitted.
#[derive(Debug, Clone)]
pub struct CollisionOutcome {
    pub positions: BTreeMap<String, Point>,
    pub num_iterations: usize,
    pub has_changes: bool,
}

/// Unordered id pairs exempt from separation, e.g. an image intentionally
/// anchored onto its parent thread.
pub type ExcludedPairs = HashSet<(String, String)>;

pub fn exclude_pair(pairs: &mut ExcludedPairs, a: &str, b: &str) {
    pairs.insert(pair_key(a, b));
}

struct WorkBox {
    id: String,
    // Center coordinates of the margin-inflated box.
    cx: f32,
    cy: f32,
    width: f32,
    height: f32,
    moved: bool,
}

/// Resolve overlaps among `boxes`. Dimensions are never changed, only
/// positions. Boxes with non-finite geometry are left where they are.
pub fn resolve(
    boxes: &[NodeBox],
    config: &CollisionConfig,
    excluded: &ExcludedPairs,
) -> CollisionOutcome {
    let mut work: Vec<WorkBox> = boxes
        .iter()
        .filter(|b| b.is_finite())
        .map(|b| WorkBox {
            id: b.id.clone(),
            cx: b.x + b.width / 2.0,
            cy: b.y + b.height / 2.0,
            width: b.width + config.margin * 2.0,
            height: b.height + config.margin * 2.0,
            moved: false,
        })
        .collect();

    let mut num_iterations = 0;
    while num_iterations < config.iterations {
        num_iterations += 1;
        let mut any_moved = false;
        for i in 0..work.len() {
            for j in (i + 1)..work.len() {
                if excluded.contains(&pair_key(&work[i].id, &work[j].id)) {
                    continue;
                }
                let dx = work[j].cx - work[i].cx;
                let dy = work[j].cy - work[i].cy;
                let px = (work[i].width + work[j].width) / 2.0 - dx.abs();
                let py = (work[i].height + work[j].height) / 2.0 - dy.abs();
                // Both axes must penetrate past the threshold for a true
                // 2-D overlap.
                if px <= config.overlap_threshold || py <= config.overlap_threshold {
                    continue;
                }
                // Push along the axis of smaller penetration, split evenly.
                // A zero center delta resolves in the positive direction.
                if px < py {
                    let sign = if dx >= 0.0 { 1.0 } else { -1.0 };
                    let half = px / 2.0 * sign;
                    work[i].cx -= half;
                    work[j].cx += half;
                } else {
                    let sign = if dy >= 0.0 { 1.0 } else { -1.0 };
                    let half = py / 2.0 * sign;
                    work[i].cy -= half;
                    work[j].cy += half;
                }
                work[i].moved = true;
                work[j].moved = true;
                any_moved = true;
            }
        }
        if !any_moved {
            break;
        }
    }

    let mut positions = BTreeMap::new();
    for b in &work {
        if b.moved {
            // Margin cancels out when converting the inflated center back to
            // the original box's top-left corner.
            positions.insert(
                b.id.clone(),
                Point::new(
                    b.cx - b.width / 2.0 + config.margin,
                    b.cy - b.height / 2.0 + config.margin,
                ),
            );
        }
    }
    let has_changes = !positions.is_empty();
    CollisionOutcome {
        positions,
        num_iterations,
        has_changes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxes_overlap(a: (f32, f32, f32, f32), b: (f32, f32, f32, f32)) -> bool {
        a.0 < b.0 + b.2 && b.0 < a.0 + a.2 && a.1 < b.1 + b.3 && b.1 < a.1 + a.3
    }

    fn resolved_box(b: &NodeBox, outcome: &CollisionOutcome) -> (f32, f32, f32, f32) {
        match outcome.positions.get(&b.id) {
            Some(p) => (p.x, p.y, b.width, b.height),
            None => (b.x, b.y, b.width, b.height),
        }
    }

    #[test]
    fn separates_two_overlapping_boxes() {
        let boxes = vec![
            NodeBox::new("a", 0.0, 0.0, 100.0, 100.0),
            NodeBox::new("b", 50.0, 10.0, 100.0, 100.0),
        ];
        let outcome = resolve(&boxes, &CollisionConfig::default(), &ExcludedPairs::new());
        assert!(outcome.has_changes);
        assert_eq!(outcome.positions.len(), 2);
        let a = resolved_box(&boxes[0], &outcome);
        let b = resolved_box(&boxes[1], &outcome);
        assert!(!boxes_overlap(a, b), "still overlapping: {a:?} vs {b:?}");
    }

    #[test]
    fn no_overlap_returns_empty_map() {
        let boxes = vec![
            NodeBox::new("a", 0.0, 0.0, 100.0, 100.0),
            NodeBox::new("b", 500.0, 500.0, 100.0, 100.0),
        ];
        let outcome = resolve(&boxes, &CollisionConfig::default(), &ExcludedPairs::new());
        assert!(!outcome.has_changes);
        assert!(outcome.positions.is_empty());
        assert_eq!(outcome.num_iterations, 1);
    }

    #[test]
    fn empty_input_is_a_no_op() {
        let outcome = resolve(&[], &CollisionConfig::default(), &ExcludedPairs::new());
        assert!(!outcome.has_changes);
        assert!(outcome.positions.is_empty());
    }

    #[test]
    fn excluded_pair_is_never_separated() {
        let boxes = vec![
            NodeBox::new("thread", 0.0, 0.0, 300.0, 200.0),
            NodeBox::new("image", 20.0, 20.0, 100.0, 100.0),
        ];
        let mut excluded = ExcludedPairs::new();
        exclude_pair(&mut excluded, "image", "thread");
        let outcome = resolve(&boxes, &CollisionConfig::default(), &excluded);
        assert!(!outcome.has_changes);
    }

    #[test]
    fn dimensions_are_preserved_and_margin_cancels() {
        // Identical centers: penetration ties resolve positive, boxes split
        // symmetrically on the vertical axis (py == px picks y).
        let boxes = vec![
            NodeBox::new("a", 0.0, 0.0, 100.0, 100.0),
            NodeBox::new("b", 0.0, 0.0, 100.0, 100.0),
        ];
        let config = CollisionConfig::default();
        let outcome = resolve(&boxes, &config, &ExcludedPairs::new());
        let a = outcome.positions.get("a").unwrap();
        let b = outcome.positions.get("b").unwrap();
        assert_eq!(a.x, b.x);
        assert!(a.y < b.y, "tie must push `b` positive: {a:?} {b:?}");
        // Inflated size is 140; the final gap between the real boxes is the
        // doubled margin.
        assert!((b.y - a.y - 140.0).abs() < 1.0, "gap {}", b.y - a.y);
    }

    #[test]
    fn chain_of_overlaps_converges_under_cap() {
        let boxes: Vec<NodeBox> = (0..6)
            .map(|i| NodeBox::new(format!("n{i}"), i as f32 * 30.0, 0.0, 100.0, 100.0))
            .collect();
        let config = CollisionConfig::default();
        let outcome = resolve(&boxes, &config, &ExcludedPairs::new());
        assert!(outcome.has_changes);
        assert!(outcome.num_iterations <= config.iterations);
        // Re-running on the resolved positions must be a fixed point.
        let resolved: Vec<NodeBox> = boxes
            .iter()
            .map(|b| {
                let (x, y, w, h) = resolved_box(b, &outcome);
                NodeBox::new(b.id.clone(), x, y, w, h)
            })
            .collect();
        let second = resolve(&resolved, &config, &ExcludedPairs::new());
        assert!(!second.has_changes, "resolution did not converge");
    }

    #[test]
    fn sub_threshold_penetration_is_ignored() {
        let config = CollisionConfig {
            margin: 0.0,
            ..CollisionConfig::default()
        };
        let boxes = vec![
            NodeBox::new("a", 0.0, 0.0, 100.0, 100.0),
            NodeBox::new("b", 99.8, 0.0, 100.0, 100.0),
        ];
        let outcome = resolve(&boxes, &config, &ExcludedPairs::new());
        assert!(!outcome.has_changes);
    }

    #[test]
    fn non_finite_box_is_skipped() {
        let boxes = vec![
            NodeBox::new("a", f32::NAN, 0.0, 100.0, 100.0),
            NodeBox::new("b", 10.0, 10.0, 100.0, 100.0),
        ];
        let outcome = resolve(&boxes, &CollisionConfig::default(), &ExcludedPairs::new());
        assert!(!outcome.has_changes);
    }
}
