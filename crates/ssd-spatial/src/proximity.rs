//! R-tree proximity index.
//!
//! Entries are `(slot, position)` pairs where `slot` is whatever the caller
//! indexes by: a position in this tick's descriptor slice, or an `AgentId`
//! index.  All query results are returned in ascending slot order so callers
//! never depend on R-tree traversal order.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use ssd_core::Position;

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone)]
struct Entry {
    point: [f32; 2], // [x, y]
    slot:  usize,
}

impl RTreeObject for Entry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for Entry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── ProximityIndex ────────────────────────────────────────────────────────────

/// Immutable spatial index over a set of positioned slots.
pub struct ProximityIndex {
    tree: RTree<Entry>,
}

impl ProximityIndex {
    pub fn empty() -> Self {
        Self { tree: RTree::new() }
    }

    /// Bulk-load from `(slot, position)` pairs.  Non-finite positions are
    /// skipped; they cannot be located.
    pub fn build(points: impl IntoIterator<Item = (usize, Position)>) -> Self {
        let entries: Vec<Entry> = points
            .into_iter()
            .filter(|(_, p)| p.is_finite())
            .map(|(slot, p)| Entry { point: [p.x, p.y], slot })
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Slots within `radius` of `center` (inclusive), ascending.
    pub fn within(&self, center: Position, radius: f32) -> Vec<usize> {
        if !(radius.is_finite() && radius >= 0.0 && center.is_finite()) {
            return Vec::new();
        }
        let mut out: Vec<usize> = self
            .tree
            .locate_within_distance([center.x, center.y], radius * radius)
            .map(|e| e.slot)
            .collect();
        out.sort_unstable();
        out
    }

    /// Nearest slot to `center`, ties broken by the lower slot.
    pub fn nearest(&self, center: Position) -> Option<usize> {
        let query = [center.x, center.y];
        let mut iter = self.tree.nearest_neighbor_iter_with_distance_2(&query);
        let (first, best_d2) = iter.next()?;
        let mut best = first.slot;
        for (e, d2) in iter {
            if d2 > best_d2 {
                break;
            }
            best = best.min(e.slot);
        }
        Some(best)
    }

    /// Every unordered pair of slots at most `radius` apart, as
    /// `(lower, higher)`, sorted.
    pub fn pairs_within(&self, radius: f32) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for e in self.tree.iter() {
            let center = Position::new(e.point[0], e.point[1]);
            for other in self.within(center, radius) {
                if other > e.slot {
                    out.push((e.slot, other));
                }
            }
        }
        out.sort_unstable();
        out.dedup();
        out
    }
}

impl Default for ProximityIndex {
    fn default() -> Self {
        Self::empty()
    }
}
