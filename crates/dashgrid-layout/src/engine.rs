#![forbid(unsafe_code)]

//! Pure grid placement engine.
//!
//! An arena of placed nodes indexed by grid-item id, with float placement:
//! nodes stay where they were put, and a move or resize that lands on other
//! nodes pushes those nodes downward until nothing overlaps. There is no
//! DOM here; interaction layers translate pointer geometry into cell
//! coordinates before calling in, and read back the changed set afterwards.
//!
//! # Invariants
//!
//! 1. After any operation, no two nodes overlap.
//! 2. Every node satisfies the column bounds (`x + w <= columns`).
//! 3. A proposed placement that collides only with the node's own previous
//!    footprint during a re-layout pass is cancelled and the original
//!    coordinates restored, instead of handing the node to the generic
//!    push-down resolution. Letting resolution run in that case visibly
//!    "bounces" the node on rerenders.

use dashgrid_core::GridItemId;
use dashgrid_model::{GridItem, clamp_to_bounds};
use rustc_hash::FxHashMap;

/// A placed node: the engine-side mirror of a widget's [`GridItem`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridNode {
    pub id: GridItemId,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    pub min_w: Option<u32>,
    pub min_h: Option<u32>,
}

impl GridNode {
    fn from_item(item: &GridItem) -> Self {
        Self {
            id: item.id.clone(),
            x: item.x,
            y: item.y,
            w: item.w,
            h: item.h,
            min_w: item.min_w,
            min_h: item.min_h,
        }
    }

    fn as_item(&self) -> GridItem {
        let mut item = GridItem::new(self.id.clone())
            .at(self.x, self.y)
            .spanning(self.w, self.h);
        item.min_w = self.min_w;
        item.min_h = self.min_h;
        item
    }

    /// Whether two nodes' cell rectangles overlap.
    #[must_use]
    pub fn overlaps(&self, other: &GridNode) -> bool {
        self.x < other.x.saturating_add(other.w)
            && other.x < self.x.saturating_add(self.w)
            && self.y < other.y.saturating_add(other.h)
            && other.y < self.y.saturating_add(self.h)
    }
}

/// Cell height of single-column items when the grid wraps.
///
/// Preserved heuristic: the viewport width divided by a quarter of the
/// column count, falling back to a divisor of 2 when that quotient is not
/// positive. Do not extend without settling the intended proportion rule.
#[must_use]
pub fn single_column_cell_height(viewport_width_px: f64, columns: u32) -> f64 {
    let divisor = f64::from(columns) / 4.0;
    if divisor > 0.0 {
        viewport_width_px / divisor
    } else {
        viewport_width_px / 2.0
    }
}

/// Float-placement grid arena.
#[derive(Debug)]
pub struct GridEngine {
    columns: u32,
    nodes: FxHashMap<GridItemId, GridNode>,
    /// Insertion order, for deterministic iteration and wrapped stacking.
    order: Vec<GridItemId>,
    /// Ids whose coordinates changed since the last drain.
    changed: Vec<GridItemId>,
}

impl GridEngine {
    /// An empty grid with the given column count (at least 1).
    #[must_use]
    pub fn new(columns: u32) -> Self {
        Self {
            columns: columns.max(1),
            nodes: FxHashMap::default(),
            order: Vec::new(),
            changed: Vec::new(),
        }
    }

    /// Current column count.
    #[must_use]
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of placed nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the grid is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether a node with the given id is placed.
    #[must_use]
    pub fn contains(&self, id: &GridItemId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Look up a node.
    #[must_use]
    pub fn node(&self, id: &GridItemId) -> Option<&GridNode> {
        self.nodes.get(id)
    }

    /// Nodes in insertion order.
    pub fn nodes_in_order(&self) -> impl Iterator<Item = &GridNode> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Nodes in single-column stacking order: by `y`, then `x`, then
    /// insertion order (stable sort).
    #[must_use]
    pub fn wrapped_order(&self) -> Vec<&GridNode> {
        let mut nodes: Vec<&GridNode> = self.nodes_in_order().collect();
        nodes.sort_by_key(|n| (n.y, n.x));
        nodes
    }

    /// Place a node, clamping it into bounds and resolving collisions.
    ///
    /// Re-placing an existing id whose new coordinates overlap its previous
    /// footprint restores the previous coordinates (see invariant 3).
    /// Returns the coordinates the node actually landed on.
    pub fn place(&mut self, item: &GridItem) -> GridItem {
        let mut node = GridNode::from_item(&clamp_to_bounds(item, self.columns));

        if let Some(existing) = self.nodes.get(&node.id) {
            let moved = (node.x, node.y, node.w, node.h)
                != (existing.x, existing.y, existing.w, existing.h);
            if moved && node.overlaps(existing) {
                // Self-collision during a re-layout pass: restore.
                node = existing.clone();
            }
        } else {
            self.order.push(node.id.clone());
        }

        let id = node.id.clone();
        self.nodes.insert(id.clone(), node.clone());
        self.resolve_collisions(&id);
        self.nodes.get(&id).map_or_else(|| node.as_item(), GridNode::as_item)
    }

    /// Propose moving a node to new cell coordinates.
    ///
    /// Returns the applied coordinates, or `None` when the node is unknown
    /// or the move was a no-op.
    pub fn propose_move(&mut self, id: &GridItemId, x: u32, y: u32) -> Option<GridItem> {
        let node = self.nodes.get(id)?;
        let proposed = clamp_to_bounds(&node.as_item().at(x, y), self.columns);
        if proposed.x == node.x && proposed.y == node.y {
            return None;
        }
        let node = self.nodes.get_mut(id)?;
        node.x = proposed.x;
        node.y = proposed.y;
        self.mark_changed(id);
        self.resolve_collisions(id);
        self.nodes.get(id).map(GridNode::as_item)
    }

    /// Propose resizing a node to new cell spans.
    ///
    /// Returns the applied spans, or `None` when the node is unknown or the
    /// resize was a no-op.
    pub fn propose_resize(&mut self, id: &GridItemId, w: u32, h: u32) -> Option<GridItem> {
        let node = self.nodes.get(id)?;
        let proposed = clamp_to_bounds(&node.as_item().spanning(w, h), self.columns);
        if proposed.w == node.w && proposed.h == node.h && proposed.x == node.x {
            return None;
        }
        let node = self.nodes.get_mut(id)?;
        node.x = proposed.x;
        node.w = proposed.w;
        node.h = proposed.h;
        self.mark_changed(id);
        self.resolve_collisions(id);
        self.nodes.get(id).map(GridNode::as_item)
    }

    /// Remove a node. Returns whether it was present.
    pub fn remove(&mut self, id: &GridItemId) -> bool {
        if self.nodes.remove(id).is_some() {
            self.order.retain(|other| other != id);
            self.changed.retain(|other| other != id);
            true
        } else {
            false
        }
    }

    /// Change the column count, clamping every node into the new bounds.
    pub fn set_columns(&mut self, columns: u32) {
        let columns = columns.max(1);
        if columns == self.columns {
            return;
        }
        self.columns = columns;
        let ids: Vec<GridItemId> = self.order.clone();
        for id in &ids {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            let clamped = clamp_to_bounds(&node.as_item(), columns);
            if (node.x, node.w) == (clamped.x, clamped.w) {
                continue;
            }
            if let Some(node) = self.nodes.get_mut(id) {
                node.x = clamped.x;
                node.w = clamped.w;
            }
            self.mark_changed(id);
        }
        for id in &ids {
            self.resolve_collisions(id);
        }
    }

    /// Remove all nodes.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.order.clear();
        self.changed.clear();
    }

    /// Drain the ids whose coordinates changed since the last drain.
    pub fn drain_changed(&mut self) -> Vec<GridItemId> {
        std::mem::take(&mut self.changed)
    }

    fn mark_changed(&mut self, id: &GridItemId) {
        if !self.changed.contains(id) {
            self.changed.push(id.clone());
        }
    }

    /// Push every node colliding with `pivot` downward until nothing
    /// overlaps. Pushing strictly increases `y`, so this terminates.
    fn resolve_collisions(&mut self, pivot: &GridItemId) {
        let mut queue = vec![pivot.clone()];
        let mut guard = 0usize;
        let budget = (self.nodes.len() + 1) * (self.nodes.len() + 1) * 4;

        while let Some(current_id) = queue.pop() {
            guard += 1;
            if guard > budget {
                // Push-down always terminates; the budget only protects
                // against future regressions in the displacement rule.
                tracing::warn!(target: "dashgrid::engine", "collision resolution budget exhausted");
                break;
            }
            let Some(current) = self.nodes.get(&current_id).cloned() else {
                continue;
            };
            let displaced: Vec<GridItemId> = self
                .order
                .iter()
                .filter(|id| **id != current_id)
                .filter_map(|id| self.nodes.get(id))
                .filter(|other| current.overlaps(other))
                .map(|other| other.id.clone())
                .collect();
            for id in displaced {
                if let Some(node) = self.nodes.get_mut(&id) {
                    node.y = current.y.saturating_add(current.h);
                    self.mark_changed(&id);
                    queue.push(id);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
