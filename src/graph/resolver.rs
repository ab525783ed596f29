use itertools::Itertools;

use crate::bounding_box::BoundingBox;
use crate::misc::{DisjointSet, FloatingPoint};
use crate::simplex::{coincidence_relationship, CoincidenceRelationship, Simplex};

use super::{ClipGraph, EdgeId, NodeId, NodeKind};

impl<T: FloatingPoint> ClipGraph<T> {
    /// Close the interferences left after graph building: split edges that
    /// pass near a vertex without touching it, unify near-duplicate nodes
    /// transitively, merge fully coincident edges with winding cancellation,
    /// then prune dangling nodes.
    ///
    /// Returns whether any edges were merged; the caller uses this to decide
    /// a clean rebuild pass is needed, since edge cancellation changes which
    /// regions are interior to which shape.
    pub fn resolve_interferences(&mut self) -> bool {
        let vertex_pairs = self.split_edges_near_vertices();
        log::trace!("{} edge-vertex interferences split", vertex_pairs.len());
        self.merge_coincident_nodes(vertex_pairs);
        let merged = self.merge_coincident_edges();
        self.prune_dangling_nodes();
        #[cfg(debug_assertions)]
        self.assert_degree_invariants();
        merged
    }

    /// Pass (a): for each node, split non-incident edges whose interior
    /// passes within tolerance of the node, and remember that the node and
    /// the split point must be unified.
    fn split_edges_near_vertices(&mut self) -> Vec<(NodeId, NodeId)> {
        let tolerance = self.tolerance;
        let two = T::from_f64(2.0).unwrap();
        let mut pairs = vec![];
        for node_id in self.node_ids().collect_vec() {
            let position = self.nodes[node_id.0].as_ref().unwrap().position;
            let region = BoundingBox::new(position, position).inflated(tolerance * two);
            let candidates = self
                .edge_index
                .query(&region)
                .into_iter()
                .copied()
                .sorted()
                .collect_vec();
            for edge_id in candidates {
                let Some(edge) = self.edge(edge_id) else {
                    continue;
                };
                if edge.start == node_id || edge.end == node_id {
                    continue;
                }
                let simplex = self.edge_simplex(edge_id);
                let (ratio, closest) = simplex.closest_ratio(&position);
                if (closest - position).norm_squared() > tolerance {
                    continue;
                }
                // Hits within tolerance of an endpoint would split off a
                // sub-tolerance sliver that pass (b) immediately collapses
                // again; treat them as endpoint contact and leave them to
                // the node merge.
                let length = simplex.length();
                if ratio * length <= tolerance || (T::one() - ratio) * length <= tolerance {
                    continue;
                }
                let mid = self.split_edge_at_ratio(edge_id, ratio);
                pairs.push((node_id, mid));
            }
        }
        pairs
    }

    /// Pass (b): group nodes within tolerance of each other (per-axis check
    /// on top of the radius query) together with the pairs from pass (a),
    /// transitively via union-find, and collapse each group into one fresh
    /// shared node at the lowest-id member's location.
    fn merge_coincident_nodes(&mut self, seed_pairs: Vec<(NodeId, NodeId)>) {
        let tolerance = self.tolerance;
        let mut sets = DisjointSet::new(self.nodes.len());
        for (a, b) in seed_pairs {
            sets.union(a.0, b.0);
        }
        let live = self.node_ids().collect_vec();
        for &id in &live {
            let position = self.nodes[id.0].as_ref().unwrap().position;
            let neighbors = self
                .node_index
                .within_radius(&position, tolerance)
                .into_iter()
                .map(|(p, other)| (p, *other))
                .collect_vec();
            for (p, other) in neighbors {
                if other == id {
                    continue;
                }
                if (p.x - position.x).abs() <= tolerance && (p.y - position.y).abs() <= tolerance {
                    sets.union(id.0, other.0);
                }
            }
        }

        let members = live.iter().map(|n| n.0).collect_vec();
        let groups = sets.groups(members);
        #[cfg(debug_assertions)]
        {
            let flattened = groups.iter().flatten().collect_vec();
            debug_assert_eq!(
                flattened.len(),
                flattened.iter().unique().count(),
                "merge groups must be pairwise disjoint"
            );
        }
        log::trace!("{} node merge groups", groups.len());

        for group in groups {
            let position = self.nodes[group[0]].as_ref().unwrap().position;
            let entries = group
                .iter()
                .flat_map(|&m| self.nodes[m].as_ref().unwrap().kind.entries().collect_vec())
                .collect_vec();
            let merged = self.add_node(position, NodeKind::SharedGeometry(entries));
            let in_group = |n: NodeId| group.binary_search(&n.0).is_ok();
            for &m in &group {
                for edge_id in self.outgoing[m].clone() {
                    let end = self.edges[edge_id.0].as_ref().unwrap().end;
                    if in_group(end) {
                        continue;
                    }
                    self.rewire_edge_start(edge_id, merged);
                }
                for edge_id in self.incoming[m].clone() {
                    let start = self.edges[edge_id.0].as_ref().unwrap().start;
                    if in_group(start) {
                        continue;
                    }
                    self.rewire_edge_end(edge_id, merged);
                }
            }
            // Edges fully internal to the group go down with their nodes.
            for &m in &group {
                self.remove_node(NodeId(m));
            }
        }
    }

    /// Pass (c): group same-span coincident edges from different shapes
    /// transitively. A group whose directional contributions cancel to zero
    /// or less disappears entirely; otherwise the lowest-id edge survives
    /// and absorbs the others' geometry references.
    fn merge_coincident_edges(&mut self) -> bool {
        let tolerance = self.tolerance;
        let live = self.edge_ids().collect_vec();
        let mut sets = DisjointSet::new(self.edges.len());
        for &id in &live {
            let bounds = self.edges[id.0].as_ref().unwrap().bounds.inflated(tolerance);
            let simplex = self.edge_simplex(id);
            let candidates = self
                .edge_index
                .query(&bounds)
                .into_iter()
                .copied()
                .filter(|&other| other != id)
                .sorted()
                .collect_vec();
            for other in candidates {
                let Some(other_edge) = self.edge(other) else {
                    continue;
                };
                // Edges of one shape never coincide with each other.
                let shared_shape = self.edges[id.0]
                    .as_ref()
                    .unwrap()
                    .references
                    .iter()
                    .any(|r| other_edge.references_shape(r.shape));
                if shared_shape {
                    continue;
                }
                let other_simplex = self.edge_simplex(other);
                if matches!(
                    coincidence_relationship(&simplex, &other_simplex, tolerance),
                    CoincidenceRelationship::SameSpan { .. }
                ) {
                    sets.union(id.0, other.0);
                }
            }
        }

        let members = live.iter().map(|e| e.0).collect_vec();
        let groups = sets.groups(members);
        log::trace!("{} coincident edge groups", groups.len());
        let mut merged_any = false;
        for group in groups {
            merged_any = true;
            let canonical = EdgeId(group[0]);
            let canonical_simplex = self.edge_simplex(canonical);
            let mut total = 0i32;
            for &m in &group[1..] {
                if opposing(&canonical_simplex, &self.edge_simplex(EdgeId(m))) {
                    total -= 1;
                } else {
                    total += 1;
                }
            }
            if total <= 0 {
                // The shared span is interior to the composition; it cancels.
                for &m in &group {
                    self.remove_edge(EdgeId(m));
                }
            } else {
                let mut absorbed = vec![];
                for &m in &group[1..] {
                    absorbed.extend(self.edges[m].as_ref().unwrap().references.clone());
                    self.remove_edge(EdgeId(m));
                }
                self.edges[canonical.0]
                    .as_mut()
                    .unwrap()
                    .references
                    .extend(absorbed);
            }
        }
        merged_any
    }

    /// Pass (d): drop nodes left without incoming or outgoing edges, to a
    /// fixpoint (removing a node removes its incident edges, which can strand
    /// further nodes).
    fn prune_dangling_nodes(&mut self) {
        loop {
            let dangling = self
                .node_ids()
                .filter(|n| self.outgoing[n.0].is_empty() || self.incoming[n.0].is_empty())
                .collect_vec();
            if dangling.is_empty() {
                return;
            }
            for id in dangling {
                self.remove_node(id);
            }
        }
    }

    #[cfg(debug_assertions)]
    fn assert_degree_invariants(&self) {
        for id in self.node_ids() {
            debug_assert!(
                !self.outgoing[id.0].is_empty() && !self.incoming[id.0].is_empty(),
                "pruning left a dangling node"
            );
        }
        for id in self.edge_ids() {
            let edge = self.edges[id.0].as_ref().unwrap();
            debug_assert!(
                self.node(edge.start).is_some() && self.node(edge.end).is_some(),
                "edge endpoints must be live nodes"
            );
        }
    }
}

/// Whether two same-span simplexes traverse the span in opposite directions.
fn opposing<T: FloatingPoint>(a: &Simplex<T>, b: &Simplex<T>) -> bool {
    match (a, b) {
        (
            Simplex::Line { start: s1, end: e1 },
            Simplex::Line { start: s2, end: e2 },
        ) => (e1 - s1).dot(&(e2 - s2)) < T::zero(),
        (
            Simplex::CircleArc { sweep_angle: w1, .. },
            Simplex::CircleArc { sweep_angle: w2, .. },
        ) => *w1 * *w2 < T::zero(),
        _ => false,
    }
}
