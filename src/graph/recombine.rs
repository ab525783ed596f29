use std::collections::{HashMap, HashSet};

use itertools::Itertools;

use crate::contour::{Contains, Contour, ContourBuilder};
use crate::misc::FloatingPoint;

use super::{ClipGraph, Edge, EdgeId, EdgeWindings, GeometryRef};

impl<T: FloatingPoint> ClipGraph<T> {
    /// Compute and memoize one edge's winding state.
    ///
    /// The edge's own orientation is that of its first geometry reference's
    /// contour; the total adds the orientation value of every unrelated
    /// shape whose area contains the edge's midpoint. Shapes the edge itself
    /// references are skipped: their boundary runs through the midpoint, so
    /// containment there is unreliable, and their contribution was settled
    /// by coincidence merging.
    pub fn ensure_windings(&mut self, id: EdgeId) {
        let Some(edge) = self.edge(id) else {
            return;
        };
        if edge.windings.is_some() {
            return;
        }
        let referenced: HashSet<usize> = edge.references.iter().map(|r| r.shape).collect();
        let first_shape = edge.references[0].shape;
        let winding = self.contours[first_shape].winding();
        let mut total = winding.value();

        let half = T::from_f64(0.5).unwrap();
        let midpoint = self.edge_simplex(id).point_at(half);
        let containers = self
            .contour_index
            .query_point(&midpoint)
            .into_iter()
            .copied()
            .sorted()
            .collect_vec();
        for shape in containers {
            if referenced.contains(&shape) {
                continue;
            }
            if self.contours[shape].contains(&midpoint) {
                total += self.contours[shape].winding().value();
            }
        }
        self.edges[id.0].as_mut().unwrap().windings = Some(EdgeWindings {
            winding,
            total_winding: total,
        });
    }

    /// Assemble output contours from the edges passing `edge_filter`.
    ///
    /// Each walk seeds at the lowest-id passing edge with unconsumed
    /// geometry, fixes the current shape as that edge's first unconsumed
    /// reference, and repeatedly follows the outgoing edge that passes the
    /// filter, preferring edges still referencing the current shape over
    /// edges introduced by merges from other shapes, then lowest id. A walk
    /// closes when it returns to an already visited node or runs out of
    /// candidates. Traversing an edge consumes its references for the
    /// current shape; an edge stays available until its reference list is
    /// exhausted, so a later walk can still cross a merged edge that other
    /// shapes reference. An edge whose geometry is already part of the
    /// output never seeds a new walk, though: leftover references on it are
    /// merge bookkeeping, not unemitted geometry. The graph itself is not
    /// modified apart from winding memoization, so repeated calls with the
    /// same filter yield identical output.
    pub fn recombine<F>(&mut self, edge_filter: F) -> Vec<Contour<T>>
    where
        F: Fn(&Edge<T>) -> bool,
    {
        let edge_order = self.edge_ids().sorted().collect_vec();
        let mut remaining: HashMap<EdgeId, Vec<GeometryRef<T>>> = edge_order
            .iter()
            .map(|&id| (id, self.edges[id.0].as_ref().unwrap().references.clone()))
            .collect();
        let mut builder = ContourBuilder::new();
        let mut emitted: HashSet<EdgeId> = HashSet::new();

        loop {
            let mut seed = None;
            for &id in &edge_order {
                if emitted.contains(&id) || remaining[&id].is_empty() {
                    continue;
                }
                self.ensure_windings(id);
                if edge_filter(self.edge(id).unwrap()) {
                    seed = Some(id);
                    break;
                }
            }
            let Some(seed) = seed else {
                break;
            };
            let current_shape = remaining[&seed][0].shape;

            builder.begin_contour();
            let mut visited = HashSet::new();
            let mut cursor = seed;
            loop {
                consume(remaining.get_mut(&cursor).unwrap(), current_shape);
                emitted.insert(cursor);
                builder.append(self.edge_simplex(cursor));
                let (start, end) = {
                    let edge = self.edge(cursor).unwrap();
                    (edge.start, edge.end)
                };
                visited.insert(start);
                if visited.contains(&end) {
                    break;
                }

                let candidates = self.out_edges(end).iter().copied().sorted().collect_vec();
                let mut best: Option<(bool, EdgeId)> = None;
                for candidate in candidates {
                    let Some(refs) = remaining.get(&candidate) else {
                        continue;
                    };
                    if refs.is_empty() {
                        continue;
                    }
                    self.ensure_windings(candidate);
                    if !edge_filter(self.edge(candidate).unwrap()) {
                        continue;
                    }
                    let continues = remaining[&candidate]
                        .iter()
                        .any(|r| r.shape == current_shape);
                    let better = match best {
                        None => true,
                        Some((best_continues, best_id)) => {
                            (continues && !best_continues)
                                || (continues == best_continues && candidate < best_id)
                        }
                    };
                    if better {
                        best = Some((continues, candidate));
                    }
                }
                let Some((_, chosen)) = best else {
                    break;
                };
                cursor = chosen;
            }
            builder.end_contour();
        }
        builder.all_contours()
    }
}

/// Retire the current shape's references from an edge's unconsumed list; a
/// foreign edge picked by the fallback tie-break loses its first reference
/// instead.
fn consume<T: FloatingPoint>(references: &mut Vec<GeometryRef<T>>, shape: usize) {
    if references.iter().any(|r| r.shape == shape) {
        references.retain(|r| r.shape != shape);
    } else if !references.is_empty() {
        references.remove(0);
    }
}
