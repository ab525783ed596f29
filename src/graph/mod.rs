pub mod edge;
pub mod node;
pub mod recombine;
pub mod resolver;
pub mod splitter;

pub use edge::*;
pub use node::*;
pub use splitter::*;

use itertools::Itertools;
use nalgebra::Point2;

use crate::bounding_box::BoundingBox;
use crate::contour::{Contour, ParametricShape};
use crate::misc::FloatingPoint;
use crate::simplex::Simplex;
use crate::spatial::{KdTree, QuadTree};

/// Intersection-aware planar graph over a set of input contours.
///
/// Nodes and edges live in id-indexed slabs; removal tombstones the slot and
/// updates the adjacency lists and spatial index views in the same call, so
/// an id either resolves everywhere or nowhere. The graph is the working
/// state of one Boolean composition; contours are the public representation
/// on both ends.
#[derive(Debug)]
pub struct ClipGraph<T: FloatingPoint> {
    nodes: Vec<Option<Node<T>>>,
    edges: Vec<Option<Edge<T>>>,
    outgoing: Vec<Vec<EdgeId>>,
    incoming: Vec<Vec<EdgeId>>,
    node_index: KdTree<T, NodeId>,
    edge_index: QuadTree<T, EdgeId>,
    contour_index: QuadTree<T, usize>,
    contours: Vec<Contour<T>>,
    tolerance: T,
}

impl<T: FloatingPoint> ClipGraph<T> {
    /// Full pipeline: split the contours at every pairwise interference,
    /// build the graph, and resolve remaining interferences. If the resolver
    /// merged coincident edges the topology changed, so the contours are
    /// re-assembled and the graph rebuilt once more with an empty
    /// intersection table to reach a stable state.
    pub fn from_parametric_intersections(contours: &[Contour<T>], tolerance: T) -> Self {
        let (contours, records) = splitter::split_contours(contours.to_vec(), tolerance);
        log::debug!(
            "split {} contours, {} intersection records",
            contours.len(),
            records.len()
        );
        let cache = GlobalIntersectionCache::from_records(records);
        let bounds = total_bounds(&contours);

        let mut graph = Self::with_bounds(bounds, tolerance);
        for contour in &contours {
            graph.add_contour(contour, &cache);
        }
        let merged = graph.resolve_interferences();
        if !merged {
            return graph;
        }

        log::debug!("coincident edges merged, rebuilding graph");
        let rebuilt = graph.recombine(|_| true);
        let empty = GlobalIntersectionCache::new();
        let mut second = Self::with_bounds(bounds, tolerance);
        for contour in &rebuilt {
            second.add_contour(contour, &empty);
        }
        second.resolve_interferences();
        second
    }

    /// Build from two parametric shapes, flattening them into contours.
    pub fn from_shape_pair(
        lhs: &impl ParametricShape<T>,
        rhs: &impl ParametricShape<T>,
        tolerance: T,
    ) -> Self {
        let contours = lhs
            .all_contours()
            .into_iter()
            .chain(rhs.all_contours())
            .collect_vec();
        Self::from_parametric_intersections(&contours, tolerance)
    }

    /// Build from a collection of parametric shapes.
    pub fn from_shapes<S: ParametricShape<T>>(shapes: &[S], tolerance: T) -> Self {
        let contours = shapes.iter().flat_map(|s| s.all_contours()).collect_vec();
        Self::from_parametric_intersections(&contours, tolerance)
    }

    pub(crate) fn with_bounds(bounds: BoundingBox<T>, tolerance: T) -> Self {
        Self {
            nodes: vec![],
            edges: vec![],
            outgoing: vec![],
            incoming: vec![],
            node_index: KdTree::new(),
            edge_index: QuadTree::new(bounds, 8),
            contour_index: QuadTree::new(bounds, 8),
            contours: vec![],
            tolerance,
        }
    }

    pub fn tolerance(&self) -> T {
        self.tolerance
    }

    /// The public contour list; a contour's position is its shape index.
    pub fn contours(&self) -> &[Contour<T>] {
        &self.contours
    }

    pub fn node(&self, id: NodeId) -> Option<&Node<T>> {
        self.nodes.get(id.0).and_then(|n| n.as_ref())
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge<T>> {
        self.edges.get(id.0).and_then(|e| e.as_ref())
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().flatten().map(|n| n.id)
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.iter().flatten().map(|e| e.id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().flatten().count()
    }

    pub fn out_edges(&self, id: NodeId) -> &[EdgeId] {
        &self.outgoing[id.0]
    }

    pub fn in_edges(&self, id: NodeId) -> &[EdgeId] {
        &self.incoming[id.0]
    }

    /// Materialize an edge's geometry, taking line endpoints from its nodes.
    pub fn edge_simplex(&self, id: EdgeId) -> Simplex<T> {
        let edge = self.edges[id.0].as_ref().unwrap();
        match &edge.kind {
            EdgeKind::Line => Simplex::line(
                self.nodes[edge.start.0].as_ref().unwrap().position,
                self.nodes[edge.end.0].as_ref().unwrap().position,
            ),
            EdgeKind::CircleArc {
                center,
                radius,
                start_angle,
                sweep_angle,
            } => Simplex::CircleArc {
                center: *center,
                radius: *radius,
                start_angle: *start_angle,
                sweep_angle: *sweep_angle,
            },
        }
    }

    /// Register one (already split) contour: resolve each span boundary
    /// point to a node and connect consecutive nodes with edges.
    pub fn add_contour(&mut self, contour: &Contour<T>, cache: &GlobalIntersectionCache<T>) {
        let shape = self.contours.len();
        self.contours.push(contour.clone());
        self.contour_index.insert(contour.bounding_box(), shape);

        let spans = contour.spans().to_vec();
        let node_ids = spans
            .iter()
            .map(|span| self.resolve_node(span.simplex.start(), shape, span.start_period, cache))
            .collect_vec();

        for (i, span) in spans.iter().enumerate() {
            let start = node_ids[i];
            let end = node_ids[(i + 1) % node_ids.len()];
            if start == end && span.simplex.is_degenerate() {
                continue;
            }
            self.add_edge(
                start,
                end,
                EdgeKind::of_simplex(&span.simplex),
                vec![GeometryRef {
                    shape,
                    start_period: span.start_period,
                    end_period: span.end_period,
                }],
            );
        }
    }

    /// Find or create the node standing for `(shape, period)` at `position`.
    ///
    /// The nearest existing node is reused when it lies within the tight
    /// coincidence tolerance, or when the intersection table records a
    /// correspondence between the candidate's boundary points and the
    /// incoming one (covers intersection points that drifted apart
    /// numerically).
    fn resolve_node(
        &mut self,
        position: Point2<T>,
        shape: usize,
        period: T,
        cache: &GlobalIntersectionCache<T>,
    ) -> NodeId {
        let two = T::from_f64(2.0).unwrap();
        let nearest = self
            .node_index
            .nearest(&position)
            .map(|(_, id, dist_sq)| (*id, dist_sq));
        if let Some((id, dist_sq)) = nearest {
            if dist_sq < self.tolerance * two {
                self.merge_node_kind(id, shape, period);
                return id;
            }
            if dist_sq < T::one() {
                let known = self.nodes[id.0]
                    .as_ref()
                    .unwrap()
                    .kind
                    .entries()
                    .any(|(s, p)| cache.corresponds(s, p, shape, period));
                if known {
                    self.merge_node_kind(id, shape, period);
                    return id;
                }
            }
        }
        self.add_node(position, NodeKind::Geometry { shape, period })
    }

    fn merge_node_kind(&mut self, id: NodeId, shape: usize, period: T) {
        self.nodes[id.0].as_mut().unwrap().kind.merge(shape, period);
    }

    pub(crate) fn add_node(&mut self, position: Point2<T>, kind: NodeKind<T>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Node { id, position, kind }));
        self.outgoing.push(vec![]);
        self.incoming.push(vec![]);
        self.node_index.insert(position, id);
        id
    }

    /// Remove a node together with every incident edge, and drop it from the
    /// point index in the same call.
    pub(crate) fn remove_node(&mut self, id: NodeId) {
        let incident = self.outgoing[id.0]
            .iter()
            .chain(self.incoming[id.0].iter())
            .copied()
            .unique()
            .collect_vec();
        for edge_id in incident {
            self.remove_edge(edge_id);
        }
        if let Some(node) = self.nodes[id.0].take() {
            self.node_index.remove(&node.position, &id);
        }
    }

    pub(crate) fn add_edge(
        &mut self,
        start: NodeId,
        end: NodeId,
        kind: EdgeKind<T>,
        references: Vec<GeometryRef<T>>,
    ) -> EdgeId {
        debug_assert!(
            self.node(start).is_some() && self.node(end).is_some(),
            "edge endpoints must be registered nodes"
        );
        debug_assert!(!references.is_empty(), "edges need at least one geometry reference");

        // Parallel edges with identical geometry are allowed here; coincident
        // spans from different shapes stay separate until interference
        // resolution merges them.
        let id = EdgeId(self.edges.len());
        let edge = Edge {
            id,
            start,
            end,
            kind,
            references,
            bounds: BoundingBox::new(Point2::origin(), Point2::origin()),
            windings: None,
        };
        self.edges.push(Some(edge));
        let bounds = self.edge_simplex(id).bounding_box();
        self.edges[id.0].as_mut().unwrap().bounds = bounds;
        self.outgoing[start.0].push(id);
        self.incoming[end.0].push(id);
        self.edge_index.insert(bounds, id);
        id
    }

    pub(crate) fn remove_edge(&mut self, id: EdgeId) {
        if let Some(edge) = self.edges[id.0].take() {
            self.outgoing[edge.start.0].retain(|&e| e != id);
            self.incoming[edge.end.0].retain(|&e| e != id);
            self.edge_index.remove(&edge.bounds, &id);
        }
    }

    fn rewire_edge_start(&mut self, id: EdgeId, to: NodeId) {
        let edge = self.edges[id.0].as_mut().unwrap();
        let from = edge.start;
        if from == to {
            return;
        }
        edge.start = to;
        self.outgoing[from.0].retain(|&e| e != id);
        self.outgoing[to.0].push(id);
        self.refresh_edge_bounds(id);
    }

    fn rewire_edge_end(&mut self, id: EdgeId, to: NodeId) {
        let edge = self.edges[id.0].as_mut().unwrap();
        let from = edge.end;
        if from == to {
            return;
        }
        edge.end = to;
        self.incoming[from.0].retain(|&e| e != id);
        self.incoming[to.0].push(id);
        self.refresh_edge_bounds(id);
    }

    /// Re-derive an edge's cached bounds after an endpoint moved, keeping the
    /// edge index entry in step.
    fn refresh_edge_bounds(&mut self, id: EdgeId) {
        let old = self.edges[id.0].as_ref().unwrap().bounds;
        let new = self.edge_simplex(id).bounding_box();
        if new == old {
            return;
        }
        self.edge_index.remove(&old, &id);
        self.edges[id.0].as_mut().unwrap().bounds = new;
        self.edge_index.insert(new, id);
    }

    /// Split the edge covering `(shape, period)` at that period. Returns the
    /// node at the split point, or `None` when no live edge covers it.
    pub fn split_edge_at_period(&mut self, shape: usize, period: T) -> Option<NodeId> {
        let found = self.edge_ids().find(|&id| {
            self.edges[id.0].as_ref().unwrap().references.iter().any(|r| {
                r.shape == shape && r.start_period <= period && period < r.end_period
            })
        })?;
        let r = self.edges[found.0]
            .as_ref()
            .unwrap()
            .references
            .iter()
            .find(|r| r.shape == shape && r.start_period <= period && period < r.end_period)
            .copied()
            .unwrap();
        let ratio = (period - r.start_period) / (r.end_period - r.start_period);
        Some(self.split_edge_at_ratio(found, ratio))
    }

    /// Split an edge at a ratio, inserting a new node at the split point.
    /// Ratios at or beyond the span boundaries are no-ops returning the
    /// existing endpoint, so the edge count never grows there and no
    /// zero-length edge can appear.
    pub fn split_edge_at_ratio(&mut self, id: EdgeId, ratio: T) -> NodeId {
        let edge = self.edges[id.0].as_ref().unwrap();
        if ratio <= T::zero() {
            return edge.start;
        }
        if ratio >= T::one() {
            return edge.end;
        }
        let entries = edge
            .references
            .iter()
            .map(|r| (r.shape, r.start_period + (r.end_period - r.start_period) * ratio))
            .collect_vec();
        let kind = if entries.len() == 1 {
            let (shape, period) = entries[0];
            NodeKind::Geometry { shape, period }
        } else {
            NodeKind::SharedGeometry(entries)
        };
        let position = self.edge_simplex(id).point_at(ratio);
        let mid = self.add_node(position, kind);
        self.split_edge_with_node(id, ratio, mid);
        mid
    }

    /// Replace one edge with two edges meeting at `mid`. A boundary ratio
    /// degenerates to a rewire: the boundary node's incident edges move to
    /// `mid` and the boundary node is removed, instead of producing a
    /// zero-length edge.
    pub(crate) fn split_edge_with_node(&mut self, id: EdgeId, ratio: T, mid: NodeId) {
        let (start, end) = {
            let edge = self.edges[id.0].as_ref().unwrap();
            (edge.start, edge.end)
        };
        if ratio <= T::zero() {
            if start != mid {
                self.replace_node(start, mid);
            }
            return;
        }
        if ratio >= T::one() {
            if end != mid {
                self.replace_node(end, mid);
            }
            return;
        }

        let references = self.edges[id.0].as_ref().unwrap().references.clone();
        let (head, tail) = self.edge_simplex(id).split_at(ratio);
        let head_refs = references
            .iter()
            .map(|r| GeometryRef {
                shape: r.shape,
                start_period: r.start_period,
                end_period: r.start_period + (r.end_period - r.start_period) * ratio,
            })
            .collect_vec();
        let tail_refs = references
            .iter()
            .map(|r| GeometryRef {
                shape: r.shape,
                start_period: r.start_period + (r.end_period - r.start_period) * ratio,
                end_period: r.end_period,
            })
            .collect_vec();
        self.remove_edge(id);
        self.add_edge(start, mid, EdgeKind::of_simplex(&head), head_refs);
        self.add_edge(mid, end, EdgeKind::of_simplex(&tail), tail_refs);
    }

    /// Redirect every incident edge of `old` to `new`, fold `old`'s boundary
    /// points into `new`, and remove `old`.
    fn replace_node(&mut self, old: NodeId, new: NodeId) {
        for edge_id in self.outgoing[old.0].clone() {
            self.rewire_edge_start(edge_id, new);
        }
        for edge_id in self.incoming[old.0].clone() {
            self.rewire_edge_end(edge_id, new);
        }
        let entries = self.nodes[old.0]
            .as_ref()
            .unwrap()
            .kind
            .entries()
            .collect_vec();
        for (shape, period) in entries {
            self.merge_node_kind(new, shape, period);
        }
        self.remove_node(old);
    }
}

fn total_bounds<T: FloatingPoint>(contours: &[Contour<T>]) -> BoundingBox<T> {
    contours
        .iter()
        .map(|c| c.bounding_box())
        .reduce(|a, b| a.union(&b))
        .unwrap_or_else(|| BoundingBox::new(Point2::origin(), Point2::origin()))
        .inflated(T::one())
}

#[cfg(test)]
mod tests;
