use nalgebra::Point2;

use crate::bounding_box::BoundingBox;
use crate::contour::Winding;
use crate::misc::FloatingPoint;
use crate::simplex::Simplex;

use super::NodeId;

/// Stable identifier of a graph edge, assigned monotonically, never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub(crate) usize);

impl EdgeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Geometric kind of an edge. Lines take their endpoints from the incident
/// nodes; arcs carry their full carrier geometry.
#[derive(Clone, Debug, PartialEq)]
pub enum EdgeKind<T: FloatingPoint> {
    Line,
    CircleArc {
        center: Point2<T>,
        radius: T,
        start_angle: T,
        sweep_angle: T,
    },
}

impl<T: FloatingPoint> EdgeKind<T> {
    pub fn of_simplex(simplex: &Simplex<T>) -> Self {
        match simplex {
            Simplex::Line { .. } => Self::Line,
            Simplex::CircleArc {
                center,
                radius,
                start_angle,
                sweep_angle,
            } => Self::CircleArc {
                center: *center,
                radius: *radius,
                start_angle: *start_angle,
                sweep_angle: *sweep_angle,
            },
        }
    }
}

/// The span `[start_period, end_period)` an edge occupies on one shape's
/// boundary. Merged edges carry one reference per contributing shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeometryRef<T: FloatingPoint> {
    pub shape: usize,
    pub start_period: T,
    pub end_period: T,
}

/// Winding state of an edge, computed lazily during recombination.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeWindings {
    /// Orientation of the contour the edge's first geometry reference
    /// belongs to.
    pub winding: Winding,
    /// The orientation's signed value plus the orientation values of every
    /// unrelated shape whose area contains the edge's midpoint.
    pub total_winding: i32,
}

/// A directed graph edge: one line or arc span between two nodes.
#[derive(Clone, Debug)]
pub struct Edge<T: FloatingPoint> {
    pub id: EdgeId,
    pub start: NodeId,
    pub end: NodeId,
    pub kind: EdgeKind<T>,
    pub references: Vec<GeometryRef<T>>,
    pub(crate) bounds: BoundingBox<T>,
    pub(crate) windings: Option<EdgeWindings>,
}

impl<T: FloatingPoint> Edge<T> {
    pub fn bounds(&self) -> &BoundingBox<T> {
        &self.bounds
    }

    /// Winding state, available once `ensure_windings` ran for this edge.
    pub fn windings(&self) -> Option<EdgeWindings> {
        self.windings
    }

    pub fn references_shape(&self, shape: usize) -> bool {
        self.references.iter().any(|r| r.shape == shape)
    }
}
