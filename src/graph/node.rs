use nalgebra::Point2;

use crate::misc::FloatingPoint;

/// Stable identifier of a graph node. Ids are assigned monotonically and
/// never reused, so they double as a deterministic ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Provenance of a node on the input shapes' boundaries.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind<T: FloatingPoint> {
    /// The node originates from exactly one shape at one period.
    Geometry { shape: usize, period: T },
    /// The node is a merge of several shapes' boundary points, such as an
    /// intersection point. The entry list is never empty.
    SharedGeometry(Vec<(usize, T)>),
}

impl<T: FloatingPoint> NodeKind<T> {
    pub fn entries(&self) -> impl Iterator<Item = (usize, T)> + '_ {
        match self {
            Self::Geometry { shape, period } => {
                itertools::Either::Left(std::iter::once((*shape, *period)))
            }
            Self::SharedGeometry(entries) => itertools::Either::Right(entries.iter().copied()),
        }
    }

    /// Fold another shape's boundary point into the kind, promoting
    /// `Geometry` to `SharedGeometry`.
    pub fn merge(&mut self, shape: usize, period: T) {
        match self {
            Self::Geometry { shape: s, period: p } => {
                *self = Self::SharedGeometry(vec![(*s, *p), (shape, period)]);
            }
            Self::SharedGeometry(entries) => entries.push((shape, period)),
        }
    }
}

/// A graph vertex: a point where edges meet, tagged with the shape boundary
/// locations it stands for.
#[derive(Clone, Debug)]
pub struct Node<T: FloatingPoint> {
    pub id: NodeId,
    pub position: Point2<T>,
    pub kind: NodeKind<T>,
}
