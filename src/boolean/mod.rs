pub mod operation;

pub use operation::BooleanOperation;

use itertools::Itertools;

use crate::contour::{Contour, Winding};
use crate::graph::{ClipGraph, Edge};
use crate::misc::{FloatingPoint, Invertible};

/// A trait for boolean operations.
pub trait Boolean<T> {
    type Output;
    type Option;

    fn union(&self, other: T, option: Self::Option) -> Self::Output;
    fn intersection(&self, other: T, option: Self::Option) -> Self::Output;
    fn difference(&self, other: T, option: Self::Option) -> Self::Output;
    fn boolean(&self, operation: BooleanOperation, other: T, option: Self::Option) -> Self::Output;
}

impl<'a, T: FloatingPoint> Boolean<&'a Contour<T>> for Contour<T> {
    type Output = anyhow::Result<Vec<Contour<T>>>;
    type Option = T;

    fn union(&self, other: &'a Contour<T>, option: Self::Option) -> Self::Output {
        self.boolean(BooleanOperation::Union, other, option)
    }

    fn intersection(&self, other: &'a Contour<T>, option: Self::Option) -> Self::Output {
        self.boolean(BooleanOperation::Intersection, other, option)
    }

    fn difference(&self, other: &'a Contour<T>, option: Self::Option) -> Self::Output {
        self.boolean(BooleanOperation::Difference, other, option)
    }

    fn boolean(
        &self,
        operation: BooleanOperation,
        other: &'a Contour<T>,
        tolerance: Self::Option,
    ) -> Self::Output {
        compose(
            std::slice::from_ref(self),
            std::slice::from_ref(other),
            operation,
            tolerance,
        )
    }
}

impl<'a, T: FloatingPoint> Boolean<&'a [Contour<T>]> for Vec<Contour<T>> {
    type Output = anyhow::Result<Vec<Contour<T>>>;
    type Option = T;

    fn union(&self, other: &'a [Contour<T>], option: Self::Option) -> Self::Output {
        self.boolean(BooleanOperation::Union, other, option)
    }

    fn intersection(&self, other: &'a [Contour<T>], option: Self::Option) -> Self::Output {
        self.boolean(BooleanOperation::Intersection, other, option)
    }

    fn difference(&self, other: &'a [Contour<T>], option: Self::Option) -> Self::Output {
        self.boolean(BooleanOperation::Difference, other, option)
    }

    fn boolean(
        &self,
        operation: BooleanOperation,
        other: &'a [Contour<T>],
        tolerance: Self::Option,
    ) -> Self::Output {
        compose(self, other, operation, tolerance)
    }
}

/// Run one composition through the clipping graph with the winding predicate
/// matching `operation`.
fn compose<T: FloatingPoint>(
    subject: &[Contour<T>],
    clip: &[Contour<T>],
    operation: BooleanOperation,
    tolerance: T,
) -> anyhow::Result<Vec<Contour<T>>> {
    anyhow::ensure!(tolerance > T::zero(), "tolerance must be positive");
    log::debug!(
        "{} of {} + {} contours",
        operation,
        subject.len(),
        clip.len()
    );
    match operation {
        BooleanOperation::Union => {
            let contours = subject.iter().chain(clip).cloned().collect_vec();
            let mut graph = ClipGraph::from_parametric_intersections(&contours, tolerance);
            Ok(graph.recombine(union_filter))
        }
        BooleanOperation::Intersection => {
            let contours = subject.iter().chain(clip).cloned().collect_vec();
            let mut graph = ClipGraph::from_parametric_intersections(&contours, tolerance);
            // Coincidence merging can fuse fully identical inputs into one
            // rebuilt contour, so the effective shape count is the graph's,
            // not the caller's.
            let count = graph.contours().len() as i32;
            Ok(graph.recombine(move |edge| intersection_filter(edge, count)))
        }
        BooleanOperation::Difference => {
            // Inverted clip boundaries contribute negative winding inside
            // their area, so the union predicate carves them out.
            let contours = subject
                .iter()
                .cloned()
                .chain(clip.iter().map(|c| c.inverse()))
                .collect_vec();
            let mut graph = ClipGraph::from_parametric_intersections(&contours, tolerance);
            Ok(graph.recombine(union_filter))
        }
    }
}

/// Keep the outermost boundary: a positively oriented edge on the outline
/// sits in exactly its own winding, a hole edge in none.
fn union_filter<T: FloatingPoint>(edge: &Edge<T>) -> bool {
    match edge.windings() {
        Some(w) => match w.winding {
            Winding::Clockwise => w.total_winding == 1,
            Winding::CounterClockwise => w.total_winding == 0,
        },
        None => false,
    }
}

/// Keep edges interior to every composed contour. An edge merged from
/// several shapes' coincident spans lies on each of their boundaries, so
/// every referenced shape beyond the first counts toward its coverage.
fn intersection_filter<T: FloatingPoint>(edge: &Edge<T>, count: i32) -> bool {
    let shared = edge.references.iter().map(|r| r.shape).unique().count() as i32 - 1;
    match edge.windings() {
        Some(w) => match w.winding {
            Winding::Clockwise => w.total_winding + shared == count,
            Winding::CounterClockwise => w.total_winding + shared == count - 1,
        },
        None => false,
    }
}

#[cfg(test)]
mod tests;
