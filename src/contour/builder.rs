use crate::misc::FloatingPoint;
use crate::simplex::Simplex;

use super::Contour;

/// Accumulates simplexes emitted by a graph traversal and closes them into
/// contours with a uniform period parametrization.
#[derive(Debug, Clone, Default)]
pub struct ContourBuilder<T: FloatingPoint> {
    finished: Vec<Contour<T>>,
    current: Vec<Simplex<T>>,
}

impl<T: FloatingPoint> ContourBuilder<T> {
    pub fn new() -> Self {
        Self {
            finished: vec![],
            current: vec![],
        }
    }

    pub fn begin_contour(&mut self) {
        debug_assert!(self.current.is_empty(), "previous contour was not closed");
        self.current.clear();
    }

    pub fn append(&mut self, simplex: Simplex<T>) {
        self.current.push(simplex);
    }

    /// Close the in-progress simplex sequence into a contour. Sequences that
    /// never received a simplex are dropped silently.
    pub fn end_contour(&mut self) {
        let simplexes = std::mem::take(&mut self.current);
        if let Some(contour) = Contour::from_simplexes(simplexes) {
            self.finished.push(contour);
        }
    }

    pub fn all_contours(self) -> Vec<Contour<T>> {
        self.finished
    }
}
