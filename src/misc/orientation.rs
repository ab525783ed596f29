use nalgebra::Point2;
use num_traits::NumCast;
use robust::{orient2d, Coord};

use super::FloatingPoint;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum Orientation {
    CounterClockwise,
    Clockwise,
    Collinear,
}

/// Robust orientation test for three points.
pub fn orientation<T: FloatingPoint>(p: &Point2<T>, q: &Point2<T>, r: &Point2<T>) -> Orientation {
    let coord = |p: &Point2<T>| Coord {
        x: <f64 as NumCast>::from(p.x).unwrap(),
        y: <f64 as NumCast>::from(p.y).unwrap(),
    };
    let det = orient2d(coord(p), coord(q), coord(r));
    if det < 0. {
        Orientation::Clockwise
    } else if det > 0. {
        Orientation::CounterClockwise
    } else {
        Orientation::Collinear
    }
}
