use nalgebra::{Point2, Vector2};

use crate::misc::FloatingPoint;

/// A struct representing an axis-aligned bounding box in 2D space.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox<T: FloatingPoint> {
    min: Point2<T>,
    max: Point2<T>,
}

impl<T: FloatingPoint> BoundingBox<T> {
    /// Create a new bounding box from two corner points in any order.
    pub fn new(a: Point2<T>, b: Point2<T>) -> Self {
        Self {
            min: Point2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Create a new bounding box from a point iterator.
    pub fn from_points<I: IntoIterator<Item = Point2<T>>>(iter: I) -> Self {
        let mut min = Point2::new(T::max_value().unwrap(), T::max_value().unwrap());
        let mut max = Point2::new(-min.x, -min.y);
        for p in iter {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Self { min, max }
    }

    pub fn min(&self) -> &Point2<T> {
        &self.min
    }

    pub fn max(&self) -> &Point2<T> {
        &self.max
    }

    pub fn center(&self) -> Point2<T> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn size(&self) -> Vector2<T> {
        self.max - self.min
    }

    /// The union of two bounding boxes.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: Point2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// A copy of this box grown by `amount` on every side.
    pub fn inflated(&self, amount: T) -> Self {
        let delta = Vector2::new(amount, amount);
        Self {
            min: self.min - delta,
            max: self.max + delta,
        }
    }

    /// Whether `point` lies inside the box (boundary inclusive).
    pub fn contains(&self, point: &Point2<T>) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Whether `other` lies entirely inside the box.
    pub fn contains_box(&self, other: &Self) -> bool {
        self.contains(&other.min) && self.contains(&other.max)
    }

    /// Intersection test with an optional tolerance expanding both boxes.
    pub fn intersects(&self, other: &Self, tolerance: Option<T>) -> bool {
        let eps = tolerance.unwrap_or(T::zero());
        self.min.x <= other.max.x + eps
            && self.max.x >= other.min.x - eps
            && self.min.y <= other.max.y + eps
            && self.max.y >= other.min.y - eps
    }
}
