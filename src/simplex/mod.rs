pub mod coincidence;
pub mod intersection;

pub use coincidence::*;
pub use intersection::*;

use nalgebra::{Point2, Vector2};

use crate::bounding_box::BoundingBox;
use crate::misc::{FloatingPoint, Invertible};

/// One span of a contour boundary: a line segment or a circular arc,
/// parametrized by a ratio in `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Simplex<T: FloatingPoint> {
    Line {
        start: Point2<T>,
        end: Point2<T>,
    },
    CircleArc {
        center: Point2<T>,
        radius: T,
        start_angle: T,
        sweep_angle: T,
    },
}

impl<T: FloatingPoint> Simplex<T> {
    pub fn line(start: Point2<T>, end: Point2<T>) -> Self {
        Self::Line { start, end }
    }

    /// Create a circular arc span, validating its parameters.
    pub fn try_arc(
        center: Point2<T>,
        radius: T,
        start_angle: T,
        sweep_angle: T,
    ) -> anyhow::Result<Self> {
        anyhow::ensure!(radius > T::zero(), "arc radius must be positive");
        anyhow::ensure!(sweep_angle != T::zero(), "arc sweep must be non-zero");
        Ok(Self::CircleArc {
            center,
            radius,
            start_angle,
            sweep_angle,
        })
    }

    pub fn start(&self) -> Point2<T> {
        self.point_at(T::zero())
    }

    pub fn end(&self) -> Point2<T> {
        self.point_at(T::one())
    }

    /// Evaluate the span at a ratio in `[0, 1]`.
    pub fn point_at(&self, ratio: T) -> Point2<T> {
        match self {
            Self::Line { start, end } => start + (end - start) * ratio,
            Self::CircleArc {
                center,
                radius,
                start_angle,
                sweep_angle,
            } => {
                let angle = *start_angle + *sweep_angle * ratio;
                center + Vector2::new(angle.cos(), angle.sin()) * *radius
            }
        }
    }

    pub fn length(&self) -> T {
        match self {
            Self::Line { start, end } => (end - start).norm(),
            Self::CircleArc {
                radius, sweep_angle, ..
            } => *radius * sweep_angle.abs(),
        }
    }

    pub fn bounding_box(&self) -> BoundingBox<T> {
        match self {
            Self::Line { start, end } => BoundingBox::new(*start, *end),
            Self::CircleArc { center, radius, .. } => {
                let mut bounds = BoundingBox::new(self.start(), self.end());
                // Axis extremes of the carrier circle that fall inside the sweep.
                for k in 0..4 {
                    let axis = T::frac_pi_2() * T::from_usize(k).unwrap();
                    if self.arc_ratio_of_angle(axis, T::zero()).is_some() {
                        let extreme = center + Vector2::new(axis.cos(), axis.sin()) * *radius;
                        bounds = bounds.union(&BoundingBox::new(extreme, extreme));
                    }
                }
                bounds
            }
        }
    }

    /// The ratio of the closest point of the span to `point`, clamped to
    /// `[0, 1]`, together with that closest point.
    pub fn closest_ratio(&self, point: &Point2<T>) -> (T, Point2<T>) {
        match self {
            Self::Line { start, end } => {
                let dir = end - start;
                let len_sq = dir.norm_squared();
                if len_sq <= T::default_epsilon() {
                    return (T::zero(), *start);
                }
                let ratio = (point - start).dot(&dir) / len_sq;
                let ratio = ratio.max(T::zero()).min(T::one());
                (ratio, start + dir * ratio)
            }
            Self::CircleArc { center, .. } => {
                let v = point - center;
                if v.norm_squared() <= T::default_epsilon() {
                    return (T::zero(), self.start());
                }
                let angle = v.y.atan2(v.x);
                match self.arc_ratio_of_angle(angle, T::zero()) {
                    Some(ratio) => (ratio, self.point_at(ratio)),
                    None => {
                        let (s, e) = (self.start(), self.end());
                        if (point - s).norm_squared() <= (point - e).norm_squared() {
                            (T::zero(), s)
                        } else {
                            (T::one(), e)
                        }
                    }
                }
            }
        }
    }

    /// Subdivide at a ratio strictly inside `(0, 1)` without changing geometry.
    pub fn split_at(&self, ratio: T) -> (Self, Self) {
        match self {
            Self::Line { start, end } => {
                let mid = self.point_at(ratio);
                (Self::line(*start, mid), Self::line(mid, *end))
            }
            Self::CircleArc {
                center,
                radius,
                start_angle,
                sweep_angle,
            } => {
                let head_sweep = *sweep_angle * ratio;
                (
                    Self::CircleArc {
                        center: *center,
                        radius: *radius,
                        start_angle: *start_angle,
                        sweep_angle: head_sweep,
                    },
                    Self::CircleArc {
                        center: *center,
                        radius: *radius,
                        start_angle: *start_angle + head_sweep,
                        sweep_angle: *sweep_angle - head_sweep,
                    },
                )
            }
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.length() <= T::default_epsilon()
    }

    /// For arcs, the ratio at which the carrier angle `angle` is reached, or
    /// `None` when the angle lies outside the sweep (within `slack` radians).
    /// Always `None` for lines.
    pub(crate) fn arc_ratio_of_angle(&self, angle: T, slack: T) -> Option<T> {
        let Self::CircleArc {
            start_angle,
            sweep_angle,
            ..
        } = self
        else {
            return None;
        };
        let tau = T::two_pi();
        let wrap = |a: T| a - (a / tau).floor() * tau;
        let span = sweep_angle.abs();
        let delta = if *sweep_angle >= T::zero() {
            wrap(angle - *start_angle)
        } else {
            wrap(*start_angle - angle)
        };
        if delta <= span {
            Some((delta / span).max(T::zero()).min(T::one()))
        } else if delta - tau >= -slack {
            // Wrapped back onto the start of the sweep.
            Some(T::zero())
        } else if delta - span <= slack {
            Some(T::one())
        } else {
            None
        }
    }
}

impl<T: FloatingPoint> Invertible for Simplex<T> {
    fn invert(&mut self) {
        match self {
            Self::Line { start, end } => std::mem::swap(start, end),
            Self::CircleArc {
                start_angle,
                sweep_angle,
                ..
            } => {
                *start_angle += *sweep_angle;
                *sweep_angle = -*sweep_angle;
            }
        }
    }
}

#[cfg(test)]
mod tests;
