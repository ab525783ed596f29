pub mod builder;
pub mod winding;

pub use builder::*;
pub use winding::*;

use itertools::Itertools;
use nalgebra::Point2;

use crate::bounding_box::BoundingBox;
use crate::misc::{FloatingPoint, Invertible};
use crate::simplex::{intersection_ratios, Simplex};

/// Trait for determining if a point lies inside a closed shape's area.
pub trait Contains<T: FloatingPoint> {
    fn contains(&self, point: &Point2<T>) -> bool;
}

/// A shape that can be flattened into boundary contours.
pub trait ParametricShape<T: FloatingPoint> {
    fn all_contours(&self) -> Vec<Contour<T>>;
}

/// One simplex of a contour together with the period range it occupies on
/// its parent shape's boundary.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContourSpan<T: FloatingPoint> {
    pub simplex: Simplex<T>,
    pub start_period: T,
    pub end_period: T,
}

/// A closed boundary made of an ordered cyclic sequence of line/arc spans,
/// parametrized by a period in `[0, 1)`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Contour<T: FloatingPoint> {
    spans: Vec<ContourSpan<T>>,
}

impl<T: FloatingPoint> Contour<T> {
    /// Create a contour from spans with explicit period ranges, validating
    /// that the parametrization is usable.
    pub fn try_new(spans: Vec<ContourSpan<T>>) -> anyhow::Result<Self> {
        anyhow::ensure!(!spans.is_empty(), "a contour needs at least one span");
        for (a, b) in spans.iter().tuple_windows() {
            anyhow::ensure!(
                a.start_period < a.end_period && a.end_period <= b.start_period,
                "span periods must be ascending and non-degenerate"
            );
        }
        let last = spans.last().unwrap();
        anyhow::ensure!(
            last.start_period < last.end_period,
            "span periods must be ascending and non-degenerate"
        );
        Ok(Self { spans })
    }

    /// Create a contour from bare simplexes with a uniform parametrization.
    /// Returns `None` for an empty sequence.
    pub fn from_simplexes(simplexes: Vec<Simplex<T>>) -> Option<Self> {
        if simplexes.is_empty() {
            return None;
        }
        let n = T::from_usize(simplexes.len()).unwrap();
        let spans = simplexes
            .into_iter()
            .enumerate()
            .map(|(i, simplex)| ContourSpan {
                simplex,
                start_period: T::from_usize(i).unwrap() / n,
                end_period: T::from_usize(i + 1).unwrap() / n,
            })
            .collect();
        Some(Self { spans })
    }

    /// A closed polygon through `points`, one line span per edge.
    pub fn polygon(points: &[Point2<T>]) -> Self {
        debug_assert!(points.len() >= 3, "a polygon needs at least three points");
        let simplexes = points
            .iter()
            .enumerate()
            .map(|(i, p)| Simplex::line(*p, points[(i + 1) % points.len()]))
            .collect();
        Self::from_simplexes(simplexes).unwrap()
    }

    /// An axis-aligned rectangle with `origin` as its minimum corner, wound
    /// in the positive (clockwise, y-down) direction.
    pub fn rectangle(origin: Point2<T>, width: T, height: T) -> Self {
        Self::polygon(&[
            origin,
            Point2::new(origin.x + width, origin.y),
            Point2::new(origin.x + width, origin.y + height),
            Point2::new(origin.x, origin.y + height),
        ])
    }

    /// A full circle out of two half arcs, wound in the positive direction.
    pub fn circle(center: Point2<T>, radius: T) -> Self {
        let pi = T::pi();
        Self::from_simplexes(vec![
            Simplex::CircleArc {
                center,
                radius,
                start_angle: T::zero(),
                sweep_angle: pi,
            },
            Simplex::CircleArc {
                center,
                radius,
                start_angle: pi,
                sweep_angle: pi,
            },
        ])
        .unwrap()
    }

    pub fn spans(&self) -> &[ContourSpan<T>] {
        &self.spans
    }

    pub fn all_simplexes(&self) -> impl Iterator<Item = &Simplex<T>> {
        self.spans.iter().map(|s| &s.simplex)
    }

    pub fn bounding_box(&self) -> BoundingBox<T> {
        self.spans
            .iter()
            .map(|s| s.simplex.bounding_box())
            .reduce(|a, b| a.union(&b))
            .unwrap_or_else(|| BoundingBox::new(Point2::origin(), Point2::origin()))
    }

    /// Signed area via the shoelace sum over span chords plus circular
    /// segment corrections for arcs.
    pub fn signed_area(&self) -> T {
        let half = T::from_f64(0.5).unwrap();
        let mut area = T::zero();
        for span in &self.spans {
            let (s, e) = (span.simplex.start(), span.simplex.end());
            area += (s.x * e.y - e.x * s.y) * half;
            if let Simplex::CircleArc {
                radius,
                sweep_angle,
                ..
            } = span.simplex
            {
                area += radius * radius * half * (sweep_angle - sweep_angle.sin());
            }
        }
        area
    }

    pub fn winding(&self) -> Winding {
        if self.signed_area() >= T::zero() {
            Winding::Clockwise
        } else {
            Winding::CounterClockwise
        }
    }

    /// Evaluate the boundary point at `period` (wrapped into `[0, 1)`).
    pub fn point_at(&self, period: T) -> Point2<T> {
        let (index, ratio) = self.locate_period(period);
        self.spans[index].simplex.point_at(ratio)
    }

    /// Whether `point` coincides with one of the span boundary vertices.
    pub fn is_on_vertex(&self, point: &Point2<T>, tolerance_squared: T) -> bool {
        self.spans
            .iter()
            .any(|s| (s.simplex.start() - point).norm_squared() <= tolerance_squared)
    }

    /// Insert a vertex at `period` without changing geometry. A split that
    /// would land within `tolerance` of an existing vertex is skipped.
    pub fn split(&mut self, period: T, tolerance: T) {
        let (index, ratio) = self.locate_period(period);
        let span = self.spans[index].clone();
        let point = span.simplex.point_at(ratio);
        let near = |p: Point2<T>| {
            (p.x - point.x).abs() <= tolerance && (p.y - point.y).abs() <= tolerance
        };
        if near(span.simplex.start()) || near(span.simplex.end()) {
            return;
        }
        let (head, tail) = span.simplex.split_at(ratio);
        let wrapped = self.wrap_period(period);
        self.spans[index] = ContourSpan {
            simplex: head,
            start_period: span.start_period,
            end_period: wrapped,
        };
        self.spans.insert(
            index + 1,
            ContourSpan {
                simplex: tail,
                start_period: wrapped,
                end_period: span.end_period,
            },
        );
    }

    /// All point intersections against `other` as `(self_period,
    /// other_period)` pairs, sorted by the period on `self` and coalesced so
    /// that clusters of nearly identical points collapse into one entry. An
    /// infinite tolerance disables coalescing.
    pub fn raw_intersection_periods(&self, other: &Self, tolerance: T) -> Vec<(T, T)> {
        let mut periods = vec![];
        for a in &self.spans {
            for b in &other.spans {
                for (t, u) in intersection_ratios(&a.simplex, &b.simplex) {
                    periods.push((
                        a.start_period + (a.end_period - a.start_period) * t,
                        b.start_period + (b.end_period - b.start_period) * u,
                    ));
                }
            }
        }
        periods.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let coalescing = tolerance
            .to_f64()
            .map(|tol| tol.is_finite())
            .unwrap_or(true);
        if !coalescing {
            return periods;
        }
        let mut out: Vec<(T, T)> = vec![];
        for (sp, op) in periods {
            if let Some(&(last_sp, _)) = out.last() {
                let prev = self.point_at(last_sp);
                let cur = self.point_at(sp);
                if (prev.x - cur.x).abs() <= tolerance && (prev.y - cur.y).abs() <= tolerance {
                    continue;
                }
            }
            out.push((sp, op));
        }
        out
    }

    /// Map `period` to its span index and the ratio within that span.
    fn locate_period(&self, period: T) -> (usize, T) {
        let p = self.wrap_period(period);
        for (i, span) in self.spans.iter().enumerate() {
            if p >= span.start_period && p < span.end_period {
                let ratio = (p - span.start_period) / (span.end_period - span.start_period);
                return (i, ratio);
            }
        }
        // Parametrization gap before the first span or after the last one.
        (self.spans.len() - 1, T::one())
    }

    fn wrap_period(&self, period: T) -> T {
        let lo = self.spans.first().map(|s| s.start_period).unwrap_or(T::zero());
        let hi = self.spans.last().map(|s| s.end_period).unwrap_or(T::one());
        let len = hi - lo;
        if len <= T::zero() {
            return lo;
        }
        let p = period - lo;
        lo + (p - (p / len).floor() * len)
    }

    /// Count boundary crossings of the rightward horizontal ray from `point`.
    fn ray_crossings(&self, point: &Point2<T>) -> usize {
        let mut crossings = 0;
        for span in &self.spans {
            match &span.simplex {
                Simplex::Line { start, end } => {
                    if line_crosses_ray(start, end, point) {
                        crossings += 1;
                    }
                }
                arc @ Simplex::CircleArc {
                    center,
                    radius,
                    start_angle,
                    sweep_angle,
                } => {
                    // Split the arc at its vertical extremes; each piece is
                    // y-monotone so the parity trick applies per piece.
                    let mut cuts = vec![T::zero()];
                    for quarter in [T::frac_pi_2(), T::frac_pi_2() * T::from_f64(3.).unwrap()] {
                        if let Some(r) = arc.arc_ratio_of_angle(quarter, T::zero()) {
                            if r > T::zero() && r < T::one() {
                                cuts.push(r);
                            }
                        }
                    }
                    cuts.push(T::one());
                    cuts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

                    for (&r0, &r1) in cuts.iter().tuple_windows() {
                        if r1 <= r0 {
                            continue;
                        }
                        let pa = arc.point_at(r0);
                        let pb = arc.point_at(r1);
                        if (pa.y > point.y) == (pb.y > point.y) {
                            continue;
                        }
                        let dy = point.y - center.y;
                        let s = (*radius * *radius - dy * dy).max(T::zero()).sqrt();
                        let half = T::from_f64(0.5).unwrap();
                        let mid_angle = *start_angle + *sweep_angle * (r0 + r1) * half;
                        let x = if mid_angle.cos() >= T::zero() {
                            center.x + s
                        } else {
                            center.x - s
                        };
                        if x > point.x {
                            crossings += 1;
                        }
                    }
                }
            }
        }
        crossings
    }
}

fn line_crosses_ray<T: FloatingPoint>(a: &Point2<T>, b: &Point2<T>, point: &Point2<T>) -> bool {
    if (a.y > point.y) == (b.y > point.y) {
        return false;
    }
    let t = (point.y - a.y) / (b.y - a.y);
    a.x + (b.x - a.x) * t > point.x
}

impl<T: FloatingPoint> Contains<T> for Contour<T> {
    fn contains(&self, point: &Point2<T>) -> bool {
        self.ray_crossings(point) % 2 == 1
    }
}

impl<T: FloatingPoint> ParametricShape<T> for Contour<T> {
    fn all_contours(&self) -> Vec<Contour<T>> {
        vec![self.clone()]
    }
}

impl<T: FloatingPoint> ParametricShape<T> for Vec<Contour<T>> {
    fn all_contours(&self) -> Vec<Contour<T>> {
        self.clone()
    }
}

impl<T: FloatingPoint> Invertible for Contour<T> {
    fn invert(&mut self) {
        let lo = self.spans.first().map(|s| s.start_period).unwrap_or(T::zero());
        let hi = self.spans.last().map(|s| s.end_period).unwrap_or(T::one());
        self.spans.reverse();
        for span in &mut self.spans {
            span.simplex.invert();
            let (s, e) = (span.start_period, span.end_period);
            span.start_period = lo + hi - e;
            span.end_period = lo + hi - s;
        }
    }
}
