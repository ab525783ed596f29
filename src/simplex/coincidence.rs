use nalgebra::Point2;

use crate::misc::FloatingPoint;

use super::Simplex;

/// Classification of how two spans' geometries overlap in space.
///
/// Ratio payloads locate overlap boundaries on the span that must be split
/// there; a ratio of exactly `0`/`1` marks a shared endpoint (splitting at it
/// is a no-op, but the correspondence is still recorded).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CoincidenceRelationship<T: FloatingPoint> {
    NotCoincident,
    /// Both spans cover the same geometric span, in the same or opposing
    /// traversal direction.
    SameSpan { opposing: bool },
    /// The rhs span lies within the lhs span.
    LhsContainsRhs { lhs_at_rhs_start: T, lhs_at_rhs_end: T },
    /// The lhs span lies within the rhs span, sharing neither endpoint.
    RhsContainsLhs { rhs_at_lhs_start: T, rhs_at_lhs_end: T },
    /// Partial overlap covering the lhs start: the lhs start is interior to
    /// rhs and one rhs endpoint is interior to lhs.
    RhsContainsLhsStart {
        rhs_at_lhs_start: T,
        lhs_at_rhs_boundary: T,
        /// Which rhs endpoint (as a ratio, `0` or `1`) lies inside lhs.
        rhs_boundary: T,
    },
    /// Partial overlap covering the lhs end.
    RhsContainsLhsEnd {
        rhs_at_lhs_end: T,
        lhs_at_rhs_boundary: T,
        rhs_boundary: T,
    },
    /// lhs lies within rhs and shares its start point with an rhs endpoint.
    LhsPrefixesRhs { rhs_at_lhs_end: T },
    /// lhs lies within rhs and shares its end point with an rhs endpoint.
    LhsSuffixesRhs { rhs_at_lhs_start: T },
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Location<T> {
    Outside,
    AtStart,
    AtEnd,
    Inside(T),
}

impl<T: FloatingPoint> Location<T> {
    fn on_span(&self) -> bool {
        !matches!(self, Location::Outside)
    }

    fn ratio(&self) -> T {
        match self {
            Location::Outside => -T::one(),
            Location::AtStart => T::zero(),
            Location::AtEnd => T::one(),
            Location::Inside(r) => *r,
        }
    }
}

/// Classify the spatial overlap relationship between two spans.
pub fn coincidence_relationship<T: FloatingPoint>(
    lhs: &Simplex<T>,
    rhs: &Simplex<T>,
    tolerance: T,
) -> CoincidenceRelationship<T> {
    if !carriers_coincide(lhs, rhs, tolerance) {
        return CoincidenceRelationship::NotCoincident;
    }

    let rs = locate(lhs, &rhs.start(), tolerance);
    let re = locate(lhs, &rhs.end(), tolerance);
    let ls = locate(rhs, &lhs.start(), tolerance);
    let le = locate(rhs, &lhs.end(), tolerance);

    let boundary = |l: &Location<T>| matches!(l, Location::AtStart | Location::AtEnd);
    let inside = |l: &Location<T>| matches!(l, Location::Inside(_));

    // Identical spans: both rhs endpoints sit on lhs boundaries. Two arcs of
    // one carrier circle can share both endpoints while sweeping the
    // complementary halves, so the rhs midpoint must lie on lhs as well.
    if boundary(&rs) && boundary(&re) && rs != re {
        let half = T::from_f64(0.5).unwrap();
        if locate(lhs, &rhs.point_at(half), tolerance).on_span() {
            return CoincidenceRelationship::SameSpan {
                opposing: rs == Location::AtEnd,
            };
        }
        return CoincidenceRelationship::NotCoincident;
    }

    // rhs within lhs (shared endpoints allowed, expressed as 0/1 ratios).
    if rs.on_span() && re.on_span() && (inside(&rs) || inside(&re)) {
        return CoincidenceRelationship::LhsContainsRhs {
            lhs_at_rhs_start: rs.ratio(),
            lhs_at_rhs_end: re.ratio(),
        };
    }

    // lhs within rhs.
    if ls.on_span() && le.on_span() && (inside(&ls) || inside(&le)) {
        if boundary(&ls) {
            return CoincidenceRelationship::LhsPrefixesRhs {
                rhs_at_lhs_end: le.ratio(),
            };
        }
        if boundary(&le) {
            return CoincidenceRelationship::LhsSuffixesRhs {
                rhs_at_lhs_start: ls.ratio(),
            };
        }
        return CoincidenceRelationship::RhsContainsLhs {
            rhs_at_lhs_start: ls.ratio(),
            rhs_at_lhs_end: le.ratio(),
        };
    }

    // Partial overlap: one endpoint of each span interior to the other.
    if inside(&ls) && (inside(&rs) || inside(&re)) {
        let (lhs_at_rhs_boundary, rhs_boundary) = if inside(&rs) {
            (rs.ratio(), T::zero())
        } else {
            (re.ratio(), T::one())
        };
        return CoincidenceRelationship::RhsContainsLhsStart {
            rhs_at_lhs_start: ls.ratio(),
            lhs_at_rhs_boundary,
            rhs_boundary,
        };
    }
    if inside(&le) && (inside(&rs) || inside(&re)) {
        let (lhs_at_rhs_boundary, rhs_boundary) = if inside(&rs) {
            (rs.ratio(), T::zero())
        } else {
            (re.ratio(), T::one())
        };
        return CoincidenceRelationship::RhsContainsLhsEnd {
            rhs_at_lhs_end: le.ratio(),
            lhs_at_rhs_boundary,
            rhs_boundary,
        };
    }

    CoincidenceRelationship::NotCoincident
}

/// Whether the two spans lie on the same infinite carrier (same line, or the
/// same circle) within tolerance.
fn carriers_coincide<T: FloatingPoint>(lhs: &Simplex<T>, rhs: &Simplex<T>, tolerance: T) -> bool {
    match (lhs, rhs) {
        (Simplex::Line { start, end }, Simplex::Line { .. }) => {
            let dir = end - start;
            let len = dir.norm();
            if len <= T::default_epsilon() {
                return false;
            }
            let normal = nalgebra::Vector2::new(-dir.y, dir.x) / len;
            let off_start = (rhs.start() - start).dot(&normal).abs();
            let off_end = (rhs.end() - start).dot(&normal).abs();
            off_start <= tolerance && off_end <= tolerance
        }
        (
            Simplex::CircleArc {
                center: c1,
                radius: r1,
                ..
            },
            Simplex::CircleArc {
                center: c2,
                radius: r2,
                ..
            },
        ) => {
            (c1.x - c2.x).abs() <= tolerance
                && (c1.y - c2.y).abs() <= tolerance
                && (*r1 - *r2).abs() <= tolerance
        }
        _ => false,
    }
}

/// Locate `point` along `span`, distinguishing endpoints from the interior.
fn locate<T: FloatingPoint>(span: &Simplex<T>, point: &Point2<T>, tolerance: T) -> Location<T> {
    let length = span.length();
    if length <= T::default_epsilon() {
        return Location::Outside;
    }
    let ratio = match span {
        Simplex::Line { start, end } => {
            let dir = end - start;
            (point - start).dot(&dir) / dir.norm_squared()
        }
        Simplex::CircleArc { center, radius, .. } => {
            let v = point - center;
            let angle = v.y.atan2(v.x);
            match span.arc_ratio_of_angle(angle, tolerance / *radius) {
                Some(r) => r,
                None => return Location::Outside,
            }
        }
    };
    let tol_ratio = tolerance / length;
    if ratio.abs() <= tol_ratio {
        Location::AtStart
    } else if (ratio - T::one()).abs() <= tol_ratio {
        Location::AtEnd
    } else if ratio > T::zero() && ratio < T::one() {
        Location::Inside(ratio)
    } else {
        Location::Outside
    }
}
