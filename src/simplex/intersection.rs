use nalgebra::{Point2, Vector2};

use crate::misc::{orientation, FloatingPoint, Orientation};

use super::Simplex;

/// All point intersections between two spans, as `(lhs_ratio, rhs_ratio)`
/// pairs in `[0, 1] × [0, 1]`. Parallel/coincident overlaps produce no
/// entries here; they are handled by the coincidence classifier.
pub fn intersection_ratios<T: FloatingPoint>(lhs: &Simplex<T>, rhs: &Simplex<T>) -> Vec<(T, T)> {
    match (lhs, rhs) {
        (Simplex::Line { start: s1, end: e1 }, Simplex::Line { start: s2, end: e2 }) => {
            line_line(s1, e1, s2, e2)
        }
        (Simplex::Line { start, end }, Simplex::CircleArc { .. }) => line_arc(start, end, rhs),
        (Simplex::CircleArc { .. }, Simplex::Line { start, end }) => line_arc(start, end, lhs)
            .into_iter()
            .map(|(t, u)| (u, t))
            .collect(),
        (Simplex::CircleArc { .. }, Simplex::CircleArc { .. }) => arc_arc(lhs, rhs),
    }
}

fn line_line<T: FloatingPoint>(
    s1: &Point2<T>,
    e1: &Point2<T>,
    s2: &Point2<T>,
    e2: &Point2<T>,
) -> Vec<(T, T)> {
    // Robust rejection of clearly separated segments.
    let o1 = orientation(s1, e1, s2);
    let o2 = orientation(s1, e1, e2);
    if o1 == o2 && o1 != Orientation::Collinear {
        return vec![];
    }
    let o3 = orientation(s2, e2, s1);
    let o4 = orientation(s2, e2, e1);
    if o3 == o4 && o3 != Orientation::Collinear {
        return vec![];
    }

    let d1 = e1 - s1;
    let d2 = e2 - s2;
    let denom = d1.perp(&d2);
    if denom == T::zero() {
        return vec![];
    }
    let sd = s2 - s1;
    let t = sd.perp(&d2) / denom;
    let u = sd.perp(&d1) / denom;
    if t >= T::zero() && t <= T::one() && u >= T::zero() && u <= T::one() {
        vec![(t, u)]
    } else {
        vec![]
    }
}

fn line_arc<T: FloatingPoint>(start: &Point2<T>, end: &Point2<T>, arc: &Simplex<T>) -> Vec<(T, T)> {
    let Simplex::CircleArc { center, radius, .. } = arc else {
        return vec![];
    };
    let dir = end - start;
    let m: Vector2<T> = start - center;
    let a = dir.norm_squared();
    if a <= T::default_epsilon() {
        return vec![];
    }
    let b = dir.dot(&m) * T::from_f64(2.).unwrap();
    let c = m.norm_squared() - *radius * *radius;
    let disc = b * b - T::from_f64(4.).unwrap() * a * c;
    if disc < T::zero() {
        return vec![];
    }
    let sqrt_disc = disc.sqrt();
    let half = T::from_f64(0.5).unwrap();
    let mut roots = vec![(-b - sqrt_disc) * half / a];
    if sqrt_disc > T::zero() {
        roots.push((-b + sqrt_disc) * half / a);
    }

    let mut out = vec![];
    for t in roots {
        if t < T::zero() || t > T::one() {
            continue;
        }
        let p = start + dir * t;
        let v = p - center;
        let angle = v.y.atan2(v.x);
        if let Some(u) = arc.arc_ratio_of_angle(angle, T::zero()) {
            out.push((t, u));
        }
    }
    out
}

fn arc_arc<T: FloatingPoint>(lhs: &Simplex<T>, rhs: &Simplex<T>) -> Vec<(T, T)> {
    let (Simplex::CircleArc { center: c1, radius: r1, .. }, Simplex::CircleArc { center: c2, radius: r2, .. }) =
        (lhs, rhs)
    else {
        return vec![];
    };
    let delta = c2 - c1;
    let d = delta.norm();
    if d <= T::default_epsilon() {
        // Concentric circles either miss or coincide; never a point crossing.
        return vec![];
    }
    let a = (*r1 * *r1 - *r2 * *r2 + d * d) / (d + d);
    let h_sq = *r1 * *r1 - a * a;
    if h_sq < T::zero() {
        return vec![];
    }
    let h = h_sq.max(T::zero()).sqrt();
    let base = c1 + delta * (a / d);
    let perp = Vector2::new(-delta.y, delta.x) * (h / d);

    let mut candidates = vec![base + perp];
    if h > T::zero() {
        candidates.push(base - perp);
    }

    let mut out = vec![];
    for p in candidates {
        let a1 = (p - c1).y.atan2((p - c1).x);
        let a2 = (p - c2).y.atan2((p - c2).x);
        if let (Some(t), Some(u)) = (
            lhs.arc_ratio_of_angle(a1, T::zero()),
            rhs.arc_ratio_of_angle(a2, T::zero()),
        ) {
            out.push((t, u));
        }
    }
    out
}
