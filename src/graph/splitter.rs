use std::collections::HashMap;

use itertools::Itertools;

use crate::contour::{Contour, ContourSpan};
use crate::misc::FloatingPoint;
use crate::simplex::{coincidence_relationship, CoincidenceRelationship};
use crate::spatial::QuadTree;

/// A correspondence between one period on each of two shapes, produced when
/// the splitter subdivides both at a shared interference point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlobalIntersection<T: FloatingPoint> {
    pub lhs_shape: usize,
    pub lhs_period: T,
    pub rhs_shape: usize,
    pub rhs_period: T,
}

/// Correspondence records indexed by shape for period lookup during graph
/// building.
#[derive(Clone, Debug)]
pub struct GlobalIntersectionCache<T: FloatingPoint> {
    by_shape: HashMap<usize, Vec<(T, usize, T)>>,
}

impl<T: FloatingPoint> Default for GlobalIntersectionCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FloatingPoint> GlobalIntersectionCache<T> {
    pub fn new() -> Self {
        Self {
            by_shape: HashMap::new(),
        }
    }

    pub fn from_records(records: Vec<GlobalIntersection<T>>) -> Self {
        let mut cache = Self::new();
        for record in records {
            cache.insert(record);
        }
        cache
    }

    /// Register a record, indexed from both shapes' points of view.
    pub fn insert(&mut self, record: GlobalIntersection<T>) {
        self.by_shape.entry(record.lhs_shape).or_default().push((
            record.lhs_period,
            record.rhs_shape,
            record.rhs_period,
        ));
        self.by_shape.entry(record.rhs_shape).or_default().push((
            record.rhs_period,
            record.lhs_shape,
            record.lhs_period,
        ));
    }

    /// Whether a correspondence between `(shape_a, period_a)` and
    /// `(shape_b, period_b)` is on record.
    pub fn corresponds(&self, shape_a: usize, period_a: T, shape_b: usize, period_b: T) -> bool {
        let eps = T::default_epsilon().sqrt();
        self.by_shape
            .get(&shape_a)
            .map(|records| {
                records.iter().any(|&(p, s, q)| {
                    s == shape_b && (p - period_a).abs() <= eps && (q - period_b).abs() <= eps
                })
            })
            .unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.by_shape.is_empty()
    }
}

/// Subdivide every contour at each pairwise interference so no span straddles
/// an intersection or overlap boundary, and report the correspondences.
pub fn split_contours<T: FloatingPoint>(
    mut contours: Vec<Contour<T>>,
    tolerance: T,
) -> (Vec<Contour<T>>, Vec<GlobalIntersection<T>>) {
    let mut records = vec![];
    if contours.len() < 2 {
        return (contours, records);
    }

    let total = contours
        .iter()
        .map(|c| c.bounding_box())
        .reduce(|a, b| a.union(&b))
        .unwrap()
        .inflated(T::one());
    let mut index = QuadTree::new(total, 8);
    for (i, contour) in contours.iter().enumerate() {
        index.insert(contour.bounding_box(), i);
    }

    for i in 0..contours.len() {
        let region = contours[i].bounding_box().inflated(tolerance);
        // Index ordering: each unordered pair is visited once, by its lower
        // member.
        let partners = index
            .query(&region)
            .into_iter()
            .copied()
            .filter(|&j| j > i)
            .sorted()
            .dedup()
            .collect_vec();
        for j in partners {
            split_pair(&mut contours, i, j, tolerance, &mut records);
        }
    }
    log::trace!("contour splitting produced {} records", records.len());
    (contours, records)
}

fn period_of<T: FloatingPoint>(span: &ContourSpan<T>, ratio: T) -> T {
    span.start_period + (span.end_period - span.start_period) * ratio
}

fn split_pair<T: FloatingPoint>(
    contours: &mut [Contour<T>],
    i: usize,
    j: usize,
    tolerance: T,
    records: &mut Vec<GlobalIntersection<T>>,
) {
    let (head, tail) = contours.split_at_mut(j);
    let lhs = &mut head[i];
    let rhs = &mut tail[0];
    let record = |lhs_period: T, rhs_period: T| GlobalIntersection {
        lhs_shape: i,
        lhs_period,
        rhs_shape: j,
        rhs_period,
    };

    // Point intersections. Crossings that merely touch an existing vertex
    // are already explicit nodes; splitting there would cut slivers.
    let tolerance_squared = tolerance * tolerance;
    for (lhs_period, rhs_period) in lhs.raw_intersection_periods(rhs, tolerance) {
        let point = lhs.point_at(lhs_period);
        if lhs.is_on_vertex(&point, tolerance_squared) || rhs.is_on_vertex(&point, tolerance_squared)
        {
            continue;
        }
        lhs.split(lhs_period, tolerance);
        rhs.split(rhs_period, tolerance);
        records.push(record(lhs_period, rhs_period));
    }

    // Partial-overlap coincidences, classified against a snapshot of the
    // already point-split spans.
    let lhs_spans = lhs.spans().to_vec();
    let rhs_spans = rhs.spans().to_vec();
    for a in &lhs_spans {
        for b in &rhs_spans {
            match coincidence_relationship(&a.simplex, &b.simplex, tolerance) {
                CoincidenceRelationship::NotCoincident => {}
                CoincidenceRelationship::SameSpan { opposing } => {
                    let (rhs_start, rhs_end) = if opposing {
                        (b.end_period, b.start_period)
                    } else {
                        (b.start_period, b.end_period)
                    };
                    records.push(record(a.start_period, rhs_start));
                    records.push(record(a.end_period, rhs_end));
                }
                CoincidenceRelationship::LhsContainsRhs {
                    lhs_at_rhs_start,
                    lhs_at_rhs_end,
                } => {
                    let p_start = period_of(a, lhs_at_rhs_start);
                    let p_end = period_of(a, lhs_at_rhs_end);
                    lhs.split(p_start, tolerance);
                    lhs.split(p_end, tolerance);
                    records.push(record(p_start, b.start_period));
                    records.push(record(p_end, b.end_period));
                }
                CoincidenceRelationship::RhsContainsLhs {
                    rhs_at_lhs_start,
                    rhs_at_lhs_end,
                } => {
                    let q_start = period_of(b, rhs_at_lhs_start);
                    let q_end = period_of(b, rhs_at_lhs_end);
                    rhs.split(q_start, tolerance);
                    rhs.split(q_end, tolerance);
                    records.push(record(a.start_period, q_start));
                    records.push(record(a.end_period, q_end));
                }
                CoincidenceRelationship::RhsContainsLhsStart {
                    rhs_at_lhs_start,
                    lhs_at_rhs_boundary,
                    rhs_boundary,
                } => {
                    let q = period_of(b, rhs_at_lhs_start);
                    rhs.split(q, tolerance);
                    records.push(record(a.start_period, q));
                    let p = period_of(a, lhs_at_rhs_boundary);
                    lhs.split(p, tolerance);
                    records.push(record(p, period_of(b, rhs_boundary)));
                }
                CoincidenceRelationship::RhsContainsLhsEnd {
                    rhs_at_lhs_end,
                    lhs_at_rhs_boundary,
                    rhs_boundary,
                } => {
                    let q = period_of(b, rhs_at_lhs_end);
                    rhs.split(q, tolerance);
                    records.push(record(a.end_period, q));
                    let p = period_of(a, lhs_at_rhs_boundary);
                    lhs.split(p, tolerance);
                    records.push(record(p, period_of(b, rhs_boundary)));
                }
                CoincidenceRelationship::LhsPrefixesRhs { rhs_at_lhs_end } => {
                    let q = period_of(b, rhs_at_lhs_end);
                    rhs.split(q, tolerance);
                    records.push(record(a.end_period, q));
                }
                CoincidenceRelationship::LhsSuffixesRhs { rhs_at_lhs_start } => {
                    let q = period_of(b, rhs_at_lhs_start);
                    rhs.split(q, tolerance);
                    records.push(record(a.start_period, q));
                }
            }
        }
    }
}
