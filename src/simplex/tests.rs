use std::f64::consts::{FRAC_PI_2, PI, TAU};

use approx::assert_relative_eq;
use nalgebra::Point2;

use crate::misc::Invertible;

use super::{coincidence_relationship, intersection_ratios, CoincidenceRelationship, Simplex};

fn p(x: f64, y: f64) -> Point2<f64> {
    Point2::new(x, y)
}

#[test]
fn line_evaluation_and_length() {
    let line = Simplex::line(p(0., 0.), p(2., 0.));
    assert_eq!(line.point_at(0.5), p(1., 0.));
    assert_eq!(line.length(), 2.);
    assert_eq!(line.start(), p(0., 0.));
    assert_eq!(line.end(), p(2., 0.));
}

#[test]
fn arc_evaluation_and_bounds() {
    // Upper half circle of radius 1 around the origin.
    let arc = Simplex::try_arc(p(0., 0.), 1., 0., PI).unwrap();
    assert_relative_eq!(arc.point_at(0.5).x, 0., epsilon = 1e-12);
    assert_relative_eq!(arc.point_at(0.5).y, 1., epsilon = 1e-12);
    assert_relative_eq!(arc.length(), PI);

    let bounds = arc.bounding_box();
    assert_relative_eq!(bounds.min().x, -1., epsilon = 1e-12);
    assert_relative_eq!(bounds.min().y, 0., epsilon = 1e-12);
    assert_relative_eq!(bounds.max().y, 1., epsilon = 1e-12);
}

#[test]
fn arc_rejects_degenerate_parameters() {
    assert!(Simplex::try_arc(p(0., 0.), 0., 0., PI).is_err());
    assert!(Simplex::try_arc(p(0., 0.), 1., 0., 0.).is_err());
}

#[test]
fn line_line_crossing() {
    let a = Simplex::line(p(0., 0.), p(2., 0.));
    let b = Simplex::line(p(1., -1.), p(1., 1.));
    let hits = intersection_ratios(&a, &b);
    assert_eq!(hits.len(), 1);
    assert_relative_eq!(hits[0].0, 0.5);
    assert_relative_eq!(hits[0].1, 0.5);

    let c = Simplex::line(p(3., -1.), p(3., 1.));
    assert!(intersection_ratios(&a, &c).is_empty());
}

#[test]
fn line_arc_crossings() {
    let line = Simplex::line(p(0., 0.), p(2., 0.));
    let circle = Simplex::try_arc(p(1., 0.), 0.5, 0., TAU).unwrap();
    let hits = intersection_ratios(&line, &circle);
    assert_eq!(hits.len(), 2);
    assert_relative_eq!(hits[0].0, 0.25);
    assert_relative_eq!(hits[0].1, 0.5);
    assert_relative_eq!(hits[1].0, 0.75);
    assert_relative_eq!(hits[1].1, 0.);
}

#[test]
fn arc_arc_crossings() {
    let a = Simplex::try_arc(p(0., 0.), 1., 0., TAU).unwrap();
    let b = Simplex::try_arc(p(1., 0.), 1., 0., TAU).unwrap();
    let hits = intersection_ratios(&a, &b);
    assert_eq!(hits.len(), 2);
    assert_relative_eq!(hits[0].0, 1. / 6., epsilon = 1e-12);
    assert_relative_eq!(hits[0].1, 1. / 3., epsilon = 1e-12);
    assert_relative_eq!(hits[1].0, 5. / 6., epsilon = 1e-12);
    assert_relative_eq!(hits[1].1, 2. / 3., epsilon = 1e-12);
}

#[test]
fn split_preserves_geometry() {
    let line = Simplex::line(p(0., 0.), p(4., 0.));
    let (head, tail) = line.split_at(0.25);
    assert_eq!(head.end(), p(1., 0.));
    assert_eq!(tail.start(), p(1., 0.));
    assert_eq!(tail.end(), p(4., 0.));

    let arc = Simplex::try_arc(p(0., 0.), 1., 0., PI).unwrap();
    let (head, tail) = arc.split_at(0.5);
    assert_relative_eq!(head.length() + tail.length(), arc.length(), epsilon = 1e-12);
    let joint = head.end();
    assert_relative_eq!(joint.x, FRAC_PI_2.cos(), epsilon = 1e-12);
    assert_relative_eq!(joint.y, FRAC_PI_2.sin(), epsilon = 1e-12);
}

#[test]
fn closest_ratio_clamps_to_span() {
    let line = Simplex::line(p(0., 0.), p(2., 0.));
    let (ratio, point) = line.closest_ratio(&p(1., 5.));
    assert_relative_eq!(ratio, 0.5);
    assert_eq!(point, p(1., 0.));
    let (ratio, _) = line.closest_ratio(&p(-3., 0.));
    assert_eq!(ratio, 0.);

    let arc = Simplex::try_arc(p(0., 0.), 1., 0., PI).unwrap();
    let (ratio, _) = arc.closest_ratio(&p(0., 3.));
    assert_relative_eq!(ratio, 0.5, epsilon = 1e-12);
    // Below the half circle: both endpoints compete, the start wins ties.
    let (ratio, _) = arc.closest_ratio(&p(2., -1.));
    assert_eq!(ratio, 0.);
}

#[test]
fn inversion_swaps_direction() {
    let line = Simplex::line(p(0., 0.), p(1., 0.)).inverse();
    assert_eq!(line.start(), p(1., 0.));

    let arc = Simplex::try_arc(p(0., 0.), 1., 0., PI).unwrap().inverse();
    assert_relative_eq!(arc.start().x, -1., epsilon = 1e-12);
    assert_relative_eq!(arc.end().x, 1., epsilon = 1e-12);
}

#[test]
fn coincidence_same_span() {
    let a = Simplex::line(p(0., 0.), p(2., 0.));
    let same = Simplex::line(p(0., 0.), p(2., 0.));
    let reversed = Simplex::line(p(2., 0.), p(0., 0.));
    assert_eq!(
        coincidence_relationship(&a, &same, 1e-9),
        CoincidenceRelationship::SameSpan { opposing: false }
    );
    assert_eq!(
        coincidence_relationship(&a, &reversed, 1e-9),
        CoincidenceRelationship::SameSpan { opposing: true }
    );
}

#[test]
fn coincidence_containment() {
    let a = Simplex::line(p(0., 0.), p(2., 0.));
    let b = Simplex::line(p(0.5, 0.), p(1.5, 0.));
    assert_eq!(
        coincidence_relationship(&a, &b, 1e-9),
        CoincidenceRelationship::LhsContainsRhs {
            lhs_at_rhs_start: 0.25,
            lhs_at_rhs_end: 0.75
        }
    );
    assert_eq!(
        coincidence_relationship(&b, &a, 1e-9),
        CoincidenceRelationship::RhsContainsLhs {
            rhs_at_lhs_start: 0.25,
            rhs_at_lhs_end: 0.75
        }
    );
}

#[test]
fn coincidence_partial_overlap() {
    let a = Simplex::line(p(0., 0.), p(2., 0.));
    let b = Simplex::line(p(1., 0.), p(3., 0.));
    assert_eq!(
        coincidence_relationship(&a, &b, 1e-9),
        CoincidenceRelationship::RhsContainsLhsEnd {
            rhs_at_lhs_end: 0.5,
            lhs_at_rhs_boundary: 0.5,
            rhs_boundary: 0.
        }
    );
}

#[test]
fn coincidence_prefix_and_suffix() {
    let short = Simplex::line(p(0., 0.), p(1., 0.));
    let long = Simplex::line(p(0., 0.), p(2., 0.));
    assert_eq!(
        coincidence_relationship(&short, &long, 1e-9),
        CoincidenceRelationship::LhsPrefixesRhs { rhs_at_lhs_end: 0.5 }
    );
    let tail = Simplex::line(p(1., 0.), p(2., 0.));
    assert_eq!(
        coincidence_relationship(&tail, &long, 1e-9),
        CoincidenceRelationship::LhsSuffixesRhs { rhs_at_lhs_start: 0.5 }
    );
}

#[test]
fn coincidence_rejects_disjoint_and_skew() {
    let a = Simplex::line(p(0., 0.), p(1., 0.));
    let shifted = Simplex::line(p(0., 1.), p(1., 1.));
    let skew = Simplex::line(p(0., 0.), p(1., 1.));
    let apart = Simplex::line(p(2., 0.), p(3., 0.));
    assert_eq!(
        coincidence_relationship(&a, &shifted, 1e-9),
        CoincidenceRelationship::NotCoincident
    );
    assert_eq!(
        coincidence_relationship(&a, &skew, 1e-9),
        CoincidenceRelationship::NotCoincident
    );
    assert_eq!(
        coincidence_relationship(&a, &apart, 1e-9),
        CoincidenceRelationship::NotCoincident
    );
}

#[test]
fn complementary_arcs_share_endpoints_only() {
    // Both halves of one circle share both endpoints but cover disjoint
    // angular spans.
    let upper = Simplex::try_arc(p(0., 0.), 1., 0., PI).unwrap();
    let lower = Simplex::try_arc(p(0., 0.), 1., PI, PI).unwrap();
    assert_eq!(
        coincidence_relationship(&upper, &lower, 1e-9),
        CoincidenceRelationship::NotCoincident
    );
    // A genuinely retraced half keeps its classification.
    let retraced = Simplex::try_arc(p(0., 0.), 1., PI, -PI).unwrap();
    assert_eq!(
        coincidence_relationship(&upper, &retraced, 1e-9),
        CoincidenceRelationship::SameSpan { opposing: true }
    );
}

#[test]
fn coincident_arcs() {
    let half = Simplex::try_arc(p(0., 0.), 1., 0., PI).unwrap();
    let quarter = Simplex::try_arc(p(0., 0.), 1., 0., FRAC_PI_2).unwrap();
    assert_eq!(
        coincidence_relationship(&half, &quarter, 1e-9),
        CoincidenceRelationship::LhsContainsRhs {
            lhs_at_rhs_start: 0.,
            lhs_at_rhs_end: 0.5
        }
    );
    assert_eq!(
        coincidence_relationship(&quarter, &half, 1e-9),
        CoincidenceRelationship::LhsPrefixesRhs { rhs_at_lhs_end: 0.5 }
    );
}
