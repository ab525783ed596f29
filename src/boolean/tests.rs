use std::f64::consts::PI;

use approx::assert_relative_eq;
use nalgebra::Point2;

use crate::contour::Contour;

use super::Boolean;

fn p(x: f64, y: f64) -> Point2<f64> {
    Point2::new(x, y)
}

const TOL: f64 = 1e-8;

#[test]
fn union_of_overlapping_rectangles() {
    let a = Contour::rectangle(p(0., 0.), 2., 2.);
    let b = Contour::rectangle(p(1., 1.), 2., 2.);
    let result = a.union(&b, TOL).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].spans().len(), 8);
    assert_relative_eq!(result[0].signed_area(), 7., epsilon = 1e-9);
}

#[test]
fn intersection_of_overlapping_rectangles() {
    let a = Contour::rectangle(p(0., 0.), 2., 2.);
    let b = Contour::rectangle(p(1., 1.), 2., 2.);
    let result = a.intersection(&b, TOL).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].spans().len(), 4);
    assert_relative_eq!(result[0].signed_area(), 1., epsilon = 1e-9);
    let bounds = result[0].bounding_box();
    assert_relative_eq!(bounds.min().x, 1., epsilon = 1e-9);
    assert_relative_eq!(bounds.max().y, 2., epsilon = 1e-9);
}

#[test]
fn difference_carves_the_overlap() {
    let a = Contour::rectangle(p(0., 0.), 2., 2.);
    let b = Contour::rectangle(p(1., 1.), 2., 2.);
    let result = a.difference(&b, TOL).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].spans().len(), 6);
    assert_relative_eq!(result[0].signed_area(), 3., epsilon = 1e-9);
}

#[test]
fn disjoint_shapes_pass_through_union() {
    let a = Contour::rectangle(p(0., 0.), 1., 1.);
    let b = Contour::rectangle(p(5., 0.), 1., 1.);
    let result = a.union(&b, TOL).unwrap();
    assert_eq!(result.len(), 2);
    for contour in &result {
        assert_relative_eq!(contour.signed_area(), 1., epsilon = 1e-9);
    }

    assert!(a.intersection(&b, TOL).unwrap().is_empty());

    let result = a.difference(&b, TOL).unwrap();
    assert_eq!(result.len(), 1);
    assert_relative_eq!(result[0].signed_area(), 1., epsilon = 1e-9);
}

#[test]
fn shared_edge_cancels_in_union() {
    let a = Contour::rectangle(p(0., 0.), 1., 1.);
    let b = Contour::rectangle(p(1., 0.), 1., 1.);
    let result = a.union(&b, TOL).unwrap();
    assert_eq!(result.len(), 1);
    assert_relative_eq!(result[0].signed_area(), 2., epsilon = 1e-9);
    // The shared boundary at x = 1 is interior and must be gone.
    for simplex in result[0].all_simplexes() {
        let chord_on_seam =
            (simplex.start().x - 1.).abs() < 1e-9 && (simplex.end().x - 1.).abs() < 1e-9;
        assert!(!chord_on_seam, "seam edge survived the union");
    }
}

#[test]
fn nested_circle_in_rectangle() {
    let square = Contour::rectangle(p(0., 0.), 4., 4.);
    let circle = Contour::circle(p(2., 2.), 1.);

    let union = square.union(&circle, TOL).unwrap();
    assert_eq!(union.len(), 1);
    assert_relative_eq!(union[0].signed_area(), 16., epsilon = 1e-9);

    let intersection = square.intersection(&circle, TOL).unwrap();
    assert_eq!(intersection.len(), 1);
    assert_relative_eq!(intersection[0].signed_area(), PI, epsilon = 1e-9);
}

#[test]
fn identical_shapes_collapse_in_composition() {
    let circle = Contour::circle(p(0., 0.), 1.);
    let union = circle.union(&circle, TOL).unwrap();
    assert_eq!(union.len(), 1);
    assert_relative_eq!(union[0].signed_area(), PI, epsilon = 1e-9);

    let intersection = circle.intersection(&circle, TOL).unwrap();
    assert_eq!(intersection.len(), 1);
    assert_relative_eq!(intersection[0].signed_area(), PI, epsilon = 1e-9);

    assert!(circle.difference(&circle, TOL).unwrap().is_empty());

    let square = Contour::rectangle(p(0., 0.), 1., 1.);
    let union = square.union(&square, TOL).unwrap();
    assert_eq!(union.len(), 1);
    assert_relative_eq!(union[0].signed_area(), 1., epsilon = 1e-9);
}

#[test]
fn partial_edge_overlap_composes() {
    // The rectangles overlap in [0.5, 1] x [0, 1] and share the bottom and
    // top boundary spans of that strip.
    let a = Contour::rectangle(p(0., 0.), 1., 1.);
    let b = Contour::rectangle(p(0.5, 0.), 1., 1.);

    let union = a.union(&b, TOL).unwrap();
    assert_eq!(union.len(), 1);
    assert_eq!(union[0].spans().len(), 8);
    assert_relative_eq!(union[0].signed_area(), 1.5, epsilon = 1e-9);

    let intersection = a.intersection(&b, TOL).unwrap();
    assert_eq!(intersection.len(), 1);
    assert_eq!(intersection[0].spans().len(), 4);
    assert_relative_eq!(intersection[0].signed_area(), 0.5, epsilon = 1e-9);

    let difference = a.difference(&b, TOL).unwrap();
    assert_eq!(difference.len(), 1);
    assert_relative_eq!(difference[0].signed_area(), 0.5, epsilon = 1e-9);
    assert_relative_eq!(difference[0].bounding_box().max().x, 0.5, epsilon = 1e-9);
}

#[test]
fn multi_contour_shapes_compose() {
    let lhs = vec![
        Contour::rectangle(p(0., 0.), 1., 1.),
        Contour::rectangle(p(3., 0.), 1., 1.),
    ];
    let rhs = [Contour::rectangle(p(0.5, 0.), 1., 1.)];
    let result = lhs.union(&rhs, TOL).unwrap();
    assert_eq!(result.len(), 2);
    let total: f64 = result.iter().map(|c| c.signed_area()).sum();
    assert_relative_eq!(total, 2.5, epsilon = 1e-9);
}

#[test]
fn rejects_non_positive_tolerance() {
    let a = Contour::rectangle(p(0., 0.), 1., 1.);
    let b = Contour::rectangle(p(0.5, 0.), 1., 1.);
    assert!(a.union(&b, 0.).is_err());
    assert!(a.union(&b, -1.).is_err());
}
