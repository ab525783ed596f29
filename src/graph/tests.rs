use std::f64::consts::PI;

use approx::assert_relative_eq;
use itertools::Itertools;
use nalgebra::Point2;

use crate::bounding_box::BoundingBox;
use crate::contour::Contour;

use super::splitter::split_contours;
use super::{ClipGraph, EdgeKind, GeometryRef, NodeKind};

fn p(x: f64, y: f64) -> Point2<f64> {
    Point2::new(x, y)
}

const TOL: f64 = 1e-8;

#[test]
fn building_keeps_degree_invariants() {
    let a = Contour::rectangle(p(0., 0.), 2., 2.);
    let b = Contour::rectangle(p(1., 1.), 2., 2.);
    let graph = ClipGraph::from_parametric_intersections(&[a, b], TOL);

    // Two crossing rectangles: 4 + 4 corners plus 2 crossing points.
    assert_eq!(graph.node_count(), 10);
    assert_eq!(graph.edge_count(), 12);
    for id in graph.node_ids() {
        assert!(!graph.out_edges(id).is_empty());
        assert!(!graph.in_edges(id).is_empty());
    }
    for id in graph.edge_ids() {
        let edge = graph.edge(id).unwrap();
        assert!(graph.node(edge.start).is_some());
        assert!(graph.node(edge.end).is_some());
    }
}

#[test]
fn recombination_leaves_the_graph_unchanged() {
    let a = Contour::rectangle(p(0., 0.), 2., 2.);
    let b = Contour::rectangle(p(1., 1.), 2., 2.);
    let mut graph = ClipGraph::from_parametric_intersections(&[a, b], TOL);

    let first = graph.recombine(|_| true);
    let second = graph.recombine(|_| true);
    assert_eq!(first.len(), second.len());
    for (lhs, rhs) in first.iter().zip(&second) {
        assert_eq!(lhs.spans().len(), rhs.spans().len());
        assert_relative_eq!(lhs.signed_area(), rhs.signed_area(), epsilon = 1e-12);
    }
}

#[test]
fn disjoint_contours_round_trip() {
    let contours = (0..3)
        .map(|i| Contour::rectangle(p(i as f64 * 3., 0.), 1., 1.))
        .collect_vec();
    let mut graph = ClipGraph::from_parametric_intersections(&contours, TOL);
    let out = graph.recombine(|_| true);
    assert_eq!(out.len(), 3);
    let total: f64 = out.iter().map(|c| c.signed_area()).sum();
    assert_relative_eq!(total, 3., epsilon = 1e-9);
}

#[test]
fn coincident_edges_cancel_during_resolution() {
    let a = Contour::rectangle(p(0., 0.), 1., 1.);
    let b = Contour::rectangle(p(1., 0.), 1., 1.);
    let graph = ClipGraph::from_parametric_intersections(&[a, b], TOL);

    // The shared boundary at x = 1 cancels and the two squares fuse into a
    // single six-sided outline before recombination even runs.
    assert_eq!(graph.contours().len(), 1);
    assert_eq!(graph.edge_count(), 6);
    assert_eq!(graph.node_count(), 6);
    for id in graph.edge_ids() {
        let simplex = graph.edge_simplex(id);
        let on_seam =
            (simplex.start().x - 1.).abs() < 1e-9 && (simplex.end().x - 1.).abs() < 1e-9;
        assert!(!on_seam, "seam edge survived edge merging");
    }
}

#[test]
fn splitting_at_span_boundaries_is_a_no_op() {
    let square = Contour::rectangle(p(0., 0.), 1., 1.);
    let mut graph = ClipGraph::from_parametric_intersections(&[square], TOL);
    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.edge_count(), 4);

    let id = graph.edge_ids().next().unwrap();
    let (start, end) = {
        let edge = graph.edge(id).unwrap();
        (edge.start, edge.end)
    };
    assert_eq!(graph.split_edge_at_ratio(id, 0.), start);
    assert_eq!(graph.split_edge_at_ratio(id, 1.), end);
    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.edge_count(), 4);

    let mid = graph.split_edge_at_period(0, 0.125).unwrap();
    assert_eq!(graph.node_count(), 5);
    assert_eq!(graph.edge_count(), 5);
    let position = graph.node(mid).unwrap().position;
    assert_relative_eq!(position.x, 0.5, epsilon = 1e-12);
    assert_relative_eq!(position.y, 0., epsilon = 1e-12);
}

#[test]
fn near_vertex_passes_split_edge_interiors() {
    let square = Contour::rectangle(p(0., 0.), 1., 1.);
    let spur = Contour::polygon(&[p(0.5, -0.005), p(2., -1.), p(-1., -1.)]);
    let graph = ClipGraph::from_parametric_intersections(&[square, spur], 0.01);

    // The spur apex grazes the square's bottom edge far from its endpoints:
    // the edge splits there and the apex absorbs the cut point.
    assert_eq!(graph.node_count(), 7);
    assert_eq!(graph.edge_count(), 8);
    let apex = graph
        .node_ids()
        .find(|&id| {
            let position = graph.node(id).unwrap().position;
            (position.x - 0.5).abs() < 1e-9 && (position.y + 0.005).abs() < 1e-9
        })
        .expect("merged apex node");
    assert_eq!(graph.out_edges(apex).len() + graph.in_edges(apex).len(), 4);
    // Rewiring moved edge endpoints; cached bounds must have followed.
    for id in graph.edge_ids().collect_vec() {
        assert_eq!(
            *graph.edge(id).unwrap().bounds(),
            graph.edge_simplex(id).bounding_box()
        );
    }
}

#[test]
fn endpoint_grazing_folds_into_node_merge() {
    let mut graph = ClipGraph::with_bounds(BoundingBox::new(p(-1., -1.), p(2., 2.)), 0.01);
    let a = graph.add_node(p(0., 0.), NodeKind::Geometry { shape: 0, period: 0. });
    let b = graph.add_node(p(1., 0.), NodeKind::Geometry { shape: 0, period: 0.5 });
    let stray = graph.add_node(p(0.005, 0.005), NodeKind::Geometry { shape: 1, period: 0. });
    let apex = graph.add_node(p(0.5, 1.), NodeKind::Geometry { shape: 1, period: 0.5 });
    let reference = |shape, start_period, end_period| GeometryRef {
        shape,
        start_period,
        end_period,
    };
    let forward = graph.add_edge(a, b, EdgeKind::Line, vec![reference(0, 0., 0.5)]);
    let back = graph.add_edge(b, a, EdgeKind::Line, vec![reference(0, 0.5, 1.)]);
    graph.add_edge(stray, apex, EdgeKind::Line, vec![reference(1, 0., 0.5)]);
    graph.add_edge(apex, stray, EdgeKind::Line, vec![reference(1, 0.5, 1.)]);

    graph.resolve_interferences();

    // The stray vertex passes the long edge within tolerance of its start,
    // inside the endpoint margin: no sliver is split off, the vertex simply
    // merges with the endpoint.
    assert!(graph.edge(forward).is_some());
    assert!(graph.edge(back).is_some());
    assert_eq!(graph.node_count(), 3);
    assert!(graph.node(a).is_none());
    assert!(graph.node(stray).is_none());
    for id in graph.edge_ids().collect_vec() {
        assert_eq!(
            *graph.edge(id).unwrap().bounds(),
            graph.edge_simplex(id).bounding_box()
        );
    }
}

#[test]
fn winding_totals_accumulate_for_nested_shapes() {
    let outer = Contour::rectangle(p(0., 0.), 2., 2.);
    let inner = Contour::rectangle(p(0.5, 0.5), 1., 1.);
    let mut graph = ClipGraph::from_parametric_intersections(&[outer, inner], TOL);

    for id in graph.edge_ids().collect_vec() {
        graph.ensure_windings(id);
        let edge = graph.edge(id).unwrap();
        let windings = edge.windings().unwrap();
        let expected = match edge.references[0].shape {
            0 => 1,
            _ => 2,
        };
        assert_eq!(windings.total_winding, expected);
    }
}

#[test]
fn star_and_hexagon_split_in_parametric_order() {
    let star = Contour::polygon(
        &(0..10)
            .map(|k| {
                let r = if k % 2 == 0 { 2.0 } else { 0.8 };
                let angle = k as f64 * PI / 5.0;
                p(r * angle.cos(), r * angle.sin())
            })
            .collect_vec(),
    );
    let hexagon = Contour::polygon(
        &(0..6)
            .map(|j| {
                let angle = j as f64 * PI / 3.0;
                p(1.5 * angle.cos(), 1.5 * angle.sin())
            })
            .collect_vec(),
    );

    let (split, records) = split_contours(vec![star, hexagon], 1e-9);
    assert_eq!(split[0].spans().len(), 20);
    assert_eq!(split[1].spans().len(), 16);

    let expected = [
        (0.046240635176799, 0.027897116894711),
        (0.157882441802592, 0.179964030377264),
        (0.252842542002913, 0.232131647709614),
        (0.350520482950498, 0.375501928567498),
        (0.453232000673421, 0.429461806744387),
        (0.546767999326579, 0.570538193255613),
        (0.649479517049502, 0.624498071432502),
        (0.747157457997087, 0.767868352290386),
        (0.842117558197408, 0.820035969622736),
        (0.953759364823201, 0.972102883105289),
    ];
    assert_eq!(records.len(), expected.len());
    for (record, (star_period, hex_period)) in records.iter().zip(expected) {
        assert_eq!(record.lhs_shape, 0);
        assert_eq!(record.rhs_shape, 1);
        assert_relative_eq!(record.lhs_period, star_period, epsilon = 1e-9);
        assert_relative_eq!(record.rhs_period, hex_period, epsilon = 1e-9);
    }
}
