use nalgebra::Point2;

use crate::bounding_box::BoundingBox;
use crate::misc::FloatingPoint;

#[derive(Debug, Clone)]
struct QuadNode<T: FloatingPoint, V> {
    items: Vec<(BoundingBox<T>, V)>,
    children: Option<Box<[QuadNode<T, V>; 4]>>,
}

impl<T: FloatingPoint, V> QuadNode<T, V> {
    fn empty() -> Self {
        Self {
            items: vec![],
            children: None,
        }
    }
}

/// A region quadtree over axis-aligned boxes with associated data.
///
/// Each item is stored at the deepest cell that fully contains its box, so a
/// box straddling a subdivision line stays at the parent. Items outside the
/// tree bounds go into a loose overflow list at the root.
#[derive(Debug, Clone)]
pub struct QuadTree<T: FloatingPoint, V> {
    bounds: BoundingBox<T>,
    max_depth: usize,
    root: QuadNode<T, V>,
    overflow: Vec<(BoundingBox<T>, V)>,
}

fn quadrants<T: FloatingPoint>(bounds: &BoundingBox<T>) -> [BoundingBox<T>; 4] {
    let min = *bounds.min();
    let max = *bounds.max();
    let center = bounds.center();
    [
        BoundingBox::new(min, center),
        BoundingBox::new(Point2::new(center.x, min.y), Point2::new(max.x, center.y)),
        BoundingBox::new(Point2::new(min.x, center.y), Point2::new(center.x, max.y)),
        BoundingBox::new(center, max),
    ]
}

impl<T: FloatingPoint, V> QuadTree<T, V> {
    pub fn new(bounds: BoundingBox<T>, max_depth: usize) -> Self {
        Self {
            bounds,
            max_depth,
            root: QuadNode::empty(),
            overflow: vec![],
        }
    }

    pub fn bounds(&self) -> &BoundingBox<T> {
        &self.bounds
    }

    pub fn insert(&mut self, region: BoundingBox<T>, value: V) {
        if !self.bounds.contains_box(&region) {
            self.overflow.push((region, value));
            return;
        }
        let mut node = &mut self.root;
        let mut bounds = self.bounds;
        for _ in 0..self.max_depth {
            let cells = quadrants(&bounds);
            let Some(target) = cells.iter().position(|c| c.contains_box(&region)) else {
                break;
            };
            if node.children.is_none() {
                node.children = Some(Box::new([
                    QuadNode::empty(),
                    QuadNode::empty(),
                    QuadNode::empty(),
                    QuadNode::empty(),
                ]));
            }
            node = &mut node.children.as_mut().unwrap()[target];
            bounds = cells[target];
        }
        node.items.push((region, value));
    }

    /// Remove the item matching `value` stored under `region`. The region
    /// must match the one passed to `insert` for the descent to find it.
    pub fn remove(&mut self, region: &BoundingBox<T>, value: &V) -> bool
    where
        V: PartialEq,
    {
        if !self.bounds.contains_box(region) {
            if let Some(index) = self.overflow.iter().position(|(_, v)| v == value) {
                self.overflow.swap_remove(index);
                return true;
            }
            return false;
        }
        let mut node = &mut self.root;
        let mut bounds = self.bounds;
        loop {
            if let Some(index) = node.items.iter().position(|(_, v)| v == value) {
                node.items.swap_remove(index);
                return true;
            }
            let cells = quadrants(&bounds);
            let Some(target) = cells.iter().position(|c| c.contains_box(region)) else {
                return false;
            };
            let Some(children) = node.children.as_mut() else {
                return false;
            };
            node = &mut children[target];
            bounds = cells[target];
        }
    }

    /// All values whose boxes intersect `region`.
    pub fn query(&self, region: &BoundingBox<T>) -> Vec<&V> {
        let mut results = vec![];
        for (b, v) in &self.overflow {
            if b.intersects(region, None) {
                results.push(v);
            }
        }
        Self::query_recursive(&self.root, &self.bounds, region, &mut results);
        results
    }

    fn query_recursive<'a>(
        node: &'a QuadNode<T, V>,
        bounds: &BoundingBox<T>,
        region: &BoundingBox<T>,
        results: &mut Vec<&'a V>,
    ) {
        if !bounds.intersects(region, None) {
            return;
        }
        for (b, v) in &node.items {
            if b.intersects(region, None) {
                results.push(v);
            }
        }
        if let Some(children) = &node.children {
            for (child, cell) in children.iter().zip(quadrants(bounds)) {
                Self::query_recursive(child, &cell, region, results);
            }
        }
    }

    /// All values whose boxes contain `point`.
    pub fn query_point(&self, point: &Point2<T>) -> Vec<&V> {
        let region = BoundingBox::new(*point, *point);
        let mut results = vec![];
        for (b, v) in &self.overflow {
            if b.contains(point) {
                results.push(v);
            }
        }
        Self::query_recursive(&self.root, &self.bounds, &region, &mut results);
        results
    }

    pub fn len(&self) -> usize {
        fn count<T: FloatingPoint, V>(node: &QuadNode<T, V>) -> usize {
            node.items.len()
                + node
                    .children
                    .as_ref()
                    .map(|c| c.iter().map(count).sum())
                    .unwrap_or(0)
        }
        self.overflow.len() + count(&self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
