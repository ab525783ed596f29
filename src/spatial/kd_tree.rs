use nalgebra::Point2;

use crate::misc::FloatingPoint;

fn coord<T: FloatingPoint>(point: &Point2<T>, axis: usize) -> T {
    if axis == 0 {
        point.x
    } else {
        point.y
    }
}

#[derive(Debug, Clone)]
struct KdSlot<T: FloatingPoint, V> {
    position: Point2<T>,
    data: V,
    axis: usize,
    alive: bool,
    left: Option<usize>,
    right: Option<usize>,
}

/// A 2D kd-tree over points with associated data, supporting incremental
/// insertion and removal.
///
/// Removal tombstones the slot so the tree structure stays valid; once dead
/// slots outnumber live ones the tree is rebuilt balanced from the survivors.
#[derive(Debug, Clone)]
pub struct KdTree<T: FloatingPoint, V> {
    slots: Vec<KdSlot<T, V>>,
    root: Option<usize>,
    dead: usize,
}

impl<T: FloatingPoint, V> Default for KdTree<T, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FloatingPoint, V> KdTree<T, V> {
    pub fn new() -> Self {
        Self {
            slots: vec![],
            root: None,
            dead: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len() - self.dead
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert a point by descending to an empty child link. Values `<` the
    /// split go left, `>=` go right.
    pub fn insert(&mut self, position: Point2<T>, data: V) {
        let index = self.slots.len();
        let mut cursor = match self.root {
            Some(root) => root,
            None => {
                self.slots.push(KdSlot {
                    position,
                    data,
                    axis: 0,
                    alive: true,
                    left: None,
                    right: None,
                });
                self.root = Some(index);
                return;
            }
        };
        loop {
            let slot = &self.slots[cursor];
            let axis = slot.axis;
            let go_left = coord(&position, axis) < coord(&slot.position, axis);
            let link = if go_left { slot.left } else { slot.right };
            match link {
                Some(next) => cursor = next,
                None => {
                    self.slots.push(KdSlot {
                        position,
                        data,
                        axis: (axis + 1) % 2,
                        alive: true,
                        left: None,
                        right: None,
                    });
                    let slot = &mut self.slots[cursor];
                    if go_left {
                        slot.left = Some(index);
                    } else {
                        slot.right = Some(index);
                    }
                    return;
                }
            }
        }
    }

    /// The live point nearest to `position`, with its squared distance.
    pub fn nearest(&self, position: &Point2<T>) -> Option<(Point2<T>, &V, T)> {
        let mut best: Option<(usize, T)> = None;
        self.nearest_recursive(self.root, position, &mut best);
        best.map(|(index, dist)| {
            let slot = &self.slots[index];
            (slot.position, &slot.data, dist)
        })
    }

    fn nearest_recursive(
        &self,
        node: Option<usize>,
        position: &Point2<T>,
        best: &mut Option<(usize, T)>,
    ) {
        let Some(index) = node else {
            return;
        };
        let slot = &self.slots[index];
        if slot.alive {
            let dist = (slot.position - position).norm_squared();
            if best.map(|(_, d)| dist < d).unwrap_or(true) {
                *best = Some((index, dist));
            }
        }

        let axis_val = coord(position, slot.axis);
        let split_val = coord(&slot.position, slot.axis);
        let (first, second) = if axis_val < split_val {
            (slot.left, slot.right)
        } else {
            (slot.right, slot.left)
        };

        self.nearest_recursive(first, position, best);

        // The far side only matters if the splitting plane is closer than the
        // best squared distance found so far.
        let axis_dist = (axis_val - split_val) * (axis_val - split_val);
        if best.map(|(_, d)| axis_dist < d).unwrap_or(true) {
            self.nearest_recursive(second, position, best);
        }
    }

    /// All live points within `radius` of `position`.
    pub fn within_radius(&self, position: &Point2<T>, radius: T) -> Vec<(Point2<T>, &V)> {
        let mut results = vec![];
        self.within_recursive(self.root, position, radius, &mut results);
        results
    }

    fn within_recursive<'a>(
        &'a self,
        node: Option<usize>,
        position: &Point2<T>,
        radius: T,
        results: &mut Vec<(Point2<T>, &'a V)>,
    ) {
        let Some(index) = node else {
            return;
        };
        let slot = &self.slots[index];
        if slot.alive && (slot.position - position).norm_squared() <= radius * radius {
            results.push((slot.position, &slot.data));
        }

        let axis_val = coord(position, slot.axis);
        let split_val = coord(&slot.position, slot.axis);
        if axis_val - radius < split_val {
            self.within_recursive(slot.left, position, radius, results);
        }
        if axis_val + radius >= split_val {
            self.within_recursive(slot.right, position, radius, results);
        }
    }

    /// Tombstone the slot matching `data` at `position`. Returns whether a
    /// matching live slot was found.
    pub fn remove(&mut self, position: &Point2<T>, data: &V) -> bool
    where
        V: PartialEq,
    {
        let found = self
            .slots
            .iter()
            .position(|s| s.alive && s.data == *data && s.position == *position);
        let Some(index) = found else {
            return false;
        };
        self.slots[index].alive = false;
        self.dead += 1;
        if self.dead > self.len() {
            self.rebuild();
        }
        true
    }

    /// Rebuild balanced from the live entries using median splits.
    fn rebuild(&mut self) {
        let slots = std::mem::take(&mut self.slots);
        let entries: Vec<(Point2<T>, V)> = slots
            .into_iter()
            .filter(|s| s.alive)
            .map(|s| (s.position, s.data))
            .collect();
        self.dead = 0;
        self.slots = Vec::with_capacity(entries.len());
        self.root = self.build_balanced(entries, 0);
    }

    fn build_balanced(&mut self, mut entries: Vec<(Point2<T>, V)>, depth: usize) -> Option<usize> {
        if entries.is_empty() {
            return None;
        }
        let axis = depth % 2;
        entries.sort_by(|a, b| {
            coord(&a.0, axis)
                .partial_cmp(&coord(&b.0, axis))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let median = entries.len() / 2;
        let right_entries = entries.split_off(median + 1);
        let (position, data) = entries.pop().unwrap();

        let index = self.slots.len();
        self.slots.push(KdSlot {
            position,
            data,
            axis,
            alive: true,
            left: None,
            right: None,
        });
        let left = self.build_balanced(entries, depth + 1);
        let right = self.build_balanced(right_entries, depth + 1);
        let slot = &mut self.slots[index];
        slot.left = left;
        slot.right = right;
        Some(index)
    }
}
