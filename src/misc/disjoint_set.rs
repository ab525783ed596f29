/// Union-find over dense indices with path compression.
///
/// Used to minimize overlapping merge-candidate groups into pairwise-disjoint
/// partitions: any two groups sharing a member collapse into one.
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    pub fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }

    /// Extracts the final partitions restricted to `members`, in ascending
    /// member order within each group and ascending order of the lowest
    /// member across groups. Singleton groups are omitted.
    pub fn groups(&mut self, members: impl IntoIterator<Item = usize>) -> Vec<Vec<usize>> {
        let mut by_root: std::collections::BTreeMap<usize, Vec<usize>> = Default::default();
        let mut ordered: Vec<usize> = members.into_iter().collect();
        ordered.sort_unstable();
        ordered.dedup();
        for m in ordered {
            let root = self.find(m);
            by_root.entry(root).or_default().push(m);
        }
        let mut groups: Vec<Vec<usize>> = by_root.into_values().filter(|g| g.len() > 1).collect();
        groups.sort_by_key(|g| g[0]);
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::DisjointSet;

    #[test]
    fn overlapping_groups_collapse() {
        let mut set = DisjointSet::new(6);
        // {0, 1}, {1, 2} and {4, 5} -> {0, 1, 2}, {4, 5}
        set.union(0, 1);
        set.union(1, 2);
        set.union(4, 5);
        let groups = set.groups(0..6);
        assert_eq!(groups, vec![vec![0, 1, 2], vec![4, 5]]);
    }

    #[test]
    fn singletons_are_omitted() {
        let mut set = DisjointSet::new(3);
        set.union(0, 2);
        let groups = set.groups(0..3);
        assert_eq!(groups, vec![vec![0, 2]]);
    }
}
