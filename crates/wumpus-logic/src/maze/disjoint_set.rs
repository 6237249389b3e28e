//! Union-find with path compression and union by rank.

/// Disjoint sets over the indices `0..len`.
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
    sets: usize,
}

impl DisjointSet {
    /// Every element starts in its own set.
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
            sets: len,
        }
    }

    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Path compression
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    /// Merge the sets holding `a` and `b`. Returns false if they were already joined.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        self.sets -= 1;
        true
    }

    /// Number of distinct sets remaining.
    pub fn set_count(&self) -> usize {
        self.sets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_joins_and_counts() {
        let mut ds = DisjointSet::new(5);
        assert_eq!(ds.set_count(), 5);
        assert!(ds.union(0, 1));
        assert!(ds.union(3, 4));
        assert!(!ds.union(1, 0));
        assert_eq!(ds.find(0), ds.find(1));
        assert_ne!(ds.find(1), ds.find(3));
        assert!(ds.union(1, 4));
        assert_eq!(ds.find(0), ds.find(3));
        assert_eq!(ds.set_count(), 2);
    }
}
