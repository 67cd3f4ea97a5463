
/*!
Disjoint-set forest over the logical contig indices.

Roots store the negative size of their set, everything else stores its parent index.
Storing sizes as negative values in the same vector is what lets the partitioner ask
"is this set saturated?" without a second lookup structure.
*/

/// Union-find over a fixed number of elements with path halving and union by size.
#[derive(Clone, Debug)]
pub struct UnionFind {
    /// Negative set size for roots, parent index otherwise
    values: Vec<i64>
}

impl UnionFind {
    /// Creates a new union-find where every element is its own singleton set.
    /// # Arguments
    /// * `len` - the number of elements
    pub fn new(len: usize) -> UnionFind {
        UnionFind {
            values: vec![-1; len]
        }
    }

    /// Returns the representative of the set containing `x`, halving the path on the way up.
    pub fn find(&mut self, x: usize) -> usize {
        let mut current = x;
        while self.values[current] >= 0 {
            let parent = self.values[current] as usize;
            if self.values[parent] >= 0 {
                // point to the grandparent, halving the path for future queries
                self.values[current] = self.values[parent];
            }
            current = parent;
        }
        current
    }

    /// Joins the sets containing `a` and `b`; the larger set absorbs the smaller.
    pub fn union(&mut self, a: usize, b: usize) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return;
        }

        // sizes are negative, so the more negative root is the bigger set
        let (big, small) = if self.values[root_a] <= self.values[root_b] {
            (root_a, root_b)
        } else {
            (root_b, root_a)
        };
        self.values[big] += self.values[small];
        self.values[small] = big as i64;
    }

    /// Size of the set containing `x`.
    pub fn set_size(&mut self, x: usize) -> usize {
        let root = self.find(x);
        (-self.values[root]) as usize
    }

    /// Number of elements in the universe.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singletons() {
        let mut uf = UnionFind::new(4);
        for i in 0..4 {
            assert_eq!(uf.find(i), i);
            assert_eq!(uf.set_size(i), 1);
        }
    }

    #[test]
    fn test_union_and_size() {
        let mut uf = UnionFind::new(6);
        uf.union(0, 1);
        uf.union(2, 3);
        assert_eq!(uf.find(0), uf.find(1));
        assert_ne!(uf.find(0), uf.find(2));
        assert_eq!(uf.set_size(1), 2);

        uf.union(1, 3);
        assert_eq!(uf.find(0), uf.find(3));
        assert_eq!(uf.set_size(2), 4);
        assert_eq!(uf.set_size(4), 1);
    }

    #[test]
    fn test_union_is_idempotent() {
        let mut uf = UnionFind::new(3);
        uf.union(0, 1);
        uf.union(0, 1);
        uf.union(1, 0);
        assert_eq!(uf.set_size(0), 2);
    }

    #[test]
    fn test_larger_set_absorbs() {
        let mut uf = UnionFind::new(5);
        uf.union(0, 1);
        uf.union(0, 2);
        let big_root = uf.find(0);
        uf.union(3, 0);
        assert_eq!(uf.find(3), big_root);
    }
}
