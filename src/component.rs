
/*!
Turns a partition into an ordered map of components and brings each component's members
into the order the merge stage consumes them in.

A component is keyed by the smaller of the two set representatives of its strand
families; it collects every accepted pair in both orders plus the reverse-complement
twins, so both strands of a contig group land in the same record. The breadth-first
member order makes the merge reproducible within a run.
*/

use log::info;
use rustc_hash::FxHashSet as HashSet;
use std::collections::{BTreeMap, BTreeSet};

use crate::partitioner::Partition;

/// A connected group of contigs judged to overlap.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Component {
    /// Representative index the component is keyed by
    rep: usize,
    /// Aligned pairs in both orders, including the reverse-complement twins
    aligned_pairs: BTreeSet<(usize, usize)>
}

impl Component {
    /// Creates an empty component keyed by `rep`.
    pub fn new(rep: usize) -> Component {
        Component {
            rep,
            aligned_pairs: BTreeSet::new()
        }
    }

    /// Members of one strand family in alignment-adjacency order: a breadth-first walk
    /// over the pair set starting from the smaller index of the first pair. A singleton
    /// component yields just its key.
    pub fn align_order(&self) -> Vec<usize> {
        let first = match self.aligned_pairs.iter().next() {
            Some(&(a, _b)) => a,
            None => return vec![self.rep]
        };

        let mut order = vec![first];
        let mut seen: HashSet<usize> = HashSet::default();
        seen.insert(first);

        let mut i = 0;
        while i < order.len() {
            let current = order[i];
            for &(_a, neighbor) in self.aligned_pairs.range((current, 0)..=(current, usize::MAX)) {
                if seen.insert(neighbor) {
                    order.push(neighbor);
                }
            }
            i += 1;
        }
        order
    }

    // getters
    pub fn rep(&self) -> usize {
        self.rep
    }

    pub fn aligned_pairs(&self) -> &BTreeSet<(usize, usize)> {
        &self.aligned_pairs
    }
}

/// Maps every set of the union-find to a component record and backfills singleton
/// components for forward contigs that never aligned to anything.
/// # Arguments
/// * `partition` - the aligned pairs plus union-find produced by partitioning
/// * `num_forward` - the forward contig count N
pub fn components_from_partition(partition: &mut Partition, num_forward: usize) -> BTreeMap<usize, Component> {
    let mut components: BTreeMap<usize, Component> = BTreeMap::new();

    let pairs: Vec<(usize, usize)> = partition.aligned_pairs().iter().cloned().collect();
    let rc = |x: usize| if x < num_forward { x + num_forward } else { x - num_forward };

    let union_find = partition.union_find_mut();
    for (a, b) in pairs {
        let rc_a = rc(a);
        let rc_b = rc(b);

        // both strand families key under the same representative
        let rep = union_find.find(a).min(union_find.find(rc_a));
        let component = components.entry(rep).or_insert_with(|| Component::new(rep));
        component.aligned_pairs.insert((a, b));
        component.aligned_pairs.insert((b, a));
        component.aligned_pairs.insert((rc_a, rc_b));
        component.aligned_pairs.insert((rc_b, rc_a));
    }
    info!("There are {} components", components.len());

    // contigs that aligned to nothing become singleton components
    let mut num_singletons = 0;
    for i in 0..num_forward {
        if union_find.find(i) == i && !components.contains_key(&i) {
            components.insert(i, Component::new(i));
            num_singletons += 1;
        }
    }
    info!("Added {} singletons to components", num_singletons);

    components
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rc_twin_propagation() {
        // accepting pair (5, 9) with N = 100 also places (105, 109) in the component
        let mut partition = Partition::empty(200);
        partition.add_pair(5, 9, 100);

        let components = components_from_partition(&mut partition, 100);
        let component = components.get(&5).unwrap();
        assert!(component.aligned_pairs().contains(&(5, 9)));
        assert!(component.aligned_pairs().contains(&(9, 5)));
        assert!(component.aligned_pairs().contains(&(105, 109)));
        assert!(component.aligned_pairs().contains(&(109, 105)));

        // the 98 remaining forward contigs are singletons
        assert_eq!(components.len(), 99);
        assert_eq!(components.get(&7).unwrap().align_order(), vec![7]);
    }

    #[test]
    fn test_align_order_stays_on_one_strand_family() {
        let mut partition = Partition::empty(4);
        partition.add_pair(0, 1, 2);

        let components = components_from_partition(&mut partition, 2);
        let component = components.values().next().unwrap();

        // the walk starts at the overall smallest member and never crosses into the
        // reverse-complement family, because no pair bridges the two
        assert_eq!(component.align_order(), vec![0, 1]);
    }

    #[test]
    fn test_align_order_breadth_first() {
        let mut partition = Partition::empty(8);
        partition.add_pair(1, 2, 4);
        partition.add_pair(2, 3, 4);
        partition.add_pair(1, 0, 4);

        let components = components_from_partition(&mut partition, 4);
        assert_eq!(components.len(), 1);
        let component = components.values().next().unwrap();

        // first pair in sorted order is (0, 1); neighbors come out level by level
        assert_eq!(component.align_order(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_separate_components() {
        let mut partition = Partition::empty(8);
        partition.add_pair(0, 1, 4);
        partition.add_pair(2, 3, 4);

        let components = components_from_partition(&mut partition, 4);
        assert_eq!(components.len(), 2);
        let orders: Vec<Vec<usize>> = components.values().map(|c| c.align_order()).collect();
        assert_eq!(orders, vec![vec![0, 1], vec![2, 3]]);
    }
}
