
/*!
The growing sequence graph a component is merged into.

Vertices are dense identifiers into an append-only label vector, with adjacency kept per
vertex; splits never invalidate identifiers and nothing is ever deleted, since a graph
lives only for the duration of one component merge. The concatenated labels along any
source-to-sink walk form one candidate supercontig.
*/

use std::collections::BTreeMap;

/// One source-to-sink walk: the concatenated label sequence and a monotonic map from the
/// cumulative length after each vertex to that vertex, used to translate alignment
/// coordinates back into graph vertices.
#[derive(Clone, Debug, Default)]
pub struct GraphPath {
    /// Concatenation of the vertex labels along the walk
    pub seq: Vec<u8>,
    /// Maps the cumulative end offset of every visited vertex to its identifier
    pub position_map: BTreeMap<usize, usize>
}

impl GraphPath {
    /// The vertex covering `position` and that vertex's end offset in the path, i.e. the
    /// entry with the smallest end offset >= `position`.
    pub fn vertex_at(&self, position: usize) -> (usize, usize) {
        let (&end, &vertex) = self.position_map.range(position..).next()
            .expect("position beyond the end of the path");
        (vertex, end)
    }

    /// Like `vertex_at` but with a strict bound: the smallest end offset > `position`.
    pub fn vertex_after(&self, position: usize) -> (usize, usize) {
        let (&end, &vertex) = self.position_map.range(position + 1..).next()
            .expect("position beyond the end of the path");
        (vertex, end)
    }
}

/// Directed acyclic graph of labelled vertices with explicitly tracked sources.
#[derive(Debug, Default)]
pub struct SequenceGraph {
    /// Vertex labels, indexed by vertex identifier; labels are non-empty
    labels: Vec<Vec<u8>>,
    /// Outgoing edges per vertex
    out_edges: Vec<Vec<usize>>,
    /// Vertices with no incoming edges
    sources: Vec<usize>
}

impl SequenceGraph {
    /// Creates a graph holding a single source vertex with the given label.
    /// # Arguments
    /// * `seq` - the label of the seed vertex
    pub fn with_seed(seq: Vec<u8>) -> SequenceGraph {
        let mut graph = SequenceGraph::default();
        let v = graph.add_vertex(seq);
        graph.sources.push(v);
        graph
    }

    /// Appends a new vertex carrying `seq` and returns its identifier. Adds no edges and
    /// does not touch the source list.
    pub fn add_vertex(&mut self, seq: Vec<u8>) -> usize {
        let v = self.labels.len();
        self.labels.push(seq);
        self.out_edges.push(vec![]);
        v
    }

    /// Adds the edge `from -> to`.
    pub fn add_edge(&mut self, from: usize, to: usize) {
        self.out_edges[from].push(to);
    }

    /// Registers a vertex as a source (a new leftmost branch).
    pub fn add_source(&mut self, v: usize) {
        self.sources.push(v);
    }

    /// Splits vertex `u` after `split_at` label positions: `u` keeps the prefix, a new
    /// vertex takes the suffix and inherits all outgoing edges of `u`, and the edge
    /// `u -> v` stitches the halves back together. Returns the suffix vertex.
    /// Concatenations along any path through `u` are unchanged.
    pub fn split_vertex(&mut self, u: usize, split_at: usize) -> usize {
        assert!(split_at > 0 && split_at < self.labels[u].len());

        let suffix = self.labels[u].split_off(split_at);
        let v = self.add_vertex(suffix);
        self.out_edges.swap(u, v);
        self.add_edge(u, v);
        v
    }

    /// Enumerates source-to-sink paths depth-first. Enumeration stops early once `limit`
    /// paths have been collected, which keeps the path-cap check from walking an
    /// exponential graph to completion.
    /// # Arguments
    /// * `limit` - stop after this many paths; `None` walks everything
    pub fn enumerate_paths(&self, limit: Option<usize>) -> Vec<GraphPath> {
        let mut paths = vec![];
        for &source in self.sources.iter() {
            self.paths_from(source, GraphPath::default(), &mut paths, limit);
        }
        paths
    }

    fn paths_from(&self, v: usize, mut prefix: GraphPath, paths: &mut Vec<GraphPath>, limit: Option<usize>) {
        if limit.map_or(false, |l| paths.len() >= l) {
            return;
        }

        prefix.seq.extend_from_slice(&self.labels[v]);
        prefix.position_map.insert(prefix.seq.len(), v);

        if self.out_edges[v].is_empty() {
            paths.push(prefix);
            return;
        }
        for &target in self.out_edges[v].iter() {
            self.paths_from(target, prefix.clone(), paths, limit);
        }
    }

    /// The label of a vertex.
    pub fn label(&self, v: usize) -> &[u8] {
        &self.labels[v]
    }

    /// Mutable access to a vertex label, for extending it at a flank.
    pub fn label_mut(&mut self, v: usize) -> &mut Vec<u8> {
        &mut self.labels[v]
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.labels.len()
    }

    /// Out-degree of a vertex.
    pub fn out_degree(&self, v: usize) -> usize {
        self.out_edges[v].len()
    }

    // getters
    pub fn sources(&self) -> &[usize] {
        &self.sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use itertools::Itertools;

    fn path_seqs(graph: &SequenceGraph) -> Vec<Vec<u8>> {
        graph.enumerate_paths(None).into_iter().map(|p| p.seq).collect()
    }

    #[test]
    fn test_single_vertex_roundtrip() {
        let graph = SequenceGraph::with_seed(b"ACGTACGT".to_vec());
        let paths = graph.enumerate_paths(None);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].seq, b"ACGTACGT");
        assert_eq!(paths[0].position_map, BTreeMap::from([(8, 0)]));
    }

    #[test]
    fn test_split_preserves_path_sequences() {
        let mut graph = SequenceGraph::with_seed(b"AAAACCCC".to_vec());
        let v = graph.split_vertex(0, 4);

        assert_eq!(graph.label(0), b"AAAA");
        assert_eq!(graph.label(v), b"CCCC");
        assert_eq!(graph.out_degree(0), 1);
        assert_eq!(path_seqs(&graph), vec![b"AAAACCCC".to_vec()]);
    }

    #[test]
    fn test_split_moves_out_edges() {
        let mut graph = SequenceGraph::with_seed(b"AAAA".to_vec());
        let tail1 = graph.add_vertex(b"GG".to_vec());
        let tail2 = graph.add_vertex(b"TT".to_vec());
        graph.add_edge(0, tail1);
        graph.add_edge(0, tail2);

        let v = graph.split_vertex(0, 2);

        // the new vertex inherits both tails, the old one only points at the new vertex
        assert_eq!(graph.out_degree(v), 2);
        assert_eq!(graph.out_degree(0), 1);
        assert_eq!(path_seqs(&graph), vec![b"AAAAGG".to_vec(), b"AAAATT".to_vec()]);
    }

    #[test]
    fn test_position_map_is_monotonic() {
        let mut graph = SequenceGraph::with_seed(b"AAAA".to_vec());
        let v = graph.split_vertex(0, 2);
        let w = graph.add_vertex(b"GGG".to_vec());
        graph.add_edge(v, w);

        for path in graph.enumerate_paths(None) {
            assert!(path.position_map.keys().tuple_windows().all(|(a, b)| a < b));
            assert_eq!(*path.position_map.keys().last().unwrap(), path.seq.len());
        }
    }

    #[test]
    fn test_multiple_sources() {
        let mut graph = SequenceGraph::with_seed(b"CCCC".to_vec());
        let branch = graph.add_vertex(b"TTTT".to_vec());
        graph.add_source(branch);
        graph.add_edge(branch, 0);

        let seqs = path_seqs(&graph);
        assert_eq!(seqs, vec![b"CCCC".to_vec(), b"TTTTCCCC".to_vec()]);
    }

    #[test]
    fn test_enumeration_limit() {
        // five binary splits in a row give 2^5 paths
        let mut graph = SequenceGraph::with_seed(b"AAAA".to_vec());
        let mut tail = 0;
        for _ in 0..5 {
            let left = graph.add_vertex(b"CC".to_vec());
            let right = graph.add_vertex(b"GG".to_vec());
            let join = graph.add_vertex(b"AA".to_vec());
            graph.add_edge(tail, left);
            graph.add_edge(tail, right);
            graph.add_edge(left, join);
            graph.add_edge(right, join);
            tail = join;
        }

        assert_eq!(graph.enumerate_paths(None).len(), 32);
        assert_eq!(graph.enumerate_paths(Some(31)).len(), 31);
    }

    #[test]
    fn test_vertex_lookup() {
        let mut graph = SequenceGraph::with_seed(b"AAAACCCC".to_vec());
        graph.split_vertex(0, 4);
        let path = &graph.enumerate_paths(None)[0];

        // inclusive lookup lands on the vertex ending at or after the position
        assert_eq!(path.vertex_at(4), (0, 4));
        assert_eq!(path.vertex_at(5), (1, 8));
        // the strict variant skips a boundary
        assert_eq!(path.vertex_after(4), (1, 8));
        assert_eq!(path.vertex_after(0), (0, 4));
    }
}
