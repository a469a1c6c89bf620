use std::collections::{BTreeMap, BTreeSet};

/// Undirected graph without self loops or parallel edges.
#[derive(Debug, Clone)]
pub struct UndirectedGraph<T>
where
    T: Eq + Ord + Copy,
{
    edges: BTreeMap<T, BTreeSet<T>>,
}

impl<T> Default for UndirectedGraph<T>
where
    T: Eq + Ord + Copy,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> UndirectedGraph<T>
where
    T: Eq + Ord + Copy,
{
    pub fn new() -> Self {
        Self {
            edges: BTreeMap::new(),
        }
    }

    /// Add an edge. Returns false if it was a self loop or already present.
    pub fn add_edge(&mut self, a: T, b: T) -> bool {
        if a == b || self.has_edge(a, b) {
            return false;
        }
        self.edges.entry(a).or_default().insert(b);
        self.edges.entry(b).or_default().insert(a);
        true
    }

    pub fn has_edge(&self, a: T, b: T) -> bool {
        self.edges.get(&a).is_some_and(|set| set.contains(&b))
    }

    /// Number of vertices with at least one edge.
    pub fn order(&self) -> usize {
        self.edges.len()
    }

    /// Number of edges.
    pub fn size(&self) -> usize {
        self.edges.values().map(|set| set.len()).sum::<usize>() / 2
    }

    pub fn degree(&self, node: T) -> usize {
        self.edges.get(&node).map_or(0, |set| set.len())
    }

    pub fn neighbors_iter(&self, node: T) -> impl Iterator<Item = &T> {
        self.edges.get(&node).into_iter().flat_map(|set| set.iter())
    }

    /// Iterate every edge once, as `(smaller, larger)`.
    pub fn edges_iter(&self) -> impl Iterator<Item = (T, T)> + '_ {
        self.edges.iter().flat_map(|(a, set)| {
            set.iter()
                .filter(move |b| a < *b)
                .map(move |b| (*a, *b))
        })
    }
}
