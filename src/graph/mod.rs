//! Directed graph with deterministic cycle discovery

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Adjacency-list graph over ordered vertices
///
/// Vertices and edges iterate in sorted order, so every query (cycles
/// included) returns the same answer for the same input.
#[derive(Debug, Clone)]
pub struct DirectedGraph<N: Ord + Clone> {
    successors: BTreeMap<N, BTreeSet<N>>,
    predecessors: BTreeMap<N, BTreeSet<N>>,
}

impl<N: Ord + Clone> Default for DirectedGraph<N> {
    fn default() -> Self {
        Self {
            successors: BTreeMap::new(),
            predecessors: BTreeMap::new(),
        }
    }
}

impl<N: Ord + Clone + std::hash::Hash> DirectedGraph<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, vertex: N) {
        self.successors.entry(vertex.clone()).or_default();
        self.predecessors.entry(vertex).or_default();
    }

    /// Add an edge, creating missing vertices
    pub fn add_edge(&mut self, from: N, to: N) {
        self.add_vertex(from.clone());
        self.add_vertex(to.clone());
        self.successors
            .entry(from.clone())
            .or_default()
            .insert(to.clone());
        self.predecessors.entry(to).or_default().insert(from);
    }

    pub fn contains(&self, vertex: &N) -> bool {
        self.successors.contains_key(vertex)
    }

    pub fn vertices(&self) -> impl Iterator<Item = &N> {
        self.successors.keys()
    }

    pub fn vertex_count(&self) -> usize {
        self.successors.len()
    }

    pub fn successors(&self, vertex: &N) -> impl Iterator<Item = &N> {
        self.successors.get(vertex).into_iter().flatten()
    }

    pub fn predecessors(&self, vertex: &N) -> impl Iterator<Item = &N> {
        self.predecessors.get(vertex).into_iter().flatten()
    }

    /// One closed loop per strongly connected component that contains a cycle.
    ///
    /// Each trace starts and ends at the smallest vertex of its component.
    /// Traces are ordered by that vertex.
    pub fn find_cycles(&self) -> Vec<Vec<N>> {
        let mut graph: DiGraph<N, ()> = DiGraph::new();
        let mut indices: HashMap<&N, NodeIndex> = HashMap::new();
        for vertex in self.vertices() {
            indices.insert(vertex, graph.add_node(vertex.clone()));
        }
        for (from, targets) in &self.successors {
            for to in targets {
                if let (Some(&a), Some(&b)) = (indices.get(from), indices.get(to)) {
                    graph.add_edge(a, b, ());
                }
            }
        }

        let mut cycles: Vec<Vec<N>> = tarjan_scc(&graph)
            .into_iter()
            .filter_map(|component| {
                let members: HashSet<&N> = component.iter().map(|index| &graph[*index]).collect();
                let start = members.iter().min().copied()?;
                self.cycle_within(start, &members)
            })
            .collect();

        cycles.sort();
        cycles
    }

    pub fn has_cycles(&self) -> bool {
        !self.find_cycles().is_empty()
    }

    /// First loop from `start` back to itself, staying inside `members`
    fn cycle_within(&self, start: &N, members: &HashSet<&N>) -> Option<Vec<N>> {
        let mut path = vec![start.clone()];
        let mut visited = HashSet::new();
        visited.insert(start.clone());
        if self.extend_cycle(start, start, members, &mut path, &mut visited) {
            Some(path)
        } else {
            None
        }
    }

    fn extend_cycle(
        &self,
        start: &N,
        current: &N,
        members: &HashSet<&N>,
        path: &mut Vec<N>,
        visited: &mut HashSet<N>,
    ) -> bool {
        for next in self.successors(current) {
            if next == start {
                path.push(start.clone());
                return true;
            }
            if !members.contains(next) || !visited.insert(next.clone()) {
                continue;
            }
            path.push(next.clone());
            if self.extend_cycle(start, next, members, path, visited) {
                return true;
            }
            path.pop();
        }
        false
    }
}

/// `a -> b -> a` rendering of a cycle trace
pub fn format_trace<N: std::fmt::Display>(trace: &[N]) -> String {
    trace
        .iter()
        .map(|vertex| vertex.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
