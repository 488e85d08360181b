//! Provenance tracking: directed "derived-from" edges between entities
//!
//! Edges point forward in time, from the entity material came from to the
//! entity it went into. Transfers never create cycles in practice, but the
//! graph does not forbid them, so every traversal keeps a visited set.

use crate::{PartId, PlateId, SampleId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;

/// Anything lineage can be recorded for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum EntityRef {
    /// A whole container
    Plate(PlateId),
    /// A physical sample instance in one slot
    Part(PartId),
    /// An abstract sample
    Sample(SampleId),
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::Plate(id) => write!(f, "plate:{}", id),
            EntityRef::Part(id) => write!(f, "part:{}", id),
            EntityRef::Sample(id) => write!(f, "sample:{}", id),
        }
    }
}

impl From<PlateId> for EntityRef {
    fn from(id: PlateId) -> Self {
        EntityRef::Plate(id)
    }
}

impl From<PartId> for EntityRef {
    fn from(id: PartId) -> Self {
        EntityRef::Part(id)
    }
}

impl From<SampleId> for EntityRef {
    fn from(id: SampleId) -> Self {
        EntityRef::Sample(id)
    }
}

/// Level at which an edge was recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Container to container (plate transfer or relabel)
    Container,
    /// Part to part (one well to one well)
    Part,
}

/// A single derived-from edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProvenanceEdge {
    /// Where the material came from
    pub from: EntityRef,
    /// Where the material went
    pub to: EntityRef,
    /// Container or part level
    pub kind: EdgeKind,
}

impl ProvenanceEdge {
    /// Create a new edge
    pub fn new(from: EntityRef, to: EntityRef, kind: EdgeKind) -> Self {
        Self { from, to, kind }
    }
}

/// Directed, many-to-many lineage graph
///
/// # Examples
///
/// ```
/// use plateflow_domain::{EdgeKind, EntityRef, PartId, ProvenanceGraph};
///
/// let stock = EntityRef::Part(PartId::from_value(1));
/// let working = EntityRef::Part(PartId::from_value(2));
///
/// let mut graph = ProvenanceGraph::new();
/// assert!(graph.add_edge(stock, working, EdgeKind::Part));
/// assert!(!graph.add_edge(stock, working, EdgeKind::Part)); // idempotent
/// assert_eq!(graph.direct_sources(working), vec![stock]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProvenanceGraph {
    edges: Vec<ProvenanceEdge>,
    seen: HashSet<ProvenanceEdge>,
    incoming: HashMap<EntityRef, Vec<EntityRef>>,
    outgoing: HashMap<EntityRef, Vec<EntityRef>>,
}

impl ProvenanceGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an edge; returns `false` if the identical edge already existed
    pub fn add_edge(&mut self, from: EntityRef, to: EntityRef, kind: EdgeKind) -> bool {
        let edge = ProvenanceEdge::new(from, to, kind);
        if !self.seen.insert(edge) {
            return false;
        }
        self.edges.push(edge);

        // Same pair under a different kind is a separate edge but not a separate neighbour
        let sources = self.incoming.entry(to).or_default();
        if !sources.contains(&from) {
            sources.push(from);
        }
        let targets = self.outgoing.entry(from).or_default();
        if !targets.contains(&to) {
            targets.push(to);
        }
        true
    }

    /// All edges in insertion order
    pub fn edges(&self) -> &[ProvenanceEdge] {
        &self.edges
    }

    /// Number of distinct edges
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether no edges were recorded
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Edges of one kind, insertion order
    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &ProvenanceEdge> + '_ {
        self.edges.iter().filter(move |edge| edge.kind == kind)
    }

    /// Immediate predecessors, in the order they were first linked
    pub fn direct_sources(&self, entity: EntityRef) -> Vec<EntityRef> {
        self.incoming.get(&entity).cloned().unwrap_or_default()
    }

    /// Immediate successors, in the order they were first linked
    pub fn direct_derivatives(&self, entity: EntityRef) -> Vec<EntityRef> {
        self.outgoing.get(&entity).cloned().unwrap_or_default()
    }

    /// Everything `entity` was transitively derived from
    pub fn ancestors(&self, entity: EntityRef) -> BTreeSet<EntityRef> {
        Self::closure(&self.incoming, entity)
    }

    /// Everything transitively derived from `entity`
    pub fn descendants(&self, entity: EntityRef) -> BTreeSet<EntityRef> {
        Self::closure(&self.outgoing, entity)
    }

    fn closure(
        adjacency: &HashMap<EntityRef, Vec<EntityRef>>,
        start: EntityRef,
    ) -> BTreeSet<EntityRef> {
        let mut visited = BTreeSet::new();
        let mut queue = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            for next in adjacency.get(&current).into_iter().flatten() {
                if visited.insert(*next) {
                    queue.push_back(*next);
                }
            }
        }

        // A cycle can lead back to the start; it is not its own ancestor
        visited.remove(&start);
        visited
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(n: u128) -> EntityRef {
        EntityRef::Part(PartId::from_value(n))
    }

    #[test]
    fn test_add_edge_is_idempotent() {
        let mut graph = ProvenanceGraph::new();
        assert!(graph.add_edge(part(1), part(2), EdgeKind::Part));
        assert!(!graph.add_edge(part(1), part(2), EdgeKind::Part));
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.direct_sources(part(2)), vec![part(1)]);
    }

    #[test]
    fn test_same_pair_different_kind() {
        let mut graph = ProvenanceGraph::new();
        graph.add_edge(part(1), part(2), EdgeKind::Part);
        graph.add_edge(part(1), part(2), EdgeKind::Container);
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.direct_sources(part(2)), vec![part(1)]);
    }

    #[test]
    fn test_many_to_many() {
        let mut graph = ProvenanceGraph::new();
        graph.add_edge(part(1), part(3), EdgeKind::Part);
        graph.add_edge(part(2), part(3), EdgeKind::Part);
        graph.add_edge(part(1), part(4), EdgeKind::Part);

        assert_eq!(graph.direct_sources(part(3)), vec![part(1), part(2)]);
        assert_eq!(graph.direct_derivatives(part(1)), vec![part(3), part(4)]);
        assert!(graph.direct_sources(part(1)).is_empty());
    }

    #[test]
    fn test_ancestors_transitive() {
        let mut graph = ProvenanceGraph::new();
        graph.add_edge(part(1), part(2), EdgeKind::Part);
        graph.add_edge(part(2), part(3), EdgeKind::Part);
        graph.add_edge(part(9), part(2), EdgeKind::Part);

        let ancestors = graph.ancestors(part(3));
        assert_eq!(ancestors, BTreeSet::from([part(1), part(2), part(9)]));
        assert_eq!(graph.descendants(part(9)), BTreeSet::from([part(2), part(3)]));
    }

    #[test]
    fn test_ancestors_terminate_on_cycle() {
        let mut graph = ProvenanceGraph::new();
        graph.add_edge(part(1), part(2), EdgeKind::Part);
        graph.add_edge(part(2), part(3), EdgeKind::Part);
        graph.add_edge(part(3), part(1), EdgeKind::Part);

        let ancestors = graph.ancestors(part(1));
        assert_eq!(ancestors, BTreeSet::from([part(2), part(3)]));
    }

    #[test]
    fn test_edges_of_kind() {
        let mut graph = ProvenanceGraph::new();
        let a = EntityRef::Plate(PlateId::from_value(1));
        let b = EntityRef::Plate(PlateId::from_value(2));
        graph.add_edge(a, b, EdgeKind::Container);
        graph.add_edge(part(1), part(2), EdgeKind::Part);
        assert_eq!(graph.edges_of_kind(EdgeKind::Container).count(), 1);
        assert_eq!(graph.edges_of_kind(EdgeKind::Part).count(), 1);
    }
}
