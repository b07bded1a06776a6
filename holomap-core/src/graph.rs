use holomap_client::Entity;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Role a node plays in a relationship graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Root,
    Film,
    Starship,
    Vehicle,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Film => "film",
            NodeKind::Starship => "starship",
            NodeKind::Vehicle => "vehicle",
        }
    }

    /// Layout position for the entry at `index` of this kind's id list
    pub fn position(&self, index: usize) -> Position {
        let i = index as f64;
        match self {
            NodeKind::Root => Position { x: 0.0, y: 0.0 },
            NodeKind::Film => Position { x: 200.0 * (i + 0.5), y: 200.0 },
            NodeKind::Starship => Position { x: 200.0 * (i + 1.0), y: 430.0 },
            NodeKind::Vehicle => Position { x: 300.0 * (i + 1.0), y: 660.0 },
        }
    }

    pub fn node_id(&self, entity_id: u32) -> String {
        format!("{}-{}", self.as_str(), entity_id)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub position: Position,
    pub entity: Entity,
}

impl Node {
    pub fn label(&self) -> &str {
        self.entity.label()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl Edge {
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            id: format!("edge-{}-{}", source, target),
            source: source.to_string(),
            target: target.to_string(),
        }
    }
}

/// A person and the entities it references, laid out for display.
///
/// Nodes are ordered root first, then films, starships and vehicles, each
/// in the order the root listed them. Graphs are rebuilt, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    root_id: u32,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Graph {
    /// Start a graph holding only the root node
    pub fn with_root(root: Entity) -> Self {
        let root_id = root.id();
        let node = Node {
            id: NodeKind::Root.node_id(root_id),
            kind: NodeKind::Root,
            position: NodeKind::Root.position(0),
            entity: root,
        };
        Self {
            root_id,
            nodes: vec![node],
            edges: Vec::new(),
        }
    }

    /// Add a related node and its root edge.
    ///
    /// Returns false (and changes nothing) when a node with the same id is
    /// already present.
    pub fn add_related(&mut self, kind: NodeKind, index: usize, entity: Entity) -> bool {
        if kind == NodeKind::Root {
            return false;
        }

        let id = kind.node_id(entity.id());
        if self.node(&id).is_some() {
            return false;
        }

        let edge = Edge::new(&self.root_node_id(), &id);
        self.nodes.push(Node {
            id,
            kind,
            position: kind.position(index),
            entity,
        });
        self.edges.push(edge);
        true
    }

    pub fn root_id(&self) -> u32 {
        self.root_id
    }

    pub fn root_node_id(&self) -> String {
        NodeKind::Root.node_id(self.root_id)
    }

    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Related nodes of one kind, in layout order
    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }

    /// Every edge endpoint exists and every edge leaves the root
    pub fn is_consistent(&self) -> bool {
        let root = self.root_node_id();
        let roots = self.nodes_of_kind(NodeKind::Root).count();
        roots == 1
            && self.edges.iter().all(|e| {
                e.source == root && self.node(&e.source).is_some() && self.node(&e.target).is_some()
            })
    }

    /// Directed petgraph view with node ids as weights
    pub fn to_petgraph(&self) -> DiGraph<String, ()> {
        let mut graph = DiGraph::new();
        let mut indices: HashMap<&str, NodeIndex> = HashMap::new();

        for node in &self.nodes {
            let idx = graph.add_node(node.id.clone());
            indices.insert(node.id.as_str(), idx);
        }

        for edge in &self.edges {
            if let (Some(&source), Some(&target)) = (
                indices.get(edge.source.as_str()),
                indices.get(edge.target.as_str()),
            ) {
                graph.add_edge(source, target, ());
            }
        }

        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use holomap_client::{Film, Person};

    fn luke() -> Entity {
        Entity::Person(Person {
            id: 1,
            name: "Luke Skywalker".to_string(),
            ..Default::default()
        })
    }

    fn film(id: u32) -> Entity {
        Entity::Film(Film {
            id,
            title: format!("Film {}", id),
            ..Default::default()
        })
    }

    #[test]
    fn test_layout_formula() {
        assert_eq!(NodeKind::Film.position(0), Position { x: 100.0, y: 200.0 });
        assert_eq!(NodeKind::Film.position(2), Position { x: 500.0, y: 200.0 });
        assert_eq!(NodeKind::Starship.position(1), Position { x: 400.0, y: 430.0 });
        assert_eq!(NodeKind::Vehicle.position(0), Position { x: 300.0, y: 660.0 });
    }

    #[test]
    fn test_edge_ids_are_derived() {
        let edge = Edge::new("root-1", "film-2");
        assert_eq!(edge.id, "edge-root-1-film-2");
    }

    #[test]
    fn test_duplicate_related_node_is_ignored() {
        let mut graph = Graph::with_root(luke());
        assert!(graph.add_related(NodeKind::Film, 0, film(1)));
        assert!(!graph.add_related(NodeKind::Film, 1, film(1)));

        assert_eq!(graph.nodes().len(), 2);
        assert_eq!(graph.edges().len(), 1);
        assert_eq!(graph.node("film-1").unwrap().position.x, 100.0);
    }

    #[test]
    fn test_root_cannot_be_added_twice() {
        let mut graph = Graph::with_root(luke());
        assert!(!graph.add_related(NodeKind::Root, 0, luke()));
        assert_eq!(graph.nodes_of_kind(NodeKind::Root).count(), 1);
    }

    #[test]
    fn test_petgraph_view_matches() {
        let mut graph = Graph::with_root(luke());
        graph.add_related(NodeKind::Film, 0, film(1));
        graph.add_related(NodeKind::Film, 1, film(2));

        let pg = graph.to_petgraph();
        assert_eq!(pg.node_count(), 3);
        assert_eq!(pg.edge_count(), 2);
        assert!(graph.is_consistent());
    }
}
