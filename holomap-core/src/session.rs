use crate::builder::BuildError;
use crate::graph::{Graph, NodeKind};
use holomap_client::EntityKind;
use serde::Serialize;
use tracing::debug;

/// Lifecycle of the graph for the current selection.
///
/// `Idle` and `Failed` both render as "no diagram". Leaving `Ready` or
/// `Failed` is only possible through a new selection.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphState {
    Idle,
    Loading { root_id: u32 },
    Ready(Graph),
    Failed { root_id: u32, message: String },
}

impl GraphState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GraphState::Idle => "idle",
            GraphState::Loading { .. } => "loading",
            GraphState::Ready(_) => "ready",
            GraphState::Failed { .. } => "failed",
        }
    }
}

/// Identifies one build request; handed back with its result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildTicket {
    root_id: u32,
    generation: u64,
}

impl BuildTicket {
    pub fn root_id(&self) -> u32 {
        self.root_id
    }
}

/// Inspection data for a hovered related node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub node_id: String,
    pub kind: EntityKind,
    pub title: String,
    pub fields: Vec<(String, String)>,
    pub x: u16,
    pub y: u16,
}

pub struct GraphSession {
    selected: Option<u32>,
    generation: u64,
    state: GraphState,
    hover: Option<Tooltip>,
}

impl Default for GraphSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphSession {
    pub fn new() -> Self {
        Self {
            selected: None,
            generation: 0,
            state: GraphState::Idle,
            hover: None,
        }
    }

    pub fn selected(&self) -> Option<u32> {
        self.selected
    }

    pub fn state(&self) -> &GraphState {
        &self.state
    }

    pub fn graph(&self) -> Option<&Graph> {
        match &self.state {
            GraphState::Ready(graph) => Some(graph),
            _ => None,
        }
    }

    pub fn is_displayable(&self) -> bool {
        matches!(self.state, GraphState::Ready(_))
    }

    /// Change the live selection. The previous graph is discarded.
    ///
    /// Returns a ticket for the build the caller must start, or `None` when
    /// the selection was cleared.
    pub fn select(&mut self, root_id: Option<u32>) -> Option<BuildTicket> {
        self.hover = None;
        self.selected = root_id;
        self.generation += 1;
        match root_id {
            Some(root_id) => {
                self.state = GraphState::Loading { root_id };
                Some(BuildTicket {
                    root_id,
                    generation: self.generation,
                })
            }
            None => {
                self.state = GraphState::Idle;
                None
            }
        }
    }

    /// Publish a finished build.
    ///
    /// Only the ticket of the latest selection is honoured, and only once.
    /// Re-selecting the same person supersedes the earlier build.
    /// Returns whether the result was applied.
    pub fn complete(&mut self, ticket: BuildTicket, result: Result<Graph, BuildError>) -> bool {
        let loading = matches!(self.state, GraphState::Loading { .. });
        if !loading
            || ticket.generation != self.generation
            || self.selected != Some(ticket.root_id)
        {
            debug!(
                "Discarding stale graph for person {} (selected: {:?})",
                ticket.root_id, self.selected
            );
            return false;
        }

        self.hover = None;
        self.state = match result {
            Ok(graph) if graph.root_id() == ticket.root_id => GraphState::Ready(graph),
            Ok(graph) => GraphState::Failed {
                root_id: ticket.root_id,
                message: format!("Build returned graph for person {}", graph.root_id()),
            },
            Err(e) => GraphState::Failed {
                root_id: ticket.root_id,
                message: e.to_string(),
            },
        };
        true
    }

    /// Inspect a related node of the ready graph at a pointer position.
    ///
    /// Hovering the root, an unknown node, or a graph that is not ready
    /// clears the tooltip.
    pub fn hover(&mut self, node_id: &str, x: u16, y: u16) -> Option<&Tooltip> {
        self.hover = self
            .graph()
            .and_then(|graph| graph.node(node_id))
            .filter(|node| node.kind != NodeKind::Root)
            .map(|node| Tooltip {
                node_id: node.id.clone(),
                kind: node.entity.kind(),
                title: node.label().to_string(),
                fields: node
                    .entity
                    .fields()
                    .into_iter()
                    .map(|(name, value)| (name.to_string(), value))
                    .collect(),
                x,
                y,
            });
        self.hover.as_ref()
    }

    pub fn clear_hover(&mut self) {
        self.hover = None;
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.hover.as_ref()
    }
}
