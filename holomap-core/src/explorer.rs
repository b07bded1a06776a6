use crate::browser::CatalogBrowser;
use crate::builder::{BuildError, GraphBuilder};
use crate::graph::Graph;
use crate::session::{BuildTicket, GraphSession, Tooltip};
use holomap_client::CatalogService;
use std::sync::Arc;

/// Catalog browser wired to the graph builder.
///
/// Selecting a person in the catalog starts a graph build; the result is
/// published through the session's staleness guard.
pub struct Explorer<S> {
    browser: CatalogBrowser,
    session: GraphSession,
    builder: GraphBuilder<S>,
}

impl<S: CatalogService> Explorer<S> {
    pub fn new(service: Arc<S>, page_size: usize) -> Self {
        Self {
            browser: CatalogBrowser::new(page_size),
            session: GraphSession::new(),
            builder: GraphBuilder::new(service),
        }
    }

    pub fn browser(&self) -> &CatalogBrowser {
        &self.browser
    }

    pub fn browser_mut(&mut self) -> &mut CatalogBrowser {
        &mut self.browser
    }

    pub fn session(&self) -> &GraphSession {
        &self.session
    }

    pub fn builder(&self) -> &GraphBuilder<S> {
        &self.builder
    }

    pub fn graph(&self) -> Option<&Graph> {
        self.session.graph()
    }

    pub async fn load_next_page(&mut self) -> usize {
        let service = self.builder.service().clone();
        self.browser.load_next_page(service.as_ref()).await
    }

    /// Record a selection and hand out the build ticket, without building.
    /// Used by callers that run the build on their own task.
    pub fn begin_selection(&mut self, id: Option<u32>) -> Option<BuildTicket> {
        self.browser.select_entity(id);
        self.session.select(id)
    }

    pub fn finish_build(&mut self, ticket: BuildTicket, result: Result<Graph, BuildError>) -> bool {
        self.session.complete(ticket, result)
    }

    /// Select a person and build its graph. `None` clears the graph.
    pub async fn select_entity(&mut self, id: Option<u32>) -> bool {
        let Some(ticket) = self.begin_selection(id) else {
            return false;
        };
        let result = self.builder.build_graph(ticket.root_id()).await;
        self.finish_build(ticket, result)
    }

    pub fn hover(&mut self, node_id: &str, x: u16, y: u16) -> Option<&Tooltip> {
        self.session.hover(node_id, x, y)
    }

    pub fn clear_hover(&mut self) {
        self.session.clear_hover();
    }
}
