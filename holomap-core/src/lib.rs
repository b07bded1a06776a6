pub mod browser;
pub mod builder;
pub mod explorer;
pub mod graph;
pub mod report;
pub mod session;

pub use browser::{CatalogBrowser, CatalogState, PageRequest};
pub use builder::{BuildError, GraphBuilder};
pub use explorer::Explorer;
pub use graph::{Edge, Graph, Node, NodeKind, Position};
pub use session::{BuildTicket, GraphSession, GraphState, Tooltip};
