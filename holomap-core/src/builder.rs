use crate::graph::{Graph, NodeKind};
use futures::future::join_all;
use holomap_client::{CatalogService, Entity, EntityKind, FetchError};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Failed to fetch person {id}: {source}")]
    Root { id: u32, source: FetchError },
}

impl BuildError {
    pub fn root_id(&self) -> u32 {
        match self {
            BuildError::Root { id, .. } => *id,
        }
    }
}

/// Assembles relationship graphs from the catalog service
pub struct GraphBuilder<S> {
    service: Arc<S>,
}

impl<S> Clone for GraphBuilder<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

impl<S: CatalogService> GraphBuilder<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &Arc<S> {
        &self.service
    }

    /// Fetch a person and everything it references, and lay it out.
    ///
    /// Only the person fetch can fail the build. Related entities that
    /// cannot be resolved are left out of the graph.
    pub async fn build_graph(&self, root_id: u32) -> Result<Graph, BuildError> {
        info!("Building graph for person {}", root_id);

        let person = match self.service.get_person(root_id).await {
            Ok(person) => person,
            Err(source) => {
                warn!("Graph build for person {} failed: {}", root_id, source);
                return Err(BuildError::Root { id: root_id, source });
            }
        };

        let service = self.service.as_ref();
        let (films, starships, vehicles) = futures::join!(
            resolve_all(
                EntityKind::Film,
                &person.films,
                person.films.iter().map(|&id| service.get_film(id)).collect(),
            ),
            resolve_all(
                EntityKind::Starship,
                &person.starships,
                person.starships.iter().map(|&id| service.get_starship(id)).collect(),
            ),
            resolve_all(
                EntityKind::Vehicle,
                &person.vehicles,
                person.vehicles.iter().map(|&id| service.get_vehicle(id)).collect(),
            ),
        );

        let requested = person.films.len() + person.starships.len() + person.vehicles.len();
        let mut graph = Graph::with_root(Entity::Person(person));

        for (kind, resolved) in [
            (NodeKind::Film, films),
            (NodeKind::Starship, starships),
            (NodeKind::Vehicle, vehicles),
        ] {
            for (index, entity) in resolved {
                graph.add_related(kind, index, entity);
            }
        }

        let related = graph.nodes().len() - 1;
        if related < requested {
            debug!(
                "Person {}: {} of {} related entities resolved",
                root_id, related, requested
            );
        }
        info!(
            "Built graph for person {}: {} nodes, {} edges",
            root_id,
            graph.nodes().len(),
            graph.edges().len()
        );

        Ok(graph)
    }
}

/// Drive one fetch per id concurrently and keep the successes in input order.
///
/// `fetches` is index-aligned with `ids`. Results are collected
/// positionally, so the output order never depends on which fetch finishes
/// first. Each entry carries its index in `ids`.
async fn resolve_all<T, Fut>(kind: EntityKind, ids: &[u32], fetches: Vec<Fut>) -> Vec<(usize, Entity)>
where
    Fut: Future<Output = Result<T, FetchError>>,
    T: Into<Entity>,
{
    let results = join_all(fetches).await;

    results
        .into_iter()
        .zip(ids)
        .enumerate()
        .filter_map(|(index, (result, id))| match result {
            Ok(record) => Some((index, record.into())),
            Err(e) => {
                debug!("Dropping {} {} from graph: {}", kind, id, e);
                None
            }
        })
        .collect()
}
